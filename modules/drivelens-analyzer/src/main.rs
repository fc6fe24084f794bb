use std::sync::Arc;

use anyhow::{bail, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use drive_client::{DriveClient, Session};
use drivelens_analyzer::models::build_models;
use drivelens_analyzer::{Analyzer, Summarizer, Synthesizer};
use drivelens_common::{Config, FileDescriptor};
use drivelens_extract::DriveFetcher;

/// Ask questions about files in a Google Drive account.
#[derive(Parser, Debug)]
#[command(name = "drivelens")]
struct Args {
    /// List available files and exit.
    #[arg(long)]
    list: bool,

    /// File id to analyze, in selection order. Repeatable.
    #[arg(long = "file", value_name = "FILE_ID")]
    files: Vec<String>,

    /// Analyze every listed file.
    #[arg(long)]
    all: bool,

    /// The question to answer about the selected files.
    #[arg(long)]
    question: Option<String>,
}

/// Selection cap, matching the picker limit in the listing UI.
const MAX_SELECTION: usize = 30;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("drivelens=info".parse()?)
                .add_directive("drivelens_analyzer=info".parse()?),
        )
        .init();

    let args = Args::parse();
    let config = Config::from_env();
    config.log_redacted();

    let client = DriveClient::new();
    let mut session = build_session(&config)?;
    if session.access_token.is_empty() || session.is_expired() {
        session
            .refresh(
                client.http(),
                &config.google_client_id,
                &config.google_client_secret,
            )
            .await?;
    }

    let listing = client.list_files(&session).await?;
    let files: Vec<FileDescriptor> = listing
        .into_iter()
        .map(|f| FileDescriptor::new(f.id, f.name, f.mime_type))
        .collect();
    info!(count = files.len(), "Connected to Google Drive");

    if args.list {
        for file in &files {
            println!("{}\t{}\t{}", file.id, file.name, file.mime_type);
        }
        return Ok(());
    }

    let Some(ref question) = args.question else {
        bail!("--question is required unless --list is given");
    };
    let selection = select_files(&files, &args)?;
    info!(selected = selection.len(), "Analyzing files");

    let models = build_models(&config);
    let summarizer = Summarizer::new(
        models.summary,
        config.summary_max_tokens,
        config.summary_input_bytes,
    );
    let synthesizer = Synthesizer::new(
        models.synthesis,
        config.synthesis_max_tokens,
        config.context_budget_tokens,
    );
    let fetcher = Arc::new(DriveFetcher::new(client, session));

    let report = Analyzer::new(fetcher, summarizer, synthesizer)
        .analyze(&selection, &question)
        .await?;

    for warning in &report.warnings {
        eprintln!("warning: {warning}");
    }
    println!("{}", report.answer);
    Ok(())
}

fn build_session(config: &Config) -> Result<Session> {
    let mut session = match &config.google_access_token {
        Some(token) => Session::new(token.clone()),
        None => Session::new(String::new()),
    };
    if let Some(refresh) = &config.google_refresh_token {
        session = session.with_refresh_token(refresh.clone());
    }
    if session.access_token.is_empty() && session.refresh_token.is_none() {
        bail!("set GOOGLE_ACCESS_TOKEN or GOOGLE_REFRESH_TOKEN to authenticate");
    }
    Ok(session)
}

fn select_files(files: &[FileDescriptor], args: &Args) -> Result<Vec<FileDescriptor>> {
    let selection: Vec<FileDescriptor> = if args.all {
        files.to_vec()
    } else {
        let mut picked = Vec::with_capacity(args.files.len());
        for id in &args.files {
            match files.iter().find(|f| &f.id == id) {
                Some(file) => picked.push(file.clone()),
                None => bail!("file id {id} not found in the Drive listing"),
            }
        }
        picked
    };

    if selection.is_empty() {
        bail!("no files selected; pass --file <FILE_ID> (repeatable) or --all");
    }
    if selection.len() > MAX_SELECTION {
        bail!(
            "{} files selected, the limit is {MAX_SELECTION}",
            selection.len()
        );
    }
    Ok(selection)
}
