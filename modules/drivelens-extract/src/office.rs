//! Office Open XML text extraction: wordprocessing documents and
//! presentations, both read as zip archives of XML parts.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::reader::Reader;
use zip::ZipArchive;

/// Extract paragraph text from a .docx in document order, one line per
/// paragraph (empty paragraphs included, matching the document's own
/// line structure).
pub fn extract_docx_text(bytes: &[u8]) -> Result<String, String> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).map_err(|e| e.to_string())?;
    let xml = read_archive_file(&mut archive, "word/document.xml")?;

    let mut reader = Reader::from_str(&xml);
    let mut buf = Vec::new();
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current: Option<String> = None;
    let mut in_run_text = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"p" => current = Some(String::new()),
                b"t" => in_run_text = true,
                _ => {}
            },
            Ok(Event::Empty(e)) => {
                if e.local_name().as_ref() == b"p" {
                    paragraphs.push(String::new());
                }
            }
            Ok(Event::Text(e)) => {
                if in_run_text {
                    if let Some(paragraph) = current.as_mut() {
                        paragraph.push_str(&String::from_utf8_lossy(e.as_ref()));
                    }
                }
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_run_text = false,
                b"p" => {
                    if let Some(paragraph) = current.take() {
                        paragraphs.push(paragraph);
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(format!("document.xml: {e}")),
            _ => {}
        }
        buf.clear();
    }

    Ok(paragraphs.join("\n"))
}

/// Extract run text from a .pptx: slides in ascending number order, then
/// shapes and runs in slide-XML document order. Shapes without a text
/// frame carry no `<a:t>` runs and contribute nothing.
pub fn extract_pptx_text(bytes: &[u8]) -> Result<String, String> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).map_err(|e| e.to_string())?;

    let mut slides: Vec<(u32, String)> = archive
        .file_names()
        .filter_map(|name| slide_number(name).map(|n| (n, name.to_string())))
        .collect();
    slides.sort();

    let mut runs: Vec<String> = Vec::new();
    for (_, name) in slides {
        let xml = read_archive_file(&mut archive, &name)?;
        collect_slide_runs(&xml, &mut runs).map_err(|e| format!("{name}: {e}"))?;
    }

    Ok(runs.join("\n"))
}

fn collect_slide_runs(xml: &str, runs: &mut Vec<String>) -> Result<(), String> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut in_run_text = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                if e.local_name().as_ref() == b"t" {
                    in_run_text = true;
                }
            }
            Ok(Event::Text(e)) => {
                if in_run_text {
                    runs.push(String::from_utf8_lossy(e.as_ref()).into_owned());
                }
            }
            Ok(Event::End(e)) => {
                if e.local_name().as_ref() == b"t" {
                    in_run_text = false;
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.to_string()),
            _ => {}
        }
        buf.clear();
    }
    Ok(())
}

/// Parse the slide number out of `ppt/slides/slideN.xml`.
fn slide_number(name: &str) -> Option<u32> {
    name.strip_prefix("ppt/slides/slide")?
        .strip_suffix(".xml")?
        .parse()
        .ok()
}

fn read_archive_file(
    archive: &mut ZipArchive<Cursor<&[u8]>>,
    name: &str,
) -> Result<String, String> {
    let mut file = archive
        .by_name(name)
        .map_err(|e| format!("{name}: {e}"))?;
    let mut content = String::new();
    file.read_to_string(&mut content)
        .map_err(|e| format!("{name}: {e}"))?;
    Ok(content)
}
