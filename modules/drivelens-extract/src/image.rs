//! Image payload validation.

/// Check that the bytes decode as an image before they are carried
/// through to the synthesis request as an inline attachment. Returns the
/// decoded format name on success.
pub fn validate(bytes: &[u8]) -> Result<&'static str, String> {
    let format = image::guess_format(bytes).map_err(|e| e.to_string())?;
    image::load_from_memory_with_format(bytes, format).map_err(|e| e.to_string())?;
    Ok(format_name(format))
}

fn format_name(format: image::ImageFormat) -> &'static str {
    match format {
        image::ImageFormat::Png => "png",
        image::ImageFormat::Jpeg => "jpeg",
        image::ImageFormat::Gif => "gif",
        image::ImageFormat::WebP => "webp",
        _ => "image",
    }
}
