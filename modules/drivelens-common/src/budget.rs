//! Token-budget estimation for the synthesis request.
//!
//! Estimates are deliberately rough (four characters per token for text,
//! a flat cost per inline image). They exist so an oversized payload is
//! trimmed with a warning instead of bouncing off the vendor's context
//! limit as an opaque API error.

/// Flat token cost charged per inline image attachment.
pub const IMAGE_TOKEN_COST: usize = 1100;

/// Estimate the token count of a text payload, rounding up.
pub fn estimate_tokens(text: &str) -> usize {
    text.len().div_ceil(4)
}

/// Truncate a string to at most `max_bytes` bytes at a character boundary.
pub fn truncate_to_char_boundary(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) && end > 0 {
        end -= 1;
    }
    &s[..end]
}
