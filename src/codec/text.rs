use base64::{Engine as _, engine::general_purpose::STANDARD};

use crate::foundation::error::{ModkitError, ModkitResult};

/// Encode bytes as standard (padded) base64 text.
pub fn bytes_to_text(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decode base64 text produced by [`bytes_to_text`].
///
/// A leading `data:<mime>;base64,` prefix is accepted and stripped, as are surrounding
/// whitespace and any whitespace inside the payload (line breaks, tabs).
pub fn text_to_bytes(text: &str) -> ModkitResult<Vec<u8>> {
    let payload = strip_data_url(text.trim());
    let decoded = if payload.contains(char::is_whitespace) {
        let compact: String = payload.split_whitespace().collect();
        STANDARD.decode(compact)
    } else {
        STANDARD.decode(payload)
    };
    decoded.map_err(|e| ModkitError::decode(format!("invalid base64: {e}")))
}

/// Wrap bytes into a `data:` URL with the given MIME type.
pub fn to_data_url(bytes: &[u8], mime_type: &str) -> String {
    format!("data:{mime_type};base64,{}", bytes_to_text(bytes))
}

fn strip_data_url(text: &str) -> &str {
    if !text.starts_with("data:") {
        return text;
    }
    match text.split_once(";base64,") {
        Some((_, payload)) => payload,
        None => text,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/codec/text.rs"]
mod tests;
