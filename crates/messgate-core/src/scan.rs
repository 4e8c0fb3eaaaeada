//! Token identifier extraction from raw scanner payloads.
//!
//! QR readers hand back one of: a bare token, a quoted token, or a JSON
//! object carrying `tokenId` (optionally under `data`). Extraction is total
//! and fails closed to an empty string.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Error raised when a typed or scanned identifier is unusable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenIdError {
    /// Nothing left after trimming.
    #[error("token id is required")]
    Empty,
}

/// A trimmed, non-empty token identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenId(String);

impl TokenId {
    /// Parses a typed identifier: trims and requires a non-empty result.
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, TokenIdError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TokenIdError::Empty);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Runs the scanner extraction and keeps the result only if non-empty.
    pub fn from_scan(raw: &str) -> Option<Self> {
        Self::parse(extract_token_id(raw)).ok()
    }

    /// Borrowed identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TokenId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalizes raw scan text into a token identifier, or `""` if none is usable.
///
/// One pass trims, strips one layer of matching quotes, and unwraps a JSON
/// object. Passes repeat until the text stops changing; a changed pass always
/// shortens the text, so the loop ends and the result is a fixed point:
/// `extract_token_id(&extract_token_id(x)) == extract_token_id(x)`.
///
/// # Example
///
/// ```rust
/// use messgate_core::extract_token_id;
///
/// assert_eq!(extract_token_id(r#"{"tokenId":"ABC123"}"#), "ABC123");
/// assert_eq!(extract_token_id(r#""XYZ""#), "XYZ");
/// assert_eq!(extract_token_id("{bad json"), "");
/// ```
pub fn extract_token_id(raw: &str) -> String {
    let mut current = extract_once(raw);
    loop {
        let next = extract_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn extract_once(raw: &str) -> String {
    let mut text = raw.trim();
    if text.is_empty() {
        return String::new();
    }

    if let Some(inner) = strip_quotes(text) {
        text = inner.trim();
    }

    // Anything opening like an object is a structured payload; if it does not
    // parse there is no token to fall back to.
    if text.starts_with('{') {
        return match serde_json::from_str::<Value>(text) {
            Ok(object) => token_field(&object).unwrap_or_default(),
            Err(_) => String::new(),
        };
    }

    text.to_string()
}

fn strip_quotes(text: &str) -> Option<&str> {
    let first = text.chars().next()?;
    if (first == '"' || first == '\'') && text.ends_with(first) {
        // Quote characters are single-byte, so these slices are on boundaries.
        return Some(if text.len() >= 2 {
            &text[1..text.len() - 1]
        } else {
            ""
        });
    }
    None
}

fn token_field(object: &Value) -> Option<String> {
    usable(object.get("tokenId"))
        .or_else(|| usable(object.get("data").and_then(|data| data.get("tokenId"))))
}

// Missing, null, false, 0, "" and containers fall through to the next candidate.
fn usable(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.trim().to_string()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}
