//! YAML front-matter codec.
//!
//! Documents look like:
//! ```markdown
//! ---
//! title: Example
//! date: 2024-01-01T00:00:00.000Z
//! ---
//!
//! Body text
//! ```
//!
//! A document that does not open with a delimiter line has no metadata and the
//! whole text is its body.

use std::collections::BTreeMap;

use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

pub use serde_yaml::Value;

const DELIMITER: &str = "---";
const BOM: char = '\u{feff}';

/// Untyped front matter: string keys to YAML values.
pub type Metadata = BTreeMap<String, Value>;

#[derive(Debug, Error)]
pub enum FrontMatterError {
    #[error("unclosed front matter - missing closing ---")]
    Unclosed,

    #[error("invalid front matter: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Split a document into its untyped metadata and body.
pub fn decode(raw: &str) -> Result<(Metadata, String), FrontMatterError> {
    decode_as(raw)
}

/// Split a document into typed metadata and body.
///
/// A missing block deserializes `T` from an empty mapping, so `T` must
/// tolerate absent fields.
pub fn decode_as<T: DeserializeOwned>(raw: &str) -> Result<(T, String), FrontMatterError> {
    let (yaml, body) = split(raw)?;

    let metadata = match yaml {
        Some(yaml) if !yaml.trim().is_empty() => serde_yaml::from_str(yaml)?,
        _ => serde_yaml::from_value(Value::Mapping(serde_yaml::Mapping::new()))?,
    };

    Ok((metadata, body.to_string()))
}

/// Render metadata and body as a document.
pub fn encode<T: Serialize>(metadata: &T, body: &str) -> Result<String, FrontMatterError> {
    let yaml = serde_yaml::to_string(metadata)?;
    Ok(format!("{DELIMITER}\n{yaml}{DELIMITER}\n\n{body}"))
}

/// Returns the raw YAML section (if any) and the body.
fn split(raw: &str) -> Result<(Option<&str>, &str), FrontMatterError> {
    let raw = raw.strip_prefix(BOM).unwrap_or(raw);

    let Some(rest) = strip_line(raw, DELIMITER) else {
        return Ok((None, raw));
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == DELIMITER {
            let yaml = &rest[..offset];
            let after = &rest[offset + line.len()..];
            // One blank separator line belongs to the block, not the body.
            let body = strip_newline(after).unwrap_or(after);
            return Ok((Some(yaml), body));
        }
        offset += line.len();
    }

    Err(FrontMatterError::Unclosed)
}

fn strip_line<'a>(text: &'a str, line: &str) -> Option<&'a str> {
    strip_newline(text.strip_prefix(line)?)
}

fn strip_newline(text: &str) -> Option<&str> {
    text.strip_prefix("\r\n").or_else(|| text.strip_prefix('\n'))
}
