//! # Sectioned Key-Value Scanner
//!
//! The first of the loader's two passes: split manifest text into raw
//! sections without interpreting any key. The typed pass in [`crate::load`]
//! consumes the output.
//!
//! ## Grammar
//!
//! - `;` or `#` at the start of a line (after indentation) opens a
//!   full-line comment.
//! - `[name]` opens a singleton section; `[name N]` opens a keyed one.
//!   The id token stays unparsed here — its width depends on the section
//!   kind, which only the typed pass knows.
//! - Every other non-blank line must read `key = value`. Keys and values
//!   are trimmed; a key repeated within one section is rejected.
//!
//! Syntax defects report as `InvalidValue` with the pseudo-key
//! `"section"` for header problems, so the taxonomy stays closed.

use mnfs_core::SchemaError;

/// One `key = value` line.
#[derive(Debug, Clone)]
pub struct RawEntry {
    /// Key, trimmed.
    pub key: String,
    /// Value text, trimmed but otherwise uninterpreted.
    pub value: String,
    /// 1-based source line.
    pub line: usize,
}

/// One `[section]` block and its entries, uninterpreted.
#[derive(Debug, Clone)]
pub struct RawSection {
    /// Header text inside the brackets, as written.
    pub header: String,
    /// First word of the header — the descriptor kind.
    pub kind: String,
    /// Second word of the header — the id token, if present.
    pub id: Option<String>,
    /// 1-based line the header appeared on.
    pub line: usize,
    /// The section's entries, in file order.
    pub entries: Vec<RawEntry>,
}

impl RawSection {
    /// Value of `key`, if the section carries it.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| entry.value.as_str())
    }

    /// Value of `key`, or `MissingKey` naming this section.
    pub fn require(&self, key: &str) -> Result<&str, SchemaError> {
        self.get(key).ok_or_else(|| SchemaError::MissingKey {
            section: self.header.clone(),
            key: key.to_string(),
        })
    }
}

/// Split manifest text into raw sections, in file order.
pub fn scan(text: &str) -> Result<Vec<RawSection>, SchemaError> {
    let mut sections: Vec<RawSection> = Vec::new();

    for (idx, raw_line) in text.lines().enumerate() {
        let line = idx + 1;
        let trimmed = raw_line.trim();

        if trimmed.is_empty() || trimmed.starts_with(';') || trimmed.starts_with('#') {
            continue;
        }

        if trimmed.starts_with('[') {
            sections.push(section_header(trimmed, line)?);
            continue;
        }

        let Some(section) = sections.last_mut() else {
            return Err(SchemaError::InvalidValue {
                section: "(preamble)".to_string(),
                key: trimmed.to_string(),
                reason: format!("key-value pair before any section header (line {line})"),
            });
        };

        let Some((key, value)) = trimmed.split_once('=') else {
            return Err(SchemaError::InvalidValue {
                section: section.header.clone(),
                key: trimmed.to_string(),
                reason: format!("expected 'key = value' (line {line})"),
            });
        };
        let key = key.trim();
        let value = value.trim();

        if key.is_empty() {
            return Err(SchemaError::InvalidValue {
                section: section.header.clone(),
                key: trimmed.to_string(),
                reason: format!("empty key (line {line})"),
            });
        }
        if section.get(key).is_some() {
            return Err(SchemaError::InvalidValue {
                section: section.header.clone(),
                key: key.to_string(),
                reason: format!("key repeated within the section (line {line})"),
            });
        }

        section.entries.push(RawEntry {
            key: key.to_string(),
            value: value.to_string(),
            line,
        });
    }

    Ok(sections)
}

fn section_header(line_text: &str, line: usize) -> Result<RawSection, SchemaError> {
    let Some(inner) = line_text
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
    else {
        return Err(SchemaError::InvalidValue {
            section: line_text.to_string(),
            key: "section".to_string(),
            reason: format!("malformed section header (line {line})"),
        });
    };

    if inner != inner.trim() {
        return Err(SchemaError::InvalidValue {
            section: inner.trim().to_string(),
            key: "section".to_string(),
            reason: format!("invalid spaces in section header (line {line})"),
        });
    }

    let mut words = inner.split_whitespace();
    let Some(kind) = words.next() else {
        return Err(SchemaError::InvalidValue {
            section: inner.to_string(),
            key: "section".to_string(),
            reason: format!("empty section header (line {line})"),
        });
    };
    let id = words.next().map(str::to_string);
    if words.next().is_some() {
        return Err(SchemaError::InvalidValue {
            section: inner.to_string(),
            key: "id".to_string(),
            reason: format!("trailing text after section id (line {line})"),
        });
    }

    Ok(RawSection {
        header: inner.to_string(),
        kind: kind.to_string(),
        id,
        line,
        entries: Vec::new(),
    })
}
