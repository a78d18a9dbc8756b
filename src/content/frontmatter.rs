//! Frontmatter extraction from TOML (`+++`) or YAML (`---`) blocks.

use serde::{Deserialize, Serialize};

/// Metadata recognized at the top of a markdown file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Frontmatter {
    pub title: Option<String>,
    pub layout: Option<String>,
    pub draft: bool,
}

/// Split an optional frontmatter block from a markdown source.
///
/// The first line decides the format: a line that trims to `+++` opens a
/// TOML block, `---` a YAML block, anything else means no frontmatter and
/// the input is returned unchanged as the body. The block runs until the
/// matching closing delimiter line; a missing close consumes the rest of
/// the file as metadata.
///
/// Malformed metadata is tolerated: the struct keeps its defaults
/// (`draft = false`) instead of failing the file.
pub fn split(source: &str) -> (Option<Frontmatter>, &str) {
    let Some((block, body, delimiter)) = detect(source) else {
        return (None, source);
    };

    let meta = match delimiter {
        Delimiter::Toml => parse_toml(block),
        Delimiter::Yaml => parse_yaml(block),
    };

    (Some(meta), body.trim_start_matches('\n'))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Delimiter {
    Toml,
    Yaml,
}

impl Delimiter {
    const fn marker(self) -> &'static str {
        match self {
            Delimiter::Toml => "+++",
            Delimiter::Yaml => "---",
        }
    }
}

/// Detect a frontmatter block. Returns `(block, body, delimiter)`.
fn detect(source: &str) -> Option<(&str, &str, Delimiter)> {
    let (first_line, rest) = source.split_once('\n')?;

    let delimiter = match first_line.trim() {
        "+++" => Delimiter::Toml,
        "---" => Delimiter::Yaml,
        _ => return None,
    };

    // Scan for the matching closing delimiter line.
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim() == delimiter.marker() {
            let block = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Some((block, body, delimiter));
        }
        offset += line.len();
    }

    // No closing delimiter: the remainder is all metadata.
    Some((rest, "", delimiter))
}

/// Parse a TOML frontmatter block, falling back to defaults on error.
fn parse_toml(block: &str) -> Frontmatter {
    match toml::from_str(block) {
        Ok(meta) => meta,
        Err(e) => {
            crate::debug!("content"; "malformed TOML frontmatter ignored: {}", e);
            Frontmatter::default()
        }
    }
}

/// Parse a YAML frontmatter block, falling back to defaults on error.
fn parse_yaml(block: &str) -> Frontmatter {
    match serde_yaml::from_str(block) {
        Ok(meta) => meta,
        Err(e) => {
            crate::debug!("content"; "malformed YAML frontmatter ignored: {}", e);
            Frontmatter::default()
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
