//! Content discovery: walking the content tree into entries.
//!
//! - [`frontmatter`] - TOML/YAML metadata block splitting
//! - [`markdown`] - markdown body to HTML conversion
//! - [`ContentEntry`] - one markdown source file, post-split

pub mod frontmatter;
pub mod markdown;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::{debug, embed, log};
use frontmatter::Frontmatter;

/// One markdown source file after frontmatter splitting.
///
/// Created once per discovery pass and replaced wholesale on reload.
#[derive(Debug, Clone)]
pub struct ContentEntry {
    /// Source path, stable identity for the entry.
    pub path: PathBuf,
    /// Parsed metadata block, if the file had one.
    pub frontmatter: Option<Frontmatter>,
    /// Markdown body after frontmatter removal.
    pub body: String,
}

impl ContentEntry {
    /// Build an entry from raw file contents.
    pub fn from_source(path: PathBuf, source: &str) -> Self {
        let (frontmatter, body) = frontmatter::split(source);
        Self {
            path,
            frontmatter,
            body: body.to_string(),
        }
    }

    /// Whether the entry is marked as a draft.
    pub fn is_draft(&self) -> bool {
        self.frontmatter.as_ref().is_some_and(|m| m.draft)
    }
}

/// Errors that abort a whole discovery pass.
///
/// Anything less (one unreadable file, malformed metadata) is logged and
/// the walk continues.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("content directory {0} does not exist")]
    MissingRoot(PathBuf),

    #[error("unable to read content directory {path}")]
    UnreadableDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Recursively discover markdown entries under `root`.
///
/// Non-markdown files are skipped, drafts are excluded before anything
/// downstream sees them, and unreadable individual files are logged and
/// dropped. Traversal order is sorted by file name per directory, so a
/// given tree always yields the same entry order.
pub fn discover(root: &Path) -> Result<Vec<ContentEntry>, ContentError> {
    if !root.exists() {
        return Err(ContentError::MissingRoot(root.to_path_buf()));
    }

    let mut entries = Vec::new();
    walk(root, &mut entries)?;
    Ok(entries)
}

fn walk(dir: &Path, entries: &mut Vec<ContentEntry>) -> Result<(), ContentError> {
    let read_dir = fs::read_dir(dir).map_err(|source| ContentError::UnreadableDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut paths: Vec<PathBuf> = read_dir
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .collect();
    paths.sort();

    for path in paths {
        if path.is_dir() {
            walk(&path, entries)?;
            continue;
        }

        if !is_markdown(&path) {
            debug!("content"; "skipping non-markdown file {}", path.display());
            continue;
        }

        let source = match fs::read_to_string(&path) {
            Ok(source) => source,
            Err(e) => {
                log!("content"; "dropping unreadable file {}: {}", path.display(), e);
                continue;
            }
        };

        let entry = ContentEntry::from_source(path, &source);
        if entry.is_draft() {
            debug!("content"; "skipping draft {}", entry.path.display());
            continue;
        }

        entries.push(entry);
    }

    Ok(())
}

/// The placeholder batch input served when no content directory exists.
pub fn sample_entries() -> Vec<ContentEntry> {
    vec![ContentEntry::from_source(
        PathBuf::from("sample/index.md"),
        embed::SAMPLE_PAGE,
    )]
}

/// Markdown test by extension, case-insensitive.
fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("md"))
}

// ============================================================================
// Tests
// ============================================================================
