//! Route slugs, display names and the shared navigation list.

use std::path::Path;

use serde::Serialize;

/// One navigation entry, shared by every view in a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavLink {
    pub name: String,
    pub route: String,
}

impl NavLink {
    /// Build the link for a slug.
    pub fn for_slug(slug: &str) -> Self {
        Self {
            name: display_name(slug),
            route: route_path(slug),
        }
    }
}

/// Derive the route slug from a source path.
///
/// Lower-cased basename without extension; `index` and `readme` (any
/// case) both normalize to the root slug `index`. Subdirectory segments
/// are flattened away.
pub fn route_slug(path: &Path) -> String {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    let slug = stem.to_lowercase();
    if slug == "readme" {
        "index".to_string()
    } else {
        slug
    }
}

/// URL path for a slug: `/` for the root, `/{slug}` otherwise.
pub fn route_path(slug: &str) -> String {
    if slug == "index" {
        "/".to_string()
    } else {
        format!("/{slug}")
    }
}

/// Human display name for a slug.
///
/// The root slug maps to a fixed "Home" label; everything else is
/// title-cased word by word, keeping `-`/`_` separators.
pub fn display_name(slug: &str) -> String {
    if slug == "index" {
        return "Home".to_string();
    }

    let mut name = String::with_capacity(slug.len());
    let mut at_word_start = true;
    for c in slug.chars() {
        if c == '-' || c == '_' || c.is_whitespace() {
            name.push(c);
            at_word_start = true;
        } else if at_word_start {
            name.extend(c.to_uppercase());
            at_word_start = false;
        } else {
            name.push(c);
        }
    }
    name
}

// ============================================================================
// Tests
// ============================================================================
