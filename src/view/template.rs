//! Template resolution with a layered fallback chain.
//!
//! Each view resolves its layout independently: an explicit layout
//! named in frontmatter wins, then a template matching the route slug,
//! then the project-wide `base.html`, and finally the embedded default
//! layout. A step that is missing, unreadable or fails to parse logs a
//! warning and falls through to the next one; only an invalid embedded
//! default is fatal.

use std::fs;
use std::path::Path;

use tera::Tera;

use crate::content::frontmatter::Frontmatter;
use crate::embed;
use crate::log;

/// Name every layout is registered under in its own [`Tera`] instance.
const LAYOUT_NAME: &str = "layout";

/// A compiled layout plus a label saying where it came from.
#[derive(Debug, Clone)]
pub struct ResolvedTemplate {
    origin: String,
    tera: Tera,
}

impl ResolvedTemplate {
    pub fn render(&self, context: &tera::Context) -> tera::Result<String> {
        self.tera.render(LAYOUT_NAME, context)
    }

    /// Where the layout was resolved from, for logs and tests.
    pub fn origin(&self) -> &str {
        &self.origin
    }
}

/// Resolve the layout for one view.
///
/// When the template directory does not exist the chain is skipped and
/// the embedded default is compiled directly.
pub fn resolve(template_dir: &Path, frontmatter: &Frontmatter, slug: &str) -> tera::Result<ResolvedTemplate> {
    if template_dir.is_dir() {
        if let Some(layout) = frontmatter.layout.as_deref().filter(|l| !l.is_empty()) {
            let candidate = template_dir.join(format!("{layout}.html"));
            if let Some(resolved) = try_file(&candidate, &format!("layout:{layout}")) {
                return Ok(resolved);
            }
            if !candidate.is_file() {
                log!(
                    "template";
                    "layout \"{layout}\" named in frontmatter for {slug} not found at {}",
                    candidate.display()
                );
            }
        }

        let candidate = template_dir.join(format!("{slug}.html"));
        if let Some(resolved) = try_file(&candidate, &format!("slug:{slug}")) {
            return Ok(resolved);
        }

        let candidate = template_dir.join("base.html");
        if let Some(resolved) = try_file(&candidate, "base") {
            return Ok(resolved);
        }

        log!("template"; "no template matched for {slug}, using embedded default");
    } else {
        crate::debug!(
            "template";
            "no template directory at {}, using embedded layout",
            template_dir.display()
        );
    }

    compile(embed::DEFAULT_LAYOUT, "default")
}

/// Load and compile a single template file. Missing files fall through
/// silently; unreadable or invalid ones log a warning first.
fn try_file(path: &Path, origin: &str) -> Option<ResolvedTemplate> {
    if !path.is_file() {
        return None;
    }

    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            log!("template"; "failed to read {}: {e}", path.display());
            return None;
        }
    };

    match compile(&source, origin) {
        Ok(resolved) => Some(resolved),
        Err(e) => {
            log!("template"; "failed to parse {}: {e}", path.display());
            None
        }
    }
}

fn compile(source: &str, origin: &str) -> tera::Result<ResolvedTemplate> {
    let mut tera = Tera::default();
    tera.add_raw_template(LAYOUT_NAME, source)?;
    Ok(ResolvedTemplate {
        origin: origin.to_string(),
        tera,
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn fm_with_layout(layout: &str) -> Frontmatter {
        Frontmatter {
            layout: Some(layout.to_string()),
            ..Frontmatter::default()
        }
    }

    #[test]
    fn test_frontmatter_layout_wins() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("custom.html"), "custom {{ contents | safe }}").unwrap();
        fs::write(dir.path().join("base.html"), "base {{ contents | safe }}").unwrap();

        let resolved = resolve(dir.path(), &fm_with_layout("custom"), "about").unwrap();
        assert_eq!(resolved.origin(), "layout:custom");
    }

    #[test]
    fn test_slug_template_before_base() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("about.html"), "about page").unwrap();
        fs::write(dir.path().join("base.html"), "base page").unwrap();

        let resolved = resolve(dir.path(), &Frontmatter::default(), "about").unwrap();
        assert_eq!(resolved.origin(), "slug:about");
    }

    #[test]
    fn test_base_fallback() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("base.html"), "base page").unwrap();

        let resolved = resolve(dir.path(), &fm_with_layout("missing"), "about").unwrap();
        assert_eq!(resolved.origin(), "base");
    }

    #[test]
    fn test_invalid_template_falls_through() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("about.html"), "{% broken").unwrap();
        fs::write(dir.path().join("base.html"), "base page").unwrap();

        let resolved = resolve(dir.path(), &Frontmatter::default(), "about").unwrap();
        assert_eq!(resolved.origin(), "base");
    }

    #[test]
    fn test_missing_template_dir_uses_default() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("templates");

        let resolved = resolve(&missing, &Frontmatter::default(), "about").unwrap();
        assert_eq!(resolved.origin(), "default");
    }

    #[test]
    fn test_empty_template_dir_uses_default() {
        let dir = TempDir::new().unwrap();

        let resolved = resolve(dir.path(), &Frontmatter::default(), "about").unwrap();
        assert_eq!(resolved.origin(), "default");
    }

    #[test]
    fn test_typoed_layout_exhausts_chain_to_default() {
        // a frontmatter layout naming no existing file must not abort
        // the chain, only fall through past slug and base
        let dir = TempDir::new().unwrap();

        let resolved = resolve(dir.path(), &fm_with_layout("articel"), "about").unwrap();
        assert_eq!(resolved.origin(), "default");
    }

    #[test]
    fn test_default_layout_renders() {
        let resolved = compile(embed::DEFAULT_LAYOUT, "default").unwrap();
        let mut ctx = tera::Context::new();
        ctx.insert("theme", "dark");
        ctx.insert("doc_title", "Docs");
        ctx.insert("page_title", "Docs");
        ctx.insert("contents", "<p>hello</p>");
        ctx.insert("links", &Vec::<crate::view::nav::NavLink>::new());

        let html = resolved.render(&ctx).unwrap();
        assert!(html.contains("<p>hello</p>"));
        assert!(html.contains("<title>Docs</title>"));
    }
}
