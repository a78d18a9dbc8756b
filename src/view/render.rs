//! Render a view's template context into final page bytes.

use std::sync::Arc;

use crate::config::SiteConfig;
use crate::content::frontmatter::Frontmatter;
use crate::view::nav::NavLink;
use crate::view::template::ResolvedTemplate;

/// Document and browser-tab titles for a page.
///
/// The document title defaults to the site name; a frontmatter title
/// that differs from it produces `"{title} | {site}"` while the page
/// title carries the bare frontmatter title.
pub fn titles(site_name: &str, frontmatter: &Frontmatter) -> (String, String) {
    match frontmatter.title.as_deref().filter(|t| !t.is_empty()) {
        Some(title) if title != site_name => (format!("{title} | {site_name}"), title.to_string()),
        Some(title) => (title.to_string(), title.to_string()),
        None => (site_name.to_string(), site_name.to_string()),
    }
}

/// Build the template context and render one page to bytes.
pub fn render_page(
    config: &SiteConfig,
    template: &ResolvedTemplate,
    frontmatter: &Frontmatter,
    html_body: &str,
    links: &Arc<Vec<NavLink>>,
) -> tera::Result<Vec<u8>> {
    let (doc_title, page_title) = titles(&config.meta.name, frontmatter);

    let mut ctx = tera::Context::new();
    ctx.insert("contents", html_body);
    ctx.insert("links", links.as_ref());
    ctx.insert("theme", "dark");
    ctx.insert("doc_title", &doc_title);
    ctx.insert("page_title", &page_title);
    ctx.insert("site_name", &config.meta.name);
    ctx.insert("site_description", &config.meta.description);

    template.render(&ctx).map(String::into_bytes)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn fm_titled(title: &str) -> Frontmatter {
        Frontmatter {
            title: Some(title.to_string()),
            ..Frontmatter::default()
        }
    }

    #[test]
    fn test_titles_default_to_site_name() {
        let (doc, page) = titles("Mango", &Frontmatter::default());
        assert_eq!(doc, "Mango");
        assert_eq!(page, "Mango");
    }

    #[test]
    fn test_titles_join_differing_frontmatter_title() {
        let (doc, page) = titles("Mango", &fm_titled("About"));
        assert_eq!(doc, "About | Mango");
        assert_eq!(page, "About");
    }

    #[test]
    fn test_titles_matching_frontmatter_title_not_doubled() {
        let (doc, page) = titles("Mango", &fm_titled("Mango"));
        assert_eq!(doc, "Mango");
        assert_eq!(page, "Mango");
    }

    #[test]
    fn test_titles_empty_frontmatter_title_ignored() {
        let (doc, page) = titles("Mango", &fm_titled(""));
        assert_eq!(doc, "Mango");
        assert_eq!(page, "Mango");
    }
}
