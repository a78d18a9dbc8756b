//! Markdown to HTML conversion using pulldown-cmark.
//!
//! Two transforms run over the event stream before rendering:
//! - headings without an explicit `{#id}` get a GitHub-style slug id
//! - external links open in a new tab with `rel="noopener noreferrer"`

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};
use rustc_hash::FxHashMap;

use crate::utils::html::escape;

/// Render a markdown body to HTML.
pub fn to_html(markdown: &str) -> String {
    let mut events: Vec<Event> = Parser::new_ext(markdown, options()).collect();
    assign_heading_ids(&mut events);
    let events = retarget_external_links(events);

    let mut html = String::with_capacity(markdown.len() * 3 / 2);
    pulldown_cmark::html::push_html(&mut html, events.into_iter());
    html
}

/// Enabled markdown extensions.
fn options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_HEADING_ATTRIBUTES
}

// ============================================================================
// Heading IDs
// ============================================================================

/// Give every heading without an explicit id a slug derived from its text.
///
/// Duplicate slugs get a `-1`, `-2`, ... suffix in document order.
fn assign_heading_ids(events: &mut [Event]) {
    let mut seen: FxHashMap<String, usize> = FxHashMap::default();

    let mut i = 0;
    while i < events.len() {
        let needs_id = matches!(
            &events[i],
            Event::Start(Tag::Heading { id: None, .. })
        );
        if !needs_id {
            i += 1;
            continue;
        }

        // Collect the heading's text up to its matching end tag.
        let mut text = String::new();
        for event in &events[i + 1..] {
            match event {
                Event::End(TagEnd::Heading(_)) => break,
                Event::Text(t) | Event::Code(t) => text.push_str(t),
                _ => {}
            }
        }

        let slug = slugify(&text);
        let count = seen.entry(slug.clone()).or_insert(0);
        let unique = if *count == 0 {
            slug
        } else {
            format!("{slug}-{count}")
        };
        *count += 1;

        if let Event::Start(Tag::Heading { id, .. }) = &mut events[i] {
            *id = Some(unique.into());
        }
        i += 1;
    }
}

/// Lowercased slug: alphanumerics kept, whitespace becomes `-`,
/// other punctuation dropped.
fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if c.is_whitespace() {
            slug.push('-');
        } else if c == '-' || c == '_' {
            slug.push(c);
        }
    }
    slug
}

// ============================================================================
// External Links
// ============================================================================

/// Replace external link tags with raw anchors carrying
/// `target="_blank" rel="noopener noreferrer"`.
fn retarget_external_links(events: Vec<Event>) -> Vec<Event> {
    let mut out = Vec::with_capacity(events.len());
    // Tracks, per open link, whether its tags were replaced with raw HTML.
    let mut replaced = Vec::new();

    for event in events {
        match event {
            Event::Start(Tag::Link {
                link_type,
                dest_url,
                title,
                id,
            }) => {
                if is_external(&dest_url) {
                    let title_attr = if title.is_empty() {
                        String::new()
                    } else {
                        format!(" title=\"{}\"", escape(&title))
                    };
                    let anchor = format!(
                        "<a href=\"{}\"{} target=\"_blank\" rel=\"noopener noreferrer\">",
                        escape(&dest_url),
                        title_attr
                    );
                    out.push(Event::Html(anchor.into()));
                    replaced.push(true);
                } else {
                    out.push(Event::Start(Tag::Link {
                        link_type,
                        dest_url,
                        title,
                        id,
                    }));
                    replaced.push(false);
                }
            }
            Event::End(TagEnd::Link) => {
                if replaced.pop().unwrap_or(false) {
                    out.push(Event::Html("</a>".into()));
                } else {
                    out.push(Event::End(TagEnd::Link));
                }
            }
            other => out.push(other),
        }
    }

    out
}

/// Check if a link has a URL scheme (http:, mailto:, ...).
fn is_external(link: &str) -> bool {
    link.find(':').is_some_and(|pos| {
        pos > 0
            && link[..pos]
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_auto_id() {
        let html = to_html("# Hello\n");
        assert!(html.contains("<h1 id=\"hello\">Hello</h1>"));
    }

    #[test]
    fn test_heading_id_multiword() {
        let html = to_html("## Getting Started!\n");
        assert!(html.contains("id=\"getting-started\""));
    }

    #[test]
    fn test_heading_id_duplicates() {
        let html = to_html("# Setup\n\n# Setup\n");
        assert!(html.contains("id=\"setup\""));
        assert!(html.contains("id=\"setup-1\""));
    }

    #[test]
    fn test_heading_explicit_id_kept() {
        let html = to_html("# Hello {#custom}\n");
        assert!(html.contains("id=\"custom\""));
        assert!(!html.contains("id=\"hello\""));
    }

    #[test]
    fn test_external_link_target_blank() {
        let html = to_html("[docs](https://example.com)\n");
        assert!(html.contains("href=\"https://example.com\""));
        assert!(html.contains("target=\"_blank\""));
        assert!(html.contains("rel=\"noopener noreferrer\""));
        assert!(html.contains(">docs</a>"));
    }

    #[test]
    fn test_internal_link_untouched() {
        let html = to_html("[about](/about)\n");
        assert!(html.contains("<a href=\"/about\">about</a>"));
        assert!(!html.contains("target=\"_blank\""));
    }

    #[test]
    fn test_is_external() {
        assert!(is_external("https://example.com"));
        assert!(is_external("mailto:user@example.com"));
        assert!(!is_external("/about"));
        assert!(!is_external("./file.txt"));
        assert!(!is_external("#section"));
    }

    #[test]
    fn test_tables_enabled() {
        let html = to_html("| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(html.contains("<table>"));
    }
}
