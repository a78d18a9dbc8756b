//! Views and batch assembly.
//!
//! A [`View`] is one content entry carried all the way to final page
//! bytes: rendered HTML body, resolved template and the shared
//! navigation list. A [`BuildBatch`] is a full set of views built in
//! one pass; the serve loop swaps whole batches atomically, so a batch
//! is immutable once constructed.

pub mod nav;
pub mod render;
pub mod template;

use std::path::PathBuf;
use std::sync::Arc;

use rayon::prelude::*;
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::config::SiteConfig;
use crate::content::{markdown, ContentEntry};
use nav::NavLink;
use template::ResolvedTemplate;

/// One fully rendered page.
#[derive(Debug, Clone)]
pub struct View {
    pub entry: ContentEntry,
    pub slug: String,
    pub html_body: String,
    pub links: Arc<Vec<NavLink>>,
    pub template: ResolvedTemplate,
    pub page: Vec<u8>,
}

/// Errors that fail an entire batch build.
#[derive(Debug, Error)]
pub enum ViewError {
    #[error("route {route} resolves from both {} and {}", first.display(), second.display())]
    RouteCollision {
        route: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("failed to resolve a template for {}", path.display())]
    Template {
        path: PathBuf,
        #[source]
        source: tera::Error,
    },

    #[error("failed to render {}", path.display())]
    Render {
        path: PathBuf,
        #[source]
        source: tera::Error,
    },
}

/// An immutable set of views built in a single pass.
#[derive(Debug, Clone, Default)]
pub struct BuildBatch {
    views: Vec<View>,
    routes: FxHashMap<String, usize>,
}

impl BuildBatch {
    /// Build every view for a set of discovered entries.
    ///
    /// Slugs are checked for collisions up front, the navigation list
    /// is assembled once and shared across views, then each entry is
    /// rendered. Any failure aborts the whole batch; a caller holding
    /// an older batch keeps serving it.
    pub fn build(config: &SiteConfig, entries: Vec<ContentEntry>) -> Result<Self, ViewError> {
        let slugs = check_routes(&entries)?;

        let links: Arc<Vec<NavLink>> =
            Arc::new(slugs.iter().map(|s| NavLink::for_slug(s)).collect());

        let views = entries
            .into_par_iter()
            .zip(slugs)
            .map(|(entry, slug)| build_view(config, entry, slug, Arc::clone(&links)))
            .collect::<Result<Vec<View>, ViewError>>()?;

        let routes = views
            .iter()
            .enumerate()
            .map(|(i, v)| (nav::route_path(&v.slug), i))
            .collect();

        Ok(Self { views, routes })
    }

    /// Look up the view serving a route path like `/` or `/about`.
    pub fn view_for(&self, route: &str) -> Option<&View> {
        self.routes.get(route).map(|&i| &self.views[i])
    }

    pub fn views(&self) -> &[View] {
        &self.views
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}

/// Compute slugs in entry order and reject duplicates.
fn check_routes(entries: &[ContentEntry]) -> Result<Vec<String>, ViewError> {
    let mut seen: FxHashMap<String, &PathBuf> = FxHashMap::default();
    let mut slugs = Vec::with_capacity(entries.len());

    for entry in entries {
        let slug = nav::route_slug(&entry.path);
        if let Some(first) = seen.insert(slug.clone(), &entry.path) {
            return Err(ViewError::RouteCollision {
                route: nav::route_path(&slug),
                first: first.clone(),
                second: entry.path.clone(),
            });
        }
        slugs.push(slug);
    }

    Ok(slugs)
}

fn build_view(
    config: &SiteConfig,
    entry: ContentEntry,
    slug: String,
    links: Arc<Vec<NavLink>>,
) -> Result<View, ViewError> {
    let frontmatter = entry.frontmatter.clone().unwrap_or_default();
    let html_body = markdown::to_html(&entry.body);

    let template = template::resolve(&config.dev.template_dir, &frontmatter, &slug).map_err(
        |source| ViewError::Template {
            path: entry.path.clone(),
            source,
        },
    )?;

    let page = render::render_page(config, &template, &frontmatter, &html_body, &links).map_err(
        |source| ViewError::Render {
            path: entry.path.clone(),
            source,
        },
    )?;

    Ok(View {
        entry,
        slug,
        html_body,
        links,
        template,
        page,
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> SiteConfig {
        let mut config = SiteConfig::default();
        config.meta.name = "Mango".to_string();
        // point at a directory that does not exist so the embedded
        // layout is used throughout
        config.dev.template_dir = PathBuf::from("/nonexistent/templates");
        config
    }

    fn entry(path: &str, source: &str) -> ContentEntry {
        ContentEntry::from_source(PathBuf::from(path), source)
    }

    #[test]
    fn test_batch_shares_one_nav_list() {
        let config = test_config();
        let entries = vec![
            entry("docs/index.md", "# Home"),
            entry("docs/about.md", "# About"),
            entry("docs/faq.md", "# FAQ"),
        ];

        let batch = BuildBatch::build(&config, entries).unwrap();
        assert_eq!(batch.len(), 3);

        let first = &batch.views()[0].links;
        for view in batch.views() {
            assert!(Arc::ptr_eq(first, &view.links));
            assert_eq!(view.links.len(), 3);
        }
    }

    #[test]
    fn test_batch_routes() {
        let config = test_config();
        let entries = vec![
            entry("docs/index.md", "# Home"),
            entry("docs/about.md", "# About"),
        ];

        let batch = BuildBatch::build(&config, entries).unwrap();
        assert_eq!(batch.view_for("/").unwrap().slug, "index");
        assert_eq!(batch.view_for("/about").unwrap().slug, "about");
        assert!(batch.view_for("/missing").is_none());
    }

    #[test]
    fn test_route_collision_fails_batch() {
        let config = test_config();
        let entries = vec![
            entry("docs/index.md", "# Home"),
            entry("docs/README.md", "# Readme"),
        ];

        let err = BuildBatch::build(&config, entries).unwrap_err();
        match err {
            ViewError::RouteCollision { route, .. } => assert_eq!(route, "/"),
            other => panic!("expected route collision, got {other}"),
        }
    }

    #[test]
    fn test_rendered_page_contains_body_and_nav() {
        let config = test_config();
        let entries = vec![
            entry("docs/index.md", "# Home"),
            entry(
                "docs/about.md",
                "+++\ntitle = \"About Us\"\n+++\nSome *about* text.",
            ),
        ];

        let batch = BuildBatch::build(&config, entries).unwrap();
        let about = batch.view_for("/about").unwrap();
        let html = String::from_utf8(about.page.clone()).unwrap();

        assert!(html.contains("<em>about</em>"));
        assert!(html.contains("<title>About Us | Mango</title>"));
        assert!(html.contains("href=\"/\""));
        assert!(html.contains("href=\"/about\""));
        assert!(html.contains(">Home</a>"));
    }
}
