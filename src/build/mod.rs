//! One-shot site builds and the shared batch pipeline.
//!
//! The serve path and the `build` subcommand both go through
//! [`build_batch`]; only the `build` subcommand persists the result to
//! disk via [`write_site`].

use std::fs;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};

use crate::config::SiteConfig;
use crate::content::{self, ContentError};
use crate::view::BuildBatch;
use crate::{debug, log, theme};

/// Discover content and build a complete batch.
///
/// With `allow_sample` set, a missing content root falls back to the
/// embedded sample page instead of failing; one-shot builds pass
/// `false` and treat the missing root as fatal.
pub fn build_batch(config: &SiteConfig, allow_sample: bool) -> Result<BuildBatch> {
    let entries = match content::discover(&config.dev.content_dir) {
        Ok(entries) => entries,
        Err(ContentError::MissingRoot(path)) if allow_sample => {
            log!(
                "build";
                "no content directory at {}, using sample content",
                path.display()
            );
            content::sample_entries()
        }
        Err(e) => {
            return Err(e).with_context(|| {
                format!(
                    "failed to discover content under {}",
                    config.dev.content_dir.display()
                )
            });
        }
    };

    let batch = BuildBatch::build(config, entries)?;
    Ok(batch)
}

/// The `build` subcommand: render everything and persist it.
pub fn run(config: &SiteConfig) -> Result<()> {
    let start = Instant::now();

    let batch = build_batch(config, false)?;
    write_site(config, &batch)?;

    log!(
        "build";
        "built {} page(s) to {} in {:.1?}",
        batch.len(),
        config.dev.build_dir.display(),
        start.elapsed()
    );
    Ok(())
}

/// Write a batch's pages and assets under the build directory.
///
/// The root view lands at `index.html`; every other view at
/// `{slug}.html`. Static files are copied into `assets/`, followed by
/// the generated stylesheet and theme script.
pub fn write_site(config: &SiteConfig, batch: &BuildBatch) -> Result<()> {
    fs::create_dir_all(&config.dev.build_dir)
        .with_context(|| format!("failed to create {}", config.dev.build_dir.display()))?;

    for view in batch.views() {
        let file_name = format!("{}.html", view.slug);
        let out_path = config.dev.build_dir.join(file_name);
        fs::write(&out_path, &view.page)
            .with_context(|| format!("failed to write {}", out_path.display()))?;
        debug!("build"; "wrote {}", out_path.display());
    }

    let assets_dir = config.assets_dir();
    if config.dev.static_dir.is_dir() {
        copy_dir(&config.dev.static_dir, &assets_dir)?;
    }
    theme::write_assets(config, &assets_dir)?;

    Ok(())
}

/// Recursively copy a directory tree.
fn copy_dir(from: &Path, to: &Path) -> Result<()> {
    fs::create_dir_all(to).with_context(|| format!("failed to create {}", to.display()))?;

    let entries =
        fs::read_dir(from).with_context(|| format!("failed to read {}", from.display()))?;
    for entry in entries {
        let entry = entry.with_context(|| format!("failed to read entry in {}", from.display()))?;
        let source = entry.path();
        let target = to.join(entry.file_name());

        if source.is_dir() {
            copy_dir(&source, &target)?;
        } else {
            fs::copy(&source, &target).with_context(|| {
                format!("failed to copy {} to {}", source.display(), target.display())
            })?;
        }
    }

    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn site_in(root: &Path) -> SiteConfig {
        let mut config = SiteConfig::default();
        config.meta.name = "Mango".to_string();
        config.theme.light = "latte".to_string();
        config.theme.dark = "mocha".to_string();
        config.dev.content_dir = root.join("docs");
        config.dev.template_dir = root.join("templates");
        config.dev.static_dir = root.join("static");
        config.dev.build_dir = root.join("dist");
        config
    }

    #[test]
    fn test_missing_content_root_is_fatal_without_sample() {
        let dir = TempDir::new().unwrap();
        let config = site_in(dir.path());

        assert!(build_batch(&config, false).is_err());
    }

    #[test]
    fn test_missing_content_root_falls_back_to_sample() {
        let dir = TempDir::new().unwrap();
        let config = site_in(dir.path());

        let batch = build_batch(&config, true).unwrap();
        assert_eq!(batch.len(), 1);
        assert!(batch.view_for("/").is_some());
    }

    #[test]
    fn test_end_to_end_build() {
        let dir = TempDir::new().unwrap();
        let config = site_in(dir.path());

        fs::create_dir_all(&config.dev.content_dir).unwrap();
        fs::write(config.dev.content_dir.join("index.md"), "# Hello").unwrap();
        fs::write(
            config.dev.content_dir.join("about.md"),
            "+++\ntitle = \"About Us\"\n+++\nBody.",
        )
        .unwrap();
        fs::create_dir_all(&config.dev.template_dir).unwrap();
        fs::write(
            config.dev.template_dir.join("base.html"),
            "<title>{{ doc_title }}</title>{{ contents | safe }}",
        )
        .unwrap();

        run(&config).unwrap();

        let index = fs::read_to_string(config.dev.build_dir.join("index.html")).unwrap();
        assert!(index.contains("<h1 id=\"hello\">Hello</h1>"));

        let about = fs::read_to_string(config.dev.build_dir.join("about.html")).unwrap();
        assert!(about.contains("<title>About Us | Mango</title>"));

        assert!(config.assets_dir().join("styles.css").is_file());
        assert!(config.assets_dir().join("theme.js").is_file());
    }

    #[test]
    fn test_build_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let config = site_in(dir.path());

        fs::create_dir_all(&config.dev.content_dir).unwrap();
        fs::write(config.dev.content_dir.join("index.md"), "# Hello").unwrap();

        run(&config).unwrap();
        let first = fs::read(config.dev.build_dir.join("index.html")).unwrap();

        run(&config).unwrap();
        let second = fs::read(config.dev.build_dir.join("index.html")).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_static_files_copied_to_assets() {
        let dir = TempDir::new().unwrap();
        let config = site_in(dir.path());

        fs::create_dir_all(&config.dev.content_dir).unwrap();
        fs::write(config.dev.content_dir.join("index.md"), "# Hi").unwrap();
        fs::create_dir_all(config.dev.static_dir.join("img")).unwrap();
        fs::write(config.dev.static_dir.join("logo.svg"), "<svg/>").unwrap();
        fs::write(config.dev.static_dir.join("img/a.png"), [0u8; 4]).unwrap();

        run(&config).unwrap();

        assert!(config.assets_dir().join("logo.svg").is_file());
        assert!(config.assets_dir().join("img/a.png").is_file());
    }
}
