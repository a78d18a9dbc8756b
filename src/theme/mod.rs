//! Generated theme assets.
//!
//! When a project has no template directory of its own, the embedded
//! layout references `/assets/styles.css` and `/assets/theme.js`; this
//! module materializes both into the build output's asset directory.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::config::SiteConfig;
use crate::debug;
use crate::embed::theme::{StylesheetVars, STYLESHEET_CSS, THEME_JS};

/// Render the stylesheet with the configured light/dark theme names.
pub fn stylesheet(config: &SiteConfig) -> String {
    STYLESHEET_CSS.render(&StylesheetVars {
        light: config.theme.light.clone(),
        dark: config.theme.dark.clone(),
    })
}

/// Write `styles.css` and `theme.js` into the asset directory.
pub fn write_assets(config: &SiteConfig, assets_dir: &Path) -> Result<()> {
    fs::create_dir_all(assets_dir)
        .with_context(|| format!("failed to create {}", assets_dir.display()))?;

    let css_path = assets_dir.join("styles.css");
    fs::write(&css_path, stylesheet(config))
        .with_context(|| format!("failed to write {}", css_path.display()))?;

    let js_path = assets_dir.join("theme.js");
    fs::write(&js_path, THEME_JS)
        .with_context(|| format!("failed to write {}", js_path.display()))?;

    debug!("theme"; "wrote styles.css and theme.js to {}", assets_dir.display());
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn themed_config() -> SiteConfig {
        let mut config = SiteConfig::default();
        config.theme.light = "mango-light".to_string();
        config.theme.dark = "mango-dark".to_string();
        config
    }

    #[test]
    fn test_stylesheet_carries_theme_names() {
        let css = stylesheet(&themed_config());
        assert!(css.contains("mango-light"));
        assert!(css.contains("mango-dark"));
    }

    #[test]
    fn test_write_assets() {
        let dir = TempDir::new().unwrap();
        let assets = dir.path().join("assets");

        write_assets(&themed_config(), &assets).unwrap();

        assert!(assets.join("styles.css").is_file());
        assert!(assets.join("theme.js").is_file());
    }
}
