//! Site configuration management for `config.toml`.
//!
//! | Section   | Purpose                                            |
//! |-----------|----------------------------------------------------|
//! | `[meta]`  | Site metadata (name, description, keywords, URL)   |
//! | `[theme]` | Light/dark theme name pair                         |
//! | `[dev]`   | Port, directory paths, log level                   |
//!
//! An embedded default document is parsed first and user values are
//! merged over it table-by-table, so a partial `config.toml` only
//! overrides the keys it names. CLI flags override both.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::{cli::Cli, debug, embed};

// ============================================================================
// Root configuration
// ============================================================================

/// Root configuration structure representing config.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Site metadata
    #[serde(default)]
    pub meta: MetaConfig,

    /// Theme name pair
    #[serde(default)]
    pub theme: ThemeConfig,

    /// Dev options (directories, port, log level)
    #[serde(default)]
    pub dev: DevConfig,
}

/// Site metadata rendered into page titles and heads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MetaConfig {
    pub name: String,
    pub description: String,
    pub keywords: Vec<String>,
    #[serde(rename = "URL")]
    pub url: String,
}

/// Light/dark theme names substituted into the generated stylesheet.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub light: String,
    pub dark: String,
}

/// Development options: server port, directory layout, log level.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DevConfig {
    pub port: u16,
    pub static_dir: PathBuf,
    pub template_dir: PathBuf,
    pub content_dir: PathBuf,
    pub build_dir: PathBuf,
    pub level: String,
}

impl SiteConfig {
    /// Load configuration from CLI arguments.
    ///
    /// Starts from the embedded defaults, merges the user's config file
    /// over them (if present), then applies CLI overrides.
    pub fn load(cli: &Cli) -> Result<Self> {
        let mut value: toml::Value = toml::from_str(embed::DEFAULT_CONFIG)
            .context("embedded default config is invalid")?;

        if cli.config.exists() {
            let raw = fs::read_to_string(&cli.config)
                .with_context(|| format!("failed to read {}", cli.config.display()))?;
            let user: toml::Value = toml::from_str(&raw)
                .with_context(|| format!("failed to parse {}", cli.config.display()))?;
            merge_value(&mut value, user);
        } else {
            debug!("config"; "{} not found, using defaults", cli.config.display());
        }

        let mut config: SiteConfig = value
            .try_into()
            .with_context(|| format!("invalid configuration in {}", cli.config.display()))?;
        config.config_path = cli.config.clone();
        config.apply_cli(cli);

        Ok(config)
    }

    /// Apply CLI directory/port overrides on top of the file values.
    fn apply_cli(&mut self, cli: &Cli) {
        if let Some(dir) = &cli.content {
            self.dev.content_dir = dir.clone();
        }
        if let Some(dir) = &cli.templates {
            self.dev.template_dir = dir.clone();
        }
        if let Some(dir) = &cli.static_dir {
            self.dev.static_dir = dir.clone();
        }
        if let Some(dir) = &cli.output {
            self.dev.build_dir = dir.clone();
        }
        if let Some(port) = cli.serve_port() {
            self.dev.port = port;
        }
    }

    /// Whether debug logging should be enabled (config or CLI).
    pub fn verbose(&self, cli: &Cli) -> bool {
        cli.verbose || self.dev.level.eq_ignore_ascii_case("debug")
    }

    /// Directory the static files and generated stylesheet land in.
    pub fn assets_dir(&self) -> PathBuf {
        self.dev.build_dir.join("assets")
    }
}

/// Merge `other` into `base`: tables merge key-by-key, everything else
/// in `other` replaces the base value.
fn merge_value(base: &mut toml::Value, other: toml::Value) {
    match (base, other) {
        (toml::Value::Table(base_table), toml::Value::Table(other_table)) => {
            for (key, other_value) in other_table {
                match base_table.get_mut(&key) {
                    Some(base_value) => merge_value(base_value, other_value),
                    None => {
                        base_table.insert(key, other_value);
                    }
                }
            }
        }
        (base, other) => *base = other,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> SiteConfig {
        let value: toml::Value = toml::from_str(embed::DEFAULT_CONFIG).unwrap();
        value.try_into().unwrap()
    }

    #[test]
    fn test_embedded_default_config_parses() {
        let config = defaults();
        assert!(!config.meta.name.is_empty());
        assert_ne!(config.dev.port, 0);
        assert_eq!(config.dev.build_dir, PathBuf::from("dist"));
    }

    #[test]
    fn test_merge_partial_user_config() {
        let mut base: toml::Value = toml::from_str(embed::DEFAULT_CONFIG).unwrap();
        let user: toml::Value = toml::from_str(
            r#"
            [meta]
            name = "My Docs"

            [dev]
            port = 9999
            "#,
        )
        .unwrap();
        merge_value(&mut base, user);
        let config: SiteConfig = base.try_into().unwrap();

        // Overridden keys
        assert_eq!(config.meta.name, "My Docs");
        assert_eq!(config.dev.port, 9999);
        // Untouched keys keep their defaults
        assert_eq!(config.dev.content_dir, PathBuf::from("docs"));
        assert!(!config.theme.dark.is_empty());
    }

    #[test]
    fn test_assets_dir() {
        let mut config = defaults();
        config.dev.build_dir = PathBuf::from("out");
        assert_eq!(config.assets_dir(), PathBuf::from("out/assets"));
    }
}
