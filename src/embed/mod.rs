//! Embedded static resources.
//!
//! - `template` - Template types for typed variable injection
//! - `DEFAULT_LAYOUT` - fallback HTML layout (tera syntax)
//! - `DEFAULT_CONFIG` - baseline config merged under the user's config.toml
//! - `SAMPLE_PAGE` - markdown served when no content directory exists
//! - `theme` - generated stylesheet and toggle script

mod template;

pub use template::{Template, TemplateVars};

/// Fallback HTML layout, used when the template resolution chain is
/// exhausted. This is the only layout guaranteed to parse.
pub const DEFAULT_LAYOUT: &str = include_str!("base.html");

/// Baseline configuration. User config values override these.
pub const DEFAULT_CONFIG: &str = include_str!("config.toml");

/// Sample markdown page for the missing-content-directory fallback.
pub const SAMPLE_PAGE: &str = include_str!("sample.md");

pub mod theme {
    use super::{Template, TemplateVars};

    /// Light/dark toggle script bundled with the default layout.
    pub const THEME_JS: &str = include_str!("theme.js");

    /// Variables for styles.css.
    pub struct StylesheetVars {
        pub light: String,
        pub dark: String,
    }

    impl TemplateVars for StylesheetVars {
        fn apply(&self, content: &str) -> String {
            content
                .replace("__LIGHT__", &self.light)
                .replace("__DARK__", &self.dark)
        }
    }

    /// Stylesheet template with theme-name substitution.
    pub const STYLESHEET_CSS: Template<StylesheetVars> =
        Template::new(include_str!("styles.css"));
}
