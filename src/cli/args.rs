//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Mango static site generator CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path
    #[arg(short = 'f', long, global = true, default_value = "config.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Content directory with markdown files
    #[arg(short, long, global = true, value_hint = clap::ValueHint::DirPath)]
    pub content: Option<PathBuf>,

    /// Template directory with HTML layouts
    #[arg(short, long, global = true, value_hint = clap::ValueHint::DirPath)]
    pub templates: Option<PathBuf>,

    /// Static asset directory
    #[arg(short = 's', long = "static", global = true, value_hint = clap::ValueHint::DirPath)]
    pub static_dir: Option<PathBuf>,

    /// Build output directory
    #[arg(short, long, global = true, value_hint = clap::ValueHint::DirPath)]
    pub output: Option<PathBuf>,

    /// Enable verbose output for debugging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Render the site once into the build directory
    #[command(visible_alias = "b")]
    Build,

    /// Start the development server with live reload
    #[command(visible_aliases = ["s", "server"])]
    Serve {
        /// Port number to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },
}

impl Cli {
    /// Port override from the serve subcommand, if any.
    pub fn serve_port(&self) -> Option<u16> {
        match self.command {
            Commands::Serve { port } => port,
            Commands::Build => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_build() {
        let cli = Cli::try_parse_from(["mango", "build"]).unwrap();
        assert!(matches!(cli.command, Commands::Build));
        assert_eq!(cli.config, PathBuf::from("config.toml"));
    }

    #[test]
    fn test_parse_serve_with_port() {
        let cli = Cli::try_parse_from(["mango", "serve", "--port", "8080"]).unwrap();
        assert_eq!(cli.serve_port(), Some(8080));
    }

    #[test]
    fn test_verbose_short_does_not_shadow_version() {
        // -v is verbose; -V stays with the auto-generated version flag
        let cli = Cli::try_parse_from(["mango", "-v", "build"]).unwrap();
        assert!(cli.verbose);

        let err = Cli::try_parse_from(["mango", "-V"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_parse_server_alias_and_overrides() {
        let cli = Cli::try_parse_from(["mango", "server", "--content", "pages"]).unwrap();
        assert!(matches!(cli.command, Commands::Serve { .. }));
        assert_eq!(cli.content, Some(PathBuf::from("pages")));
    }
}
