use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "typegraph")]
#[command(about = "Typegraph CLI - generate GraphQL SDL from type manifests")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Log filter used when RUST_LOG is not set (e.g. info, typegraph_schema=debug)
    #[arg(long, global = true, env = "TYPEGRAPH_LOG", default_value = "warn")]
    pub log_level: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate SDL for a manifest
    Sdl(SdlArgs),
    /// Build the schema and print a summary
    Check(CheckArgs),
}

#[derive(clap::Args)]
pub struct SdlArgs {
    /// Manifest file (.json or .toml)
    #[arg(short, long)]
    pub manifest: PathBuf,
    /// Config file (defaults to ./typegraph.toml when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Write SDL to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Also write field bindings as JSON to this file
    #[arg(short, long)]
    pub bindings: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct CheckArgs {
    /// Manifest file (.json or .toml)
    #[arg(short, long)]
    pub manifest: PathBuf,
    /// Config file (defaults to ./typegraph.toml when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_sdl() {
        let cli = Cli::parse_from([
            "typegraph",
            "sdl",
            "--manifest",
            "types.toml",
            "--output",
            "schema.graphql",
        ]);
        let Commands::Sdl(args) = cli.command else {
            panic!("expected sdl command");
        };
        assert_eq!(args.manifest, PathBuf::from("types.toml"));
        assert_eq!(args.output, Some(PathBuf::from("schema.graphql")));
        assert!(args.config.is_none());
    }

    #[test]
    fn test_global_log_level() {
        let cli = Cli::parse_from(["typegraph", "check", "-m", "types.json", "--log-level", "debug"]);
        assert_eq!(cli.log_level, "debug");
        assert!(matches!(cli.command, Commands::Check(_)));
    }
}
