//! Command line interface definition.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Marsh: inspect where names are placed across shards.
#[derive(Parser)]
#[command(name = "marsh")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long, global = true, env = "MARSH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Command to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Compute the shard and storage path of a name.
    Place(PlaceArgs),
    /// Parse a canonical path and print its segments.
    Parse(ParseArgs),
    /// Check whether a name matches a wildcard pattern.
    Match(MatchArgs),
    /// Print version information.
    Version,
}

/// Arguments for the place command.
#[derive(Args)]
pub struct PlaceArgs {
    /// Canonical name (sanctuary/realm/swamp).
    pub name: String,

    /// Total number of shards (overrides config).
    #[arg(long)]
    pub total_shards: Option<u32>,

    /// Directory levels below the shard directory (overrides config).
    #[arg(long)]
    pub depth: Option<usize>,

    /// Fan-out limit per directory level (overrides config).
    #[arg(long)]
    pub max_folders: Option<u32>,

    /// Root path for shard directories (overrides config).
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Store under this island id instead of the resolved shard.
    #[arg(long)]
    pub island: Option<u64>,

    /// Output format (text, json).
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Canonical path to parse.
    pub name: String,

    /// Treat `*` realm or swamp segments as wildcards.
    #[arg(long)]
    pub pattern: bool,

    /// Output format (text, json).
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the match command.
#[derive(Args)]
pub struct MatchArgs {
    /// Canonical name to test.
    pub name: String,

    /// Pattern, with `*` allowed for realm and swamp.
    pub pattern: String,
}

/// Output format for CLI commands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_place_args() {
        let cli = Cli::try_parse_from([
            "marsh",
            "place",
            "users/alice/info",
            "--total-shards",
            "100",
            "--depth",
            "3",
            "--format",
            "json",
        ])
        .unwrap();

        let Commands::Place(args) = cli.command else { panic!("expected place command") };
        assert_eq!(args.name, "users/alice/info");
        assert_eq!(args.total_shards, Some(100));
        assert_eq!(args.depth, Some(3));
        assert_eq!(args.max_folders, None);
        assert_eq!(args.format, OutputFormat::Json);
    }

    #[test]
    fn test_global_config_flag() {
        let cli =
            Cli::try_parse_from(["marsh", "parse", "users/*/info", "--pattern", "-c", "marsh.toml"])
                .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("marsh.toml")));
        let Commands::Parse(args) = cli.command else { panic!("expected parse command") };
        assert!(args.pattern);
    }

    #[test]
    fn test_match_requires_pattern() {
        assert!(Cli::try_parse_from(["marsh", "match", "users/alice/info"]).is_err());
    }
}
