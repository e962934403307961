//! Marsh: print shard and storage path placement for names.
//!
//! The tool never touches storage. It only reports where a name would live
//! under a given configuration, which is what operators need when moving
//! shard ranges between servers.

use anyhow::{Context, Result};
use clap::Parser;
use marsh_placement::{Name, Placement, PlacementConfig};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod cli;
mod config;

use cli::{Cli, Commands, MatchArgs, OutputFormat, ParseArgs, PlaceArgs};
use config::{Config, LogFormat};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    init_logging(&config)?;

    match cli.command {
        Commands::Place(args) => run_place(args, config.placement),
        Commands::Parse(args) => run_parse(&args),
        Commands::Match(args) => run_match(&args),
        Commands::Version => {
            println!("marsh {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn init_logging(config: &Config) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    match config.logging.format {
        LogFormat::Json => {
            tracing_subscriber::registry().with(filter).with(fmt_layer.json()).try_init()?;
        }
        LogFormat::Pretty => {
            tracing_subscriber::registry().with(filter).with(fmt_layer).try_init()?;
        }
    }

    Ok(())
}

/// Apply command line overrides on top of the configured placement.
fn apply_overrides(mut placement: PlacementConfig, args: &PlaceArgs) -> Result<PlacementConfig> {
    if let Some(total_shards) = args.total_shards {
        placement.total_shards = total_shards;
    }
    if let Some(depth) = args.depth {
        placement.depth = depth;
    }
    if let Some(max_folders) = args.max_folders {
        placement.max_folders_per_level = max_folders;
    }
    if let Some(root) = &args.root {
        placement.root_path = root.clone();
    }
    placement.validate().context("Invalid placement parameters")?;
    Ok(placement)
}

fn run_place(args: PlaceArgs, placement: PlacementConfig) -> Result<()> {
    let placement = apply_overrides(placement, &args)?;
    debug!(?placement, "Effective placement configuration");

    let name = Name::parse(&args.name).context("Invalid name")?;
    let result = match args.island {
        Some(island) => Placement::with_island(&name, &placement, island),
        None => Placement::compute(&name, &placement),
    }
    .with_context(|| format!("Failed to place {name}"))?;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Text => print_placement(&result),
    }
    Ok(())
}

fn print_placement(placement: &Placement) {
    println!("Name:   {}", placement.name);
    println!("Shard:  {}", placement.shard);
    if let Some(island) = placement.island {
        println!("Island: {island}");
    }
    println!("Path:   {}", placement.path.display());
}

/// Segments of a parsed name, as printed by `marsh parse`.
#[derive(Debug, Serialize)]
struct ParsedName<'a> {
    sanctuary: &'a str,
    realm: &'a str,
    swamp: &'a str,
    canonical: &'a str,
    pattern: bool,
}

impl<'a> From<&'a Name> for ParsedName<'a> {
    fn from(name: &'a Name) -> Self {
        Self {
            sanctuary: name.sanctuary_id(),
            realm: name.realm_name(),
            swamp: name.swamp_name(),
            canonical: name.canonical_path(),
            pattern: name.is_pattern(),
        }
    }
}

fn run_parse(args: &ParseArgs) -> Result<()> {
    let name = if args.pattern {
        Name::parse_pattern(&args.name)
    } else {
        Name::parse(&args.name)
    }
    .context("Invalid name")?;

    let parsed = ParsedName::from(&name);
    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&parsed)?),
        OutputFormat::Text => {
            println!("Sanctuary: {}", parsed.sanctuary);
            println!("Realm:     {}", parsed.realm);
            println!("Swamp:     {}", parsed.swamp);
            println!("Pattern:   {}", parsed.pattern);
        }
    }
    Ok(())
}

fn run_match(args: &MatchArgs) -> Result<()> {
    let name = Name::parse(&args.name).context("Invalid name")?;
    let pattern = Name::parse_pattern(&args.pattern).context("Invalid pattern")?;
    println!("{}", name.matches(&pattern));
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn place_args(extra: &[&str]) -> PlaceArgs {
        let mut argv = vec!["marsh", "place", "users/alice/info"];
        argv.extend_from_slice(extra);
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Place(args) => args,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_overrides_replace_config_values() {
        let args = place_args(&["--total-shards", "10", "--root", "/srv", "--max-folders", "256"]);
        let placement = apply_overrides(PlacementConfig::default(), &args).unwrap();
        assert_eq!(placement.total_shards, 10);
        assert_eq!(placement.root_path, PathBuf::from("/srv"));
        assert_eq!(placement.max_folders_per_level, 256);
        assert_eq!(placement.depth, 2);
    }

    #[test]
    fn test_overrides_are_validated() {
        let args = place_args(&["--total-shards", "0"]);
        assert!(apply_overrides(PlacementConfig::default(), &args).is_err());
    }

    #[test]
    fn test_parsed_name_json() {
        let name = Name::parse_pattern("users/*/info").unwrap();
        let json = serde_json::to_value(ParsedName::from(&name)).unwrap();
        assert_eq!(json["realm"], "*");
        assert_eq!(json["pattern"], true);
    }
}
