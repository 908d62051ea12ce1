use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use pkgscope::app::engine::{LoadEngine, read_config};
use pkgscope::cli;
use pkgscope::domain::config::LoaderConfig;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "pkgscope",
    version,
    about = "Decide which packages of an import graph get a full or a stub build"
)]
struct Cli {
    /// Package manifest (JSON) produced by the package loader
    manifest: PathBuf,

    #[command(subcommand)]
    command: Command,

    /// Loader configuration file (JSON); flags below extend or override it
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Path prefixes excluded from --limit (never from --include)
    #[arg(long, value_delimiter = ',', global = true)]
    ignore: Vec<String>,

    /// Path prefixes always built in full
    #[arg(long, value_delimiter = ',', global = true)]
    include: Vec<String>,

    /// Path prefixes eligible for a full build
    #[arg(long, value_delimiter = ',', global = true)]
    limit: Vec<String>,

    /// Load test variants of the requested packages
    #[arg(long, global = true)]
    tests: bool,

    /// Build only the requested packages, without walking dependencies
    #[arg(long = "nodeps", global = true)]
    no_deps: bool,

    /// Maximum import depth for full builds (-1 = unlimited)
    #[arg(long, allow_negative_numbers = true, global = true)]
    deps_level: Option<i64>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Build the program and report every decision
    Build {
        /// Package patterns (`p`, `p/...`); defaults to the manifest roots
        patterns: Vec<String>,
    },
    /// List the walk order and level of every reachable package
    Levels { patterns: Vec<String> },
    /// Show the decision taken for one package
    Explain {
        /// Package path or id
        package: String,
        patterns: Vec<String>,
    },
}

impl Cli {
    fn loader_config(&self) -> Result<LoaderConfig> {
        let mut cfg = match &self.config {
            Some(path) => read_config(path)?,
            None => LoaderConfig::default(),
        };
        cfg.ignore.extend(self.ignore.iter().cloned());
        cfg.include.extend(self.include.iter().cloned());
        cfg.limit.extend(self.limit.iter().cloned());
        cfg.tests |= self.tests;
        cfg.no_deps |= self.no_deps;
        if let Some(level) = self.deps_level {
            cfg.deps_level = level;
        }
        Ok(cfg)
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.verbose);

    let config = args.loader_config()?;
    let engine = LoadEngine::from_manifest(&args.manifest);

    match &args.command {
        Command::Build { patterns } => cli::build_and_display(&engine, patterns, &config, args.json),
        Command::Levels { patterns } => cli::display_levels(&engine, patterns, &config, args.json),
        Command::Explain { package, patterns } => {
            cli::explain_package(&engine, patterns, &config, package, args.json)
        }
    }
}
