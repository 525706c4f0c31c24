use anyhow::Context;
use clap::{Parser, Subcommand};
use git_timeline::commands::*;
use git_timeline::core::{print_error, TimelineConfig};
use std::env;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "git-timeline")]
#[command(about = "Step through the history of a git repository")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Use this config file instead of the default one
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List commits, oldest first
    Log {
        /// Repository path (defaults to the current directory)
        path: Option<PathBuf>,
        /// Load every page instead of only the first one
        #[arg(long)]
        all: bool,
    },
    /// Show the file tree of one commit
    Show {
        /// Repository path (defaults to the current directory)
        path: Option<PathBuf>,
        /// Commit index, 0 being the oldest commit
        #[arg(short, long, default_value_t = 0)]
        index: usize,
        /// Directory to list, e.g. "src/core"
        #[arg(short, long)]
        dir: Option<String>,
    },
    /// Play history forward, one commit per tick
    Play {
        /// Repository path (defaults to the current directory)
        path: Option<PathBuf>,
        /// Commits per tick interval: 1, 2, 4, 8, 16 or 32
        #[arg(short, long)]
        speed: Option<u32>,
        /// Commit index to start from
        #[arg(short, long)]
        from: Option<usize>,
    },
    /// Show the most modified files grouped by directory
    Suggest {
        /// Repository path (defaults to the current directory)
        path: Option<PathBuf>,
        /// Number of files to list
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },
}

fn load_config(path: Option<PathBuf>) -> anyhow::Result<TimelineConfig> {
    match path {
        Some(path) => TimelineConfig::load_from(&path)
            .with_context(|| format!("Cannot use config file {}", path.display())),
        None => TimelineConfig::load_or_default().context("Cannot load configuration"),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    // Configure logging based on --debug flag
    if cli.debug {
        env::set_var("RUST_LOG", "debug");
    } else if env::var_os("RUST_LOG").is_none() {
        env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    let config = match load_config(cli.config) {
        Ok(config) => config,
        Err(e) => {
            print_error(&format!("{e:#}"));
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Log { path, all } => execute_log(path, all, config).await,
        Commands::Show { path, index, dir } => execute_show(path, index, dir, config).await,
        Commands::Play { path, speed, from } => execute_play(path, speed, from, config).await,
        Commands::Suggest { path, limit } => execute_suggest(path, limit, config).await,
    };

    if let Err(e) = result {
        print_error(&e.to_string());
        std::process::exit(1);
    }
}
