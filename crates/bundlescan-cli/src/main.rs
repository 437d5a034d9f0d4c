mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "bundlescan", about = "Find independently buildable bundles in a directory tree")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Discover bundles under the given paths
    Discover {
        /// Files or directories to scan (default: current directory)
        paths: Vec<PathBuf>,
        /// Print bundles as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write a default bundlescan.toml
    Init,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Discover { paths, json } => commands::discover(paths, json)?,
        Commands::Init => commands::init()?,
    }

    Ok(())
}
