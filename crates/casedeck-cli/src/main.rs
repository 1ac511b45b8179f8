mod cmd_export;
mod cmd_import;
mod table;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "casedeck")]
#[command(about = "Convert between a directory of test files and a tabular test-management export")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Suppress informational logging
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Export a directory of test files to a tabular file
    Export {
        /// Test root directory
        dir: PathBuf,

        /// Output tabular file
        output: PathBuf,

        /// Append a git modification footer to each test's steps
        #[arg(long)]
        git_footer: bool,
    },
    /// Import a tabular file into a directory of test files
    Import {
        /// Input tabular file
        input: PathBuf,

        /// Test root directory to write into
        dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.quiet);

    match cli.command {
        Commands::Export {
            dir,
            output,
            git_footer,
        } => cmd_export::run(dir, output, git_footer).await,
        Commands::Import { input, dir } => cmd_import::run(input, dir).await,
    }
}

fn init_logging(quiet: bool) {
    let default = if quiet { "warn" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
