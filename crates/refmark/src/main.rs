//! refmark CLI - Main entry point

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod bibsource;
mod commands;
mod hosts;

#[derive(Parser)]
#[command(name = "refmark")]
#[command(version)]
#[command(about = "Numbered references, labels and citations for Markdown and notebooks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve references in a document and write the processed copy
    Process {
        /// Input file (.mdx, .ipynb or .source)
        input: PathBuf,

        /// Write output to FILE (defaults to a sibling of the input)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Render bare numbers instead of anchors and hyperlinks
        #[arg(long)]
        plain: bool,
    },

    /// Resolve references and report problems without writing output
    Check {
        /// Input file (.mdx, .ipynb or .source)
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "refmark=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Process {
            input,
            output,
            plain,
        } => commands::process::execute(&input, output.as_deref(), plain),
        Commands::Check { input } => commands::check::execute(&input),
    }
}
