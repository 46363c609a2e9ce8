use anyhow::Result;
use clap::{Parser, Subcommand};
use docpkg::commands::publish;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "docpkg")]
#[command(about = "Publishes documentation packages as dedicated git branches", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Publish the package described by <path>/.docpkg
    Publish {
        /// Root of the documentation package
        path: PathBuf,

        /// Remote the documentation branch is pushed to
        #[arg(long, default_value = "origin")]
        remote: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Publish { path, remote }) => publish::execute(path, remote),
        None => {
            println!("{} version {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
