// Matrix CLI
// Command-line front end for the build-matrix resolution engine

mod commands;
mod output;

use clap::{Parser, Subcommand};
use color_eyre::Result;
use tracing_subscriber::filter::LevelFilter;

#[derive(Parser, Debug)]
#[command(
    name = "matrix",
    version,
    about = "Resolve build-matrix declarations into concrete job configurations"
)]
struct Cli {
    /// Log the resolution pipeline's debug trail to stderr
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve a strategy file into its job configurations
    Resolve(commands::resolve::ResolveArgs),
    /// Parse and schema-check a strategy file
    Validate(commands::validate::ValidateArgs),
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_max_level(LevelFilter::DEBUG)
            .with_writer(std::io::stderr)
            .init();
    }

    match cli.command {
        Command::Resolve(args) => commands::resolve::execute(args),
        Command::Validate(args) => commands::validate::execute(args),
    }
}
