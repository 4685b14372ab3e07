mod cli;
mod commands;
mod config;
mod logging;
mod output;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands};
use output::print_error;

fn main() {
    if let Err(e) = run() {
        print_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(&cli.log_level);

    match &cli.command {
        Commands::Sdl(args) => commands::sdl::run(args)?,
        Commands::Check(args) => commands::check::run(args)?,
    }
    Ok(())
}
