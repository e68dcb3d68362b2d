//! Partscope CLI entry point.

use clap::Parser;
use partscope::cli::{self, Cli, Commands, EXIT_ERROR};
use partscope::logging::{self, Verbosity};
use partscope::Registry;

fn main() {
    let cli = Cli::parse();
    logging::init(Verbosity::from_flags(cli.verbose, cli.quiet));

    let registry = Registry::with_defaults();
    let result = match &cli.command {
        Commands::Find(args) => cli::run_find(args, &registry),
        Commands::Replace(args) => cli::run_replace(args, &registry),
        Commands::Validate(args) => cli::run_validate(args, &registry),
        Commands::Check(args) => cli::run_check(args, &registry),
        Commands::Languages => cli::run_languages(&registry),
    };

    let exit_code = match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            EXIT_ERROR
        }
    };

    std::process::exit(exit_code);
}
