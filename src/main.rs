//! gomap CLI entry point.

use clap::Parser;
use gomap::cli::{self, Cli, Commands, EXIT_ERROR};
use gomap::config::Config;
use gomap::logger;

fn main() {
    let cli = Cli::parse();
    logger::init_logger(cli.verbose, cli.quiet);

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(EXIT_ERROR);
        }
    };

    let result = match &cli.command {
        Commands::Functions(args) => cli::run_functions(args, config),
        Commands::Structs(args) => cli::run_structs(args, config),
        Commands::Serve(args) => cli::run_serve(args, config),
    };

    let exit_code = match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            EXIT_ERROR
        }
    };

    std::process::exit(exit_code);
}
