//! Command-line interface for gomap.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::analysis::parse_directory;
use crate::config::Config;
use crate::extract::{extract_functions, extract_structs};
use crate::report::{self, JsonStyle};
use crate::server;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Extract documented Go functions and structs as JSON.
///
/// gomap parses a Go package directory and emits one JSON record per
/// documented top-level function, or per struct type, for use by a
/// documentation browser. It can also serve both as HTTP endpoints.
#[derive(Parser)]
#[command(name = "gomap")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config YAML file (default: auto-discover)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print documented functions of a package directory
    #[command(visible_alias = "map")]
    Functions(ExtractArgs),
    /// Print struct types of a package directory
    #[command(visible_alias = "map-struct")]
    Structs(ExtractArgs),
    /// Serve /map and /map_struct over HTTP
    Serve(ServeArgs),
}

/// Output format of the extraction commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Pretty,
}

/// Arguments for the extraction commands.
#[derive(Args)]
pub struct ExtractArgs {
    /// Package directory to scan (not recursive)
    pub path: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: OutputFormat,

    /// JSON string handling (default: from config, else escaped)
    #[arg(short, long, value_enum)]
    pub style: Option<JsonStyle>,

    /// Glob pattern of file names to skip; repeatable
    #[arg(short, long)]
    pub exclude: Vec<String>,

    /// Exit non-zero when nothing was extracted
    #[arg(long)]
    pub fail_empty: bool,
}

/// Arguments for the serve command.
#[derive(Args)]
pub struct ServeArgs {
    /// Address to listen on
    #[arg(short, long)]
    pub listen: Option<String>,

    /// Directory of the web UI
    #[arg(short, long)]
    pub web_dir: Option<PathBuf>,

    /// Fixed package root instead of $GOPATH/src
    #[arg(short, long)]
    pub base_dir: Option<PathBuf>,
}

impl ExtractArgs {
    /// Fold the command-line overrides into the loaded config.
    fn apply(&self, mut config: Config) -> Config {
        if let Some(style) = self.style {
            config.json_style = style;
        }
        config.exclude.extend(self.exclude.iter().cloned());
        config
    }
}

impl ServeArgs {
    fn apply(&self, mut config: Config) -> Config {
        if let Some(listen) = &self.listen {
            config.listen = listen.clone();
        }
        if let Some(web_dir) = &self.web_dir {
            config.web_dir = web_dir.clone();
        }
        if let Some(base_dir) = &self.base_dir {
            config.base_dir = Some(base_dir.clone());
        }
        config
    }
}

/// Run the functions command.
pub fn run_functions(args: &ExtractArgs, config: Config) -> anyhow::Result<i32> {
    let config = args.apply(config);
    let options = config.extract_options();

    let packages = parse_directory(&args.path, &options.scan)?;
    let extraction = extract_functions(&packages);

    match args.format {
        OutputFormat::Json => {
            println!("{}", report::render_array(&extraction.records, options.style)?);
        }
        OutputFormat::Pretty => {
            report::write_pretty_functions(
                &args.path.to_string_lossy(),
                &extraction.records,
                &extraction.receivers,
            );
        }
    }

    Ok(exit_code(args, extraction.records.is_empty()))
}

/// Run the structs command.
pub fn run_structs(args: &ExtractArgs, config: Config) -> anyhow::Result<i32> {
    let config = args.apply(config);
    let options = config.extract_options();

    let packages = parse_directory(&args.path, &options.scan)?;
    let records = extract_structs(&packages);

    match args.format {
        OutputFormat::Json => {
            println!("{}", report::render_array(&records, options.style)?);
        }
        OutputFormat::Pretty => {
            report::write_pretty_structs(&args.path.to_string_lossy(), &records);
        }
    }

    Ok(exit_code(args, records.is_empty()))
}

fn exit_code(args: &ExtractArgs, empty: bool) -> i32 {
    if args.fail_empty && empty {
        EXIT_FAILED
    } else {
        EXIT_SUCCESS
    }
}

/// Run the serve command. Blocks until the server stops.
pub fn run_serve(args: &ServeArgs, config: Config) -> anyhow::Result<i32> {
    let config = args.apply(config);
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(server::serve(config))?;
    Ok(EXIT_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_functions_command() {
        let cli = Cli::try_parse_from([
            "gomap",
            "functions",
            "./pkg",
            "--style",
            "verbatim",
            "-e",
            "*_test.go",
        ])
        .unwrap();

        match cli.command {
            Commands::Functions(args) => {
                assert_eq!(args.path, PathBuf::from("./pkg"));
                assert_eq!(args.style, Some(JsonStyle::Verbatim));
                assert_eq!(args.format, OutputFormat::Json);
                assert_eq!(args.exclude, vec!["*_test.go"]);
            }
            _ => panic!("expected functions command"),
        }
    }

    #[test]
    fn test_aliases() {
        let cli = Cli::try_parse_from(["gomap", "map-struct", "."]).unwrap();
        assert!(matches!(cli.command, Commands::Structs(_)));
    }

    #[test]
    fn test_args_override_config() {
        let cli = Cli::try_parse_from(["gomap", "serve", "--listen", "0.0.0.0:9000"]).unwrap();
        let Commands::Serve(args) = cli.command else {
            panic!("expected serve command");
        };
        let config = args.apply(Config::default());
        assert_eq!(config.listen, "0.0.0.0:9000");
        assert_eq!(config.web_dir, PathBuf::from("../web"));
    }

    #[test]
    fn test_exclude_extends_config() {
        let cli = Cli::try_parse_from(["gomap", "structs", ".", "-e", "gen_*.go"]).unwrap();
        let Commands::Structs(args) = cli.command else {
            panic!("expected structs command");
        };
        let config = Config {
            exclude: vec!["*_test.go".to_string()],
            ..Default::default()
        };
        assert_eq!(args.apply(config).exclude, vec!["*_test.go", "gen_*.go"]);
    }
}
