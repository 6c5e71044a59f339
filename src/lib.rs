//! gomap - API metadata extraction for Go packages.
//!
//! gomap parses a directory of Go source files and renders lightweight API
//! metadata as JSON for a documentation browser: documented top-level
//! functions with their parameter and result text, and struct types with
//! their fields.
//!
//! # Architecture
//!
//! - `analysis`: tree-sitter Go parser producing per-file declarations
//! - `extract`: function and struct extractors
//! - `report`: JSON assembly (sentinel-terminated arrays) and pretty output
//! - `server`: `/map` and `/map_struct` HTTP routes plus static UI files
//! - `config`: YAML configuration
//! - `cli`: command-line entry points
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use gomap::extract::{function_json, ExtractOptions};
//!
//! let json = function_json(Path::new("./geometry"), &ExtractOptions::default())?;
//! println!("{}", json);
//! # Ok::<(), gomap::ExtractError>(())
//! ```

pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod logger;
pub mod report;
pub mod server;

pub use analysis::{parse_directory, GoParser, PackageSet, ParsedFile, ScanOptions};
pub use config::Config;
pub use error::ExtractError;
pub use extract::{
    extract_functions, extract_structs, function_json, struct_json, ExtractOptions,
    FunctionExtraction, ReceiverIndex,
};
pub use report::{FieldRecord, FunctionRecord, JsonStyle, StructRecord};
