//! Metadata extraction over a parsed package directory.
//!
//! Two independent pipelines share the parser and the JSON assembler:
//!
//! - `functions`: documented top-level functions, excluding any name that
//!   was ever seen with a receiver
//! - `structs`: struct-shaped type declarations with their fields
//!
//! The `*_json` entry points run a complete pass (parse, extract, render)
//! and return the JSON text served by `/map` and `/map_struct`.

mod functions;
mod receiver;
mod structs;

pub use functions::{
    extract_functions, index_receivers, render_groups, FunctionExtraction, RESULT_FALLBACK,
};
pub use receiver::{classify_receiver, ReceiverIndex};
pub use structs::extract_structs;

use std::path::Path;

use crate::analysis::{parse_directory, ScanOptions};
use crate::error::ExtractError;
use crate::report::{self, JsonStyle};

/// Options for a complete extraction pass.
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    pub scan: ScanOptions,
    pub style: JsonStyle,
}

/// Parse `dir` and render its documented functions as a JSON array.
pub fn function_json(dir: &Path, options: &ExtractOptions) -> Result<String, ExtractError> {
    let packages = parse_directory(dir, &options.scan)?;
    let extraction = extract_functions(&packages);
    report::render_array(&extraction.records, options.style)
}

/// Parse `dir` and render its structs as a JSON array.
pub fn struct_json(dir: &Path, options: &ExtractOptions) -> Result<String, ExtractError> {
    let packages = parse_directory(dir, &options.scan)?;
    let records = extract_structs(&packages);
    report::render_array(&records, options.style)
}
