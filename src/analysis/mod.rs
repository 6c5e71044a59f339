//! Go source analysis backed by tree-sitter.
//!
//! This module is the parsing side of gomap. It turns a directory of Go
//! files into a `PackageSet`: one `ParsedFile` per file, grouped by package,
//! where every declaration and type expression keeps its byte range into
//! the raw file text.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐     ┌──────────────┐     ┌───────────────┐
//! │ Package dir     │────▶│ GoParser     │────▶│ ParsedFile    │
//! └─────────────────┘     │ (tree-sitter)│     │ (Declarations,│
//!                         └──────────────┘     │  raw source)  │
//!                                              └───────────────┘
//!                                                      │
//!                                                      ▼
//!                                              ┌───────────────┐
//!                                              │ PackageSet    │
//!                                              └───────────────┘
//! ```
//!
//! Nothing here resolves imports or types; type expressions are opaque text.

mod facts;
mod go;
mod package;
mod printer;

pub use facts::{
    Declaration, FieldGroup, FuncDecl, ParsedFile, Span, TypeDecl, TypeShape, TypeSpec,
};
pub use go::GoParser;
pub use package::{parse_directory, PackageSet, ScanOptions};
pub use printer::render_type;
