//! Function extractor.
//!
//! Runs in two passes over a `PackageSet`:
//!
//! 1. Classify every documented declaration and build the `ReceiverIndex`.
//! 2. Emit a record for every documented declaration whose name never
//!    received a receiver classification.
//!
//! Exclusion is by name: a free function that shares its name with any
//! documented method anywhere in the scan is dropped too.

use tracing::debug;

use super::receiver::{classify_receiver, ReceiverIndex};
use crate::analysis::{FieldGroup, FuncDecl, PackageSet};
use crate::report::FunctionRecord;

/// Result name used when a function declares no named results.
pub const RESULT_FALLBACK: &str = "result ";

/// Output of a function extraction pass.
#[derive(Debug, Clone, Default)]
pub struct FunctionExtraction {
    pub records: Vec<FunctionRecord>,
    /// Names classified as methods; none of them appear in `records`.
    pub receivers: ReceiverIndex,
}

/// Build the receiver index from every documented declaration.
pub fn index_receivers(packages: &PackageSet) -> ReceiverIndex {
    let mut index = ReceiverIndex::new();
    for (_, file) in packages.files() {
        for func in file.functions().filter(|f| f.is_documented()) {
            let signature = func.signature.text(&file.source);
            if let Some(receiver) = classify_receiver(&signature, &func.name) {
                index.record(&func.name, receiver);
            }
        }
    }
    index
}

/// Extract function records in package, file, declaration order.
pub fn extract_functions(packages: &PackageSet) -> FunctionExtraction {
    let receivers = index_receivers(packages);
    let mut records = Vec::new();

    for (package, files) in packages.iter() {
        tracing::info!(package, files = files.len(), "processing package");

        for file in files {
            for func in file.functions() {
                if !func.is_documented() {
                    debug!(name = %func.name, "skipping undocumented function");
                    continue;
                }
                if receivers.contains(&func.name) {
                    debug!(name = %func.name, "skipping receiver-classified name");
                    continue;
                }
                records.push(function_record(func, package, &file.source));
            }
        }
    }

    FunctionExtraction { records, receivers }
}

fn function_record(func: &FuncDecl, package: &str, source: &[u8]) -> FunctionRecord {
    let mut returns = render_groups(&func.results, source);
    if returns.is_empty() {
        debug!(
            name = %func.name,
            "no named result, assuming the result lives under the `result` key"
        );
        returns = RESULT_FALLBACK.to_string();
    }

    FunctionRecord {
        name: func.name.clone(),
        comment: func.doc.join("\n"),
        namespace: package.to_string(),
        params: render_groups(&func.params, source),
        returns,
    }
}

/// Render groups as `<name><raw type text>` entries joined with `,`.
///
/// Each name repeats its group's type text; unnamed groups contribute
/// nothing, not even a separator.
pub fn render_groups(groups: &[FieldGroup], source: &[u8]) -> String {
    groups
        .iter()
        .filter(|g| !g.names.is_empty())
        .flat_map(|g| {
            let ty = raw_type_text(g, source);
            g.names.iter().map(move |name| format!("{}{}", name, ty))
        })
        .collect::<Vec<_>>()
        .join(",")
}

/// The group's type text widened by one byte at the start, which takes in
/// the delimiter between the last name and the type.
fn raw_type_text(group: &FieldGroup, source: &[u8]) -> String {
    let start = group.type_span.start_byte.saturating_sub(1);
    let end = group.type_span.end_byte;
    source
        .get(start..end)
        .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
        .unwrap_or_default()
}
