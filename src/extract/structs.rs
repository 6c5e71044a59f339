//! Struct extractor.

use tracing::debug;

use crate::analysis::{Declaration, FieldGroup, PackageSet, TypeDecl, TypeShape};
use crate::report::{FieldRecord, StructRecord};

/// Extract struct records in package, file, declaration order.
///
/// Only the first type spec of each `type` declaration is considered, so in a
/// grouped `type ( ... )` block the later specs are not reported.
pub fn extract_structs(packages: &PackageSet) -> Vec<StructRecord> {
    let mut records = Vec::new();

    for (package, files) in packages.iter() {
        tracing::info!(package, files = files.len(), "processing package");

        for file in files {
            for decl in &file.declarations {
                let Declaration::Type(decl) = decl else {
                    debug!(span = %decl.span(), "skipping non-type declaration");
                    continue;
                };
                if let Some(record) = struct_record(decl, package) {
                    records.push(record);
                }
            }
        }
    }

    records
}

fn struct_record(decl: &TypeDecl, package: &str) -> Option<StructRecord> {
    let Some(spec) = decl.specs.first() else {
        debug!(span = %decl.span, "skipping empty type declaration");
        return None;
    };

    let fields = match &spec.shape {
        TypeShape::Struct(fields) => fields,
        _ => {
            debug!(
                name = %spec.name,
                alias = spec.alias,
                span = %spec.span,
                "skipping non-struct type"
            );
            return None;
        }
    };

    Some(StructRecord {
        name: spec.name.clone(),
        comment: decl.doc.join("\n"),
        fields: fields.iter().flat_map(field_records).collect(),
        namespace: package.to_string(),
    })
}

/// One record per field name; embedded fields are named after their type.
fn field_records(group: &FieldGroup) -> Vec<FieldRecord> {
    if group.embedded {
        return vec![FieldRecord {
            name: embedded_name(&group.type_text),
            field_type: group.type_text.clone(),
        }];
    }

    group
        .names
        .iter()
        .map(|name| FieldRecord {
            name: name.clone(),
            field_type: group.type_text.clone(),
        })
        .collect()
}

/// `*pkg.Base[T]` embeds a field named `Base`.
fn embedded_name(type_text: &str) -> String {
    let bare = type_text.trim_start_matches('*');
    let bare = bare.split('[').next().unwrap_or(bare);
    bare.rsplit('.').next().unwrap_or(bare).to_string()
}
