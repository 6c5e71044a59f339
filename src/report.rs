//! Output formatting for extraction results.
//!
//! Supports three renderings:
//! - Escaped JSON: serde-encoded records, the default
//! - Verbatim JSON: byte-compatible with the legacy string-concatenated
//!   output, no escaping
//! - Pretty: colored terminal listing for humans
//!
//! Both JSON renderings close every array with an empty `{}` sentinel
//! element, which downstream consumers expect.

use colored::*;
use serde::de::Deserializer;
use serde::ser::{SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

use crate::error::ExtractError;
use crate::extract::ReceiverIndex;

// =============================================================================
// Records
// =============================================================================

/// One documented function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionRecord {
    pub name: String,
    pub comment: String,
    pub namespace: String,
    pub params: String,
    pub returns: String,
}

/// One struct field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRecord {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
}

/// One struct type declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructRecord {
    pub name: String,
    pub comment: String,
    #[serde(
        serialize_with = "serialize_with_sentinel",
        deserialize_with = "deserialize_without_sentinel"
    )]
    pub fields: Vec<FieldRecord>,
    pub namespace: String,
}

/// The empty trailing object of every array.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Sentinel {}

/// An element of a sentinel-terminated array.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Entry<T> {
    Record(T),
    Sentinel(Sentinel),
}

/// Parse a sentinel-terminated array back into its records.
pub fn parse_array<T>(json: &str) -> Result<Vec<T>, serde_json::Error>
where
    T: for<'de> Deserialize<'de>,
{
    let entries: Vec<Entry<T>> = serde_json::from_str(json)?;
    Ok(entries
        .into_iter()
        .filter_map(|e| match e {
            Entry::Record(r) => Some(r),
            Entry::Sentinel(_) => None,
        })
        .collect())
}

fn serialize_with_sentinel<S, T>(items: &[T], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: Serialize,
{
    let mut seq = serializer.serialize_seq(Some(items.len() + 1))?;
    for item in items {
        seq.serialize_element(item)?;
    }
    seq.serialize_element(&Sentinel {})?;
    seq.end()
}

fn deserialize_without_sentinel<'de, D>(deserializer: D) -> Result<Vec<FieldRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = Vec::<Entry<FieldRecord>>::deserialize(deserializer)?;
    Ok(entries
        .into_iter()
        .filter_map(|e| match e {
            Entry::Record(r) => Some(r),
            Entry::Sentinel(_) => None,
        })
        .collect())
}

/// Borrowed records serialized as a sentinel-terminated array.
struct SentinelArray<'a, T>(&'a [T]);

impl<T: Serialize> Serialize for SentinelArray<'_, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_with_sentinel(self.0, serializer)
    }
}

// =============================================================================
// JSON rendering
// =============================================================================

/// How string payloads are written into the JSON text.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum JsonStyle {
    /// Structured encoding; every string is escaped.
    #[default]
    Escaped,
    /// Legacy concatenation; strings are copied as-is, so a quote or a raw
    /// newline in a comment yields malformed JSON.
    Verbatim,
}

/// Records that can be written without escaping.
pub trait VerbatimRecord {
    fn write_verbatim(&self, out: &mut String);
}

impl VerbatimRecord for FunctionRecord {
    fn write_verbatim(&self, out: &mut String) {
        let _ = write!(
            out,
            r#"{{"name":"{}","comment":"{}","namespace":"{}","params":"{}","returns":"{}"}}"#,
            self.name, self.comment, self.namespace, self.params, self.returns
        );
    }
}

impl VerbatimRecord for FieldRecord {
    fn write_verbatim(&self, out: &mut String) {
        let _ = write!(
            out,
            r#"{{"name":"{}","type":"{}"}}"#,
            self.name, self.field_type
        );
    }
}

impl VerbatimRecord for StructRecord {
    fn write_verbatim(&self, out: &mut String) {
        let _ = write!(
            out,
            r#"{{"name":"{}","comment":"{}","fields":"#,
            self.name, self.comment
        );
        write_verbatim_array(&self.fields, out);
        let _ = write!(out, r#","namespace":"{}"}}"#, self.namespace);
    }
}

/// Each record is followed by a comma; the sentinel closes the array.
fn write_verbatim_array<T: VerbatimRecord>(records: &[T], out: &mut String) {
    out.push('[');
    for record in records {
        record.write_verbatim(out);
        out.push(',');
    }
    out.push_str("{}]");
}

/// Render records as a sentinel-terminated JSON array.
pub fn render_array<T>(records: &[T], style: JsonStyle) -> Result<String, ExtractError>
where
    T: Serialize + VerbatimRecord,
{
    match style {
        JsonStyle::Escaped => Ok(serde_json::to_string(&SentinelArray(records))?),
        JsonStyle::Verbatim => {
            let mut out = String::new();
            write_verbatim_array(records, &mut out);
            Ok(out)
        }
    }
}

// =============================================================================
// Pretty format
// =============================================================================

/// Print function records and the excluded method names.
pub fn write_pretty_functions(path: &str, records: &[FunctionRecord], receivers: &ReceiverIndex) {
    println!("{} {}", "gomap".bold(), path.dimmed());
    println!();

    let mut current_ns: Option<&str> = None;
    for record in records {
        if current_ns != Some(record.namespace.as_str()) {
            println!("{} {}", "package".dimmed(), record.namespace.cyan().bold());
            current_ns = Some(record.namespace.as_str());
        }
        println!(
            "  {} {}({}) {}",
            "func".blue(),
            record.name.bold(),
            record.params,
            format!("-> {}", record.returns.trim_end()).dimmed()
        );
        for line in record.comment.lines() {
            println!("      {}", line.dimmed());
        }
    }

    if !receivers.is_empty() {
        println!();
        println!("{}", "Excluded (seen with a receiver):".yellow());
        for (name, types) in receivers.iter() {
            println!("  {} {}", name, format!("[{}]", types.join(", ")).dimmed());
        }
    }

    println!();
    println!("{} {}", records.len().to_string().green().bold(), "functions");
}

/// Print struct records with their fields.
pub fn write_pretty_structs(path: &str, records: &[StructRecord]) {
    println!("{} {}", "gomap".bold(), path.dimmed());
    println!();

    for record in records {
        println!(
            "{} {}.{}",
            "type".blue(),
            record.namespace.cyan(),
            record.name.bold()
        );
        for line in record.comment.lines() {
            println!("    {}", line.dimmed());
        }
        for field in &record.fields {
            println!("    {:<20} {}", field.name, field.field_type.dimmed());
        }
    }

    println!();
    println!("{} {}", records.len().to_string().green().bold(), "structs");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add_record(comment: &str) -> FunctionRecord {
        FunctionRecord {
            name: "Add".to_string(),
            comment: comment.to_string(),
            namespace: "vec".to_string(),
            params: "a int,b int".to_string(),
            returns: "sum int".to_string(),
        }
    }

    fn point_record() -> StructRecord {
        StructRecord {
            name: "Point".to_string(),
            comment: "// Point is a location.".to_string(),
            fields: vec![FieldRecord {
                name: "X".to_string(),
                field_type: "float64".to_string(),
            }],
            namespace: "geo".to_string(),
        }
    }

    #[test]
    fn test_escaped_function_array() {
        let json = render_array(&[add_record("// Add sums two ints.")], JsonStyle::Escaped).unwrap();
        assert_eq!(
            json,
            r#"[{"name":"Add","comment":"// Add sums two ints.","namespace":"vec","params":"a int,b int","returns":"sum int"},{}]"#
        );
    }

    #[test]
    fn test_empty_array_is_only_sentinel() {
        let records: Vec<FunctionRecord> = Vec::new();
        assert_eq!(render_array(&records, JsonStyle::Escaped).unwrap(), "[{}]");
        assert_eq!(render_array(&records, JsonStyle::Verbatim).unwrap(), "[{}]");
    }

    #[test]
    fn test_verbatim_matches_escaped_for_plain_text() {
        let records = vec![add_record("// Add sums."), add_record("// Again.")];
        let escaped = render_array(&records, JsonStyle::Escaped).unwrap();
        let verbatim = render_array(&records, JsonStyle::Verbatim).unwrap();
        assert_eq!(escaped, verbatim);

        let structs = vec![point_record()];
        assert_eq!(
            render_array(&structs, JsonStyle::Escaped).unwrap(),
            render_array(&structs, JsonStyle::Verbatim).unwrap()
        );
    }

    #[test]
    fn test_struct_fields_carry_sentinel() {
        let json = render_array(&[point_record()], JsonStyle::Escaped).unwrap();
        assert!(json.contains(r#""fields":[{"name":"X","type":"float64"},{}]"#));
    }

    #[test]
    fn test_escaped_handles_quotes_and_newlines() {
        let records = vec![add_record("// Add \"sums\"\n// two ints.")];
        let json = render_array(&records, JsonStyle::Escaped).unwrap();

        let parsed: Vec<FunctionRecord> = parse_array(&json).unwrap();
        assert_eq!(parsed, records);
    }

    #[test]
    fn test_verbatim_breaks_on_quotes() {
        let records = vec![add_record("// Add \"sums\" two ints.")];
        let json = render_array(&records, JsonStyle::Verbatim).unwrap();
        assert!(serde_json::from_str::<serde_json::Value>(&json).is_err());
    }

    #[test]
    fn test_verbatim_breaks_on_newlines() {
        let records = vec![add_record("// line one\n// line two")];
        let json = render_array(&records, JsonStyle::Verbatim).unwrap();
        assert!(serde_json::from_str::<serde_json::Value>(&json).is_err());
    }

    #[test]
    fn test_array_length_includes_sentinel() {
        let records = vec![add_record("// a"), add_record("// b")];
        let json = render_array(&records, JsonStyle::Escaped).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let items = value.as_array().unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[2], serde_json::json!({}));
    }

    #[test]
    fn test_struct_round_trip_drops_sentinels() {
        let json = render_array(&[point_record()], JsonStyle::Escaped).unwrap();
        let parsed: Vec<StructRecord> = parse_array(&json).unwrap();
        assert_eq!(parsed, vec![point_record()]);
    }

    #[test]
    fn test_json_style_serde() {
        let style: JsonStyle = serde_yaml::from_str("verbatim").unwrap();
        assert_eq!(style, JsonStyle::Verbatim);
        assert_eq!(JsonStyle::default(), JsonStyle::Escaped);
    }
}
