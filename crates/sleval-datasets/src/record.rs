//! Record normalization: one raw JSON line into one schema-shaped record.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sleval_core::{Error, Result};

use crate::registry::{BenchmarkSpec, ExtractionRule, FieldDecl, FieldKind};

/// Record identifier: the line position, or the raw `id`/`idx` value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Str(String),
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{}", n),
            Self::Str(s) => f.write_str(s),
        }
    }
}

/// A typed field value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Str(String),
    Int(i64),
    Seq(Vec<String>),
    Answer { value: String, aliases: Vec<String> },
}

/// One normalized example. `fields` holds exactly the schema keys, in schema order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub fields: IndexMap<String, FieldValue>,
}

/// Where a line came from, for error reporting.
struct LineRef<'a> {
    file: &'a str,
    position: usize,
}

impl LineRef<'_> {
    fn error(&self, message: impl Into<String>) -> Error {
        Error::RecordParse {
            file: self.file.to_string(),
            line: self.position + 1,
            message: message.into(),
        }
    }
}

/// Decode one raw JSONL line and normalize it.
///
/// Trailing `\n`/`\r\n` is stripped. Invalid UTF-8 is a parse error for that line.
pub fn normalize_line(
    spec: &BenchmarkSpec,
    file: &str,
    raw_line: &[u8],
    position: usize,
) -> Result<Record> {
    let raw_line = raw_line.strip_suffix(b"\n").unwrap_or(raw_line);
    let raw_line = raw_line.strip_suffix(b"\r").unwrap_or(raw_line);
    let text = std::str::from_utf8(raw_line)
        .map_err(|e| LineRef { file, position }.error(format!("invalid UTF-8: {}", e)))?;
    normalize_record(spec, file, text, position)
}

/// Parse and normalize one JSONL line.
///
/// `position` is the 0-based line number within `file`; it becomes the record
/// id unless the benchmark's rule takes the id from the raw object.
pub fn normalize_record(
    spec: &BenchmarkSpec,
    file: &str,
    raw_line: &str,
    position: usize,
) -> Result<Record> {
    let at = LineRef { file, position };
    let raw: Value = serde_json::from_str(raw_line).map_err(|e| at.error(e.to_string()))?;
    let Value::Object(row) = raw else {
        return Err(at.error("line is not a JSON object"));
    };

    let id = match spec.rule {
        ExtractionRule::MultipleChoice => match row.get("id") {
            Some(raw_id) => record_id(raw_id, "id", &at)?,
            None => position_id(position),
        },
        ExtractionRule::BoolQ => {
            let raw_id = row.get("idx").ok_or_else(|| at.error("missing field `idx`"))?;
            record_id(raw_id, "idx", &at)?
        }
        ExtractionRule::Positional | ExtractionRule::TriviaQa => position_id(position),
    };

    let fields = extract_fields(spec.schema, &row, &at)?;
    Ok(Record { id, fields })
}

fn position_id(position: usize) -> RecordId {
    RecordId::Int(position as i64)
}

fn record_id(value: &Value, key: &str, at: &LineRef<'_>) -> Result<RecordId> {
    match value {
        Value::String(s) => Ok(RecordId::Str(s.clone())),
        Value::Number(n) => n
            .as_i64()
            .map(RecordId::Int)
            .ok_or_else(|| at.error(format!("`{}` is not an integer: {}", key, n))),
        other => Err(at.error(format!("unsupported `{}` value: {}", key, other))),
    }
}

fn extract_fields(
    schema: &[FieldDecl],
    row: &Map<String, Value>,
    at: &LineRef<'_>,
) -> Result<IndexMap<String, FieldValue>> {
    let mut fields = IndexMap::with_capacity(schema.len());
    for decl in schema {
        let raw = row
            .get(decl.name)
            .ok_or_else(|| at.error(format!("missing field `{}`", decl.name)))?;
        let value = convert(decl, raw)
            .ok_or_else(|| at.error(format!("field `{}` is not {:?}", decl.name, decl.kind)))?;
        fields.insert(decl.name.to_string(), value);
    }
    Ok(fields)
}

fn convert(decl: &FieldDecl, raw: &Value) -> Option<FieldValue> {
    match decl.kind {
        FieldKind::String => as_text(raw).map(FieldValue::Str),
        FieldKind::Int => as_int(raw).map(FieldValue::Int),
        FieldKind::StringSeq => as_strings(raw).map(FieldValue::Seq),
        FieldKind::Answer => {
            let answer = raw.as_object()?;
            Some(FieldValue::Answer {
                value: answer.get("value").and_then(as_text)?,
                aliases: answer.get("aliases").and_then(as_strings)?,
            })
        }
    }
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn as_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            let f = n.as_f64()?;
            (f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64).then_some(f as i64)
        }),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}

fn as_strings(value: &Value) -> Option<Vec<String>> {
    value
        .as_array()?
        .iter()
        .map(|v| v.as_str().map(String::from))
        .collect()
}
