//! Metric extraction from one result document.

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sleval_core::Result;

/// Metric keys whose identifier contains this marker are descriptive, not scores.
pub const ALIAS_MARKER: &str = "alias";

/// Separates a metric identifier from its qualifier, e.g. `acc,none`.
const QUALIFIER_SEPARATOR: char = ',';

/// An aggregated cell value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Number(f64),
    /// Non-numeric values such as an `"N/A"` standard error.
    Text(String),
    /// Reported as `null`: the column exists but the cell is empty.
    Missing,
}

impl MetricValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(_) | Self::Missing => None,
        }
    }
}

impl std::fmt::Display for MetricValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // Debug keeps the trailing `.0` on integral floats.
            Self::Number(n) => write!(f, "{:?}", n),
            Self::Text(s) => f.write_str(s),
            Self::Missing => Ok(()),
        }
    }
}

/// A per-model evaluation output: task name → metric key → value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResultDocument {
    pub results: IndexMap<String, IndexMap<String, Value>>,
}

impl ResultDocument {
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }
}

/// Collect `<task>_<metric>` values for every wanted task in `document`.
///
/// Keys are cut at the first `,`; identifiers containing [`ALIAS_MARKER`] are
/// skipped. `null` values are kept as [`MetricValue::Missing`].
pub fn extract_metrics<S: AsRef<str>>(
    document: &ResultDocument,
    wanted_tasks: &[S],
) -> IndexMap<String, MetricValue> {
    let mut metrics = IndexMap::new();

    for (task_name, task) in &document.results {
        if !wanted_tasks.iter().any(|t| t.as_ref() == task_name) {
            tracing::debug!("Skipping unwanted task {}", task_name);
            continue;
        }
        for (metric_key, value) in task {
            let identifier = metric_key
                .split(QUALIFIER_SEPARATOR)
                .next()
                .unwrap_or(metric_key);
            if identifier.contains(ALIAS_MARKER) {
                continue;
            }
            metrics.insert(format!("{}_{}", task_name, identifier), metric_value(value));
        }
    }

    metrics
}

fn metric_value(value: &Value) -> MetricValue {
    match value {
        Value::Null => MetricValue::Missing,
        Value::Number(n) => n
            .as_f64()
            .map(MetricValue::Number)
            .unwrap_or(MetricValue::Missing),
        Value::Bool(b) => MetricValue::Number(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => MetricValue::Text(s.clone()),
        other => MetricValue::Text(other.to_string()),
    }
}
