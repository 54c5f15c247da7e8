//! Plot renderer input: per-model metric values with their standard errors.

use std::io::Read;

use indexmap::IndexMap;
use serde::Serialize;
use sleval_core::{Error, Result};

/// Suffix of the column holding a metric's standard error.
pub const STDERR_SUFFIX: &str = "_stderr";

/// Short display name: the part after the last `__` (`org__model` → `model`).
pub fn model_display_name(model: &str) -> &str {
    model.rsplit("__").next().unwrap_or(model)
}

/// Parallel metric/error lists per model, in table row order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlotData {
    pub metric_names: Vec<String>,
    pub metrics: IndexMap<String, Vec<Option<f64>>>,
    pub errors: IndexMap<String, Vec<Option<f64>>>,
}

/// Read an aggregated CSV table and select `metrics` plus their stderr columns.
///
/// Every metric and its `<metric>_stderr` column must exist. Empty or
/// non-numeric cells become `None`.
pub fn load_plot_data<R: Read, S: AsRef<str>>(reader: R, metrics: &[S]) -> Result<PlotData> {
    let mut csv = csv::Reader::from_reader(reader);
    let headers = csv.headers()?.clone();

    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| Error::MissingColumn(name.to_string()))
    };
    let model_col = column("model")?;
    let value_cols = metrics
        .iter()
        .map(|m| column(m.as_ref()))
        .collect::<Result<Vec<_>>>()?;
    let error_cols = metrics
        .iter()
        .map(|m| column(&format!("{}{}", m.as_ref(), STDERR_SUFFIX)))
        .collect::<Result<Vec<_>>>()?;

    let mut data = PlotData {
        metric_names: metrics.iter().map(|m| m.as_ref().to_string()).collect(),
        ..Default::default()
    };

    for record in csv.records() {
        let record = record?;
        let cell = |idx: usize| record.get(idx).and_then(|v| v.trim().parse::<f64>().ok());

        let name = model_display_name(record.get(model_col).unwrap_or("")).to_string();
        data.metrics
            .insert(name.clone(), value_cols.iter().map(|&i| cell(i)).collect());
        data.errors
            .insert(name, error_cols.iter().map(|&i| cell(i)).collect());
    }

    Ok(data)
}
