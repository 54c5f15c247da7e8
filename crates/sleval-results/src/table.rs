//! Model × metric comparison table.

use std::collections::BTreeMap;
use std::io::Write;

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use sleval_core::{Error, Result};

use crate::extract::MetricValue;

/// One model's metrics. Cells not present are absent, never defaulted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRow {
    pub model: String,
    pub cells: IndexMap<String, MetricValue>,
}

/// Rows are models, columns the union of all metric keys.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ResultTable {
    columns: Vec<String>,
    rows: Vec<ResultRow>,
}

/// Assemble a table from per-model metrics.
///
/// Rows come out in model-name order. Columns are the union of metric keys in
/// first-seen order across those rows. Numbers are rounded half-to-even.
/// A [`MetricValue::Missing`] registers its column but leaves the cell absent.
pub fn build_table(
    per_model: BTreeMap<String, IndexMap<String, MetricValue>>,
    round_digits: u32,
) -> ResultTable {
    let mut columns = IndexSet::new();
    let rows = per_model
        .into_iter()
        .map(|(model, metrics)| {
            let cells = metrics
                .into_iter()
                .filter_map(|(key, value)| {
                    columns.insert(key.clone());
                    let value = match value {
                        MetricValue::Number(n) => {
                            MetricValue::Number(round_half_even(n, round_digits))
                        }
                        MetricValue::Missing => return None,
                        text => text,
                    };
                    Some((key, value))
                })
                .collect();
            ResultRow { model, cells }
        })
        .collect();

    ResultTable {
        columns: columns.into_iter().collect(),
        rows,
    }
}

/// Round to `digits` decimals, ties to even (`0.125` → `0.12`).
pub fn round_half_even(value: f64, digits: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let factor = 10f64.powi(digits as i32);
    let scaled = value * factor;
    if !scaled.is_finite() {
        return value;
    }

    let floor = scaled.floor();
    let rounded = match (scaled - floor).partial_cmp(&0.5) {
        Some(std::cmp::Ordering::Less) => floor,
        Some(std::cmp::Ordering::Greater) => floor + 1.0,
        _ if floor % 2.0 == 0.0 => floor,
        _ => floor + 1.0,
    };
    rounded / factor
}

impl ResultTable {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    pub fn models(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|r| r.model.as_str())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell lookup. `None` means the model has no value for that metric.
    pub fn get(&self, model: &str, metric: &str) -> Option<&MetricValue> {
        self.rows
            .iter()
            .find(|r| r.model == model)
            .and_then(|r| r.cells.get(metric))
    }

    /// Permute rows by position. `None` keeps the current order.
    ///
    /// `order` must be a permutation of `0..len`; anything else is an
    /// [`Error::Reorder`].
    pub fn reorder(self, order: Option<&[usize]>) -> Result<Self> {
        let Some(order) = order else {
            return Ok(self);
        };

        if order.len() != self.rows.len() {
            return Err(Error::Reorder(format!(
                "expected {} indices, got {}",
                self.rows.len(),
                order.len()
            )));
        }
        let mut seen = vec![false; self.rows.len()];
        for &idx in order {
            match seen.get_mut(idx) {
                Some(slot) if !*slot => *slot = true,
                Some(_) => return Err(Error::Reorder(format!("index {} repeated", idx))),
                None => return Err(Error::Reorder(format!("index {} out of range", idx))),
            }
        }

        let mut slots: Vec<Option<ResultRow>> = self.rows.into_iter().map(Some).collect();
        let rows = order.iter().filter_map(|&idx| slots[idx].take()).collect();
        Ok(Self {
            columns: self.columns,
            rows,
        })
    }

    /// Write the table as CSV: `model` first, one column per metric, absent cells empty.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv = csv::Writer::from_writer(writer);

        let mut header = Vec::with_capacity(self.columns.len() + 1);
        header.push("model");
        header.extend(self.columns.iter().map(String::as_str));
        csv.write_record(&header)?;

        for row in &self.rows {
            let mut record = Vec::with_capacity(header.len());
            record.push(row.model.clone());
            for column in &self.columns {
                record.push(row.cells.get(column).map(|v| v.to_string()).unwrap_or_default());
            }
            csv.write_record(&record)?;
        }

        csv.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(pairs: &[(&str, f64)]) -> IndexMap<String, MetricValue> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), MetricValue::Number(*v)))
            .collect()
    }

    fn two_model_table() -> ResultTable {
        let mut per_model = BTreeMap::new();
        per_model.insert("B".to_string(), metrics(&[("sl_piqa_acc", 0.7)]));
        per_model.insert(
            "A".to_string(),
            metrics(&[("sl_boolq_acc", 0.81), ("sl_boolq_acc_stderr", 0.02)]),
        );
        build_table(per_model, 5)
    }

    #[test]
    fn test_rows_sorted_and_absent_cells() {
        let table = two_model_table();
        assert_eq!(table.models().collect::<Vec<_>>(), vec!["A", "B"]);
        assert_eq!(
            table.columns(),
            &["sl_boolq_acc", "sl_boolq_acc_stderr", "sl_piqa_acc"]
        );
        assert_eq!(table.get("A", "sl_boolq_acc"), Some(&MetricValue::Number(0.81)));
        assert_eq!(table.get("B", "sl_boolq_acc"), None);
        assert_eq!(table.get("A", "sl_piqa_acc"), None);
    }

    #[test]
    fn test_sort_is_case_sensitive() {
        let mut per_model = BTreeMap::new();
        for name in ["alpha", "Zeta", "beta"] {
            per_model.insert(name.to_string(), IndexMap::new());
        }
        let table = build_table(per_model, 5);
        assert_eq!(table.models().collect::<Vec<_>>(), vec!["Zeta", "alpha", "beta"]);
    }

    #[test]
    fn test_rounding() {
        assert_eq!(round_half_even(0.123456, 5), 0.12346);
        assert_eq!(round_half_even(0.125, 2), 0.12);
        assert_eq!(round_half_even(0.375, 2), 0.38);
        assert_eq!(round_half_even(2.5, 0), 2.0);
        assert_eq!(round_half_even(3.5, 0), 4.0);
        assert_eq!(round_half_even(-2.5, 0), -2.0);
        assert!(round_half_even(f64::NAN, 3).is_nan());

        let mut per_model = BTreeMap::new();
        per_model.insert("m".to_string(), metrics(&[("x", 0.812345678)]));
        let table = build_table(per_model, 3);
        assert_eq!(table.get("m", "x"), Some(&MetricValue::Number(0.812)));
    }

    #[test]
    fn test_reorder_swaps_rows() {
        let table = two_model_table().reorder(Some(&[1, 0])).unwrap();
        assert_eq!(table.models().collect::<Vec<_>>(), vec!["B", "A"]);
    }

    #[test]
    fn test_reorder_none_keeps_order() {
        let table = two_model_table().reorder(None).unwrap();
        assert_eq!(table.models().collect::<Vec<_>>(), vec!["A", "B"]);
    }

    #[test]
    fn test_reorder_rejects_non_permutations() {
        for bad in [&[0, 0][..], &[0][..], &[0, 1, 2][..], &[0, 2][..]] {
            assert!(
                matches!(two_model_table().reorder(Some(bad)), Err(Error::Reorder(_))),
                "{:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_null_metric_keeps_column() {
        let mut per_model = BTreeMap::new();
        let mut cells = metrics(&[("sl_piqa_acc", 0.5)]);
        cells.insert("sl_piqa_acc_stderr".to_string(), MetricValue::Missing);
        per_model.insert("m".to_string(), cells);

        let table = build_table(per_model, 5);
        assert_eq!(table.columns(), &["sl_piqa_acc", "sl_piqa_acc_stderr"]);
        assert_eq!(table.get("m", "sl_piqa_acc_stderr"), None);

        let mut out = Vec::new();
        table.write_csv(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "model,sl_piqa_acc,sl_piqa_acc_stderr\nm,0.5,\n"
        );
    }

    #[test]
    fn test_write_csv() {
        let mut out = Vec::new();
        two_model_table().write_csv(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "model,sl_boolq_acc,sl_boolq_acc_stderr,sl_piqa_acc\n\
             A,0.81,0.02,\n\
             B,,,0.7\n"
        );
    }
}
