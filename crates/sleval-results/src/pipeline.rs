//! Aggregation pipeline: discover → extract → build → reorder.

use std::collections::BTreeMap;
use std::path::Path;

use sleval_core::{EvalConfig, Result};
use tracing::{info, warn};

use crate::discover::discover_result_documents;
use crate::extract::{extract_metrics, ResultDocument};
use crate::table::{build_table, ResultTable};

/// Aggregates result documents for a fixed set of tasks.
#[derive(Debug, Clone)]
pub struct Aggregator {
    tasks: Vec<String>,
    round_digits: u32,
}

impl Aggregator {
    pub fn new(tasks: Vec<String>, round_digits: u32) -> Self {
        Self {
            tasks,
            round_digits,
        }
    }

    pub fn from_config(config: &EvalConfig) -> Self {
        Self::new(config.tasks.clone(), config.round_digits)
    }

    pub fn tasks(&self) -> &[String] {
        &self.tasks
    }

    /// Build the comparison table for every result document under `root`.
    ///
    /// When two documents share a model directory name, the one discovered
    /// last replaces the earlier one entirely.
    pub fn run(&self, root: &Path, order: Option<&[usize]>) -> Result<ResultTable> {
        info!("Tasks to parse: {}", self.tasks.join(","));

        let documents = discover_result_documents(root)?;
        info!(
            "Found {} result documents under {}",
            documents.len(),
            root.display()
        );

        let mut per_model = BTreeMap::new();
        for doc in documents {
            let document = ResultDocument::from_path(&doc.path)?;
            let metrics = extract_metrics(&document, self.tasks.as_slice());
            if per_model.insert(doc.model.clone(), metrics).is_some() {
                warn!(
                    "Model {} seen again at {}; keeping the later document",
                    doc.model,
                    doc.path.display()
                );
            }
        }

        let table = build_table(per_model, self.round_digits);
        for (i, model) in table.models().enumerate() {
            info!("  {} : {}", i, model);
        }
        table.reorder(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::MetricValue;
    use serde_json::json;

    fn write_doc(root: &Path, rel: &str, doc: serde_json::Value) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, serde_json::to_string_pretty(&doc).unwrap()).unwrap();
    }

    #[test]
    fn test_last_discovered_wins() {
        let dir = tempfile::tempdir().unwrap();
        write_doc(
            dir.path(),
            "a/model/results_1.json",
            json!({"results": {"sl_boolq": {"acc,none": 0.1, "f1,none": 0.2}}}),
        );
        write_doc(
            dir.path(),
            "b/model/results_2.json",
            json!({"results": {"sl_boolq": {"acc,none": 0.9}}}),
        );

        let table = Aggregator::new(vec!["sl_boolq".into()], 5)
            .run(dir.path(), None)
            .unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("model", "sl_boolq_acc"), Some(&MetricValue::Number(0.9)));
        assert_eq!(table.get("model", "sl_boolq_f1"), None);
    }

    #[test]
    fn test_null_stderr_plots_as_gap() {
        let dir = tempfile::tempdir().unwrap();
        write_doc(
            dir.path(),
            "model/results.json",
            json!({"results": {"sl_piqa": {"acc,none": 0.5, "acc_stderr,none": null}}}),
        );

        let table = Aggregator::new(vec!["sl_piqa".into()], 5)
            .run(dir.path(), None)
            .unwrap();
        assert_eq!(table.columns(), &["sl_piqa_acc", "sl_piqa_acc_stderr"]);
        assert_eq!(table.get("model", "sl_piqa_acc_stderr"), None);

        let mut csv = Vec::new();
        table.write_csv(&mut csv).unwrap();
        let data = crate::plot::load_plot_data(csv.as_slice(), &["sl_piqa_acc"]).unwrap();
        assert_eq!(data.metrics["model"], vec![Some(0.5)]);
        assert_eq!(data.errors["model"], vec![None]);
    }

    #[test]
    fn test_malformed_document_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("m/results.json");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{ not json").unwrap();

        let result = Aggregator::new(vec!["sl_boolq".into()], 5).run(dir.path(), None);
        assert!(matches!(result, Err(sleval_core::Error::Json(_))));
    }

    #[test]
    fn test_from_config() {
        let agg = Aggregator::from_config(&EvalConfig::default());
        assert_eq!(agg.tasks().len(), 9);
    }
}
