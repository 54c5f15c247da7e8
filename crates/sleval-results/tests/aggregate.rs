//! Aggregation of several model runs into one CSV table.

use std::path::Path;

use serde_json::json;
use sleval_results::{load_plot_data, Aggregator, MetricValue};

fn write_doc(root: &Path, model: &str, doc: serde_json::Value) {
    let dir = root.join(model);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(
        dir.join("results_2024-06-01T10-00-00.json"),
        serde_json::to_string_pretty(&doc).unwrap(),
    )
    .unwrap();
}

fn two_models(root: &Path) {
    write_doc(
        root,
        "A",
        json!({
            "results": {
                "sl_boolq": {
                    "alias": "sl_boolq",
                    "acc,none": 0.81,
                    "acc_stderr,none": 0.006912345,
                    "sl_boolq_acc_stderr_alias": 0.02
                },
                "sl_mmlu": { "acc,none": 0.3 }
            }
        }),
    );
    write_doc(
        root,
        "B",
        json!({
            "results": {
                "sl_piqa": { "acc,none": 0.7, "acc_stderr,none": 0.01 }
            }
        }),
    );
}

#[test]
fn test_two_model_scenario() {
    let dir = tempfile::tempdir().unwrap();
    two_models(dir.path());

    let tasks = vec!["sl_boolq".to_string(), "sl_piqa".to_string()];
    let table = Aggregator::new(tasks, 5).run(dir.path(), None).unwrap();

    assert_eq!(table.models().collect::<Vec<_>>(), vec!["A", "B"]);
    assert_eq!(table.get("A", "sl_boolq_acc"), Some(&MetricValue::Number(0.81)));
    assert_eq!(
        table.get("A", "sl_boolq_acc_stderr"),
        Some(&MetricValue::Number(0.00691))
    );
    assert!(table.columns().iter().all(|c| !c.contains("alias")));
    assert!(table.columns().iter().all(|c| !c.starts_with("sl_mmlu")));

    // B never reported sl_boolq: absent, not zero.
    assert_eq!(table.get("B", "sl_boolq_acc"), None);
    assert_eq!(table.get("A", "sl_piqa_acc"), None);
}

#[test]
fn test_explicit_order_and_csv() {
    let dir = tempfile::tempdir().unwrap();
    two_models(dir.path());

    let tasks = vec!["sl_boolq".to_string(), "sl_piqa".to_string()];
    let table = Aggregator::new(tasks.clone(), 5)
        .run(dir.path(), Some(&[1, 0]))
        .unwrap();
    assert_eq!(table.models().collect::<Vec<_>>(), vec!["B", "A"]);

    let mut out = Vec::new();
    table.write_csv(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    let mut lines = text.lines();
    assert_eq!(
        lines.next(),
        Some("model,sl_boolq_acc,sl_boolq_acc_stderr,sl_piqa_acc,sl_piqa_acc_stderr")
    );
    assert_eq!(lines.next(), Some("B,,,0.7,0.01"));
    assert_eq!(lines.next(), Some("A,0.81,0.00691,,"));

    let err = Aggregator::new(tasks, 5)
        .run(dir.path(), Some(&[0, 0]))
        .unwrap_err();
    assert!(matches!(err, sleval_core::Error::Reorder(_)));
}

#[test]
fn test_csv_feeds_plot_data() {
    let dir = tempfile::tempdir().unwrap();
    write_doc(
        dir.path(),
        "cjvt__GaMS-1B",
        json!({"results": {"sl_piqa": {"acc,none": 0.6, "acc_stderr,none": 0.011}}}),
    );
    write_doc(
        dir.path(),
        "mistralai__Mistral-7B",
        json!({"results": {"sl_piqa": {"acc,none": 0.7, "acc_stderr,none": 0.01}}}),
    );

    let table = Aggregator::new(vec!["sl_piqa".into()], 5)
        .run(dir.path(), None)
        .unwrap();
    let mut csv = Vec::new();
    table.write_csv(&mut csv).unwrap();

    let data = load_plot_data(csv.as_slice(), &["sl_piqa_acc"]).unwrap();
    assert_eq!(
        data.metrics.keys().collect::<Vec<_>>(),
        vec!["GaMS-1B", "Mistral-7B"]
    );
    assert_eq!(data.metrics["Mistral-7B"], vec![Some(0.7)]);
    assert_eq!(data.errors["GaMS-1B"], vec![Some(0.011)]);
}
