//! Configuration defaults and environment overrides.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{Error, Result};

/// Tasks aggregated by default (the nine Slovenian benchmark tasks).
pub const DEFAULT_TASKS: &str = "sl_arc_challenge,sl_arc_easy,sl_boolq,sl_hellaswag,sl_nq_open,sl_openbookqa,sl_piqa,sl_triviaqa,sl_winogrande";

/// Metrics handed to the plot renderer by default.
pub const DEFAULT_PLOT_METRICS: &str = "sl_arc_challenge_acc,sl_arc_easy_acc,sl_boolq_acc,sl_hellaswag_acc,sl_nq_open_exact_match,sl_triviaqa_exact_match,sl_openbookqa_acc,sl_piqa_acc,sl_winogrande_acc";

/// Decimal digits kept when rounding aggregated metrics.
pub const DEFAULT_ROUND_DIGITS: u32 = 5;

/// Top-level sleval configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalConfig {
    /// Directory holding the benchmark JSONL shards.
    pub data_dir: PathBuf,
    /// Root scanned for per-model result documents.
    pub results_dir: PathBuf,
    /// Destination of the aggregated CSV table.
    pub output_file: PathBuf,
    /// Tasks kept during metric extraction.
    pub tasks: Vec<String>,
    /// Metrics selected for plotting.
    pub plot_metrics: Vec<String>,
    /// Decimal digits for rounding (half-to-even).
    pub round_digits: u32,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            results_dir: PathBuf::from("results"),
            output_file: PathBuf::from("results_parsed.csv"),
            tasks: parse_list(DEFAULT_TASKS),
            plot_metrics: parse_list(DEFAULT_PLOT_METRICS),
            round_digits: DEFAULT_ROUND_DIGITS,
        }
    }
}

impl EvalConfig {
    /// Create configuration from environment and defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`EvalConfig::from_env`] but with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(dir) = lookup("SLEVAL_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup("SLEVAL_RESULTS_DIR") {
            config.results_dir = PathBuf::from(dir);
        }
        if let Some(file) = lookup("SLEVAL_OUTPUT_FILE") {
            config.output_file = PathBuf::from(file);
        }
        if let Some(tasks) = lookup("SLEVAL_TASKS") {
            config.tasks = parse_list(&tasks);
        }
        if let Some(digits) = lookup("SLEVAL_ROUND_DIGITS") {
            config.round_digits = digits.trim().parse().map_err(|_| {
                Error::Config(format!("SLEVAL_ROUND_DIGITS is not a number: {}", digits))
            })?;
        }

        Ok(config)
    }
}

/// Split a comma-separated list, dropping empty entries.
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Parse an explicit row order such as `"2,0,1"`.
///
/// An empty string means "keep the default order" and yields `None`.
pub fn parse_model_order(raw: &str) -> Result<Option<Vec<usize>>> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    raw.split(',')
        .map(|idx| {
            idx.trim()
                .parse::<usize>()
                .map_err(|_| Error::Reorder(format!("not a row index: {:?}", idx)))
        })
        .collect::<Result<Vec<_>>>()
        .map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = EvalConfig::default();
        assert_eq!(config.tasks.len(), 9);
        assert_eq!(config.plot_metrics.len(), 9);
        assert_eq!(config.round_digits, 5);
        assert_eq!(config.output_file, PathBuf::from("results_parsed.csv"));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("SLEVAL_RESULTS_DIR", "/tmp/runs"),
            ("SLEVAL_TASKS", "sl_boolq,sl_piqa"),
            ("SLEVAL_ROUND_DIGITS", "3"),
        ]
        .into_iter()
        .collect();

        let config = EvalConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.results_dir, PathBuf::from("/tmp/runs"));
        assert_eq!(config.tasks, vec!["sl_boolq", "sl_piqa"]);
        assert_eq!(config.round_digits, 3);
        assert_eq!(config.data_dir, PathBuf::from("data"));
    }

    #[test]
    fn test_bad_round_digits() {
        let err = EvalConfig::from_lookup(|k| {
            (k == "SLEVAL_ROUND_DIGITS").then(|| "five".to_string())
        })
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_parse_model_order() {
        assert_eq!(parse_model_order("").unwrap(), None);
        assert_eq!(parse_model_order("2,0,1").unwrap(), Some(vec![2, 0, 1]));
        assert!(matches!(
            parse_model_order("1,x"),
            Err(Error::Reorder(_))
        ));
    }

    #[test]
    fn test_parse_list_skips_empty() {
        assert_eq!(parse_list("a,,b,"), vec!["a", "b"]);
        assert!(parse_list("").is_empty());
    }
}
