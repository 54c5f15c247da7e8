//! sleval — Slovenian LLM benchmark data export and results aggregation.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "sleval", version, about = "Slovenian LLM eval toolkit")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List registered benchmarks with their splits and files.
    Benchmarks,

    /// Stream the normalized records of one split as JSON lines.
    Export {
        /// Benchmark name (e.g. boolq, triviaqa).
        #[arg(long, default_value = sleval_datasets::DEFAULT_BENCHMARK)]
        benchmark: String,
        /// Split to export: test or train.
        #[arg(long, default_value = "test")]
        split: sleval_datasets::Split,
        /// Directory holding the JSONL shards [env: SLEVAL_DATA_DIR].
        #[arg(long)]
        data_dir: Option<PathBuf>,
        /// Output file; stdout when omitted.
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Aggregate per-model result documents into a CSV table.
    ProcessResults {
        /// Path to the folder with results [env: SLEVAL_RESULTS_DIR].
        #[arg(long)]
        results_dir: Option<PathBuf>,
        /// Path to the output CSV file [env: SLEVAL_OUTPUT_FILE].
        #[arg(long)]
        output_file: Option<PathBuf>,
        /// Comma-separated task names, e.g. 'sl_arc_challenge,sl_arc_easy' [env: SLEVAL_TASKS].
        #[arg(long)]
        tasks: Option<String>,
        /// Order of models in the output, as positions in sorted order, e.g. '2,0,1'.
        #[arg(long, default_value = "")]
        model_order: String,
        /// Decimal digits kept when rounding [env: SLEVAL_ROUND_DIGITS].
        #[arg(long)]
        round_digits: Option<u32>,
    },

    /// Print plot renderer input (metrics and standard errors per model) as JSON.
    PlotData {
        /// CSV file written by `process-results`.
        #[arg(long)]
        input_file: PathBuf,
        /// Comma-separated metric names to include.
        #[arg(long)]
        metrics: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = sleval_core::EvalConfig::from_env()?;

    match cli.command {
        Command::Benchmarks => commands::list_benchmarks(std::io::stdout().lock()),
        Command::Export {
            benchmark,
            split,
            data_dir,
            output,
        } => {
            if let Some(dir) = data_dir {
                config.data_dir = dir;
            }
            commands::export(&config, &benchmark, split, output.as_deref())
        }
        Command::ProcessResults {
            results_dir,
            output_file,
            tasks,
            model_order,
            round_digits,
        } => {
            if let Some(dir) = results_dir {
                config.results_dir = dir;
            }
            if let Some(file) = output_file {
                config.output_file = file;
            }
            if let Some(tasks) = tasks {
                config.tasks = sleval_core::parse_list(&tasks);
            }
            if let Some(digits) = round_digits {
                config.round_digits = digits;
            }
            let order = sleval_core::parse_model_order(&model_order)?;
            commands::process_results(&config, order.as_deref())
        }
        Command::PlotData {
            input_file,
            metrics,
        } => {
            if let Some(metrics) = metrics {
                config.plot_metrics = sleval_core::parse_list(&metrics);
            }
            commands::plot_data(&config, &input_file, std::io::stdout().lock())
        }
    }
}
