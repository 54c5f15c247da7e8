//! Subcommand implementations, kept separate from argument parsing for testing.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::Context;
use sleval_core::EvalConfig;
use sleval_datasets::{registry, write_jsonl, DatasetLoader, LocalFetcher, Split};
use sleval_results::{load_plot_data, Aggregator};
use tracing::info;

/// Print every registered benchmark with its split → file assignment.
pub fn list_benchmarks<W: Write>(mut out: W) -> anyhow::Result<()> {
    for spec in registry()?.iter() {
        let fields: Vec<&str> = spec.field_names().collect();
        writeln!(out, "{} [{}]", spec.name, fields.join(", "))?;
        for (split, file) in sleval_datasets::assign_splits(spec.name, spec.manifest.to_vec())? {
            writeln!(out, "  {:<5} {}", split, file)?;
        }
    }
    Ok(())
}

/// Export one split as JSONL to `output`, or stdout.
pub fn export(
    config: &EvalConfig,
    benchmark: &str,
    split: Split,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let loader = DatasetLoader::new(LocalFetcher::new(&config.data_dir))?;
    let stream = loader.open_split(benchmark, split)?;

    let count = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            write_jsonl(stream, BufWriter::new(file))?
        }
        None => write_jsonl(stream, std::io::stdout().lock())?,
    };

    info!("Exported {} records from {}/{}", count, benchmark, split);
    Ok(())
}

/// Aggregate results under `config.results_dir` into `config.output_file`.
pub fn process_results(config: &EvalConfig, order: Option<&[usize]>) -> anyhow::Result<()> {
    let table = Aggregator::from_config(config).run(&config.results_dir, order)?;

    let file = File::create(&config.output_file)
        .with_context(|| format!("Failed to create {}", config.output_file.display()))?;
    table.write_csv(BufWriter::new(file))?;

    info!(
        "Parsing finished. {} models x {} metrics saved to: {}",
        table.len(),
        table.columns().len(),
        config.output_file.display()
    );
    Ok(())
}

/// Write plot input for `config.plot_metrics` as pretty JSON.
pub fn plot_data<W: Write>(config: &EvalConfig, input: &Path, mut out: W) -> anyhow::Result<()> {
    let file = File::open(input).with_context(|| format!("Failed to open {}", input.display()))?;
    let data = load_plot_data(file, config.plot_metrics.as_slice())?;
    serde_json::to_writer_pretty(&mut out, &data)?;
    writeln!(out)?;
    Ok(())
}
