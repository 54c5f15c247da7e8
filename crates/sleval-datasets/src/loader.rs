//! Benchmark loading: manifest → splits → lazy record streams.

use std::io::{BufRead, Write};
use std::iter::FusedIterator;

use sleval_core::{Error, Result};
use tracing::{debug, info};

use crate::fetch::{BlobFetcher, FetchedBlob};
use crate::record::{normalize_line, Record};
use crate::registry::{registry, BenchmarkSpec, Registry};
use crate::split::{assign_splits, Split};

/// Resolves benchmarks against a registry and opens their splits through a fetcher.
pub struct DatasetLoader<'r, F> {
    registry: &'r Registry,
    fetcher: F,
}

impl<F: BlobFetcher> DatasetLoader<'static, F> {
    /// Loader over the built-in benchmark registry.
    pub fn new(fetcher: F) -> Result<Self> {
        Ok(Self {
            registry: registry()?,
            fetcher,
        })
    }
}

impl<'r, F: BlobFetcher> DatasetLoader<'r, F> {
    pub fn with_registry(registry: &'r Registry, fetcher: F) -> Self {
        Self { registry, fetcher }
    }

    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    /// Split assignment for a benchmark, in manifest order.
    pub fn splits(&self, benchmark: &str) -> Result<Vec<(Split, &'static str)>> {
        let manifest = self.registry.resolve_manifest(benchmark)?;
        assign_splits(benchmark, manifest.to_vec())
    }

    /// Fetch the file behind `split` and stream its records.
    ///
    /// Every call fetches a fresh reader; a returned stream cannot be rewound.
    pub fn open_split(&self, benchmark: &str, split: Split) -> Result<RecordStream> {
        let spec = *self.registry.get(benchmark)?;
        let logical = self
            .splits(benchmark)?
            .into_iter()
            .find_map(|(s, file)| (s == split).then_some(file))
            .ok_or_else(|| {
                Error::Config(format!("benchmark {} has no {} split", benchmark, split))
            })?;

        let blob = self.fetcher.fetch(logical)?;
        info!("Streaming {}/{} from {}", benchmark, split, blob.location);
        Ok(RecordStream::new(spec, blob))
    }
}

/// Lazy, single-pass sequence of records read from one JSONL blob.
///
/// Yields one record per line. The first error ends the stream.
pub struct RecordStream {
    spec: BenchmarkSpec,
    location: String,
    reader: Box<dyn BufRead + Send>,
    buf: Vec<u8>,
    position: usize,
    done: bool,
}

impl std::fmt::Debug for RecordStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStream")
            .field("benchmark", &self.spec.name)
            .field("location", &self.location)
            .field("position", &self.position)
            .field("done", &self.done)
            .finish_non_exhaustive()
    }
}

impl RecordStream {
    pub fn new(spec: BenchmarkSpec, blob: FetchedBlob) -> Self {
        Self {
            spec,
            location: blob.location,
            reader: blob.reader,
            buf: Vec::new(),
            position: 0,
            done: false,
        }
    }

    pub fn benchmark(&self) -> &'static str {
        self.spec.name
    }

    pub fn location(&self) -> &str {
        &self.location
    }
}

impl Iterator for RecordStream {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        // Raw bytes, so bad UTF-8 is reported against its line.
        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => {
                self.done = true;
                debug!("Read {} records from {}", self.position, self.location);
                return None;
            }
            Ok(_) => {}
            Err(source) => {
                self.done = true;
                return Some(Err(Error::Fetch {
                    file: self.location.clone(),
                    source,
                }));
            }
        }

        let record = normalize_line(&self.spec, &self.location, &self.buf, self.position);
        self.position += 1;
        if record.is_err() {
            self.done = true;
        }
        Some(record)
    }
}

impl FusedIterator for RecordStream {}

/// Write records as JSON lines. Stops at the first error; returns the count written.
pub fn write_jsonl<I, W>(records: I, mut writer: W) -> Result<usize>
where
    I: IntoIterator<Item = Result<Record>>,
    W: Write,
{
    let mut count = 0;
    for record in records {
        serde_json::to_writer(&mut writer, &record?)?;
        writer.write_all(b"\n")?;
        count += 1;
    }
    writer.flush()?;
    Ok(count)
}
