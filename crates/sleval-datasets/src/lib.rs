//! sleval datasets — benchmark registry, split assignment, record normalization.
//!
//! Each Slovenian benchmark is declared once in a static registry with its
//! field schema, file manifest and extraction rule. A [`DatasetLoader`] turns a
//! benchmark name into per-split [`RecordStream`]s that read one JSONL line
//! per record through a [`BlobFetcher`].

pub mod fetch;
pub mod loader;
pub mod record;
pub mod registry;
pub mod split;

pub use fetch::{BlobFetcher, FetchedBlob, LocalFetcher};
pub use loader::{write_jsonl, DatasetLoader, RecordStream};
pub use record::{normalize_line, normalize_record, FieldValue, Record, RecordId};
pub use registry::{
    registry, BenchmarkSpec, ExtractionRule, FieldDecl, FieldKind, Registry, DEFAULT_BENCHMARK,
};
pub use split::{assign_splits, Split};
