//! Static benchmark registry.
//!
//! Every benchmark is described by a [`BenchmarkSpec`]: its field schema, the
//! ordered list of logical files it is sourced from, and the extraction rule
//! used to turn a raw JSON line into a [`crate::Record`]. The built-in table is
//! validated once, on first access, and never mutated afterwards.

use std::collections::HashSet;

use indexmap::IndexMap;
use once_cell::sync::OnceCell;
use sleval_core::{Error, Result};

/// Benchmark used when a caller does not name one.
pub const DEFAULT_BENCHMARK: &str = "winogrande";

/// Declared type of a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Int,
    StringSeq,
    /// `{value: string, aliases: [string]}`; any other key is dropped.
    Answer,
}

/// One schema entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDecl {
    pub name: &'static str,
    pub kind: FieldKind,
}

const fn field(name: &'static str, kind: FieldKind) -> FieldDecl {
    FieldDecl { name, kind }
}

/// How a raw line becomes a record. Closed set, selected by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionRule {
    /// Schema fields; a raw `id` replaces the line position when present.
    MultipleChoice,
    /// Schema fields; the raw `idx` is always the identifier.
    BoolQ,
    /// Schema fields; identifier is the line position.
    Positional,
    /// Like `Positional`, with the nested answer pruned to `value`/`aliases`.
    TriviaQa,
}

/// Static description of one benchmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BenchmarkSpec {
    pub name: &'static str,
    pub schema: &'static [FieldDecl],
    /// Logical file identifiers. One file is test-only; two are `[test, train]`.
    pub manifest: &'static [&'static str],
    pub rule: ExtractionRule,
}

impl BenchmarkSpec {
    /// Schema field names in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.schema.iter().map(|f| f.name)
    }
}

const MULTIPLE_CHOICE: &[FieldDecl] = &[
    field("query", FieldKind::String),
    field("choices", FieldKind::StringSeq),
    field("gold", FieldKind::Int),
];

const BOOLQ: &[FieldDecl] = &[
    field("question", FieldKind::String),
    field("passage", FieldKind::String),
    field("label", FieldKind::Int),
];

const NQ_OPEN: &[FieldDecl] = &[
    field("question", FieldKind::String),
    field("answer", FieldKind::StringSeq),
];

const PIQA: &[FieldDecl] = &[
    field("goal", FieldKind::String),
    field("choices", FieldKind::StringSeq),
    field("gold", FieldKind::Int),
];

const TRIVIAQA: &[FieldDecl] = &[
    field("question", FieldKind::String),
    field("answer", FieldKind::Answer),
];

const WINOGRANDE: &[FieldDecl] = &[
    field("sentence", FieldKind::String),
    field("option1", FieldKind::String),
    field("option2", FieldKind::String),
    field("answer", FieldKind::String),
];

/// The nine Slovenian benchmarks.
pub const BUILTIN_BENCHMARKS: &[BenchmarkSpec] = &[
    BenchmarkSpec {
        name: "arc_challenge",
        schema: MULTIPLE_CHOICE,
        manifest: &["arc_challenge_test_partial_0_1171_end.jsonl"],
        rule: ExtractionRule::MultipleChoice,
    },
    BenchmarkSpec {
        name: "arc_easy",
        schema: MULTIPLE_CHOICE,
        manifest: &["arc_easy_test_partial_0_2375_end.jsonl"],
        rule: ExtractionRule::MultipleChoice,
    },
    BenchmarkSpec {
        name: "boolq",
        schema: BOOLQ,
        manifest: &["boolq_test_partial_0_3269_end.jsonl"],
        rule: ExtractionRule::BoolQ,
    },
    BenchmarkSpec {
        name: "hellaswag",
        schema: MULTIPLE_CHOICE,
        manifest: &["hellaswag_test_partial_0_10041_end.jsonl"],
        rule: ExtractionRule::MultipleChoice,
    },
    BenchmarkSpec {
        name: "nq_open",
        schema: NQ_OPEN,
        manifest: &[
            "nq_open_test_partial_0_3609_end.jsonl",
            "nq_open_train_partial_0_87924_end.jsonl",
        ],
        rule: ExtractionRule::Positional,
    },
    BenchmarkSpec {
        name: "openbookqa",
        schema: MULTIPLE_CHOICE,
        manifest: &["openbookqa_test_partial_0_499_end.jsonl"],
        rule: ExtractionRule::MultipleChoice,
    },
    BenchmarkSpec {
        name: "piqa",
        schema: PIQA,
        manifest: &["piqa_test_partial_0_1837_end.jsonl"],
        rule: ExtractionRule::Positional,
    },
    BenchmarkSpec {
        name: "triviaqa",
        schema: TRIVIAQA,
        manifest: &[
            "triviaqa_test_partial_0_17943_end.jsonl",
            "triviaqa_train_partial_0_138383_end.jsonl",
        ],
        rule: ExtractionRule::TriviaQa,
    },
    BenchmarkSpec {
        name: "winogrande",
        schema: WINOGRANDE,
        manifest: &["winogrande_test_partial_0_1266_end.jsonl"],
        rule: ExtractionRule::Positional,
    },
];

/// Validated, immutable benchmark lookup table.
#[derive(Debug)]
pub struct Registry {
    specs: IndexMap<&'static str, BenchmarkSpec>,
}

impl Registry {
    /// Build a registry, checking every spec up front.
    ///
    /// Fails with [`Error::ManifestArity`] if a manifest does not hold exactly
    /// one or two files.
    pub fn new(specs: &[BenchmarkSpec]) -> Result<Self> {
        let mut map = IndexMap::with_capacity(specs.len());
        for spec in specs {
            validate(spec)?;
            if map.insert(spec.name, *spec).is_some() {
                return Err(Error::Config(format!(
                    "benchmark registered twice: {}",
                    spec.name
                )));
            }
        }
        Ok(Self { specs: map })
    }

    /// Look up a benchmark by name.
    pub fn get(&self, name: &str) -> Result<&BenchmarkSpec> {
        self.specs
            .get(name)
            .ok_or_else(|| Error::UnknownBenchmark(name.to_string()))
    }

    /// Ordered logical file identifiers for a benchmark.
    pub fn resolve_manifest(&self, name: &str) -> Result<&'static [&'static str]> {
        self.get(name).map(|spec| spec.manifest)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.specs.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BenchmarkSpec> {
        self.specs.values()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

fn validate(spec: &BenchmarkSpec) -> Result<()> {
    let files = spec.manifest.len();
    if !(1..=2).contains(&files) {
        return Err(Error::ManifestArity {
            benchmark: spec.name.to_string(),
            files,
        });
    }
    if spec.schema.is_empty() {
        return Err(Error::Config(format!("benchmark {} has no fields", spec.name)));
    }
    let mut seen = HashSet::new();
    if let Some(dup) = spec.field_names().find(|name| !seen.insert(*name)) {
        return Err(Error::Config(format!(
            "benchmark {} declares field {} twice",
            spec.name, dup
        )));
    }
    Ok(())
}

static REGISTRY: OnceCell<Registry> = OnceCell::new();

/// The process-wide registry of built-in benchmarks.
pub fn registry() -> Result<&'static Registry> {
    REGISTRY.get_or_try_init(|| Registry::new(BUILTIN_BENCHMARKS))
}
