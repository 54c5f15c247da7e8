//! Split naming and manifest-to-split assignment.

use serde::{Deserialize, Serialize};
use sleval_core::{Error, Result};

/// A named data partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Split {
    Train,
    Test,
}

impl Split {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Train => "train",
            Self::Test => "test",
        }
    }
}

impl std::fmt::Display for Split {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl std::str::FromStr for Split {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "train" => Ok(Self::Train),
            "test" => Ok(Self::Test),
            other => Err(Error::Config(format!("unknown split: {}", other))),
        }
    }
}

/// Pair each manifest file with its split, keeping manifest order.
///
/// Two files map to `[test, train]`; a single file is `test`. Any other count
/// is an [`Error::ManifestArity`].
pub fn assign_splits<T>(benchmark: &str, files: Vec<T>) -> Result<Vec<(Split, T)>> {
    const PAIRED: [Split; 2] = [Split::Test, Split::Train];

    match files.len() {
        1 | 2 => Ok(PAIRED.into_iter().zip(files).collect()),
        n => Err(Error::ManifestArity {
            benchmark: benchmark.to_string(),
            files: n,
        }),
    }
}
