//! Error types.
//!
//! Only construction and the mapping reader can fail. Cache misses, page
//! faults and unsuccessful translations are ordinary outcomes and are
//! returned as values, never as errors.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Rejected engine or configuration parameters.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// TLB capacity outside `1..=max`.
    #[error("invalid TLB size {requested}: must be between 1 and {max}")]
    InvalidCapacity { requested: usize, max: usize },

    /// Policy name that is none of LRU, FIFO, RANDOM or CLOCK.
    #[error("unknown replacement policy `{0}` (expected LRU, FIFO, RANDOM or CLOCK)")]
    UnknownPolicy(String),

    /// Malformed TOML configuration.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Failure of the external mapping reader.
#[derive(Error, Debug)]
pub enum MappingError {
    /// Opening, seeking or reading the mapping file failed.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file ended before a whole entry could be read.
    #[error("short read from {}: got {len} of 8 bytes", path.display())]
    ShortRead { path: PathBuf, len: usize },
}
