//! Simulator configuration.
//!
//! Every field has a default, so an empty TOML document is a valid
//! configuration:
//!
//! ```toml
//! [tlb]
//! entries = 16
//! policy = "LRU"      # LRU, FIFO, RANDOM or CLOCK
//!
//! [paging]
//! frames = 4
//! policy = "CLOCK"
//! seed = 42           # fixes the RANDOM victim sequence
//! ```

use serde::{Deserialize, Serialize};

use crate::common::ConfigError;
use crate::common::constants::{DEFAULT_FRAMES, DEFAULT_TLB_ENTRIES};
use crate::core::policies::Policy;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub tlb: TlbConfig,
    pub paging: PagingConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TlbConfig {
    /// Number of entries, `1..=1024`. Checked when the TLB is built.
    pub entries: usize,
    pub policy: Policy,
    pub seed: Option<u64>,
}

impl Default for TlbConfig {
    fn default() -> Self {
        Self {
            entries: DEFAULT_TLB_ENTRIES,
            policy: Policy::Lru,
            seed: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PagingConfig {
    /// Number of physical frames; clamped into range when the table is built.
    pub frames: usize,
    pub policy: Policy,
    pub seed: Option<u64>,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            frames: DEFAULT_FRAMES,
            policy: Policy::Lru,
            seed: None,
        }
    }
}

impl Config {
    /// Parses a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML, unknown keys or
    /// an unknown policy name.
    pub fn from_toml_str(src: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(src)?)
    }
}
