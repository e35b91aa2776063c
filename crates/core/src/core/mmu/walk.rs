//! Page walk: decomposition plus a single raw mapping fetch.

use std::fmt;

use log::debug;
use serde::Serialize;

use super::pagemap::{MappingSource, RawMapping};
use crate::common::{PageIndices, PhysAddr, VirtAddr};

/// Why a translation produced no physical address.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureReason {
    /// The mapping source could not be read (missing process, no privilege).
    MappingUnavailable { detail: String },
    /// Neither resident nor swapped: never touched, or demand paging pending.
    NotPresent,
    SwappedOut { swap_offset: u64 },
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::MappingUnavailable { detail } => {
                write!(f, "mapping unavailable ({})", detail)
            }
            FailureReason::NotPresent => {
                f.write_str("page not present (not yet accessed or demand paging)")
            }
            FailureReason::SwappedOut { swap_offset } => {
                write!(f, "page is swapped out (swap offset: {:#x})", swap_offset)
            }
        }
    }
}

/// Outcome of one translation request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TranslationResult {
    pub pid: u32,
    pub vaddr: VirtAddr,
    pub indices: PageIndices,
    /// The raw entry, when the source could be read.
    pub mapping: Option<RawMapping>,
    pub paddr: Option<PhysAddr>,
    pub failure: Option<FailureReason>,
}

impl TranslationResult {
    pub fn success(pid: u32, vaddr: VirtAddr, mapping: RawMapping) -> Self {
        let indices = vaddr.indices();
        Self {
            pid,
            vaddr,
            indices,
            mapping: Some(mapping),
            paddr: Some(PhysAddr::from_frame(mapping.pfn, u64::from(indices.offset))),
            failure: None,
        }
    }

    pub fn fault(
        pid: u32,
        vaddr: VirtAddr,
        mapping: Option<RawMapping>,
        reason: FailureReason,
    ) -> Self {
        Self {
            pid,
            vaddr,
            indices: vaddr.indices(),
            mapping,
            paddr: None,
            failure: Some(reason),
        }
    }

    pub fn is_success(&self) -> bool {
        self.paddr.is_some()
    }

    /// Frame number of a successful translation.
    pub fn pfn(&self) -> Option<u64> {
        self.paddr.map(|p| p.pfn())
    }

    /// Human-readable failure reason.
    pub fn reason(&self) -> Option<String> {
        self.failure.as_ref().map(ToString::to_string)
    }
}

/// Translates `vaddr` in process `pid`.
///
/// The source is asked exactly once. A read failure, an absent page and a
/// swapped page all come back as failed results; the caller decides what
/// to do with them. Nothing is retried, since the underlying state can
/// change between calls.
pub fn translate<S: MappingSource + ?Sized>(
    source: &S,
    pid: u32,
    vaddr: VirtAddr,
) -> TranslationResult {
    let mapping = match source.fetch_raw_mapping(pid, vaddr) {
        Ok(m) => m,
        Err(e) => {
            debug!("translate {} in pid {}: {}", vaddr, pid, e);
            return TranslationResult::fault(
                pid,
                vaddr,
                None,
                FailureReason::MappingUnavailable {
                    detail: e.to_string(),
                },
            );
        }
    };

    if mapping.present {
        return TranslationResult::success(pid, vaddr, mapping);
    }

    let reason = if mapping.swapped {
        FailureReason::SwappedOut {
            swap_offset: mapping.swap_offset,
        }
    } else {
        FailureReason::NotPresent
    };
    TranslationResult::fault(pid, vaddr, Some(mapping), reason)
}
