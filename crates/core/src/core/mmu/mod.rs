use log::trace;
use serde::Serialize;

use crate::common::VirtAddr;
use crate::common::constants::PLACEHOLDER_PFN_MASK;

use self::pagemap::MappingSource;
use self::tlb::Tlb;

pub use self::walk::{FailureReason, TranslationResult, translate};

pub mod pagemap;
pub mod tlb;
mod walk;

/// Where the frame number installed on a TLB miss came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Fill {
    /// A successful translation of the selected process.
    Translated,
    /// The placeholder `vpn & 0xFFFFF`.
    Simulated,
}

/// Result of one TLB access through the MMU.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct TlbAccess {
    pub vaddr: VirtAddr,
    pub vpn: u64,
    pub hit: bool,
    pub pfn: u64,
    /// Set on a miss.
    pub fill: Option<Fill>,
}

/// Frame number used when no real mapping is available.
pub fn placeholder_pfn(vpn: u64) -> u64 {
    vpn & PLACEHOLDER_PFN_MASK
}

/// A TLB paired with a mapping source and an optionally selected process.
///
/// The MMU is owned by whoever drives it; nothing here is global.
pub struct Mmu<S> {
    pub tlb: Tlb,
    source: S,
    pid: Option<u32>,
}

impl<S: MappingSource> Mmu<S> {
    pub fn new(tlb: Tlb, source: S) -> Self {
        Self {
            tlb,
            source,
            pid: None,
        }
    }

    /// Selects the process whose mappings fill TLB misses.
    pub fn select(&mut self, pid: Option<u32>) {
        self.pid = pid;
    }

    pub fn selected_pid(&self) -> Option<u32> {
        self.pid
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn translate(&self, pid: u32, vaddr: VirtAddr) -> TranslationResult {
        translate(&self.source, pid, vaddr)
    }

    /// Looks up the page of `vaddr` without filling on a miss.
    pub fn tlb_lookup(&mut self, vaddr: VirtAddr) -> Option<u64> {
        self.tlb.lookup(vaddr.vpn())
    }

    /// Looks up the page of `vaddr` and fills the TLB on a miss.
    ///
    /// The fill uses the selected process's real mapping when it
    /// translates, and the placeholder frame otherwise.
    pub fn tlb_access(&mut self, vaddr: VirtAddr, dirty: bool) -> TlbAccess {
        let vpn = vaddr.vpn();
        if let Some(pfn) = self.tlb.lookup(vpn) {
            return TlbAccess {
                vaddr,
                vpn,
                hit: true,
                pfn,
                fill: None,
            };
        }

        let translated = self
            .pid
            .and_then(|pid| translate(&self.source, pid, vaddr).pfn());
        let (pfn, fill) = match translated {
            Some(pfn) => (pfn, Fill::Translated),
            None => (placeholder_pfn(vpn), Fill::Simulated),
        };
        trace!("TLB fill vpn {:#x} -> pfn {:#x} ({:?})", vpn, pfn, fill);
        self.tlb.insert(vpn, pfn, dirty);

        TlbAccess {
            vaddr,
            vpn,
            hit: false,
            pfn,
            fill: Some(fill),
        }
    }
}
