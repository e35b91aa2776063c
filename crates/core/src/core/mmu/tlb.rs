//! Fully associative TLB model.
//!
//! A fixed array of entries keyed by virtual page number. Lookups scan
//! every slot; inserts fill the lowest invalid slot first and only fall
//! back to the replacement policy once the TLB is full.

use log::{debug, trace};
use serde::Serialize;

use crate::common::ConfigError;
use crate::common::constants::MAX_TLB_ENTRIES;
use crate::config::TlbConfig;
use crate::core::policies::{Policy, Replacer, Slot};
use crate::stats::Stats;

/// One TLB line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TlbEntry {
    pub vpn: u64,
    pub pfn: u64,
    pub valid: bool,
    pub dirty: bool,
    /// Set on insert and on every hit; doubles as the clock reference bit.
    pub accessed: bool,
    /// Logical time of the last stamp refresh.
    pub last_access: u64,
}

impl Slot for TlbEntry {
    fn recency(&self) -> u64 {
        self.last_access
    }

    // FIFO order lives in the same stamp: hits do not refresh it under FIFO.
    fn loaded_at(&self) -> u64 {
        self.last_access
    }

    fn referenced(&self) -> bool {
        self.accessed
    }

    fn clear_reference(&mut self) {
        self.accessed = false;
    }
}

/// Serializable snapshot of a TLB.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TlbStatus {
    pub capacity: usize,
    pub policy: Policy,
    pub entries: Vec<TlbEntry>,
    pub stats: Stats,
    pub hit_rate: f64,
}

pub struct Tlb {
    entries: Vec<TlbEntry>,
    replacer: Replacer,
    stats: Stats,
    access_counter: u64,
}

impl Tlb {
    /// Creates a TLB with `capacity` invalid entries.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidCapacity`] when `capacity` is zero or
    /// larger than [`MAX_TLB_ENTRIES`].
    pub fn new(capacity: usize, policy: Policy) -> Result<Self, ConfigError> {
        Self::with_seed(capacity, policy, None)
    }

    /// Like [`Tlb::new`], with a fixed seed for random replacement.
    pub fn with_seed(
        capacity: usize,
        policy: Policy,
        seed: Option<u64>,
    ) -> Result<Self, ConfigError> {
        if capacity == 0 || capacity > MAX_TLB_ENTRIES {
            return Err(ConfigError::InvalidCapacity {
                requested: capacity,
                max: MAX_TLB_ENTRIES,
            });
        }

        debug!("TLB created: {} entries, {} replacement", capacity, policy);
        Ok(Self {
            entries: vec![TlbEntry::default(); capacity],
            replacer: Replacer::new(policy, seed),
            stats: Stats::default(),
            access_counter: 0,
        })
    }

    pub fn from_config(config: &TlbConfig) -> Result<Self, ConfigError> {
        Self::with_seed(config.entries, config.policy, config.seed)
    }

    fn tick(&mut self) -> u64 {
        let now = self.access_counter;
        self.access_counter += 1;
        now
    }

    fn find(&self, vpn: u64) -> Option<usize> {
        self.entries.iter().position(|e| e.valid && e.vpn == vpn)
    }

    /// Returns the cached frame number for `vpn`, counting a hit or a miss.
    pub fn lookup(&mut self, vpn: u64) -> Option<u64> {
        let Some(idx) = self.find(vpn) else {
            self.stats.record_miss();
            trace!("TLB miss: vpn {:#x}", vpn);
            return None;
        };

        let now = self.tick();
        let refresh = self.replacer.policy().refreshes_on_hit();
        let entry = &mut self.entries[idx];
        entry.accessed = true;
        if refresh {
            entry.last_access = now;
        }
        self.stats.record_hit();
        trace!("TLB hit: vpn {:#x} -> pfn {:#x} (slot {})", vpn, entry.pfn, idx);
        Some(entry.pfn)
    }

    /// Installs `vpn -> pfn`.
    ///
    /// An existing mapping for `vpn` is overwritten in place. Otherwise the
    /// lowest invalid slot is used, and only a full TLB consults the
    /// replacement policy. Returns the valid entry that was displaced.
    pub fn insert(&mut self, vpn: u64, pfn: u64, dirty: bool) -> Option<TlbEntry> {
        if let Some(idx) = self.find(vpn) {
            let now = self.tick();
            let entry = &mut self.entries[idx];
            entry.pfn = pfn;
            entry.dirty = dirty;
            entry.accessed = true;
            entry.last_access = now;
            return None;
        }

        let slot = match self.entries.iter().position(|e| !e.valid) {
            Some(free) => free,
            None => self.replacer.victim(&mut self.entries),
        };

        let evicted = Some(self.entries[slot]).filter(|e| e.valid);
        if let Some(old) = evicted {
            debug!(
                "TLB evict ({}): slot {} vpn {:#x} -> pfn {:#x}",
                self.replacer.policy(),
                slot,
                old.vpn,
                old.pfn
            );
        }

        let now = self.tick();
        self.entries[slot] = TlbEntry {
            vpn,
            pfn,
            valid: true,
            dirty,
            accessed: true,
            last_access: now,
        };
        evicted
    }

    /// Clears the valid bit of the entry for `vpn`. Returns whether one existed.
    pub fn invalidate(&mut self, vpn: u64) -> bool {
        match self.find(vpn) {
            Some(idx) => {
                self.entries[idx].valid = false;
                debug!("TLB invalidate: vpn {:#x} (slot {})", vpn, idx);
                true
            }
            None => false,
        }
    }

    /// One simulated hardware access: lookup, and insert `pfn` on a miss.
    /// Returns `true` on a hit.
    pub fn combined_access(&mut self, vpn: u64, pfn: u64, dirty: bool) -> bool {
        if self.lookup(vpn).is_some() {
            return true;
        }
        self.insert(vpn, pfn, dirty);
        false
    }

    /// Invalidates every entry. Statistics are kept.
    pub fn flush(&mut self) {
        for e in &mut self.entries {
            *e = TlbEntry::default();
        }
        debug!("TLB flushed ({} entries)", self.entries.len());
    }

    /// Zeroes hits, misses and the logical clock. Entries are kept.
    ///
    /// Surviving entries keep their old stamps, so stamps handed out after
    /// the reset are smaller than theirs. Until the clock catches up, LRU
    /// prefers to evict entries touched after the reset over older ones.
    pub fn reset_statistics(&mut self) {
        self.stats.reset();
        self.access_counter = 0;
        debug!("TLB statistics reset");
    }

    pub fn hit_rate(&self) -> f64 {
        self.stats.hit_rate()
    }

    pub fn hits(&self) -> u64 {
        self.stats.hits
    }

    pub fn misses(&self) -> u64 {
        self.stats.misses
    }

    pub fn total_accesses(&self) -> u64 {
        self.stats.total()
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    pub fn policy(&self) -> Policy {
        self.replacer.policy()
    }

    pub fn entry(&self, index: usize) -> Option<&TlbEntry> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[TlbEntry] {
        &self.entries
    }

    pub fn valid_count(&self) -> usize {
        self.entries.iter().filter(|e| e.valid).count()
    }

    pub fn status(&self) -> TlbStatus {
        TlbStatus {
            capacity: self.capacity(),
            policy: self.policy(),
            entries: self.entries.clone(),
            stats: self.stats,
            hit_rate: self.hit_rate(),
        }
    }
}
