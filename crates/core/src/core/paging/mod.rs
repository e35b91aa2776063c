//! Demand-paging model.
//!
//! A small set of physical frames, each holding at most one virtual page.
//! Touching a page that is not resident is a page fault: the page is
//! loaded into the lowest empty frame, or into a victim chosen by the
//! replacement policy when every frame is occupied.
//!
//! Each frame tracks two stamps. `loaded_at` is written only when a page is
//! installed and drives FIFO; `last_access` is refreshed by every hit and
//! drives LRU. Both come from one logical clock that advances exactly once
//! per [`FrameTable::access`].

use log::{debug, trace};
use serde::Serialize;

use crate::common::constants::{DEFAULT_FRAMES, MAX_FRAMES};
use crate::config::PagingConfig;
use crate::core::policies::{Policy, Replacer, Slot};
use crate::stats::Stats;

/// One physical frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Frame {
    /// Resident page, `None` when the frame is empty.
    pub vpn: Option<u64>,
    pub loaded_at: u64,
    pub last_access: u64,
    pub referenced: bool,
}

impl Frame {
    pub fn is_empty(&self) -> bool {
        self.vpn.is_none()
    }
}

impl Slot for Frame {
    fn recency(&self) -> u64 {
        self.last_access
    }

    fn loaded_at(&self) -> u64 {
        self.loaded_at
    }

    fn referenced(&self) -> bool {
        self.referenced
    }

    fn clear_reference(&mut self) {
        self.referenced = false;
    }
}

/// Result of touching one page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AccessOutcome {
    /// The page was resident in `frame`.
    Hit { frame: usize },
    /// The page was loaded into `frame`, replacing `evicted` if the frame
    /// was occupied.
    Fault { frame: usize, evicted: Option<u64> },
}

impl AccessOutcome {
    pub fn is_hit(&self) -> bool {
        matches!(self, AccessOutcome::Hit { .. })
    }

    pub fn frame(&self) -> usize {
        match *self {
            AccessOutcome::Hit { frame } | AccessOutcome::Fault { frame, .. } => frame,
        }
    }

    pub fn evicted(&self) -> Option<u64> {
        match *self {
            AccessOutcome::Hit { .. } => None,
            AccessOutcome::Fault { evicted, .. } => evicted,
        }
    }
}

/// Serializable snapshot of a frame table.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FrameTableStatus {
    pub frame_count: usize,
    pub policy: Policy,
    pub frames: Vec<Frame>,
    pub hits: u64,
    pub faults: u64,
    pub hit_rate: f64,
    pub accesses: u64,
}

pub struct FrameTable {
    frames: Vec<Frame>,
    replacer: Replacer,
    stats: Stats,
    access_counter: u64,
}

impl FrameTable {
    /// Creates an empty frame table.
    ///
    /// Never fails: `frame_count` goes through [`FrameTable::clamp_frames`].
    pub fn new(frame_count: usize, policy: Policy) -> Self {
        Self::with_seed(frame_count, policy, None)
    }

    /// Like [`FrameTable::new`], with a fixed seed for random replacement.
    pub fn with_seed(frame_count: usize, policy: Policy, seed: Option<u64>) -> Self {
        let count = Self::clamp_frames(frame_count);
        if count != frame_count {
            debug!("frame count {} clamped to {}", frame_count, count);
        }
        debug!("frame table created: {} frames, {} replacement", count, policy);

        Self {
            frames: vec![Frame::default(); count],
            replacer: Replacer::new(policy, seed),
            stats: Stats::default(),
            access_counter: 0,
        }
    }

    pub fn from_config(config: &PagingConfig) -> Self {
        Self::with_seed(config.frames, config.policy, config.seed)
    }

    /// Zero selects [`DEFAULT_FRAMES`]; anything above [`MAX_FRAMES`] is capped.
    pub fn clamp_frames(requested: usize) -> usize {
        match requested {
            0 => DEFAULT_FRAMES,
            n => n.min(MAX_FRAMES),
        }
    }

    /// Touches page `vpn`.
    pub fn access(&mut self, vpn: u64) -> AccessOutcome {
        let now = self.access_counter;
        self.access_counter += 1;

        if let Some(idx) = self.frame_of(vpn) {
            let frame = &mut self.frames[idx];
            frame.last_access = now;
            frame.referenced = true;
            self.stats.record_hit();
            trace!("page hit: vpn {:#x} in frame {}", vpn, idx);
            return AccessOutcome::Hit { frame: idx };
        }

        self.stats.record_miss();
        let idx = match self.frames.iter().position(Frame::is_empty) {
            Some(free) => free,
            None => self.replacer.victim(&mut self.frames),
        };

        let evicted = self.frames[idx].vpn;
        match evicted {
            Some(old) => debug!(
                "page fault: vpn {:#x} replaces vpn {:#x} in frame {} ({})",
                vpn,
                old,
                idx,
                self.replacer.policy()
            ),
            None => trace!("page fault: vpn {:#x} loaded into free frame {}", vpn, idx),
        }

        self.frames[idx] = Frame {
            vpn: Some(vpn),
            loaded_at: now,
            last_access: now,
            referenced: true,
        };
        AccessOutcome::Fault {
            frame: idx,
            evicted,
        }
    }

    /// Empties every frame and zeroes hits, faults and the logical clock.
    pub fn flush(&mut self) {
        for f in &mut self.frames {
            *f = Frame::default();
        }
        self.stats.reset();
        self.access_counter = 0;
        debug!("frame table flushed ({} frames)", self.frames.len());
    }

    /// Frame currently holding `vpn`.
    pub fn frame_of(&self, vpn: u64) -> Option<usize> {
        self.frames.iter().position(|f| f.vpn == Some(vpn))
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn policy(&self) -> Policy {
        self.replacer.policy()
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn hits(&self) -> u64 {
        self.stats.hits
    }

    pub fn faults(&self) -> u64 {
        self.stats.misses
    }

    pub fn hit_rate(&self) -> f64 {
        self.stats.hit_rate()
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    /// Number of accesses since creation or the last flush.
    pub fn access_counter(&self) -> u64 {
        self.access_counter
    }

    pub fn status(&self) -> FrameTableStatus {
        FrameTableStatus {
            frame_count: self.frame_count(),
            policy: self.policy(),
            frames: self.frames.clone(),
            hits: self.hits(),
            faults: self.faults(),
            hit_rate: self.hit_rate(),
            accesses: self.access_counter,
        }
    }
}
