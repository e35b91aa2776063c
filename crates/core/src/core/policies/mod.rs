//! Replacement policies shared by the TLB and the frame table.
//!
//! A policy is a closed tag chosen when an engine is built. Each variant
//! has its own victim-selection function in a submodule; [`Replacer`]
//! dispatches to it and carries the per-engine state the policies need
//! (the random source and the clock hand).

use std::fmt;
use std::str::FromStr;

use log::trace;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::common::ConfigError;

mod clock;
mod fifo;
mod lru;
mod random;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Policy {
    #[default]
    Lru,
    Fifo,
    Random,
    Clock,
}

impl Policy {
    pub const ALL: [Policy; 4] = [Policy::Lru, Policy::Fifo, Policy::Random, Policy::Clock];

    pub fn name(&self) -> &'static str {
        match self {
            Policy::Lru => "LRU",
            Policy::Fifo => "FIFO",
            Policy::Random => "Random",
            Policy::Clock => "Clock",
        }
    }

    /// Whether a hit moves an entry's recency stamp forward.
    ///
    /// FIFO and LRU read the same stamp when picking a victim; FIFO keeps
    /// insertion order only because hits leave the stamp alone.
    pub fn refreshes_on_hit(&self) -> bool {
        !matches!(self, Policy::Fifo)
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Policy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LRU" => Ok(Policy::Lru),
            "FIFO" => Ok(Policy::Fifo),
            "RANDOM" => Ok(Policy::Random),
            "CLOCK" => Ok(Policy::Clock),
            _ => Err(ConfigError::UnknownPolicy(s.to_string())),
        }
    }
}

impl TryFrom<String> for Policy {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Policy> for String {
    fn from(policy: Policy) -> Self {
        policy.name().to_ascii_uppercase()
    }
}

/// Replacement metadata the victim functions read from a slot.
pub trait Slot {
    /// Stamp of the most recent touch. LRU evicts the smallest.
    fn recency(&self) -> u64;

    /// Stamp of installation. FIFO evicts the smallest.
    fn loaded_at(&self) -> u64;

    /// Second-chance bit read by the clock sweep.
    fn referenced(&self) -> bool;

    fn clear_reference(&mut self);
}

/// Victim selector for one engine.
///
/// Only consulted once the engine has established that every slot is
/// occupied; empty slots are always filled first by the caller.
pub struct Replacer {
    policy: Policy,
    rng: StdRng,
    hand: usize,
}

impl Replacer {
    /// Creates a selector. The random source is seeded once here, from
    /// `seed` when given and from OS entropy otherwise.
    pub fn new(policy: Policy, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        Self {
            policy,
            rng,
            hand: 0,
        }
    }

    pub fn policy(&self) -> Policy {
        self.policy
    }

    /// Picks the slot to evict. `slots` must not be empty.
    pub fn victim<S: Slot>(&mut self, slots: &mut [S]) -> usize {
        let victim = match self.policy {
            Policy::Lru => lru::victim(slots),
            Policy::Fifo => fifo::victim(slots),
            Policy::Random => random::victim(&mut self.rng, slots.len()),
            Policy::Clock => clock::victim(&mut self.hand, slots),
        };
        trace!("{} selected victim slot {}", self.policy, victim);
        victim
    }
}
