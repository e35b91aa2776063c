//! Virtual memory simulation core.
//!
//! * [`common`] decomposes virtual addresses into x86_64 4-level page table
//!   indices and rebuilds physical addresses from frame numbers.
//! * [`crate::core::mmu`] translates an address through an external mapping
//!   source and models a fully associative TLB.
//! * [`crate::core::paging`] models demand paging over a small frame table.
//!
//! Both engines pick victims from the same policy family
//! ([`Policy`]): LRU, FIFO, Random and Clock.

pub mod common;
pub mod config;
pub mod core;
pub mod stats;

pub use crate::common::{ConfigError, MappingError, PageIndices, PhysAddr, VirtAddr, decompose};
pub use crate::config::Config;
pub use crate::core::mmu::pagemap::{MappingSource, ProcPagemap, RawMapping};
pub use crate::core::mmu::{FailureReason, TranslationResult, translate};
pub use crate::core::{FrameTable, Mmu, Policy, Tlb};
pub use crate::stats::Stats;
