//! Bit-layout constants and engine limits.
//!
//! The address layout is x86_64 4-level paging with 4 KiB pages:
//!
//! ```text
//! 63       48 47    39 38    30 29    21 20    12 11        0
//! +---------+---------+---------+---------+---------+---------+
//! |  sign   |   L1    |   L2    |   L3    |   L4    | offset  |
//! +---------+---------+---------+---------+---------+---------+
//! ```

/// Width of the page offset in bits.
pub const PAGE_SHIFT: u32 = 12;

/// Size of one page in bytes.
pub const PAGE_SIZE: u64 = 1 << PAGE_SHIFT;

/// Mask selecting the page offset.
pub const PAGE_OFFSET_MASK: u64 = PAGE_SIZE - 1;

/// Shift of the level-1 (PML4) index.
pub const L1_SHIFT: u32 = 39;

/// Shift of the level-2 (PDPT) index.
pub const L2_SHIFT: u32 = 30;

/// Shift of the level-3 (page directory) index.
pub const L3_SHIFT: u32 = 21;

/// Shift of the level-4 (page table) index.
pub const L4_SHIFT: u32 = PAGE_SHIFT;

/// Mask for one 9-bit table index.
pub const INDEX_MASK: u64 = 0x1FF;

/// Mask selecting the canonical low 48 bits of an address.
pub const CANONICAL_MASK: u64 = (1 << 48) - 1;

/// Largest TLB the cache engine accepts.
pub const MAX_TLB_ENTRIES: usize = 1024;

/// TLB size used when no configuration is given.
pub const DEFAULT_TLB_ENTRIES: usize = 16;

/// Largest frame table the paging engine builds.
pub const MAX_FRAMES: usize = 64;

/// Frame count substituted for a requested count of zero.
pub const DEFAULT_FRAMES: usize = 4;

/// Mask applied to a VPN to derive a placeholder frame number.
pub const PLACEHOLDER_PFN_MASK: u64 = 0xF_FFFF;

/// Pagemap entry: page present in RAM.
pub const PM_PRESENT: u64 = 1 << 63;

/// Pagemap entry: page swapped out.
pub const PM_SWAPPED: u64 = 1 << 62;

/// Pagemap entry: file-backed or shared anonymous page.
pub const PM_FILE: u64 = 1 << 61;

/// Pagemap entry: soft-dirty.
pub const PM_SOFT_DIRTY: u64 = 1 << 55;

/// Pagemap entry: frame number or swap location.
pub const PM_PFN_MASK: u64 = (1 << 55) - 1;

/// Size in bytes of one pagemap entry.
pub const PAGEMAP_ENTRY_BYTES: u64 = 8;
