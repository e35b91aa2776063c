//! Virtual and physical address types.
//!
//! `VirtAddr` splits an address into the four 9-bit table indices and the
//! 12-bit page offset. `PhysAddr` is rebuilt from a frame number and an
//! offset. Both are thin `u64` newtypes and never fail.

use std::fmt;

use serde::Serialize;

use super::constants::{
    CANONICAL_MASK, INDEX_MASK, L1_SHIFT, L2_SHIFT, L3_SHIFT, L4_SHIFT, PAGE_OFFSET_MASK,
    PAGE_SHIFT,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct VirtAddr(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct PhysAddr(pub u64);

impl VirtAddr {
    #[inline(always)]
    pub fn new(addr: u64) -> Self {
        Self(addr)
    }

    #[inline(always)]
    pub fn val(&self) -> u64 {
        self.0
    }

    /// Bits 47-39.
    pub fn l1_index(&self) -> u16 {
        ((self.0 >> L1_SHIFT) & INDEX_MASK) as u16
    }

    /// Bits 38-30.
    pub fn l2_index(&self) -> u16 {
        ((self.0 >> L2_SHIFT) & INDEX_MASK) as u16
    }

    /// Bits 29-21.
    pub fn l3_index(&self) -> u16 {
        ((self.0 >> L3_SHIFT) & INDEX_MASK) as u16
    }

    /// Bits 20-12.
    pub fn l4_index(&self) -> u16 {
        ((self.0 >> L4_SHIFT) & INDEX_MASK) as u16
    }

    pub fn page_offset(&self) -> u16 {
        (self.0 & PAGE_OFFSET_MASK) as u16
    }

    /// Virtual page number: the address with the offset shifted out.
    pub fn vpn(&self) -> u64 {
        self.0 >> PAGE_SHIFT
    }

    /// The canonical low 48 bits.
    pub fn canonical(&self) -> u64 {
        self.0 & CANONICAL_MASK
    }

    pub fn indices(&self) -> PageIndices {
        PageIndices {
            l1: self.l1_index(),
            l2: self.l2_index(),
            l3: self.l3_index(),
            l4: self.l4_index(),
            offset: self.page_offset(),
        }
    }
}

impl fmt::Display for VirtAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

impl From<u64> for VirtAddr {
    fn from(addr: u64) -> Self {
        Self(addr)
    }
}

impl PhysAddr {
    #[inline(always)]
    pub fn new(addr: u64) -> Self {
        Self(addr)
    }

    #[inline(always)]
    pub fn val(&self) -> u64 {
        self.0
    }

    /// Builds `(pfn << 12) | offset`. The offset is masked to 12 bits again
    /// so a caller passing an unmasked value cannot corrupt the frame bits.
    pub fn from_frame(pfn: u64, offset: u64) -> Self {
        Self((pfn << PAGE_SHIFT) | (offset & PAGE_OFFSET_MASK))
    }

    pub fn pfn(&self) -> u64 {
        self.0 >> PAGE_SHIFT
    }
}

impl fmt::Display for PhysAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

/// The five fields of a decomposed virtual address.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct PageIndices {
    pub l1: u16,
    pub l2: u16,
    pub l3: u16,
    pub l4: u16,
    pub offset: u16,
}

impl PageIndices {
    /// Reassembles the low 48 bits of the address the fields came from.
    pub fn reconstruct(&self) -> u64 {
        (u64::from(self.l1) << L1_SHIFT)
            | (u64::from(self.l2) << L2_SHIFT)
            | (u64::from(self.l3) << L3_SHIFT)
            | (u64::from(self.l4) << L4_SHIFT)
            | u64::from(self.offset)
    }
}

/// Splits `vaddr` into its four table indices and page offset.
pub fn decompose(vaddr: u64) -> PageIndices {
    VirtAddr::new(vaddr).indices()
}

/// Inverse of the offset extraction: frame number plus offset.
pub fn construct_physical(pfn: u64, offset: u64) -> PhysAddr {
    PhysAddr::from_frame(pfn, offset)
}

/// Formats the low 48 bits in binary, one space between each index group.
pub fn format_binary(vaddr: u64) -> String {
    let mut out = String::with_capacity(52);
    for bit in (0..48).rev() {
        out.push(if vaddr & (1u64 << bit) != 0 { '1' } else { '0' });
        if matches!(bit, 39 | 30 | 21 | 12) {
            out.push(' ');
        }
    }
    out
}
