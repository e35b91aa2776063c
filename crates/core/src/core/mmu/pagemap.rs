//! Raw page mapping entries and the sources that supply them.
//!
//! Translation asks a [`MappingSource`] for the raw entry of a single
//! virtual page. [`ProcPagemap`] is the Linux implementation, reading
//! `/proc/<pid>/pagemap`; tests substitute their own sources.
//!
//! Pagemap entry format (64 bits, native endian):
//!
//! | Bits  | Meaning                                       |
//! |-------|-----------------------------------------------|
//! | 0-54  | frame number if present, swap location if swapped |
//! | 55    | soft-dirty                                    |
//! | 61    | file-backed or shared anonymous               |
//! | 62    | swapped                                       |
//! | 63    | present                                       |

use std::fs::File;
use std::io::{ErrorKind, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use log::{trace, warn};
use serde::Serialize;

use crate::common::constants::{
    PAGEMAP_ENTRY_BYTES, PM_FILE, PM_PFN_MASK, PM_PRESENT, PM_SOFT_DIRTY, PM_SWAPPED,
};
use crate::common::{MappingError, VirtAddr};

/// Mapping state of one virtual page, as reported by the source.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RawMapping {
    pub present: bool,
    pub swapped: bool,
    /// Meaningful only when `present`.
    pub pfn: u64,
    /// Meaningful only when `swapped`.
    pub swap_offset: u64,
    pub file_backed: bool,
    pub soft_dirty: bool,
}

impl RawMapping {
    /// Decodes one 64-bit pagemap entry.
    pub fn from_pagemap(entry: u64) -> Self {
        let present = entry & PM_PRESENT != 0;
        let swapped = entry & PM_SWAPPED != 0;
        let payload = entry & PM_PFN_MASK;
        Self {
            present,
            swapped,
            pfn: if present { payload } else { 0 },
            swap_offset: if !present && swapped { payload } else { 0 },
            file_backed: entry & PM_FILE != 0,
            soft_dirty: entry & PM_SOFT_DIRTY != 0,
        }
    }

    pub fn resident(pfn: u64) -> Self {
        Self {
            present: true,
            pfn,
            ..Self::default()
        }
    }

    pub fn swapped_out(swap_offset: u64) -> Self {
        Self {
            swapped: true,
            swap_offset,
            ..Self::default()
        }
    }

    pub fn absent() -> Self {
        Self::default()
    }
}

/// Supplier of raw mapping entries.
///
/// Implementations fetch fresh state on every call and report failures
/// instead of retrying.
pub trait MappingSource {
    fn fetch_raw_mapping(&self, pid: u32, vaddr: VirtAddr) -> Result<RawMapping, MappingError>;
}

impl<S: MappingSource + ?Sized> MappingSource for &S {
    fn fetch_raw_mapping(&self, pid: u32, vaddr: VirtAddr) -> Result<RawMapping, MappingError> {
        (**self).fetch_raw_mapping(pid, vaddr)
    }
}

impl<S: MappingSource + ?Sized> MappingSource for Box<S> {
    fn fetch_raw_mapping(&self, pid: u32, vaddr: VirtAddr) -> Result<RawMapping, MappingError> {
        (**self).fetch_raw_mapping(pid, vaddr)
    }
}

/// Reads `<root>/<pid>/pagemap`, one open and one 8-byte read per call.
#[derive(Clone, Debug)]
pub struct ProcPagemap {
    root: PathBuf,
}

impl Default for ProcPagemap {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcPagemap {
    pub fn new() -> Self {
        Self::with_root("/proc")
    }

    /// Reader rooted somewhere other than `/proc`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn pagemap_path(&self, pid: u32) -> PathBuf {
        self.root.join(pid.to_string()).join("pagemap")
    }

    fn read_entry(path: &Path, offset: u64) -> Result<u64, MappingError> {
        let io_err = |source| MappingError::Io {
            path: path.to_path_buf(),
            source,
        };

        let mut file = File::open(path).map_err(io_err)?;
        file.seek(SeekFrom::Start(offset)).map_err(io_err)?;

        let mut buf = [0u8; PAGEMAP_ENTRY_BYTES as usize];
        let mut len = 0;
        while len < buf.len() {
            match file.read(&mut buf[len..]) {
                Ok(0) => break,
                Ok(n) => len += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(io_err(e)),
            }
        }

        if len < buf.len() {
            return Err(MappingError::ShortRead {
                path: path.to_path_buf(),
                len,
            });
        }
        Ok(u64::from_ne_bytes(buf))
    }
}

impl MappingSource for ProcPagemap {
    fn fetch_raw_mapping(&self, pid: u32, vaddr: VirtAddr) -> Result<RawMapping, MappingError> {
        let path = self.pagemap_path(pid);
        let entry = Self::read_entry(&path, vaddr.vpn() * PAGEMAP_ENTRY_BYTES)?;
        let mapping = RawMapping::from_pagemap(entry);
        trace!("pagemap {} vpn {:#x}: {:#018x}", pid, vaddr.vpn(), entry);

        if mapping.present && mapping.pfn == 0 && !is_privileged() {
            warn!(
                "pagemap for pid {} reports frame 0; frame numbers are hidden without root",
                pid
            );
        }
        Ok(mapping)
    }
}

#[cfg(unix)]
fn is_privileged() -> bool {
    // SAFETY: geteuid has no preconditions and cannot fail.
    unsafe { libc::geteuid() == 0 }
}

#[cfg(not(unix))]
fn is_privileged() -> bool {
    true
}
