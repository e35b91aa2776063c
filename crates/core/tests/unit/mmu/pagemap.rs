use std::fs;
use std::path::Path;

use pagewalk::common::constants::{PM_FILE, PM_PRESENT, PM_SOFT_DIRTY, PM_SWAPPED};
use pagewalk::{MappingError, MappingSource, ProcPagemap, RawMapping, VirtAddr};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

/// Writes `entries` as `<root>/<pid>/pagemap`.
fn fake_proc(pid: u32, entries: &[u64]) -> TempDir {
    let root = tempfile::tempdir().unwrap();
    let dir = root.path().join(pid.to_string());
    fs::create_dir(&dir).unwrap();
    let bytes: Vec<u8> = entries.iter().flat_map(|e| e.to_ne_bytes()).collect();
    fs::write(dir.join("pagemap"), bytes).unwrap();
    root
}

fn page(vpn: u64) -> VirtAddr {
    VirtAddr::new((vpn << 12) | 0x123)
}

#[test]
fn test_decode_present_entry() {
    let m = RawMapping::from_pagemap(PM_PRESENT | PM_SOFT_DIRTY | 0x1A2B3);
    assert_eq!(
        m,
        RawMapping {
            present: true,
            swapped: false,
            pfn: 0x1A2B3,
            swap_offset: 0,
            file_backed: false,
            soft_dirty: true,
        }
    );
}

#[test]
fn test_decode_swapped_entry() {
    let m = RawMapping::from_pagemap(PM_SWAPPED | 0x4242);
    assert!(!m.present);
    assert!(m.swapped);
    assert_eq!(m.swap_offset, 0x4242);
    assert_eq!(m.pfn, 0);
}

#[test]
fn test_decode_absent_entry() {
    assert_eq!(RawMapping::from_pagemap(0), RawMapping::absent());
    assert!(RawMapping::from_pagemap(PM_FILE).file_backed);
}

#[test]
fn test_decode_present_and_swapped_keeps_frame() {
    let m = RawMapping::from_pagemap(PM_PRESENT | PM_SWAPPED | 0x77);
    assert!(m.present);
    assert_eq!(m.pfn, 0x77);
    assert_eq!(m.swap_offset, 0);
}

#[test]
fn test_pagemap_path() {
    let pm = ProcPagemap::with_root("/tmp/fakeproc");
    assert_eq!(pm.pagemap_path(42), Path::new("/tmp/fakeproc/42/pagemap"));
    assert_eq!(ProcPagemap::new().root(), Path::new("/proc"));
}

#[test]
fn test_reads_entry_at_vpn_offset() {
    let root = fake_proc(1234, &[0, PM_SWAPPED | 0x99, PM_PRESENT | 0xABC]);
    let pm = ProcPagemap::with_root(root.path());

    assert_eq!(pm.fetch_raw_mapping(1234, page(0)).unwrap(), RawMapping::absent());
    assert_eq!(
        pm.fetch_raw_mapping(1234, page(1)).unwrap(),
        RawMapping::swapped_out(0x99)
    );
    assert_eq!(
        pm.fetch_raw_mapping(1234, page(2)).unwrap(),
        RawMapping::resident(0xABC)
    );
}

#[test]
fn test_reads_are_fresh_each_call() {
    let root = fake_proc(7, &[PM_PRESENT | 0x10]);
    let pm = ProcPagemap::with_root(root.path());
    assert_eq!(pm.fetch_raw_mapping(7, page(0)).unwrap().pfn, 0x10);

    let path = pm.pagemap_path(7);
    fs::write(&path, (PM_PRESENT | 0x20).to_ne_bytes()).unwrap();
    assert_eq!(pm.fetch_raw_mapping(7, page(0)).unwrap().pfn, 0x20);
}

#[test]
fn test_missing_process_is_io_error() {
    let root = tempfile::tempdir().unwrap();
    let pm = ProcPagemap::with_root(root.path());
    match pm.fetch_raw_mapping(99, page(0)) {
        Err(MappingError::Io { path, .. }) => assert_eq!(path, pm.pagemap_path(99)),
        other => panic!("expected Io error, got {:?}", other),
    }
}

#[test]
fn test_truncated_entry_is_short_read() {
    let root = tempfile::tempdir().unwrap();
    let dir = root.path().join("5");
    fs::create_dir(&dir).unwrap();
    fs::write(dir.join("pagemap"), [0u8; 20]).unwrap();
    let pm = ProcPagemap::with_root(root.path());

    match pm.fetch_raw_mapping(5, page(2)) {
        Err(MappingError::ShortRead { len, .. }) => assert_eq!(len, 4),
        other => panic!("expected ShortRead, got {:?}", other),
    }
}

#[test]
fn test_read_past_end_is_short_read() {
    let root = fake_proc(5, &[PM_PRESENT | 1]);
    let pm = ProcPagemap::with_root(root.path());
    assert!(matches!(
        pm.fetch_raw_mapping(5, page(10)),
        Err(MappingError::ShortRead { len: 0, .. })
    ));
}
