use pagewalk::config::PagingConfig;
use pagewalk::core::paging::{AccessOutcome, Frame};
use pagewalk::{FrameTable, Policy, Tlb};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;

use crate::common::init_logging;

fn table(frames: usize, policy: Policy) -> FrameTable {
    init_logging();
    FrameTable::with_seed(frames, policy, Some(99))
}

fn replay(t: &mut FrameTable, pages: &[u64]) -> Vec<AccessOutcome> {
    pages.iter().map(|&p| t.access(p)).collect()
}

/// Classic reference string showing Belady's anomaly under FIFO.
const BELADY: [u64; 12] = [1, 2, 3, 4, 1, 2, 5, 1, 2, 3, 4, 5];

#[rstest]
fn test_single_frame_faults_on_every_distinct_page(
    #[values(Policy::Lru, Policy::Fifo, Policy::Random, Policy::Clock)] policy: Policy,
) {
    let mut t = table(1, policy);
    let outcomes = replay(&mut t, &[10, 11, 12, 13, 14]);

    assert!(outcomes.iter().all(|o| !o.is_hit() && o.frame() == 0));
    assert_eq!(t.faults(), 5);
    assert_eq!(t.hits(), 0);
    assert_eq!(outcomes[4].evicted(), Some(13));
}

#[test]
fn test_frame_count_clamping() {
    assert_eq!(FrameTable::new(0, Policy::Lru).frame_count(), 4);
    assert_eq!(FrameTable::new(1, Policy::Lru).frame_count(), 1);
    assert_eq!(FrameTable::new(64, Policy::Lru).frame_count(), 64);
    assert_eq!(FrameTable::new(100, Policy::Lru).frame_count(), 64);
}

#[test]
fn test_frame_table_clamps_where_tlb_rejects() {
    assert_eq!(FrameTable::new(0, Policy::Fifo).frame_count(), 4);
    assert!(Tlb::new(0, Policy::Fifo).is_err());
    assert_eq!(FrameTable::new(5000, Policy::Fifo).frame_count(), 64);
    assert!(Tlb::new(5000, Policy::Fifo).is_err());
}

#[test]
fn test_from_config() {
    let t = FrameTable::from_config(&PagingConfig {
        frames: 3,
        policy: Policy::Clock,
        seed: None,
    });
    assert_eq!(t.frame_count(), 3);
    assert_eq!(t.policy(), Policy::Clock);
}

#[test]
fn test_faults_fill_lowest_empty_frame() {
    let mut t = table(3, Policy::Lru);
    let outcomes = replay(&mut t, &[7, 8, 7, 9]);
    assert_eq!(
        outcomes,
        vec![
            AccessOutcome::Fault {
                frame: 0,
                evicted: None
            },
            AccessOutcome::Fault {
                frame: 1,
                evicted: None
            },
            AccessOutcome::Hit { frame: 0 },
            AccessOutcome::Fault {
                frame: 2,
                evicted: None
            },
        ]
    );
    assert_eq!(t.frame_of(9), Some(2));
    assert_eq!(t.frame_of(1), None);
}

#[rstest]
#[case(Policy::Lru, 0x2, 1)]
#[case(Policy::Fifo, 0x1, 0)]
#[case(Policy::Clock, 0x1, 0)]
fn test_victim_after_hit(#[case] policy: Policy, #[case] victim: u64, #[case] frame: usize) {
    let mut t = table(3, policy);
    replay(&mut t, &[0x1, 0x2, 0x3, 0x1]);
    assert_eq!(
        t.access(0x4),
        AccessOutcome::Fault {
            frame,
            evicted: Some(victim)
        }
    );
}

#[rstest]
#[case(Policy::Fifo, 3, 9)]
#[case(Policy::Fifo, 4, 10)]
#[case(Policy::Lru, 3, 10)]
#[case(Policy::Lru, 4, 8)]
fn test_reference_string_fault_counts(
    #[case] policy: Policy,
    #[case] frames: usize,
    #[case] faults: u64,
) {
    let mut t = table(frames, policy);
    replay(&mut t, &BELADY);
    assert_eq!(t.faults(), faults);
    assert_eq!(t.hits(), BELADY.len() as u64 - faults);
}

#[test]
fn test_stamps_follow_the_access_counter() {
    let mut t = table(2, Policy::Lru);
    replay(&mut t, &[5, 6, 5]);
    assert_eq!(
        t.frames()[0],
        Frame {
            vpn: Some(5),
            loaded_at: 0,
            last_access: 2,
            referenced: true,
        }
    );
    assert_eq!(t.frames()[1].loaded_at, 1);
    assert_eq!(t.access_counter(), 3);
}

#[test]
fn test_clock_victim_is_in_range_when_all_referenced() {
    let mut t = table(8, Policy::Clock);
    replay(&mut t, &(0..8).collect::<Vec<_>>());
    assert!(t.frames().iter().all(|f| f.referenced));

    let outcome = t.access(100);
    assert!(outcome.frame() < 8);
    assert_eq!(outcome.frame(), 0);
    assert_eq!(t.frames().iter().filter(|f| f.referenced).count(), 1);
}

#[test]
fn test_clock_hit_restores_second_chance() {
    let mut t = table(3, Policy::Clock);
    // The fault on 4 clears every bit and evicts 1; the hand rests on frame 1.
    replay(&mut t, &[1, 2, 3, 4]);
    assert!(!t.frames()[1].referenced);

    assert_eq!(t.access(2), AccessOutcome::Hit { frame: 1 });
    assert!(t.frames()[1].referenced);

    assert_eq!(
        t.access(5),
        AccessOutcome::Fault {
            frame: 2,
            evicted: Some(3)
        }
    );
    assert_eq!(t.frame_of(2), Some(1));
}

#[test]
fn test_flush_resets_frames_and_counters() {
    let mut t = table(2, Policy::Fifo);
    replay(&mut t, &[1, 2, 1, 3]);
    t.flush();

    assert!(t.frames().iter().all(Frame::is_empty));
    assert_eq!((t.hits(), t.faults(), t.access_counter()), (0, 0, 0));
    assert_eq!(t.hit_rate(), 0.0);
    assert_eq!(
        t.access(1),
        AccessOutcome::Fault {
            frame: 0,
            evicted: None
        }
    );
}

#[test]
fn test_status_snapshot() {
    let mut t = table(2, Policy::Lru);
    replay(&mut t, &[1, 1, 2, 1]);
    let s = t.status();
    assert_eq!(s.frame_count, 2);
    assert_eq!(s.hits, 2);
    assert_eq!(s.faults, 2);
    assert_eq!(s.accesses, 4);
    assert_eq!(s.hit_rate, 50.0);
    assert_eq!(s.frames[1].vpn, Some(2));
}

proptest! {
    #[test]
    fn prop_every_access_is_counted_once(
        frames in 1usize..10,
        policy in prop::sample::select(Policy::ALL.to_vec()),
        pages in prop::collection::vec(0u64..20, 0..300),
    ) {
        let mut t = FrameTable::with_seed(frames, policy, Some(3));
        for &p in &pages {
            let outcome = t.access(p);
            prop_assert!(outcome.frame() < frames);
            prop_assert_eq!(t.frame_of(p), Some(outcome.frame()));
        }
        prop_assert_eq!(t.hits() + t.faults(), pages.len() as u64);
        prop_assert_eq!(t.access_counter(), pages.len() as u64);

        let mut resident: Vec<u64> = t.frames().iter().filter_map(|f| f.vpn).collect();
        let before = resident.len();
        resident.sort_unstable();
        resident.dedup();
        prop_assert_eq!(resident.len(), before);
    }
}
