//! Plain-text rendering of simulator results.

use pagewalk::common::addr::format_binary;
use pagewalk::core::mmu::{Fill, TlbAccess};
use pagewalk::core::paging::AccessOutcome;
use pagewalk::{FrameTable, Tlb, TranslationResult, VirtAddr};

pub fn decomposition(vaddr: VirtAddr) {
    let ix = vaddr.indices();
    println!("Virtual Address: {}", vaddr);
    println!("Binary (48-bit): {}", format_binary(vaddr.val()));
    println!("                 L1        L2        L3        L4        Offset");
    println!();
    println!("  Bits 47-39  L1 (PML4) index  {:>4}  {:#05x}", ix.l1, ix.l1);
    println!("  Bits 38-30  L2 (PDPT) index  {:>4}  {:#05x}", ix.l2, ix.l2);
    println!("  Bits 29-21  L3 (PD)   index  {:>4}  {:#05x}", ix.l3, ix.l3);
    println!("  Bits 20-12  L4 (PT)   index  {:>4}  {:#05x}", ix.l4, ix.l4);
    println!("  Bits 11-0   offset           {:>4}  {:#05x}", ix.offset, ix.offset);
    println!();
    println!("  VPN = {:#x}", vaddr.vpn());
}

pub fn translation(result: &TranslationResult) {
    let ix = result.indices;
    println!();
    println!("ADDRESS TRANSLATION (pid {})", result.pid);
    println!("==========================");
    println!("Virtual Address:  {}", result.vaddr);
    println!("  VPN:    {:#x}", result.vaddr.vpn());
    println!("  Offset: {:#05x}", ix.offset);
    println!(
        "  Walk:   L1[{}] -> L2[{}] -> L3[{}] -> L4[{}]",
        ix.l1, ix.l2, ix.l3, ix.l4
    );
    println!();

    match (result.paddr, &result.failure) {
        (Some(paddr), _) => {
            let pfn = paddr.pfn();
            println!("Physical Address: {}", paddr);
            println!("  PFN:    {:#x}", pfn);
            println!(
                "  = ({:#x} << 12) | {:#05x} = {:#x}",
                pfn,
                ix.offset,
                paddr.val()
            );
        }
        (None, Some(reason)) => {
            println!("Physical Address: UNAVAILABLE");
            println!("  Error: {}", reason);
        }
        (None, None) => println!("Physical Address: UNAVAILABLE"),
    }
    println!();
}

pub fn tlb_access(access: &TlbAccess) {
    match access.fill {
        None => println!("[TLB HIT]  VPN {:#x} -> PFN {:#x}", access.vpn, access.pfn),
        Some(fill) => {
            let note = match fill {
                Fill::Translated => "",
                Fill::Simulated => " (simulated)",
            };
            println!("[TLB MISS] VPN {:#x} not found", access.vpn);
            println!(
                "[TLB INSERT] VPN {:#x} -> PFN {:#x}{}",
                access.vpn, access.pfn, note
            );
        }
    }
}

pub fn tlb_status(tlb: &Tlb) {
    println!();
    println!(
        "TLB STATUS ({} entries, {} replacement)",
        tlb.capacity(),
        tlb.policy()
    );
    println!("{}", "=".repeat(64));
    println!("INDEX   VPN              PFN              VALID  LAST ACCESS");
    println!("{}", "-".repeat(64));
    for (i, e) in tlb.entries().iter().enumerate() {
        if e.valid {
            println!(
                "{:<7} {:<16} {:<16} YES    {}",
                i,
                format!("{:#x}", e.vpn),
                format!("{:#x}", e.pfn),
                e.last_access
            );
        } else {
            println!("{:<7} (empty)          -                NO     -", i);
        }
    }
    println!("{}", "-".repeat(64));
    println!();
    println!("Hits:           {}", tlb.hits());
    println!("Misses:         {}", tlb.misses());
    println!("Total Accesses: {}", tlb.total_accesses());
    println!("Hit Rate:       {:.2}%", tlb.hit_rate());
}

pub fn page_access(vpn: u64, outcome: &AccessOutcome) {
    match *outcome {
        AccessOutcome::Hit { frame } => {
            println!("[PAGE HIT]   VPN {:#x} found in frame {}", vpn, frame)
        }
        AccessOutcome::Fault {
            frame,
            evicted: Some(old),
        } => println!(
            "[PAGE FAULT] VPN {:#x} not in memory, evicted VPN {:#x} from frame {}",
            vpn, old, frame
        ),
        AccessOutcome::Fault {
            frame,
            evicted: None,
        } => println!(
            "[PAGE FAULT] VPN {:#x} not in memory, loaded into frame {}",
            vpn, frame
        ),
    }
}

pub fn frame_table(table: &FrameTable) {
    println!();
    println!(
        "PAGING STATUS ({} frames, {} replacement)",
        table.frame_count(),
        table.policy()
    );
    println!("{}", "=".repeat(48));
    println!("FRAME  VPN          LOADED  LAST ACCESS  REF");
    println!("{}", "-".repeat(48));
    for (i, f) in table.frames().iter().enumerate() {
        match f.vpn {
            Some(vpn) => println!(
                "{:<6} {:<12} {:<7} {:<12} {}",
                i,
                format!("{:#x}", vpn),
                f.loaded_at,
                f.last_access,
                u8::from(f.referenced)
            ),
            None => println!("{:<6} (empty)      -       -            -", i),
        }
    }
    println!("{}", "-".repeat(48));
    println!();
    println!("Page Hits:   {}", table.hits());
    println!("Page Faults: {}", table.faults());
    println!("Hit Rate:    {:.1}%", table.hit_rate());
}
