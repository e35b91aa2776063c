pub mod mmu;
pub mod paging;
pub mod policies;

pub use self::mmu::Mmu;
pub use self::mmu::tlb::Tlb;
pub use self::paging::FrameTable;
pub use self::policies::Policy;
