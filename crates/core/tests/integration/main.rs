//! Engine-level scenarios for the TLB, the frame table and the MMU session.


mod demand_paging;
