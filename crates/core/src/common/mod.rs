//! Types shared by the translation path and both simulation engines.

pub mod addr;
pub mod constants;
pub mod error;

pub use self::addr::{PageIndices, PhysAddr, VirtAddr, construct_physical, decompose};
pub use self::error::{ConfigError, MappingError};
