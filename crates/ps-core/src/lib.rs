//! ps-core: stable foundation for procsim.
//!
//! Contains:
//! - units (uom SI types + constructors)
//! - numeric (Real + tolerances + float helpers)
//! - cycle (fixed-cycle time type and simulated clock)
//! - error (shared error types)

pub mod cycle;
pub mod error;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use cycle::{CycleClock, CycleTime};
pub use error::{PsError, PsResult};
pub use numeric::*;
pub use units::*;
