//! CyclicModel trait for fixed-cycle process models.

use ps_core::CycleTime;

/// Trait for models advanced once per fixed cycle.
///
/// An implementation must:
/// 1) Read its Config exactly once as a consistent snapshot
/// 2) Advance State in place with a single explicit step over the cycle
/// 3) Stay O(1) and non-blocking; no I/O, no sleeping, no wall clock
///
/// Updates are infallible: out-of-range inputs are clamped to valid ranges,
/// never reported.
pub trait CyclicModel {
    /// Advance internal state by one cycle.
    fn update(&mut self, cycle: CycleTime);
}
