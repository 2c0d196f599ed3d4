//! Point registry for procsim.
//!
//! The registry is the supervisory read/write surface of the engine: every
//! externally visible Config and State field is one named scalar point.
//! Names resolve to compact stable `PointId`s once at registration; all
//! subsequent traffic is id-indexed. External writes are validated against
//! the registered value type, access level and write rule, queued, and
//! drained by the driver loop at the top of each cycle so a model sees one
//! consistent config snapshot per update. Rejected writes are counted and
//! logged, never silently dropped.

pub mod error;
pub mod point;
pub mod registry;

pub use error::{PointError, PointResult};
pub use point::{Access, PointId, PointKind, PointValue, WriteRule};
pub use registry::{PointEntry, PointRegistry};
