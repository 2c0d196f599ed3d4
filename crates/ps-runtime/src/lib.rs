//! Plant assembly and driver loop for procsim.
//!
//! This crate wires the four process models to the point registry and runs
//! the fixed-rate cooperative cycle: drain external writes, update every
//! model once, re-publish state, record. It also owns the YAML plant
//! configuration schema and run recording/export.

pub mod config;
pub mod error;
pub mod plant;
pub mod recorder;
pub mod runner;

// Re-export key types for convenience
pub use config::{PlantConfig, load_plant_config};
pub use error::{RuntimeError, RuntimeResult};
pub use plant::{Plant, point_names};
pub use recorder::{RunManifest, RunRecorder, TimeseriesRecord};
pub use runner::{RunOptions, RunOutcome, run};
