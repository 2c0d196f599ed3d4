//! Deterministic process-equipment models for procsim.
//!
//! Provides:
//! - Flow control valve with characteristic curve and instrument error effects
//! - Three-phase separator vessel with compressible gas venting
//! - Analog transmitter waveform generator with scale-fault detection
//! - On/off valve supervisor state machine with solenoid voting
//!
//! Every model follows one pattern: a serde-friendly `Config` written from
//! outside, a `State` computed inside, and an `update` advancing State from
//! Config once per fixed cycle. Updates are infallible and O(1); invalid
//! inputs are sanitized by clamping, never reported. Constructors and config
//! validation are the only fallible operations.

pub mod error;
pub mod flow_valve;
pub mod model;
pub mod separator;
pub mod transmitter;
pub mod valve_supervisor;

// Re-exports for public API
pub use error::{ModelError, ModelResult};
pub use flow_valve::{FlowValveConfig, FlowValveModel, FlowValveState, InstrumentErrors, ValveCharacteristic};
pub use model::CyclicModel;
pub use separator::{SeparatorConfig, SeparatorGeometry, SeparatorModel, SeparatorState};
pub use transmitter::{FaultInject, TransmitterConfig, TransmitterModel, TransmitterState, WaveMode};
pub use valve_supervisor::{
    SolenoidRole, SupervisorConfig, SupervisorIo, SupervisorState, ValveState, ValveSupervisor,
};
