//! Flow control valve with opening characteristic and instrument error effects.
//!
//! The valve tracks a 0..100 % control signal through a chain of realistic
//! instrumentation imperfections (dead time, stiction, hysteresis, positioner
//! error) and converts the resulting opening into flow through the inherent
//! characteristic and the sizing coefficient.

use ps_core::{CycleTime, clamp_percent};
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};
use crate::model::CyclicModel;

/// Rangeability of the equal-percentage trim.
const RANGEABILITY: f64 = 50.0;

/// Fixed downstream pressure, bar absolute.
const DOWNSTREAM_PRESSURE_BAR: f64 = 1.0;

/// Inherent flow characteristic of the valve trim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValveCharacteristic {
    /// Flow fraction proportional to opening.
    Linear,
    /// Flow changes by a constant percentage of current flow per increment
    /// of opening (exponential shape).
    EqualPercentage,
}

/// Externally writable valve parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowValveConfig {
    /// Demanded opening, % of span.
    pub control_signal: f64,
    /// Upstream pressure, bar absolute. Downstream is fixed at 1 bar.
    pub upstream_pressure_bar: f64,
    /// Sizing coefficient at full opening.
    pub kv: f64,
    /// Inherent characteristic of the trim.
    pub characteristic: ValveCharacteristic,
}

impl Default for FlowValveConfig {
    fn default() -> Self {
        Self {
            control_signal: 50.0,
            upstream_pressure_bar: 5.0,
            kv: 10.0,
            characteristic: ValveCharacteristic::EqualPercentage,
        }
    }
}

impl FlowValveConfig {
    /// Validate the static constraints. The control signal is exempt: it is
    /// clamped on every update instead.
    pub fn validate(&self) -> ModelResult<()> {
        if !(self.upstream_pressure_bar > 0.0) {
            return Err(ModelError::InvalidArg {
                what: "upstream_pressure_bar must be positive",
            });
        }
        if !(self.kv > 0.0) {
            return Err(ModelError::InvalidArg {
                what: "kv must be positive",
            });
        }
        Ok(())
    }
}

/// Instrumentation error parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentErrors {
    /// Minimum commanded change before the valve moves at all, % of span.
    pub stiction_threshold: f64,
    /// Transport/instrument lag: cycles arriving sooner than this after the
    /// last accepted one are rejected. Simulated seconds.
    pub dead_time_s: f64,
    /// Direction-dependent offset applied to a moving signal, % of span.
    pub hysteresis_percent: f64,
    /// Relative positioner gain error, %.
    pub positioner_error_percent: f64,
}

impl Default for InstrumentErrors {
    fn default() -> Self {
        Self {
            stiction_threshold: 0.5,
            dead_time_s: 0.0,
            hysteresis_percent: 0.0,
            positioner_error_percent: 0.0,
        }
    }
}

impl InstrumentErrors {
    pub fn validate(&self) -> ModelResult<()> {
        if self.stiction_threshold < 0.0 {
            return Err(ModelError::InvalidArg {
                what: "stiction_threshold must be non-negative",
            });
        }
        if self.dead_time_s < 0.0 {
            return Err(ModelError::InvalidArg {
                what: "dead_time_s must be non-negative",
            });
        }
        if self.hysteresis_percent < 0.0 {
            return Err(ModelError::InvalidArg {
                what: "hysteresis_percent must be non-negative",
            });
        }
        Ok(())
    }
}

/// Computed valve state.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowValveState {
    /// Actual opening, % of span, always in [0, 100].
    pub valve_opening: f64,
    /// Volumetric flow through the valve, never negative.
    pub flow: f64,
}

/// Flow control valve model.
#[derive(Debug, Clone)]
pub struct FlowValveModel {
    pub config: FlowValveConfig,
    pub errors: InstrumentErrors,
    state: FlowValveState,
    /// Signal the valve last settled on, pre-hysteresis.
    last_control_signal: f64,
    /// Accumulated simulated time.
    elapsed_s: f64,
    /// Simulated time of the last accepted update.
    last_accepted_s: f64,
}

impl FlowValveModel {
    /// Create a valve from validated config. The opening starts at the
    /// clamped control signal with no flow computed yet.
    pub fn new(config: FlowValveConfig, errors: InstrumentErrors) -> ModelResult<Self> {
        config.validate()?;
        errors.validate()?;
        let initial_signal = clamp_percent(config.control_signal);
        Ok(Self {
            config,
            errors,
            state: FlowValveState {
                valve_opening: initial_signal,
                flow: 0.0,
            },
            last_control_signal: initial_signal,
            elapsed_s: 0.0,
            last_accepted_s: 0.0,
        })
    }

    pub fn state(&self) -> &FlowValveState {
        &self.state
    }

    /// Characteristic fraction for an opening in [0, 100].
    fn characteristic_fraction(&self, opening: f64) -> f64 {
        match self.config.characteristic {
            ValveCharacteristic::Linear => opening / 100.0,
            ValveCharacteristic::EqualPercentage => {
                (RANGEABILITY.powf(opening / 100.0) - 1.0) / (RANGEABILITY - 1.0)
            }
        }
    }
}

impl CyclicModel for FlowValveModel {
    fn update(&mut self, cycle: CycleTime) {
        self.elapsed_s += cycle.as_secs_f64();

        // Dead time: driven by accumulated simulated cycles, not wall clock,
        // so the model stays deterministic for a given Config+State.
        let dead_time = self.errors.dead_time_s.max(0.0);
        if self.elapsed_s - self.last_accepted_s < dead_time {
            return;
        }
        self.last_accepted_s = self.elapsed_s;

        let mut signal = clamp_percent(self.config.control_signal);

        // Stiction: commanded change below the threshold leaves the valve
        // stuck at its previous signal.
        if (signal - self.last_control_signal).abs() < self.errors.stiction_threshold.max(0.0) {
            signal = self.last_control_signal;
        }

        // Hysteresis offset depends on travel direction. The pre-hysteresis
        // signal becomes the reference for the next cycle.
        let hysteresis = if signal > self.last_control_signal {
            self.errors.hysteresis_percent.max(0.0)
        } else if signal < self.last_control_signal {
            -self.errors.hysteresis_percent.max(0.0)
        } else {
            0.0
        };
        self.last_control_signal = signal;
        signal = clamp_percent(signal + hysteresis);

        let opening =
            clamp_percent(signal * (1.0 + self.errors.positioner_error_percent / 100.0));

        let cv_eff = self.config.kv * self.characteristic_fraction(opening);
        let delta_p = (self.config.upstream_pressure_bar - DOWNSTREAM_PRESSURE_BAR).max(0.0);

        self.state = FlowValveState {
            valve_opening: opening,
            flow: cv_eff * delta_p.sqrt(),
        };
    }
}
