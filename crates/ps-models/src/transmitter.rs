//! Analog transmitter waveform generator with scale-fault detection.
//!
//! While simulation is active the transmitter produces a test signal over its
//! configured range: a pinned overflow/underflow value, a sine or sawtooth
//! wave with a fixed 10 s period, or a ramp-and-reverse walk stepping by
//! `step_size`. The fault flag tracks whether the produced value left the
//! scale bounds.

use ps_core::{CycleTime, wrap_phase};
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};
use crate::model::CyclicModel;

/// Period of the sine and sawtooth test waveforms, seconds.
const WAVE_PERIOD_S: f64 = 10.0;

/// Allowed step size span for the ramp walk, enforced on external writes.
pub const STEP_SIZE_MIN: f64 = 0.1;
pub const STEP_SIZE_MAX: f64 = 10.0;

/// Test waveform selection. One mode at a time by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WaveMode {
    /// Sine wave spanning the range once per period.
    Sine,
    /// Linear ramp from min to max range, wrapping each period.
    #[default]
    Sawtooth,
    /// Step up and down between the range bounds by `step_size`.
    RampWalk,
}

/// Scale-fault injection. Pins the output at a scale bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FaultInject {
    #[default]
    None,
    /// Pin at `max_scale`.
    Overflow,
    /// Pin at `min_scale`.
    Underflow,
}

/// Externally writable transmitter parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransmitterConfig {
    /// Lower end of the simulated process range.
    pub min_range: f64,
    /// Upper end of the simulated process range.
    pub max_range: f64,
    /// Lower scale bound; values below raise the fault flag.
    pub min_scale: f64,
    /// Upper scale bound; values above raise the fault flag.
    pub max_scale: f64,
    /// Ramp walk increment per cycle.
    pub step_size: f64,
    /// Master enable; when false, update is a no-op.
    pub simulation_active: bool,
    pub wave_mode: WaveMode,
    pub fault_inject: FaultInject,
}

impl Default for TransmitterConfig {
    fn default() -> Self {
        Self {
            min_range: 0.0,
            max_range: 100.0,
            min_scale: -5.0,
            max_scale: 105.0,
            step_size: 1.0,
            simulation_active: false,
            wave_mode: WaveMode::default(),
            fault_inject: FaultInject::default(),
        }
    }
}

impl TransmitterConfig {
    pub fn validate(&self) -> ModelResult<()> {
        if !(self.min_range < self.max_range) {
            return Err(ModelError::InvalidArg {
                what: "min_range must be below max_range",
            });
        }
        if !(self.min_scale < self.max_scale) {
            return Err(ModelError::InvalidArg {
                what: "min_scale must be below max_scale",
            });
        }
        if !(STEP_SIZE_MIN..=STEP_SIZE_MAX).contains(&self.step_size) {
            return Err(ModelError::InvalidArg {
                what: "step_size outside [0.1, 10.0]",
            });
        }
        Ok(())
    }
}

/// Computed transmitter state.
#[derive(Debug, Clone, PartialEq)]
pub struct TransmitterState {
    /// Generated process value.
    pub current_value: f64,
    /// Simulated time, monotone while simulation is active.
    pub simulation_time_s: f64,
    /// True iff `current_value` lies outside the scale bounds.
    pub fault: bool,
}

/// Analog transmitter model.
#[derive(Debug, Clone)]
pub struct TransmitterModel {
    pub config: TransmitterConfig,
    state: TransmitterState,
    /// Ramp walk travel direction.
    increasing: bool,
}

impl TransmitterModel {
    pub fn new(config: TransmitterConfig) -> ModelResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            state: TransmitterState {
                current_value: 0.0,
                simulation_time_s: 0.0,
                fault: false,
            },
            increasing: true,
        })
    }

    pub fn state(&self) -> &TransmitterState {
        &self.state
    }

    fn ramp_walk(&mut self) -> f64 {
        let step = self.config.step_size;
        let mut value = self.state.current_value;
        if self.increasing {
            value += step;
            if value >= self.config.max_range {
                self.increasing = false;
                value = self.config.max_range;
            }
        } else {
            value -= step;
            if value <= self.config.min_range {
                self.increasing = true;
                value = self.config.min_range;
            }
        }
        value
    }
}

impl CyclicModel for TransmitterModel {
    fn update(&mut self, cycle: CycleTime) {
        if !self.config.simulation_active {
            return;
        }
        self.state.simulation_time_s += cycle.as_secs_f64();

        let span = self.config.max_range - self.config.min_range;
        let t = self.state.simulation_time_s;

        let value = match self.config.fault_inject {
            FaultInject::Overflow => self.config.max_scale,
            FaultInject::Underflow => self.config.min_scale,
            FaultInject::None => match self.config.wave_mode {
                WaveMode::Sine => {
                    self.config.min_range
                        + span / 2.0 * (1.0 + (std::f64::consts::TAU * t / WAVE_PERIOD_S).sin())
                }
                WaveMode::Sawtooth => {
                    self.config.min_range + span * wrap_phase(t, WAVE_PERIOD_S)
                }
                WaveMode::RampWalk => self.ramp_walk(),
            },
        };

        self.state.current_value = value;
        self.state.fault =
            value < self.config.min_scale || value > self.config.max_scale;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn active(wave_mode: WaveMode) -> TransmitterModel {
        TransmitterModel::new(TransmitterConfig {
            simulation_active: true,
            wave_mode,
            ..TransmitterConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn inactive_is_a_noop() {
        let mut tx = TransmitterModel::new(TransmitterConfig::default()).unwrap();
        for _ in 0..10 {
            tx.update(CycleTime::default());
        }
        assert_eq!(tx.state().simulation_time_s, 0.0);
        assert_eq!(tx.state().current_value, 0.0);
        assert!(!tx.state().fault);
    }

    #[test]
    fn sawtooth_hits_midpoint_at_half_period() {
        let mut tx = active(WaveMode::Sawtooth);
        // 10 cycles of 500 ms reach t = 5.0 s exactly in binary float.
        let cycle = CycleTime::new(500).unwrap();
        for _ in 0..10 {
            tx.update(cycle);
        }
        assert_eq!(tx.state().simulation_time_s, 5.0);
        assert_eq!(tx.state().current_value, 50.0);
    }

    #[test]
    fn sawtooth_wraps_after_full_period() {
        let mut tx = active(WaveMode::Sawtooth);
        let cycle = CycleTime::new(500).unwrap();
        for _ in 0..20 {
            tx.update(cycle);
        }
        // t = 10.0 s: the ramp has wrapped back to the range start.
        assert_eq!(tx.state().current_value, 0.0);
    }

    #[test]
    fn sine_stays_within_range() {
        let mut tx = active(WaveMode::Sine);
        for _ in 0..300 {
            tx.update(CycleTime::default());
            let v = tx.state().current_value;
            assert!((0.0 - 1e-9..=100.0 + 1e-9).contains(&v));
        }
    }

    #[test]
    fn sine_peaks_at_quarter_period() {
        let mut tx = active(WaveMode::Sine);
        let cycle = CycleTime::new(500).unwrap();
        for _ in 0..5 {
            tx.update(cycle);
        }
        // t = 2.5 s: sin(pi/2) = 1 -> max_range.
        assert!((tx.state().current_value - 100.0).abs() < 1e-9);
    }

    #[test]
    fn ramp_walk_reverses_at_bounds() {
        let mut tx = TransmitterModel::new(TransmitterConfig {
            simulation_active: true,
            wave_mode: WaveMode::RampWalk,
            min_range: 0.0,
            max_range: 5.0,
            step_size: 2.0,
            ..TransmitterConfig::default()
        })
        .unwrap();

        let cycle = CycleTime::default();
        let expected = [2.0, 4.0, 5.0, 3.0, 1.0, 0.0, 2.0];
        for want in expected {
            tx.update(cycle);
            assert_eq!(tx.state().current_value, want);
        }
    }

    #[test]
    fn overflow_pins_at_max_scale() {
        let mut tx = TransmitterModel::new(TransmitterConfig {
            simulation_active: true,
            fault_inject: FaultInject::Overflow,
            ..TransmitterConfig::default()
        })
        .unwrap();
        tx.update(CycleTime::default());
        assert_eq!(tx.state().current_value, 105.0);
        // Pinned exactly at the bound: inside the scale, no fault.
        assert!(!tx.state().fault);
    }

    #[test]
    fn fault_flags_out_of_scale_values() {
        // Narrow the scale inside the range so the sawtooth leaves it.
        let mut tx = TransmitterModel::new(TransmitterConfig {
            simulation_active: true,
            wave_mode: WaveMode::Sawtooth,
            min_scale: 0.0,
            max_scale: 50.0,
            ..TransmitterConfig::default()
        })
        .unwrap();

        let cycle = CycleTime::new(500).unwrap();
        for _ in 0..10 {
            tx.update(cycle);
        }
        // t = 5.0 s -> value 50.0, still inside.
        assert!(!tx.state().fault);
        tx.update(cycle);
        // value 55.0, outside the scale.
        assert!(tx.state().fault);

        // Fault clears once the wave wraps back inside.
        for _ in 0..10 {
            tx.update(cycle);
        }
        assert!(!tx.state().fault);
    }

    #[test]
    fn fault_recomputed_in_pinned_modes() {
        // Scale bound above the range: underflow pin sits below min_scale.
        let mut tx = TransmitterModel::new(TransmitterConfig {
            simulation_active: true,
            fault_inject: FaultInject::Underflow,
            min_scale: -5.0,
            max_scale: 105.0,
            ..TransmitterConfig::default()
        })
        .unwrap();
        tx.update(CycleTime::default());
        assert_eq!(tx.state().current_value, -5.0);
        assert!(!tx.state().fault);

        // Switching the injection off resumes the waveform and re-evaluates
        // the flag on the same cycle.
        tx.config.fault_inject = FaultInject::None;
        tx.update(CycleTime::default());
        assert!(!tx.state().fault);
    }

    #[test]
    fn invalid_config_rejected() {
        assert!(
            TransmitterModel::new(TransmitterConfig {
                min_range: 10.0,
                max_range: 10.0,
                ..TransmitterConfig::default()
            })
            .is_err()
        );
        assert!(
            TransmitterModel::new(TransmitterConfig {
                step_size: 0.01,
                ..TransmitterConfig::default()
            })
            .is_err()
        );
        assert!(
            TransmitterModel::new(TransmitterConfig {
                step_size: 50.0,
                ..TransmitterConfig::default()
            })
            .is_err()
        );
    }
}
