//! On/off safety valve supervisor.
//!
//! A finite-state machine arbitrating solenoid commands, travel timing and
//! fault latching for a shutdown valve. The valve opens only while every
//! voting solenoid is energized and takes a configured travel time to move;
//! a fault latches until an explicit reset pulse.

use ps_core::CycleTime;
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};
use crate::model::CyclicModel;

/// Number of solenoid command/output slots.
pub const SOLENOID_SLOTS: usize = 3;

/// Solenoid slot roles: independent command sources that must all agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum SolenoidRole {
    /// Emergency Shutdown.
    Esd = 0,
    /// Process Shutdown.
    Psd = 1,
    /// Process Control System.
    Pcs = 2,
}

/// Valve travel state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum ValveState {
    #[default]
    Closed = 0,
    Opening = 1,
    Open = 2,
    Closing = 3,
    Fault = 4,
}

impl ValveState {
    /// Convert from a raw `u8`. Returns `None` for unknown values.
    #[inline]
    pub const fn from_raw(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Closed),
            1 => Some(Self::Opening),
            2 => Some(Self::Open),
            3 => Some(Self::Closing),
            4 => Some(Self::Fault),
            _ => None,
        }
    }

    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Closed => "CLOSED",
            Self::Opening => "OPENING",
            Self::Open => "OPEN",
            Self::Closing => "CLOSING",
            Self::Fault => "FAULT",
        }
    }
}

/// Supervisor parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupervisorConfig {
    /// Number of voting solenoids, 1..=3.
    pub solenoid_count: u8,
    /// Latch `esd_latched` on entry to the fault state.
    pub esd_latching: bool,
    /// Full-stroke travel time, ms.
    pub travel_time_ms: u32,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            solenoid_count: SOLENOID_SLOTS as u8,
            esd_latching: false,
            travel_time_ms: 5000,
        }
    }
}

impl SupervisorConfig {
    pub fn validate(&self) -> ModelResult<()> {
        if self.solenoid_count == 0 || self.solenoid_count as usize > SOLENOID_SLOTS {
            return Err(ModelError::InvalidArg {
                what: "solenoid_count must be 1..=3",
            });
        }
        if self.travel_time_ms == 0 {
            return Err(ModelError::InvalidArg {
                what: "travel_time_ms must be positive",
            });
        }
        Ok(())
    }
}

/// I/O terminals of the supervisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SupervisorIo {
    /// Solenoid commands, one per role slot.
    pub solenoid_cmds: [bool; SOLENOID_SLOTS],
    /// Open limit switch. Wired through the point interface but not part of
    /// the transition logic.
    pub ls_open: bool,
    /// Close limit switch. Wired, unused by transitions.
    pub ls_close: bool,
    /// Edge-triggered fault reset; consumed when acted on.
    pub reset_cmd: bool,
    /// Output stage towards the solenoids.
    pub solenoid_outputs: [bool; SOLENOID_SLOTS],
    /// True iff the valve is travelling.
    pub valve_moving: bool,
    /// Level fault output.
    pub fault: bool,
}

/// Internal supervisor state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupervisorState {
    pub current_state: ValveState,
    /// Accumulated time in the current travel state, ms of simulated cycles.
    pub state_timer_ms: u32,
    pub esd_latched: bool,
}

/// On/off valve supervisor.
#[derive(Debug, Clone)]
pub struct ValveSupervisor {
    pub config: SupervisorConfig,
    pub io: SupervisorIo,
    state: SupervisorState,
}

impl ValveSupervisor {
    pub fn new(config: SupervisorConfig) -> ModelResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            io: SupervisorIo::default(),
            state: SupervisorState {
                current_state: ValveState::Closed,
                state_timer_ms: 0,
                esd_latched: false,
            },
        })
    }

    pub fn state(&self) -> &SupervisorState {
        &self.state
    }

    /// Restore the state machine from a raw state value. Unknown values take
    /// the defensive path: the supervisor faults and latches.
    pub fn restore_state(&mut self, raw: u8) {
        match ValveState::from_raw(raw) {
            Some(state) => {
                self.state.current_state = state;
            }
            None => {
                self.state.current_state = ValveState::Fault;
                self.io.fault = true;
                if self.config.esd_latching {
                    self.state.esd_latched = true;
                }
            }
        }
        self.state.state_timer_ms = 0;
        self.sync_outputs();
    }

    /// AND of the first `solenoid_count` command inputs.
    fn all_energized(&self) -> bool {
        self.io.solenoid_cmds[..self.config.solenoid_count.min(SOLENOID_SLOTS as u8) as usize]
            .iter()
            .all(|&cmd| cmd)
    }

    /// Derive the level outputs from the current state: `valve_moving` holds
    /// exactly in the travel states, and the output stage echoes the voting
    /// commands except in fault, where it de-energizes.
    fn sync_outputs(&mut self) {
        self.io.valve_moving = matches!(
            self.state.current_state,
            ValveState::Opening | ValveState::Closing
        );
        let faulted = self.state.current_state == ValveState::Fault;
        let voting = self.config.solenoid_count.min(SOLENOID_SLOTS as u8) as usize;
        for slot in 0..SOLENOID_SLOTS {
            self.io.solenoid_outputs[slot] =
                !faulted && slot < voting && self.io.solenoid_cmds[slot];
        }
    }
}

impl CyclicModel for ValveSupervisor {
    fn update(&mut self, cycle: CycleTime) {
        let energized = self.all_energized();

        match self.state.current_state {
            ValveState::Closed => {
                if energized {
                    self.state.current_state = ValveState::Opening;
                    self.state.state_timer_ms = 0;
                }
            }
            ValveState::Opening => {
                self.state.state_timer_ms =
                    self.state.state_timer_ms.saturating_add(cycle.millis());
                if self.state.state_timer_ms >= self.config.travel_time_ms {
                    self.state.current_state = ValveState::Open;
                }
            }
            ValveState::Open => {
                if !energized {
                    self.state.current_state = ValveState::Closing;
                    self.state.state_timer_ms = 0;
                }
            }
            ValveState::Closing => {
                self.state.state_timer_ms =
                    self.state.state_timer_ms.saturating_add(cycle.millis());
                if self.state.state_timer_ms >= self.config.travel_time_ms {
                    self.state.current_state = ValveState::Closed;
                }
            }
            ValveState::Fault => {
                if self.io.reset_cmd {
                    self.state.current_state = ValveState::Closed;
                    self.state.state_timer_ms = 0;
                    self.state.esd_latched = false;
                    self.io.fault = false;
                    // Edge-triggered: the pulse is consumed here.
                    self.io.reset_cmd = false;
                }
            }
        }

        self.sync_outputs();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cycle_ms(ms: u32) -> CycleTime {
        CycleTime::new(ms).unwrap()
    }

    fn supervisor(travel_time_ms: u32) -> ValveSupervisor {
        ValveSupervisor::new(SupervisorConfig {
            travel_time_ms,
            ..SupervisorConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn stays_closed_without_full_vote() {
        let mut sv = supervisor(500);
        sv.io.solenoid_cmds = [true, true, false];
        for _ in 0..10 {
            sv.update(cycle_ms(100));
        }
        assert_eq!(sv.state().current_state, ValveState::Closed);
        assert!(!sv.io.valve_moving);
    }

    #[test]
    fn opens_exactly_at_travel_time() {
        let mut sv = supervisor(500);
        sv.io.solenoid_cmds = [true, true, true];

        // First cycle: Closed -> Opening.
        sv.update(cycle_ms(100));
        assert_eq!(sv.state().current_state, ValveState::Opening);
        assert!(sv.io.valve_moving);

        // Four more cycles accumulate 400 ms: still travelling.
        for _ in 0..4 {
            sv.update(cycle_ms(100));
            assert_ne!(sv.state().current_state, ValveState::Open);
        }

        // Fifth accumulating cycle reaches 500 ms: open.
        sv.update(cycle_ms(100));
        assert_eq!(sv.state().current_state, ValveState::Open);
        assert!(!sv.io.valve_moving);
    }

    #[test]
    fn closes_when_any_solenoid_drops() {
        let mut sv = supervisor(200);
        sv.io.solenoid_cmds = [true, true, true];
        for _ in 0..4 {
            sv.update(cycle_ms(100));
        }
        assert_eq!(sv.state().current_state, ValveState::Open);

        sv.io.solenoid_cmds[SolenoidRole::Psd as usize] = false;
        sv.update(cycle_ms(100));
        assert_eq!(sv.state().current_state, ValveState::Closing);
        assert!(sv.io.valve_moving);

        sv.update(cycle_ms(100));
        sv.update(cycle_ms(100));
        assert_eq!(sv.state().current_state, ValveState::Closed);
        assert!(!sv.io.valve_moving);
    }

    #[test]
    fn timer_resets_on_each_travel_entry() {
        let mut sv = supervisor(300);
        sv.io.solenoid_cmds = [true, true, true];
        sv.update(cycle_ms(100)); // -> Opening
        sv.update(cycle_ms(100)); // timer 100
        assert_eq!(sv.state().state_timer_ms, 100);

        // Dropping the vote mid-travel does not abort the stroke in this
        // model; the valve finishes opening, then closes with a fresh timer.
        sv.update(cycle_ms(100));
        sv.update(cycle_ms(100)); // timer 300 -> Open
        assert_eq!(sv.state().current_state, ValveState::Open);

        sv.io.solenoid_cmds = [false, false, false];
        sv.update(cycle_ms(100)); // -> Closing
        assert_eq!(sv.state().state_timer_ms, 0);
    }

    #[test]
    fn reduced_vote_count_ignores_spare_slots() {
        let mut sv = ValveSupervisor::new(SupervisorConfig {
            solenoid_count: 1,
            travel_time_ms: 100,
            ..SupervisorConfig::default()
        })
        .unwrap();

        // Only the ESD slot votes; the others stay de-energized.
        sv.io.solenoid_cmds = [true, false, false];
        sv.update(cycle_ms(100));
        assert_eq!(sv.state().current_state, ValveState::Opening);
        sv.update(cycle_ms(100));
        assert_eq!(sv.state().current_state, ValveState::Open);
    }

    #[test]
    fn unknown_raw_state_faults() {
        let mut sv = supervisor(500);
        sv.restore_state(99);
        assert_eq!(sv.state().current_state, ValveState::Fault);
        assert!(sv.io.fault);
        assert!(!sv.io.valve_moving);
    }

    #[test]
    fn fault_latches_until_reset_pulse() {
        let mut sv = supervisor(500);
        sv.restore_state(255);
        assert_eq!(sv.state().current_state, ValveState::Fault);

        // Commands alone never clear a latched fault.
        sv.io.solenoid_cmds = [true, true, true];
        for _ in 0..20 {
            sv.update(cycle_ms(100));
            assert_eq!(sv.state().current_state, ValveState::Fault);
            assert!(sv.io.fault);
        }

        // A single reset pulse clears and is consumed.
        sv.io.reset_cmd = true;
        sv.update(cycle_ms(100));
        assert_eq!(sv.state().current_state, ValveState::Closed);
        assert!(!sv.io.fault);
        assert!(!sv.io.reset_cmd);
    }

    #[test]
    fn fault_deenergizes_outputs() {
        let mut sv = supervisor(500);
        sv.io.solenoid_cmds = [true, true, true];
        sv.update(cycle_ms(100));
        assert_eq!(sv.io.solenoid_outputs, [true, true, true]);

        sv.restore_state(200);
        assert_eq!(sv.io.solenoid_outputs, [false, false, false]);
    }

    #[test]
    fn esd_latch_follows_config() {
        let mut sv = ValveSupervisor::new(SupervisorConfig {
            esd_latching: true,
            ..SupervisorConfig::default()
        })
        .unwrap();
        sv.restore_state(42);
        assert!(sv.state().esd_latched);

        sv.io.reset_cmd = true;
        sv.update(cycle_ms(100));
        assert!(!sv.state().esd_latched);
    }

    #[test]
    fn limit_switches_do_not_gate_transitions() {
        let mut sv = supervisor(200);
        sv.io.solenoid_cmds = [true, true, true];
        // Contradictory limit switch readings are carried, not interpreted.
        sv.io.ls_open = false;
        sv.io.ls_close = true;

        sv.update(cycle_ms(100));
        sv.update(cycle_ms(100));
        sv.update(cycle_ms(100));
        assert_eq!(sv.state().current_state, ValveState::Open);
        assert!(sv.io.ls_close);
    }

    #[test]
    fn invalid_config_rejected() {
        assert!(
            ValveSupervisor::new(SupervisorConfig {
                solenoid_count: 0,
                ..SupervisorConfig::default()
            })
            .is_err()
        );
        assert!(
            ValveSupervisor::new(SupervisorConfig {
                solenoid_count: 4,
                ..SupervisorConfig::default()
            })
            .is_err()
        );
        assert!(
            ValveSupervisor::new(SupervisorConfig {
                travel_time_ms: 0,
                ..SupervisorConfig::default()
            })
            .is_err()
        );
    }

    #[test]
    fn raw_state_round_trip() {
        for state in [
            ValveState::Closed,
            ValveState::Opening,
            ValveState::Open,
            ValveState::Closing,
            ValveState::Fault,
        ] {
            assert_eq!(ValveState::from_raw(state as u8), Some(state));
        }
        assert_eq!(ValveState::from_raw(5), None);
    }
}
