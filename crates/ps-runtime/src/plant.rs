//! Plant assembly: owned model instances bound to the point registry.
//!
//! The plant owns one instance of each process model plus the registry, and
//! translates between the two: external point writes land on model Config
//! fields at the top of the cycle, model State is re-published after every
//! update. Point names resolve to stable ids exactly once, at registration.

use ps_core::CycleTime;
use ps_models::{
    CyclicModel, FaultInject, FlowValveModel, SeparatorModel, SolenoidRole, TransmitterModel,
    ValveCharacteristic, ValveSupervisor, WaveMode,
};
use ps_points::{Access, PointId, PointRegistry, PointValue, WriteRule};

use crate::config::PlantConfig;
use crate::error::RuntimeResult;

/// Canonical point names. Grouping is a naming convention only; behavior
/// lives entirely in the id bindings below.
pub mod point_names {
    // Flow control valve
    pub const FV_CONTROL_SIGNAL: &str = "flow_valve/config/control_signal";
    pub const FV_UPSTREAM_PRESSURE: &str = "flow_valve/config/upstream_pressure";
    pub const FV_KV: &str = "flow_valve/config/kv";
    pub const FV_CHARACTERISTIC: &str = "flow_valve/config/characteristic";
    pub const FV_STICTION_THRESHOLD: &str = "flow_valve/errors/stiction_threshold";
    pub const FV_DEAD_TIME: &str = "flow_valve/errors/dead_time";
    pub const FV_HYSTERESIS: &str = "flow_valve/errors/hysteresis";
    pub const FV_POSITIONER_ERROR: &str = "flow_valve/errors/positioner_error";
    pub const FV_VALVE_OPENING: &str = "flow_valve/status/valve_opening";
    pub const FV_FLOW: &str = "flow_valve/status/flow";

    // Separator
    pub const SEP_Q_IN_OIL: &str = "separator/config/q_in_oil";
    pub const SEP_Q_IN_WATER: &str = "separator/config/q_in_water";
    pub const SEP_Q_IN_GAS: &str = "separator/config/q_in_gas";
    pub const SEP_VALVE_OIL: &str = "separator/config/valve_oil";
    pub const SEP_VALVE_WATER: &str = "separator/config/valve_water";
    pub const SEP_VALVE_GAS: &str = "separator/config/valve_gas";
    pub const SEP_H_OIL: &str = "separator/state/h_oil";
    pub const SEP_H_WATER: &str = "separator/state/h_water";
    pub const SEP_PRESSURE: &str = "separator/state/pressure";

    // Transmitter
    pub const TX_MIN_RANGE: &str = "transmitter/config/min_range";
    pub const TX_MAX_RANGE: &str = "transmitter/config/max_range";
    pub const TX_MIN_SCALE: &str = "transmitter/config/min_scale";
    pub const TX_MAX_SCALE: &str = "transmitter/config/max_scale";
    pub const TX_STEP_SIZE: &str = "transmitter/config/step_size";
    pub const TX_SIMULATION_ACTIVE: &str = "transmitter/config/simulation_active";
    pub const TX_SINE_WAVE: &str = "transmitter/config/sine_wave";
    pub const TX_SAWTOOTH_WAVE: &str = "transmitter/config/sawtooth_wave";
    pub const TX_OVERFLOW: &str = "transmitter/config/overflow";
    pub const TX_UNDERFLOW: &str = "transmitter/config/underflow";
    pub const TX_CURRENT_VALUE: &str = "transmitter/status/current_value";
    pub const TX_SIMULATION_TIME: &str = "transmitter/status/simulation_time";
    pub const TX_FAULT: &str = "transmitter/status/fault";

    // Shutdown valve supervisor
    pub const SV_TRAVEL_TIME: &str = "shutdown_valve/params/travel_time";
    pub const SV_ESD_LATCHING: &str = "shutdown_valve/params/esd_latching";
    pub const SV_SOLENOID_COUNT: &str = "shutdown_valve/params/solenoid_count";
    pub const SV_SOLENOID_ESD: &str = "shutdown_valve/control/solenoid_esd";
    pub const SV_SOLENOID_PSD: &str = "shutdown_valve/control/solenoid_psd";
    pub const SV_SOLENOID_PCS: &str = "shutdown_valve/control/solenoid_pcs";
    pub const SV_RESET_LATCH: &str = "shutdown_valve/control/reset_latch";
    pub const SV_LS_OPEN: &str = "shutdown_valve/control/ls_open";
    pub const SV_LS_CLOSE: &str = "shutdown_valve/control/ls_close";
    pub const SV_VALVE_STATE: &str = "shutdown_valve/status/valve_state";
    pub const SV_STATE_TIMER: &str = "shutdown_valve/status/state_timer";
    pub const SV_VALVE_MOVING: &str = "shutdown_valve/status/valve_moving";
    pub const SV_FAULT: &str = "shutdown_valve/status/fault";
    pub const SV_ESD_LATCHED: &str = "shutdown_valve/status/esd_latched";
    pub const SV_OUT_ESD: &str = "shutdown_valve/status/solenoid_out_esd";
    pub const SV_OUT_PSD: &str = "shutdown_valve/status/solenoid_out_psd";
    pub const SV_OUT_PCS: &str = "shutdown_valve/status/solenoid_out_pcs";

    /// Points the run recorder tracks when none are named explicitly.
    pub const DEFAULT_TRACKED: &[&str] = &[
        FV_VALVE_OPENING,
        FV_FLOW,
        SEP_H_OIL,
        SEP_H_WATER,
        SEP_PRESSURE,
        TX_CURRENT_VALUE,
        TX_FAULT,
        SV_VALVE_STATE,
        SV_VALVE_MOVING,
        SV_FAULT,
    ];
}

#[derive(Debug, Clone, Copy)]
struct FlowValveIds {
    control_signal: PointId,
    upstream_pressure: PointId,
    kv: PointId,
    characteristic: PointId,
    stiction_threshold: PointId,
    dead_time: PointId,
    hysteresis: PointId,
    positioner_error: PointId,
    valve_opening: PointId,
    flow: PointId,
}

#[derive(Debug, Clone, Copy)]
struct SeparatorIds {
    q_in_oil: PointId,
    q_in_water: PointId,
    q_in_gas: PointId,
    valve_oil: PointId,
    valve_water: PointId,
    valve_gas: PointId,
    h_oil: PointId,
    h_water: PointId,
    pressure: PointId,
}

#[derive(Debug, Clone, Copy)]
struct TransmitterIds {
    min_range: PointId,
    max_range: PointId,
    min_scale: PointId,
    max_scale: PointId,
    step_size: PointId,
    simulation_active: PointId,
    sine_wave: PointId,
    sawtooth_wave: PointId,
    overflow: PointId,
    underflow: PointId,
    current_value: PointId,
    simulation_time: PointId,
    fault: PointId,
}

#[derive(Debug, Clone, Copy)]
struct SupervisorIds {
    travel_time: PointId,
    esd_latching: PointId,
    solenoid_count: PointId,
    solenoid_esd: PointId,
    solenoid_psd: PointId,
    solenoid_pcs: PointId,
    reset_latch: PointId,
    ls_open: PointId,
    ls_close: PointId,
    valve_state: PointId,
    state_timer: PointId,
    valve_moving: PointId,
    fault: PointId,
    esd_latched: PointId,
    out_esd: PointId,
    out_psd: PointId,
    out_pcs: PointId,
}

#[derive(Debug, Clone, Copy)]
struct PlantIds {
    flow_valve: FlowValveIds,
    separator: SeparatorIds,
    transmitter: TransmitterIds,
    supervisor: SupervisorIds,
}

/// The assembled plant: four owned models and their point bindings.
#[derive(Debug)]
pub struct Plant {
    cycle: CycleTime,
    registry: PointRegistry,
    flow_valve: FlowValveModel,
    separator: SeparatorModel,
    transmitter: TransmitterModel,
    supervisor: ValveSupervisor,
    ids: PlantIds,
}

impl Plant {
    /// Build the plant from a validated configuration and register every
    /// Config/State field as one point.
    pub fn from_config(config: &PlantConfig) -> RuntimeResult<Self> {
        config.validate()?;
        let cycle = config.cycle()?;

        let flow_valve =
            FlowValveModel::new(config.flow_valve.clone(), config.flow_valve_errors.clone())?;
        let separator = SeparatorModel::new(config.separator.clone(), Default::default())?;
        let transmitter = TransmitterModel::new(config.transmitter.clone())?;
        let supervisor = ValveSupervisor::new(config.supervisor.clone())?;

        let mut registry = PointRegistry::new();
        let ids = PlantIds {
            flow_valve: Self::register_flow_valve(&mut registry, &flow_valve)?,
            separator: Self::register_separator(&mut registry, &separator)?,
            transmitter: Self::register_transmitter(&mut registry, &transmitter)?,
            supervisor: Self::register_supervisor(&mut registry, &supervisor)?,
        };

        Ok(Self {
            cycle,
            registry,
            flow_valve,
            separator,
            transmitter,
            supervisor,
            ids,
        })
    }

    fn register_flow_valve(
        registry: &mut PointRegistry,
        model: &FlowValveModel,
    ) -> RuntimeResult<FlowValveIds> {
        use point_names::*;
        let rw = Access::ReadWrite;
        let ro = Access::ReadOnly;
        let any = WriteRule::Any;

        let characteristic_raw = match model.config.characteristic {
            ValveCharacteristic::Linear => 0,
            ValveCharacteristic::EqualPercentage => 1,
        };

        Ok(FlowValveIds {
            control_signal: registry.register(
                FV_CONTROL_SIGNAL,
                rw,
                PointValue::Float(model.config.control_signal),
                any,
            )?,
            upstream_pressure: registry.register(
                FV_UPSTREAM_PRESSURE,
                rw,
                PointValue::Float(model.config.upstream_pressure_bar),
                any,
            )?,
            kv: registry.register(FV_KV, rw, PointValue::Float(model.config.kv), any)?,
            characteristic: registry.register(
                FV_CHARACTERISTIC,
                rw,
                PointValue::UInt(characteristic_raw),
                any,
            )?,
            stiction_threshold: registry.register(
                FV_STICTION_THRESHOLD,
                rw,
                PointValue::Float(model.errors.stiction_threshold),
                any,
            )?,
            dead_time: registry.register(
                FV_DEAD_TIME,
                rw,
                PointValue::Float(model.errors.dead_time_s),
                any,
            )?,
            hysteresis: registry.register(
                FV_HYSTERESIS,
                rw,
                PointValue::Float(model.errors.hysteresis_percent),
                any,
            )?,
            positioner_error: registry.register(
                FV_POSITIONER_ERROR,
                rw,
                PointValue::Float(model.errors.positioner_error_percent),
                any,
            )?,
            valve_opening: registry.register(
                FV_VALVE_OPENING,
                ro,
                PointValue::Float(model.state().valve_opening),
                any,
            )?,
            flow: registry.register(FV_FLOW, ro, PointValue::Float(model.state().flow), any)?,
        })
    }

    fn register_separator(
        registry: &mut PointRegistry,
        model: &SeparatorModel,
    ) -> RuntimeResult<SeparatorIds> {
        use point_names::*;
        let rw = Access::ReadWrite;
        let ro = Access::ReadOnly;
        let any = WriteRule::Any;
        let config = &model.config;
        let state = model.state();

        Ok(SeparatorIds {
            q_in_oil: registry.register(
                SEP_Q_IN_OIL,
                rw,
                PointValue::Float(config.q_in_oil_m3s),
                any,
            )?,
            q_in_water: registry.register(
                SEP_Q_IN_WATER,
                rw,
                PointValue::Float(config.q_in_water_m3s),
                any,
            )?,
            q_in_gas: registry.register(
                SEP_Q_IN_GAS,
                rw,
                PointValue::Float(config.q_in_gas_m3s),
                any,
            )?,
            valve_oil: registry.register(
                SEP_VALVE_OIL,
                rw,
                PointValue::Float(config.valve_oil_pct),
                any,
            )?,
            valve_water: registry.register(
                SEP_VALVE_WATER,
                rw,
                PointValue::Float(config.valve_water_pct),
                any,
            )?,
            valve_gas: registry.register(
                SEP_VALVE_GAS,
                rw,
                PointValue::Float(config.valve_gas_pct),
                any,
            )?,
            h_oil: registry.register(SEP_H_OIL, ro, PointValue::Float(state.h_oil_m), any)?,
            h_water: registry.register(SEP_H_WATER, ro, PointValue::Float(state.h_water_m), any)?,
            pressure: registry.register(
                SEP_PRESSURE,
                ro,
                PointValue::Float(state.pressure_pa),
                any,
            )?,
        })
    }

    fn register_transmitter(
        registry: &mut PointRegistry,
        model: &TransmitterModel,
    ) -> RuntimeResult<TransmitterIds> {
        use point_names::*;
        let rw = Access::ReadWrite;
        let ro = Access::ReadOnly;
        let any = WriteRule::Any;
        let config = &model.config;

        Ok(TransmitterIds {
            min_range: registry.register(
                TX_MIN_RANGE,
                rw,
                PointValue::Float(config.min_range),
                any,
            )?,
            max_range: registry.register(
                TX_MAX_RANGE,
                rw,
                PointValue::Float(config.max_range),
                any,
            )?,
            min_scale: registry.register(
                TX_MIN_SCALE,
                rw,
                PointValue::Float(config.min_scale),
                any,
            )?,
            max_scale: registry.register(
                TX_MAX_SCALE,
                rw,
                PointValue::Float(config.max_scale),
                any,
            )?,
            // The only float point filtered on write rather than sanitized
            // on update.
            step_size: registry.register(
                TX_STEP_SIZE,
                rw,
                PointValue::Float(config.step_size),
                WriteRule::FloatRange {
                    min: ps_models::transmitter::STEP_SIZE_MIN,
                    max: ps_models::transmitter::STEP_SIZE_MAX,
                },
            )?,
            simulation_active: registry.register(
                TX_SIMULATION_ACTIVE,
                rw,
                PointValue::Bool(config.simulation_active),
                any,
            )?,
            sine_wave: registry.register(
                TX_SINE_WAVE,
                rw,
                PointValue::Bool(config.wave_mode == WaveMode::Sine),
                any,
            )?,
            sawtooth_wave: registry.register(
                TX_SAWTOOTH_WAVE,
                rw,
                PointValue::Bool(config.wave_mode == WaveMode::Sawtooth),
                any,
            )?,
            overflow: registry.register(
                TX_OVERFLOW,
                rw,
                PointValue::Bool(config.fault_inject == FaultInject::Overflow),
                any,
            )?,
            underflow: registry.register(
                TX_UNDERFLOW,
                rw,
                PointValue::Bool(config.fault_inject == FaultInject::Underflow),
                any,
            )?,
            current_value: registry.register(
                TX_CURRENT_VALUE,
                ro,
                PointValue::Float(model.state().current_value),
                any,
            )?,
            simulation_time: registry.register(
                TX_SIMULATION_TIME,
                ro,
                PointValue::Float(model.state().simulation_time_s),
                any,
            )?,
            fault: registry.register(TX_FAULT, ro, PointValue::Bool(model.state().fault), any)?,
        })
    }

    fn register_supervisor(
        registry: &mut PointRegistry,
        model: &ValveSupervisor,
    ) -> RuntimeResult<SupervisorIds> {
        use point_names::*;
        let rw = Access::ReadWrite;
        let ro = Access::ReadOnly;
        let any = WriteRule::Any;
        let io = &model.io;

        Ok(SupervisorIds {
            travel_time: registry.register(
                SV_TRAVEL_TIME,
                rw,
                PointValue::UInt(model.config.travel_time_ms),
                WriteRule::UIntRange {
                    min: 1,
                    max: u32::MAX,
                },
            )?,
            esd_latching: registry.register(
                SV_ESD_LATCHING,
                rw,
                PointValue::Bool(model.config.esd_latching),
                any,
            )?,
            solenoid_count: registry.register(
                SV_SOLENOID_COUNT,
                rw,
                PointValue::UInt(u32::from(model.config.solenoid_count)),
                WriteRule::UIntRange { min: 1, max: 3 },
            )?,
            solenoid_esd: registry.register(
                SV_SOLENOID_ESD,
                rw,
                PointValue::Bool(io.solenoid_cmds[SolenoidRole::Esd as usize]),
                any,
            )?,
            solenoid_psd: registry.register(
                SV_SOLENOID_PSD,
                rw,
                PointValue::Bool(io.solenoid_cmds[SolenoidRole::Psd as usize]),
                any,
            )?,
            solenoid_pcs: registry.register(
                SV_SOLENOID_PCS,
                rw,
                PointValue::Bool(io.solenoid_cmds[SolenoidRole::Pcs as usize]),
                any,
            )?,
            reset_latch: registry.register(
                SV_RESET_LATCH,
                rw,
                PointValue::Bool(io.reset_cmd),
                any,
            )?,
            ls_open: registry.register(SV_LS_OPEN, rw, PointValue::Bool(io.ls_open), any)?,
            ls_close: registry.register(SV_LS_CLOSE, rw, PointValue::Bool(io.ls_close), any)?,
            valve_state: registry.register(
                SV_VALVE_STATE,
                ro,
                PointValue::UInt(u32::from(model.state().current_state as u8)),
                any,
            )?,
            state_timer: registry.register(
                SV_STATE_TIMER,
                ro,
                PointValue::UInt(model.state().state_timer_ms),
                any,
            )?,
            valve_moving: registry.register(
                SV_VALVE_MOVING,
                ro,
                PointValue::Bool(io.valve_moving),
                any,
            )?,
            fault: registry.register(SV_FAULT, ro, PointValue::Bool(io.fault), any)?,
            esd_latched: registry.register(
                SV_ESD_LATCHED,
                ro,
                PointValue::Bool(model.state().esd_latched),
                any,
            )?,
            out_esd: registry.register(
                SV_OUT_ESD,
                ro,
                PointValue::Bool(io.solenoid_outputs[SolenoidRole::Esd as usize]),
                any,
            )?,
            out_psd: registry.register(
                SV_OUT_PSD,
                ro,
                PointValue::Bool(io.solenoid_outputs[SolenoidRole::Psd as usize]),
                any,
            )?,
            out_pcs: registry.register(
                SV_OUT_PCS,
                ro,
                PointValue::Bool(io.solenoid_outputs[SolenoidRole::Pcs as usize]),
                any,
            )?,
        })
    }

    /// The fixed cycle this plant runs on.
    pub fn cycle(&self) -> CycleTime {
        self.cycle
    }

    pub fn registry(&self) -> &PointRegistry {
        &self.registry
    }

    /// External write surface; the protocol layer calls through this.
    pub fn registry_mut(&mut self) -> &mut PointRegistry {
        &mut self.registry
    }

    pub fn flow_valve(&self) -> &FlowValveModel {
        &self.flow_valve
    }

    pub fn separator(&self) -> &SeparatorModel {
        &self.separator
    }

    pub fn transmitter(&self) -> &TransmitterModel {
        &self.transmitter
    }

    pub fn supervisor(&self) -> &ValveSupervisor {
        &self.supervisor
    }

    /// Mutable supervisor access for host-side state restore.
    pub fn supervisor_mut(&mut self) -> &mut ValveSupervisor {
        &mut self.supervisor
    }

    /// One full cycle: apply queued writes, update every model once,
    /// re-publish state.
    pub fn step(&mut self) -> RuntimeResult<()> {
        self.apply_pending_writes()?;
        let cycle = self.cycle;
        self.flow_valve.update(cycle);
        self.separator.update(cycle);
        self.transmitter.update(cycle);
        self.supervisor.update(cycle);
        self.publish_state()
    }

    /// Drain queued external writes onto model Config fields.
    pub fn apply_pending_writes(&mut self) -> RuntimeResult<()> {
        for (id, value) in self.registry.drain_pending() {
            self.apply_write(id, value)?;
        }
        Ok(())
    }

    fn apply_write(&mut self, id: PointId, value: PointValue) -> RuntimeResult<()> {
        let ids = self.ids;

        // Flow valve
        if id == ids.flow_valve.control_signal {
            if let Some(v) = value.as_f64() {
                self.flow_valve.config.control_signal = v;
            }
        } else if id == ids.flow_valve.upstream_pressure {
            if let Some(v) = value.as_f64() {
                self.flow_valve.config.upstream_pressure_bar = v;
            }
        } else if id == ids.flow_valve.kv {
            if let Some(v) = value.as_f64() {
                self.flow_valve.config.kv = v;
            }
        } else if id == ids.flow_valve.characteristic {
            if let Some(v) = value.as_u32() {
                // 0 selects linear; any other value the equal-percentage trim.
                self.flow_valve.config.characteristic = if v == 0 {
                    ValveCharacteristic::Linear
                } else {
                    ValveCharacteristic::EqualPercentage
                };
            }
        } else if id == ids.flow_valve.stiction_threshold {
            if let Some(v) = value.as_f64() {
                self.flow_valve.errors.stiction_threshold = v;
            }
        } else if id == ids.flow_valve.dead_time {
            if let Some(v) = value.as_f64() {
                self.flow_valve.errors.dead_time_s = v;
            }
        } else if id == ids.flow_valve.hysteresis {
            if let Some(v) = value.as_f64() {
                self.flow_valve.errors.hysteresis_percent = v;
            }
        } else if id == ids.flow_valve.positioner_error {
            if let Some(v) = value.as_f64() {
                self.flow_valve.errors.positioner_error_percent = v;
            }
        }
        // Separator
        else if id == ids.separator.q_in_oil {
            if let Some(v) = value.as_f64() {
                self.separator.config.q_in_oil_m3s = v;
            }
        } else if id == ids.separator.q_in_water {
            if let Some(v) = value.as_f64() {
                self.separator.config.q_in_water_m3s = v;
            }
        } else if id == ids.separator.q_in_gas {
            if let Some(v) = value.as_f64() {
                self.separator.config.q_in_gas_m3s = v;
            }
        } else if id == ids.separator.valve_oil {
            if let Some(v) = value.as_f64() {
                self.separator.config.valve_oil_pct = v;
            }
        } else if id == ids.separator.valve_water {
            if let Some(v) = value.as_f64() {
                self.separator.config.valve_water_pct = v;
            }
        } else if id == ids.separator.valve_gas {
            if let Some(v) = value.as_f64() {
                self.separator.config.valve_gas_pct = v;
            }
        }
        // Transmitter
        else if id == ids.transmitter.min_range {
            if let Some(v) = value.as_f64() {
                self.transmitter.config.min_range = v;
            }
        } else if id == ids.transmitter.max_range {
            if let Some(v) = value.as_f64() {
                self.transmitter.config.max_range = v;
            }
        } else if id == ids.transmitter.min_scale {
            if let Some(v) = value.as_f64() {
                self.transmitter.config.min_scale = v;
            }
        } else if id == ids.transmitter.max_scale {
            if let Some(v) = value.as_f64() {
                self.transmitter.config.max_scale = v;
            }
        } else if id == ids.transmitter.step_size {
            if let Some(v) = value.as_f64() {
                self.transmitter.config.step_size = v;
            }
        } else if id == ids.transmitter.simulation_active {
            if let Some(v) = value.as_bool() {
                self.transmitter.config.simulation_active = v;
            }
        } else if id == ids.transmitter.sine_wave {
            if let Some(on) = value.as_bool() {
                let mode = &mut self.transmitter.config.wave_mode;
                if on {
                    *mode = WaveMode::Sine;
                } else if *mode == WaveMode::Sine {
                    *mode = WaveMode::RampWalk;
                }
                self.sync_mode_points()?;
            }
        } else if id == ids.transmitter.sawtooth_wave {
            if let Some(on) = value.as_bool() {
                let mode = &mut self.transmitter.config.wave_mode;
                if on {
                    *mode = WaveMode::Sawtooth;
                } else if *mode == WaveMode::Sawtooth {
                    *mode = WaveMode::RampWalk;
                }
                self.sync_mode_points()?;
            }
        } else if id == ids.transmitter.overflow {
            if let Some(on) = value.as_bool() {
                let inject = &mut self.transmitter.config.fault_inject;
                if on {
                    *inject = FaultInject::Overflow;
                } else if *inject == FaultInject::Overflow {
                    *inject = FaultInject::None;
                }
                self.sync_mode_points()?;
            }
        } else if id == ids.transmitter.underflow {
            if let Some(on) = value.as_bool() {
                let inject = &mut self.transmitter.config.fault_inject;
                if on {
                    *inject = FaultInject::Underflow;
                } else if *inject == FaultInject::Underflow {
                    *inject = FaultInject::None;
                }
                self.sync_mode_points()?;
            }
        }
        // Supervisor
        else if id == ids.supervisor.travel_time {
            if let Some(v) = value.as_u32() {
                self.supervisor.config.travel_time_ms = v;
            }
        } else if id == ids.supervisor.esd_latching {
            if let Some(v) = value.as_bool() {
                self.supervisor.config.esd_latching = v;
            }
        } else if id == ids.supervisor.solenoid_count {
            if let Some(v) = value.as_u32() {
                self.supervisor.config.solenoid_count = v as u8;
            }
        } else if id == ids.supervisor.solenoid_esd {
            if let Some(v) = value.as_bool() {
                self.supervisor.io.solenoid_cmds[SolenoidRole::Esd as usize] = v;
            }
        } else if id == ids.supervisor.solenoid_psd {
            if let Some(v) = value.as_bool() {
                self.supervisor.io.solenoid_cmds[SolenoidRole::Psd as usize] = v;
            }
        } else if id == ids.supervisor.solenoid_pcs {
            if let Some(v) = value.as_bool() {
                self.supervisor.io.solenoid_cmds[SolenoidRole::Pcs as usize] = v;
            }
        } else if id == ids.supervisor.reset_latch {
            if let Some(v) = value.as_bool() {
                self.supervisor.io.reset_cmd = v;
            }
        } else if id == ids.supervisor.ls_open {
            if let Some(v) = value.as_bool() {
                self.supervisor.io.ls_open = v;
            }
        } else if id == ids.supervisor.ls_close {
            if let Some(v) = value.as_bool() {
                self.supervisor.io.ls_close = v;
            }
        }

        Ok(())
    }

    /// Re-publish the four boolean mode points from the config enums so the
    /// surface always reflects the mutually-exclusive selection.
    fn sync_mode_points(&mut self) -> RuntimeResult<()> {
        let mode = self.transmitter.config.wave_mode;
        let inject = self.transmitter.config.fault_inject;
        let tx = self.ids.transmitter;
        self.registry
            .publish(tx.sine_wave, PointValue::Bool(mode == WaveMode::Sine))?;
        self.registry
            .publish(tx.sawtooth_wave, PointValue::Bool(mode == WaveMode::Sawtooth))?;
        self.registry
            .publish(tx.overflow, PointValue::Bool(inject == FaultInject::Overflow))?;
        self.registry
            .publish(tx.underflow, PointValue::Bool(inject == FaultInject::Underflow))?;
        Ok(())
    }

    /// Publish every State-backed point from the freshly updated models.
    pub fn publish_state(&mut self) -> RuntimeResult<()> {
        let ids = self.ids;

        let fv = self.flow_valve.state();
        self.registry
            .publish(ids.flow_valve.valve_opening, PointValue::Float(fv.valve_opening))?;
        self.registry
            .publish(ids.flow_valve.flow, PointValue::Float(fv.flow))?;

        let sep = self.separator.state();
        self.registry
            .publish(ids.separator.h_oil, PointValue::Float(sep.h_oil_m))?;
        self.registry
            .publish(ids.separator.h_water, PointValue::Float(sep.h_water_m))?;
        self.registry
            .publish(ids.separator.pressure, PointValue::Float(sep.pressure_pa))?;

        let tx = self.transmitter.state();
        self.registry
            .publish(ids.transmitter.current_value, PointValue::Float(tx.current_value))?;
        self.registry.publish(
            ids.transmitter.simulation_time,
            PointValue::Float(tx.simulation_time_s),
        )?;
        self.registry
            .publish(ids.transmitter.fault, PointValue::Bool(tx.fault))?;

        let sv_state = *self.supervisor.state();
        let sv_io = self.supervisor.io;
        self.registry.publish(
            ids.supervisor.valve_state,
            PointValue::UInt(u32::from(sv_state.current_state as u8)),
        )?;
        self.registry.publish(
            ids.supervisor.state_timer,
            PointValue::UInt(sv_state.state_timer_ms),
        )?;
        self.registry
            .publish(ids.supervisor.valve_moving, PointValue::Bool(sv_io.valve_moving))?;
        self.registry
            .publish(ids.supervisor.fault, PointValue::Bool(sv_io.fault))?;
        self.registry.publish(
            ids.supervisor.esd_latched,
            PointValue::Bool(sv_state.esd_latched),
        )?;
        self.registry.publish(
            ids.supervisor.out_esd,
            PointValue::Bool(sv_io.solenoid_outputs[SolenoidRole::Esd as usize]),
        )?;
        self.registry.publish(
            ids.supervisor.out_psd,
            PointValue::Bool(sv_io.solenoid_outputs[SolenoidRole::Psd as usize]),
        )?;
        self.registry.publish(
            ids.supervisor.out_pcs,
            PointValue::Bool(sv_io.solenoid_outputs[SolenoidRole::Pcs as usize]),
        )?;
        // The reset pulse is consumed by the state machine; reflect that on
        // its control point.
        self.registry.publish(
            ids.supervisor.reset_latch,
            PointValue::Bool(sv_io.reset_cmd),
        )?;

        Ok(())
    }
}
