//! Integration test: full plant driven through the point surface.
//!
//! Exercises the supervisory contract end to end: external writes land on
//! model configs at the next cycle boundary, state re-publishes every cycle,
//! and invalid writes are rejected observably.

use ps_models::ValveState;
use ps_runtime::{Plant, PlantConfig, point_names};
use ps_points::PointValue;

fn plant() -> Plant {
    Plant::from_config(&PlantConfig::default()).expect("default plant must build")
}

fn read_f64(plant: &Plant, name: &str) -> f64 {
    let id = plant.registry().lookup(name).expect("point registered");
    plant
        .registry()
        .read(id)
        .expect("point readable")
        .as_f64()
        .expect("float point")
}

fn read_bool(plant: &Plant, name: &str) -> bool {
    let id = plant.registry().lookup(name).expect("point registered");
    plant
        .registry()
        .read(id)
        .expect("point readable")
        .as_bool()
        .expect("bool point")
}

fn read_u32(plant: &Plant, name: &str) -> u32 {
    let id = plant.registry().lookup(name).expect("point registered");
    plant
        .registry()
        .read(id)
        .expect("point readable")
        .as_u32()
        .expect("uint point")
}

fn write(plant: &mut Plant, name: &str, value: PointValue) {
    let id = plant.registry().lookup(name).expect("point registered");
    plant
        .registry_mut()
        .write(id, value)
        .expect("write accepted");
}

#[test]
fn every_semantic_field_has_one_point() {
    let plant = plant();
    // 10 valve + 9 separator + 13 transmitter + 17 supervisor points.
    assert_eq!(plant.registry().len(), 49);
}

#[test]
fn valve_flow_follows_point_writes() {
    let mut plant = plant();

    write(
        &mut plant,
        point_names::FV_CONTROL_SIGNAL,
        PointValue::Float(100.0),
    );
    write(
        &mut plant,
        point_names::FV_CHARACTERISTIC,
        PointValue::UInt(0),
    );
    write(
        &mut plant,
        point_names::FV_STICTION_THRESHOLD,
        PointValue::Float(0.0),
    );

    plant.step().unwrap();

    assert_eq!(read_f64(&plant, point_names::FV_VALVE_OPENING), 100.0);
    // kv 10, linear, 5 bar upstream: flow = 10 * sqrt(4) = 20.
    assert!((read_f64(&plant, point_names::FV_FLOW) - 20.0).abs() < 1e-9);
}

#[test]
fn writes_apply_at_cycle_boundaries_only() {
    let mut plant = plant();
    write(
        &mut plant,
        point_names::SEP_Q_IN_GAS,
        PointValue::Float(0.0),
    );

    // Queued but not yet applied: the model still holds its default.
    assert!((plant.separator().config.q_in_gas_m3s - 0.1).abs() < 1e-12);

    plant.step().unwrap();
    assert_eq!(plant.separator().config.q_in_gas_m3s, 0.0);
}

#[test]
fn separator_state_republishes_every_cycle() {
    let mut plant = plant();
    let h_before = read_f64(&plant, point_names::SEP_H_OIL);

    // Stop the inflows and open the dump valves: levels must fall.
    write(&mut plant, point_names::SEP_Q_IN_OIL, PointValue::Float(0.0));
    write(
        &mut plant,
        point_names::SEP_VALVE_OIL,
        PointValue::Float(100.0),
    );
    for _ in 0..50 {
        plant.step().unwrap();
    }

    let h_after = read_f64(&plant, point_names::SEP_H_OIL);
    assert!(h_after < h_before, "oil level should drain: {h_after} >= {h_before}");
    assert!(read_f64(&plant, point_names::SEP_PRESSURE) >= 101_325.0);
}

#[test]
fn shutdown_valve_opens_through_point_writes() {
    let mut plant = plant();
    write(
        &mut plant,
        point_names::SV_TRAVEL_TIME,
        PointValue::UInt(300),
    );
    write(&mut plant, point_names::SV_SOLENOID_ESD, PointValue::Bool(true));
    write(&mut plant, point_names::SV_SOLENOID_PSD, PointValue::Bool(true));
    write(&mut plant, point_names::SV_SOLENOID_PCS, PointValue::Bool(true));

    // Cycle 1: Closed -> Opening.
    plant.step().unwrap();
    assert_eq!(
        read_u32(&plant, point_names::SV_VALVE_STATE),
        ValveState::Opening as u8 as u32
    );
    assert!(read_bool(&plant, point_names::SV_VALVE_MOVING));
    assert!(read_bool(&plant, point_names::SV_OUT_ESD));

    // Travel completes after 300 ms of accumulated cycles.
    plant.step().unwrap();
    plant.step().unwrap();
    plant.step().unwrap();
    assert_eq!(
        read_u32(&plant, point_names::SV_VALVE_STATE),
        ValveState::Open as u8 as u32
    );
    assert!(!read_bool(&plant, point_names::SV_VALVE_MOVING));

    // Dropping one vote closes again.
    write(
        &mut plant,
        point_names::SV_SOLENOID_PCS,
        PointValue::Bool(false),
    );
    plant.step().unwrap();
    assert_eq!(
        read_u32(&plant, point_names::SV_VALVE_STATE),
        ValveState::Closing as u8 as u32
    );
}

#[test]
fn transmitter_mode_points_stay_mutually_exclusive() {
    let mut plant = plant();

    // Sawtooth is the default mode.
    assert!(read_bool(&plant, point_names::TX_SAWTOOTH_WAVE));
    assert!(!read_bool(&plant, point_names::TX_SINE_WAVE));

    write(&mut plant, point_names::TX_SINE_WAVE, PointValue::Bool(true));
    plant.step().unwrap();

    assert!(read_bool(&plant, point_names::TX_SINE_WAVE));
    assert!(!read_bool(&plant, point_names::TX_SAWTOOTH_WAVE));

    // Clearing the active mode falls back to the ramp walk.
    write(&mut plant, point_names::TX_SINE_WAVE, PointValue::Bool(false));
    plant.step().unwrap();
    assert!(!read_bool(&plant, point_names::TX_SINE_WAVE));
    assert!(!read_bool(&plant, point_names::TX_SAWTOOTH_WAVE));
}

#[test]
fn transmitter_runs_only_when_activated() {
    let mut plant = plant();

    for _ in 0..10 {
        plant.step().unwrap();
    }
    assert_eq!(read_f64(&plant, point_names::TX_SIMULATION_TIME), 0.0);

    write(
        &mut plant,
        point_names::TX_SIMULATION_ACTIVE,
        PointValue::Bool(true),
    );
    for _ in 0..10 {
        plant.step().unwrap();
    }
    assert!((read_f64(&plant, point_names::TX_SIMULATION_TIME) - 1.0).abs() < 1e-9);
    assert!(read_f64(&plant, point_names::TX_CURRENT_VALUE) > 0.0);
}

#[test]
fn rejected_writes_are_observable() {
    let mut plant = plant();
    let registry = plant.registry_mut();

    // Read-only state point.
    let flow = registry.lookup(point_names::FV_FLOW).unwrap();
    assert!(registry.write(flow, PointValue::Float(3.0)).is_err());

    // Wrong type.
    let signal = registry.lookup(point_names::FV_CONTROL_SIGNAL).unwrap();
    assert!(registry.write(signal, PointValue::Bool(true)).is_err());

    // Filtered step size.
    let step = registry.lookup(point_names::TX_STEP_SIZE).unwrap();
    assert!(registry.write(step, PointValue::Float(99.0)).is_err());

    // Filtered solenoid count.
    let count = registry.lookup(point_names::SV_SOLENOID_COUNT).unwrap();
    assert!(registry.write(count, PointValue::UInt(7)).is_err());

    assert_eq!(registry.rejected_total(), 4);
    assert_eq!(registry.rejected_writes(step).unwrap(), 1);

    // None of the rejected values reached a model.
    plant.step().unwrap();
    assert_eq!(plant.transmitter().config.step_size, 1.0);
    assert_eq!(plant.supervisor().config.solenoid_count, 3);
}

#[test]
fn fault_surfaces_and_reset_pulse_is_consumed() {
    let mut plant = plant();

    // Corrupted state restore takes the defensive path into Fault.
    plant.supervisor_mut().restore_state(99);
    plant.step().unwrap();
    assert_eq!(
        read_u32(&plant, point_names::SV_VALVE_STATE),
        ValveState::Fault as u8 as u32
    );
    assert!(read_bool(&plant, point_names::SV_FAULT));

    // Solenoid commands alone never clear the latch.
    write(&mut plant, point_names::SV_SOLENOID_ESD, PointValue::Bool(true));
    write(&mut plant, point_names::SV_SOLENOID_PSD, PointValue::Bool(true));
    write(&mut plant, point_names::SV_SOLENOID_PCS, PointValue::Bool(true));
    for _ in 0..5 {
        plant.step().unwrap();
        assert!(read_bool(&plant, point_names::SV_FAULT));
    }

    // One reset pulse exits the fault and is consumed on the same cycle.
    write(
        &mut plant,
        point_names::SV_RESET_LATCH,
        PointValue::Bool(true),
    );
    plant.step().unwrap();
    assert!(!read_bool(&plant, point_names::SV_FAULT));
    assert!(!read_bool(&plant, point_names::SV_RESET_LATCH));
    assert_eq!(
        read_u32(&plant, point_names::SV_VALVE_STATE),
        ValveState::Closed as u8 as u32
    );
}
