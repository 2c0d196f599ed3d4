//! Fixed-rate cooperative driver loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use ps_core::CycleClock;
use tracing::{debug, info};

use crate::error::{RuntimeError, RuntimeResult};
use crate::plant::Plant;
use crate::recorder::RunRecorder;

/// Options for a simulation run.
#[derive(Clone, Debug)]
pub struct RunOptions {
    /// Number of cycles to execute.
    pub max_cycles: u64,
    /// Record every N-th cycle (decimation).
    pub record_every: u64,
    /// Pace the loop against the wall clock instead of free-running.
    pub realtime: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            max_cycles: 600,
            record_every: 1,
            realtime: false,
        }
    }
}

/// Result of a completed (or interrupted) run.
#[derive(Clone, Debug)]
pub struct RunOutcome {
    /// Cycles actually executed.
    pub cycles: u64,
    /// Simulated time covered, seconds.
    pub sim_time_s: f64,
    /// True when the shutdown flag stopped the loop early.
    pub interrupted: bool,
}

/// Run the plant for `max_cycles` fixed cycles.
///
/// One cycle = drain external writes, update every model once, publish
/// state, record. The shutdown flag is polled once per cycle; no model ever
/// blocks or sleeps internally, so the optional real-time pacing sleeps only
/// here, in the loop driver.
pub fn run(
    plant: &mut Plant,
    opts: &RunOptions,
    shutdown: &AtomicBool,
    recorder: &mut RunRecorder,
) -> RuntimeResult<RunOutcome> {
    if opts.max_cycles == 0 {
        return Err(RuntimeError::InvalidInput(
            "max_cycles must be positive".to_string(),
        ));
    }
    if opts.record_every == 0 {
        return Err(RuntimeError::InvalidInput(
            "record_every must be positive".to_string(),
        ));
    }

    let cycle = plant.cycle();
    let cycle_duration = Duration::from_millis(u64::from(cycle.millis()));
    let mut clock = CycleClock::new(cycle);
    let mut interrupted = false;

    info!(
        cycle_ms = cycle.millis(),
        max_cycles = opts.max_cycles,
        realtime = opts.realtime,
        "starting run"
    );

    // Initial snapshot at t = 0.
    recorder.snapshot(plant.registry(), clock.elapsed_secs());

    while clock.cycles() < opts.max_cycles {
        if shutdown.load(Ordering::Relaxed) {
            interrupted = true;
            debug!(cycle = clock.cycles(), "shutdown flag observed");
            break;
        }

        let cycle_start = Instant::now();
        plant.step()?;
        clock.tick();

        if clock.cycles() % opts.record_every == 0 {
            recorder.snapshot(plant.registry(), clock.elapsed_secs());
        }

        if opts.realtime {
            let elapsed = cycle_start.elapsed();
            if elapsed < cycle_duration {
                std::thread::sleep(cycle_duration - elapsed);
            }
        }
    }

    // Always capture the final state.
    if clock.cycles() % opts.record_every != 0 {
        recorder.snapshot(plant.registry(), clock.elapsed_secs());
    }

    info!(
        cycles = clock.cycles(),
        sim_time_s = clock.elapsed_secs(),
        interrupted,
        "run finished"
    );

    Ok(RunOutcome {
        cycles: clock.cycles(),
        sim_time_s: clock.elapsed_secs(),
        interrupted,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlantConfig;

    #[test]
    fn run_rejects_zero_cycles() {
        let mut plant = Plant::from_config(&PlantConfig::default()).unwrap();
        let mut recorder = RunRecorder::new();
        let shutdown = AtomicBool::new(false);
        let opts = RunOptions {
            max_cycles: 0,
            ..RunOptions::default()
        };
        assert!(run(&mut plant, &opts, &shutdown, &mut recorder).is_err());
    }

    #[test]
    fn run_advances_simulated_time() {
        let mut plant = Plant::from_config(&PlantConfig::default()).unwrap();
        let mut recorder = RunRecorder::new();
        recorder.track_defaults(plant.registry()).unwrap();
        let shutdown = AtomicBool::new(false);
        let opts = RunOptions {
            max_cycles: 50,
            record_every: 10,
            realtime: false,
        };

        let outcome = run(&mut plant, &opts, &shutdown, &mut recorder).unwrap();
        assert_eq!(outcome.cycles, 50);
        assert!((outcome.sim_time_s - 5.0).abs() < 1e-9);
        assert!(!outcome.interrupted);
        // Initial snapshot + one per decimation boundary.
        assert_eq!(recorder.records().len(), 6);
    }

    #[test]
    fn shutdown_flag_stops_the_loop() {
        let mut plant = Plant::from_config(&PlantConfig::default()).unwrap();
        let mut recorder = RunRecorder::new();
        let shutdown = AtomicBool::new(true);

        let outcome = run(
            &mut plant,
            &RunOptions::default(),
            &shutdown,
            &mut recorder,
        )
        .unwrap();
        assert_eq!(outcome.cycles, 0);
        assert!(outcome.interrupted);
    }
}
