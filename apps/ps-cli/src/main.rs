use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;

use clap::{Parser, Subcommand};
use ps_points::{Access, PointValue};
use ps_runtime::{
    Plant, PlantConfig, RunOptions, RunRecorder, RuntimeResult, load_plant_config, run,
};

#[derive(Parser)]
#[command(name = "ps-cli")]
#[command(about = "procsim CLI - process equipment simulation tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a plant config file
    Validate {
        /// Path to the plant YAML file
        config_path: PathBuf,
    },
    /// List the registered points of a plant
    Points {
        /// Path to the plant YAML file (defaults used when omitted)
        config_path: Option<PathBuf>,
    },
    /// Run a simulation
    Run {
        /// Path to the plant YAML file (defaults used when omitted)
        config_path: Option<PathBuf>,
        /// Simulated duration in seconds
        #[arg(long, default_value_t = 60.0)]
        duration: f64,
        /// Record every N-th cycle
        #[arg(long, default_value_t = 1)]
        record_every: u64,
        /// Pace the loop against the wall clock
        #[arg(long)]
        realtime: bool,
        /// Directory to save manifest.json and timeseries.csv
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> RuntimeResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { config_path } => cmd_validate(&config_path),
        Commands::Points { config_path } => cmd_points(config_path.as_deref()),
        Commands::Run {
            config_path,
            duration,
            record_every,
            realtime,
            output,
        } => cmd_run(
            config_path.as_deref(),
            duration,
            record_every,
            realtime,
            output.as_deref(),
        ),
    }
}

fn load_or_default(config_path: Option<&Path>) -> RuntimeResult<PlantConfig> {
    match config_path {
        Some(path) => load_plant_config(path),
        None => Ok(PlantConfig::default()),
    }
}

fn cmd_validate(config_path: &Path) -> RuntimeResult<()> {
    println!("Validating plant config: {}", config_path.display());
    let config = load_plant_config(config_path)?;
    println!("✓ Config is valid (cycle time {} ms)", config.cycle_time_ms);
    Ok(())
}

fn cmd_points(config_path: Option<&Path>) -> RuntimeResult<()> {
    let config = load_or_default(config_path)?;
    let plant = Plant::from_config(&config)?;

    println!("Registered points ({}):", plant.registry().len());
    for (id, entry) in plant.registry().iter() {
        let access = match entry.access {
            Access::ReadOnly => "ro",
            Access::ReadWrite => "rw",
        };
        println!(
            "  [{:>2}] {:<45} {} {}",
            id.value(),
            entry.name,
            access,
            format_value(&entry.value)
        );
    }
    Ok(())
}

fn cmd_run(
    config_path: Option<&Path>,
    duration: f64,
    record_every: u64,
    realtime: bool,
    output: Option<&Path>,
) -> RuntimeResult<()> {
    let config = load_or_default(config_path)?;
    let mut plant = Plant::from_config(&config)?;

    let cycle_s = plant.cycle().as_secs_f64();
    let max_cycles = (duration / cycle_s).ceil() as u64;
    println!(
        "Running plant for {:.1} s ({} cycles of {} ms){}",
        duration,
        max_cycles,
        plant.cycle().millis(),
        if realtime { ", real-time" } else { "" }
    );

    let mut recorder = RunRecorder::new();
    recorder.track_defaults(plant.registry())?;

    let shutdown = AtomicBool::new(false);
    let opts = RunOptions {
        max_cycles,
        record_every,
        realtime,
    };
    let outcome = run(&mut plant, &opts, &shutdown, &mut recorder)?;

    println!(
        "✓ Run completed: {} cycles, {:.1} s simulated",
        outcome.cycles, outcome.sim_time_s
    );
    print_plant_summary(&plant);

    if let Some(dir) = output {
        let manifest = recorder.manifest(plant.cycle().millis(), outcome.cycles);
        recorder.save(dir, &manifest)?;
        println!(
            "✓ Saved {} records to {}",
            recorder.records().len(),
            dir.display()
        );
    }

    Ok(())
}

fn print_plant_summary(plant: &Plant) {
    let fv = plant.flow_valve().state();
    println!("\nFlow valve:");
    println!("  opening: {:.2} %", fv.valve_opening);
    println!("  flow:    {:.3}", fv.flow);

    let sep = plant.separator().state();
    println!("Separator:");
    println!("  h_oil:    {:.3} m", sep.h_oil_m);
    println!("  h_water:  {:.3} m", sep.h_water_m);
    println!("  pressure: {:.0} Pa", sep.pressure_pa);

    let tx = plant.transmitter().state();
    println!("Transmitter:");
    println!("  value: {:.3} (fault: {})", tx.current_value, tx.fault);

    let sv = plant.supervisor();
    println!("Shutdown valve:");
    println!(
        "  state: {} (moving: {}, fault: {})",
        sv.state().current_state.as_str(),
        sv.io.valve_moving,
        sv.io.fault
    );

    let rejected = plant.registry().rejected_total();
    if rejected > 0 {
        println!("Rejected writes: {rejected}");
    }
}

fn format_value(value: &PointValue) -> String {
    match value {
        PointValue::Float(v) => format!("{v}"),
        PointValue::Bool(v) => format!("{v}"),
        PointValue::UInt(v) => format!("{v}"),
    }
}
