//! Plant configuration schema.

use std::fs;
use std::path::Path;

use ps_core::CycleTime;
use ps_models::{FlowValveConfig, InstrumentErrors, SeparatorConfig, SupervisorConfig, TransmitterConfig};
use serde::{Deserialize, Serialize};

use crate::error::{RuntimeError, RuntimeResult};

fn default_cycle_time_ms() -> u32 {
    CycleTime::DEFAULT_MILLIS
}

/// Top-level plant configuration, loadable from YAML.
///
/// Every section is optional and falls back to the model defaults, so an
/// empty document is a valid plant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantConfig {
    /// Fixed cycle period shared by the driver loop and every model, ms.
    #[serde(default = "default_cycle_time_ms")]
    pub cycle_time_ms: u32,
    #[serde(default)]
    pub flow_valve: FlowValveConfig,
    #[serde(default)]
    pub flow_valve_errors: InstrumentErrors,
    #[serde(default)]
    pub separator: SeparatorConfig,
    #[serde(default)]
    pub transmitter: TransmitterConfig,
    #[serde(default)]
    pub supervisor: SupervisorConfig,
}

impl Default for PlantConfig {
    fn default() -> Self {
        Self {
            cycle_time_ms: default_cycle_time_ms(),
            flow_valve: FlowValveConfig::default(),
            flow_valve_errors: InstrumentErrors::default(),
            separator: SeparatorConfig::default(),
            transmitter: TransmitterConfig::default(),
            supervisor: SupervisorConfig::default(),
        }
    }
}

impl PlantConfig {
    /// Validate every section against its model constraints.
    pub fn validate(&self) -> RuntimeResult<()> {
        self.cycle()?;
        self.flow_valve
            .validate()
            .map_err(|e| RuntimeError::Validation(format!("flow_valve: {e}")))?;
        self.flow_valve_errors
            .validate()
            .map_err(|e| RuntimeError::Validation(format!("flow_valve_errors: {e}")))?;
        self.separator
            .validate()
            .map_err(|e| RuntimeError::Validation(format!("separator: {e}")))?;
        self.transmitter
            .validate()
            .map_err(|e| RuntimeError::Validation(format!("transmitter: {e}")))?;
        self.supervisor
            .validate()
            .map_err(|e| RuntimeError::Validation(format!("supervisor: {e}")))?;
        Ok(())
    }

    /// The configured cycle time.
    pub fn cycle(&self) -> RuntimeResult<CycleTime> {
        CycleTime::new(self.cycle_time_ms)
            .map_err(|e| RuntimeError::Validation(format!("cycle_time_ms: {e}")))
    }
}

/// Load and validate a plant config from a YAML file.
pub fn load_plant_config(path: &Path) -> RuntimeResult<PlantConfig> {
    let text = fs::read_to_string(path).map_err(|source| RuntimeError::ConfigFileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let config: PlantConfig = serde_yaml::from_str(&text)?;
    config.validate()?;
    Ok(config)
}
