//! Run recording and export.

use std::fs;
use std::path::Path;

use ps_points::{PointId, PointRegistry, PointValue};
use serde::{Deserialize, Serialize};

use crate::error::RuntimeResult;

/// Manifest describing one recorded run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    /// UTC timestamp of the run, RFC 3339.
    pub timestamp: String,
    pub cycle_time_ms: u32,
    pub cycles: u64,
    /// Names of the tracked points, in column order.
    pub points: Vec<String>,
}

/// One recorded snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeseriesRecord {
    pub time_s: f64,
    /// Values of the tracked points, in track order.
    pub values: Vec<PointValue>,
}

/// Records tracked point values over a run.
#[derive(Debug, Default)]
pub struct RunRecorder {
    tracked: Vec<(PointId, String)>,
    records: Vec<TimeseriesRecord>,
}

impl RunRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a point by name. Unknown names are reported, not ignored.
    pub fn track(&mut self, registry: &PointRegistry, name: &str) -> RuntimeResult<()> {
        let id = registry.lookup(name).ok_or_else(|| {
            crate::error::RuntimeError::InvalidInput(format!("unknown point: {name}"))
        })?;
        self.tracked.push((id, name.to_string()));
        Ok(())
    }

    /// Track the default state-point selection.
    pub fn track_defaults(&mut self, registry: &PointRegistry) -> RuntimeResult<()> {
        for name in crate::plant::point_names::DEFAULT_TRACKED {
            self.track(registry, name)?;
        }
        Ok(())
    }

    pub fn tracked_names(&self) -> Vec<&str> {
        self.tracked.iter().map(|(_, name)| name.as_str()).collect()
    }

    /// Capture the current values of all tracked points.
    pub fn snapshot(&mut self, registry: &PointRegistry, time_s: f64) {
        if self.tracked.is_empty() {
            return;
        }
        let values = self
            .tracked
            .iter()
            .filter_map(|(id, _)| registry.read(*id).ok())
            .collect();
        self.records.push(TimeseriesRecord { time_s, values });
    }

    pub fn records(&self) -> &[TimeseriesRecord] {
        &self.records
    }

    /// Build the run manifest, stamped with the current UTC time.
    pub fn manifest(&self, cycle_time_ms: u32, cycles: u64) -> RunManifest {
        RunManifest {
            timestamp: chrono::Utc::now().to_rfc3339(),
            cycle_time_ms,
            cycles,
            points: self.tracked.iter().map(|(_, n)| n.clone()).collect(),
        }
    }

    /// Render the recorded series as CSV, one column per tracked point.
    pub fn to_csv(&self) -> String {
        let mut csv = String::from("time_s");
        for (_, name) in &self.tracked {
            csv.push(',');
            csv.push_str(name);
        }
        csv.push('\n');

        for record in &self.records {
            csv.push_str(&format!("{}", record.time_s));
            for value in &record.values {
                csv.push(',');
                csv.push_str(&csv_cell(value));
            }
            csv.push('\n');
        }
        csv
    }

    /// Save manifest.json and timeseries.csv under `dir`.
    pub fn save(&self, dir: &Path, manifest: &RunManifest) -> RuntimeResult<()> {
        fs::create_dir_all(dir)?;
        let manifest_json = serde_json::to_string_pretty(manifest)?;
        fs::write(dir.join("manifest.json"), manifest_json)?;
        fs::write(dir.join("timeseries.csv"), self.to_csv())?;
        Ok(())
    }
}

fn csv_cell(value: &PointValue) -> String {
    match value {
        PointValue::Float(v) => format!("{v}"),
        PointValue::Bool(v) => String::from(if *v { "1" } else { "0" }),
        PointValue::UInt(v) => format!("{v}"),
    }
}
