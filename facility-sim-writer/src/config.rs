// Facility Sim Writer - Run settings
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Run settings loaded from a JSON file.
//!
//! ```json
//! {
//!   "simulation_start_time": "2019-03-01T08:00:00.000",
//!   "simulation_time_step": 5,
//!   "frequency": 1.0,
//!   "max_ticks": 1000,
//!   "seed": 42,
//!   "catalog": "catalog.json",
//!   "sink": { "kind": "csv", "path": "values.csv" }
//! }
//! ```

use crate::error::WriterError;
use chrono::{NaiveDateTime, TimeZone, Utc};
use facility_sim::clock::wall_clock_seconds;
use facility_sim::{preset, Catalog};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Format of `simulation_start_time`, interpreted as UTC.
pub const START_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Default real seconds between ticks.
pub const DEFAULT_FREQUENCY: f64 = 5.0;

/// Default simulated seconds per tick.
pub const DEFAULT_TIME_STEP: f64 = 5.0;

/// Where generated values go.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SinkSettings {
    /// CSV file with a `facility,component,parameter,value,time` header.
    Csv { path: PathBuf },
    /// One JSON record per line on stdout.
    Stdout,
}

impl Default for SinkSettings {
    fn default() -> Self {
        SinkSettings::Stdout
    }
}

/// Settings of one writer run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunSettings {
    /// Simulated time of the first tick; the wall clock when absent.
    pub simulation_start_time: Option<String>,
    /// Simulated seconds added per tick.
    pub simulation_time_step: f64,
    /// Real seconds slept between ticks.
    pub frequency: f64,
    /// Stop after this many ticks; run until interrupted when absent.
    pub max_ticks: Option<u64>,
    /// Seed for reproducible runs.
    pub seed: Option<u64>,
    /// Catalog file; the machine-shop preset when absent.
    pub catalog: Option<PathBuf>,
    pub sink: SinkSettings,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            simulation_start_time: None,
            simulation_time_step: DEFAULT_TIME_STEP,
            frequency: DEFAULT_FREQUENCY,
            max_ticks: None,
            seed: None,
            catalog: None,
            sink: SinkSettings::default(),
        }
    }
}

impl RunSettings {
    /// Load and validate settings from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, WriterError> {
        let reader = BufReader::new(File::open(path)?);
        let settings: RunSettings = serde_json::from_reader(reader)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values the run loop cannot work with.
    pub fn validate(&self) -> Result<(), WriterError> {
        if !self.simulation_time_step.is_finite() || self.simulation_time_step < 0.0 {
            return Err(WriterError::InvalidSettings(format!(
                "simulation_time_step must be a non-negative number, got {}",
                self.simulation_time_step
            )));
        }
        if !self.frequency.is_finite() || self.frequency < 0.0 {
            return Err(WriterError::InvalidSettings(format!(
                "frequency must be a non-negative number, got {}",
                self.frequency
            )));
        }
        if let Some(value) = &self.simulation_start_time {
            parse_start_time(value)?;
        }
        Ok(())
    }

    /// Simulated time of the first tick in seconds since the Unix epoch.
    pub fn start_time(&self) -> Result<f64, WriterError> {
        match &self.simulation_start_time {
            Some(value) => parse_start_time(value),
            None => Ok(wall_clock_seconds()),
        }
    }

    /// Real pause between ticks.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs_f64(self.frequency)
    }

    /// Catalog from file, or the machine-shop preset.
    pub fn load_catalog(&self) -> Result<Catalog, WriterError> {
        match &self.catalog {
            Some(path) => Ok(Catalog::from_json_file(path)?),
            None => Ok(preset::machine_shop()),
        }
    }
}

/// Parse an ISO-8601 timestamp (UTC) into seconds since the Unix epoch.
pub fn parse_start_time(value: &str) -> Result<f64, WriterError> {
    let naive = NaiveDateTime::parse_from_str(value.trim(), START_TIME_FORMAT).map_err(|source| {
        WriterError::InvalidStartTime {
            value: value.to_string(),
            source,
        }
    })?;
    Ok(Utc.from_utc_datetime(&naive).timestamp_millis() as f64 / 1000.0)
}
