// Facility Sim Writer - Error types
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

use facility_sim::SimulationError;

/// Writer errors.
#[derive(Debug, thiserror::Error)]
pub enum WriterError {
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    #[error("Invalid simulation start time '{value}': {source}")]
    InvalidStartTime {
        value: String,
        source: chrono::ParseError,
    },

    #[error("Simulation error: {0}")]
    Simulation(#[from] SimulationError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
