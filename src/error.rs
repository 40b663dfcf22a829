//! Error types for the simulation core
//!
//! Construction-time catalog mismatches are fatal; everything that can go
//! wrong inside a tick is either prevented structurally or reported as
//! [`SimulationError::InvalidTime`].

use crate::keys::{ComponentKey, FacilityId, ParamKey, StatKey};
use thiserror::Error;

/// Result type alias for simulation operations
pub type Result<T> = std::result::Result<T, SimulationError>;

/// Main error type for simulation operations
#[derive(Error, Debug)]
pub enum SimulationError {
    /// A component binding names a statistic that has no settings
    #[error("Missing statistic settings for {0}")]
    MissingStatisticSettings(StatKey),

    /// Statistic settings exist for a component no facility binds
    #[error("Statistic {0} is not bound to any facility component")]
    UnboundStatistic(StatKey),

    /// Settings reference a facility that is not in the facility catalog
    #[error("Missing facility settings for facility {0}")]
    MissingFacilitySettings(FacilityId),

    /// Parameter settings for a component its facility does not bind
    #[error("Component {0} is not bound under its facility")]
    UnboundComponent(ComponentKey),

    /// A facility lists the same component twice
    #[error("Component {0} is bound more than once")]
    DuplicateComponent(ComponentKey),

    /// Dependency link to a parameter without settings
    #[error("Parameter {parameter} depends on unknown parameter {dependency}")]
    UnknownDependency {
        parameter: ParamKey,
        dependency: ParamKey,
    },

    /// Supplied tick timestamp is not finite or goes backwards
    #[error("Invalid tick time {current} (previous tick at {previous:?})")]
    InvalidTime { previous: Option<f64>, current: f64 },

    /// IO error while exporting or loading
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error while exporting or loading
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::{ComponentId, StatisticType};

    #[test]
    fn test_error_display() {
        let key = StatKey::new(FacilityId(1001), ComponentId(10011), StatisticType::TimeWorked);
        let err = SimulationError::MissingStatisticSettings(key);
        assert_eq!(
            err.to_string(),
            "Missing statistic settings for 1001/10011/time_worked"
        );

        let err = SimulationError::InvalidTime {
            previous: Some(10.0),
            current: 5.0,
        };
        assert!(err.to_string().contains("5"));
    }
}
