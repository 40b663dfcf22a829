// Facility Sim - Statistic catalog
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Failure probability curves per accumulated statistic.

use crate::keys::StatisticType;
use serde::{Deserialize, Serialize};

/// Exponents at or above this value are treated as zero probability.
pub const MAX_CURVE_EXPONENT: f64 = 100.0;

/// Logistic failure curve.
///
/// `p = 1 / (1 + exp((threshold - value) * smoothness))`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FailureCurve {
    /// Statistic value at which failure probability is 0.5.
    pub threshold: f64,
    /// Steepness of the transition around the threshold.
    pub smoothness: f64,
}

impl FailureCurve {
    pub const fn new(threshold: f64, smoothness: f64) -> Self {
        Self {
            threshold,
            smoothness,
        }
    }

    /// Failure probability for an accumulated value.
    pub fn probability(&self, value: f64) -> f64 {
        let exponent = (self.threshold - value) * self.smoothness;
        if exponent >= MAX_CURVE_EXPONENT {
            return 0.0;
        }
        1.0 / (1.0 + exponent.exp())
    }
}

/// Fault and breakdown curves for one (facility, component, statistic).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatisticSettings {
    /// Curve deciding a (non-fatal) fault.
    pub faulty: FailureCurve,
    /// Curve deciding a breakdown.
    pub breakdown: FailureCurve,
}

impl StatisticSettings {
    pub const fn new(faulty: FailureCurve, breakdown: FailureCurve) -> Self {
        Self { faulty, breakdown }
    }

    /// Catalog defaults for a statistic, thresholds scaled by `multiplier`.
    pub fn for_statistic(statistic: StatisticType, multiplier: f64) -> Self {
        let (faulty, breakdown, smoothness) = match statistic {
            StatisticType::TimeWorked => (864_000.0, 1_728_000.0, 0.3),
            StatisticType::TotalOverloadPowerTime
            | StatisticType::TotalOverloadTemperatureTime => (3600.0, 7200.0, 0.5),
            StatisticType::TotalTemperatureJumps | StatisticType::TotalVibrationJumps => {
                (30.0, 50.0, 0.5)
            }
        };
        Self {
            faulty: FailureCurve::new(faulty * multiplier, smoothness),
            breakdown: FailureCurve::new(breakdown * multiplier, smoothness),
        }
    }
}
