// Facility Sim - Controller parameter catalog
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Per-parameter generation settings.

use crate::keys::{ControllerParameterType, ParamKey};
use serde::{Deserialize, Serialize};

/// Normal distribution parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    pub mean: f64,
    pub std_dev: f64,
}

impl Distribution {
    /// Degenerate distribution at 0, the target of a stopped facility.
    pub const ZERO: Distribution = Distribution {
        mean: 0.0,
        std_dev: 0.0,
    };

    pub const fn new(mean: f64, std_dev: f64) -> Self {
        Self { mean, std_dev }
    }
}

/// Coupling to another parameter of the same plant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dependence {
    /// Parameter whose relative change drives this one.
    pub parameter: ParamKey,
    /// How strongly the relative change propagates (1.0 = fully).
    pub coupling_strength: f64,
}

/// Settings for one (facility, component, parameter) sensor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllerParameterSettings {
    /// Distribution of freshly sampled target values.
    pub value_distribution: Distribution,
    /// Values above this bound count as overload.
    pub normal_value_upper_bound: f64,
    /// Multiplier applied on a jump.
    pub jump_value: f64,
    /// Relative increase above which a change counts as a jump.
    pub jump_value_upper_bound: f64,
    /// Jump probability for a healthy component.
    pub probability_jump: f64,
    /// Jump probability for a component with a fault.
    pub probability_jump_faulty: f64,
    /// Distribution of the interval (seconds) a value is held.
    pub state_fixed_distribution: Distribution,
    /// Smoothing factor of each step toward the sampled target.
    pub speed_change: f64,
    /// Optional coupling to another parameter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependence: Option<Dependence>,
}

/// Default coupling strength for dependency links.
pub const DEFAULT_COUPLING_STRENGTH: f64 = 0.9;

impl ControllerParameterSettings {
    /// Settings with the catalog defaults for a parameter type.
    pub fn for_parameter(parameter: ControllerParameterType) -> Self {
        let (value_distribution, normal_value_upper_bound) = match parameter {
            ControllerParameterType::PowerConsumption => (Distribution::new(7.4, 0.4), 8.0),
            ControllerParameterType::Temperature => (Distribution::new(70.0, 10.0), 100.0),
            ControllerParameterType::Vibration => (Distribution::new(400.0, 20.0), 500.0),
        };
        Self {
            value_distribution,
            normal_value_upper_bound,
            jump_value: 1.5,
            jump_value_upper_bound: 0.3,
            probability_jump: 0.01,
            probability_jump_faulty: 0.4,
            state_fixed_distribution: Distribution::new(20.0, 3.0),
            speed_change: 0.6,
            dependence: None,
        }
    }

    /// Set value distribution.
    pub fn with_value_distribution(mut self, mean: f64, std_dev: f64) -> Self {
        self.value_distribution = Distribution::new(mean, std_dev);
        self
    }

    /// Set overload bound.
    pub fn with_upper_bound(mut self, bound: f64) -> Self {
        self.normal_value_upper_bound = bound;
        self
    }

    /// Set jump multiplier and detection ratio.
    pub fn with_jump(mut self, jump_value: f64, jump_value_upper_bound: f64) -> Self {
        self.jump_value = jump_value;
        self.jump_value_upper_bound = jump_value_upper_bound;
        self
    }

    /// Set healthy and faulty jump probabilities.
    pub fn with_jump_probabilities(mut self, healthy: f64, faulty: f64) -> Self {
        self.probability_jump = healthy;
        self.probability_jump_faulty = faulty;
        self
    }

    /// Set hold interval distribution.
    pub fn with_state_fixed_distribution(mut self, mean: f64, std_dev: f64) -> Self {
        self.state_fixed_distribution = Distribution::new(mean, std_dev);
        self
    }

    /// Set smoothing factor.
    pub fn with_speed_change(mut self, speed_change: f64) -> Self {
        self.speed_change = speed_change;
        self
    }

    /// Couple to another parameter with the default strength.
    pub fn with_dependence(self, parameter: ParamKey) -> Self {
        self.with_coupled_dependence(parameter, DEFAULT_COUPLING_STRENGTH)
    }

    /// Couple to another parameter with an explicit strength.
    pub fn with_coupled_dependence(mut self, parameter: ParamKey, coupling_strength: f64) -> Self {
        self.dependence = Some(Dependence {
            parameter,
            coupling_strength,
        });
        self
    }
}
