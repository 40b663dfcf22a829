// Facility Sim - Facility catalog
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Facility run cycle settings and component bindings.

use super::Distribution;
use crate::keys::{ComponentId, StatisticType};
use serde::{Deserialize, Serialize};

/// Where a facility sits on the plant floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacilityLocation {
    pub department: u32,
    pub area: u32,
}

/// A component of a facility and the statistics that wear it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentBinding {
    pub component: ComponentId,
    pub statistics: Vec<StatisticType>,
}

impl ComponentBinding {
    pub fn new(
        component: ComponentId,
        statistics: impl IntoIterator<Item = StatisticType>,
    ) -> Self {
        Self {
            component,
            statistics: statistics.into_iter().collect(),
        }
    }

    /// Binding with every statistic type.
    pub fn with_all_statistics(component: ComponentId) -> Self {
        Self::new(component, StatisticType::ALL)
    }
}

/// Run cycle settings of one facility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilitySettings {
    /// Probability of choosing "running" on each re-roll.
    pub probability_running: f64,
    /// Distribution of the interval (seconds) between re-rolls.
    pub time_running_distribution: Distribution,
    /// Seconds a broken facility needs to be repaired.
    pub time_repair: f64,
    /// Plant floor location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<FacilityLocation>,
    /// Components in binding order.
    #[serde(default)]
    pub components: Vec<ComponentBinding>,
}

impl FacilitySettings {
    /// Create settings without components.
    pub fn new(probability_running: f64, time_running: Distribution, time_repair: f64) -> Self {
        Self {
            probability_running,
            time_running_distribution: time_running,
            time_repair,
            location: None,
            components: Vec::new(),
        }
    }

    /// Set location.
    pub fn with_location(mut self, department: u32, area: u32) -> Self {
        self.location = Some(FacilityLocation { department, area });
        self
    }

    /// Bind a component.
    pub fn with_component(mut self, binding: ComponentBinding) -> Self {
        self.components.push(binding);
        self
    }

    /// Bound component ids in order.
    pub fn component_ids(&self) -> impl Iterator<Item = ComponentId> + '_ {
        self.components.iter().map(|b| b.component)
    }
}
