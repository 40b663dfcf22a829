// Facility Sim - Identifiers and composite keys
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Identifiers and strongly-typed composite keys.
//!
//! Every piece of mutable simulation state is stored in a `BTreeMap` keyed by
//! one of [`ParamKey`], [`StatKey`], [`ComponentKey`] or [`FacilityId`]. The
//! ordered maps keep iteration deterministic, which seeded runs rely on.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Facility (machine) identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FacilityId(pub u32);

/// Component (machine node) identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentId(pub u32);

impl fmt::Display for FacilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sensor reading kinds produced by a component controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControllerParameterType {
    PowerConsumption,
    Temperature,
    Vibration,
}

impl ControllerParameterType {
    /// All parameter types in code order.
    pub const ALL: [ControllerParameterType; 3] = [
        ControllerParameterType::PowerConsumption,
        ControllerParameterType::Temperature,
        ControllerParameterType::Vibration,
    ];

    /// Numeric tag code used by downstream sinks.
    pub fn code(&self) -> u8 {
        match self {
            ControllerParameterType::PowerConsumption => 1,
            ControllerParameterType::Temperature => 2,
            ControllerParameterType::Vibration => 3,
        }
    }

    /// Get parameter name as string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ControllerParameterType::PowerConsumption => "power_consumption",
            ControllerParameterType::Temperature => "temperature",
            ControllerParameterType::Vibration => "vibration",
        }
    }
}

impl fmt::Display for ControllerParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accumulated wear counters tracked per component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatisticType {
    /// Running time since the last repair.
    TimeWorked,
    /// Time spent above the power upper bound.
    TotalOverloadPowerTime,
    /// Time spent above the temperature upper bound.
    TotalOverloadTemperatureTime,
    /// Number of temperature jumps.
    TotalTemperatureJumps,
    /// Number of vibration jumps.
    TotalVibrationJumps,
}

impl StatisticType {
    /// All statistic types in code order.
    pub const ALL: [StatisticType; 5] = [
        StatisticType::TimeWorked,
        StatisticType::TotalOverloadPowerTime,
        StatisticType::TotalOverloadTemperatureTime,
        StatisticType::TotalTemperatureJumps,
        StatisticType::TotalVibrationJumps,
    ];

    /// Numeric code.
    pub fn code(&self) -> u8 {
        match self {
            StatisticType::TimeWorked => 1,
            StatisticType::TotalOverloadPowerTime => 2,
            StatisticType::TotalOverloadTemperatureTime => 3,
            StatisticType::TotalTemperatureJumps => 4,
            StatisticType::TotalVibrationJumps => 5,
        }
    }

    /// Get statistic name as string.
    pub fn as_str(&self) -> &'static str {
        match self {
            StatisticType::TimeWorked => "time_worked",
            StatisticType::TotalOverloadPowerTime => "total_overload_power_time",
            StatisticType::TotalOverloadTemperatureTime => "total_overload_temperature_time",
            StatisticType::TotalTemperatureJumps => "total_temperature_jumps",
            StatisticType::TotalVibrationJumps => "total_vibration_jumps",
        }
    }

    /// Controller parameter this statistic observes, if any.
    pub fn watched_parameter(&self) -> Option<ControllerParameterType> {
        match self {
            StatisticType::TimeWorked => None,
            StatisticType::TotalOverloadPowerTime => {
                Some(ControllerParameterType::PowerConsumption)
            }
            StatisticType::TotalOverloadTemperatureTime
            | StatisticType::TotalTemperatureJumps => Some(ControllerParameterType::Temperature),
            StatisticType::TotalVibrationJumps => Some(ControllerParameterType::Vibration),
        }
    }
}

impl fmt::Display for StatisticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// (facility, component) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ComponentKey {
    pub facility: FacilityId,
    pub component: ComponentId,
}

impl ComponentKey {
    pub fn new(facility: FacilityId, component: ComponentId) -> Self {
        Self {
            facility,
            component,
        }
    }

    /// Key of one of this component's controller parameters.
    pub fn parameter(&self, parameter: ControllerParameterType) -> ParamKey {
        ParamKey::new(self.facility, self.component, parameter)
    }

    /// Key of one of this component's statistics.
    pub fn statistic(&self, statistic: StatisticType) -> StatKey {
        StatKey::new(self.facility, self.component, statistic)
    }
}

impl fmt::Display for ComponentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.facility, self.component)
    }
}

/// (facility, component, parameter) triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ParamKey {
    pub facility: FacilityId,
    pub component: ComponentId,
    pub parameter: ControllerParameterType,
}

impl ParamKey {
    pub fn new(
        facility: FacilityId,
        component: ComponentId,
        parameter: ControllerParameterType,
    ) -> Self {
        Self {
            facility,
            component,
            parameter,
        }
    }

    pub fn component_key(&self) -> ComponentKey {
        ComponentKey::new(self.facility, self.component)
    }
}

impl fmt::Display for ParamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.facility, self.component, self.parameter)
    }
}

/// (facility, component, statistic) triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StatKey {
    pub facility: FacilityId,
    pub component: ComponentId,
    pub statistic: StatisticType,
}

impl StatKey {
    pub fn new(facility: FacilityId, component: ComponentId, statistic: StatisticType) -> Self {
        Self {
            facility,
            component,
            statistic,
        }
    }

    pub fn component_key(&self) -> ComponentKey {
        ComponentKey::new(self.facility, self.component)
    }

    /// Key of the controller parameter this statistic observes.
    pub fn watched_parameter(&self) -> Option<ParamKey> {
        self.statistic
            .watched_parameter()
            .map(|p| ParamKey::new(self.facility, self.component, p))
    }
}

impl fmt::Display for StatKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.facility, self.component, self.statistic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_codes() {
        assert_eq!(ControllerParameterType::PowerConsumption.code(), 1);
        assert_eq!(ControllerParameterType::Vibration.code(), 3);
        let codes: Vec<u8> = StatisticType::ALL.iter().map(|s| s.code()).collect();
        assert_eq!(codes, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_watched_parameter() {
        assert_eq!(StatisticType::TimeWorked.watched_parameter(), None);
        assert_eq!(
            StatisticType::TotalVibrationJumps.watched_parameter(),
            Some(ControllerParameterType::Vibration)
        );

        let key = StatKey::new(
            FacilityId(1),
            ComponentId(2),
            StatisticType::TotalOverloadPowerTime,
        );
        assert_eq!(
            key.watched_parameter(),
            Some(ParamKey::new(
                FacilityId(1),
                ComponentId(2),
                ControllerParameterType::PowerConsumption
            ))
        );
    }

    #[test]
    fn test_key_ordering_groups_by_facility() {
        let mut map = BTreeMap::new();
        map.insert(
            ParamKey::new(FacilityId(2), ComponentId(1), ControllerParameterType::Temperature),
            "b",
        );
        map.insert(
            ParamKey::new(FacilityId(1), ComponentId(9), ControllerParameterType::Vibration),
            "a",
        );
        let first = map.keys().next().unwrap();
        assert_eq!(first.facility, FacilityId(1));
    }

    #[test]
    fn test_display() {
        let key = ParamKey::new(
            FacilityId(1001),
            ComponentId(10011),
            ControllerParameterType::Vibration,
        );
        assert_eq!(key.to_string(), "1001/10011/vibration");
        assert_eq!(key.component_key().to_string(), "1001/10011");
    }
}
