// Facility Sim - Static catalogs
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Static configuration of a simulated plant.
//!
//! A [`Catalog`] bundles the three settings maps the model is built from:
//!
//! - parameter settings per [`ParamKey`] (how sensor values are generated)
//! - statistic settings per [`StatKey`] (failure probability curves)
//! - facility settings per [`FacilityId`] (run cycle, repair time, component bindings)
//!
//! Not every component carries every parameter type; missing parameters are a
//! normal configuration gap. A binding that names a statistic without settings
//! is a structural mismatch and rejected by [`Catalog::validate`].

pub mod facility;
pub mod parameter;
pub mod preset;
pub mod statistic;

pub use facility::{ComponentBinding, FacilityLocation, FacilitySettings};
pub use parameter::{ControllerParameterSettings, Dependence, Distribution};
pub use statistic::{FailureCurve, StatisticSettings};

use crate::error::{Result, SimulationError};
use crate::keys::{ComponentId, ComponentKey, FacilityId, ParamKey, StatKey, StatisticType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Complete static configuration of a plant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    /// Sensor generation settings.
    #[serde(with = "entries")]
    pub parameters: BTreeMap<ParamKey, ControllerParameterSettings>,
    /// Failure curves.
    #[serde(with = "entries")]
    pub statistics: BTreeMap<StatKey, StatisticSettings>,
    /// Facility run cycles and component bindings.
    #[serde(with = "entries")]
    pub facilities: BTreeMap<FacilityId, FacilitySettings>,
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add parameter settings.
    pub fn with_parameter(mut self, key: ParamKey, settings: ControllerParameterSettings) -> Self {
        self.parameters.insert(key, settings);
        self
    }

    /// Add statistic settings.
    pub fn with_statistic(mut self, key: StatKey, settings: StatisticSettings) -> Self {
        self.statistics.insert(key, settings);
        self
    }

    /// Add facility settings.
    pub fn with_facility(mut self, facility: FacilityId, settings: FacilitySettings) -> Self {
        self.facilities.insert(facility, settings);
        self
    }

    /// Insert default settings for every statistic type of a component.
    pub fn insert_default_statistics(&mut self, component: ComponentKey, multiplier: f64) {
        for statistic in StatisticType::ALL {
            self.statistics.insert(
                component.statistic(statistic),
                StatisticSettings::for_statistic(statistic, multiplier),
            );
        }
    }

    /// Check cross references and derive the structural bindings.
    pub fn validate(&self) -> Result<Structure> {
        let mut structure = Structure::default();

        for (&facility, settings) in &self.facilities {
            let components = structure.facility_components.entry(facility).or_default();
            for binding in &settings.components {
                let key = ComponentKey::new(facility, binding.component);
                if structure.component_statistics.contains_key(&key) {
                    return Err(SimulationError::DuplicateComponent(key));
                }

                let mut bound = Vec::with_capacity(binding.statistics.len());
                for &statistic in &binding.statistics {
                    let stat_key = key.statistic(statistic);
                    if !self.statistics.contains_key(&stat_key) {
                        return Err(SimulationError::MissingStatisticSettings(stat_key));
                    }
                    if !bound.contains(&statistic) {
                        bound.push(statistic);
                    }
                }

                components.push(binding.component);
                structure.component_statistics.insert(key, bound);
            }
        }

        for key in self.statistics.keys() {
            if !self.facilities.contains_key(&key.facility) {
                return Err(SimulationError::MissingFacilitySettings(key.facility));
            }
            let bound = structure
                .component_statistics
                .get(&key.component_key())
                .map_or(false, |stats| stats.contains(&key.statistic));
            if !bound {
                return Err(SimulationError::UnboundStatistic(*key));
            }
        }

        for (key, settings) in &self.parameters {
            if !self.facilities.contains_key(&key.facility) {
                return Err(SimulationError::MissingFacilitySettings(key.facility));
            }
            if !structure.component_statistics.contains_key(&key.component_key()) {
                return Err(SimulationError::UnboundComponent(key.component_key()));
            }
            if let Some(dependence) = &settings.dependence {
                if !self.parameters.contains_key(&dependence.parameter) {
                    return Err(SimulationError::UnknownDependency {
                        parameter: *key,
                        dependency: dependence.parameter,
                    });
                }
            }
        }

        Ok(structure)
    }

    /// Load a catalog from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Write the catalog to a JSON file.
    pub fn to_json_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }
}

/// Facility → components → statistics bindings derived from a valid catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Structure {
    facility_components: BTreeMap<FacilityId, Vec<ComponentId>>,
    component_statistics: BTreeMap<ComponentKey, Vec<StatisticType>>,
}

impl Structure {
    /// Components bound under a facility, in binding order.
    pub fn components(&self, facility: FacilityId) -> &[ComponentId] {
        self.facility_components
            .get(&facility)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Statistics bound to a component.
    pub fn statistics(&self, component: ComponentKey) -> &[StatisticType] {
        self.component_statistics
            .get(&component)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// All bound components.
    pub fn component_keys(&self) -> impl Iterator<Item = ComponentKey> + '_ {
        self.component_statistics.keys().copied()
    }
}

/// Maps with struct keys are stored as `[{"key": .., "settings": ..}]` lists.
mod entries {
    use serde::de::{Deserialize, Deserializer};
    use serde::ser::{Serialize, Serializer};
    use std::collections::BTreeMap;

    #[derive(serde::Serialize)]
    struct EntryRef<'a, K, V> {
        key: &'a K,
        settings: &'a V,
    }

    #[derive(serde::Deserialize)]
    struct Entry<K, V> {
        key: K,
        settings: V,
    }

    pub fn serialize<K, V, S>(map: &BTreeMap<K, V>, serializer: S) -> Result<S::Ok, S::Error>
    where
        K: Serialize,
        V: Serialize,
        S: Serializer,
    {
        serializer.collect_seq(map.iter().map(|(key, settings)| EntryRef { key, settings }))
    }

    pub fn deserialize<'de, K, V, D>(deserializer: D) -> Result<BTreeMap<K, V>, D::Error>
    where
        K: Deserialize<'de> + Ord,
        V: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        let entries = Vec::<Entry<K, V>>::deserialize(deserializer)?;
        Ok(entries.into_iter().map(|e| (e.key, e.settings)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::ControllerParameterType;
    use tempfile::NamedTempFile;

    const F: FacilityId = FacilityId(1);
    const C: ComponentId = ComponentId(11);

    fn single_component_catalog() -> Catalog {
        let component = ComponentKey::new(F, C);
        let mut catalog = Catalog::new()
            .with_parameter(
                component.parameter(ControllerParameterType::PowerConsumption),
                ControllerParameterSettings::for_parameter(
                    ControllerParameterType::PowerConsumption,
                ),
            )
            .with_facility(
                F,
                FacilitySettings::new(1.0, Distribution::new(100.0, 0.0), 50.0)
                    .with_component(ComponentBinding::with_all_statistics(C)),
            );
        catalog.insert_default_statistics(component, 1.0);
        catalog
    }

    #[test]
    fn test_validate_ok() {
        let catalog = single_component_catalog();
        let structure = catalog.validate().unwrap();
        assert_eq!(structure.components(F), &[C]);
        assert_eq!(structure.statistics(ComponentKey::new(F, C)).len(), 5);
        assert!(structure.components(FacilityId(99)).is_empty());
    }

    #[test]
    fn test_missing_statistic_settings() {
        let mut catalog = single_component_catalog();
        let key = StatKey::new(F, C, StatisticType::TotalVibrationJumps);
        catalog.statistics.remove(&key);

        let err = catalog.validate().unwrap_err();
        assert!(matches!(err, SimulationError::MissingStatisticSettings(k) if k == key));
    }

    #[test]
    fn test_unbound_statistic() {
        let mut catalog = single_component_catalog();
        catalog.insert_default_statistics(ComponentKey::new(F, ComponentId(12)), 1.0);

        let err = catalog.validate().unwrap_err();
        assert!(matches!(err, SimulationError::UnboundStatistic(_)));
    }

    #[test]
    fn test_missing_facility() {
        let catalog = single_component_catalog().with_parameter(
            ParamKey::new(FacilityId(2), C, ControllerParameterType::Vibration),
            ControllerParameterSettings::for_parameter(ControllerParameterType::Vibration),
        );

        let err = catalog.validate().unwrap_err();
        assert!(matches!(err, SimulationError::MissingFacilitySettings(FacilityId(2))));
    }

    #[test]
    fn test_unbound_component() {
        let catalog = single_component_catalog().with_parameter(
            ParamKey::new(F, ComponentId(12), ControllerParameterType::Vibration),
            ControllerParameterSettings::for_parameter(ControllerParameterType::Vibration),
        );

        let err = catalog.validate().unwrap_err();
        assert!(matches!(err, SimulationError::UnboundComponent(_)));
    }

    #[test]
    fn test_unknown_dependency() {
        let temp = ComponentKey::new(F, C).parameter(ControllerParameterType::Temperature);
        let missing = ComponentKey::new(F, C).parameter(ControllerParameterType::Vibration);
        let catalog = single_component_catalog().with_parameter(
            temp,
            ControllerParameterSettings::for_parameter(ControllerParameterType::Temperature)
                .with_dependence(missing),
        );

        let err = catalog.validate().unwrap_err();
        assert!(matches!(
            err,
            SimulationError::UnknownDependency { parameter, dependency }
                if parameter == temp && dependency == missing
        ));
    }

    #[test]
    fn test_duplicate_component() {
        let mut catalog = single_component_catalog();
        if let Some(settings) = catalog.facilities.get_mut(&F) {
            settings
                .components
                .push(ComponentBinding::new(C, [StatisticType::TimeWorked]));
        }

        let err = catalog.validate().unwrap_err();
        assert!(matches!(err, SimulationError::DuplicateComponent(_)));
    }

    #[test]
    fn test_json_file_roundtrip() {
        let catalog = single_component_catalog();
        let file = NamedTempFile::new().unwrap();

        catalog.to_json_file(file.path()).unwrap();
        let loaded = Catalog::from_json_file(file.path()).unwrap();

        assert_eq!(loaded, catalog);
    }
}
