// Facility Sim - Simulation model
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Tick orchestration.
//!
//! Each [`SimulationModel::step`] runs the stages in a fixed order:
//!
//! 1. statistics accumulate from the previous tick's values and run flags
//! 2. component flags are re-derived from the statistics
//! 3. facilities transition; completed repairs reset their components
//! 4. parameter values are generated for the new facility/component state
//! 5. one history record per parameter is appended

use crate::catalog::{Catalog, Structure};
use crate::clock::Clock;
use crate::component::{ComponentState, ComponentTracker};
use crate::error::Result;
use crate::facility::{FacilityState, FacilityStateMachine, RepairOrder};
use crate::generator::{ControllerParameterState, ParameterGenerator};
use crate::history::{History, ValueRecord};
use crate::keys::{ComponentKey, FacilityId, ParamKey, StatKey};
use crate::random::RandomSource;
use crate::statistics::StatisticsEngine;
use rand::rngs::StdRng;
use std::collections::BTreeMap;

/// Digital twin of a set of facilities.
///
/// Not meant for concurrent mutation; wrap it in a lock if shared.
#[derive(Debug)]
pub struct SimulationModel<R: RandomSource = StdRng> {
    catalog: Catalog,
    structure: Structure,
    clock: Clock,
    statistics: StatisticsEngine,
    components: ComponentTracker,
    facilities: FacilityStateMachine,
    parameters: ParameterGenerator,
    history: History,
    tick_count: u64,
    rng: R,
}

impl<R: RandomSource> SimulationModel<R> {
    /// Build a model from a catalog.
    ///
    /// Fails when the catalog's cross references do not line up.
    pub fn new(catalog: Catalog, rng: R) -> Result<Self> {
        let structure = catalog.validate()?;

        log::info!(
            "simulation model: {} facilities, {} components, {} parameters, {} statistics",
            catalog.facilities.len(),
            structure.component_keys().count(),
            catalog.parameters.len(),
            catalog.statistics.len()
        );

        Ok(Self {
            statistics: StatisticsEngine::new(catalog.statistics.keys().copied()),
            components: ComponentTracker::new(structure.component_keys()),
            facilities: FacilityStateMachine::new(catalog.facilities.keys().copied()),
            parameters: ParameterGenerator::new(catalog.parameters.keys().copied()),
            history: History::new(),
            clock: Clock::new(),
            tick_count: 0,
            catalog,
            structure,
            rng,
        })
    }

    /// Advance one tick.
    ///
    /// `current_time` drives the tick at a simulated timestamp; `None` reads
    /// the wall clock. A rejected time leaves the model untouched.
    pub fn step(&mut self, current_time: Option<f64>) -> Result<()> {
        let tick = self.clock.advance(current_time)?;

        self.statistics.accumulate(
            &tick,
            &self.catalog.parameters,
            self.parameters.states(),
            self.facilities.states(),
        );

        self.components.update(
            &self.structure,
            &self.statistics,
            &self.catalog.statistics,
            &mut self.rng,
        );

        let repairs = self.facilities.update(
            &tick,
            &self.structure,
            self.components.states(),
            &self.catalog.facilities,
            &mut self.rng,
        );
        for order in &repairs {
            self.apply_repair(order);
        }

        self.parameters.update(
            &tick,
            &self.catalog.parameters,
            self.facilities.states(),
            self.components.states(),
            &mut self.rng,
        );

        let records = self.current_values();
        self.history.extend(records);
        self.tick_count += 1;
        Ok(())
    }

    fn apply_repair(&mut self, order: &RepairOrder) {
        for &component in &order.components {
            let key = ComponentKey::new(order.facility, component);
            self.statistics
                .reset_component(key, self.structure.statistics(key));
            self.components.clear(key);
        }
    }

    /// Latest value of every parameter as flattened records.
    pub fn current_values(&self) -> Vec<ValueRecord> {
        let Some(time) = self.clock.time() else {
            return Vec::new();
        };
        self.parameters
            .states()
            .iter()
            .filter_map(|(key, state)| state.value.map(|v| ValueRecord::new(*key, v, time)))
            .collect()
    }

    /// Latest value per parameter.
    pub fn snapshot(&self) -> BTreeMap<ParamKey, f64> {
        self.parameters
            .states()
            .iter()
            .filter_map(|(key, state)| state.value.map(|v| (*key, v)))
            .collect()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn facility_state(&self, facility: FacilityId) -> Option<&FacilityState> {
        self.facilities.get(&facility)
    }

    pub fn component_state(&self, component: ComponentKey) -> Option<&ComponentState> {
        self.components.get(&component)
    }

    pub fn statistic(&self, key: StatKey) -> Option<f64> {
        self.statistics.get(&key)
    }

    pub fn parameter_state(&self, key: ParamKey) -> Option<&ControllerParameterState> {
        self.parameters.get(&key)
    }

    /// Time of the last tick.
    pub fn time(&self) -> Option<f64> {
        self.clock.time()
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn structure(&self) -> &Structure {
        &self.structure
    }
}
