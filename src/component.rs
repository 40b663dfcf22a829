// Facility Sim - Component state tracker
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Fault and breakdown flags per component.
//!
//! Every tick each bound statistic is run through its two failure curves. Each
//! curve gets its own Bernoulli draw; the component is faulty (or broken) if
//! any statistic's draw says so.

use crate::catalog::{StatisticSettings, Structure};
use crate::keys::{ComponentKey, StatKey};
use crate::random::RandomSource;
use crate::statistics::StatisticsEngine;
use serde::Serialize;
use std::collections::BTreeMap;

/// Health flags of a component. Both are `None` before the first tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ComponentState {
    pub breakdown: Option<bool>,
    pub have_faulty: Option<bool>,
}

impl ComponentState {
    pub fn is_broken(&self) -> bool {
        self.breakdown == Some(true)
    }

    pub fn is_faulty(&self) -> bool {
        self.have_faulty == Some(true)
    }
}

/// Owner of every component's health flags.
#[derive(Debug, Clone, Default)]
pub struct ComponentTracker {
    states: BTreeMap<ComponentKey, ComponentState>,
}

impl ComponentTracker {
    pub fn new(keys: impl IntoIterator<Item = ComponentKey>) -> Self {
        Self {
            states: keys
                .into_iter()
                .map(|k| (k, ComponentState::default()))
                .collect(),
        }
    }

    pub fn get(&self, key: &ComponentKey) -> Option<&ComponentState> {
        self.states.get(key)
    }

    pub fn states(&self) -> &BTreeMap<ComponentKey, ComponentState> {
        &self.states
    }

    /// Re-derive flags from the accumulated statistics.
    pub fn update<R: RandomSource + ?Sized>(
        &mut self,
        structure: &Structure,
        statistics: &StatisticsEngine,
        settings: &BTreeMap<StatKey, StatisticSettings>,
        rng: &mut R,
    ) {
        for (key, state) in self.states.iter_mut() {
            let mut have_faulty = false;
            let mut breakdown = false;

            for &statistic in structure.statistics(*key) {
                let stat_key = key.statistic(statistic);
                let Some(curves) = settings.get(&stat_key) else {
                    continue;
                };
                let value = statistics.get(&stat_key).unwrap_or(0.0);

                // both draws happen regardless of earlier outcomes
                let faulty_draw = rng.decide(curves.faulty.probability(value));
                let breakdown_draw = rng.decide(curves.breakdown.probability(value));
                have_faulty |= faulty_draw;
                breakdown |= breakdown_draw;
            }

            if breakdown && !state.is_broken() {
                log::debug!("component {} broke down", key);
            }
            state.have_faulty = Some(have_faulty);
            state.breakdown = Some(breakdown);
        }
    }

    /// Clear the flags of a repaired component.
    pub fn clear(&mut self, key: ComponentKey) {
        if let Some(state) = self.states.get_mut(&key) {
            state.breakdown = Some(false);
            state.have_faulty = Some(false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{
        Catalog, ComponentBinding, Distribution, FacilitySettings, FailureCurve,
    };
    use crate::clock::Tick;
    use crate::keys::{ComponentId, FacilityId, StatisticType};
    use crate::random::seeded;

    const F: FacilityId = FacilityId(1);
    const C: ComponentId = ComponentId(10);

    fn catalog(curves: StatisticSettings) -> Catalog {
        Catalog::new()
            .with_statistic(ComponentKey::new(F, C).statistic(StatisticType::TimeWorked), curves)
            .with_facility(
                F,
                FacilitySettings::new(1.0, Distribution::new(10.0, 0.0), 10.0)
                    .with_component(ComponentBinding::new(C, [StatisticType::TimeWorked])),
            )
    }

    fn run(curves: StatisticSettings) -> ComponentState {
        let catalog = catalog(curves);
        let structure = catalog.validate().unwrap();
        let mut statistics = StatisticsEngine::new(catalog.statistics.keys().copied());
        statistics.accumulate(
            &Tick {
                now: 0.0,
                previous: None,
            },
            &BTreeMap::new(),
            &BTreeMap::new(),
            &BTreeMap::new(),
        );

        let mut tracker = ComponentTracker::new(structure.component_keys());
        let mut rng = seeded(42);
        tracker.update(&structure, &statistics, &catalog.statistics, &mut rng);
        *tracker.get(&ComponentKey::new(F, C)).unwrap()
    }

    #[test]
    fn test_initial_state_is_unknown() {
        let tracker = ComponentTracker::new([ComponentKey::new(F, C)]);
        let state = tracker.get(&ComponentKey::new(F, C)).unwrap();
        assert_eq!(state.breakdown, None);
        assert_eq!(state.have_faulty, None);
    }

    #[test]
    fn test_far_below_threshold_is_healthy() {
        let state = run(StatisticSettings::for_statistic(StatisticType::TimeWorked, 1.0));
        assert_eq!(state.breakdown, Some(false));
        assert_eq!(state.have_faulty, Some(false));
    }

    #[test]
    fn test_far_above_threshold_fails() {
        // threshold below zero with a steep curve: probability 1 at value 0
        let certain = FailureCurve::new(-1000.0, 1.0);
        let state = run(StatisticSettings::new(certain, certain));
        assert!(state.is_broken());
        assert!(state.is_faulty());
    }

    #[test]
    fn test_curves_are_independent() {
        let never = FailureCurve::new(1e9, 1.0);
        let certain = FailureCurve::new(-1000.0, 1.0);
        let state = run(StatisticSettings::new(certain, never));
        assert!(state.is_faulty());
        assert!(!state.is_broken());
    }

    #[test]
    fn test_clear() {
        let mut tracker = ComponentTracker::new([ComponentKey::new(F, C)]);
        tracker.clear(ComponentKey::new(F, C));
        let state = tracker.get(&ComponentKey::new(F, C)).unwrap();
        assert_eq!(state.breakdown, Some(false));
        assert_eq!(state.have_faulty, Some(false));
    }
}
