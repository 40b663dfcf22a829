// Facility Sim - Statistics engine
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Accumulated wear counters.
//!
//! Each tick the counters grow from the *previous* tick's parameter values and
//! facility run flag:
//!
//! - `TimeWorked` adds the elapsed time while the facility runs
//! - overload counters add the elapsed time while the watched value exceeds
//!   its normal upper bound
//! - jump counters add one whenever the watched value rose by more than the
//!   configured ratio since the tick before

use crate::catalog::ControllerParameterSettings;
use crate::clock::Tick;
use crate::facility::FacilityState;
use crate::generator::ControllerParameterState;
use crate::keys::{ComponentKey, FacilityId, ParamKey, StatKey, StatisticType};
use std::collections::BTreeMap;

/// Owner of every accumulated statistic value.
///
/// `None` means "not initialized this cycle"; it becomes 0 on the next tick.
#[derive(Debug, Clone, Default)]
pub struct StatisticsEngine {
    values: BTreeMap<StatKey, Option<f64>>,
}

impl StatisticsEngine {
    /// Create uninitialized counters for the given keys.
    pub fn new(keys: impl IntoIterator<Item = StatKey>) -> Self {
        Self {
            values: keys.into_iter().map(|k| (k, None)).collect(),
        }
    }

    /// Current value of a counter.
    pub fn get(&self, key: &StatKey) -> Option<f64> {
        self.values.get(key).copied().flatten()
    }

    /// All counters.
    pub fn values(&self) -> &BTreeMap<StatKey, Option<f64>> {
        &self.values
    }

    /// Advance every counter by one tick.
    pub fn accumulate(
        &mut self,
        tick: &Tick,
        settings: &BTreeMap<ParamKey, ControllerParameterSettings>,
        parameters: &BTreeMap<ParamKey, ControllerParameterState>,
        facilities: &BTreeMap<FacilityId, FacilityState>,
    ) {
        let elapsed = tick.elapsed();

        for (key, slot) in self.values.iter_mut() {
            let Some(value) = *slot else {
                *slot = Some(0.0);
                continue;
            };

            let increment = match key.statistic {
                StatisticType::TimeWorked => {
                    let running = facilities
                        .get(&key.facility)
                        .map_or(false, FacilityState::is_running);
                    if running {
                        elapsed
                    } else {
                        0.0
                    }
                }
                StatisticType::TotalOverloadPowerTime
                | StatisticType::TotalOverloadTemperatureTime => {
                    if is_overloaded(key, settings, parameters) {
                        elapsed
                    } else {
                        0.0
                    }
                }
                StatisticType::TotalTemperatureJumps | StatisticType::TotalVibrationJumps => {
                    if is_jump(key, settings, parameters) {
                        1.0
                    } else {
                        0.0
                    }
                }
            };

            *slot = Some(value + increment);
        }
    }

    /// Zero the bound counters of a repaired component.
    pub fn reset_component(&mut self, component: ComponentKey, bound: &[StatisticType]) {
        for &statistic in bound {
            if let Some(slot) = self.values.get_mut(&component.statistic(statistic)) {
                *slot = Some(0.0);
            }
        }
    }
}

/// Watched value above its normal upper bound. Missing parameters never overload.
fn is_overloaded(
    key: &StatKey,
    settings: &BTreeMap<ParamKey, ControllerParameterSettings>,
    parameters: &BTreeMap<ParamKey, ControllerParameterState>,
) -> bool {
    let Some(param) = key.watched_parameter() else {
        return false;
    };
    match (settings.get(&param), parameters.get(&param).and_then(|s| s.value)) {
        (Some(settings), Some(current)) => current > settings.normal_value_upper_bound,
        _ => false,
    }
}

/// Watched value rose by more than `jump_value_upper_bound` since the tick before.
fn is_jump(
    key: &StatKey,
    settings: &BTreeMap<ParamKey, ControllerParameterSettings>,
    parameters: &BTreeMap<ParamKey, ControllerParameterState>,
) -> bool {
    let Some(param) = key.watched_parameter() else {
        return false;
    };
    let (Some(settings), Some(state)) = (settings.get(&param), parameters.get(&param)) else {
        return false;
    };
    match (state.value, state.previous) {
        (Some(current), Some(last)) if last > 0.0 && current > last => {
            current / last - 1.0 > settings.jump_value_upper_bound
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::{ComponentId, ControllerParameterType};

    const F: FacilityId = FacilityId(1);
    const C: ComponentId = ComponentId(10);

    fn component() -> ComponentKey {
        ComponentKey::new(F, C)
    }

    fn engine() -> StatisticsEngine {
        StatisticsEngine::new(StatisticType::ALL.iter().map(|&s| component().statistic(s)))
    }

    fn tick(now: f64, previous: f64) -> Tick {
        Tick {
            now,
            previous: Some(previous),
        }
    }

    fn running(flag: bool) -> BTreeMap<FacilityId, FacilityState> {
        let mut map = BTreeMap::new();
        map.insert(
            F,
            FacilityState {
                running: Some(flag),
                breakdown: Some(false),
                ..Default::default()
            },
        );
        map
    }

    fn settings() -> BTreeMap<ParamKey, ControllerParameterSettings> {
        ControllerParameterType::ALL
            .iter()
            .map(|&p| {
                (
                    component().parameter(p),
                    ControllerParameterSettings::for_parameter(p),
                )
            })
            .collect()
    }

    fn values(
        parameter: ControllerParameterType,
        current: f64,
        previous: Option<f64>,
    ) -> BTreeMap<ParamKey, ControllerParameterState> {
        let mut map = BTreeMap::new();
        map.insert(
            component().parameter(parameter),
            ControllerParameterState {
                value: Some(current),
                previous,
                ..Default::default()
            },
        );
        map
    }

    fn initialized() -> StatisticsEngine {
        let mut engine = engine();
        engine.accumulate(
            &Tick {
                now: 0.0,
                previous: None,
            },
            &settings(),
            &BTreeMap::new(),
            &running(true),
        );
        engine
    }

    #[test]
    fn test_first_tick_initializes_to_zero() {
        let engine = initialized();
        for s in StatisticType::ALL {
            assert_eq!(engine.get(&component().statistic(s)), Some(0.0));
        }
    }

    #[test]
    fn test_time_worked_only_while_running() {
        let mut engine = initialized();
        let key = component().statistic(StatisticType::TimeWorked);

        engine.accumulate(&tick(5.0, 0.0), &settings(), &BTreeMap::new(), &running(true));
        assert_eq!(engine.get(&key), Some(5.0));

        engine.accumulate(&tick(8.0, 5.0), &settings(), &BTreeMap::new(), &running(false));
        assert_eq!(engine.get(&key), Some(5.0));
    }

    #[test]
    fn test_overload_adds_elapsed_time() {
        let mut engine = initialized();
        let key = component().statistic(StatisticType::TotalOverloadPowerTime);

        let over = values(ControllerParameterType::PowerConsumption, 9.0, Some(7.0));
        engine.accumulate(&tick(2.0, 0.0), &settings(), &over, &running(true));
        assert_eq!(engine.get(&key), Some(2.0));

        let under = values(ControllerParameterType::PowerConsumption, 7.0, Some(9.0));
        engine.accumulate(&tick(4.0, 2.0), &settings(), &under, &running(true));
        assert_eq!(engine.get(&key), Some(2.0));
    }

    #[test]
    fn test_overload_without_parameter_is_skipped() {
        let mut engine = initialized();
        let key = component().statistic(StatisticType::TotalOverloadPowerTime);

        let mut no_power = settings();
        no_power.remove(&component().parameter(ControllerParameterType::PowerConsumption));
        engine.accumulate(&tick(2.0, 0.0), &no_power, &BTreeMap::new(), &running(true));
        assert_eq!(engine.get(&key), Some(0.0));
    }

    #[test]
    fn test_jump_counts_one_per_tick() {
        let mut engine = initialized();
        let key = component().statistic(StatisticType::TotalTemperatureJumps);

        // 70 -> 100 is a 43% rise, above the 30% threshold
        let jump = values(ControllerParameterType::Temperature, 100.0, Some(70.0));
        engine.accumulate(&tick(10.0, 0.0), &settings(), &jump, &running(true));
        assert_eq!(engine.get(&key), Some(1.0));

        // 70 -> 80 is below the threshold
        let small = values(ControllerParameterType::Temperature, 80.0, Some(70.0));
        engine.accumulate(&tick(20.0, 10.0), &settings(), &small, &running(true));
        assert_eq!(engine.get(&key), Some(1.0));
    }

    #[test]
    fn test_falling_or_flat_series_never_jumps() {
        let mut engine = initialized();
        let key = component().statistic(StatisticType::TotalVibrationJumps);

        for (current, previous) in [(400.0, 400.0), (100.0, 400.0), (500.0, 0.0)] {
            let v = values(ControllerParameterType::Vibration, current, Some(previous));
            engine.accumulate(&tick(1.0, 0.0), &settings(), &v, &running(true));
        }
        let v = values(ControllerParameterType::Vibration, 900.0, None);
        engine.accumulate(&tick(1.0, 0.0), &settings(), &v, &running(true));

        assert_eq!(engine.get(&key), Some(0.0));
    }

    #[test]
    fn test_reset_component() {
        let mut engine = initialized();
        engine.accumulate(&tick(50.0, 0.0), &settings(), &BTreeMap::new(), &running(true));

        let bound = [StatisticType::TimeWorked];
        engine.reset_component(component(), &bound);
        assert_eq!(
            engine.get(&component().statistic(StatisticType::TimeWorked)),
            Some(0.0)
        );
    }
}
