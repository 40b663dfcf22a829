// Facility Sim - Parameter value generator
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Sensor value generation.
//!
//! A value never jumps straight to a freshly sampled target. Each resample
//! takes one smoothing step toward it:
//!
//! ```text
//! target    = max(0, sample(distribution)) * dependency_increment
//! new_value = max(0, current + (target - current) * speed_change)
//! ```
//!
//! When a facility stops, the target becomes 0 and values glide down. A
//! resample may also *jump* (`new_value *= jump_value`); the next resample
//! starts again from the value before the jump, so jumps never compound.

use crate::catalog::{ControllerParameterSettings, Distribution};
use crate::clock::Tick;
use crate::component::ComponentState;
use crate::facility::FacilityState;
use crate::keys::{ComponentKey, FacilityId, ParamKey};
use crate::random::RandomSource;
use serde::Serialize;
use std::collections::BTreeMap;

/// Upper limit of the dependency increment.
pub const MAX_DEPENDENCY_INCREMENT: f64 = 2.0;

/// Generation state of one sensor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ControllerParameterState {
    /// Value produced by the last tick.
    pub value: Option<f64>,
    /// Value produced by the tick before that.
    pub previous: Option<f64>,
    pub time_last_state_change: Option<f64>,
    /// Seconds the value is held while the component is healthy.
    pub state_fixed_interval: Option<f64>,
    /// The last resample jumped; the next one reverts first.
    pub now_jumping: bool,
    /// Value the next resample starts from after a jump.
    pub pre_jump_value: Option<f64>,
}

impl ControllerParameterState {
    fn arm_timer<R: RandomSource + ?Sized>(
        &mut self,
        now: f64,
        distribution: &Distribution,
        rng: &mut R,
    ) {
        self.time_last_state_change = Some(now);
        self.state_fixed_interval = Some(rng.normal(distribution).max(0.0));
    }

    fn timer_elapsed(&self, now: f64) -> bool {
        match (self.time_last_state_change, self.state_fixed_interval) {
            (Some(changed), Some(interval)) => now - changed >= interval,
            _ => true,
        }
    }

    /// Value a resample starts from, consuming a pending jump.
    fn take_base_value(&mut self, current: f64) -> f64 {
        if self.now_jumping {
            self.now_jumping = false;
            self.pre_jump_value.take().unwrap_or(current)
        } else {
            current
        }
    }
}

/// Owner of every sensor's generation state.
#[derive(Debug, Clone, Default)]
pub struct ParameterGenerator {
    states: BTreeMap<ParamKey, ControllerParameterState>,
}

impl ParameterGenerator {
    pub fn new(keys: impl IntoIterator<Item = ParamKey>) -> Self {
        Self {
            states: keys
                .into_iter()
                .map(|k| (k, ControllerParameterState::default()))
                .collect(),
        }
    }

    pub fn get(&self, key: &ParamKey) -> Option<&ControllerParameterState> {
        self.states.get(key)
    }

    pub fn states(&self) -> &BTreeMap<ParamKey, ControllerParameterState> {
        &self.states
    }

    /// Produce the next value of every sensor.
    ///
    /// Dependencies are read from the state as it was before this call, so
    /// the order keys are visited in does not matter.
    pub fn update<R: RandomSource + ?Sized>(
        &mut self,
        tick: &Tick,
        settings: &BTreeMap<ParamKey, ControllerParameterSettings>,
        facilities: &BTreeMap<FacilityId, FacilityState>,
        components: &BTreeMap<ComponentKey, ComponentState>,
        rng: &mut R,
    ) {
        let prior = self.states.clone();
        let now = tick.now;

        for (key, state) in self.states.iter_mut() {
            let Some(settings) = settings.get(key) else {
                continue;
            };
            let last_value = state.value;

            let Some(current) = state.value else {
                state.value = Some(rng.normal(&settings.value_distribution).max(0.0));
                state.arm_timer(now, &settings.state_fixed_distribution, rng);
                continue;
            };

            let running = facilities
                .get(&key.facility)
                .map_or(false, FacilityState::is_running);
            let faulty = components
                .get(&key.component_key())
                .map_or(false, ComponentState::is_faulty);

            let plan = if !running {
                Some((0.0, Distribution::ZERO))
            } else if faulty {
                Some((settings.probability_jump_faulty, settings.value_distribution))
            } else if state.timer_elapsed(now) {
                Some((settings.probability_jump, settings.value_distribution))
            } else {
                None
            };

            if let Some((probability_jump, target)) = plan {
                let increment = dependency_increment(settings, &prior);
                let value = resample(
                    state,
                    current,
                    settings,
                    increment,
                    probability_jump,
                    &target,
                    rng,
                );
                if state.now_jumping {
                    log::trace!("parameter {} jumped to {:.3}", key, value);
                }
                state.value = Some(value);
                state.arm_timer(now, &settings.state_fixed_distribution, rng);
            }
            state.previous = last_value;
        }
    }
}

/// One smoothing step toward a freshly sampled target, with an optional jump.
fn resample<R: RandomSource + ?Sized>(
    state: &mut ControllerParameterState,
    current: f64,
    settings: &ControllerParameterSettings,
    increment: f64,
    probability_jump: f64,
    target: &Distribution,
    rng: &mut R,
) -> f64 {
    let base = state.take_base_value(current);

    let target = rng.normal(target).max(0.0);
    let diff = (target * increment - base) * settings.speed_change;
    let mut value = (base + diff).max(0.0);

    if rng.decide(probability_jump) {
        value *= settings.jump_value;
        state.now_jumping = true;
        state.pre_jump_value = Some(base);
    }

    value
}

/// Relative change of the dependency over the previous tick, scaled by the
/// coupling strength and capped at [`MAX_DEPENDENCY_INCREMENT`].
fn dependency_increment(
    settings: &ControllerParameterSettings,
    prior: &BTreeMap<ParamKey, ControllerParameterState>,
) -> f64 {
    let Some(dependence) = &settings.dependence else {
        return 1.0;
    };
    let Some(state) = prior.get(&dependence.parameter) else {
        return 1.0;
    };
    match (state.value, state.previous) {
        (Some(current), Some(last)) if last != 0.0 => ((current / last - 1.0)
            * dependence.coupling_strength
            + 1.0)
            .min(MAX_DEPENDENCY_INCREMENT),
        _ => 1.0,
    }
}
