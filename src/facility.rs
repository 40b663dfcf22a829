// Facility Sim - Facility state machine
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Running / stopped / broken cycle of each facility.
//!
//! ```text
//! uninitialized -> running | stopped
//! running | stopped <-> running | stopped   (timer re-roll)
//! running -> broken                          (any component broke down)
//! broken -> running                          (after time_repair)
//! ```
//!
//! A repair does not touch component state directly. It is reported as a
//! [`RepairOrder`] that the model applies to the statistics engine and the
//! component tracker.

use crate::catalog::{Distribution, FacilitySettings, Structure};
use crate::clock::Tick;
use crate::component::ComponentState;
use crate::keys::{ComponentId, ComponentKey, FacilityId};
use crate::random::RandomSource;
use serde::Serialize;
use std::collections::BTreeMap;

/// Run state of a facility. All fields are `None` before the first tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct FacilityState {
    pub running: Option<bool>,
    /// Seconds the current run decision is held before a re-roll.
    pub state_fixed_interval: Option<f64>,
    pub time_last_state_change: Option<f64>,
    pub breakdown: Option<bool>,
    pub time_last_breakdown: Option<f64>,
}

impl FacilityState {
    pub fn is_running(&self) -> bool {
        self.running == Some(true)
    }

    pub fn is_broken(&self) -> bool {
        self.breakdown == Some(true)
    }

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
}

/// Components of a freshly repaired facility whose wear must be reset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepairOrder {
    pub facility: FacilityId,
    pub components: Vec<ComponentId>,
}

/// Owner of every facility's run state.
#[derive(Debug, Clone, Default)]
pub struct FacilityStateMachine {
    states: BTreeMap<FacilityId, FacilityState>,
}

impl FacilityStateMachine {
    pub fn new(keys: impl IntoIterator<Item = FacilityId>) -> Self {
        Self {
            states: keys
                .into_iter()
                .map(|k| (k, FacilityState::default()))
                .collect(),
        }
    }

    pub fn get(&self, facility: &FacilityId) -> Option<&FacilityState> {
        self.states.get(facility)
    }

    pub fn states(&self) -> &BTreeMap<FacilityId, FacilityState> {
        &self.states
    }

    /// Apply one tick of transitions; returns the repairs that completed.
    pub fn update<R: RandomSource + ?Sized>(
        &mut self,
        tick: &Tick,
        structure: &Structure,
        components: &BTreeMap<ComponentKey, ComponentState>,
        settings: &BTreeMap<FacilityId, FacilitySettings>,
        rng: &mut R,
    ) -> Vec<RepairOrder> {
        let now = tick.now;
        let mut repairs = Vec::new();

        for (&facility, state) in self.states.iter_mut() {
            let Some(settings) = settings.get(&facility) else {
                continue;
            };

            let broken_components: Vec<ComponentId> = structure
                .components(facility)
                .iter()
                .copied()
                .filter(|&c| {
                    components
                        .get(&ComponentKey::new(facility, c))
                        .map_or(false, ComponentState::is_broken)
                })
                .collect();

            if state.running.is_none() {
                state.running = Some(rng.decide(settings.probability_running));
                state.breakdown = Some(false);
                state.arm_timer(now, &settings.time_running_distribution, rng);
                log::debug!(
                    "facility {} initialized {}",
                    facility,
                    if state.is_running() { "running" } else { "stopped" }
                );
                continue;
            }

            if state.is_broken() {
                let since = state.time_last_breakdown.map_or(f64::INFINITY, |t| now - t);
                if since >= settings.time_repair {
                    state.running = Some(true);
                    state.breakdown = Some(false);
                    state.arm_timer(now, &settings.time_running_distribution, rng);
                    log::debug!(
                        "facility {} repaired, resetting {} component(s)",
                        facility,
                        broken_components.len()
                    );
                    repairs.push(RepairOrder {
                        facility,
                        components: broken_components,
                    });
                }
                continue;
            }

            if state.is_running() && !broken_components.is_empty() {
                state.running = Some(false);
                state.breakdown = Some(true);
                state.time_last_breakdown = Some(now);
                log::debug!("facility {} broke down at {}", facility, now);
                continue;
            }

            if state.timer_elapsed(now) {
                let decision = rng.decide(settings.probability_running);
                // an unchanged decision keeps the old timer running
                if Some(decision) != state.running {
                    state.running = Some(decision);
                    state.arm_timer(now, &settings.time_running_distribution, rng);
                    log::debug!(
                        "facility {} {}",
                        facility,
                        if decision { "started" } else { "stopped" }
                    );
                }
            }
        }

        repairs
    }
}
