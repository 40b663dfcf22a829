// Facility Sim Writer - Tick loop
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Periodic generation loop.
//!
//! Each iteration steps the model at the next simulated timestamp, pushes
//! the current values to the sink and sleeps for the configured frequency.

use crate::config::RunSettings;
use crate::error::WriterError;
use crate::sink::Sink;
use facility_sim::SimulationModel;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info};

/// Drives a model at simulated timestamps and forwards its values.
pub struct Runner<S: Sink> {
    model: SimulationModel,
    sink: S,
    current_time: f64,
    time_step: f64,
    interval: Duration,
    max_ticks: Option<u64>,
}

impl<S: Sink> Runner<S> {
    pub fn new(
        model: SimulationModel,
        sink: S,
        settings: &RunSettings,
    ) -> Result<Self, WriterError> {
        Ok(Self {
            model,
            sink,
            current_time: settings.start_time()?,
            time_step: settings.simulation_time_step,
            interval: settings.tick_interval(),
            max_ticks: settings.max_ticks,
        })
    }

    pub fn model(&self) -> &SimulationModel {
        &self.model
    }

    /// Simulated time of the next tick.
    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    /// Run until `max_ticks` is reached or `shutdown` resolves.
    ///
    /// Returns the number of ticks written. The sink is flushed on exit.
    pub async fn run_until<F>(&mut self, shutdown: F) -> Result<u64, WriterError>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        info!(
            "Starting generation: time_step={}s, interval={:?}, max_ticks={:?}",
            self.time_step, self.interval, self.max_ticks
        );

        let mut ticks = 0u64;
        while self.max_ticks.map_or(true, |max| ticks < max) {
            self.model.step(Some(self.current_time))?;
            let records = self.model.current_values();
            self.sink.write(&records)?;
            ticks += 1;
            debug!(
                "tick {} at {:.3}: {} values",
                ticks,
                self.current_time,
                records.len()
            );

            self.current_time += self.time_step;
            if self.max_ticks == Some(ticks) {
                break;
            }

            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown requested");
                    break;
                }
                _ = sleep(self.interval) => {}
            }
        }

        self.sink.flush()?;
        info!("Generation stopped after {} ticks", ticks);
        Ok(ticks)
    }
}
