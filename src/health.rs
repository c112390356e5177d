// Copyright 2026 WearLink Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Daily health metrics and their relay format.
//!
//! The wearable's watch face shows one line per metric, formatted as
//! `"<Label> - <value>"`. That wire format is fixed; the watch app parses
//! it by splitting on `" - "`.

use futures::future::BoxFuture;
use rand::Rng;
use thiserror::Error;

/// Metrics relayed to the wearable, in relay order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthMetric {
    Steps,
    Calories,
    HeartRate,
    Oxygen,
}

impl HealthMetric {
    pub const ALL: [HealthMetric; 4] = [
        HealthMetric::Steps,
        HealthMetric::Calories,
        HealthMetric::HeartRate,
        HealthMetric::Oxygen,
    ];

    /// Label exactly as the watch app expects it.
    pub fn label(&self) -> &'static str {
        match self {
            HealthMetric::Steps => "Steps",
            HealthMetric::Calories => "Calories",
            HealthMetric::HeartRate => "HeartRate",
            HealthMetric::Oxygen => "Oxygen",
        }
    }
}

/// One sampled metric. `value` is `None` when the provider has no data
/// for today yet.
#[derive(Debug, Clone, PartialEq)]
pub struct HealthReading {
    pub metric: HealthMetric,
    pub value: Option<f64>,
}

impl HealthReading {
    pub fn new(metric: HealthMetric, value: Option<f64>) -> Self {
        Self { metric, value }
    }

    /// The `"<Label> - <value>"` line sent over the link. Missing values
    /// relay as `0` rather than being skipped, so the watch face always
    /// shows every metric.
    pub fn relay_line(&self) -> String {
        match self.value {
            Some(value) => format!("{} - {}", self.metric.label(), value),
            None => format!("{} - 0", self.metric.label()),
        }
    }
}

/// The health provider could not produce readings.
#[derive(Debug, Error)]
pub enum HealthError {
    #[error("health data unavailable: {0}")]
    Unavailable(String),
}

/// Source of today's readings.
///
/// Object-safe async so the session can hold `Arc<dyn HealthSource>`.
pub trait HealthSource: Send + Sync {
    /// Today's readings, one per [`HealthMetric`], in [`HealthMetric::ALL`]
    /// order.
    fn latest_readings(&self) -> BoxFuture<'_, Result<Vec<HealthReading>, HealthError>>;
}

/// Fabricated readings for running without a real health provider.
#[derive(Debug, Default)]
pub struct SimulatedHealth;

impl SimulatedHealth {
    pub fn new() -> Self {
        Self
    }

    fn sample(&self) -> Vec<HealthReading> {
        let mut rng = rand::thread_rng();
        vec![
            HealthReading::new(HealthMetric::Steps, Some(rng.gen_range(0..20_000) as f64)),
            HealthReading::new(
                HealthMetric::Calories,
                Some((rng.gen_range(0.0..900.0_f64) * 10.0).round() / 10.0),
            ),
            HealthReading::new(
                HealthMetric::HeartRate,
                Some(rng.gen_range(50..110) as f64),
            ),
            HealthReading::new(
                HealthMetric::Oxygen,
                Some((rng.gen_range(90.0..100.0_f64) * 10.0).round() / 10.0),
            ),
        ]
    }
}

impl HealthSource for SimulatedHealth {
    fn latest_readings(&self) -> BoxFuture<'_, Result<Vec<HealthReading>, HealthError>> {
        let readings = self.sample();
        Box::pin(async move { Ok(readings) })
    }
}
