//! What-if spend modelling for a single program.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::domain::Program;
use super::metrics::safe_divide;

/// Enrollment rate assumed when a program has no measured lead-to-enrollment rate.
pub const DEFAULT_ENROLLMENT_RATE: f64 = 5.0;

/// Spend multiplier bounds accepted by [`project`].
pub const SPEND_MULTIPLIER_RANGE: (f64, f64) = (0.5, 2.0);
/// Conversion boost bounds, in percent, accepted by [`project`].
pub const CONVERSION_BOOST_RANGE: (f64, f64) = (-20.0, 50.0);

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SpendScenario {
    pub spend_multiplier: f64,
    pub conversion_boost_pct: f64,
}

impl Default for SpendScenario {
    fn default() -> Self {
        Self {
            spend_multiplier: 1.0,
            conversion_boost_pct: 0.0,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ScenarioError {
    #[error("spend multiplier {0} outside {min}..={max}", min = SPEND_MULTIPLIER_RANGE.0, max = SPEND_MULTIPLIER_RANGE.1)]
    SpendMultiplier(f64),
    #[error("conversion boost {0}% outside {min}..={max}", min = CONVERSION_BOOST_RANGE.0, max = CONVERSION_BOOST_RANGE.1)]
    ConversionBoost(f64),
}

impl SpendScenario {
    pub fn validate(&self) -> Result<(), ScenarioError> {
        let within = |value: f64, (min, max): (f64, f64)| value >= min && value <= max;
        if !within(self.spend_multiplier, SPEND_MULTIPLIER_RANGE) {
            return Err(ScenarioError::SpendMultiplier(self.spend_multiplier));
        }
        if !within(self.conversion_boost_pct, CONVERSION_BOOST_RANGE) {
            return Err(ScenarioError::ConversionBoost(self.conversion_boost_pct));
        }
        Ok(())
    }
}

/// Current and projected figures for one scenario.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioProjection {
    pub scenario: SpendScenario,
    pub current_spend: f64,
    pub scenario_spend: f64,
    pub spend_change_pct: f64,
    pub current_enrollments: Option<u64>,
    pub scenario_enrollment_rate: f64,
    pub scenario_enrollments: u64,
    /// Absent when the program has no enrollment count to compare against.
    pub enrollment_delta: Option<i64>,
    pub current_cost_per_enrollment: Option<f64>,
    pub scenario_cost_per_enrollment: Option<f64>,
}

pub fn project(
    program: &Program,
    scenario: &SpendScenario,
) -> Result<ScenarioProjection, ScenarioError> {
    scenario.validate()?;

    let current_spend = program.spend.as_ref().map_or(0.0, |spend| spend.total_spend);
    let scenario_spend = current_spend * scenario.spend_multiplier;

    let base_rate = program
        .conversions
        .lead_to_enrollment_rate
        .unwrap_or(DEFAULT_ENROLLMENT_RATE);
    let scenario_enrollment_rate =
        (base_rate * (1.0 + scenario.conversion_boost_pct / 100.0)).min(100.0);

    let inquiries = program.funnel.inquiries.unwrap_or(0);
    let scenario_enrollments = (inquiries as f64 * scenario_enrollment_rate / 100.0)
        .round()
        .max(0.0) as u64;

    let current_enrollments = program.funnel.enrollments;
    let enrollment_delta =
        current_enrollments.map(|current| scenario_enrollments as i64 - current as i64);

    Ok(ScenarioProjection {
        scenario: *scenario,
        current_spend,
        scenario_spend,
        spend_change_pct: (scenario.spend_multiplier - 1.0) * 100.0,
        current_enrollments,
        scenario_enrollment_rate,
        scenario_enrollments,
        enrollment_delta,
        current_cost_per_enrollment: safe_divide(
            current_spend,
            current_enrollments.map(|enrollments| enrollments as f64),
        ),
        scenario_cost_per_enrollment: safe_divide(scenario_spend, scenario_enrollments as f64),
    })
}
