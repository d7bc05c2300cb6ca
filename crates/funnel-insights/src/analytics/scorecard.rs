//! Weekly scorecard evaluation: status against target, streaks, and pacing.
//!
//! Weekly histories are ordered oldest first and may contain gaps. A week with
//! no value counts as red because nothing shows the metric was on track.

use serde::{Deserialize, Serialize};

use super::metrics::{calculate_four_week_avg, calculate_wow_delta, safe_divide};

/// Share of target a non-cost metric must reach to count as green.
pub const ON_TRACK_RATIO: f64 = 0.9;
/// Consecutive red weeks that put a metric on the issues list.
pub const IDS_RED_STREAK: u32 = 2;

const AVERAGE_WINDOW: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricCategory {
    Leading,
    Lagging,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pipeline {
    Degree,
    Certificate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricStatus {
    Green,
    Red,
}

impl MetricStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Green => "On Track",
            Self::Red => "Off Track",
        }
    }
}

/// Metric definition plus its weekly values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScorecardMetric {
    pub id: String,
    pub name: String,
    pub category: MetricCategory,
    pub pipeline: Pipeline,
    pub owner: String,
    pub unit: String,
    pub target: f64,
    #[serde(default)]
    pub is_cost_metric: bool,
    #[serde(default)]
    pub sort_order: u32,
    #[serde(default)]
    pub history: Vec<Option<f64>>,
}

impl ScorecardMetric {
    fn week_status(&self, value: Option<f64>) -> MetricStatus {
        let on_track = if self.is_cost_metric {
            value.is_some_and(|value| value <= self.target)
        } else {
            safe_divide(value, self.target).is_some_and(|ratio| ratio >= ON_TRACK_RATIO)
        };

        if on_track {
            MetricStatus::Green
        } else {
            MetricStatus::Red
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricSnapshot {
    pub id: String,
    pub name: String,
    pub category: MetricCategory,
    pub pipeline: Pipeline,
    pub owner: String,
    pub unit: String,
    pub target: f64,
    pub is_cost_metric: bool,
    pub current_value: Option<f64>,
    pub last_week_value: Option<f64>,
    pub four_week_avg: Option<f64>,
    pub wow_delta: Option<f64>,
    pub status: MetricStatus,
    pub green_streak: u32,
    pub red_streak: u32,
    pub ids_flagged: bool,
}

pub fn evaluate_metric(metric: &ScorecardMetric) -> MetricSnapshot {
    let current_value = metric.history.last().copied().flatten();
    let last_week_value = metric
        .history
        .len()
        .checked_sub(2)
        .and_then(|index| metric.history[index]);

    let window_start = metric.history.len().saturating_sub(AVERAGE_WINDOW);
    let four_week_avg = calculate_four_week_avg(metric.history[window_start..].iter().copied());

    let status = metric.week_status(current_value);
    let streak = metric
        .history
        .iter()
        .rev()
        .take_while(|value| metric.week_status(**value) == status)
        .count() as u32;
    // An empty history still reports the current (red) week.
    let streak = streak.max(1);
    let (green_streak, red_streak) = match status {
        MetricStatus::Green => (streak, 0),
        MetricStatus::Red => (0, streak),
    };

    MetricSnapshot {
        id: metric.id.clone(),
        name: metric.name.clone(),
        category: metric.category,
        pipeline: metric.pipeline,
        owner: metric.owner.clone(),
        unit: metric.unit.clone(),
        target: metric.target,
        is_cost_metric: metric.is_cost_metric,
        current_value,
        last_week_value,
        four_week_avg,
        wow_delta: calculate_wow_delta(current_value, last_week_value),
        status,
        green_streak,
        red_streak,
        ids_flagged: red_streak >= IDS_RED_STREAK,
    }
}

/// Evaluates every metric, ordered by pipeline then `sort_order`.
pub fn evaluate_scorecard(metrics: &[ScorecardMetric]) -> Vec<MetricSnapshot> {
    let mut ordered: Vec<&ScorecardMetric> = metrics.iter().collect();
    ordered.sort_by_key(|metric| (metric.pipeline, metric.sort_order));
    ordered.into_iter().map(evaluate_metric).collect()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScorecardSummary {
    pub metrics_on_track: usize,
    pub metrics_off_track: usize,
    pub metrics_flagged: usize,
    pub leading_on_track: usize,
    pub leading_total: usize,
    pub leading_pacing_percent: f64,
    pub lagging_on_track: usize,
    pub lagging_total: usize,
    pub lagging_pacing_percent: f64,
}

pub fn summarize(snapshots: &[MetricSnapshot]) -> ScorecardSummary {
    let mut summary = ScorecardSummary::default();

    for snapshot in snapshots {
        let green = snapshot.status == MetricStatus::Green;
        if green {
            summary.metrics_on_track += 1;
        } else {
            summary.metrics_off_track += 1;
        }
        if snapshot.ids_flagged {
            summary.metrics_flagged += 1;
        }

        let (on_track, total) = match snapshot.category {
            MetricCategory::Leading => (&mut summary.leading_on_track, &mut summary.leading_total),
            MetricCategory::Lagging => (&mut summary.lagging_on_track, &mut summary.lagging_total),
        };
        *total += 1;
        if green {
            *on_track += 1;
        }
    }

    summary.leading_pacing_percent = pacing(summary.leading_on_track, summary.leading_total);
    summary.lagging_pacing_percent = pacing(summary.lagging_on_track, summary.lagging_total);
    summary
}

fn pacing(on_track: usize, total: usize) -> f64 {
    safe_divide(on_track as f64, total as f64).map_or(0.0, |ratio| ratio * 100.0)
}
