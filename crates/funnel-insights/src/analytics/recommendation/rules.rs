use serde::{Deserialize, Serialize};

use super::super::domain::{
    BudgetRecommendation, CompletenessStatus, Confidence, Program, RecommendationAction,
};
use super::super::metrics::format_currency;
use super::criteria::RecommendationCriteria;

/// Identifies which entry of the rule table produced a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationRule {
    UnreliableData,
    InsufficientVolume,
    MissingMetrics,
    StrongPerformance,
    SolidPerformance,
    HighCost,
    LowConversion,
    Underperforming,
    Fallback,
}

impl RecommendationRule {
    pub const fn label(self) -> &'static str {
        match self {
            Self::UnreliableData => "Unreliable data",
            Self::InsufficientVolume => "Insufficient volume",
            Self::MissingMetrics => "Missing metrics",
            Self::StrongPerformance => "Strong performance",
            Self::SolidPerformance => "Solid performance",
            Self::HighCost => "High cost",
            Self::LowConversion => "Low conversion",
            Self::Underperforming => "Underperforming",
            Self::Fallback => "Fallback",
        }
    }
}

/// Inputs the rule table reads from a program.
pub(crate) struct Signals {
    pub completeness: Option<(CompletenessStatus, u8)>,
    pub leads: u64,
    pub conversion_rate: Option<f64>,
    pub cost_per_enrollment: Option<f64>,
}

impl Signals {
    pub fn from_program(program: &Program) -> Self {
        Self {
            completeness: program
                .data_completeness
                .as_ref()
                .map(|score| (score.status, score.overall)),
            leads: program.leads,
            conversion_rate: program.conversions.lead_to_enrollment_rate,
            cost_per_enrollment: program.roi.and_then(|roi| roi.cost_per_enrollment),
        }
    }

    /// Rate and cost with absent values as NaN so every comparison fails.
    fn metrics(&self) -> (f64, f64) {
        (
            self.conversion_rate.unwrap_or(f64::NAN),
            self.cost_per_enrollment.unwrap_or(f64::NAN),
        )
    }
}

pub(crate) struct Rule {
    pub rule: RecommendationRule,
    pub applies: fn(&Signals, &RecommendationCriteria) -> bool,
    pub outcome: fn(&Signals, &RecommendationCriteria) -> BudgetRecommendation,
}

/// Evaluated top to bottom; the first matching entry wins and the last always matches.
pub(crate) static RULES: [Rule; 9] = [
    Rule {
        rule: RecommendationRule::UnreliableData,
        applies: |signals, _| {
            matches!(signals.completeness, Some((CompletenessStatus::Unreliable, _)))
        },
        outcome: unreliable_data,
    },
    Rule {
        rule: RecommendationRule::InsufficientVolume,
        applies: |signals, criteria| signals.leads < criteria.min_leads,
        outcome: insufficient_volume,
    },
    Rule {
        rule: RecommendationRule::MissingMetrics,
        applies: |signals, _| {
            signals.conversion_rate.is_none() || signals.cost_per_enrollment.is_none()
        },
        outcome: missing_metrics,
    },
    Rule {
        rule: RecommendationRule::StrongPerformance,
        applies: |signals, criteria| {
            let (rate, cost) = signals.metrics();
            rate >= criteria.excellent_conversion_rate
                && cost <= criteria.excellent_cost_per_enrollment
        },
        outcome: strong_performance,
    },
    Rule {
        rule: RecommendationRule::SolidPerformance,
        applies: |signals, criteria| {
            let (rate, cost) = signals.metrics();
            rate >= criteria.min_conversion_rate && cost <= criteria.max_cost_per_enrollment
        },
        outcome: solid_performance,
    },
    Rule {
        rule: RecommendationRule::HighCost,
        applies: |signals, criteria| {
            let (rate, cost) = signals.metrics();
            rate >= criteria.min_conversion_rate && cost > criteria.max_cost_per_enrollment
        },
        outcome: high_cost,
    },
    Rule {
        rule: RecommendationRule::LowConversion,
        applies: |signals, criteria| {
            let (rate, cost) = signals.metrics();
            rate < criteria.min_conversion_rate && cost <= criteria.max_cost_per_enrollment
        },
        outcome: low_conversion,
    },
    Rule {
        rule: RecommendationRule::Underperforming,
        applies: |signals, criteria| {
            let (rate, cost) = signals.metrics();
            rate < criteria.min_conversion_rate && cost > criteria.max_cost_per_enrollment
        },
        outcome: underperforming,
    },
    Rule {
        rule: RecommendationRule::Fallback,
        applies: |_, _| true,
        outcome: fallback,
    },
];

fn verdict(
    action: RecommendationAction,
    confidence: Confidence,
    reasoning: String,
    suggested_spend_change: Option<i16>,
) -> BudgetRecommendation {
    BudgetRecommendation {
        action,
        confidence,
        reasoning,
        suggested_spend_change,
    }
}

fn unreliable_data(signals: &Signals, _: &RecommendationCriteria) -> BudgetRecommendation {
    let overall = signals.completeness.map_or(0, |(_, overall)| overall);
    verdict(
        RecommendationAction::Pause,
        Confidence::Low,
        format!(
            "Insufficient data quality (completeness score {overall}/100). Complete data collection before making investment decisions."
        ),
        None,
    )
}

fn insufficient_volume(signals: &Signals, criteria: &RecommendationCriteria) -> BudgetRecommendation {
    verdict(
        RecommendationAction::Hold,
        Confidence::Low,
        format!(
            "Insufficient lead volume ({} leads). Need at least {} leads for reliable analysis.",
            signals.leads, criteria.min_leads
        ),
        None,
    )
}

fn missing_metrics(_: &Signals, _: &RecommendationCriteria) -> BudgetRecommendation {
    verdict(
        RecommendationAction::Hold,
        Confidence::Low,
        "Missing conversion rate or cost data. Cannot assess ROI.".to_string(),
        None,
    )
}

fn strong_performance(signals: &Signals, _: &RecommendationCriteria) -> BudgetRecommendation {
    let (rate, _) = signals.metrics();
    verdict(
        RecommendationAction::Increase,
        Confidence::High,
        format!(
            "Strong performance: {rate:.1}% conversion rate and {} cost per enrollment. Scale investment.",
            format_currency(signals.cost_per_enrollment)
        ),
        Some(25),
    )
}

fn solid_performance(signals: &Signals, _: &RecommendationCriteria) -> BudgetRecommendation {
    let (rate, _) = signals.metrics();
    verdict(
        RecommendationAction::Hold,
        Confidence::High,
        format!(
            "Solid performance: {rate:.1}% conversion rate and {} cost per enrollment. Maintain current investment.",
            format_currency(signals.cost_per_enrollment)
        ),
        None,
    )
}

fn high_cost(signals: &Signals, _: &RecommendationCriteria) -> BudgetRecommendation {
    let (rate, _) = signals.metrics();
    verdict(
        RecommendationAction::Hold,
        Confidence::Medium,
        format!(
            "Good conversion ({rate:.1}%) but high cost per enrollment ({}). Optimize spend efficiency before scaling.",
            format_currency(signals.cost_per_enrollment)
        ),
        None,
    )
}

fn low_conversion(signals: &Signals, _: &RecommendationCriteria) -> BudgetRecommendation {
    let (rate, _) = signals.metrics();
    verdict(
        RecommendationAction::Reduce,
        Confidence::Medium,
        format!(
            "Low conversion rate ({rate:.1}%). Investigate funnel drop-off points before increasing investment."
        ),
        Some(-15),
    )
}

fn underperforming(signals: &Signals, _: &RecommendationCriteria) -> BudgetRecommendation {
    let (rate, _) = signals.metrics();
    verdict(
        RecommendationAction::Reduce,
        Confidence::High,
        format!(
            "Underperforming: {rate:.1}% conversion rate and {} cost per enrollment. Reduce spend until performance improves.",
            format_currency(signals.cost_per_enrollment)
        ),
        Some(-30),
    )
}

fn fallback(_: &Signals, _: &RecommendationCriteria) -> BudgetRecommendation {
    verdict(
        RecommendationAction::Hold,
        Confidence::Low,
        "Unable to determine clear recommendation. Monitor performance.".to_string(),
        None,
    )
}
