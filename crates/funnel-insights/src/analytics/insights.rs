//! Narrative insights for a single program and a portfolio-level buy/hold summary.

use serde::Serialize;

use super::completeness::field_display_name;
use super::domain::{CompletenessStatus, Confidence, Program, RecommendationAction};
use super::metrics::{format_currency, format_number};

const TOP_RECOMMENDATIONS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    Positive,
    Negative,
    Neutral,
    Warning,
}

impl InsightKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
            Self::Warning => "warning",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgramInsight {
    pub kind: InsightKind,
    pub title: &'static str,
    pub description: String,
}

impl ProgramInsight {
    fn new(kind: InsightKind, title: &'static str, description: String) -> Self {
        Self {
            kind,
            title,
            description,
        }
    }
}

/// Observations about conversion, volume, funnel leakage, cost, and data quality.
///
/// Ratios that cannot be computed are skipped rather than reported as zero.
pub fn program_insights(program: &Program) -> Vec<ProgramInsight> {
    let mut insights = Vec::new();

    match program.conversions.lead_to_enrollment_rate {
        Some(rate) if rate > 10.0 => insights.push(ProgramInsight::new(
            InsightKind::Positive,
            "Strong Conversion Performance",
            format!(
                "{rate:.1}% lead-to-enrollment rate is above average. This program converts leads efficiently."
            ),
        )),
        Some(rate) if rate < 3.0 => insights.push(ProgramInsight::new(
            InsightKind::Negative,
            "Low Conversion Rate",
            format!(
                "{rate:.1}% lead-to-enrollment rate suggests conversion challenges. Review lead quality and nurture process."
            ),
        )),
        _ => {}
    }

    if program.leads > 500 {
        insights.push(ProgramInsight::new(
            InsightKind::Positive,
            "High Lead Volume",
            format!(
                "{} leads provides strong statistical significance for decision-making.",
                format_number(Some(program.leads as f64))
            ),
        ));
    } else if program.leads < 50 {
        insights.push(ProgramInsight::new(
            InsightKind::Warning,
            "Limited Data Volume",
            format!(
                "Only {} leads. Metrics may not be statistically reliable. Consider longer time window.",
                program.leads
            ),
        ));
    }

    if let Some(rate) = program.conversions.inquiry_to_opportunity_rate {
        if rate < 15.0 {
            insights.push(ProgramInsight::new(
                InsightKind::Negative,
                "High Early-Stage Drop-off",
                format!(
                    "{:.1}% of inquiries don't convert to opportunities. Review lead qualification criteria.",
                    100.0 - rate
                ),
            ));
        }
    }

    if let Some(rate) = program.conversions.application_to_enrollment_rate {
        if rate < 30.0 {
            insights.push(ProgramInsight::new(
                InsightKind::Warning,
                "Application-to-Enrollment Gap",
                format!(
                    "Only {rate:.1}% of applications convert to enrollments. Review enrollment barriers and financial aid process."
                ),
            ));
        }
    }

    match program.roi.and_then(|roi| roi.cost_per_enrollment) {
        Some(cost) if cost > 5_000.0 => insights.push(ProgramInsight::new(
            InsightKind::Warning,
            "High Cost Per Enrollment",
            format!(
                "{} CPE is elevated. Consider optimizing spend allocation or improving conversion rates.",
                format_currency(Some(cost))
            ),
        )),
        Some(cost) if cost < 1_000.0 => insights.push(ProgramInsight::new(
            InsightKind::Positive,
            "Excellent ROI",
            format!(
                "{} CPE indicates highly efficient spend. This program is a strong performer.",
                format_currency(Some(cost))
            ),
        )),
        _ => {}
    }

    if let Some(score) = program
        .data_completeness
        .as_ref()
        .filter(|score| score.status == CompletenessStatus::Unreliable)
    {
        let missing: Vec<&str> = score
            .missing_fields
            .iter()
            .map(|path| field_display_name(path))
            .collect();
        insights.push(ProgramInsight::new(
            InsightKind::Warning,
            "Data Completeness Issues",
            format!(
                "Missing {} key metrics: {}. Insights may be incomplete.",
                missing.len(),
                missing.join(", ")
            ),
        ));
    }

    insights
}

/// Program reference surfaced in the portfolio's top picks.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedProgram {
    pub id: String,
    pub school: String,
    pub program_name: String,
    pub confidence: Confidence,
    pub suggested_spend_change: Option<i16>,
    pub reasoning: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub total_programs: usize,
    pub strong_buys: usize,
    pub buys: usize,
    pub holds: usize,
    pub reduces: usize,
    pub top_recommendations: Vec<RecommendedProgram>,
}

pub fn portfolio_summary(programs: &[Program]) -> PortfolioSummary {
    let mut summary = PortfolioSummary {
        total_programs: programs.len(),
        ..PortfolioSummary::default()
    };

    for recommendation in programs.iter().filter_map(|p| p.recommendation.as_ref()) {
        match (recommendation.action, recommendation.confidence) {
            (RecommendationAction::Increase, Confidence::High) => summary.strong_buys += 1,
            (RecommendationAction::Increase, _) => summary.buys += 1,
            (RecommendationAction::Hold, _) => summary.holds += 1,
            (RecommendationAction::Reduce | RecommendationAction::Pause, _) => {
                summary.reduces += 1
            }
        }
    }

    let mut picks: Vec<(&Program, Confidence)> = programs
        .iter()
        .filter_map(|program| {
            let recommendation = program.recommendation.as_ref()?;
            let eligible = recommendation.action == RecommendationAction::Increase
                && matches!(recommendation.confidence, Confidence::High | Confidence::Medium);
            eligible.then_some((program, recommendation.confidence))
        })
        .collect();
    // Stable sort keeps input order within a confidence tier.
    picks.sort_by_key(|(_, confidence)| *confidence);

    summary.top_recommendations = picks
        .into_iter()
        .take(TOP_RECOMMENDATIONS)
        .filter_map(|(program, _)| {
            let recommendation = program.recommendation.as_ref()?;
            Some(RecommendedProgram {
                id: program.id.to_string(),
                school: program.school.clone(),
                program_name: program.program_name.clone(),
                confidence: recommendation.confidence,
                suggested_spend_change: recommendation.suggested_spend_change,
                reasoning: recommendation.reasoning.clone(),
            })
        })
        .collect();

    summary
}
