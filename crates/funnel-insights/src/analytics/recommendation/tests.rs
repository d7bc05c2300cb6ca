use super::*;
use crate::analytics::domain::{
    CompletenessStatus, Confidence, ConversionMetrics, DataCompletenessScore, FunnelStageCount,
    ProgramId, ProgramLevel, RecommendationAction, RoiMetrics, SpendData,
};

fn program(leads: u64, rate: Option<f64>, cost: Option<f64>, status: CompletenessStatus) -> Program {
    let overall = match status {
        CompletenessStatus::Complete => 100,
        CompletenessStatus::Partial => 76,
        CompletenessStatus::Unreliable => 12,
    };
    Program {
        id: ProgramId::derive("SMU", "Data Science Certificate"),
        school: "SMU".to_string(),
        level: ProgramLevel::Certificate,
        program_name: "Data Science Certificate".to_string(),
        leads,
        funnel: FunnelStageCount {
            inquiries: Some(leads),
            ..FunnelStageCount::default()
        },
        conversions: ConversionMetrics {
            contact_to_enrollment_rate: rate,
            lead_to_enrollment_rate: rate,
            ..ConversionMetrics::default()
        },
        roi: Some(RoiMetrics {
            cost_per_enrollment: cost,
            ..RoiMetrics::default()
        }),
        spend: Some(SpendData::total(60_000.0)),
        recommendation: None,
        data_completeness: Some(DataCompletenessScore {
            overall,
            missing_fields: Vec::new(),
            status,
        }),
    }
}

fn outcome(program: &Program) -> RecommendationOutcome {
    RecommendationEngine::default().evaluate(program)
}

#[test]
fn strong_programs_get_an_increase() {
    let program = program(200, Some(20.0), Some(1_500.0), CompletenessStatus::Complete);

    let result = outcome(&program);

    assert_eq!(result.rule, RecommendationRule::StrongPerformance);
    assert_eq!(result.recommendation.action, RecommendationAction::Increase);
    assert_eq!(result.recommendation.confidence, Confidence::High);
    assert_eq!(result.recommendation.suggested_spend_change, Some(25));
    assert_eq!(
        result.recommendation.reasoning,
        "Strong performance: 20.0% conversion rate and $1,500 cost per enrollment. Scale investment."
    );
}

#[test]
fn low_volume_holds_with_low_confidence() {
    let program = program(30, Some(20.0), Some(1_500.0), CompletenessStatus::Complete);

    let result = outcome(&program);

    assert_eq!(result.rule, RecommendationRule::InsufficientVolume);
    assert_eq!(result.recommendation.action, RecommendationAction::Hold);
    assert_eq!(result.recommendation.confidence, Confidence::Low);
    assert!(result
        .recommendation
        .reasoning
        .contains("Insufficient lead volume (30 leads)"));
    assert!(result.recommendation.reasoning.contains("at least 50 leads"));
}

#[test]
fn unreliable_data_pauses_regardless_of_performance() {
    let program = program(5_000, Some(40.0), Some(500.0), CompletenessStatus::Unreliable);

    let result = outcome(&program);

    assert_eq!(result.rule, RecommendationRule::UnreliableData);
    assert_eq!(result.recommendation.action, RecommendationAction::Pause);
    assert_eq!(result.recommendation.confidence, Confidence::Low);
    assert_eq!(result.recommendation.suggested_spend_change, None);
    assert!(result.recommendation.reasoning.contains("12/100"));
}

#[test]
fn unscored_programs_skip_the_data_quality_rule() {
    let mut program = program(200, Some(20.0), Some(1_500.0), CompletenessStatus::Complete);
    program.data_completeness = None;

    assert_eq!(outcome(&program).rule, RecommendationRule::StrongPerformance);
}

#[test]
fn missing_rate_or_cost_holds() {
    let no_rate = program(200, None, Some(1_500.0), CompletenessStatus::Partial);
    let no_cost = program(200, Some(12.0), None, CompletenessStatus::Partial);
    let mut no_roi = program(200, Some(12.0), Some(1_500.0), CompletenessStatus::Partial);
    no_roi.roi = None;

    for program in [no_rate, no_cost, no_roi] {
        let result = outcome(&program);
        assert_eq!(result.rule, RecommendationRule::MissingMetrics);
        assert_eq!(result.recommendation.action, RecommendationAction::Hold);
        assert_eq!(result.recommendation.confidence, Confidence::Low);
        assert_eq!(
            result.recommendation.reasoning,
            "Missing conversion rate or cost data. Cannot assess ROI."
        );
    }
}

#[test]
fn solid_programs_hold_with_high_confidence() {
    let program = program(400, Some(8.0), Some(4_200.0), CompletenessStatus::Complete);

    let result = outcome(&program);

    assert_eq!(result.rule, RecommendationRule::SolidPerformance);
    assert_eq!(result.recommendation.action, RecommendationAction::Hold);
    assert_eq!(result.recommendation.confidence, Confidence::High);
    assert!(result.recommendation.reasoning.contains("8.0%"));
    assert!(result.recommendation.reasoning.contains("$4,200"));
}

#[test]
fn expensive_but_converting_programs_hold_with_medium_confidence() {
    let program = program(400, Some(9.5), Some(7_250.0), CompletenessStatus::Complete);

    let result = outcome(&program);

    assert_eq!(result.rule, RecommendationRule::HighCost);
    assert_eq!(result.recommendation.action, RecommendationAction::Hold);
    assert_eq!(result.recommendation.confidence, Confidence::Medium);
    assert_eq!(result.recommendation.suggested_spend_change, None);
    assert!(result.recommendation.reasoning.contains("9.5%"));
    assert!(result.recommendation.reasoning.contains("$7,250"));
}

#[test]
fn weak_conversion_reduces_spend() {
    let cheap = program(400, Some(3.2), Some(2_500.0), CompletenessStatus::Complete);
    let expensive = program(400, Some(3.2), Some(9_000.0), CompletenessStatus::Complete);

    let cheap = outcome(&cheap);
    assert_eq!(cheap.rule, RecommendationRule::LowConversion);
    assert_eq!(cheap.recommendation.action, RecommendationAction::Reduce);
    assert_eq!(cheap.recommendation.confidence, Confidence::Medium);
    assert_eq!(cheap.recommendation.suggested_spend_change, Some(-15));
    assert!(cheap.recommendation.reasoning.contains("3.2%"));

    let expensive = outcome(&expensive);
    assert_eq!(expensive.rule, RecommendationRule::Underperforming);
    assert_eq!(expensive.recommendation.action, RecommendationAction::Reduce);
    assert_eq!(expensive.recommendation.confidence, Confidence::High);
    assert_eq!(expensive.recommendation.suggested_spend_change, Some(-30));
    assert_eq!(
        expensive.recommendation.reasoning,
        "Underperforming: 3.2% conversion rate and $9,000 cost per enrollment. Reduce spend until performance improves."
    );
}

#[test]
fn thresholds_are_inclusive() {
    let at_excellent = program(50, Some(15.0), Some(2_000.0), CompletenessStatus::Partial);
    let at_minimum = program(50, Some(5.0), Some(5_000.0), CompletenessStatus::Partial);

    assert_eq!(outcome(&at_excellent).rule, RecommendationRule::StrongPerformance);
    assert_eq!(outcome(&at_minimum).rule, RecommendationRule::SolidPerformance);
}

#[test]
fn non_finite_metrics_reach_the_fallback() {
    let program = program(400, Some(f64::NAN), Some(1_000.0), CompletenessStatus::Complete);

    let result = outcome(&program);

    assert_eq!(result.rule, RecommendationRule::Fallback);
    assert_eq!(result.recommendation.action, RecommendationAction::Hold);
    assert_eq!(result.recommendation.confidence, Confidence::Low);
}

#[test]
fn custom_criteria_shift_the_boundaries() {
    let criteria = RecommendationCriteria {
        min_leads: 500,
        ..RecommendationCriteria::default()
    };
    let program = program(200, Some(20.0), Some(1_500.0), CompletenessStatus::Complete);

    let recommendation = generate_recommendation(&program, Some(&criteria));

    assert_eq!(recommendation.action, RecommendationAction::Hold);
    assert!(recommendation.reasoning.contains("at least 500 leads"));
}

#[test]
fn absent_criteria_apply_the_defaults() {
    let program = program(49, Some(20.0), Some(1_500.0), CompletenessStatus::Complete);

    let recommendation = generate_recommendation(&program, None);

    assert_eq!(recommendation.action, RecommendationAction::Hold);
    assert_eq!(
        recommendation.reasoning,
        "Insufficient lead volume (49 leads). Need at least 50 leads for reliable analysis."
    );
    assert_eq!(
        recommendation,
        generate_recommendation(&program, Some(&RecommendationCriteria::default()))
    );
}

#[test]
fn criteria_deserialize_with_defaults() {
    let criteria: RecommendationCriteria =
        serde_json::from_str(r#"{"minLeads": 10}"#).expect("criteria json");

    assert_eq!(criteria.min_leads, 10);
    assert_eq!(criteria.max_cost_per_enrollment, 5_000.0);
    assert_eq!(criteria.excellent_conversion_rate, 15.0);
}
