//! Data completeness scoring for program records.
//!
//! Required funnel stages carry 70% of the score and optional context fields
//! the remaining 30%. Only required-field gaps are reported back because they
//! are the ones that block a budget decision.

use super::domain::{CompletenessStatus, DataCompletenessScore, Program};

const REQUIRED_WEIGHT: f64 = 70.0;
const OPTIONAL_WEIGHT: f64 = 30.0;

/// One scored field: its dotted path, display name, and presence check.
struct CompletenessField {
    path: &'static str,
    display_name: &'static str,
    present: fn(&Program) -> bool,
}

const REQUIRED_FIELDS: [CompletenessField; 4] = [
    CompletenessField {
        path: "funnel.inquiries",
        display_name: "Inquiries",
        present: has_inquiries,
    },
    CompletenessField {
        path: "funnel.opportunities",
        display_name: "Opportunities",
        present: has_opportunities,
    },
    CompletenessField {
        path: "funnel.applications",
        display_name: "Applications",
        present: has_applications,
    },
    CompletenessField {
        path: "funnel.enrollments",
        display_name: "Enrollments",
        present: has_enrollments,
    },
];

const OPTIONAL_FIELDS: [CompletenessField; 5] = [
    CompletenessField {
        path: "funnel.visitors",
        display_name: "Visitors",
        present: has_visitors,
    },
    CompletenessField {
        path: "spend.totalSpend",
        display_name: "Marketing Spend",
        present: has_total_spend,
    },
    CompletenessField {
        path: "conversions.inquiryToOpportunityRate",
        display_name: "Inquiry to Opportunity Rate",
        present: has_inquiry_to_opportunity_rate,
    },
    CompletenessField {
        path: "conversions.opportunityToApplicationRate",
        display_name: "Opportunity to Application Rate",
        present: has_opportunity_to_application_rate,
    },
    CompletenessField {
        path: "conversions.applicationToEnrollmentRate",
        display_name: "Application to Enrollment Rate",
        present: has_application_to_enrollment_rate,
    },
];

fn finite(value: Option<f64>) -> bool {
    value.is_some_and(f64::is_finite)
}

fn has_inquiries(program: &Program) -> bool {
    program.funnel.inquiries.is_some()
}

fn has_opportunities(program: &Program) -> bool {
    program.funnel.opportunities.is_some()
}

fn has_applications(program: &Program) -> bool {
    program.funnel.applications.is_some()
}

fn has_enrollments(program: &Program) -> bool {
    program.funnel.enrollments.is_some()
}

fn has_visitors(program: &Program) -> bool {
    program.funnel.visitors.is_some()
}

fn has_total_spend(program: &Program) -> bool {
    finite(program.spend.as_ref().map(|spend| spend.total_spend))
}

fn has_inquiry_to_opportunity_rate(program: &Program) -> bool {
    finite(program.conversions.inquiry_to_opportunity_rate)
}

fn has_opportunity_to_application_rate(program: &Program) -> bool {
    finite(program.conversions.opportunity_to_application_rate)
}

fn has_application_to_enrollment_rate(program: &Program) -> bool {
    finite(program.conversions.application_to_enrollment_rate)
}

pub fn calculate_completeness_score(program: &Program) -> DataCompletenessScore {
    let mut missing_fields = Vec::new();
    let mut required_present = 0usize;

    for field in &REQUIRED_FIELDS {
        if (field.present)(program) {
            required_present += 1;
        } else {
            missing_fields.push(field.path.to_string());
        }
    }

    let optional_present = OPTIONAL_FIELDS
        .iter()
        .filter(|field| (field.present)(program))
        .count();

    let required_score = required_present as f64 / REQUIRED_FIELDS.len() as f64 * REQUIRED_WEIGHT;
    let optional_score = optional_present as f64 / OPTIONAL_FIELDS.len() as f64 * OPTIONAL_WEIGHT;
    let overall = (required_score + optional_score).round().clamp(0.0, 100.0) as u8;

    DataCompletenessScore {
        overall,
        missing_fields,
        status: CompletenessStatus::from_score(overall),
    }
}

/// Human-readable name for a scored field path; unknown paths are echoed back.
pub fn field_display_name(path: &str) -> &str {
    REQUIRED_FIELDS
        .iter()
        .chain(OPTIONAL_FIELDS.iter())
        .find(|field| field.path == path)
        .map(|field| field.display_name)
        .unwrap_or(path)
}

/// Programs whose stored completeness score has the given status.
///
/// Programs that were never scored are excluded.
pub fn filter_by_completeness(programs: &[Program], status: CompletenessStatus) -> Vec<&Program> {
    programs
        .iter()
        .filter(|program| {
            program
                .data_completeness
                .as_ref()
                .is_some_and(|score| score.status == status)
        })
        .collect()
}
