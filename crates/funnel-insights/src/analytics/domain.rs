use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Stable program identifier derived from school and program name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgramId(pub String);

impl ProgramId {
    /// Builds a content-derived identifier, e.g. `msu-business-analytics-cert`.
    pub fn derive(school: &str, program_name: &str) -> Self {
        let mut slug = String::with_capacity(school.len() + program_name.len() + 1);
        for part in [school, program_name] {
            for ch in part.chars() {
                if ch.is_ascii_alphanumeric() {
                    slug.push(ch.to_ascii_lowercase());
                } else if !slug.is_empty() && !slug.ends_with('-') {
                    slug.push('-');
                }
            }
            if !slug.is_empty() && !slug.ends_with('-') {
                slug.push('-');
            }
        }
        let trimmed = slug.trim_end_matches('-').to_string();
        Self(trimmed)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProgramId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ProgramLevel {
    Certificate,
    Degree,
}

impl ProgramLevel {
    pub const fn ordered() -> [Self; 2] {
        [Self::Certificate, Self::Degree]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Certificate => "Certificate",
            Self::Degree => "Degree",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "certificate" | "cert" => Some(Self::Certificate),
            "degree" => Some(Self::Degree),
            _ => None,
        }
    }
}

/// Prospect counts per funnel stage over one reporting window.
///
/// Every stage is optional because upstream exports routinely omit columns.
/// The `inquiries >= opportunities >= applications >= enrollments` ordering is
/// expected but never enforced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunnelStageCount {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visitors: Option<u64>,
    #[serde(default)]
    pub inquiries: Option<u64>,
    #[serde(default)]
    pub opportunities: Option<u64>,
    #[serde(default)]
    pub applications: Option<u64>,
    #[serde(default)]
    pub enrollments: Option<u64>,
}

impl FunnelStageCount {
    pub fn new(inquiries: u64, opportunities: u64, applications: u64, enrollments: u64) -> Self {
        Self {
            visitors: None,
            inquiries: Some(inquiries),
            opportunities: Some(opportunities),
            applications: Some(applications),
            enrollments: Some(enrollments),
        }
    }

    pub fn with_visitors(mut self, visitors: u64) -> Self {
        self.visitors = Some(visitors);
        self
    }
}

/// Stage-to-stage conversion percentages on a 0-100 scale.
///
/// `lead_to_enrollment_rate` always equals `contact_to_enrollment_rate`; both
/// are kept because dashboards and exports address them separately.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionMetrics {
    pub inquiry_to_opportunity_rate: Option<f64>,
    pub opportunity_to_application_rate: Option<f64>,
    pub application_to_enrollment_rate: Option<f64>,
    pub contact_to_application_rate: Option<f64>,
    pub contact_to_enrollment_rate: Option<f64>,
    pub lead_to_enrollment_rate: Option<f64>,
}

/// Spend divided by each funnel stage count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoiMetrics {
    pub cost_per_lead: Option<f64>,
    pub cost_per_opportunity: Option<f64>,
    pub cost_per_application: Option<f64>,
    pub cost_per_enrollment: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendPeriod {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendData {
    pub total_spend: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spend_by_channel: Option<BTreeMap<String, f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spend_period: Option<SpendPeriod>,
}

impl SpendData {
    pub fn total(total_spend: f64) -> Self {
        Self {
            total_spend,
            spend_by_channel: None,
            spend_period: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletenessStatus {
    Complete,
    Partial,
    Unreliable,
}

impl CompletenessStatus {
    /// Classifies an overall score; `>= 90` complete, `>= 50` partial.
    pub const fn from_score(overall: u8) -> Self {
        if overall >= 90 {
            Self::Complete
        } else if overall >= 50 {
            Self::Partial
        } else {
            Self::Unreliable
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Complete => "Complete",
            Self::Partial => "Partial",
            Self::Unreliable => "Unreliable",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataCompletenessScore {
    pub overall: u8,
    pub missing_fields: Vec<String>,
    pub status: CompletenessStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationAction {
    Increase,
    Hold,
    Reduce,
    Pause,
}

impl RecommendationAction {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Increase => "Increase Spend",
            Self::Hold => "Hold Spend",
            Self::Reduce => "Reduce Spend",
            Self::Pause => "Pause / Investigate",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetRecommendation {
    pub action: RecommendationAction,
    pub confidence: Confidence,
    pub reasoning: String,
    /// Signed percentage, set for increases and reductions only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_spend_change: Option<i16>,
}

/// A program with its funnel, spend, and derived analytics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Program {
    pub id: ProgramId,
    pub school: String,
    pub level: ProgramLevel,
    pub program_name: String,
    /// Mirrors `funnel.inquiries`.
    pub leads: u64,
    pub funnel: FunnelStageCount,
    #[serde(default)]
    pub conversions: ConversionMetrics,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roi: Option<RoiMetrics>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spend: Option<SpendData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<BudgetRecommendation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_completeness: Option<DataCompletenessScore>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn program_id_is_derived_from_school_and_name() {
        let id = ProgramId::derive("Emory GBS", "  Executive MBA (Weekend) ");
        assert_eq!(id.as_str(), "emory-gbs-executive-mba-weekend");

        let same = ProgramId::derive("emory gbs", "Executive   MBA - Weekend");
        assert_eq!(id, same);
    }

    #[test]
    fn completeness_thresholds_are_exact() {
        assert_eq!(CompletenessStatus::from_score(100), CompletenessStatus::Complete);
        assert_eq!(CompletenessStatus::from_score(90), CompletenessStatus::Complete);
        assert_eq!(CompletenessStatus::from_score(89), CompletenessStatus::Partial);
        assert_eq!(CompletenessStatus::from_score(50), CompletenessStatus::Partial);
        assert_eq!(CompletenessStatus::from_score(49), CompletenessStatus::Unreliable);
        assert_eq!(CompletenessStatus::from_score(0), CompletenessStatus::Unreliable);
    }

    #[test]
    fn level_parsing_accepts_common_spellings() {
        assert_eq!(ProgramLevel::parse(" Certificate "), Some(ProgramLevel::Certificate));
        assert_eq!(ProgramLevel::parse("DEGREE"), Some(ProgramLevel::Degree));
        assert_eq!(ProgramLevel::parse("bootcamp"), None);
    }

    #[test]
    fn funnel_serializes_with_camel_case_and_nulls() {
        let funnel = FunnelStageCount {
            enrollments: None,
            ..FunnelStageCount::new(10, 5, 2, 1)
        };
        let value = serde_json::to_value(funnel).expect("serialize funnel");
        assert_eq!(value["inquiries"], 10);
        assert!(value["enrollments"].is_null());
        assert!(value.get("visitors").is_none());
    }
}
