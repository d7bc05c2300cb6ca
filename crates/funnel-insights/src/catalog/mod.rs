//! Program catalog: raw records, enrichment, providers, and CSV import.

mod import;
mod normalizer;
mod parser;
pub mod provider;
pub mod router;
mod sample;

pub use import::{CatalogImportError, ProgramCsvImporter};
pub use provider::{
    FixedDataProvider, ProgramFilters, ProgramProvider, ProviderError, ALL_LEVELS, ALL_SCHOOLS,
};
pub use router::catalog_router;
pub use sample::sample_records;

use serde::{Deserialize, Serialize};

use crate::analytics::completeness::calculate_completeness_score;
use crate::analytics::domain::{FunnelStageCount, Program, ProgramId, ProgramLevel, SpendData};
use crate::analytics::metrics::{calculate_conversion_metrics, calculate_roi_metrics};
use crate::analytics::recommendation::{generate_recommendation, RecommendationCriteria};

/// Program data as delivered by a source, before any derived analytics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramRecord {
    pub school: String,
    pub level: ProgramLevel,
    pub program_name: String,
    #[serde(default)]
    pub funnel: FunnelStageCount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spend: Option<SpendData>,
}

impl ProgramRecord {
    pub fn id(&self) -> ProgramId {
        ProgramId::derive(&self.school, &self.program_name)
    }

    /// Program shell with no derived metrics; `leads` mirrors inquiries.
    pub fn into_program(self) -> Program {
        Program {
            id: self.id(),
            leads: self.funnel.inquiries.unwrap_or(0),
            school: self.school,
            level: self.level,
            program_name: self.program_name,
            funnel: self.funnel,
            conversions: Default::default(),
            roi: None,
            spend: self.spend,
            recommendation: None,
            data_completeness: None,
        }
    }
}

/// Derives conversions, ROI, completeness, and a recommendation for a record.
///
/// Completeness is scored before the recommendation so unreliable data pauses
/// the program.
pub fn enrich_program(record: ProgramRecord, criteria: &RecommendationCriteria) -> Program {
    let mut program = record.into_program();
    program.conversions = calculate_conversion_metrics(&program.funnel);
    program.roi = program
        .spend
        .as_ref()
        .map(|spend| calculate_roi_metrics(spend.total_spend, &program.funnel));
    program.data_completeness = Some(calculate_completeness_score(&program));
    program.recommendation = Some(generate_recommendation(&program, Some(criteria)));
    program
}

/// Program shape accepted for ad-hoc evaluation.
///
/// Identity and derived fields (`id`, `leads`, metrics) are ignored when
/// present; only raw funnel and spend data drive the outcome.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramInput {
    #[serde(default)]
    pub school: String,
    #[serde(default)]
    pub level: Option<ProgramLevel>,
    #[serde(default)]
    pub program_name: String,
    #[serde(default)]
    pub funnel: FunnelStageCount,
    #[serde(default)]
    pub spend: Option<SpendData>,
}

impl From<ProgramInput> for ProgramRecord {
    fn from(input: ProgramInput) -> Self {
        Self {
            school: input.school,
            level: input.level.unwrap_or(ProgramLevel::Certificate),
            program_name: input.program_name,
            funnel: input.funnel,
            spend: input.spend,
        }
    }
}

impl From<Program> for ProgramInput {
    fn from(program: Program) -> Self {
        Self {
            school: program.school,
            level: Some(program.level),
            program_name: program.program_name,
            funnel: program.funnel,
            spend: program.spend,
        }
    }
}

/// Enriches a posted program, recomputing every derived field from its raw data.
pub fn evaluate_program(input: ProgramInput, criteria: &RecommendationCriteria) -> Program {
    enrich_program(input.into(), criteria)
}
