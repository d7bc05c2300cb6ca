use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::{RwLock, RwLockReadGuard};

use serde::{Deserialize, Serialize};
use tracing::info;

use super::import::{CatalogImportError, ProgramCsvImporter};
use super::sample::sample_records;
use super::{enrich_program, ProgramRecord};
use crate::analytics::domain::{Program, ProgramId, ProgramLevel, RecommendationAction};
use crate::analytics::recommendation::RecommendationCriteria;

/// Filter value meaning "every school".
pub const ALL_SCHOOLS: &str = "All Schools";
/// Filter value meaning "every program level".
pub const ALL_LEVELS: &str = "All Program Types";

/// Optional narrowing applied to a catalog listing; unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProgramFilters {
    pub school: Option<String>,
    pub level: Option<String>,
    pub min_leads: Option<u64>,
    pub max_cost_per_lead: Option<f64>,
    pub recommendation_action: Option<RecommendationAction>,
}

impl ProgramFilters {
    pub fn matches(&self, program: &Program) -> bool {
        if let Some(school) = self.school.as_deref().filter(|school| *school != ALL_SCHOOLS) {
            if program.school != school {
                return false;
            }
        }

        if let Some(level) = self.level.as_deref().filter(|level| *level != ALL_LEVELS) {
            if ProgramLevel::parse(level) != Some(program.level) {
                return false;
            }
        }

        if let Some(min_leads) = self.min_leads {
            if program.leads < min_leads {
                return false;
            }
        }

        if let Some(max_cost) = self.max_cost_per_lead {
            let cost_per_lead = program.roi.and_then(|roi| roi.cost_per_lead);
            if !cost_per_lead.is_some_and(|cost| cost <= max_cost) {
                return false;
            }
        }

        if let Some(action) = self.recommendation_action {
            let actual = program.recommendation.as_ref().map(|rec| rec.action);
            if actual != Some(action) {
                return false;
            }
        }

        true
    }
}

/// Source of enriched programs for the CLI and HTTP surfaces.
pub trait ProgramProvider: Send + Sync {
    fn programs(&self, filters: &ProgramFilters) -> Result<Vec<Program>, ProviderError>;
    fn program_by_id(&self, id: &ProgramId) -> Result<Option<Program>, ProviderError>;
    /// Distinct schools, sorted, led by [`ALL_SCHOOLS`].
    fn schools(&self) -> Result<Vec<String>, ProviderError>;
    /// Distinct levels, sorted, led by [`ALL_LEVELS`].
    fn levels(&self) -> Result<Vec<String>, ProviderError>;
    fn criteria(&self) -> &RecommendationCriteria;
    /// Re-derives the whole catalog and returns the number of programs loaded.
    fn refresh(&self) -> Result<usize, ProviderError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("program catalog unavailable: {0}")]
    Unavailable(String),
    #[error(transparent)]
    Import(#[from] CatalogImportError),
}

#[derive(Debug, Clone)]
enum RecordSource {
    Fixed(Vec<ProgramRecord>),
    Csv(PathBuf),
}

impl RecordSource {
    fn load(&self) -> Result<Vec<ProgramRecord>, CatalogImportError> {
        match self {
            Self::Fixed(records) => Ok(records.clone()),
            Self::Csv(path) => ProgramCsvImporter::from_path(path),
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::Fixed(_) => "fixed".to_string(),
            Self::Csv(path) => path.display().to_string(),
        }
    }
}

/// In-memory provider holding a fully enriched snapshot.
///
/// Refresh builds a new snapshot from the source and swaps it in whole.
#[derive(Debug)]
pub struct FixedDataProvider {
    source: RecordSource,
    criteria: RecommendationCriteria,
    programs: RwLock<Vec<Program>>,
}

impl FixedDataProvider {
    pub fn new(records: Vec<ProgramRecord>, criteria: RecommendationCriteria) -> Self {
        let programs = records
            .iter()
            .cloned()
            .map(|record| enrich_program(record, &criteria))
            .collect();
        Self::with_snapshot(RecordSource::Fixed(records), criteria, programs)
    }

    /// Built-in sample portfolio.
    pub fn sample(criteria: RecommendationCriteria) -> Self {
        Self::new(sample_records(), criteria)
    }

    pub fn from_csv(
        path: impl Into<PathBuf>,
        criteria: RecommendationCriteria,
    ) -> Result<Self, CatalogImportError> {
        let source = RecordSource::Csv(path.into());
        let programs = enrich_all(&source, &criteria)?;
        Ok(Self::with_snapshot(source, criteria, programs))
    }

    fn with_snapshot(
        source: RecordSource,
        criteria: RecommendationCriteria,
        programs: Vec<Program>,
    ) -> Self {
        info!(
            source = %source.describe(),
            programs = programs.len(),
            "program catalog loaded"
        );
        Self {
            source,
            criteria,
            programs: RwLock::new(programs),
        }
    }

    fn snapshot(&self) -> Result<RwLockReadGuard<'_, Vec<Program>>, ProviderError> {
        self.programs
            .read()
            .map_err(|_| ProviderError::Unavailable("catalog lock poisoned".to_string()))
    }
}

fn enrich_all(
    source: &RecordSource,
    criteria: &RecommendationCriteria,
) -> Result<Vec<Program>, CatalogImportError> {
    Ok(source
        .load()?
        .into_iter()
        .map(|record| enrich_program(record, criteria))
        .collect())
}

fn with_all_prefix(all: &str, values: BTreeSet<&str>) -> Vec<String> {
    std::iter::once(all)
        .chain(values)
        .map(str::to_string)
        .collect()
}

impl ProgramProvider for FixedDataProvider {
    fn programs(&self, filters: &ProgramFilters) -> Result<Vec<Program>, ProviderError> {
        let snapshot = self.snapshot()?;
        Ok(snapshot
            .iter()
            .filter(|program| filters.matches(program))
            .cloned()
            .collect())
    }

    fn program_by_id(&self, id: &ProgramId) -> Result<Option<Program>, ProviderError> {
        let snapshot = self.snapshot()?;
        Ok(snapshot.iter().find(|program| &program.id == id).cloned())
    }

    fn schools(&self) -> Result<Vec<String>, ProviderError> {
        let snapshot = self.snapshot()?;
        let schools = snapshot.iter().map(|program| program.school.as_str()).collect();
        Ok(with_all_prefix(ALL_SCHOOLS, schools))
    }

    fn levels(&self) -> Result<Vec<String>, ProviderError> {
        let snapshot = self.snapshot()?;
        let levels = snapshot.iter().map(|program| program.level.label()).collect();
        Ok(with_all_prefix(ALL_LEVELS, levels))
    }

    fn criteria(&self) -> &RecommendationCriteria {
        &self.criteria
    }

    fn refresh(&self) -> Result<usize, ProviderError> {
        let programs = enrich_all(&self.source, &self.criteria)?;
        let count = programs.len();

        let mut guard = self
            .programs
            .write()
            .map_err(|_| ProviderError::Unavailable("catalog lock poisoned".to_string()))?;
        *guard = programs;
        drop(guard);

        info!(source = %self.source.describe(), programs = count, "program catalog refreshed");
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::domain::{FunnelStageCount, SpendData};
    use std::io::Write;

    fn record(school: &str, level: ProgramLevel, name: &str, inquiries: u64, spend: f64) -> ProgramRecord {
        ProgramRecord {
            school: school.to_string(),
            level,
            program_name: name.to_string(),
            funnel: FunnelStageCount::new(inquiries, inquiries / 2, inquiries / 4, inquiries / 10),
            spend: Some(SpendData::total(spend)),
        }
    }

    fn provider() -> FixedDataProvider {
        FixedDataProvider::new(
            vec![
                record("SMU", ProgramLevel::Degree, "NPL", 1600, 160_000.0),
                record("MSU", ProgramLevel::Certificate, "Leadership Essentials", 40, 2_000.0),
                record("MSU", ProgramLevel::Degree, "MS in Supply Chain", 800, 40_000.0),
            ],
            RecommendationCriteria::default(),
        )
    }

    #[test]
    fn filters_narrow_by_school_level_and_volume() {
        let provider = provider();

        let msu = ProgramFilters {
            school: Some("MSU".to_string()),
            ..ProgramFilters::default()
        };
        assert_eq!(provider.programs(&msu).expect("programs").len(), 2);

        let msu_degrees = ProgramFilters {
            level: Some("Degree".to_string()),
            ..msu.clone()
        };
        let names: Vec<String> = provider
            .programs(&msu_degrees)
            .expect("programs")
            .into_iter()
            .map(|program| program.program_name)
            .collect();
        assert_eq!(names, vec!["MS in Supply Chain"]);

        let everything = ProgramFilters {
            school: Some(ALL_SCHOOLS.to_string()),
            level: Some(ALL_LEVELS.to_string()),
            min_leads: Some(100),
            ..ProgramFilters::default()
        };
        assert_eq!(provider.programs(&everything).expect("programs").len(), 2);
    }

    #[test]
    fn filters_on_cost_and_action() {
        let provider = provider();

        let cheap = ProgramFilters {
            max_cost_per_lead: Some(60.0),
            ..ProgramFilters::default()
        };
        let names: Vec<String> = provider
            .programs(&cheap)
            .expect("programs")
            .into_iter()
            .map(|program| program.program_name)
            .collect();
        assert_eq!(names, vec!["Leadership Essentials", "MS in Supply Chain"]);

        let increases = ProgramFilters {
            recommendation_action: Some(RecommendationAction::Increase),
            ..ProgramFilters::default()
        };
        assert!(provider.programs(&increases).expect("programs").is_empty());
    }

    #[test]
    fn schools_and_levels_are_sorted_with_all_prefix() {
        let provider = provider();

        assert_eq!(
            provider.schools().expect("schools"),
            vec![ALL_SCHOOLS, "MSU", "SMU"]
        );
        assert_eq!(
            provider.levels().expect("levels"),
            vec![ALL_LEVELS, "Certificate", "Degree"]
        );
    }

    #[test]
    fn program_lookup_uses_derived_id() {
        let provider = provider();

        let found = provider
            .program_by_id(&ProgramId("smu-npl".to_string()))
            .expect("lookup");
        assert_eq!(found.map(|program| program.leads), Some(1600));
        assert!(provider
            .program_by_id(&ProgramId("unknown".to_string()))
            .expect("lookup")
            .is_none());
    }

    #[test]
    fn refresh_rereads_csv_source() {
        let path = std::env::temp_dir().join(format!(
            "funnel-insights-refresh-{}.csv",
            std::process::id()
        ));
        let header = "School,Level,Program,Visitors,Inquiries,Opportunities,Applications,Enrollments,Total Spend\n";
        std::fs::write(&path, format!("{header}KEEP,Certificate,PMP,,380,95,60,20,41000\n"))
            .expect("write csv");

        let provider =
            FixedDataProvider::from_csv(&path, RecommendationCriteria::default()).expect("load");
        assert_eq!(provider.programs(&ProgramFilters::default()).expect("programs").len(), 1);

        let mut file = std::fs::OpenOptions::new()
            .append(true)
            .open(&path)
            .expect("open csv");
        writeln!(file, "KEEP,Certificate,Negotiations,,120,40,22,9,9000").expect("append row");

        assert_eq!(provider.refresh().expect("refresh"), 2);
        assert_eq!(provider.schools().expect("schools"), vec![ALL_SCHOOLS, "KEEP"]);

        std::fs::remove_file(&path).ok();
    }
}
