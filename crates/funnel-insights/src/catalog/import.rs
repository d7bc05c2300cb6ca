use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use super::parser::{self, ProgramRow};
use super::ProgramRecord;
use crate::analytics::domain::{FunnelStageCount, ProgramId, ProgramLevel, SpendData};

#[derive(Debug)]
pub enum CatalogImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidLevel { program: String, value: String },
}

impl std::fmt::Display for CatalogImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogImportError::Io(err) => write!(f, "failed to read program export: {}", err),
            CatalogImportError::Csv(err) => write!(f, "invalid program CSV data: {}", err),
            CatalogImportError::InvalidLevel { program, value } => write!(
                f,
                "program '{}' has unknown level '{}' (expected Certificate or Degree)",
                program, value
            ),
        }
    }
}

impl std::error::Error for CatalogImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogImportError::Io(err) => Some(err),
            CatalogImportError::Csv(err) => Some(err),
            CatalogImportError::InvalidLevel { .. } => None,
        }
    }
}

impl From<std::io::Error> for CatalogImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for CatalogImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Loads program records from a per-program funnel export.
pub struct ProgramCsvImporter;

impl ProgramCsvImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<ProgramRecord>, CatalogImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Parses every row; a program seen twice keeps its first row.
    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<ProgramRecord>, CatalogImportError> {
        let mut seen: HashSet<ProgramId> = HashSet::new();
        let mut records = Vec::new();

        for row in parser::parse_rows(reader)? {
            let record = into_record(row)?;
            let id = record.id();
            if !seen.insert(id.clone()) {
                debug!(program = %id, "skipping duplicate program row");
                continue;
            }
            records.push(record);
        }

        Ok(records)
    }
}

fn into_record(row: ProgramRow) -> Result<ProgramRecord, CatalogImportError> {
    let level =
        ProgramLevel::parse(&row.level).ok_or_else(|| CatalogImportError::InvalidLevel {
            program: row.program_name.clone(),
            value: row.level.clone(),
        })?;

    Ok(ProgramRecord {
        school: row.school,
        level,
        program_name: row.program_name,
        funnel: FunnelStageCount {
            visitors: row.visitors,
            inquiries: row.inquiries,
            opportunities: row.opportunities,
            applications: row.applications,
            enrollments: row.enrollments,
        },
        spend: row.total_spend.map(SpendData::total),
    })
}
