use super::normalizer::normalize_name;
use serde::{Deserialize, Deserializer};
use std::io::Read;
use tracing::warn;

/// One CSV row after name normalisation and numeric cleaning.
#[derive(Debug)]
pub(crate) struct ProgramRow {
    pub(crate) school: String,
    pub(crate) level: String,
    pub(crate) program_name: String,
    pub(crate) visitors: Option<u64>,
    pub(crate) inquiries: Option<u64>,
    pub(crate) opportunities: Option<u64>,
    pub(crate) applications: Option<u64>,
    pub(crate) enrollments: Option<u64>,
    pub(crate) total_spend: Option<f64>,
}

pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<ProgramRow>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut rows = Vec::new();

    for record in csv_reader.deserialize::<CsvRow>() {
        let row = record?;
        let program_name = normalize_name(&row.program);

        rows.push(ProgramRow {
            visitors: parse_count(&program_name, "Visitors", row.visitors.as_deref()),
            inquiries: parse_count(&program_name, "Inquiries", row.inquiries.as_deref()),
            opportunities: parse_count(&program_name, "Opportunities", row.opportunities.as_deref()),
            applications: parse_count(&program_name, "Applications", row.applications.as_deref()),
            enrollments: parse_count(&program_name, "Enrollments", row.enrollments.as_deref()),
            total_spend: parse_amount(&program_name, row.total_spend.as_deref()),
            school: normalize_name(&row.school),
            level: row.level,
            program_name,
        });
    }

    Ok(rows)
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "School")]
    school: String,
    #[serde(rename = "Level")]
    level: String,
    #[serde(rename = "Program")]
    program: String,
    #[serde(rename = "Visitors", default, deserialize_with = "empty_string_as_none")]
    visitors: Option<String>,
    #[serde(rename = "Inquiries", default, deserialize_with = "empty_string_as_none")]
    inquiries: Option<String>,
    #[serde(
        rename = "Opportunities",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    opportunities: Option<String>,
    #[serde(
        rename = "Applications",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    applications: Option<String>,
    #[serde(
        rename = "Enrollments",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    enrollments: Option<String>,
    #[serde(
        rename = "Total Spend",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    total_spend: Option<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn clean_number(value: &str) -> String {
    value
        .trim()
        .chars()
        .filter(|ch| !matches!(ch, ',' | '$' | ' '))
        .collect()
}

fn parse_count(program: &str, column: &str, value: Option<&str>) -> Option<u64> {
    let raw = value?;
    let cleaned = clean_number(raw);
    let parsed = cleaned.parse::<u64>().ok().or_else(|| {
        cleaned
            .parse::<f64>()
            .ok()
            .filter(|number| number.is_finite() && *number >= 0.0 && number.fract() == 0.0)
            .map(|number| number as u64)
    });

    if parsed.is_none() {
        warn!(%program, column, value = raw, "ignoring unreadable count");
    }
    parsed
}

fn parse_amount(program: &str, value: Option<&str>) -> Option<f64> {
    let raw = value?;
    let parsed = clean_number(raw)
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite());

    if parsed.is_none() {
        warn!(%program, column = "Total Spend", value = raw, "ignoring unreadable amount");
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const HEADER: &str =
        "School,Level,Program,Visitors,Inquiries,Opportunities,Applications,Enrollments,Total Spend\n";

    fn single_row(line: &str) -> ProgramRow {
        parse_rows(Cursor::new(format!("{HEADER}{line}\n")))
            .expect("parse")
            .pop()
            .expect("row")
    }

    #[test]
    fn numbers_accept_separators_and_currency() {
        let row = single_row("USF,Degree,MS in Health Informatics,\"14,800\",\"1,600\",352,160,96.0,\"$312,000.50\"");

        assert_eq!(row.visitors, Some(14_800));
        assert_eq!(row.inquiries, Some(1_600));
        assert_eq!(row.enrollments, Some(96));
        assert_eq!(row.total_spend, Some(312_000.5));
    }

    #[test]
    fn blank_and_unreadable_cells_are_absent() {
        let row = single_row("USF,Certificate,  USF   Micro Credential ,,109,n/a,, -4 ,");

        assert_eq!(row.program_name, "USF Micro Credential");
        assert_eq!(row.visitors, None);
        assert_eq!(row.inquiries, Some(109));
        assert_eq!(row.opportunities, None);
        assert_eq!(row.applications, None);
        assert_eq!(row.enrollments, None);
        assert_eq!(row.total_spend, None);
    }

    #[test]
    fn missing_trailing_columns_are_tolerated() {
        let rows = parse_rows(Cursor::new(
            "School,Level,Program,Inquiries\nKEEP,Certificate,Strategic Negotiation,27\n",
        ))
        .expect("parse");

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].inquiries, Some(27));
        assert_eq!(rows[0].total_spend, None);
    }
}
