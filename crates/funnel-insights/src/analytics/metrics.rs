//! Cost and conversion arithmetic over funnel counts.
//!
//! Nothing here panics or returns an error. Undefined arithmetic (a missing
//! operand, a zero denominator, a non-finite operand) yields `None`, and
//! callers treat `None` as "unknown" rather than zero.

use super::domain::{ConversionMetrics, FunnelStageCount, RoiMetrics};

/// Rendered in place of a missing value.
pub const MISSING_VALUE: &str = "\u{2014}";

/// Divides two optional operands, returning `None` when the result is undefined.
pub fn safe_divide(
    numerator: impl Into<Option<f64>>,
    denominator: impl Into<Option<f64>>,
) -> Option<f64> {
    let numerator = numerator.into()?;
    let denominator = denominator.into()?;

    if denominator == 0.0 || !numerator.is_finite() || !denominator.is_finite() {
        return None;
    }

    Some(numerator / denominator)
}

/// `safe_divide` scaled to 0-100. Results above 100 are returned as-is.
pub fn safe_percentage(
    numerator: impl Into<Option<f64>>,
    denominator: impl Into<Option<f64>>,
) -> Option<f64> {
    safe_divide(numerator, denominator).map(|ratio| ratio * 100.0)
}

fn stage(count: Option<u64>) -> Option<f64> {
    count.map(|value| value as f64)
}

pub fn calculate_roi_metrics(total_spend: f64, funnel: &FunnelStageCount) -> RoiMetrics {
    RoiMetrics {
        cost_per_lead: safe_divide(total_spend, stage(funnel.inquiries)),
        cost_per_opportunity: safe_divide(total_spend, stage(funnel.opportunities)),
        cost_per_application: safe_divide(total_spend, stage(funnel.applications)),
        cost_per_enrollment: safe_divide(total_spend, stage(funnel.enrollments)),
    }
}

pub fn calculate_conversion_metrics(funnel: &FunnelStageCount) -> ConversionMetrics {
    let inquiries = stage(funnel.inquiries);
    let opportunities = stage(funnel.opportunities);
    let applications = stage(funnel.applications);
    let enrollments = stage(funnel.enrollments);

    // TODO: split lead_to_enrollment_rate from contact_to_enrollment_rate once
    // lead sources report a separate denominator.
    ConversionMetrics {
        inquiry_to_opportunity_rate: safe_percentage(opportunities, inquiries),
        opportunity_to_application_rate: safe_percentage(applications, opportunities),
        application_to_enrollment_rate: safe_percentage(enrollments, applications),
        contact_to_application_rate: safe_percentage(applications, inquiries),
        contact_to_enrollment_rate: safe_percentage(enrollments, inquiries),
        lead_to_enrollment_rate: safe_percentage(enrollments, inquiries),
    }
}

/// Week-over-week change as a percentage of last week's value.
pub fn calculate_wow_delta(
    current: impl Into<Option<f64>>,
    last_week: impl Into<Option<f64>>,
) -> Option<f64> {
    let current = current.into()?;
    let last_week = last_week.into()?;
    safe_divide(current - last_week, last_week).map(|ratio| ratio * 100.0)
}

/// Mean of the valid samples in a window.
///
/// Unlike `safe_divide`, a missing or non-finite sample does not poison the
/// result: it is dropped and the remaining samples are averaged. Only a window
/// with no valid samples yields `None`.
pub fn calculate_four_week_avg<I>(values: I) -> Option<f64>
where
    I: IntoIterator,
    I::Item: Into<Option<f64>>,
{
    // Running mean; finite samples cannot overflow it.
    let (mean, count) = values
        .into_iter()
        .filter_map(Into::<Option<f64>>::into)
        .filter(|value| value.is_finite())
        .fold((0.0, 0usize), |(mean, count), value| {
            let count = count + 1;
            let n = count as f64;
            (mean + (value / n - mean / n), count)
        });

    (count > 0).then_some(mean)
}

/// Whole-unit currency with thousands separators, e.g. `$1,234`.
pub fn format_currency(value: Option<f64>) -> String {
    match value.filter(|value| value.is_finite()) {
        Some(value) => {
            let grouped = group_thousands(&format!("{:.0}", value.abs().round()));
            if value.round() < 0.0 {
                format!("-${grouped}")
            } else {
                format!("${grouped}")
            }
        }
        None => MISSING_VALUE.to_string(),
    }
}

pub fn format_percentage(value: Option<f64>, decimals: usize) -> String {
    match value.filter(|value| value.is_finite()) {
        Some(value) => format!("{value:.decimals$}%"),
        None => MISSING_VALUE.to_string(),
    }
}

/// Thousands separators with up to three fractional digits.
pub fn format_number(value: Option<f64>) -> String {
    let Some(value) = value.filter(|value| value.is_finite()) else {
        return MISSING_VALUE.to_string();
    };

    let fixed = format!("{:.3}", value.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let fraction = fraction.trim_end_matches('0');
    let sign = if value < 0.0 && (whole != "0" || !fraction.is_empty()) {
        "-"
    } else {
        ""
    };

    if fraction.is_empty() {
        format!("{sign}{}", group_thousands(whole))
    } else {
        format!("{sign}{}.{fraction}", group_thousands(whole))
    }
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
