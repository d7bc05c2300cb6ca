//! Marketing analytics for continuing-education program portfolios.
//!
//! The [`analytics`] module holds the pure calculations (funnel metrics,
//! completeness scoring, recommendations, insights, scorecards) while
//! [`catalog`] loads program data and serves it over HTTP.

pub mod analytics;
pub mod catalog;
pub mod config;
pub mod error;
pub mod telemetry;

use catalog::FixedDataProvider;
use config::AppConfig;
use error::AppError;

/// Builds the provider named by the configuration: the CSV export when
/// `PROGRAMS_CSV` is set, the built-in sample portfolio otherwise.
pub fn load_provider(config: &AppConfig) -> Result<FixedDataProvider, AppError> {
    let criteria = config.recommendation.clone();
    match &config.catalog.programs_csv {
        Some(path) => Ok(FixedDataProvider::from_csv(path, criteria)?),
        None => Ok(FixedDataProvider::sample(criteria)),
    }
}
