use serde::{Deserialize, Serialize};

/// Thresholds separating budget actions; rates on the 0-100 scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecommendationCriteria {
    pub min_leads: u64,
    pub min_conversion_rate: f64,
    pub max_cost_per_enrollment: f64,
    pub excellent_conversion_rate: f64,
    pub excellent_cost_per_enrollment: f64,
}

impl Default for RecommendationCriteria {
    fn default() -> Self {
        Self {
            min_leads: 50,
            min_conversion_rate: 5.0,
            max_cost_per_enrollment: 5_000.0,
            excellent_conversion_rate: 15.0,
            excellent_cost_per_enrollment: 2_000.0,
        }
    }
}
