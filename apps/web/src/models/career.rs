use serde::{Deserialize, Serialize};

/// Five-year growth projection attached to a career.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GrowthTrend {
    #[serde(rename = "5y_growth_pct", alias = "five_year_growth_pct", default)]
    pub five_year_growth_pct: f64,
    #[serde(default)]
    pub explain: String,
}

/// A ranked career match produced by the external service.
///
/// Immutable once received. Rank is the position in the list the service
/// returned; the client never re-sorts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareerRecommendation {
    pub career_id: String,
    pub title: String,
    #[serde(default)]
    pub match_score: f64,
    #[serde(default)]
    pub demand_score: u32,
    #[serde(default)]
    pub avg_salary: u64,
    #[serde(default)]
    pub entry_level_salary: u64,
    #[serde(default)]
    pub key_skills: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub education_requirements: String,
    #[serde(default)]
    pub growth_trend: GrowthTrend,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}
