use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Industry trend report for a field and period.
///
/// Section values are plain strings, quasi-JSON text, or nested structures,
/// depending on how the upstream model answered; they are kept raw here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndustryTrends {
    #[serde(default)]
    pub field: String,
    #[serde(default)]
    pub period: String,
    #[serde(default)]
    pub generated_at: Option<String>,
    #[serde(default)]
    pub trends: Map<String, Value>,
}
