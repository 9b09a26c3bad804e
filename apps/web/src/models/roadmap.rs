use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::LooseList;

/// A phased learning plan for one career, generated by the external service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningRoadmap {
    /// Set client-side after generation so cached roadmaps can be looked up by career.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub career_id: Option<String>,
    #[serde(default)]
    pub career_title: String,
    #[serde(default)]
    pub generated_at: Option<String>,
    #[serde(default)]
    pub roadmap: RoadmapBody,
}

/// Roadmap content. Text-bearing fields stay raw JSON (plain text or nested
/// structure) and are normalized only for display.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoadmapBody {
    #[serde(default)]
    pub skill_gap_analysis: Value,
    #[serde(default)]
    pub learning_phases: LooseList<LearningPhase>,
    #[serde(default)]
    pub resources: LooseList<LearningResource>,
    #[serde(default)]
    pub timeline: Value,
    #[serde(default)]
    pub projects: Value,
    #[serde(default)]
    pub networking: Value,
    /// Sections the model added beyond the expected ones.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LearningPhase {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Value,
    #[serde(default)]
    pub duration: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LearningResource {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: String,
}

/// Roadmaps generated for the current survey, stamped with their generation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadmapCache {
    pub roadmaps: Vec<LearningRoadmap>,
    pub generated_at: DateTime<Utc>,
}

impl RoadmapCache {
    pub fn find(&self, career_id: &str) -> Option<&LearningRoadmap> {
        self.roadmaps
            .iter()
            .find(|r| r.career_id.as_deref() == Some(career_id))
    }
}
