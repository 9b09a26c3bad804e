use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::career::CareerRecommendation;

/// A survey question as served by the API, fixed or adaptive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    #[serde(alias = "text")]
    pub question: String,
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default)]
    pub required: bool,
}

fn default_kind() -> String {
    "textarea".to_string()
}

impl Question {
    /// Choice questions only accept one of their listed options.
    pub fn is_choice(&self) -> bool {
        matches!(self.kind.as_str(), "radio" | "select")
            && self.options.as_ref().is_some_and(|o| !o.is_empty())
    }

    pub fn accepts(&self, value: &str) -> bool {
        if !self.is_choice() {
            return true;
        }
        self.options
            .as_ref()
            .is_some_and(|options| options.iter().any(|o| o == value))
    }
}

/// Answers keyed by question id. Later writes for the same id overwrite
/// earlier ones; an empty value clears the answer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSet(BTreeMap<String, String>);

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, question_id: &str, value: &str) {
        let value = value.trim();
        if value.is_empty() {
            self.0.remove(question_id);
        } else {
            self.0.insert(question_id.to_string(), value.to_string());
        }
    }

    pub fn get(&self, question_id: &str) -> Option<&str> {
        self.0.get(question_id).map(String::as_str)
    }

    pub fn contains(&self, question_id: &str) -> bool {
        self.0.contains_key(question_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Union of both sets; on id collision the value from `later` wins.
    pub fn merged_with(&self, later: &AnswerSet) -> AnswerSet {
        let mut merged = self.0.clone();
        merged.extend(later.0.iter().map(|(k, v)| (k.clone(), v.clone())));
        AnswerSet(merged)
    }

    /// Skills the user listed, split on commas.
    pub fn listed_skills(&self) -> Vec<String> {
        self.get("skills")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// The outcome of a completed survey. Replaced whenever a new survey completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyResult {
    pub session_id: Option<String>,
    pub merged_answers: AnswerSet,
    pub recommendations: Vec<CareerRecommendation>,
    pub completed_at: DateTime<Utc>,
}

impl SurveyResult {
    pub fn recommendation(&self, career_id: &str) -> Option<&CareerRecommendation> {
        self.recommendations
            .iter()
            .find(|c| c.career_id == career_id)
    }
}
