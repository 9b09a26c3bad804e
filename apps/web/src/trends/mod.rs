//! Industry trend reports for a career field.

use serde::Serialize;
use serde_json::Value;

use crate::errors::AppError;
use crate::models::trends::IndustryTrends;
use crate::normalize::Section;
use crate::store::StateStore;

pub mod handlers;

pub const DEFAULT_FIELD: &str = "Technology";
pub const DEFAULT_PERIOD: &str = "6months";

/// Supported periods and their display labels.
pub const PERIODS: [(&str, &str); 3] = [
    ("3months", "Last 3 months"),
    ("6months", "Last 6 months"),
    ("1year", "Last year"),
];

/// Display order for the sections the service is asked for. Anything else
/// follows in key order.
const KNOWN_SECTIONS: [&str; 7] = [
    "emerging_technologies",
    "market_trends",
    "skill_demands",
    "industry_news",
    "future_outlook",
    "salary_trends",
    "key_companies",
];

/// Echoed or diagnostic keys that are not sections.
const HIDDEN_KEYS: [&str; 2] = ["field", "raw_content"];

#[derive(Debug, Clone, Serialize)]
pub struct PeriodOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrendsView {
    pub field: String,
    pub period: String,
    pub generated_at: Option<String>,
    pub periods: Vec<PeriodOption>,
    pub sections: Vec<Section>,
}

/// Resolves the requested period, defaulting to six months.
pub fn resolve_period(period: Option<&str>) -> Result<&'static str, AppError> {
    let Some(period) = period.map(str::trim).filter(|p| !p.is_empty()) else {
        return Ok(DEFAULT_PERIOD);
    };
    PERIODS
        .iter()
        .map(|(value, _)| *value)
        .find(|value| value.eq_ignore_ascii_case(period))
        .ok_or_else(|| {
            AppError::Validation(format!(
                "period must be one of 3months, 6months, 1year (got '{period}')"
            ))
        })
}

/// The requested field, else the title of the top recommendation, else
/// `Technology`.
pub async fn resolve_field(store: &StateStore, field: Option<&str>) -> Result<String, AppError> {
    if let Some(field) = field.map(str::trim).filter(|f| !f.is_empty()) {
        return Ok(field.to_string());
    }
    let top = store
        .survey_result()
        .await?
        .and_then(|r| r.recommendations.first().map(|c| c.title.clone()));
    Ok(top.unwrap_or_else(|| DEFAULT_FIELD.to_string()))
}

/// `Emerging Technologies`, `emergingTechnologies` and
/// `emerging-technologies` all become `emerging_technologies`.
fn canonical_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    let mut previous_lower = false;
    for c in key.trim().chars() {
        if c == ' ' || c == '-' || c == '_' {
            if !out.ends_with('_') {
                out.push('_');
            }
            previous_lower = false;
            continue;
        }
        if c.is_uppercase() && previous_lower {
            out.push('_');
        }
        previous_lower = c.is_lowercase() || c.is_ascii_digit();
        out.extend(c.to_lowercase());
    }
    out
}

fn section_rank(key: &str) -> usize {
    let canonical = canonical_key(key);
    KNOWN_SECTIONS
        .iter()
        .position(|known| *known == canonical)
        .unwrap_or(KNOWN_SECTIONS.len())
}

pub fn trends_view(trends: &IndustryTrends) -> TrendsView {
    let mut entries: Vec<(&String, &Value)> = trends
        .trends
        .iter()
        .filter(|(key, _)| !HIDDEN_KEYS.contains(&canonical_key(key).as_str()))
        .collect();
    // Stable: unknown sections keep the map's key order.
    entries.sort_by_key(|(key, _)| section_rank(key));

    let mut sections: Vec<Section> = entries
        .into_iter()
        .filter_map(|(key, value)| Section::from_value(key, value))
        .collect();

    // Nothing structured came back; show whatever raw text there is.
    if sections.is_empty() {
        if let Some(section) = trends
            .trends
            .get("raw_content")
            .and_then(|raw| Section::from_value("summary", raw))
        {
            sections.push(section);
        }
    }

    TrendsView {
        field: trends.field.clone(),
        period: trends.period.clone(),
        generated_at: trends.generated_at.clone(),
        periods: PERIODS
            .iter()
            .map(|&(value, label)| PeriodOption {
                value,
                label,
                selected: value == trends.period,
            })
            .collect(),
        sections,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api_client::fake::career;
    use crate::models::survey::{AnswerSet, SurveyResult};
    use chrono::Utc;
    use serde_json::json;

    fn trends(value: Value) -> IndustryTrends {
        IndustryTrends {
            field: "Data Science".to_string(),
            period: "1year".to_string(),
            generated_at: None,
            trends: value.as_object().cloned().unwrap_or_default(),
        }
    }

    #[test]
    fn test_resolve_period() {
        assert_eq!(resolve_period(None).unwrap(), "6months");
        assert_eq!(resolve_period(Some("")).unwrap(), "6months");
        assert_eq!(resolve_period(Some("1YEAR")).unwrap(), "1year");
        assert!(matches!(
            resolve_period(Some("5years")),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_canonical_key() {
        assert_eq!(canonical_key("Emerging Technologies"), "emerging_technologies");
        assert_eq!(canonical_key("emergingTechnologies"), "emerging_technologies");
        assert_eq!(canonical_key("key-companies"), "key_companies");
    }

    #[test]
    fn test_sections_ordered_and_hidden_keys_dropped() {
        let view = trends_view(&trends(json!({
            "adoption": "Wide",
            "salary_trends": "Up 8%",
            "Emerging Technologies": ["LLMs"],
            "field": "Data Science",
            "raw_content": "{ raw }",
            "market_trends": "Hot",
            "future_outlook": null
        })));

        let keys: Vec<&str> = view.sections.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(
            keys,
            vec!["Emerging Technologies", "market_trends", "salary_trends", "adoption"]
        );
        assert_eq!(view.sections[0].body, "• LLMs");
        assert!(view.periods.iter().any(|p| p.value == "1year" && p.selected));
    }

    #[test]
    fn test_raw_content_used_when_nothing_else() {
        let view = trends_view(&trends(json!({
            "emerging_technologies": "",
            "raw_content": "**AI** keeps growing"
        })));
        assert_eq!(view.sections.len(), 1);
        assert_eq!(view.sections[0].label, "Summary");
        assert_eq!(view.sections[0].body, "AI keeps growing");
    }

    #[tokio::test]
    async fn test_field_defaults() {
        let store = StateStore::in_memory();
        assert_eq!(resolve_field(&store, None).await.unwrap(), "Technology");
        assert_eq!(resolve_field(&store, Some(" UX ")).await.unwrap(), "UX");

        store
            .record_completed_survey(&SurveyResult {
                session_id: None,
                merged_answers: AnswerSet::new(),
                recommendations: vec![career("ds", "Data Scientist", 90.0)],
                completed_at: Utc::now(),
            })
            .await
            .unwrap();
        assert_eq!(resolve_field(&store, None).await.unwrap(), "Data Scientist");
    }
}
