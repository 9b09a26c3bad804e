//! Learning roadmaps for the top recommended careers.

use serde::Serialize;

use crate::models::roadmap::LearningRoadmap;
use crate::normalize::{normalize_text, normalize_value, Section};

pub mod cache;
pub mod handlers;

/// Echoed or diagnostic keys in the roadmap body that are not sections.
const HIDDEN_KEYS: [&str; 2] = ["career", "raw_content"];

#[derive(Debug, Clone, Serialize)]
pub struct PhaseView {
    pub number: usize,
    pub name: String,
    pub description: String,
    pub duration: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResourceView {
    pub kind: String,
    pub name: String,
    pub category: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoadmapView {
    pub career_id: Option<String>,
    pub career_title: String,
    pub generated_at: Option<String>,
    pub phases: Vec<PhaseView>,
    pub resources: Vec<ResourceView>,
    /// Skill gap, timeline, projects and networking, followed by any
    /// sections the service added, each normalized for display.
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoadmapsView {
    pub count: usize,
    pub roadmaps: Vec<RoadmapView>,
}

impl From<&LearningRoadmap> for RoadmapView {
    fn from(roadmap: &LearningRoadmap) -> Self {
        let body = &roadmap.roadmap;

        let phases: Vec<PhaseView> = body
            .learning_phases
            .items()
            .iter()
            .enumerate()
            .map(|(i, phase)| {
                let name = normalize_text(&phase.name);
                PhaseView {
                    number: i + 1,
                    name: if name.is_empty() {
                        format!("Phase {}", i + 1)
                    } else {
                        name
                    },
                    description: normalize_value(&phase.description),
                    duration: normalize_value(&phase.duration),
                }
            })
            .collect();

        let resources: Vec<ResourceView> = body
            .resources
            .items()
            .iter()
            .filter_map(|r| {
                let name = normalize_text(&r.name);
                (!name.is_empty()).then(|| ResourceView {
                    kind: normalize_text(&r.kind),
                    name,
                    category: normalize_text(&r.category),
                })
            })
            .collect();

        // Phases or resources that did not arrive as lists are shown as text.
        let known = [
            ("skill_gap_analysis", Some(&body.skill_gap_analysis)),
            ("learning_phases", body.learning_phases.other()),
            ("resources", body.resources.other()),
            ("timeline", Some(&body.timeline)),
            ("projects", Some(&body.projects)),
            ("networking", Some(&body.networking)),
        ];
        let extra = body
            .extra
            .iter()
            .filter(|(key, _)| !HIDDEN_KEYS.iter().any(|h| key.eq_ignore_ascii_case(h)))
            .map(|(key, value)| (key.as_str(), Some(value)));
        let mut sections: Vec<Section> = known
            .into_iter()
            .chain(extra)
            .filter_map(|(key, value)| Section::from_value(key, value?))
            .collect();

        // Nothing structured survived; fall back to the raw reply.
        if sections.is_empty() && phases.is_empty() && resources.is_empty() {
            if let Some(section) = body
                .extra
                .get("raw_content")
                .and_then(|raw| Section::from_value("summary", raw))
            {
                sections.push(section);
            }
        }

        Self {
            career_id: roadmap.career_id.clone(),
            career_title: roadmap.career_title.clone(),
            generated_at: roadmap.generated_at.clone(),
            phases,
            resources,
            sections,
        }
    }
}

pub fn roadmaps_view(roadmaps: &[LearningRoadmap]) -> RoadmapsView {
    RoadmapsView {
        count: roadmaps.len(),
        roadmaps: roadmaps.iter().map(RoadmapView::from).collect(),
    }
}
