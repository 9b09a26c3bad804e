use serde::Deserialize;

use crate::models::mentor::Mentor;

/// Query-string filters for the mentor directory. All are optional and
/// combine with AND.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MentorQuery {
    /// Case-insensitive text search over name, title, company, bio and expertise.
    pub q: Option<String>,
    /// Exact expertise tag, case-insensitive.
    pub expertise: Option<String>,
    pub min_rating: Option<f32>,
    #[serde(default)]
    pub available_only: bool,
    /// Reloads the general directory instead of filtering the loaded list.
    #[serde(default)]
    pub refresh: bool,
}

impl MentorQuery {
    pub fn matches(&self, mentor: &Mentor) -> bool {
        if let Some(needle) = self.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            let needle = needle.to_lowercase();
            let haystacks = [&mentor.name, &mentor.title, &mentor.company, &mentor.bio];
            let hit = haystacks
                .into_iter()
                .chain(mentor.expertise.iter())
                .any(|field| field.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }

        if let Some(tag) = self.expertise.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            if !mentor.expertise.iter().any(|e| e.eq_ignore_ascii_case(tag)) {
                return false;
            }
        }

        if let Some(min) = self.min_rating {
            if mentor.rating < min {
                return false;
            }
        }

        !self.available_only || is_available(mentor)
    }
}

fn is_available(mentor: &Mentor) -> bool {
    let availability = mentor.availability.trim().to_lowercase();
    !availability.is_empty()
        && !availability.starts_with("unavailable")
        && !availability.starts_with("not ")
}

pub fn filter_mentors(mentors: &[Mentor], query: &MentorQuery) -> Vec<Mentor> {
    mentors.iter().filter(|m| query.matches(m)).cloned().collect()
}

/// Distinct expertise tags across `mentors`, sorted case-insensitively. The
/// first spelling seen is kept.
pub fn expertise_facets(mentors: &[Mentor]) -> Vec<String> {
    let mut facets: Vec<String> = Vec::new();
    for tag in mentors.iter().flat_map(|m| m.expertise.iter()) {
        let tag = tag.trim();
        if !tag.is_empty() && !facets.iter().any(|f| f.eq_ignore_ascii_case(tag)) {
            facets.push(tag.to_string());
        }
    }
    facets.sort_by_key(|f| f.to_lowercase());
    facets
}
