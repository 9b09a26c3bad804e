use serde::Serialize;
use serde_json::Value;

use super::normalize_value;

/// Key fragment → decorative icon. First match wins, so specific fragments
/// come before the general ones they contain.
const SECTION_ICONS: &[(&str, &str)] = &[
    ("skill_gap", "🎯"),
    ("focus", "🎯"),
    ("skill", "🧠"),
    ("phase", "📚"),
    ("learning", "📚"),
    ("resource", "🔗"),
    ("course", "🔗"),
    ("timeline", "⏱️"),
    ("milestone", "🏁"),
    ("project", "🛠️"),
    ("network", "🤝"),
    ("communit", "🤝"),
    ("technolog", "🚀"),
    ("tool", "🚀"),
    ("salary", "💰"),
    ("market", "📈"),
    ("trend", "📈"),
    ("news", "📰"),
    ("outlook", "🔮"),
    ("future", "🔮"),
    ("prediction", "🔮"),
    ("compan", "🏢"),
    ("startup", "🏢"),
    ("certification", "🎓"),
    ("description", "📝"),
    ("summary", "📝"),
];

/// A titled, normalized block of display text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub key: String,
    pub icon: Option<&'static str>,
    pub label: String,
    pub body: String,
}

impl Section {
    /// `None` when the value normalizes to nothing.
    pub fn from_value(key: &str, value: &Value) -> Option<Self> {
        let body = normalize_value(value);
        if body.is_empty() {
            return None;
        }
        let (icon, label) = section_heading(key);
        Some(Self {
            key: key.to_string(),
            icon,
            label,
            body,
        })
    }
}

/// Icon and human label for a JSON key such as `skill_gap_analysis`,
/// `emergingTechnologies` or `Key Companies`.
pub fn section_heading(key: &str) -> (Option<&'static str>, String) {
    let canonical = key.to_lowercase().replace([' ', '-'], "_");
    let icon = SECTION_ICONS
        .iter()
        .find(|(fragment, _)| canonical.contains(fragment))
        .map(|(_, icon)| *icon);
    (icon, humanize_key(key))
}

fn humanize_key(key: &str) -> String {
    let mut spaced = String::with_capacity(key.len() + 4);
    let mut previous_lower = false;
    for c in key.chars() {
        if c == '_' || c == '-' {
            spaced.push(' ');
            previous_lower = false;
            continue;
        }
        if c.is_uppercase() && previous_lower {
            spaced.push(' ');
        }
        previous_lower = c.is_lowercase() || c.is_ascii_digit();
        spaced.push(c);
    }

    spaced
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
