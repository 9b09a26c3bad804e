//! Text normalization for loosely structured LLM output.
//!
//! Roadmap and trend fields arrive as clean prose, markdown, quasi-JSON text
//! (`"Focus Areas": [...]` with inconsistent quoting), or arbitrarily nested
//! JSON. Everything here flattens those into plain multi-line text.
//!
//! Guarantees: never panics, never leaves `{ } [ ] "` in the output, and
//! `normalize_text(&normalize_text(x)) == normalize_text(x)`.

mod sections;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

pub use sections::{section_heading, Section};

/// Plain text shorter than this only has markdown markers stripped.
pub const SHORT_TEXT_LIMIT: usize = 160;

const STRUCTURAL_MARKERS: [char; 5] = ['{', '}', '[', ']', '"'];

static HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^([ \t]*)(?:#{1,6}[ \t]+)+").expect("valid heading regex"));

static LIST_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^([ \t]*)[-*+][ \t]+").expect("valid list regex"));

static MARKDOWN_LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[([^\[\]]+)\]\(([^()\s]+)\)").expect("valid link regex")
});

/// A closing quote/bracket followed by a comma: a JSON delimiter, not prose.
static DELIMITER_COMMA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"["\]\}]\s*,\s*"#).expect("valid delimiter regex"));

static FOCUS_AREAS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)"?focus[ _]?areas"?\s*:\s*\[(.*?)\]"#).expect("valid focus regex")
});

static MILESTONES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)"?milestones"?\s*:\s*\[(.*?)\]"#).expect("valid milestones regex")
});

static DESCRIPTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)"?description"?\s*:\s*"((?:[^"\\]|\\.)*)""#)
        .expect("valid description regex")
});

static QUOTED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""((?:[^"\\]|\\.)*)""#).expect("valid quoted regex"));

/// Normalizes one text field into display-ready multi-line text.
pub fn normalize_text(raw: &str) -> String {
    let unfenced = strip_code_fences(raw);
    let text = MARKDOWN_LINK.replace_all(unfenced, "$1 ($2)");

    if !has_structural_markers(&text) {
        return finish_plain(&text);
    }

    if let Ok(value) = serde_json::from_str::<Value>(&text) {
        match value {
            Value::Object(_) | Value::Array(_) => return normalize_value(&value),
            Value::String(inner) => return normalize_text(&inner),
            _ => {}
        }
    }

    match extract_known_keys(&text) {
        Some(extracted) => finish_structured(&extracted),
        None => finish_structured(&strip_loose_json(&text)),
    }
}

/// Normalizes any JSON value: strings go through [`normalize_text`], arrays
/// become bulleted lines, objects become one labeled block per key.
pub fn normalize_value(value: &Value) -> String {
    match value {
        Value::String(s) => normalize_text(s),
        other => finish_structured(&render_value(other)),
    }
}

fn has_structural_markers(text: &str) -> bool {
    text.contains(&STRUCTURAL_MARKERS[..])
}

fn render_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => (if *b { "Yes" } else { "No" }).to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => normalize_text(s),
        Value::Array(items) => items
            .iter()
            .map(render_value)
            .filter(|item| !item.is_empty())
            .map(|item| bullet_block(&item))
            .collect::<Vec<_>>()
            .join("\n"),
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            entries
                .into_iter()
                .filter_map(|(key, value)| {
                    let body = render_value(value);
                    if body.is_empty() {
                        return None;
                    }
                    let (icon, label) = section_heading(key);
                    let heading = match icon {
                        Some(icon) => format!("{icon} {label}:"),
                        None => format!("{label}:"),
                    };
                    Some(if body.contains('\n') {
                        format!("{heading}\n{}", indent(&body))
                    } else {
                        format!("{heading} {body}")
                    })
                })
                .collect::<Vec<_>>()
                .join("\n")
        }
    }
}

fn bullet_block(item: &str) -> String {
    let mut lines = item.lines();
    let first = lines.next().unwrap_or_default();
    let mut block = format!("• {first}");
    for line in lines {
        block.push('\n');
        if !line.trim().is_empty() {
            block.push_str("  ");
            block.push_str(line);
        }
    }
    block
}

fn indent(body: &str) -> String {
    body.lines()
        .map(|line| {
            if line.trim().is_empty() {
                String::new()
            } else {
                format!("  {line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Pulls the sub-keys the roadmap generator is known to emit out of
/// malformed JSON-ish text. `None` when nothing recognizable is found.
fn extract_known_keys(text: &str) -> Option<String> {
    let mut blocks = Vec::new();

    if let Some(items) = FOCUS_AREAS.captures(text).map(|c| list_items(&c[1])) {
        if !items.is_empty() {
            blocks.push(format!("Focus Areas:\n{}", bullets(&items)));
        }
    }

    if let Some(description) = DESCRIPTION.captures(text).map(|c| clean_fragment(&c[1])) {
        if !description.is_empty() {
            blocks.push(format!("Description: {description}"));
        }
    }

    if let Some(items) = MILESTONES.captures(text).map(|c| list_items(&c[1])) {
        if !items.is_empty() {
            blocks.push(format!("Milestones:\n{}", bullets(&items)));
        }
    }

    if blocks.is_empty() {
        None
    } else {
        Some(blocks.join("\n"))
    }
}

fn list_items(inner: &str) -> Vec<String> {
    let quoted: Vec<String> = QUOTED
        .captures_iter(inner)
        .map(|c| clean_fragment(&c[1]))
        .filter(|s| !s.is_empty())
        .collect();
    if !quoted.is_empty() {
        return quoted;
    }
    inner
        .split(',')
        .map(clean_fragment)
        .filter(|s| !s.is_empty())
        .collect()
}

fn bullets(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("• {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn clean_fragment(fragment: &str) -> String {
    remove_markers(&fragment.replace("\\n", " "))
        .trim()
        .trim_end_matches(':')
        .trim()
        .to_string()
}

/// Last resort: split on delimiter commas, drop JSON punctuation.
fn strip_loose_json(text: &str) -> String {
    let text = text.replace("\\n", "\n");
    let parts: Vec<String> = DELIMITER_COMMA
        .split(&text)
        .map(|part| remove_markers(part).trim().to_string())
        .filter(|part| !part.is_empty())
        .collect();

    if parts.len() > 1 {
        bullets(&parts)
    } else {
        parts.join("")
    }
}

fn remove_markers(text: &str) -> String {
    text.chars()
        .filter(|c| !STRUCTURAL_MARKERS.contains(c))
        .collect()
}

fn finish_plain(text: &str) -> String {
    let stripped = strip_markdown(text);
    if text.chars().count() < SHORT_TEXT_LIMIT {
        tidy(&stripped)
    } else {
        tidy(&LIST_MARKER.replace_all(&stripped, "${1}• "))
    }
}

fn finish_structured(text: &str) -> String {
    let stripped = strip_markdown(&remove_markers(text));
    tidy(&LIST_MARKER.replace_all(&stripped, "${1}• "))
}

/// Removes emphasis, inline-code, and heading markers until nothing changes.
fn strip_markdown(text: &str) -> String {
    let mut current = text.to_string();
    loop {
        let next = current.replace("**", "").replace("__", "").replace('`', "");
        let next = HEADING.replace_all(&next, "${1}").into_owned();
        if next == current {
            return next;
        }
        current = next;
    }
}

/// Trims line ends, collapses blank runs, drops leading/trailing blank lines.
fn tidy(text: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    let mut previous_blank = true;
    for line in text.lines() {
        let line = line.trim_end();
        let blank = line.trim().is_empty();
        if blank && previous_blank {
            continue;
        }
        lines.push(if blank { "" } else { line });
        previous_blank = blank;
    }
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines.join("\n").trim_start().to_string()
}

/// Strips a wrapping ```json ... ``` or ``` ... ``` fence.
fn strip_code_fences(text: &str) -> &str {
    let text = text.trim();
    let inner = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"));
    match inner {
        Some(rest) => {
            let rest = rest.trim_start();
            rest.strip_suffix("```").map(str::trim).unwrap_or(rest)
        }
        None => text,
    }
}
