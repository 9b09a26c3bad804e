pub mod career;
pub mod mentor;
pub mod roadmap;
pub mod survey;
pub mod trends;

use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// A list field of LLM-generated content.
///
/// Arrays keep every element that fits `T` and silently drop the rest, so one
/// stray string or half-filled object does not sink the whole document. Any
/// other shape (an object keyed by level, a prose string) is kept verbatim in
/// `Other` so it can still be shown as text.
#[derive(Debug, Clone, PartialEq)]
pub enum LooseList<T> {
    Items(Vec<T>),
    Other(Value),
}

impl<T> Default for LooseList<T> {
    fn default() -> Self {
        Self::Items(Vec::new())
    }
}

impl<T> LooseList<T> {
    /// The typed elements; empty when the field was not an array.
    pub fn items(&self) -> &[T] {
        match self {
            Self::Items(items) => items,
            Self::Other(_) => &[],
        }
    }

    /// The original value when it was not an array.
    pub fn other(&self) -> Option<&Value> {
        match self {
            Self::Items(_) => None,
            Self::Other(value) => Some(value),
        }
    }
}

impl<T> From<Vec<T>> for LooseList<T> {
    fn from(items: Vec<T>) -> Self {
        Self::Items(items)
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for LooseList<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::Array(items) => Self::Items(
                items
                    .into_iter()
                    .filter_map(|item| serde_json::from_value(item).ok())
                    .collect(),
            ),
            Value::Null => Self::default(),
            other => Self::Other(other),
        })
    }
}

impl<T: Serialize> Serialize for LooseList<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Items(items) => items.serialize(serializer),
            Self::Other(value) => value.serialize(serializer),
        }
    }
}

/// Accepts either a JSON string or a number and yields it as a `String`.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "expected a string or number, got {other}"
        ))),
    }
}
