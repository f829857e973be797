//! Fixture records shared by the pipelines, templates, and CLI output.
//!
//! Fixtures are hand-edited JSON, so decoding is deliberately forgiving:
//!
//! - a top-level value of the wrong shape decodes to an empty list
//! - array elements that are not objects are skipped
//! - a field of the wrong type falls back to its default
//!
//! Each of these is logged with `tracing::warn!` and never surfaces as an error.
//! Only malformed JSON (a parse failure) is an error, and that is handled by
//! the pipeline before decoding starts.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// One job in `experience.json`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExperienceEntry {
    #[serde(deserialize_with = "lenient::text")]
    pub company: String,
    #[serde(rename = "startDate", deserialize_with = "lenient::text")]
    pub start_date: String,
    #[serde(rename = "endDate", deserialize_with = "lenient::text")]
    pub end_date: String,
    #[serde(deserialize_with = "lenient::text")]
    pub description: String,
    /// Year as written in the fixture; see [`ExperienceEntry::year`].
    #[serde(rename = "year", deserialize_with = "lenient::number")]
    pub declared_year: Option<i64>,
    /// Skill label → icon name, in fixture order.
    #[serde(deserialize_with = "lenient::pairs")]
    pub skills: Vec<(String, String)>,
    #[serde(deserialize_with = "lenient::opt_text")]
    pub icon: Option<String>,
    #[serde(deserialize_with = "lenient::number")]
    pub id: Option<i64>,
}

impl ExperienceEntry {
    /// Grouping year: the declared `year`, else the first four-digit run in
    /// `startDate` (`"Sep 2021"` → 2021).
    pub fn year(&self) -> Option<i64> {
        self.declared_year
            .or_else(|| first_four_digit_run(&self.start_date))
    }
}

/// One school in `academic.json`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AcademicEntry {
    #[serde(deserialize_with = "lenient::text")]
    pub school: String,
    #[serde(deserialize_with = "lenient::text")]
    pub study: String,
    #[serde(rename = "startYear")]
    pub start_year: YearValue,
    #[serde(rename = "endYear")]
    pub end_year: YearValue,
    #[serde(deserialize_with = "lenient::text")]
    pub description: String,
}

/// A year that fixtures write either as a number (`2020`) or as text
/// (`"2020"`, `"now"`). The display text is kept verbatim.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct YearValue {
    pub text: String,
    pub number: Option<i64>,
}

impl YearValue {
    pub fn from_value(value: &Value) -> Self {
        let text = lenient::value_text(value);
        let number = lenient::value_number(value);
        Self { text, number }
    }
}

impl<'de> Deserialize<'de> for YearValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

/// One progress bar in `skills.json`.
///
/// Older fixtures call the percentage `amount`, newer ones `level`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SkillEntry {
    #[serde(deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(alias = "amount", deserialize_with = "lenient::number")]
    pub level: Option<i64>,
}

impl SkillEntry {
    /// Bar width in percent, clamped to `0..=100`. A missing level is 0.
    pub fn clamped_level(&self) -> u8 {
        self.level.unwrap_or(0).clamp(0, 100) as u8
    }
}

/// A titled group of technology icons.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SkillCategory {
    #[serde(deserialize_with = "lenient::text")]
    pub title: String,
    #[serde(deserialize_with = "lenient::list")]
    pub items: Vec<TechItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TechItem {
    #[serde(deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(deserialize_with = "lenient::text")]
    pub icon: String,
}

/// `skills.json` in either of its two shapes.
///
/// ```json
/// [{"name": "Rust", "level": 80}]
/// ```
///
/// ```json
/// {"categories": [{"title": "Languages", "items": [...]}], "skills": [...]}
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkillsDocument {
    pub categories: Vec<SkillCategory>,
    /// Free-form icon table some fixtures carry next to `categories`.
    pub icons: Option<Value>,
    pub skills: Vec<SkillEntry>,
}

impl SkillsDocument {
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Array(_) => Self {
                skills: decode_list(value, "skills"),
                ..Self::default()
            },
            Value::Object(mut map) => Self {
                categories: map
                    .remove("categories")
                    .map(|v| decode_list(v, "skill categories"))
                    .unwrap_or_default(),
                icons: map.remove("icons"),
                skills: map
                    .remove("skills")
                    .map(|v| decode_list(v, "skills"))
                    .unwrap_or_default(),
            },
            other => {
                tracing::warn!(kind = "skills", found = %json_kind(&other), "unexpected fixture shape, using empty skills");
                Self::default()
            }
        }
    }
}

/// Decode a JSON array into records, skipping anything that is not an object.
pub fn decode_list<T: DeserializeOwned>(value: Value, kind: &str) -> Vec<T> {
    let items = match value {
        Value::Array(items) => items,
        other => {
            tracing::warn!(kind, found = %json_kind(&other), "expected an array, using empty list");
            return Vec::new();
        }
    };
    items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| {
            if !item.is_object() {
                tracing::warn!(kind, index, found = %json_kind(&item), "skipping non-object entry");
                return None;
            }
            match serde_json::from_value(item) {
                Ok(record) => Some(record),
                Err(err) => {
                    tracing::warn!(kind, index, %err, "skipping undecodable entry");
                    None
                }
            }
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn first_four_digit_run(text: &str) -> Option<i64> {
    let bytes = text.as_bytes();
    let mut start = None;
    for (i, b) in bytes.iter().enumerate() {
        match (b.is_ascii_digit(), start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                if i - s == 4 {
                    return text[s..i].parse().ok();
                }
                start = None;
            }
            _ => {}
        }
    }
    match start {
        Some(s) if bytes.len() - s == 4 => text[s..].parse().ok(),
        _ => None,
    }
}

/// Field deserializers that never fail: wrong types become defaults.
mod lenient {
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn value_text(value: &Value) -> String {
        match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => String::new(),
        }
    }

    pub fn value_number(value: &Value) -> Option<i64> {
        match value {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.round() as i64)),
            Value::String(s) => {
                let s = s.trim();
                let end = s
                    .char_indices()
                    .find(|&(i, c)| !(c.is_ascii_digit() || (i == 0 && c == '-')))
                    .map(|(i, _)| i)
                    .unwrap_or(s.len());
                s[..end].parse().ok()
            }
            _ => None,
        }
    }

    pub fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        Ok(value_text(&Value::deserialize(deserializer)?))
    }

    pub fn opt_text<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<String>, D::Error> {
        let text = value_text(&Value::deserialize(deserializer)?);
        Ok((!text.is_empty()).then_some(text))
    }

    pub fn number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
        Ok(value_number(&Value::deserialize(deserializer)?))
    }

    pub fn pairs<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<(String, String)>, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::Object(map) => map
                .into_iter()
                .map(|(label, icon)| (label, value_text(&icon)))
                .collect(),
            _ => Vec::new(),
        })
    }

    pub fn list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        Ok(super::decode_list(Value::deserialize(deserializer)?, "nested list"))
    }
}
