//! Tolerant parsing of structured completions.
//!
//! Models do not reliably honour the requested shape: the object may come
//! wrapped in a code fence, fields may be nested objects or lists, or the
//! text may not be JSON at all. Everything here degrades to placeholder text
//! instead of failing.

use serde_json::{Map, Value};

/// The two parts of a structured care sheet, both flat strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CareSheet {
  pub description:     String,
  pub care_guidelines: String,
}

impl CareSheet {
  pub fn placeholder(plant_type: &str) -> Self {
    Self {
      description:     placeholder_description(plant_type),
      care_guidelines: placeholder_care(plant_type),
    }
  }

  /// Parse a completion, filling any missing part from placeholders.
  pub fn parse(content: &str, plant_type: &str) -> Self {
    let Some(obj) = parse_object(content) else {
      tracing::warn!(plant_type, "structured completion is not a JSON object");
      return Self::placeholder(plant_type);
    };

    let field = |key: &str| {
      obj
        .get(key)
        .map(flatten)
        .filter(|s| !s.trim().is_empty())
    };

    Self {
      description:     field("description")
        .unwrap_or_else(|| placeholder_description(plant_type)),
      care_guidelines: field("care_guidelines")
        .unwrap_or_else(|| placeholder_care(plant_type)),
    }
  }

  pub fn render(&self) -> String {
    format!("{}\n\n{}", self.description.trim(), self.care_guidelines.trim())
  }
}

fn placeholder_description(plant_type: &str) -> String {
  format!("A {plant_type} plant.")
}

fn placeholder_care(plant_type: &str) -> String {
  format!(
    "Care guidelines for {plant_type} are not available right now. \
     Water when the top of the soil is dry and give it bright, indirect light."
  )
}

fn parse_object(content: &str) -> Option<Map<String, Value>> {
  let trimmed = strip_fence(content.trim());
  match serde_json::from_str(trimmed).ok()? {
    Value::Object(map) => Some(map),
    _ => None,
  }
}

/// Remove a surrounding markdown code fence, with or without a language tag.
fn strip_fence(s: &str) -> &str {
  let Some(body) = s.strip_prefix("```") else {
    return s;
  };
  let body = body.trim_end();
  let body = body.strip_suffix("```").unwrap_or(body);
  match body.split_once('\n') {
    Some((_, rest)) => rest.trim(),
    // One line: ```{"a":1}``` or ```json {"a":1}```.
    None => body.trim_start_matches(|c: char| c.is_ascii_alphanumeric()).trim(),
  }
}

/// Collapse any JSON value into one line of text.
pub fn flatten(value: &Value) -> String {
  match value {
    Value::Null => String::new(),
    Value::String(s) => s.trim().to_owned(),
    Value::Bool(_) | Value::Number(_) => value.to_string(),
    Value::Array(items) => items
      .iter()
      .map(flatten)
      .filter(|s| !s.is_empty())
      .collect::<Vec<_>>()
      .join("; "),
    Value::Object(map) => map
      .iter()
      .map(|(k, v)| (k, flatten(v)))
      .filter(|(_, v)| !v.is_empty())
      .map(|(k, v)| format!("{}: {v}", humanize(k)))
      .collect::<Vec<_>>()
      .join("; "),
  }
}

fn humanize(key: &str) -> String {
  let spaced = key.replace('_', " ");
  let mut chars = spaced.chars();
  match chars.next() {
    Some(first) => first.to_uppercase().chain(chars).collect(),
    None => String::new(),
  }
}
