//! Structured record filters.
//!
//! Field names are `&'static str` so they can only come from code. Values are
//! always quoted and escaped when rendered for the store, which keeps caller
//! supplied ids from changing the shape of the expression.

use serde_json::Value;

use super::Record;

#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Text(String),
    Number(i64),
    Bool(bool),
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Text(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::Text(value)
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        FilterValue::Number(value)
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        FilterValue::Bool(value)
    }
}

impl FilterValue {
    fn render(&self) -> String {
        match self {
            FilterValue::Text(text) => quote(text),
            FilterValue::Number(n) => n.to_string(),
            FilterValue::Bool(b) => b.to_string(),
        }
    }

    fn matches(&self, value: Option<&Value>) -> bool {
        match (self, value) {
            (FilterValue::Text(expected), Some(Value::String(actual))) => expected == actual,
            (FilterValue::Number(expected), Some(Value::Number(actual))) => {
                actual.as_i64() == Some(*expected)
            }
            (FilterValue::Bool(expected), Some(Value::Bool(actual))) => expected == actual,
            // Missing fields compare like the store's zero values.
            (FilterValue::Text(expected), None) => expected.is_empty(),
            (FilterValue::Number(expected), None) => *expected == 0,
            (FilterValue::Bool(expected), None) => !expected,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Eq(&'static str, FilterValue),
    Any(Vec<Filter>),
    All(Vec<Filter>),
}

impl Filter {
    pub fn eq(field: &'static str, value: impl Into<FilterValue>) -> Self {
        Filter::Eq(field, value.into())
    }

    /// Matches records whose `field` equals any of `values`.
    pub fn any_of<I, V>(field: &'static str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<FilterValue>,
    {
        Filter::Any(values.into_iter().map(|v| Filter::eq(field, v)).collect())
    }

    pub fn and(self, other: Filter) -> Self {
        match self {
            Filter::All(mut parts) => {
                parts.push(other);
                Filter::All(parts)
            }
            first => Filter::All(vec![first, other]),
        }
    }

    /// Renders the filter in the store's expression syntax.
    pub fn render(&self) -> String {
        match self {
            Filter::Eq(field, value) => format!("{field} = {}", value.render()),
            // No record has an empty id, so this never matches.
            Filter::Any(parts) if parts.is_empty() => "id = \"\"".to_string(),
            Filter::All(parts) if parts.is_empty() => "id != \"\"".to_string(),
            Filter::Any(parts) => join(parts, " || "),
            Filter::All(parts) => join(parts, " && "),
        }
    }

    /// Evaluates the filter against a raw record.
    pub fn matches(&self, record: &Record) -> bool {
        match self {
            Filter::Eq(field, value) => value.matches(record.get(*field)),
            Filter::Any(parts) => parts.iter().any(|f| f.matches(record)),
            Filter::All(parts) => parts.iter().all(|f| f.matches(record)),
        }
    }
}

fn join(parts: &[Filter], sep: &str) -> String {
    let rendered: Vec<String> = parts.iter().map(|f| format!("({})", f.render())).collect();
    rendered.join(sep)
}

fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for ch in text.chars() {
        if ch == '\\' || ch == '"' {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('"');
    out
}
