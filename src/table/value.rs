use chrono::NaiveDateTime;
use chrono::NaiveTime;
use serde::Serialize;
use std::fmt::Display;

/// A single cell of the record table.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Missing,
    Text(String),
    Number(f64),
    Bool(bool),
    Date(NaiveDateTime),
}

impl Value {
    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(value) if !value.is_nan() => Some(*value),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDateTime> {
        match self {
            Value::Date(value) => Some(*value),
            _ => None,
        }
    }

    /// String form of a present value, `None` for a missing one.
    pub fn to_text(&self) -> Option<String> {
        match self {
            Value::Missing => None,
            _ => Some(self.to_string()),
        }
    }
}

/// Parses numeric text with a `.` decimal point and optional exponent.
/// Grouped digits ("1.234,56") do not parse.
pub(crate) fn parse_number(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() || text.contains(',') {
        return None;
    }
    text.parse::<f64>().ok()
}

/// Parses `true`/`false` in any letter case.
pub(crate) fn parse_bool(text: &str) -> Option<bool> {
    let text = text.trim();
    if text.eq_ignore_ascii_case("true") {
        Some(true)
    } else if text.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Formats a date value, dropping the time part at midnight.
pub(crate) fn format_datetime(value: &NaiveDateTime) -> String {
    if value.time() == NaiveTime::MIN {
        value.format("%Y-%m-%d").to_string()
    } else {
        value.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Missing => Ok(()),
            Value::Text(value) => write!(f, "{}", value),
            Value::Number(value) => write!(f, "{}", value),
            Value::Bool(true) => write!(f, "True"),
            Value::Bool(false) => write!(f, "False"),
            Value::Date(value) => write!(f, "{}", format_datetime(value)),
        }
    }
}
