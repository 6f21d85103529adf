use crate::helpers::text::take_chars;
use crate::table::Value;
use regex::Regex;
use std::sync::LazyLock;

/// "Circo" up to, not including, a pipe, backslash or hyphen
static CIRCO: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)Circo[^|\\-]*").expect("Hardcode regex pattern"));

/// Derives the group label of an event name. Tried in order: the text
/// before the first pipe, the "Circo" run, the first `max_chars` characters.
pub fn derive_label(value: &Value, max_chars: usize) -> Value {
    let Some(text) = value.to_text() else {
        return Value::Missing;
    };
    let label = if let Some((before, _)) = text.split_once('|') {
        before.trim()
    } else if let Some(found) = CIRCO.find(&text) {
        found.as_str().trim()
    } else {
        take_chars(&text, max_chars).trim()
    };
    Value::Text(label.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(text: &str) -> Value {
        derive_label(&Value::Text(text.to_owned()), 60)
    }

    fn text(text: &str) -> Value {
        Value::Text(text.to_owned())
    }

    #[test]
    fn pipe_comes_first() {
        assert_eq!(label("Circo Brasil | São Paulo - SP"), text("Circo Brasil"));
        assert_eq!(label("Show Especial|Circo Norte"), text("Show Especial"));
        assert_eq!(label("| sem nome"), text(""));
    }

    #[test]
    fn circo_run_stops_at_hyphen() {
        assert_eq!(label("Espetaculo Circo Top - Unidade Norte"), text("Circo Top"));
        assert_eq!(label("grande CIRCO mágico"), text("CIRCO mágico"));
        assert_eq!(label("Circo\\Tenda"), text("Circo"));
    }

    #[test]
    fn truncates_other_names() {
        assert_eq!(label("Show de Talentos"), text("Show de Talentos"));
        let long = "Á".repeat(70);
        assert_eq!(label(&long), text(&"Á".repeat(60)));
        assert_eq!(derive_label(&text("  Festival  "), 5), text("Fes"));
    }

    #[test]
    fn missing_and_non_text_values() {
        assert_eq!(derive_label(&Value::Missing, 60), Value::Missing);
        assert_eq!(derive_label(&Value::Number(1500.0), 60), text("1500"));
    }
}
