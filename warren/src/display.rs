//! Small text helpers shared by every table and detail view.

use serde_json::Value;

pub fn first_non_empty<'a>(values: &[&'a str]) -> &'a str {
    values.iter().copied().find(|v| !v.trim().is_empty()).unwrap_or("")
}

/// Shortens `value` to at most `max` characters, marking the cut with `...`.
pub fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        return value.to_string();
    }
    if max <= 3 {
        return value.chars().take(max).collect();
    }
    let mut cut: String = value.chars().take(max - 3).collect();
    cut.push_str("...");
    cut
}

/// `label (id)` when both are known and differ, otherwise whichever exists.
pub fn format_related(label: &str, id: &str) -> String {
    match (label.is_empty(), id.is_empty()) {
        (false, false) if label != id => format!("{} ({})", label, id),
        (false, _) => label.to_string(),
        (true, _) => id.to_string(),
    }
}

/// `Type/ID` for a polymorphic target with no richer label.
pub fn format_polymorphic(ty: &str, id: &str) -> String {
    match (ty.is_empty(), id.is_empty()) {
        (_, true) => String::new(),
        (true, false) => id.to_string(),
        (false, false) => format!("{}/{}", ty, id),
    }
}

pub fn format_optional(value: &str) -> &str {
    if value.trim().is_empty() {
        "-"
    } else {
        value
    }
}

/// Strings unquoted, `null` as `-`, compound values as compact JSON.
pub fn format_any_value(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::String(s) => format_optional(s).to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        compound => compound.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn truncate_counts_characters() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a long comment body", 10), "a long ...");
        assert_eq!(truncate("ñandú ñandú", 8), "ñandú...");
        assert_eq!(truncate("abcdef", 2), "ab");
    }

    #[test]
    fn related_and_polymorphic_labels() {
        assert_eq!(format_related("Ann", "9"), "Ann (9)");
        assert_eq!(format_related("9", "9"), "9");
        assert_eq!(format_related("", "9"), "9");
        assert_eq!(format_related("", ""), "");
        assert_eq!(format_polymorphic("brokers", "1"), "brokers/1");
        assert_eq!(format_polymorphic("", "1"), "1");
        assert_eq!(format_polymorphic("brokers", ""), "");
    }

    #[test]
    fn first_non_empty_skips_blanks() {
        assert_eq!(first_non_empty(&["", "  ", "b", "c"]), "b");
        assert_eq!(first_non_empty(&[]), "");
    }

    #[test]
    fn any_value_formatting() {
        assert_eq!(format_any_value(&json!(null)), "-");
        assert_eq!(format_any_value(&json!("")), "-");
        assert_eq!(format_any_value(&json!("x")), "x");
        assert_eq!(format_any_value(&json!(1.5)), "1.5");
        assert_eq!(format_any_value(&json!({ "a": [1] })), r#"{"a":[1]}"#);
    }
}
