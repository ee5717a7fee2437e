//! Field-level diffs between two record states

use serde_json::Value;

/// Summarize the top-level fields that differ between `before` and `after`
///
/// Returns `None` when nothing changed.
pub fn generate_diff(before: &Value, after: &Value) -> Option<String> {
    let changes: Vec<String> = match (before, after) {
        (Value::Object(before_obj), Value::Object(after_obj)) => {
            let mut changes: Vec<String> = before_obj
                .iter()
                .filter_map(|(key, before_val)| match after_obj.get(key) {
                    Some(after_val) if after_val == before_val => None,
                    Some(after_val) => Some(format!(
                        "{}: {} -> {}",
                        key,
                        format_value(before_val),
                        format_value(after_val)
                    )),
                    None => Some(format!("{}: {} -> (removed)", key, format_value(before_val))),
                })
                .collect();

            changes.extend(
                after_obj
                    .iter()
                    .filter(|(key, _)| !before_obj.contains_key(*key))
                    .map(|(key, val)| format!("{}: (added) -> {}", key, format_value(val))),
            );
            changes
        }
        _ if before != after => vec![format!("{} -> {}", format_value(before), format_value(after))],
        _ => Vec::new(),
    };

    if changes.is_empty() {
        None
    } else {
        Some(changes.join(", "))
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) if s.chars().count() > 50 => {
            let head: String = s.chars().take(47).collect();
            format!("\"{}...\"", head)
        }
        Value::String(s) => format!("\"{}\"", s),
        // Bill lists are what grows here; the newest entry is the useful part.
        Value::Array(arr) => match arr.last() {
            Some(last) => format!("[{} items, last {}]", arr.len(), format_value(last)),
            None => "[]".to_string(),
        },
        Value::Object(obj) => format!("{{{} fields}}", obj.len()),
    }
}
