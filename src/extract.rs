//! Pull JSON payloads out of free-form model output.
//!
//! Models wrap the JSON they were asked for in prose or code fences, so the
//! payload is taken as the span from the first opening bracket to the last
//! closing one.

use crate::error::{ReqsmithError, Result};
use serde_json::{Map, Value};

fn bracketed<'a>(text: &'a str, open: char, close: char, expected: &'static str) -> Result<&'a str> {
    let start = text.find(open);
    let end = text.rfind(close);
    match (start, end) {
        (Some(start), Some(end)) if end > start => Ok(&text[start..=end]),
        _ => Err(ReqsmithError::NoJson { expected }),
    }
}

/// Parse the outermost `[...]` span of `text` as a JSON array.
pub fn extract_json_array(text: &str) -> Result<Vec<Value>> {
    let span = bracketed(text, '[', ']', "array")?;
    Ok(serde_json::from_str(span)?)
}

/// Parse the outermost `{...}` span of `text` as a JSON object.
pub fn extract_json_object(text: &str) -> Result<Map<String, Value>> {
    let span = bracketed(text, '{', '}', "object")?;
    Ok(serde_json::from_str(span)?)
}

const TASK_KEYS: &[&str] = &["task", "description", "title", "summary"];

/// Extract a list of task descriptions from a breakdown response.
///
/// Strings are kept as-is, objects are unwrapped through their first
/// task-like key, anything else is rendered as JSON. Blank entries are dropped.
pub fn extract_task_list(text: &str) -> Result<Vec<String>> {
    let tasks = extract_json_array(text)?
        .into_iter()
        .filter_map(|value| {
            let task = match value {
                Value::String(s) => s,
                Value::Object(ref map) => TASK_KEYS
                    .iter()
                    .find_map(|key| map.get(*key).and_then(Value::as_str))
                    .map(str::to_string)
                    .unwrap_or_else(|| value.to_string()),
                Value::Null => return None,
                other => other.to_string(),
            };
            let task = task.trim().to_string();
            (!task.is_empty()).then_some(task)
        })
        .collect();
    Ok(tasks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_inside_prose() {
        let text = "Here are the tasks:\n[\"Build login form\", \"Add rate limiting\"]\nLet me know!";
        let tasks = extract_json_array(text).unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0], "Build login form");
    }

    #[test]
    fn test_array_in_code_fence() {
        let text = "```json\n[\"a\", \"b\", \"c\"]\n```";
        assert_eq!(extract_json_array(text).unwrap().len(), 3);
    }

    #[test]
    fn test_missing_array_is_no_json() {
        assert!(matches!(
            extract_json_array("I could not break this down."),
            Err(ReqsmithError::NoJson { expected: "array" })
        ));
    }

    #[test]
    fn test_inverted_brackets_is_no_json() {
        assert!(matches!(
            extract_json_array("] before ["),
            Err(ReqsmithError::NoJson { .. })
        ));
    }

    #[test]
    fn test_malformed_array_is_json_error() {
        assert!(matches!(
            extract_json_array("[\"unterminated, ]"),
            Err(ReqsmithError::Json(_))
        ));
    }

    #[test]
    fn test_object_with_surrounding_text() {
        let text = r#"Sure! {"Summary": "Login", "StoryPoints": 3, "Labels": ["auth"]} Hope this helps."#;
        let obj = extract_json_object(text).unwrap();
        assert_eq!(obj["Summary"], "Login");
        assert_eq!(obj["StoryPoints"], 3);
    }

    #[test]
    fn test_nested_object_uses_outermost_braces() {
        let text = r#"{"Summary": "x", "Meta": {"a": 1}}"#;
        let obj = extract_json_object(text).unwrap();
        assert_eq!(obj["Meta"]["a"], 1);
    }

    #[test]
    fn test_trailing_brace_in_prose_breaks_parse() {
        let text = r#"{"Summary": "x"} and a stray } here"#;
        assert!(matches!(extract_json_object(text), Err(ReqsmithError::Json(_))));
    }

    #[test]
    fn test_task_list_unwraps_objects_and_drops_blanks() {
        let text = r#"[
            "Design schema",
            {"task": "Write migration"},
            {"title": "Add API endpoint", "priority": "high"},
            "   ",
            null,
            42
        ]"#;
        let tasks = extract_task_list(text).unwrap();
        assert_eq!(
            tasks,
            vec!["Design schema", "Write migration", "Add API endpoint", "42"]
        );
    }
}
