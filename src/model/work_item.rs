use super::types::Priority;
use crate::error::{ReqsmithError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Story points accepted without a warning.
pub const FIBONACCI_POINTS: &[u32] = &[1, 2, 3, 5, 8, 13];

/// A tracked work item produced from one task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WorkItem {
    pub summary: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub acceptance_criteria: String,

    #[serde(default)]
    pub story_points: u32,

    #[serde(default)]
    pub priority: Priority,

    #[serde(default)]
    pub labels: Vec<String>,
}

impl WorkItem {
    pub fn new(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            description: String::new(),
            acceptance_criteria: String::new(),
            story_points: 0,
            priority: Priority::default(),
            labels: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_acceptance_criteria(mut self, criteria: impl Into<String>) -> Self {
        self.acceptance_criteria = criteria.into();
        self
    }

    pub fn with_story_points(mut self, points: u32) -> Self {
        self.story_points = points;
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_labels(mut self, labels: Vec<String>) -> Self {
        self.labels = labels;
        self
    }

    pub fn points_are_fibonacci(&self) -> bool {
        FIBONACCI_POINTS.contains(&self.story_points)
    }

    /// Build a work item from the JSON object a model returned.
    ///
    /// Keys are matched ignoring case, spaces and underscores. Acceptance
    /// criteria and labels may be strings or lists; points may be numbers
    /// or numeric strings; unknown priorities fall back to Medium.
    pub fn from_model_json(object: &Map<String, Value>) -> Result<Self> {
        let summary = field(object, &["summary", "title"])
            .map(text_of)
            .unwrap_or_default();
        if summary.trim().is_empty() {
            return Err(ReqsmithError::Parse(
                "Work item is missing a Summary".to_string(),
            ));
        }

        let description = field(object, &["description"])
            .map(text_of)
            .unwrap_or_default();

        let acceptance_criteria = field(object, &["acceptancecriteria", "criteria"])
            .map(text_of)
            .unwrap_or_default();

        let story_points = match field(object, &["storypoints", "points", "estimate"]) {
            Some(value) => points_of(value)?,
            None => 0,
        };

        let priority = match field(object, &["priority"]).map(text_of) {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!(priority = %raw, "Unknown priority, using Medium");
                Priority::Medium
            }),
            None => Priority::default(),
        };

        let labels = field(object, &["labels", "tags"])
            .map(labels_of)
            .unwrap_or_default();

        let item = WorkItem {
            summary: summary.trim().to_string(),
            description,
            acceptance_criteria,
            story_points,
            priority,
            labels,
        };

        if !item.points_are_fibonacci() {
            tracing::warn!(
                summary = %item.summary,
                points = item.story_points,
                "Story points are off the Fibonacci scale"
            );
        }

        Ok(item)
    }
}

fn normalize_key(key: &str) -> String {
    key.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

fn field<'a>(object: &'a Map<String, Value>, names: &[&str]) -> Option<&'a Value> {
    names.iter().find_map(|name| {
        object
            .iter()
            .find(|(key, value)| normalize_key(key) == *name && !value.is_null())
            .map(|(_, value)| value)
    })
}

fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => format!("- {}", s.trim()),
                other => format!("- {}", other),
            })
            .collect::<Vec<_>>()
            .join("\n"),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn points_of(value: &Value) -> Result<u32> {
    let invalid = || ReqsmithError::Parse(format!("Invalid StoryPoints: {}", value));
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.round() as u64))
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(invalid),
        Value::String(s) => s.trim().parse::<u32>().map_err(|_| invalid()),
        _ => Err(invalid()),
    }
}

fn labels_of(value: &Value) -> Vec<String> {
    let raw: Vec<String> = match value {
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect(),
        Value::String(s) => s.split(',').map(str::to_string).collect(),
        _ => Vec::new(),
    };
    raw.into_iter()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect()
}

/// Aggregate figures shown after a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WorkItemSummary {
    pub total_items: usize,
    pub total_points: u32,
    pub high_priority: usize,
}

impl WorkItemSummary {
    pub fn of(items: &[WorkItem]) -> Self {
        Self {
            total_items: items.len(),
            total_points: items.iter().map(|i| i.story_points).sum(),
            high_priority: items
                .iter()
                .filter(|i| i.priority == Priority::High)
                .count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_parses_prompted_shape() {
        let item = WorkItem::from_model_json(&object(json!({
            "Summary": "Login form",
            "Description": "Users sign in with email",
            "AcceptanceCriteria": "Valid users land on dashboard",
            "StoryPoints": 3,
            "Priority": "High",
            "Labels": ["auth", "frontend"]
        })))
        .unwrap();

        assert_eq!(item.summary, "Login form");
        assert_eq!(item.story_points, 3);
        assert_eq!(item.priority, Priority::High);
        assert_eq!(item.labels, vec!["auth", "frontend"]);
        assert!(item.points_are_fibonacci());
    }

    #[test]
    fn test_lenient_shapes() {
        let item = WorkItem::from_model_json(&object(json!({
            "summary": "Export report",
            "acceptance_criteria": ["CSV downloads", "PDF downloads"],
            "Story Points": "5",
            "priority": "normal",
            "labels": "reports, export ,"
        })))
        .unwrap();

        assert_eq!(item.acceptance_criteria, "- CSV downloads\n- PDF downloads");
        assert_eq!(item.story_points, 5);
        assert_eq!(item.priority, Priority::Medium);
        assert_eq!(item.labels, vec!["reports", "export"]);
        assert_eq!(item.description, "");
    }

    #[test]
    fn test_unknown_priority_falls_back_to_medium() {
        let item = WorkItem::from_model_json(&object(json!({
            "Summary": "x",
            "Priority": "whenever"
        })))
        .unwrap();
        assert_eq!(item.priority, Priority::Medium);
    }

    #[test]
    fn test_off_scale_points_are_kept() {
        let item = WorkItem::from_model_json(&object(json!({
            "Summary": "x",
            "StoryPoints": 4
        })))
        .unwrap();
        assert_eq!(item.story_points, 4);
        assert!(!item.points_are_fibonacci());
    }

    #[test]
    fn test_missing_summary_rejected() {
        let result = WorkItem::from_model_json(&object(json!({"Description": "no title"})));
        assert!(matches!(result, Err(ReqsmithError::Parse(_))));
    }

    #[test]
    fn test_non_numeric_points_rejected() {
        let result = WorkItem::from_model_json(&object(json!({
            "Summary": "x",
            "StoryPoints": "a few"
        })));
        assert!(result.is_err());
    }

    #[test]
    fn test_serializes_with_prompt_keys() {
        let item = WorkItem::new("x").with_story_points(2);
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["Summary"], "x");
        assert_eq!(value["StoryPoints"], 2);
        assert_eq!(value["AcceptanceCriteria"], "");
        assert_eq!(value["Priority"], "Medium");
    }

    #[test]
    fn test_summary_counts() {
        let items = vec![
            WorkItem::new("a").with_story_points(3).with_priority(Priority::High),
            WorkItem::new("b").with_story_points(5).with_priority(Priority::Low),
            WorkItem::new("c").with_story_points(8).with_priority(Priority::High),
        ];
        let summary = WorkItemSummary::of(&items);
        assert_eq!(summary.total_items, 3);
        assert_eq!(summary.total_points, 16);
        assert_eq!(summary.high_priority, 2);
    }
}
