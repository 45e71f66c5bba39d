use super::state::{WorkflowState, WorkflowStep};
use crate::config::GenerationSettings;
use crate::error::{ReqsmithError, Result};
use crate::extract::{extract_json_object, extract_task_list};
use crate::llm::{CompletionRequest, ModelClient, RetryPolicy, complete_with_retry};
use crate::logging::workflow_step;
use crate::model::{RequirementType, WorkItem, WorkItemSummary, short_id};
use crate::prompts;
use serde::Serialize;
use serde_json::json;

/// Everything a converter run produced, including partial results of a
/// run that stopped early.
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowOutcome {
    pub run_id: String,
    pub state: WorkflowState,
    pub detailed_requirement: Option<String>,
    pub tasks: Vec<String>,
    pub items: Vec<WorkItem>,
}

impl WorkflowOutcome {
    pub fn succeeded(&self) -> bool {
        self.state.step == WorkflowStep::Completed
    }

    pub fn summary(&self) -> WorkItemSummary {
        WorkItemSummary::of(&self.items)
    }
}

type Observer<'a> = Box<dyn FnMut(&WorkflowState) + 'a>;

/// Requirement -> detailed requirement -> tasks -> work items.
///
/// One model call at a time. A failed expansion or breakdown ends the run;
/// a failed task conversion is reported and skipped.
pub struct Workflow<'a> {
    client: &'a dyn ModelClient,
    retry: RetryPolicy,
    settings: GenerationSettings,
    state: WorkflowState,
    observer: Option<Observer<'a>>,
}

impl<'a> Workflow<'a> {
    pub fn new(client: &'a dyn ModelClient, retry: RetryPolicy, settings: GenerationSettings) -> Self {
        Self {
            client,
            retry,
            settings,
            state: WorkflowState::new(),
            observer: None,
        }
    }

    /// Called with the current state after every change.
    pub fn with_observer(mut self, observer: impl FnMut(&WorkflowState) + 'a) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    fn notify(&mut self) {
        if let Some(observer) = self.observer.as_mut() {
            observer(&self.state);
        }
    }

    fn step(&mut self, step: WorkflowStep, progress: u8, message: &str) {
        self.state.update_step(step, Some(progress), Some(message));
        self.notify();
    }

    fn message(&mut self, message: &str) {
        self.state.add_message(message);
        self.notify();
    }

    fn fail(&mut self, error: String) {
        self.state.set_error(error);
        self.notify();
    }

    fn call(&self, prompt: String, request_type: &str) -> Result<String> {
        let request = CompletionRequest::new(prompt, &self.settings);
        let text = complete_with_retry(self.client, &request, request_type, &self.retry)?;
        if text.trim().is_empty() {
            return Err(ReqsmithError::EmptyResponse);
        }
        Ok(text)
    }

    /// Expand a short requirement into a detailed one.
    pub fn expand(&mut self, basic_requirement: &str, requirement_type: RequirementType) -> Option<String> {
        self.step(WorkflowStep::Expanding, 10, "Starting requirement expansion...");
        workflow_step(
            "expand_requirement",
            "started",
            json!({"requirement_type": requirement_type.to_string()}),
        );

        self.message("Calling model API...");
        let prompt = prompts::expand_requirement(basic_requirement, requirement_type);
        match self.call(prompt, "requirement_expansion") {
            Ok(detailed) => {
                self.step(
                    WorkflowStep::Expanded,
                    30,
                    &format!(
                        "Requirement expanded successfully! ({} characters)",
                        detailed.chars().count()
                    ),
                );
                workflow_step(
                    "expand_requirement",
                    "completed",
                    json!({
                        "requirement_type": requirement_type.to_string(),
                        "output_length": detailed.len(),
                    }),
                );
                Some(detailed)
            }
            Err(e) => {
                self.fail(format!("Error expanding requirement: {}", e));
                workflow_step("expand_requirement", "error", json!({"error": e.to_string()}));
                None
            }
        }
    }

    /// Split a detailed requirement into task descriptions.
    pub fn break_down(
        &mut self,
        detailed_requirement: &str,
        requirement_type: RequirementType,
    ) -> Option<Vec<String>> {
        self.step(
            WorkflowStep::BreakingDown,
            40,
            "Breaking down requirement into tasks...",
        );
        workflow_step(
            "breakdown_requirement",
            "started",
            json!({"requirement_type": requirement_type.to_string()}),
        );

        self.message("Analyzing requirement structure...");
        let prompt = prompts::break_down_requirement(detailed_requirement, requirement_type);
        let content = match self.call(prompt, "requirement_breakdown") {
            Ok(content) => content,
            Err(e) => {
                self.fail(format!("Error breaking down requirement: {}", e));
                workflow_step("breakdown_requirement", "error", json!({"error": e.to_string()}));
                return None;
            }
        };

        self.message("Parsing task breakdown...");
        match extract_task_list(&content) {
            Ok(tasks) if tasks.is_empty() => {
                self.fail("Breakdown produced no tasks".to_string());
                workflow_step("breakdown_requirement", "failed", json!({"error": "empty task list"}));
                None
            }
            Ok(tasks) => {
                self.step(
                    WorkflowStep::BrokenDown,
                    60,
                    &format!("Breakdown complete! Found {} tasks", tasks.len()),
                );
                workflow_step(
                    "breakdown_requirement",
                    "completed",
                    json!({
                        "requirement_type": requirement_type.to_string(),
                        "task_count": tasks.len(),
                    }),
                );
                Some(tasks)
            }
            Err(ReqsmithError::NoJson { .. }) => {
                self.fail("Could not find valid task list in response".to_string());
                workflow_step("breakdown_requirement", "failed", json!({"error": "invalid JSON format"}));
                None
            }
            Err(e) => {
                self.fail(format!("Error parsing task JSON: {}", e));
                workflow_step(
                    "breakdown_requirement",
                    "error",
                    json!({"error": format!("JSON parsing: {}", e)}),
                );
                None
            }
        }
    }

    /// Convert task `task_num` (1-based) of `total_tasks` into a work item.
    ///
    /// Failures are reported as messages and leave the run state intact.
    pub fn convert_task(
        &mut self,
        task: &str,
        requirement_type: RequirementType,
        task_num: usize,
        total_tasks: usize,
    ) -> Option<WorkItem> {
        let progress = 60 + (task_num * 30 / total_tasks.max(1)).min(30);
        self.step(
            WorkflowStep::CreatingItems,
            progress as u8,
            &format!("Creating work item {}/{}...", task_num, total_tasks),
        );
        workflow_step(
            "create_work_item",
            "started",
            json!({
                "task_num": task_num,
                "total_tasks": total_tasks,
                "requirement_type": requirement_type.to_string(),
            }),
        );

        self.message(&format!("Generating item {}: {}...", task_num, head(task, 50)));
        let prompt = prompts::convert_to_work_item(task, requirement_type);
        let parsed = self
            .call(prompt, "work_item_creation")
            .and_then(|content| extract_json_object(&content))
            .and_then(|object| WorkItem::from_model_json(&object));

        match parsed {
            Ok(item) => {
                self.message(&format!("Item {} created: {}", task_num, item.summary));
                workflow_step(
                    "create_work_item",
                    "completed",
                    json!({
                        "task_num": task_num,
                        "summary": item.summary,
                        "story_points": item.story_points,
                    }),
                );
                Some(item)
            }
            Err(e) => {
                let reason = match e {
                    ReqsmithError::NoJson { .. } => "invalid JSON format".to_string(),
                    ReqsmithError::Json(ref inner) => format!("JSON parsing: {}", inner),
                    ref other => other.to_string(),
                };
                self.message(&format!("Could not create item {}: {}", task_num, reason));
                workflow_step(
                    "create_work_item",
                    "failed",
                    json!({"task_num": task_num, "error": reason}),
                );
                None
            }
        }
    }

    /// Run all three steps.
    pub fn run(mut self, basic_requirement: &str, requirement_type: RequirementType) -> WorkflowOutcome {
        let run_id = short_id(8);
        let span = tracing::info_span!("workflow", run_id = %run_id);
        let _guard = span.enter();

        workflow_step(
            "workflow",
            "started",
            json!({
                "requirement_type": requirement_type.to_string(),
                "requirement_length": basic_requirement.len(),
            }),
        );

        let mut outcome = WorkflowOutcome {
            run_id,
            state: WorkflowState::new(),
            detailed_requirement: None,
            tasks: Vec::new(),
            items: Vec::new(),
        };

        let Some(detailed) = self.expand(basic_requirement, requirement_type) else {
            workflow_step("workflow", "failed", json!({"failed_step": "requirement_expansion"}));
            outcome.state = self.state;
            return outcome;
        };
        outcome.detailed_requirement = Some(detailed.clone());

        let Some(tasks) = self.break_down(&detailed, requirement_type) else {
            workflow_step("workflow", "failed", json!({"failed_step": "requirement_breakdown"}));
            outcome.state = self.state;
            return outcome;
        };

        let total = tasks.len();
        let delay = self.settings.task_delay();
        for (i, task) in tasks.iter().enumerate() {
            if let Some(item) = self.convert_task(task, requirement_type, i + 1, total) {
                outcome.items.push(item);
            }
            if i + 1 < total && !delay.is_zero() {
                std::thread::sleep(delay);
            }
        }

        let created = outcome.items.len();
        self.step(
            WorkflowStep::Completed,
            100,
            &format!(
                "Workflow completed! Generated {} items from {} tasks",
                created, total
            ),
        );
        workflow_step(
            "workflow",
            "completed",
            json!({
                "requirement_type": requirement_type.to_string(),
                "total_tasks": total,
                "successful_items": created,
                "success_rate": created as f64 / total as f64,
            }),
        );

        outcome.tasks = tasks;
        outcome.state = self.state;
        outcome
    }
}

fn head(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{ScriptedClient, ScriptedReply};
    use crate::model::Priority;

    fn settings() -> GenerationSettings {
        GenerationSettings {
            task_delay_ms: Some(0),
            ..GenerationSettings::default()
        }
    }

    fn item_json(summary: &str, points: u32, priority: &str) -> String {
        format!(
            r#"Here is the story:
{{"Summary": "{summary}", "Description": "d", "AcceptanceCriteria": "ac",
  "StoryPoints": {points}, "Priority": "{priority}", "Labels": ["x"]}}"#
        )
    }

    #[test]
    fn test_full_run_creates_items() {
        let client = ScriptedClient::from_texts([
            "Detailed requirement text".to_string(),
            r#"["Task one", "Task two"]"#.to_string(),
            item_json("One", 3, "High"),
            item_json("Two", 5, "Low"),
        ]);

        let outcome = Workflow::new(&client, RetryPolicy::immediate(1), settings())
            .run("Login", RequirementType::Business);

        assert!(outcome.succeeded());
        assert_eq!(outcome.state.progress, 100);
        assert_eq!(outcome.detailed_requirement.as_deref(), Some("Detailed requirement text"));
        assert_eq!(outcome.tasks, vec!["Task one", "Task two"]);
        assert_eq!(outcome.items.len(), 2);
        assert_eq!(outcome.items[1].priority, Priority::Low);
        assert_eq!(outcome.summary().total_points, 8);
        assert_eq!(outcome.run_id.len(), 8);

        let prompts = client.prompts();
        assert!(prompts[0].contains("Basic Requirement: Login"));
        assert!(prompts[1].contains("Detailed Requirement: Detailed requirement text"));
        assert!(prompts[2].contains("Requirement: Task one"));
        assert!(
            outcome
                .state
                .last_message()
                .unwrap()
                .text
                .contains("Generated 2 items from 2 tasks")
        );
    }

    #[test]
    fn test_failed_expansion_stops_run() {
        let client = ScriptedClient::new([ScriptedReply::Failure {
            error: "unavailable".to_string(),
        }]);

        let outcome = Workflow::new(&client, RetryPolicy::immediate(1), settings())
            .run("Login", RequirementType::Business);

        assert!(!outcome.succeeded());
        assert!(outcome.state.is_failed());
        assert!(outcome.detailed_requirement.is_none());
        assert!(outcome.items.is_empty());
        assert!(
            outcome
                .state
                .error
                .as_deref()
                .unwrap()
                .starts_with("Error expanding requirement")
        );
    }

    #[test]
    fn test_failed_breakdown_keeps_detailed_requirement() {
        let client = ScriptedClient::from_texts(["Detailed", "Sorry, no list here."]);

        let outcome = Workflow::new(&client, RetryPolicy::immediate(1), settings())
            .run("Login", RequirementType::Product);

        assert!(outcome.state.is_failed());
        assert_eq!(outcome.detailed_requirement.as_deref(), Some("Detailed"));
        assert_eq!(
            outcome.state.error.as_deref(),
            Some("Could not find valid task list in response")
        );
        assert!(outcome.items.is_empty());
    }

    #[test]
    fn test_empty_task_list_is_a_failure() {
        let client = ScriptedClient::from_texts(["Detailed", "[]"]);
        let outcome = Workflow::new(&client, RetryPolicy::immediate(1), settings())
            .run("Login", RequirementType::Product);
        assert!(outcome.state.is_failed());
    }

    #[test]
    fn test_bad_item_is_skipped_not_fatal() {
        let client = ScriptedClient::from_texts([
            "Detailed".to_string(),
            r#"["A", "B", "C"]"#.to_string(),
            item_json("A", 2, "Medium"),
            "no json at all".to_string(),
            item_json("C", 8, "High"),
        ]);

        let outcome = Workflow::new(&client, RetryPolicy::immediate(1), settings())
            .run("Reports", RequirementType::Technical);

        assert!(outcome.succeeded());
        assert_eq!(outcome.tasks.len(), 3);
        assert_eq!(outcome.items.len(), 2);
        assert!(
            outcome
                .state
                .messages
                .iter()
                .any(|m| m.text == "Could not create item 2: invalid JSON format")
        );
    }

    #[test]
    fn test_retry_recovers_within_a_step() {
        let client = ScriptedClient::new([
            ScriptedReply::Failure {
                error: "throttled".to_string(),
            },
            ScriptedReply::Text("Detailed".to_string()),
            ScriptedReply::Text(r#"["Only"]"#.to_string()),
            ScriptedReply::Text(item_json("Only", 1, "Low")),
        ]);

        let outcome = Workflow::new(&client, RetryPolicy::immediate(3), settings())
            .run("x", RequirementType::Quality);

        assert!(outcome.succeeded());
        assert_eq!(outcome.items.len(), 1);
    }

    #[test]
    fn test_observer_sees_progress_increase() {
        let client = ScriptedClient::from_texts([
            "Detailed".to_string(),
            r#"["A"]"#.to_string(),
            item_json("A", 1, "Low"),
        ]);
        let mut seen = Vec::new();

        let outcome = Workflow::new(&client, RetryPolicy::immediate(1), settings())
            .with_observer(|state| seen.push(state.progress))
            .run("x", RequirementType::Business);

        assert!(outcome.succeeded());
        assert_eq!(seen.first(), Some(&10));
        assert_eq!(seen.last(), Some(&100));
        assert!(seen.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_convert_progress_spans_sixty_to_ninety() {
        let client = ScriptedClient::from_texts([item_json("A", 1, "Low")]);
        let mut workflow = Workflow::new(&client, RetryPolicy::immediate(1), settings());
        workflow.convert_task("A", RequirementType::Business, 2, 2);
        assert_eq!(workflow.state().progress, 90);
    }
}
