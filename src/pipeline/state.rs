use chrono::{DateTime, Local};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStep {
    #[default]
    Idle,
    Expanding,
    Expanded,
    BreakingDown,
    BrokenDown,
    CreatingItems,
    Completed,
    Error,
}

impl fmt::Display for WorkflowStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WorkflowStep::Idle => "idle",
            WorkflowStep::Expanding => "expanding",
            WorkflowStep::Expanded => "expanded",
            WorkflowStep::BreakingDown => "breaking_down",
            WorkflowStep::BrokenDown => "broken_down",
            WorkflowStep::CreatingItems => "creating_items",
            WorkflowStep::Completed => "completed",
            WorkflowStep::Error => "error",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusMessage {
    pub at: DateTime<Local>,
    pub text: String,
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.at.format("%H:%M:%S"), self.text)
    }
}

/// Progress of one converter run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct WorkflowState {
    pub step: WorkflowStep,
    /// Percentage, 0-100.
    pub progress: u8,
    pub messages: Vec<StatusMessage>,
    pub error: Option<String>,
    pub completed_steps: Vec<WorkflowStep>,
}

impl WorkflowState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update_step(&mut self, step: WorkflowStep, progress: Option<u8>, message: Option<&str>) {
        self.step = step;
        if let Some(p) = progress {
            self.progress = p.min(100);
        }
        if let Some(m) = message {
            self.add_message(m);
        }
        if !self.completed_steps.contains(&step) {
            self.completed_steps.push(step);
        }
    }

    pub fn add_message(&mut self, text: &str) {
        self.messages.push(StatusMessage {
            at: Local::now(),
            text: text.to_string(),
        });
    }

    pub fn set_error(&mut self, error: impl Into<String>) {
        self.error = Some(error.into());
        self.step = WorkflowStep::Error;
    }

    pub fn is_failed(&self) -> bool {
        self.step == WorkflowStep::Error
    }

    /// The last `n` messages, oldest first.
    pub fn recent_messages(&self, n: usize) -> &[StatusMessage] {
        let start = self.messages.len().saturating_sub(n);
        &self.messages[start..]
    }

    pub fn last_message(&self) -> Option<&StatusMessage> {
        self.messages.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_step_tracks_completed_once() {
        let mut state = WorkflowState::new();
        state.update_step(WorkflowStep::Expanding, Some(10), Some("Starting"));
        state.update_step(WorkflowStep::Expanding, None, None);
        state.update_step(WorkflowStep::Expanded, Some(30), None);

        assert_eq!(state.step, WorkflowStep::Expanded);
        assert_eq!(state.progress, 30);
        assert_eq!(
            state.completed_steps,
            vec![WorkflowStep::Expanding, WorkflowStep::Expanded]
        );
        assert_eq!(state.messages.len(), 1);
    }

    #[test]
    fn test_progress_is_capped() {
        let mut state = WorkflowState::new();
        state.update_step(WorkflowStep::Completed, Some(150), None);
        assert_eq!(state.progress, 100);
    }

    #[test]
    fn test_set_error_moves_to_error_step() {
        let mut state = WorkflowState::new();
        state.set_error("boom");
        assert!(state.is_failed());
        assert_eq!(state.error.as_deref(), Some("boom"));
    }

    #[test]
    fn test_recent_messages_window() {
        let mut state = WorkflowState::new();
        for i in 0..15 {
            state.add_message(&format!("m{}", i));
        }
        let recent = state.recent_messages(10);
        assert_eq!(recent.len(), 10);
        assert_eq!(recent[0].text, "m5");
        assert_eq!(state.recent_messages(100).len(), 15);
    }

    #[test]
    fn test_message_display_has_clock_prefix() {
        let mut state = WorkflowState::new();
        state.add_message("hello");
        let shown = state.messages[0].to_string();
        assert!(shown.starts_with('['));
        assert!(shown.ends_with("] hello"));
        assert_eq!(shown.len(), "[HH:MM:SS] hello".len());
    }
}
