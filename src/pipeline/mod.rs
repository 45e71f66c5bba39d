//! Requirements-to-work-items converter.
//!
//! Three sequential model calls: expand the requirement, break it into
//! tasks, convert each task into a [`WorkItem`](crate::model::WorkItem).

mod state;
mod workflow;

pub use state::{StatusMessage, WorkflowState, WorkflowStep};
pub use workflow::{Workflow, WorkflowOutcome};
