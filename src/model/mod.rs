//! Data models.
//!
//! - [`WorkItem`]: a tracked work item parsed from model output
//! - [`WorkItemSummary`]: totals across a run
//! - [`RequirementType`]: Business, Technical, Product, Quality
//! - [`Priority`]: High, Medium, Low

mod types;
mod work_item;

pub use types::{Priority, RequirementType};
pub use work_item::{FIBONACCI_POINTS, WorkItem, WorkItemSummary};

const ID_ALPHABET: [char; 36] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i',
    'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
];

/// Short lowercase alphanumeric identifier for runs and documents.
pub fn short_id(length: usize) -> String {
    nanoid::format(nanoid::rngs::default, &ID_ALPHABET, length)
}
