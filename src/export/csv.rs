use crate::error::{ReqsmithError, Result};
use crate::model::WorkItem;

const HEADER: [&str; 6] = [
    "Summary",
    "Description",
    "AcceptanceCriteria",
    "StoryPoints",
    "Priority",
    "Labels",
];

pub fn work_items_csv(items: &[WorkItem]) -> Result<Vec<u8>> {
    let mut writer = ::csv::Writer::from_writer(Vec::new());
    writer.write_record(HEADER)?;
    for item in items {
        writer.write_record([
            item.summary.as_str(),
            item.description.as_str(),
            item.acceptance_criteria.as_str(),
            &item.story_points.to_string(),
            &item.priority.to_string(),
            &item.labels.join(", "),
        ])?;
    }
    writer
        .into_inner()
        .map_err(|e| ReqsmithError::Export(format!("Failed to flush CSV: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Priority;

    #[test]
    fn test_header_and_rows() {
        let items = vec![
            WorkItem::new("Login")
                .with_description("Allow sign in, with \"remember me\"")
                .with_acceptance_criteria("- works\n- fast")
                .with_story_points(3)
                .with_priority(Priority::High)
                .with_labels(vec!["auth".to_string(), "ui".to_string()]),
        ];
        let csv = String::from_utf8(work_items_csv(&items).unwrap()).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Summary,Description,AcceptanceCriteria,StoryPoints,Priority,Labels"
        );

        let mut reader = ::csv::Reader::from_reader(csv.as_bytes());
        let row = reader.records().next().unwrap().unwrap();
        assert_eq!(&row[1], "Allow sign in, with \"remember me\"");
        assert_eq!(&row[2], "- works\n- fast");
        assert_eq!(&row[3], "3");
        assert_eq!(&row[4], "High");
        assert_eq!(&row[5], "auth, ui");
    }

    #[test]
    fn test_empty_items_is_header_only() {
        let csv = String::from_utf8(work_items_csv(&[]).unwrap()).unwrap();
        assert_eq!(csv.lines().count(), 1);
    }
}
