use super::{work_items_csv, work_items_json, work_items_report};
use crate::error::Result;
use crate::model::WorkItem;
use chrono::Local;
use std::io::{Cursor, Write};
use zip::CompressionMethod;
use zip::write::SimpleFileOptions;

fn readme() -> String {
    format!(
        "Work Items Export\n\
         =================\n\
         \n\
         Files:\n\
         - work_items.csv: work items for tracker import\n\
         - work_items.pdf: printable report with the detailed requirement\n\
         - work_items.json: detailed requirement and work items\n\
         \n\
         Generated on: {}\n",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    )
}

/// ZIP bundle of every export format plus a README.
pub fn work_items_archive(items: &[WorkItem], detailed_requirement: &str) -> Result<Vec<u8>> {
    let entries: [(&str, Vec<u8>); 4] = [
        ("work_items.csv", work_items_csv(items)?),
        ("work_items.pdf", work_items_report(items, detailed_requirement)),
        (
            "work_items.json",
            work_items_json(items, detailed_requirement)?.into_bytes(),
        ),
        ("README.txt", readme().into_bytes()),
    ];

    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in entries {
        writer.start_file(name, options)?;
        writer.write_all(&content)?;
    }
    Ok(writer.finish()?.into_inner())
}
