use crate::export::write_atomic;
use crate::model::{Priority, WorkItem};
use anyhow::{Context, Result};
use colored::Colorize;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// Resolve input text from a CLI arg, `-` for stdin, or a file.
pub fn resolve_input(text: Option<String>, file: Option<String>) -> Result<String> {
    match (text, file) {
        (Some(_), Some(_)) => anyhow::bail!("Pass the requirement as text or with --file, not both"),
        (Some(t), None) if t == "-" => {
            let mut content = String::new();
            io::stdin().read_to_string(&mut content)?;
            Ok(content.trim().to_string())
        }
        (Some(t), None) => Ok(t),
        (None, Some(path)) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read input from {}", path))?;
            Ok(content.trim().to_string())
        }
        (None, None) => anyhow::bail!("No input given. Pass text, '-' for stdin, or --file"),
    }
}

/// Write a single output file atomically, creating parent directories.
pub fn write_output(path: &Path, content: &[u8]) -> Result<PathBuf> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .with_context(|| format!("Output path {} has no file name", path.display()))?
        .to_string_lossy();
    Ok(write_atomic(dir, &file_name, content)?)
}

pub fn format_priority(priority: Priority) -> String {
    match priority {
        Priority::High => "High".red().bold().to_string(),
        Priority::Medium => "Medium".yellow().to_string(),
        Priority::Low => "Low".dimmed().to_string(),
    }
}

pub fn print_work_item(index: usize, item: &WorkItem) {
    println!(
        "{} {}",
        format!("Item {}:", index).cyan().bold(),
        item.summary.bold()
    );
    println!(
        "  Points: {}  Priority: {}",
        item.story_points.to_string().blue(),
        format_priority(item.priority)
    );
    if !item.labels.is_empty() {
        println!("  Labels: {}", item.labels.join(", ").magenta());
    }
    if !item.description.is_empty() {
        println!("  {}", "Description:".bold());
        for line in item.description.lines() {
            println!("    {}", line);
        }
    }
    if !item.acceptance_criteria.is_empty() {
        println!("  {}", "Acceptance Criteria:".bold());
        for line in item.acceptance_criteria.lines() {
            println!("    {}", line);
        }
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_input_text_and_file() {
        assert_eq!(
            resolve_input(Some("Login".to_string()), None).unwrap(),
            "Login"
        );

        let temp = TempDir::new().unwrap();
        let file = temp.path().join("req.txt");
        std::fs::write(&file, "  From file \n").unwrap();
        assert_eq!(
            resolve_input(None, Some(file.to_string_lossy().to_string())).unwrap(),
            "From file"
        );
    }

    #[test]
    fn test_resolve_input_rejects_none_and_both() {
        assert!(resolve_input(None, None).is_err());
        assert!(resolve_input(Some("a".to_string()), Some("b.txt".to_string())).is_err());
    }

    #[test]
    fn test_write_output_creates_parents() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested/dir/out.mmd");
        let written = write_output(&path, b"sequenceDiagram").unwrap();
        assert_eq!(written, path);
        assert_eq!(std::fs::read_to_string(path).unwrap(), "sequenceDiagram");
    }
}
