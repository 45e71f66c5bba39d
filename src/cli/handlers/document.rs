use crate::cli::DocumentKindArg;
use crate::document::{DocumentKind, InputMethod, extract_text, generate_document};
use crate::export::{document_report, timestamped_name, write_atomic};
use crate::validation::{validate_output_dir, validate_requirement};
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;

use super::CommandContext;
use super::utils::resolve_input;

pub struct DocumentArgs {
    pub requirement: Option<String>,
    pub file: Option<String>,
    pub kind: DocumentKindArg,
    pub pdf: bool,
    pub output_dir: Option<String>,
    pub json: bool,
}

pub fn handle_document(ctx: &CommandContext, args: DocumentArgs) -> Result<()> {
    let (input, input_method) = match (args.requirement, args.file) {
        (None, Some(path)) => {
            let bytes = std::fs::read(&path).with_context(|| format!("Failed to read {}", path))?;
            let name = Path::new(&path)
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| path.clone());
            let text = extract_text(&bytes, &name)?;
            (text, InputMethod::File(name))
        }
        (requirement, file) => (resolve_input(requirement, file)?, InputMethod::Text),
    };
    validate_requirement(&input)?;
    let kind: DocumentKind = args.kind.into();

    let export = args.pdf || args.output_dir.is_some();
    let output_dir = ctx.output_dir(args.output_dir.as_deref());
    if export {
        validate_output_dir(&output_dir)?;
    }

    eprintln!("{}", format!("Generating {}...", kind).dimmed());
    let document = generate_document(
        ctx.client.as_ref(),
        &ctx.retry,
        &ctx.config.document.generation(),
        kind,
        &input,
        input_method,
    )?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&document)?);
    } else {
        println!(
            "{} {} {}",
            kind.to_string().cyan().bold(),
            document.id.dimmed(),
            document.model_id.dimmed()
        );
        println!();
        println!("{}", document.text);
    }

    if export {
        let stem = format!("requirements_{}", slug::slugify(kind.to_string()));
        let text_path = write_atomic(
            &output_dir,
            &timestamped_name(&stem, "txt"),
            document.text.as_bytes(),
        )?;
        eprintln!("{} {}", "Saved".green(), text_path.display());

        if args.pdf {
            let pdf_path = write_atomic(
                &output_dir,
                &timestamped_name(&stem, "pdf"),
                &document_report(&document),
            )?;
            eprintln!("{} {}", "Saved".green(), pdf_path.display());
        }
    }

    Ok(())
}
