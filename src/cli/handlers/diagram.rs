use crate::cli::DiagramKindArg;
use crate::diagram::{DiagramKind, generate_diagram};
use crate::validation::validate_diagram_input;
use anyhow::Result;
use colored::Colorize;
use std::path::Path;

use super::CommandContext;
use super::utils::{resolve_input, write_output};

pub fn handle_diagram(
    ctx: &CommandContext,
    requirements: Option<String>,
    file: Option<String>,
    kind: DiagramKindArg,
    output: Option<String>,
    html: Option<String>,
) -> Result<()> {
    let requirements = resolve_input(requirements, file)?;
    validate_diagram_input(&requirements)?;
    let kind: DiagramKind = kind.into();

    eprintln!("{}", format!("Generating {}...", kind).dimmed());
    let diagram = generate_diagram(
        ctx.client.as_ref(),
        &ctx.retry,
        &ctx.config.diagram.generation(),
        &requirements,
        kind,
    )?;

    println!("{}", diagram.source);

    if let Some(path) = output {
        let written = write_output(Path::new(&path), diagram.source.as_bytes())?;
        eprintln!("{} {}", "Saved".green(), written.display());
    }
    if let Some(path) = html {
        let page = diagram.to_html(&kind.to_string());
        let written = write_output(Path::new(&path), page.as_bytes())?;
        eprintln!("{} {}", "Saved".green(), written.display());
    }

    Ok(())
}
