use crate::cli::{ExportFormatArg, RequirementTypeArg};
use crate::export::export_work_items;
use crate::model::RequirementType;
use crate::pipeline::{Workflow, WorkflowOutcome};
use crate::validation::{validate_output_dir, validate_requirement};
use anyhow::Result;
use colored::Colorize;

use super::CommandContext;
use super::utils::{print_work_item, resolve_input};

pub struct ItemsArgs {
    pub requirement: Option<String>,
    pub file: Option<String>,
    pub requirement_type: RequirementTypeArg,
    pub formats: Vec<ExportFormatArg>,
    pub output_dir: Option<String>,
    pub json: bool,
}

pub fn handle_items(ctx: &CommandContext, args: ItemsArgs) -> Result<()> {
    let requirement = resolve_input(args.requirement, args.file)?;
    validate_requirement(&requirement)?;
    let requirement_type: RequirementType = args.requirement_type.into();
    let formats = ExportFormatArg::resolve(&args.formats);
    let output_dir = ctx.output_dir(args.output_dir.as_deref());
    if !formats.is_empty() {
        validate_output_dir(&output_dir)?;
    }

    let mut printed = 0;
    let outcome = Workflow::new(
        ctx.client.as_ref(),
        ctx.retry,
        ctx.config.pipeline.generation(),
    )
    .with_observer(|state| {
        for message in &state.messages[printed..] {
            eprintln!("{}", message.to_string().dimmed());
        }
        printed = state.messages.len();
    })
    .run(&requirement, requirement_type);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else if outcome.succeeded() {
        print_outcome(&outcome);
    }

    if !outcome.succeeded() {
        let error = outcome
            .state
            .error
            .clone()
            .unwrap_or_else(|| "Workflow did not complete".to_string());
        anyhow::bail!(error);
    }

    if !formats.is_empty() {
        let detailed = outcome.detailed_requirement.as_deref().unwrap_or_default();
        let written = export_work_items(&output_dir, &formats, &outcome.items, detailed)?;
        for path in written {
            eprintln!("{} {}", "Exported".green(), path.display());
        }
    }

    Ok(())
}

fn print_outcome(outcome: &WorkflowOutcome) {
    if let Some(ref detailed) = outcome.detailed_requirement {
        println!("{}", "Detailed Requirement".bold().underline());
        println!("{}", detailed);
        println!();
    }

    let summary = outcome.summary();
    println!("{}", "Summary".bold().underline());
    println!("  Total items:   {}", summary.total_items);
    println!("  Story points:  {}", summary.total_points);
    println!("  High priority: {}", summary.high_priority);
    println!();

    for (i, item) in outcome.items.iter().enumerate() {
        print_work_item(i + 1, item);
    }
}
