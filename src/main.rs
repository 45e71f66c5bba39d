use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use reqsmith::cli::handlers::{
    self, CommandContext, DocumentArgs, ItemsArgs, handle_diagram, handle_document, handle_init,
    handle_items, handle_models,
};
use reqsmith::cli::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::Init { force } = cli.command {
        reqsmith::logging::init(cli.verbose, None);
        return handle_init(force);
    }

    let (config, root) = handlers::load_config(cli.config.as_deref(), cli.model.as_deref())?;

    let log_dir = (config.logging.file && !cli.no_log_file).then(|| config.logging.log_dir());
    reqsmith::logging::init(cli.verbose, log_dir);

    let _ = rustls::crypto::ring::default_provider().install_default();

    match cli.command {
        Commands::Init { .. } => unreachable!("init is handled before config loading"),
        Commands::Models { json } => handle_models(&config.model.model_id, json),
        Commands::Items {
            requirement,
            file,
            requirement_type,
            formats,
            output_dir,
            json,
        } => {
            let ctx = CommandContext::new(config, root, cli.replay.as_deref())?;
            handle_items(
                &ctx,
                ItemsArgs {
                    requirement,
                    file,
                    requirement_type,
                    formats,
                    output_dir,
                    json,
                },
            )
        }
        Commands::Diagram {
            requirements,
            file,
            kind,
            output,
            html,
        } => {
            let ctx = CommandContext::new(config, root, cli.replay.as_deref())?;
            handle_diagram(&ctx, requirements, file, kind, output, html)
        }
        Commands::Document {
            requirement,
            file,
            kind,
            pdf,
            output_dir,
            json,
        } => {
            let ctx = CommandContext::new(config, root, cli.replay.as_deref())?;
            handle_document(
                &ctx,
                DocumentArgs {
                    requirement,
                    file,
                    kind,
                    pdf,
                    output_dir,
                    json,
                },
            )
        }
    }
}
