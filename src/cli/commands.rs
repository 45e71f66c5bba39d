use crate::diagram::DiagramKind;
use crate::document::DocumentKind;
use crate::export::ExportFormat;
use crate::model::RequirementType;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "reqsmith")]
#[command(
    author,
    version,
    about = "Turn plain-language requirements into work items, diagrams and requirement documents"
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config file (searches upward for .reqsmith.yml by default)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Model alias or id (overrides config)
    #[arg(long, global = true, env = "REQSMITH_MODEL")]
    pub model: Option<String>,

    /// Answer model calls from a YAML script instead of the API
    #[arg(long, global = true, value_name = "FILE")]
    pub replay: Option<String>,

    /// Verbose logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Do not write the rolling operations log
    #[arg(long, global = true)]
    pub no_log_file: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default .reqsmith.yml in the current directory
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Convert a requirement into estimated work items
    #[command(visible_alias = "convert")]
    Items {
        /// Requirement text (use '-' to read from stdin)
        requirement: Option<String>,

        /// Read the requirement from a file
        #[arg(short, long)]
        file: Option<String>,

        /// Requirement type
        #[arg(short = 't', long = "type", value_enum, default_value = "business")]
        requirement_type: RequirementTypeArg,

        /// Export format (repeatable)
        #[arg(long = "format", value_enum)]
        formats: Vec<ExportFormatArg>,

        /// Directory for exported files (overrides config)
        #[arg(short, long)]
        output_dir: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate a Mermaid diagram from requirements
    Diagram {
        /// Requirements text (use '-' to read from stdin)
        requirements: Option<String>,

        /// Read the requirements from a file
        #[arg(short, long)]
        file: Option<String>,

        /// Diagram kind
        #[arg(short, long, value_enum, default_value = "sequence")]
        kind: DiagramKindArg,

        /// Write the Mermaid source to this file
        #[arg(short, long)]
        output: Option<String>,

        /// Also write a standalone HTML preview to this file
        #[arg(long)]
        html: Option<String>,
    },

    /// Expand a requirement into a structured requirement document
    #[command(visible_alias = "enhance")]
    Document {
        /// Requirement text (use '-' to read from stdin)
        requirement: Option<String>,

        /// Read the requirement from a .txt, .md, .rtf or .docx file
        #[arg(short, long)]
        file: Option<String>,

        /// Document kind
        #[arg(short, long, value_enum, default_value = "business")]
        kind: DocumentKindArg,

        /// Also export the document as PDF
        #[arg(long)]
        pdf: bool,

        /// Directory for exported files (overrides config)
        #[arg(short, long)]
        output_dir: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List known model aliases
    Models {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum RequirementTypeArg {
    Business,
    Technical,
    Product,
    Quality,
}

impl From<RequirementTypeArg> for RequirementType {
    fn from(arg: RequirementTypeArg) -> Self {
        match arg {
            RequirementTypeArg::Business => RequirementType::Business,
            RequirementTypeArg::Technical => RequirementType::Technical,
            RequirementTypeArg::Product => RequirementType::Product,
            RequirementTypeArg::Quality => RequirementType::Quality,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormatArg {
    Csv,
    Pdf,
    Json,
    Zip,
    All,
}

impl ExportFormatArg {
    /// Expand the selection into concrete formats, deduplicated and ordered.
    pub fn resolve(args: &[ExportFormatArg]) -> Vec<ExportFormat> {
        let mut formats: Vec<ExportFormat> = args
            .iter()
            .flat_map(|arg| match arg {
                ExportFormatArg::Csv => vec![ExportFormat::Csv],
                ExportFormatArg::Pdf => vec![ExportFormat::Pdf],
                ExportFormatArg::Json => vec![ExportFormat::Json],
                ExportFormatArg::Zip => vec![ExportFormat::Zip],
                ExportFormatArg::All => ExportFormat::ALL.to_vec(),
            })
            .collect();
        formats.sort();
        formats.dedup();
        formats
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum DiagramKindArg {
    State,
    Class,
    Sequence,
    Er,
}

impl From<DiagramKindArg> for DiagramKind {
    fn from(arg: DiagramKindArg) -> Self {
        match arg {
            DiagramKindArg::State => DiagramKind::State,
            DiagramKindArg::Class => DiagramKind::Class,
            DiagramKindArg::Sequence => DiagramKind::Sequence,
            DiagramKindArg::Er => DiagramKind::Er,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum DocumentKindArg {
    Business,
    User,
    Product,
    Technical,
    Quality,
}

impl From<DocumentKindArg> for DocumentKind {
    fn from(arg: DocumentKindArg) -> Self {
        match arg {
            DocumentKindArg::Business => DocumentKind::BusinessRequirements,
            DocumentKindArg::User => DocumentKind::UserRequirements,
            DocumentKindArg::Product => DocumentKind::ProductRequirements,
            DocumentKindArg::Technical => DocumentKind::TechnicalRequirements,
            DocumentKindArg::Quality => DocumentKind::QualityCompliance,
        }
    }
}
