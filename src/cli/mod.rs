mod commands;
pub mod handlers;

pub use commands::{
    Cli, Commands, DiagramKindArg, DocumentKindArg, ExportFormatArg, RequirementTypeArg,
};
