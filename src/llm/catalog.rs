//! Short aliases for the model ids the tools are tuned for.

pub struct ModelEntry {
    pub alias: &'static str,
    pub display_name: &'static str,
    pub model_id: &'static str,
}

pub const MODELS: &[ModelEntry] = &[
    ModelEntry {
        alias: "sonnet-3",
        display_name: "Claude 3 Sonnet",
        model_id: "claude-3-sonnet-20240229",
    },
    ModelEntry {
        alias: "sonnet-3.5",
        display_name: "Claude 3.5 Sonnet",
        model_id: "claude-3-5-sonnet-20240620",
    },
    ModelEntry {
        alias: "haiku-3",
        display_name: "Claude 3 Haiku",
        model_id: "claude-3-haiku-20240307",
    },
];

/// Resolve an alias or display name to a model id. Unknown names are
/// assumed to be raw model ids and returned unchanged.
pub fn resolve(name: &str) -> String {
    let name = name.trim();
    MODELS
        .iter()
        .find(|m| m.alias.eq_ignore_ascii_case(name) || m.display_name.eq_ignore_ascii_case(name))
        .map(|m| m.model_id.to_string())
        .unwrap_or_else(|| name.to_string())
}
