//! Mermaid diagram generation and clean-up.

use crate::config::GenerationSettings;
use crate::error::{ReqsmithError, Result};
use crate::llm::{CompletionRequest, ModelClient, RetryPolicy, complete_with_retry};
use crate::prompts;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;
use std::{fmt, str::FromStr};

static FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```mermaid\s*|\s*```").expect("fence pattern is valid"));

static CLASS_DISALLOWED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^\w\s{}+\-#():*|><.~]").expect("class character pattern is valid")
});

static CLASS_ARROW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\w)\s*(--[>*o|]?)\s*(\w)").expect("arrow pattern is valid")
});

/// Header keyword found on a first line, and the declaration it is normalised to.
const DECLARATIONS: &[(&str, &str)] = &[
    ("stateDiagram", "stateDiagram-v2"),
    ("classDiagram", "classDiagram"),
    ("sequenceDiagram", "sequenceDiagram"),
    ("erDiagram", "erDiagram"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DiagramKind {
    State,
    Class,
    Sequence,
    Er,
}

impl DiagramKind {
    pub fn declaration(&self) -> &'static str {
        match self {
            DiagramKind::State => "stateDiagram-v2",
            DiagramKind::Class => "classDiagram",
            DiagramKind::Sequence => "sequenceDiagram",
            DiagramKind::Er => "erDiagram",
        }
    }
}

impl fmt::Display for DiagramKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagramKind::State => write!(f, "State Diagram"),
            DiagramKind::Class => write!(f, "Class Diagram"),
            DiagramKind::Sequence => write!(f, "Sequence Diagram"),
            DiagramKind::Er => write!(f, "ER Diagram"),
        }
    }
}

impl FromStr for DiagramKind {
    type Err = ReqsmithError;

    fn from_str(s: &str) -> Result<Self> {
        let key: String = s
            .to_lowercase()
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect();
        match key.trim_end_matches("diagram") {
            "state" => Ok(DiagramKind::State),
            "class" => Ok(DiagramKind::Class),
            "sequence" => Ok(DiagramKind::Sequence),
            "er" | "entityrelationship" => Ok(DiagramKind::Er),
            _ => Err(ReqsmithError::Parse(format!("Invalid diagram kind: {}", s))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagram {
    pub kind: DiagramKind,
    pub source: String,
}

/// Normalise model output into Mermaid source that renders.
pub fn clean_mermaid(code: &str) -> String {
    let code = FENCE.replace_all(code.trim(), "");
    let mut code = code.replace("\r\n", "\n").replace('\r', "\n");

    if let Some(first_line) = code.lines().next().map(str::to_string) {
        if let Some((_, declaration)) = DECLARATIONS
            .iter()
            .find(|(keyword, _)| first_line.contains(keyword))
        {
            code = code.replacen(&first_line, declaration, 1);
        }
    }

    if code.contains("classDiagram") {
        code = code
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                let line = CLASS_DISALLOWED.replace_all(line, "");
                CLASS_ARROW.replace_all(&line, "${1} ${2} ${3}").into_owned()
            })
            .collect::<Vec<_>>()
            .join("\n");
    }

    code.trim().to_string()
}

/// Ask the model for a diagram and clean the result.
pub fn generate_diagram(
    client: &dyn ModelClient,
    retry: &RetryPolicy,
    settings: &GenerationSettings,
    requirements: &str,
    kind: DiagramKind,
) -> Result<Diagram> {
    let request = CompletionRequest::new(prompts::diagram(requirements, kind), settings);
    let raw = complete_with_retry(client, &request, "diagram_generation", retry)?;
    let source = clean_mermaid(&raw);
    if source.is_empty() {
        return Err(ReqsmithError::EmptyResponse);
    }
    if !source.starts_with(kind.declaration()) {
        tracing::warn!(
            expected = kind.declaration(),
            "Diagram does not start with the requested declaration"
        );
    }
    Ok(Diagram { kind, source })
}

impl Diagram {
    /// A standalone page that renders the diagram with Mermaid.
    pub fn to_html(&self, title: &str) -> String {
        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<script type="module">
  import mermaid from "https://cdn.jsdelivr.net/npm/mermaid@10/dist/mermaid.esm.min.mjs";
  mermaid.initialize({{ startOnLoad: true, theme: "default", securityLevel: "loose" }});
</script>
</head>
<body>
<h1>{title}</h1>
<pre class="mermaid">
{source}
</pre>
</body>
</html>
"#,
            title = escape_html(title),
            source = escape_html(&self.source),
        )
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
