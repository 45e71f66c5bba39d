//! Enhanced requirement documents.
//!
//! A short requirement (typed, or read from a text/DOCX file) is expanded by
//! the model using one of five document templates.

use crate::config::GenerationSettings;
use crate::error::{ReqsmithError, Result};
use crate::llm::{CompletionRequest, ModelClient, RetryPolicy, complete_with_retry};
use crate::model::short_id;
use crate::prompts;
use chrono::{DateTime, Local};
use quick_xml::Reader;
use quick_xml::events::Event;
use serde::Serialize;
use std::io::{Cursor, Read};
use std::path::Path;
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DocumentKind {
    BusinessRequirements,
    UserRequirements,
    ProductRequirements,
    TechnicalRequirements,
    QualityCompliance,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 5] = [
        DocumentKind::BusinessRequirements,
        DocumentKind::UserRequirements,
        DocumentKind::ProductRequirements,
        DocumentKind::TechnicalRequirements,
        DocumentKind::QualityCompliance,
    ];
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentKind::BusinessRequirements => write!(f, "Business Requirements"),
            DocumentKind::UserRequirements => write!(f, "User Requirements"),
            DocumentKind::ProductRequirements => write!(f, "Product Requirements"),
            DocumentKind::TechnicalRequirements => write!(f, "Technical Requirements"),
            DocumentKind::QualityCompliance => write!(f, "Quality & Compliance"),
        }
    }
}

impl FromStr for DocumentKind {
    type Err = ReqsmithError;

    fn from_str(s: &str) -> Result<Self> {
        let key: String = s
            .to_lowercase()
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect();
        match key.trim_end_matches("requirements") {
            "business" => Ok(DocumentKind::BusinessRequirements),
            "user" => Ok(DocumentKind::UserRequirements),
            "product" => Ok(DocumentKind::ProductRequirements),
            "technical" => Ok(DocumentKind::TechnicalRequirements),
            "quality" | "qualitycompliance" | "compliance" => Ok(DocumentKind::QualityCompliance),
            _ => Err(ReqsmithError::Parse(format!("Invalid document kind: {}", s))),
        }
    }
}

/// Where the requirement text came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "method", content = "file")]
pub enum InputMethod {
    Text,
    File(String),
}

impl fmt::Display for InputMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputMethod::Text => write!(f, "Text Input"),
            InputMethod::File(name) => write!(f, "File Upload ({})", name),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RequirementDocument {
    pub id: String,
    pub kind: DocumentKind,
    pub model_id: String,
    pub input_method: InputMethod,
    pub text: String,
    pub generated_at: DateTime<Local>,
}

/// Extract plain text from an uploaded requirement file.
///
/// Text formats are decoded as UTF-8; DOCX is unpacked and its paragraphs
/// joined. Legacy `.doc` and other formats are rejected.
pub fn extract_text(content: &[u8], file_name: &str) -> Result<String> {
    let extension = Path::new(file_name)
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "txt" | "md" | "rtf" => String::from_utf8(content.to_vec()).map_err(|_| {
            ReqsmithError::UnsupportedInput(format!("{} is not valid UTF-8 text", file_name))
        }),
        "docx" => extract_docx(content),
        "doc" => Err(ReqsmithError::UnsupportedInput(
            "DOC files are not directly supported. Please convert to DOCX or TXT format."
                .to_string(),
        )),
        other => Err(ReqsmithError::UnsupportedInput(format!(
            "Unsupported file format: {}",
            if other.is_empty() { "(none)" } else { other }
        ))),
    }
}

fn extract_docx(content: &[u8]) -> Result<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(content))?;
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")?
        .read_to_string(&mut xml)?;

    docx_body_text(&xml)
}

/// Text of `w:t` runs; paragraph ends and `w:br` become newlines, `w:tab` a tab.
fn docx_body_text(xml: &str) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    let mut text = String::new();
    let mut in_run_text = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) if e.local_name().as_ref() == b"t" => in_run_text = true,
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => in_run_text = false,
                b"p" => text.push('\n'),
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"tab" => text.push('\t'),
                b"br" => text.push('\n'),
                _ => {}
            },
            Event::Text(t) if in_run_text => text.push_str(&t.unescape()?),
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(text.trim().to_string())
}

/// Generate a requirement document of the given kind.
pub fn generate_document(
    client: &dyn ModelClient,
    retry: &RetryPolicy,
    settings: &GenerationSettings,
    kind: DocumentKind,
    input: &str,
    input_method: InputMethod,
) -> Result<RequirementDocument> {
    let request = CompletionRequest::new(prompts::document(kind, input), settings);
    let text = complete_with_retry(client, &request, "requirement_document", retry)?;

    tracing::info!(kind = %kind, length = text.len(), "Requirement document generated");

    Ok(RequirementDocument {
        id: short_id(8),
        kind,
        model_id: client.model_id().to_string(),
        input_method,
        text,
        generated_at: Local::now(),
    })
}
