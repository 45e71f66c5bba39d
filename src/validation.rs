//! Input validation for requirement text and output locations.

use crate::error::{ReqsmithError, Result};
use std::path::Path;

/// Maximum allowed length for requirement input, in characters.
pub const MAX_REQUIREMENT_LENGTH: usize = 20_000;

/// Validates requirement text before it is sent to the model.
pub fn validate_requirement(text: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(ReqsmithError::Validation(
            "Requirement cannot be empty".to_string(),
        ));
    }
    let length = text.chars().count();
    if length > MAX_REQUIREMENT_LENGTH {
        return Err(ReqsmithError::Validation(format!(
            "Requirement exceeds maximum length of {} characters ({} given)",
            MAX_REQUIREMENT_LENGTH, length
        )));
    }
    Ok(())
}

/// Validates diagram input. Only emptiness is checked.
pub fn validate_diagram_input(text: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(ReqsmithError::Validation(
            "Please enter requirements to generate a diagram".to_string(),
        ));
    }
    Ok(())
}

/// An output directory may be missing (it is created) but not a file.
pub fn validate_output_dir(dir: &Path) -> Result<()> {
    if dir.exists() && !dir.is_dir() {
        return Err(ReqsmithError::Validation(format!(
            "Output path {} is not a directory",
            dir.display()
        )));
    }
    Ok(())
}
