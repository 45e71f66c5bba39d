use crate::error::{ReqsmithError, Result};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// The lens the converter applies to a requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RequirementType {
    #[default]
    Business,
    Technical,
    Product,
    Quality,
}

impl fmt::Display for RequirementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequirementType::Business => write!(f, "Business"),
            RequirementType::Technical => write!(f, "Technical"),
            RequirementType::Product => write!(f, "Product"),
            RequirementType::Quality => write!(f, "Quality"),
        }
    }
}

impl FromStr for RequirementType {
    type Err = ReqsmithError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "business" => Ok(RequirementType::Business),
            "technical" | "tech" => Ok(RequirementType::Technical),
            "product" => Ok(RequirementType::Product),
            "quality" | "qa" => Ok(RequirementType::Quality),
            _ => Err(ReqsmithError::Parse(format!(
                "Invalid requirement type: {}",
                s
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::High => write!(f, "High"),
            Priority::Medium => write!(f, "Medium"),
            Priority::Low => write!(f, "Low"),
        }
    }
}

impl FromStr for Priority {
    type Err = ReqsmithError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "high" | "highest" | "critical" | "p0" | "p1" => Ok(Priority::High),
            "medium" | "normal" | "moderate" | "p2" => Ok(Priority::Medium),
            "low" | "lowest" | "minor" | "p3" | "p4" => Ok(Priority::Low),
            _ => Err(ReqsmithError::Parse(format!("Invalid priority: {}", s))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requirement_type_round_trips_display() {
        for t in [
            RequirementType::Business,
            RequirementType::Technical,
            RequirementType::Product,
            RequirementType::Quality,
        ] {
            assert_eq!(t.to_string().parse::<RequirementType>().unwrap(), t);
        }
    }

    #[test]
    fn test_priority_aliases() {
        assert_eq!("HIGH".parse::<Priority>().unwrap(), Priority::High);
        assert_eq!("p2".parse::<Priority>().unwrap(), Priority::Medium);
        assert_eq!(" low ".parse::<Priority>().unwrap(), Priority::Low);
        assert!("urgent-ish".parse::<Priority>().is_err());
    }
}
