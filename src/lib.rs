//! # reqsmith - requirements to work items, diagrams and documents
//!
//! reqsmith sends plain-language requirements through a hosted language
//! model and turns the answers into structured artifacts.
//!
//! ## Features
//!
//! - **Work items**: expand a requirement, break it into tasks and convert
//!   each task into an estimated, prioritised work item
//! - **Diagrams**: Mermaid state, class, sequence and ER diagrams
//! - **Documents**: business, user, product, technical and compliance
//!   requirement documents from text or DOCX input
//! - **Exports**: CSV, JSON, PDF and a ZIP bundle
//!
//! ## Quick Start
//!
//! ```bash
//! # Write a default .reqsmith.yml
//! reqsmith init
//!
//! # Convert a requirement and export everything
//! reqsmith items "Customers can save items to a wishlist" --format all
//!
//! # Generate a sequence diagram
//! reqsmith diagram "User logs in with 2FA" --kind sequence --html login.html
//!
//! # Write a technical requirements document
//! reqsmith document --file idea.docx --kind technical --pdf
//! ```
//!
//! ## Modules
//!
//! - [`cli`]: Command-line interface definitions and handlers
//! - [`config`]: Configuration loading and management
//! - [`error`]: Error types and result aliases
//! - [`llm`]: Model client trait, HTTP client, replay client and retries
//! - [`pipeline`]: The work item workflow and its progress state
//! - [`export`]: CSV, JSON, PDF and ZIP output

/// Command-line interface definitions using clap.
pub mod cli;

/// Configuration loading and management.
///
/// Handles `.reqsmith.yml` files and project discovery.
pub mod config;

/// Mermaid diagram generation and clean-up.
pub mod diagram;

/// Requirement documents and input file text extraction.
pub mod document;

/// Error types and result aliases.
///
/// Defines `ReqsmithError` enum and `Result<T>` type alias.
pub mod error;

/// Atomic file writes and work item exports.
pub mod export;

/// Locating JSON inside free-form model responses.
pub mod extract;

/// Model clients and retry handling.
pub mod llm;

/// Stderr and JSON file logging setup plus model call events.
pub mod logging;

/// Data models.
///
/// Includes `WorkItem`, `RequirementType` and `Priority`.
pub mod model;

/// Requirement to work item workflow and its state.
pub mod pipeline;

/// Prompt templates sent to the model.
pub mod prompts;

/// Input validation utilities.
pub mod validation;
