//! Lakeline Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared types, utilities, and error handling for the Lakeline workspace.
//!
//! # Overview
//!
//! This crate provides common functionality used across all Lakeline
//! workspace members:
//!
//! - **Error Handling**: Custom error types and result types
//! - **Logging**: Centralized `tracing` subscriber configuration
//! - **Types**: Schema registry and pipeline report types
//!
//! # Example
//!
//! ```no_run
//! use lakeline_common::{Result, SchemaRegistry};
//!
//! fn load_registry(path: &str) -> Result<SchemaRegistry> {
//!     let raw = std::fs::read_to_string(path)?;
//!     SchemaRegistry::from_json(&raw)
//! }
//! ```

pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{LakelineError, Result};
pub use types::{ColumnDef, PipelineReport, SchemaRegistry, TableSchema};
