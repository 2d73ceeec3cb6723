//! Error types for sopflow operations.
//!
//! This module provides the main error type [`SopflowError`] which wraps
//! the error conditions of every pipeline stage.

use std::io;

use thiserror::Error;

use sopflow_core::graph::GraphError;
use sopflow_parser::error::ParseError;

use crate::layout::LayoutError;

/// The main error type for sopflow operations.
///
/// # Diagnostic Variants
///
/// The `Parse` variant keeps the decoded source text next to the structured
/// diagnostics so callers can render source snippets.
#[derive(Debug, Error)]
pub enum SopflowError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Parse { err: ParseError, src: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error + Send + Sync>),
}

impl From<crate::export::Error> for SopflowError {
    fn from(error: crate::export::Error) -> Self {
        Self::Export(Box::new(error))
    }
}

impl SopflowError {
    /// Create a new `Parse` error with the associated source text.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }
}
