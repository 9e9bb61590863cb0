//! Error types for diagram operations.
//!
//! [`DiagramError`] wraps the errors of every stage of the pipeline so
//! callers of [`DiagramBuilder`](crate::DiagramBuilder) handle a single type.

use std::io;

use thiserror::Error;

use crate::{layout::LayoutError, projection::ProjectionError, workspace::WorkspaceError};

/// The main error type for diagram operations.
#[derive(Debug, Error)]
pub enum DiagramError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input is not valid metamodel JSON, or an unknown `$class` was found.
    #[error("Invalid metamodel: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Projection(#[from] ProjectionError),

    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error(transparent)]
    Workspace(#[from] WorkspaceError),
}

impl DiagramError {
    /// Stable code of errors that have one.
    pub fn code(&self) -> Option<&'static str> {
        match self {
            Self::Projection(err) => Some(err.code()),
            _ => None,
        }
    }

    /// Suggestion shown alongside the error, if any.
    pub fn help(&self) -> Option<String> {
        match self {
            Self::Projection(err) => Some(err.help()),
            Self::Json(err) if err.is_syntax() || err.is_eof() => {
                Some("the input must be a Concerto metamodel JSON document".to_string())
            }
            _ => None,
        }
    }
}
