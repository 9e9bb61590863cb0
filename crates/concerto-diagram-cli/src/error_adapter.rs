//! Error adapter for converting CLI errors to miette diagnostics.
//!
//! This module bridges the library's standard error types and miette's rich
//! diagnostic formatting. JSON syntax errors in the input file are reported
//! with a label pointing at the offending location.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use concerto_diagram::{DiagramError, LayoutError, WorkspaceError};

use crate::CliError;

/// Adapter implementing [`MietteDiagnostic`] for a [`CliError`].
pub struct ErrorAdapter<'a>(pub &'a CliError);

impl ErrorAdapter<'_> {
    fn diagram_error(&self) -> Option<&DiagramError> {
        match self.0 {
            CliError::Config(_) => None,
            CliError::Parse { err, .. } | CliError::Diagram(err) => Some(err),
        }
    }

    /// Location of a JSON error in the input, as a byte span.
    fn json_span(&self) -> Option<SourceSpan> {
        let CliError::Parse {
            err: DiagramError::Json(err),
            src,
        } = self.0
        else {
            return None;
        };
        let offset = line_column_offset(src, err.line(), err.column())?;
        Some(SourceSpan::new(offset.into(), 1.min(src.len() - offset)))
    }
}

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match self.diagram_error() {
            None => "concerto_diagram::config",
            Some(DiagramError::Io(_)) => "concerto_diagram::io",
            Some(DiagramError::Json(_)) => "concerto_diagram::json",
            Some(DiagramError::Projection(err)) => err.code(),
            Some(DiagramError::Layout(LayoutError::EnginePanicked(_))) => "concerto_diagram::layout",
            Some(DiagramError::Workspace(err)) => workspace_code(err),
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match self.0 {
            CliError::Config(_) => Some(
                "check the TOML syntax and the field names of the configuration file".to_string(),
            ),
            CliError::Parse { err, .. } | CliError::Diagram(err) => err.help(),
        };
        help.map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self.0 {
            CliError::Parse { src, .. } if self.json_span().is_some() => {
                Some(src as &dyn miette::SourceCode)
            }
            _ => None,
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let span = self.json_span()?;
        Some(Box::new(std::iter::once(LabeledSpan::new_primary_with_span(
            Some("here".to_string()),
            span,
        ))))
    }
}

fn workspace_code(err: &WorkspaceError) -> &'static str {
    match err {
        WorkspaceError::UnknownNamespace(_) => "concerto_diagram::unknown_namespace",
        WorkspaceError::UnknownDeclaration(_) => "concerto_diagram::unknown_declaration",
        WorkspaceError::NamespaceExists(_) => "concerto_diagram::namespace_exists",
    }
}

/// Converts a one-based line and column into a byte offset of `src`.
fn line_column_offset(src: &str, line: usize, column: usize) -> Option<usize> {
    if line == 0 {
        return None;
    }
    let line_start: usize = src
        .split_inclusive('\n')
        .take(line - 1)
        .map(str::len)
        .sum();
    Some((line_start + column.saturating_sub(1)).min(src.len()))
}

/// Wraps `err` for rendering by miette.
pub fn to_reportable(err: &CliError) -> ErrorAdapter<'_> {
    ErrorAdapter(err)
}
