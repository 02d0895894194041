//! Resolution gaps recorded during a generation request.
//!
//! An unmapped SQL type never aborts generation. The column resolves to the
//! untyped placeholder and one [`Diagnostic`] is recorded here.

use std::fmt;

use serde::Serialize;
use tracing::warn;

/// Why a column fell back to the untyped placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// The engine has no mapping for the SQL type and no custom type matched.
    UnknownType,
    /// The engine knows the SQL type but not under the selected driver.
    UnsupportedForDriver,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::UnknownType => write!(f, "unknown type"),
            DiagnosticKind::UnsupportedForDriver => write!(f, "unsupported for driver"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub table: String,
    pub column: String,
    pub sql_type: String,
    pub message: String,
}

/// Per-request diagnostic collector.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic and log it.
    pub fn record(&mut self, diagnostic: Diagnostic) {
        warn!(
            table = %diagnostic.table,
            column = %diagnostic.column,
            sql_type = %diagnostic.sql_type,
            "{}",
            diagnostic.message
        );
        self.entries.push(diagnostic);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    /// Diagnostics recorded for one column.
    pub fn for_column<'a>(&'a self, column: &'a str) -> impl Iterator<Item = &'a Diagnostic> + 'a {
        self.entries.iter().filter(move |d| d.column == column)
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}
