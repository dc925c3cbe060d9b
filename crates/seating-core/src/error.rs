//! Typed failures and the diagnostics handed back to callers.
//!
//! Generation never returns `Err`: everything a caller needs to know ends up
//! as a [`Diagnostic`] in the outcome. The `thiserror` enums here are the
//! typed sources those diagnostics are built from.

use crate::types::{GuestId, TableId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Invalid generation input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("no guests were supplied")]
    NoGuests,
    #[error("no tables were supplied")]
    NoTables,
    #[error("table {0} must have at least one seat")]
    NonPositiveCapacity(TableId),
    #[error("guest {0} must occupy at least one seat")]
    EmptyParty(GuestId),
    #[error("guest id {0} is used more than once")]
    DuplicateGuest(GuestId),
    #[error("table id {0} is used more than once")]
    DuplicateTable(TableId),
    #[error("{needed} seats are needed but the tables only hold {available}")]
    InsufficientCapacity { needed: u64, available: u64 },
}

/// Rejected adjacency edge
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdjacencyError {
    #[error("guest {0} cannot be seated next to themselves")]
    SelfLink(GuestId),
    #[error("unknown guest {0}")]
    UnknownGuest(GuestId),
    #[error("guest {guest} already has {max} neighbours")]
    DegreeExceeded { guest: GuestId, max: usize },
    #[error("closing this loop needs a table with exactly {seats} seats")]
    LoopWithoutTable { seats: u64, members: Vec<GuestId> },
}

/// Diagnostic severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Non-blocking note
    Warn,
    /// Blocks usable output
    Error,
}

/// What a diagnostic is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticCode {
    InvalidInput,
    CriticalConflict,
    ConstraintConflict,
    UnknownReference,
    RelaxedConstraints,
    PartialSolution,
    NoPlanFound,
    InternalFault,
}

/// A structured note returned alongside generated plans
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: DiagnosticCode,
    pub message: String,
}

impl Diagnostic {
    pub fn error(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warn(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warn,
            code,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl From<InputError> for Diagnostic {
    fn from(err: InputError) -> Self {
        Diagnostic::error(DiagnosticCode::InvalidInput, err.to_string())
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let level = match self.severity {
            Severity::Warn => "warn",
            Severity::Error => "error",
        };
        write!(f, "{}: {}", level, self.message)
    }
}
