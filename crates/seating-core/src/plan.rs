use crate::conflicts::ConstraintConflict;
use crate::error::{Diagnostic, Severity};
use crate::solver::SeatedTable;
use crate::strategy::Strategy;
use crate::types::{GuestId, TableId};
use serde::{Deserialize, Serialize};

/// Constraints dropped to reach a plan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relaxation {
    #[default]
    None,
    /// `cannot` constraints ignored, `must` kept
    DroppedCannot,
    /// Every constraint ignored
    DroppedAll,
}

impl std::fmt::Display for Relaxation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Relaxation::None => write!(f, "none"),
            Relaxation::DroppedCannot => write!(f, "cannot-sit-together constraints dropped"),
            Relaxation::DroppedAll => write!(f, "all constraints dropped"),
        }
    }
}

/// One generated seating arrangement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeatingPlan {
    /// 1-based rank after sorting
    pub rank: usize,
    /// Tables in the caller's order, guests in display order
    pub tables: Vec<SeatedTable>,
    /// Guests without a seat (partial plans only)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unseated: Vec<GuestId>,
    pub score: u64,
    /// Ordering heuristic that produced the plan
    pub strategy: Strategy,
    #[serde(default)]
    pub relaxation: Relaxation,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

impl SeatingPlan {
    pub fn is_partial(&self) -> bool {
        !self.unseated.is_empty()
    }

    pub fn is_relaxed(&self) -> bool {
        self.relaxation != Relaxation::None
    }

    pub fn table(&self, id: &TableId) -> Option<&SeatedTable> {
        self.tables.iter().find(|t| &t.table.id == id)
    }

    /// Table a guest is seated at
    pub fn table_of(&self, guest: &GuestId) -> Option<&SeatedTable> {
        self.tables.iter().find(|t| t.contains(guest))
    }

    pub fn seated_count(&self) -> usize {
        self.tables.iter().map(|t| t.guests.len()).sum()
    }
}

/// Knobs of a single generation call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateOptions {
    /// Accept plans that leave guests unseated, and relax constraints when stuck
    pub allow_partial: bool,
    /// Accepted-plan limit, also the number returned
    pub max_plans: usize,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            allow_partial: false,
            max_plans: 5,
        }
    }
}

/// Everything a generation call returns
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerateOutcome {
    /// Plans, best first
    pub plans: Vec<SeatingPlan>,
    /// Diagnostics of every severity
    pub errors: Vec<Diagnostic>,
    pub conflicts: Vec<ConstraintConflict>,
}

impl GenerateOutcome {
    pub fn has_errors(&self) -> bool {
        self.errors.iter().any(Diagnostic::is_error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.errors.iter().filter(|d| d.severity == Severity::Warn)
    }

    pub fn best(&self) -> Option<&SeatingPlan> {
        self.plans.first()
    }
}
