//! Seating plan engine
//!
//! Turns a guest list, a set of tables and pairwise constraints into a small
//! set of ranked, structurally different seating plans.
//!
//! ```no_run
//! use seating_core::{Adjacency, Constraints, GenerateOptions, GuestUnit, Planner, Table};
//!
//! let guests = vec![GuestUnit::new("a", "Ada"), GuestUnit::new("b", "Bob")];
//! let tables = vec![Table::new("t1", 2)];
//! let constraints = Constraints::new().with_must("a", "b");
//!
//! let outcome = Planner::with_seed(7).generate(
//!     &guests,
//!     &tables,
//!     &constraints,
//!     &Adjacency::new(),
//!     GenerateOptions::default(),
//! );
//! assert_eq!(outcome.plans.len(), 1);
//! ```

mod config;
mod conflicts;
mod error;
mod grouping;
mod plan;
mod planner;
mod scoring;
mod seat_order;
mod solver;
mod strategy;
mod summary;
mod types;
mod uniqueness;

pub use config::{EngineConfig, ScoringConfig, SolverConfig, UniquenessConfig};
pub use conflicts::{detect_conflicts, ConflictDetector, ConflictKind, ConflictSeverity, ConstraintConflict};
pub use error::{AdjacencyError, Diagnostic, DiagnosticCode, InputError, Severity};
pub use grouping::{build_groups, AtomicGroup};
pub use plan::{GenerateOptions, GenerateOutcome, Relaxation, SeatingPlan};
pub use planner::{Planner, SeatingRequest};
pub use scoring::{ScoreBreakdown, Scorer};
pub use seat_order::order_seats;
pub use solver::{Assignment, SearchFailure, SeatedTable, Solver};
pub use strategy::Strategy;
pub use summary::summarize;
pub use types::{Adjacency, ConstraintEntry, ConstraintKind, Constraints, GuestId, GuestUnit, Table, TableId};
pub use uniqueness::{same_table_count, signature, UniquenessFilter, Verdict};
