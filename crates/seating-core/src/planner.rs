//! Plan generation.
//!
//! Phases: validation, conflict gate, grouping, core and advanced diversity
//! strategies, fallback relaxation, an extra diversity loop, then ranking.

use crate::config::EngineConfig;
use crate::conflicts::{ConflictDetector, ConstraintConflict};
use crate::error::{Diagnostic, DiagnosticCode, InputError};
use crate::grouping::{build_groups, AtomicGroup};
use crate::plan::{GenerateOptions, GenerateOutcome, Relaxation, SeatingPlan};
use crate::scoring::Scorer;
use crate::seat_order::order_seats;
use crate::solver::Solver;
use crate::strategy::Strategy;
use crate::types::{Adjacency, ConstraintKind, Constraints, GuestId, GuestUnit, Table};
use crate::uniqueness::{same_table_count, UniquenessFilter, Verdict};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::panic::{self, AssertUnwindSafe};

/// Serializable bundle of generation inputs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeatingRequest {
    pub guests: Vec<GuestUnit>,
    pub tables: Vec<Table>,
    #[serde(default)]
    pub constraints: Constraints,
    #[serde(default)]
    pub adjacency: Adjacency,
    #[serde(default)]
    pub options: GenerateOptions,
}

/// Seating plan generator
pub struct Planner<R: Rng = StdRng> {
    config: EngineConfig,
    rng: R,
}

impl Default for Planner<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl Planner<StdRng> {
    /// Create a planner with default configuration and a fresh random seed
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Create a planner with custom configuration
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            config,
            rng: StdRng::from_entropy(),
        }
    }

    /// Create a planner with a specific seed for reproducibility
    pub fn with_seed(seed: u64) -> Self {
        Self::with_config_and_seed(EngineConfig::default(), seed)
    }

    pub fn with_config_and_seed(config: EngineConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> Planner<R> {
    /// Create a planner drawing randomness from `rng`
    pub fn with_rng(config: EngineConfig, rng: R) -> Self {
        Self { config, rng }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Generate ranked plans from a request bundle
    pub fn generate_request(&mut self, request: &SeatingRequest) -> GenerateOutcome {
        self.generate(
            &request.guests,
            &request.tables,
            &request.constraints,
            &request.adjacency,
            request.options,
        )
    }

    /// Generate up to `options.max_plans` distinct plans, best first.
    ///
    /// Never panics: invalid input, blocking conflicts and internal faults all
    /// come back as diagnostics with an empty plan list.
    pub fn generate(
        &mut self,
        guests: &[GuestUnit],
        tables: &[Table],
        constraints: &Constraints,
        adjacency: &Adjacency,
        options: GenerateOptions,
    ) -> GenerateOutcome {
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            self.run(guests, tables, constraints, adjacency, options)
        }));
        match result {
            Ok(outcome) => outcome,
            Err(_) => {
                tracing::error!("seating generation aborted by an internal fault");
                GenerateOutcome {
                    errors: vec![Diagnostic::error(
                        DiagnosticCode::InternalFault,
                        "an unexpected error occurred while generating seating plans",
                    )],
                    ..GenerateOutcome::default()
                }
            }
        }
    }

    fn run(
        &mut self,
        guests: &[GuestUnit],
        tables: &[Table],
        constraints: &Constraints,
        adjacency: &Adjacency,
        options: GenerateOptions,
    ) -> GenerateOutcome {
        let mut outcome = GenerateOutcome::default();

        // Phase 1: validation
        let input_errors = validate(guests, tables, options.allow_partial);
        if !input_errors.is_empty() {
            tracing::debug!(count = input_errors.len(), "rejected invalid seating input");
            outcome.errors = input_errors.into_iter().map(Diagnostic::from).collect();
            return outcome;
        }
        outcome.errors.extend(unknown_references(guests, constraints, adjacency));

        // Phase 2: conflict gate
        let detector = ConflictDetector::with_max_degree(self.config.solver.max_adjacency_degree);
        outcome.conflicts = detector.detect(guests, tables, constraints, true, adjacency);
        let critical: Vec<&ConstraintConflict> = outcome.conflicts.iter().filter(|c| c.is_critical()).collect();
        if !critical.is_empty() && !options.allow_partial {
            tracing::warn!(count = critical.len(), "critical constraint conflicts block generation");
            let details = critical.iter().map(|c| c.description.as_str()).collect::<Vec<_>>().join("; ");
            outcome.errors.push(Diagnostic::error(
                DiagnosticCode::CriticalConflict,
                format!("{} critical conflict(s) must be resolved first: {}", critical.len(), details),
            ));
            return outcome;
        }
        for conflict in &outcome.conflicts {
            outcome.errors.push(Diagnostic::warn(
                DiagnosticCode::ConstraintConflict,
                format!("{} conflict: {}", conflict.severity, conflict.description),
            ));
        }

        let mut session = Session {
            guests,
            tables,
            constraints,
            adjacency,
            solver: Solver::with_config(self.config.solver.clone()),
            scorer: Scorer::with_config(self.config.scoring.clone()),
            filter: UniquenessFilter::new(self.config.uniqueness.clone(), guests.len()),
            max_plans: options.max_plans,
            plans: Vec::new(),
        };

        // Phase 3: grouping
        let mut mode = Mode::new(guests, constraints, adjacency, Relaxation::None, false);
        tracing::debug!(groups = mode.groups.len(), guests = guests.len(), "built atomic groups");

        // Phases 4 and 5: core then advanced strategies
        for strategy in Strategy::all() {
            if session.is_full() {
                break;
            }
            session.attempt(&mut self.rng, strategy, &mode);
        }

        // Phase 6: fallbacks
        if session.plans.is_empty() && options.allow_partial {
            for relaxation in [Relaxation::DroppedCannot, Relaxation::DroppedAll] {
                let relaxed = Mode::new(guests, constraints, adjacency, relaxation, false);
                for strategy in Strategy::CORE {
                    session.attempt(&mut self.rng, strategy, &relaxed);
                }
                if !session.plans.is_empty() {
                    tracing::warn!(%relaxation, "seating plans found only after relaxing constraints");
                    outcome.errors.push(Diagnostic::warn(
                        DiagnosticCode::RelaxedConstraints,
                        format!("no plan satisfied every constraint; shown plans have {}", relaxation),
                    ));
                    mode = relaxed;
                    break;
                }
            }
        }
        if session.plans.is_empty() && options.allow_partial {
            let partial = Mode::new(guests, constraints, adjacency, Relaxation::None, true);
            for strategy in Strategy::all() {
                if session.is_full() {
                    break;
                }
                session.attempt(&mut self.rng, strategy, &partial);
            }
            if !session.plans.is_empty() {
                tracing::warn!("only partial seating plans could be generated");
                outcome.errors.push(Diagnostic::warn(
                    DiagnosticCode::PartialSolution,
                    "not every guest could be seated; shown plans leave some guests unseated",
                ));
                mode = partial;
            }
        }

        // Phase 7: extra diversity
        let budget = guests
            .len()
            .saturating_mul(self.config.extra_attempts_per_guest)
            .min(self.config.extra_attempts_cap);
        for i in 0..budget {
            if session.is_full() {
                break;
            }
            session.attempt(&mut self.rng, Strategy::CORE[i % Strategy::CORE.len()], &mode);
        }

        // Phase 8: ranking
        outcome.plans = rank(session.plans, options.max_plans);
        if outcome.plans.is_empty() {
            outcome.errors.push(Diagnostic::warn(
                DiagnosticCode::NoPlanFound,
                "no seating plan could be found for these guests, tables and constraints",
            ));
        }

        tracing::info!(
            plans = outcome.plans.len(),
            best_score = outcome.plans.first().map_or(0, |p| p.score),
            diagnostics = outcome.errors.len(),
            "seating generation finished"
        );
        outcome
    }
}

/// Constraints and groups a search runs with
struct Mode {
    relaxation: Relaxation,
    partial: bool,
    constraints: Constraints,
    groups: Vec<AtomicGroup>,
}

impl Mode {
    fn new(
        guests: &[GuestUnit],
        constraints: &Constraints,
        adjacency: &Adjacency,
        relaxation: Relaxation,
        partial: bool,
    ) -> Self {
        let constraints = match relaxation {
            Relaxation::None => constraints.clone(),
            Relaxation::DroppedCannot => constraints.only(ConstraintKind::Must),
            Relaxation::DroppedAll => Constraints::new(),
        };
        let groups = build_groups(guests, &constraints, adjacency);
        Self {
            relaxation,
            partial,
            constraints,
            groups,
        }
    }
}

/// Per-call search state
struct Session<'a> {
    guests: &'a [GuestUnit],
    tables: &'a [Table],
    constraints: &'a Constraints,
    adjacency: &'a Adjacency,
    solver: Solver,
    scorer: Scorer,
    filter: UniquenessFilter,
    max_plans: usize,
    plans: Vec<SeatingPlan>,
}

impl Session<'_> {
    fn is_full(&self) -> bool {
        self.plans.len() >= self.max_plans
    }

    /// One ordering, one search; a failed search just yields nothing
    fn attempt<R: Rng + ?Sized>(&mut self, rng: &mut R, strategy: Strategy, mode: &Mode) {
        if self.is_full() {
            return;
        }
        let ordered = strategy.apply(&mode.groups, rng);
        let mut assignment = match self.solver.search(&ordered, self.tables, &mode.constraints, mode.partial) {
            Ok(assignment) => assignment,
            Err(failure) => {
                tracing::debug!(%strategy, relaxation = %mode.relaxation, %failure, "strategy produced no plan");
                return;
            }
        };

        match self.filter.check(&assignment.tables, &self.plans) {
            Verdict::Accept => {}
            verdict => {
                tracing::trace!(%strategy, ?verdict, "plan rejected as too similar");
                return;
            }
        }

        for table in &mut assignment.tables {
            table.guests = order_seats(&table.guests, self.guests, self.adjacency);
        }
        let breakdown = self
            .scorer
            .score(&assignment.tables, self.guests, self.constraints, self.adjacency);

        let mut notes = Vec::new();
        if mode.relaxation != Relaxation::None {
            notes.push(format!("Relaxed: {}", mode.relaxation));
        }
        if breakdown.cannot_violated > 0 {
            notes.push(format!(
                "{} cannot-sit-together pair(s) share a table",
                breakdown.cannot_violated
            ));
        }
        if !assignment.unseated.is_empty() {
            notes.push(format!("{} guest(s) left unseated", assignment.unseated.len()));
        }

        tracing::debug!(%strategy, score = breakdown.total, "accepted plan");
        self.plans.push(SeatingPlan {
            rank: 0,
            tables: assignment.tables,
            unseated: assignment.unseated,
            score: breakdown.total,
            strategy,
            relaxation: mode.relaxation,
            notes,
        });
    }
}

/// Input problems that block generation
fn validate(guests: &[GuestUnit], tables: &[Table], allow_partial: bool) -> Vec<InputError> {
    let mut errors = Vec::new();
    if guests.is_empty() {
        errors.push(InputError::NoGuests);
    }
    if tables.is_empty() {
        errors.push(InputError::NoTables);
    }

    let mut seen_guests = HashSet::new();
    for guest in guests {
        if guest.size == 0 {
            errors.push(InputError::EmptyParty(guest.id.clone()));
        }
        if !seen_guests.insert(&guest.id) {
            errors.push(InputError::DuplicateGuest(guest.id.clone()));
        }
    }
    let mut seen_tables = HashSet::new();
    for table in tables {
        if table.capacity == 0 {
            errors.push(InputError::NonPositiveCapacity(table.id.clone()));
        }
        if !seen_tables.insert(&table.id) {
            errors.push(InputError::DuplicateTable(table.id.clone()));
        }
    }

    if errors.is_empty() && !allow_partial {
        let needed: u64 = guests.iter().map(|g| u64::from(g.size)).sum();
        let available: u64 = tables.iter().map(|t| u64::from(t.capacity)).sum();
        if needed > available {
            errors.push(InputError::InsufficientCapacity { needed, available });
        }
    }
    errors
}

/// Warnings for constraint or adjacency entries naming unknown guests
fn unknown_references(guests: &[GuestUnit], constraints: &Constraints, adjacency: &Adjacency) -> Option<Diagnostic> {
    let known: HashSet<&GuestId> = guests.iter().map(|g| &g.id).collect();
    let unknown: BTreeSet<&GuestId> = constraints
        .guests()
        .into_iter()
        .chain(adjacency.guests())
        .filter(|id| !known.contains(id))
        .collect();
    if unknown.is_empty() {
        return None;
    }
    let list = unknown.iter().map(|id| id.as_str()).collect::<Vec<_>>().join(", ");
    tracing::warn!(count = unknown.len(), "ignoring references to unknown guests");
    Some(Diagnostic::warn(
        DiagnosticCode::UnknownReference,
        format!("ignored constraints referring to unknown guests: {}", list),
    ))
}

/// Sort by score, then by lower overlap with the other plans; assign ranks
fn rank(plans: Vec<SeatingPlan>, limit: usize) -> Vec<SeatingPlan> {
    let overlaps: Vec<usize> = plans
        .iter()
        .enumerate()
        .map(|(i, plan)| {
            plans
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(_, other)| same_table_count(&plan.tables, &other.tables))
                .sum()
        })
        .collect();

    let mut ranked: Vec<(usize, SeatingPlan)> = overlaps.into_iter().zip(plans).collect();
    ranked.sort_by(|(oa, a), (ob, b)| b.score.cmp(&a.score).then(oa.cmp(ob)));
    ranked
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(i, (_, mut plan))| {
            plan.rank = i + 1;
            plan
        })
        .collect()
}
