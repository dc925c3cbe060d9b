//! Table backtracking solver.
//!
//! Depth-first search over atomic groups in the order given, with tables
//! tried largest first. The search runs on an explicit stack, so the group
//! count is bounded only by memory, and every search is capped by an attempt
//! budget.

use crate::config::SolverConfig;
use crate::grouping::AtomicGroup;
use crate::types::{ConstraintKind, Constraints, GuestId, Table};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// A table and the guests currently seated at it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatedTable {
    pub table: Table,
    /// Guests in seat order
    pub guests: Vec<GuestId>,
    /// Free seats
    pub remaining: u32,
}

impl SeatedTable {
    pub fn new(table: Table) -> Self {
        Self {
            remaining: table.capacity,
            table,
            guests: Vec::new(),
        }
    }

    /// Seats in use
    pub fn occupied(&self) -> u32 {
        self.table.capacity.saturating_sub(self.remaining)
    }

    /// Fraction of seats in use
    pub fn utilization(&self) -> f64 {
        if self.table.capacity == 0 {
            return 0.0;
        }
        f64::from(self.occupied()) / f64::from(self.table.capacity)
    }

    pub fn contains(&self, id: &GuestId) -> bool {
        self.guests.contains(id)
    }
}

/// Result of one successful search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    /// Tables in the caller's order
    pub tables: Vec<SeatedTable>,
    /// Guests left without a seat (partial searches only)
    pub unseated: Vec<GuestId>,
}

impl Assignment {
    pub fn is_complete(&self) -> bool {
        self.unseated.is_empty()
    }
}

/// Why a search produced nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SearchFailure {
    #[error("no arrangement satisfies the constraints for this ordering")]
    Infeasible,
    #[error("search abandoned after {attempts} attempts")]
    Exhausted { attempts: usize },
}

/// Places atomic groups at tables
#[derive(Debug, Clone, Default)]
pub struct Solver {
    config: SolverConfig,
}

impl Solver {
    /// Create a solver with default configuration
    pub fn new() -> Self {
        Self {
            config: SolverConfig::default(),
        }
    }

    /// Create a solver with custom configuration
    pub fn with_config(config: SolverConfig) -> Self {
        Self { config }
    }

    /// Seat the groups in order, returning `None` if this ordering yields nothing
    pub fn solve(
        &self,
        groups: &[AtomicGroup],
        tables: &[Table],
        constraints: &Constraints,
        allow_partial: bool,
    ) -> Option<Assignment> {
        self.search(groups, tables, constraints, allow_partial).ok()
    }

    /// Like [`Solver::solve`], reporting why nothing was found.
    ///
    /// Without `allow_partial` every group must be seated. With it, a group
    /// that fits nowhere is recorded as unseated and the search moves on.
    pub fn search(
        &self,
        groups: &[AtomicGroup],
        tables: &[Table],
        constraints: &Constraints,
        allow_partial: bool,
    ) -> Result<Assignment, SearchFailure> {
        let mut state = SearchState::new(groups, tables, constraints);
        let budget = self.config.max_attempts.saturating_add(groups.len());
        let n = groups.len();
        let mut depth = 0;
        let mut attempts = 0usize;

        while depth < n {
            attempts += 1;
            if attempts > budget {
                return Err(SearchFailure::Exhausted { attempts: budget });
            }

            if let Some(slot) = state.next_fit(depth) {
                state.place(depth, slot);
                depth += 1;
                continue;
            }

            if allow_partial {
                state.leave_unseated(depth);
                depth += 1;
                continue;
            }

            // Dead end: reset this level and undo the previous placement
            state.cursor[depth] = 0;
            if depth == 0 {
                return Err(SearchFailure::Infeasible);
            }
            depth -= 1;
            state.undo(depth);
        }

        Ok(state.into_assignment(groups, tables))
    }
}

struct SearchState<'a> {
    groups: &'a [AtomicGroup],
    /// Table indices, largest capacity first
    slots: Vec<usize>,
    remaining: Vec<u64>,
    /// Group indices seated per slot
    seated: Vec<Vec<usize>>,
    /// Groups each group may not share a table with
    enemies: Vec<HashSet<usize>>,
    /// Groups holding a `cannot` pair internally
    self_conflicting: Vec<bool>,
    /// Next slot to try per depth
    cursor: Vec<usize>,
    /// Slot chosen per depth, `None` while unplaced or unseated
    choice: Vec<Option<usize>>,
}

impl<'a> SearchState<'a> {
    fn new(groups: &'a [AtomicGroup], tables: &[Table], constraints: &Constraints) -> Self {
        let mut slots: Vec<usize> = (0..tables.len()).collect();
        slots.sort_by(|&a, &b| tables[b].capacity.cmp(&tables[a].capacity));
        let remaining = slots.iter().map(|&t| u64::from(tables[t].capacity)).collect();

        let owner: HashMap<&GuestId, usize> = groups
            .iter()
            .enumerate()
            .flat_map(|(i, g)| g.members.iter().map(move |m| (m, i)))
            .collect();
        let mut enemies = vec![HashSet::new(); groups.len()];
        let mut self_conflicting = vec![false; groups.len()];
        for (a, b) in constraints.pairs(ConstraintKind::Cannot) {
            if let (Some(&ga), Some(&gb)) = (owner.get(&a), owner.get(&b)) {
                if ga == gb {
                    self_conflicting[ga] = true;
                } else {
                    enemies[ga].insert(gb);
                    enemies[gb].insert(ga);
                }
            }
        }

        Self {
            groups,
            seated: vec![Vec::new(); slots.len()],
            slots,
            remaining,
            enemies,
            self_conflicting,
            cursor: vec![0; groups.len()],
            choice: vec![None; groups.len()],
        }
    }

    fn fits(&self, group: usize, slot: usize) -> bool {
        self.remaining[slot] >= self.groups[group].size
            && self.seated[slot].iter().all(|other| !self.enemies[group].contains(other))
    }

    fn next_fit(&self, group: usize) -> Option<usize> {
        if self.self_conflicting[group] {
            return None;
        }
        (self.cursor[group]..self.slots.len()).find(|&slot| self.fits(group, slot))
    }

    fn place(&mut self, group: usize, slot: usize) {
        self.remaining[slot] -= self.groups[group].size;
        self.seated[slot].push(group);
        self.choice[group] = Some(slot);
        self.cursor[group] = slot + 1;
    }

    fn leave_unseated(&mut self, group: usize) {
        self.choice[group] = None;
        self.cursor[group] = self.slots.len();
    }

    fn undo(&mut self, group: usize) {
        if let Some(slot) = self.choice[group].take() {
            self.remaining[slot] += self.groups[group].size;
            self.seated[slot].pop();
        }
    }

    fn into_assignment(self, groups: &[AtomicGroup], tables: &[Table]) -> Assignment {
        let mut seated: Vec<SeatedTable> = tables.iter().cloned().map(SeatedTable::new).collect();
        for (slot, &table) in self.slots.iter().enumerate() {
            let target = &mut seated[table];
            for &group in &self.seated[slot] {
                target.guests.extend(groups[group].members.iter().cloned());
            }
            target.remaining = u32::try_from(self.remaining[slot]).unwrap_or(u32::MAX);
        }

        let unseated = (0..groups.len())
            .filter(|&g| self.choice[g].is_none())
            .flat_map(|g| groups[g].members.iter().cloned())
            .collect();

        Assignment {
            tables: seated,
            unseated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grouping::build_groups;
    use crate::types::{Adjacency, GuestUnit};
    use proptest::prelude::*;

    fn guests(n: usize) -> Vec<GuestUnit> {
        (0..n).map(|i| GuestUnit::new(format!("g{}", i), format!("Guest {}", i))).collect()
    }

    fn id(s: &str) -> GuestId {
        GuestId::from(s)
    }

    fn table_of<'a>(assignment: &'a Assignment, guest: &str) -> Option<&'a SeatedTable> {
        assignment.tables.iter().find(|t| t.contains(&id(guest)))
    }

    #[test]
    fn test_seats_must_pair_together() {
        let guests = guests(2);
        let constraints = Constraints::new().with_must("g0", "g1");
        let groups = build_groups(&guests, &constraints, &Adjacency::new());
        let tables = vec![Table::new("t1", 2)];

        let assignment = Solver::new().solve(&groups, &tables, &constraints, false).unwrap();
        assert!(assignment.is_complete());
        assert_eq!(assignment.tables[0].guests, vec![id("g0"), id("g1")]);
        assert_eq!(assignment.tables[0].remaining, 0);
    }

    fn single(id: &str, size: u64) -> AtomicGroup {
        AtomicGroup {
            members: vec![GuestId::from(id)],
            size,
            priority: 0,
            constraint_density: 0,
        }
    }

    #[test]
    fn test_backtracks_when_first_choice_dead_ends() {
        let groups = vec![single("g0", 1), single("g1", 1), single("g2", 2)];
        let tables = vec![Table::new("small", 1), Table::new("big", 3)];

        let assignment = Solver::new().solve(&groups, &tables, &Constraints::new(), false).unwrap();
        assert!(assignment.is_complete());
        // Caller order is kept
        assert_eq!(assignment.tables[0].table.id.as_str(), "small");
        assert_eq!(assignment.tables[0].guests, vec![id("g1")]);
        assert_eq!(assignment.tables[1].guests, vec![id("g0"), id("g2")]);
    }

    #[test]
    fn test_cannot_pairs_split_across_tables() {
        let guests = guests(3);
        let constraints = Constraints::new().with_cannot("g0", "g1").with_cannot("g1", "g2");
        let groups = build_groups(&guests, &constraints, &Adjacency::new());
        let tables = vec![Table::new("small", 1), Table::new("big", 2)];

        let assignment = Solver::new().solve(&groups, &tables, &constraints, false).unwrap();
        let big = table_of(&assignment, "g0").unwrap();
        assert_eq!(big.table.id.as_str(), "big");
        assert!(big.contains(&id("g2")));
        assert_eq!(table_of(&assignment, "g1").unwrap().table.id.as_str(), "small");
    }

    #[test]
    fn test_infeasible_without_partial() {
        let guests = guests(3);
        let constraints = Constraints::new().with_must("g0", "g1").with_cannot("g0", "g2");
        let groups = build_groups(&guests, &constraints, &Adjacency::new());
        let tables = vec![Table::new("t1", 2)];

        let result = Solver::new().search(&groups, &tables, &constraints, false);
        assert_eq!(result, Err(SearchFailure::Infeasible));

        let partial = Solver::new().solve(&groups, &tables, &constraints, true).unwrap();
        assert_eq!(partial.unseated, vec![id("g2")]);
        assert_eq!(partial.tables[0].occupied(), 2);
    }

    #[test]
    fn test_self_conflicting_group_never_placed() {
        let guests = guests(2);
        let mut constraints = Constraints::new();
        constraints.assert("g0", "g1", ConstraintKind::Must);
        constraints.assert("g1", "g0", ConstraintKind::Cannot);
        let groups = build_groups(&guests, &constraints, &Adjacency::new());
        let tables = vec![Table::new("t1", 4)];

        let partial = Solver::new().solve(&groups, &tables, &constraints, true).unwrap();
        assert_eq!(partial.unseated.len(), 2);
    }

    #[test]
    fn test_attempt_budget_abandons_search() {
        // Six mutually hostile guests, five tables: pigeonhole, huge tree
        let guests = guests(6);
        let mut constraints = Constraints::new();
        for a in 0..6 {
            for b in (a + 1)..6 {
                constraints.insert(format!("g{}", a), format!("g{}", b), ConstraintKind::Cannot);
            }
        }
        let groups = build_groups(&guests, &constraints, &Adjacency::new());
        let tables: Vec<Table> = (0..5).map(|i| Table::new(format!("t{}", i), 6)).collect();

        let solver = Solver::with_config(SolverConfig {
            max_attempts: 50,
            ..SolverConfig::default()
        });
        assert_eq!(
            solver.search(&groups, &tables, &constraints, false),
            Err(SearchFailure::Exhausted { attempts: 56 })
        );
    }

    #[test]
    fn test_many_groups_do_not_recurse() {
        let guests = guests(10_000);
        let groups = build_groups(&guests, &Constraints::new(), &Adjacency::new());
        let tables: Vec<Table> = (0..1_000).map(|i| Table::new(format!("t{}", i), 10)).collect();

        let assignment = Solver::new().solve(&groups, &tables, &Constraints::new(), false).unwrap();
        assert!(assignment.is_complete());
        assert!(assignment.tables.iter().all(|t| t.remaining == 0));
    }

    proptest! {
        #[test]
        fn prop_capacity_and_cannot_respected(
            sizes in prop::collection::vec(1u32..4, 1..10),
            capacities in prop::collection::vec(1u32..8, 1..5),
            musts in prop::collection::vec((0usize..10, 0usize..10), 0..4),
            cannots in prop::collection::vec((0usize..10, 0usize..10), 0..6),
            partial in any::<bool>(),
        ) {
            let n = sizes.len();
            let guests: Vec<GuestUnit> = sizes
                .iter()
                .enumerate()
                .map(|(i, &s)| GuestUnit::new(format!("g{}", i), format!("G{}", i)).with_size(s))
                .collect();
            let mut constraints = Constraints::new();
            for (a, b) in musts {
                if a % n != b % n {
                    constraints.insert(format!("g{}", a % n), format!("g{}", b % n), ConstraintKind::Must);
                }
            }
            for (a, b) in cannots {
                let (a, b) = (GuestId::new(format!("g{}", a % n)), GuestId::new(format!("g{}", b % n)));
                if a != b && !constraints.is_must(&a, &b) {
                    constraints.insert(a, b, ConstraintKind::Cannot);
                }
            }
            let tables: Vec<Table> = capacities
                .iter()
                .enumerate()
                .map(|(i, &c)| Table::new(format!("t{}", i), c))
                .collect();
            let groups = build_groups(&guests, &constraints, &Adjacency::new());

            if let Some(assignment) = Solver::new().solve(&groups, &tables, &constraints, partial) {
                let size_of = |gid: &GuestId| guests.iter().find(|g| &g.id == gid).map_or(0, |g| g.size);
                for seated in &assignment.tables {
                    let used: u32 = seated.guests.iter().map(|g| size_of(g)).sum();
                    prop_assert!(used <= seated.table.capacity);
                    prop_assert_eq!(used + seated.remaining, seated.table.capacity);
                    for a in &seated.guests {
                        for b in &seated.guests {
                            prop_assert!(!constraints.is_cannot(a, b));
                        }
                    }
                }
                let seated_count: usize = assignment.tables.iter().map(|t| t.guests.len()).sum();
                prop_assert_eq!(seated_count + assignment.unseated.len(), n);
                if !partial {
                    prop_assert!(assignment.is_complete());
                }
            }
        }
    }
}
