//! Constraint conflict detection.
//!
//! Safe to run on its own (for live feedback while constraints are edited)
//! and used by the planner as the gate before generation.

use crate::grouping::build_groups;
use crate::types::{Adjacency, ConstraintKind, Constraints, GuestId, GuestUnit, Table};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

/// Kind of detected conflict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    /// Three or more guests chained by `must` into a loop
    Circular,
    /// A pair asserted both `must` and `cannot`
    Impossible,
    /// A `must` group larger than every table
    CapacityViolation,
    /// A guest plus their neighbours larger than every table
    AdjacencyViolation,
    /// A guest with too many adjacency partners
    AdjacencyDegree,
    /// An adjacency loop no table seats exactly
    AdjacencyLoop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for ConflictSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConflictSeverity::Low => write!(f, "low"),
            ConflictSeverity::Medium => write!(f, "medium"),
            ConflictSeverity::High => write!(f, "high"),
            ConflictSeverity::Critical => write!(f, "critical"),
        }
    }
}

/// A detected constraint problem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintConflict {
    pub kind: ConflictKind,
    pub severity: ConflictSeverity,
    pub description: String,
    /// Affected guests, sorted
    pub guests: Vec<GuestId>,
}

impl ConstraintConflict {
    pub fn is_critical(&self) -> bool {
        self.severity == ConflictSeverity::Critical
    }
}

/// Inspects constraints and adjacency for contradictions
#[derive(Debug, Clone)]
pub struct ConflictDetector {
    max_adjacency_degree: usize,
}

impl Default for ConflictDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl ConflictDetector {
    pub fn new() -> Self {
        Self {
            max_adjacency_degree: 2,
        }
    }

    pub fn with_max_degree(max_adjacency_degree: usize) -> Self {
        Self { max_adjacency_degree }
    }

    /// Run every check. Adjacency is only inspected when `check_adjacency` is set.
    pub fn detect(
        &self,
        guests: &[GuestUnit],
        tables: &[Table],
        constraints: &Constraints,
        check_adjacency: bool,
        adjacency: &Adjacency,
    ) -> Vec<ConstraintConflict> {
        if guests.is_empty() || tables.is_empty() {
            return Vec::new();
        }

        let names = Names::new(guests);
        let mut conflicts = Vec::new();
        conflicts.extend(find_circular(guests, constraints, &names));
        conflicts.extend(find_contradictions(constraints, &names));
        conflicts.extend(find_capacity_violations(guests, tables, constraints, &names));
        if check_adjacency {
            conflicts.extend(self.find_adjacency_violations(guests, tables, adjacency, &names));
        }
        conflicts
    }

    fn find_adjacency_violations(
        &self,
        guests: &[GuestUnit],
        tables: &[Table],
        adjacency: &Adjacency,
        names: &Names,
    ) -> Vec<ConstraintConflict> {
        let sizes: HashMap<&GuestId, u64> = guests.iter().map(|g| (&g.id, u64::from(g.size))).collect();
        let largest = tables.iter().map(|t| u64::from(t.capacity)).max().unwrap_or(0);
        let mut conflicts = Vec::new();

        for guest in guests {
            let partners: Vec<&GuestId> = adjacency.partners(&guest.id).collect();
            if partners.is_empty() {
                continue;
            }

            if partners.len() > self.max_adjacency_degree {
                conflicts.push(ConstraintConflict {
                    kind: ConflictKind::AdjacencyDegree,
                    severity: ConflictSeverity::High,
                    description: format!(
                        "{} has {} adjacent-seating partners; at most {} fit beside one seat",
                        names.get(&guest.id),
                        partners.len(),
                        self.max_adjacency_degree
                    ),
                    guests: sorted(std::iter::once(&guest.id).chain(partners.iter().copied())),
                });
            }

            let needed = u64::from(guest.size)
                + partners.iter().map(|p| sizes.get(*p).copied().unwrap_or(0)).sum::<u64>();
            if needed > largest {
                conflicts.push(ConstraintConflict {
                    kind: ConflictKind::AdjacencyViolation,
                    severity: ConflictSeverity::High,
                    description: format!(
                        "{} and their neighbours need {} seats but the largest table has {}",
                        names.get(&guest.id),
                        needed,
                        largest
                    ),
                    guests: sorted(std::iter::once(&guest.id).chain(partners.iter().copied())),
                });
            }
        }

        let mut visited: HashSet<GuestId> = HashSet::new();
        for guest in guests {
            if visited.contains(&guest.id) || adjacency.degree(&guest.id) == 0 {
                continue;
            }
            let component = adjacency.component(&guest.id);
            visited.extend(component.iter().cloned());

            let edges: usize = component.iter().map(|id| adjacency.degree(id)).sum::<usize>() / 2;
            if edges < component.len() {
                continue;
            }
            let seats: u64 = component.iter().map(|id| sizes.get(id).copied().unwrap_or(0)).sum();
            if !tables.iter().any(|t| u64::from(t.capacity) == seats) {
                conflicts.push(ConstraintConflict {
                    kind: ConflictKind::AdjacencyLoop,
                    severity: ConflictSeverity::High,
                    description: format!(
                        "adjacent-seating loop {} needs a table of exactly {} seats",
                        names.list(component.iter()),
                        seats
                    ),
                    guests: component.into_iter().collect(),
                });
            }
        }

        conflicts
    }
}

/// Detect conflicts with the default adjacency degree cap
pub fn detect_conflicts(
    guests: &[GuestUnit],
    tables: &[Table],
    constraints: &Constraints,
    check_adjacency: bool,
    adjacency: &Adjacency,
) -> Vec<ConstraintConflict> {
    ConflictDetector::new().detect(guests, tables, constraints, check_adjacency, adjacency)
}

struct Names<'a> {
    by_id: HashMap<&'a GuestId, &'a str>,
}

impl<'a> Names<'a> {
    fn new(guests: &'a [GuestUnit]) -> Self {
        Self {
            by_id: guests.iter().map(|g| (&g.id, g.name.as_str())).collect(),
        }
    }

    fn get<'b>(&'b self, id: &'b GuestId) -> &'b str {
        self.by_id.get(id).copied().unwrap_or(id.as_str())
    }

    fn knows(&self, id: &GuestId) -> bool {
        self.by_id.contains_key(id)
    }

    fn list<'b>(&self, ids: impl Iterator<Item = &'b GuestId>) -> String {
        ids.map(|id| self.get(id).to_string()).collect::<Vec<_>>().join(", ")
    }
}

fn sorted<'a>(ids: impl Iterator<Item = &'a GuestId>) -> Vec<GuestId> {
    ids.cloned().collect::<BTreeSet<_>>().into_iter().collect()
}

/// Loops in the undirected `must` graph, one report per member set
fn find_circular(guests: &[GuestUnit], constraints: &Constraints, names: &Names) -> Vec<ConstraintConflict> {
    let known: HashSet<&GuestId> = guests.iter().map(|g| &g.id).collect();
    let mut graph: BTreeMap<&GuestId, BTreeSet<&GuestId>> = BTreeMap::new();
    for (a, b, kind) in constraints.entries() {
        if kind == ConstraintKind::Must && a != b && known.contains(a) && known.contains(b) {
            graph.entry(a).or_default().insert(b);
            graph.entry(b).or_default().insert(a);
        }
    }
    let graph: BTreeMap<&GuestId, Vec<&GuestId>> =
        graph.into_iter().map(|(k, v)| (k, v.into_iter().collect())).collect();

    let mut reported: BTreeSet<Vec<GuestId>> = BTreeSet::new();
    let mut visited: HashSet<&GuestId> = HashSet::new();

    for &root in graph.keys() {
        if !visited.insert(root) {
            continue;
        }
        let mut path: Vec<&GuestId> = vec![root];
        let mut on_path: HashMap<&GuestId, usize> = HashMap::from([(root, 0)]);
        // (node, parent, next neighbour index)
        let mut frames: Vec<(&GuestId, Option<&GuestId>, usize)> = vec![(root, None, 0)];

        while let Some(frame) = frames.last_mut() {
            let (node, parent, next) = *frame;
            let neighbours = &graph[node];
            if next >= neighbours.len() {
                frames.pop();
                path.pop();
                on_path.remove(node);
                continue;
            }
            frame.2 += 1;

            let neighbour = neighbours[next];
            if Some(neighbour) == parent {
                continue;
            }
            if let Some(&start) = on_path.get(neighbour) {
                let mut cycle: Vec<GuestId> = path[start..].iter().map(|id| (*id).clone()).collect();
                cycle.sort();
                if cycle.len() >= 3 {
                    reported.insert(cycle);
                }
            } else if visited.insert(neighbour) {
                on_path.insert(neighbour, path.len());
                path.push(neighbour);
                frames.push((neighbour, Some(node), 0));
            }
        }
    }

    reported
        .into_iter()
        .map(|cycle| ConstraintConflict {
            kind: ConflictKind::Circular,
            severity: ConflictSeverity::High,
            description: format!("circular must-sit-together chain: {}", names.list(cycle.iter())),
            guests: cycle,
        })
        .collect()
}

/// Pairs of known guests whose two directions disagree
fn find_contradictions(constraints: &Constraints, names: &Names) -> Vec<ConstraintConflict> {
    let mut conflicts = Vec::new();
    for (a, b, kind) in constraints.entries() {
        if a >= b || !names.knows(a) || !names.knows(b) {
            continue;
        }
        if constraints.get(b, a) != Some(kind.opposite()) {
            continue;
        }
        conflicts.push(ConstraintConflict {
            kind: ConflictKind::Impossible,
            severity: ConflictSeverity::Critical,
            description: format!(
                "{} and {} are marked both must and cannot sit together",
                names.get(a),
                names.get(b)
            ),
            guests: vec![a.clone(), b.clone()],
        });
    }
    conflicts
}

/// `must` groups (adjacency ignored) that no table can hold
fn find_capacity_violations(
    guests: &[GuestUnit],
    tables: &[Table],
    constraints: &Constraints,
    names: &Names,
) -> Vec<ConstraintConflict> {
    let largest = tables.iter().map(|t| u64::from(t.capacity)).max().unwrap_or(0);
    build_groups(guests, constraints, &Adjacency::new())
        .into_iter()
        .filter(|group| group.size > largest)
        .map(|group| ConstraintConflict {
            kind: ConflictKind::CapacityViolation,
            severity: ConflictSeverity::Critical,
            description: format!(
                "group {} needs {} seats but the largest table has {}",
                names.list(group.members.iter()),
                group.size,
                largest
            ),
            guests: sorted(group.members.iter()),
        })
        .collect()
}
