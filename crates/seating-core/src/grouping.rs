//! Atomic groups: guests that must end up at the same table.
//!
//! Guests joined by a `must` constraint or an adjacency edge are merged with a
//! union-by-rank disjoint set. Each resulting set is one [`AtomicGroup`].

use crate::types::{Adjacency, ConstraintKind, Constraints, GuestId, GuestUnit};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Union-find over guest indices
#[derive(Clone, Debug)]
pub(crate) struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSet {
    pub(crate) fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    pub(crate) fn find(&mut self, mut node: usize) -> usize {
        let mut root = node;
        while self.parent[root] != root {
            root = self.parent[root];
        }

        while self.parent[node] != node {
            let parent = self.parent[node];
            self.parent[node] = root;
            node = parent;
        }

        root
    }

    pub(crate) fn union(&mut self, left: usize, right: usize) -> usize {
        let mut left = self.find(left);
        let mut right = self.find(right);
        if left == right {
            return left;
        }
        if self.rank[left] < self.rank[right] {
            std::mem::swap(&mut left, &mut right);
        }
        self.parent[right] = left;
        if self.rank[left] == self.rank[right] {
            self.rank[left] = self.rank[left].saturating_add(1);
        }
        left
    }

    /// Sets in order of their lowest member, members ascending
    pub(crate) fn sets(&mut self) -> Vec<Vec<usize>> {
        let mut by_root: HashMap<usize, usize> = HashMap::new();
        let mut sets: Vec<Vec<usize>> = Vec::new();
        for node in 0..self.parent.len() {
            let root = self.find(node);
            let slot = *by_root.entry(root).or_insert_with(|| {
                sets.push(Vec::new());
                sets.len() - 1
            });
            sets[slot].push(node);
        }
        sets
    }
}

/// Guests that are always seated together
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtomicGroup {
    /// Members in guest-list order
    pub members: Vec<GuestId>,
    /// Total seats taken
    pub size: u64,
    /// Number of VIP members
    pub priority: u32,
    /// Constraint entries touching any member
    pub constraint_density: usize,
}

impl AtomicGroup {
    pub fn is_vip(&self) -> bool {
        self.priority > 0
    }

    pub fn contains(&self, id: &GuestId) -> bool {
        self.members.contains(id)
    }
}

/// Merge guests linked by `must` constraints or adjacency into atomic groups,
/// ordered by priority then size, both descending.
///
/// References to unknown guest ids are ignored.
pub fn build_groups(
    guests: &[GuestUnit],
    constraints: &Constraints,
    adjacency: &Adjacency,
) -> Vec<AtomicGroup> {
    let index: HashMap<&GuestId, usize> = guests.iter().enumerate().map(|(i, g)| (&g.id, i)).collect();
    let mut set = DisjointSet::new(guests.len());

    for (a, b, kind) in constraints.entries() {
        if kind != ConstraintKind::Must {
            continue;
        }
        if let (Some(&i), Some(&j)) = (index.get(a), index.get(b)) {
            set.union(i, j);
        }
    }
    for (a, b) in adjacency.pairs() {
        if let (Some(&i), Some(&j)) = (index.get(&a), index.get(&b)) {
            set.union(i, j);
        }
    }

    let mut groups: Vec<AtomicGroup> = set
        .sets()
        .into_iter()
        .map(|members| {
            let units: Vec<&GuestUnit> = members.iter().map(|&i| &guests[i]).collect();
            AtomicGroup {
                members: units.iter().map(|g| g.id.clone()).collect(),
                size: units.iter().map(|g| u64::from(g.size)).sum(),
                priority: units.iter().filter(|g| g.vip).count() as u32,
                constraint_density: units.iter().map(|g| constraints.degree(&g.id)).sum(),
            }
        })
        .collect();

    groups.sort_by(|a, b| b.priority.cmp(&a.priority).then(b.size.cmp(&a.size)));
    groups
}
