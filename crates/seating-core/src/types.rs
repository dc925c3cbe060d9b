use crate::error::AdjacencyError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Stable identifier of a guest unit
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GuestId(String);

impl GuestId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for GuestId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for GuestId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for GuestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stable identifier of a table
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableId(String);

impl TableId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TableId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for TableId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for TableId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

fn default_party_size() -> u32 {
    1
}

/// A person or party that occupies seats as one indivisible block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestUnit {
    pub id: GuestId,
    /// Display name
    pub name: String,
    /// Normalized comparison key
    #[serde(default)]
    pub key: String,
    /// Number of seats the unit occupies
    #[serde(default = "default_party_size")]
    pub size: u32,
    /// Designated priority guest
    #[serde(default)]
    pub vip: bool,
}

impl GuestUnit {
    /// Create a single-seat guest; the comparison key is derived from the name
    pub fn new(id: impl Into<GuestId>, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: id.into(),
            key: Self::normalize_key(&name),
            name,
            size: 1,
            vip: false,
        }
    }

    pub fn with_size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    pub fn with_vip(mut self, vip: bool) -> Self {
        self.vip = vip;
        self
    }

    /// Lowercase, trimmed, single-spaced form of a display name
    pub fn normalize_key(name: &str) -> String {
        name.split_whitespace()
            .map(str::to_lowercase)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A table with a fixed number of seats
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub id: TableId,
    #[serde(default)]
    pub name: Option<String>,
    pub capacity: u32,
}

impl Table {
    pub fn new(id: impl Into<TableId>, capacity: u32) -> Self {
        Self {
            id: id.into(),
            name: None,
            capacity,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Display name, falling back to the identifier
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(self.id.as_str())
    }
}

/// Pairwise seating constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintKind {
    /// The two guests sit at the same table
    Must,
    /// The two guests never share a table
    Cannot,
}

impl ConstraintKind {
    pub fn opposite(self) -> Self {
        match self {
            ConstraintKind::Must => ConstraintKind::Cannot,
            ConstraintKind::Cannot => ConstraintKind::Must,
        }
    }
}

impl std::fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConstraintKind::Must => write!(f, "must"),
            ConstraintKind::Cannot => write!(f, "cannot"),
        }
    }
}

/// One directed assertion in the serialized form of [`Constraints`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintEntry {
    pub a: GuestId,
    pub b: GuestId,
    pub kind: ConstraintKind,
}

/// Symmetric must/cannot relation between guest units.
///
/// Entries are kept per direction so that a pair asserted `must` one way and
/// `cannot` the other survives intact and can be reported by the conflict
/// detector. [`Constraints::assert`] only fills the reverse direction when it
/// is still empty; [`Constraints::insert`] overwrites both.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<ConstraintEntry>", into = "Vec<ConstraintEntry>")]
pub struct Constraints {
    entries: BTreeMap<GuestId, BTreeMap<GuestId, ConstraintKind>>,
}

impl Constraints {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the pair in both directions
    pub fn insert(&mut self, a: impl Into<GuestId>, b: impl Into<GuestId>, kind: ConstraintKind) {
        let (a, b) = (a.into(), b.into());
        self.entries.entry(a.clone()).or_default().insert(b.clone(), kind);
        self.entries.entry(b).or_default().insert(a, kind);
    }

    /// Record the directed assertion `a -> b`, mirroring it only if `b -> a` is unset
    pub fn assert(&mut self, a: impl Into<GuestId>, b: impl Into<GuestId>, kind: ConstraintKind) {
        let (a, b) = (a.into(), b.into());
        self.entries.entry(a.clone()).or_default().insert(b.clone(), kind);
        self.entries.entry(b).or_default().entry(a).or_insert(kind);
    }

    pub fn with_must(mut self, a: impl Into<GuestId>, b: impl Into<GuestId>) -> Self {
        self.insert(a, b, ConstraintKind::Must);
        self
    }

    pub fn with_cannot(mut self, a: impl Into<GuestId>, b: impl Into<GuestId>) -> Self {
        self.insert(a, b, ConstraintKind::Cannot);
        self
    }

    /// Remove the pair in both directions
    pub fn remove(&mut self, a: &GuestId, b: &GuestId) {
        for (x, y) in [(a, b), (b, a)] {
            if let Some(row) = self.entries.get_mut(x) {
                row.remove(y);
                if row.is_empty() {
                    self.entries.remove(x);
                }
            }
        }
    }

    /// The directed entry `a -> b`
    pub fn get(&self, a: &GuestId, b: &GuestId) -> Option<ConstraintKind> {
        self.entries.get(a).and_then(|row| row.get(b)).copied()
    }

    /// True if either direction asserts `kind`
    pub fn has(&self, a: &GuestId, b: &GuestId, kind: ConstraintKind) -> bool {
        self.get(a, b) == Some(kind) || self.get(b, a) == Some(kind)
    }

    pub fn is_must(&self, a: &GuestId, b: &GuestId) -> bool {
        self.has(a, b, ConstraintKind::Must)
    }

    pub fn is_cannot(&self, a: &GuestId, b: &GuestId) -> bool {
        self.has(a, b, ConstraintKind::Cannot)
    }

    /// All directed entries
    pub fn entries(&self) -> impl Iterator<Item = (&GuestId, &GuestId, ConstraintKind)> {
        self.entries
            .iter()
            .flat_map(|(a, row)| row.iter().map(move |(b, kind)| (a, b, *kind)))
    }

    /// Directed entries leaving `id`
    pub fn partners<'a>(
        &'a self,
        id: &GuestId,
    ) -> impl Iterator<Item = (&'a GuestId, ConstraintKind)> + 'a {
        self.entries
            .get(id)
            .into_iter()
            .flat_map(|row| row.iter().map(|(b, kind)| (b, *kind)))
    }

    /// Unordered pairs (smaller id first) where either direction asserts `kind`
    pub fn pairs(&self, kind: ConstraintKind) -> Vec<(GuestId, GuestId)> {
        let mut seen = BTreeSet::new();
        for (a, b, k) in self.entries() {
            if k == kind && a != b {
                let pair = if a < b { (a.clone(), b.clone()) } else { (b.clone(), a.clone()) };
                seen.insert(pair);
            }
        }
        seen.into_iter().collect()
    }

    /// Copy holding only the entries of `kind`
    pub fn only(&self, kind: ConstraintKind) -> Self {
        let mut out = Self::new();
        for (a, b, k) in self.entries() {
            if k == kind {
                out.entries.entry(a.clone()).or_default().insert(b.clone(), k);
            }
        }
        out
    }

    /// Number of directed entries touching `id`
    pub fn degree(&self, id: &GuestId) -> usize {
        self.entries.get(id).map_or(0, BTreeMap::len)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Guest ids mentioned anywhere in the relation
    pub fn guests(&self) -> BTreeSet<&GuestId> {
        self.entries()
            .flat_map(|(a, b, _)| [a, b])
            .collect()
    }
}

impl From<Vec<ConstraintEntry>> for Constraints {
    fn from(entries: Vec<ConstraintEntry>) -> Self {
        let mut constraints = Self::new();
        for entry in entries {
            constraints.assert(entry.a, entry.b, entry.kind);
        }
        constraints
    }
}

impl From<Constraints> for Vec<ConstraintEntry> {
    fn from(constraints: Constraints) -> Self {
        let mut out = Vec::new();
        for (a, b, kind) in constraints.entries() {
            // Symmetric pairs are written once
            if a > b && constraints.get(b, a) == Some(kind) {
                continue;
            }
            out.push(ConstraintEntry {
                a: a.clone(),
                b: b.clone(),
                kind,
            });
        }
        out
    }
}

/// Symmetric "must sit immediately next to" relation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<[GuestId; 2]>", into = "Vec<[GuestId; 2]>")]
pub struct Adjacency {
    links: BTreeMap<GuestId, BTreeSet<GuestId>>,
}

impl Adjacency {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the edge without any checks
    pub fn link(&mut self, a: impl Into<GuestId>, b: impl Into<GuestId>) {
        let (a, b) = (a.into(), b.into());
        if a == b {
            return;
        }
        self.links.entry(a.clone()).or_default().insert(b.clone());
        self.links.entry(b).or_default().insert(a);
    }

    pub fn with_link(mut self, a: impl Into<GuestId>, b: impl Into<GuestId>) -> Self {
        self.link(a, b);
        self
    }

    /// Add the edge if it keeps both guests within `max_degree` partners and,
    /// when it closes a loop, some table seats the loop exactly.
    pub fn try_link(
        &mut self,
        a: &GuestId,
        b: &GuestId,
        guests: &[GuestUnit],
        tables: &[Table],
        max_degree: usize,
    ) -> Result<(), AdjacencyError> {
        if a == b {
            return Err(AdjacencyError::SelfLink(a.clone()));
        }
        let sizes: HashMap<&GuestId, u32> = guests.iter().map(|g| (&g.id, g.size)).collect();
        for id in [a, b] {
            if !sizes.contains_key(id) {
                return Err(AdjacencyError::UnknownGuest(id.clone()));
            }
        }
        if self.contains(a, b) {
            return Ok(());
        }
        for id in [a, b] {
            if self.degree(id) >= max_degree {
                return Err(AdjacencyError::DegreeExceeded {
                    guest: id.clone(),
                    max: max_degree,
                });
            }
        }

        let component = self.component(a);
        if component.contains(b) {
            let seats: u64 = component
                .iter()
                .map(|id| u64::from(sizes.get(id).copied().unwrap_or(0)))
                .sum();
            if !tables.iter().any(|t| u64::from(t.capacity) == seats) {
                return Err(AdjacencyError::LoopWithoutTable {
                    seats,
                    members: component.into_iter().collect(),
                });
            }
        }

        self.link(a.clone(), b.clone());
        Ok(())
    }

    pub fn unlink(&mut self, a: &GuestId, b: &GuestId) {
        for (x, y) in [(a, b), (b, a)] {
            if let Some(set) = self.links.get_mut(x) {
                set.remove(y);
                if set.is_empty() {
                    self.links.remove(x);
                }
            }
        }
    }

    pub fn contains(&self, a: &GuestId, b: &GuestId) -> bool {
        self.links.get(a).is_some_and(|set| set.contains(b))
    }

    pub fn partners<'a>(&'a self, id: &GuestId) -> impl Iterator<Item = &'a GuestId> + 'a {
        self.links.get(id).into_iter().flatten()
    }

    pub fn degree(&self, id: &GuestId) -> usize {
        self.links.get(id).map_or(0, BTreeSet::len)
    }

    /// Guests with at least one partner
    pub fn guests(&self) -> impl Iterator<Item = &GuestId> {
        self.links.keys()
    }

    /// Unordered edges, smaller id first
    pub fn pairs(&self) -> Vec<(GuestId, GuestId)> {
        self.links
            .iter()
            .flat_map(|(a, set)| set.iter().filter(move |b| a < *b).map(move |b| (a.clone(), b.clone())))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Guests reachable from `start` over adjacency edges, `start` included
    pub fn component(&self, start: &GuestId) -> BTreeSet<GuestId> {
        let mut seen = BTreeSet::new();
        let mut stack = vec![start.clone()];
        while let Some(id) = stack.pop() {
            if !seen.insert(id.clone()) {
                continue;
            }
            stack.extend(self.partners(&id).filter(|p| !seen.contains(*p)).cloned());
        }
        seen
    }
}

impl From<Vec<[GuestId; 2]>> for Adjacency {
    fn from(pairs: Vec<[GuestId; 2]>) -> Self {
        let mut adjacency = Self::new();
        for [a, b] in pairs {
            adjacency.link(a, b);
        }
        adjacency
    }
}

impl From<Adjacency> for Vec<[GuestId; 2]> {
    fn from(adjacency: Adjacency) -> Self {
        adjacency.pairs().into_iter().map(|(a, b)| [a, b]).collect()
    }
}
