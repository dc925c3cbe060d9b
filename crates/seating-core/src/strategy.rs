use crate::grouping::AtomicGroup;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Reordering applied to the group list before a search.
///
/// Different orders make the solver reach different arrangements first,
/// which is where plan diversity comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Random permutation
    Shuffle,
    /// Default order reversed
    Reverse,
    LargestFirst,
    SmallestFirst,
    /// Size-sorted list drawn alternately from both ends
    RandomPairs,
    /// VIP groups first, ties by size
    PriorityFirst,
    /// VIP and regular groups alternated
    VipScatter,
    /// Most-constrained groups first
    ConstraintDensityFirst,
}

impl Strategy {
    /// Strategies run first, and cycled for extra diversity
    pub const CORE: [Strategy; 5] = [
        Strategy::Shuffle,
        Strategy::Reverse,
        Strategy::LargestFirst,
        Strategy::SmallestFirst,
        Strategy::RandomPairs,
    ];

    pub const ADVANCED: [Strategy; 3] = [
        Strategy::PriorityFirst,
        Strategy::VipScatter,
        Strategy::ConstraintDensityFirst,
    ];

    /// All strategies, core first
    pub fn all() -> impl Iterator<Item = Strategy> {
        Self::CORE.into_iter().chain(Self::ADVANCED)
    }

    /// Whether two runs on the same input can differ
    pub fn is_randomized(&self) -> bool {
        matches!(self, Strategy::Shuffle | Strategy::RandomPairs)
    }

    /// Reorder `groups`; the result holds exactly the same groups
    pub fn apply<R: Rng + ?Sized>(&self, groups: &[AtomicGroup], rng: &mut R) -> Vec<AtomicGroup> {
        let mut out = groups.to_vec();
        match self {
            Strategy::Shuffle => out.shuffle(rng),
            Strategy::Reverse => out.reverse(),
            Strategy::LargestFirst => out.sort_by(|a, b| b.size.cmp(&a.size)),
            Strategy::SmallestFirst => out.sort_by(|a, b| a.size.cmp(&b.size)),
            Strategy::RandomPairs => {
                out.sort_by(|a, b| b.size.cmp(&a.size));
                let mut pool: VecDeque<AtomicGroup> = out.into();
                out = Vec::with_capacity(pool.len());
                while !pool.is_empty() {
                    let front_first = rng.gen_bool(0.5);
                    let (first, second) = if front_first {
                        (pool.pop_front(), pool.pop_back())
                    } else {
                        (pool.pop_back(), pool.pop_front())
                    };
                    out.extend(first);
                    out.extend(second);
                }
            }
            Strategy::PriorityFirst => out.sort_by(|a, b| {
                b.is_vip()
                    .cmp(&a.is_vip())
                    .then(b.priority.cmp(&a.priority))
                    .then(b.size.cmp(&a.size))
            }),
            Strategy::VipScatter => {
                let (mut vips, mut rest): (Vec<_>, Vec<_>) = out.into_iter().partition(AtomicGroup::is_vip);
                vips.sort_by(|a, b| b.priority.cmp(&a.priority).then(b.size.cmp(&a.size)));
                rest.sort_by(|a, b| b.size.cmp(&a.size));
                out = interleave(vips, rest);
            }
            Strategy::ConstraintDensityFirst => out.sort_by(|a, b| {
                b.constraint_density
                    .cmp(&a.constraint_density)
                    .then(b.size.cmp(&a.size))
            }),
        }
        out
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::Shuffle => write!(f, "Shuffle"),
            Strategy::Reverse => write!(f, "Reverse"),
            Strategy::LargestFirst => write!(f, "Largest first"),
            Strategy::SmallestFirst => write!(f, "Smallest first"),
            Strategy::RandomPairs => write!(f, "Random pairs"),
            Strategy::PriorityFirst => write!(f, "Priority first"),
            Strategy::VipScatter => write!(f, "VIP scatter"),
            Strategy::ConstraintDensityFirst => write!(f, "Most constrained first"),
        }
    }
}

fn interleave<T>(a: Vec<T>, b: Vec<T>) -> Vec<T> {
    let mut out = Vec::with_capacity(a.len() + b.len());
    let mut a = a.into_iter();
    let mut b = b.into_iter();
    loop {
        match (a.next(), b.next()) {
            (None, None) => break,
            (x, y) => {
                out.extend(x);
                out.extend(y);
            }
        }
    }
    out
}
