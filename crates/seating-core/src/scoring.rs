//! Plan scoring.

use crate::config::ScoringConfig;
use crate::solver::SeatedTable;
use crate::types::{Adjacency, ConstraintKind, Constraints, GuestId, GuestUnit};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Components of a plan score
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Share of guest units seated, 0..=1; a party counts once
    pub seated_fraction: f64,
    /// Population variance of per-table utilization
    pub utilization_variance: f64,
    pub must_satisfied: usize,
    pub cannot_violated: usize,
    pub adjacency_satisfied: usize,
    pub vip_tables: usize,
    /// Weighted sum, floored at zero and rounded
    pub total: u64,
}

/// Rates completed assignments; higher is better
#[derive(Debug, Clone, Default)]
pub struct Scorer {
    config: ScoringConfig,
}

impl Scorer {
    pub fn new() -> Self {
        Self {
            config: ScoringConfig::default(),
        }
    }

    pub fn with_config(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Score a table assignment against the full constraint set
    pub fn score(
        &self,
        tables: &[SeatedTable],
        guests: &[GuestUnit],
        constraints: &Constraints,
        adjacency: &Adjacency,
    ) -> ScoreBreakdown {
        let known: HashSet<&GuestId> = guests.iter().map(|g| &g.id).collect();
        let vips: HashSet<&GuestId> = guests.iter().filter(|g| g.vip).map(|g| &g.id).collect();
        let table_of: HashMap<&GuestId, usize> = tables
            .iter()
            .enumerate()
            .flat_map(|(i, t)| t.guests.iter().map(move |g| (g, i)))
            .collect();

        let seated = table_of.keys().filter(|g| known.contains(*g)).count();
        let seated_fraction = if guests.is_empty() {
            0.0
        } else {
            seated as f64 / guests.len() as f64
        };

        let utilization_variance = variance(tables.iter().map(SeatedTable::utilization));

        let together = |a: &GuestId, b: &GuestId| match (table_of.get(a), table_of.get(b)) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        };
        let count_together = |pairs: Vec<(GuestId, GuestId)>| pairs.iter().filter(|(a, b)| together(a, b)).count();

        let must_satisfied = count_together(constraints.pairs(ConstraintKind::Must));
        let cannot_violated = count_together(constraints.pairs(ConstraintKind::Cannot));
        let adjacency_satisfied = count_together(adjacency.pairs());
        let vip_tables = tables
            .iter()
            .filter(|t| t.guests.iter().any(|g| vips.contains(g)))
            .count();

        let raw = seated_fraction * self.config.seated_weight
            - utilization_variance * self.config.balance_weight
            + must_satisfied as f64 * self.config.must_bonus
            - cannot_violated as f64 * self.config.cannot_penalty
            + adjacency_satisfied as f64 * self.config.adjacency_bonus
            + vip_tables as f64 * self.config.vip_table_bonus;

        ScoreBreakdown {
            seated_fraction,
            utilization_variance,
            must_satisfied,
            cannot_violated,
            adjacency_satisfied,
            vip_tables,
            total: raw.max(0.0).round() as u64,
        }
    }
}

fn variance(values: impl Iterator<Item = f64>) -> f64 {
    let values: Vec<f64> = values.collect();
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Table;

    fn seated(id: &str, capacity: u32, guests: &[&str]) -> SeatedTable {
        let mut t = SeatedTable::new(Table::new(id, capacity));
        t.guests = guests.iter().map(|g| GuestId::from(*g)).collect();
        t.remaining = capacity - guests.len() as u32;
        t
    }

    fn people(ids: &[&str]) -> Vec<GuestUnit> {
        ids.iter().map(|id| GuestUnit::new(*id, *id)).collect()
    }

    #[test]
    fn test_balanced_full_plan() {
        let guests = people(&["a", "b", "c", "d"]);
        let tables = vec![seated("t1", 2, &["a", "b"]), seated("t2", 2, &["c", "d"])];
        let score = Scorer::new().score(&tables, &guests, &Constraints::new(), &Adjacency::new());

        assert_eq!(score.seated_fraction, 1.0);
        assert_eq!(score.utilization_variance, 0.0);
        assert_eq!(score.total, 1000);
    }

    #[test]
    fn test_unbalanced_plan_scores_lower() {
        let guests = people(&["a", "b"]);
        let balanced = vec![seated("t1", 2, &["a"]), seated("t2", 2, &["b"])];
        let lopsided = vec![seated("t1", 2, &["a", "b"]), seated("t2", 2, &[])];
        let scorer = Scorer::new();

        let even = scorer.score(&balanced, &guests, &Constraints::new(), &Adjacency::new());
        let uneven = scorer.score(&lopsided, &guests, &Constraints::new(), &Adjacency::new());
        assert!((uneven.utilization_variance - 0.25).abs() < 1e-9);
        assert_eq!(even.total, 1000);
        assert_eq!(uneven.total, 950);
    }

    #[test]
    fn test_constraint_and_vip_terms() {
        let mut guests = people(&["a", "b", "c", "d"]);
        guests[0].vip = true;
        let constraints = Constraints::new().with_must("a", "b").with_cannot("c", "d");
        let adjacency = Adjacency::new().with_link("a", "b").with_link("b", "c");
        let tables = vec![seated("t1", 4, &["a", "b", "c", "d"])];

        let score = Scorer::new().score(&tables, &guests, &constraints, &adjacency);
        assert_eq!(score.must_satisfied, 1);
        assert_eq!(score.cannot_violated, 1);
        assert_eq!(score.adjacency_satisfied, 2);
        assert_eq!(score.vip_tables, 1);
        // 1000 + 10 - 50 + 2*5 + 15
        assert_eq!(score.total, 985);
    }

    #[test]
    fn test_partial_plan_and_floor() {
        let guests = people(&["a", "b", "c", "d"]);
        let tables = vec![seated("t1", 2, &["a"])];
        let score = Scorer::new().score(&tables, &guests, &Constraints::new(), &Adjacency::new());
        assert_eq!(score.seated_fraction, 0.25);
        assert_eq!(score.total, 250);

        let harsh = Scorer::with_config(ScoringConfig {
            seated_weight: 0.0,
            cannot_penalty: 1_000.0,
            ..ScoringConfig::default()
        });
        let constraints = Constraints::new().with_cannot("a", "b");
        let tables = vec![seated("t1", 2, &["a", "b"])];
        assert_eq!(harsh.score(&tables, &guests, &constraints, &Adjacency::new()).total, 0);
    }

    #[test]
    fn test_seated_fraction_counts_units_not_seats() {
        let guests = vec![
            GuestUnit::new("a", "a").with_size(4),
            GuestUnit::new("b", "b"),
        ];
        let mut big = SeatedTable::new(Table::new("t1", 4));
        big.guests = vec![GuestId::from("a")];
        big.remaining = 0;

        let score = Scorer::new().score(&[big], &guests, &Constraints::new(), &Adjacency::new());
        assert_eq!(score.seated_fraction, 0.5);
        assert_eq!(score.total, 500);
    }
}
