//! Similarity filter keeping the accepted plans structurally different.

use crate::config::UniquenessConfig;
use crate::plan::SeatingPlan;
use crate::solver::SeatedTable;
use crate::types::{GuestId, TableId};
use std::collections::HashMap;

/// Canonical form of an assignment: table contents sorted, then tables sorted.
///
/// Table identities are ignored, so two plans that only swap whole tables
/// share a signature.
pub fn signature(tables: &[SeatedTable]) -> String {
    let mut parts: Vec<String> = tables
        .iter()
        .filter(|t| !t.guests.is_empty())
        .map(|t| {
            let mut ids: Vec<&str> = t.guests.iter().map(GuestId::as_str).collect();
            ids.sort_unstable();
            ids.join(",")
        })
        .collect();
    parts.sort_unstable();
    parts.join("|")
}

/// Guests seated at the same table id in both assignments
pub fn same_table_count(a: &[SeatedTable], b: &[SeatedTable]) -> usize {
    let seat_of: HashMap<&GuestId, &TableId> = b
        .iter()
        .flat_map(|t| t.guests.iter().map(move |g| (g, &t.table.id)))
        .collect();
    a.iter()
        .flat_map(|t| t.guests.iter().map(move |g| (g, &t.table.id)))
        .filter(|(g, table)| seat_of.get(g) == Some(table))
        .count()
}

/// Outcome of checking a candidate plan
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Verdict {
    Accept,
    /// Same signature as an accepted plan
    Duplicate,
    /// Overlap above the current threshold
    TooSimilar { overlap: f64, threshold: f64 },
}

impl Verdict {
    pub fn is_accept(&self) -> bool {
        matches!(self, Verdict::Accept)
    }
}

/// Accept/reject decisions for new plans
#[derive(Debug, Clone)]
pub struct UniquenessFilter {
    config: UniquenessConfig,
    guest_count: usize,
}

impl UniquenessFilter {
    pub fn new(config: UniquenessConfig, guest_count: usize) -> Self {
        Self { config, guest_count }
    }

    /// Maximum overlap allowed once `accepted` plans exist
    pub fn threshold(&self, accepted: usize) -> f64 {
        let mut threshold = self.config.base_threshold + accepted as f64 * self.config.per_plan_step;
        if self.guest_count >= self.config.large_list_size {
            threshold += self.config.large_list_bonus;
        }
        threshold.min(self.config.ceiling)
    }

    /// Fraction of all guests seated at the identical table in both assignments
    pub fn overlap(&self, a: &[SeatedTable], b: &[SeatedTable]) -> f64 {
        if self.guest_count == 0 {
            return 0.0;
        }
        same_table_count(a, b) as f64 / self.guest_count as f64
    }

    pub fn check(&self, candidate: &[SeatedTable], accepted: &[SeatingPlan]) -> Verdict {
        let candidate_signature = signature(candidate);
        if accepted.iter().any(|plan| signature(&plan.tables) == candidate_signature) {
            return Verdict::Duplicate;
        }

        let threshold = self.threshold(accepted.len());
        for plan in accepted {
            let overlap = self.overlap(candidate, &plan.tables);
            if overlap > threshold {
                return Verdict::TooSimilar { overlap, threshold };
            }
        }
        Verdict::Accept
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::Strategy;
    use crate::types::Table;

    fn seated(id: &str, guests: &[&str]) -> SeatedTable {
        let mut t = SeatedTable::new(Table::new(id, 10));
        t.guests = guests.iter().map(|g| GuestId::from(*g)).collect();
        t
    }

    fn plan(tables: Vec<SeatedTable>) -> SeatingPlan {
        SeatingPlan {
            rank: 0,
            tables,
            unseated: Vec::new(),
            score: 0,
            strategy: Strategy::Shuffle,
            relaxation: Default::default(),
            notes: Vec::new(),
        }
    }

    #[test]
    fn test_signature_ignores_order() {
        let a = vec![seated("t1", &["b", "a"]), seated("t2", &["c"])];
        let b = vec![seated("t1", &["c"]), seated("t2", &["a", "b"])];
        assert_eq!(signature(&a), "a,b|c");
        assert_eq!(signature(&a), signature(&b));
        assert_eq!(same_table_count(&a, &b), 0);
    }

    #[test]
    fn test_duplicate_rejected() {
        let filter = UniquenessFilter::new(UniquenessConfig::default(), 3);
        let accepted = vec![plan(vec![seated("t1", &["a", "b"]), seated("t2", &["c"])])];
        let candidate = vec![seated("t1", &["c"]), seated("t2", &["b", "a"])];
        assert_eq!(filter.check(&candidate, &accepted), Verdict::Duplicate);
    }

    #[test]
    fn test_similarity_threshold() {
        let filter = UniquenessFilter::new(UniquenessConfig::default(), 10);
        let accepted = vec![plan(vec![
            seated("t1", &["a", "b", "c", "d", "e"]),
            seated("t2", &["f", "g", "h", "i", "j"]),
        ])];

        // 8 of 10 at the same table: 0.8 > 0.72
        let close = vec![
            seated("t1", &["a", "b", "c", "d", "f"]),
            seated("t2", &["e", "g", "h", "i", "j"]),
        ];
        assert!(matches!(filter.check(&close, &accepted), Verdict::TooSimilar { .. }));

        // 6 of 10
        let far = vec![
            seated("t1", &["a", "b", "c", "f", "g"]),
            seated("t2", &["d", "e", "h", "i", "j"]),
        ];
        assert!(filter.check(&far, &accepted).is_accept());
    }

    #[test]
    fn test_threshold_loosens() {
        let config = UniquenessConfig::default();
        let small = UniquenessFilter::new(config.clone(), 10);
        let large = UniquenessFilter::new(config, 80);

        assert!((small.threshold(0) - 0.7).abs() < 1e-9);
        assert!(small.threshold(5) > small.threshold(0));
        assert!((large.threshold(0) - 0.8).abs() < 1e-9);
        assert!((large.threshold(100) - 0.95).abs() < 1e-9);
    }

    #[test]
    fn test_nothing_accepted_yet() {
        let filter = UniquenessFilter::new(UniquenessConfig::default(), 1);
        assert!(filter.check(&[seated("t1", &["a"])], &[]).is_accept());
    }
}
