use serde::{Deserialize, Serialize};

/// Configuration for the table search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Placement attempts per search before the ordering is abandoned
    pub max_attempts: usize,
    /// Maximum adjacency partners per guest
    pub max_adjacency_degree: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_attempts: 10_000,
            max_adjacency_degree: 2,
        }
    }
}

/// Weights of the plan score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Multiplied by the fraction of seats filled
    pub seated_weight: f64,
    /// Multiplied by the variance of table utilization
    pub balance_weight: f64,
    pub must_bonus: f64,
    pub cannot_penalty: f64,
    pub adjacency_bonus: f64,
    pub vip_table_bonus: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            seated_weight: 1000.0,
            balance_weight: 200.0,
            must_bonus: 10.0,
            cannot_penalty: 50.0,
            adjacency_bonus: 5.0,
            vip_table_bonus: 15.0,
        }
    }
}

/// Similarity limits for accepting a new plan.
///
/// The allowed overlap is
/// `min(ceiling, base_threshold + accepted * per_plan_step + large_list_bonus)`,
/// where the bonus only applies once the guest list reaches `large_list_size`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UniquenessConfig {
    pub base_threshold: f64,
    pub per_plan_step: f64,
    pub large_list_size: usize,
    pub large_list_bonus: f64,
    pub ceiling: f64,
}

impl Default for UniquenessConfig {
    fn default() -> Self {
        Self {
            base_threshold: 0.7,
            per_plan_step: 0.02,
            large_list_size: 50,
            large_list_bonus: 0.1,
            ceiling: 0.95,
        }
    }
}

/// Configuration for plan generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub solver: SolverConfig,
    pub scoring: ScoringConfig,
    pub uniqueness: UniquenessConfig,
    /// Extra diversity attempts granted per guest unit
    pub extra_attempts_per_guest: usize,
    /// Upper bound on extra diversity attempts
    pub extra_attempts_cap: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            solver: SolverConfig::default(),
            scoring: ScoringConfig::default(),
            uniqueness: UniquenessConfig::default(),
            extra_attempts_per_guest: 2,
            extra_attempts_cap: 200,
        }
    }
}

impl EngineConfig {
    /// Small budgets, for interactive previews
    pub fn quick() -> Self {
        Self {
            solver: SolverConfig {
                max_attempts: 2_000,
                ..SolverConfig::default()
            },
            extra_attempts_per_guest: 1,
            extra_attempts_cap: 40,
            ..Self::default()
        }
    }

    /// Large budgets and stricter diversity
    pub fn thorough() -> Self {
        Self {
            solver: SolverConfig {
                max_attempts: 50_000,
                ..SolverConfig::default()
            },
            uniqueness: UniquenessConfig {
                base_threshold: 0.6,
                ..UniquenessConfig::default()
            },
            extra_attempts_per_guest: 5,
            extra_attempts_cap: 1_000,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"solver":{"max_attempts":5},"extra_attempts_cap":3}"#).unwrap();
        assert_eq!(config.solver.max_attempts, 5);
        assert_eq!(config.solver.max_adjacency_degree, 2);
        assert_eq!(config.extra_attempts_cap, 3);
        assert_eq!(config.scoring, ScoringConfig::default());
    }

    #[test]
    fn test_presets_scale_budgets() {
        let quick = EngineConfig::quick();
        let thorough = EngineConfig::thorough();
        assert!(quick.solver.max_attempts < EngineConfig::default().solver.max_attempts);
        assert!(thorough.extra_attempts_cap > EngineConfig::default().extra_attempts_cap);
        assert!(thorough.uniqueness.base_threshold < quick.uniqueness.base_threshold);
    }
}
