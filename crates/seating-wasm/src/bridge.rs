//! Plain-Rust side of the bindings, usable without a JS host

use seating_core::{
    detect_conflicts, summarize, ConstraintConflict, GenerateOutcome, Planner, SeatingPlan, SeatingRequest,
};

/// Run generation, seeded when `seed` is given
pub fn generate(request: &SeatingRequest, seed: Option<u64>) -> GenerateOutcome {
    let mut planner = match seed {
        Some(seed) => Planner::with_seed(seed),
        None => Planner::new(),
    };
    planner.generate_request(request)
}

pub fn conflicts(request: &SeatingRequest, check_adjacency: bool) -> Vec<ConstraintConflict> {
    detect_conflicts(
        &request.guests,
        &request.tables,
        &request.constraints,
        check_adjacency,
        &request.adjacency,
    )
}

pub fn summary(plan: &SeatingPlan, request: &SeatingRequest) -> String {
    summarize(plan, &request.guests, &request.tables)
}

/// JSON in, JSON out; malformed requests become an error string
pub fn generate_json(request: &str, seed: Option<u64>) -> Result<String, String> {
    let request: SeatingRequest = serde_json::from_str(request).map_err(|e| format!("invalid request: {}", e))?;
    let outcome = generate(&request, seed);
    serde_json::to_string(&outcome).map_err(|e| e.to_string())
}

pub fn conflicts_json(request: &str, check_adjacency: bool) -> Result<String, String> {
    let request: SeatingRequest = serde_json::from_str(request).map_err(|e| format!("invalid request: {}", e))?;
    serde_json::to_string(&conflicts(&request, check_adjacency)).map_err(|e| e.to_string())
}
