//! Tests for the seating bindings

#[cfg(test)]
mod tests {
    use crate::bridge;
    use seating_core::{ConflictKind, DiagnosticCode, GenerateOutcome, SeatingRequest};

    const PARTY: &str = r#"{
        "guests": [
            {"id": "ada", "name": "Ada Lovelace", "vip": true},
            {"id": "bob", "name": "Bob"},
            {"id": "cy", "name": "Cy", "size": 2},
            {"id": "dee", "name": "Dee"}
        ],
        "tables": [
            {"id": "t1", "name": "Head", "capacity": 3},
            {"id": "t2", "capacity": 3}
        ],
        "constraints": [
            {"a": "ada", "b": "bob", "kind": "must"},
            {"a": "ada", "b": "cy", "kind": "cannot"}
        ],
        "options": {"max_plans": 3}
    }"#;

    #[test]
    fn test_generate_json_roundtrip() {
        let json = bridge::generate_json(PARTY, Some(3)).unwrap();
        let outcome: GenerateOutcome = serde_json::from_str(&json).unwrap();

        assert!(!outcome.plans.is_empty());
        assert!(outcome.plans.len() <= 3);
        for plan in &outcome.plans {
            let ada = plan.table_of(&"ada".into()).unwrap();
            assert!(ada.contains(&"bob".into()));
            assert!(!ada.contains(&"cy".into()));
        }
    }

    #[test]
    fn test_seeded_generation_is_stable() {
        assert_eq!(bridge::generate_json(PARTY, Some(9)), bridge::generate_json(PARTY, Some(9)));
    }

    #[test]
    fn test_invalid_request_is_error_string() {
        let err = bridge::generate_json("{\"guests\": []", Some(1)).unwrap_err();
        assert!(err.starts_with("invalid request"));
    }

    #[test]
    fn test_empty_request_reports_diagnostics() {
        let json = bridge::generate_json(r#"{"guests": [], "tables": []}"#, Some(1)).unwrap();
        let outcome: GenerateOutcome = serde_json::from_str(&json).unwrap();
        assert!(outcome.plans.is_empty());
        assert!(outcome.has_errors());
        assert!(outcome.errors.iter().all(|d| d.code == DiagnosticCode::InvalidInput));
    }

    #[test]
    fn test_conflicts_json() {
        let request = r#"{
            "guests": [{"id": "a", "name": "A"}, {"id": "b", "name": "B"}, {"id": "c", "name": "C"}],
            "tables": [{"id": "t", "capacity": 3}],
            "constraints": [
                {"a": "a", "b": "b", "kind": "must"},
                {"a": "b", "b": "c", "kind": "must"},
                {"a": "c", "b": "a", "kind": "must"}
            ]
        }"#;
        let json = bridge::conflicts_json(request, false).unwrap();
        let conflicts: Vec<seating_core::ConstraintConflict> = serde_json::from_str(&json).unwrap();
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].kind, ConflictKind::Circular);
    }

    #[test]
    fn test_summary_of_best_plan() {
        let request: SeatingRequest = serde_json::from_str(PARTY).unwrap();
        let outcome = bridge::generate(&request, Some(5));
        let text = bridge::summary(outcome.best().unwrap(), &request);
        assert!(text.starts_with("Plan #1"));
        assert!(text.contains("Ada Lovelace"));
        assert!(text.contains("Cy (+1)"));
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm {
    use wasm_bindgen::JsValue;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn test_generate_plans_from_js_object() {
        let request = js_sys::JSON::parse(
            r#"{"guests": [{"id": "a", "name": "A"}], "tables": [{"id": "t", "capacity": 1}]}"#,
        )
        .unwrap();
        let outcome = crate::generate_plans(request, Some(1)).unwrap();
        let plans = js_sys::Reflect::get(&outcome, &JsValue::from_str("plans")).unwrap();
        assert_eq!(js_sys::Array::from(&plans).length(), 1);
    }
}
