use crate::plan::SeatingPlan;
use crate::types::{GuestId, GuestUnit, Table};
use std::collections::HashMap;
use std::fmt::Write;

/// Human-readable description of one plan.
///
/// Tables are listed in the order of `tables`; guests appear by name with a
/// `(+n)` suffix for parties larger than one.
pub fn summarize(plan: &SeatingPlan, guests: &[GuestUnit], tables: &[Table]) -> String {
    let by_id: HashMap<&GuestId, &GuestUnit> = guests.iter().map(|g| (&g.id, g)).collect();
    let describe = |id: &GuestId| match by_id.get(id) {
        Some(g) if g.size > 1 => format!("{} (+{})", g.name, g.size - 1),
        Some(g) => g.name.clone(),
        None => id.to_string(),
    };

    let mut out = String::new();
    let _ = writeln!(
        out,
        "Plan #{} (score {}, {} strategy)",
        plan.rank, plan.score, plan.strategy
    );
    for note in &plan.notes {
        let _ = writeln!(out, "  note: {}", note);
    }

    for table in tables {
        let Some(seated) = plan.table(&table.id) else {
            continue;
        };
        let names: Vec<String> = seated.guests.iter().map(|g| describe(g)).collect();
        let _ = writeln!(
            out,
            "  {} ({}/{}): {}",
            table.label(),
            seated.occupied(),
            table.capacity,
            if names.is_empty() { "-".to_string() } else { names.join(", ") }
        );
    }

    if !plan.unseated.is_empty() {
        let names: Vec<String> = plan.unseated.iter().map(|g| describe(g)).collect();
        let _ = writeln!(out, "  unseated: {}", names.join(", "));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::SeatedTable;
    use crate::strategy::Strategy;

    #[test]
    fn test_summary_lists_tables_and_unseated() {
        let guests = vec![
            GuestUnit::new("a", "Ada").with_size(2),
            GuestUnit::new("b", "Bob"),
            GuestUnit::new("c", "Cy"),
        ];
        let tables = vec![Table::new("t1", 3).with_name("Head"), Table::new("t2", 2)];

        let mut head = SeatedTable::new(tables[0].clone());
        head.guests = vec![GuestId::from("a"), GuestId::from("b")];
        head.remaining = 0;
        let plan = SeatingPlan {
            rank: 1,
            tables: vec![head, SeatedTable::new(tables[1].clone())],
            unseated: vec![GuestId::from("c")],
            score: 750,
            strategy: Strategy::LargestFirst,
            relaxation: Default::default(),
            notes: vec!["1 guest(s) left unseated".to_string()],
        };

        let text = summarize(&plan, &guests, &tables);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], format!("Plan #1 (score 750, {} strategy)", Strategy::LargestFirst));
        assert_eq!(lines[1], "  note: 1 guest(s) left unseated");
        assert_eq!(lines[2], "  Head (3/3): Ada (+1), Bob");
        assert_eq!(lines[3], "  t2 (0/2): -");
        assert_eq!(lines[4], "  unseated: Cy");
    }
}
