//! Basic example of using the seating engine

use seating_core::{
    detect_conflicts, summarize, Adjacency, Constraints, GenerateOptions, GuestUnit, Planner, Table,
};

fn main() {
    let guests = vec![
        GuestUnit::new("ada", "Ada Lovelace").with_vip(true),
        GuestUnit::new("charles", "Charles Babbage"),
        GuestUnit::new("grace", "Grace Hopper").with_size(2),
        GuestUnit::new("alan", "Alan Turing"),
        GuestUnit::new("edsger", "Edsger Dijkstra"),
        GuestUnit::new("barbara", "Barbara Liskov"),
        GuestUnit::new("donald", "Donald Knuth"),
    ];
    let tables = vec![
        Table::new("t1", 4).with_name("Head table"),
        Table::new("t2", 4),
        Table::new("t3", 2),
    ];

    let constraints = Constraints::new()
        .with_must("ada", "charles")
        .with_cannot("alan", "edsger")
        .with_cannot("grace", "donald");
    let adjacency = Adjacency::new().with_link("barbara", "donald");

    // Check for conflicts first
    let conflicts = detect_conflicts(&guests, &tables, &constraints, true, &adjacency);
    println!("Conflicts found: {}", conflicts.len());
    for conflict in &conflicts {
        println!("  [{}] {}", conflict.severity, conflict.description);
    }

    // Generate plans
    println!("\nGenerating seating plans...\n");
    let mut planner = Planner::with_seed(2024);
    let outcome = planner.generate(
        &guests,
        &tables,
        &constraints,
        &adjacency,
        GenerateOptions {
            allow_partial: false,
            max_plans: 3,
        },
    );

    for diagnostic in &outcome.errors {
        println!("{}", diagnostic);
    }
    for plan in &outcome.plans {
        println!("{}", summarize(plan, &guests, &tables));
    }
    if outcome.plans.is_empty() {
        println!("No seating plan could be generated");
    }
}
