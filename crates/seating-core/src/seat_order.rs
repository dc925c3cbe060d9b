use crate::types::{Adjacency, GuestId, GuestUnit};
use std::collections::HashSet;

/// Display order for the guests at one table.
///
/// Starts from the first VIP (or the first guest), then repeatedly steps to an
/// unplaced adjacency partner of the current guest, falling back to the next
/// unplaced guest in the given order. Only affects presentation.
pub fn order_seats(table_guests: &[GuestId], guests: &[GuestUnit], adjacency: &Adjacency) -> Vec<GuestId> {
    if table_guests.len() < 2 {
        return table_guests.to_vec();
    }

    let vips: HashSet<&GuestId> = guests.iter().filter(|g| g.vip).map(|g| &g.id).collect();
    let here: HashSet<&GuestId> = table_guests.iter().collect();
    let mut placed: HashSet<&GuestId> = HashSet::with_capacity(table_guests.len());
    let mut order = Vec::with_capacity(table_guests.len());

    let mut current = table_guests
        .iter()
        .find(|g| vips.contains(g))
        .unwrap_or(&table_guests[0]);

    loop {
        placed.insert(current);
        order.push(current.clone());
        if order.len() == table_guests.len() {
            break;
        }

        let neighbour = adjacency
            .partners(current)
            .find(|p| here.contains(p) && !placed.contains(p));
        let next = match neighbour {
            Some(n) => Some(n),
            None => {
                // Chains are walked from an end, so jump to one when possible
                let unplaced: Vec<&GuestId> = table_guests.iter().filter(|g| !placed.contains(g)).collect();
                unplaced
                    .iter()
                    .copied()
                    .find(|g| {
                        adjacency
                            .partners(g)
                            .filter(|p| here.contains(p) && !placed.contains(p))
                            .count()
                            <= 1
                    })
                    .or_else(|| unplaced.first().copied())
            }
        };

        match next {
            Some(next) => current = next,
            None => break,
        }
    }

    order
}
