//! Capacity enforcer: trims over-full days with a seeded uniform sample.

use rand::SeedableRng;
use rand::seq::index;
use rand_chacha::ChaCha8Rng;

use crate::model::DayAssignment;

/// Default seed for the per-day sample.
pub const DEFAULT_SAMPLE_SEED: u64 = 42;

/// Caps every day at `max_per_day` points.
///
/// A day over the cap keeps a uniform random sample of exactly
/// `max_per_day` of its points, drawn from a generator seeded with `seed`
/// afresh for that day. The rest are dropped from the run; nothing moves to
/// another day. Retained points keep their input order. A cap of zero empties
/// every day.
pub fn enforce(assignment: &DayAssignment, max_per_day: usize, seed: u64) -> DayAssignment {
    let entries = assignment.entries();
    let mut keep = vec![true; entries.len()];

    for day in 1..=assignment.days() {
        let members: Vec<usize> = entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.day == day)
            .map(|(position, _)| position)
            .collect();
        if members.len() <= max_per_day {
            continue;
        }

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut retained = vec![false; members.len()];
        for i in index::sample(&mut rng, members.len(), max_per_day).into_iter() {
            retained[i] = true;
        }
        for (&position, retained) in members.iter().zip(retained) {
            keep[position] = retained;
        }

        tracing::debug!(
            day,
            kept = max_per_day,
            dropped = members.len() - max_per_day,
            "day over capacity"
        );
    }

    let kept = entries
        .iter()
        .zip(keep)
        .filter(|(_, keep)| *keep)
        .map(|(entry, _)| entry.clone())
        .collect();

    DayAssignment::from_entries(assignment.days(), kept)
}
