//! Spatial partitioner: seeded k-means over point coordinates.
//!
//! Runs Lloyd's algorithm on the flat (lat, lon) plane with k-means++
//! seeding. Several restarts run in parallel, each with its own seed derived
//! from [`KMeansOptions::seed`], and the restart with the lowest inertia is
//! kept. Identical input and options always give the same partition.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use crate::error::{PlanError, PlanResult};
use crate::geo::planar_sq;
use crate::model::{DayAssignment, Point, PointSet};

#[derive(Debug, Clone)]
pub struct KMeansOptions {
    /// Seed of the first restart; restart `r` uses `seed + r`.
    pub seed: u64,
    /// Number of independent restarts.
    pub restarts: usize,
    /// Maximum Lloyd iterations per restart.
    pub max_iterations: usize,
    /// Convergence tolerance, relative to the mean per-axis variance.
    pub tolerance: f64,
}

impl Default for KMeansOptions {
    fn default() -> Self {
        Self {
            seed: 42,
            restarts: 10,
            max_iterations: 300,
            tolerance: 1e-4,
        }
    }
}

#[derive(Debug, Clone)]
struct Run {
    labels: Vec<usize>,
    inertia: f64,
    iterations: usize,
}

/// Groups `points` into `days` clusters of nearby points.
///
/// Fails only when `days == 0`. With no points the assignment is empty; with
/// no more points than days each point gets its own day. Days are numbered
/// by first appearance in input order, so the first point is always on day 1.
pub fn partition(points: &PointSet, days: usize, options: &KMeansOptions) -> PlanResult<DayAssignment> {
    if days == 0 {
        return Err(PlanError::zero_days());
    }
    if points.is_empty() {
        return Ok(DayAssignment::empty(days));
    }

    let coords: Vec<(f64, f64)> = points.iter().map(Point::coords).collect();
    if coords.len() <= days {
        let labels: Vec<usize> = (1..=coords.len()).collect();
        return DayAssignment::from_labels(points, days, &labels);
    }

    let Some(run) = best_run(&coords, days, options) else {
        return Ok(DayAssignment::empty(days));
    };
    tracing::debug!(
        days,
        points = coords.len(),
        inertia = run.inertia,
        iterations = run.iterations,
        "k-means converged"
    );

    let labels = renumber_by_first_appearance(&run.labels, days);
    DayAssignment::from_labels(points, days, &labels)
}

fn best_run(coords: &[(f64, f64)], k: usize, options: &KMeansOptions) -> Option<Run> {
    let threshold = options.tolerance * mean_variance(coords);
    let max_iterations = options.max_iterations.max(1);

    (0..options.restarts.max(1))
        .into_par_iter()
        .map(|restart| {
            let seed = options.seed.wrapping_add(restart as u64);
            lloyd(coords, k, seed, max_iterations, threshold)
        })
        // Keeps the earlier restart on equal inertia.
        .reduce_with(|best, run| if run.inertia < best.inertia { run } else { best })
}

fn lloyd(coords: &[(f64, f64)], k: usize, seed: u64, max_iterations: usize, threshold: f64) -> Run {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut centers = init_plus_plus(coords, k, &mut rng);
    let mut labels = vec![usize::MAX; coords.len()];
    let mut iterations = 0;

    while iterations < max_iterations {
        iterations += 1;
        let changed = assign(coords, &centers, &mut labels);
        let updated = recompute(coords, &labels, &centers);
        let shift: f64 = centers
            .iter()
            .zip(&updated)
            .map(|(old, new)| planar_sq(*old, *new))
            .sum();
        centers = updated;
        if !changed || shift <= threshold {
            break;
        }
    }

    // Labels must match the final centers.
    assign(coords, &centers, &mut labels);
    let inertia = coords
        .iter()
        .zip(&labels)
        .map(|(coord, &label)| planar_sq(*coord, centers[label]))
        .sum();

    Run {
        labels,
        inertia,
        iterations,
    }
}

/// k-means++ seeding: each new center is drawn with probability proportional
/// to its squared distance from the nearest center chosen so far.
fn init_plus_plus(coords: &[(f64, f64)], k: usize, rng: &mut ChaCha8Rng) -> Vec<(f64, f64)> {
    let n = coords.len();
    let mut centers = Vec::with_capacity(k);
    centers.push(coords[rng.gen_range(0..n)]);

    let mut nearest: Vec<f64> = coords.iter().map(|c| planar_sq(*c, centers[0])).collect();

    while centers.len() < k {
        let total: f64 = nearest.iter().sum();
        let next = if total > 0.0 {
            let mut target = rng.gen_range(0.0..total);
            let mut chosen = None;
            let mut last_positive = 0;
            for (i, &weight) in nearest.iter().enumerate() {
                if weight <= 0.0 {
                    continue;
                }
                last_positive = i;
                if target < weight {
                    chosen = Some(i);
                    break;
                }
                target -= weight;
            }
            chosen.unwrap_or(last_positive)
        } else {
            // Every point coincides with a center already.
            rng.gen_range(0..n)
        };

        let center = coords[next];
        centers.push(center);
        for (dist, coord) in nearest.iter_mut().zip(coords) {
            *dist = dist.min(planar_sq(*coord, center));
        }
    }

    centers
}

/// Moves every point to its nearest center. Ties go to the lower center
/// index. Returns whether any label changed.
fn assign(coords: &[(f64, f64)], centers: &[(f64, f64)], labels: &mut [usize]) -> bool {
    let mut changed = false;
    for (coord, label) in coords.iter().zip(labels.iter_mut()) {
        let mut best = 0;
        let mut best_dist = f64::INFINITY;
        for (i, center) in centers.iter().enumerate() {
            let dist = planar_sq(*coord, *center);
            if dist < best_dist {
                best = i;
                best_dist = dist;
            }
        }
        if *label != best {
            *label = best;
            changed = true;
        }
    }
    changed
}

/// Cluster means. An empty cluster keeps its previous center.
fn recompute(coords: &[(f64, f64)], labels: &[usize], centers: &[(f64, f64)]) -> Vec<(f64, f64)> {
    let mut sums = vec![(0.0, 0.0); centers.len()];
    let mut counts = vec![0usize; centers.len()];
    for (coord, &label) in coords.iter().zip(labels) {
        sums[label].0 += coord.0;
        sums[label].1 += coord.1;
        counts[label] += 1;
    }

    centers
        .iter()
        .zip(sums.iter().zip(&counts))
        .map(|(old, (sum, &count))| {
            if count == 0 {
                *old
            } else {
                (sum.0 / count as f64, sum.1 / count as f64)
            }
        })
        .collect()
}

fn mean_variance(coords: &[(f64, f64)]) -> f64 {
    let n = coords.len() as f64;
    if n == 0.0 {
        return 0.0;
    }
    let (sum_lat, sum_lon) = coords
        .iter()
        .fold((0.0, 0.0), |(a, b), c| (a + c.0, b + c.1));
    let (mean_lat, mean_lon) = (sum_lat / n, sum_lon / n);
    let (var_lat, var_lon) = coords.iter().fold((0.0, 0.0), |(a, b), c| {
        (a + (c.0 - mean_lat).powi(2), b + (c.1 - mean_lon).powi(2))
    });
    (var_lat / n + var_lon / n) / 2.0
}

/// Maps 0-based cluster labels to 1-based days in order of first appearance.
/// Clusters that never appear take the remaining days in label order.
fn renumber_by_first_appearance(labels: &[usize], k: usize) -> Vec<usize> {
    let mut day_of = vec![0usize; k];
    let mut next = 1;
    for &label in labels {
        if day_of[label] == 0 {
            day_of[label] = next;
            next += 1;
        }
    }
    for day in day_of.iter_mut().filter(|day| **day == 0) {
        *day = next;
        next += 1;
    }
    labels.iter().map(|&label| day_of[label]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(coords: &[(f64, f64)]) -> PointSet {
        coords
            .iter()
            .enumerate()
            .map(|(i, (lat, lon))| Point::new(format!("p{}", i), *lat, *lon))
            .collect()
    }

    fn days_of(assignment: &DayAssignment) -> Vec<usize> {
        assignment.entries().iter().map(|e| e.day).collect()
    }

    #[test]
    fn test_zero_days_rejected() {
        let points = set(&[(35.0, 139.0)]);
        let err = partition(&points, 0, &KMeansOptions::default()).unwrap_err();
        assert!(matches!(err, PlanError::InvalidParameter { name: "days", .. }));
    }

    #[test]
    fn test_empty_points() {
        let assignment = partition(&PointSet::default(), 3, &KMeansOptions::default()).unwrap();
        assert!(assignment.is_empty());
        assert_eq!(assignment.days(), 3);
    }

    #[test]
    fn test_fewer_points_than_days() {
        let points = set(&[(35.0, 139.0), (34.0, 135.0)]);
        let assignment = partition(&points, 4, &KMeansOptions::default()).unwrap();
        assert_eq!(days_of(&assignment), vec![1, 2]);
        assert_eq!(assignment.group_sizes(), vec![1, 1, 0, 0]);
    }

    #[test]
    fn test_separates_distant_clusters() {
        let points = set(&[
            (34.00, 135.00),
            (35.00, 139.00),
            (34.01, 135.01),
            (35.01, 139.01),
            (34.02, 135.00),
            (35.00, 139.02),
        ]);
        let assignment = partition(&points, 2, &KMeansOptions::default()).unwrap();
        assert_eq!(days_of(&assignment), vec![1, 2, 1, 2, 1, 2]);
    }

    #[test]
    fn test_identical_coordinates_collapse_to_first_day() {
        let points = set(&[(35.0, 139.0); 5]);
        let assignment = partition(&points, 3, &KMeansOptions::default()).unwrap();
        assert_eq!(assignment.group_sizes(), vec![5, 0, 0]);
    }

    #[test]
    fn test_deterministic_for_same_seed() {
        let coords: Vec<(f64, f64)> = (0..40)
            .map(|i| {
                let f = i as f64;
                (35.0 + (f * 0.37).sin() * 0.1, 139.0 + (f * 0.91).cos() * 0.1)
            })
            .collect();
        let points = set(&coords);
        let options = KMeansOptions::default();
        let first = partition(&points, 4, &options).unwrap();
        let second = partition(&points, 4, &options).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_single_restart_matches_lloyd_seed() {
        let coords = vec![(0.0, 0.0), (0.0, 1.0), (10.0, 0.0), (10.0, 1.0), (5.0, 20.0)];
        let options = KMeansOptions {
            restarts: 1,
            ..KMeansOptions::default()
        };
        let threshold = options.tolerance * mean_variance(&coords);
        let direct = lloyd(&coords, 3, options.seed, options.max_iterations, threshold);
        let best = best_run(&coords, 3, &options).unwrap();
        assert_eq!(direct.labels, best.labels);
    }

    #[test]
    fn test_assign_breaks_ties_toward_lower_center() {
        let centers = vec![(0.0, 1.0), (0.0, -1.0)];
        let mut labels = vec![usize::MAX];
        assert!(assign(&[(0.0, 0.0)], &centers, &mut labels));
        assert_eq!(labels, vec![0]);
        assert!(!assign(&[(0.0, 0.0)], &centers, &mut labels));
    }

    #[test]
    fn test_recompute_keeps_empty_center() {
        let coords = vec![(0.0, 0.0), (2.0, 2.0)];
        let centers = vec![(1.0, 1.0), (50.0, 50.0)];
        let updated = recompute(&coords, &[0, 0], &centers);
        assert_eq!(updated, vec![(1.0, 1.0), (50.0, 50.0)]);
    }

    #[test]
    fn test_renumber_by_first_appearance() {
        assert_eq!(renumber_by_first_appearance(&[2, 0, 2, 1], 3), vec![1, 2, 1, 3]);
        assert_eq!(renumber_by_first_appearance(&[1, 1], 3), vec![1, 1]);
    }

    #[test]
    fn test_plus_plus_picks_distinct_centers() {
        let coords = vec![(0.0, 0.0), (0.0, 0.0), (5.0, 5.0)];
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let centers = init_plus_plus(&coords, 2, &mut rng);
        assert_eq!(centers.len(), 2);
        assert_ne!(centers[0], centers[1]);
    }
}
