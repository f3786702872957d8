//! The planning pipeline: partition, enforce capacity, assemble.

use rayon::prelude::*;

use crate::capacity::{DEFAULT_SAMPLE_SEED, enforce};
use crate::error::{PlanError, PlanResult};
use crate::itinerary::{Itinerary, assemble};
use crate::model::PointSet;
use crate::partition::{KMeansOptions, partition};

#[derive(Debug, Clone)]
pub struct PlanOptions {
    /// Maximum visits per day.
    pub max_per_day: usize,
    /// Seed for the per-day capacity sample.
    pub sample_seed: u64,
    /// Minimum places per day the boundary asks for before planning.
    pub min_per_day: usize,
    pub kmeans: KMeansOptions,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            max_per_day: 6,
            sample_seed: DEFAULT_SAMPLE_SEED,
            min_per_day: 3,
            kmeans: KMeansOptions::default(),
        }
    }
}

/// Builds the itinerary for `points` over `days` days.
///
/// Fails only when `days == 0`; sparse or empty input yields a sparse or
/// empty itinerary.
pub fn plan(points: &PointSet, days: usize, options: &PlanOptions) -> PlanResult<Itinerary> {
    if days == 0 {
        return Err(PlanError::zero_days());
    }

    tracing::info!("clustering {} places into {} days", points.len(), days);
    let assignment = partition(points, days, &options.kmeans)?;
    let enforced = enforce(&assignment, options.max_per_day, options.sample_seed);
    if enforced.len() < assignment.len() {
        tracing::info!(
            dropped = assignment.len() - enforced.len(),
            max_per_day = options.max_per_day,
            "dropped places over the daily cap"
        );
    }

    Ok(assemble(&enforced))
}

/// Plans the same points for several trip lengths in parallel. Results are in
/// the order of `day_counts`.
pub fn plan_many(points: &PointSet, day_counts: &[usize], options: &PlanOptions) -> Vec<PlanResult<Itinerary>> {
    day_counts
        .par_iter()
        .map(|&days| plan(points, days, options))
        .collect()
}

/// Number of points a loader should fetch for a run.
pub fn place_limit(days: usize, max_per_day: usize) -> usize {
    days.saturating_mul(max_per_day)
}

/// Boundary check that enough places were found for the trip length.
pub fn check_sufficient(found: usize, days: usize, min_per_day: usize) -> PlanResult<()> {
    if days == 0 {
        return Err(PlanError::zero_days());
    }
    let required = days.saturating_mul(min_per_day);
    if found < required {
        return Err(PlanError::InsufficientData { found, days, required });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Point;

    #[test]
    fn test_place_limit() {
        assert_eq!(place_limit(3, 6), 18);
        assert_eq!(place_limit(usize::MAX, 2), usize::MAX);
    }

    #[test]
    fn test_check_sufficient() {
        assert!(check_sufficient(9, 3, 3).is_ok());
        assert_eq!(
            check_sufficient(8, 3, 3),
            Err(PlanError::InsufficientData {
                found: 8,
                days: 3,
                required: 9
            })
        );
        assert!(matches!(
            check_sufficient(10, 0, 3),
            Err(PlanError::InvalidParameter { name: "days", .. })
        ));
    }

    #[test]
    fn test_plan_zero_days_fails_fast() {
        let points = PointSet::new(vec![Point::new("a", 35.0, 139.0)]);
        assert!(plan(&points, 0, &PlanOptions::default()).is_err());
    }

    #[test]
    fn test_plan_many_keeps_request_order() {
        let points: PointSet = (0..12)
            .map(|i| Point::new(format!("p{:02}", i), 35.0 + i as f64 * 0.01, 139.0))
            .collect();
        let results = plan_many(&points, &[3, 0, 1], &PlanOptions::default());
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().days(), 3);
        assert!(results[1].is_err());
        assert_eq!(results[2].as_ref().unwrap().len(), 6);
    }
}
