//! Points of interest and the day assignment built from them.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{PlanError, PlanResult};

/// A named geographic location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

impl Point {
    pub fn new(name: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            name: name.into(),
            lat,
            lon,
        }
    }

    /// Location coordinates (lat, lon).
    pub fn coords(&self) -> (f64, f64) {
        (self.lat, self.lon)
    }
}

/// A raw record as handed over by a data source, before cleaning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointRecord {
    #[serde(default)]
    pub name: Option<String>,
    pub lat: f64,
    pub lon: f64,
}

impl PointRecord {
    pub fn new(name: Option<&str>, lat: f64, lon: f64) -> Self {
        Self {
            name: name.map(str::to_string),
            lat,
            lon,
        }
    }
}

/// Ordered, immutable sequence of points for a single planning run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PointSet {
    points: Vec<Point>,
}

impl PointSet {
    /// Wraps points that were already cleaned by their producer.
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Cleans loader output into a point set.
    ///
    /// Records without a name or with coordinates outside the valid range are
    /// skipped, names are deduplicated keeping the first occurrence, and the
    /// result is truncated to `limit` points.
    pub fn from_records<I>(records: I, limit: Option<usize>) -> Self
    where
        I: IntoIterator<Item = PointRecord>,
    {
        let limit = limit.unwrap_or(usize::MAX);
        let mut seen: HashSet<String> = HashSet::new();
        let mut points = Vec::new();
        let mut skipped = 0usize;

        for record in records {
            if points.len() >= limit {
                break;
            }
            let name = match record.name.as_deref().map(str::trim) {
                Some(name) if !name.is_empty() => name.to_string(),
                _ => {
                    skipped += 1;
                    continue;
                }
            };
            if !valid_coords(record.lat, record.lon) {
                skipped += 1;
                continue;
            }
            if !seen.insert(name.clone()) {
                continue;
            }
            points.push(Point::new(name, record.lat, record.lon));
        }

        if skipped > 0 {
            tracing::warn!(skipped, "skipped records without a name or valid coordinates");
        }

        Self { points }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Point> {
        self.points.iter()
    }

    pub fn into_points(self) -> Vec<Point> {
        self.points
    }
}

impl FromIterator<Point> for PointSet {
    fn from_iter<T: IntoIterator<Item = Point>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

fn valid_coords(lat: f64, lon: f64) -> bool {
    lat.is_finite() && lon.is_finite() && (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon)
}

/// A single point placed on a day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assignment {
    /// Position of the point in the input point set.
    pub index: usize,
    pub point: Point,
    /// 1-based day index.
    pub day: usize,
}

/// Every point of a run mapped to exactly one day in `1..=days`.
///
/// Entries stay in input order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayAssignment {
    days: usize,
    entries: Vec<Assignment>,
}

impl DayAssignment {
    /// An assignment with no points.
    pub fn empty(days: usize) -> Self {
        Self {
            days,
            entries: Vec::new(),
        }
    }

    /// Builds an assignment from one 1-based day label per point.
    pub fn from_labels(points: &PointSet, days: usize, labels: &[usize]) -> PlanResult<Self> {
        if days == 0 {
            return Err(PlanError::zero_days());
        }
        if labels.len() != points.len() {
            return Err(PlanError::InvalidParameter {
                name: "labels",
                reason: format!("expected {} labels, got {}", points.len(), labels.len()),
            });
        }

        let mut entries = Vec::with_capacity(points.len());
        for (index, (point, &day)) in points.iter().zip(labels).enumerate() {
            if day == 0 || day > days {
                return Err(PlanError::DayOutOfRange { day, days });
            }
            entries.push(Assignment {
                index,
                point: point.clone(),
                day,
            });
        }

        Ok(Self { days, entries })
    }

    pub(crate) fn from_entries(days: usize, entries: Vec<Assignment>) -> Self {
        Self { days, entries }
    }

    pub fn days(&self) -> usize {
        self.days
    }

    pub fn entries(&self) -> &[Assignment] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries placed on `day`, in input order.
    pub fn group(&self, day: usize) -> impl Iterator<Item = &Assignment> + '_ {
        self.entries.iter().filter(move |entry| entry.day == day)
    }

    /// Point count per day; element 0 is day 1.
    pub fn group_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.days];
        for entry in &self.entries {
            sizes[entry.day - 1] += 1;
        }
        sizes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, lat: f64, lon: f64) -> PointRecord {
        PointRecord::new(Some(name), lat, lon)
    }

    #[test]
    fn test_from_records_dedupes_by_name() {
        let set = PointSet::from_records(
            vec![
                record("Senso-ji", 35.7148, 139.7967),
                record("Senso-ji", 35.7150, 139.7970),
                record("Tokyo Tower", 35.6586, 139.7454),
            ],
            None,
        );
        assert_eq!(set.len(), 2);
        assert_eq!(set.points()[0].lat, 35.7148, "first occurrence wins");
    }

    #[test]
    fn test_from_records_skips_unnamed_and_out_of_range() {
        let set = PointSet::from_records(
            vec![
                PointRecord::new(None, 35.0, 139.0),
                record("   ", 35.0, 139.0),
                record("Bad Lat", 91.0, 139.0),
                record("Bad Lon", 35.0, f64::NAN),
                record("Meiji Jingu", 35.6764, 139.6993),
            ],
            None,
        );
        let names: Vec<&str> = set.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Meiji Jingu"]);
    }

    #[test]
    fn test_from_records_truncates_after_cleaning() {
        let records = (0..10).map(|i| record(&format!("p{}", i % 5), 35.0, 139.0 + i as f64 * 0.01));
        let set = PointSet::from_records(records, Some(3));
        let names: Vec<&str> = set.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["p0", "p1", "p2"]);
    }

    #[test]
    fn test_from_labels_rejects_out_of_range_day() {
        let set = PointSet::new(vec![Point::new("a", 1.0, 1.0), Point::new("b", 2.0, 2.0)]);
        let err = DayAssignment::from_labels(&set, 2, &[1, 3]).unwrap_err();
        assert_eq!(err, PlanError::DayOutOfRange { day: 3, days: 2 });

        let err = DayAssignment::from_labels(&set, 2, &[0, 1]).unwrap_err();
        assert_eq!(err, PlanError::DayOutOfRange { day: 0, days: 2 });
    }

    #[test]
    fn test_from_labels_requires_one_label_per_point() {
        let set = PointSet::new(vec![Point::new("a", 1.0, 1.0)]);
        assert!(matches!(
            DayAssignment::from_labels(&set, 1, &[]),
            Err(PlanError::InvalidParameter { name: "labels", .. })
        ));
    }

    #[test]
    fn test_group_sizes_include_empty_days() {
        let set = PointSet::new(vec![
            Point::new("a", 1.0, 1.0),
            Point::new("b", 2.0, 2.0),
            Point::new("c", 3.0, 3.0),
        ]);
        let assignment = DayAssignment::from_labels(&set, 4, &[3, 1, 3]).unwrap();
        assert_eq!(assignment.group_sizes(), vec![1, 0, 2, 0]);
        let day3: Vec<usize> = assignment.group(3).map(|e| e.index).collect();
        assert_eq!(day3, vec![0, 2]);
    }
}
