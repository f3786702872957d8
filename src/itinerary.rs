//! Itinerary assembler: orders enforced day groups into the final plan.

use std::fmt;
use std::ops::Range;

use serde::Serialize;

use crate::model::{DayAssignment, Point};

/// One visit in the itinerary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stop {
    /// 1-based day index.
    pub day: usize,
    /// Position of the point in the input point set.
    pub index: usize,
    pub point: Point,
}

/// The ordered travel plan: by day ascending, then name, then input order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Itinerary {
    days: usize,
    stops: Vec<Stop>,
}

/// Orders every entry of `assignment` into an itinerary.
pub fn assemble(assignment: &DayAssignment) -> Itinerary {
    let mut stops: Vec<Stop> = assignment
        .entries()
        .iter()
        .map(|entry| Stop {
            day: entry.day,
            index: entry.index,
            point: entry.point.clone(),
        })
        .collect();

    stops.sort_by(|a, b| {
        a.day
            .cmp(&b.day)
            .then_with(|| a.point.name.cmp(&b.point.name))
            .then_with(|| a.index.cmp(&b.index))
    });

    Itinerary {
        days: assignment.days(),
        stops,
    }
}

impl Itinerary {
    pub fn days(&self) -> usize {
        self.days
    }

    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Stops of a single day in visiting order. Empty for days outside
    /// `1..=days`.
    pub fn day(&self, day: usize) -> &[Stop] {
        &self.stops[self.day_range(day)]
    }

    /// Stops of a day paired with their 1-based running number across the
    /// whole itinerary.
    pub fn numbered_day(&self, day: usize) -> impl Iterator<Item = (usize, &Stop)> + '_ {
        let range = self.day_range(day);
        let first = range.start + 1;
        self.stops[range]
            .iter()
            .enumerate()
            .map(move |(offset, stop)| (first + offset, stop))
    }

    /// Every day `1..=days` with its stops, including empty days.
    pub fn iter_days(&self) -> impl Iterator<Item = (usize, &[Stop])> + '_ {
        (1..=self.days).map(move |day| (day, self.day(day)))
    }

    fn day_range(&self, day: usize) -> Range<usize> {
        if day == 0 || day > self.days {
            return 0..0;
        }
        let start = self.stops.partition_point(|stop| stop.day < day);
        let end = self.stops.partition_point(|stop| stop.day <= day);
        start..end
    }
}

impl fmt::Display for Itinerary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for day in 1..=self.days {
            writeln!(f, "Day {}", day)?;
            writeln!(f, "{}", "-".repeat(30))?;
            for (number, stop) in self.numbered_day(day) {
                writeln!(
                    f,
                    "{}. {} ({:.4}, {:.4})",
                    number, stop.point.name, stop.point.lat, stop.point.lon
                )?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
