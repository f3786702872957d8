//! Boundary traits for the planner.
//!
//! The planning core only consumes a [`PointSet`]; where the points come from
//! is up to the implementor of [`PointSource`].

use std::convert::Infallible;

use crate::model::{PointRecord, PointSet};

/// What to look up: an area, the interest to filter on and how many points
/// the run can use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceQuery {
    /// Area name, e.g. "Shibuya".
    pub area: String,
    /// Enclosing region, e.g. a prefecture.
    pub region: Option<String>,
    /// Interest catalog key.
    pub interest: String,
    /// Maximum number of points to return.
    pub limit: usize,
}

impl PlaceQuery {
    pub fn new(area: impl Into<String>, interest: impl Into<String>, limit: usize) -> Self {
        Self {
            area: area.into(),
            region: None,
            interest: interest.into(),
            limit,
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Human-readable place, e.g. "Shibuya, Tokyo".
    pub fn label(&self) -> String {
        match &self.region {
            Some(region) => format!("{}, {}", self.area, region),
            None => self.area.clone(),
        }
    }
}

/// Supplies a cleaned, deduplicated point set for a query.
pub trait PointSource {
    type Error;

    fn fetch(&self, query: &PlaceQuery) -> Result<PointSet, Self::Error>;
}

/// Serves records held in memory, ignoring the area and interest of the
/// query.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    records: Vec<PointRecord>,
}

impl StaticSource {
    pub fn new(records: Vec<PointRecord>) -> Self {
        Self { records }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        Ok(Self::new(serde_json::from_str(json)?))
    }
}

impl PointSource for StaticSource {
    type Error = Infallible;

    fn fetch(&self, query: &PlaceQuery) -> Result<PointSet, Self::Error> {
        Ok(PointSet::from_records(self.records.iter().cloned(), Some(query.limit)))
    }
}
