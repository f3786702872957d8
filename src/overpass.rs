//! Overpass API adapter for fetching points of interest.

use std::collections::HashMap;
use std::time::Instant;

use serde::Deserialize;
use thiserror::Error;

use crate::interests::{InterestCatalog, TagFilter, TagValues};
use crate::model::{PointRecord, PointSet};
use crate::traits::{PlaceQuery, PointSource};

#[derive(Debug, Clone)]
pub struct OverpassConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Tag used to match area names, e.g. "name:en" for romanized names.
    pub area_name_key: String,
}

impl Default for OverpassConfig {
    fn default() -> Self {
        Self {
            base_url: "https://overpass-api.de/api/interpreter".to_string(),
            timeout_secs: 60,
            user_agent: concat!("itinerary-planner/", env!("CARGO_PKG_VERSION")).to_string(),
            area_name_key: "name:en".to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum OverpassError {
    #[error("overpass request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("interest `{0}` has no usable tag filters")]
    NoFilters(String),
}

#[derive(Debug, Clone)]
pub struct OverpassClient {
    config: OverpassConfig,
    catalog: InterestCatalog,
    client: reqwest::blocking::Client,
}

impl OverpassClient {
    pub fn new(config: OverpassConfig, catalog: InterestCatalog) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            config,
            catalog,
            client,
        })
    }

    pub fn catalog(&self) -> &InterestCatalog {
        &self.catalog
    }
}

impl PointSource for OverpassClient {
    type Error = OverpassError;

    fn fetch(&self, query: &PlaceQuery) -> Result<PointSet, Self::Error> {
        let filters = self.catalog.filters_for(&query.interest);
        let ql = build_query(&self.config, query, &filters)
            .ok_or_else(|| OverpassError::NoFilters(query.interest.clone()))?;

        tracing::info!(place = %query.label(), interest = %query.interest, "fetching points of interest");
        let start = Instant::now();

        let body = self
            .client
            .post(self.config.base_url.as_str())
            .form(&[("data", ql)])
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<OverpassResponse>())?;

        let points = PointSet::from_records(node_records(body), Some(query.limit));
        tracing::info!(
            found = points.len(),
            fetch_secs = start.elapsed().as_secs_f64(),
            "fetched places"
        );
        Ok(points)
    }
}

/// Overpass QL for every node inside the queried area matching any filter.
///
/// Returns `None` when no filter can produce a match.
pub fn build_query(config: &OverpassConfig, query: &PlaceQuery, filters: &[TagFilter]) -> Option<String> {
    let selectors: Vec<String> = filters.iter().filter_map(tag_selector).collect();
    if selectors.is_empty() {
        return None;
    }

    let name_key = escape(&config.area_name_key);
    let mut ql = format!("[out:json][timeout:{}];\n", config.timeout_secs);
    ql.push_str(&format!("area[\"{}\"=\"{}\"]->.searchArea;\n", name_key, escape(&query.area)));
    let mut scope = "(area.searchArea)".to_string();
    if let Some(region) = &query.region {
        ql.push_str(&format!("area[\"{}\"=\"{}\"]->.region;\n", name_key, escape(region)));
        scope.push_str("(area.region)");
    }

    ql.push_str("(\n");
    for selector in &selectors {
        ql.push_str(&format!("  node{}{};\n", selector, scope));
    }
    ql.push_str(");\nout body;\n");
    Some(ql)
}

fn tag_selector(filter: &TagFilter) -> Option<String> {
    let key = escape(&filter.key);
    match &filter.values {
        TagValues::Any(true) => Some(format!("[\"{}\"]", key)),
        TagValues::Any(false) => None,
        TagValues::OneOf(values) if values.is_empty() => None,
        TagValues::OneOf(values) => {
            let alternatives: Vec<String> = values.iter().map(|v| regex_escape(v)).collect();
            Some(format!("[\"{}\"~\"^({})$\"]", key, escape(&alternatives.join("|"))))
        }
    }
}

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

fn regex_escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if "\\.^$|?*+()[]{}".contains(c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<OverpassElement>,
}

#[derive(Debug, Deserialize)]
struct OverpassElement {
    #[serde(rename = "type")]
    kind: String,
    lat: Option<f64>,
    lon: Option<f64>,
    #[serde(default)]
    tags: HashMap<String, String>,
}

/// Point records from node elements, in response order.
fn node_records(response: OverpassResponse) -> Vec<PointRecord> {
    response
        .elements
        .into_iter()
        .filter(|element| element.kind == "node")
        .filter_map(|mut element| {
            let (lat, lon) = (element.lat?, element.lon?);
            Some(PointRecord {
                name: element.tags.remove("name"),
                lat,
                lon,
            })
        })
        .collect()
}
