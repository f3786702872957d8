//! Per-day route geometry for map presentation.
//!
//! A [`DayRoute`] carries what a map front-end needs for one day: a marker
//! per stop and the path connecting the stops in visiting order. Rendering
//! happens outside this crate; [`DayRoute::to_geojson`] is the hand-off
//! format.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::geo::path_length_km;
use crate::itinerary::Itinerary;

/// A route geometry as decoded coordinates.
///
/// Stores latitude/longitude points directly; any compact encoding belongs
/// to the consumer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<(f64, f64)>,
}

impl Polyline {
    /// Creates a new Polyline from (latitude, longitude) points.
    pub fn new(points: Vec<(f64, f64)>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    pub fn into_points(self) -> Vec<(f64, f64)> {
        self.points
    }

    /// Great-circle length in kilometers.
    pub fn length_km(&self) -> f64 {
        path_length_km(&self.points)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    /// Popup text, e.g. `"3. Senso-ji"`.
    pub label: String,
    pub tooltip: String,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayRoute {
    pub day: usize,
    pub markers: Vec<Marker>,
    pub path: Polyline,
    pub distance_km: f64,
}

impl DayRoute {
    /// Route for one day, or `None` when the day has no stops.
    pub fn for_day(itinerary: &Itinerary, day: usize) -> Option<Self> {
        let markers: Vec<Marker> = itinerary
            .numbered_day(day)
            .map(|(number, stop)| Marker {
                label: format!("{}. {}", number, stop.point.name),
                tooltip: stop.point.name.clone(),
                lat: stop.point.lat,
                lon: stop.point.lon,
            })
            .collect();
        if markers.is_empty() {
            return None;
        }

        let path = Polyline::new(markers.iter().map(|m| (m.lat, m.lon)).collect());
        let distance_km = path.length_km();

        Some(Self {
            day,
            markers,
            path,
            distance_km,
        })
    }

    /// First stop of the day, used as the map center.
    pub fn start(&self) -> (f64, f64) {
        self.path.points()[0]
    }

    /// GeoJSON `FeatureCollection`: one `Point` per marker and a `LineString`
    /// for the path. Coordinates are `[lon, lat]`.
    pub fn to_geojson(&self) -> Value {
        let mut features: Vec<Value> = self
            .markers
            .iter()
            .map(|marker| {
                json!({
                    "type": "Feature",
                    "geometry": { "type": "Point", "coordinates": [marker.lon, marker.lat] },
                    "properties": {
                        "day": self.day,
                        "label": marker.label,
                        "tooltip": marker.tooltip,
                    },
                })
            })
            .collect();

        let line: Vec<[f64; 2]> = self.path.points().iter().map(|(lat, lon)| [*lon, *lat]).collect();
        features.push(json!({
            "type": "Feature",
            "geometry": { "type": "LineString", "coordinates": line },
            "properties": { "day": self.day, "distance_km": self.distance_km },
        }));

        json!({ "type": "FeatureCollection", "features": features })
    }
}

/// Routes for every non-empty day, in day order.
pub fn routes(itinerary: &Itinerary) -> Vec<DayRoute> {
    (1..=itinerary.days())
        .filter_map(|day| DayRoute::for_day(itinerary, day))
        .collect()
}
