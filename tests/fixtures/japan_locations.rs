//! Real points of interest in Japan for realistic test fixtures.
//!
//! Coordinates sourced from OpenStreetMap.

#![allow(dead_code)]

use itinerary_planner::{Point, PointSet};

/// A named location with coordinates.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lon: f64,
}

impl Location {
    pub const fn new(name: &'static str, lat: f64, lon: f64) -> Self {
        Self { name, lat, lon }
    }

    pub fn point(&self) -> Point {
        Point::new(self.name, self.lat, self.lon)
    }
}

// ============================================================================
// Tokyo (Taito / Minato / Shibuya / Shinjuku)
// ============================================================================

pub const TOKYO: &[Location] = &[
    Location::new("Senso-ji", 35.7147651, 139.7966553),
    Location::new("Tokyo Skytree", 35.7100627, 139.8107004),
    Location::new("Ueno Zoo", 35.7163549, 139.7713313),
    Location::new("Tokyo National Museum", 35.7188351, 139.7765215),
    Location::new("Tokyo Tower", 35.6585805, 139.7454329),
    Location::new("Zojo-ji", 35.6574356, 139.7484846),
    Location::new("Meiji Jingu", 35.6763976, 139.6993259),
    Location::new("Shibuya Crossing", 35.6594945, 139.7005536),
    Location::new("Shinjuku Gyoen", 35.6851763, 139.7100517),
    Location::new("Imperial Palace East Gardens", 35.6858400, 139.7553980),
    Location::new("Tsukiji Outer Market", 35.6654861, 139.7706668),
    Location::new("Mori Art Museum", 35.6604930, 139.7292590),
];

// ============================================================================
// Kyoto (Higashiyama / Fushimi / Arashiyama)
// ============================================================================

pub const KYOTO: &[Location] = &[
    Location::new("Kiyomizu-dera", 34.9948561, 135.7850463),
    Location::new("Fushimi Inari Taisha", 34.9676945, 135.7791876),
    Location::new("Kinkaku-ji", 35.0393744, 135.7292297),
    Location::new("Ginkaku-ji", 35.0270213, 135.7982058),
    Location::new("Yasaka Shrine", 35.0036559, 135.7785534),
    Location::new("Nijo Castle", 35.0142282, 135.7480603),
    Location::new("Tenryu-ji", 35.0158473, 135.6737606),
    Location::new("Nishiki Market", 35.0050092, 135.7648919),
];

// ============================================================================
// Osaka (Chuo / Naniwa / Minato)
// ============================================================================

pub const OSAKA: &[Location] = &[
    Location::new("Osaka Castle", 34.6873153, 135.5259664),
    Location::new("Dotonbori", 34.6686840, 135.5010390),
    Location::new("Tsutenkaku", 34.6525232, 135.5063061),
    Location::new("Shitenno-ji", 34.6543285, 135.5163409),
    Location::new("Kaiyukan", 34.6545182, 135.4289896),
    Location::new("Umeda Sky Building", 34.7052885, 135.4905517),
    Location::new("Kuromon Market", 34.6652975, 135.5068473),
    Location::new("Sumiyoshi Taisha", 34.6124521, 135.4930981),
];

pub fn point_set(locations: &[Location]) -> PointSet {
    locations.iter().map(Location::point).collect()
}

/// Tokyo, Kyoto and Osaka points interleaved, so input order says nothing
/// about the city.
pub fn interleaved_cities() -> PointSet {
    let mut points = Vec::new();
    let longest = TOKYO.len().max(KYOTO.len()).max(OSAKA.len());
    for i in 0..longest {
        for city in [TOKYO, KYOTO, OSAKA] {
            if let Some(location) = city.get(i) {
                points.push(location.point());
            }
        }
    }
    PointSet::new(points)
}

/// Which city a fixture point belongs to.
pub fn city_of(name: &str) -> Option<&'static str> {
    if TOKYO.iter().any(|l| l.name == name) {
        Some("tokyo")
    } else if KYOTO.iter().any(|l| l.name == name) {
        Some("kyoto")
    } else if OSAKA.iter().any(|l| l.name == name) {
        Some("osaka")
    } else {
        None
    }
}
