//! Test fixtures for itinerary-planner.
//!
//! Provides real points of interest in Tokyo, Kyoto and Osaka (from
//! OpenStreetMap) and helpers to turn them into point sets.

pub mod japan_locations;

pub use japan_locations::*;
