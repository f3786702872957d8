//! itinerary-planner core
//!
//! Splits points of interest into day groups by proximity, caps each day and
//! orders the result into a travel plan.

pub mod error;
pub mod model;
pub mod geo;
pub mod partition;
pub mod capacity;
pub mod itinerary;
pub mod planner;
pub mod route;
pub mod traits;
pub mod interests;
pub mod overpass;

pub use error::{PlanError, PlanResult};
pub use itinerary::{Itinerary, Stop, assemble};
pub use model::{DayAssignment, Point, PointRecord, PointSet};
pub use planner::{PlanOptions, plan, plan_many};
