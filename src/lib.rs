//! Core logic for the Flight Focus timer: route geometry, the focus timer,
//! flight-duration mapping, the city catalog and the boarding flow.
//!
//! Everything in this crate is pure and synchronous so it can be unit tested
//! natively; the Yew binary wires it to the browser.

use serde::{Deserialize, Serialize};
use std::fmt;
use wasm_bindgen::prelude::*;

pub mod boarding;
pub mod catalog;
pub mod planning;
pub mod route;
pub mod session;
pub mod timer;

/// Default parameters shared by the app and the JS exports.
pub mod defaults {
    /// Points generated per route, minus one.
    pub const ROUTE_STEPS: usize = 180;
    /// Fraction of the larger lon/lat span used to bow the route.
    pub const ARC_FACTOR: f64 = 0.18;
    pub const EARTH_RADIUS_KM: f64 = 6371.0;
    pub const CRUISE_KMH: f64 = 900.0;
    pub const TAXI_MINUTES: f64 = 45.0;
    pub const BARCODE_LENGTH: usize = 40;
}

/// A longitude/latitude pair in degrees.
///
/// Serialized as `[lon, lat]`, the order GeoJSON and MapLibre expect.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinate {
    pub lon: f64,
    pub lat: f64,
}

impl Coordinate {
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Whether both components lie within `tolerance` of `other`.
    pub fn approx_eq(&self, other: &Coordinate, tolerance: f64) -> bool {
        (self.lon - other.lon).abs() <= tolerance && (self.lat - other.lat).abs() <= tolerance
    }
}

impl From<[f64; 2]> for Coordinate {
    fn from([lon, lat]: [f64; 2]) -> Self {
        Self { lon, lat }
    }
}

impl From<Coordinate> for [f64; 2] {
    fn from(c: Coordinate) -> Self {
        [c.lon, c.lat]
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.4}, {:.4})", self.lon, self.lat)
    }
}

/// Errors raised when a caller hands the core invalid input.
#[derive(Debug, Clone, PartialEq)]
pub enum FlightError {
    /// A curved route needs at least one step.
    InvalidSteps(usize),
    /// Focus sessions must last at least one second.
    InvalidDuration(u32),
    /// Routes need at least two points.
    RouteTooShort(usize),
    /// Distance table built for a different route.
    MismatchedTable { route_len: usize, table_len: usize },
    InvalidProfile { cruise_kmh: f64, taxi_minutes: f64 },
    InvalidCity { record: usize, reason: String },
    UnknownAirport(String),
    Csv(String),
}

impl fmt::Display for FlightError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlightError::InvalidSteps(steps) => {
                write!(f, "Route needs at least one step, got {}", steps)
            }
            FlightError::InvalidDuration(seconds) => {
                write!(f, "Focus duration must be positive, got {}s", seconds)
            }
            FlightError::RouteTooShort(len) => {
                write!(f, "Route needs at least 2 points, got {}", len)
            }
            FlightError::MismatchedTable { route_len, table_len } => write!(
                f,
                "Distance table has {} entries but the route has {} points",
                table_len, route_len
            ),
            FlightError::InvalidProfile {
                cruise_kmh,
                taxi_minutes,
            } => write!(
                f,
                "Invalid flight profile: cruise {} km/h, taxi {} min",
                cruise_kmh, taxi_minutes
            ),
            FlightError::InvalidCity { record, reason } => {
                write!(f, "City record {} is invalid: {}", record, reason)
            }
            FlightError::UnknownAirport(code) => write!(f, "Unknown airport code {}", code),
            FlightError::Csv(msg) => write!(f, "Failed to read city data: {}", msg),
        }
    }
}

impl std::error::Error for FlightError {}

impl From<csv::Error> for FlightError {
    fn from(err: csv::Error) -> Self {
        FlightError::Csv(err.to_string())
    }
}

/// Format whole seconds as `MM:SS`, or `H:MM:SS` from one hour up.
pub fn format_clock(total_seconds: u32) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}

/// Builds a route between two points and samples it at `progress`.
///
/// Exposed to JavaScript so the map layer can be driven without the Yew app.
/// Returns a serialized [`route::FlightSnapshot`], or an error message string.
#[wasm_bindgen(js_name = flightSnapshot)]
pub fn flight_snapshot(
    origin_lon: f64,
    origin_lat: f64,
    destination_lon: f64,
    destination_lat: f64,
    steps: usize,
    progress: f64,
) -> JsValue {
    let origin = Coordinate::new(origin_lon, origin_lat);
    let destination = Coordinate::new(destination_lon, destination_lat);

    match route::RoutePlan::between(origin, destination, steps) {
        Ok(plan) => serde_wasm_bindgen::to_value(&plan.snapshot(progress)).unwrap_or(JsValue::NULL),
        Err(e) => serde_wasm_bindgen::to_value(&format!("Route failed: {}", e))
            .unwrap_or(JsValue::NULL),
    }
}

/// Focus minutes for a flight of `distance_km` at the default cruise profile.
#[wasm_bindgen(js_name = focusMinutesForDistance)]
pub fn focus_minutes_for_distance(distance_km: f64) -> u32 {
    let flight_minutes = planning::estimate_flight_minutes(
        distance_km,
        defaults::CRUISE_KMH,
        defaults::TAXI_MINUTES,
    );
    planning::map_to_focus_minutes(flight_minutes)
}
