//! Application-level configuration constants.

// Map camera
pub const DEFAULT_ZOOM: f64 = 6.2;
pub const MIN_ZOOM: f64 = 4.5;
pub const MAX_ZOOM: f64 = 9.0;
pub const ZOOM_STEP: f64 = 0.1;
pub const CAMERA_EASE_MS: u32 = 900;
pub const CAMERA_PITCH: f64 = 48.0;
pub const MAP_STYLE_URL: &str = "https://demotiles.maplibre.org/style.json";
pub const MAP_CONTAINER_ID: &str = "flight-map";

// Boarding
pub const TEAR_DELAY_MS: u32 = 700;
pub const PASSENGER_NAME: &str = "Focus Pilot";
