//! JavaScript interop for the MapLibre flight map.
//! Provides Rust bindings to the helpers defined in map_helpers.js.

use flight_focus::route::{line_string_feature, FlightSnapshot};
use flight_focus::Coordinate;
use log::warn;
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(module = "/map_helpers.js")]
extern "C" {
    #[wasm_bindgen(js_name = initFlightMap)]
    fn init_flight_map_js(
        container_id: &str,
        style_url: &str,
        origin: JsValue,
        destination: JsValue,
        origin_label: &str,
        destination_label: &str,
        route: JsValue,
        zoom: f64,
        pitch: f64,
    );

    #[wasm_bindgen(js_name = updateFlightMap)]
    fn update_flight_map_js(
        completed: JsValue,
        remaining: JsValue,
        position: JsValue,
        heading: f64,
        zoom: f64,
        ease_ms: u32,
    );

    #[wasm_bindgen(js_name = destroyFlightMap)]
    pub fn destroy_flight_map();
}

/// Serialize into plain JS objects and arrays, never `Map`s, since
/// MapLibre reads GeoJSON as plain objects.
fn to_js<T: Serialize + ?Sized>(value: &T) -> JsValue {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .unwrap_or_else(|e| {
            warn!("Failed to serialize map data: {}", e);
            JsValue::NULL
        })
}

/// Mounts the map in `container_id` with the whole route drawn as unflown.
pub struct MapInit<'a> {
    pub container_id: &'a str,
    pub style_url: &'a str,
    pub origin: Coordinate,
    pub destination: Coordinate,
    pub origin_label: &'a str,
    pub destination_label: &'a str,
    pub route: &'a [Coordinate],
    pub zoom: f64,
    pub pitch: f64,
}

pub fn init_flight_map(init: &MapInit<'_>) {
    init_flight_map_js(
        init.container_id,
        init.style_url,
        to_js(&init.origin),
        to_js(&init.destination),
        init.origin_label,
        init.destination_label,
        to_js(&line_string_feature(init.route)),
        init.zoom,
        init.pitch,
    );
}

/// Redraw both path segments, move the plane and ease the camera onto it.
pub fn update_flight_map(snapshot: &FlightSnapshot, zoom: f64, ease_ms: u32) {
    update_flight_map_js(
        to_js(&line_string_feature(&snapshot.completed)),
        to_js(&line_string_feature(&snapshot.remaining)),
        to_js(&snapshot.position),
        snapshot.heading,
        zoom,
        ease_ms,
    );
}
