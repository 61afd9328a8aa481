//! Boarding pass shown at check-in. Purely presentational data: nothing
//! here affects the timer or the route.

use crate::catalog::CityCatalog;
use crate::defaults;
use crate::planning::FlightPlan;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

pub const FLIGHT_NUMBER: &str = "FF019";
pub const GATE: &str = "12";
pub const SEAT: &str = "7A";
pub const TRAVEL_CLASS: &str = "Focus";
pub const TICKET_SERIAL: &str = "FF-FOCUS-2025";

/// One bar of the stub barcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BarcodeBar {
    pub wide: bool,
    pub faded: bool,
}

impl BarcodeBar {
    pub fn width_px(&self) -> u8 {
        if self.wide {
            2
        } else {
            1
        }
    }

    pub fn opacity(&self) -> f64 {
        if self.faded {
            0.3
        } else {
            1.0
        }
    }
}

/// 31-multiplier string hash over UTF-16 units, so the same route always
/// seeds the same barcode.
pub fn hash_seed(value: &str) -> u32 {
    value
        .encode_utf16()
        .fold(0i32, |hash, unit| hash.wrapping_mul(31).wrapping_add(i32::from(unit)))
        as u32
}

/// A decorative barcode that is stable for a given `seed`.
pub fn barcode_bars(seed: &str) -> Vec<BarcodeBar> {
    let mut rng = StdRng::seed_from_u64(u64::from(hash_seed(seed)));
    (0..defaults::BARCODE_LENGTH)
        .map(|_| BarcodeBar {
            wide: rng.random::<f64>() > 0.5,
            faded: rng.random::<f64>() <= 0.2,
        })
        .collect()
}

/// First word of the passenger's name for the stub, or the whole name if
/// it has no words.
pub fn short_passenger_name(full: &str) -> &str {
    full.split_whitespace().next().unwrap_or(full)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardingPass {
    pub flight_code: String,
    pub origin: String,
    pub destination: String,
    pub origin_city: String,
    pub destination_city: String,
    pub passenger_name: String,
    pub passenger_short: String,
    pub duration_seconds: u32,
    pub barcode: Vec<BarcodeBar>,
}

impl BoardingPass {
    pub fn issue(plan: &FlightPlan, catalog: &CityCatalog, passenger_name: &str) -> Self {
        let city_name = |code: &str, fallback: &str| {
            catalog
                .get(code)
                .map(|c| c.name.clone())
                .unwrap_or_else(|| fallback.to_string())
        };

        Self {
            flight_code: plan.code.clone(),
            origin: plan.origin.clone(),
            destination: plan.destination.clone(),
            origin_city: city_name(&plan.origin, "Origin"),
            destination_city: city_name(&plan.destination, "Destination"),
            passenger_name: passenger_name.to_string(),
            passenger_short: short_passenger_name(passenger_name).to_string(),
            duration_seconds: plan.duration_seconds(),
            barcode: barcode_bars(&plan.route_key()),
        }
    }

    /// City name as it fits on the narrow stub.
    pub fn stub_city(name: &str) -> &str {
        name.split(' ').next().unwrap_or(name)
    }
}
