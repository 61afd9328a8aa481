//! Maps flight distance to a flight time, and flight time to the length of
//! the focus session sold on the ticket.

use crate::catalog::City;
use crate::route::great_circle_distance;
use crate::{defaults, Coordinate, FlightError};
use serde::Serialize;

/// A focus-session length offered for flights up to `max_flight_hours`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FocusBucket {
    pub max_flight_hours: f64,
    pub focus_minutes: u32,
}

/// Ordered by increasing `max_flight_hours`.
pub const FOCUS_BUCKETS: [FocusBucket; 5] = [
    FocusBucket {
        max_flight_hours: 1.5,
        focus_minutes: 25,
    },
    FocusBucket {
        max_flight_hours: 4.0,
        focus_minutes: 45,
    },
    FocusBucket {
        max_flight_hours: 8.0,
        focus_minutes: 60,
    },
    FocusBucket {
        max_flight_hours: 14.0,
        focus_minutes: 90,
    },
    FocusBucket {
        max_flight_hours: 24.0,
        focus_minutes: 120,
    },
];

/// Block time in minutes: cruise time plus a fixed taxi allowance, rounded.
pub fn estimate_flight_minutes(distance_km: f64, cruise_kmh: f64, taxi_minutes: f64) -> u32 {
    debug_assert!(cruise_kmh > 0.0, "cruise speed must be positive");
    let minutes = (distance_km / cruise_kmh * 60.0 + taxi_minutes).round();
    minutes.max(0.0) as u32
}

/// Smallest bucket whose ceiling covers the flight. Flights longer than the
/// last ceiling still get the longest session.
pub fn map_to_focus_minutes(flight_minutes: u32) -> u32 {
    let flight_hours = f64::from(flight_minutes) / 60.0;
    FOCUS_BUCKETS
        .iter()
        .find(|bucket| flight_hours <= bucket.max_flight_hours)
        .unwrap_or(&FOCUS_BUCKETS[FOCUS_BUCKETS.len() - 1])
        .focus_minutes
}

/// Cruise speed and taxi allowance used to price a flight in minutes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightProfile {
    cruise_kmh: f64,
    taxi_minutes: f64,
}

impl FlightProfile {
    pub fn new(cruise_kmh: f64, taxi_minutes: f64) -> Result<Self, FlightError> {
        if !(cruise_kmh.is_finite() && cruise_kmh > 0.0)
            || !(taxi_minutes.is_finite() && taxi_minutes >= 0.0)
        {
            return Err(FlightError::InvalidProfile {
                cruise_kmh,
                taxi_minutes,
            });
        }
        Ok(Self {
            cruise_kmh,
            taxi_minutes,
        })
    }

    pub fn cruise_kmh(&self) -> f64 {
        self.cruise_kmh
    }

    pub fn taxi_minutes(&self) -> f64 {
        self.taxi_minutes
    }

    pub fn flight_minutes(&self, distance_km: f64) -> u32 {
        estimate_flight_minutes(distance_km, self.cruise_kmh, self.taxi_minutes)
    }
}

impl Default for FlightProfile {
    fn default() -> Self {
        Self {
            cruise_kmh: defaults::CRUISE_KMH,
            taxi_minutes: defaults::TAXI_MINUTES,
        }
    }
}

/// A bookable flight: the ticket record shown on the route picker and the
/// boarding pass. Derived once from city data and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightPlan {
    pub code: String,
    pub origin: String,
    pub destination: String,
    pub origin_coord: Coordinate,
    pub destination_coord: Coordinate,
    pub distance_km: f64,
    pub flight_minutes: u32,
    pub focus_minutes: u32,
}

impl FlightPlan {
    pub fn new(code: &str, origin: &City, destination: &City, profile: &FlightProfile) -> Self {
        let origin_coord = origin.coordinate();
        let destination_coord = destination.coordinate();
        let distance_km = great_circle_distance(origin_coord, destination_coord);
        let flight_minutes = profile.flight_minutes(distance_km);

        Self {
            code: code.to_string(),
            origin: origin.iata_code.clone(),
            destination: destination.iata_code.clone(),
            origin_coord,
            destination_coord,
            distance_km,
            flight_minutes,
            focus_minutes: map_to_focus_minutes(flight_minutes),
        }
    }

    pub fn duration_seconds(&self) -> u32 {
        self.focus_minutes * 60
    }

    /// Seed for anything that should look the same every time this route
    /// is shown, e.g. the barcode.
    pub fn route_key(&self) -> String {
        format!("{}-{}", self.origin, self.destination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn city(iata: &str, lon: f64, lat: f64) -> City {
        City {
            id: iata.to_lowercase(),
            name: iata.to_string(),
            iata_code: iata.to_string(),
            latitude: lat,
            longitude: lon,
            timezone: "UTC".to_string(),
            region_id: "test".to_string(),
        }
    }

    #[test]
    fn zero_distance_still_taxis() {
        assert_eq!(estimate_flight_minutes(0.0, 900.0, 45.0), 45);
    }

    #[test]
    fn flight_minutes_round_to_nearest() {
        // 900 km at 900 km/h is an hour
        assert_eq!(estimate_flight_minutes(900.0, 900.0, 45.0), 105);
        // 7.5 km is half a minute, rounds up
        assert_eq!(estimate_flight_minutes(7.5, 900.0, 0.0), 1);
        assert_eq!(estimate_flight_minutes(7.4, 900.0, 0.0), 0);
    }

    #[test]
    fn focus_buckets() {
        assert_eq!(map_to_focus_minutes(50), 25);
        assert_eq!(map_to_focus_minutes(90), 25);
        assert_eq!(map_to_focus_minutes(91), 45);
        assert_eq!(map_to_focus_minutes(200), 45);
        assert_eq!(map_to_focus_minutes(8 * 60), 60);
        assert_eq!(map_to_focus_minutes(13 * 60), 90);
        assert_eq!(map_to_focus_minutes(24 * 60), 120);
    }

    #[test]
    fn long_flights_clamp_to_longest_session() {
        assert_eq!(map_to_focus_minutes(1500), 120);
        assert_eq!(map_to_focus_minutes(u32::MAX), 120);
    }

    #[test]
    fn profile_rejects_non_positive_cruise() {
        assert!(FlightProfile::new(0.0, 45.0).is_err());
        assert!(FlightProfile::new(-10.0, 45.0).is_err());
        assert!(FlightProfile::new(900.0, -1.0).is_err());
        assert!(FlightProfile::new(f64::NAN, 45.0).is_err());
        assert_eq!(FlightProfile::new(900.0, 45.0).unwrap(), FlightProfile::default());
    }

    #[test]
    fn plan_derives_duration_from_distance() {
        let sfo = city("SFO", -122.38, 37.62);
        let lax = city("LAX", -118.4, 33.94);
        let plan = FlightPlan::new("FOCUS303", &sfo, &lax, &FlightProfile::default());

        assert_eq!(plan.origin, "SFO");
        assert_eq!(plan.destination, "LAX");
        assert!(plan.distance_km > 500.0 && plan.distance_km < 580.0);
        assert_eq!(plan.flight_minutes, 81);
        assert_eq!(plan.focus_minutes, 25);
        assert_eq!(plan.duration_seconds(), 25 * 60);
        assert_eq!(plan.route_key(), "SFO-LAX");
    }

    #[test]
    fn slower_profile_buys_longer_focus() {
        let tpe = city("TPE", 121.233, 25.08);
        let hnd = city("HND", 139.78, 35.55);
        let fast = FlightPlan::new("X", &tpe, &hnd, &FlightProfile::default());
        let slow = FlightPlan::new("X", &tpe, &hnd, &FlightProfile::new(300.0, 45.0).unwrap());
        assert_eq!(fast.focus_minutes, 45);
        assert!(slow.focus_minutes > fast.focus_minutes);
    }
}
