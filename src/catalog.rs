//! Static city records and the flight schedule built from them.
//!
//! City data ships inside the binary as CSV and is parsed once per process.
//! Records are validated here so the rest of the crate can trust them.

use crate::planning::{FlightPlan, FlightProfile};
use crate::{Coordinate, FlightError};
use log::{debug, error, info};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

static IATA_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z]{3}$").unwrap());

static BUILTIN_CATALOG: Lazy<Result<CityCatalog, FlightError>> = Lazy::new(|| {
    let result = read_cities_from_csv_str(include_str!("data/cities.csv")).map(CityCatalog::new);
    match &result {
        Ok(catalog) => info!("Loaded {} cities", catalog.len()),
        Err(e) => error!("Built-in city data is invalid: {}", e),
    }
    result
});

/// Flight code, origin IATA, destination IATA.
pub const SCHEDULE: [(&str, &str, &str); 3] = [
    ("FOCUS101", "TPE", "HND"),
    ("FOCUS202", "ICN", "HKG"),
    ("FOCUS303", "SFO", "LAX"),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub id: String,
    pub name: String,
    pub iata_code: String,
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: String,
    pub region_id: String,
}

impl City {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.longitude, self.latitude)
    }

    fn validate(&self, record: usize) -> Result<(), FlightError> {
        let invalid = |reason: String| FlightError::InvalidCity { record, reason };

        if !IATA_REGEX.is_match(&self.iata_code) {
            return Err(invalid(format!("bad IATA code {:?}", self.iata_code)));
        }
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(invalid(format!("latitude {} out of range", self.latitude)));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(invalid(format!("longitude {} out of range", self.longitude)));
        }
        Ok(())
    }
}

/// Parse city records from CSV with a header row.
///
/// Fails on the first malformed record or repeated IATA code; `record` in
/// the error is 1-based and excludes the header.
pub fn read_cities_from_csv_str(csv_content: &str) -> Result<Vec<City>, FlightError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(csv_content.as_bytes());

    let mut cities = Vec::new();
    let mut seen = HashMap::new();

    for (i, row) in reader.deserialize::<City>().enumerate() {
        let record = i + 1;
        let city = row?;
        city.validate(record)?;
        if let Some(first) = seen.insert(city.iata_code.clone(), record) {
            return Err(FlightError::InvalidCity {
                record,
                reason: format!("IATA code {} already used by record {}", city.iata_code, first),
            });
        }
        debug!("City {} ({}) at {}", city.name, city.iata_code, city.coordinate());
        cities.push(city);
    }

    Ok(cities)
}

/// Read-only lookup of cities by IATA code.
#[derive(Debug, Clone, PartialEq)]
pub struct CityCatalog {
    cities: Vec<City>,
    by_iata: HashMap<String, usize>,
}

impl CityCatalog {
    pub fn new(cities: Vec<City>) -> Self {
        let by_iata = cities
            .iter()
            .enumerate()
            .map(|(i, c)| (c.iata_code.clone(), i))
            .collect();
        Self { cities, by_iata }
    }

    pub fn get(&self, iata_code: &str) -> Option<&City> {
        self.by_iata.get(iata_code).map(|&i| &self.cities[i])
    }

    pub fn require(&self, iata_code: &str) -> Result<&City, FlightError> {
        self.get(iata_code)
            .ok_or_else(|| FlightError::UnknownAirport(iata_code.to_string()))
    }

    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    /// Resolve `schedule` entries into ticket records.
    pub fn plan_flights(
        &self,
        schedule: &[(&str, &str, &str)],
        profile: &FlightProfile,
    ) -> Result<Vec<FlightPlan>, FlightError> {
        schedule
            .iter()
            .map(|&(code, origin, destination)| {
                let origin = self.require(origin)?;
                let destination = self.require(destination)?;
                Ok(FlightPlan::new(code, origin, destination, profile))
            })
            .collect()
    }
}

/// The catalog compiled into the app.
pub fn builtin_catalog() -> Result<&'static CityCatalog, FlightError> {
    (*BUILTIN_CATALOG).as_ref().map_err(|e| e.clone())
}

/// The built-in schedule priced with `profile`.
pub fn builtin_flights(profile: &FlightProfile) -> Result<Vec<FlightPlan>, FlightError> {
    builtin_catalog()?.plan_flights(&SCHEDULE, profile)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "id,name,iata_code,latitude,longitude,timezone,region_id\n";

    #[test]
    fn builtin_data_loads() {
        let catalog = builtin_catalog().unwrap();
        assert!(catalog.len() >= 6);
        let tpe = catalog.get("TPE").unwrap();
        assert_eq!(tpe.name, "Taipei");
        assert_eq!(tpe.coordinate(), Coordinate::new(121.233, 25.08));
        assert!(catalog.get("XXX").is_none());
    }

    #[test]
    fn builtin_schedule_resolves() {
        let flights = builtin_flights(&FlightProfile::default()).unwrap();
        let codes: Vec<_> = flights.iter().map(|f| f.code.as_str()).collect();
        assert_eq!(codes, ["FOCUS101", "FOCUS202", "FOCUS303"]);

        assert_eq!(flights[0].route_key(), "TPE-HND");
        assert_eq!(flights[0].focus_minutes, 45);
        assert_eq!(flights[1].focus_minutes, 45);
        assert_eq!(flights[2].focus_minutes, 25);
    }

    #[test]
    fn whitespace_is_trimmed() {
        let csv = format!("{}x, Somewhere , ABC , 1.5 , 2.5 , UTC , r\n", HEADER);
        let cities = read_cities_from_csv_str(&csv).unwrap();
        assert_eq!(cities[0].name, "Somewhere");
        assert_eq!(cities[0].iata_code, "ABC");
        assert_eq!(cities[0].coordinate(), Coordinate::new(2.5, 1.5));
    }

    #[test]
    fn rejects_bad_iata_code() {
        let csv = format!("{}a,A,AAA,0,0,UTC,r\nb,B,bb1,0,0,UTC,r\n", HEADER);
        match read_cities_from_csv_str(&csv) {
            Err(FlightError::InvalidCity { record, .. }) => assert_eq!(record, 2),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn rejects_out_of_range_coordinates() {
        let csv = format!("{}a,A,AAA,91,0,UTC,r\n", HEADER);
        assert!(matches!(
            read_cities_from_csv_str(&csv),
            Err(FlightError::InvalidCity { record: 1, .. })
        ));
        let csv = format!("{}a,A,AAA,0,-181,UTC,r\n", HEADER);
        assert!(read_cities_from_csv_str(&csv).is_err());
    }

    #[test]
    fn rejects_duplicate_codes() {
        let csv = format!("{}a,A,AAA,0,0,UTC,r\nb,B,AAA,1,1,UTC,r\n", HEADER);
        match read_cities_from_csv_str(&csv) {
            Err(FlightError::InvalidCity { record, reason }) => {
                assert_eq!(record, 2);
                assert!(reason.contains("record 1"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn non_numeric_latitude_is_a_csv_error() {
        let csv = format!("{}a,A,AAA,north,0,UTC,r\n", HEADER);
        assert!(matches!(
            read_cities_from_csv_str(&csv),
            Err(FlightError::Csv(_))
        ));
    }

    #[test]
    fn unknown_airport_in_schedule() {
        let catalog = builtin_catalog().unwrap();
        let err = catalog
            .plan_flights(&[("BAD1", "TPE", "ZZZ")], &FlightProfile::default())
            .unwrap_err();
        assert_eq!(err, FlightError::UnknownAirport("ZZZ".to_string()));
    }
}
