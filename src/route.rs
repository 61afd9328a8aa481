//! Route geometry: a curved path between two airports, its cumulative
//! distance table, and position/heading lookup by progress fraction.
//!
//! The curve is a quadratic Bézier in lon/lat space bowed north of the
//! midpoint. It exaggerates the path for the map, it is not a geodesic.

use crate::{defaults, Coordinate, FlightError};
use log::debug;
use serde::Serialize;
use serde_json::json;

/// Ordered points from origin to destination. Always holds at least two.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    points: Vec<Coordinate>,
}

impl Route {
    pub fn from_points(points: Vec<Coordinate>) -> Result<Self, FlightError> {
        if points.len() < 2 {
            return Err(FlightError::RouteTooShort(points.len()));
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn origin(&self) -> Coordinate {
        self.points[0]
    }

    pub fn destination(&self) -> Coordinate {
        self.points[self.points.len() - 1]
    }
}

/// Cumulative great-circle distance in km at each route point.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceTable {
    distances: Vec<f64>,
}

impl DistanceTable {
    pub fn distances(&self) -> &[f64] {
        &self.distances
    }

    pub fn len(&self) -> usize {
        self.distances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }

    pub fn total_km(&self) -> f64 {
        self.distances.last().copied().unwrap_or(0.0)
    }
}

/// Where the plane is at a given progress fraction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RoutePosition {
    pub position: Coordinate,
    /// Degrees clockwise from north, in `[0, 360)`.
    pub heading: f64,
    /// Index of the route point preceding `position`.
    pub segment_index: usize,
}

/// The flown and unflown halves of a route, split at the plane.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SplitRoute {
    pub completed: Vec<Coordinate>,
    pub remaining: Vec<Coordinate>,
}

/// Everything the map needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightSnapshot {
    pub position: Coordinate,
    pub heading: f64,
    pub segment_index: usize,
    pub completed: Vec<Coordinate>,
    pub remaining: Vec<Coordinate>,
}

/// Sample `steps + 1` points along a curve from `origin` to `destination`.
pub fn build_curved_route(
    origin: Coordinate,
    destination: Coordinate,
    steps: usize,
) -> Result<Route, FlightError> {
    if steps == 0 {
        return Err(FlightError::InvalidSteps(steps));
    }

    if origin == destination {
        return Route::from_points(vec![origin; steps + 1]);
    }

    let mid_lon = (origin.lon + destination.lon) / 2.0;
    let mid_lat = (origin.lat + destination.lat) / 2.0;
    let span = (destination.lon - origin.lon)
        .abs()
        .max((destination.lat - origin.lat).abs());
    let control = Coordinate::new(mid_lon, mid_lat + span * defaults::ARC_FACTOR);

    let points = (0..=steps)
        .map(|i| {
            let t = i as f64 / steps as f64;
            let u = 1.0 - t;
            Coordinate::new(
                u * u * origin.lon + 2.0 * u * t * control.lon + t * t * destination.lon,
                u * u * origin.lat + 2.0 * u * t * control.lat + t * t * destination.lat,
            )
        })
        .collect();

    Route::from_points(points)
}

/// Haversine distance in km.
pub fn great_circle_distance(a: Coordinate, b: Coordinate) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();

    let h = (d_lat / 2.0).sin() * (d_lat / 2.0).sin()
        + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin() * (d_lon / 2.0).sin();
    // rounding can push h a hair past 1 for antipodal points
    2.0 * defaults::EARTH_RADIUS_KM * h.min(1.0).sqrt().asin()
}

pub fn build_distance_table(route: &Route) -> DistanceTable {
    let mut distances = Vec::with_capacity(route.len());
    distances.push(0.0);
    for pair in route.points().windows(2) {
        let prev = distances[distances.len() - 1];
        distances.push(prev + great_circle_distance(pair[0], pair[1]));
    }
    DistanceTable { distances }
}

/// Initial bearing (forward azimuth) from `a` to `b`, in `[0, 360)`.
pub fn bearing(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let d_lon = (b.lon - a.lon).to_radians();

    let y = d_lon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lon.cos();

    // not rem_euclid: that returns 360.0 for tiny negative angles
    (y.atan2(x).to_degrees() + 360.0) % 360.0
}

/// Position and heading after `progress` of the route's length has been flown.
pub fn interpolate_along_route(
    route: &Route,
    table: &DistanceTable,
    progress: f64,
) -> Result<RoutePosition, FlightError> {
    if route.len() != table.len() {
        return Err(FlightError::MismatchedTable {
            route_len: route.len(),
            table_len: table.len(),
        });
    }
    Ok(interpolate_unchecked(route.points(), table.distances(), progress))
}

fn interpolate_unchecked(points: &[Coordinate], distances: &[f64], progress: f64) -> RoutePosition {
    let clamped = if progress.is_nan() {
        0.0
    } else {
        progress.clamp(0.0, 1.0)
    };
    let total = distances[distances.len() - 1];
    let target = total * clamped;

    // first index not less than target
    let mut index = distances.partition_point(|&d| d < target);
    if index == distances.len() {
        index = distances.len() - 1;
    }

    if index == 0 {
        let next = points.get(1).copied().unwrap_or(points[0]);
        return RoutePosition {
            position: points[0],
            heading: bearing(points[0], next),
            segment_index: 0,
        };
    }

    let prev_distance = distances[index - 1];
    let mut segment_distance = distances[index] - prev_distance;
    if segment_distance == 0.0 {
        segment_distance = 1.0;
    }
    let segment_progress = (target - prev_distance) / segment_distance;

    let start = points[index - 1];
    let end = points[index];
    RoutePosition {
        position: Coordinate::new(
            start.lon + (end.lon - start.lon) * segment_progress,
            start.lat + (end.lat - start.lat) * segment_progress,
        ),
        heading: bearing(start, end),
        segment_index: index - 1,
    }
}

/// Split the route at the plane's position for two-tone rendering.
pub fn split_route_at(route: &Route, segment_index: usize, position: Coordinate) -> SplitRoute {
    let cut = (segment_index + 1).min(route.len());

    let mut completed = Vec::with_capacity(cut + 1);
    completed.extend_from_slice(&route.points()[..cut]);
    completed.push(position);

    let mut remaining = Vec::with_capacity(route.len() - cut + 1);
    remaining.push(position);
    remaining.extend_from_slice(&route.points()[cut..]);

    SplitRoute {
        completed,
        remaining,
    }
}

/// GeoJSON `LineString` feature for the map. A single point is doubled so
/// the renderer always gets a drawable line.
pub fn line_string_feature(points: &[Coordinate]) -> serde_json::Value {
    let coordinates: Vec<[f64; 2]> = match points {
        [only] => vec![(*only).into(), (*only).into()],
        _ => points.iter().map(|&c| c.into()).collect(),
    };
    json!({
        "type": "Feature",
        "geometry": {
            "type": "LineString",
            "coordinates": coordinates,
        },
        "properties": {},
    })
}

/// A route paired with its distance table, built once per airport pair.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutePlan {
    route: Route,
    table: DistanceTable,
}

impl RoutePlan {
    pub fn between(
        origin: Coordinate,
        destination: Coordinate,
        steps: usize,
    ) -> Result<Self, FlightError> {
        let route = build_curved_route(origin, destination, steps)?;
        let table = build_distance_table(&route);
        debug!(
            "Built route {} -> {}: {} points, {:.1} km",
            origin,
            destination,
            route.len(),
            table.total_km()
        );
        Ok(Self { route, table })
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn table(&self) -> &DistanceTable {
        &self.table
    }

    pub fn total_km(&self) -> f64 {
        self.table.total_km()
    }

    pub fn position_at(&self, progress: f64) -> RoutePosition {
        // lengths match by construction
        interpolate_unchecked(self.route.points(), self.table.distances(), progress)
    }

    pub fn snapshot(&self, progress: f64) -> FlightSnapshot {
        let at = self.position_at(progress);
        let SplitRoute {
            completed,
            remaining,
        } = split_route_at(&self.route, at.segment_index, at.position);
        FlightSnapshot {
            position: at.position,
            heading: at.heading,
            segment_index: at.segment_index,
            completed,
            remaining,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TPE: Coordinate = Coordinate::new(121.233, 25.08);
    const HND: Coordinate = Coordinate::new(139.78, 35.55);
    const SFO: Coordinate = Coordinate::new(-122.38, 37.62);
    const LAX: Coordinate = Coordinate::new(-118.4, 33.94);

    const EPS: f64 = 1e-9;

    fn straight(points: &[(f64, f64)]) -> Route {
        Route::from_points(points.iter().map(|&(lon, lat)| Coordinate::new(lon, lat)).collect())
            .unwrap()
    }

    #[test]
    fn distance_is_symmetric_and_zero_only_for_same_point() {
        let pairs = [(TPE, HND), (SFO, LAX), (TPE, LAX), (HND, SFO)];
        for (a, b) in pairs {
            let ab = great_circle_distance(a, b);
            let ba = great_circle_distance(b, a);
            assert!((ab - ba).abs() < EPS, "{} vs {}", ab, ba);
            assert!(ab > 0.0);
        }
        assert_eq!(great_circle_distance(TPE, TPE), 0.0);
    }

    #[test]
    fn distance_matches_known_city_pair() {
        // SFO-LAX is roughly 540 km
        let d = great_circle_distance(SFO, LAX);
        assert!((500.0..580.0).contains(&d), "got {}", d);
    }

    #[test]
    fn antipodal_distance_is_half_circumference() {
        let d = great_circle_distance(Coordinate::new(0.0, 0.0), Coordinate::new(180.0, 0.0));
        let half = std::f64::consts::PI * defaults::EARTH_RADIUS_KM;
        assert!((d - half).abs() < 1e-6);
    }

    #[test]
    fn curved_route_has_expected_endpoints_and_length() {
        for steps in [1, 2, 10, 180] {
            let route = build_curved_route(TPE, HND, steps).unwrap();
            assert_eq!(route.len(), steps + 1);
            assert!(route.origin().approx_eq(&TPE, EPS));
            assert!(route.destination().approx_eq(&HND, EPS));
        }
    }

    #[test]
    fn curved_route_bows_north_of_the_chord() {
        let route = build_curved_route(TPE, HND, 100).unwrap();
        let mid = route.points()[50];
        let chord_lat = (TPE.lat + HND.lat) / 2.0;
        assert!(mid.lat > chord_lat);
    }

    #[test]
    fn curved_route_is_deterministic() {
        let a = build_curved_route(SFO, LAX, 64).unwrap();
        let b = build_curved_route(SFO, LAX, 64).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn same_origin_and_destination_collapse() {
        let route = build_curved_route(TPE, TPE, 8).unwrap();
        assert_eq!(route.len(), 9);
        assert!(route.points().iter().all(|&p| p == TPE));

        let table = build_distance_table(&route);
        assert_eq!(table.total_km(), 0.0);
        let at = interpolate_along_route(&route, &table, 0.7).unwrap();
        assert_eq!(at.position, TPE);
        assert_eq!(at.segment_index, 0);
    }

    #[test]
    fn zero_steps_is_rejected() {
        assert_eq!(
            build_curved_route(TPE, HND, 0),
            Err(FlightError::InvalidSteps(0))
        );
    }

    #[test]
    fn single_point_route_is_rejected() {
        assert_eq!(
            Route::from_points(vec![TPE]),
            Err(FlightError::RouteTooShort(1))
        );
    }

    #[test]
    fn distance_table_is_running_sum() {
        let route = build_curved_route(TPE, HND, 50).unwrap();
        let table = build_distance_table(&route);
        assert_eq!(table.len(), route.len());
        assert_eq!(table.distances()[0], 0.0);
        for (i, w) in table.distances().windows(2).enumerate() {
            assert!(w[1] >= w[0]);
            let seg = great_circle_distance(route.points()[i], route.points()[i + 1]);
            assert!((w[1] - w[0] - seg).abs() < 1e-6);
        }
        // the bowed path is longer than the direct hop
        assert!(table.total_km() > great_circle_distance(TPE, HND));
    }

    #[test]
    fn bearing_cardinal_directions() {
        let origin = Coordinate::new(0.0, 0.0);
        assert!((bearing(origin, Coordinate::new(0.0, 10.0)) - 0.0).abs() < EPS);
        assert!((bearing(origin, Coordinate::new(10.0, 0.0)) - 90.0).abs() < EPS);
        assert!((bearing(origin, Coordinate::new(0.0, -10.0)) - 180.0).abs() < EPS);
        assert!((bearing(origin, Coordinate::new(-10.0, 0.0)) - 270.0).abs() < EPS);
        assert_eq!(bearing(origin, origin), 0.0);
    }

    #[test]
    fn bearing_stays_in_range() {
        let route = build_curved_route(HND, SFO, 90).unwrap();
        for w in route.points().windows(2) {
            let b = bearing(w[0], w[1]);
            assert!((0.0..360.0).contains(&b), "bearing {} out of range", b);
        }
    }

    #[test]
    fn interpolation_hits_both_ends() {
        let route = build_curved_route(TPE, HND, 180).unwrap();
        let table = build_distance_table(&route);

        let start = interpolate_along_route(&route, &table, 0.0).unwrap();
        assert_eq!(start.position, route.origin());
        assert_eq!(start.segment_index, 0);
        assert!((start.heading - bearing(route.points()[0], route.points()[1])).abs() < EPS);

        let end = interpolate_along_route(&route, &table, 1.0).unwrap();
        assert!(end.position.approx_eq(&route.destination(), 1e-9));
        assert_eq!(end.segment_index, route.len() - 2);
    }

    #[test]
    fn interpolation_clamps_out_of_range_progress() {
        let route = build_curved_route(SFO, LAX, 20).unwrap();
        let table = build_distance_table(&route);
        assert_eq!(
            interpolate_along_route(&route, &table, -3.0).unwrap(),
            interpolate_along_route(&route, &table, 0.0).unwrap()
        );
        assert_eq!(
            interpolate_along_route(&route, &table, 7.5).unwrap(),
            interpolate_along_route(&route, &table, 1.0).unwrap()
        );
        assert_eq!(
            interpolate_along_route(&route, &table, f64::NAN).unwrap(),
            interpolate_along_route(&route, &table, 0.0).unwrap()
        );
    }

    #[test]
    fn interpolation_is_idempotent() {
        let route = build_curved_route(TPE, HND, 180).unwrap();
        let table = build_distance_table(&route);
        let first = interpolate_along_route(&route, &table, 0.37).unwrap();
        for _ in 0..5 {
            assert_eq!(interpolate_along_route(&route, &table, 0.37).unwrap(), first);
        }
    }

    #[test]
    fn interpolation_midway_along_straight_meridian() {
        // two equal segments due north along lon 0
        let route = straight(&[(0.0, 0.0), (0.0, 1.0), (0.0, 2.0)]);
        let table = build_distance_table(&route);
        let at = interpolate_along_route(&route, &table, 0.25).unwrap();
        assert!(at.position.approx_eq(&Coordinate::new(0.0, 0.5), 1e-9));
        assert_eq!(at.segment_index, 0);
        assert!(at.heading.abs() < EPS);

        let at = interpolate_along_route(&route, &table, 0.75).unwrap();
        assert!(at.position.approx_eq(&Coordinate::new(0.0, 1.5), 1e-9));
        assert_eq!(at.segment_index, 1);
    }

    #[test]
    fn interpolation_at_exact_vertex_takes_first_match() {
        let route = straight(&[(0.0, 0.0), (0.0, 1.0), (0.0, 2.0)]);
        let table = build_distance_table(&route);
        let at = interpolate_along_route(&route, &table, 0.5).unwrap();
        // target equals table[1]; first not-less-than is index 1
        assert_eq!(at.segment_index, 0);
        assert!(at.position.approx_eq(&Coordinate::new(0.0, 1.0), 1e-9));
    }

    #[test]
    fn zero_length_segment_does_not_divide_by_zero() {
        let route = straight(&[(0.0, 0.0), (0.0, 1.0), (0.0, 1.0), (0.0, 2.0)]);
        let table = build_distance_table(&route);
        for p in [0.0, 0.25, 0.5, 0.75, 1.0] {
            let at = interpolate_along_route(&route, &table, p).unwrap();
            assert!(at.position.lon.is_finite() && at.position.lat.is_finite());
        }
    }

    #[test]
    fn mismatched_table_is_rejected() {
        let route = build_curved_route(TPE, HND, 10).unwrap();
        let other = build_distance_table(&build_curved_route(TPE, HND, 5).unwrap());
        assert_eq!(
            interpolate_along_route(&route, &other, 0.5),
            Err(FlightError::MismatchedTable {
                route_len: 11,
                table_len: 6
            })
        );
    }

    #[test]
    fn split_reconstructs_the_route() {
        let route = build_curved_route(TPE, HND, 40).unwrap();
        let table = build_distance_table(&route);
        for p in [0.0, 0.1, 0.5, 0.93, 1.0] {
            let at = interpolate_along_route(&route, &table, p).unwrap();
            let split = split_route_at(&route, at.segment_index, at.position);

            assert_eq!(split.completed.last(), Some(&at.position));
            assert_eq!(split.remaining.first(), Some(&at.position));

            let mut rebuilt = split.completed[..split.completed.len() - 1].to_vec();
            rebuilt.extend_from_slice(&split.remaining[1..]);
            assert_eq!(rebuilt, route.points());
        }
    }

    #[test]
    fn split_leaves_input_untouched() {
        let route = straight(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]);
        let before = route.clone();
        let split = split_route_at(&route, 1, Coordinate::new(1.5, 0.0));
        assert_eq!(route, before);
        assert_eq!(split.completed.len(), 3);
        assert_eq!(split.remaining.len(), 2);
    }

    #[test]
    fn line_string_doubles_single_point() {
        let feature = line_string_feature(&[TPE]);
        let coords = feature["geometry"]["coordinates"].as_array().unwrap();
        assert_eq!(coords.len(), 2);
        assert_eq!(feature["geometry"]["type"], "LineString");

        let feature = line_string_feature(&[TPE, HND]);
        assert_eq!(feature["geometry"]["coordinates"][1][0], 139.78);
    }

    #[test]
    fn snapshot_combines_position_and_split() {
        let plan = RoutePlan::between(SFO, LAX, 60).unwrap();
        let snap = plan.snapshot(0.5);
        let at = plan.position_at(0.5);
        assert_eq!(snap.position, at.position);
        assert_eq!(snap.heading, at.heading);
        assert_eq!(snap.completed.len() + snap.remaining.len(), plan.route().len() + 2);
    }
}
