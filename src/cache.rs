//! Thread-local cache of route plans.
//!
//! A route is generated once per origin/destination pair and reused for
//! every frame and every later flight on the same pair.
//!
//! # Cache Key Structure
//! - origin IATA code
//! - destination IATA code
//! - number of route steps

use flight_focus::planning::FlightPlan;
use flight_focus::route::RoutePlan;
use flight_focus::FlightError;
use log::debug;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Cache key: (origin, destination, steps)
pub type RouteKey = (String, String, usize);

thread_local! {
    /// Routes survive component lifetimes.
    pub static ROUTE_STORE: RefCell<HashMap<RouteKey, Rc<RoutePlan>>> =
        RefCell::new(HashMap::new());
}

/// Cached route for `plan`, building it on first use.
pub fn route_for(plan: &FlightPlan, steps: usize) -> Result<Rc<RoutePlan>, FlightError> {
    let key: RouteKey = (plan.origin.clone(), plan.destination.clone(), steps);

    if let Some(hit) = ROUTE_STORE.with(|c| c.borrow().get(&key).cloned()) {
        return Ok(hit);
    }

    debug!("Route cache miss for {}", plan.route_key());
    let built = Rc::new(RoutePlan::between(
        plan.origin_coord,
        plan.destination_coord,
        steps,
    )?);
    ROUTE_STORE.with(|c| c.borrow_mut().insert(key, built.clone()));
    Ok(built)
}
