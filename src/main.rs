//! Main module for the Flight Focus application using Yew.
//! Wires the screen flow, the focus timer hook and the map.

use flight_focus::boarding::BoardingPass;
use flight_focus::catalog::{builtin_catalog, CityCatalog, SCHEDULE};
use flight_focus::planning::{FlightPlan, FlightProfile};
use flight_focus::session::{FlightPhase, FlightSession, SessionEvent};
use flight_focus::{format_clock, FlightError};
use log::info;
use std::rc::Rc;
use web_sys::HtmlInputElement;
use yew::prelude::*;

mod cache;
mod components;
mod config;
mod hooks;
mod map;

use components::{ArrivalBanner, BoardingPassView, FlightCard, FlightMap, Hud};
use config::{DEFAULT_ZOOM, MAX_ZOOM, MIN_ZOOM, PASSENGER_NAME};
use hooks::use_flight_timer;

// ──────────────────────────────────────────────────────────────────────────────

/// Bookable flights and the catalog they were priced from.
struct Schedule {
    catalog: &'static CityCatalog,
    flights: Rc<Vec<Rc<FlightPlan>>>,
}

fn load_schedule() -> Result<Schedule, FlightError> {
    let catalog = builtin_catalog()?;
    let flights = catalog
        .plan_flights(&SCHEDULE, &FlightProfile::default())?
        .into_iter()
        .map(Rc::new)
        .collect::<Vec<_>>();
    info!("Schedule ready: {} flights", flights.len());
    Ok(Schedule {
        catalog,
        flights: Rc::new(flights),
    })
}

/// Parse the zoom slider, keeping the camera within bounds.
fn parse_zoom(text: &str) -> Option<f64> {
    text.parse::<f64>()
        .ok()
        .filter(|z| z.is_finite())
        .map(|z| z.clamp(MIN_ZOOM, MAX_ZOOM))
}

// ──────────────────────────────────────────────────────────────────────────────

#[derive(Properties, PartialEq)]
struct FlightScreenProps {
    flights: Rc<Vec<Rc<FlightPlan>>>,
    catalog: &'static CityCatalog,
}

/// The whole flow: route list, check-in, then the map until landing.
#[function_component(FlightScreen)]
fn flight_screen(props: &FlightScreenProps) -> Html {
    let session = use_state(FlightSession::default);
    let zoom = use_state(|| DEFAULT_ZOOM);

    let plan = props
        .flights
        .get(session.selected)
        .or_else(|| props.flights.first())
        .cloned();

    let total_seconds = plan.as_ref().map(|p| p.duration_seconds()).unwrap_or(0);
    let timer = use_flight_timer(total_seconds, session.phase.timer_running());

    let dispatch = {
        let session = session.clone();
        let reset = timer.reset.clone();
        Callback::from(move |event: SessionEvent| {
            if FlightSession::resets_timer(event) {
                reset.emit(());
            }
            session.set(session.apply(event));
        })
    };

    // Land once the timer runs out
    {
        let dispatch = dispatch.clone();
        use_effect_with(
            (timer.is_complete, session.phase),
            move |&(is_complete, phase)| {
                if is_complete && phase == FlightPhase::InFlight {
                    dispatch.emit(SessionEvent::Arrive);
                }
            },
        );
    }

    let pass = {
        let catalog = props.catalog;
        use_memo(plan.clone(), move |plan| {
            plan.as_ref()
                .map(|p| Rc::new(BoardingPass::issue(p, catalog, PASSENGER_NAME)))
        })
    };

    let onzoom = {
        let zoom = zoom.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            if let Some(z) = parse_zoom(&input.value()) {
                zoom.set(z);
            }
        })
    };

    let Some(plan) = plan else {
        return html! {
            <div class="no-results-message">{ "No flights scheduled." }</div>
        };
    };

    if session.phase.shows_map() {
        return html! {
            <div class="flight-screen">
                <div class="map-layer">
                    <FlightMap plan={plan.clone()} progress={timer.progress} zoom={*zoom} />
                </div>
                <ArrivalBanner phase={session.phase} />
                <Hud
                    plan={plan.clone()}
                    phase={session.phase}
                    remaining_seconds={timer.remaining_seconds}
                    zoom={*zoom}
                    {onzoom}
                    oncancel={dispatch.reform(|_| SessionEvent::Cancel)}
                    onnewflight={dispatch.reform(|_| SessionEvent::BackToRoutes)}
                />
            </div>
        };
    }

    html! {
        <div class="flight-screen lobby">
            <div class="ife-shell">
                if session.phase == FlightPhase::Select {
                    <>
                    <div class="lobby-header">
                        <p class="hud-kicker">{ "Flight Focus" }</p>
                        <h1>{ "Choose Your Route" }</h1>
                        <p class="lobby-note">{ "Flight length syncs with your focus duration." }</p>
                    </div>
                    <div class="flight-grid">
                        { props.flights.iter().enumerate().map(|(index, flight)| {
                            html! {
                                <FlightCard
                                    key={flight.code.clone()}
                                    plan={flight.clone()}
                                    onselect={dispatch.reform(move |_| SessionEvent::Choose(index))}
                                />
                            }
                        }).collect::<Html>() }
                    </div>
                    </>
                } else {
                    <div class="checkin">
                        <div>
                            <p class="hud-kicker">{ "Check-in" }</p>
                            <h2>{ format!("{} → {}", plan.origin, plan.destination) }</h2>
                            <p class="lobby-note">
                                { format!("Boarding pass ready. Your focus flight lasts {}.",
                                          format_clock(plan.duration_seconds())) }
                            </p>
                        </div>
                        if let Some(pass) = (*pass).clone() {
                            <BoardingPassView
                                {pass}
                                ontear={dispatch.reform(|_| SessionEvent::Board)}
                            />
                        }
                        <button class="back-button" type="button"
                            onclick={dispatch.reform(|_: MouseEvent| SessionEvent::BackToRoutes)}>
                            { "Back to Routes" }
                        </button>
                    </div>
                }
            </div>
        </div>
    }
}

/// Loads the schedule once and shows either the app or why it can't start.
#[function_component]
pub fn App() -> Html {
    let schedule = use_memo((), |_| load_schedule());

    match &*schedule {
        Ok(schedule) => html! {
            <FlightScreen
                flights={schedule.flights.clone()}
                catalog={schedule.catalog}
            />
        },
        Err(e) => html! {
            <div class="current-error">{ format!("Flight Focus failed to start: {}", e) }</div>
        },
    }
}

/// Entry point: initializes Yew renderer for the App component.
fn main() {
    console_error_panic_hook::set_once();
    yew::Renderer::<App>::new().render();
}
