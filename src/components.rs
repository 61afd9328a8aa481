//! Yew view components for the Flight Focus screens.
//!
//! Most are stateless and render from props; the boarding pass keeps its own
//! torn flag and the map owns the MapLibre instance for its lifetime.

use crate::cache::route_for;
use crate::config::{
    CAMERA_EASE_MS, CAMERA_PITCH, MAP_CONTAINER_ID, MAP_STYLE_URL, MAX_ZOOM, MIN_ZOOM,
    TEAR_DELAY_MS, ZOOM_STEP,
};
use crate::map::{destroy_flight_map, init_flight_map, update_flight_map, MapInit};
use flight_focus::boarding::{self, BarcodeBar, BoardingPass};
use flight_focus::defaults::ROUTE_STEPS;
use flight_focus::format_clock;
use flight_focus::planning::FlightPlan;
use flight_focus::session::FlightPhase;
use gloo_timers::callback::Timeout;
use log::error;
use std::rc::Rc;
use yew::prelude::*;

/// Renders the stub barcode.
pub fn render_barcode(bars: &[BarcodeBar]) -> Html {
    html! {
        <div class="barcode">
            { bars.iter().map(|bar| {
                let style = format!("width: {}px; opacity: {};", bar.width_px(), bar.opacity());
                html! { <div class="barcode-bar" {style} /> }
            }).collect::<Html>() }
        </div>
    }
}

/// One label/value cell on the ticket.
fn ticket_field(label: &str, value: &str, class: &'static str) -> Html {
    html! {
        <div class={classes!("ticket-field", class)}>
            <span class="ticket-label">{ label.to_string() }</span>
            <span class="ticket-value">{ value.to_string() }</span>
        </div>
    }
}

/// A route card on the selection screen.
#[derive(Properties, PartialEq)]
pub struct FlightCardProps {
    pub plan: Rc<FlightPlan>,
    pub onselect: Callback<()>,
}

#[function_component(FlightCard)]
pub fn flight_card(props: &FlightCardProps) -> Html {
    let onclick = {
        let onselect = props.onselect.clone();
        Callback::from(move |_: MouseEvent| onselect.emit(()))
    };
    let plan = &props.plan;

    html! {
        <button class="flight-card" type="button" {onclick}>
            <p class="flight-code">{ &plan.code }</p>
            <p class="flight-route">{ format!("{} → {}", plan.origin, plan.destination) }</p>
            <p class="flight-duration">
                { format!("{} focus session", format_clock(plan.duration_seconds())) }
            </p>
            <p class="flight-distance">{ format!("{:.0} km", plan.distance_km) }</p>
            <span class="flight-select">{ "Select" }</span>
        </button>
    }
}

/// The boarding pass. Clicking the stub tears it once and boards after a
/// short animation.
#[derive(Properties, PartialEq)]
pub struct BoardingPassProps {
    pub pass: Rc<BoardingPass>,
    pub ontear: Callback<()>,
    #[prop_or_default]
    pub debug: bool,
}

#[function_component(BoardingPassView)]
pub fn boarding_pass_view(props: &BoardingPassProps) -> Html {
    let is_torn = use_state(|| false);
    // dropping the handle on unmount cancels a pending boarding
    let tear_timer = use_state(|| None::<Timeout>);

    let onclick = {
        let is_torn = is_torn.clone();
        let tear_timer = tear_timer.clone();
        let ontear = props.ontear.clone();
        Callback::from(move |_: MouseEvent| {
            if *is_torn {
                return;
            }
            is_torn.set(true);
            let ontear = ontear.clone();
            tear_timer.set(Some(Timeout::new(TEAR_DELAY_MS, move || ontear.emit(()))));
        })
    };

    let pass = &props.pass;
    let stub_class = if *is_torn {
        "ticket-stub tearing-animation"
    } else {
        "ticket-stub"
    };

    html! {
        <div class="boarding-pass">
            <div class={classes!("ticket-main", is_torn.then_some("torn"))}>
                <div class="ticket-header">
                    <span class="ticket-brand">{ "✈ FLIGHT FOCUS" }</span>
                    <span class="ticket-kind">{ "Boarding Pass" }</span>
                </div>
                <div class="ticket-route">
                    <div class="ticket-airport">
                        <span class="ticket-code">{ &pass.origin }</span>
                        <span class="ticket-city">{ &pass.origin_city }</span>
                    </div>
                    <div class="ticket-plane">{ "✈" }</div>
                    <div class="ticket-airport right">
                        <span class="ticket-code">{ &pass.destination }</span>
                        <span class="ticket-city">{ &pass.destination_city }</span>
                    </div>
                </div>
                <div class="ticket-grid">
                    { ticket_field("Passenger", &pass.passenger_name, "") }
                    { ticket_field("Flight No.", boarding::FLIGHT_NUMBER, "") }
                    { ticket_field("Gate", boarding::GATE, "") }
                    { ticket_field("Seat", boarding::SEAT, "") }
                </div>
                <div class="ticket-footer">
                    { ticket_field("Class", boarding::TRAVEL_CLASS, "accent") }
                    { ticket_field("Departure", "Now", "accent") }
                    { ticket_field("Duration", &format_clock(pass.duration_seconds), "") }
                </div>
            </div>

            <div class={stub_class} {onclick}>
                <div class="ticket-header">
                    { format!("STUB • {}", boarding::FLIGHT_NUMBER) }
                </div>
                <div class="stub-route">
                    { ticket_field(&pass.origin, BoardingPass::stub_city(&pass.origin_city), "") }
                    { ticket_field(&pass.destination, BoardingPass::stub_city(&pass.destination_city), "right") }
                </div>
                <div class="stub-grid">
                    { ticket_field("Passenger", &pass.passenger_short, "") }
                    { ticket_field("Seat", boarding::SEAT, "right") }
                    { ticket_field("Gate", boarding::GATE, "") }
                    { ticket_field("Class", boarding::TRAVEL_CLASS, "right accent") }
                </div>
                { render_barcode(&pass.barcode) }
                <span class="ticket-serial">{ boarding::TICKET_SERIAL }</span>
                if !*is_torn {
                    <div class="tear-hint">{ "Tear Here" }</div>
                }
            </div>

            if props.debug {
                <div class="ticket-debug-panel">
                    <span>{ format!("torn {}", *is_torn) }</span>
                    <span>{ format!("duration {}", format_clock(pass.duration_seconds)) }</span>
                </div>
            }
        </div>
    }
}

/// Status shown over the map once the flight is over.
#[derive(Properties, PartialEq)]
pub struct ArrivalBannerProps {
    pub phase: FlightPhase,
}

#[function_component(ArrivalBanner)]
pub fn arrival_banner(props: &ArrivalBannerProps) -> Html {
    let (kicker, title) = match props.phase {
        FlightPhase::Completed => ("Arrived", "Focus Complete"),
        FlightPhase::Cancelled => ("Cancelled", "Flight Ended"),
        _ => return html! {},
    };

    html! {
        <div class="arrival-banner">
            <p class="arrival-kicker">{ kicker }</p>
            <p class="arrival-title">{ title }</p>
        </div>
    }
}

/// Heads-up bar above the map: route, countdown, camera zoom and controls.
#[derive(Properties, PartialEq)]
pub struct HudProps {
    pub plan: Rc<FlightPlan>,
    pub phase: FlightPhase,
    pub remaining_seconds: u32,
    pub zoom: f64,
    pub onzoom: Callback<InputEvent>,
    pub oncancel: Callback<()>,
    pub onnewflight: Callback<()>,
}

#[function_component(Hud)]
pub fn hud(props: &HudProps) -> Html {
    let action = if props.phase == FlightPhase::InFlight {
        let oncancel = props.oncancel.clone();
        html! {
            <button class="hud-cancel" type="button"
                onclick={Callback::from(move |_: MouseEvent| oncancel.emit(()))}>
                { "End Flight" }
            </button>
        }
    } else {
        let onnewflight = props.onnewflight.clone();
        html! {
            <button class="hud-new-flight" type="button"
                onclick={Callback::from(move |_: MouseEvent| onnewflight.emit(()))}>
                { "New Flight" }
            </button>
        }
    };

    html! {
        <header class="hud-bar">
            <div>
                <p class="hud-kicker">{ "Focus Flight" }</p>
                <h1 class="hud-route">
                    { format!("{} -> {}", props.plan.origin, props.plan.destination) }
                </h1>
            </div>
            <div class="hud-controls">
                <div class="hud-remaining">
                    <p class="hud-kicker">{ "Remaining" }</p>
                    <p class="hud-clock">{ format_clock(props.remaining_seconds) }</p>
                </div>
                <div class="hud-zoom">
                    <input type="range"
                        aria-label="Camera zoom"
                        min={MIN_ZOOM.to_string()}
                        max={MAX_ZOOM.to_string()}
                        step={ZOOM_STEP.to_string()}
                        value={props.zoom.to_string()}
                        oninput={props.onzoom.clone()}
                    />
                    <span class="hud-zoom-value">{ format!("{:.1}x", props.zoom) }</span>
                </div>
                { action }
            </div>
        </header>
    }
}

/// The live map. Mounts MapLibre once per flight and pushes the plane's
/// position every time `progress` or `zoom` changes.
#[derive(Properties, PartialEq)]
pub struct FlightMapProps {
    pub plan: Rc<FlightPlan>,
    pub progress: f64,
    pub zoom: f64,
}

#[function_component(FlightMap)]
pub fn flight_map(props: &FlightMapProps) -> Html {
    {
        let plan = props.plan.clone();
        let zoom = props.zoom;
        use_effect_with(plan, move |plan| {
            match route_for(plan, ROUTE_STEPS) {
                Ok(route) => init_flight_map(&MapInit {
                    container_id: MAP_CONTAINER_ID,
                    style_url: MAP_STYLE_URL,
                    origin: plan.origin_coord,
                    destination: plan.destination_coord,
                    origin_label: &plan.origin,
                    destination_label: &plan.destination,
                    route: route.route().points(),
                    zoom,
                    pitch: CAMERA_PITCH,
                }),
                Err(e) => error!("Cannot draw {}: {}", plan.route_key(), e),
            }
            destroy_flight_map
        });
    }

    {
        let plan = props.plan.clone();
        use_effect_with((plan, props.progress, props.zoom), move |(plan, progress, zoom)| {
            if let Ok(route) = route_for(plan, ROUTE_STEPS) {
                update_flight_map(&route.snapshot(*progress), *zoom, CAMERA_EASE_MS);
            }
        });
    }

    html! {
        <div class="map-shell">
            <div id={MAP_CONTAINER_ID} class="map-container" />
            <div class="map-overlay" />
        </div>
    }
}
