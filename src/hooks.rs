use flight_focus::timer::{Clock, FocusTimer, FrameRequest, TimerSnapshot};
use gloo_timers::callback::Timeout;
use log::warn;
use std::cell::{Cell, RefCell};
use std::num::NonZeroU32;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Performance;
use yew::prelude::*;

/// `performance.now()`, falling back to `Date.now()` where the Performance
/// API is missing.
pub struct PerformanceClock {
    performance: Option<Performance>,
}

impl PerformanceClock {
    pub fn new() -> Self {
        Self {
            performance: gloo_utils::window().performance(),
        }
    }
}

impl Default for PerformanceClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for PerformanceClock {
    fn now_ms(&self) -> f64 {
        match &self.performance {
            Some(p) => p.now(),
            None => js_sys::Date::now(),
        }
    }
}

type FrameCallback = Closure<dyn FnMut(f64)>;

fn request_frame(callback: &FrameCallback) -> Option<i32> {
    gloo_utils::window()
        .request_animation_frame(callback.as_ref().unchecked_ref())
        .map_err(|e| warn!("requestAnimationFrame failed: {:?}", e))
        .ok()
}

/// A running `requestAnimationFrame` loop ticking a timer. Dropping it
/// cancels the pending frame.
struct FrameLoop {
    pending: Rc<Cell<Option<i32>>>,
    callback: Rc<RefCell<Option<FrameCallback>>>,
}

impl FrameLoop {
    fn start(timer: Rc<RefCell<FocusTimer>>, snapshot: UseStateHandle<TimerSnapshot>) -> Self {
        let clock = PerformanceClock::new();
        let pending = Rc::new(Cell::new(None));
        let callback: Rc<RefCell<Option<FrameCallback>>> = Rc::new(RefCell::new(None));

        let next = callback.clone();
        let pending_inner = pending.clone();
        let tick = Closure::wrap(Box::new(move |_timestamp: f64| {
            let request = timer.borrow_mut().tick_with(&clock);
            let current = timer.borrow().snapshot();

            pending_inner.set(None);
            if request == FrameRequest::Continue {
                if let Some(cb) = next.borrow().as_ref() {
                    pending_inner.set(request_frame(cb));
                }
            }
            // last: this can re-render and drop the loop
            snapshot.set(current);
        }) as Box<dyn FnMut(f64)>);

        pending.set(request_frame(&tick));
        *callback.borrow_mut() = Some(tick);

        Self { pending, callback }
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        if let Some(id) = self.pending.take() {
            if let Err(e) = gloo_utils::window().cancel_animation_frame(id) {
                warn!("cancelAnimationFrame failed: {:?}", e);
            }
        }
        if let Some(cb) = self.callback.borrow_mut().take() {
            // the closure may be on the stack right now; free it on a later task
            Timeout::new(0, move || drop(cb)).forget();
        }
    }
}

/// Timer values plus a reset action for the current focus session.
#[derive(Clone, PartialEq)]
pub struct FlightTimer {
    pub progress: f64,
    pub elapsed_seconds: u32,
    pub remaining_seconds: u32,
    pub is_complete: bool,
    /// Back to zero. A session that is still `running` restarts on the next frame.
    pub reset: Callback<()>,
}

/// Runs a focus timer of `total_seconds` while `running` is true.
///
/// Turning `running` off pauses without losing elapsed time; turning it back
/// on resumes. A new `total_seconds` replaces the timer.
#[hook]
pub fn use_flight_timer(total_seconds: u32, running: bool) -> FlightTimer {
    let duration = NonZeroU32::new(total_seconds).unwrap_or(NonZeroU32::MIN);
    let timer = use_mut_ref(|| FocusTimer::with_duration(duration));
    let snapshot = use_state(|| timer.borrow().snapshot());
    let reset_token = use_state(|| 0u32);

    {
        let timer = timer.clone();
        let snapshot = snapshot.clone();
        use_effect_with(
            (running, duration, *reset_token),
            move |&(running, duration, _)| {
                if timer.borrow().total_seconds() != duration.get() {
                    *timer.borrow_mut() = FocusTimer::with_duration(duration);
                    snapshot.set(timer.borrow().snapshot());
                }

                let frame_loop = if running {
                    timer.borrow_mut().start();
                    Some(FrameLoop::start(timer.clone(), snapshot))
                } else {
                    timer.borrow_mut().pause();
                    None
                };

                move || drop(frame_loop)
            },
        );
    }

    let reset = {
        let timer = timer.clone();
        let snapshot = snapshot.clone();
        let reset_token = reset_token.clone();
        Callback::from(move |_| {
            timer.borrow_mut().reset();
            snapshot.set(timer.borrow().snapshot());
            reset_token.set(reset_token.wrapping_add(1));
        })
    };

    FlightTimer {
        progress: snapshot.progress,
        elapsed_seconds: snapshot.elapsed_seconds,
        remaining_seconds: snapshot.remaining_seconds,
        is_complete: snapshot.is_complete,
        reset,
    }
}
