//! The 1 Hz countdown tick for timer and focus-mode windows.

use crate::engine::{DesktopState, DirtyFlags, Notice, RuntimeEffect};
use crate::model::WindowState;

/// Advances every running countdown by one second.
///
/// A countdown completes on the tick that would take it from one second to
/// zero: the session reward fires once and the timer stops. Paused and
/// expired timers are untouched.
pub fn tick_second(state: &mut DesktopState) -> Vec<RuntimeEffect> {
    let mut effects = Vec::new();
    let mut dirty = DirtyFlags::default();
    let mut completed_durations = Vec::new();

    for window in state.windows.iter_mut() {
        if !window.kind.is_timer_like() {
            continue;
        }
        let WindowState::Timer(timer) = &mut window.state else {
            continue;
        };
        if !timer.timer_running || timer.time_remaining == 0 {
            continue;
        }
        if timer.time_remaining == 1 {
            completed_durations.push(window.timer_duration_seconds.unwrap_or(0));
            timer.timer_running = false;
        }
        timer.time_remaining -= 1;
        dirty.windows = true;
    }

    for duration in completed_durations {
        let events = state.progression.focus_session_completed(duration);
        for event in events {
            effects.push(RuntimeEffect::Notify(Notice::info(event.message())));
        }
        dirty.progression = true;
    }

    dirty.push_persist_effects(&mut effects);
    effects
}
