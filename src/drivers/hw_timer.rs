//! Hardware timer module using ESP-IDF's esp_timer API.
//!
//! Creates the periodic LED poll timer that pushes events into the
//! lock-free SPSC queue.  On simulation targets, the main loop
//! approximates the cadence with thread::sleep instead.
//!
//! Timer callbacks execute in the ESP timer task context (not ISR), so
//! they can safely call push_event() which uses atomics.

#[cfg(target_os = "espidf")]
use crate::events::{push_event, Event};

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
static mut LED_POLL_TIMER: esp_timer_handle_t = core::ptr::null_mut();

/// SAFETY: LED_POLL_TIMER is written once in `start_timers()` before any
/// timer callbacks fire.  Only called from the single main task.
#[cfg(target_os = "espidf")]
unsafe fn led_poll_timer() -> esp_timer_handle_t {
    unsafe { LED_POLL_TIMER }
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn led_poll_cb(_arg: *mut core::ffi::c_void) {
    push_event(Event::LedPollTick);
}

/// Start the periodic LED poll timer at `interval_ms`.
#[cfg(target_os = "espidf")]
pub fn start_timers(interval_ms: u32) {
    // SAFETY: LED_POLL_TIMER is written here once at boot from the single
    // main-task context before any timer callbacks fire.  The callback
    // itself only calls push_event(), which is ISR-safe.
    unsafe {
        let args = esp_timer_create_args_t {
            callback: Some(led_poll_cb),
            arg: core::ptr::null_mut(),
            dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
            name: b"led_poll\0".as_ptr() as *const _,
            skip_unhandled_events: false,
        };
        let ret = esp_timer_create(&args, &raw mut LED_POLL_TIMER);
        if ret != ESP_OK {
            log::error!(
                "hw_timer: LED poll timer create failed (rc={}) — continuing without poll ticks",
                ret
            );
            return;
        }
        let ret = esp_timer_start_periodic(LED_POLL_TIMER, u64::from(interval_ms) * 1_000);
        if ret != ESP_OK {
            log::error!("hw_timer: LED poll timer start failed (rc={})", ret);
            return;
        }

        info!("hw_timer: LED poll @ {}ms started", interval_ms);
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn start_timers(_interval_ms: u32) {
    log::info!("hw_timer(sim): timers not started (events driven by sleep loop)");
}

/// Stop the LED poll timer.
#[cfg(target_os = "espidf")]
pub fn stop_timers() {
    // SAFETY: LED_POLL_TIMER is a valid handle if start_timers()
    // succeeded; null-check prevents double-free.
    unsafe {
        let t = led_poll_timer();
        if !t.is_null() {
            esp_timer_stop(t);
        }
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn stop_timers() {}
