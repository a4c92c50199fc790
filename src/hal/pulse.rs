//! GPIO mark/space capture and the periodic tick.
//!
//! A 38 kHz IR demodulator module idles high and pulls the line low for
//! the duration of each mark. The capture ISR timestamps every edge with
//! the microsecond system timer and pairs each mark width with the space
//! width that follows it; the completed pair is handed to a callback,
//! which must only push it onto a ring (decoding happens on the decode
//! thread, never in the ISR).

use core::time::Duration;

use esp_idf_svc::hal::gpio::{AnyIOPin, Input, InterruptType, PinDriver, Pull};
use esp_idf_svc::sys::{esp_timer_get_time, EspError};
use esp_idf_svc::timer::{EspTaskTimerService, EspTimer};

use crate::config::TICK_PERIOD_MS;

/// IR input pin configuration.
pub struct PulseCaptureConfig {
    /// GPIO the demodulator output is wired to.
    pub pin: AnyIOPin,
    /// Ignore any edge interval longer than this (µs); the line idling
    /// between transmissions would otherwise register as a huge space.
    pub max_pulse_us: u32,
}

impl PulseCaptureConfig {
    pub fn new(pin: AnyIOPin) -> Self {
        Self {
            pin,
            // Longest meaningful interval is the 9 ms lead mark; anything
            // past ~100 ms is the idle line.
            max_pulse_us: 100_000,
        }
    }
}

/// Owns the subscribed pin driver; capture stops when dropped.
pub struct PulseCapture {
    _driver: PinDriver<'static, AnyIOPin, Input>,
}

impl PulseCapture {
    /// Subscribe to both edges of the IR pin and start capture.
    ///
    /// `on_pair(mark_us, space_us)` runs in interrupt context for every
    /// completed mark+space cycle. It must be short and must not block —
    /// push onto a ring and return.
    pub fn start(
        config: PulseCaptureConfig,
        mut on_pair: impl FnMut(u32, u32) + Send + 'static,
    ) -> Result<Self, EspError> {
        let max_pulse_us = config.max_pulse_us;
        let mut driver = PinDriver::input(config.pin)?;
        driver.set_pull(Pull::Up)?;
        driver.set_interrupt_type(InterruptType::AnyEdge)?;

        // Edge pairing state, owned by the ISR closure. The line idles
        // high; edges strictly alternate, so tracking the expected level
        // avoids reading the pin inside the ISR.
        let mut last_edge_us: i64 = 0;
        let mut line_low = false;
        let mut mark_us: u32 = 0;

        let isr = move || {
            let now = unsafe { esp_timer_get_time() };
            let width = (now - last_edge_us).clamp(0, i64::from(u32::MAX)) as u32;
            last_edge_us = now;
            line_low = !line_low;

            if width > max_pulse_us {
                // Idle gap or first edge ever: nothing to pair.
                mark_us = 0;
                return;
            }

            if line_low {
                // Falling edge: a space (high period) just ended.
                if mark_us > 0 {
                    on_pair(mark_us, width);
                    mark_us = 0;
                }
            } else {
                // Rising edge: a mark (low period) just ended.
                mark_us = width;
            }
        };

        // SAFETY: the closure runs in interrupt context; it only touches
        // its own captures and the lock-free ring push inside `on_pair`.
        unsafe {
            driver.subscribe(isr)?;
        }

        driver.enable_interrupt()?;
        Ok(Self { _driver: driver })
    }
}

/// Start the release-timeout poll at [`TICK_PERIOD_MS`].
///
/// The returned timer must be kept alive for the poll to keep running.
pub fn start_tick(
    timer_service: &EspTaskTimerService,
    mut on_tick: impl FnMut() + Send + 'static,
) -> Result<EspTimer<'static>, EspError> {
    let timer = timer_service.timer(move || on_tick())?;
    timer.every(Duration::from_millis(TICK_PERIOD_MS))?;
    Ok(timer)
}
