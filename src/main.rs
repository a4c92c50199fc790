//! RustIrReceiver - firmware entry point.
//!
//! Thread layout:
//! - GPIO ISR: timestamps edges, pushes mark/space pairs onto PULSES.
//! - Decode thread: owns the ReceiverSession; drains PULSES, runs the
//!   release-timeout poll, pushes ButtonEvents onto EVENTS, RT-logs onto
//!   RT_LOG. Never blocks on anything but its own short sleep.
//! - Dispatch thread: owns the HandlerRegistry; drains EVENTS and runs
//!   user callbacks. A slow callback delays other callbacks, never
//!   decoding.
//! - Log drain: forwards RT_LOG records into the ESP-IDF logger and
//!   reports ring drops periodically.

#[cfg(target_os = "espidf")]
mod firmware {
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::Duration;

    use esp_idf_svc::hal::gpio::{AnyIOPin, IOPin};
    use esp_idf_svc::hal::peripherals::Peripherals;
    use esp_idf_svc::sys::EspError;
    use esp_idf_svc::timer::EspTaskTimerService;

    use rust_ir_receiver::config::PULSE_QUEUE_SIZE;
    use rust_ir_receiver::hal::{start_tick, PulseCapture, PulseCaptureConfig};
    use rust_ir_receiver::logging::{forward_to_log, LogFilter, LogLevel, LogRing};
    use rust_ir_receiver::rt_info;
    use rust_ir_receiver::{
        EventQueue, HandlerRegistry, IrButton, IrButtonAction, Protocol, ReceiverSession, SpscRing,
    };

    /// ISR → decode thread handoff: (mark_us, space_us).
    static PULSES: SpscRing<(u32, u32), PULSE_QUEUE_SIZE> = SpscRing::new();

    /// Decode thread → dispatch thread handoff.
    static EVENTS: EventQueue = EventQueue::new();

    /// Decode thread → log drain handoff.
    static RT_LOG: LogRing = LogRing::new();
    static LOG_FILTER: LogFilter = LogFilter::new(LogLevel::Info);

    /// Milliseconds of running time, published by the tick timer so the
    /// decode thread never calls into the clock syscall per pulse.
    static NOW_MS: AtomicU64 = AtomicU64::new(0);

    fn timestamp_us() -> i64 {
        unsafe { esp_idf_svc::sys::esp_timer_get_time() }
    }

    fn running_time_ms() -> u64 {
        (timestamp_us() / 1000) as u64
    }

    pub fn run() -> Result<(), EspError> {
        let peripherals = Peripherals::take()?;
        let timer_service = EspTaskTimerService::new()?;

        // IR demodulator data pin
        let ir_pin: AnyIOPin = peripherals.pins.gpio5.downgrade();

        // Capture: ISR only pushes pairs, the ring absorbs bursts
        let _capture = PulseCapture::start(PulseCaptureConfig::new(ir_pin), |mark_us, space_us| {
            PULSES.push((mark_us, space_us));
        })?;

        // Periodic tick: publish the clock; the decode thread polls the
        // tracker deadline against it.
        let _tick = start_tick(&timer_service, || {
            NOW_MS.store(running_time_ms(), Ordering::Relaxed);
        })?;
        NOW_MS.store(running_time_ms(), Ordering::Relaxed);

        // Handler registry: wildcard logger plus an example binding.
        let mut registry = HandlerRegistry::new();
        registry.register(IrButton::Any, IrButtonAction::Pressed, || {
            log::info!("button pressed");
        });
        registry.register(IrButton::Any, IrButtonAction::Released, || {
            log::info!("button released");
        });
        registry.register(IrButton::Ok, IrButtonAction::Pressed, || {
            log::info!("OK pressed");
        });

        // Dispatch thread: drains EVENTS, runs callbacks.
        std::thread::Builder::new()
            .name("ir-dispatch".into())
            .stack_size(4096)
            .spawn(move || loop {
                let mut idle = true;
                while let Some(event) = EVENTS.pop() {
                    registry.dispatch(event);
                    idle = false;
                }
                if idle {
                    std::thread::sleep(Duration::from_millis(5));
                }
            })
            .expect("spawn dispatch thread");

        // Log drain: forwards RT records, reports drops every 10 s.
        std::thread::Builder::new()
            .name("ir-logdrain".into())
            .stack_size(4096)
            .spawn(|| {
                let mut last_report_us = 0i64;
                loop {
                    let mut idle = true;
                    while let Some(record) = RT_LOG.pop() {
                        forward_to_log(&record);
                        idle = false;
                    }

                    let now = unsafe { esp_idf_svc::sys::esp_timer_get_time() };
                    if now - last_report_us > 10_000_000 {
                        let log_drops = RT_LOG.dropped();
                        let event_drops = EVENTS.dropped();
                        let pulse_drops = PULSES.dropped();
                        if log_drops > 0 || event_drops > 0 || pulse_drops > 0 {
                            log::warn!(
                                "ring drops: log={} events={} pulses={}",
                                log_drops,
                                event_drops,
                                pulse_drops
                            );
                            RT_LOG.reset_dropped();
                            EVENTS.reset_dropped();
                            PULSES.reset_dropped();
                        }
                        last_report_us = now;
                    }

                    if idle {
                        std::thread::sleep(Duration::from_millis(10));
                    }
                }
            })
            .expect("spawn log drain thread");

        // Decode loop: owns the session, single producer of EVENTS.
        let mut session = ReceiverSession::with_protocol(Protocol::Nec);
        rt_info!(RT_LOG, LOG_FILTER, timestamp_us(), "IR receiver ready");

        let mut last_stats = session.stats().snapshot();
        let mut last_tick_ms = 0u64;
        let mut last_stats_ms = 0u64;

        loop {
            let now_ms = NOW_MS.load(Ordering::Relaxed);

            while let Some((mark_us, space_us)) = PULSES.pop() {
                session.feed_pulse(mark_us, space_us, now_ms, &EVENTS);
                if session.was_data_received() {
                    rt_info!(
                        RT_LOG,
                        LOG_FILTER,
                        timestamp_us(),
                        "datagram {}",
                        session.last_datagram()
                    );
                }
            }

            // The timer publishes the clock at TICK_PERIOD_MS; one expiry
            // check per published edge.
            if now_ms != last_tick_ms {
                session.tick(now_ms, &EVENTS);
                last_tick_ms = now_ms;
            }

            if now_ms.saturating_sub(last_stats_ms) > 10_000 {
                let stats = session.stats().snapshot();
                if stats != last_stats {
                    rt_info!(
                        RT_LOG,
                        LOG_FILTER,
                        timestamp_us(),
                        "stats: frames={} repeats={} timeouts={}",
                        stats.datagrams,
                        stats.repeats,
                        stats.timeout_releases
                    );
                    last_stats = stats;
                }
                last_stats_ms = now_ms;
            }

            if !PULSES.has_pending() {
                // Pulse pairs arrive at >= 1.1 ms spacing; 1 ms keeps the
                // ring shallow without busy-spinning.
                std::thread::sleep(Duration::from_millis(1));
            }
        }
    }
}

#[cfg(target_os = "espidf")]
fn main() {
    esp_idf_svc::sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();

    if let Err(err) = firmware::run() {
        log::error!("IR receiver failed to start: {err}");
    }
}

#[cfg(not(target_os = "espidf"))]
fn main() {
    eprintln!("rust-ir-receiver targets ESP-IDF; build with an espidf target.");
    eprintln!("The decoding core is host-testable: run `cargo test`.");
}
