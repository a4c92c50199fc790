//! Button handler registry and dispatch.
//!
//! Thin by design: handlers are appended during setup and scanned
//! linearly at dispatch time (the lists are tiny). The registry is owned
//! by the dispatch context — it consumes the event queue, so handler
//! execution can never contend with the decode path.

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::button::{IrButton, IrButtonAction};
use crate::events::ButtonEvent;

/// What a handler listens for: a specific command code, or everything.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ButtonMatcher {
    /// A specific code. Codes outside 0..=255 (the handset's spacer
    /// entries) simply never match.
    Code(i32),
    /// Wildcard: matches every decoded command.
    Any,
}

impl ButtonMatcher {
    #[inline]
    pub fn matches(&self, code: u8) -> bool {
        match self {
            ButtonMatcher::Any => true,
            ButtonMatcher::Code(c) => *c == code as i32,
        }
    }
}

impl From<IrButton> for ButtonMatcher {
    fn from(button: IrButton) -> Self {
        match button {
            IrButton::Any => ButtonMatcher::Any,
            other => ButtonMatcher::Code(other.code()),
        }
    }
}

/// A registered callback. Invoked on the dispatch context, so it may be
/// slow without stalling decode — but it delays later handlers.
pub type Callback = Box<dyn Fn() + Send>;

struct ButtonHandler {
    matcher: ButtonMatcher,
    callback: Callback,
}

/// Append-only handler lists, dispatched in registration order.
///
/// Every matching handler fires for an event — a specific-code handler
/// and a wildcard handler registered for the same action both run.
#[derive(Default)]
pub struct HandlerRegistry {
    pressed: Vec<ButtonHandler>,
    released: Vec<ButtonHandler>,
    datagram: Vec<Callback>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self {
            pressed: Vec::new(),
            released: Vec::new(),
            datagram: Vec::new(),
        }
    }

    /// Subscribe a callback to a button press or release.
    ///
    /// Safe to call before or after the receiver is connected; handlers
    /// are never removed.
    pub fn register(
        &mut self,
        button: impl Into<ButtonMatcher>,
        action: IrButtonAction,
        callback: impl Fn() + Send + 'static,
    ) {
        let handler = ButtonHandler {
            matcher: button.into(),
            callback: Box::new(callback),
        };
        match action {
            IrButtonAction::Pressed => self.pressed.push(handler),
            IrButtonAction::Released => self.released.push(handler),
        }
    }

    /// Subscribe a callback to every completed datagram.
    pub fn on_datagram(&mut self, callback: impl Fn() + Send + 'static) {
        self.datagram.push(Box::new(callback));
    }

    /// Invoke every handler matching this event, in registration order.
    pub fn dispatch(&self, event: ButtonEvent) {
        match event {
            ButtonEvent::Pressed(code) => Self::dispatch_code(&self.pressed, code),
            ButtonEvent::Released(code) => Self::dispatch_code(&self.released, code),
            ButtonEvent::Datagram(frame) => {
                log::debug!("dispatch datagram {}", frame);
                for callback in &self.datagram {
                    callback();
                }
            }
        }
    }

    fn dispatch_code(handlers: &[ButtonHandler], code: u8) {
        for handler in handlers {
            if handler.matcher.matches(code) {
                (handler.callback)();
            }
        }
    }

    /// Registered handler count for an action (diagnostics).
    pub fn handler_count(&self, action: IrButtonAction) -> usize {
        match action {
            IrButtonAction::Pressed => self.pressed.len(),
            IrButtonAction::Released => self.released.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datagram::Datagram;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn counter() -> (Arc<AtomicU32>, impl Fn() + Send + 'static) {
        let count = Arc::new(AtomicU32::new(0));
        let clone = Arc::clone(&count);
        (count, move || {
            clone.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_specific_code_matching() {
        let mut registry = HandlerRegistry::new();
        let (hits, cb) = counter();
        registry.register(IrButton::Up, IrButtonAction::Pressed, cb);

        registry.dispatch(ButtonEvent::Pressed(0x18)); // Up
        registry.dispatch(ButtonEvent::Pressed(0x4A)); // Down
        registry.dispatch(ButtonEvent::Released(0x18)); // wrong action

        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_wildcard_matches_everything() {
        let mut registry = HandlerRegistry::new();
        let (hits, cb) = counter();
        registry.register(IrButton::Any, IrButtonAction::Pressed, cb);

        registry.dispatch(ButtonEvent::Pressed(0x18));
        registry.dispatch(ButtonEvent::Pressed(0x4A));
        registry.dispatch(ButtonEvent::Pressed(0xFF));

        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_every_matching_handler_fires() {
        let mut registry = HandlerRegistry::new();
        let (specific_hits, specific_cb) = counter();
        let (any_hits, any_cb) = counter();

        registry.register(IrButton::Up, IrButtonAction::Pressed, specific_cb);
        registry.register(IrButton::Any, IrButtonAction::Pressed, any_cb);

        registry.dispatch(ButtonEvent::Pressed(0x18));

        assert_eq!(specific_hits.load(Ordering::SeqCst), 1);
        assert_eq!(any_hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_dispatch_preserves_registration_order() {
        let order = Arc::new(std::sync::Mutex::new(Vec::new()));
        let mut registry = HandlerRegistry::new();

        for tag in ["first", "second", "third"] {
            let order = Arc::clone(&order);
            registry.register(IrButton::Any, IrButtonAction::Pressed, move || {
                order.lock().unwrap().push(tag);
            });
        }

        registry.dispatch(ButtonEvent::Pressed(0x02));
        assert_eq!(*order.lock().unwrap(), ["first", "second", "third"]);
    }

    #[test]
    fn test_datagram_handlers() {
        let mut registry = HandlerRegistry::new();
        let (hits, cb) = counter();
        registry.on_datagram(cb);

        registry.dispatch(ButtonEvent::Datagram(Datagram::new(0x00FF, 0x12ED)));
        registry.dispatch(ButtonEvent::Pressed(0x12));

        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_ok_and_five_both_fire_for_shared_code() {
        let mut registry = HandlerRegistry::new();
        let (ok_hits, ok_cb) = counter();
        let (five_hits, five_cb) = counter();

        registry.register(IrButton::Ok, IrButtonAction::Pressed, ok_cb);
        registry.register(IrButton::Number5, IrButtonAction::Pressed, five_cb);

        registry.dispatch(ButtonEvent::Pressed(0x02));

        assert_eq!(ok_hits.load(Ordering::SeqCst), 1);
        assert_eq!(five_hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_spacer_registration_never_fires() {
        let mut registry = HandlerRegistry::new();
        let (hits, cb) = counter();
        registry.register(IrButton::SpacerA, IrButtonAction::Pressed, cb);

        for code in 0..=255u8 {
            registry.dispatch(ButtonEvent::Pressed(code));
        }
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_handler_count() {
        let mut registry = HandlerRegistry::new();
        registry.register(IrButton::Up, IrButtonAction::Pressed, || {});
        registry.register(IrButton::Any, IrButtonAction::Released, || {});

        assert_eq!(registry.handler_count(IrButtonAction::Pressed), 1);
        assert_eq!(registry.handler_count(IrButtonAction::Released), 1);
    }
}
