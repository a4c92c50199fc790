//! Decode outcomes delivered to the dispatch context.

use crate::config::EVENT_QUEUE_SIZE;
use crate::datagram::Datagram;
use crate::ring::SpscRing;

/// A discrete receiver event, derived from decoded frames and timeouts.
///
/// On a button switch the queue carries `Datagram`, then `Released` for
/// the previous button, then `Pressed` for the new one, in that order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ButtonEvent {
    /// A button went down (new command decoded).
    Pressed(u8),
    /// A button came up (superseded by another press, or repeat timeout).
    Released(u8),
    /// A complete frame was decoded (fires for held-button repeats of the
    /// full frame too, unlike Pressed).
    Datagram(Datagram),
}

/// Queue carrying events from the decode/tick paths to the dispatcher.
///
/// Producer: the thread owning the `ReceiverSession`. Consumer: the
/// dispatch context that owns the `HandlerRegistry`.
pub type EventQueue = SpscRing<ButtonEvent, EVENT_QUEUE_SIZE>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_queue_ordering() {
        let queue = EventQueue::new();

        queue.push(ButtonEvent::Datagram(Datagram::new(0x00FF, 0x30CF)));
        queue.push(ButtonEvent::Released(0x12));
        queue.push(ButtonEvent::Pressed(0x30));

        assert_eq!(
            queue.pop(),
            Some(ButtonEvent::Datagram(Datagram::new(0x00FF, 0x30CF)))
        );
        assert_eq!(queue.pop(), Some(ButtonEvent::Released(0x12)));
        assert_eq!(queue.pop(), Some(ButtonEvent::Pressed(0x30)));
        assert_eq!(queue.pop(), None);
    }
}
