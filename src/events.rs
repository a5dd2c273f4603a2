use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinkEvent {
    LinkReconnected,
    LinkDisconnected,
    FailsafeEngaged,
}

impl fmt::Display for LinkEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            LinkEvent::LinkReconnected => "Remote is reconnected",
            LinkEvent::LinkDisconnected => "Remote disconnected",
            LinkEvent::FailsafeEngaged => {
                "Disabled power to motors because the remote is disconnected"
            }
        };
        write!(f, "{}", text)
    }
}

/// Receives the categorical events raised by the link monitor and the fail-safe.
pub trait EventSink {
    fn emit(&mut self, event: LinkEvent);
}

/// Forwards events to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&mut self, event: LinkEvent) {
        match event {
            LinkEvent::LinkReconnected => info!("[LINK] {}", event),
            LinkEvent::LinkDisconnected | LinkEvent::FailsafeEngaged => {
                warn!("[LINK] {}", event)
            }
        }
    }
}

impl EventSink for Vec<LinkEvent> {
    fn emit(&mut self, event: LinkEvent) {
        self.push(event);
    }
}

impl<K: EventSink + ?Sized> EventSink for &mut K {
    fn emit(&mut self, event: LinkEvent) {
        (**self).emit(event);
    }
}
