//! Radio link detection from the receiver's signal-strength channel.
//!
//! The receiver reports below 1000 when the transmitter is gone and 1001+
//! when connected, at various levels.

use serde::{Deserialize, Serialize};

use crate::channels::{SWITCH_JITTER, SWITCH_MID};
use crate::events::{EventSink, LinkEvent};

pub const CONNECT_THRESHOLD: i16 = SWITCH_MID + SWITCH_JITTER;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LinkState {
    Connected,
    #[default]
    Disconnected,
}

impl LinkState {
    pub fn is_connected(&self) -> bool {
        *self == LinkState::Connected
    }
}

impl From<bool> for LinkState {
    fn from(connected: bool) -> Self {
        if connected {
            LinkState::Connected
        } else {
            LinkState::Disconnected
        }
    }
}

/// Decides the new link state from the latest signal strength.
///
/// Only transitions reach the sink; steady states (including the common
/// disconnected-and-still-low case) stay silent.
pub fn evaluate<K: EventSink>(
    signal_strength: i16,
    previously_connected: bool,
    sink: &mut K,
) -> bool {
    let connected = signal_strength > CONNECT_THRESHOLD;

    match (previously_connected, connected) {
        (false, true) => sink.emit(LinkEvent::LinkReconnected),
        (true, false) => sink.emit(LinkEvent::LinkDisconnected),
        _ => {}
    }

    connected
}
