use serde::{Deserialize, Serialize};

use crate::channels::{MIN_CHANNELS, RawChannelFrame};
use crate::failsafe::{FailsafeMode, MotionCommand};
use crate::link::LinkState;

/// Snapshot of one control tick, dumped as JSON at trace level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    pub tick: u64,
    pub channels: [i16; MIN_CHANNELS],
    pub link: LinkState,
    pub mode: FailsafeMode,
    pub command: MotionCommand,
    pub lost_frame: bool,
    pub receiver_failsafe: bool,
}

impl TickReport {
    pub fn channels_of(frame: &RawChannelFrame) -> [i16; MIN_CHANNELS] {
        let mut channels = [0i16; MIN_CHANNELS];
        channels.copy_from_slice(&frame.channels()[..MIN_CHANNELS]);
        channels
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}
