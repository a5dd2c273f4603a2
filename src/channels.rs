use serde::{Deserialize, Serialize};

use crate::error::Error;

// Receiver output scale: 190 == off, 990 == mid, 1720 == 100%
pub const SWITCH_ON: i16 = 1720;
pub const SWITCH_MID: i16 = 990;
pub const SWITCH_OFF: i16 = 190;
pub const SWITCH_JITTER: i16 = 20;

pub const NUM_CHANNELS: usize = 16;
pub const MIN_CHANNELS: usize = 9;

// Channel map of the R81 receiver. 1 is elevation, 3 is rudder and 4-7 are
// the SA-SD switches; none of them drive the mower.
pub const STEERING_CHANNEL: usize = 0; // Ail (right stick left/right)
pub const THROTTLE_CHANNEL: usize = 2; // left stick up/down
pub const SIGNAL_STRENGTH_CHANNEL: usize = 8;

/// One complete set of channel readings, as delivered by a single receiver frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawChannelFrame {
    channels: [i16; NUM_CHANNELS],
}

impl RawChannelFrame {
    pub fn new(channels: [i16; NUM_CHANNELS]) -> Self {
        RawChannelFrame { channels }
    }

    pub fn channel(&self, index: usize) -> Option<i16> {
        self.channels.get(index).copied()
    }

    pub fn channels(&self) -> &[i16; NUM_CHANNELS] {
        &self.channels
    }

    pub fn steering(&self) -> i16 {
        self.channels[STEERING_CHANNEL]
    }

    pub fn throttle(&self) -> i16 {
        self.channels[THROTTLE_CHANNEL]
    }

    pub fn signal_strength(&self) -> i16 {
        self.channels[SIGNAL_STRENGTH_CHANNEL]
    }
}

impl TryFrom<&[i16]> for RawChannelFrame {
    type Error = Error;

    fn try_from(values: &[i16]) -> Result<Self, Self::Error> {
        if values.len() < MIN_CHANNELS {
            return Err(Error::ShortFrame { len: values.len() });
        }

        let mut channels = [0i16; NUM_CHANNELS];
        for (slot, &value) in channels.iter_mut().zip(values) {
            *slot = value;
        }
        Ok(RawChannelFrame { channels })
    }
}
