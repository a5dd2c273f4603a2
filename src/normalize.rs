//! Stick position to signed percentage: -100 is full reverse/left, 0 is
//! stopped/centered and 100 is full forward/right.

use crate::channels::{SWITCH_JITTER, SWITCH_MID, SWITCH_OFF, SWITCH_ON};

// Calibrated against the receiver: 800 raw units below mid, 730 above,
// tuned so each ramp reaches its end with some margin.
const LOWER_DIVISOR: f32 = 8.2;
const UPPER_DIVISOR: f32 = 7.2;

/// Maps a raw receiver value to a percentage in [-100, 100].
pub fn to_percent(raw: i16) -> i8 {
    // A few degrees of stick around mid read as zero so the mower does not
    // jump on startup.
    if raw > SWITCH_MID - SWITCH_JITTER && raw < SWITCH_MID + SWITCH_JITTER {
        return 0;
    }
    if raw < SWITCH_OFF + SWITCH_JITTER {
        return -100;
    }
    if raw > SWITCH_ON - SWITCH_JITTER {
        return 100;
    }

    if raw <= SWITCH_MID {
        let ret = (-(100.0 - f32::from(raw - SWITCH_OFF) / LOWER_DIVISOR)) as i32;
        if ret > 0 {
            return 0;
        }
        if ret < -90 {
            return -100;
        }
        ret as i8
    } else {
        let ret = (f32::from(raw - SWITCH_MID) / UPPER_DIVISOR) as i32;
        ret.clamp(0, 100) as i8
    }
}
