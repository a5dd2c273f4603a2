//! SBUS framing.
//!
//! A frame is 25 bytes: header `0x0F`, 22 bytes holding 16 channels of 11
//! bits packed LSB first, a flag byte, then the footer. The UART runs at
//! 100000 baud, 8 data bits, even parity, 2 stop bits.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::channels::{NUM_CHANNELS, RawChannelFrame};

pub const FRAME_LEN: usize = 25;
pub const HEADER: u8 = 0x0F;
pub const FOOTER: u8 = 0x00;
// SBUS2 cycles the footer through 0x04, 0x14, 0x24, 0x34
const FOOTER2: u8 = 0x04;
const FOOTER2_MASK: u8 = 0x0F;

const PAYLOAD_LEN: usize = 22;
const FLAGS_INDEX: usize = 23;
const CHANNEL_BITS: usize = 11;
const CHANNEL_MASK: u16 = 0x07FF;

const FLAG_CH17: u8 = 0x01;
const FLAG_CH18: u8 = 0x02;
const FLAG_LOST_FRAME: u8 = 0x04;
const FLAG_FAILSAFE: u8 = 0x08;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SbusFrame {
    pub channels: RawChannelFrame,
    pub ch17: bool,
    pub ch18: bool,
    pub lost_frame: bool,
    pub failsafe: bool,
}

impl SbusFrame {
    pub fn new(channels: RawChannelFrame) -> Self {
        SbusFrame {
            channels,
            ch17: false,
            ch18: false,
            lost_frame: false,
            failsafe: false,
        }
    }

    pub fn from_bytes(bytes: &[u8; FRAME_LEN]) -> Result<Self, SbusError> {
        if bytes[0] != HEADER {
            return Err(SbusError::BadHeader(bytes[0]));
        }
        let footer = bytes[FRAME_LEN - 1];
        if !is_footer(footer) {
            return Err(SbusError::BadFooter(footer));
        }

        let payload = &bytes[1..1 + PAYLOAD_LEN];
        let mut channels = [0i16; NUM_CHANNELS];
        for (i, channel) in channels.iter_mut().enumerate() {
            let mut value: u16 = 0;
            for bit in 0..CHANNEL_BITS {
                let pos = i * CHANNEL_BITS + bit;
                if (payload[pos / 8] >> (pos % 8)) & 1 == 1 {
                    value |= 1 << bit;
                }
            }
            *channel = value as i16;
        }

        let flags = bytes[FLAGS_INDEX];
        Ok(SbusFrame {
            channels: RawChannelFrame::new(channels),
            ch17: flags & FLAG_CH17 != 0,
            ch18: flags & FLAG_CH18 != 0,
            lost_frame: flags & FLAG_LOST_FRAME != 0,
            failsafe: flags & FLAG_FAILSAFE != 0,
        })
    }

    /// Encodes the frame for transmission. Channel values are truncated to 11 bits.
    pub fn to_bytes(&self) -> [u8; FRAME_LEN] {
        let mut bytes = [0u8; FRAME_LEN];
        bytes[0] = HEADER;

        for (i, &channel) in self.channels.channels().iter().enumerate() {
            let value = (channel as u16) & CHANNEL_MASK;
            for bit in 0..CHANNEL_BITS {
                if (value >> bit) & 1 == 1 {
                    let pos = i * CHANNEL_BITS + bit;
                    bytes[1 + pos / 8] |= 1 << (pos % 8);
                }
            }
        }

        let mut flags = 0u8;
        if self.ch17 {
            flags |= FLAG_CH17;
        }
        if self.ch18 {
            flags |= FLAG_CH18;
        }
        if self.lost_frame {
            flags |= FLAG_LOST_FRAME;
        }
        if self.failsafe {
            flags |= FLAG_FAILSAFE;
        }
        bytes[FLAGS_INDEX] = flags;
        bytes[FRAME_LEN - 1] = FOOTER;
        bytes
    }
}

fn is_footer(byte: u8) -> bool {
    byte == FOOTER || (byte & FOOTER2_MASK) == FOOTER2
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SbusError {
    BadHeader(u8),
    BadFooter(u8),
}

impl fmt::Display for SbusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SbusError::BadHeader(b) => write!(f, "bad header byte 0x{:02X}", b),
            SbusError::BadFooter(b) => write!(f, "bad footer byte 0x{:02X}", b),
        }
    }
}

impl std::error::Error for SbusError {}

/// Byte-at-a-time frame assembler.
///
/// A header is only accepted right after a footer-like byte, so a `0x0F`
/// inside channel data cannot start a frame once the stream is in sync.
pub struct SbusDecoder {
    buffer: [u8; FRAME_LEN],
    len: usize,
    prev_byte: u8,
    dropped: u64,
}

impl Default for SbusDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl SbusDecoder {
    pub fn new() -> Self {
        SbusDecoder {
            buffer: [0; FRAME_LEN],
            len: 0,
            prev_byte: FOOTER,
            dropped: 0,
        }
    }

    /// Feeds one byte; returns a result each time 25 bytes have been collected.
    pub fn push(&mut self, byte: u8) -> Option<Result<SbusFrame, SbusError>> {
        let mut out = None;

        if self.len == 0 {
            if byte == HEADER && is_footer(self.prev_byte) {
                self.buffer[0] = byte;
                self.len = 1;
            }
        } else {
            self.buffer[self.len] = byte;
            self.len += 1;
            if self.len == FRAME_LEN {
                self.len = 0;
                let result = SbusFrame::from_bytes(&self.buffer);
                if result.is_err() {
                    self.dropped += 1;
                }
                out = Some(result);
            }
        }

        self.prev_byte = byte;
        out
    }

    /// Frames discarded for a bad footer since creation
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}
