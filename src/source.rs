use anyhow::Result;
use log::{debug, info};
use rppal::uart::{Parity, Uart};
use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;
use std::time::Duration;

use crate::config::SerialSettings;
use crate::sbus::{SbusDecoder, SbusFrame};

/// Yields decoded receiver frames, one per control tick.
pub trait FrameSource {
    /// Blocks until the next valid frame. `Ok(None)` means the source is exhausted.
    fn read_frame(&mut self) -> Result<Option<SbusFrame>>;

    /// Frames dropped by the decoder so far
    fn dropped(&self) -> u64;
}

fn feed(decoder: &mut SbusDecoder, bytes: &[u8], pending: &mut Option<SbusFrame>) -> usize {
    for (i, &byte) in bytes.iter().enumerate() {
        match decoder.push(byte) {
            Some(Ok(frame)) => {
                *pending = Some(frame);
                return i + 1;
            }
            Some(Err(e)) => debug!("Dropped SBUS frame: {}", e),
            None => {}
        }
    }
    bytes.len()
}

/// SBUS receiver wired to the Pi's UART.
pub struct UartSource {
    uart: Uart,
    decoder: SbusDecoder,
    buffer: [u8; 64],
    start: usize,
    end: usize,
}

impl UartSource {
    pub fn open(settings: &SerialSettings) -> Result<Self> {
        let mut uart = Uart::with_path(&settings.path, settings.baud_rate, Parity::Even, 8, 2)?;
        uart.set_read_mode(1, Duration::from_millis(settings.read_timeout_ms))?;
        info!("SBUS RX ready on {} at {} baud", settings.path, settings.baud_rate);

        Ok(UartSource {
            uart,
            decoder: SbusDecoder::new(),
            buffer: [0u8; 64],
            start: 0,
            end: 0,
        })
    }
}

impl FrameSource for UartSource {
    fn read_frame(&mut self) -> Result<Option<SbusFrame>> {
        loop {
            if self.start == self.end {
                // A timeout returns zero bytes; keep waiting for the receiver
                self.end = self.uart.read(&mut self.buffer)?;
                self.start = 0;
                continue;
            }

            let mut pending = None;
            let bytes = &self.buffer[self.start..self.end];
            self.start += feed(&mut self.decoder, bytes, &mut pending);
            if pending.is_some() {
                return Ok(pending);
            }
        }
    }

    fn dropped(&self) -> u64 {
        self.decoder.dropped()
    }
}

/// Replays a captured SBUS byte stream.
pub struct ReplaySource<R: Read> {
    reader: R,
    decoder: SbusDecoder,
}

impl ReplaySource<BufReader<File>> {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        info!("Replaying SBUS capture {}", path.as_ref().display());
        Ok(ReplaySource::new(BufReader::new(file)))
    }
}

impl<R: Read> ReplaySource<R> {
    pub fn new(reader: R) -> Self {
        ReplaySource {
            reader,
            decoder: SbusDecoder::new(),
        }
    }
}

impl<R: Read> FrameSource for ReplaySource<R> {
    fn read_frame(&mut self) -> Result<Option<SbusFrame>> {
        let mut byte = [0u8; 1];
        loop {
            match self.reader.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => {
                    let mut pending = None;
                    feed(&mut self.decoder, &byte, &mut pending);
                    if pending.is_some() {
                        return Ok(pending);
                    }
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn dropped(&self) -> u64 {
        self.decoder.dropped()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channels::{NUM_CHANNELS, RawChannelFrame};

    #[test]
    fn test_replay_yields_frames_then_none() {
        let first = SbusFrame::new(RawChannelFrame::new([992; NUM_CHANNELS]));
        let second = SbusFrame::new(RawChannelFrame::new([1811; NUM_CHANNELS]));
        let mut bytes = first.to_bytes().to_vec();
        bytes.extend(second.to_bytes());

        let mut source = ReplaySource::new(&bytes[..]);
        assert_eq!(source.read_frame().unwrap(), Some(first));
        assert_eq!(source.read_frame().unwrap(), Some(second));
        assert_eq!(source.read_frame().unwrap(), None);
        assert_eq!(source.dropped(), 0);
    }

    #[test]
    fn test_replay_skips_corrupt_frame() {
        let good = SbusFrame::new(RawChannelFrame::new([992; NUM_CHANNELS]));
        let mut corrupt = good.to_bytes();
        corrupt[24] = 0x55;
        let mut bytes = corrupt.to_vec();
        // 0x55 is not a footer, so resync on a footer byte first
        bytes.push(0x00);
        bytes.extend(good.to_bytes());

        let mut source = ReplaySource::new(&bytes[..]);
        assert_eq!(source.read_frame().unwrap(), Some(good));
        assert_eq!(source.dropped(), 1);
    }

    #[test]
    fn test_feed_stops_after_first_frame() {
        let frame = SbusFrame::new(RawChannelFrame::new([500; NUM_CHANNELS]));
        let mut bytes = frame.to_bytes().to_vec();
        bytes.extend(frame.to_bytes());

        let mut decoder = SbusDecoder::new();
        let mut pending = None;
        let used = feed(&mut decoder, &bytes, &mut pending);
        assert_eq!(used, 25);
        assert_eq!(pending, Some(frame));
    }
}
