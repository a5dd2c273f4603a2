pub mod channels;
pub mod config;
pub mod error;
pub mod events;
pub mod failsafe;
pub mod link;
pub mod logging;
pub mod mower;
pub mod normalize;
pub mod sbus;
pub mod source;
pub mod state;

pub use channels::RawChannelFrame;
pub use error::Error;
pub use events::{EventSink, LinkEvent, LogSink};
pub use failsafe::{FailsafeController, FailsafeMode, MotionCommand};
pub use link::LinkState;
pub use mower::Mower;
pub use sbus::{SbusDecoder, SbusFrame};
pub use source::{FrameSource, ReplaySource, UartSource};
