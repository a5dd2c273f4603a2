use anyhow::Result;
use log::{debug, info, log_enabled, trace, Level};

use crate::events::EventSink;
use crate::failsafe::{FailsafeController, MotionCommand};
use crate::source::FrameSource;
use crate::state::TickReport;

/// The control loop: one tick per frame read from the receiver.
pub struct Mower<S: FrameSource, K: EventSink> {
    source: S,
    controller: FailsafeController,
    sink: K,
    ticks: u64,
}

impl<S: FrameSource, K: EventSink> Mower<S, K> {
    pub fn new(source: S, sink: K) -> Self {
        Mower {
            source,
            controller: FailsafeController::new(),
            sink,
            ticks: 0,
        }
    }

    /// Processes the next frame, or returns `None` once the source is exhausted.
    pub fn tick(&mut self) -> Result<Option<TickReport>> {
        let Some(frame) = self.source.read_frame()? else {
            return Ok(None);
        };
        self.ticks += 1;

        let command = self.controller.update(&frame.channels, &mut self.sink);
        if self.controller.link_state().is_connected() {
            debug!(
                "Throttle/Steering Vector: {}/{}",
                command.throttle, command.steering
            );
        }

        let report = TickReport {
            tick: self.ticks,
            channels: TickReport::channels_of(&frame.channels),
            link: self.controller.link_state(),
            mode: self.controller.mode(),
            command,
            lost_frame: frame.lost_frame,
            receiver_failsafe: frame.failsafe,
        };
        if log_enabled!(Level::Trace) {
            trace!("{}", report.to_json());
        }

        Ok(Some(report))
    }

    /// Ticks until the source runs dry and returns the number of ticks.
    pub fn run(&mut self) -> Result<u64> {
        while self.tick()?.is_some() {}
        info!(
            "Frame source exhausted after {} ticks ({} frames dropped)",
            self.ticks,
            self.source.dropped()
        );
        Ok(self.ticks)
    }

    pub fn command(&self) -> MotionCommand {
        self.controller.command()
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }
}
