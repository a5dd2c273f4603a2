use serde::{Deserialize, Serialize};

use crate::channels::RawChannelFrame;
use crate::events::{EventSink, LinkEvent};
use crate::link::{self, LinkState};
use crate::normalize::to_percent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MotionCommand {
    pub steering: i8,
    pub throttle: i8,
}

impl MotionCommand {
    pub const NEUTRAL: MotionCommand = MotionCommand {
        steering: 0,
        throttle: 0,
    };

    pub fn is_neutral(&self) -> bool {
        *self == MotionCommand::NEUTRAL
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailsafeMode {
    /// Stick values pass through
    Active,
    /// Motion held at neutral until the link comes back
    Locked,
}

/// Owns the link flag and the last motion command across ticks.
#[derive(Debug, Clone)]
pub struct FailsafeController {
    connected: bool,
    command: MotionCommand,
    mode: FailsafeMode,
}

impl Default for FailsafeController {
    fn default() -> Self {
        Self::new()
    }
}

impl FailsafeController {
    pub fn new() -> Self {
        FailsafeController {
            connected: false,
            command: MotionCommand::NEUTRAL,
            mode: FailsafeMode::Locked,
        }
    }

    pub fn update<K: EventSink>(
        &mut self,
        frame: &RawChannelFrame,
        sink: &mut K,
    ) -> MotionCommand {
        self.connected = link::evaluate(frame.signal_strength(), self.connected, sink);

        if self.connected {
            self.mode = FailsafeMode::Active;
            self.command = MotionCommand {
                steering: to_percent(frame.steering()),
                throttle: to_percent(frame.throttle()),
            };
        } else {
            self.mode = FailsafeMode::Locked;
            if !self.command.is_neutral() {
                // Shut down the motion of the mower
                self.command = MotionCommand::NEUTRAL;
                sink.emit(LinkEvent::FailsafeEngaged);
            }
        }

        self.command
    }

    pub fn link_state(&self) -> LinkState {
        LinkState::from(self.connected)
    }

    pub fn command(&self) -> MotionCommand {
        self.command
    }

    pub fn mode(&self) -> FailsafeMode {
        self.mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channels::{
        NUM_CHANNELS, SIGNAL_STRENGTH_CHANNEL, STEERING_CHANNEL, THROTTLE_CHANNEL,
    };

    fn frame(signal: i16, steering: i16, throttle: i16) -> RawChannelFrame {
        let mut values = [990i16; NUM_CHANNELS];
        values[SIGNAL_STRENGTH_CHANNEL] = signal;
        values[STEERING_CHANNEL] = steering;
        values[THROTTLE_CHANNEL] = throttle;
        RawChannelFrame::new(values)
    }

    #[test]
    fn test_starts_locked_and_disconnected() {
        let controller = FailsafeController::new();
        assert_eq!(controller.mode(), FailsafeMode::Locked);
        assert_eq!(controller.link_state(), LinkState::Disconnected);
        assert!(controller.command().is_neutral());
    }

    #[test]
    fn test_connected_passes_sticks_through() {
        let mut controller = FailsafeController::new();
        let mut events: Vec<LinkEvent> = Vec::new();

        let cmd = controller.update(&frame(1500, 1400, 600), &mut events);
        assert_eq!(cmd, MotionCommand { steering: 56, throttle: -50 });
        assert_eq!(controller.mode(), FailsafeMode::Active);
        assert_eq!(events, vec![LinkEvent::LinkReconnected]);
    }

    #[test]
    fn test_disconnect_zeroes_command() {
        let mut controller = FailsafeController::new();
        let mut events: Vec<LinkEvent> = Vec::new();

        // 40% steering and 60% throttle on the upper ramp
        let cmd = controller.update(&frame(1500, 1279, 1423), &mut events);
        assert_eq!(cmd, MotionCommand { steering: 40, throttle: 60 });

        let cmd = controller.update(&frame(900, 1279, 1423), &mut events);
        assert_eq!(cmd, MotionCommand::NEUTRAL);
        assert_eq!(controller.mode(), FailsafeMode::Locked);
        assert_eq!(
            events,
            vec![
                LinkEvent::LinkReconnected,
                LinkEvent::LinkDisconnected,
                LinkEvent::FailsafeEngaged
            ]
        );

        // Staying disconnected neither re-zeroes nor re-logs
        let cmd = controller.update(&frame(900, 1700, 1700), &mut events);
        assert_eq!(cmd, MotionCommand::NEUTRAL);
        assert_eq!(events.len(), 3);
    }

    #[test]
    fn test_disconnect_with_neutral_sticks_is_quiet() {
        let mut controller = FailsafeController::new();
        let mut events: Vec<LinkEvent> = Vec::new();

        controller.update(&frame(1500, 990, 990), &mut events);
        controller.update(&frame(900, 990, 990), &mut events);
        assert_eq!(
            events,
            vec![LinkEvent::LinkReconnected, LinkEvent::LinkDisconnected]
        );
        assert_eq!(controller.mode(), FailsafeMode::Locked);
    }

    #[test]
    fn test_reconnect_resumes_without_extra_event() {
        let mut controller = FailsafeController::new();
        let mut events: Vec<LinkEvent> = Vec::new();

        controller.update(&frame(1500, 1700, 1700), &mut events);
        controller.update(&frame(0, 1700, 1700), &mut events);
        events.clear();

        let cmd = controller.update(&frame(1500, 600, 1400), &mut events);
        assert_eq!(cmd, MotionCommand { steering: -50, throttle: 56 });
        assert_eq!(controller.mode(), FailsafeMode::Active);
        assert_eq!(events, vec![LinkEvent::LinkReconnected]);
    }

    #[test]
    fn test_same_frame_twice_is_idempotent() {
        let mut controller = FailsafeController::new();
        let mut events: Vec<LinkEvent> = Vec::new();
        let f = frame(1500, 1200, 800);

        let first = controller.update(&f, &mut events);
        let logged = events.len();
        let second = controller.update(&f, &mut events);

        assert_eq!(first, second);
        assert_eq!(events.len(), logged);
    }
}
