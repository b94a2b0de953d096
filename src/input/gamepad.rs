//! Gamepad source backed by gilrs.
//!
//! Buttons and axes are reported using the standard gamepad layout indices so bindings stored
//! on one platform resolve the same way on another.

use crate::error::{HotbindError, Result};
use crate::input::raw::RawInputEvent;
use crate::input::source::InputSource;
use gilrs::{Axis, Button, Event, EventType, Gilrs};
use std::time::{Duration, Instant};

/// Standard-layout index of a gilrs button.
pub fn button_index(button: Button) -> Option<usize> {
    let index = match button {
        Button::South => 0,
        Button::East => 1,
        Button::West => 2,
        Button::North => 3,
        Button::LeftTrigger => 4,
        Button::RightTrigger => 5,
        Button::LeftTrigger2 => 6,
        Button::RightTrigger2 => 7,
        Button::Select => 8,
        Button::Start => 9,
        Button::LeftThumb => 10,
        Button::RightThumb => 11,
        Button::DPadUp => 12,
        Button::DPadDown => 13,
        Button::DPadLeft => 14,
        Button::DPadRight => 15,
        Button::Mode => 16,
        _ => return None,
    };
    Some(index)
}

/// Standard-layout index of a gilrs axis.
pub fn axis_index(axis: Axis) -> Option<usize> {
    let index = match axis {
        Axis::LeftStickX => 0,
        Axis::LeftStickY => 1,
        Axis::RightStickX => 2,
        Axis::RightStickY => 3,
        _ => return None,
    };
    Some(index)
}

/// Polls every connected gamepad.
pub struct GamepadSource {
    gilrs: Gilrs,
}

impl GamepadSource {
    pub fn new() -> Result<Self> {
        let gilrs = Gilrs::new()
            .map_err(|e| HotbindError::gamepad(format!("failed to initialise gilrs: {e}")))?;
        Ok(Self { gilrs })
    }

    /// Connection events for every pad already present, so labels resolve before first use.
    pub fn connected(&self) -> Vec<RawInputEvent> {
        self.gilrs
            .gamepads()
            .map(|(id, pad)| RawInputEvent::GamepadConnected {
                gamepad_index: usize::from(id),
                name: pad.name().to_string(),
            })
            .collect()
    }

    fn translate(&self, event: Event) -> Option<RawInputEvent> {
        let gamepad_index = usize::from(event.id);
        match event.event {
            EventType::ButtonPressed(button, _) => {
                button_index(button).map(|b| RawInputEvent::button(gamepad_index, b, true))
            }
            EventType::ButtonReleased(button, _) => {
                button_index(button).map(|b| RawInputEvent::button(gamepad_index, b, false))
            }
            EventType::AxisChanged(axis, value, _) => axis_index(axis)
                .map(|a| RawInputEvent::axis(gamepad_index, a, f64::from(value))),
            EventType::Connected => Some(RawInputEvent::GamepadConnected {
                gamepad_index,
                name: self.gilrs.gamepad(event.id).name().to_string(),
            }),
            _ => None,
        }
    }
}

impl InputSource for GamepadSource {
    fn poll_event(&mut self, timeout: Option<Duration>) -> Result<Option<RawInputEvent>> {
        let Some(timeout) = timeout else {
            while let Some(event) = self.gilrs.next_event() {
                if let Some(raw) = self.translate(event) {
                    return Ok(Some(raw));
                }
            }
            return Ok(None);
        };

        // Events with no standard-layout index are skipped without restarting the wait.
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.gilrs.next_event_blocking(Some(remaining)) {
                Some(event) => {
                    if let Some(raw) = self.translate(event) {
                        return Ok(Some(raw));
                    }
                }
                None => return Ok(None),
            }
        }
    }
}

impl std::fmt::Debug for GamepadSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GamepadSource")
            .field("gamepads", &self.gilrs.gamepads().count())
            .finish()
    }
}
