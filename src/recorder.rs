//! Binding recorder: the capture state machine behind "press a key to rebind".
//!
//! A session pauses normal dispatch, marks the target slot as recording, and listens for the
//! next confirmed physical input. Whichever way the session ends (commit, cancel, or being
//! replaced by a new session) the slot is restored if nothing was captured and dispatch is
//! resumed.

use crate::binding::{key_combo, AxisBinding, BindingKey, BindingStore, ClickBinding, KeyBinding};
use crate::input::raw::{KeyEdge, RawInputEvent};
use crate::input::InputManager;
use std::collections::VecDeque;

/// Consecutive same-axis readings required before an axis is accepted.
pub const DEFAULT_AXIS_CAPTURE_WINDOW: usize = 7;

/// Current recorder state.
#[derive(Debug, Clone, PartialEq)]
pub enum RecorderState {
    Idle,
    RecordingKey {
        target: BindingKey,
        original: Option<ClickBinding>,
        /// Combo held at the last key-down; shown live while recording.
        combo: Option<String>,
    },
    RecordingAxis {
        target: String,
        original: Option<AxisBinding>,
        /// Most recent `(gamepad_index, axis_index)` readings, oldest first.
        window: VecDeque<(usize, usize)>,
    },
}

/// A binding written to the store by a completed session.
#[derive(Debug, Clone, PartialEq)]
pub enum Capture {
    Click {
        target: BindingKey,
        binding: ClickBinding,
    },
    Axis {
        target: String,
        binding: AxisBinding,
    },
}

/// What the recorder did with an event.
#[derive(Debug, Clone, PartialEq)]
pub enum RecorderOutcome {
    /// No session is active; the event belongs to normal dispatch.
    Ignored,
    /// Consumed by the active session, which keeps recording.
    Pending,
    /// Consumed and completed the session.
    Committed(Capture),
}

#[derive(Debug)]
pub struct BindingRecorder {
    state: RecorderState,
    axis_window: usize,
}

impl BindingRecorder {
    pub fn new() -> Self {
        Self::with_axis_window(DEFAULT_AXIS_CAPTURE_WINDOW)
    }

    pub fn with_axis_window(axis_window: usize) -> Self {
        Self {
            state: RecorderState::Idle,
            axis_window: axis_window.max(1),
        }
    }

    pub fn state(&self) -> &RecorderState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.state, RecorderState::Idle)
    }

    /// Combo currently held while recording a key.
    pub fn live_combo(&self) -> Option<&str> {
        match &self.state {
            RecorderState::RecordingKey { combo, .. } => combo.as_deref(),
            _ => None,
        }
    }

    /// Start capturing a key combo or gamepad button for `target`.
    pub fn begin_key(
        &mut self,
        target: BindingKey,
        store: &mut BindingStore,
        manager: &mut InputManager,
    ) {
        self.finish(store, manager);
        manager.stop(false);
        let original = store.begin_click_capture(&target);
        log::info!("started recording for action: {target}");
        self.state = RecorderState::RecordingKey {
            target,
            original,
            combo: None,
        };
    }

    /// Start capturing a gamepad axis for the range action `target`.
    pub fn begin_axis(
        &mut self,
        target: impl Into<String>,
        store: &mut BindingStore,
        manager: &mut InputManager,
    ) {
        self.finish(store, manager);
        let target = target.into();
        manager.stop(false);
        let original = store.begin_axis_capture(&target);
        log::info!("started recording axis for action: {target}");
        self.state = RecorderState::RecordingAxis {
            target,
            original,
            window: VecDeque::with_capacity(self.axis_window),
        };
    }

    /// Feed one raw event to the active session.
    pub fn handle_event(
        &mut self,
        event: &RawInputEvent,
        store: &mut BindingStore,
        manager: &mut InputManager,
    ) -> RecorderOutcome {
        let capture = match (&mut self.state, event) {
            (RecorderState::Idle, _) | (_, RawInputEvent::GamepadConnected { .. }) => {
                return RecorderOutcome::Ignored;
            }
            (RecorderState::RecordingKey { target, combo, .. }, RawInputEvent::Key(key)) => {
                match key.edge {
                    KeyEdge::Down => {
                        let held = key_combo(&key.active_keys);
                        *combo = (!held.is_empty()).then_some(held);
                        None
                    }
                    KeyEdge::Up => combo
                        .as_deref()
                        .and_then(KeyBinding::parse)
                        .map(|binding| Capture::Click {
                            target: target.clone(),
                            binding: binding.into(),
                        }),
                }
            }
            (RecorderState::RecordingKey { target, .. }, RawInputEvent::Button(button))
                if button.pressed =>
            {
                Some(Capture::Click {
                    target: target.clone(),
                    binding: ClickBinding::button(button.gamepad_index, button.button_index),
                })
            }
            (
                RecorderState::RecordingAxis {
                    target,
                    original,
                    window,
                },
                RawInputEvent::Axis(axis),
            ) => {
                let identity = (axis.gamepad_index, axis.axis_index);
                if window.len() == self.axis_window {
                    window.pop_front();
                }
                window.push_back(identity);
                let settled =
                    window.len() == self.axis_window && window.iter().all(|seen| *seen == identity);
                settled.then(|| Capture::Axis {
                    target: target.clone(),
                    binding: reshape(original.as_ref(), identity),
                })
            }
            _ => None,
        };

        let Some(capture) = capture else {
            return RecorderOutcome::Pending;
        };
        match &capture {
            Capture::Click { target, binding } => {
                log::info!("setting {target} to {binding:?}");
                store.set_click(target.clone(), binding.clone());
            }
            Capture::Axis { target, binding } => {
                log::info!("setting {target} to {binding:?}");
                store.set_axis(target.clone(), binding.clone());
            }
        }
        self.finish(store, manager);
        RecorderOutcome::Committed(capture)
    }

    /// End the active session: restore the original binding if nothing was captured, then
    /// resume dispatch. No-op when idle.
    pub fn finish(&mut self, store: &mut BindingStore, manager: &mut InputManager) {
        match std::mem::replace(&mut self.state, RecorderState::Idle) {
            RecorderState::Idle => return,
            RecorderState::RecordingKey {
                target, original, ..
            } => {
                store.restore_click(&target, original);
                log::info!("stopped recording for action: {target}");
            }
            RecorderState::RecordingAxis {
                target, original, ..
            } => {
                store.restore_axis(&target, original);
                log::info!("stopped recording axis for action: {target}");
            }
        }
        manager.start();
    }
}

impl Default for BindingRecorder {
    fn default() -> Self {
        Self::new()
    }
}

/// New axis identity, keeping the shaping (deadzone, inversion, velocity) of the replaced binding.
fn reshape(original: Option<&AxisBinding>, (gamepad_index, axis_index): (usize, usize)) -> AxisBinding {
    match original {
        Some(original) => AxisBinding {
            gamepad_index,
            axis_index,
            ..original.clone()
        },
        None => AxisBinding::new(gamepad_index, axis_index),
    }
}
