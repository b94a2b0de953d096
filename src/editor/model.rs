//! Editor view model: the rows of the binding editor and how bindings are printed.

use crate::action::ActionDefinition;
use crate::binding::{AxisBinding, BindingKey, BindingStore, ClickBinding, ClickPart};
use crate::recorder::{BindingRecorder, RecorderState};
use std::collections::HashMap;
use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;

/// Label shown for an unbound or just-cleared slot.
pub const UNBOUND_LABEL: &str = " ";

/// Which store slot an editor row edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorTarget {
    Click(BindingKey),
    Axis(String),
}

/// One row of the binding editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorEntry {
    pub target: EditorTarget,
    pub title: String,
    pub label: String,
    pub recording: bool,
}

/// Display names of connected gamepads.
#[derive(Debug, Clone, Default)]
pub struct GamepadNames(HashMap<usize, String>);

impl GamepadNames {
    pub fn insert(&mut self, gamepad_index: usize, name: impl Into<String>) {
        self.0.insert(gamepad_index, name.into());
    }

    pub fn name(&self, gamepad_index: usize) -> String {
        self.0
            .get(&gamepad_index)
            .filter(|name| !name.is_empty())
            .cloned()
            .unwrap_or_else(|| format!("gamepad {gamepad_index}"))
    }
}

pub fn print_click(binding: Option<&ClickBinding>, names: &GamepadNames) -> String {
    match binding {
        Some(ClickBinding::Key(key)) => key.to_string(),
        Some(ClickBinding::Button(button)) => format!(
            "button {} on {}",
            button.button_index,
            names.name(button.gamepad_index)
        ),
        None => UNBOUND_LABEL.to_string(),
    }
}

pub fn print_axis(binding: Option<&AxisBinding>, names: &GamepadNames) -> String {
    match binding {
        Some(axis) => format!(
            "axis {} on {}",
            axis.axis_index,
            names.name(axis.gamepad_index)
        ),
        None => UNBOUND_LABEL.to_string(),
    }
}

/// Editor rows for `actions`, in declaration order.
///
/// Steps actions get an up and a down row, range actions get up, down and center rows plus an
/// axis row, everything else a single row.
pub fn editor_entries(
    actions: &[ActionDefinition],
    store: &BindingStore,
    names: &GamepadNames,
    recorder: &BindingRecorder,
) -> Vec<EditorEntry> {
    let click_entry = |key: BindingKey| {
        let title = match key.part {
            Some(part) => format!("{} ({})", key.action_id, part.title()),
            None => key.action_id.clone(),
        };
        let (recording, label) = match recorder.state() {
            RecorderState::RecordingKey { target, combo, .. } if *target == key => (
                true,
                combo.clone().unwrap_or_else(|| UNBOUND_LABEL.to_string()),
            ),
            _ => (false, print_click(store.click(&key), names)),
        };
        EditorEntry {
            target: EditorTarget::Click(key),
            title,
            label,
            recording,
        }
    };
    let axis_entry = |id: &str| {
        let recording = matches!(
            recorder.state(),
            RecorderState::RecordingAxis { target, .. } if target == id
        );
        EditorEntry {
            target: EditorTarget::Axis(id.to_string()),
            title: id.to_string(),
            label: if recording {
                UNBOUND_LABEL.to_string()
            } else {
                print_axis(store.axis(id), names)
            },
            recording,
        }
    };

    let mut entries = Vec::new();
    for action in actions {
        let id = action.id();
        match action {
            ActionDefinition::Steps { .. } => {
                entries.push(click_entry(BindingKey::up(id)));
                entries.push(click_entry(BindingKey::down(id)));
            }
            ActionDefinition::Range { .. } => {
                for part in [ClickPart::Up, ClickPart::Down, ClickPart::Center] {
                    entries.push(click_entry(BindingKey::with_part(id, part)));
                }
                entries.push(axis_entry(id));
            }
            ActionDefinition::Click { .. } | ActionDefinition::Momentary { .. } => {
                entries.push(click_entry(BindingKey::new(id)));
            }
        }
    }
    entries
}

/// Resolves once the binding editor it was returned for is closed.
#[derive(Debug)]
pub struct EditorHandle {
    rx: oneshot::Receiver<()>,
    closed: bool,
}

impl EditorHandle {
    pub(crate) fn pair() -> (EditorCloser, Self) {
        let (tx, rx) = oneshot::channel();
        (EditorCloser { tx }, Self { rx, closed: false })
    }

    /// Wait for the editor to close.
    pub async fn closed(self) {
        if !self.closed {
            // A dropped sender also means the editor is gone.
            let _ = self.rx.await;
        }
    }

    /// Non-blocking check.
    pub fn is_closed(&mut self) -> bool {
        if !self.closed {
            self.closed = !matches!(self.rx.try_recv(), Err(TryRecvError::Empty));
        }
        self.closed
    }
}

/// Owner side of an open editor.
#[derive(Debug)]
pub(crate) struct EditorCloser {
    tx: oneshot::Sender<()>,
}

impl EditorCloser {
    pub(crate) fn close(self) {
        let _ = self.tx.send(());
    }
}
