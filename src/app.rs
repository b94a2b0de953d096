//! Application-facing layer
//!
//! [`Hotkeys`] owns one action set together with its binding store, input manager, binding
//! recorder and editor state. Applications feed it raw events (directly or through
//! [`runtime`]) and drive the binding editor through it.

pub mod runtime;

use crate::action::{validate_actions, ActionDefinition};
use crate::binding::{BindingKey, BindingStore, SavedBindings};
use crate::config::HotkeysConfig;
use crate::editor::{
    editor_entries, print_click, EditorCloser, EditorEntry, EditorHandle, EditorTarget,
    GamepadNames,
};
use crate::error::Result;
use crate::input::{
    InputManager, RangeAction, RangeClicks, RangeConfig, RawInputEvent, StepsConfig, TickSource,
};
use crate::recorder::{BindingRecorder, RecorderOutcome};
use std::sync::Arc;
use std::time::Instant;

/// One action set and everything needed to dispatch and rebind it.
pub struct Hotkeys {
    actions: Vec<ActionDefinition>,
    store: BindingStore,
    manager: InputManager,
    recorder: BindingRecorder,
    gamepads: GamepadNames,
    editor: Option<EditorCloser>,
}

impl Hotkeys {
    /// Validate `actions` and start dispatching with an empty binding store.
    pub fn new(actions: Vec<ActionDefinition>, config: &HotkeysConfig) -> Result<Self> {
        Self::with_store(actions, BindingStore::new(), config)
    }

    /// Like [`Hotkeys::new`] with bindings already in place.
    pub fn with_store(
        actions: Vec<ActionDefinition>,
        store: BindingStore,
        config: &HotkeysConfig,
    ) -> Result<Self> {
        validate_actions(&actions)?;
        let mut hotkeys = Self {
            actions,
            store,
            manager: InputManager::with_ticker(TickSource::with_rate(config.tick_rate_hz)),
            recorder: BindingRecorder::with_axis_window(config.axis_capture_window),
            gamepads: GamepadNames::default(),
            editor: None,
        };
        hotkeys.reset();
        Ok(hotkeys)
    }

    pub fn actions(&self) -> &[ActionDefinition] {
        &self.actions
    }

    pub fn store(&self) -> &BindingStore {
        &self.store
    }

    /// Direct access to the store. Changes take effect on the next [`Hotkeys::reset`].
    pub fn store_mut(&mut self) -> &mut BindingStore {
        &mut self.store
    }

    pub fn manager(&self) -> &InputManager {
        &self.manager
    }

    /// Snapshot of every bound value.
    pub fn bindings(&self) -> SavedBindings {
        self.store.snapshot()
    }

    /// Replace the whole store and rebuild dispatch.
    pub fn load_bindings(&mut self, saved: SavedBindings) {
        self.recorder.finish(&mut self.store, &mut self.manager);
        self.store = BindingStore::from_saved(saved);
        self.reset();
    }

    pub fn set_gamepad_name(&mut self, gamepad_index: usize, name: impl Into<String>) {
        self.gamepads.insert(gamepad_index, name);
    }

    /// Rebuild every registration from the store and start listening. Ends any capture session
    /// and closes the editor.
    pub fn reset(&mut self) {
        self.recorder.finish(&mut self.store, &mut self.manager);
        self.close_editor_signal();
        self.manager.stop(true);

        for action in &self.actions {
            match action {
                ActionDefinition::Click { id, handler } => {
                    let binding = self.store.click(&BindingKey::new(id.as_str())).cloned();
                    self.manager.add_click_action(Arc::clone(handler), binding);
                }
                ActionDefinition::Momentary { id, handler } => {
                    let binding = self.store.click(&BindingKey::new(id.as_str())).cloned();
                    self.manager
                        .add_momentary_click_action(Arc::clone(handler), binding);
                }
                ActionDefinition::Steps { id, step, handler } => {
                    let up = self.store.click(&BindingKey::up(id.as_str())).cloned();
                    let down = self.store.click(&BindingKey::down(id.as_str())).cloned();
                    let config = match (up, down) {
                        (Some(up), Some(down)) => Some(StepsConfig {
                            up,
                            down,
                            step: *step,
                        }),
                        (None, None) => None,
                        _ => {
                            log::warn!("steps action {id} has only one of up/down bound; ignoring");
                            None
                        }
                    };
                    self.manager.add_steps_action(Arc::clone(handler), config);
                }
                ActionDefinition::Range {
                    id,
                    range,
                    step,
                    current_value,
                    handler,
                } => {
                    let action = RangeAction {
                        range: *range,
                        current_value: *current_value,
                        set_value: Arc::clone(handler),
                    };
                    let config = RangeConfig {
                        axis: self.store.axis(id).cloned(),
                        clicks: Some(RangeClicks {
                            up: self.store.click(&BindingKey::up(id.as_str())).cloned(),
                            down: self.store.click(&BindingKey::down(id.as_str())).cloned(),
                            center: self.store.click(&BindingKey::center(id.as_str())).cloned(),
                            step: *step,
                        }),
                    };
                    self.manager.add_range_action(action, Some(config));
                }
            }
        }
        self.manager.start();
    }

    /// Stop listening and drop every registration.
    pub fn destroy(&mut self) {
        self.recorder.finish(&mut self.store, &mut self.manager);
        self.close_editor_signal();
        self.manager.stop(true);
        log::debug!("hotkeys destroyed");
    }

    /// Route one raw event: to the active capture session if there is one, otherwise to
    /// dispatch. Returns how many registrations received it.
    pub fn process_event(&mut self, event: &RawInputEvent) -> usize {
        if let RawInputEvent::GamepadConnected {
            gamepad_index,
            name,
        } = event
        {
            log::debug!("gamepad {gamepad_index} connected: {name}");
            self.gamepads.insert(*gamepad_index, name.clone());
            return 0;
        }
        match self
            .recorder
            .handle_event(event, &mut self.store, &mut self.manager)
        {
            RecorderOutcome::Ignored => self.manager.handle_event(event),
            RecorderOutcome::Pending | RecorderOutcome::Committed(_) => 0,
        }
    }

    /// Advance velocity integration to `now`.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.manager.tick(now)
    }

    /// When the next velocity tick is due, if any.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.manager.next_tick_deadline()
    }

    pub fn is_recording(&self) -> bool {
        self.recorder.is_active()
    }

    /// Open the binding editor. The handle resolves when the editor closes; opening again
    /// resolves the previous handle.
    pub fn open_binding_editor(&mut self) -> EditorHandle {
        self.close_binding_editor();
        let (closer, handle) = EditorHandle::pair();
        self.editor = Some(closer);
        log::debug!("binding editor opened");
        handle
    }

    /// Close the editor, cancelling any capture in progress.
    pub fn close_binding_editor(&mut self) {
        self.recorder.finish(&mut self.store, &mut self.manager);
        self.close_editor_signal();
    }

    pub fn is_editor_open(&self) -> bool {
        self.editor.is_some()
    }

    /// Rows of the editor, reflecting the store and any capture in progress.
    pub fn editor_entries(&self) -> Vec<EditorEntry> {
        editor_entries(&self.actions, &self.store, &self.gamepads, &self.recorder)
    }

    /// Start capturing a new binding for the editor row at `index`. Returns false when the
    /// editor is closed or the row does not exist.
    pub fn select_entry(&mut self, index: usize) -> bool {
        if self.editor.is_none() {
            return false;
        }
        match self.editor_entries().into_iter().nth(index) {
            Some(entry) => {
                self.begin_capture(entry.target);
                true
            }
            None => false,
        }
    }

    /// Start capturing a new binding for `target`, cancelling any session in progress.
    pub fn begin_capture(&mut self, target: EditorTarget) {
        match target {
            EditorTarget::Click(key) => {
                self.recorder
                    .begin_key(key, &mut self.store, &mut self.manager)
            }
            EditorTarget::Axis(id) => {
                self.recorder
                    .begin_axis(id, &mut self.store, &mut self.manager)
            }
        }
    }

    /// Abandon the capture in progress, keeping the previous binding.
    pub fn cancel_capture(&mut self) {
        self.recorder.finish(&mut self.store, &mut self.manager);
    }

    /// Apply the edited bindings: log them, then [`Hotkeys::reset`] (which closes the editor).
    pub fn confirm_binding_editor(&mut self) {
        for action in &self.actions {
            if let Some(binding) = self.store.click(&BindingKey::new(action.id())) {
                log::info!(
                    "{} : {}",
                    action.id(),
                    print_click(Some(binding), &self.gamepads)
                );
            }
        }
        self.reset();
    }

    fn close_editor_signal(&mut self) {
        if let Some(closer) = self.editor.take() {
            closer.close();
            log::debug!("binding editor closed");
        }
    }
}

impl Drop for Hotkeys {
    fn drop(&mut self) {
        self.close_editor_signal();
    }
}

impl std::fmt::Debug for Hotkeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hotkeys")
            .field("actions", &self.actions)
            .field("store", &self.store)
            .field("manager", &self.manager)
            .field("recorder", &self.recorder)
            .field("editor_open", &self.editor.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::ClickBinding;
    use crate::error::HotbindError;
    use parking_lot::Mutex;

    fn counter() -> (Arc<Mutex<u32>>, ActionDefinition) {
        let count = Arc::new(Mutex::new(0));
        let sink = Arc::clone(&count);
        (
            count,
            ActionDefinition::click("fire", move || *sink.lock() += 1),
        )
    }

    #[test]
    fn rejects_duplicate_ids() {
        let actions = vec![
            ActionDefinition::click("fire", || {}),
            ActionDefinition::momentary("fire", |_| {}),
        ];
        assert!(matches!(
            Hotkeys::new(actions, &HotkeysConfig::default()),
            Err(HotbindError::DuplicateActionId { .. })
        ));
    }

    #[test]
    fn store_changes_apply_on_reset() {
        let (count, action) = counter();
        let mut hotkeys = Hotkeys::new(vec![action], &HotkeysConfig::default()).unwrap();
        assert!(hotkeys.manager().is_listening());

        hotkeys
            .store_mut()
            .set_click(BindingKey::new("fire"), ClickBinding::button(0, 0));
        assert_eq!(hotkeys.process_event(&RawInputEvent::button(0, 0, true)), 0);

        hotkeys.reset();
        assert_eq!(hotkeys.process_event(&RawInputEvent::button(0, 0, true)), 1);
        assert_eq!(*count.lock(), 1);
    }

    #[test]
    fn select_entry_requires_open_editor() {
        let (_count, action) = counter();
        let mut hotkeys = Hotkeys::new(vec![action], &HotkeysConfig::default()).unwrap();
        assert!(!hotkeys.select_entry(0));

        let _handle = hotkeys.open_binding_editor();
        assert!(!hotkeys.select_entry(5));
        assert!(hotkeys.select_entry(0));
        assert!(hotkeys.is_recording());
    }

    #[test]
    fn connection_events_name_gamepads() {
        let mut hotkeys = Hotkeys::new(
            vec![ActionDefinition::click("fire", || {})],
            &HotkeysConfig::default(),
        )
        .unwrap();
        hotkeys
            .store_mut()
            .set_click(BindingKey::new("fire"), ClickBinding::button(2, 1));
        hotkeys.process_event(&RawInputEvent::GamepadConnected {
            gamepad_index: 2,
            name: "Arcade Stick".to_string(),
        });
        assert_eq!(hotkeys.editor_entries()[0].label, "button 1 on Arcade Stick");
    }

    #[test]
    fn destroy_stops_everything() {
        let (count, action) = counter();
        let mut store = BindingStore::new();
        store.set_click(BindingKey::new("fire"), ClickBinding::button(0, 0));
        let mut hotkeys =
            Hotkeys::with_store(vec![action], store, &HotkeysConfig::default()).unwrap();
        let mut handle = hotkeys.open_binding_editor();

        hotkeys.destroy();
        assert!(handle.is_closed());
        assert!(!hotkeys.manager().is_listening());
        assert_eq!(hotkeys.manager().registration_count(), 0);
        assert_eq!(hotkeys.process_event(&RawInputEvent::button(0, 0, true)), 0);
        assert_eq!(*count.lock(), 0);
    }
}
