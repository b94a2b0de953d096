//! The binding store: the only mutable, persisted state of the system.
//!
//! Click bindings are keyed by [`BindingKey`] (an action id plus an optional `.up` / `.down` /
//! `.center` part); axis bindings are keyed by the bare action id. A slot that is being captured
//! holds [`Slot::Recording`] instead of a half-written value, and lookups used by dispatch only
//! ever return bound values.

use super::physical::{AxisBinding, ClickBinding};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

/// Sub-binding of a steps or range action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClickPart {
    Up,
    Down,
    Center,
}

impl ClickPart {
    pub fn suffix(self) -> &'static str {
        match self {
            ClickPart::Up => "up",
            ClickPart::Down => "down",
            ClickPart::Center => "center",
        }
    }

    /// Human label used by the binding editor, e.g. `"Up"`.
    pub fn title(self) -> &'static str {
        match self {
            ClickPart::Up => "Up",
            ClickPart::Down => "Down",
            ClickPart::Center => "Center",
        }
    }

    fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "up" => Some(ClickPart::Up),
            "down" => Some(ClickPart::Down),
            "center" => Some(ClickPart::Center),
            _ => None,
        }
    }
}

/// Composite store key: `"fire"`, `"zoom.up"`, `"throttle.center"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BindingKey {
    pub action_id: String,
    pub part: Option<ClickPart>,
}

impl BindingKey {
    pub fn new(action_id: impl Into<String>) -> Self {
        Self {
            action_id: action_id.into(),
            part: None,
        }
    }

    pub fn with_part(action_id: impl Into<String>, part: ClickPart) -> Self {
        Self {
            action_id: action_id.into(),
            part: Some(part),
        }
    }

    pub fn up(action_id: impl Into<String>) -> Self {
        Self::with_part(action_id, ClickPart::Up)
    }

    pub fn down(action_id: impl Into<String>) -> Self {
        Self::with_part(action_id, ClickPart::Down)
    }

    pub fn center(action_id: impl Into<String>) -> Self {
        Self::with_part(action_id, ClickPart::Center)
    }
}

impl fmt::Display for BindingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.part {
            Some(part) => write!(f, "{}.{}", self.action_id, part.suffix()),
            None => f.write_str(&self.action_id),
        }
    }
}

impl BindingKey {
    /// Split a composite key. A trailing `.up` / `.down` / `.center` becomes the part; any
    /// other dot stays in the action id.
    pub fn from_composite(s: &str) -> Self {
        if let Some((id, suffix)) = s.rsplit_once('.') {
            if let Some(part) = ClickPart::from_suffix(suffix) {
                return Self::with_part(id, part);
            }
        }
        Self::new(s)
    }
}

impl FromStr for BindingKey {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::from_composite(s))
    }
}

/// A stored binding, or the marker for "capture in progress".
#[derive(Debug, Clone, PartialEq)]
pub enum Slot<T> {
    Bound(T),
    Recording,
}

impl<T> Slot<T> {
    pub fn bound(&self) -> Option<&T> {
        match self {
            Slot::Bound(value) => Some(value),
            Slot::Recording => None,
        }
    }

    pub fn is_recording(&self) -> bool {
        matches!(self, Slot::Recording)
    }
}

/// Plain snapshot of every bound value, suitable for persistence.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
pub struct SavedBindings {
    #[cfg_attr(feature = "config", serde(default))]
    pub clicks: BTreeMap<String, ClickBinding>,
    #[cfg_attr(feature = "config", serde(default))]
    pub axes: BTreeMap<String, AxisBinding>,
}

/// Mapping from store keys to their current binding.
#[derive(Debug, Clone, Default)]
pub struct BindingStore {
    clicks: HashMap<BindingKey, Slot<ClickBinding>>,
    axes: HashMap<String, Slot<AxisBinding>>,
}

impl BindingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The bound click for `key`; `None` when unbound or being recorded.
    pub fn click(&self, key: &BindingKey) -> Option<&ClickBinding> {
        self.clicks.get(key).and_then(Slot::bound)
    }

    /// The bound axis for `action_id`; `None` when unbound or being recorded.
    pub fn axis(&self, action_id: &str) -> Option<&AxisBinding> {
        self.axes.get(action_id).and_then(Slot::bound)
    }

    pub fn click_slot(&self, key: &BindingKey) -> Option<&Slot<ClickBinding>> {
        self.clicks.get(key)
    }

    pub fn axis_slot(&self, action_id: &str) -> Option<&Slot<AxisBinding>> {
        self.axes.get(action_id)
    }

    pub fn set_click(&mut self, key: BindingKey, binding: ClickBinding) {
        self.clicks.insert(key, Slot::Bound(binding));
    }

    pub fn set_axis(&mut self, action_id: impl Into<String>, binding: AxisBinding) {
        self.axes.insert(action_id.into(), Slot::Bound(binding));
    }

    /// Mark `key` as being recorded, returning the value it held before.
    pub fn begin_click_capture(&mut self, key: &BindingKey) -> Option<ClickBinding> {
        match self.clicks.insert(key.clone(), Slot::Recording) {
            Some(Slot::Bound(binding)) => Some(binding),
            _ => None,
        }
    }

    /// Mark the axis of `action_id` as being recorded, returning the value it held before.
    pub fn begin_axis_capture(&mut self, action_id: &str) -> Option<AxisBinding> {
        match self.axes.insert(action_id.to_string(), Slot::Recording) {
            Some(Slot::Bound(binding)) => Some(binding),
            _ => None,
        }
    }

    /// Put `original` back if `key` is still marked as recording. Committed values are kept.
    pub fn restore_click(&mut self, key: &BindingKey, original: Option<ClickBinding>) {
        if self.clicks.get(key).map_or(false, Slot::is_recording) {
            match original {
                Some(binding) => self.set_click(key.clone(), binding),
                None => {
                    self.clicks.remove(key);
                }
            }
        }
    }

    /// Put `original` back if the axis of `action_id` is still marked as recording.
    pub fn restore_axis(&mut self, action_id: &str, original: Option<AxisBinding>) {
        if self.axes.get(action_id).map_or(false, Slot::is_recording) {
            match original {
                Some(binding) => self.set_axis(action_id, binding),
                None => {
                    self.axes.remove(action_id);
                }
            }
        }
    }

    /// True while any slot is marked as recording.
    pub fn has_pending_capture(&self) -> bool {
        self.clicks.values().any(Slot::is_recording) || self.axes.values().any(Slot::is_recording)
    }

    /// Copy out every bound value. Slots being recorded are skipped.
    pub fn snapshot(&self) -> SavedBindings {
        SavedBindings {
            clicks: self
                .clicks
                .iter()
                .filter_map(|(key, slot)| slot.bound().map(|b| (key.to_string(), b.clone())))
                .collect(),
            axes: self
                .axes
                .iter()
                .filter_map(|(id, slot)| slot.bound().map(|b| (id.clone(), b.clone())))
                .collect(),
        }
    }

    /// Rebuild a store from a snapshot.
    pub fn from_saved(saved: SavedBindings) -> Self {
        let mut store = Self::new();
        for (key, binding) in saved.clicks {
            store.set_click(BindingKey::from_composite(&key), binding);
        }
        for (id, binding) in saved.axes {
            store.set_axis(id, binding);
        }
        store
    }
}
