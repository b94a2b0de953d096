//! Physical binding value types.

use crate::range::is_in_range;
use std::collections::BTreeSet;
use std::fmt;

/// Glyph-style key names some keyboard hooks report, and the canonical token for each.
const KEY_NAME_TRANSLATIONS: &[(&str, &str)] = &[
    ("⌫", "backspace"),
    ("↩", "enter"),
    ("⇪", "capslock"),
    ("⇧", "shift"),
    ("⌥", "alt"),
    ("⌃", "ctrl"),
    ("⌘", "cmd"),
    ("+", "plus"),
];

/// Canonical token for a single key name: glyphs are translated, everything is lowercased.
pub fn translate_key_name(name: &str) -> String {
    let trimmed = name.trim();
    KEY_NAME_TRANSLATIONS
        .iter()
        .find(|(glyph, _)| *glyph == trimmed)
        .map(|(_, token)| (*token).to_string())
        .unwrap_or_else(|| trimmed.to_lowercase())
}

/// Composite combo string for a set of held keys, e.g. `["⇧", "K"]` -> `"shift+k"`.
pub fn key_combo<S: AsRef<str>>(active_keys: &[S]) -> String {
    active_keys
        .iter()
        .map(|key| translate_key_name(key.as_ref()))
        .filter(|key| !key.is_empty())
        .collect::<Vec<_>>()
        .join("+")
}

fn key_set<'a, I>(keys: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a str>,
{
    keys.into_iter()
        .map(translate_key_name)
        .filter(|key| !key.is_empty())
        .collect()
}

/// A keyboard key or key combination such as `"k"` or `"shift+k"`, stored normalised.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "config",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct KeyBinding(String);

impl KeyBinding {
    /// Normalise a raw combo string. Returns `None` for an empty combo.
    ///
    /// `+` separates keys, so the plus key itself is written `plus` (`"shift+plus"`).
    pub fn parse(raw: &str) -> Option<Self> {
        let combo = key_combo(&raw.split('+').collect::<Vec<_>>());
        if combo.is_empty() {
            None
        } else {
            Some(Self(combo))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Individual key tokens making up the combo.
    pub fn parts(&self) -> impl Iterator<Item = &str> {
        self.0.split('+')
    }

    /// True when exactly the keys of this combo are held, no more and no fewer.
    pub fn matches_exactly<S: AsRef<str>>(&self, active_keys: &[S]) -> bool {
        key_set(self.parts()) == key_set(active_keys.iter().map(AsRef::as_ref))
    }

    /// True when `name` is one of the keys of this combo.
    pub fn contains_key(&self, name: &str) -> bool {
        let name = translate_key_name(name);
        self.parts().any(|part| part == name)
    }

    /// True when every key of this combo is among `active_keys`.
    pub fn is_held_in<S: AsRef<str>>(&self, active_keys: &[S]) -> bool {
        let held = key_set(active_keys.iter().map(AsRef::as_ref));
        key_set(self.parts()).is_subset(&held)
    }
}

impl fmt::Display for KeyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for KeyBinding {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| "empty key binding".to_string())
    }
}

impl From<KeyBinding> for String {
    fn from(value: KeyBinding) -> Self {
        value.0
    }
}

/// A gamepad button. Two bindings are the same button iff both indices match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
pub struct ButtonBinding {
    pub gamepad_index: usize,
    pub button_index: usize,
}

impl ButtonBinding {
    pub const fn new(gamepad_index: usize, button_index: usize) -> Self {
        Self {
            gamepad_index,
            button_index,
        }
    }
}

/// A gamepad axis with its optional shaping.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
pub struct AxisBinding {
    pub gamepad_index: usize,
    pub axis_index: usize,
    /// Open interval of raw readings collapsed to zero.
    #[cfg_attr(
        feature = "config",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub deadzone: Option<(f64, f64)>,
    #[cfg_attr(feature = "config", serde(default))]
    pub inverted: bool,
    /// When non-zero the axis drives a rate of change instead of a position.
    #[cfg_attr(
        feature = "config",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub velocity: Option<f64>,
}

impl AxisBinding {
    pub fn new(gamepad_index: usize, axis_index: usize) -> Self {
        Self {
            gamepad_index,
            axis_index,
            deadzone: None,
            inverted: false,
            velocity: None,
        }
    }

    pub fn with_deadzone(mut self, low: f64, high: f64) -> Self {
        self.deadzone = Some((low, high));
        self
    }

    pub fn with_inverted(mut self, inverted: bool) -> Self {
        self.inverted = inverted;
        self
    }

    pub fn with_velocity(mut self, velocity: f64) -> Self {
        self.velocity = Some(velocity);
        self
    }

    /// Velocity scale, if this axis is a rate control.
    pub fn velocity_scale(&self) -> Option<f64> {
        self.velocity.filter(|v| *v != 0.0)
    }

    pub fn is_same_axis(&self, gamepad_index: usize, axis_index: usize) -> bool {
        self.gamepad_index == gamepad_index && self.axis_index == axis_index
    }

    /// Apply inversion then the deadzone to a raw reading.
    pub fn shape(&self, raw_value: f64) -> f64 {
        let value = if self.inverted { -raw_value } else { raw_value };
        match self.deadzone {
            Some((low, high)) if is_in_range(low, high, value) => 0.0,
            _ => value,
        }
    }
}

/// Anything that can be clicked: a key combo or a gamepad button.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "config",
    derive(serde::Serialize, serde::Deserialize),
    serde(untagged)
)]
pub enum ClickBinding {
    Key(KeyBinding),
    Button(ButtonBinding),
}

impl ClickBinding {
    /// Key binding from a raw combo string; `None` when the combo is empty.
    pub fn key(raw: &str) -> Option<Self> {
        KeyBinding::parse(raw).map(Self::Key)
    }

    pub fn button(gamepad_index: usize, button_index: usize) -> Self {
        Self::Button(ButtonBinding::new(gamepad_index, button_index))
    }
}

impl From<KeyBinding> for ClickBinding {
    fn from(value: KeyBinding) -> Self {
        Self::Key(value)
    }
}

impl From<ButtonBinding> for ClickBinding {
    fn from(value: ButtonBinding) -> Self {
        Self::Button(value)
    }
}
