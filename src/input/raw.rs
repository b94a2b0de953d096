//! Raw physical events as published by keyboard and gamepad collaborators.
//!
//! These are the only shapes the dispatch core consumes. Producers (a terminal key hook, a
//! gamepad poller, a test script) translate their native events into [`RawInputEvent`]s.

/// Edge of a key transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEdge {
    Down,
    Up,
}

/// A key went down or up.
///
/// `active_keys` lists every key held at the moment of the transition, in press order. For a
/// key-up this is the set held just before the release, so it still contains the released key.
/// `key` is the key that changed state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyTransition {
    pub edge: KeyEdge,
    pub active_keys: Vec<String>,
    pub key: Option<String>,
}

impl KeyTransition {
    /// The last of `active_keys` went down.
    pub fn down<S: Into<String>>(active_keys: impl IntoIterator<Item = S>) -> Self {
        Self::last_changed(KeyEdge::Down, active_keys)
    }

    /// The last of `active_keys` was released.
    pub fn up<S: Into<String>>(active_keys: impl IntoIterator<Item = S>) -> Self {
        Self::last_changed(KeyEdge::Up, active_keys)
    }

    /// `released` went up while `active_keys` were held.
    pub fn release<S: Into<String>>(
        active_keys: impl IntoIterator<Item = S>,
        released: impl Into<String>,
    ) -> Self {
        Self {
            edge: KeyEdge::Up,
            active_keys: active_keys.into_iter().map(Into::into).collect(),
            key: Some(released.into()),
        }
    }

    fn last_changed<S: Into<String>>(
        edge: KeyEdge,
        active_keys: impl IntoIterator<Item = S>,
    ) -> Self {
        let active_keys: Vec<String> = active_keys.into_iter().map(Into::into).collect();
        let key = active_keys.last().cloned();
        Self {
            edge,
            active_keys,
            key,
        }
    }
}

/// A gamepad button changed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonEvent {
    pub gamepad_index: usize,
    pub button_index: usize,
    pub pressed: bool,
}

/// A gamepad axis reported a new reading in `[-1, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisEvent {
    pub gamepad_index: usize,
    pub axis_index: usize,
    pub value: f64,
}

/// Low-level events surfaced by an input source.
#[derive(Debug, Clone, PartialEq)]
pub enum RawInputEvent {
    Key(KeyTransition),
    Button(ButtonEvent),
    Axis(AxisEvent),
    /// A gamepad appeared; the name is only used for display.
    GamepadConnected { gamepad_index: usize, name: String },
}

impl RawInputEvent {
    pub fn key_down<S: Into<String>>(active_keys: impl IntoIterator<Item = S>) -> Self {
        Self::Key(KeyTransition::down(active_keys))
    }

    pub fn key_up<S: Into<String>>(active_keys: impl IntoIterator<Item = S>) -> Self {
        Self::Key(KeyTransition::up(active_keys))
    }

    pub fn key_release<S: Into<String>>(
        active_keys: impl IntoIterator<Item = S>,
        released: impl Into<String>,
    ) -> Self {
        Self::Key(KeyTransition::release(active_keys, released))
    }

    pub fn button(gamepad_index: usize, button_index: usize, pressed: bool) -> Self {
        Self::Button(ButtonEvent {
            gamepad_index,
            button_index,
            pressed,
        })
    }

    pub fn axis(gamepad_index: usize, axis_index: usize, value: f64) -> Self {
        Self::Axis(AxisEvent {
            gamepad_index,
            axis_index,
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_build_expected_variants() {
        assert_eq!(
            RawInputEvent::key_down(["shift", "k"]),
            RawInputEvent::Key(KeyTransition {
                edge: KeyEdge::Down,
                active_keys: vec!["shift".to_string(), "k".to_string()],
                key: Some("k".to_string()),
            })
        );
        assert_eq!(
            RawInputEvent::key_release(["w", "d"], "w"),
            RawInputEvent::Key(KeyTransition {
                edge: KeyEdge::Up,
                active_keys: vec!["w".to_string(), "d".to_string()],
                key: Some("w".to_string()),
            })
        );
        assert_eq!(
            RawInputEvent::button(1, 4, true),
            RawInputEvent::Button(ButtonEvent {
                gamepad_index: 1,
                button_index: 4,
                pressed: true,
            })
        );
        assert!(matches!(
            RawInputEvent::axis(0, 2, -0.5),
            RawInputEvent::Axis(AxisEvent { axis_index: 2, .. })
        ));
    }
}
