//! Input manager: routes raw physical events to registered action callbacks.
//!
//! Registrations are flat lists of (key -> callback), (button -> callback) and
//! (axis -> callback). Every raw event is fanned out to each registration that matches it;
//! unmatched events are dropped silently. `start`/`stop` only attach or detach the manager from
//! the event stream, so registrations survive a pause (e.g. while a binding is being recorded).

use crate::action::{ClickHandler, MomentaryHandler, ValueHandler};
use crate::binding::{AxisBinding, ButtonBinding, ClickBinding, KeyBinding};
use crate::input::combiner::RangeCombiner;
use crate::input::raw::{AxisEvent, ButtonEvent, KeyEdge, KeyTransition, RawInputEvent};
use crate::input::ticker::TickSource;
use crate::range::Span;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

/// Up/down click pair of a steps action.
#[derive(Debug, Clone, PartialEq)]
pub struct StepsConfig {
    pub up: ClickBinding,
    pub down: ClickBinding,
    pub step: f64,
}

/// Click triple feeding a range action. Unbound members are simply not registered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RangeClicks {
    pub up: Option<ClickBinding>,
    pub down: Option<ClickBinding>,
    pub center: Option<ClickBinding>,
    pub step: f64,
}

impl RangeClicks {
    fn is_empty(&self) -> bool {
        self.up.is_none() && self.down.is_none() && self.center.is_none()
    }
}

/// Every physical source that may feed one range action.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RangeConfig {
    pub axis: Option<AxisBinding>,
    pub clicks: Option<RangeClicks>,
}

/// The receiving side of a range action.
#[derive(Clone)]
pub struct RangeAction {
    pub range: Span,
    pub current_value: Option<f64>,
    pub set_value: ValueHandler,
}

struct AxisListener {
    axis: AxisBinding,
    range: Span,
    set_value: ValueHandler,
}

struct ButtonListener {
    button: ButtonBinding,
    set_value: Option<MomentaryHandler>,
    on_click: Option<ClickHandler>,
}

struct KeyListener {
    key: KeyBinding,
    set_value: Option<MomentaryHandler>,
    on_click: Option<ClickHandler>,
    /// Last edge delivered; repeats of the same edge are swallowed.
    last_edge: Option<KeyEdge>,
}

/// Dispatch core holding the live registrations.
pub struct InputManager {
    axes: Vec<AxisListener>,
    buttons: Vec<ButtonListener>,
    keys: Vec<KeyListener>,
    ticker: TickSource,
    listening: bool,
}

impl InputManager {
    pub fn new() -> Self {
        Self::with_ticker(TickSource::default())
    }

    pub fn with_ticker(ticker: TickSource) -> Self {
        Self {
            axes: Vec::new(),
            buttons: Vec::new(),
            keys: Vec::new(),
            ticker,
            listening: false,
        }
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    /// Total number of key, button and axis registrations.
    pub fn registration_count(&self) -> usize {
        self.axes.len() + self.buttons.len() + self.keys.len()
    }

    /// When the next velocity tick is due, if listening.
    pub fn next_tick_deadline(&self) -> Option<Instant> {
        if self.listening {
            self.ticker.next_deadline()
        } else {
            None
        }
    }

    pub fn add_click_action(&mut self, on_click: ClickHandler, binding: Option<ClickBinding>) {
        match binding {
            Some(ClickBinding::Button(button)) => self.buttons.push(ButtonListener {
                button,
                set_value: None,
                on_click: Some(on_click),
            }),
            Some(ClickBinding::Key(key)) => self.keys.push(KeyListener {
                key,
                set_value: None,
                on_click: Some(on_click),
                last_edge: None,
            }),
            None => {}
        }
    }

    pub fn add_momentary_click_action(
        &mut self,
        set_value: MomentaryHandler,
        binding: Option<ClickBinding>,
    ) {
        match binding {
            Some(ClickBinding::Button(button)) => self.buttons.push(ButtonListener {
                button,
                set_value: Some(set_value),
                on_click: None,
            }),
            Some(ClickBinding::Key(key)) => self.keys.push(KeyListener {
                key,
                set_value: Some(set_value),
                on_click: None,
                last_edge: None,
            }),
            None => {}
        }
    }

    /// Each click flips the boolean read through `get_value`.
    pub fn add_toggle_click_action(
        &mut self,
        get_value: Arc<dyn Fn() -> bool + Send + Sync>,
        set_value: MomentaryHandler,
        binding: Option<ClickBinding>,
    ) {
        let on_click: ClickHandler = Arc::new(move || set_value(!get_value()));
        self.add_click_action(on_click, binding);
    }

    pub fn add_steps_action(&mut self, set_value: ValueHandler, config: Option<StepsConfig>) {
        if let Some(StepsConfig { up, down, step }) = config {
            let up_value = Arc::clone(&set_value);
            self.add_click_action(Arc::new(move || up_value(step)), Some(up));
            self.add_click_action(Arc::new(move || set_value(-step)), Some(down));
        }
    }

    /// Wire every source of a range action.
    ///
    /// A lone position axis goes straight to the handler. Any click binding or a rate-control
    /// axis routes through a shared [`RangeCombiner`] instead.
    pub fn add_range_action(&mut self, action: RangeAction, config: Option<RangeConfig>) {
        let Some(RangeConfig { axis, clicks }) = config else {
            return;
        };
        let clicks = clicks.filter(|clicks| !clicks.is_empty());
        let velocity = axis.as_ref().and_then(AxisBinding::velocity_scale);

        if clicks.is_none() && velocity.is_none() {
            if let Some(axis) = axis {
                self.axes.push(AxisListener {
                    axis,
                    range: action.range,
                    set_value: action.set_value,
                });
            }
            return;
        }

        let combiner = RangeCombiner::new(
            action.range,
            action.current_value,
            axis.is_some(),
            action.set_value,
        );

        if let Some(RangeClicks {
            up,
            down,
            center,
            step,
        }) = clicks
        {
            self.add_click_action(combiner.center_handler(), center);
            match (up, down) {
                (Some(up), Some(down)) => {
                    self.add_click_action(combiner.step_handler(step), Some(up));
                    self.add_click_action(combiner.step_handler(-step), Some(down));
                }
                (None, None) => {}
                _ => log::warn!("range action has only one of up/down bound; ignoring the pair"),
            }
        }

        if let Some(axis) = axis {
            let set_value = match velocity {
                Some(scale) => {
                    self.ticker.on_tick(combiner.tick_listener());
                    combiner.velocity_handler(scale)
                }
                None => combiner.axis_handler(),
            };
            self.axes.push(AxisListener {
                axis,
                range: action.range,
                set_value,
            });
        }
    }

    /// Attach to the event stream. No-op while already listening.
    pub fn start(&mut self) {
        self.start_at(Instant::now());
    }

    /// [`InputManager::start`] with an explicit clock reading for the tick source.
    pub fn start_at(&mut self, now: Instant) {
        if self.listening {
            return;
        }
        for key in self.keys.iter_mut() {
            key.last_edge = None;
        }
        self.ticker.start(now);
        self.listening = true;
        log::debug!(
            "input manager listening ({} registrations)",
            self.registration_count()
        );
    }

    /// Detach from the event stream; with `clear`, also drop every registration.
    pub fn stop(&mut self, clear: bool) {
        if self.listening {
            self.ticker.stop();
            self.listening = false;
            log::debug!("input manager stopped");
        }
        if clear {
            self.ticker.clear();
            self.axes.clear();
            self.buttons.clear();
            self.keys.clear();
        }
    }

    /// Dispatch one raw event. Returns how many registrations it reached.
    pub fn handle_event(&mut self, event: &RawInputEvent) -> usize {
        if !self.listening {
            return 0;
        }
        match event {
            RawInputEvent::Key(transition) => self.on_key(transition),
            RawInputEvent::Button(button) => self.on_button(button),
            RawInputEvent::Axis(axis) => self.on_axis(axis),
            RawInputEvent::GamepadConnected { .. } => 0,
        }
    }

    /// Advance the velocity tick source to `now`.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.listening && self.ticker.advance(now)
    }

    fn on_button(&mut self, event: &ButtonEvent) -> usize {
        let mut reached = 0;
        for listener in &self.buttons {
            if listener.button.gamepad_index != event.gamepad_index
                || listener.button.button_index != event.button_index
            {
                continue;
            }
            reached += 1;
            if let Some(set_value) = &listener.set_value {
                set_value(event.pressed);
            }
            if event.pressed {
                if let Some(on_click) = &listener.on_click {
                    on_click();
                }
            }
        }
        reached
    }

    fn on_axis(&mut self, event: &AxisEvent) -> usize {
        let mut reached = 0;
        for listener in &self.axes {
            if !listener
                .axis
                .is_same_axis(event.gamepad_index, event.axis_index)
            {
                continue;
            }
            reached += 1;
            let shaped = listener.axis.shape(event.value);
            (listener.set_value)(listener.range.lerp_axis(shaped));
        }
        reached
    }

    fn on_key(&mut self, event: &KeyTransition) -> usize {
        let mut reached = 0;
        for listener in self.keys.iter_mut() {
            let matched = match event.edge {
                KeyEdge::Down => listener.key.matches_exactly(&event.active_keys),
                KeyEdge::Up => {
                    listener.last_edge == Some(KeyEdge::Down)
                        && listener.key.is_held_in(&event.active_keys)
                        && event
                            .key
                            .as_deref()
                            .map_or(true, |released| listener.key.contains_key(released))
                }
            };
            if !matched || listener.last_edge == Some(event.edge) {
                continue;
            }
            listener.last_edge = Some(event.edge);
            reached += 1;

            let pressed = event.edge == KeyEdge::Down;
            if pressed {
                if let Some(on_click) = &listener.on_click {
                    on_click();
                }
            }
            if let Some(set_value) = &listener.set_value {
                set_value(pressed);
            }
        }
        reached
    }
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for InputManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputManager")
            .field("axes", &self.axes.len())
            .field("buttons", &self.buttons.len())
            .field("keys", &self.keys.len())
            .field("ticker", &self.ticker)
            .field("listening", &self.listening)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct Log(Mutex<Vec<String>>);

    impl Log {
        fn push(&self, entry: impl Into<String>) {
            self.0.lock().push(entry.into());
        }

        fn take(&self) -> Vec<String> {
            std::mem::take(&mut *self.0.lock())
        }
    }

    fn click(log: &Arc<Log>, name: &'static str) -> ClickHandler {
        let log = Arc::clone(log);
        Arc::new(move || log.push(name))
    }

    fn momentary(log: &Arc<Log>, name: &'static str) -> MomentaryHandler {
        let log = Arc::clone(log);
        Arc::new(move |v: bool| log.push(format!("{name}:{v}")))
    }

    fn value(log: &Arc<Log>, name: &'static str) -> ValueHandler {
        let log = Arc::clone(log);
        Arc::new(move |v: f64| log.push(format!("{name}:{v}")))
    }

    #[test]
    fn unresolved_binding_registers_nothing() {
        let log = Arc::new(Log::default());
        let mut manager = InputManager::new();
        manager.add_click_action(click(&log, "fire"), None);
        manager.add_steps_action(value(&log, "gear"), None);
        manager.add_range_action(
            RangeAction {
                range: Span::new(0.0, 1.0),
                current_value: None,
                set_value: value(&log, "throttle"),
            },
            None,
        );
        assert_eq!(manager.registration_count(), 0);
    }

    #[test]
    fn button_fires_value_and_click() {
        let log = Arc::new(Log::default());
        let mut manager = InputManager::new();
        manager.add_momentary_click_action(
            momentary(&log, "boost"),
            Some(ClickBinding::button(0, 2)),
        );
        manager.add_click_action(click(&log, "fire"), Some(ClickBinding::button(0, 2)));
        manager.start();

        assert_eq!(manager.handle_event(&RawInputEvent::button(0, 2, true)), 2);
        assert_eq!(manager.handle_event(&RawInputEvent::button(0, 2, false)), 2);
        assert_eq!(manager.handle_event(&RawInputEvent::button(1, 2, true)), 0);

        assert_eq!(log.take(), vec!["boost:true", "fire", "boost:false"]);
    }

    #[test]
    fn key_repeat_is_debounced() {
        let log = Arc::new(Log::default());
        let mut manager = InputManager::new();
        manager.add_momentary_click_action(momentary(&log, "boost"), ClickBinding::key("b"));
        manager.start();

        manager.handle_event(&RawInputEvent::key_down(["b"]));
        manager.handle_event(&RawInputEvent::key_down(["b"]));
        manager.handle_event(&RawInputEvent::key_down(["b"]));
        manager.handle_event(&RawInputEvent::key_up(["b"]));

        assert_eq!(log.take(), vec!["boost:true", "boost:false"]);
    }

    #[test]
    fn key_combo_requires_exact_modifiers() {
        let log = Arc::new(Log::default());
        let mut manager = InputManager::new();
        manager.add_click_action(click(&log, "save"), ClickBinding::key("ctrl+s"));
        manager.start();

        manager.handle_event(&RawInputEvent::key_down(["s"]));
        manager.handle_event(&RawInputEvent::key_up(["s"]));
        assert!(log.take().is_empty());

        manager.handle_event(&RawInputEvent::key_down(["ctrl"]));
        manager.handle_event(&RawInputEvent::key_down(["ctrl", "s"]));
        manager.handle_event(&RawInputEvent::key_up(["ctrl", "s"]));
        assert_eq!(log.take(), vec!["save"]);
    }

    #[test]
    fn releasing_another_key_keeps_binding_held() {
        let log = Arc::new(Log::default());
        let mut manager = InputManager::new();
        manager.add_momentary_click_action(momentary(&log, "boost"), ClickBinding::key("k"));
        manager.start();

        manager.handle_event(&RawInputEvent::key_down(["k"]));
        manager.handle_event(&RawInputEvent::key_down(["k", "j"]));
        manager.handle_event(&RawInputEvent::key_release(["k", "j"], "j"));
        assert_eq!(log.take(), vec!["boost:true"]);

        manager.handle_event(&RawInputEvent::key_release(["k"], "k"));
        assert_eq!(log.take(), vec!["boost:false"]);
    }

    #[test]
    fn toggle_flips_current_value() {
        let log = Arc::new(Log::default());
        let state = Arc::new(Mutex::new(false));
        let mut manager = InputManager::new();
        let (read, write) = (Arc::clone(&state), Arc::clone(&state));
        let sink = Arc::clone(&log);
        manager.add_toggle_click_action(
            Arc::new(move || *read.lock()),
            Arc::new(move |v: bool| {
                *write.lock() = v;
                sink.push(format!("light:{v}"));
            }),
            ClickBinding::key("l"),
        );
        manager.add_toggle_click_action(
            Arc::new(|| true),
            momentary(&log, "horn"),
            Some(ClickBinding::button(0, 3)),
        );
        manager.start();

        for _ in 0..2 {
            manager.handle_event(&RawInputEvent::key_down(["l"]));
            manager.handle_event(&RawInputEvent::key_up(["l"]));
        }
        assert_eq!(log.take(), vec!["light:true", "light:false"]);
        assert!(!*state.lock());

        manager.handle_event(&RawInputEvent::button(0, 3, true));
        manager.handle_event(&RawInputEvent::button(0, 3, false));
        assert_eq!(log.take(), vec!["horn:false"]);
    }

    #[test]
    fn steps_are_unclamped() {
        let log = Arc::new(Log::default());
        let mut manager = InputManager::new();
        manager.add_steps_action(
            value(&log, "gear"),
            Some(StepsConfig {
                up: ClickBinding::button(0, 12),
                down: ClickBinding::button(0, 13),
                step: 1.0,
            }),
        );
        manager.start();

        manager.handle_event(&RawInputEvent::button(0, 12, true));
        manager.handle_event(&RawInputEvent::button(0, 12, true));
        manager.handle_event(&RawInputEvent::button(0, 13, true));
        assert_eq!(log.take(), vec!["gear:1", "gear:1", "gear:-1"]);
    }

    #[test]
    fn bare_axis_interpolates_with_shaping() {
        let log = Arc::new(Log::default());
        let mut manager = InputManager::new();
        manager.add_range_action(
            RangeAction {
                range: Span::new(0.0, 100.0),
                current_value: None,
                set_value: value(&log, "zoom"),
            },
            Some(RangeConfig {
                axis: Some(
                    AxisBinding::new(0, 1)
                        .with_inverted(true)
                        .with_deadzone(-0.1, 0.1),
                ),
                clicks: None,
            }),
        );
        manager.start();

        manager.handle_event(&RawInputEvent::axis(0, 1, -1.0));
        manager.handle_event(&RawInputEvent::axis(0, 1, 0.05));
        manager.handle_event(&RawInputEvent::axis(0, 1, 1.0));
        manager.handle_event(&RawInputEvent::axis(0, 2, 1.0));
        assert_eq!(log.take(), vec!["zoom:100", "zoom:50", "zoom:0"]);
    }

    #[test]
    fn half_bound_pair_is_inert() {
        let log = Arc::new(Log::default());
        let mut manager = InputManager::new();
        manager.add_range_action(
            RangeAction {
                range: Span::new(-10.0, 10.0),
                current_value: None,
                set_value: value(&log, "trim"),
            },
            Some(RangeConfig {
                axis: None,
                clicks: Some(RangeClicks {
                    up: ClickBinding::key("u"),
                    down: None,
                    center: ClickBinding::key("c"),
                    step: 1.0,
                }),
            }),
        );
        assert_eq!(manager.registration_count(), 1);
    }

    #[test]
    fn velocity_axis_integrates_on_ticks() {
        let log = Arc::new(Log::default());
        let mut manager = InputManager::with_ticker(TickSource::with_rate(10));
        manager.add_range_action(
            RangeAction {
                range: Span::new(-100.0, 100.0),
                current_value: None,
                set_value: value(&log, "throttle"),
            },
            Some(RangeConfig {
                axis: Some(AxisBinding::new(0, 3).with_velocity(1.0)),
                clicks: None,
            }),
        );
        let t0 = Instant::now();
        manager.start_at(t0);

        // full deflection interpolates to 100 units per second
        manager.handle_event(&RawInputEvent::axis(0, 3, 1.0));
        assert!(log.take().is_empty());

        assert!(manager.tick(t0 + Duration::from_millis(100)));
        assert_eq!(log.take(), vec!["throttle:10"]);
    }

    #[test]
    fn stop_pauses_and_clear_discards() {
        let log = Arc::new(Log::default());
        let mut manager = InputManager::new();
        manager.add_click_action(click(&log, "fire"), Some(ClickBinding::button(0, 0)));

        assert_eq!(manager.handle_event(&RawInputEvent::button(0, 0, true)), 0);
        manager.start();
        manager.start();
        manager.stop(false);
        manager.stop(false);
        assert_eq!(manager.handle_event(&RawInputEvent::button(0, 0, true)), 0);

        manager.start();
        assert_eq!(manager.handle_event(&RawInputEvent::button(0, 0, true)), 1);
        assert_eq!(log.take(), vec!["fire"]);

        manager.stop(true);
        assert_eq!(manager.registration_count(), 0);
        manager.start();
        assert_eq!(manager.handle_event(&RawInputEvent::button(0, 0, true)), 0);
    }
}
