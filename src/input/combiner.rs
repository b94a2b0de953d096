//! Range combiner: fuses every source feeding one ranged action into a single value.
//!
//! `output = axis + offset`, where `axis` is the live interpolated position of a bound axis
//! (zero when none is bound or the axis is a rate control) and `offset` is the running value
//! moved by center/up/down clicks and by velocity integration. Every update re-emits the output.

use crate::action::{ClickHandler, ValueHandler};
use crate::input::ticker::TickListener;
use crate::range::Span;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

#[derive(Debug)]
struct CombinerState {
    range: Span,
    mid_range: f64,
    axis_value: f64,
    offset_value: f64,
    velocity: f64,
}

impl CombinerState {
    fn output(&self) -> f64 {
        self.axis_value + self.offset_value
    }
}

/// Shared combiner handle. Clones update the same state.
#[derive(Clone)]
pub struct RangeCombiner {
    state: Arc<Mutex<CombinerState>>,
    set_value: ValueHandler,
}

impl RangeCombiner {
    /// `has_axis` decides the seed: without an axis the offset starts at `current_value`
    /// (default: the midpoint), with one it starts at zero.
    pub fn new(
        range: Span,
        current_value: Option<f64>,
        has_axis: bool,
        set_value: ValueHandler,
    ) -> Self {
        let mid_range = range.lerp_axis(0.0);
        let offset_value = if has_axis {
            0.0
        } else {
            current_value.unwrap_or_else(|| range.mid())
        };
        Self {
            state: Arc::new(Mutex::new(CombinerState {
                range,
                mid_range,
                axis_value: 0.0,
                offset_value,
                velocity: 0.0,
            })),
            set_value,
        }
    }

    /// Current combined output.
    pub fn value(&self) -> f64 {
        self.state.lock().output()
    }

    /// Reset the offset to the midpoint of the range.
    pub fn center(&self) {
        self.update(|state| {
            state.offset_value = state.mid_range;
            true
        });
    }

    /// Move the offset by `delta`, clamped to the range.
    pub fn offset_by(&self, delta: f64) {
        self.update(|state| {
            state.offset_value = state.range.clamp(state.offset_value + delta);
            true
        });
    }

    /// Record a new interpolated axis position.
    pub fn set_axis(&self, value: f64) {
        self.update(|state| {
            state.axis_value = value;
            true
        });
    }

    /// Record the rate applied on each tick. Emits nothing by itself.
    pub fn set_velocity(&self, velocity: f64) {
        self.state.lock().velocity = velocity;
    }

    /// Integrate the current velocity over `delta_seconds`.
    pub fn tick(&self, delta_seconds: f64) {
        self.update(|state| {
            if state.velocity == 0.0 {
                return false;
            }
            state.offset_value = state
                .range
                .clamp(state.offset_value + state.velocity * delta_seconds);
            true
        });
    }

    fn update(&self, apply: impl FnOnce(&mut CombinerState) -> bool) {
        let output = {
            let mut state = self.state.lock();
            if !apply(&mut *state) {
                return;
            }
            state.output()
        };
        (self.set_value)(output);
    }

    pub fn center_handler(&self) -> ClickHandler {
        let combiner = self.clone();
        Arc::new(move || combiner.center())
    }

    pub fn step_handler(&self, delta: f64) -> ClickHandler {
        let combiner = self.clone();
        Arc::new(move || combiner.offset_by(delta))
    }

    pub fn axis_handler(&self) -> ValueHandler {
        let combiner = self.clone();
        Arc::new(move |value| combiner.set_axis(value))
    }

    /// Axis callback for a rate-control axis: the interpolated reading times `scale`.
    ///
    /// The rate is the reading interpolated into the range, so a stick at rest only holds the
    /// value still when the range is centred on zero. On `[0, 100]` rest maps to a rate of 50.
    pub fn velocity_handler(&self, scale: f64) -> ValueHandler {
        let combiner = self.clone();
        Arc::new(move |value| combiner.set_velocity(value * scale))
    }

    pub fn tick_listener(&self) -> TickListener {
        let combiner = self.clone();
        Box::new(move |delta_seconds| combiner.tick(delta_seconds))
    }
}

impl fmt::Debug for RangeCombiner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RangeCombiner")
            .field("state", &*self.state.lock())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recording(
        range: Span,
        current: Option<f64>,
        has_axis: bool,
    ) -> (RangeCombiner, Arc<Mutex<Vec<f64>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let combiner = RangeCombiner::new(
            range,
            current,
            has_axis,
            Arc::new(move |v: f64| sink.lock().push(v)),
        );
        (combiner, seen)
    }

    #[test]
    fn click_sequence_stays_within_range() {
        let (combiner, seen) = recording(Span::new(-100.0, 100.0), None, false);

        combiner.center();
        assert_eq!(seen.lock().last(), Some(&0.0));

        for _ in 0..3 {
            combiner.offset_by(5.0);
        }
        assert_eq!(seen.lock().last(), Some(&15.0));

        combiner.offset_by(-5.0);
        assert_eq!(seen.lock().last(), Some(&10.0));

        for _ in 0..20 {
            combiner.offset_by(5.0);
        }
        assert!(seen.lock().iter().all(|v| *v <= 100.0));
        assert_eq!(combiner.value(), 100.0);
    }

    #[test]
    fn seeds_from_current_value_without_axis() {
        let (combiner, _) = recording(Span::new(0.0, 10.0), Some(7.0), false);
        assert_eq!(combiner.value(), 7.0);

        let (midpoint, _) = recording(Span::new(0.0, 10.0), None, false);
        assert_eq!(midpoint.value(), 5.0);

        let (with_axis, _) = recording(Span::new(0.0, 10.0), Some(7.0), true);
        assert_eq!(with_axis.value(), 0.0);
    }

    #[test]
    fn axis_and_offset_add_up() {
        let (combiner, seen) = recording(Span::new(-100.0, 100.0), None, true);
        combiner.set_axis(40.0);
        combiner.offset_by(5.0);
        assert_eq!(seen.lock().as_slice(), &[40.0, 45.0]);
    }

    #[test]
    fn velocity_integrates_on_tick_only() {
        let (combiner, seen) = recording(Span::new(-100.0, 100.0), None, true);

        combiner.tick(0.1);
        assert!(seen.lock().is_empty(), "zero velocity must not emit");

        combiner.set_velocity(50.0);
        assert!(seen.lock().is_empty());

        combiner.tick(0.1);
        combiner.tick(0.1);
        let values = seen.lock().clone();
        assert_eq!(values.len(), 2);
        assert!((values[0] - 5.0).abs() < 1e-9);
        assert!((values[1] - 10.0).abs() < 1e-9);

        combiner.set_velocity(10_000.0);
        combiner.tick(1.0);
        assert_eq!(combiner.value(), 100.0);
    }

    #[test]
    fn velocity_rate_follows_the_interpolated_reading() {
        let (centred, seen) = recording(Span::new(-100.0, 100.0), None, true);
        let rate = centred.velocity_handler(0.5);
        rate(Span::new(-100.0, 100.0).lerp_axis(0.0));
        centred.tick(1.0);
        assert!(seen.lock().is_empty());

        let (offset, seen) = recording(Span::new(0.0, 100.0), None, true);
        let rate = offset.velocity_handler(0.5);
        rate(Span::new(0.0, 100.0).lerp_axis(0.0));
        offset.tick(1.0);
        assert_eq!(seen.lock().as_slice(), &[25.0]);
    }

    #[test]
    fn handlers_share_state() {
        let (combiner, seen) = recording(Span::new(-10.0, 10.0), Some(0.0), false);
        let up = combiner.step_handler(2.0);
        let center = combiner.center_handler();
        up();
        up();
        center();
        assert_eq!(seen.lock().as_slice(), &[2.0, 4.0, 0.0]);
    }
}
