//! Periodic tick source used by velocity-driven range actions.
//!
//! The source is driven by the caller's clock: [`TickSource::advance`] is handed the current
//! instant and emits one tick carrying the seconds elapsed since the previous one once the
//! target interval has passed. This keeps every tick on the same thread as event dispatch.

use std::fmt;
use std::time::{Duration, Instant};

/// Default tick rate: fast enough for velocity ranges to feel continuous.
pub const DEFAULT_TICK_RATE_HZ: u32 = 10;

/// Callback receiving elapsed seconds.
pub type TickListener = Box<dyn FnMut(f64) + Send>;

/// Restartable fixed-rate tick emitter.
pub struct TickSource {
    interval: Duration,
    last_tick: Option<Instant>,
    listeners: Vec<TickListener>,
}

impl TickSource {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_tick: None,
            listeners: Vec::new(),
        }
    }

    /// Tick source emitting `rate_hz` ticks per second (at least one).
    pub fn with_rate(rate_hz: u32) -> Self {
        Self::new(Duration::from_secs(1) / rate_hz.max(1))
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Begin emitting, measuring from `now`. No-op when already started.
    pub fn start(&mut self, now: Instant) {
        if self.last_tick.is_none() {
            self.last_tick = Some(now);
        }
    }

    /// Stop emitting. Listeners are kept.
    pub fn stop(&mut self) {
        self.last_tick = None;
    }

    pub fn is_started(&self) -> bool {
        self.last_tick.is_some()
    }

    /// Drop every listener.
    pub fn clear(&mut self) {
        self.listeners.clear();
    }

    pub fn on_tick(&mut self, listener: TickListener) {
        self.listeners.push(listener);
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// When the next tick is due, if started.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.last_tick.map(|last| last + self.interval)
    }

    /// Emit a tick if the interval has elapsed since the last one. Returns whether it did.
    pub fn advance(&mut self, now: Instant) -> bool {
        let Some(last) = self.last_tick else {
            return false;
        };
        let elapsed = now.saturating_duration_since(last);
        if elapsed < self.interval {
            return false;
        }
        self.last_tick = Some(now);
        self.emit(elapsed.as_secs_f64());
        true
    }

    /// Deliver `delta_seconds` to every listener regardless of schedule.
    pub fn emit(&mut self, delta_seconds: f64) {
        for listener in self.listeners.iter_mut() {
            listener(delta_seconds);
        }
    }
}

impl Default for TickSource {
    fn default() -> Self {
        Self::with_rate(DEFAULT_TICK_RATE_HZ)
    }
}

impl fmt::Debug for TickSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TickSource")
            .field("interval", &self.interval)
            .field("started", &self.is_started())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn recording_source() -> (TickSource, Arc<Mutex<Vec<f64>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut source = TickSource::with_rate(10);
        let sink = Arc::clone(&seen);
        source.on_tick(Box::new(move |dt| sink.lock().push(dt)));
        (source, seen)
    }

    #[test]
    fn default_rate_is_ten_hz() {
        assert_eq!(TickSource::default().interval(), Duration::from_millis(100));
    }

    #[test]
    fn does_not_tick_before_start() {
        let (mut source, seen) = recording_source();
        assert!(!source.advance(Instant::now() + Duration::from_secs(5)));
        assert!(seen.lock().is_empty());
        assert_eq!(source.next_deadline(), None);
    }

    #[test]
    fn ticks_once_interval_elapsed() {
        let (mut source, seen) = recording_source();
        let t0 = Instant::now();
        source.start(t0);
        assert_eq!(source.next_deadline(), Some(t0 + Duration::from_millis(100)));

        assert!(!source.advance(t0 + Duration::from_millis(50)));
        assert!(source.advance(t0 + Duration::from_millis(150)));
        assert!(!source.advance(t0 + Duration::from_millis(200)));
        assert!(source.advance(t0 + Duration::from_millis(250)));

        let seen = seen.lock();
        assert_eq!(seen.len(), 2);
        assert!((seen[0] - 0.15).abs() < 1e-9);
        assert!((seen[1] - 0.1).abs() < 1e-9);
    }

    #[test]
    fn start_is_idempotent_and_stop_keeps_listeners() {
        let (mut source, _seen) = recording_source();
        let t0 = Instant::now();
        source.start(t0);
        source.start(t0 + Duration::from_secs(1));
        assert_eq!(source.next_deadline(), Some(t0 + Duration::from_millis(100)));

        source.stop();
        assert!(!source.is_started());
        assert_eq!(source.listener_count(), 1);

        source.clear();
        assert_eq!(source.listener_count(), 0);
    }
}
