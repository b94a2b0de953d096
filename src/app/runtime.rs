use crate::app::Hotkeys;
use crate::error::Result;
use crate::input::InputSource;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Wait for one batch of events from `source`, dispatch it, then advance velocity ticks.
///
/// Blocks for at most `max_wait`, less when a tick falls due sooner. Returns the number of
/// events processed.
pub fn pump<S: InputSource + ?Sized>(
    hotkeys: &mut Hotkeys,
    source: &mut S,
    max_wait: Duration,
) -> Result<usize> {
    let now = Instant::now();
    let wait = hotkeys
        .next_deadline()
        .map(|deadline| deadline.saturating_duration_since(now).min(max_wait))
        .unwrap_or(max_wait);

    let mut processed = 0;
    if let Some(event) = source.poll_event(Some(wait))? {
        hotkeys.process_event(&event);
        processed += 1;
        while let Some(event) = source.poll_event(None)? {
            hotkeys.process_event(&event);
            processed += 1;
        }
    }
    hotkeys.tick(Instant::now());
    Ok(processed)
}

/// Pump `source` into `hotkeys` until `shutdown` is set.
pub fn run_input_loop<S: InputSource + ?Sized>(
    hotkeys: &mut Hotkeys,
    source: &mut S,
    shutdown: &AtomicBool,
    poll_interval: Duration,
) -> Result<()> {
    while !shutdown.load(Ordering::SeqCst) {
        pump(hotkeys, source, poll_interval)?;
    }
    Ok(())
}

/// Spawn a blocking thread that owns `hotkeys` and feeds it from `source`. The thread hands
/// `hotkeys` back once `shutdown` is set.
pub fn spawn_input_thread<S>(
    mut hotkeys: Hotkeys,
    mut source: S,
    shutdown: Arc<AtomicBool>,
    poll_interval: Duration,
) -> std::thread::JoinHandle<Result<Hotkeys>>
where
    S: InputSource + Send + 'static,
{
    std::thread::spawn(move || {
        if let Err(err) = run_input_loop(&mut hotkeys, &mut source, &shutdown, poll_interval) {
            log::error!("input thread error: {err}");
            return Err(err);
        }
        Ok(hotkeys)
    })
}
