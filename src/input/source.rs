//! Event-source abstraction injected into the runtime.
//!
//! Each [`crate::app::Hotkeys`] instance is fed by whatever source its owner drives, so two
//! instances never observe each other's events and tests can script their own.

use crate::error::Result;
use crate::input::raw::RawInputEvent;
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::time::Duration;

/// Producer of raw physical events.
pub trait InputSource {
    /// Retrieve the next raw event, waiting up to `timeout` (`None` = do not wait).
    fn poll_event(&mut self, timeout: Option<Duration>) -> Result<Option<RawInputEvent>>;
}

/// Source fed through a channel: bridges producer threads and serves as a test fake.
#[derive(Debug)]
pub struct ChannelSource {
    rx: Receiver<RawInputEvent>,
    disconnected: bool,
}

impl ChannelSource {
    /// Create a source together with the sender producers push into.
    pub fn channel() -> (Sender<RawInputEvent>, Self) {
        let (tx, rx) = unbounded();
        (
            tx,
            Self {
                rx,
                disconnected: false,
            },
        )
    }

    /// True once every sender has been dropped and the queue is drained.
    pub fn is_disconnected(&self) -> bool {
        self.disconnected
    }
}

impl InputSource for ChannelSource {
    fn poll_event(&mut self, timeout: Option<Duration>) -> Result<Option<RawInputEvent>> {
        let disconnected = match timeout {
            None => match self.rx.try_recv() {
                Ok(event) => return Ok(Some(event)),
                Err(err) => err == TryRecvError::Disconnected,
            },
            Some(timeout) => match self.rx.recv_timeout(timeout) {
                Ok(event) => return Ok(Some(event)),
                Err(err) => err == RecvTimeoutError::Disconnected,
            },
        };
        self.disconnected |= disconnected;
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn delivers_events_in_order() {
        let (tx, mut source) = ChannelSource::channel();
        tx.send(RawInputEvent::button(0, 1, true)).unwrap();
        tx.send(RawInputEvent::button(0, 1, false)).unwrap();

        assert_eq!(
            source.poll_event(None).unwrap(),
            Some(RawInputEvent::button(0, 1, true))
        );
        assert_eq!(
            source.poll_event(None).unwrap(),
            Some(RawInputEvent::button(0, 1, false))
        );
        assert_eq!(source.poll_event(None).unwrap(), None);
        assert!(!source.is_disconnected());
    }

    #[test]
    fn times_out_when_idle() {
        let (_tx, mut source) = ChannelSource::channel();
        let started = Instant::now();
        assert_eq!(
            source.poll_event(Some(Duration::from_millis(5))).unwrap(),
            None
        );
        assert!(started.elapsed() >= Duration::from_millis(5));
    }

    #[test]
    fn reports_disconnect() {
        let (tx, mut source) = ChannelSource::channel();
        drop(tx);
        assert_eq!(source.poll_event(None).unwrap(), None);
        assert!(source.is_disconnected());
    }

    #[test]
    fn wakes_when_a_producer_sends() {
        let (tx, mut source) = ChannelSource::channel();
        let producer = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(20));
            tx.send(RawInputEvent::axis(0, 0, 0.5)).unwrap();
        });
        assert_eq!(
            source.poll_event(Some(Duration::from_secs(5))).unwrap(),
            Some(RawInputEvent::axis(0, 0, 0.5))
        );
        producer.join().unwrap();
    }
}
