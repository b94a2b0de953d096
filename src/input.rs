//! Input subsystem: raw events, event sources, and the dispatch core.
//!
//! Sources turn keyboard/gamepad activity into [`RawInputEvent`]s; the [`InputManager`] fans
//! those out to action callbacks, with a [`RangeCombiner`] merging the sources of a range action
//! and a [`TickSource`] driving velocity axes.

pub mod combiner;
#[cfg(feature = "gamepad")]
pub mod gamepad;
pub mod manager;
pub mod raw;
pub mod source;
pub mod terminal;
pub mod ticker;

// Public re-exports for convenience. Modules outside this crate should prefer importing
// from `crate::input` rather than reaching into submodules.
pub use combiner::RangeCombiner;
#[cfg(feature = "gamepad")]
pub use gamepad::GamepadSource;
pub use manager::{InputManager, RangeAction, RangeClicks, RangeConfig, StepsConfig};
pub use raw::{AxisEvent, ButtonEvent, KeyEdge, KeyTransition, RawInputEvent};
pub use source::{ChannelSource, InputSource};
pub use terminal::TerminalSource;
pub use ticker::{TickListener, TickSource, DEFAULT_TICK_RATE_HZ};
