//! # hotbind - Runtime-Rebindable Keyboard and Gamepad Actions
//!
//! Applications declare logical actions (clicks, momentary switches, steps and ranged values)
//! and hotbind routes physical input to them through bindings the end user can change at
//! runtime.
//!
//! ## Features
//!
//! - **Four action shapes**: click, momentary, steps and range, each with an opaque handler
//! - **Source fusion**: a range action can be driven by an axis, up/down/center clicks and a
//!   velocity axis at once, combined into one clamped value
//! - **Binding capture**: an interactive recorder that pauses dispatch, debounces axis
//!   cross-talk and always restores the previous binding when abandoned
//! - **Injectable sources**: keyboard (crossterm), gamepad (gilrs, feature `gamepad`) or any
//!   [`InputSource`](input::InputSource) the caller provides
//!
//! ## Architecture
//!
//! - [`error`] - Centralized error types and handling
//! - [`range`] - Numeric helpers for axis interpolation and clamping
//! - [`binding`] - Physical bindings and the binding store
//! - [`action`] - Action definitions and handlers
//! - [`input`] - Raw events, event sources, the input manager and range combiner
//! - [`recorder`] - Binding capture state machine
//! - [`editor`] - Binding editor model and terminal rendering
//! - [`app`] - The [`Hotkeys`] facade and its input loop
//! - [`config`] - Settings and optional TOML persistence

// Core modules
pub mod error;
pub mod range;

// Binding model
pub mod action;
pub mod binding;

// Dispatch and capture
pub mod input;
pub mod recorder;

// Application-facing layer
pub mod app;
pub mod config;
pub mod editor;

// Re-export commonly used types for convenience
pub use error::{HotbindError, Result};

// Public API surface for external usage
pub use action::{ActionDefinition, ActionKind};
pub use app::Hotkeys;
pub use binding::{AxisBinding, BindingKey, BindingStore, ClickBinding, SavedBindings};
pub use config::HotkeysConfig;
pub use editor::{EditorEntry, EditorHandle, EditorTarget};
pub use input::{InputManager, InputSource, RawInputEvent};
pub use range::Span;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
