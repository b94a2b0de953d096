//! Binding editor boundary.
//!
//! [`model`] builds the rows the editor shows and the handle that resolves when it closes;
//! [`terminal`] draws them with ratatui for the demo binary.

pub mod model;
pub mod terminal;

pub use model::{
    editor_entries, print_axis, print_click, EditorEntry, EditorHandle, EditorTarget,
    GamepadNames, UNBOUND_LABEL,
};
pub(crate) use model::EditorCloser;
pub use terminal::{EditorClick, EditorTheme, EditorView, ScreenLayout, TerminalEditor};
