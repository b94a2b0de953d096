//! Binding model: which physical input currently drives which action.
//!
//! - [`physical`] describes the physical sources themselves (key combos, gamepad buttons and
//!   axes) and the key-name normalisation both dispatch and capture rely on.
//! - [`store`] is the mutable mapping from action ids (optionally suffixed `.up`, `.down`,
//!   `.center`) to their current binding.

pub mod physical;
pub mod store;

pub use physical::{
    key_combo, translate_key_name, AxisBinding, ButtonBinding, ClickBinding, KeyBinding,
};
pub use store::{BindingKey, BindingStore, ClickPart, SavedBindings, Slot};
