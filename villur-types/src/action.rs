//! Keyboard actions.
//!
//! - [`Action`] - Single operations that keyboards send or execute
//! - [`KeyAction`] - What a key position does, stored in the keymap

use crate::keycode::KeyCode;
use crate::modifier::ModifierCombination;

/// A KeyAction is the action at a keyboard position, stored in keymap.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyAction {
    /// No action.
    No,
    /// Transparent action, next layer will be checked.
    Transparent,
    /// A single action, such as triggering a key, or activating a layer. Action is triggered when pressed and cancelled when released.
    Single(Action),
}

/// A single basic action that a keyboard can execute.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Action {
    /// A normal key stroke, uses for all keycodes defined in `KeyCode` enum, including consumer control, rgb control, etc.
    Key(KeyCode),
    /// Key stroke with modifier combination triggered.
    KeyWithModifier(KeyCode, ModifierCombination),
    /// Activate a layer while the key is held, `MO(n)`
    LayerOn(u8),
    /// Deactivate a layer while the key is held
    LayerOff(u8),
    /// Toggle a layer, `TG(n)`
    LayerToggle(u8),
    /// Set default layer, `DF(n)`
    DefaultLayer(u8),
    /// Activate a layer and deactivate all other layers(except default layer), `TO(n)`
    LayerToggleOnly(u8),
}

impl KeyAction {
    /// The keycode of a plain key action, if any
    pub fn to_keycode(self) -> Option<KeyCode> {
        match self {
            KeyAction::Single(Action::Key(k)) => Some(k),
            _ => None,
        }
    }
}
