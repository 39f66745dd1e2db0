use crate::light::RgbCommand;

/// A key state change at a matrix position, produced by the host's matrix scanner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyEvent {
    pub row: u8,
    pub col: u8,
    pub pressed: bool,
}

impl KeyEvent {
    pub const fn new(row: u8, col: u8, pressed: bool) -> Self {
        Self { row, col, pressed }
    }
}

/// Requests from the keymap to the host firmware's other subsystems
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControlEvent {
    /// An RGB matrix keycode was pressed
    Rgb(RgbCommand),
    /// `QK_BOOT` was pressed, the host should jump to its bootloader
    Bootloader,
}
