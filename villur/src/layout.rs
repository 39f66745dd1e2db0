//! The default keymap of the GMMK2 P65 ISO.
//!
//! The matrix follows the 65% ISO blocker layout, five rows of fifteen positions. The ISO
//! enter spans rows 1 and 2 and sits at row 2, the spacebar row only populates nine
//! positions. Unpopulated positions are `No`.

use crate::types::action::KeyAction;
use crate::{a, k, mo, shifted, to};

pub const ROW: usize = 5;
pub const COL: usize = 15;
pub const NUM_LAYER: usize = 3;

/// Base layer, the default layer
pub const BASE: u8 = 0;
/// Gaming layer, same keys as the base layer with snap tap on WASD
pub const GAMING: u8 = 1;
/// Function layer
pub const FN: u8 = 2;

#[rustfmt::skip]
pub const fn get_default_keymap() -> [[[KeyAction; COL]; ROW]; NUM_LAYER] {
    [
        // BASE
        [
            [k!(GraveEscape), k!(Kc1), k!(Kc2), k!(Kc3), k!(Kc4), k!(Kc5), k!(Kc6), k!(Kc7), k!(Kc8), k!(Kc9), k!(Kc0), k!(Minus), k!(Equal), k!(Backspace), k!(PrintScreen)],
            [k!(Tab), k!(Q), k!(W), k!(E), k!(R), k!(T), k!(Y), k!(U), k!(I), k!(O), k!(P), k!(LeftBracket), k!(RightBracket), a!(No), k!(Insert)],
            [k!(F13), k!(A), k!(S), k!(D), k!(F), k!(G), k!(H), k!(J), k!(K), k!(L), k!(Semicolon), k!(Quote), k!(NonusHash), k!(Enter), k!(Delete)],
            [k!(LShift), k!(NonusBackslash), k!(Z), k!(X), k!(C), k!(V), k!(B), k!(N), k!(M), k!(Comma), k!(Dot), k!(Slash), k!(RShift), k!(Up), k!(End)],
            [k!(LCtrl), k!(LGui), k!(LAlt), a!(No), a!(No), a!(No), k!(Space), a!(No), a!(No), a!(No), k!(RAlt), mo!(FN), k!(Left), k!(Down), k!(Right)],
        ],
        // GAMING
        [
            [k!(GraveEscape), k!(Kc1), k!(Kc2), k!(Kc3), k!(Kc4), k!(Kc5), k!(Kc6), k!(Kc7), k!(Kc8), k!(Kc9), k!(Kc0), k!(Minus), k!(Equal), k!(Backspace), k!(PrintScreen)],
            [k!(Tab), k!(Q), k!(W), k!(E), k!(R), k!(T), k!(Y), k!(U), k!(I), k!(O), k!(P), k!(LeftBracket), k!(RightBracket), a!(No), k!(Insert)],
            [k!(F13), k!(A), k!(S), k!(D), k!(F), k!(G), k!(H), k!(J), k!(K), k!(L), k!(Semicolon), k!(Quote), k!(NonusHash), k!(Enter), k!(Delete)],
            [k!(LShift), k!(NonusBackslash), k!(Z), k!(X), k!(C), k!(V), k!(B), k!(N), k!(M), k!(Comma), k!(Dot), k!(Slash), k!(RShift), k!(Up), k!(End)],
            [k!(LCtrl), k!(LGui), k!(LAlt), a!(No), a!(No), a!(No), k!(Space), a!(No), a!(No), a!(No), k!(RAlt), mo!(FN), k!(Left), k!(Down), k!(Right)],
        ],
        // FN
        [
            [shifted!(Grave), k!(F1), k!(F2), k!(F3), k!(F4), k!(F5), k!(F6), k!(F7), k!(F8), k!(F9), k!(F10), k!(F11), k!(F12), a!(Transparent), k!(Insert)],
            [a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), k!(PrintScreen), k!(ScrollLock), k!(Pause), a!(No), a!(Transparent)],
            [k!(CapsLock), to!(BASE), to!(GAMING), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent)],
            [a!(Transparent), a!(Transparent), k!(RgbHui), k!(RgbHud), k!(RgbSpd), k!(RgbSpi), k!(AudioMute), k!(AudioVolUp), k!(AudioVolDown), k!(MediaPrevTrack), k!(MediaPlayPause), k!(MediaNextTrack), a!(Transparent), k!(RgbVai), k!(Home)],
            [a!(Transparent), a!(Transparent), a!(Transparent), a!(No), a!(No), a!(No), k!(Bootloader), a!(No), a!(No), a!(No), a!(Transparent), a!(Transparent), k!(RgbModeReverse), k!(RgbVad), k!(RgbModeForward)],
        ],
    ]
}
