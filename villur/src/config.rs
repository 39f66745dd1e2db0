use heapless::Vec;
use rgb::RGB8;
use villur_types::keycode::KeyCode;

use crate::layout::{FN, GAMING};

/// Maximum number of opposing key pairs handled by snap tap
pub const SNAP_TAP_MAX_PAIRS: usize = 4;
/// Maximum number of layers with a dedicated indicator color
pub const INDICATOR_MAX_LAYERS: usize = 8;

/// The config struct for the keymap.
///
/// 1. `KeyboardUsbConfig`: Report timing.
/// 2. `LightConfig`: Layer indicator colors.
/// 3. `SnapTapConfig`: Opposing keys and the layer snap tap works on.
#[derive(Clone, Debug, Default)]
pub struct KeyboardConfig {
    pub usb_config: KeyboardUsbConfig,
    pub light_config: LightConfig,
    pub snap_tap_config: SnapTapConfig,
}

/// Configurations for usb
#[derive(Clone, Copy, Debug)]
pub struct KeyboardUsbConfig {
    /// HID endpoint polling interval in milliseconds, read by the host's USB stack
    pub polling_interval_ms: u8,
    /// Maximum number of queued key events handled in one pass
    pub keys_per_scan: usize,
}

impl Default for KeyboardUsbConfig {
    fn default() -> Self {
        Self {
            polling_interval_ms: 1,
            keys_per_scan: 8,
        }
    }
}

/// Colors of the layer indicator
#[derive(Clone, Debug)]
pub struct LightConfig {
    /// `(layer, color)` pairs, the first match wins
    pub layer_colors: Vec<(u8, RGB8), INDICATOR_MAX_LAYERS>,
    /// Color for every layer not listed in `layer_colors`
    pub default_color: RGB8,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            layer_colors: Vec::from_iter([(GAMING, RGB8::new(0, 255, 0)), (FN, RGB8::new(255, 153, 255))]),
            default_color: RGB8::new(255, 255, 255),
        }
    }
}

/// Config for snap tap
#[derive(Clone, Debug)]
pub struct SnapTapConfig {
    /// Snap tap works only while this layer is the highest active layer
    pub layer: u8,
    /// Opposing keys, only one key of a pair is registered at a time
    pub pairs: Vec<(KeyCode, KeyCode), SNAP_TAP_MAX_PAIRS>,
}

impl Default for SnapTapConfig {
    fn default() -> Self {
        Self {
            layer: GAMING,
            pairs: Vec::from_iter([(KeyCode::A, KeyCode::D), (KeyCode::W, KeyCode::S)]),
        }
    }
}
