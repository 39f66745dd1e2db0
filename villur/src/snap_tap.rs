//! Snap tap: of two opposing keys, only the most recently pressed one is sent.
//!
//! While the configured layer is the highest active layer, pressing a key releases its
//! opposite if that one is held. Releasing a key while its opposite is still physically
//! held re-registers the opposite. This keeps the host from ever seeing both directions of
//! a pair at once, and from losing the direction that is still held.
//!
//! Ref: <https://www.camerondugan.com/blog/my-old-keyboard-is-basically-cheating>

use heapless::Vec;

use crate::config::{SNAP_TAP_MAX_PAIRS, SnapTapConfig};
use crate::types::keycode::KeyCode;

/// An operation applied to the keyboard report, `register_code`/`unregister_code` in qmk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyOperation {
    Register(KeyCode),
    Unregister(KeyCode),
}

/// Result of intercepting a key event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Intercept {
    /// Operations to apply before the event continues
    pub operations: Vec<KeyOperation, 2>,
    /// Whether the intercepted event should be processed normally afterwards
    pub pass_through: bool,
}

impl Intercept {
    /// Let the event through untouched
    pub fn pass() -> Self {
        Self {
            operations: Vec::new(),
            pass_through: true,
        }
    }

    fn with(operations: &[KeyOperation], pass_through: bool) -> Self {
        let mut ops = Vec::new();
        for op in operations {
            // At most 2 operations are produced
            let _ = ops.push(*op);
        }
        Self {
            operations: ops,
            pass_through,
        }
    }
}

/// Held state of one pair of opposing keys
#[derive(Debug, Clone, Copy)]
struct PairState {
    keys: (KeyCode, KeyCode),
    held: (bool, bool),
}

pub struct SnapTap {
    /// Snap tap works only when this layer is the highest active layer
    layer: u8,
    pairs: Vec<PairState, SNAP_TAP_MAX_PAIRS>,
}

impl SnapTap {
    pub fn new(config: &SnapTapConfig) -> Self {
        let mut pairs = Vec::new();
        for &keys in config.pairs.iter() {
            let _ = pairs.push(PairState {
                keys,
                held: (false, false),
            });
        }
        Self {
            layer: config.layer,
            pairs,
        }
    }

    /// The layer snap tap is active on
    pub fn layer(&self) -> u8 {
        self.layer
    }

    /// Whether the key is recorded as physically held
    pub fn is_held(&self, key: KeyCode) -> bool {
        self.pairs.iter().any(|p| (p.keys.0 == key && p.held.0) || (p.keys.1 == key && p.held.1))
    }

    /// Intercept a key event.
    ///
    /// The held state is tracked only while the snap tap layer is the highest active layer.
    pub fn process(&mut self, key: KeyCode, pressed: bool, highest_layer: u8) -> Intercept {
        if highest_layer != self.layer {
            return Intercept::pass();
        }

        let Some(pair) = self.pairs.iter_mut().find(|p| p.keys.0 == key || p.keys.1 == key) else {
            return Intercept::pass();
        };

        let (other, other_held) = if pair.keys.0 == key {
            pair.held.0 = pressed;
            (pair.keys.1, pair.held.1)
        } else {
            pair.held.1 = pressed;
            (pair.keys.0, pair.held.0)
        };

        if other_held && pressed {
            debug!("Snap tap: {:?} pressed, releasing {:?}", key, other);
            Intercept::with(&[KeyOperation::Unregister(other)], true)
        } else if other_held && !pressed {
            debug!("Snap tap: {:?} released, restoring {:?}", key, other);
            Intercept::with(&[KeyOperation::Unregister(key), KeyOperation::Register(other)], false)
        } else {
            Intercept::pass()
        }
    }
}
