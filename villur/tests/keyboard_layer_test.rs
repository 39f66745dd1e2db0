pub mod common;

use core::cell::RefCell;

use embassy_futures::block_on;
use villur::channel::{ControlChannel, ReportChannel};
use villur::config::KeyboardConfig;
use villur::event::KeyEvent;
use villur::hid::Report;
use villur::keyboard::Keyboard;
use villur::keymap::KeyMap;
use villur::types::action::{Action, KeyAction};
use villur::types::modifier::ModifierCombination;
use villur::{a, df, k, layer, mo, tg, wm};

const KC_LCTRL: u8 = 1 << 0;

#[rustfmt::skip]
fn small_keymap() -> [[[KeyAction; 3]; 2]; 3] {
    [
        layer!([
            [k!(A), tg!(1), df!(2)],
            [mo!(1), KeyAction::Single(Action::LayerOff(1)), k!(B)]
        ]),
        layer!([
            [k!(C), a!(Transparent), wm!(X, ModifierCombination::LCTRL)],
            [a!(Transparent), a!(Transparent), a!(Transparent)]
        ]),
        layer!([
            [k!(D), a!(Transparent), df!(0)],
            [a!(Transparent), a!(No), k!(E)]
        ]),
    ]
}

struct SmallKeyboard {
    keyboard: Keyboard<'static, 2, 3, 3>,
    reports: &'static ReportChannel,
}

impl SmallKeyboard {
    fn new() -> Self {
        // Box::leak is acceptable in tests
        let layers = Box::leak(Box::new(small_keymap()));
        let keymap = Box::leak(Box::new(RefCell::new(KeyMap::new(layers))));
        let reports: &'static ReportChannel = Box::leak(Box::new(ReportChannel::new()));
        let control: &'static ControlChannel = Box::leak(Box::new(ControlChannel::new()));
        Self {
            keyboard: Keyboard::new(keymap, &KeyboardConfig::default(), reports, control),
            reports,
        }
    }

    async fn key(&mut self, row: u8, col: u8, pressed: bool) -> Vec<(u8, [u8; 6])> {
        self.keyboard.process_event(KeyEvent::new(row, col, pressed)).await;
        let mut reports = Vec::new();
        while let Ok(Report::KeyboardReport(r)) = self.reports.try_receive() {
            reports.push((r.modifier, r.keycodes));
        }
        reports
    }
}

#[test]
fn test_layer_toggle_on_release() {
    block_on(async {
        let mut kb = SmallKeyboard::new();

        kb.key(0, 1, true).await;
        assert_eq!(kb.keyboard.active_layer(), 0);
        kb.key(0, 1, false).await;
        assert_eq!(kb.keyboard.active_layer(), 1);

        assert_eq!(kb.key(0, 0, true).await, key_report![[0, [kc8!(C), 0, 0, 0, 0, 0]]]);
        assert_eq!(kb.key(0, 0, false).await, key_report![[0, [0, 0, 0, 0, 0, 0]]]);

        // Transparent on layer 1, toggles layer 1 off again
        kb.key(0, 1, true).await;
        kb.key(0, 1, false).await;
        assert_eq!(kb.keyboard.active_layer(), 0);
    });
}

#[test]
fn test_momentary_layer_with_modifier_key() {
    block_on(async {
        let mut kb = SmallKeyboard::new();

        kb.key(1, 0, true).await;
        assert_eq!(kb.keyboard.active_layer(), 1);
        assert_eq!(kb.key(0, 2, true).await, key_report![[KC_LCTRL, [kc8!(X), 0, 0, 0, 0, 0]]]);
        assert_eq!(kb.key(0, 2, false).await, key_report![[0, [0, 0, 0, 0, 0, 0]]]);
        kb.key(1, 0, false).await;
        assert_eq!(kb.keyboard.active_layer(), 0);
    });
}

#[test]
fn test_switch_default_layer() {
    block_on(async {
        let mut kb = SmallKeyboard::new();

        kb.key(0, 2, true).await;
        kb.key(0, 2, false).await;
        assert_eq!(kb.keyboard.active_layer(), 2);

        assert_eq!(kb.key(1, 2, true).await, key_report![[0, [kc8!(E), 0, 0, 0, 0, 0]]]);
        kb.key(1, 2, false).await;
        // Transparent keys on the default layer resolve to nothing
        assert!(kb.key(1, 0, true).await.is_empty());
        kb.key(1, 0, false).await;

        kb.key(0, 2, true).await;
        kb.key(0, 2, false).await;
        assert_eq!(kb.keyboard.active_layer(), 0);
        assert_eq!(kb.key(1, 2, true).await, key_report![[0, [kc8!(B), 0, 0, 0, 0, 0]]]);
    });
}

#[test]
fn test_layer_off_on_press() {
    block_on(async {
        let mut kb = SmallKeyboard::new();

        kb.key(0, 1, true).await;
        kb.key(0, 1, false).await;
        assert_eq!(kb.keyboard.active_layer(), 1);

        // Transparent on layer 1, turns layer 1 off from the base layer
        kb.key(1, 1, true).await;
        assert_eq!(kb.keyboard.active_layer(), 0);
        kb.key(1, 1, false).await;
        assert_eq!(kb.keyboard.active_layer(), 0);
        assert_eq!(kb.key(0, 0, true).await, key_report![[0, [kc8!(A), 0, 0, 0, 0, 0]]]);
    });
}
