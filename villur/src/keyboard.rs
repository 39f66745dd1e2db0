use core::cell::RefCell;

use embassy_futures::yield_now;
use usbd_hid::descriptor::MediaKeyboardReport;

use crate::channel::{ControlChannel, KeyEventChannel, ReportChannel};
use crate::config::KeyboardConfig;
use crate::event::{ControlEvent, KeyEvent};
use crate::hid::{KeyboardReport, Report};
use crate::keymap::KeyMap;
use crate::light::RgbCommand;
use crate::snap_tap::{KeyOperation, SnapTap};
use crate::types::action::{Action, KeyAction};
use crate::types::keycode::KeyCode;
use crate::types::modifier::{HidModifiers, ModifierCombination};

pub struct Keyboard<'a, const ROW: usize, const COL: usize, const NUM_LAYER: usize> {
    /// Keymap
    pub(crate) keymap: &'a RefCell<KeyMap<'a, ROW, COL, NUM_LAYER>>,

    /// Keyboard and media reports go here
    report_channel: &'a ReportChannel,

    /// Rgb and bootloader requests go here
    control_channel: &'a ControlChannel,

    /// Opposing key handling on the gaming layer
    snap_tap: SnapTap,

    /// Maximum number of queued events processed before yielding
    keys_per_scan: usize,

    /// The held modifiers for the keyboard hid report
    held_modifiers: HidModifiers,

    /// The modifiers coming from (last) `Action::KeyWithModifier`
    with_modifiers: HidModifiers,

    /// The held keys for the keyboard hid report, except the modifiers
    held_keycodes: [KeyCode; 6],

    /// Registered key position, `None` for keys registered by keycode only
    registered_keys: [Option<(u8, u8)>; 6],

    /// Internal media report buf
    media_report: MediaKeyboardReport,
}

impl<'a, const ROW: usize, const COL: usize, const NUM_LAYER: usize> Keyboard<'a, ROW, COL, NUM_LAYER> {
    pub fn new(
        keymap: &'a RefCell<KeyMap<'a, ROW, COL, NUM_LAYER>>,
        config: &KeyboardConfig,
        report_channel: &'a ReportChannel,
        control_channel: &'a ControlChannel,
    ) -> Self {
        Keyboard {
            keymap,
            report_channel,
            control_channel,
            snap_tap: SnapTap::new(&config.snap_tap_config),
            keys_per_scan: config.usb_config.keys_per_scan.max(1),
            held_modifiers: HidModifiers::default(),
            with_modifiers: HidModifiers::default(),
            held_keycodes: [KeyCode::No; 6],
            registered_keys: [None; 6],
            media_report: MediaKeyboardReport { usage_id: 0 },
        }
    }

    /// Main keyboard processing task, it receives key events and processes them.
    ///
    /// At most `keys_per_scan` queued events are handled before yielding to other tasks.
    pub async fn run(&mut self, key_event_channel: &KeyEventChannel) {
        loop {
            let key_event = key_event_channel.receive().await;
            self.process_event(key_event).await;

            for _ in 1..self.keys_per_scan {
                match key_event_channel.try_receive() {
                    Ok(e) => self.process_event(e).await,
                    Err(_) => break,
                }
            }

            yield_now().await;
        }
    }

    /// The highest active layer
    pub fn active_layer(&self) -> u8 {
        self.keymap.borrow().get_activated_layer()
    }

    /// Keycodes currently in the keyboard report
    pub fn held_keycodes(&self) -> &[KeyCode; 6] {
        &self.held_keycodes
    }

    /// Process key changes at (row, col)
    pub async fn process_event(&mut self, key_event: KeyEvent) {
        let key_action = self.keymap.borrow_mut().get_action_with_layer_cache(key_event);
        self.process_key_action(key_action, key_event).await;
    }

    async fn send_report(&self, report: Report) {
        self.report_channel.send(report).await
    }

    async fn send_keyboard_report(&mut self) {
        let modifiers = self.held_modifiers | self.with_modifiers;
        self.send_report(Report::KeyboardReport(KeyboardReport {
            modifier: modifiers.into_bits(),
            reserved: 0,
            leds: 0,
            keycodes: self.held_keycodes.map(|k| k.as_hid_byte()),
        }))
        .await;
    }

    async fn send_media_report(&mut self) {
        self.send_report(Report::MediaKeyboardReport(MediaKeyboardReport {
            usage_id: self.media_report.usage_id,
        }))
        .await;
    }

    async fn process_key_action(&mut self, key_action: KeyAction, key_event: KeyEvent) {
        match key_action {
            KeyAction::No | KeyAction::Transparent => (),
            KeyAction::Single(a) => self.process_key_action_normal(a, key_event).await,
        }
    }

    async fn process_key_action_normal(&mut self, action: Action, key_event: KeyEvent) {
        match action {
            Action::Key(key) => self.process_action_key(key, key_event).await,
            Action::KeyWithModifier(key, modifiers) => {
                self.process_action_key_with_modifier(key, modifiers, key_event)
                    .await
            }
            Action::LayerOn(layer_num) => {
                // Change layer state only when the key's state is changed
                if key_event.pressed {
                    self.keymap.borrow_mut().activate_layer(layer_num);
                } else {
                    self.keymap.borrow_mut().deactivate_layer(layer_num);
                }
                debug!("Layer {} is now the highest layer", self.active_layer());
            }
            Action::LayerOff(layer_num) => {
                // Turn off a layer temporarily when the key is pressed
                if key_event.pressed {
                    self.keymap.borrow_mut().deactivate_layer(layer_num);
                }
            }
            Action::LayerToggle(layer_num) => {
                // Toggle a layer when the key is release
                if !key_event.pressed {
                    self.keymap.borrow_mut().toggle_layer(layer_num);
                    debug!("Layer {} is now the highest layer", self.active_layer());
                }
            }
            Action::LayerToggleOnly(layer_num) => {
                if key_event.pressed {
                    self.keymap.borrow_mut().layer_toggle_only(layer_num);
                    debug!("Layer {} is now the highest layer", self.active_layer());
                }
            }
            Action::DefaultLayer(layer_num) => {
                if key_event.pressed {
                    self.keymap.borrow_mut().set_default_layer(layer_num);
                }
            }
        }
    }

    async fn process_action_key_with_modifier(
        &mut self,
        key: KeyCode,
        modifiers: ModifierCombination,
        key_event: KeyEvent,
    ) {
        if key_event.pressed {
            self.with_modifiers = modifiers.to_hid_modifiers();
            self.process_action_key(key, key_event).await;
        } else {
            self.with_modifiers = HidModifiers::default();
            self.process_action_key(key, key_event).await;
        }
    }

    // Process action key, the key-intercept hook runs first
    async fn process_action_key(&mut self, key: KeyCode, key_event: KeyEvent) {
        let highest_layer = self.active_layer();
        let intercept = self.snap_tap.process(key, key_event.pressed, highest_layer);
        for op in intercept.operations {
            match op {
                KeyOperation::Register(k) => self.register_code(k).await,
                KeyOperation::Unregister(k) => self.unregister_code(k).await,
            }
        }
        if !intercept.pass_through {
            return;
        }

        let key = match key {
            KeyCode::GraveEscape => {
                let m = self.held_modifiers;
                if m.left_shift() || m.right_shift() || m.left_gui() || m.right_gui() {
                    KeyCode::Grave
                } else {
                    KeyCode::Escape
                }
            }
            _ => key,
        };

        self.process_action_keycode(key, key_event).await;
    }

    // Process a single keycode, typically a basic key or a modifier key.
    async fn process_action_keycode(&mut self, key: KeyCode, key_event: KeyEvent) {
        if key.is_consumer() {
            self.process_action_consumer_control(key, key_event).await;
        } else if key.is_rgb() {
            if key_event.pressed {
                if let Some(command) = RgbCommand::from_keycode(key) {
                    self.control_channel.send(ControlEvent::Rgb(command)).await;
                }
            }
        } else if key.is_boot() {
            if key_event.pressed {
                info!("Bootloader requested");
                self.control_channel.send(ControlEvent::Bootloader).await;
            }
        } else if key.is_basic() {
            self.process_basic(key, key_event).await;
        } else {
            warn!("Unsupported key: {:?}", key);
        }
    }

    async fn process_basic(&mut self, key: KeyCode, key_event: KeyEvent) {
        if key_event.pressed {
            self.register_key(key, key_event);
        } else {
            self.unregister_key(key, key_event);
        }

        self.send_keyboard_report().await;
    }

    async fn process_action_consumer_control(&mut self, key: KeyCode, key_event: KeyEvent) {
        if key_event.pressed {
            self.media_report.usage_id = key.as_consumer_usage_id().map(|k| k as u16).unwrap_or(0);
        } else {
            self.media_report.usage_id = 0;
        }
        self.send_media_report().await;
    }

    /// Register a keycode regardless of the key position and send the report, `register_code` in qmk.
    pub async fn register_code(&mut self, key: KeyCode) {
        if key.is_modifier() {
            self.held_modifiers |= key.to_hid_modifiers();
        } else if key.is_basic() && !self.held_keycodes.contains(&key) {
            if let Some(index) = self.held_keycodes.iter().position(|&k| k == KeyCode::No) {
                self.held_keycodes[index] = key;
                self.registered_keys[index] = None;
            }
        }
        self.send_keyboard_report().await;
    }

    /// Unregister a keycode regardless of the key position and send the report, `unregister_code` in qmk.
    pub async fn unregister_code(&mut self, key: KeyCode) {
        if key.is_modifier() {
            self.held_modifiers &= !key.to_hid_modifiers();
        } else {
            for (held, pos) in self.held_keycodes.iter_mut().zip(self.registered_keys.iter_mut()) {
                if *held == key {
                    *held = KeyCode::No;
                    *pos = None;
                }
            }
        }
        self.send_keyboard_report().await;
    }

    /// Register a key, the key can be a basic keycode or a modifier.
    fn register_key(&mut self, key: KeyCode, key_event: KeyEvent) {
        if key.is_modifier() {
            self.held_modifiers |= key.to_hid_modifiers();
        } else if key.is_basic() {
            self.register_keycode(key, key_event);
        }
    }

    /// Unregister a key, the key can be a basic keycode or a modifier.
    fn unregister_key(&mut self, key: KeyCode, key_event: KeyEvent) {
        if key.is_modifier() {
            self.held_modifiers &= !key.to_hid_modifiers();
        } else if key.is_basic() {
            self.unregister_keycode(key, key_event);
        }
    }

    fn find_slot(&self, key_event: KeyEvent) -> Option<usize> {
        self.registered_keys
            .iter()
            .position(|k| *k == Some((key_event.row, key_event.col)))
    }

    /// Register a key to be sent in hid report.
    fn register_keycode(&mut self, key: KeyCode, key_event: KeyEvent) {
        // First, find the key event slot according to the position
        if let Some(index) = self.find_slot(key_event) {
            self.held_keycodes[index] = key;
        } else if let Some(index) = self.held_keycodes.iter().position(|&k| k == KeyCode::No) {
            // Otherwise, find the first free slot
            self.held_keycodes[index] = key;
            self.registered_keys[index] = Some((key_event.row, key_event.col));
        } else {
            warn!("Too many keys are pressed, {:?} is dropped", key);
        }
    }

    /// Unregister a key from hid report.
    fn unregister_keycode(&mut self, key: KeyCode, key_event: KeyEvent) {
        // First, find the key event slot according to the position
        if let Some(index) = self.find_slot(key_event) {
            self.held_keycodes[index] = KeyCode::No;
            self.registered_keys[index] = None;
        } else if let Some(index) = self.held_keycodes.iter().position(|&k| k == key) {
            // Otherwise, release the first same key
            self.held_keycodes[index] = KeyCode::No;
            self.registered_keys[index] = None;
        }
    }
}

#[cfg(test)]
mod test {
    use embassy_futures::block_on;

    use super::*;
    use crate::channel::{ControlChannel, ReportChannel};
    use crate::layout::{BASE, COL, FN, GAMING, NUM_LAYER, ROW, get_default_keymap};

    fn create_test_keyboard() -> Keyboard<'static, ROW, COL, NUM_LAYER> {
        // Box::leak is acceptable in tests
        let layers = Box::leak(Box::new(get_default_keymap()));
        let keymap = Box::leak(Box::new(RefCell::new(KeyMap::new(layers))));
        let reports: &'static ReportChannel = Box::leak(Box::new(ReportChannel::new()));
        let control: &'static ControlChannel = Box::leak(Box::new(ControlChannel::new()));
        Keyboard::new(keymap, &KeyboardConfig::default(), reports, control)
    }

    fn key_event(row: u8, col: u8, pressed: bool) -> KeyEvent {
        KeyEvent { row, col, pressed }
    }

    fn last_keyboard_report(keyboard: &Keyboard<'static, ROW, COL, NUM_LAYER>) -> Option<(u8, [u8; 6])> {
        let mut last = None;
        while let Ok(report) = keyboard.report_channel.try_receive() {
            if let Report::KeyboardReport(r) = report {
                last = Some((r.modifier, r.keycodes));
            }
        }
        last
    }

    #[test]
    fn test_basic_key_press_release() {
        block_on(async {
            let mut keyboard = create_test_keyboard();

            // Press A key
            keyboard.process_event(key_event(2, 1, true)).await;
            assert_eq!(keyboard.held_keycodes[0], KeyCode::A);

            // Release A key
            keyboard.process_event(key_event(2, 1, false)).await;
            assert_eq!(keyboard.held_keycodes[0], KeyCode::No);
        });
    }

    #[test]
    fn test_modifier_key() {
        block_on(async {
            let mut keyboard = create_test_keyboard();

            keyboard.process_event(key_event(3, 0, true)).await;
            assert_eq!(keyboard.held_modifiers, HidModifiers::new().with_left_shift(true));
            keyboard.process_event(key_event(3, 2, true)).await;
            assert_eq!(last_keyboard_report(&keyboard), Some((0x02, [0x1D, 0, 0, 0, 0, 0])));

            keyboard.process_event(key_event(3, 0, false)).await;
            assert_eq!(keyboard.held_modifiers, HidModifiers::new());
        });
    }

    #[test]
    fn test_grave_escape() {
        block_on(async {
            let mut keyboard = create_test_keyboard();

            keyboard.process_event(key_event(0, 0, true)).await;
            assert_eq!(keyboard.held_keycodes[0], KeyCode::Escape);
            keyboard.process_event(key_event(0, 0, false)).await;
            assert_eq!(keyboard.held_keycodes[0], KeyCode::No);

            // With shift held it's a grave
            keyboard.process_event(key_event(3, 0, true)).await;
            keyboard.process_event(key_event(0, 0, true)).await;
            assert_eq!(keyboard.held_keycodes[0], KeyCode::Grave);
            keyboard.process_event(key_event(0, 0, false)).await;
            assert_eq!(keyboard.held_keycodes[0], KeyCode::No);
        });
    }

    #[test]
    fn test_grave_escape_with_gui() {
        block_on(async {
            let mut keyboard = create_test_keyboard();

            keyboard.process_event(key_event(4, 1, true)).await;
            keyboard.process_event(key_event(0, 0, true)).await;
            assert_eq!(last_keyboard_report(&keyboard), Some((0x08, [0x35, 0, 0, 0, 0, 0])));
            keyboard.process_event(key_event(0, 0, false)).await;
            keyboard.process_event(key_event(4, 1, false)).await;

            // Ctrl and alt don't turn it into a grave
            keyboard.process_event(key_event(4, 0, true)).await;
            keyboard.process_event(key_event(4, 2, true)).await;
            keyboard.process_event(key_event(0, 0, true)).await;
            assert_eq!(last_keyboard_report(&keyboard), Some((0x05, [0x29, 0, 0, 0, 0, 0])));
        });
    }

    #[test]
    fn test_momentary_fn_layer() {
        block_on(async {
            let mut keyboard = create_test_keyboard();

            keyboard.process_event(key_event(4, 11, true)).await;
            assert_eq!(keyboard.active_layer(), FN);

            // F1 on FN
            keyboard.process_event(key_event(0, 1, true)).await;
            assert_eq!(keyboard.held_keycodes[0], KeyCode::F1);

            keyboard.process_event(key_event(4, 11, false)).await;
            assert_eq!(keyboard.active_layer(), BASE);

            // Released on the layer it was pressed on
            keyboard.process_event(key_event(0, 1, false)).await;
            assert_eq!(keyboard.held_keycodes[0], KeyCode::No);
        });
    }

    #[test]
    fn test_tilde_on_fn_layer() {
        block_on(async {
            let mut keyboard = create_test_keyboard();

            keyboard.process_event(key_event(4, 11, true)).await;
            keyboard.process_event(key_event(0, 0, true)).await;
            assert_eq!(last_keyboard_report(&keyboard), Some((0x02, [0x35, 0, 0, 0, 0, 0])));
            keyboard.process_event(key_event(0, 0, false)).await;
            assert_eq!(last_keyboard_report(&keyboard), Some((0, [0; 6])));
        });
    }

    #[test]
    fn test_to_gaming_layer() {
        block_on(async {
            let mut keyboard = create_test_keyboard();

            keyboard.process_event(key_event(4, 11, true)).await;
            keyboard.process_event(key_event(2, 2, true)).await;
            keyboard.process_event(key_event(2, 2, false)).await;
            keyboard.process_event(key_event(4, 11, false)).await;
            assert_eq!(keyboard.active_layer(), GAMING);

            keyboard.process_event(key_event(4, 11, true)).await;
            keyboard.process_event(key_event(2, 1, true)).await;
            keyboard.process_event(key_event(2, 1, false)).await;
            keyboard.process_event(key_event(4, 11, false)).await;
            assert_eq!(keyboard.active_layer(), BASE);
        });
    }

    #[test]
    fn test_key_action_no_and_transparent() {
        block_on(async {
            let mut keyboard = create_test_keyboard();

            // Unpopulated position
            keyboard.process_event(key_event(1, 13, true)).await;
            assert!(keyboard.report_channel.try_receive().is_err());

            // Transparent key on FN resolves to the base layer
            keyboard.process_event(key_event(4, 11, true)).await;
            keyboard.process_event(key_event(1, 1, true)).await;
            assert_eq!(keyboard.held_keycodes[0], KeyCode::Q);
        });
    }

    #[test]
    fn test_register_code() {
        block_on(async {
            let mut keyboard = create_test_keyboard();

            keyboard.register_code(KeyCode::D).await;
            keyboard.register_code(KeyCode::D).await;
            assert_eq!(keyboard.held_keycodes, [KeyCode::D, KeyCode::No, KeyCode::No, KeyCode::No, KeyCode::No, KeyCode::No]);

            keyboard.register_code(KeyCode::LCtrl).await;
            assert_eq!(last_keyboard_report(&keyboard), Some((0x01, [0x07, 0, 0, 0, 0, 0])));

            keyboard.unregister_code(KeyCode::D).await;
            keyboard.unregister_code(KeyCode::LCtrl).await;
            assert_eq!(last_keyboard_report(&keyboard), Some((0, [0; 6])));
        });
    }

    #[test]
    fn test_rollover_limit() {
        block_on(async {
            let mut keyboard = create_test_keyboard();
            for col in 1..8 {
                keyboard.process_event(key_event(2, col, true)).await;
                // Drain the channel so that it never fills up
                last_keyboard_report(&keyboard);
            }
            // The 7th key is dropped
            assert!(!keyboard.held_keycodes.contains(&KeyCode::J));
            assert!(keyboard.held_keycodes.contains(&KeyCode::H));
        });
    }
}
