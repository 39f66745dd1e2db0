pub mod test_macro;

use core::cell::RefCell;

use villur::channel::{ControlChannel, ReportChannel};
use villur::config::KeyboardConfig;
use villur::event::{ControlEvent, KeyEvent};
use villur::hid::Report;
use villur::keyboard::Keyboard;
use villur::keymap::KeyMap;
use villur::layout::{COL, NUM_LAYER, ROW, get_default_keymap};

// Init logger for tests
#[ctor::ctor]
pub fn init_log() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init();
}

pub(crate) const KC_LSHIFT: u8 = 1 << 1;

pub struct TestKeyboard {
    pub keyboard: Keyboard<'static, ROW, COL, NUM_LAYER>,
    pub reports: &'static ReportChannel,
    pub control: &'static ControlChannel,
}

/// Create the default keymap, wired to channels owned by this test
pub fn create_test_keyboard() -> TestKeyboard {
    create_test_keyboard_with_config(KeyboardConfig::default())
}

pub fn create_test_keyboard_with_config(config: KeyboardConfig) -> TestKeyboard {
    // Box::leak is acceptable in tests
    let layers = Box::leak(Box::new(get_default_keymap()));
    let keymap = Box::leak(Box::new(RefCell::new(KeyMap::new(layers))));
    let reports: &'static ReportChannel = Box::leak(Box::new(ReportChannel::new()));
    let control: &'static ControlChannel = Box::leak(Box::new(ControlChannel::new()));
    TestKeyboard {
        keyboard: Keyboard::new(keymap, &config, reports, control),
        reports,
        control,
    }
}

impl TestKeyboard {
    /// Feed a key event and collect the keyboard reports it produced, as `(modifier, keycodes)`
    pub async fn key(&mut self, row: u8, col: u8, pressed: bool) -> Vec<(u8, [u8; 6])> {
        self.process(row, col, pressed).await;
        self.keyboard_reports()
    }

    /// Feed a key event, leaving the produced reports in the channel
    pub async fn process(&mut self, row: u8, col: u8, pressed: bool) {
        self.keyboard.process_event(KeyEvent { row, col, pressed }).await;
    }

    /// Press then release a key, discarding the reports
    pub async fn tap(&mut self, row: u8, col: u8) {
        self.key(row, col, true).await;
        self.key(row, col, false).await;
    }

    pub fn keyboard_reports(&self) -> Vec<(u8, [u8; 6])> {
        let mut reports = Vec::new();
        while let Ok(report) = self.reports.try_receive() {
            if let Report::KeyboardReport(r) = report {
                reports.push((r.modifier, r.keycodes));
            }
        }
        reports
    }

    pub fn media_reports(&self) -> Vec<u16> {
        let mut reports = Vec::new();
        while let Ok(report) = self.reports.try_receive() {
            if let Report::MediaKeyboardReport(r) = report {
                reports.push(r.usage_id);
            }
        }
        reports
    }

    pub fn control_events(&self) -> Vec<ControlEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.control.try_receive() {
            events.push(event);
        }
        events
    }

    /// Switch to the gaming layer with `FN` + `S`
    pub async fn enter_gaming_layer(&mut self) {
        self.key(4, 11, true).await;
        self.tap(2, 2).await;
        self.key(4, 11, false).await;
    }
}
