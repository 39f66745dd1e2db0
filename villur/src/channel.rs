//! Exposed channels which can be used to wire the keymap into the host firmware

use embassy_sync::channel::Channel;
pub use embassy_sync::{blocking_mutex, channel};

use crate::event::{ControlEvent, KeyEvent};
use crate::hid::Report;
use crate::{CONTROL_CHANNEL_SIZE, EVENT_CHANNEL_SIZE, REPORT_CHANNEL_SIZE, RawMutex};

/// Channel for key events coming from the matrix scanner
pub static KEY_EVENT_CHANNEL: Channel<RawMutex, KeyEvent, EVENT_CHANNEL_SIZE> = Channel::new();
/// Channel for keyboard and media reports going to the host
pub static KEYBOARD_REPORT_CHANNEL: Channel<RawMutex, Report, REPORT_CHANNEL_SIZE> = Channel::new();
/// Channel for rgb and bootloader requests
pub static CONTROL_CHANNEL: Channel<RawMutex, ControlEvent, CONTROL_CHANNEL_SIZE> = Channel::new();

pub type KeyEventChannel = Channel<RawMutex, KeyEvent, EVENT_CHANNEL_SIZE>;
pub type ReportChannel = Channel<RawMutex, Report, REPORT_CHANNEL_SIZE>;
pub type ControlChannel = Channel<RawMutex, ControlEvent, CONTROL_CHANNEL_SIZE>;
