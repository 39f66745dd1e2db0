//! # Villur
//!
//! A GMMK2 P65 ISO keymap: three layers, a per-layer RGB indicator and snap tap on the
//! gaming layer.
//!
//! The host firmware scans the matrix, talks to the USB host and drives the LEDs. It wires
//! itself to the keymap through [`channel`]: key events go into
//! [`channel::KEY_EVENT_CHANNEL`], HID reports come out of
//! [`channel::KEYBOARD_REPORT_CHANNEL`] and RGB/bootloader requests come out of
//! [`channel::CONTROL_CHANNEL`]. The layer indicator is drawn by calling
//! [`light::LightService::render`] once per frame.

#![cfg_attr(not(test), no_std)]

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod channel;
pub mod config;
pub mod event;
pub mod hid;
pub mod keyboard;
pub mod keymap;
pub mod layout;
pub mod layout_macro;
pub mod light;
pub mod snap_tap;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
pub use villur_types as types;

pub const EVENT_CHANNEL_SIZE: usize = 16;
pub const REPORT_CHANNEL_SIZE: usize = 16;
pub const CONTROL_CHANNEL_SIZE: usize = 4;

pub type RawMutex = CriticalSectionRawMutex;
