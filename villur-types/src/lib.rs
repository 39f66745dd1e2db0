//! # Villur Types
//!
//! Fundamental type definitions used by the villur keymap.
//!
//! - [`action`] - Key actions stored in the keymap (key presses, layer operations)
//! - [`keycode`] - HID keycodes, consumer keys and firmware keycodes
//! - [`modifier`] - Modifier key combinations and the HID modifier byte

#![cfg_attr(not(test), no_std)]

pub mod action;
pub mod keycode;
pub mod modifier;
