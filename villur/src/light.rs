//! RGB matrix lighting: the per-layer indicator and the RGB control keycodes.
//!
//! The LED driver itself lives in the host firmware, it is reached through [`RgbMatrix`].

use heapless::Vec;
use rgb::RGB8;

use crate::config::{INDICATOR_MAX_LAYERS, LightConfig};
use crate::event::ControlEvent;
use crate::types::keycode::KeyCode;

/// RGB matrix controls, sent when an RGB keycode is pressed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RgbCommand {
    Toggle,
    ModeForward,
    ModeReverse,
    HueUp,
    HueDown,
    SaturationUp,
    SaturationDown,
    ValueUp,
    ValueDown,
    SpeedUp,
    SpeedDown,
}

impl RgbCommand {
    pub fn from_keycode(key: KeyCode) -> Option<Self> {
        match key {
            KeyCode::RgbTog => Some(RgbCommand::Toggle),
            KeyCode::RgbModeForward => Some(RgbCommand::ModeForward),
            KeyCode::RgbModeReverse => Some(RgbCommand::ModeReverse),
            KeyCode::RgbHui => Some(RgbCommand::HueUp),
            KeyCode::RgbHud => Some(RgbCommand::HueDown),
            KeyCode::RgbSai => Some(RgbCommand::SaturationUp),
            KeyCode::RgbSad => Some(RgbCommand::SaturationDown),
            KeyCode::RgbVai => Some(RgbCommand::ValueUp),
            KeyCode::RgbVad => Some(RgbCommand::ValueDown),
            KeyCode::RgbSpi => Some(RgbCommand::SpeedUp),
            KeyCode::RgbSpd => Some(RgbCommand::SpeedDown),
            _ => None,
        }
    }
}

/// The RGB matrix driver of the host firmware
pub trait RgbMatrix {
    type Error;

    /// Set every LED to the same color
    fn set_color_all(&mut self, color: RGB8) -> Result<(), Self::Error>;

    /// Apply an RGB control (mode, hue, saturation, value, speed)
    fn apply(&mut self, command: RgbCommand) -> Result<(), Self::Error>;
}

/// Maps the highest active layer to a solid color
#[derive(Clone, Debug)]
pub struct LayerIndicator {
    layer_colors: Vec<(u8, RGB8), INDICATOR_MAX_LAYERS>,
    default_color: RGB8,
}

impl LayerIndicator {
    pub fn new(config: &LightConfig) -> Self {
        Self {
            layer_colors: config.layer_colors.clone(),
            default_color: config.default_color,
        }
    }

    /// Color of the given layer
    pub fn color_for_layer(&self, layer: u8) -> RGB8 {
        self.layer_colors
            .iter()
            .find(|(l, _)| *l == layer)
            .map(|(_, c)| *c)
            .unwrap_or(self.default_color)
    }
}

pub struct LightService<M: RgbMatrix> {
    matrix: M,
    indicator: LayerIndicator,
}

impl<M: RgbMatrix> LightService<M> {
    pub fn new(matrix: M, config: &LightConfig) -> Self {
        Self {
            matrix,
            indicator: LayerIndicator::new(config),
        }
    }

    pub fn matrix(&self) -> &M {
        &self.matrix
    }

    /// Indicator hook, called by the host's lighting task once per frame.
    ///
    /// Paints all LEDs with the color of `highest_layer`. Nothing else is drawn on top of it.
    pub fn render(&mut self, highest_layer: u8) -> Result<RGB8, M::Error> {
        let color = self.indicator.color_for_layer(highest_layer);
        self.matrix.set_color_all(color)?;
        Ok(color)
    }

    /// Forward an RGB control to the driver
    pub fn process_command(&mut self, command: RgbCommand) {
        debug!("RGB command: {:?}", command);
        if self.matrix.apply(command).is_err() {
            error!("RGB matrix failed to apply {:?}", command);
        }
    }

    /// Handle RGB events from the control channel, other events are returned to the caller
    pub fn process_control_event(&mut self, event: ControlEvent) -> Option<ControlEvent> {
        match event {
            ControlEvent::Rgb(command) => {
                self.process_command(command);
                None
            }
            other => Some(other),
        }
    }
}
