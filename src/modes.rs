//! Preset rules for the reading and dim light modes.
//!
//! The two modes are mutually exclusive: enabling one switches the other
//! off, turns the light on and applies the preset brightness and color.
//! Disabling a mode only restores the standard color.

use crate::light::{Brightness, Color, LightState};

/// Next state after the reading mode flag changed to `enabled`.
#[must_use]
pub(crate) fn reading_mode_changed(state: LightState, enabled: bool) -> LightState {
    if enabled {
        LightState {
            power: true,
            brightness: Brightness::READING,
            color: Color::COOL_WHITE,
            reading_mode: true,
            dim_mode: false,
        }
    } else {
        LightState {
            reading_mode: false,
            color: Color::GOLD,
            ..state
        }
    }
}

/// Next state after the dim mode flag changed to `enabled`.
#[must_use]
pub(crate) fn dim_mode_changed(state: LightState, enabled: bool) -> LightState {
    if enabled {
        LightState {
            power: true,
            brightness: Brightness::DIM,
            color: Color::DEEP_ORANGE,
            reading_mode: false,
            dim_mode: true,
        }
    } else {
        LightState {
            dim_mode: false,
            color: Color::GOLD,
            ..state
        }
    }
}
