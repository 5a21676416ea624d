use rocket::form::{self, FromFormField, ValueField};

use crate::error::ValueError;
use crate::modes;

// Maximum brightness level.
const MAX_BRIGHTNESS: u8 = 100;

/// Brightness level as a percentage (0-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct Brightness(u8);

impl Brightness {
    pub(crate) const MIN: Self = Self(0);
    pub(crate) const MAX: Self = Self(MAX_BRIGHTNESS);

    // Preset used by reading mode.
    pub(crate) const READING: Self = Self(85);
    // Preset used by dim mode.
    pub(crate) const DIM: Self = Self(25);

    /// Creates a new brightness level, rejecting values above 100.
    pub(crate) fn new(value: u8) -> Result<Self, ValueError> {
        if value > MAX_BRIGHTNESS {
            return Err(ValueError::OutOfRange {
                min: Self::MIN.0,
                max: Self::MAX.0,
                actual: value,
            });
        }
        Ok(Self(value))
    }

    pub(crate) const fn value(self) -> u8 {
        self.0
    }
}

impl Default for Brightness {
    fn default() -> Self {
        Self(50)
    }
}

#[rocket::async_trait]
impl<'v> FromFormField<'v> for Brightness {
    fn from_value(field: ValueField<'v>) -> form::Result<'v, Self> {
        let value = u8::from_value(field)?;
        Brightness::new(value).map_err(|e| form::Error::validation(e.to_string()).into())
    }
}

/// Bulb color, as a CSS hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Color(&'static str);

impl Color {
    /// Standard warm light.
    pub(crate) const GOLD: Self = Self("#FFD700");
    /// Reading mode light.
    pub(crate) const COOL_WHITE: Self = Self("#E0FFFF");
    /// Dim mode light.
    pub(crate) const DEEP_ORANGE: Self = Self("#FF8C00");

    pub(crate) const fn hex(self) -> &'static str {
        self.0
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::GOLD
    }
}

/// Light attributes of the device currently shown on the control page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct LightState {
    pub(crate) power: bool,
    pub(crate) brightness: Brightness,
    pub(crate) color: Color,
    pub(crate) reading_mode: bool,
    pub(crate) dim_mode: bool,
}

/// A change requested by a control page widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LightEvent {
    SetPower(bool),
    SetBrightness(Brightness),
    SetReadingMode(bool),
    SetDimMode(bool),
}

impl LightState {
    /// Returns the state obtained by applying `event`.
    ///
    /// Power and brightness are plain writes. Mode flags only run their
    /// preset rule when the flag actually changes value.
    #[must_use]
    pub(crate) fn apply(self, event: LightEvent) -> Self {
        match event {
            LightEvent::SetPower(power) => Self { power, ..self },
            LightEvent::SetBrightness(brightness) => Self { brightness, ..self },
            LightEvent::SetReadingMode(enabled) if enabled != self.reading_mode => {
                modes::reading_mode_changed(self, enabled)
            }
            LightEvent::SetDimMode(enabled) if enabled != self.dim_mode => {
                modes::dim_mode_changed(self, enabled)
            }
            LightEvent::SetReadingMode(_) | LightEvent::SetDimMode(_) => self,
        }
    }
}
