//! Page contexts handed to the templates.
//!
//! Every view is built from the session state only, so rendering never
//! changes anything. The pairing page is the exception: it is streamed in
//! pieces while the handshake runs.

use rocket_dyn_templates::handlebars::html_escape;

use serde::Serialize;

use crate::device::Device;
use crate::error::ValidationError;
use crate::light::{Brightness, Color, LightState};
use crate::pairing::{PairingPhase, PairingReport};
use crate::widgets::{Slider, TimeInput, Toggle};

// Application title.
const TITLE: &str = "Pluggers App";
// Landing page message when no device has been paired.
const NO_DEVICES_MESSAGE: &str = "No devices paired yet";

// Glow is `brightness / GLOW_DIVISOR` pixels wide.
const GLOW_DIVISOR: f64 = 1.5;
// Opacity of a switched off bulb.
const OFF_OPACITY: f64 = 0.2;

// Seconds the pairing confirmation stays on screen before the dashboard
// is reloaded.
const PAIRING_REFRESH_SECS: u8 = 2;

// Schedule defaults.
const SCHEDULE_START: &str = "08:00";
const SCHEDULE_END: &str = "21:00";

/// Bulb picture of the control page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct BulbIndicator {
    opacity: f64,
    glow_intensity: f64,
    glow_color: &'static str,
    status: &'static str,
}

impl BulbIndicator {
    pub(crate) fn render(power: bool, brightness: Brightness, color: Color) -> Self {
        if power {
            Self {
                opacity: 1.0,
                glow_intensity: f64::from(brightness.value()) / GLOW_DIVISOR,
                glow_color: color.hex(),
                status: "STATUS: ON",
            }
        } else {
            Self {
                opacity: OFF_OPACITY,
                glow_intensity: 0.,
                glow_color: "transparent",
                status: "STATUS: OFF",
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct DeviceEntry<'a> {
    name: &'a str,
    id: &'a str,
    // Route opening the device.
    action: String,
}

#[derive(Debug, Default, Serialize)]
struct PairingForm<'a> {
    room_name: &'a str,
    device_id: &'a str,
    room_name_error: Option<String>,
    device_id_error: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct LandingView<'a> {
    title: &'static str,
    devices: Vec<DeviceEntry<'a>>,
    no_devices_message: Option<&'static str>,
    pairing: Option<PairingReport>,
    pair_action: String,
    form: PairingForm<'a>,
}

impl<'a> LandingView<'a> {
    pub(crate) fn new(devices: &'a [Device], pairing: Option<PairingReport>) -> Self {
        Self {
            title: TITLE,
            devices: devices
                .iter()
                .enumerate()
                .map(|(index, device)| DeviceEntry {
                    name: device.name(),
                    id: device.id(),
                    action: uri!(crate::open_device(index)).to_string(),
                })
                .collect(),
            no_devices_message: devices.is_empty().then_some(NO_DEVICES_MESSAGE),
            pairing,
            pair_action: uri!(crate::pair).to_string(),
            form: PairingForm::default(),
        }
    }

    // Fills the pairing form back with a rejected submission.
    pub(crate) fn rejected(
        mut self,
        room_name: &'a str,
        device_id: &'a str,
        errors: &[ValidationError],
    ) -> Self {
        self.form.room_name = room_name;
        self.form.device_id = device_id;
        for error in errors {
            match error {
                ValidationError::EmptyRoomName => {
                    self.form.room_name_error = Some(error.to_string())
                }
                ValidationError::EmptyDeviceId => {
                    self.form.device_id_error = Some(error.to_string())
                }
            }
        }
        self
    }
}

/// Pieces of the page shown while a device is being paired.
pub(crate) struct PairingPage;

impl PairingPage {
    pub(crate) fn head(device: &Device) -> String {
        format!(
            "<!DOCTYPE html>\n\
             <html lang=\"en\">\n\
             <head><meta charset=\"utf-8\"><title>{TITLE}</title></head>\n\
             <body style=\"font-family: sans-serif; max-width: 32rem; \
             margin: 0 auto; padding: 1rem;\">\n\
             <h3>Pairing {} ({})</h3>\n\
             <ol>\n",
            html_escape(device.name()),
            html_escape(device.id()),
        )
    }

    pub(crate) fn phase(phase: PairingPhase) -> String {
        format!("<li>{}</li>\n", phase.message())
    }

    // Closes the page and sends the browser back to the dashboard.
    pub(crate) fn done(report: &PairingReport) -> String {
        let dashboard = uri!(crate::index);
        format!(
            "</ol>\n\
             <p style=\"color: #27ae60; font-weight: bold;\">{}</p>\n\
             <p><a href=\"{dashboard}\">Go to dashboard</a></p>\n\
             <meta http-equiv=\"refresh\" content=\"{PAIRING_REFRESH_SECS}; url={dashboard}\">\n\
             </body>\n\
             </html>\n",
            html_escape(report.confirmation()),
        )
    }
}

#[derive(Debug, Serialize)]
struct Schedule {
    start: TimeInput,
    end: TimeInput,
    enabled: Toggle,
}

#[derive(Debug, Serialize)]
pub(crate) struct ControlView<'a> {
    title: &'static str,
    device_name: &'a str,
    device_id: &'a str,
    back_action: String,
    bulb: BulbIndicator,
    power: Toggle,
    brightness: Slider<u8>,
    reading_mode: Toggle,
    dim_mode: Toggle,
    // Rendered only, nothing reads it.
    schedule: Schedule,
}

impl<'a> ControlView<'a> {
    pub(crate) fn new(device: &'a Device, light: LightState) -> Self {
        let brightness = Slider::new(
            "Brightness",
            uri!(crate::set_brightness).to_string(),
            Brightness::MIN.value(),
            Brightness::MAX.value(),
            1,
            light.brightness.value(),
        );

        Self {
            title: TITLE,
            device_name: device.name(),
            device_id: device.id(),
            back_action: uri!(crate::back).to_string(),
            bulb: BulbIndicator::render(light.power, light.brightness, light.color),
            power: Toggle::new(
                "Master Power",
                uri!(crate::set_power).to_string(),
                light.power,
            ),
            brightness: if light.power {
                brightness
            } else {
                brightness.disabled(Brightness::MIN.value())
            },
            reading_mode: Toggle::new(
                "Reading Mode",
                uri!(crate::set_reading_mode).to_string(),
                light.reading_mode,
            ),
            dim_mode: Toggle::new(
                "Dim Light",
                uri!(crate::set_dim_mode).to_string(),
                light.dim_mode,
            ),
            schedule: Schedule {
                start: TimeInput::new("Start", SCHEDULE_START),
                end: TimeInput::new("End", SCHEDULE_END),
                enabled: Toggle::inert("Enable Schedule", true),
            },
        }
    }
}
