use rocket::http::uri::Origin;
use rocket::http::Status;
use rocket::Request;

use rocket_dyn_templates::{context, Template};

use thiserror::Error;

// Go to dashboard message.
const GO_TO_DASHBOARD_MESSAGE: &str = "Go to dashboard";
// Unknown error.
const UNKNOWN_ERROR_MESSAGE: &str = "Unknown";

/// Errors raised by constrained values.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValueError {
    /// A numeric value is outside the allowed range.
    #[error("value {actual} is out of range [{min}, {max}]")]
    OutOfRange { min: u8, max: u8, actual: u8 },
}

/// Errors raised when a pairing form is submitted.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValidationError {
    #[error("Room name is required")]
    EmptyRoomName,
    #[error("Device ID is required")]
    EmptyDeviceId,
}

struct RenderTemplate;

impl RenderTemplate {
    fn text(uri: &Origin<'_>, status: u16, error_message: &str) -> Template {
        Template::render(
            "error",
            context! {
                route: "/",
                uri: uri.to_string(),
                status,
                error_message,
                goto_message: GO_TO_DASHBOARD_MESSAGE,
            },
        )
    }
}

// Renders the pairing form again when it has been rejected.
#[derive(Responder)]
#[response(status = 422, content_type = "html")]
pub(crate) struct PairingRejected(pub(crate) Template);

// Renders the template for any kind of catchers
#[catch(default)]
pub(crate) fn default(status: Status, req: &Request<'_>) -> Template {
    RenderTemplate::text(
        req.uri(),
        status.code,
        status.reason().unwrap_or(UNKNOWN_ERROR_MESSAGE),
    )
}

// Returns all defined catchers
pub(crate) fn catchers() -> Vec<rocket::Catcher> {
    catchers![default]
}
