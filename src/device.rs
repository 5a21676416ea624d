use rocket::form::FromForm;

use serde::Serialize;

use crate::error::ValidationError;

// A paired bulb.
//
// Only built from a validated pairing request, so name and identifier are
// never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct Device {
    // Room name.
    name: String,
    // Device identifier.
    id: String,
}

impl Device {
    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn id(&self) -> &str {
        &self.id
    }
}

// Pairing form fields.
#[derive(Debug, FromForm)]
pub(crate) struct PairingRequest<'r> {
    #[field(name = "room_name", default = "")]
    pub(crate) room_name: &'r str,
    #[field(name = "device_id", default = "")]
    pub(crate) device_id: &'r str,
}

impl PairingRequest<'_> {
    // Validates the form and builds the device to pair.
    //
    // Every failing field is reported.
    pub(crate) fn validate(&self) -> Result<Device, Vec<ValidationError>> {
        let name = self.room_name.trim();
        let id = self.device_id.trim();

        let mut errors = Vec::new();
        if name.is_empty() {
            errors.push(ValidationError::EmptyRoomName);
        }
        if id.is_empty() {
            errors.push(ValidationError::EmptyDeviceId);
        }

        if errors.is_empty() {
            Ok(Device {
                name: name.into(),
                id: id.into(),
            })
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
pub(crate) fn device(name: &str, id: &str) -> Device {
    PairingRequest {
        room_name: name,
        device_id: id,
    }
    .validate()
    .expect("valid test device")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_request() {
        let device = PairingRequest {
            room_name: "Bedroom",
            device_id: "B-12",
        }
        .validate()
        .unwrap();

        assert_eq!(device.name(), "Bedroom");
        assert_eq!(device.id(), "B-12");
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        let device = PairingRequest {
            room_name: "  Kitchen ",
            device_id: "\tK-1",
        }
        .validate()
        .unwrap();

        assert_eq!(device.name(), "Kitchen");
        assert_eq!(device.id(), "K-1");
    }

    #[test]
    fn empty_fields_are_reported() {
        let errors = PairingRequest {
            room_name: "",
            device_id: "X",
        }
        .validate()
        .unwrap_err();
        assert_eq!(errors, vec![ValidationError::EmptyRoomName]);

        let errors = PairingRequest {
            room_name: "   ",
            device_id: "",
        }
        .validate()
        .unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::EmptyRoomName,
                ValidationError::EmptyDeviceId,
            ]
        );
    }
}
