//! Simulated pairing handshake.
//!
//! Pairing goes through three sequential phases, each one taking a fixed
//! fake delay. A progress notification is emitted as each phase starts, so
//! the browser can show each status message while the handshake runs.

use std::time::Duration;

use rocket::tokio::sync::mpsc::{self, UnboundedReceiver};
use rocket::tokio::sync::OwnedMutexGuard;
use rocket::tokio::time::sleep;

use serde::Serialize;

use tracing::{debug, info};

use crate::device::Device;
use crate::session::Session;

/// Handshake phases, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PairingPhase {
    Discovery,
    FirmwareVerification,
    Confirmation,
}

impl PairingPhase {
    pub(crate) const ALL: [Self; 3] = [
        Self::Discovery,
        Self::FirmwareVerification,
        Self::Confirmation,
    ];

    pub(crate) const fn message(self) -> &'static str {
        match self {
            Self::Discovery => "Searching for the device...",
            Self::FirmwareVerification => "Verifying firmware...",
            Self::Confirmation => "Confirming pairing...",
        }
    }
}

// Outcome of a completed handshake, shown once on the landing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct PairingReport {
    // Status messages, one per phase.
    steps: Vec<&'static str>,
    // Success confirmation.
    confirmation: String,
}

impl PairingReport {
    pub(crate) fn confirmation(&self) -> &str {
        &self.confirmation
    }
}

// Progress of a running handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PairingUpdate {
    // A phase has started.
    Phase(PairingPhase),
    // Every phase has completed and the device has been added.
    Paired(PairingReport),
}

pub(crate) struct Handshake {
    phase_delay: Duration,
}

impl Handshake {
    pub(crate) fn new(phase_delay: Duration) -> Self {
        Self { phase_delay }
    }

    /// Runs every phase to completion, calling `progress` as each phase
    /// starts.
    pub(crate) async fn run(
        &self,
        device: &Device,
        mut progress: impl FnMut(PairingPhase),
    ) -> PairingReport {
        let mut steps = Vec::with_capacity(PairingPhase::ALL.len());
        for phase in PairingPhase::ALL {
            debug!("Pairing {}: {:?}", device.id(), phase);
            progress(phase);
            steps.push(phase.message());
            sleep(self.phase_delay).await;
        }

        PairingReport {
            steps,
            confirmation: format!("{} ({}) paired successfully!", device.name(), device.id()),
        }
    }

    /// Pairs `device` in the background and adds it to `session`.
    ///
    /// The session stays locked until the handshake has completed, and the
    /// handshake completes even when nobody reads the returned updates.
    pub(crate) fn spawn(
        self,
        device: Device,
        mut session: OwnedMutexGuard<Session>,
    ) -> UnboundedReceiver<PairingUpdate> {
        let (updates, progress) = mpsc::unbounded_channel();

        rocket::tokio::spawn(async move {
            let report = self
                .run(&device, |phase| {
                    info!("{}", phase.message());
                    let _ = updates.send(PairingUpdate::Phase(phase));
                })
                .await;

            session.add_device(device);
            session.set_pairing_report(report.clone());
            let _ = updates.send(PairingUpdate::Paired(report));
        });

        progress
    }
}
