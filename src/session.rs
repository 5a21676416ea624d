use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use rocket::http::{Cookie, Status};
use rocket::request::{FromRequest, Outcome, Request};
use rocket::tokio::sync::{Mutex, MutexGuard, OwnedMutexGuard};

use tracing::{debug, info};

use uuid::Uuid;

use crate::config::DashboardConfig;
use crate::device::Device;
use crate::light::{LightEvent, LightState};
use crate::pairing::PairingReport;

// Private cookie holding the session identifier.
const SESSION_COOKIE: &str = "pluggers_session";

// Dashboard pages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum Page {
    // Paired devices and pairing form.
    #[default]
    Landing,
    // Light controls of the selected device.
    Control,
}

// State of a single dashboard session.
//
// Only one light state exists: it belongs to whichever device has been
// opened last and it is reset every time a device is opened.
#[derive(Debug, Default)]
pub(crate) struct Session {
    // Current page.
    page: Page,
    // Device opened from the landing page.
    selected: Option<Device>,
    // Light state of the selected device.
    light: LightState,
    // Paired devices, in pairing order.
    devices: Vec<Device>,
    // Last pairing outcome, not yet shown.
    pairing_report: Option<PairingReport>,
}

impl Session {
    pub(crate) fn page(&self) -> Page {
        self.page
    }

    pub(crate) fn selected(&self) -> Option<&Device> {
        self.selected.as_ref()
    }

    pub(crate) fn light(&self) -> LightState {
        self.light
    }

    pub(crate) fn devices(&self) -> &[Device] {
        &self.devices
    }

    /// Applies a control widget change.
    ///
    /// Changes are dropped when the control page is not shown, and
    /// brightness changes are dropped while the light is off since the
    /// slider is disabled. Returns whether the event was applied.
    pub(crate) fn update(&mut self, event: LightEvent) -> bool {
        if self.page != Page::Control {
            debug!("Ignoring {:?} outside of the control page", event);
            return false;
        }
        if matches!(event, LightEvent::SetBrightness(_)) && !self.light.power {
            debug!("Ignoring {:?} while the light is off", event);
            return false;
        }

        self.light = self.light.apply(event);
        debug!("Light state: {:?}", self.light);
        true
    }

    pub(crate) fn reset_light_state(&mut self) {
        self.light = LightState::default();
    }

    /// Appends a paired device and shows the landing page, where the new
    /// device is listed.
    pub(crate) fn add_device(&mut self, device: Device) {
        info!("Paired device {} in {}", device.id(), device.name());
        self.devices.push(device);
        self.page = Page::Landing;
    }

    /// Opens the device at `index` on the control page with a fresh light
    /// state.
    pub(crate) fn open_device(&mut self, index: usize) -> Option<&Device> {
        let device = self.devices.get(index)?.clone();
        debug!("Opening device {}", device.id());

        self.reset_light_state();
        self.page = Page::Control;
        self.selected = Some(device);
        self.selected.as_ref()
    }

    // Leaves the control page. Selection and light state are kept.
    pub(crate) fn back(&mut self) {
        self.page = Page::Landing;
    }

    pub(crate) fn set_pairing_report(&mut self, report: PairingReport) {
        self.pairing_report = Some(report);
    }

    pub(crate) fn take_pairing_report(&mut self) -> Option<PairingReport> {
        self.pairing_report.take()
    }
}

pub(crate) type SharedSession = Arc<Mutex<Session>>;

struct Entry {
    session: SharedSession,
    last_seen: Instant,
}

// All live sessions, by identifier.
#[derive(Default)]
pub(crate) struct Sessions(parking_lot::Mutex<HashMap<Uuid, Entry>>);

impl Sessions {
    // Returns the session for `id`, creating it when absent.
    //
    // Other sessions idle for longer than the configured time are dropped.
    // When the map is full, a new session replaces the least recently used
    // one.
    pub(crate) fn open(&self, id: Uuid, config: &DashboardConfig) -> SharedSession {
        let now = Instant::now();
        let idle = config.session_idle();
        let mut sessions = self.0.lock();

        sessions.retain(|key, entry| *key == id || now.duration_since(entry.last_seen) < idle);

        if !sessions.contains_key(&id) && sessions.len() >= config.max_sessions {
            let oldest = sessions
                .iter()
                .min_by_key(|(_, entry)| entry.last_seen)
                .map(|(key, _)| *key);
            if let Some(oldest) = oldest {
                debug!("Session limit reached, dropping session {}", oldest);
                sessions.remove(&oldest);
            }
        }

        let entry = sessions.entry(id).or_insert_with(|| {
            debug!("New session {}", id);
            Entry {
                session: SharedSession::default(),
                last_seen: now,
            }
        });
        entry.last_seen = now;
        entry.session.clone()
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.0.lock().len()
    }
}

// Session of the requesting browser.
//
// The session identifier travels in a private cookie, which is created on
// the first request.
pub(crate) struct ActiveSession(SharedSession);

impl ActiveSession {
    // Waits until no other request of the same session is running.
    pub(crate) async fn lock(&self) -> MutexGuard<'_, Session> {
        self.0.lock().await
    }

    // Same as `lock`, but the guard can be moved into a spawned task.
    pub(crate) async fn lock_owned(self) -> OwnedMutexGuard<Session> {
        self.0.lock_owned().await
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for ActiveSession {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let rocket = request.rocket();
        let (Some(sessions), Some(config)) = (
            rocket.state::<Sessions>(),
            rocket.state::<DashboardConfig>(),
        ) else {
            return Outcome::Error((Status::InternalServerError, ()));
        };

        let cookies = request.cookies();
        let id = cookies
            .get_private(SESSION_COOKIE)
            .and_then(|cookie| Uuid::parse_str(cookie.value()).ok())
            .unwrap_or_else(|| {
                let id = Uuid::new_v4();
                cookies.add_private(Cookie::new(SESSION_COOKIE, id.to_string()));
                id
            });

        Outcome::Success(Self(sessions.open(id, config)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::device::device;
    use crate::light::{Brightness, Color};
    use crate::pairing::Handshake;

    fn with_devices() -> Session {
        let mut session = Session::default();
        session.add_device(device("Bedroom", "B-12"));
        session.add_device(device("Kitchen", "K-1"));
        session
    }

    #[test]
    fn starts_on_landing() {
        let session = Session::default();
        assert_eq!(session.page(), Page::Landing);
        assert!(session.selected().is_none());
        assert!(session.devices().is_empty());
        assert_eq!(session.light(), LightState::default());
    }

    #[test]
    fn devices_keep_pairing_order() {
        let session = with_devices();
        let names: Vec<_> = session.devices().iter().map(Device::name).collect();
        assert_eq!(names, ["Bedroom", "Kitchen"]);
    }

    #[test]
    fn opening_resets_light_state() {
        let mut session = with_devices();
        session.open_device(0);
        assert!(session.update(LightEvent::SetDimMode(true)));
        assert_ne!(session.light(), LightState::default());

        let device = session.open_device(1).cloned();
        assert_eq!(device, Some(device_at(&session, 1)));
        assert_eq!(session.page(), Page::Control);
        assert_eq!(session.light(), LightState::default());
    }

    #[test]
    fn unknown_device_keeps_state() {
        let mut session = with_devices();
        assert!(session.open_device(7).is_none());
        assert_eq!(session.page(), Page::Landing);
        assert!(session.selected().is_none());
    }

    #[test]
    fn back_keeps_light_state() {
        let mut session = with_devices();
        session.open_device(0);
        session.update(LightEvent::SetReadingMode(true));
        let light = session.light();

        session.back();
        assert_eq!(session.page(), Page::Landing);
        assert_eq!(session.light(), light);
        assert_eq!(session.selected().map(Device::id), Some("B-12"));
    }

    #[test]
    fn pairing_shows_landing() {
        let mut session = with_devices();
        session.open_device(0);
        session.update(LightEvent::SetPower(true));

        session.add_device(device("Hall", "H-1"));
        assert_eq!(session.page(), Page::Landing);
        assert_eq!(session.devices().len(), 3);
        // Selection and light state are kept, as when going back.
        assert_eq!(session.selected().map(Device::id), Some("B-12"));
        assert!(session.light().power);
    }

    #[test]
    fn updates_need_control_page() {
        let mut session = with_devices();
        assert!(!session.update(LightEvent::SetPower(true)));
        assert!(!session.light().power);
    }

    #[test]
    fn brightness_needs_power() {
        let mut session = with_devices();
        session.open_device(0);

        let brightness = Brightness::new(90).unwrap();
        assert!(!session.update(LightEvent::SetBrightness(brightness)));
        assert_eq!(session.light().brightness.value(), 50);

        session.update(LightEvent::SetPower(true));
        assert!(session.update(LightEvent::SetBrightness(brightness)));
        assert_eq!(session.light().brightness, brightness);
        assert_eq!(session.light().color, Color::GOLD);
    }

    #[rocket::async_test]
    async fn pairing_report_is_taken_once() {
        let mut session = Session::default();
        assert!(session.take_pairing_report().is_none());

        let device = device("Bedroom", "B-12");
        let report = Handshake::new(Duration::ZERO).run(&device, |_| {}).await;
        session.set_pairing_report(report.clone());

        assert_eq!(session.take_pairing_report(), Some(report));
        assert!(session.take_pairing_report().is_none());
    }

    fn config(session_idle_secs: u64, max_sessions: usize) -> DashboardConfig {
        DashboardConfig {
            session_idle_secs,
            max_sessions,
            ..DashboardConfig::default()
        }
    }

    #[test]
    fn open_is_idempotent() {
        let sessions = Sessions::default();
        let id = Uuid::new_v4();
        let config = config(60, 16);

        let first = sessions.open(id, &config);
        let second = sessions.open(id, &config);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(sessions.len(), 1);
    }

    #[test]
    fn idle_sessions_are_dropped() {
        let sessions = Sessions::default();
        sessions.open(Uuid::new_v4(), &config(60, 16));
        sessions.open(Uuid::new_v4(), &config(60, 16));
        assert_eq!(sessions.len(), 2);

        let current = Uuid::new_v4();
        sessions.open(current, &config(0, 16));
        assert_eq!(sessions.len(), 1);
    }

    #[test]
    fn full_map_drops_least_recent_session() {
        let sessions = Sessions::default();
        let config = config(60, 2);
        let (first, second, third) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());

        let original = sessions.open(first, &config);
        std::thread::sleep(Duration::from_millis(2));
        let kept = sessions.open(second, &config);
        std::thread::sleep(Duration::from_millis(2));
        sessions.open(third, &config);
        assert_eq!(sessions.len(), 2);

        // Known sessions never evict anything.
        assert!(Arc::ptr_eq(&kept, &sessions.open(second, &config)));
        assert_eq!(sessions.len(), 2);

        // The first session is gone: reopening it starts from scratch.
        std::thread::sleep(Duration::from_millis(2));
        assert!(!Arc::ptr_eq(&original, &sessions.open(first, &config)));
        assert_eq!(sessions.len(), 2);
    }

    #[rocket::async_test]
    async fn owned_lock_waits_for_other_requests() {
        let session = ActiveSession(SharedSession::default());
        let shared = Arc::clone(&session.0);

        let guard = session.lock_owned().await;
        assert!(shared.try_lock().is_err());
        drop(guard);
        assert!(shared.try_lock().is_ok());
    }

    fn device_at(session: &Session, index: usize) -> Device {
        session.devices()[index].clone()
    }
}
