use std::time::Duration;

use serde::Deserialize;

// Default fake latency of each pairing phase, in milliseconds.
const DEFAULT_PAIRING_PHASE_DELAY_MS: u64 = 800;
// Default idle time after which a session is dropped, in seconds.
const DEFAULT_SESSION_IDLE_SECS: u64 = 3600;
// Default number of sessions kept at once.
const DEFAULT_MAX_SESSIONS: usize = 1024;

// Dashboard settings read from the Rocket figment.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub(crate) struct DashboardConfig {
    pub(crate) pairing_phase_delay_ms: u64,
    pub(crate) session_idle_secs: u64,
    pub(crate) max_sessions: usize,
}

impl DashboardConfig {
    pub(crate) fn pairing_phase_delay(&self) -> Duration {
        Duration::from_millis(self.pairing_phase_delay_ms)
    }

    pub(crate) fn session_idle(&self) -> Duration {
        Duration::from_secs(self.session_idle_secs)
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            pairing_phase_delay_ms: DEFAULT_PAIRING_PHASE_DELAY_MS,
            session_idle_secs: DEFAULT_SESSION_IDLE_SECS,
            max_sessions: DEFAULT_MAX_SESSIONS,
        }
    }
}

#[cfg(test)]
mod tests {
    use rocket::figment::Figment;

    use super::*;

    #[test]
    fn missing_keys_use_defaults() {
        let config: DashboardConfig = Figment::new().extract().unwrap();
        assert_eq!(config.pairing_phase_delay(), Duration::from_millis(800));
        assert_eq!(config.session_idle(), Duration::from_secs(3600));
        assert_eq!(config.max_sessions, 1024);
    }

    #[test]
    fn keys_override_defaults() {
        let config: DashboardConfig = Figment::new()
            .merge(("pairing_phase_delay_ms", 0))
            .merge(("session_idle_secs", 60))
            .merge(("max_sessions", 8))
            .extract()
            .unwrap();
        assert_eq!(config.pairing_phase_delay(), Duration::ZERO);
        assert_eq!(config.session_idle(), Duration::from_secs(60));
        assert_eq!(config.max_sessions, 8);
    }
}
