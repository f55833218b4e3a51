//! Server configuration sourced from the environment.

use forgemart_auth::SessionConfig;

const DEFAULT_BIND: &str = "0.0.0.0:8080";
const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 3600;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen address.
    pub bind: String,
    /// Send the `Secure` cookie attribute. Enabled when
    /// `FORGEMART_ENV=production`.
    pub cookie_secure: bool,
    /// How often the expired-session sweep runs.
    pub sweep_interval_secs: u64,
    pub session: SessionConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.into(),
            cookie_secure: false,
            sweep_interval_secs: DEFAULT_SWEEP_INTERVAL_SECS,
            session: SessionConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Build a configuration from the environment, keeping defaults
    /// for anything unset or unparsable.
    pub fn from_env() -> Self {
        Self {
            bind: std::env::var("FORGEMART_BIND").unwrap_or_else(|_| DEFAULT_BIND.into()),
            cookie_secure: std::env::var("FORGEMART_ENV")
                .is_ok_and(|env| env.eq_ignore_ascii_case("production")),
            sweep_interval_secs: std::env::var("FORGEMART_SWEEP_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|v| *v > 0)
                .unwrap_or(DEFAULT_SWEEP_INTERVAL_SECS),
            session: SessionConfig::from_env(),
        }
    }
}
