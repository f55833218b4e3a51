//! Session configuration.

/// Lifetime applied when the environment does not override it:
/// 720 hours (30 days).
const DEFAULT_LIFETIME_HOURS: i64 = 720;

/// Configuration for the session lifecycle service.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Session lifetime in hours. Also drives the cookie Max-Age.
    pub lifetime_hours: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            lifetime_hours: DEFAULT_LIFETIME_HOURS,
        }
    }
}

impl SessionConfig {
    /// Read the lifetime from `FORGEMART_SESSION_LIFETIME_HOURS`.
    /// Absent, unparsable, or non-positive values fall back to the
    /// default.
    pub fn from_env() -> Self {
        Self {
            lifetime_hours: parse_lifetime(
                std::env::var("FORGEMART_SESSION_LIFETIME_HOURS").ok(),
            ),
        }
    }

    /// Cookie Max-Age matching the configured lifetime.
    pub fn lifetime_secs(&self) -> i64 {
        self.lifetime_hours * 3600
    }
}

fn parse_lifetime(raw: Option<String>) -> i64 {
    raw.and_then(|v| v.parse::<i64>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(DEFAULT_LIFETIME_HOURS)
}
