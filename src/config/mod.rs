use std::env;
use std::time::Duration;

/// Config holds all application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: String,
    pub frontend_dir: String,
    pub reminder_delay_ms: u64,
    pub seed_sample_tenants: bool,
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn load() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        Self {
            listen_addr: get("LISTEN_ADDR", "0.0.0.0:8080"),
            frontend_dir: get("FRONTEND_DIR", "/app/frontend"),
            reminder_delay_ms: get("REMINDER_DELAY_MS", "1000").trim().parse().unwrap_or(1000),
            seed_sample_tenants: parse_bool(&get("SEED_SAMPLE_TENANTS", "true")).unwrap_or(true),
        }
    }

    pub fn reminder_delay(&self) -> Duration {
        Duration::from_millis(self.reminder_delay_ms)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
