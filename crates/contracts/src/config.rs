//! Driver configuration shared by the CLI and the HTTP surface.

use serde::{Deserialize, Serialize};

pub const DEFAULT_SCENARIOS_PATH: &str = "data/scenarios.json";
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 100;
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

pub const ENV_SCENARIOS_PATH: &str = "DILEMMA_SCENARIOS_PATH";
pub const ENV_TICK_MS: &str = "DILEMMA_TICK_MS";
pub const ENV_BIND_ADDR: &str = "DILEMMA_BIND_ADDR";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunConfig {
    pub scenarios_path: String,
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

fn default_tick_interval_ms() -> u64 {
    DEFAULT_TICK_INTERVAL_MS
}

fn default_bind_addr() -> String {
    DEFAULT_BIND_ADDR.to_string()
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            scenarios_path: DEFAULT_SCENARIOS_PATH.to_string(),
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
        }
    }
}

impl RunConfig {
    /// Defaults overlaid with any non-blank `DILEMMA_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`RunConfig::from_env`] with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let mut config = Self::default();
        if let Some(path) = read(ENV_SCENARIOS_PATH) {
            config.scenarios_path = path;
        }
        if let Some(tick) = read(ENV_TICK_MS).and_then(|raw| raw.trim().parse::<u64>().ok()) {
            config.tick_interval_ms = tick.max(1);
        }
        if let Some(addr) = read(ENV_BIND_ADDR) {
            config.bind_addr = addr;
        }
        config
    }
}
