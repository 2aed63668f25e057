//! Runtime configuration.
//!
//! There is no configuration file. The only setting is the listen address,
//! which defaults to port 3000 on all interfaces and can be overridden with
//! the `ITEMS_API_ADDR` environment variable.

use std::env;

/// Environment variable overriding the listen address.
pub const ADDR_VAR: &str = "ITEMS_API_ADDR";

/// Listen address used when [`ADDR_VAR`] is unset or empty.
pub const DEFAULT_ADDR: &str = "0.0.0.0:3000";

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    pub addr: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_addr(env::var(ADDR_VAR).ok())
    }

    fn from_addr(addr: Option<String>) -> Self {
        let addr = addr
            .map(|a| a.trim().to_owned())
            .filter(|a| !a.is_empty())
            .unwrap_or_else(|| DEFAULT_ADDR.to_owned());
        Self { addr }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self { addr: DEFAULT_ADDR.to_owned() }
    }
}
