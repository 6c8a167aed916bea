use std::{env, fmt::Display, str::FromStr};

use log::{info, warn};

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    pub port: u16,
    pub max_connections: u32,
}

impl Config {
    pub fn load() -> Self {
        Self {
            database_url: try_load("DATABASE_URL", "sqlite://acme_ledger.db?mode=rwc".to_string()),
            bind_addr: try_load("BIND_ADDR", "0.0.0.0".to_string()),
            port: try_load("PORT", 8080),
            max_connections: try_load("DB_MAX_CONNECTIONS", 10),
        }
    }
}

fn try_load<T>(key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    let Ok(raw) = env::var(key) else {
        info!("{key} not set, using default: {default}");
        return default;
    };

    raw.parse().unwrap_or_else(|e| {
        warn!("Invalid {key} value {raw:?}: {e}, using default: {default}");
        default
    })
}
