use seatlock_core::ReservationRules;
use serde::Deserialize;
use std::env;

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub reservation: ReservationRules,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .set_default("server.port", i64::from(DEFAULT_PORT))?
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // e.g. SEATLOCK__RESERVATION__LOCK_DURATION_MS=5000
            .add_source(config::Environment::with_prefix("SEATLOCK").separator("__"))
            .set_override_option("server.port", env::var("PORT").ok())?
            .build()?;

        s.try_deserialize()
    }
}
