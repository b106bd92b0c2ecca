use rust_decimal::Decimal;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub application: ApplicationSettings,
    pub limits: LimitSettings,
}

#[derive(Debug, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub pool_size: u32,
}

#[derive(Debug, Deserialize)]
pub struct ApplicationSettings {
    pub port: u16,
    pub log_level: String,
}

/// Process-wide amount limits, fixed at startup.
///
/// `ValidationRules` receives a copy at construction; nothing reads these
/// from global state afterwards.
#[derive(Debug, Clone, Deserialize)]
pub struct LimitSettings {
    pub minimum_deposit_amount: Decimal,
    pub minimum_withdrawal_amount: Decimal,
    pub minimum_transfer_amount: Decimal,
}

impl Settings {
    pub fn new() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"));

        builder.build()?.try_deserialize()
    }
}
