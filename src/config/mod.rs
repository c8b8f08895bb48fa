//! Configuration module

use std::time::Duration;

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub phone_system: PhoneSystemConfig,
}

/// Local API the automation host talks to
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Remote telephony service
#[derive(Debug, Clone, Deserialize)]
pub struct PhoneSystemConfig {
    #[serde(default = "default_phone_host")]
    pub host: String,
    #[serde(default = "default_phone_port")]
    pub port: u16,
    #[serde(default = "default_scan_interval")]
    pub scan_interval_secs: u64,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_history_limit")]
    pub history_limit: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for PhoneSystemConfig {
    fn default() -> Self {
        Self {
            host: default_phone_host(),
            port: default_phone_port(),
            scan_interval_secs: default_scan_interval(),
            timeout_secs: default_timeout(),
            history_limit: default_history_limit(),
        }
    }
}

impl PhoneSystemConfig {
    pub fn scan_interval(&self) -> Duration {
        Duration::from_secs(self.scan_interval_secs.max(1))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    /// Identifies this remote instance (`host:port`)
    pub fn instance_id(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8082
}

fn default_phone_host() -> String {
    "homeassistant.local".to_string()
}

fn default_phone_port() -> u16 {
    8088
}

fn default_scan_interval() -> u64 {
    30
}

fn default_timeout() -> u64 {
    10
}

fn default_history_limit() -> u32 {
    10
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::Environment::with_prefix("PHONEBRIDGE").separator("__"))
            .build()?;

        let config: Config = settings.try_deserialize().unwrap_or_else(|e| {
            tracing::warn!("Invalid configuration, falling back to defaults: {}", e);
            Config::default()
        });

        Ok(config)
    }
}
