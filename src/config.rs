use config::{Environment, File};
use log::warn;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestConfig {
    pub host: String,
    pub port: u16,
}

/// Raw SMTP section as read from file/environment. Individual credentials
/// may be absent; `relay()` decides whether sending is possible at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    pub server: Option<String>,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub use_tls: bool,
}

/// Fully-specified relay settings, available only when server, username and
/// password were all configured. Built once at startup and handed to the
/// delivery component; never re-read from the environment afterwards.
#[derive(Debug, Clone)]
pub struct RelaySettings {
    pub server: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub use_tls: bool,
}

impl SmtpConfig {
    /// Returns the complete relay settings, or `None` when any of the
    /// required fields is missing. Health endpoints stay up either way.
    pub fn relay(&self) -> Option<RelaySettings> {
        match (&self.server, &self.username, &self.password) {
            (Some(server), Some(username), Some(password)) => Some(RelaySettings {
                server: server.clone(),
                port: self.port,
                username: username.clone(),
                password: password.clone(),
                use_tls: self.use_tls,
            }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub log: LogConfig,
    pub rest: RestConfig,
    pub smtp: SmtpConfig,
}

impl Settings {
    pub fn new(config_path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut config_builder = config::Config::builder()
            // REST defaults
            .set_default("rest.host", "0.0.0.0")?
            .set_default("rest.port", 8000)?
            // SMTP defaults
            .set_default("smtp.port", 587)?
            .set_default("smtp.use_tls", true)?
            // Log defaults
            .set_default("log.level", "info")?;

        // Add configuration from file
        if let Some(path) = config_path {
            config_builder = config_builder.add_source(File::with_name(path));
        }

        // Add environment variables with prefix
        // e.g. `RUSTYSEND_SMTP_SERVER=...` would override `smtp.server`
        config_builder = config_builder.add_source(
            Environment::with_prefix("RUSTYSEND")
                .separator("_")
                .ignore_empty(true),
        );

        // Add direct environment variables for important settings
        // e.g. `SMTP_SERVER=...` would override `smtp.server`
        let env_vars = [
            ("SMTP_SERVER", "smtp.server"),
            ("SMTP_PORT", "smtp.port"),
            ("SMTP_USERNAME", "smtp.username"),
            ("SMTP_PASSWORD", "smtp.password"),
            ("SMTP_USE_TLS", "smtp.use_tls"),
            ("REST_HOST", "rest.host"),
            ("REST_PORT", "rest.port"),
            ("LOG_LEVEL", "log.level"),
        ];

        for (env_var, config_path) in &env_vars {
            if let Ok(value) = env::var(env_var) {
                // Handle special case for port which needs to be parsed to integer
                if *env_var == "SMTP_PORT" || *env_var == "REST_PORT" {
                    if let Ok(port) = value.parse::<u16>() {
                        config_builder = config_builder.set_override(config_path, port)?;
                    } else {
                        warn!("Invalid port value in {}: {}", env_var, value);
                    }
                } else if *env_var == "SMTP_USE_TLS" {
                    // Same permissive parse the original service used: anything
                    // other than a case-insensitive "true" disables TLS.
                    config_builder = config_builder
                        .set_override(config_path, value.eq_ignore_ascii_case("true"))?;
                } else {
                    config_builder = config_builder.set_override(config_path, value)?;
                }
            }
        }

        // Build the config and deserialize it into Settings
        config_builder.build()?.try_deserialize()
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            level: "info".to_string(),
        }
    }
}

impl Default for RestConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            server: None,
            port: 587,
            username: None,
            password: None,
            use_tls: true,
        }
    }
}
