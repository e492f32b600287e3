use std::net::IpAddr;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub host: IpAddr,
    pub port: u16,
    pub registration: RegistrationMode,
    /// Sets the `Secure` attribute on session cookies. Turn off for plain-HTTP local runs.
    pub secure_cookies: bool,
    pub log_level: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RegistrationMode {
    Open,
    Closed,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let database_url = env_required("DATABASE_URL")?;
        let jwt_secret = env_required("JWT_SECRET")?;

        let host: IpAddr = env_or("PROJECTBOARD_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid PROJECTBOARD_HOST: {e}"))?;

        let port: u16 = env_or("PROJECTBOARD_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid PROJECTBOARD_PORT: {e}"))?;

        let registration = parse_registration(&env_or("PROJECTBOARD_REGISTRATION", "open"));

        let secure_cookies = parse_bool(&env_or("PROJECTBOARD_SECURE_COOKIES", "true"))
            .ok_or_else(|| "Invalid PROJECTBOARD_SECURE_COOKIES: expected true or false".to_string())?;

        let log_level = env_or("PROJECTBOARD_LOG_LEVEL", "info");

        Ok(Config {
            database_url,
            jwt_secret,
            host,
            port,
            registration,
            secure_cookies,
            log_level,
        })
    }
}

fn parse_registration(value: &str) -> RegistrationMode {
    match value {
        "closed" => RegistrationMode::Closed,
        _ => RegistrationMode::Open,
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn env_required(key: &str) -> Result<String, String> {
    std::env::var(key).map_err(|_| format!("Missing required environment variable: {key}"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
