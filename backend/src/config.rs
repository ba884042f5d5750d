use std::fmt;
use std::net::{IpAddr, SocketAddr};

const DEFAULT_API_HOST: &str = "0.0.0.0";
const DEFAULT_API_PORT: u16 = 8080;
const DEFAULT_INIT_DATA_MAX_AGE_SECONDS: i64 = 86400;
const DEFAULT_TELEGRAM_API_BASE: &str = "https://api.telegram.org";
const DEFAULT_MINI_APP_BUTTON: &str = "Open the gift roulette";

#[derive(Debug, Clone)]
pub struct Config {
    pub bot_token: String,
    pub api_host: String,
    pub api_port: u16,
    pub init_data_max_age_seconds: i64,
    pub cors_allow_origin: Option<String>,
    pub telegram_api_base: String,
    pub mini_app_url: Option<String>,
    pub mini_app_button: String,
    /// Expected `X-Telegram-Bot-Api-Secret-Token` on webhook calls
    pub webhook_secret: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str, String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing(name) => write!(f, "{} is not set. Add it to .env or the environment", name),
            Self::Invalid(name, value) => write!(f, "{} has an invalid value `{}`", name, value),
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bot_token = var("BOT_TOKEN").ok_or(ConfigError::Missing("BOT_TOKEN"))?;

        let api_port = match var("API_PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid("API_PORT", raw))?,
            None => DEFAULT_API_PORT,
        };

        let init_data_max_age_seconds = match var("INIT_DATA_MAX_AGE_SECONDS") {
            Some(raw) => raw
                .parse()
                .map_err(|_| ConfigError::Invalid("INIT_DATA_MAX_AGE_SECONDS", raw))?,
            None => DEFAULT_INIT_DATA_MAX_AGE_SECONDS,
        };

        Ok(Self {
            bot_token,
            api_host: var("API_HOST").unwrap_or_else(|| DEFAULT_API_HOST.to_string()),
            api_port,
            init_data_max_age_seconds,
            cors_allow_origin: var("CORS_ALLOW_ORIGIN"),
            telegram_api_base: var("TELEGRAM_API_BASE")
                .unwrap_or_else(|| DEFAULT_TELEGRAM_API_BASE.to_string())
                .trim_end_matches('/')
                .to_string(),
            mini_app_url: var("MINI_APP_URL").or_else(|| var("WEB_APP_URL")),
            mini_app_button: var("MINI_APP_BUTTON").unwrap_or_else(|| DEFAULT_MINI_APP_BUTTON.to_string()),
            webhook_secret: var("WEBHOOK_SECRET"),
        })
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self
            .api_host
            .parse()
            .map_err(|_| ConfigError::Invalid("API_HOST", self.api_host.clone()))?;
        Ok(SocketAddr::new(ip, self.api_port))
    }

    /// First origin of the comma separated `CORS_ALLOW_ORIGIN`, if any.
    pub fn cors_origin(&self) -> Option<&str> {
        self.cors_allow_origin
            .as_deref()?
            .split(',')
            .map(str::trim)
            .find(|origin| !origin.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[("BOT_TOKEN", "123:abc")]).unwrap();
        assert_eq!(config.api_port, 8080);
        assert_eq!(config.init_data_max_age_seconds, 86400);
        assert_eq!(config.telegram_api_base, "https://api.telegram.org");
        assert_eq!(config.socket_addr().unwrap().to_string(), "0.0.0.0:8080");
        assert_eq!(config.cors_origin(), None);
    }

    #[test]
    fn test_bot_token_required() {
        assert_eq!(config(&[]).unwrap_err(), ConfigError::Missing("BOT_TOKEN"));
        assert_eq!(config(&[("BOT_TOKEN", "  ")]).unwrap_err(), ConfigError::Missing("BOT_TOKEN"));
    }

    #[test]
    fn test_cors_takes_first_origin() {
        let config = config(&[("BOT_TOKEN", "t"), ("CORS_ALLOW_ORIGIN", " , https://a.example, https://b.example")]).unwrap();
        assert_eq!(config.cors_origin(), Some("https://a.example"));
    }

    #[test]
    fn test_bad_port() {
        let err = config(&[("BOT_TOKEN", "t"), ("API_PORT", "eighty")]).unwrap_err();
        assert_eq!(err, ConfigError::Invalid("API_PORT", "eighty".into()));
    }
}
