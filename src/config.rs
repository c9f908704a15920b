use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;
use crate::error::{AppError, Result};

const DEFAULT_PROXY_URL: &str = "https://api.allorigins.win/get";
const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: SocketAddr,
    /// Optional at startup; a missing key is reported when a generation is attempted.
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub proxy_url: String,
    pub fetch_timeout: Duration,
    pub generate_timeout: Duration,
    pub temperature: f32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            gemini_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            proxy_url: DEFAULT_PROXY_URL.to_string(),
            fetch_timeout: Duration::from_secs(15),
            generate_timeout: Duration::from_secs(25),
            temperature: 0.75,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load environment variables from .env file if it exists
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup so it can be tested
    /// without touching the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = lookup("PORT").unwrap_or_else(|| "3000".to_string());
        let port = port.parse::<u16>().map_err(|e| AppError::ConfigError(format!("Invalid port: {}", e)))?;
        let ip = IpAddr::from_str(&host).map_err(|e| AppError::ConfigError(format!("Invalid host address: {}", e)))?;

        let gemini_api_key = lookup("GEMINI_API_KEY")
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());

        let fetch_timeout = match lookup("FETCH_TIMEOUT_SECS") {
            Some(raw) => parse_secs("FETCH_TIMEOUT_SECS", &raw)?,
            None => defaults.fetch_timeout,
        };
        let generate_timeout = match lookup("GENERATE_TIMEOUT_SECS") {
            Some(raw) => parse_secs("GENERATE_TIMEOUT_SECS", &raw)?,
            None => defaults.generate_timeout,
        };

        let temperature = match lookup("GENERATION_TEMPERATURE") {
            Some(raw) => raw
                .parse::<f32>()
                .ok()
                .filter(|t| (0.0..=2.0).contains(t))
                .ok_or_else(|| AppError::ConfigError(format!("Invalid GENERATION_TEMPERATURE: {}", raw)))?,
            None => defaults.temperature,
        };

        Ok(Config {
            server_addr: SocketAddr::new(ip, port),
            gemini_api_key,
            gemini_model: lookup("GEMINI_MODEL").unwrap_or(defaults.gemini_model),
            gemini_base_url: lookup("GEMINI_BASE_URL").unwrap_or(defaults.gemini_base_url),
            proxy_url: lookup("PROXY_URL").unwrap_or(defaults.proxy_url),
            fetch_timeout,
            generate_timeout,
            temperature,
        })
    }
}

fn parse_secs(key: &str, raw: &str) -> Result<Duration> {
    match raw.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(AppError::ConfigError(format!("Invalid {}: {}", key, raw))),
    }
}
