use crate::error::{Error, Result};
use crate::filters::DEFAULT_PAGE_LIMIT;
use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Runtime settings, read from the environment (and `.env` when present)
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub timeout: Duration,
    pub page_limit: u32,
    pub featured_limit: u32,
    pub whatsapp_number: String,
    pub session_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:5000/api".to_string(),
            timeout: Duration::from_secs(30),
            page_limit: DEFAULT_PAGE_LIMIT,
            featured_limit: 6,
            whatsapp_number: "2348000000000".to_string(),
            session_file: PathBuf::from(".urban360-session.json"),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        if dotenv::dotenv().is_ok() {
            debug!("Loaded environment variables from .env file");
        }

        let defaults = Self::default();
        let timeout_secs: u64 = try_load("URBAN_TIMEOUT_SECS", defaults.timeout.as_secs())?;

        let config = Self {
            api_url: try_load("URBAN_API_URL", defaults.api_url)?,
            timeout: Duration::from_secs(timeout_secs),
            page_limit: try_load("URBAN_PAGE_LIMIT", defaults.page_limit)?,
            featured_limit: try_load("URBAN_FEATURED_LIMIT", defaults.featured_limit)?,
            whatsapp_number: try_load("URBAN_WHATSAPP_NUMBER", defaults.whatsapp_number)?,
            session_file: PathBuf::from(try_load(
                "URBAN_SESSION_FILE",
                defaults.session_file.display().to_string(),
            )?),
        };

        if config.page_limit == 0 {
            return Err(Error::Config("URBAN_PAGE_LIMIT must be positive".into()));
        }

        Ok(config)
    }
}

fn try_load<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr + Display,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|e| {
            warn!("Invalid {key} value: {e}");
            Error::Config(format!("invalid {key}: {e}"))
        }),
        Err(_) => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}
