use std::time::Duration;

use config::{Config as ConfigLoader, Environment};
use is_terminal::IsTerminal;
use once_cell::sync::Lazy;
use serde::Deserialize;

const PREFIX: &str = "ABUSE_REPORT";

pub static CONFIG: Lazy<Config> = Lazy::new(|| init_config());

#[derive(Debug, Default)]
pub enum LogStyle {
    #[default]
    Auto,
    Always,
    Never,
}

impl LogStyle {
    pub fn is_color(&self) -> bool {
        match self {
            LogStyle::Auto => std::io::stdout().is_terminal(),
            LogStyle::Always => true,
            LogStyle::Never => false,
        }
    }
}

impl<'de> Deserialize<'de> for LogStyle {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?.to_lowercase();
        match s.as_str() {
            "auto" => Ok(LogStyle::Auto),
            "always" => Ok(LogStyle::Always),
            "never" => Ok(LogStyle::Never),
            _ => Err(serde::de::Error::unknown_variant(
                &s,
                &["auto", "always", "never"],
            )),
        }
    }
}

#[derive(Deserialize, Debug)]
#[serde(default)]
pub struct Log {
    pub level: String,
    pub style: LogStyle,
}

impl Default for Log {
    fn default() -> Self {
        Log {
            level: Self::level(),
            style: LogStyle::default(),
        }
    }
}

impl Log {
    fn level() -> String {
        String::from("abuse_report=info")
    }
}

/// Settings for the AbuseIPDB client. The API key is not part of this; it is
/// always asked for interactively.
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Api {
    pub base_url: String,
    pub max_age_in_days: u32,
    pub connect_timeout_secs: u64,
    pub timeout_secs: Option<u64>,
}

impl Default for Api {
    fn default() -> Self {
        Self {
            base_url: Self::base_url(),
            max_age_in_days: 90,
            connect_timeout_secs: 5,
            timeout_secs: None,
        }
    }
}

impl Api {
    fn base_url() -> String {
        String::from("https://api.abuseipdb.com/api/v2")
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Overall request deadline. Unset by default, so a request waits for
    /// the server as long as the connection stays up.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.trim().is_empty() {
            return Err("api base url must be set".into());
        }
        if !(1..=365).contains(&self.max_age_in_days) {
            return Err("api max age in days must be between 1 and 365".into());
        }
        if self.connect_timeout_secs == 0 {
            return Err("api connect timeout must be greater than zero".into());
        }
        if self.timeout_secs == Some(0) {
            return Err("api timeout must be greater than zero".into());
        }
        Ok(())
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct Config {
    pub log: Log,
    pub api: Api,
}

pub fn init_config() -> Config {
    let config = ConfigLoader::builder()
        .add_source(
            Environment::with_prefix(PREFIX)
                .separator("_")
                .try_parsing(true),
        )
        .add_source(
            Environment::with_prefix(PREFIX)
                .separator("__")
                .prefix_separator("_")
                .try_parsing(true),
        )
        .build()
        .and_then(|cfg| cfg.try_deserialize::<Config>());

    match config {
        Ok(config) => {
            if let Err(err) = config.api.validate() {
                panic!("{}", err);
            }
            config
        }
        Err(err) => {
            panic!("{:?}", err);
        }
    }
}
