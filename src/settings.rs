use crate::dashboard::Timings;
use std::{env, path::PathBuf, time::Duration};
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub port: u16,
    pub data_path: PathBuf,
    pub static_dir: PathBuf,
    pub timings: Timings,
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Timings::default();
        Self {
            port: parsed(&lookup, "PORT").unwrap_or(8080),
            data_path: lookup("GYMTRACK_DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data/finance.json")),
            static_dir: lookup("GYMTRACK_STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("static")),
            timings: Timings {
                settle: parsed(&lookup, "GYMTRACK_SETTLE_MS")
                    .map(Duration::from_millis)
                    .unwrap_or(defaults.settle),
                anchor_retry: parsed(&lookup, "GYMTRACK_ANCHOR_RETRY_MS")
                    .map(Duration::from_millis)
                    .unwrap_or(defaults.anchor_retry),
            },
        }
    }
}

fn parsed<T: std::str::FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let value = lookup(key)?;
    match value.trim().parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            warn!(key, value = %value, "ignoring invalid setting");
            None
        }
    }
}
