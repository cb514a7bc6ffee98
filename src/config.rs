use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    pub filter: String,
    pub json: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub store_path: PathBuf,
    pub log: LogConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let store_path = std::env::var("MEALS_STORE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data/meals.json"));
        anyhow::ensure!(
            !store_path.as_os_str().is_empty(),
            "MEALS_STORE_PATH must not be empty"
        );
        let log = LogConfig {
            filter: std::env::var("RUST_LOG").unwrap_or_else(|_| "meallist=debug".into()),
            json: std::env::var("LOG_FORMAT")
                .map(|v| v == "json")
                .unwrap_or(false),
        };
        Ok(Self { store_path, log })
    }
}
