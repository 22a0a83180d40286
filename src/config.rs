use std::path::PathBuf;
use std::fs;
use log::warn;
use serde::{Deserialize, Serialize};

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8080/pings";
pub const DEFAULT_INTERVAL_MS: u64 = 30_000;

#[derive(Debug, Serialize, Deserialize)]
pub struct AppConfig {
    pub endpoint: String,
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

fn default_interval_ms() -> u64 {
    DEFAULT_INTERVAL_MS
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            interval_ms: DEFAULT_INTERVAL_MS,
        }
    }
}

impl AppConfig {
    pub fn get_config_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
        let config_dir = dirs::config_dir()
            .ok_or("Could not find config directory")?
            .join("PingDashboard");

        fs::create_dir_all(&config_dir)?;
        Ok(config_dir.join("config.json"))
    }

    pub fn load() -> Self {
        Self::get_config_path()
            .ok()
            .and_then(|path| {
                if path.exists() {
                    fs::read_to_string(&path)
                        .ok()
                        .and_then(|content| serde_json::from_str::<AppConfig>(&content).ok())
                } else {
                    None
                }
            })
            .unwrap_or_default()
    }

    pub fn save(&self) {
        let result = Self::get_config_path().and_then(|path| {
            let content = serde_json::to_string_pretty(self)?;
            fs::write(&path, content)?;
            Ok(())
        });
        if let Err(e) = result {
            warn!("failed to save config: {e}");
        }
    }
}
