// config.rs - Bot configuration
// Reads botconfig.txt (KEY=VALUE lines, '#' comments) from the first of
// several locations that exists.
//
//   SLACK_TOKEN=xoxb-...          required
//   CHANNEL=votes                 required, name of the vote channel
//   SLACK_API_BASE_URL=...        optional, default https://slack.com/api
//   SLACK_TIMEOUT=30              optional, seconds
//   COMMANDS_FILE=commands.json   optional

use crate::error::ConfigError;
use log::{debug, info};
use std::collections::HashMap;
use std::fs;

pub const CONFIG_PATHS: [&str; 4] = [
    "botconfig.txt",
    "../botconfig.txt",
    "../../botconfig.txt",
    "src/botconfig.txt",
];

pub const DEFAULT_API_BASE_URL: &str = "https://slack.com/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_COMMANDS_FILE: &str = "commands.json";

const TOKEN_PLACEHOLDER: &str = "YOUR_SLACK_TOKEN_HERE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlackConfig {
    pub token: String,
    /// Name (not id) of the channel votes happen in.
    pub channel: String,
    pub api_base_url: String,
    pub timeout: u64,
    pub commands_file: String,
}

impl SlackConfig {
    pub fn from_map(config: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let required = |key: &str| -> Result<String, ConfigError> {
            config
                .get(key)
                .filter(|value| !value.is_empty())
                .cloned()
                .ok_or_else(|| ConfigError::MissingKey(key.to_string()))
        };

        let token = required("SLACK_TOKEN")?;
        if token == TOKEN_PLACEHOLDER {
            return Err(ConfigError::Placeholder("SLACK_TOKEN".to_string()));
        }
        let channel = required("CHANNEL")?;

        let timeout = match config.get("SLACK_TIMEOUT") {
            Some(value) => value.parse().map_err(|_| ConfigError::InvalidValue {
                key: "SLACK_TIMEOUT".to_string(),
                value: value.clone(),
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let api_base_url = config
            .get("SLACK_API_BASE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

        let commands_file = config
            .get("COMMANDS_FILE")
            .cloned()
            .unwrap_or_else(|| DEFAULT_COMMANDS_FILE.to_string());

        Ok(Self {
            token,
            channel: channel.trim_start_matches('#').to_string(),
            api_base_url,
            timeout,
            commands_file,
        })
    }
}

/// Parse KEY=VALUE lines. Blank lines, `#` comments and lines without
/// `=` are skipped; a later duplicate key wins.
pub fn parse_config(content: &str) -> HashMap<String, String> {
    // Remove BOM if present
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut config = HashMap::new();

    for line in content.lines() {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(equals_pos) = line.find('=') {
            let key = line[..equals_pos].trim().to_string();
            let value = line[equals_pos + 1..].trim().to_string();
            config.insert(key, value);
        }
    }

    config
}

/// Load the config from the first of `CONFIG_PATHS` that can be read
pub fn load_slack_config() -> Result<SlackConfig, ConfigError> {
    load_slack_config_from(&CONFIG_PATHS)
}

pub fn load_slack_config_from(paths: &[&str]) -> Result<SlackConfig, ConfigError> {
    for config_path in paths {
        match fs::read_to_string(config_path) {
            Ok(content) => {
                info!("✅ Configuration loaded from {}", config_path);
                return SlackConfig::from_map(&parse_config(&content));
            }
            Err(e) => {
                debug!("Config not readable at {}: {}", config_path, e);
                continue;
            }
        }
    }

    Err(ConfigError::NotFound(paths.join(", ")))
}
