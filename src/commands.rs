// commands.rs - Command registry
// Maps command names (e.g. `$rename`) to their metadata. A command is
// voteable when its entry carries a `key` field; only voteable commands are
// recognised as command arguments by the classifier.
//
// Used by: args.rs (classification), main.rs (loaded from COMMANDS_FILE)

use crate::error::ConfigError;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Metadata for one registered command, kept as the raw JSON object so any
/// field the application defines survives loading
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct CommandInfo {
    fields: Map<String, Value>,
}

impl CommandInfo {
    pub fn voteable(key: &str) -> Self {
        let mut info = Self::default();
        info.fields.insert("key".to_string(), Value::from(key));
        info
    }

    pub fn with_help(mut self, help: &str) -> Self {
        self.fields.insert("help".to_string(), Value::from(help));
        self
    }

    /// Only presence matters; `"key": null` still makes a command voteable.
    pub fn has_key(&self) -> bool {
        self.fields.contains_key("key")
    }

    pub fn key(&self) -> Option<&Value> {
        self.fields.get("key")
    }

    pub fn help(&self) -> Option<&str> {
        self.fields.get("help").and_then(Value::as_str)
    }
}

/// Read-only lookup table of the application's commands
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct CommandRegistry {
    commands: HashMap<String, CommandInfo>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, info: CommandInfo) {
        self.commands.insert(name.into(), info);
    }

    pub fn get(&self, name: &str) -> Option<&CommandInfo> {
        self.commands.get(name)
    }

    /// True when `name` is registered and its entry has a `key`.
    pub fn is_voteable(&self, name: &str) -> bool {
        self.commands
            .get(name)
            .is_some_and(CommandInfo::has_key)
    }

    /// Names of all voteable commands, sorted
    pub fn voteable(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .commands
            .iter()
            .filter(|(_, info)| info.has_key())
            .map(|(name, _)| name.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Parse a registry from JSON of the form
    /// `{"$rename": {"key": "name", "help": "..."}}`
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        // Remove BOM if present
        let content = content.strip_prefix('\u{feff}').unwrap_or(&content);
        Self::from_json(content)
    }
}
