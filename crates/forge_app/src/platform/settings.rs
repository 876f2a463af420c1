use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use forge_engine::{write_atomically, GenerationSettings, DEFAULT_BASE_URL, DEFAULT_MODEL};
use forge_logging::{forge_info, forge_warn};
use serde::{Deserialize, Serialize};

use super::cli::Args;
use super::logging::LogDestination;

const API_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub model: String,
    pub api_base_url: String,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub google_search: bool,
    pub history_file: PathBuf,
    pub log_destination: LogDestination,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout_secs: 10,
            request_timeout_secs: 120,
            google_search: true,
            history_file: PathBuf::from(".xpath_forge_history.json"),
            log_destination: LogDestination::File,
        }
    }
}

impl Settings {
    /// Reads settings from `path`; any problem falls back to defaults.
    pub fn load(path: &Path) -> Self {
        let content = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Self::default();
            }
            Err(err) => {
                forge_warn!("Failed to read settings from {:?}: {}", path, err);
                return Self::default();
            }
        };

        match ron::from_str(&content) {
            Ok(settings) => {
                forge_info!("Loaded settings from {:?}", path);
                settings
            }
            Err(err) => {
                forge_warn!("Failed to parse settings from {:?}: {}", path, err);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let pretty = ron::ser::PrettyConfig::new();
        let content = ron::ser::to_string_pretty(self, pretty)?;
        write_atomically(path, &content)?;
        Ok(())
    }

    /// Command-line flags win over file values.
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(history_file) = &args.history_file {
            self.history_file = history_file.clone();
        }
        if let Some(model) = &args.model {
            self.model = model.clone();
        }
        if args.no_search {
            self.google_search = false;
        }
        if let Some(destination) = args.log {
            self.log_destination = destination;
        }
    }

    pub fn generation_settings(&self, api_key: Option<String>) -> GenerationSettings {
        GenerationSettings {
            base_url: self.api_base_url.clone(),
            model: self.model.clone(),
            api_key,
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            google_search: self.google_search,
        }
    }
}

/// First non-blank API key found in the environment.
pub fn api_key_from_env() -> Option<String> {
    api_key_from(|name| std::env::var(name).ok())
}

fn api_key_from(lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
    API_KEY_VARS
        .iter()
        .filter_map(|name| lookup(name))
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let settings = Settings::load(&temp.path().join("absent.ron"));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("xpath_forge.ron");
        fs::write(&path, "(model: \"gemini-2.5-flash\", google_search: false)").unwrap();

        let settings = Settings::load(&path);
        assert_eq!(settings.model, "gemini-2.5-flash");
        assert!(!settings.google_search);
        assert_eq!(settings.request_timeout_secs, 120);
    }

    #[test]
    fn malformed_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("xpath_forge.ron");
        fs::write(&path, "(model: ").unwrap();
        assert_eq!(Settings::load(&path), Settings::default());
    }

    #[test]
    fn saved_settings_load_back() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("xpath_forge.ron");
        let settings = Settings {
            log_destination: LogDestination::Both,
            ..Settings::default()
        };
        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path), settings);
    }

    #[test]
    fn args_override_file_values() {
        let args = Args::parse_from([
            "xpath_forge",
            "--model",
            "gemini-2.5-pro",
            "--no-search",
            "--history-file",
            "h.json",
            "--log",
            "off",
        ]);
        let mut settings = Settings::default();
        settings.apply_args(&args);
        assert_eq!(settings.model, "gemini-2.5-pro");
        assert!(!settings.google_search);
        assert_eq!(settings.history_file, PathBuf::from("h.json"));
        assert_eq!(settings.log_destination, LogDestination::Off);

        let generation = settings.generation_settings(Some("k".to_string()));
        assert_eq!(generation.model, "gemini-2.5-pro");
        assert_eq!(generation.request_timeout, Duration::from_secs(120));
    }

    #[test]
    fn api_key_prefers_gemini_variable_and_skips_blanks() {
        let key = api_key_from(|name| match name {
            "GEMINI_API_KEY" => Some("  ".to_string()),
            "API_KEY" => Some("fallback".to_string()),
            _ => None,
        });
        assert_eq!(key.as_deref(), Some("fallback"));

        let key = api_key_from(|name| (name == "GEMINI_API_KEY").then(|| "primary".to_string()));
        assert_eq!(key.as_deref(), Some("primary"));
        assert_eq!(api_key_from(|_| None), None);
    }
}
