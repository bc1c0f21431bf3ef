use league_api::PlayoffConfig;
use league_api::client::DEFAULT_BASE_URL;
use log::{LevelFilter, warn};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_REFRESH_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub api_url: String,
    /// `None` follows the backend's active season.
    pub season_id: Option<u64>,
    /// Zero disables periodic refresh.
    pub refresh_interval: Duration,
    pub full_screen: bool,
    pub log_level: Option<LevelFilter>,
    pub playoffs: PlayoffConfig,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_BASE_URL.to_string(),
            season_id: None,
            refresh_interval: Duration::from_secs(DEFAULT_REFRESH_SECS),
            full_screen: false,
            log_level: None,
            playoffs: PlayoffConfig::default(),
        }
    }
}

/// On-disk shape of `config.json`. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SettingsFile {
    api_url: Option<String>,
    season_id: Option<u64>,
    refresh_secs: Option<u64>,
    full_screen: Option<bool>,
    log_level: Option<String>,
    playoffs: Option<PlayoffConfig>,
}

impl AppSettings {
    /// Defaults, then the config file, then `LEAGUE_*` environment variables.
    pub fn load() -> Self {
        let mut settings = Self::default();
        if let Some(path) = config_path()
            && path.exists()
        {
            match std::fs::read_to_string(&path) {
                Ok(content) => settings.apply_file(&content, &path.display().to_string()),
                Err(e) => warn!("could not read {}: {e}", path.display()),
            }
        }
        settings.apply_env(|key| std::env::var(key).ok());
        settings
    }

    fn apply_file(&mut self, content: &str, source: &str) {
        let file: SettingsFile = match serde_json::from_str(content) {
            Ok(file) => file,
            Err(e) => {
                warn!("ignoring {source}: {e}");
                return;
            }
        };
        if let Some(url) = file.api_url {
            self.api_url = url;
        }
        if file.season_id.is_some() {
            self.season_id = file.season_id;
        }
        if let Some(secs) = file.refresh_secs {
            self.refresh_interval = Duration::from_secs(secs);
        }
        if let Some(full_screen) = file.full_screen {
            self.full_screen = full_screen;
        }
        if let Some(level) = file.log_level.as_deref() {
            self.set_log_level(level, source);
        }
        if let Some(playoffs) = file.playoffs {
            self.playoffs = playoffs;
        }
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        let var = |key: &str| var(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = var("LEAGUE_API_URL") {
            self.api_url = url;
        }
        if let Some(raw) = var("LEAGUE_SEASON_ID") {
            match raw.trim().parse() {
                Ok(id) => self.season_id = Some(id),
                Err(_) => warn!("LEAGUE_SEASON_ID is not a number: {raw}"),
            }
        }
        if let Some(raw) = var("LEAGUE_BYE_COUNT") {
            match raw.trim().parse() {
                Ok(count) => self.playoffs.bye_count = Some(count),
                Err(_) => warn!("LEAGUE_BYE_COUNT is not a number: {raw}"),
            }
        }
        if let Some(raw) = var("LEAGUE_REFRESH_SECS") {
            match raw.trim().parse() {
                Ok(secs) => self.refresh_interval = Duration::from_secs(secs),
                Err(_) => warn!("LEAGUE_REFRESH_SECS is not a number: {raw}"),
            }
        }
        if let Some(level) = var("LEAGUE_LOG") {
            self.set_log_level(&level, "LEAGUE_LOG");
        }
    }

    fn set_log_level(&mut self, level: &str, source: &str) {
        match level.trim().parse::<LevelFilter>() {
            Ok(level) => self.log_level = Some(level),
            Err(_) => warn!("{source}: unknown log level {level:?}"),
        }
    }
}

/// `$XDG_CONFIG_HOME/leaguetui/config.json`, falling back to `~/.config`.
pub fn config_path() -> Option<PathBuf> {
    if let Ok(config_dir) = std::env::var("XDG_CONFIG_HOME")
        && !config_dir.trim().is_empty()
    {
        return Some(PathBuf::from(config_dir).join("leaguetui").join("config.json"));
    }
    if let Ok(home) = std::env::var("HOME")
        && !home.trim().is_empty()
    {
        return Some(
            PathBuf::from(home)
                .join(".config")
                .join("leaguetui")
                .join("config.json"),
        );
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use league_api::{OddPlayInPolicy, TieBreak};
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_point_at_local_backend() {
        let settings = AppSettings::default();
        assert_eq!(settings.api_url, "http://localhost:8080/api");
        assert_eq!(settings.season_id, None);
        assert_eq!(settings.playoffs.bye_count, None);
    }

    #[test]
    fn file_overrides_defaults() {
        let mut settings = AppSettings::default();
        settings.apply_file(
            r#"{
                "api_url": "https://league.example.org/api",
                "season_id": 4,
                "refresh_secs": 0,
                "log_level": "debug",
                "playoffs": {"bye_count": 5, "tie_break": "input_order", "odd_play_in": "reject"}
            }"#,
            "test",
        );
        assert_eq!(settings.api_url, "https://league.example.org/api");
        assert_eq!(settings.season_id, Some(4));
        assert_eq!(settings.refresh_interval, Duration::ZERO);
        assert_eq!(settings.log_level, Some(LevelFilter::Debug));
        assert_eq!(settings.playoffs.bye_count, Some(5));
        assert_eq!(settings.playoffs.tie_break, TieBreak::InputOrder);
        assert_eq!(settings.playoffs.odd_play_in, OddPlayInPolicy::Reject);
    }

    #[test]
    fn invalid_file_is_ignored() {
        let mut settings = AppSettings::default();
        settings.apply_file("{ not json", "test");
        assert_eq!(settings.api_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn env_overrides_file() {
        let mut settings = AppSettings::default();
        settings.apply_file(r#"{"season_id": 4, "playoffs": {"bye_count": 5}}"#, "test");
        settings.apply_env(env(&[
            ("LEAGUE_SEASON_ID", "7"),
            ("LEAGUE_BYE_COUNT", "4"),
            ("LEAGUE_REFRESH_SECS", "15"),
            ("LEAGUE_LOG", "warn"),
        ]));
        assert_eq!(settings.season_id, Some(7));
        assert_eq!(settings.playoffs.bye_count, Some(4));
        assert_eq!(settings.refresh_interval, Duration::from_secs(15));
        assert_eq!(settings.log_level, Some(LevelFilter::Warn));
    }

    #[test]
    fn bad_env_values_keep_previous() {
        let mut settings = AppSettings::default();
        settings.apply_env(env(&[("LEAGUE_SEASON_ID", "current"), ("LEAGUE_API_URL", "  ")]));
        assert_eq!(settings.season_id, None);
        assert_eq!(settings.api_url, DEFAULT_BASE_URL);
    }
}
