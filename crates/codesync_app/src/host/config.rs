use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use codesync_engine::{DebounceSettings, EngineConfig, FetchSettings, Selectors, SyncSettings};
use codesync_logging::sync_info;
use serde::{Deserialize, Serialize};

const DEFAULT_CONFIG_FILE: &str = "codesync.ron";

/// Tunables read from `codesync.ron`. Every field is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub poll_interval_ms: u64,
    pub playback_delay_ms: u64,
    pub debounce_delay_ms: u64,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub max_bytes: u64,
    pub selectors: SelectorConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    pub play: String,
    pub replay: String,
    pub next: String,
    pub play_pause: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        let sync = SyncSettings::default();
        let fetch = FetchSettings::default();
        Self {
            poll_interval_ms: millis(sync.poll_interval),
            playback_delay_ms: millis(sync.playback_delay),
            debounce_delay_ms: millis(DebounceSettings::default().delay),
            connect_timeout_ms: millis(fetch.connect_timeout),
            request_timeout_ms: millis(fetch.request_timeout),
            max_bytes: fetch.max_bytes,
            selectors: SelectorConfig::default(),
        }
    }
}

impl Default for SelectorConfig {
    fn default() -> Self {
        let selectors = Selectors::default();
        Self {
            play: selectors.play,
            replay: selectors.replay,
            next: selectors.next,
            play_pause: selectors.play_pause,
        }
    }
}

impl AppConfig {
    /// Loads `path`, or `./codesync.ron` when it exists, or the defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = match path {
            Some(path) => path,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Path::new(DEFAULT_CONFIG_FILE),
            None => return Ok(Self::default()),
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = Self::parse(&text).with_context(|| format!("parsing config {}", path.display()))?;
        sync_info!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn parse(text: &str) -> anyhow::Result<Self> {
        Ok(ron::from_str(text)?)
    }

    pub fn selectors(&self) -> Selectors {
        Selectors {
            play: self.selectors.play.clone(),
            replay: self.selectors.replay.clone(),
            next: self.selectors.next.clone(),
            play_pause: self.selectors.play_pause.clone(),
        }
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            fetch: FetchSettings {
                connect_timeout: Duration::from_millis(self.connect_timeout_ms),
                request_timeout: Duration::from_millis(self.request_timeout_ms),
                max_bytes: self.max_bytes,
                ..FetchSettings::default()
            },
            sync: SyncSettings {
                poll_interval: Duration::from_millis(self.poll_interval_ms),
                playback_delay: Duration::from_millis(self.playback_delay_ms),
            },
            debounce_delay: Duration::from_millis(self.debounce_delay_ms),
            selectors: self.selectors(),
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_is_default() {
        assert_eq!(AppConfig::parse("()").unwrap(), AppConfig::default());
    }

    #[test]
    fn defaults_match_the_extension_timings() {
        let engine = AppConfig::default().engine_config();
        assert_eq!(engine.sync.poll_interval, Duration::from_millis(3000));
        let debounce = engine.debounce_settings();
        assert_eq!(debounce.delay, Duration::from_millis(10_000));
        assert_eq!(debounce.watched, ".next-button");
        assert_eq!(debounce.target, ".play-pause-button");
    }

    #[test]
    fn partial_config_overrides_only_given_fields() {
        let config = AppConfig::parse(
            r##"(
                poll_interval_ms: 1000,
                selectors: (play: "#run"),
            )"##,
        )
        .unwrap();
        let engine = config.engine_config();

        assert_eq!(engine.sync.poll_interval, Duration::from_millis(1000));
        assert_eq!(engine.sync.playback_delay, Duration::from_millis(500));
        assert_eq!(engine.selectors.play, "#run");
        assert_eq!(engine.selectors.replay, ".replay");
    }

    #[test]
    fn unknown_shape_is_an_error() {
        assert!(AppConfig::parse("(poll_interval_ms: \"fast\")").is_err());
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        assert!(AppConfig::load(Some(Path::new("/nonexistent/codesync.ron"))).is_err());
    }
}
