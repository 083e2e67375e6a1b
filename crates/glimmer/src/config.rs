use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::color::Rgb;

const FILENAME: &str = "config.yaml";
const APP_DIR: &str = "glimmer";

pub const DEFAULT_INTERVAL_MS: u64 = 5_000;
pub const DEFAULT_SAMPLE_STAGGER_MS: u64 = 500;
/// Shortest auto-advance period accepted from config, deck files or the CLI.
pub const MIN_INTERVAL_MS: u64 = 500;

pub const KEYS: &[&str] = &[
    "defaults.interval_ms",
    "defaults.autoplay",
    "defaults.swipe_threshold",
    "defaults.sample_stagger_ms",
    "defaults.theme_color",
];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultsConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Auto-advance period in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval_ms: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autoplay: Option<bool>,

    /// Horizontal drag distance (points) that counts as a swipe.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swipe_threshold: Option<f32>,

    /// Delay between colour-sampling successive slides.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_stagger_ms: Option<u64>,

    /// Fallback theme colour as `#rrggbb`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme_color: Option<String>,
}

/// Settings after config defaults have been applied.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub interval_ms: u64,
    pub autoplay: bool,
    pub swipe_threshold: f32,
    pub sample_stagger_ms: u64,
    pub theme_color: Rgb,
}

impl Config {
    pub fn path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|d| d.join(APP_DIR).join(FILENAME))
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                anyhow::anyhow!("No config found. Run `glimmer config show` to see defaults.")
            } else {
                anyhow::anyhow!("Failed to read config: {e}")
            }
        })?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(config) => config,
            Err(e) => {
                tracing::debug!("using default config: {e}");
                Self::default()
            }
        }
    }

    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let yaml = serde_yaml::to_string(self)?;
        let contents = format!("# glimmer configuration\n{yaml}");
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let defaults = self.defaults.get_or_insert_with(DefaultsConfig::default);
        match key {
            "defaults.interval_ms" => {
                let ms: u64 = value.parse().map_err(|_| {
                    anyhow::anyhow!("Invalid interval_ms: {value}. Must be a number.")
                })?;
                if ms < MIN_INTERVAL_MS {
                    anyhow::bail!(
                        "Invalid interval_ms: {value}. Must be at least {MIN_INTERVAL_MS}."
                    );
                }
                defaults.interval_ms = Some(ms);
            }
            "defaults.autoplay" => {
                let on = match value {
                    "true" | "on" | "yes" => true,
                    "false" | "off" | "no" => false,
                    _ => anyhow::bail!("Invalid autoplay: {value}. Must be 'true' or 'false'."),
                };
                defaults.autoplay = Some(on);
            }
            "defaults.swipe_threshold" => {
                let threshold: f32 = value.parse().map_err(|_| {
                    anyhow::anyhow!("Invalid swipe_threshold: {value}. Must be a number.")
                })?;
                if !threshold.is_finite() || threshold <= 0.0 {
                    anyhow::bail!("Invalid swipe_threshold: {value}. Must be positive.");
                }
                defaults.swipe_threshold = Some(threshold);
            }
            "defaults.sample_stagger_ms" => {
                let ms: u64 = value.parse().map_err(|_| {
                    anyhow::anyhow!("Invalid sample_stagger_ms: {value}. Must be a number.")
                })?;
                defaults.sample_stagger_ms = Some(ms);
            }
            "defaults.theme_color" => {
                let rgb = Rgb::from_hex(value).ok_or_else(|| {
                    anyhow::anyhow!("Invalid theme_color: {value}. Must look like '#ff69b4'.")
                })?;
                defaults.theme_color = Some(rgb.to_hex());
            }
            _ => anyhow::bail!("Unknown config key: {key}. Valid keys: {}", KEYS.join(", ")),
        }
        Ok(())
    }

    pub fn resolved(&self) -> Resolved {
        let d = self.defaults.clone().unwrap_or_default();
        Resolved {
            interval_ms: d
                .interval_ms
                .unwrap_or(DEFAULT_INTERVAL_MS)
                .max(MIN_INTERVAL_MS),
            autoplay: d.autoplay.unwrap_or(true),
            swipe_threshold: d
                .swipe_threshold
                .filter(|t| t.is_finite() && *t > 0.0)
                .unwrap_or(crate::input::SWIPE_THRESHOLD),
            sample_stagger_ms: d.sample_stagger_ms.unwrap_or(DEFAULT_SAMPLE_STAGGER_MS),
            theme_color: d
                .theme_color
                .as_deref()
                .and_then(Rgb::from_hex)
                .unwrap_or(Rgb::HOT_PINK),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let r = Config::default().resolved();
        assert_eq!(r.interval_ms, 5000);
        assert!(r.autoplay);
        assert_eq!(r.swipe_threshold, 50.0);
        assert_eq!(r.sample_stagger_ms, 500);
        assert_eq!(r.theme_color, Rgb::HOT_PINK);
    }

    #[test]
    fn test_set_valid_values() {
        let mut config = Config::default();
        config.set("defaults.interval_ms", "3000").unwrap();
        config.set("defaults.autoplay", "off").unwrap();
        config.set("defaults.swipe_threshold", "80").unwrap();
        config.set("defaults.sample_stagger_ms", "0").unwrap();
        config.set("defaults.theme_color", "00FF00").unwrap();

        let r = config.resolved();
        assert_eq!(r.interval_ms, 3000);
        assert!(!r.autoplay);
        assert_eq!(r.swipe_threshold, 80.0);
        assert_eq!(r.sample_stagger_ms, 0);
        assert_eq!(r.theme_color, Rgb::new(0, 255, 0));
        assert_eq!(
            config.defaults.unwrap().theme_color.as_deref(),
            Some("#00ff00")
        );
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut config = Config::default();
        assert!(config.set("defaults.interval_ms", "fast").is_err());
        assert!(config.set("defaults.interval_ms", "10").is_err());
        assert!(config.set("defaults.autoplay", "maybe").is_err());
        assert!(config.set("defaults.swipe_threshold", "-5").is_err());
        assert!(config.set("defaults.theme_color", "pink").is_err());
        let err = config.set("defaults.colour", "x").unwrap_err();
        assert!(err.to_string().contains("Unknown config key"));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(FILENAME);
        let mut config = Config::default();
        config.set("defaults.interval_ms", "7000").unwrap();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.resolved().interval_ms, 7000);
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("# glimmer"));
    }

    #[test]
    fn test_missing_file_message() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load_from(&dir.path().join("none.yaml")).unwrap_err();
        assert!(err.to_string().contains("No config found"));
    }

    #[test]
    fn test_hand_edited_zero_values_are_clamped() {
        let yaml = "defaults:\n  interval_ms: 0\n  swipe_threshold: 0\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        let r = config.resolved();
        assert_eq!(r.interval_ms, MIN_INTERVAL_MS);
        assert_eq!(r.swipe_threshold, crate::input::SWIPE_THRESHOLD);

        let yaml = "defaults:\n  swipe_threshold: -20\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            config.resolved().swipe_threshold,
            crate::input::SWIPE_THRESHOLD
        );
    }

    #[test]
    fn test_bad_theme_color_in_file_falls_back() {
        let config: Config = serde_yaml::from_str("defaults:\n  theme_color: nope\n").unwrap();
        assert_eq!(config.resolved().theme_color, Rgb::HOT_PINK);
    }
}
