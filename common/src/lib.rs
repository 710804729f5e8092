/*!
common/src/lib.rs

Shared configuration types for Newsline.

This file provides:
- Config data structures (deserialized from TOML, every section optional)
- An async loader for a TOML config file
- Default/override merging so a packaged `config.default.toml` can be
  partially overridden by a local `config.toml`
*/

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Where the feed document lives
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Path to the JSON feed document (e.g. "news_data.json")
    pub path: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: "news_data.json".to_string(),
        }
    }
}

/// Time-windowing and tweet selection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// Length of the "latest" window, counted back from the newest timestamp in the feed
    pub window_minutes: i64,
    /// Number of tweets per point shown in full; the rest are listed as links
    pub full_display_count: usize,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            window_minutes: 120,
            full_display_count: 2,
        }
    }
}

/// Page heading texts
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub title: String,
    pub caption: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            title: "India-Pakistan Conflict: Live Updates".to_string(),
            caption: "This page aggregates real-time updates and tweets regarding the ongoing India-Pakistan situation from various sources.".to_string(),
        }
    }
}

/// Color palette handed to the HTML renderer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    pub theme_header: String,
    pub latest_header: String,
    pub past_header: String,
    pub theme_name_in_latest: String,
    pub summary_subheader: String,
    pub tweet_metadata: String,
    pub tweet_content_text: String,
    pub tweet_content_bg: String,
    pub tweet_link_primary: String,
    pub tweet_link_secondary: String,
    pub associated_link: String,
    pub toc_item_text: String,
    pub top_ts_label: String,
    pub top_ts_value_text: String,
    pub top_ts_value_bg: String,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            theme_header: "#003366".to_string(),
            latest_header: "#004d00".to_string(),
            past_header: "#003366".to_string(),
            theme_name_in_latest: "#003366".to_string(),
            summary_subheader: "#000000".to_string(),
            tweet_metadata: "#6c757d".to_string(),
            tweet_content_text: "#212529".to_string(),
            tweet_content_bg: "#f8f9fa".to_string(),
            tweet_link_primary: "#0062cc".to_string(),
            tweet_link_secondary: "#0056b3".to_string(),
            associated_link: "#58508d".to_string(),
            toc_item_text: "#000000".to_string(),
            top_ts_label: "#000000".to_string(),
            top_ts_value_text: "#28a745".to_string(),
            top_ts_value_bg: "#e9ecef".to_string(),
        }
    }
}

/// Plain-text rendering options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Wrap width used when converting the HTML page to text
    pub text_width: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { text_width: 80 }
    }
}

/// HTTP listener settings (used by `--serve`)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

/// Top-level application configuration (deserialized from config.toml)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data: DataConfig,
    pub timeline: TimelineConfig,
    pub page: PageConfig,
    pub style: StyleConfig,
    pub render: RenderConfig,
    pub server: ServerConfig,
}

impl Config {
    /// Parse and validate a configuration from TOML text.
    pub fn from_toml_str(data: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(data).context("Failed to parse TOML configuration")?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load configuration from a TOML file asynchronously.
    ///
    /// Example:
    ///   let cfg = Config::from_file("config.toml").await?;
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = tokio::fs::read_to_string(path.as_ref())
            .await
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;
        Self::from_toml_str(&data)
    }

    /// Load configuration with an optional default file and an optional override file.
    /// If both are present, they are merged (override takes precedence).
    /// Paths that do not exist are skipped; with neither present the built-in defaults apply.
    pub async fn load_with_defaults(default_path: Option<&Path>, override_path: Option<&Path>) -> Result<Self> {
        let mut config_value = toml::Value::Table(toml::map::Map::new());

        if let Some(path) = default_path {
            if path.exists() {
                let data = tokio::fs::read_to_string(path).await
                    .with_context(|| format!("Failed to read default config: {}", path.display()))?;
                let val: toml::Value = toml::from_str(&data)
                    .context("Failed to parse default configuration")?;
                merge_toml(&mut config_value, val);
            }
        }

        if let Some(path) = override_path {
            if path.exists() {
                let data = tokio::fs::read_to_string(path).await
                    .with_context(|| format!("Failed to read override config: {}", path.display()))?;
                let val: toml::Value = toml::from_str(&data)
                    .context("Failed to parse override configuration")?;
                merge_toml(&mut config_value, val);
            }
        }

        let cfg: Config = config_value.try_into().context("Failed to parse merged configuration")?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject settings the timeline cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.timeline.window_minutes <= 0 {
            bail!(
                "timeline.window_minutes must be positive (got {})",
                self.timeline.window_minutes
            );
        }
        if chrono::Duration::try_minutes(self.timeline.window_minutes).is_none() {
            bail!(
                "timeline.window_minutes is too large (got {})",
                self.timeline.window_minutes
            );
        }
        Ok(())
    }
}

fn merge_toml(a: &mut toml::Value, b: toml::Value) {
    match (a, b) {
        (toml::Value::Table(a_map), toml::Value::Table(b_map)) => {
            for (k, v) in b_map {
                if let Some(a_val) = a_map.get_mut(&k) {
                    merge_toml(a_val, v);
                } else {
                    a_map.insert(k, v);
                }
            }
        }
        (a_val, b_val) => *a_val = b_val,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn config_from_string() {
        let toml = r##"
            [data]
            path = "feeds/today.json"

            [timeline]
            window_minutes = 90

            [style]
            latest_header = "#112233"
        "##;

        let cfg = Config::from_toml_str(toml).expect("parse config");
        assert_eq!(cfg.data.path, "feeds/today.json");
        assert_eq!(cfg.timeline.window_minutes, 90);
        // Untouched keys keep their defaults
        assert_eq!(cfg.timeline.full_display_count, 2);
        assert_eq!(cfg.style.latest_header, "#112233");
        assert_eq!(cfg.style.theme_header, "#003366");
        assert_eq!(cfg.server.port, 8000);
    }

    #[test]
    fn empty_document_is_default() {
        let cfg = Config::from_toml_str("").expect("parse empty");
        assert_eq!(cfg.data.path, "news_data.json");
        assert_eq!(cfg.timeline.window_minutes, 120);
        assert_eq!(cfg.render.text_width, 80);
    }

    #[test]
    fn zero_window_is_rejected() {
        let err = Config::from_toml_str("[timeline]\nwindow_minutes = 0\n").unwrap_err();
        assert!(err.to_string().contains("window_minutes"));
    }

    #[test]
    fn oversized_window_is_rejected() {
        let err = Config::from_toml_str("[timeline]\nwindow_minutes = 9223372036854775807\n")
            .unwrap_err();
        assert!(err.to_string().contains("too large"));

        // A week is fine
        let cfg = Config::from_toml_str("[timeline]\nwindow_minutes = 10080\n").expect("parse");
        assert_eq!(cfg.timeline.window_minutes, 10080);
    }

    #[test]
    fn zero_full_display_count_is_allowed() {
        let cfg = Config::from_toml_str("[timeline]\nfull_display_count = 0\n").expect("parse");
        assert_eq!(cfg.timeline.full_display_count, 0);
    }

    #[tokio::test]
    async fn override_takes_precedence() {
        let dir = tempfile::tempdir().expect("tempdir");
        let default_path = dir.path().join("config.default.toml");
        let override_path = dir.path().join("config.toml");
        fs::write(
            &default_path,
            "[timeline]\nwindow_minutes = 120\nfull_display_count = 3\n[server]\nport = 9000\n",
        )
        .expect("write default");
        fs::write(&override_path, "[timeline]\nwindow_minutes = 30\n").expect("write override");

        let cfg = Config::load_with_defaults(Some(&default_path), Some(&override_path))
            .await
            .expect("load");
        assert_eq!(cfg.timeline.window_minutes, 30);
        assert_eq!(cfg.timeline.full_display_count, 3);
        assert_eq!(cfg.server.port, 9000);
    }

    #[tokio::test]
    async fn missing_files_fall_back_to_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("nope.toml");
        let cfg = Config::load_with_defaults(Some(&missing), None)
            .await
            .expect("load");
        assert_eq!(cfg.data.path, "news_data.json");
    }

    #[tokio::test]
    async fn from_file_reports_missing_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = Config::from_file(dir.path().join("absent.toml")).await.unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
