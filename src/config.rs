//! Application configuration.
//!
//! Read from a JSON file named by `--config` or `VALENTINE_CONFIG`; every field
//! is optional and falls back to the defaults below.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::flow::FlowSettings;
use crate::notify::{Celebration, ShareTarget};

pub const CONFIG_ENV: &str = "VALENTINE_CONFIG";

pub const RECIPIENT_PLACEHOLDER: &str = "{recipient}";
pub const SENDER_PLACEHOLDER: &str = "{sender}";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Origin and path share links point at.
    pub public_base_url: String,
    pub question: String,
    pub share: ShareSettings,
    pub celebration: Celebration,
    /// How long the "copied" acknowledgment stays up.
    pub copy_ack_ms: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShareSettings {
    pub messaging_base_url: String,
    /// `{sender}` and `{recipient}` are substituted.
    pub message_template: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            public_base_url: "http://127.0.0.1:8080/".to_string(),
            question: "Will you be my girlfriend?".to_string(),
            share: ShareSettings::default(),
            celebration: Celebration::default(),
            copy_ack_ms: 2000,
        }
    }
}

impl Default for ShareSettings {
    fn default() -> Self {
        ShareSettings {
            messaging_base_url: "https://wa.me/".to_string(),
            message_template: "Hey {sender}, it's {recipient}! YES, I will be your girlfriend! 💖"
                .to_string(),
        }
    }
}

impl AppConfig {
    /// Load from `path`, else from `$VALENTINE_CONFIG`, else defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));
        let Some(path) = path else {
            return Ok(AppConfig::default());
        };

        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("read config {}", path.display()))?;
        let cfg = Self::from_json(&raw).with_context(|| format!("load config {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(cfg)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let cfg: AppConfig = serde_json::from_str(raw).context("parse config json")?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        self.base_url()?;
        parse_http_url(&self.share.messaging_base_url).context("share.messaging_base_url")?;
        if !self.share.message_template.contains(RECIPIENT_PLACEHOLDER) {
            anyhow::bail!(
                "share.message_template must mention {}",
                RECIPIENT_PLACEHOLDER
            );
        }
        if self.question.trim().is_empty() {
            anyhow::bail!("question must not be empty");
        }
        Ok(())
    }

    pub fn base_url(&self) -> Result<Url> {
        parse_http_url(&self.public_base_url).context("public_base_url")
    }

    pub fn copy_ack(&self) -> Duration {
        Duration::from_millis(self.copy_ack_ms)
    }

    pub fn flow_settings(&self) -> Result<FlowSettings> {
        Ok(FlowSettings {
            base_url: self.base_url()?,
            share: ShareTarget {
                messaging_base: parse_http_url(&self.share.messaging_base_url)
                    .context("share.messaging_base_url")?,
                message_template: self.share.message_template.clone(),
            },
            celebration: self.celebration.clone(),
        })
    }
}

/// Parse `raw`, accepting only `http` and `https` URLs.
pub fn parse_http_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).with_context(|| format!("invalid url {:?}", raw))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => anyhow::bail!("unsupported url scheme {:?} in {:?}", other, raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let cfg = AppConfig::from_json("{}").unwrap();
        assert_eq!(cfg, AppConfig::default());
        assert_eq!(cfg.copy_ack(), Duration::from_secs(2));
        assert_eq!(cfg.celebration.particle_count, 150);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = AppConfig::from_json(
            r#"{"public_base_url": "https://love.example/ask", "share": {"message_template": "{recipient} says yes"}}"#,
        )
        .unwrap();
        assert_eq!(cfg.base_url().unwrap().as_str(), "https://love.example/ask");
        assert_eq!(cfg.share.messaging_base_url, "https://wa.me/");
        assert_eq!(cfg.share.message_template, "{recipient} says yes");
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(AppConfig::from_json(r#"{"public_base_url": "not a url"}"#).is_err());
        assert!(AppConfig::from_json(r#"{"public_base_url": "ftp://x/"}"#).is_err());
        assert!(AppConfig::from_json(r#"{"share": {"message_template": "hi"}}"#).is_err());
        assert!(AppConfig::from_json(r#"{"question": "  "}"#).is_err());
        assert!(AppConfig::from_json("[").is_err());
    }

    #[test]
    fn only_web_urls_are_accepted() {
        assert!(parse_http_url("https://love.example/").is_ok());
        assert!(parse_http_url("http://127.0.0.1:8080/").is_ok());
        assert!(parse_http_url("mailto:alex@example.com").is_err());
        assert!(parse_http_url("ftp://love.example/").is_err());
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("valentine.json");
        std::fs::write(&path, r#"{"question": "Be mine?", "copy_ack_ms": 500}"#).unwrap();

        let cfg = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(cfg.question, "Be mine?");
        assert_eq!(cfg.copy_ack(), Duration::from_millis(500));

        let missing = dir.path().join("nope.json");
        assert!(AppConfig::load(Some(&missing)).is_err());
    }
}
