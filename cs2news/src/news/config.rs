use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use confik::{Configuration, ConfigurationBuilder, EnvSource, Source};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CLAN_IMAGE_BASE: &str = "https://clan.akamai.steamstatic.com/images";
pub const DEFAULT_PREVIEW_LENGTH: usize = 200;

#[derive(Debug, Clone, Serialize, Deserialize, Configuration)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub cors_origins: Vec<String>,
    pub max_payload_kb: usize,
}

impl ServerConfig {
    pub fn max_payload_bytes(&self) -> usize {
        self.max_payload_kb.saturating_mul(1024)
    }
}

/// Knobs for the formatting pipeline.
///
/// Video tags without explicit flags autoplay and hide controls; both can be
/// overridden here or per tag.
#[derive(Debug, Clone, Serialize, Deserialize, Configuration, PartialEq)]
pub struct FormatterConfig {
    pub video_autoplay: bool,
    pub video_controls: bool,
    pub preview_length: usize,
    pub clan_image_base: String,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            video_autoplay: true,
            video_controls: false,
            preview_length: DEFAULT_PREVIEW_LENGTH,
            clan_image_base: DEFAULT_CLAN_IMAGE_BASE.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Configuration)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub formatter: FormatterConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".into(),
                port: 8080,
                cors_origins: vec!["*".into()],
                max_payload_kb: 2048,
            },
            formatter: FormatterConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from `config.yml` (if present), `.env` and environment variables.
    /// Falls back to the compiled-in defaults when parsing fails.
    pub fn load() -> Self {
        let config_path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config.yml");
        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &Path) -> Self {
        if let Err(err) = dotenvy::dotenv() {
            log::debug!("no .env loaded: {err}");
        }

        let mut builder = AppConfig::builder();

        if config_path.exists() {
            builder.override_with(YamlFile(config_path.to_path_buf()));
        }

        builder.override_with(EnvSource::new());

        match builder.try_build() {
            Ok(cfg) => cfg,
            Err(err) => {
                log::warn!(
                    "Failed to load {} or env overrides: {err}. Using defaults.",
                    config_path.display()
                );
                AppConfig::default()
            }
        }
    }
}

/// A `config.yml` layer. Read and parse failures carry the file path.
#[derive(Debug)]
struct YamlFile(PathBuf);

impl<T> Source<T> for YamlFile
where
    T: DeserializeOwned + ConfigurationBuilder,
{
    fn provide(&self) -> Result<T, Box<dyn Error + Sync + Send>> {
        let path = self.0.as_path();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let layer = serde_yaml::from_str(&raw)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(layer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yaml_file_overrides_defaults() {
        let dir = std::env::temp_dir().join(format!("cs2news-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.yml");
        std::fs::write(
            &path,
            r#"
server:
  host: 0.0.0.0
  port: 9000
  cors_origins: []
  max_payload_kb: 16
formatter:
  video_autoplay: false
  video_controls: true
  preview_length: 80
  clan_image_base: https://cdn.example/images
"#,
        )
        .unwrap();

        let cfg = AppConfig::load_from(&path);
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.server.max_payload_bytes(), 16 * 1024);
        assert!(cfg.formatter.video_controls);
        assert_eq!(cfg.formatter.preview_length, 80);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn unparseable_file_falls_back_to_defaults() {
        let dir = std::env::temp_dir().join(format!("cs2news-bad-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.yml");
        std::fs::write(&path, "server: [unterminated\n").unwrap();

        let cfg = AppConfig::load_from(&path);
        assert_eq!(cfg.server.port, AppConfig::default().server.port);
        assert_eq!(cfg.formatter, FormatterConfig::default());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn yaml_errors_name_the_file() {
        let path = Path::new("/nonexistent/cs2news/config.yml");
        let layer: Result<<AppConfig as Configuration>::Builder, _> =
            YamlFile(path.to_path_buf()).provide();
        let Err(err) = layer else {
            panic!("missing file must not provide a layer");
        };
        assert!(err.to_string().contains("/nonexistent/cs2news/config.yml"));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let cfg = AppConfig::load_from(Path::new("/nonexistent/cs2news/config.yml"));
        assert_eq!(cfg.formatter, FormatterConfig::default());
    }
}
