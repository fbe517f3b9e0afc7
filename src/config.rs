use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

pub const DEFAULT_CONFIG_FILE: &str = "config.toml";
pub const TOKEN_ENV_VAR: &str = "MAPBOX_TOKEN";

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub tiles: TileConfig,
    pub map: MapConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct TileConfig {
    pub access_token: Option<String>,
    pub style: String, // Mapbox style id, e.g. "mapbox/dark-v10"
    pub attribution: String,
    pub name: String,
}

impl Default for TileConfig {
    fn default() -> Self {
        Self {
            access_token: None,
            style: "mapbox/dark-v10".to_string(),
            attribution: "Mapbox".to_string(),
            name: "Mapbox".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MapConfig {
    pub zoom_start: u8,
    pub line_color: String,
    pub line_weight: f64,
    pub line_opacity: f64,
    pub marker_color: String,
    pub marker_fill_opacity: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            zoom_start: 12,
            line_color: "#FF007C".to_string(),
            line_weight: 2.0,
            line_opacity: 0.8,
            marker_color: "#00FFD1".to_string(),
            marker_fill_opacity: 0.6,
        }
    }
}

impl AppConfig {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: AppConfig = toml::from_str(&content)
            .with_context(|| "Failed to parse TOML configuration")?;
        Ok(config)
    }

    /// Loads the named config file, or `config.toml` if it exists, or the built-in
    /// defaults. The token from `MAPBOX_TOKEN` is applied last.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::load_from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::load_from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => {
                debug!("No {} found, using built-in defaults", DEFAULT_CONFIG_FILE);
                Self::default()
            }
        };
        let config = config.with_token_override(env::var(TOKEN_ENV_VAR).ok());
        config.tiles.warn_if_missing_token();
        Ok(config)
    }

    pub fn with_token_override(mut self, token: Option<String>) -> Self {
        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            self.tiles.access_token = Some(token);
        }
        self
    }
}

impl TileConfig {
    pub fn token(&self) -> &str {
        self.access_token.as_deref().unwrap_or("")
    }

    /// Logs once per resolved config. Returns whether the token is missing.
    pub fn warn_if_missing_token(&self) -> bool {
        let missing = self.token().is_empty();
        if missing {
            warn!(
                "No tile access token configured (set {} or [tiles].access_token); the base map will be blank",
                TOKEN_ENV_VAR
            );
        }
        missing
    }

    pub fn tiles_url(&self) -> String {
        format!(
            "https://api.mapbox.com/styles/v1/{}/tiles/256/{{z}}/{{x}}/{{y}}?access_token={}",
            self.style,
            self.token()
        )
    }
}
