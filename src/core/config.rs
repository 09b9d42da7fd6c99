use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

pub const DEFAULT_MYNTRA_BASE_URL: &str = "https://www.myntra.com";

/// Where the price for a product is read from.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProductSource {
    /// JSON product API
    #[default]
    Api,
    /// Rendered product page
    Page,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ProductConfig {
    pub url: String,
    /// Display name; the fetched title is used when absent.
    pub name: Option<String>,
    #[serde(default)]
    pub source: ProductSource,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct MyntraProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub myntra: Option<MyntraProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            myntra: Some(MyntraProviderConfig {
                base_url: DEFAULT_MYNTRA_BASE_URL.to_string(),
            }),
        }
    }
}

impl ProvidersConfig {
    pub fn myntra_base_url(&self) -> &str {
        self.myntra
            .as_ref()
            .map_or(DEFAULT_MYNTRA_BASE_URL, |p| &p.base_url)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub products: Vec<ProductConfig>,
    #[serde(default)]
    pub providers: ProvidersConfig,
    pub data_path: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("io", "pricewatch", "pricewatch")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn default_data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        let proj_dirs = ProjectDirs::from("io", "pricewatch", "pricewatch")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
products:
  - url: "https://www.myntra.com/35035821"
    name: "Top1"
  - url: "https://www.myntra.com/35662540"
    source: page
data_path: "/tmp/pricewatch"
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.products.len(), 2);
        assert_eq!(config.products[0].name.as_deref(), Some("Top1"));
        assert_eq!(config.products[0].source, ProductSource::Api);
        assert!(config.products[1].name.is_none());
        assert_eq!(config.products[1].source, ProductSource::Page);
        assert_eq!(config.providers.myntra_base_url(), DEFAULT_MYNTRA_BASE_URL);
        assert_eq!(
            config.default_data_path().unwrap(),
            PathBuf::from("/tmp/pricewatch")
        );

        let yaml_str_with_providers = r#"
products: []
providers:
  myntra:
    base_url: "http://example.com/myntra"
        "#;
        let config_with_providers: AppConfig =
            serde_yaml::from_str(yaml_str_with_providers).unwrap();
        assert_eq!(
            config_with_providers.providers.myntra_base_url(),
            "http://example.com/myntra"
        );
        assert!(config_with_providers.data_path.is_none());
    }

    #[test]
    fn test_unknown_source_is_rejected() {
        let yaml_str = r#"
products:
  - url: "https://www.myntra.com/1"
    source: selenium
"#;
        assert!(serde_yaml::from_str::<AppConfig>(yaml_str).is_err());
    }
}
