//! Recipe loader settings.
//!
//! Settings can be read from a YAML file and are then overridden by command
//! line flags or environment variables:
//!
//! ```yaml
//! api_endpoint: https://che.example.com/api
//! fetch_timeout: 30s
//! max_recipe_size: 1048576
//! ```

use super::parse_duration_string;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use url::{Host, Url};

const DEFAULT_FETCH_TIMEOUT: &str = "30s";
const DEFAULT_MAX_RECIPE_SIZE: u64 = 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderSettings {
    /// Endpoint of the platform API. Recipes hosted on exactly this host
    /// receive the caller's token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_endpoint: Option<Url>,

    /// Timeout for a whole recipe download, e.g. "30s" or "500ms"
    pub fetch_timeout: String,

    /// Largest recipe accepted, in bytes
    pub max_recipe_size: u64,
}

impl Default for LoaderSettings {
    fn default() -> Self {
        Self {
            api_endpoint: None,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT.to_string(),
            max_recipe_size: DEFAULT_MAX_RECIPE_SIZE,
        }
    }
}

impl LoaderSettings {
    /// Load settings from a YAML file. Missing keys take their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            Error::Config(format!(
                "Failed to read settings file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let settings: Self = serde_yaml::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse settings: {}", e)))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn with_api_endpoint(mut self, endpoint: Url) -> Self {
        self.api_endpoint = Some(endpoint);
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: impl Into<String>) -> Self {
        self.fetch_timeout = timeout.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(ref endpoint) = self.api_endpoint {
            if endpoint.scheme() != "http" && endpoint.scheme() != "https" {
                return Err(Error::Config(format!(
                    "Invalid api_endpoint '{}': scheme must be http or https",
                    endpoint
                )));
            }
            if endpoint.host().is_none() {
                return Err(Error::Config(format!(
                    "Invalid api_endpoint '{}': no host",
                    endpoint
                )));
            }
        }

        self.fetch_timeout()?;

        if self.max_recipe_size == 0 {
            return Err(Error::Config(
                "max_recipe_size must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    pub fn fetch_timeout(&self) -> Result<Duration> {
        match parse_duration_string(&self.fetch_timeout) {
            Some(timeout) if !timeout.is_zero() => Ok(timeout),
            _ => Err(Error::Config(format!(
                "Invalid fetch_timeout '{}'. Use formats like '5s', '30s', '1m', '500ms'",
                self.fetch_timeout
            ))),
        }
    }

    /// Host of the API endpoint, the only host trusted with caller tokens.
    pub fn trusted_host(&self) -> Option<Host<String>> {
        self.api_endpoint
            .as_ref()
            .and_then(|endpoint| endpoint.host())
            .map(|host| host.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let settings = LoaderSettings::default();
        assert_eq!(settings.fetch_timeout().unwrap(), Duration::from_secs(30));
        assert_eq!(settings.max_recipe_size, 1024 * 1024);
        assert!(settings.trusted_host().is_none());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "api_endpoint: https://Che.Example.com:8443/api").unwrap();
        writeln!(file, "fetch_timeout: 500ms").unwrap();

        let settings = LoaderSettings::load(file.path()).unwrap();
        assert_eq!(
            settings.fetch_timeout().unwrap(),
            Duration::from_millis(500)
        );
        assert_eq!(settings.max_recipe_size, 1024 * 1024);
        assert_eq!(
            settings.trusted_host(),
            Some(Host::Domain("che.example.com".to_string()))
        );
    }

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(
            LoaderSettings::from_yaml("  \n").unwrap(),
            LoaderSettings::default()
        );
    }

    #[test]
    fn test_invalid_timeout_rejected() {
        let err = LoaderSettings::from_yaml("fetch_timeout: soon\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let err = LoaderSettings::default().with_fetch_timeout("0s").validate();
        assert!(err.is_err());
    }

    #[test]
    fn test_non_http_endpoint_rejected() {
        let settings = LoaderSettings::default()
            .with_api_endpoint(Url::parse("ftp://files.example.com/").unwrap());
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_zero_size_rejected() {
        assert!(LoaderSettings::from_yaml("max_recipe_size: 0\n").is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = LoaderSettings::load("/nonexistent/settings.yaml").unwrap_err();
        assert!(err.to_string().contains("Failed to read settings file"));
    }
}
