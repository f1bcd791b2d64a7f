use super::Environment;
use crate::error::{Error, Result};
use std::fmt;
use std::fs;
use std::path::Path;

/// Media types accepted for compose recipes.
pub const SUPPORTED_CONTENT_TYPES: [&str; 3] = ["application/x-yaml", "text/yaml", "text/x-yaml"];

/// Recipe formats the parser understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Yaml,
}

impl ContentType {
    /// Resolve a declared media type.
    ///
    /// Matching ignores case and media type parameters (`; charset=utf-8`),
    /// nothing else. The content itself is never inspected.
    pub fn from_media_type(media_type: &str) -> Result<Self> {
        let essence = media_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        if SUPPORTED_CONTENT_TYPES.contains(&essence.as_str()) {
            Ok(ContentType::Yaml)
        } else {
            Err(Error::UnsupportedContentType {
                content_type: media_type.to_string(),
                supported: SUPPORTED_CONTENT_TYPES
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            })
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentType::Yaml => write!(f, "application/x-yaml"),
        }
    }
}

pub struct Parser;

impl Parser {
    pub fn new() -> Self {
        Self
    }

    /// Parse recipe text declared with the given content type.
    pub fn parse_recipe(&self, content: &str, content_type: &str) -> Result<Environment> {
        match ContentType::from_media_type(content_type)? {
            ContentType::Yaml => self.parse_yaml(content),
        }
    }

    /// Parse recipe from YAML string
    pub fn parse_yaml(&self, content: &str) -> Result<Environment> {
        if content.trim().is_empty() {
            return Ok(Environment::default());
        }

        let environment: Environment =
            serde_yaml::from_str(content).map_err(|e| Error::MalformedRecipe(e.to_string()))?;

        for key in environment.unknown_keys() {
            tracing::warn!("Ignoring unsupported recipe key '{}'", key);
        }

        tracing::debug!(
            services = environment.len(),
            version = environment.version.as_deref().unwrap_or("unspecified"),
            "parsed compose recipe"
        );

        Ok(environment)
    }

    /// Load recipe from file path
    pub fn load_recipe<P: AsRef<Path>>(&self, path: P, content_type: &str) -> Result<Environment> {
        // Reject the content type before touching the filesystem
        ContentType::from_media_type(content_type)?;

        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            Error::Config(format!(
                "Failed to read recipe file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;

        self.parse_recipe(&content, content_type)
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}
