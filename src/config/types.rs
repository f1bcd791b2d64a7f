//! Core recipe types.
//!
//! This module contains the root [`Environment`] struct, the in-memory form
//! of a compose recipe.

use super::service::{nullable, scalar_string};
use super::Service;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A parsed compose environment.
///
/// Services are keyed by name. The map is ordered so that every walk over
/// it is reproducible; key order carries no meaning beyond that.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    /// Informational only
    #[serde(
        default,
        deserialize_with = "scalar_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub version: Option<String>,

    #[serde(default, deserialize_with = "nullable")]
    pub services: BTreeMap<String, Service>,

    /// Top-level keys this model does not know about (`networks`, `volumes`, ...)
    #[serde(flatten, skip_serializing)]
    pub unknown: BTreeMap<String, serde_yaml::Value>,
}

impl Environment {
    pub fn service(&self, name: &str) -> Option<&Service> {
        self.services.get(name)
    }

    pub fn service_names(&self) -> impl Iterator<Item = &str> {
        self.services.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Dotted paths of every key that was present in the recipe but is not
    /// part of the model, e.g. `networks` or `services.web.restart`.
    pub fn unknown_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.unknown.keys().cloned().collect();
        for (name, service) in &self.services {
            keys.extend(
                service
                    .unknown
                    .keys()
                    .map(|key| format!("services.{}.{}", name, key)),
            );
        }
        keys
    }

    /// Add a service, replacing any previous definition with the same name.
    pub fn with_service(mut self, name: impl Into<String>, service: Service) -> Self {
        self.services.insert(name.into(), service);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_version_is_kept_as_string() {
        let env: Environment = serde_yaml::from_str("version: 3\nservices: {}\n").unwrap();
        assert_eq!(env.version.as_deref(), Some("3"));

        let env: Environment = serde_yaml::from_str("version: '2.1'\n").unwrap();
        assert_eq!(env.version.as_deref(), Some("2.1"));
        assert!(env.is_empty());
    }

    #[test]
    fn test_unquoted_float_version_is_normalized() {
        let env: Environment = serde_yaml::from_str("version: 2.10\n").unwrap();
        assert_eq!(env.version.as_deref(), Some("2.1"));

        let env: Environment = serde_yaml::from_str("version: '2.10'\n").unwrap();
        assert_eq!(env.version.as_deref(), Some("2.10"));
    }

    #[test]
    fn test_unknown_keys_include_service_paths() {
        let yaml = r#"
services:
  web:
    image: nginx
    restart: always
networks:
  default: {}
"#;
        let env: Environment = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            env.unknown_keys(),
            vec!["networks".to_string(), "services.web.restart".to_string()]
        );
    }

    #[test]
    fn test_with_service_builder() {
        let env = Environment::default()
            .with_service("b", Service::default())
            .with_service("a", Service::default());
        let names: Vec<&str> = env.service_names().collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(env.len(), 2);
        assert!(env.service("a").is_some());
        assert!(env.service("c").is_none());
    }
}
