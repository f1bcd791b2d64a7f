//! Service configuration types.
//!
//! This module contains the [`Service`] struct describing a single container
//! in a compose recipe, together with the serde helpers that apply the
//! recipe's field defaults.

use super::Link;
use crate::error::Result;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Build section of a service.
///
/// Compose accepts either a bare context path or a mapping:
///
/// ```yaml
/// build: ./api
/// # or
/// build:
///   context: ./api
///   dockerfile: Dockerfile.dev
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Build {
    Context(String),
    Detailed {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        context: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        dockerfile: Option<String>,
    },
}

impl Build {
    pub fn context(&self) -> Option<&str> {
        match self {
            Build::Context(context) => Some(context),
            Build::Detailed { context, .. } => context.as_deref(),
        }
    }

    pub fn dockerfile(&self) -> Option<&str> {
        match self {
            Build::Context(_) => None,
            Build::Detailed { dockerfile, .. } => dockerfile.as_deref(),
        }
    }
}

/// A single service (container) of a compose environment.
///
/// Collections are never optional: a key that is absent or explicitly `null`
/// in the recipe becomes an empty collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Service {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build: Option<Build>,

    /// Legacy top-level build context, superseded by `build`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,

    /// Legacy top-level dockerfile, superseded by `build`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dockerfile: Option<String>,

    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Vec::is_empty")]
    pub command: Vec<String>,

    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Vec::is_empty")]
    pub entrypoint: Vec<String>,

    #[serde(
        default,
        deserialize_with = "environment_map",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub environment: BTreeMap<String, String>,

    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,

    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_name: Option<String>,

    #[serde(
        default,
        deserialize_with = "scalar_map",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub labels: BTreeMap<String, String>,

    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Vec::is_empty")]
    pub expose: Vec<String>,

    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<String>,

    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Vec::is_empty")]
    pub volumes: Vec<String>,

    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Vec::is_empty")]
    pub volumes_from: Vec<String>,

    /// Memory limit in bytes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mem_limit: Option<u64>,

    /// Keys this model does not know about. They are kept so the parser can
    /// report them, but never serialized back.
    #[serde(flatten, skip_serializing)]
    pub unknown: BTreeMap<String, serde_yaml::Value>,
}

impl Service {
    /// Build context, preferring the `build` section over the legacy key.
    pub fn build_context(&self) -> Option<&str> {
        self.build
            .as_ref()
            .and_then(Build::context)
            .or(self.context.as_deref())
    }

    /// Dockerfile, preferring the `build` section over the legacy key.
    pub fn build_dockerfile(&self) -> Option<&str> {
        self.build
            .as_ref()
            .and_then(Build::dockerfile)
            .or(self.dockerfile.as_deref())
    }

    /// Whether the launcher has anything to start this service from.
    pub fn is_launchable(&self) -> bool {
        self.image.is_some() || self.build_context().is_some()
    }

    /// Names of all services that must be started before this one.
    ///
    /// This is `depends_on` followed by the service part of each link,
    /// without duplicates and in declaration order.
    pub fn dependency_names(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = Vec::with_capacity(self.depends_on.len() + self.links.len());

        for dep in &self.depends_on {
            if !names.contains(dep) {
                names.push(dep.clone());
            }
        }

        for entry in &self.links {
            let link = Link::parse(entry)?;
            if !names.iter().any(|n| n == link.service) {
                names.push(link.service.to_string());
            }
        }

        Ok(names)
    }
}

/// Deserialize `null` as the type's default instead of failing.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Deserialize an optional scalar (string, number or bool) as a string.
///
/// Numbers are rendered from their parsed value, so an unquoted `2.10`
/// becomes `"2.1"`. Quote a value to keep its exact spelling.
pub(crate) fn scalar_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_yaml::Value>::deserialize(deserializer)? {
        None | Some(serde_yaml::Value::Null) => Ok(None),
        Some(value) => scalar_to_string(&value)
            .map(Some)
            .ok_or_else(|| D::Error::custom("expected a scalar value")),
    }
}

fn scalar_map<'de, D>(deserializer: D) -> std::result::Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_yaml::Value>::deserialize(deserializer)? {
        None | Some(serde_yaml::Value::Null) => Ok(BTreeMap::new()),
        Some(serde_yaml::Value::Mapping(mapping)) => mapping_to_strings(&mapping),
        Some(_) => Err(D::Error::custom("expected a mapping of scalar values")),
    }
}

/// `environment` additionally accepts the compose list form `["KEY=value"]`.
fn environment_map<'de, D>(
    deserializer: D,
) -> std::result::Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_yaml::Value>::deserialize(deserializer)? {
        None | Some(serde_yaml::Value::Null) => Ok(BTreeMap::new()),
        Some(serde_yaml::Value::Mapping(mapping)) => mapping_to_strings(&mapping),
        Some(serde_yaml::Value::Sequence(entries)) => {
            let mut map = BTreeMap::new();
            for entry in entries {
                let entry = entry
                    .as_str()
                    .ok_or_else(|| D::Error::custom("environment entries must be strings"))?;
                let (key, value) = entry.split_once('=').unwrap_or((entry, ""));
                map.insert(key.to_string(), value.to_string());
            }
            Ok(map)
        }
        Some(_) => Err(D::Error::custom(
            "environment must be a mapping or a list of KEY=value entries",
        )),
    }
}

fn mapping_to_strings<E: serde::de::Error>(
    mapping: &serde_yaml::Mapping,
) -> std::result::Result<BTreeMap<String, String>, E> {
    let mut map = BTreeMap::new();
    for (key, value) in mapping {
        let key = scalar_to_string(key).ok_or_else(|| E::custom("keys must be scalars"))?;
        let value = match value {
            serde_yaml::Value::Null => String::new(),
            other => scalar_to_string(other)
                .ok_or_else(|| E::custom(format!("value of '{}' must be a scalar", key)))?,
        };
        map.insert(key, value);
    }
    Ok(map)
}

fn scalar_to_string(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
