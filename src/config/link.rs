//! Service link parsing.
//!
//! A link is written either as `service` or as `service:alias`. Only the
//! service part matters for start ordering; the alias is networking
//! metadata handed through to the launcher.

use crate::error::{Error, Result};
use std::fmt;

/// A parsed entry of a service's `links` list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Link<'a> {
    pub service: &'a str,
    pub alias: Option<&'a str>,
}

impl<'a> Link<'a> {
    /// Parse a link entry.
    ///
    /// The entry must split on `:` into one or two parts and the service part
    /// must not be empty. An empty alias (`"db:"`) is treated as no alias.
    pub fn parse(entry: &'a str) -> Result<Self> {
        let parts: Vec<&str> = entry.split(':').collect();

        let (service, alias) = match parts.as_slice() {
            [service] => (*service, None),
            [service, alias] => (*service, Some(*alias).filter(|a| !a.is_empty())),
            _ => return Err(Error::InvalidLinkSyntax(entry.to_string())),
        };

        if service.is_empty() {
            return Err(Error::InvalidLinkSyntax(entry.to_string()));
        }

        tracing::debug!(link = entry, service, ?alias, "parsed service link");
        Ok(Self { service, alias })
    }

    /// Name under which the linked service is reachable from the linking one.
    pub fn hostname(&self) -> &'a str {
        self.alias.unwrap_or(self.service)
    }
}

impl fmt::Display for Link<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.alias {
            Some(alias) => write!(f, "{}:{}", self.service, alias),
            None => write!(f, "{}", self.service),
        }
    }
}
