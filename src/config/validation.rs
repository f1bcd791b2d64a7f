use super::Environment;
use crate::dependency::Graph;
use crate::error::{Error, Result};
use std::collections::BTreeSet;

impl Environment {
    /// Validate the recipe
    ///
    /// Reports the first problem that would make scheduling fail, with a more
    /// precise explanation than the scheduler gives:
    ///
    /// - service names must not be empty or contain `:`
    /// - every link must be `service` or `service:alias`
    /// - every referenced service must be defined
    /// - dependencies must not form a cycle
    pub fn validate(&self) -> Result<()> {
        for name in self.services.keys() {
            if name.trim().is_empty() {
                return Err(Error::Validation(
                    "Service names must not be empty".to_string(),
                ));
            }
            if name.contains(':') {
                return Err(Error::Validation(format!(
                    "Service name '{}' must not contain ':' as links could not refer to it",
                    name
                )));
            }
        }

        let graph = Graph::from_environment(self)?;

        let missing = graph.missing_references();
        if !missing.is_empty() {
            let services: BTreeSet<String> =
                missing.iter().map(|(from, _)| from.clone()).collect();
            let reason = missing
                .iter()
                .map(|(from, dep)| format!("'{}' references undefined service '{}'", from, dep))
                .collect::<Vec<_>>()
                .join(", ");
            return Err(Error::UnresolvableOrder {
                services: services.into_iter().collect(),
                reason,
            });
        }

        if let Some(cycle) = graph.find_cycle() {
            let services: BTreeSet<String> = cycle.iter().cloned().collect();
            return Err(Error::UnresolvableOrder {
                services: services.into_iter().collect(),
                reason: format!("dependency cycle {}", cycle.join(" -> ")),
            });
        }

        Ok(())
    }

    /// Non-fatal findings worth showing to the recipe author.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings: Vec<String> = self
            .services
            .iter()
            .filter(|(_, service)| !service.is_launchable())
            .map(|(name, _)| format!("Service '{}' has neither an image nor a build context", name))
            .collect();

        warnings.extend(
            self.unknown_keys()
                .into_iter()
                .map(|key| format!("Unsupported key '{}' is ignored", key)),
        );

        warnings
    }
}
