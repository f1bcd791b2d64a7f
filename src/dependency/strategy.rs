//! Start ordering of compose services.
//!
//! Services are ranked by weight (the length of their longest dependency
//! chain) and started lightest first. Services of equal weight never depend
//! on each other and are ordered by name so the result is reproducible.

use super::Graph;
use crate::config::Environment;
use crate::error::{Error, Result};
use std::collections::BTreeMap;

/// Computed start order of an environment together with the weights it was
/// derived from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartPlan {
    order: Vec<String>,
    weights: BTreeMap<String, u32>,
}

impl StartPlan {
    /// Service names in start order
    pub fn order(&self) -> &[String] {
        &self.order
    }

    pub fn into_order(self) -> Vec<String> {
        self.order
    }

    pub fn weight(&self, service: &str) -> Option<u32> {
        self.weights.get(service).copied()
    }

    pub fn weights(&self) -> &BTreeMap<String, u32> {
        &self.weights
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Services grouped by weight, lightest group first.
    ///
    /// Services within one group are independent of each other and may be
    /// started concurrently once every earlier group is up.
    pub fn layers(&self) -> Vec<Vec<String>> {
        let mut layers: Vec<Vec<String>> = Vec::new();
        let mut current: Option<u32> = None;

        for name in &self.order {
            let weight = self.weights.get(name).copied();
            if layers.is_empty() || current != weight {
                layers.push(Vec::new());
                current = weight;
            }
            if let Some(layer) = layers.last_mut() {
                layer.push(name.clone());
            }
        }

        layers
    }
}

/// Decides in which order the services of an environment are started.
#[derive(Debug, Clone, Copy, Default)]
pub struct StartStrategy;

impl StartStrategy {
    pub fn new() -> Self {
        Self
    }

    /// Start order of the environment's services, dependencies first.
    pub fn order(&self, environment: &Environment) -> Result<Vec<String>> {
        Ok(self.plan(environment)?.into_order())
    }

    /// Compute the full start plan.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidLinkSyntax`] if a link entry cannot be parsed
    /// - [`Error::UnresolvableOrder`] if a cycle or an undefined service
    ///   reference prevents ordering; names every affected service
    pub fn plan(&self, environment: &Environment) -> Result<StartPlan> {
        let graph = Graph::from_environment(environment)?;
        let weighing = graph.weigh();

        if !weighing.is_complete() {
            return Err(Error::UnresolvableOrder {
                services: weighing.unresolved.iter().cloned().collect(),
                reason: graph.explain_unresolved(&weighing.unresolved),
            });
        }

        let mut ranked: Vec<(u32, &String)> = weighing
            .weights
            .iter()
            .map(|(name, weight)| (*weight, name))
            .collect();
        ranked.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)));

        let order: Vec<String> = ranked.into_iter().map(|(_, name)| name.clone()).collect();

        tracing::info!("Start order of {} services: {}", order.len(), order.join(", "));

        Ok(StartPlan {
            order,
            weights: weighing.weights,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Service;

    fn depends_on(deps: &[&str]) -> Service {
        Service {
            depends_on: deps.iter().map(|d| d.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_chain_order() {
        let env = Environment::default()
            .with_service("C", depends_on(&["B"]))
            .with_service("B", depends_on(&["A"]))
            .with_service("A", depends_on(&[]));

        assert_eq!(StartStrategy::new().order(&env).unwrap(), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_layers_group_equal_weights() {
        let env = Environment::default()
            .with_service("a", depends_on(&[]))
            .with_service("b", depends_on(&[]))
            .with_service("c", depends_on(&["a", "b"]))
            .with_service("d", depends_on(&["a"]));

        let plan = StartStrategy::new().plan(&env).unwrap();
        assert_eq!(plan.order(), ["a", "b", "c", "d"]);
        assert_eq!(
            plan.layers(),
            vec![
                vec!["a".to_string(), "b".to_string()],
                vec!["c".to_string(), "d".to_string()]
            ]
        );
        assert_eq!(plan.weight("c"), Some(1));
        assert_eq!(plan.weight("zzz"), None);
    }

    #[test]
    fn test_empty_environment() {
        let plan = StartStrategy::new().plan(&Environment::default()).unwrap();
        assert!(plan.is_empty());
        assert!(plan.layers().is_empty());
    }

    #[test]
    fn test_input_is_not_mutated() {
        let env = Environment::default()
            .with_service("a", depends_on(&[]))
            .with_service("b", depends_on(&["a"]));
        let before = env.clone();

        StartStrategy::new().order(&env).unwrap();
        assert_eq!(env, before);
    }

    #[test]
    fn test_unresolvable_reports_reason() {
        let env = Environment::default().with_service("a", depends_on(&["a"]));

        match StartStrategy::new().plan(&env) {
            Err(Error::UnresolvableOrder { services, reason }) => {
                assert_eq!(services, vec!["a"]);
                assert!(reason.contains("a -> a"), "reason: {}", reason);
            }
            other => panic!("expected UnresolvableOrder, got {:?}", other),
        }
    }
}
