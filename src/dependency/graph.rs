use crate::config::Environment;
use crate::error::Result;
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Dependency graph for managing service dependencies
///
/// Nodes are the services defined in a recipe. Edges may point at names that
/// are not nodes when a recipe references an undefined service; see
/// [`Graph::missing_references`].
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: BTreeSet<String>,
    /// `edges[A] = [B, C]` means A depends on B and C
    edges: BTreeMap<String, Vec<String>>,
    /// `reverse[A] = [B, C]` means B and C depend on A
    reverse: BTreeMap<String, Vec<String>>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph of an environment.
    ///
    /// Each service depends on its `depends_on` entries and on the service
    /// part of each of its links.
    pub fn from_environment(environment: &Environment) -> Result<Self> {
        let mut graph = Self::new();

        for (name, service) in &environment.services {
            graph.add_node(name.clone());
            for dep in service.dependency_names()? {
                graph.add_edge(name.clone(), dep);
            }
        }

        Ok(graph)
    }

    /// Add a node to the graph
    pub fn add_node(&mut self, name: String) {
        self.nodes.insert(name.clone());
        self.edges.entry(name.clone()).or_default();
        self.reverse.entry(name).or_default();
    }

    /// Add a dependency edge (from depends on to)
    ///
    /// Only `from` becomes a node; `to` stays a dangling reference until it
    /// is added with [`Graph::add_node`].
    pub fn add_edge(&mut self, from: String, to: String) {
        self.add_node(from.clone());

        let deps = self.edges.entry(from.clone()).or_default();
        if deps.contains(&to) {
            return;
        }
        deps.push(to.clone());
        self.reverse.entry(to).or_default().push(from);
    }

    /// Get all transitive dependencies of a node in topological order
    pub fn get_dependencies(&self, node: &str) -> Vec<String> {
        let mut visited = HashSet::new();
        let mut result = Vec::new();

        self.dfs_dependencies(node, node, &mut visited, &mut result);

        result
    }

    fn dfs_dependencies(
        &self,
        node: &str,
        start_node: &str,
        visited: &mut HashSet<String>,
        result: &mut Vec<String>,
    ) {
        if !visited.insert(node.to_string()) {
            return;
        }

        // Visit dependencies first (post-order for topological sort)
        if let Some(deps) = self.edges.get(node) {
            for dep in deps {
                self.dfs_dependencies(dep, start_node, visited, result);
            }
        }

        // Don't include the original node in its own dependency list
        if node != start_node {
            result.push(node.to_string());
        }
    }

    /// Get direct dependencies of a node
    pub fn get_direct_dependencies(&self, node: &str) -> &[String] {
        self.edges.get(node).map(Vec::as_slice).unwrap_or_default()
    }

    /// Get nodes that depend on the given node
    pub fn get_dependents(&self, node: &str) -> &[String] {
        self.reverse.get(node).map(Vec::as_slice).unwrap_or_default()
    }

    /// All edges whose target is not a node, as `(service, missing)` pairs.
    pub fn missing_references(&self) -> Vec<(String, String)> {
        self.edges
            .iter()
            .flat_map(|(from, deps)| {
                deps.iter()
                    .filter(|dep| !self.nodes.contains(*dep))
                    .map(move |dep| (from.clone(), dep.clone()))
            })
            .collect()
    }

    /// Find a cycle in the graph and return it as a path
    ///
    /// The returned path starts and ends with the same node, so a service
    /// depending on itself yields `[a, a]`.
    pub fn find_cycle(&self) -> Option<Vec<String>> {
        let mut visited = HashSet::new();
        let mut rec_stack = HashSet::new();
        let mut path = Vec::new();

        for node in &self.nodes {
            if !visited.contains(node) {
                if let Some(cycle) =
                    self.find_cycle_dfs(node, &mut visited, &mut rec_stack, &mut path)
                {
                    return Some(cycle);
                }
            }
        }

        None
    }

    fn find_cycle_dfs(
        &self,
        node: &str,
        visited: &mut HashSet<String>,
        rec_stack: &mut HashSet<String>,
        path: &mut Vec<String>,
    ) -> Option<Vec<String>> {
        visited.insert(node.to_string());
        rec_stack.insert(node.to_string());
        path.push(node.to_string());

        for dep in self.get_direct_dependencies(node) {
            if !self.nodes.contains(dep) {
                continue;
            }
            if !visited.contains(dep) {
                if let Some(cycle) = self.find_cycle_dfs(dep, visited, rec_stack, path) {
                    return Some(cycle);
                }
            } else if rec_stack.contains(dep) {
                // Found cycle - extract it from path
                let cycle_start = path.iter().position(|n| n == dep).unwrap_or(0);
                let mut cycle: Vec<String> = path[cycle_start..].to_vec();
                cycle.push(dep.clone()); // Complete the cycle
                return Some(cycle);
            }
        }

        rec_stack.remove(node);
        path.pop();
        None
    }

    /// Explain why the given services could not be ordered.
    pub fn explain_unresolved(&self, unresolved: &BTreeSet<String>) -> String {
        let missing: Vec<String> = self
            .missing_references()
            .into_iter()
            .filter(|(from, _)| unresolved.contains(from))
            .map(|(from, dep)| format!("'{}' references undefined service '{}'", from, dep))
            .collect();

        let mut reasons = Vec::new();
        if !missing.is_empty() {
            reasons.push(missing.join(", "));
        }
        if let Some(cycle) = self.find_cycle() {
            reasons.push(format!("dependency cycle {}", cycle.join(" -> ")));
        }

        if reasons.is_empty() {
            "dependencies could not be resolved".to_string()
        } else {
            reasons.join("; ")
        }
    }

    /// Check if the graph has any cycles
    pub fn has_cycle(&self) -> bool {
        self.find_cycle().is_some()
    }

    /// Get all nodes in the graph
    pub fn nodes(&self) -> &BTreeSet<String> {
        &self.nodes
    }
}
