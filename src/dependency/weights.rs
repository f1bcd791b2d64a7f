use super::Graph;
use std::collections::{BTreeMap, BTreeSet};

/// Result of weighting the nodes of a [`Graph`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Weighing {
    /// Topological rank of every resolved node. A node without dependencies
    /// weighs 0, any other node weighs one more than its heaviest dependency.
    pub weights: BTreeMap<String, u32>,
    /// Nodes that never received a weight: members of a cycle, nodes
    /// referencing an undefined service, and everything depending on those.
    pub unresolved: BTreeSet<String>,
    /// Number of relaxation passes that were run
    pub passes: usize,
}

impl Weighing {
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }
}

impl Graph {
    /// Assign a weight to every node by iterative relaxation.
    ///
    /// Each pass reads the weights settled by earlier passes and produces the
    /// assignments it can make from them; the working sets are only updated
    /// between passes. Stops when every node is weighted or a pass makes no
    /// progress.
    pub fn weigh(&self) -> Weighing {
        let mut weights: BTreeMap<String, u32> = BTreeMap::new();
        let mut remaining: BTreeSet<String> = self.nodes().clone();
        let mut passes = 0;

        while !remaining.is_empty() {
            passes += 1;

            let assigned: Vec<(String, u32)> = remaining
                .iter()
                .filter_map(|node| {
                    self.weight_from(node, &weights)
                        .map(|weight| (node.clone(), weight))
                })
                .collect();

            tracing::debug!(
                pass = passes,
                assigned = assigned.len(),
                remaining = remaining.len() - assigned.len(),
                "weighting pass"
            );

            if assigned.is_empty() {
                break;
            }

            for (node, weight) in assigned {
                remaining.remove(&node);
                weights.insert(node, weight);
            }
        }

        Weighing {
            weights,
            unresolved: remaining,
            passes,
        }
    }

    /// Weight of `node` given already settled weights, if all of its
    /// dependencies are settled.
    fn weight_from(&self, node: &str, weights: &BTreeMap<String, u32>) -> Option<u32> {
        let deps = self.get_direct_dependencies(node);
        if deps.is_empty() {
            return Some(0);
        }

        deps.iter()
            .try_fold(0u32, |max, dep| weights.get(dep).map(|w| max.max(*w)))
            .map(|max| max + 1)
    }
}
