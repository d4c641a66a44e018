//! Dependency graph with a deterministic topological sort
//!
//! Nodes are ordered values (page kinds in practice). An edge `a -> b` means
//! `a` must come before `b`. [`DependencyGraph::toposort`] uses Kahn's
//! algorithm and always picks the smallest ready node first, so the same
//! graph yields the same order on every run.

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt::Debug,
};

use crate::error::ApiError;

/// Nodes left over when the graph contains a cycle
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("dependency cycle detected among {remaining}")]
pub struct CycleDetected {
    pub remaining: String,
}

impl From<CycleDetected> for ApiError {
    fn from(err: CycleDetected) -> Self {
        ApiError::Dependency(err.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct DependencyGraph<N: Ord + Copy + Debug> {
    nodes: BTreeSet<N>,
    // node -> nodes that must precede it
    requires: BTreeMap<N, BTreeSet<N>>,
}

impl<N: Ord + Copy + Debug> Default for DependencyGraph<N> {
    fn default() -> Self {
        Self {
            nodes: BTreeSet::new(),
            requires: BTreeMap::new(),
        }
    }
}

impl<N: Ord + Copy + Debug> DependencyGraph<N> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, node: N) {
        self.nodes.insert(node);
    }

    /// Record that `before` must be handled before `after`
    pub fn add_edge(&mut self, before: N, after: N) {
        self.nodes.insert(before);
        self.nodes.insert(after);
        self.requires.entry(after).or_default().insert(before);
    }

    pub fn contains(&self, node: N) -> bool {
        self.nodes.contains(&node)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every node, dependencies before dependents
    pub fn toposort(&self) -> Result<Vec<N>, CycleDetected> {
        let mut pending: BTreeMap<N, usize> = self
            .nodes
            .iter()
            .map(|n| (*n, self.requires.get(n).map_or(0, BTreeSet::len)))
            .collect();

        let mut ready: BTreeSet<N> = pending
            .iter()
            .filter(|(_, count)| **count == 0)
            .map(|(n, _)| *n)
            .collect();
        let mut order = Vec::with_capacity(self.nodes.len());

        while let Some(node) = ready.pop_first() {
            pending.remove(&node);
            order.push(node);
            for (dependent, before) in &self.requires {
                if before.contains(&node)
                    && let Some(count) = pending.get_mut(dependent)
                {
                    *count -= 1;
                    if *count == 0 {
                        ready.insert(*dependent);
                    }
                }
            }
        }

        if pending.is_empty() {
            Ok(order)
        } else {
            Err(CycleDetected {
                remaining: format!("{:?}", pending.keys().collect::<Vec<_>>()),
            })
        }
    }
}
