use std::collections::HashMap;

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;

use crate::error::StackError;

/// The dependency DAG over a stack's logical names. Edges point from a
/// dependency to its dependent, so a topological order of the graph is a
/// valid apply order for the reconciliation engine.
#[derive(Debug, Default)]
pub struct StackGraph {
    graph: DiGraph<String, ()>,
    index: HashMap<String, NodeIndex>,
}

impl StackGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, name: &str) -> Result<(), StackError> {
        if self.index.contains_key(name) {
            return Err(StackError::DuplicateResource {
                name: name.to_string(),
            });
        }
        let idx = self.graph.add_node(name.to_string());
        self.index.insert(name.to_string(), idx);
        Ok(())
    }

    /// Record that `dependent` cannot be provisioned until `dependency` is.
    /// Both names must already be declared.
    pub fn add_edge(&mut self, dependency: &str, dependent: &str) -> Result<(), StackError> {
        let from = self.lookup(dependency)?;
        let to = self.lookup(dependent)?;
        self.graph.update_edge(from, to, ());
        Ok(())
    }

    fn lookup(&self, name: &str) -> Result<NodeIndex, StackError> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| StackError::UnresolvedReference {
                reference: name.to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// A valid order in which the engine may apply the declared resources.
    /// Independent branches may still be provisioned concurrently; only the
    /// relative order of dependent pairs is binding.
    pub fn apply_order(&self) -> Result<Vec<String>, StackError> {
        let order = toposort(&self.graph, None).map_err(|cycle| StackError::DependencyCycle {
            node: self.graph[cycle.node_id()].clone(),
        })?;
        Ok(order.into_iter().map(|i| self.graph[i].clone()).collect())
    }

    pub fn dependencies_of(&self, name: &str) -> Result<Vec<String>, StackError> {
        let idx = self.lookup(name)?;
        let mut out: Vec<String> = self
            .graph
            .neighbors_directed(idx, Direction::Incoming)
            .map(|i| self.graph[i].clone())
            .collect();
        out.sort();
        Ok(out)
    }

    pub fn dependents_of(&self, name: &str) -> Result<Vec<String>, StackError> {
        let idx = self.lookup(name)?;
        let mut out: Vec<String> = self
            .graph
            .neighbors_directed(idx, Direction::Outgoing)
            .map(|i| self.graph[i].clone())
            .collect();
        out.sort();
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> StackGraph {
        let mut g = StackGraph::new();
        for name in ["cert", "record", "completion"] {
            g.add_node(name).unwrap();
        }
        g.add_edge("cert", "record").unwrap();
        g.add_edge("record", "completion").unwrap();
        g
    }

    #[test]
    fn apply_order_respects_edges() {
        let order = chain().apply_order().unwrap();
        let pos = |n: &str| order.iter().position(|x| x == n).unwrap();
        assert!(pos("cert") < pos("record"));
        assert!(pos("record") < pos("completion"));
    }

    #[test]
    fn cycle_is_fatal() {
        let mut g = chain();
        g.add_edge("completion", "cert").unwrap();
        assert!(matches!(
            g.apply_order(),
            Err(StackError::DependencyCycle { .. })
        ));
    }

    #[test]
    fn edge_to_undeclared_node_is_unresolved() {
        let mut g = chain();
        let err = g.add_edge("cert", "ghost").unwrap_err();
        assert!(matches!(err, StackError::UnresolvedReference { ref reference } if reference == "ghost"));
    }

    #[test]
    fn duplicate_node_is_rejected() {
        let mut g = chain();
        assert!(matches!(
            g.add_node("cert"),
            Err(StackError::DuplicateResource { .. })
        ));
    }

    #[test]
    fn dependency_queries_are_order_independent() {
        let g = chain();
        assert_eq!(g.dependencies_of("record").unwrap(), vec!["cert"]);
        assert_eq!(g.dependents_of("record").unwrap(), vec!["completion"]);
        assert!(g.dependencies_of("cert").unwrap().is_empty());
    }
}
