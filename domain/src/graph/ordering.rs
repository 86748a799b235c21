//! Topological ordering and cycle checks
//!
//! Both sorts emit dependencies (sources of incoming edges) before their
//! dependents. The DFS variant runs on an explicit stack so long dependency
//! chains cannot overflow the thread stack.

use super::directed::DirectedGraph;
use super::error::GraphError;
use std::collections::{HashMap, VecDeque};
use std::fmt::Debug;
use std::hash::Hash;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    /// On the active DFS path
    Temporary,
    /// Emitted
    Permanent,
}

impl<T: Clone + Eq + Hash + Debug> DirectedGraph<T> {
    /// Depth-first topological sort.
    ///
    /// Each node's incoming edges are visited before the node is emitted, so
    /// the result lists dependencies first and dependents last. Fails with
    /// [`GraphError::CycleDetected`] naming the cycle (in edge order) when a
    /// node is reached again while still on the active path.
    pub fn topological_sort(&self) -> Result<Vec<T>, GraphError> {
        let mut marks: HashMap<&T, Mark> = HashMap::with_capacity(self.node_count());
        let mut order = Vec::with_capacity(self.node_count());

        for start in self.incoming.keys() {
            if marks.contains_key(start) {
                continue;
            }

            // (node, index of the next predecessor to visit)
            let mut stack: Vec<(&T, usize)> = vec![(start, 0)];
            marks.insert(start, Mark::Temporary);

            while let Some(&(node, next)) = stack.last() {
                let predecessor = self
                    .incoming
                    .get(node)
                    .and_then(|preds| preds.get_index(next));

                let Some(predecessor) = predecessor else {
                    marks.insert(node, Mark::Permanent);
                    order.push(node.clone());
                    stack.pop();
                    continue;
                };

                if let Some(top) = stack.last_mut() {
                    top.1 += 1;
                }

                match marks.get(predecessor) {
                    Some(Mark::Permanent) => {}
                    Some(Mark::Temporary) => {
                        // The stack walks edges backwards; reverse the tail
                        // starting at `predecessor` to report edge order.
                        let position = stack
                            .iter()
                            .position(|(n, _)| *n == predecessor)
                            .unwrap_or(0);
                        return Err(GraphError::cycle(
                            stack[position..].iter().rev().map(|(n, _)| *n),
                        ));
                    }
                    None => {
                        marks.insert(predecessor, Mark::Temporary);
                        stack.push((predecessor, 0));
                    }
                }
            }
        }

        Ok(order)
    }

    /// Kahn's algorithm over a copy of the in-degree counts.
    ///
    /// Ready nodes are consumed in insertion order. The result is a valid
    /// topological order but is not guaranteed to match
    /// [`topological_sort`](Self::topological_sort) tie for tie.
    pub fn topological_sort_kahn(&self) -> Result<Vec<T>, GraphError> {
        let mut in_degree: HashMap<&T, usize> = self
            .incoming
            .iter()
            .map(|(node, preds)| (node, preds.len()))
            .collect();

        let mut ready: VecDeque<&T> = self
            .incoming
            .iter()
            .filter(|(_, preds)| preds.is_empty())
            .map(|(node, _)| node)
            .collect();

        let mut order = Vec::with_capacity(self.node_count());

        while let Some(node) = ready.pop_front() {
            order.push(node.clone());
            for successor in self.outgoing_edges(node) {
                if let Some(degree) = in_degree.get_mut(successor) {
                    *degree -= 1;
                    if *degree == 0 {
                        ready.push_back(successor);
                    }
                }
            }
        }

        if order.len() < self.node_count() {
            let unsorted = self
                .incoming
                .keys()
                .filter(|node| in_degree.get(node).is_some_and(|d| *d > 0));
            return Err(GraphError::cycle(unsorted));
        }

        Ok(order)
    }

    /// True iff [`topological_sort`](Self::topological_sort) would fail.
    pub fn has_cycles(&self) -> bool {
        self.topological_sort().is_err()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn assert_respects_edges(graph: &DirectedGraph<&'static str>, order: &[&'static str]) {
        let position: HashMap<_, _> = order.iter().enumerate().map(|(i, n)| (*n, i)).collect();
        assert_eq!(position.len(), graph.node_count());
        for (from, to) in graph.edges() {
            assert!(
                position[from] < position[to],
                "{} must come before {} in {:?}",
                from,
                to,
                order
            );
        }
    }

    fn diamond() -> DirectedGraph<&'static str> {
        [("a", "b"), ("a", "c"), ("b", "d"), ("c", "d")]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_dfs_sort_puts_dependencies_first() {
        let graph: DirectedGraph<_> = [("a", "b"), ("b", "c")].into_iter().collect();
        assert_eq!(graph.topological_sort().unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_dfs_sort_starting_from_dependent() {
        // Insert the dependent first so the DFS has to walk back to the root
        let mut graph = DirectedGraph::new();
        graph.add_node("c");
        graph.add_edge("b", "c");
        graph.add_edge("a", "b");

        assert_eq!(graph.topological_sort().unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_both_sorts_respect_every_edge() {
        let mut graph = diamond();
        graph.add_edge("d", "e");
        graph.add_edge("x", "c");
        graph.add_node("isolated");

        assert_respects_edges(&graph, &graph.topological_sort().unwrap());
        assert_respects_edges(&graph, &graph.topological_sort_kahn().unwrap());
    }

    #[test]
    fn test_kahn_uses_insertion_order_for_ties() {
        let graph = diamond();
        assert_eq!(graph.topological_sort_kahn().unwrap(), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_two_node_cycle_detected() {
        let graph: DirectedGraph<_> = [("a", "b"), ("b", "a")].into_iter().collect();

        let err = graph.topological_sort().unwrap_err();
        match err {
            GraphError::CycleDetected { nodes } => {
                assert_eq!(nodes.len(), 2);
                assert!(nodes.contains(&"\"a\"".to_string()));
                assert!(nodes.contains(&"\"b\"".to_string()));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(graph.topological_sort_kahn().unwrap_err().is_cycle());
        assert!(graph.has_cycles());
    }

    #[test]
    fn test_cycle_reported_in_edge_order() {
        let graph: DirectedGraph<_> = [("a", "b"), ("b", "c"), ("c", "a")].into_iter().collect();

        let GraphError::CycleDetected { nodes } = graph.topological_sort().unwrap_err() else {
            panic!("expected cycle");
        };
        // Every consecutive pair (wrapping) must be an edge
        for i in 0..nodes.len() {
            let from = nodes[i].trim_matches('"');
            let to = nodes[(i + 1) % nodes.len()].trim_matches('"');
            let from = ["a", "b", "c"].into_iter().find(|n| *n == from).unwrap();
            let to = ["a", "b", "c"].into_iter().find(|n| *n == to).unwrap();
            assert!(graph.has_edge(&from, &to), "{from} -> {to} is not an edge");
        }
    }

    #[test]
    fn test_self_loop_is_a_cycle() {
        let graph: DirectedGraph<_> = [("a", "a")].into_iter().collect();
        assert!(graph.has_cycles());
        assert!(graph.topological_sort_kahn().is_err());
    }

    #[test]
    fn test_kahn_reports_unsorted_nodes() {
        let graph: DirectedGraph<_> = [("root", "a"), ("a", "b"), ("b", "a"), ("b", "tail")]
            .into_iter()
            .collect();

        let GraphError::CycleDetected { nodes } = graph.topological_sort_kahn().unwrap_err() else {
            panic!("expected cycle");
        };
        assert!(!nodes.contains(&"\"root\"".to_string()));
        assert!(nodes.contains(&"\"a\"".to_string()));
        assert!(nodes.contains(&"\"tail\"".to_string()));
    }

    #[test]
    fn test_empty_graph_sorts_to_nothing() {
        let graph: DirectedGraph<u32> = DirectedGraph::new();
        assert!(graph.topological_sort().unwrap().is_empty());
        assert!(graph.topological_sort_kahn().unwrap().is_empty());
        assert!(!graph.has_cycles());
    }

    #[test]
    fn test_deep_chain_does_not_overflow() {
        let graph: DirectedGraph<u32> = (0..100_000u32).map(|i| (i, i + 1)).collect();
        let order = graph.topological_sort().unwrap();
        assert_eq!(order.len(), 100_001);
        assert_eq!(order[0], 0);
        assert_eq!(order[100_000], 100_000);
    }
}
