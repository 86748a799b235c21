//! Weighted path and spanning-tree algorithms
//!
//! The graph stores no weights; callers pass a weight function per query.

use super::directed::DirectedGraph;
use super::error::GraphError;
use indexmap::{IndexMap, IndexSet};
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt::Debug;
use std::hash::Hash;

/// Result of a single-source shortest-path query.
#[derive(Debug, Clone)]
pub struct ShortestPaths<T: Eq + Hash> {
    source: T,
    distances: IndexMap<T, f64>,
    predecessors: IndexMap<T, T>,
}

impl<T: Clone + Eq + Hash> ShortestPaths<T> {
    pub fn source(&self) -> &T {
        &self.source
    }

    /// Distance to `node`, or `None` when unreachable.
    pub fn distance(&self, node: &T) -> Option<f64> {
        self.distances.get(node).copied()
    }

    /// Every reachable node with its distance, in settle order.
    pub fn distances(&self) -> &IndexMap<T, f64> {
        &self.distances
    }

    /// Path from the source to `node`, inclusive on both ends.
    pub fn path_to(&self, node: &T) -> Option<Vec<T>> {
        if !self.distances.contains_key(node) {
            return None;
        }
        let mut path = vec![node.clone()];
        let mut current = node;
        while let Some(prev) = self.predecessors.get(current) {
            path.push(prev.clone());
            current = prev;
        }
        path.reverse();
        Some(path)
    }
}

/// A weighted edge chosen by [`DirectedGraph::minimum_spanning_tree`].
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedEdge<T> {
    pub from: T,
    pub to: T,
    pub weight: f64,
}

/// Min-heap entry ordered by weight.
struct Candidate<'a, T> {
    cost: f64,
    node: &'a T,
    via: Option<&'a T>,
}

impl<T> PartialEq for Candidate<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        self.cost.total_cmp(&other.cost) == Ordering::Equal
    }
}

impl<T> Eq for Candidate<'_, T> {}

impl<T> PartialOrd for Candidate<'_, T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Candidate<'_, T> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for a min-heap
        other.cost.total_cmp(&self.cost)
    }
}

fn checked_weight<T: Debug>(from: &T, to: &T, weight: f64) -> Result<f64, GraphError> {
    if weight.is_nan() || weight < 0.0 {
        return Err(GraphError::InvalidWeight {
            from: format!("{:?}", from),
            to: format!("{:?}", to),
            weight,
        });
    }
    Ok(weight)
}

impl<T: Clone + Eq + Hash + Debug> DirectedGraph<T> {
    /// Dijkstra's algorithm over outgoing edges.
    ///
    /// Weights must be non-negative; a negative or NaN weight fails with
    /// [`GraphError::InvalidWeight`].
    pub fn shortest_paths_from_source(
        &self,
        source: &T,
        weight: impl Fn(&T, &T) -> f64,
    ) -> Result<ShortestPaths<T>, GraphError> {
        let mut distances: IndexMap<T, f64> = IndexMap::new();
        let mut predecessors: IndexMap<T, T> = IndexMap::new();
        let mut best: IndexMap<&T, f64> = IndexMap::new();
        let mut heap = BinaryHeap::new();

        if self.contains_node(source) {
            best.insert(source, 0.0);
            heap.push(Candidate {
                cost: 0.0,
                node: source,
                via: None,
            });
        }

        while let Some(Candidate { cost, node, via }) = heap.pop() {
            if distances.contains_key(node) {
                continue;
            }
            distances.insert(node.clone(), cost);
            if let Some(prev) = via {
                predecessors.insert(node.clone(), prev.clone());
            }

            for target in self.outgoing_edges(node) {
                if distances.contains_key(target) {
                    continue;
                }
                let next = cost + checked_weight(node, target, weight(node, target))?;
                if best.get(target).is_none_or(|&known| next < known) {
                    best.insert(target, next);
                    heap.push(Candidate {
                        cost: next,
                        node: target,
                        via: Some(node),
                    });
                }
            }
        }

        Ok(ShortestPaths {
            source: source.clone(),
            distances,
            predecessors,
        })
    }

    /// Prim's algorithm over the undirected view of the graph.
    ///
    /// Each directed edge contributes an undirected edge with
    /// `weight(from, to)`; when both directions exist the lighter one wins.
    /// Disconnected graphs yield a minimum spanning forest.
    pub fn minimum_spanning_tree(
        &self,
        weight: impl Fn(&T, &T) -> f64,
    ) -> Result<Vec<WeightedEdge<T>>, GraphError> {
        let mut neighbors: IndexMap<&T, Vec<(&T, f64)>> =
            self.nodes().map(|n| (n, Vec::new())).collect();
        for (from, to) in self.edges() {
            if from == to {
                continue;
            }
            let w = checked_weight(from, to, weight(from, to))?;
            if let Some(list) = neighbors.get_mut(from) {
                list.push((to, w));
            }
            if let Some(list) = neighbors.get_mut(to) {
                list.push((from, w));
            }
        }

        let mut in_tree: IndexSet<&T> = IndexSet::new();
        let mut tree = Vec::new();

        for root in self.nodes() {
            if in_tree.contains(root) {
                continue;
            }
            let mut heap = BinaryHeap::from([Candidate {
                cost: 0.0,
                node: root,
                via: None,
            }]);

            while let Some(Candidate { cost, node, via }) = heap.pop() {
                if !in_tree.insert(node) {
                    continue;
                }
                if let Some(prev) = via {
                    tree.push(WeightedEdge {
                        from: prev.clone(),
                        to: node.clone(),
                        weight: cost,
                    });
                }
                for &(next, w) in neighbors.get(node).into_iter().flatten() {
                    if !in_tree.contains(next) {
                        heap.push(Candidate {
                            cost: w,
                            node: next,
                            via: Some(node),
                        });
                    }
                }
            }
        }

        Ok(tree)
    }
}
