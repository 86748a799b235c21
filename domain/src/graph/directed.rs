//! Directed graph storage and traversal primitives

use indexmap::{IndexMap, IndexSet};
use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

/// A mutable directed graph over opaque node identifiers.
///
/// Both adjacency directions are kept so that "what does this node depend on"
/// (incoming) and "what depends on this node" (outgoing) are equally cheap.
/// Adjacency is insertion-ordered, which makes every traversal deterministic
/// for a given construction sequence.
///
/// In the tool domain an edge `a -> b` means *`b` depends on `a`*, so
/// dependencies always sit on the incoming side of their dependents.
#[derive(Debug, Clone)]
pub struct DirectedGraph<T> {
    pub(crate) outgoing: IndexMap<T, IndexSet<T>>,
    pub(crate) incoming: IndexMap<T, IndexSet<T>>,
    metadata: IndexMap<String, String>,
}

impl<T> Default for DirectedGraph<T> {
    fn default() -> Self {
        Self {
            outgoing: IndexMap::new(),
            incoming: IndexMap::new(),
            metadata: IndexMap::new(),
        }
    }
}

impl<T: Clone + Eq + Hash> DirectedGraph<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node. Adding an existing node is a no-op.
    pub fn add_node(&mut self, node: T) {
        if !self.outgoing.contains_key(&node) {
            self.outgoing.insert(node.clone(), IndexSet::new());
            self.incoming.insert(node, IndexSet::new());
        }
    }

    /// Add an edge, implicitly adding both endpoints. Idempotent.
    pub fn add_edge(&mut self, from: T, to: T) {
        self.add_node(from.clone());
        self.add_node(to.clone());
        if let Some(targets) = self.outgoing.get_mut(&from) {
            targets.insert(to.clone());
        }
        if let Some(sources) = self.incoming.get_mut(&to) {
            sources.insert(from);
        }
    }

    /// Remove a node and every edge touching it. Unknown nodes are ignored.
    pub fn remove_node(&mut self, node: &T) {
        let Some(targets) = self.outgoing.shift_remove(node) else {
            return;
        };
        let sources = self.incoming.shift_remove(node).unwrap_or_default();

        for target in &targets {
            if let Some(set) = self.incoming.get_mut(target) {
                set.shift_remove(node);
            }
        }
        for source in &sources {
            if let Some(set) = self.outgoing.get_mut(source) {
                set.shift_remove(node);
            }
        }
    }

    /// Remove a single edge. Missing edges are ignored; endpoints stay.
    pub fn remove_edge(&mut self, from: &T, to: &T) {
        if let Some(targets) = self.outgoing.get_mut(from) {
            targets.shift_remove(to);
        }
        if let Some(sources) = self.incoming.get_mut(to) {
            sources.shift_remove(from);
        }
    }

    pub fn contains_node(&self, node: &T) -> bool {
        self.outgoing.contains_key(node)
    }

    pub fn has_edge(&self, from: &T, to: &T) -> bool {
        self.outgoing
            .get(from)
            .is_some_and(|targets| targets.contains(to))
    }

    pub fn node_count(&self) -> usize {
        self.outgoing.len()
    }

    pub fn edge_count(&self) -> usize {
        self.outgoing.values().map(|targets| targets.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.outgoing.is_empty()
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &T> {
        self.outgoing.keys()
    }

    /// Edges as `(from, to)` pairs, grouped by source in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (&T, &T)> {
        self.outgoing
            .iter()
            .flat_map(|(from, targets)| targets.iter().map(move |to| (from, to)))
    }

    /// Successors of `node`. Empty for unknown nodes.
    pub fn outgoing_edges<'a>(&'a self, node: &T) -> impl Iterator<Item = &'a T> + use<'a, T> {
        self.outgoing.get(node).into_iter().flatten()
    }

    /// Predecessors of `node`. Empty for unknown nodes.
    pub fn incoming_edges<'a>(&'a self, node: &T) -> impl Iterator<Item = &'a T> + use<'a, T> {
        self.incoming.get(node).into_iter().flatten()
    }

    pub fn out_degree(&self, node: &T) -> usize {
        self.outgoing.get(node).map_or(0, |s| s.len())
    }

    pub fn in_degree(&self, node: &T) -> usize {
        self.incoming.get(node).map_or(0, |s| s.len())
    }

    /// Nodes without predecessors.
    pub fn roots(&self) -> Vec<T> {
        self.incoming
            .iter()
            .filter(|(_, sources)| sources.is_empty())
            .map(|(node, _)| node.clone())
            .collect()
    }

    /// Nodes without successors.
    pub fn leaves(&self) -> Vec<T> {
        self.outgoing
            .iter()
            .filter(|(_, targets)| targets.is_empty())
            .map(|(node, _)| node.clone())
            .collect()
    }

    pub fn set_metadata(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.metadata.insert(key.into(), value.into());
    }

    pub fn metadata(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(|s| s.as_str())
    }

    /// The same nodes with every edge reversed.
    pub fn transpose(&self) -> Self {
        Self {
            outgoing: self.incoming.clone(),
            incoming: self.outgoing.clone(),
            metadata: self.metadata.clone(),
        }
    }

    /// Induced subgraph over exactly `nodes`.
    ///
    /// Nodes unknown to this graph are still added (isolated); only edges
    /// with both endpoints in `nodes` are kept. Node order follows `nodes`.
    pub fn subgraph_with_nodes<'a>(&self, nodes: impl IntoIterator<Item = &'a T>) -> Self
    where
        T: 'a,
    {
        let keep: IndexSet<T> = nodes.into_iter().cloned().collect();
        let mut sub = Self::new();
        for node in &keep {
            sub.add_node(node.clone());
        }
        for node in &keep {
            for target in self.outgoing_edges(node) {
                if keep.contains(target) {
                    sub.add_edge(node.clone(), target.clone());
                }
            }
        }
        sub
    }

    /// Every node reachable from `node` by following outgoing edges.
    ///
    /// `node` itself is only included when a cycle leads back to it.
    pub fn transitive_closure(&self, node: &T) -> IndexSet<T> {
        Self::bfs_reachable(std::iter::once(node), &self.outgoing)
    }

    /// Union of [`transitive_closure`](Self::transitive_closure) over `nodes`.
    pub fn transitive_closure_of<'a>(&self, nodes: impl IntoIterator<Item = &'a T>) -> IndexSet<T>
    where
        T: 'a,
    {
        Self::bfs_reachable(nodes, &self.outgoing)
    }

    /// Every node that can reach `node`, i.e. the closure over incoming edges.
    pub fn reverse_transitive_closure(&self, node: &T) -> IndexSet<T> {
        Self::bfs_reachable(std::iter::once(node), &self.incoming)
    }

    /// Union of [`reverse_transitive_closure`](Self::reverse_transitive_closure) over `nodes`.
    pub fn reverse_transitive_closure_of<'a>(
        &self,
        nodes: impl IntoIterator<Item = &'a T>,
    ) -> IndexSet<T>
    where
        T: 'a,
    {
        Self::bfs_reachable(nodes, &self.incoming)
    }

    fn bfs_reachable<'a>(
        starts: impl IntoIterator<Item = &'a T>,
        adjacency: &IndexMap<T, IndexSet<T>>,
    ) -> IndexSet<T>
    where
        T: 'a,
    {
        let mut reached = IndexSet::new();
        let mut queue: VecDeque<&T> = VecDeque::new();
        for start in starts {
            queue.push_back(start);
        }

        while let Some(current) = queue.pop_front() {
            for neighbor in adjacency.get(current).into_iter().flatten() {
                if reached.insert(neighbor.clone()) {
                    queue.push_back(neighbor);
                }
            }
        }
        reached
    }

    /// Fewest-hop path from `from` to `to` over outgoing edges.
    ///
    /// Returns `[from]` when `from == to` and an empty path when `to` is
    /// unreachable.
    pub fn shortest_path(&self, from: &T, to: &T) -> Vec<T> {
        if from == to {
            return vec![from.clone()];
        }
        if !self.contains_node(from) || !self.contains_node(to) {
            return Vec::new();
        }

        let mut predecessor: HashMap<&T, &T> = HashMap::new();
        let mut queue = VecDeque::from([from]);

        while let Some(current) = queue.pop_front() {
            for neighbor in self.outgoing_edges(current) {
                if neighbor == from || predecessor.contains_key(neighbor) {
                    continue;
                }
                predecessor.insert(neighbor, current);
                if neighbor == to {
                    let mut path = vec![to.clone()];
                    let mut step = to;
                    while let Some(&prev) = predecessor.get(step) {
                        path.push(prev.clone());
                        step = prev;
                    }
                    path.reverse();
                    return path;
                }
                queue.push_back(neighbor);
            }
        }

        Vec::new()
    }
}

impl<T: Clone + Eq + Hash> FromIterator<(T, T)> for DirectedGraph<T> {
    fn from_iter<I: IntoIterator<Item = (T, T)>>(edges: I) -> Self {
        let mut graph = Self::new();
        for (from, to) in edges {
            graph.add_edge(from, to);
        }
        graph
    }
}
