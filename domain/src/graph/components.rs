//! Strongly connected components and simple-cycle enumeration

use super::directed::DirectedGraph;
use super::error::GraphError;
use indexmap::{IndexMap, IndexSet};
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

impl<T: Clone + Eq + Hash> DirectedGraph<T> {
    /// Kosaraju's algorithm.
    ///
    /// Pass one records DFS finishing order on the graph; pass two runs DFS
    /// on the transpose in reverse finishing order, and every tree of the
    /// second pass is one component. Nodes not on any cycle come back as
    /// singleton components.
    pub fn strongly_connected_components(&self) -> Vec<Vec<T>> {
        let mut visited: HashSet<&T> = HashSet::with_capacity(self.node_count());
        let mut finished: Vec<&T> = Vec::with_capacity(self.node_count());

        for start in self.outgoing.keys() {
            if !visited.insert(start) {
                continue;
            }
            let mut stack: Vec<(&T, usize)> = vec![(start, 0)];
            while let Some(&(node, next)) = stack.last() {
                match self.outgoing.get(node).and_then(|s| s.get_index(next)) {
                    Some(successor) => {
                        if let Some(top) = stack.last_mut() {
                            top.1 += 1;
                        }
                        if visited.insert(successor) {
                            stack.push((successor, 0));
                        }
                    }
                    None => {
                        finished.push(node);
                        stack.pop();
                    }
                }
            }
        }

        let mut assigned: HashSet<&T> = HashSet::with_capacity(self.node_count());
        let mut components = Vec::new();

        for &root in finished.iter().rev() {
            if !assigned.insert(root) {
                continue;
            }
            let mut component = vec![root.clone()];
            let mut stack = vec![root];
            while let Some(node) = stack.pop() {
                for predecessor in self.incoming_edges(node) {
                    if assigned.insert(predecessor) {
                        component.push(predecessor.clone());
                        stack.push(predecessor);
                    }
                }
            }
            components.push(component);
        }

        components
    }

    /// Every elementary cycle, each listed in edge order.
    ///
    /// Cycles are enumerated with Johnson's algorithm inside each component
    /// that can hold one: components with more than one node, plus single
    /// nodes carrying a self-loop.
    pub fn find_all_cycles(&self) -> Vec<Vec<T>> {
        let mut cycles = Vec::new();
        // Unbounded enumeration cannot hit the limit
        let _ = self.enumerate_cycles(usize::MAX, &mut cycles);
        cycles
    }

    /// Like [`find_all_cycles`](Self::find_all_cycles) but fails once more
    /// than `limit` cycles have been found instead of enumerating further.
    pub fn find_cycles_bounded(&self, limit: usize) -> Result<Vec<Vec<T>>, GraphError> {
        let mut cycles = Vec::new();
        self.enumerate_cycles(limit, &mut cycles)?;
        Ok(cycles)
    }

    /// One cycle in edge order, if the graph has any.
    ///
    /// Cheaper than full enumeration: the first cyclic component is closed
    /// with a BFS path back to its first node.
    pub fn find_cycle(&self) -> Option<Vec<T>> {
        self.strongly_connected_components()
            .into_iter()
            .find_map(|component| {
                let start = component.first()?;
                if self.has_edge(start, start) {
                    return Some(vec![start.clone()]);
                }
                let next = self
                    .outgoing_edges(start)
                    .find(|n| component.contains(n))?;
                let mut cycle = vec![start.clone()];
                cycle.extend(self.shortest_path(next, start));
                cycle.pop();
                Some(cycle)
            })
    }

    fn enumerate_cycles(&self, limit: usize, cycles: &mut Vec<Vec<T>>) -> Result<(), GraphError> {
        for component in self.strongly_connected_components() {
            let cyclic = component.len() > 1
                || component.first().is_some_and(|n| self.has_edge(n, n));
            if !cyclic {
                continue;
            }

            let johnson = Johnson::new(self, &component);
            johnson.circuits(limit, cycles, |indices| {
                indices.iter().map(|&i| component[i].clone()).collect()
            })?;
        }
        Ok(())
    }
}

/// Johnson's circuit enumeration over one strongly connected component,
/// working on dense indices.
struct Johnson {
    adjacency: Vec<Vec<usize>>,
}

impl Johnson {
    fn new<T: Clone + Eq + Hash>(graph: &DirectedGraph<T>, component: &[T]) -> Self {
        let index: HashMap<&T, usize> = component.iter().enumerate().map(|(i, n)| (n, i)).collect();
        let adjacency = component
            .iter()
            .map(|node| {
                graph
                    .outgoing_edges(node)
                    .filter_map(|target| index.get(target).copied())
                    .collect()
            })
            .collect();
        Self { adjacency }
    }

    /// For each start `s`, search circuits through nodes `>= s` that stay
    /// inside the strongly connected piece containing `s`.
    fn circuits<T>(
        &self,
        limit: usize,
        out: &mut Vec<Vec<T>>,
        to_nodes: impl Fn(&[usize]) -> Vec<T>,
    ) -> Result<(), GraphError> {
        for start in 0..self.adjacency.len() {
            let allowed = self.component_of(start);
            if allowed.len() == 1 && !self.adjacency[start].contains(&start) {
                continue;
            }

            let neighbors = |node: usize| -> Vec<usize> {
                self.adjacency[node]
                    .iter()
                    .copied()
                    .filter(|n| allowed.contains(n))
                    .collect()
            };

            let mut blocked: IndexSet<usize> = IndexSet::new();
            let mut block_map: IndexMap<usize, IndexSet<usize>> = IndexMap::new();
            let mut path = vec![start];
            let mut stack = vec![(start, neighbors(start))];
            let mut closed = vec![false];
            blocked.insert(start);

            while let Some((node, pending)) = stack.last_mut() {
                let node = *node;
                if let Some(next) = pending.pop() {
                    if next == start {
                        if out.len() >= limit {
                            return Err(GraphError::LimitExceeded {
                                what: "cycle enumeration",
                                limit,
                            });
                        }
                        out.push(to_nodes(&path));
                        if let Some(flag) = closed.last_mut() {
                            *flag = true;
                        }
                    } else if !blocked.contains(&next) {
                        path.push(next);
                        stack.push((next, neighbors(next)));
                        closed.push(false);
                        blocked.insert(next);
                        continue;
                    }
                    continue;
                }

                stack.pop();
                path.pop();
                if closed.pop().unwrap_or(false) {
                    if let Some(flag) = closed.last_mut() {
                        *flag = true;
                    }
                    Self::unblock(node, &mut blocked, &mut block_map);
                } else {
                    for target in neighbors(node) {
                        block_map.entry(target).or_default().insert(node);
                    }
                }
            }
        }
        Ok(())
    }

    fn unblock(node: usize, blocked: &mut IndexSet<usize>, block_map: &mut IndexMap<usize, IndexSet<usize>>) {
        let mut pending = vec![node];
        while let Some(current) = pending.pop() {
            if blocked.swap_remove(&current)
                && let Some(waiting) = block_map.get_mut(&current)
            {
                pending.extend(waiting.drain(..));
            }
        }
    }

    /// Nodes `>= start` that are both reachable from `start` and can reach
    /// it, using only nodes `>= start`.
    fn component_of(&self, start: usize) -> HashSet<usize> {
        let forward = self.reach(start, |n| self.adjacency[n].clone());
        let backward = self.reach(start, |n| {
            (start..self.adjacency.len())
                .filter(|&m| self.adjacency[m].contains(&n))
                .collect()
        });
        forward.intersection(&backward).copied().collect()
    }

    fn reach(&self, start: usize, next: impl Fn(usize) -> Vec<usize>) -> HashSet<usize> {
        let mut seen = HashSet::from([start]);
        let mut stack = vec![start];
        while let Some(node) = stack.pop() {
            for n in next(node) {
                if n >= start && seen.insert(n) {
                    stack.push(n);
                }
            }
        }
        seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalize(mut cycles: Vec<Vec<&'static str>>) -> Vec<Vec<&'static str>> {
        // Rotate each cycle to start at its smallest node, then sort
        for cycle in &mut cycles {
            if let Some(min_pos) = cycle
                .iter()
                .enumerate()
                .min_by_key(|(_, n)| **n)
                .map(|(i, _)| i)
            {
                cycle.rotate_left(min_pos);
            }
        }
        cycles.sort();
        cycles
    }

    fn sorted_components(graph: &DirectedGraph<&'static str>) -> Vec<Vec<&'static str>> {
        let mut components: Vec<_> = graph
            .strongly_connected_components()
            .into_iter()
            .map(|mut c| {
                c.sort();
                c
            })
            .collect();
        components.sort();
        components
    }

    #[test]
    fn test_scc_on_dag_is_all_singletons() {
        let graph: DirectedGraph<_> = [("a", "b"), ("b", "c")].into_iter().collect();
        assert_eq!(sorted_components(&graph), vec![vec!["a"], vec!["b"], vec!["c"]]);
    }

    #[test]
    fn test_scc_groups_cycles() {
        let graph: DirectedGraph<_> = [
            ("a", "b"),
            ("b", "c"),
            ("c", "a"),
            ("c", "d"),
            ("d", "e"),
            ("e", "d"),
            ("e", "f"),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            sorted_components(&graph),
            vec![vec!["a", "b", "c"], vec!["d", "e"], vec!["f"]]
        );
    }

    #[test]
    fn test_find_all_cycles_on_dag_is_empty() {
        let graph: DirectedGraph<_> = [("a", "b"), ("a", "c"), ("b", "c")].into_iter().collect();
        assert!(graph.find_all_cycles().is_empty());
        assert!(!graph.has_cycles());
    }

    #[test]
    fn test_find_all_cycles_simple() {
        let graph: DirectedGraph<_> = [("a", "b"), ("b", "a"), ("b", "c")].into_iter().collect();
        assert_eq!(normalize(graph.find_all_cycles()), vec![vec!["a", "b"]]);
    }

    #[test]
    fn test_find_all_cycles_overlapping() {
        // Two triangles sharing the a->b edge plus a 2-cycle
        let graph: DirectedGraph<_> = [
            ("a", "b"),
            ("b", "c"),
            ("c", "a"),
            ("b", "d"),
            ("d", "a"),
            ("c", "b"),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            normalize(graph.find_all_cycles()),
            vec![vec!["a", "b", "c"], vec!["a", "b", "d"], vec!["b", "c"]]
        );
    }

    #[test]
    fn test_complete_graph_cycle_count() {
        // K4 has 20 elementary cycles: 6 of length 2, 8 of length 3, 6 of length 4
        let nodes = ["a", "b", "c", "d"];
        let mut graph = DirectedGraph::new();
        for from in nodes {
            for to in nodes {
                if from != to {
                    graph.add_edge(from, to);
                }
            }
        }
        let cycles = graph.find_all_cycles();
        assert_eq!(cycles.len(), 20);
        for cycle in &cycles {
            for i in 0..cycle.len() {
                assert!(graph.has_edge(&cycle[i], &cycle[(i + 1) % cycle.len()]));
            }
        }
    }

    #[test]
    fn test_find_cycle_in_edge_order() {
        let graph: DirectedGraph<_> = [("x", "a"), ("a", "b"), ("b", "c"), ("c", "a")]
            .into_iter()
            .collect();
        let cycle = graph.find_cycle().unwrap();
        assert_eq!(cycle.len(), 3);
        for i in 0..cycle.len() {
            assert!(graph.has_edge(&cycle[i], &cycle[(i + 1) % cycle.len()]));
        }

        let dag: DirectedGraph<_> = [("a", "b"), ("b", "c")].into_iter().collect();
        assert_eq!(dag.find_cycle(), None);

        let looped: DirectedGraph<_> = [("a", "a")].into_iter().collect();
        assert_eq!(looped.find_cycle(), Some(vec!["a"]));
    }

    #[test]
    fn test_self_loop_cycle() {
        let mut graph: DirectedGraph<_> = [("a", "b")].into_iter().collect();
        graph.add_edge("b", "b");
        assert_eq!(graph.find_all_cycles(), vec![vec!["b"]]);
        assert!(graph.has_cycles());
    }

    #[test]
    fn test_has_cycles_agrees_with_find_all_cycles() {
        let graphs: Vec<DirectedGraph<&'static str>> = vec![
            [("a", "b")].into_iter().collect(),
            [("a", "b"), ("b", "a")].into_iter().collect(),
            [("a", "a")].into_iter().collect(),
            [("a", "b"), ("b", "c"), ("c", "d"), ("d", "b")].into_iter().collect(),
            DirectedGraph::new(),
        ];
        for graph in graphs {
            assert_eq!(graph.has_cycles(), !graph.find_all_cycles().is_empty());
        }
    }

    #[test]
    fn test_bounded_enumeration_fails_fast() {
        let nodes = ["a", "b", "c", "d"];
        let mut graph = DirectedGraph::new();
        for from in nodes {
            for to in nodes {
                if from != to {
                    graph.add_edge(from, to);
                }
            }
        }
        let err = graph.find_cycles_bounded(5).unwrap_err();
        assert_eq!(
            err,
            GraphError::LimitExceeded {
                what: "cycle enumeration",
                limit: 5
            }
        );
        assert_eq!(graph.find_cycles_bounded(20).unwrap().len(), 20);
    }
}
