//! Max-flow via Edmonds-Karp on an explicit residual graph.

use std::collections::VecDeque;

use super::Network;
use crate::error::{SolveError, SolveResult};

/// An edge in the residual graph. Edges are always added in `(forward,
/// reverse)` pairs at consecutive indices, so an edge's twin is always at
/// `index ^ 1` (a standard max-flow arena trick, avoiding a parallel
/// `HashMap` lookup per pivot).
struct ResidualEdge {
    to: usize,
    capacity: i64,
}

struct ResidualGraph {
    adjacency: Vec<Vec<usize>>,
    edges: Vec<ResidualEdge>,
}

impl ResidualGraph {
    fn from_network(network: &Network) -> Self {
        let mut graph = Self {
            adjacency: vec![Vec::new(); network.n_nodes()],
            edges: Vec::new(),
        };
        for &(from, to, capacity) in network.edges() {
            graph.add_edge(from, to, capacity as i64);
        }
        graph
    }

    fn add_edge(&mut self, from: usize, to: usize, capacity: i64) {
        let forward = self.edges.len();
        self.edges.push(ResidualEdge { to, capacity });
        self.adjacency[from].push(forward);

        let reverse = self.edges.len();
        self.edges.push(ResidualEdge {
            to: from,
            capacity: 0,
        });
        self.adjacency[to].push(reverse);
    }

    fn twin(edge: usize) -> usize {
        edge ^ 1
    }

    /// BFS from `source` to `sink` over edges with remaining capacity,
    /// using a FIFO queue so the path found is shortest by edge count
    /// (required for Edmonds-Karp's polynomial bound). Returns the path
    /// as a list of residual-edge indices, source to sink.
    fn find_augmenting_path(&self, source: usize, sink: usize) -> Option<Vec<usize>> {
        let n = self.adjacency.len();
        let mut visited = vec![false; n];
        let mut parent_node = vec![None; n];
        let mut parent_edge = vec![None; n];
        let mut queue = VecDeque::new();

        visited[source] = true;
        queue.push_back(source);

        while let Some(node) = queue.pop_front() {
            if node == sink {
                break;
            }
            for &edge_index in &self.adjacency[node] {
                let edge = &self.edges[edge_index];
                if edge.capacity > 0 && !visited[edge.to] {
                    visited[edge.to] = true;
                    parent_node[edge.to] = Some(node);
                    parent_edge[edge.to] = Some(edge_index);
                    queue.push_back(edge.to);
                }
            }
        }

        if !visited[sink] {
            return None;
        }

        let mut path = Vec::new();
        let mut node = sink;
        while node != source {
            let edge_index = parent_edge[node].expect("visited node has a parent edge");
            path.push(edge_index);
            node = parent_node[node].expect("visited node has a parent node");
        }
        path.reverse();
        Some(path)
    }

    /// Pushes the minimum residual capacity along `path`, decrementing
    /// each forward edge and incrementing each edge's twin. The twin's
    /// capacity accumulates rather than being overwritten, so a reverse
    /// edge used by an earlier augmentation still reflects all the flow
    /// pushed onto it so far.
    fn push_flow(&mut self, path: &[usize]) -> u64 {
        let flow = path
            .iter()
            .map(|&edge| self.edges[edge].capacity)
            .min()
            .expect("augmenting path is never empty");

        for &edge in path {
            self.edges[edge].capacity -= flow;
            let twin = Self::twin(edge);
            self.edges[twin].capacity += flow;
        }

        flow as u64
    }
}

/// Solves `network` for its maximum source-to-sink flow via Edmonds-Karp.
pub fn solve_edmonds_karp(network: &Network) -> SolveResult<u64> {
    if network.source() == network.sink() {
        return Err(SolveError::InvalidInput(
            "source and sink must be different nodes".into(),
        ));
    }

    let mut graph = ResidualGraph::from_network(network);
    let mut max_flow = 0u64;

    while let Some(path) = graph.find_augmenting_path(network.source(), network.sink()) {
        tracing::trace!(path_len = path.len(), "augmenting along path");
        max_flow += graph.push_flow(&path);
    }

    Ok(max_flow)
}
