/// A weighted adjacency graph over districts in compressed sparse row format.
///
/// Edge weights are neighbour costs in `[0, 1]` (lower = longer shared border).
/// Each node's edges keep the order they were given in, which for district
/// data is ascending cost. Symmetry is not required.
#[derive(Clone, Debug, Default)]
pub(crate) struct Graph {
    size: usize,
    offsets: Vec<u32>,
    edges: Vec<u32>,
    edge_weights: Vec<f64>,
}

impl Graph {
    /// Construct a graph from adjacency lists and per-edge costs.
    pub(crate) fn new(num_nodes: usize, edges: &[Vec<u32>], edge_weights: &[Vec<f64>]) -> Self {
        assert!(edges.len() == num_nodes, "edges.len() must equal num_nodes");
        assert!(edge_weights.len() == num_nodes, "edge_weights.len() must equal num_nodes");
        edges.iter().zip(edge_weights.iter()).enumerate().for_each(|(i, (edges, weights))| {
            assert!(edges.len() == weights.len(), "edges[{i}].len() must equal edge_weights[{i}].len()");
        });

        Self {
            size: num_nodes,
            offsets: std::iter::once(0u32).chain(
                edges.iter()
                    .map(|v| v.len() as u32)
                    .scan(0u32, |acc, len| {*acc += len; Some(*acc)})
            ).collect::<Vec<u32>>(),
            edges: edges.iter().flatten().copied().collect(),
            edge_weights: edge_weights.iter().flatten().copied().collect(),
        }
    }

    /// Get the number of nodes in the graph.
    #[inline] pub(crate) fn node_count(&self) -> usize { self.size }

    /// Get the number of directed edge entries in the graph.
    #[inline] pub(crate) fn edge_count(&self) -> usize { self.edges.len() }

    /// Get the range of edges for a given node.
    #[inline]
    fn range(&self, node: usize) -> std::ops::Range<usize> {
        self.offsets[node] as usize .. self.offsets[node + 1] as usize
    }

    /// Get the degree (number of neighbors) of a given node.
    #[inline] pub(crate) fn degree(&self, node: usize) -> usize { self.range(node).len() }

    /// Get an iterator over the neighbors of a given node.
    #[inline]
    pub(crate) fn edges(&self, node: usize) -> impl Iterator<Item = usize> + '_ {
        self.range(node).map(move |v| self.edges[v] as usize)
    }

    /// Get an iterator over the neighbors and edge costs of a given node.
    #[inline]
    pub(crate) fn edges_with_weights(&self, node: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.range(node).map(move |v| (self.edges[v] as usize, self.edge_weights[v]))
    }

    /// Get the cost of the edge `u -> v`, if `v` is listed as a neighbor of `u`.
    pub(crate) fn edge_weight(&self, u: usize, v: usize) -> Option<f64> {
        self.edges_with_weights(u).find(|&(w, _)| w == v).map(|(_, cost)| cost)
    }
}
