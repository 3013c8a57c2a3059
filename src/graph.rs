use thiserror::Error;

use crate::{dimacs, netfile};

/** Node Id */
pub type NodeId = usize;

/** errors raised while reading or assembling an instance */
#[derive(Debug, Error)]
pub enum GraphError {
    /// the instance file could not be read
    #[error("unable to read instance file '{0}': {1}")]
    Load(String, std::io::Error),
    /// the instance file does not match the expected format
    #[error("instance format error: {0}")]
    Parse(String),
    /// a node lists a neighbor outside 0..n
    #[error("node {node}: neighbor index {neighbor} out of range (graph has {n} nodes)")]
    NeighborOutOfRange {
        /// node owning the bad reference
        node: NodeId,
        /// the out-of-range index
        neighbor: usize,
        /// number of nodes in the graph
        n: usize,
    },
    /// an edge is listed by one endpoint only
    #[error("edge {node}-{neighbor} is listed by node {node} but not by node {neighbor}")]
    AsymmetricEdge {
        /// endpoint listing the edge
        node: NodeId,
        /// endpoint missing the back reference
        neighbor: NodeId,
    },
}

/** one endpoint's record of one incident edge.
`reciprocal` is the position this record's owner occupies in the neighbor's
own slot list, so the mirror slot is reachable in constant time. */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeSlot {
    /// the other endpoint of the edge
    pub neighbor: NodeId,
    /// slot index of the mirror record on the other endpoint
    pub reciprocal: usize,
}

/** models a dominating-set instance: an undirected graph stored as an
incidence structure. Built once, never mutated.

Invariant: for every node `n` and slot `i`, the mirror of the mirror of
`(n,i)` is `(n,i)` itself. */
#[derive(Debug)]
pub struct Graph {
    /// nb nodes
    n: usize,
    /// slots[n][i]: i-th incident edge-slot of node n
    slots: Vec<Vec<EdgeSlot>>,
    /// total number of edge-slots (∑ d(v), two per undirected edge)
    totdeg: usize,
}

impl Graph {
    /** builds the incidence structure from adjacency lists.
    Every reference `n -> m` is paired with a distinct slot of `m` pointing
    back at `n`, so the reciprocity invariant holds for any symmetric input
    (unsorted neighbor lists and multi-edges included); a reference without
    a back reference is rejected. */
    pub fn try_new(adj_list: Vec<Vec<NodeId>>) -> Result<Self, GraphError> {
        let n = adj_list.len();
        for (u, neighbors) in adj_list.iter().enumerate() {
            for &v in neighbors {
                if v >= n {
                    return Err(GraphError::NeighborOutOfRange { node: u, neighbor: v, n });
                }
            }
        }
        let mut slots: Vec<Vec<EdgeSlot>> = adj_list
            .iter()
            .map(|neighbors| {
                neighbors
                    .iter()
                    .map(|&v| EdgeSlot { neighbor: v, reciprocal: usize::MAX })
                    .collect()
            })
            .collect();
        // back_refs[v]: for each neighbor u of v, the queue of v's slots listing u
        let mut back_refs: Vec<std::collections::HashMap<NodeId, std::collections::VecDeque<usize>>> =
            vec![std::collections::HashMap::new(); n];
        for (u, neighbors) in adj_list.iter().enumerate() {
            for (i, &v) in neighbors.iter().enumerate() {
                back_refs[u].entry(v).or_default().push_back(i);
            }
        }
        let mut totdeg = 0;
        for u in 0..n {
            for i in 0..adj_list[u].len() {
                totdeg += 1;
                if slots[u][i].reciprocal != usize::MAX {
                    continue; // already paired from the other endpoint
                }
                let v = adj_list[u][i];
                let j = back_refs[v]
                    .get_mut(&u)
                    .and_then(|queue| queue.pop_front())
                    .filter(|&j| slots[v][j].reciprocal == usize::MAX)
                    .ok_or(GraphError::AsymmetricEdge { node: u, neighbor: v })?;
                slots[u][i].reciprocal = j;
                slots[v][j].reciprocal = i;
            }
        }
        Ok(Self { n, slots, totdeg })
    }

    /// creates an instance from a net-format file
    pub fn from_net_file(filename: &str) -> Result<Self, GraphError> {
        Self::try_new(netfile::read_from_file(filename)?)
    }

    /// creates an instance from a DIMACS file
    pub fn from_dimacs_file(filename: &str) -> Result<Self, GraphError> {
        Self::try_new(dimacs::read_from_file(filename)?)
    }

    /// number of nodes
    pub fn nb_nodes(&self) -> usize { self.n }

    /// number of edges
    pub fn nb_edges(&self) -> usize { self.totdeg / 2 }

    /// total number of edge-slots (∑ d(v))
    pub fn totdeg(&self) -> usize { self.totdeg }

    /// degree of node n
    pub fn degree(&self, n: NodeId) -> usize { self.slots[n].len() }

    /// the i-th edge-slot of node n
    pub fn slot(&self, n: NodeId, i: usize) -> EdgeSlot { self.slots[n][i] }

    /// all edge-slots of node n
    pub fn slots(&self, n: NodeId) -> &[EdgeSlot] { &self.slots[n] }

    /// iterates over the neighbors of node n
    pub fn neighbors(&self, n: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.slots[n].iter().map(|slot| slot.neighbor)
    }

    /// print statistics of the instance
    pub fn display_statistics(&self) {
        println!("\t{} \t nodes", self.nb_nodes());
        println!("\t{} \t edges", self.nb_edges());
        let degrees: Vec<usize> = (0..self.nb_nodes()).map(|i| self.degree(i)).collect();
        println!("\t{} \t min degree", degrees.iter().min().unwrap_or(&0));
        println!("\t{} \t max degree", degrees.iter().max().unwrap_or(&0));
    }
}
