use std::fs;

use bit_set::BitSet;

use crate::graph::{Graph, NodeId};

/** a candidate dominating set, listed by node index */
pub type Solution = Vec<NodeId>;

/// the separator written between two trial solutions in a `.sol` file
pub const SOLUTION_SEPARATOR: &str = "----------";

/** result of the dominating-set checker */
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckerResult {
    /// the solution is a valid dominating set of the given size
    Ok(usize),
    /// a node is selected twice
    NodeAddedTwice(NodeId),
    /// a selected node does not belong to the graph
    NodeOutOfRange(NodeId),
    /// a node is neither selected nor adjacent to a selected node
    NodeNotDominated(NodeId),
}

/** checks that `sol` dominates every node of `graph`:
each node must be selected or adjacent to a selected node. */
pub fn checker(graph: &Graph, sol: &[NodeId]) -> CheckerResult {
    let n = graph.nb_nodes();
    let mut selected = BitSet::with_capacity(n);
    for &u in sol {
        if u >= n {
            return CheckerResult::NodeOutOfRange(u);
        }
        if selected.contains(u) {
            return CheckerResult::NodeAddedTwice(u);
        }
        selected.insert(u);
    }
    let mut dominated = selected;
    for &u in sol {
        for v in graph.neighbors(u) {
            dominated.insert(v);
        }
    }
    for u in 0..n {
        if !dominated.contains(u) {
            return CheckerResult::NodeNotDominated(u);
        }
    }
    CheckerResult::Ok(sol.len())
}

/** encodes one trial solution as written to a `.sol` file:
the selected indices space-separated, then a separator line */
pub fn solution_to_string(sol: &[NodeId]) -> String {
    let mut res = String::default();
    for v in sol {
        res += format!("{} ", v).as_str();
    }
    res += format!("\n{}\n", SOLUTION_SEPARATOR).as_str();
    res
}

/** reads a `.sol` file back: one solution per separator-terminated block */
pub fn read_solution_file(filename: &str) -> std::io::Result<Vec<Solution>> {
    let content = fs::read_to_string(filename)?;
    let mut res = Vec::new();
    let mut current: Solution = Vec::new();
    for line in content.lines() {
        if line.starts_with(SOLUTION_SEPARATOR) {
            res.push(std::mem::take(&mut current));
        } else {
            current.extend(line.split_whitespace().filter_map(|tok| tok.parse::<NodeId>().ok()));
        }
    }
    Ok(res)
}
