use std::fs;

use nom::IResult;
use nom::character::complete::{digit1, multispace0};
use nom::combinator::map_res;
use nom::sequence::preceded;

use crate::graph::GraphError;

/// reads the next whitespace-separated unsigned integer token
fn read_token(s: &str) -> IResult<&str, usize> {
    preceded(multispace0, map_res(digit1, str::parse))(s)
}

/// consumes one token or reports what was expected
fn next_token(rest: &mut &str, what: &str) -> Result<usize, GraphError> {
    match read_token(rest) {
        Ok((remaining, value)) => {
            *rest = remaining;
            Ok(value)
        }
        Err(_) => Err(GraphError::Parse(format!("expected {}", what))),
    }
}

/** reads a net-format instance from a file, returns the adjacency lists.
Format: node count, then per node a node index (ignored), its degree and
the list of its neighbors, all whitespace-separated. */
pub fn read_from_file(filename: &str) -> Result<Vec<Vec<usize>>, GraphError> {
    let content = fs::read_to_string(filename)
        .map_err(|e| GraphError::Load(filename.to_string(), e))?;
    read_from_str(&content)
}

/// reads a net-format instance from a string
pub fn read_from_str(content: &str) -> Result<Vec<Vec<usize>>, GraphError> {
    let mut rest = content;
    let n = next_token(&mut rest, "node count")?;
    let mut adj_list = vec![Vec::new(); n];
    for (node, neighbors) in adj_list.iter_mut().enumerate() {
        let _ignored = next_token(&mut rest, &format!("index of node {}", node))?;
        let degree = next_token(&mut rest, &format!("degree of node {}", node))?;
        for k in 0..degree {
            neighbors.push(next_token(
                &mut rest,
                &format!("neighbor {} of node {}", k, node),
            )?);
        }
    }
    Ok(adj_list)
}
