use std::fs;

use nom::IResult;
use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::character::complete::{digit1, line_ending, multispace0, not_line_ending, space1};
use nom::combinator::map_res;
use nom::multi::many0;
use nom::sequence::{preceded, separated_pair, terminated};

use crate::graph::GraphError;

/// parses an unsigned integer
fn integer(s: &str) -> IResult<&str, usize> {
    map_res(digit1, str::parse)(s)
}

/// skips a single comment line
fn skip_comment(s: &str) -> IResult<&str, &str> {
    preceded(tag("c"), terminated(not_line_ending, line_ending))(s)
}

/// skips all comments
pub fn skip_comments(s: &str) -> IResult<&str, Vec<&str>> {
    many0(skip_comment)(s)
}

/// reads the header containing (n,m)
pub fn read_header(s: &str) -> IResult<&str, (usize, usize)> {
    preceded(
        alt((tag("p edge "), tag("p col "))),
        separated_pair(integer, space1, integer),
    )(s)
}

/// reads an edge line (WARNING: indices start at 1 in the DIMACS format)
pub fn read_edge(s: &str) -> IResult<&str, (usize, usize)> {
    preceded(
        preceded(multispace0, tag("e ")),
        separated_pair(integer, space1, integer),
    )(s)
}

/** reads a DIMACS instance from a file, returns the adjacency lists
(0-indexed; duplicate edge listings are merged). */
pub fn read_from_file(filename: &str) -> Result<Vec<Vec<usize>>, GraphError> {
    let content = fs::read_to_string(filename)
        .map_err(|e| GraphError::Load(filename.to_string(), e))?
        .replace('\r', "");
    read_from_str(&content)
}

/// reads a DIMACS instance from a string
pub fn read_from_str(content: &str) -> Result<Vec<Vec<usize>>, GraphError> {
    let s = skip_comments(content)
        .map_err(|_| GraphError::Parse("unreadable comment block".to_string()))?
        .0;
    let (mut s, (n, m)) = read_header(s)
        .map_err(|_| GraphError::Parse("missing 'p edge n m' header".to_string()))?;
    let mut adj_list = vec![Vec::new(); n];
    let mut nb_edges = 0;
    while let Ok((rest, (a, b))) = read_edge(s) {
        s = rest;
        if a == 0 || a > n || b == 0 || b > n {
            return Err(GraphError::Parse(format!(
                "edge {}-{} out of range (nodes are 1..={})",
                a, b, n
            )));
        }
        let (a, b) = (a - 1, b - 1);
        // some DIMACS files list both orientations of each edge
        if !adj_list[a].contains(&b) {
            adj_list[a].push(b);
            if b != a {
                adj_list[b].push(a);
            }
        }
        nb_edges += 1;
    }
    if nb_edges != m && 2 * nb_edges != m {
        return Err(GraphError::Parse(format!(
            "header announces {} edges, found {}",
            m, nb_edges
        )));
    }
    Ok(adj_list)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_comment() {
        let s = "c this is a test comment\np edge 2 1\ne 1 2";
        assert_eq!(skip_comments(s), Ok(("p edge 2 1\ne 1 2", vec![" this is a test comment"])));
    }

    #[test]
    fn test_read_header() {
        let s = "p edge 2 1\ne 1 2";
        assert_eq!(read_header(s).unwrap().0, "\ne 1 2");
        assert_eq!(read_header(s).unwrap().1, (2, 1));
    }

    #[test]
    fn test_read_header_col() {
        let s = "p col 2 1\ne 1 2";
        assert_eq!(read_header(s).unwrap().1, (2, 1));
    }

    #[test]
    fn test_read_edge() {
        let s = "\ne 1 2\n";
        assert_eq!(read_edge(s).unwrap().1, (1, 2));
    }

    #[test]
    fn test_read_cycle() {
        let adj = read_from_str("c 4-cycle\np edge 4 4\ne 1 2\ne 2 3\ne 3 4\ne 4 1\n").unwrap();
        // neighbors appear in edge-line order (node 3 sees 'e 3 4' before 'e 4 1')
        assert_eq!(adj, vec![vec![1, 3], vec![0, 2], vec![1, 3], vec![2, 0]]);
    }

    #[test]
    fn test_duplicate_listing_merged() {
        let adj = read_from_str("p edge 2 2\ne 1 2\ne 2 1\n").unwrap();
        assert_eq!(adj, vec![vec![1], vec![0]]);
    }

    #[test]
    fn test_bad_edge_count() {
        assert!(matches!(
            read_from_str("p edge 2 3\ne 1 2\n"),
            Err(GraphError::Parse(_))
        ));
    }

    #[test]
    fn test_read_instance_file() {
        let adj = read_from_file("insts/cycle4.col").unwrap();
        assert_eq!(adj.len(), 4);
        assert_eq!(adj.iter().map(Vec::len).sum::<usize>(), 8);
    }
}
