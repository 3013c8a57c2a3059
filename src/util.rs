use std::rc::Rc;

use crate::graph::{Graph, GraphError};
use crate::search::trials::RunStats;

/** reads an instance file of the given format ('net' or 'dimacs') and
displays its statistics */
pub fn read_instance(filename: &str, instance_type: &str) -> Result<Rc<Graph>, GraphError> {
    let graph = match instance_type {
        "net" => Graph::from_net_file(filename)?,
        "dimacs" => Graph::from_dimacs_file(filename)?,
        _ => panic!("instance type unknown {}", instance_type),
    };
    graph.display_statistics();
    println!("=======================");
    Ok(Rc::new(graph))
}

/// exports run statistics to a JSON performance file
pub fn export_results(stats: &RunStats, perf_file: Option<String>) {
    match perf_file {
        None => {}
        Some(filename) => {
            let mut file = match std::fs::File::create(filename.as_str()) {
                Err(why) => panic!("couldn't create {}: {}", filename, why),
                Ok(file) => file,
            };
            if let Err(why) = std::io::Write::write(
                &mut file,
                serde_json::to_string(stats).unwrap().as_bytes(),
            ) {
                panic!("couldn't write: {}", why)
            };
        }
    }
}
