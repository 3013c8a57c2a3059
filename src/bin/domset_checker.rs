use clap::{load_yaml, App};

use dc_domset::domset::{checker, read_solution_file, CheckerResult};
use dc_domset::util::read_instance;

/** re-checks every trial solution of a `.sol` file against its instance */
pub fn main() {
    // parse arguments
    let yaml = load_yaml!("domset_checker.yml");
    let main_args = App::from_yaml(yaml).get_matches();
    let inst_filename = main_args.value_of("instance").unwrap();
    let sol_filename = main_args.value_of("solution").unwrap();
    let instance_type = main_args.value_of("type").unwrap();
    // read files
    let graph = match read_instance(inst_filename, instance_type) {
        Ok(graph) => graph,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };
    let solutions = read_solution_file(sol_filename)
        .unwrap_or_else(|why| panic!("couldn't read {}: {}", sol_filename, why));
    // call the checker on each trial block
    for (trial, solution) in solutions.iter().enumerate() {
        match checker(&graph, solution) {
            CheckerResult::Ok(size) => {
                println!("trial {}: ok ({} nodes)", trial, size);
            }
            CheckerResult::NodeAddedTwice(v) => {
                println!("trial {}: ERROR: node {} selected twice", trial, v);
            }
            CheckerResult::NodeOutOfRange(v) => {
                println!("trial {}: ERROR: node {} outside the graph", trial, v);
            }
            CheckerResult::NodeNotDominated(v) => {
                println!("trial {}: ERROR: node {} is not dominated", trial, v);
            }
        };
    }
}
