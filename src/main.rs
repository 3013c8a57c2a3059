//! RRR (divide-and-concur) heuristic search for small dominating sets


// #![warn(clippy::all, clippy::pedantic)]
// useful additional warnings if docs are missing, or crates imported but unused, etc.
#![warn(missing_debug_implementations)]
#![warn(missing_docs)]
#![warn(trivial_casts, trivial_numeric_casts)]
#![warn(unsafe_code)]
#![warn(unused_extern_crates)]
#![warn(variant_size_differences)]

// not sure if already by default in clippy
#![warn(clippy::similar_names)]
#![warn(clippy::shadow_unrelated)]
#![warn(clippy::shadow_same)]
#![warn(clippy::shadow_reuse)]

use clap::{load_yaml, App};
use dogs::search_algorithm::TimeStoppingCriterion;

use dc_domset::search::rrr::RrrParams;
use dc_domset::search::trials::{run_trials, RunSinks, TrialParams};
use dc_domset::util::{export_results, read_instance};

/**
reads an instance, the iteration parameters and a run identifier, then
searches for small dominating sets over independent randomized trials.
Outputs go to `<id>.err`, `<id>.stats` and `<id>.sol`.

# Panics
 - if a numeric argument cannot be parsed
 - if an output file cannot be written
*/
pub fn main() {
    // parse arguments
    let yaml = load_yaml!("main_args.yml");
    let main_args = App::from_yaml(yaml).get_matches();
    let inst_filename = main_args.value_of("instance").unwrap();
    let instance_type = main_args.value_of("type").unwrap();
    let d_max: usize = main_args.value_of("d").unwrap().parse()
        .expect("unable to parse D (max activations per projection)");
    let epsilon: f64 = main_args.value_of("epsilon").unwrap().parse()
        .expect("unable to parse epsilon");
    let beta: f64 = main_args.value_of("beta").unwrap().parse()
        .expect("unable to parse beta");
    let maxiter: usize = main_args.value_of("maxiter").unwrap().parse()
        .expect("unable to parse maxiter");
    let iterstride: usize = main_args.value_of("iterstride").unwrap().parse()
        .expect("unable to parse iterstride");
    let stoperr: f64 = main_args.value_of("stoperr").unwrap().parse()
        .expect("unable to parse stoperr");
    let trials: usize = main_args.value_of("trials").unwrap().parse()
        .expect("unable to parse trials");
    let id = main_args.value_of("id").unwrap();
    let seed: Option<u64> = main_args.value_of("seed")
        .map(|s| s.parse().expect("unable to parse the seed given"));
    let time: f32 = main_args.value_of("time")
        .map(|s| s.parse().expect("unable to parse the time given"))
        .unwrap_or(1e8);
    let perf_file: Option<String> = match main_args.value_of("perf") {
        None => None,
        Some(e) => {
            println!("printing perfs in: {}\n", e);
            Some(e.to_string())
        }
    };
    // read instance file
    println!("=========================================================");
    println!("reading instance: {}...", inst_filename);
    let graph = match read_instance(inst_filename, instance_type) {
        Ok(graph) => graph,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };
    // one sequential random stream for the whole run
    let rng = match seed {
        Some(seed) => fastrand::Rng::with_seed(seed),
        None => fastrand::Rng::new(),
    };
    let stopping_criterion = TimeStoppingCriterion::new(time);
    let mut sinks = RunSinks::create(id, main_args.is_present("fullerr"))
        .unwrap_or_else(|why| panic!("couldn't create output files for '{}': {}", id, why));
    sinks.echo_args(&std::env::args().collect::<Vec<String>>())
        .unwrap_or_else(|why| panic!("couldn't write: {}", why));
    // solve it
    let stats = run_trials(
        graph,
        RrrParams { d_max, epsilon, beta },
        TrialParams { maxiter, iterstride, stoperr, trials },
        rng,
        stopping_criterion,
        &mut sinks,
    )
    .unwrap_or_else(|why| panic!("couldn't write: {}", why));
    println!(" {}/{} solutions", stats.solved, stats.trials);
    println!("{:10.2e} iterations/solution", stats.ave_iterations);
    println!("{:10.2} iterations/sec", stats.iterations_per_sec);
    // export results
    export_results(&stats, perf_file);
}
