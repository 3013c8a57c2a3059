use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::rc::Rc;
use std::time::Instant;

use dogs::search_algorithm::StoppingCriterion;
use serde::Serialize;

use crate::domset::{solution_to_string, Solution};
use crate::graph::Graph;
use crate::search::rrr::{RrrParams, RrrSolver};

/// per-trial stopping parameters of the convergence driver
#[derive(Debug, Clone)]
pub struct TrialParams {
    /// iteration cap per trial
    pub maxiter: usize,
    /// iterations between diagnostic log lines (0 disables stride logging)
    pub iterstride: usize,
    /// combined rms error below which a trial converged
    pub stoperr: f64,
    /// number of independent randomized trials
    pub trials: usize,
}

/// outcome record of a single randomized trial
#[derive(Debug, Clone, Serialize)]
pub struct TrialRecord {
    /// trial index
    pub trial: usize,
    /// iterations to convergence, 0 when the cap was hit
    pub iterations: usize,
    /// metric weight at termination
    pub eta: f64,
    /// best-effort selected nodes (valid dominating set once converged)
    pub solution: Solution,
}

/// aggregate outcome of a run
#[derive(Debug, Clone, Serialize)]
pub struct RunStats {
    /// number of converged trials
    pub solved: usize,
    /// number of trials started
    pub trials: usize,
    /// average iterations per converged trial (failures contribute the cap)
    pub ave_iterations: f64,
    /// iteration throughput over the whole run
    pub iterations_per_sec: f64,
    /// one record per trial
    pub records: Vec<TrialRecord>,
}

/** plain-text sinks fed during a run: `<id>.err` (diagnostic),
`<id>.stats` (per-trial lines and summary), `<id>.sol` (selected nodes,
appended once per trial). All three are truncated at creation. */
#[derive(Debug)]
pub struct RunSinks {
    /// diagnostic convergence log
    err: BufWriter<File>,
    /// statistics summary
    stats: BufWriter<File>,
    /// solution sets
    sol: BufWriter<File>,
    /// when set, diagnostic lines carry the per-node consensus values
    full_state: bool,
}

impl RunSinks {
    /// creates `<id>.err`, `<id>.stats` and `<id>.sol`
    pub fn create(id: &str, full_state: bool) -> io::Result<Self> {
        Ok(Self {
            err: BufWriter::new(File::create(format!("{}.err", id))?),
            stats: BufWriter::new(File::create(format!("{}.stats", id))?),
            sol: BufWriter::new(File::create(format!("{}.sol", id))?),
            full_state,
        })
    }

    /// echoes the run parameters at the top of the statistics file
    pub fn echo_args(&mut self, args: &[String]) -> io::Result<()> {
        for arg in args {
            write!(self.stats, "{} ", arg)?;
        }
        writeln!(self.stats, "\n")
    }

    /// one diagnostic line: combined rms error plus components and eta
    fn log_diagnostic(&mut self, solver: &RrrSolver) -> io::Result<()> {
        let (xerr, yerr, toterr) = solver.errors();
        if self.full_state {
            for value in solver.consensus_values() {
                write!(self.err, "{:.6},", value / solver.eta())?;
            }
            writeln!(self.err, "{:.6},{:.6},{:.6}", xerr, yerr, solver.eta())
        } else {
            writeln!(self.err, "{:.6},{:.6},{:.6},{:.6}", toterr, xerr, yerr, solver.eta())
        }
    }

    /// one statistics line and one solution block per finished trial
    fn log_trial(&mut self, record: &TrialRecord) -> io::Result<()> {
        writeln!(self.stats, "{:3}{:12}{:12.2}", record.trial, record.iterations, record.eta)?;
        write!(self.sol, "{}", solution_to_string(&record.solution))
    }

    /// closing summary lines of the statistics file
    fn log_summary(&mut self, stats: &RunStats) -> io::Result<()> {
        writeln!(
            self.stats,
            "\n {}/{} solutions{:10.2e} iterations/solution",
            stats.solved, stats.trials, stats.ave_iterations
        )?;
        writeln!(self.stats, "{:10.2} iterations/sec", stats.iterations_per_sec)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.err.flush()?;
        self.stats.flush()?;
        self.sol.flush()
    }
}

/** runs independent randomized trials of the RRR iteration until each
converges (`toterr < stoperr`) or exhausts the iteration cap; a trial that
hits the cap counts as failed but its best-effort solution is still
emitted. The random stream is sequential across trials — two runs with the
same seed and parameters produce identical records. The stopping criterion
is checked between iterations only, so cancellation never interrupts a
step in progress. */
pub fn run_trials<Stopping: StoppingCriterion>(
    graph: Rc<Graph>,
    params: RrrParams,
    trial_params: TrialParams,
    rng: fastrand::Rng,
    stopping_criterion: Stopping,
    sinks: &mut RunSinks,
) -> io::Result<RunStats> {
    let mut solver = RrrSolver::new(graph, params);
    let start = Instant::now();
    let mut records = Vec::with_capacity(trial_params.trials);
    let mut solved = 0;
    let mut total_iterations = 0;
    for trial in 0..trial_params.trials {
        if stopping_criterion.is_finished() {
            break;
        }
        solver.restart(&rng);
        let mut iterations = 0;
        for iter in 1..=trial_params.maxiter {
            if stopping_criterion.is_finished() {
                break; // the interrupted trial counts as failed
            }
            let toterr = solver.step();
            if trial_params.iterstride > 0 && iter % trial_params.iterstride == 0 {
                sinks.log_diagnostic(&solver)?;
            }
            if toterr < trial_params.stoperr {
                iterations = iter;
                break;
            }
        }
        sinks.log_diagnostic(&solver)?;
        if iterations > 0 {
            solved += 1;
            total_iterations += iterations;
        } else {
            total_iterations += trial_params.maxiter;
        }
        let record = TrialRecord {
            trial,
            iterations,
            eta: solver.eta(),
            solution: solver.solution(),
        };
        sinks.log_trial(&record)?;
        records.push(record);
    }
    let elapsed = start.elapsed().as_secs_f64();
    let stats = RunStats {
        solved,
        trials: records.len(),
        ave_iterations: if solved > 0 {
            total_iterations as f64 / solved as f64
        } else {
            0.
        },
        iterations_per_sec: if elapsed > 0. {
            total_iterations as f64 / elapsed
        } else {
            0.
        },
        records,
    };
    sinks.log_summary(&stats)?;
    sinks.flush()?;
    Ok(stats)
}


#[cfg(test)]
mod tests {
    use super::*;

    use dogs::search_algorithm::TimeStoppingCriterion;

    use crate::domset::{checker, CheckerResult};

    fn cycle4() -> Rc<Graph> {
        Rc::new(Graph::try_new(vec![vec![1, 3], vec![0, 2], vec![1, 3], vec![0, 2]]).unwrap())
    }

    fn sinks(name: &str) -> RunSinks {
        let id = std::env::temp_dir().join(name);
        RunSinks::create(id.to_str().unwrap(), false).unwrap()
    }

    fn run(graph: Rc<Graph>, beta: f64, trials: usize, seed: u64, name: &str) -> RunStats {
        run_trials(
            graph,
            RrrParams { d_max: 4, epsilon: 0.05, beta },
            TrialParams { maxiter: 10000, iterstride: 100, stoperr: 1e-4, trials },
            fastrand::Rng::with_seed(seed),
            TimeStoppingCriterion::new(3600.),
            &mut sinks(name),
        )
        .unwrap()
    }

    #[test]
    fn test_cycle4_end_to_end() {
        let graph = cycle4();
        let stats = run(graph.clone(), 0.5, 20, 42, "dc_domset_e2e");
        assert_eq!(stats.trials, 20);
        assert!(stats.solved > 0);
        for record in &stats.records {
            if record.iterations > 0 {
                // a converged trial must yield a valid dominating set
                match checker(&graph, &record.solution) {
                    CheckerResult::Ok(size) => assert!(size <= 4),
                    other => panic!("invalid solution {:?}: {:?}", record.solution, other),
                }
            }
        }
    }

    #[test]
    fn test_cycle4_negative_beta() {
        let graph = cycle4();
        let stats = run(graph.clone(), -0.5, 20, 43, "dc_domset_e2e_neg");
        assert!(stats.solved > 0);
        for record in stats.records.iter().filter(|r| r.iterations > 0) {
            assert!(matches!(checker(&graph, &record.solution), CheckerResult::Ok(_)));
        }
    }

    #[test]
    fn test_isolated_node_trial() {
        let graph = Rc::new(Graph::try_new(vec![vec![]]).unwrap());
        let stats = run_trials(
            graph,
            RrrParams { d_max: 1, epsilon: 0.05, beta: 0.5 },
            TrialParams { maxiter: 10000, iterstride: 100, stoperr: 1e-4, trials: 3 },
            fastrand::Rng::with_seed(1),
            TimeStoppingCriterion::new(3600.),
            &mut sinks("dc_domset_isolated"),
        )
        .unwrap();
        assert_eq!(stats.solved, 3);
        for record in &stats.records {
            assert_eq!(record.solution, vec![0]);
            assert!(record.eta.is_finite());
        }
    }

    #[test]
    fn test_seeded_runs_are_deterministic() {
        let first = run(cycle4(), 0.5, 10, 7, "dc_domset_det_a");
        let second = run(cycle4(), 0.5, 10, 7, "dc_domset_det_b");
        assert_eq!(first.solved, second.solved);
        for (a, b) in first.records.iter().zip(second.records.iter()) {
            assert_eq!(a.iterations, b.iterations);
            assert_eq!(a.solution, b.solution);
            assert_eq!(a.eta, b.eta);
        }
    }

    #[test]
    fn test_zero_iterstride_disables_stride_logging() {
        let stats = run_trials(
            cycle4(),
            RrrParams { d_max: 4, epsilon: 0.05, beta: 0.5 },
            TrialParams { maxiter: 10000, iterstride: 0, stoperr: 1e-4, trials: 2 },
            fastrand::Rng::with_seed(11),
            TimeStoppingCriterion::new(3600.),
            &mut sinks("dc_domset_nostride"),
        )
        .unwrap();
        assert_eq!(stats.trials, 2);
    }

    #[test]
    fn test_expired_criterion_stops_immediately() {
        let stats = run_trials(
            cycle4(),
            RrrParams { d_max: 4, epsilon: 0.05, beta: 0.5 },
            TrialParams { maxiter: 10000, iterstride: 100, stoperr: 1e-4, trials: 5 },
            fastrand::Rng::with_seed(1),
            TimeStoppingCriterion::new(0.),
            &mut sinks("dc_domset_cancel"),
        )
        .unwrap();
        assert_eq!(stats.trials, 0);
        assert_eq!(stats.solved, 0);
    }
}
