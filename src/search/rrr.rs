use std::cmp::Reverse;
use std::rc::Rc;

use ordered_float::OrderedFloat;

use crate::graph::{Graph, NodeId};
use crate::state::VarState;

/// algorithm parameters of the RRR iteration
#[derive(Debug, Clone)]
pub struct RrrParams {
    /// maximum number of node activations per domination projection
    pub d_max: usize,
    /// metric relaxation rate
    pub epsilon: f64,
    /// difference-map mixing coefficient (its sign selects the projection order)
    pub beta: f64,
}

/// which copy of the variables a projection reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    Working,
    Reflected,
}

/// which projection output the reflector reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Projection {
    Domination,
    Consensus,
}

/** (see https://doi.org/10.1103/PhysRevE.78.036706 for the difference-map family)
Relaxed-Reflect-Reflect iteration searching for a small dominating set.

Node `n` is covered either by its own activation (`y[n]` at `eta`) or by an
incoming edge variable at 1 — the slot a neighbor holds pointing at `n`.
The domination projection works on those mirror slots; the consensus
projection makes each node's outgoing slots agree with its own activation.
The difference of the two projections drives the working point, and the
metric weight `eta` is rescaled each step so neither variable family
stalls. */
#[derive(Debug)]
pub struct RrrSolver {
    /// shared instance
    graph: Rc<Graph>,
    /// working point and the A/B/R copies
    state: VarState,
    /// algorithm parameters
    params: RrrParams,
    /// metric weight coupling node and edge variables
    eta: f64,
    /// rms edge-variable error of the last step
    xerr: f64,
    /// rms node-variable error of the last step
    yerr: f64,
    /// combined rms error of the last step (stopping test)
    toterr: f64,
    /// rank[n]: (node, score) activation candidates of the domination projection
    rank: Vec<(NodeId, f64)>,
    /// imax[n]: slot of n whose mirror holds the largest incoming edge value
    imax: Vec<usize>,
    /// xmax[n]: that largest value, pre-binarization
    xmax: Vec<f64>,
}

impl RrrSolver {
    /// allocates a solver for the given instance; buffers are reused across trials
    pub fn new(graph: Rc<Graph>, params: RrrParams) -> Self {
        let state = VarState::new(&graph);
        let n = graph.nb_nodes();
        Self {
            graph,
            state,
            params,
            eta: 1.,
            xerr: 0.,
            yerr: 0.,
            toterr: 0.,
            rank: vec![(0, 0.); n],
            imax: vec![0; n],
            xmax: vec![0.; n],
        }
    }

    /// current metric weight
    pub fn eta(&self) -> f64 { self.eta }

    /// (xerr, yerr, toterr) of the last step
    pub fn errors(&self) -> (f64, f64, f64) { (self.xerr, self.yerr, self.toterr) }

    /// combined rms error of the last step
    pub fn toterr(&self) -> f64 { self.toterr }

    /// per-node consensus values of the last step (divide by `eta` to normalize)
    pub fn consensus_values(&self) -> &[f64] { &self.state.yb }

    /// resets the metric and redraws the working point (start of a trial)
    pub fn restart(&mut self, rng: &fastrand::Rng) {
        self.eta = 1.;
        self.xerr = 0.;
        self.yerr = 0.;
        self.toterr = 0.;
        self.state.randomize(rng, self.eta);
    }

    /** nodes selected by the last domination projection: `yA[n] > eta/2`.
    Best-effort — meaningful as a dominating set once a trial converged. */
    pub fn solution(&self) -> Vec<NodeId> {
        (0..self.graph.nb_nodes())
            .filter(|&n| self.state.ya[n] > self.eta / 2.)
            .collect()
    }

    /** domination projection: every node ends covered, either by one
    incoming edge forced to 1 or by its own activation. At most `d_max`
    nodes are activated, picked by how much squared distance the
    activation saves. */
    fn project_domination(&mut self, src: Source) {
        let graph = &self.graph;
        let eta = self.eta;
        let d_max = self.params.d_max.min(graph.nb_nodes());
        let VarState { x, y, xa, ya, xr, yr, .. } = &mut self.state;
        let (xo, yo) = match src {
            Source::Working => (&*x, &*y),
            Source::Reflected => (&*xr, &*yr),
        };
        for n in 0..graph.nb_nodes() {
            // the slots covering n are the mirrors of its incidence list
            let mut imax = 0;
            let mut xmax = 0.;
            for (i, slot) in graph.slots(n).iter().enumerate() {
                let v = xo[slot.neighbor][slot.reciprocal];
                xa[slot.neighbor][slot.reciprocal] = if v < 0.5 { 0. } else { 1. };
                if i == 0 || v > xmax {
                    imax = i;
                    xmax = v;
                }
            }
            if graph.degree(n) == 0 {
                // an isolated node can only be covered by itself
                ya[n] = eta;
                self.rank[n] = (n, f64::NEG_INFINITY);
                continue;
            }
            let cover = graph.slot(n, imax);
            xa[cover.neighbor][cover.reciprocal] = 1.;
            ya[n] = 0.;
            // squared-distance gain of activating n instead (common eta² term dropped)
            let gain = 2. * yo[n] * eta + if xmax < 0.5 { 1. - 2. * xmax } else { 0. };
            self.rank[n] = (n, gain);
            self.imax[n] = imax;
            self.xmax[n] = xmax;
        }
        self.rank.sort_by_key(|&(_, gain)| Reverse(OrderedFloat(gain)));
        for &(n, gain) in self.rank.iter().take(d_max) {
            if gain > eta * eta {
                ya[n] = eta;
                if self.xmax[n] < 0.5 {
                    // the forced edge is not needed once n itself is active
                    let cover = graph.slot(n, self.imax[n]);
                    xa[cover.neighbor][cover.reciprocal] = 0.;
                }
            }
        }
    }

    /** consensus projection: closed-form least-squares average making each
    node's activation agree with all its outgoing edge variables. */
    fn project_consensus(&mut self, src: Source) {
        let eta = self.eta;
        let VarState { x, y, xb, yb, xr, yr, .. } = &mut self.state;
        let (xo, yo) = match src {
            Source::Working => (&*x, &*y),
            Source::Reflected => (&*xr, &*yr),
        };
        for (n, ybn) in yb.iter_mut().enumerate() {
            let degree = xo[n].len() as f64;
            let mut c = eta * yo[n];
            for v in &xo[n] {
                c += v;
            }
            c /= eta * eta + degree; // strictly positive even for isolated nodes
            *ybn = c * eta;
            for v in xb[n].iter_mut() {
                *v = c;
            }
        }
    }

    /// point reflection of the working point across a projection output
    fn reflect(&mut self, proj: Projection) {
        let VarState { x, y, xa, ya, xb, yb, xr, yr } = &mut self.state;
        let (xo, yo) = match proj {
            Projection::Domination => (&*xa, &*ya),
            Projection::Consensus => (&*xb, &*yb),
        };
        for (n, yrn) in yr.iter_mut().enumerate() {
            *yrn = 2. * yo[n] - y[n];
            for (i, xrni) in xr[n].iter_mut().enumerate() {
                *xrni = 2. * xo[n][i] - x[n][i];
            }
        }
    }

    /** one difference-map iteration; returns the combined rms error.
    `beta > 0` projects the working point onto domination and the
    reflection onto consensus; `beta < 0` does the opposite. Afterwards the
    working point moves by `beta` times the difference of the two
    projections and the metric weight is rescaled so the node-variable
    error share drifts toward the edge share. */
    pub fn step(&mut self) -> f64 {
        if self.params.beta > 0. {
            self.project_domination(Source::Working);
            self.reflect(Projection::Domination);
            self.project_consensus(Source::Reflected);
        } else {
            self.project_consensus(Source::Working);
            self.reflect(Projection::Consensus);
            self.project_domination(Source::Reflected);
        }
        let beta = self.params.beta;
        let eta = self.eta;
        let mut xerr = 0.;
        let mut yerr = 0.;
        {
            let VarState { x, y, xa, ya, xb, yb, .. } = &mut self.state;
            for (n, yn) in y.iter_mut().enumerate() {
                let diff_y = yb[n] - ya[n];
                *yn += beta * diff_y;
                yerr += (diff_y / eta) * (diff_y / eta);
                *yn /= eta; // transiently normalized, re-scaled below
                for (i, xni) in x[n].iter_mut().enumerate() {
                    let diff_x = xb[n][i] - xa[n][i];
                    *xni += beta * diff_x;
                    xerr += diff_x * diff_x;
                }
            }
        }
        if self.graph.totdeg() > 0 {
            xerr /= self.graph.totdeg() as f64;
        }
        if self.graph.nb_nodes() > 0 {
            yerr /= self.graph.nb_nodes() as f64;
        }
        let toterr = xerr + yerr;
        if toterr > 0. {
            self.eta *= 1. + self.params.epsilon * (yerr / toterr - 1.);
        }
        for yn in self.state.y.iter_mut() {
            *yn *= self.eta;
        }
        self.xerr = xerr.sqrt();
        self.yerr = yerr.sqrt();
        self.toterr = toterr.sqrt();
        self.toterr
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn cycle4() -> Rc<Graph> {
        Rc::new(Graph::try_new(vec![vec![1, 3], vec![0, 2], vec![1, 3], vec![0, 2]]).unwrap())
    }

    fn star6() -> Rc<Graph> {
        Rc::new(Graph::try_new(vec![
            vec![1, 2, 3, 4, 5],
            vec![0],
            vec![0],
            vec![0],
            vec![0],
            vec![0],
        ]).unwrap())
    }

    fn solver(graph: Rc<Graph>, d_max: usize, beta: f64) -> RrrSolver {
        RrrSolver::new(graph, RrrParams { d_max, epsilon: 0.05, beta })
    }

    #[test]
    fn test_consensus_invariant() {
        let graph = cycle4();
        let mut solver = solver(graph.clone(), 4, 0.5);
        solver.restart(&fastrand::Rng::with_seed(1));
        solver.project_consensus(Source::Working);
        for n in 0..graph.nb_nodes() {
            let c = solver.state.xb[n][0];
            for &v in &solver.state.xb[n] {
                assert!((v - c).abs() < 1e-12);
            }
            assert!((solver.state.yb[n] - c * solver.eta).abs() < 1e-12);
            // the average is the least-squares consensus value
            let sum: f64 = solver.state.x[n].iter().sum::<f64>()
                + solver.eta * solver.state.y[n];
            assert!((c * (solver.eta * solver.eta + graph.degree(n) as f64) - sum).abs() < 1e-12);
        }
    }

    #[test]
    fn test_domination_invariant() {
        let graph = star6();
        let mut solver = solver(graph.clone(), 2, 0.5);
        solver.restart(&fastrand::Rng::with_seed(2));
        solver.project_domination(Source::Working);
        for n in 0..graph.nb_nodes() {
            let covered = solver.state.ya[n] == solver.eta
                || graph
                    .slots(n)
                    .iter()
                    .any(|slot| solver.state.xa[slot.neighbor][slot.reciprocal] == 1.);
            assert!(covered, "node {} is not covered", n);
        }
    }

    #[test]
    fn test_activation_bound() {
        let graph = star6();
        for seed in 0..20 {
            let mut solver = solver(graph.clone(), 2, 0.5);
            solver.restart(&fastrand::Rng::with_seed(seed));
            solver.project_domination(Source::Working);
            let nb_active = solver.state.ya.iter().filter(|&&v| v == solver.eta).count();
            assert!(nb_active <= 2);
        }
    }

    #[test]
    fn test_activation_bound_exceeding_nodes() {
        // d_max larger than the graph must not overrun the rank array
        let graph = cycle4();
        let mut solver = solver(graph, 100, 0.5);
        solver.restart(&fastrand::Rng::with_seed(3));
        solver.project_domination(Source::Working);
    }

    #[test]
    fn test_reflection_involution() {
        let graph = cycle4();
        let mut solver = solver(graph.clone(), 4, 0.5);
        let rng = fastrand::Rng::with_seed(4);
        solver.restart(&rng);
        for n in 0..graph.nb_nodes() {
            solver.state.ya[n] = rng.f64();
            for i in 0..graph.degree(n) {
                solver.state.xa[n][i] = rng.f64();
            }
        }
        solver.reflect(Projection::Domination);
        for n in 0..graph.nb_nodes() {
            let y_back = 2. * solver.state.ya[n] - solver.state.yr[n];
            assert!((y_back - solver.state.y[n]).abs() < 1e-12);
            for i in 0..graph.degree(n) {
                let x_back = 2. * solver.state.xa[n][i] - solver.state.xr[n][i];
                assert!((x_back - solver.state.x[n][i]).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_zero_error_on_satisfied_point() {
        // opposite corners of the 4-cycle, agreed on by both constraint sets
        let graph = cycle4();
        let mut solver = solver(graph.clone(), 4, 0.5);
        for n in 0..graph.nb_nodes() {
            let active = n % 2 == 0;
            solver.state.y[n] = if active { 1. } else { 0. };
            for i in 0..graph.degree(n) {
                solver.state.x[n][i] = if active { 1. } else { 0. };
            }
        }
        let toterr = solver.step();
        let (xerr, yerr, _) = solver.errors();
        assert_eq!(xerr, 0.);
        assert_eq!(yerr, 0.);
        assert_eq!(toterr, 0.);
        assert_eq!(solver.eta(), 1.);
        assert_eq!(solver.solution(), vec![0, 2]);
    }

    #[test]
    fn test_isolated_node_stays_finite() {
        let graph = Rc::new(Graph::try_new(vec![vec![]]).unwrap());
        let mut solver = solver(graph, 1, 0.5);
        solver.restart(&fastrand::Rng::with_seed(5));
        for _ in 0..50 {
            let toterr = solver.step();
            assert!(toterr.is_finite());
            assert!(solver.eta().is_finite());
        }
        assert_eq!(solver.solution(), vec![0]);
    }
}
