use crate::graph::Graph;

/** variables of the difference-map iteration.

Each node `n` owns a scalar `y[n]` (its activation, in `[0, eta]` at
iteration boundaries) and one value `x[n][i]` per incident edge-slot (its
membership as seen by edge `i`, in `[0, 1]`). The two projection outputs
and the reflected point live in their own buffers so nothing aliases the
working point; only the difference-map step mutates `x`/`y` in place.

All buffers are allocated once from the degree sequence and overwritten by
`randomize` at the start of every trial; they are never resized. */
#[derive(Debug)]
pub struct VarState {
    /// working edge values
    pub x: Vec<Vec<f64>>,
    /// working node values
    pub y: Vec<f64>,
    /// domination-projection output, edges
    pub xa: Vec<Vec<f64>>,
    /// domination-projection output, nodes
    pub ya: Vec<f64>,
    /// consensus-projection output, edges
    pub xb: Vec<Vec<f64>>,
    /// consensus-projection output, nodes
    pub yb: Vec<f64>,
    /// reflected point, edges
    pub xr: Vec<Vec<f64>>,
    /// reflected point, nodes
    pub yr: Vec<f64>,
}

impl VarState {
    /// allocates all buffers, sized by the graph's degree sequence
    pub fn new(graph: &Graph) -> Self {
        let n = graph.nb_nodes();
        let edges = || (0..n).map(|u| vec![0.; graph.degree(u)]).collect();
        let nodes = || vec![0.; n];
        Self {
            x: edges(),
            y: nodes(),
            xa: edges(),
            ya: nodes(),
            xb: edges(),
            yb: nodes(),
            xr: edges(),
            yr: nodes(),
        }
    }

    /// redraws the working point: `y[n] = eta·U(0,1)`, `x[n][i] = U(0,1)`
    pub fn randomize(&mut self, rng: &fastrand::Rng, eta: f64) {
        for yn in self.y.iter_mut() {
            *yn = eta * rng.f64();
        }
        for xn in self.x.iter_mut() {
            for xni in xn.iter_mut() {
                *xni = rng.f64();
            }
        }
    }
}
