//! Solvers for the minimum dominating set problem.

/// RRR difference-map iteration (projections, reflector, adaptive metric)
pub mod rrr;

/// multi-trial convergence driver and its result sinks
pub mod trials;
