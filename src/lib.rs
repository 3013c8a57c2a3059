//! Divide-and-concur (RRR) heuristic search for small dominating sets

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


/// graph model: incidence structure with reciprocal edge-slots
pub mod graph;

/// dominating-set solutions, checker and solution-file I/O
pub mod domset;

/// read the whitespace-token net format
pub mod netfile;

/// read DIMACS-format graphs
pub mod dimacs;

/// variables of the difference-map iteration
pub mod state;

/// helper and utility methods for executables
pub mod util;

/// solvers for the dominating set problem
pub mod search;
