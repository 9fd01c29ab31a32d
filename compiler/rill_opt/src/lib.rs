//! IR analyses and transforms for the Rill compiler.
//!
//! This crate is the optimization layer between IR construction and
//! code generation:
//!
//! - **Post-dominance** ([`PostDominatorTree`]) — Cooper-Harvey-Kennedy
//!   on the reversed CFG, rooted at a virtual exit so multi-return
//!   functions get one tree.
//! - **Control dependence** ([`ControlDependence`]) — reverse dominance
//!   frontiers and their iterated closure.
//! - **Dead-code elimination** ([`eliminate_dead_code`]) — aggressive
//!   mark/sweep liveness: everything is presumed dead until an
//!   observable effect proves otherwise.
//! - **The pass seam** ([`FunctionPass`]) — the interface the pipeline
//!   driver runs transforms through; [`DeadCodeElimination`] packages
//!   the eliminator behind it.
//!
//! Passes assume structurally verified input (see
//! [`rill_ir::verify_function`]) and leave the function verified;
//! nothing in this crate re-checks.
//!
//! # Crate Dependencies
//!
//! Depends on `rill_ir` for the IR and its CFG utilities. Hashing is
//! `rustc-hash` throughout; diagnostics go through `tracing`.

pub mod control_deps;
pub mod dce;
pub mod pass;
pub mod post_dominators;

pub use control_deps::ControlDependence;
pub use dce::eliminate_dead_code;
pub use pass::{DeadCodeElimination, FunctionPass};
pub use post_dominators::{PostDominance, PostDominatorTree};

#[cfg(test)]
mod test_helpers;
