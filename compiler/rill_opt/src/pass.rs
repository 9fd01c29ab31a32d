//! The pass interface the pipeline driver runs transforms through.

use rill_ir::Function;

use crate::dce::eliminate_dead_code;
use crate::post_dominators::PostDominatorTree;

/// A transform applied to one function at a time.
pub trait FunctionPass {
    /// Short stable name, for logs and pipeline configuration.
    fn name(&self) -> &'static str;

    /// Run on one function. Returns whether anything changed.
    fn run(&mut self, func: &mut Function) -> bool;
}

/// Aggressive dead-code elimination as a pipeline pass: computes a
/// fresh post-dominator tree per function, then marks and sweeps.
#[derive(Debug, Default)]
pub struct DeadCodeElimination;

impl FunctionPass for DeadCodeElimination {
    fn name(&self) -> &'static str {
        "aggressive-dce"
    }

    fn run(&mut self, func: &mut Function) -> bool {
        let pdt = PostDominatorTree::compute(func);
        eliminate_dead_code(func, &pdt)
    }
}

#[cfg(test)]
mod tests {
    use rill_ir::{BinaryOp, FunctionBuilder, Type, Value};

    use super::{DeadCodeElimination, FunctionPass};

    /// The pass advertises a stable name.
    #[test]
    fn pass_name() {
        assert_eq!(DeadCodeElimination.name(), "aggressive-dce");
    }

    /// Through the pass interface, one application reaches the
    /// fixpoint and a second is the identity.
    #[test]
    fn pass_runs_to_fixpoint() {
        let mut fb = FunctionBuilder::new("twice");
        let x = fb.param("x", Type::Int);
        let entry = fb.create_block();
        fb.switch_to_block(entry);
        fb.binary(BinaryOp::Add, x, Value::Const(1));
        fb.ret(Some(x));
        let mut func = fb.finish();

        let mut pass = DeadCodeElimination;
        assert!(pass.run(&mut func));
        assert!(!pass.run(&mut func));
    }
}
