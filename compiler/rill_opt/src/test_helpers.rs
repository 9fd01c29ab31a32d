//! Shared helpers for analysis and transform tests.

use rill_ir::{BlockId, Function, InstKind};

/// Shorthand for `BlockId::new(n)`.
pub(crate) fn b(n: u32) -> BlockId {
    BlockId::new(n)
}

/// Count linked instructions matching `pred`, across all blocks.
pub(crate) fn count_insts(func: &Function, pred: impl Fn(&InstKind) -> bool) -> usize {
    func.block_ids()
        .flat_map(|block| func.block_insts(block).iter())
        .map(|&inst| &func.inst(inst).kind)
        .filter(|kind| pred(kind))
        .count()
}

/// Total number of linked instructions.
pub(crate) fn num_insts(func: &Function) -> usize {
    count_insts(func, |_| true)
}
