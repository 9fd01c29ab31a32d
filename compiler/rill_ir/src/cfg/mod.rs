//! Shared CFG traversal utilities.
//!
//! Free functions over [`Function`] that analyses and the verifier both
//! need. They live here rather than in an analysis crate so consumers do
//! not import from each other: everything downstream depends on `cfg`,
//! nothing here depends on downstream.

use rustc_hash::FxHashSet;

use crate::entities::BlockId;
use crate::function::Function;

/// Compute the predecessor list for each block (deduplicated).
///
/// Returns a vector indexed by block index. A conditional branch with
/// both targets equal contributes its block once.
pub fn compute_predecessors(func: &Function) -> Vec<Vec<BlockId>> {
    let num_blocks = func.blocks.len();
    let mut predecessors: Vec<Vec<BlockId>> = vec![Vec::new(); num_blocks];

    for block in func.block_ids() {
        let mut seen = FxHashSet::default();
        for succ in func.successors(block) {
            if succ.index() < num_blocks && seen.insert(succ) {
                predecessors[succ.index()].push(block);
            }
        }
    }

    predecessors
}

/// Compute a postorder traversal of the CFG starting from the entry
/// block. Only reachable blocks appear.
///
/// Iterative DFS with an explicit stack; deeply nested CFGs must not
/// overflow the call stack.
pub fn compute_postorder(func: &Function) -> Vec<BlockId> {
    let num_blocks = func.blocks.len();
    let mut visited = vec![false; num_blocks];
    let mut postorder = Vec::with_capacity(num_blocks);

    // Stack entries: (block, children_processed). On the first visit we
    // push successors; on the second we emit the block.
    let mut stack: Vec<(BlockId, bool)> = vec![(func.entry, false)];

    while let Some(&mut (block, ref mut children_done)) = stack.last_mut() {
        if *children_done {
            postorder.push(block);
            stack.pop();
            continue;
        }

        *children_done = true;

        if block.index() >= num_blocks || visited[block.index()] {
            stack.pop();
            continue;
        }
        visited[block.index()] = true;

        for succ in func.successors(block) {
            if succ.index() < num_blocks && !visited[succ.index()] {
                stack.push((succ, false));
            }
        }
    }

    postorder
}

/// Blocks whose terminator has no successors (returns), in block order.
pub fn exit_blocks(func: &Function) -> Vec<BlockId> {
    func.block_ids()
        .filter(|&b| func.successors(b).is_empty())
        .collect()
}
