//! Post-dominator tree construction.
//!
//! Block B post-dominates block A when every path from A to function
//! exit passes through B. The tree is the dominator tree of the
//! reversed CFG, rooted at a virtual exit node that joins all exit
//! blocks, so functions with several returns still get a single tree.
//!
//! Uses the Cooper-Harvey-Kennedy iterative algorithm: process blocks
//! in reverse postorder of the reversed CFG, intersect the candidate
//! dominators of each node's reversed-CFG predecessors (its forward
//! successors), iterate to fixpoint. Converges in a few passes for
//! typical CFGs.
//!
//! Reference: Cooper, Harvey, Kennedy — "A Simple, Fast Dominance
//! Algorithm" (2001).

use rustc_hash::FxHashSet;

use rill_ir::cfg::{compute_predecessors, exit_blocks};
use rill_ir::{BlockId, Function};

/// Post-dominance queries consumed by transforms.
///
/// Transforms depend on this trait rather than on [`PostDominatorTree`]
/// directly, so tests and alternate (e.g. incremental) implementations
/// can be substituted without touching the transform logic.
pub trait PostDominance {
    /// The immediate post-dominator of `block`.
    ///
    /// `None` when the only post-dominator is the virtual exit root:
    /// `block` is itself an exit, its outgoing paths never reconverge
    /// before reaching distinct exits, or it cannot reach any exit.
    fn immediate_post_dominator(&self, block: BlockId) -> Option<BlockId>;
}

/// Immediate post-dominators for every block of one function.
pub struct PostDominatorTree {
    /// Indexed by block; `None` means the virtual root (or unreachable
    /// in the reversed CFG).
    ipdom: Vec<Option<BlockId>>,
}

impl PostDominatorTree {
    /// Build the post-dominator tree for a function.
    pub fn compute(func: &Function) -> Self {
        let n = func.blocks.len();
        let virtual_root = n;
        if n == 0 {
            return Self { ipdom: vec![] };
        }

        let exits = exit_blocks(func);
        // Predecessors in the reversed CFG: forward successors, plus the
        // virtual root for exit blocks. Deduplicated like forward
        // predecessor lists.
        let mut rpreds: Vec<Vec<usize>> = vec![Vec::new(); n];
        for block in func.block_ids() {
            let mut seen = FxHashSet::default();
            for succ in func.successors(block) {
                if succ.index() < n && seen.insert(succ.index()) {
                    rpreds[block.index()].push(succ.index());
                }
            }
        }
        for exit in &exits {
            rpreds[exit.index()].push(virtual_root);
        }

        let rpo = Self::reversed_rpo(func, &exits, virtual_root);

        // Map node → RPO position for O(1) intersect comparisons.
        let mut rpo_pos = vec![0usize; n + 1];
        for (pos, &node) in rpo.iter().enumerate() {
            rpo_pos[node] = pos;
        }

        let mut ipdom: Vec<Option<usize>> = vec![None; n + 1];
        ipdom[virtual_root] = Some(virtual_root);

        let mut changed = true;
        while changed {
            changed = false;
            // rpo[0] is always the virtual root; skip it.
            for &node in &rpo[1..] {
                // First processed predecessor (in the reversed CFG).
                let mut new_ipdom = None;
                for &pred in &rpreds[node] {
                    if ipdom[pred].is_some() {
                        new_ipdom = Some(pred);
                        break;
                    }
                }

                let Some(mut new_ipdom) = new_ipdom else {
                    continue;
                };

                for &pred in &rpreds[node] {
                    if pred == new_ipdom {
                        continue;
                    }
                    if ipdom[pred].is_some() {
                        new_ipdom = Self::intersect(pred, new_ipdom, &ipdom, &rpo_pos);
                    }
                }

                if ipdom[node] != Some(new_ipdom) {
                    ipdom[node] = Some(new_ipdom);
                    changed = true;
                }
            }
        }

        #[expect(
            clippy::cast_possible_truncation,
            reason = "block counts fit in u32"
        )]
        let ipdom = ipdom[..n]
            .iter()
            .map(|&node| match node {
                Some(p) if p != virtual_root => Some(BlockId::new(p as u32)),
                _ => None,
            })
            .collect();

        tracing::debug!(
            function = %func.name,
            num_blocks = n,
            num_exits = exits.len(),
            "computed post-dominator tree"
        );

        Self { ipdom }
    }

    /// Does block `a` post-dominate block `b`?
    ///
    /// A block post-dominates itself.
    pub fn post_dominates(&self, a: BlockId, b: BlockId) -> bool {
        let mut current = b;
        loop {
            if current == a {
                return true;
            }
            match self.ipdom[current.index()] {
                Some(next) => current = next,
                None => return false,
            }
        }
    }

    /// Postorder of the reversed CFG from the virtual root, reversed.
    ///
    /// Node indices are block indices; `virtual_root` is one past the
    /// last block. Blocks that cannot reach an exit never appear.
    fn reversed_rpo(func: &Function, exits: &[BlockId], virtual_root: usize) -> Vec<usize> {
        let n = func.blocks.len();
        let fpreds = compute_predecessors(func);

        let mut visited = vec![false; n + 1];
        let mut postorder = Vec::with_capacity(n + 1);
        let mut stack: Vec<(usize, bool)> = vec![(virtual_root, false)];

        while let Some(&mut (node, ref mut children_done)) = stack.last_mut() {
            if *children_done {
                postorder.push(node);
                stack.pop();
                continue;
            }

            *children_done = true;

            if visited[node] {
                stack.pop();
                continue;
            }
            visited[node] = true;

            // Successors in the reversed CFG: the exits for the virtual
            // root, forward predecessors for everything else.
            if node == virtual_root {
                for exit in exits {
                    if !visited[exit.index()] {
                        stack.push((exit.index(), false));
                    }
                }
            } else {
                for pred in &fpreds[node] {
                    if !visited[pred.index()] {
                        stack.push((pred.index(), false));
                    }
                }
            }
        }

        postorder.reverse();
        postorder
    }

    /// CHK intersect: walk two fingers upward until they meet.
    ///
    /// Both nodes are processed, so their ipdom chains lead to the
    /// virtual root and `ipdom[x]` is always `Some` along the way.
    fn intersect(mut a: usize, mut b: usize, ipdom: &[Option<usize>], rpo_pos: &[usize]) -> usize {
        while a != b {
            while rpo_pos[a] > rpo_pos[b] {
                let Some(next) = ipdom[a] else {
                    debug_assert!(false, "intersect: broken ipdom chain at {a}");
                    return a;
                };
                a = next;
            }
            while rpo_pos[b] > rpo_pos[a] {
                let Some(next) = ipdom[b] else {
                    debug_assert!(false, "intersect: broken ipdom chain at {b}");
                    return b;
                };
                b = next;
            }
        }
        a
    }
}

impl PostDominance for PostDominatorTree {
    fn immediate_post_dominator(&self, block: BlockId) -> Option<BlockId> {
        self.ipdom[block.index()]
    }
}
