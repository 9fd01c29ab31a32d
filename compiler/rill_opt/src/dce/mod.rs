//! Aggressive dead-code elimination.
//!
//! Instructions are presumed dead until proven live. Liveness seeds
//! from instructions with observable effects (returns, escaping or
//! volatile stores, calls, volatile loads) and propagates backwards
//! over three edge kinds:
//!
//! 1. **operand edges** — a live instruction keeps the definitions of
//!    its operands live;
//! 2. **phi incoming edges** — a live phi keeps the terminator of each
//!    incoming predecessor live, since those branches select its value;
//! 3. **control dependences** — a live instruction keeps the terminator
//!    of every block its own block is control-dependent on live, since
//!    those branches decide whether it runs at all.
//!
//! Everything unmarked after the fixpoint is swept. Dead value
//! instructions are unlinked from program order. A dead conditional
//! branch is replaced with a jump to its nearest post-dominator that
//! still contains live code; when the ipdom walk runs off the tree
//! without finding one, the branch stays with its condition operand
//! severed. Dead unconditional jumps also stay: removing them is block
//! merging, a separate simplification.
//!
//! Mark and sweep never interleave. The live set is complete before the
//! first mutation, and one round reaches the fixpoint, so the pass
//! never iterates.

use rustc_hash::{FxHashMap, FxHashSet};

use rill_ir::{BlockId, Function, InstId, InstKind, Type, Value};

use crate::control_deps::ControlDependence;
use crate::post_dominators::PostDominance;

/// Remove instructions that provably cannot affect observable behavior.
///
/// Returns `true` if anything was deleted. Expects verified input and
/// leaves the function well-formed.
#[tracing::instrument(level = "debug", skip_all, fields(function = %func.name))]
pub fn eliminate_dead_code(func: &mut Function, pdt: &impl PostDominance) -> bool {
    MarkSweep::new(func, pdt).run()
}

/// One mark/sweep run over a single function.
struct MarkSweep<'a, P> {
    func: &'a mut Function,
    pdt: &'a P,
    /// Program order, snapshot before any mutation.
    order: Vec<(BlockId, InstId)>,
    /// Containing block of every linked instruction.
    parent: FxHashMap<InstId, BlockId>,
    control_deps: ControlDependence,
    /// Memoized iterated frontiers, keyed by querying block.
    cd_cache: FxHashMap<BlockId, Vec<BlockId>>,
    alive_insts: FxHashSet<InstId>,
    alive_blocks: FxHashSet<BlockId>,
    worklist: Vec<InstId>,
}

impl<'a, P: PostDominance> MarkSweep<'a, P> {
    fn new(func: &'a mut Function, pdt: &'a P) -> Self {
        let control_deps = ControlDependence::compute(func, pdt);

        let mut order = Vec::with_capacity(func.insts.len());
        let mut parent = FxHashMap::default();
        for block in func.block_ids() {
            for &inst in func.block_insts(block) {
                order.push((block, inst));
                parent.insert(inst, block);
            }
        }

        Self {
            func,
            pdt,
            order,
            parent,
            control_deps,
            cd_cache: FxHashMap::default(),
            alive_insts: FxHashSet::default(),
            alive_blocks: FxHashSet::default(),
            worklist: Vec::new(),
        }
    }

    fn run(mut self) -> bool {
        self.initialize();
        self.propagate();
        let (deleted, rewritten) = self.sweep();
        tracing::debug!(
            live = self.alive_insts.len(),
            deleted,
            rewritten,
            "dead code elimination finished"
        );
        deleted > 0
    }

    // ── Liveness oracle ─────────────────────────────────────────

    /// Is this instruction live regardless of uses?
    ///
    /// Returns always are. Stores are live only when the stored-through
    /// memory can be observed from outside the function; a store to a
    /// non-escaping local is presumed dead even if a local load reads
    /// the slot. Every other side-effecting instruction (calls,
    /// volatile accesses) is unconditionally live.
    fn is_intrinsically_live(&self, inst: InstId) -> bool {
        let kind = &self.func.inst(inst).kind;
        match kind {
            InstKind::Return { .. } => true,
            InstKind::Store { volatile, .. } => *volatile || self.store_may_escape(kind),
            _ => kind.may_have_side_effects(),
        }
    }

    /// A store escapes when its value or address involves a global or a
    /// pointer-typed parameter.
    fn store_may_escape(&self, kind: &InstKind) -> bool {
        kind.operands().into_iter().any(|value| match value {
            Value::Global(_) => true,
            Value::Arg(index) => self.func.param_type(index).is_some_and(Type::is_pointer),
            _ => false,
        })
    }

    // ── Mark ────────────────────────────────────────────────────

    /// Seed the worklist with every intrinsically live instruction.
    fn initialize(&mut self) {
        let seeds: Vec<InstId> = self
            .order
            .iter()
            .map(|&(_, inst)| inst)
            .filter(|&inst| self.is_intrinsically_live(inst))
            .collect();
        for inst in seeds {
            self.mark(inst);
        }
        tracing::debug!(seeds = self.worklist.len(), "seeded intrinsic liveness");
    }

    /// Mark one instruction live and queue it for propagation.
    fn mark(&mut self, inst: InstId) {
        if !self.alive_insts.insert(inst) {
            return;
        }
        tracing::trace!(%inst, "marked live");
        if let Some(&block) = self.parent.get(&inst) {
            self.alive_blocks.insert(block);
        } else {
            debug_assert!(false, "{inst} has no containing block");
        }
        self.worklist.push(inst);
    }

    /// Worklist fixpoint over the three liveness edge kinds.
    fn propagate(&mut self) {
        while let Some(inst) = self.worklist.pop() {
            let operands = self.func.inst(inst).kind.operands();
            for value in operands {
                if let Some(def) = value.as_inst() {
                    self.mark(def);
                }
            }

            let Some(&block) = self.parent.get(&inst) else {
                continue;
            };

            if let InstKind::Phi { incoming } = &self.func.inst(inst).kind {
                let sources: Vec<BlockId> = incoming.iter().map(|&(source, _)| source).collect();
                for source in sources {
                    if let Some(term) = self.func.terminator(source) {
                        self.mark(term);
                    }
                }
            }

            for dep in self.control_deps_of(block) {
                if let Some(term) = self.func.terminator(dep) {
                    self.mark(term);
                }
            }
        }
    }

    /// Iterated reverse frontier of `block`, memoized across the run.
    fn control_deps_of(&mut self, block: BlockId) -> Vec<BlockId> {
        if let Some(cached) = self.cd_cache.get(&block) {
            return cached.clone();
        }
        let mut deps: Vec<BlockId> = self.control_deps.iterated([block]).into_iter().collect();
        deps.sort_unstable();
        self.cd_cache.insert(block, deps.clone());
        deps
    }

    // ── Sweep ───────────────────────────────────────────────────

    /// Delete everything unmarked, in one pass over the snapshot.
    fn sweep(&mut self) -> (usize, usize) {
        let mut deleted = 0usize;
        let mut rewritten = 0usize;

        for (block, inst) in std::mem::take(&mut self.order) {
            if self.alive_insts.contains(&inst) {
                continue;
            }

            let kind = &self.func.inst(inst).kind;
            let is_terminator = kind.is_terminator();
            let is_conditional = kind.is_conditional_branch();

            if !is_terminator {
                self.func.clear_operands(inst);
                self.func.remove_inst(block, inst);
                deleted += 1;
                continue;
            }

            // Dead unconditional jumps stay; block merging is a
            // separate pass.
            if !is_conditional {
                continue;
            }

            // The branch decides nothing live. Jump straight to the
            // nearest post-dominator with live code, if there is one.
            let Some(target) = self.nearest_live_post_dominator(block) else {
                // No live block to land on. The branch stays, but its
                // condition is severed so deleting the condition's own
                // chain leaves no dangling edge.
                self.func.clear_operands(inst);
                continue;
            };
            tracing::trace!(%block, %target, "rewrote dead conditional branch");
            self.func
                .insert_before(block, inst, InstKind::Jump { dest: target }, Type::Void);
            self.func.clear_operands(inst);
            self.func.remove_inst(block, inst);
            deleted += 1;
            rewritten += 1;
        }

        (deleted, rewritten)
    }

    /// Climb the ipdom chain from `block` to the first block that
    /// contains live code.
    fn nearest_live_post_dominator(&self, block: BlockId) -> Option<BlockId> {
        let mut node = self.pdt.immediate_post_dominator(block);
        while let Some(candidate) = node {
            if self.alive_blocks.contains(&candidate) {
                return Some(candidate);
            }
            node = self.pdt.immediate_post_dominator(candidate);
        }
        None
    }
}
