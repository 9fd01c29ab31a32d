//! Function bodies: the instruction arena, blocks, and mutation primitives.
//!
//! A [`Function`] owns a single instruction arena (`Vec<InstData>`); blocks
//! are ordered `Vec<InstId>` sequences into it. Removing an instruction
//! unlinks it from its block but never compacts the arena, so outstanding
//! `InstId`s (in analysis sets, worklists, operand slots being rewritten)
//! stay valid through an entire pass run. Compacting a heavily-swept
//! function is a host concern, done by rebuilding it through the builder.
//!
//! Globals and external functions are per-function reference tables interned
//! by name; instructions refer to them by [`GlobalId`] / [`FuncRef`].

use smallvec::SmallVec;

use crate::entities::{BlockId, FuncRef, GlobalId, InstId};
use crate::instruction::{InstKind, Type};

// ── Containers ──────────────────────────────────────────────────────

/// A function parameter. [`Value::Arg`](crate::Value::Arg)`(n)` refers to
/// the `n`-th entry. A pointer-typed parameter may alias caller memory.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Param {
    pub name: String,
    pub ty: Type,
}

/// A global variable referenced by this function.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct GlobalData {
    pub name: String,
}

/// An external function referenced by call instructions.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct ExtFuncData {
    pub name: String,
}

/// An instruction slot in the arena: its kind plus its result type
/// (`Void` for instructions that produce no value).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct InstData {
    pub kind: InstKind,
    pub ty: Type,
}

/// A basic block: instructions in program order, terminator last.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct BlockData {
    pub insts: Vec<InstId>,
}

/// A function body.
///
/// Well-formedness (checked by [`verify_function`](crate::verify_function),
/// assumed by passes): at least one block; every block ends in exactly one
/// terminator, which is its last instruction; phis form a leading
/// contiguous group; every branch target exists; phi incoming lists name
/// exactly the block's predecessors.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Function {
    pub name: String,
    pub params: Vec<Param>,
    /// Instruction arena. Slots are appended, never removed or reused.
    pub insts: Vec<InstData>,
    pub blocks: Vec<BlockData>,
    pub entry: BlockId,
    /// Globals this function references, interned by name.
    pub globals: Vec<GlobalData>,
    /// External functions this function calls, interned by name.
    pub ext_funcs: Vec<ExtFuncData>,
}

impl Function {
    // ── Queries ─────────────────────────────────────────────────

    /// The instruction stored at `id`.
    #[inline]
    pub fn inst(&self, id: InstId) -> &InstData {
        &self.insts[id.index()]
    }

    /// Mutable access to the instruction stored at `id`.
    #[inline]
    pub fn inst_mut(&mut self, id: InstId) -> &mut InstData {
        &mut self.insts[id.index()]
    }

    /// The block stored at `id`.
    #[inline]
    pub fn block(&self, id: BlockId) -> &BlockData {
        &self.blocks[id.index()]
    }

    /// All block IDs, in allocation order.
    pub fn block_ids(&self) -> impl Iterator<Item = BlockId> {
        let count = u32::try_from(self.blocks.len())
            .unwrap_or_else(|_| panic!("block count exceeds u32::MAX"));
        (0..count).map(BlockId::new)
    }

    /// The instructions of `block` in program order.
    #[inline]
    pub fn block_insts(&self, block: BlockId) -> &[InstId] {
        &self.blocks[block.index()].insts
    }

    /// The terminator of `block`: its last instruction, provided that
    /// instruction is a terminator kind. `None` for an empty or
    /// unterminated block.
    pub fn terminator(&self, block: BlockId) -> Option<InstId> {
        let last = *self.blocks[block.index()].insts.last()?;
        self.inst(last).kind.is_terminator().then_some(last)
    }

    /// Successor blocks of `block`, from its terminator. Empty for
    /// return blocks and unterminated blocks.
    pub fn successors(&self, block: BlockId) -> SmallVec<[BlockId; 2]> {
        match self.terminator(block) {
            Some(t) => self.inst(t).kind.successors(),
            None => SmallVec::new(),
        }
    }

    /// The block containing `inst`, by scanning block sequences. `None`
    /// for unlinked instructions. Analyses that query parents in a loop
    /// should precompute a map instead.
    pub fn inst_block(&self, inst: InstId) -> Option<BlockId> {
        self.block_ids()
            .find(|&b| self.blocks[b.index()].insts.contains(&inst))
    }

    /// The declared type of parameter `index`.
    pub fn param_type(&self, index: u32) -> Option<Type> {
        self.params.get(index as usize).map(|p| p.ty)
    }

    // ── Construction ────────────────────────────────────────────

    /// Append a new instruction to the arena. The instruction is not yet
    /// linked into any block.
    pub fn push_inst(&mut self, kind: InstKind, ty: Type) -> InstId {
        let id = u32::try_from(self.insts.len())
            .unwrap_or_else(|_| panic!("instruction count exceeds u32::MAX"));
        self.insts.push(InstData { kind, ty });
        InstId::new(id)
    }

    /// Append a new empty block.
    pub fn add_block(&mut self) -> BlockId {
        let id = u32::try_from(self.blocks.len())
            .unwrap_or_else(|_| panic!("block count exceeds u32::MAX"));
        self.blocks.push(BlockData::default());
        BlockId::new(id)
    }

    /// Intern a global by name, reusing an existing entry if present.
    pub fn global_named(&mut self, name: &str) -> GlobalId {
        if let Some(pos) = self.globals.iter().position(|g| g.name == name) {
            let pos =
                u32::try_from(pos).unwrap_or_else(|_| panic!("global count exceeds u32::MAX"));
            return GlobalId::new(pos);
        }
        let id = u32::try_from(self.globals.len())
            .unwrap_or_else(|_| panic!("global count exceeds u32::MAX"));
        self.globals.push(GlobalData {
            name: name.to_owned(),
        });
        GlobalId::new(id)
    }

    /// Intern an external function by name, reusing an existing entry if
    /// present.
    pub fn ext_func_named(&mut self, name: &str) -> FuncRef {
        if let Some(pos) = self.ext_funcs.iter().position(|f| f.name == name) {
            let pos = u32::try_from(pos)
                .unwrap_or_else(|_| panic!("external function count exceeds u32::MAX"));
            return FuncRef::new(pos);
        }
        let id = u32::try_from(self.ext_funcs.len())
            .unwrap_or_else(|_| panic!("external function count exceeds u32::MAX"));
        self.ext_funcs.push(ExtFuncData {
            name: name.to_owned(),
        });
        FuncRef::new(id)
    }

    // ── Mutation primitives ─────────────────────────────────────

    /// Sever all operand edges of `inst`. See
    /// [`InstKind::clear_operands`].
    #[inline]
    pub fn clear_operands(&mut self, inst: InstId) {
        self.insts[inst.index()].kind.clear_operands();
    }

    /// Unlink `inst` from `block`'s program order. The arena slot stays,
    /// so the ID remains valid (but no longer executes).
    ///
    /// Debug-panics if `inst` is not in `block`.
    pub fn remove_inst(&mut self, block: BlockId, inst: InstId) {
        let insts = &mut self.blocks[block.index()].insts;
        let pos = insts.iter().position(|&i| i == inst);
        debug_assert!(pos.is_some(), "{inst} is not in {block}");
        if let Some(pos) = pos {
            insts.remove(pos);
        }
    }

    /// Create a new instruction and splice it into `block` immediately
    /// before `before`.
    ///
    /// # Panics
    ///
    /// Panics if `before` is not in `block`.
    pub fn insert_before(
        &mut self,
        block: BlockId,
        before: InstId,
        kind: InstKind,
        ty: Type,
    ) -> InstId {
        let id = self.push_inst(kind, ty);
        let insts = &mut self.blocks[block.index()].insts;
        let pos = insts
            .iter()
            .position(|&i| i == before)
            .unwrap_or_else(|| panic!("{before} is not in {block}"));
        insts.insert(pos, id);
        id
    }
}
