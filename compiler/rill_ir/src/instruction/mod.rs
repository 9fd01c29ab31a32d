//! Instruction kinds, operand values, and kind predicates.
//!
//! The Rill IR follows the same basic-block structure as LLVM IR and
//! Rust's MIR: a function is a graph of blocks, each block an ordered
//! instruction sequence ending in exactly one terminator. Instructions
//! are values — [`Value::Inst`] refers to the result of another
//! instruction by its arena ID, so operand edges are plain copyable IDs
//! rather than pointers.
//!
//! Analyses mostly consume this module through the kind predicates
//! ([`InstKind::is_terminator`], [`InstKind::may_have_side_effects`], ...)
//! and the operand walk ([`InstKind::operands`]), keeping their match
//! logic out of the pass code.

use smallvec::{smallvec, SmallVec};

use crate::entities::{BlockId, FuncRef, GlobalId, InstId};

// ── Types ───────────────────────────────────────────────────────────

/// Static type of a value.
///
/// The lattice is deliberately small: optimization passes only need to
/// distinguish pointer-typed values (for escape reasoning) and `Void`
/// (instructions with no result) from the rest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum Type {
    /// No value. The type of stores, branches, and `return` without a value.
    Void,
    Bool,
    Int,
    /// A pointer into memory (stack slot, global, or aliased parameter).
    Ptr,
}

impl Type {
    /// Whether this is a pointer type.
    #[inline]
    pub fn is_pointer(self) -> bool {
        matches!(self, Type::Ptr)
    }
}

// ── Operand values ──────────────────────────────────────────────────

/// An operand position in an instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    /// The result of another instruction.
    Inst(InstId),
    /// The `n`-th function parameter.
    Arg(u32),
    /// An integer constant.
    Const(i64),
    /// The address of a global variable.
    Global(GlobalId),
}

impl Value {
    /// The instruction this operand refers to, if it refers to one.
    #[inline]
    pub fn as_inst(self) -> Option<InstId> {
        match self {
            Value::Inst(id) => Some(id),
            _ => None,
        }
    }

    /// Whether this operand is a global variable reference.
    #[inline]
    pub fn is_global(self) -> bool {
        matches!(self, Value::Global(_))
    }

    /// The parameter index this operand refers to, if it is an argument.
    #[inline]
    pub fn as_arg(self) -> Option<u32> {
        match self {
            Value::Arg(n) => Some(n),
            _ => None,
        }
    }
}

// ── Operators ───────────────────────────────────────────────────────

/// Binary arithmetic operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
}

/// Integer comparison operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
}

// ── Instructions ────────────────────────────────────────────────────

/// A single instruction.
///
/// Value-producing kinds bind their result to the instruction's own
/// arena ID (referenced as [`Value::Inst`]); the result type lives in
/// [`InstData::ty`](crate::InstData). Terminator kinds (`Jump`,
/// `Branch`, `Return`) may only appear as the last instruction of a
/// block; phis may only appear in a block's leading contiguous group.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum InstKind {
    /// Binary arithmetic: `lhs op rhs`.
    Binary {
        op: BinaryOp,
        lhs: Value,
        rhs: Value,
    },

    /// Integer comparison producing a `Bool`.
    Cmp { op: CmpOp, lhs: Value, rhs: Value },

    /// Allocate a stack slot; yields its address. Pure: the slot only
    /// matters once something loads from it.
    Alloca,

    /// Read memory at `addr`.
    Load { addr: Value, volatile: bool },

    /// Write `value` to memory at `addr`. Produces no result.
    Store {
        value: Value,
        addr: Value,
        volatile: bool,
    },

    /// Call an external function. Assumed to have arbitrary side effects.
    Call { callee: FuncRef, args: Vec<Value> },

    /// Merge node: the value depends on which predecessor block control
    /// arrived from. `incoming` pairs each predecessor with the value
    /// flowing in along that edge.
    Phi { incoming: Vec<(BlockId, Value)> },

    /// Unconditional branch.
    Jump { dest: BlockId },

    /// Two-way conditional branch on a `Bool` condition.
    Branch {
        cond: Value,
        then_dest: BlockId,
        else_dest: BlockId,
    },

    /// Return from the function.
    Return { value: Option<Value> },
}

impl InstKind {
    /// Whether this instruction ends a block.
    #[inline]
    pub fn is_terminator(&self) -> bool {
        matches!(
            self,
            InstKind::Jump { .. } | InstKind::Branch { .. } | InstKind::Return { .. }
        )
    }

    /// Whether this instruction transfers control to another block.
    #[inline]
    pub fn is_branch(&self) -> bool {
        matches!(self, InstKind::Jump { .. } | InstKind::Branch { .. })
    }

    /// Whether this is a two-way conditional branch.
    #[inline]
    pub fn is_conditional_branch(&self) -> bool {
        matches!(self, InstKind::Branch { .. })
    }

    /// Whether this is a phi merge node.
    #[inline]
    pub fn is_phi(&self) -> bool {
        matches!(self, InstKind::Phi { .. })
    }

    /// Whether this is a return.
    #[inline]
    pub fn is_return(&self) -> bool {
        matches!(self, InstKind::Return { .. })
    }

    /// Whether this is a memory store.
    #[inline]
    pub fn is_store(&self) -> bool {
        matches!(self, InstKind::Store { .. })
    }

    /// Whether executing this instruction can affect state outside the
    /// function's own SSA values: any store, any call, or a volatile load.
    pub fn may_have_side_effects(&self) -> bool {
        match self {
            InstKind::Store { .. } | InstKind::Call { .. } => true,
            InstKind::Load { volatile, .. } => *volatile,
            _ => false,
        }
    }

    /// All operand values this instruction reads, in operand order.
    ///
    /// Includes phi incoming values and branch conditions. Block labels
    /// are not operands; use [`successors`](Self::successors) for those.
    pub fn operands(&self) -> Vec<Value> {
        match self {
            InstKind::Binary { lhs, rhs, .. } | InstKind::Cmp { lhs, rhs, .. } => {
                vec![*lhs, *rhs]
            }
            InstKind::Alloca | InstKind::Jump { .. } => vec![],
            InstKind::Load { addr, .. } => vec![*addr],
            InstKind::Store { value, addr, .. } => vec![*value, *addr],
            InstKind::Call { args, .. } => args.clone(),
            InstKind::Phi { incoming } => incoming.iter().map(|(_, v)| *v).collect(),
            InstKind::Branch { cond, .. } => vec![*cond],
            InstKind::Return { value } => value.iter().copied().collect(),
        }
    }

    /// Rewrite every operand slot to `Value::Const(0)`, severing all
    /// operand edges. Callers use this before unlinking an instruction,
    /// or to keep a retained instruction from referencing ones that are
    /// about to be unlinked.
    pub fn clear_operands(&mut self) {
        match self {
            InstKind::Binary { lhs, rhs, .. } | InstKind::Cmp { lhs, rhs, .. } => {
                *lhs = Value::Const(0);
                *rhs = Value::Const(0);
            }
            InstKind::Alloca | InstKind::Jump { .. } => {}
            InstKind::Load { addr, .. } => *addr = Value::Const(0),
            InstKind::Store { value, addr, .. } => {
                *value = Value::Const(0);
                *addr = Value::Const(0);
            }
            InstKind::Call { args, .. } => {
                for arg in args {
                    *arg = Value::Const(0);
                }
            }
            InstKind::Phi { incoming } => {
                for (_, value) in incoming {
                    *value = Value::Const(0);
                }
            }
            InstKind::Branch { cond, .. } => *cond = Value::Const(0),
            InstKind::Return { value } => {
                if let Some(value) = value {
                    *value = Value::Const(0);
                }
            }
        }
    }

    /// Successor blocks of a terminator, in target order. Empty for
    /// returns and for non-terminator kinds.
    pub fn successors(&self) -> SmallVec<[BlockId; 2]> {
        match self {
            InstKind::Jump { dest } => smallvec![*dest],
            InstKind::Branch {
                then_dest,
                else_dest,
                ..
            } => smallvec![*then_dest, *else_dest],
            _ => smallvec![],
        }
    }
}
