//! Basic-block intermediate representation for the Rill compiler.
//!
//! This crate provides:
//!
//! - **The IR itself** ([`Function`], [`BlockData`], [`InstData`],
//!   [`InstKind`], [`Value`]) — an arena-based basic-block representation:
//!   a function owns one instruction arena, blocks are ordered ID
//!   sequences into it, and operand edges are plain copyable [`InstId`]s.
//! - **Construction** ([`FunctionBuilder`]) — position at a block, emit
//!   instructions, terminate, in the LLVM `IRBuilder` shape.
//! - **CFG traversal** ([`cfg`]) — predecessors, postorder, exit blocks;
//!   the utilities every downstream analysis starts from.
//! - **Verification** ([`verify_function`]) — structural well-formedness
//!   with typed [`VerifyError`]s; optimization passes assume verified
//!   input and never re-check.
//!
//! # Design
//!
//! Instructions are values: [`Value::Inst`] refers to another
//! instruction's result by arena ID, so analyses track liveness and
//! operand edges as sets of IDs with no pointer graph to maintain.
//! Structural mutation is limited to three primitives
//! ([`Function::clear_operands`], [`Function::remove_inst`],
//! [`Function::insert_before`]); arena slots are never reused within a
//! pass run, keeping outstanding IDs valid across sweeps.
//!
//! # Crate Dependencies
//!
//! No compiler-internal dependencies — this crate is the bottom of the
//! stack. `serde`/`bincode` are optional behind the `cache` feature for
//! on-disk IR snapshots.

pub mod builder;
pub mod cfg;
pub mod entities;
pub mod function;
pub mod instruction;
mod print;
pub mod verify;

pub use builder::FunctionBuilder;
pub use cfg::{compute_postorder, compute_predecessors, exit_blocks};
pub use entities::{BlockId, FuncRef, GlobalId, InstId};
pub use function::{BlockData, ExtFuncData, Function, GlobalData, InstData, Param};
pub use instruction::{BinaryOp, CmpOp, InstKind, Type, Value};
pub use verify::{verify_function, VerifyError};

#[cfg(test)]
mod test_helpers;
