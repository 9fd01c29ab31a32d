//! Shared test utilities for IR construction.
//!
//! Factories for building raw [`Function`] values directly, bypassing
//! the builder's guards — verifier tests need malformed shapes the
//! builder refuses to produce. Only compiled in test builds.

use crate::entities::BlockId;
use crate::function::{Function, Param};
use crate::instruction::{InstKind, Type};

/// Shorthand for `BlockId::new(n)`.
pub(crate) fn b(n: u32) -> BlockId {
    BlockId::new(n)
}

/// The result type the builder would assign to `kind`.
fn result_type(kind: &InstKind) -> Type {
    match kind {
        InstKind::Binary { .. }
        | InstKind::Load { .. }
        | InstKind::Call { .. }
        | InstKind::Phi { .. } => Type::Int,
        InstKind::Cmp { .. } => Type::Bool,
        InstKind::Alloca => Type::Ptr,
        _ => Type::Void,
    }
}

/// Build a function from raw per-block instruction kinds, no parameters.
pub(crate) fn raw_func(blocks: Vec<Vec<InstKind>>) -> Function {
    raw_func_with_params(Vec::new(), blocks)
}

/// Build a function from raw per-block instruction kinds. Block 0 is the
/// entry. No well-formedness is enforced.
pub(crate) fn raw_func_with_params(params: Vec<Param>, blocks: Vec<Vec<InstKind>>) -> Function {
    let mut func = Function {
        name: "test".to_owned(),
        params,
        insts: Vec::new(),
        blocks: Vec::new(),
        entry: BlockId::new(0),
        globals: Vec::new(),
        ext_funcs: Vec::new(),
    };
    for kinds in blocks {
        let block = func.add_block();
        for kind in kinds {
            let ty = result_type(&kind);
            let inst = func.push_inst(kind, ty);
            func.blocks[block.index()].insts.push(inst);
        }
    }
    func
}
