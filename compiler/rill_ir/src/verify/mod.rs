//! Structural well-formedness checks.
//!
//! [`verify_function`] diagnoses malformed IR with a typed error;
//! optimization passes do not re-check these properties and are free to
//! misbehave on unverified input. Tests run the verifier after every
//! structural mutation.

use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::cfg::compute_predecessors;
use crate::entities::{BlockId, InstId};
use crate::function::Function;
use crate::instruction::{InstKind, Value};

/// A structural defect in a [`Function`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VerifyError {
    #[error("function has no blocks")]
    NoBlocks,

    #[error("entry {entry} does not exist")]
    BadEntry { entry: BlockId },

    #[error("{block} does not end in a terminator")]
    MissingTerminator { block: BlockId },

    #[error("{inst} terminates {block} before its last position")]
    EarlyTerminator { block: BlockId, inst: InstId },

    #[error("{block} targets nonexistent {target}")]
    BadTarget { block: BlockId, target: BlockId },

    #[error("phi {inst} appears after non-phi instructions in {block}")]
    MisplacedPhi { block: BlockId, inst: InstId },

    #[error("phi {inst} in {block} disagrees with predecessor {pred}")]
    PhiPredMismatch {
        block: BlockId,
        inst: InstId,
        pred: BlockId,
    },

    #[error("{inst} references argument {index} out of range")]
    ArgOutOfRange { inst: InstId, index: u32 },

    #[error("{inst} uses {operand}, which is not in any block")]
    DanglingOperand { inst: InstId, operand: InstId },
}

/// Check every structural invariant the passes assume. Returns the first
/// defect found.
pub fn verify_function(func: &Function) -> Result<(), VerifyError> {
    if func.blocks.is_empty() {
        return Err(VerifyError::NoBlocks);
    }
    if func.entry.index() >= func.blocks.len() {
        return Err(VerifyError::BadEntry { entry: func.entry });
    }

    // Every instruction linked into some block, for dangling-operand checks.
    let mut linked: FxHashSet<InstId> = FxHashSet::default();
    for block in func.block_ids() {
        linked.extend(func.block_insts(block).iter().copied());
    }

    for block in func.block_ids() {
        let insts = func.block_insts(block);

        let mut seen_non_phi = false;
        for (pos, &inst) in insts.iter().enumerate() {
            let kind = &func.inst(inst).kind;

            if kind.is_terminator() && pos + 1 != insts.len() {
                return Err(VerifyError::EarlyTerminator { block, inst });
            }

            if kind.is_phi() {
                if seen_non_phi {
                    return Err(VerifyError::MisplacedPhi { block, inst });
                }
            } else {
                seen_non_phi = true;
            }

            for target in kind.successors() {
                if target.index() >= func.blocks.len() {
                    return Err(VerifyError::BadTarget { block, target });
                }
            }

            for operand in kind.operands() {
                match operand {
                    Value::Arg(index) if index as usize >= func.params.len() => {
                        return Err(VerifyError::ArgOutOfRange { inst, index });
                    }
                    Value::Inst(operand) if !linked.contains(&operand) => {
                        return Err(VerifyError::DanglingOperand { inst, operand });
                    }
                    _ => {}
                }
            }
        }

        if func.terminator(block).is_none() {
            return Err(VerifyError::MissingTerminator { block });
        }
    }

    // Phi incoming lists must name exactly the block's predecessors.
    let preds = compute_predecessors(func);
    for block in func.block_ids() {
        let pred_set: FxHashSet<BlockId> = preds[block.index()].iter().copied().collect();
        for &inst in func.block_insts(block) {
            let InstKind::Phi { incoming } = &func.inst(inst).kind else {
                continue;
            };
            let incoming_set: FxHashSet<BlockId> = incoming.iter().map(|&(b, _)| b).collect();
            for &(pred, _) in incoming {
                if !pred_set.contains(&pred) {
                    return Err(VerifyError::PhiPredMismatch { block, inst, pred });
                }
            }
            for &pred in &pred_set {
                if !incoming_set.contains(&pred) {
                    return Err(VerifyError::PhiPredMismatch { block, inst, pred });
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests;
