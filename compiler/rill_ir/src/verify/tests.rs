use crate::builder::FunctionBuilder;
use crate::entities::InstId;
use crate::function::Param;
use crate::instruction::{BinaryOp, CmpOp, InstKind, Type, Value};
use crate::test_helpers::{b, raw_func, raw_func_with_params};

use super::*;

fn id(n: u32) -> InstId {
    InstId::new(n)
}

/// A builder-made diamond with a phi has no defects.
#[test]
fn well_formed_function_passes() {
    let mut fb = FunctionBuilder::new("ok");
    let x = fb.param("x", Type::Int);
    let entry = fb.create_block();
    let neg = fb.create_block();
    let merge = fb.create_block();
    fb.switch_to_block(entry);
    let cond = fb.cmp(CmpOp::Lt, x, Value::Const(0));
    fb.branch(cond, neg, merge);
    fb.switch_to_block(neg);
    let flipped = fb.binary(BinaryOp::Sub, Value::Const(0), x);
    fb.jump(merge);
    fb.switch_to_block(merge);
    let result = fb.phi(Type::Int, vec![(entry, x), (neg, flipped)]);
    fb.ret(Some(result));

    assert_eq!(verify_function(&fb.finish()), Ok(()));
}

#[test]
fn empty_function_rejected() {
    assert_eq!(verify_function(&raw_func(vec![])), Err(VerifyError::NoBlocks));
}

#[test]
fn out_of_range_entry_rejected() {
    let mut func = raw_func(vec![vec![InstKind::Return { value: None }]]);
    func.entry = b(5);
    assert_eq!(
        verify_function(&func),
        Err(VerifyError::BadEntry { entry: b(5) })
    );
}

#[test]
fn unterminated_block_rejected() {
    let func = raw_func(vec![vec![InstKind::Alloca]]);
    assert_eq!(
        verify_function(&func),
        Err(VerifyError::MissingTerminator { block: b(0) })
    );
}

#[test]
fn empty_block_rejected() {
    let func = raw_func(vec![vec![InstKind::Return { value: None }], vec![]]);
    assert_eq!(
        verify_function(&func),
        Err(VerifyError::MissingTerminator { block: b(1) })
    );
}

/// A terminator anywhere but last position is rejected.
#[test]
fn early_terminator_rejected() {
    let func = raw_func(vec![vec![
        InstKind::Return { value: None },
        InstKind::Alloca,
    ]]);
    assert_eq!(
        verify_function(&func),
        Err(VerifyError::EarlyTerminator {
            block: b(0),
            inst: id(0),
        })
    );
}

#[test]
fn branch_to_missing_block_rejected() {
    let func = raw_func(vec![vec![InstKind::Jump { dest: b(9) }]]);
    assert_eq!(
        verify_function(&func),
        Err(VerifyError::BadTarget {
            block: b(0),
            target: b(9),
        })
    );
}

/// Phis below a non-phi instruction are rejected.
#[test]
fn misplaced_phi_rejected() {
    let func = raw_func(vec![vec![
        InstKind::Alloca,
        InstKind::Phi { incoming: vec![] },
        InstKind::Return { value: None },
    ]]);
    assert_eq!(
        verify_function(&func),
        Err(VerifyError::MisplacedPhi {
            block: b(0),
            inst: id(1),
        })
    );
}

/// A phi incoming entry naming a non-predecessor is rejected.
#[test]
fn phi_with_unknown_pred_rejected() {
    let func = raw_func(vec![
        vec![InstKind::Jump { dest: b(1) }],
        vec![
            InstKind::Phi {
                incoming: vec![(b(2), Value::Const(0))],
            },
            InstKind::Return { value: None },
        ],
    ]);
    assert_eq!(
        verify_function(&func),
        Err(VerifyError::PhiPredMismatch {
            block: b(1),
            inst: id(1),
            pred: b(2),
        })
    );
}

/// A phi missing one of its block's predecessors is rejected.
#[test]
fn phi_missing_pred_rejected() {
    let func = raw_func(vec![
        vec![InstKind::Jump { dest: b(1) }],
        vec![
            InstKind::Phi { incoming: vec![] },
            InstKind::Return { value: None },
        ],
    ]);
    assert_eq!(
        verify_function(&func),
        Err(VerifyError::PhiPredMismatch {
            block: b(1),
            inst: id(1),
            pred: b(0),
        })
    );
}

#[test]
fn argument_out_of_range_rejected() {
    let func = raw_func(vec![vec![InstKind::Return {
        value: Some(Value::Arg(3)),
    }]]);
    assert_eq!(
        verify_function(&func),
        Err(VerifyError::ArgOutOfRange {
            inst: id(0),
            index: 3,
        })
    );
}

/// In-range arguments are accepted.
#[test]
fn argument_in_range_accepted() {
    let func = raw_func_with_params(
        vec![Param {
            name: "x".to_owned(),
            ty: Type::Int,
        }],
        vec![vec![InstKind::Return {
            value: Some(Value::Arg(0)),
        }]],
    );
    assert_eq!(verify_function(&func), Ok(()));
}

/// Operands must refer to instructions linked into some block.
#[test]
fn dangling_operand_rejected() {
    let func = raw_func(vec![vec![InstKind::Return {
        value: Some(Value::Inst(id(9))),
    }]]);
    assert_eq!(
        verify_function(&func),
        Err(VerifyError::DanglingOperand {
            inst: id(0),
            operand: id(9),
        })
    );
}
