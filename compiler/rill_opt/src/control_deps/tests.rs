//! Control-dependence tests: frontiers and their iterated closure.

use pretty_assertions::assert_eq;
use rustc_hash::FxHashSet;

use rill_ir::{BlockId, CmpOp, Function, FunctionBuilder, Type, Value};

use super::ControlDependence;
use crate::post_dominators::PostDominatorTree;

fn b(n: u32) -> BlockId {
    BlockId::new(n)
}

fn analyze(func: &Function) -> ControlDependence {
    let tree = PostDominatorTree::compute(func);
    ControlDependence::compute(func, &tree)
}

/// Both arms of a diamond depend on the branch block; the branch and
/// the merge depend on nothing.
#[test]
fn diamond_arms_depend_on_branch() {
    let mut fb = FunctionBuilder::new("diamond");
    let x = fb.param("x", Type::Int);
    let entry = fb.create_block();
    let then_b = fb.create_block();
    let else_b = fb.create_block();
    let merge = fb.create_block();
    fb.switch_to_block(entry);
    let cond = fb.cmp(CmpOp::Lt, x, Value::Const(10));
    fb.branch(cond, then_b, else_b);
    fb.switch_to_block(then_b);
    fb.jump(merge);
    fb.switch_to_block(else_b);
    fb.jump(merge);
    fb.switch_to_block(merge);
    fb.ret(Some(x));
    let func = fb.finish();

    let cd = analyze(&func);
    assert!(cd.frontier(b(0)).is_empty());
    assert_eq!(cd.frontier(b(1)), &[b(0)]);
    assert_eq!(cd.frontier(b(2)), &[b(0)]);
    assert!(cd.frontier(b(3)).is_empty());
}

/// An inner arm of nested branches transitively depends on both
/// branch blocks; a block both arms reach depends only on the outer.
#[test]
fn nested_branches_close_transitively() {
    let mut fb = FunctionBuilder::new("nested");
    let x = fb.param("x", Type::Int);
    let b0 = fb.create_block();
    let b1 = fb.create_block();
    let b2 = fb.create_block();
    let b3 = fb.create_block();
    let b4 = fb.create_block();
    fb.switch_to_block(b0);
    let outer = fb.cmp(CmpOp::Lt, x, Value::Const(10));
    fb.branch(outer, b1, b4);
    fb.switch_to_block(b1);
    let inner = fb.cmp(CmpOp::Eq, x, Value::Const(0));
    fb.branch(inner, b2, b3);
    fb.switch_to_block(b2);
    fb.jump(b3);
    fb.switch_to_block(b3);
    fb.jump(b4);
    fb.switch_to_block(b4);
    fb.ret(Some(x));
    let func = fb.finish();

    let cd = analyze(&func);
    assert_eq!(cd.frontier(b(1)), &[b(0)]);
    assert_eq!(cd.frontier(b(2)), &[b(1)]);
    assert_eq!(cd.frontier(b(3)), &[b(0)]);
    assert!(cd.frontier(b(4)).is_empty());

    let closure = cd.iterated([b(2)]);
    let expected: FxHashSet<BlockId> = [b(0), b(1)].into_iter().collect();
    assert_eq!(closure, expected);
}

/// A loop header controls its own re-execution.
#[test]
fn loop_header_depends_on_itself() {
    let mut fb = FunctionBuilder::new("loop");
    let x = fb.param("x", Type::Int);
    let entry = fb.create_block();
    let header = fb.create_block();
    let body = fb.create_block();
    let exit = fb.create_block();
    fb.switch_to_block(entry);
    fb.jump(header);
    fb.switch_to_block(header);
    let cond = fb.cmp(CmpOp::Lt, x, Value::Const(100));
    fb.branch(cond, body, exit);
    fb.switch_to_block(body);
    fb.jump(header);
    fb.switch_to_block(exit);
    fb.ret(None);
    let func = fb.finish();

    let cd = analyze(&func);
    assert_eq!(cd.frontier(b(1)), &[b(1)]);
    assert_eq!(cd.frontier(b(2)), &[b(1)]);
    assert!(cd.frontier(b(0)).is_empty());

    let closure = cd.iterated([b(2)]);
    let expected: FxHashSet<BlockId> = [b(1)].into_iter().collect();
    assert_eq!(closure, expected);
}

/// Straight-line code has no control dependences at all.
#[test]
fn straight_line_has_empty_frontiers() {
    let mut fb = FunctionBuilder::new("chain");
    let b0 = fb.create_block();
    let b1 = fb.create_block();
    fb.switch_to_block(b0);
    fb.jump(b1);
    fb.switch_to_block(b1);
    fb.ret(None);
    let func = fb.finish();

    let cd = analyze(&func);
    assert!(cd.frontier(b(0)).is_empty());
    assert!(cd.frontier(b(1)).is_empty());
    assert!(cd.iterated([b(0), b(1)]).is_empty());
}

/// A conditional branch whose arms share one target decides nothing.
#[test]
fn same_target_branch_decides_nothing() {
    let mut fb = FunctionBuilder::new("degenerate");
    let x = fb.param("x", Type::Int);
    let entry = fb.create_block();
    let next = fb.create_block();
    fb.switch_to_block(entry);
    let cond = fb.cmp(CmpOp::Eq, x, Value::Const(0));
    fb.branch(cond, next, next);
    fb.switch_to_block(next);
    fb.ret(None);
    let func = fb.finish();

    let cd = analyze(&func);
    assert!(cd.frontier(b(1)).is_empty());
}

/// The closure of no seeds is empty.
#[test]
fn iterated_of_empty_seed_set() {
    let mut fb = FunctionBuilder::new("empty_seeds");
    let entry = fb.create_block();
    fb.switch_to_block(entry);
    fb.ret(None);
    let func = fb.finish();

    let cd = analyze(&func);
    assert!(cd.iterated(std::iter::empty()).is_empty());
}
