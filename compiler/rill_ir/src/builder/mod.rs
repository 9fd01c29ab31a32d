//! Function construction: position at a block, emit, terminate.
//!
//! [`FunctionBuilder`] is the only supported way to assemble a
//! well-formed [`Function`] by hand (frontends and tests alike). It
//! follows the LLVM `IRBuilder` shape: create blocks up front, switch
//! to one, emit instructions into it, end it with a terminator.
//!
//! Misuse (emitting with no block selected, emitting into a terminated
//! block, finishing with an unterminated block) panics: these are
//! construction-time bugs, not runtime errors. Structural properties the
//! builder cannot see locally (phi placement, phi/predecessor agreement)
//! are checked by [`verify_function`](crate::verify_function).

use crate::entities::{BlockId, FuncRef, InstId};
use crate::function::{Function, Param};
use crate::instruction::{BinaryOp, CmpOp, InstKind, Type, Value};

/// Incremental builder for a single [`Function`].
pub struct FunctionBuilder {
    func: Function,
    current: Option<BlockId>,
}

impl FunctionBuilder {
    /// Start building a function. The first created block becomes the
    /// entry block.
    pub fn new(name: &str) -> Self {
        Self {
            func: Function {
                name: name.to_owned(),
                params: Vec::new(),
                insts: Vec::new(),
                blocks: Vec::new(),
                entry: BlockId::new(0),
                globals: Vec::new(),
                ext_funcs: Vec::new(),
            },
            current: None,
        }
    }

    /// Declare the next function parameter and get the value referring
    /// to it.
    pub fn param(&mut self, name: &str, ty: Type) -> Value {
        let index = u32::try_from(self.func.params.len())
            .unwrap_or_else(|_| panic!("parameter count exceeds u32::MAX"));
        self.func.params.push(Param {
            name: name.to_owned(),
            ty,
        });
        Value::Arg(index)
    }

    /// Create a new empty block.
    pub fn create_block(&mut self) -> BlockId {
        self.func.add_block()
    }

    /// Select the block subsequent emits append to.
    pub fn switch_to_block(&mut self, block: BlockId) {
        self.current = Some(block);
    }

    /// Intern a global and get the value referring to its address.
    pub fn global(&mut self, name: &str) -> Value {
        Value::Global(self.func.global_named(name))
    }

    /// Intern an external function reference.
    pub fn ext_func(&mut self, name: &str) -> FuncRef {
        self.func.ext_func_named(name)
    }

    fn emit(&mut self, kind: InstKind, ty: Type) -> InstId {
        let block = self
            .current
            .unwrap_or_else(|| panic!("no block selected in builder for `{}`", self.func.name));
        if self.func.terminator(block).is_some() {
            panic!("{block} is already terminated");
        }
        let id = self.func.push_inst(kind, ty);
        self.func.blocks[block.index()].insts.push(id);
        id
    }

    // ── Value-producing instructions ────────────────────────────

    /// Emit a binary arithmetic instruction.
    pub fn binary(&mut self, op: BinaryOp, lhs: Value, rhs: Value) -> Value {
        Value::Inst(self.emit(InstKind::Binary { op, lhs, rhs }, Type::Int))
    }

    /// Emit an integer comparison.
    pub fn cmp(&mut self, op: CmpOp, lhs: Value, rhs: Value) -> Value {
        Value::Inst(self.emit(InstKind::Cmp { op, lhs, rhs }, Type::Bool))
    }

    /// Emit a stack allocation; the value is the slot's address.
    pub fn alloca(&mut self) -> Value {
        Value::Inst(self.emit(InstKind::Alloca, Type::Ptr))
    }

    /// Emit a non-volatile load.
    pub fn load(&mut self, addr: Value) -> Value {
        Value::Inst(self.emit(
            InstKind::Load {
                addr,
                volatile: false,
            },
            Type::Int,
        ))
    }

    /// Emit a volatile load.
    pub fn volatile_load(&mut self, addr: Value) -> Value {
        Value::Inst(self.emit(
            InstKind::Load {
                addr,
                volatile: true,
            },
            Type::Int,
        ))
    }

    /// Emit a call to an external function with the given result type
    /// (`Type::Void` for calls whose result is unused by construction).
    pub fn call(&mut self, callee: FuncRef, args: Vec<Value>, ty: Type) -> Value {
        Value::Inst(self.emit(InstKind::Call { callee, args }, ty))
    }

    /// Emit a phi merge node. Phis must be emitted before any other
    /// instruction of their block.
    pub fn phi(&mut self, ty: Type, incoming: Vec<(BlockId, Value)>) -> Value {
        Value::Inst(self.emit(InstKind::Phi { incoming }, ty))
    }

    // ── Void instructions ───────────────────────────────────────

    /// Emit a non-volatile store.
    pub fn store(&mut self, value: Value, addr: Value) -> InstId {
        self.emit(
            InstKind::Store {
                value,
                addr,
                volatile: false,
            },
            Type::Void,
        )
    }

    /// Emit a volatile store.
    pub fn volatile_store(&mut self, value: Value, addr: Value) -> InstId {
        self.emit(
            InstKind::Store {
                value,
                addr,
                volatile: true,
            },
            Type::Void,
        )
    }

    // ── Terminators ─────────────────────────────────────────────

    /// End the current block with an unconditional branch.
    pub fn jump(&mut self, dest: BlockId) -> InstId {
        self.emit(InstKind::Jump { dest }, Type::Void)
    }

    /// End the current block with a conditional branch.
    pub fn branch(&mut self, cond: Value, then_dest: BlockId, else_dest: BlockId) -> InstId {
        self.emit(
            InstKind::Branch {
                cond,
                then_dest,
                else_dest,
            },
            Type::Void,
        )
    }

    /// End the current block with a return.
    pub fn ret(&mut self, value: Option<Value>) -> InstId {
        self.emit(InstKind::Return { value }, Type::Void)
    }

    // ── Completion ──────────────────────────────────────────────

    /// Finish construction.
    ///
    /// # Panics
    ///
    /// Panics if no block was created or any block lacks a terminator.
    pub fn finish(self) -> Function {
        if self.func.blocks.is_empty() {
            panic!("function `{}` has no blocks", self.func.name);
        }
        for block in self.func.block_ids() {
            if self.func.terminator(block).is_none() {
                panic!("{block} of `{}` is not terminated", self.func.name);
            }
        }
        self.func
    }
}
