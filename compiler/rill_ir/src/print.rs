//! Textual display of functions, output-only.
//!
//! There is no parser for this syntax; it exists for test failure
//! output, tracing, and debugging. Globals and external functions are
//! shown by name (`@counter`), everything else by entity ID.

use core::fmt;

use crate::entities::InstId;
use crate::function::Function;
use crate::instruction::{BinaryOp, CmpOp, InstKind, Type, Value};

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Type::Void => "void",
            Type::Bool => "bool",
            Type::Int => "int",
            Type::Ptr => "ptr",
        };
        f.write_str(name)
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BinaryOp::Add => "add",
            BinaryOp::Sub => "sub",
            BinaryOp::Mul => "mul",
        };
        f.write_str(name)
    }
}

impl fmt::Display for CmpOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CmpOp::Eq => "eq",
            CmpOp::Ne => "ne",
            CmpOp::Lt => "lt",
            CmpOp::Le => "le",
        };
        f.write_str(name)
    }
}

/// Contextless operand display: `inst3`, `arg0`, `5`, `gv1`. The
/// function printer resolves globals to `@name` instead.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Inst(id) => write!(f, "{id}"),
            Value::Arg(n) => write!(f, "arg{n}"),
            Value::Const(c) => write!(f, "{c}"),
            Value::Global(g) => write!(f, "{g}"),
        }
    }
}

impl Function {
    fn write_value(&self, f: &mut fmt::Formatter<'_>, value: Value) -> fmt::Result {
        match value {
            Value::Global(g) => write!(f, "@{}", self.globals[g.index()].name),
            other => write!(f, "{other}"),
        }
    }

    fn write_inst(&self, f: &mut fmt::Formatter<'_>, id: InstId) -> fmt::Result {
        let data = self.inst(id);
        if data.ty != Type::Void {
            write!(f, "{id} = ")?;
        }
        match &data.kind {
            InstKind::Binary { op, lhs, rhs } => {
                write!(f, "{op} ")?;
                self.write_value(f, *lhs)?;
                write!(f, ", ")?;
                self.write_value(f, *rhs)
            }
            InstKind::Cmp { op, lhs, rhs } => {
                write!(f, "cmp {op} ")?;
                self.write_value(f, *lhs)?;
                write!(f, ", ")?;
                self.write_value(f, *rhs)
            }
            InstKind::Alloca => write!(f, "alloca"),
            InstKind::Load { addr, volatile } => {
                write!(f, "load{} ", if *volatile { " volatile" } else { "" })?;
                self.write_value(f, *addr)
            }
            InstKind::Store {
                value,
                addr,
                volatile,
            } => {
                write!(f, "store{} ", if *volatile { " volatile" } else { "" })?;
                self.write_value(f, *value)?;
                write!(f, ", ")?;
                self.write_value(f, *addr)
            }
            InstKind::Call { callee, args } => {
                write!(f, "call @{}(", self.ext_funcs[callee.index()].name)?;
                for (i, &arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    self.write_value(f, arg)?;
                }
                write!(f, ")")
            }
            InstKind::Phi { incoming } => {
                write!(f, "phi")?;
                for (i, &(block, value)) in incoming.iter().enumerate() {
                    write!(f, "{} [{block}: ", if i > 0 { "," } else { "" })?;
                    self.write_value(f, value)?;
                    write!(f, "]")?;
                }
                Ok(())
            }
            InstKind::Jump { dest } => write!(f, "jump {dest}"),
            InstKind::Branch {
                cond,
                then_dest,
                else_dest,
            } => {
                write!(f, "branch ")?;
                self.write_value(f, *cond)?;
                write!(f, ", {then_dest}, {else_dest}")
            }
            InstKind::Return { value } => {
                write!(f, "return")?;
                if let Some(value) = value {
                    write!(f, " ")?;
                    self.write_value(f, *value)?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "function @{}(", self.name)?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", param.name, param.ty)?;
        }
        writeln!(f, ") {{")?;
        for block in self.block_ids() {
            writeln!(f, "{block}:")?;
            for &inst in self.block_insts(block) {
                write!(f, "  ")?;
                self.write_inst(f, inst)?;
                writeln!(f)?;
            }
        }
        write!(f, "}}")
    }
}
