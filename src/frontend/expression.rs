//! Front-end expression tree header. Mirrors jato's `src/jit/expression.h`
//! shape (a tagged tree over JVM types and arithmetic operators) so the
//! printer's "what feeds the back-end" context is complete, without
//! implementing bytecode lowering — that pass is out of scope here.

/// JVM verification type a lowered value carries. Named after the
/// `jvm_type` enum `expression.h`'s `jvm_type` field is typed against.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum JvmType {
    Int,
    Long,
    Float,
    Double,
    Reference,
}

/// `enum operator` in `expression.h`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

/// `struct expression`'s tagged union, ported to an enum with per-variant
/// payloads instead of ad hoc field access. `refcount` is dropped — this
/// module has no allocator-backed lifetime to manage; a lowering pass
/// would own that concern itself (e.g. via `Rc<Expression>`).
#[derive(Clone, Debug)]
pub enum Expression {
    Value { jvm_type: JvmType, value: u64 },
    FValue { jvm_type: JvmType, value: f64 },
    Local { jvm_type: JvmType, index: u32 },
    Temporary { jvm_type: JvmType, index: u32 },
    ArrayDeref { jvm_type: JvmType, array_ref: Box<Expression>, index: Box<Expression> },
    BinOp { jvm_type: JvmType, operator: Operator, left: Box<Expression>, right: Box<Expression> },
}

impl Expression {
    pub fn jvm_type(&self) -> JvmType {
        match self {
            Expression::Value { jvm_type, .. }
            | Expression::FValue { jvm_type, .. }
            | Expression::Local { jvm_type, .. }
            | Expression::Temporary { jvm_type, .. }
            | Expression::ArrayDeref { jvm_type, .. }
            | Expression::BinOp { jvm_type, .. } => *jvm_type,
        }
    }
}
