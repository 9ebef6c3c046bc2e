//! Syntax tree node types.
//!
//! # Module Structure
//!
//! - `operators`: binary, unary, boolean and comparison operators
//! - this module: statements, expressions and their helper records
//!
//! Every node kind reports a stable tag through `tag()`. The tag is the name
//! used in diagnostics such as "`Lambda` not supported".

mod operators;

use std::rc::Rc;

use num_bigint::BigInt;

use crate::Location;

pub use operators::{BinaryOp, BoolOp, CmpOp, UnaryOp};

/// Identifier text. Shared so that names can be cloned into values cheaply.
pub type Ident = Rc<str>;

/// A parsed script: a sequence of top-level statements.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Module {
    pub body: Vec<Stmt>,
}

impl Module {
    pub fn new(body: Vec<Stmt>) -> Self {
        Module { body }
    }
}

/// A statement with its source position.
#[derive(Clone, Debug, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub loc: Location,
}

impl Stmt {
    pub fn new(kind: StmtKind, loc: Location) -> Self {
        Stmt { kind, loc }
    }

    /// Tag naming the statement kind.
    pub fn tag(&self) -> &'static str {
        self.kind.tag()
    }
}

/// Statement variants.
#[derive(Clone, Debug, PartialEq)]
pub enum StmtKind {
    /// Expression evaluated for its value or side effect.
    Expr(Expr),
    /// `a = b = value`
    Assign { targets: Vec<Expr>, value: Expr },
    /// `target op= value`
    AugAssign {
        target: Expr,
        op: BinaryOp,
        value: Expr,
    },
    If {
        test: Expr,
        body: Vec<Stmt>,
        orelse: Vec<Stmt>,
    },
    While {
        test: Expr,
        body: Vec<Stmt>,
        orelse: Vec<Stmt>,
    },
    For {
        target: Expr,
        iter: Expr,
        body: Vec<Stmt>,
        orelse: Vec<Stmt>,
    },
    Try {
        body: Vec<Stmt>,
        handlers: Vec<ExceptHandler>,
        orelse: Vec<Stmt>,
        finalbody: Vec<Stmt>,
    },
    Break,
    Continue,
    Return(Option<Expr>),
    Assert { test: Expr, msg: Option<Expr> },
    Delete(Vec<Expr>),
    Pass,
    FunctionDef(Rc<FunctionDef>),
    /// Legacy print statement: `print a, b` (a trailing comma suppresses the newline).
    Print { values: Vec<Expr>, newline: bool },
    Raise {
        exc: Option<Expr>,
        cause: Option<Expr>,
    },

    // Parsed but never executed.
    ClassDef { name: Ident, body: Vec<Stmt> },
    Import { names: Vec<Ident> },
    ImportFrom { module: Ident, names: Vec<Ident> },
    Global(Vec<Ident>),
    Nonlocal(Vec<Ident>),
    With { items: Vec<Expr>, body: Vec<Stmt> },
}

impl StmtKind {
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Expr(_) => "Expr",
            Self::Assign { .. } => "Assign",
            Self::AugAssign { .. } => "AugAssign",
            Self::If { .. } => "If",
            Self::While { .. } => "While",
            Self::For { .. } => "For",
            Self::Try { .. } => "Try",
            Self::Break => "Break",
            Self::Continue => "Continue",
            Self::Return(_) => "Return",
            Self::Assert { .. } => "Assert",
            Self::Delete(_) => "Delete",
            Self::Pass => "Pass",
            Self::FunctionDef(_) => "FunctionDef",
            Self::Print { .. } => "Print",
            Self::Raise { .. } => "Raise",
            Self::ClassDef { .. } => "ClassDef",
            Self::Import { .. } => "Import",
            Self::ImportFrom { .. } => "ImportFrom",
            Self::Global(_) => "Global",
            Self::Nonlocal(_) => "Nonlocal",
            Self::With { .. } => "With",
        }
    }
}

/// `except [type] [as name]:` clause.
#[derive(Clone, Debug, PartialEq)]
pub struct ExceptHandler {
    pub typ: Option<Expr>,
    pub name: Option<Ident>,
    pub body: Vec<Stmt>,
    pub loc: Location,
}

/// A `def` statement.
#[derive(Clone, Debug, PartialEq)]
pub struct FunctionDef {
    pub name: Ident,
    pub args: Arguments,
    pub body: Vec<Stmt>,
    pub decorators: Vec<Expr>,
    pub loc: Location,
}

impl FunctionDef {
    /// Leading string-literal statement of the body, if any.
    pub fn docstring(&self) -> Option<&str> {
        match self.body.first().map(|s| &s.kind) {
            Some(StmtKind::Expr(Expr {
                kind: ExprKind::Constant(Constant::Str(s)),
                ..
            })) => Some(s),
            _ => None,
        }
    }
}

/// Parameter list of a function or lambda.
///
/// `defaults` align with the *last* `defaults.len()` entries of `args`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Arguments {
    pub args: Vec<Ident>,
    pub defaults: Vec<Expr>,
    pub vararg: Option<Ident>,
    pub kwarg: Option<Ident>,
}

impl Arguments {
    /// Number of parameters without a default.
    pub fn required_count(&self) -> usize {
        self.args.len().saturating_sub(self.defaults.len())
    }
}

/// An expression with its source position.
#[derive(Clone, Debug, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub loc: Location,
}

impl Expr {
    pub fn new(kind: ExprKind, loc: Location) -> Self {
        Expr { kind, loc }
    }

    pub fn tag(&self) -> &'static str {
        self.kind.tag()
    }

    /// Rewrite the context of an assignable expression (and its elements).
    ///
    /// Returns `false` when the expression cannot be a store or delete target.
    pub fn set_context(&mut self, new_ctx: ExprContext) -> bool {
        match &mut self.kind {
            ExprKind::Name { ctx, .. }
            | ExprKind::Attribute { ctx, .. }
            | ExprKind::Subscript { ctx, .. } => {
                *ctx = new_ctx;
                true
            }
            ExprKind::List { elts, ctx } | ExprKind::Tuple { elts, ctx } => {
                *ctx = new_ctx;
                elts.iter_mut().all(|e| e.set_context(new_ctx))
            }
            ExprKind::Starred(inner) => inner.set_context(new_ctx),
            _ => false,
        }
    }
}

/// Literal constants.
#[derive(Clone, Debug, PartialEq)]
pub enum Constant {
    None,
    Bool(bool),
    Int(BigInt),
    Float(f64),
    Str(Rc<str>),
    Ellipsis,
}

/// Whether an expression is read, assigned, or deleted.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum ExprContext {
    #[default]
    Load,
    Store,
    Del,
}

/// A `name=value` call argument.
#[derive(Clone, Debug, PartialEq)]
pub struct Keyword {
    pub arg: Ident,
    pub value: Expr,
}

/// One `for target in iter if cond ...` clause of a comprehension.
#[derive(Clone, Debug, PartialEq)]
pub struct Comprehension {
    pub target: Expr,
    pub iter: Expr,
    pub ifs: Vec<Expr>,
}

/// The index part of a subscript.
#[derive(Clone, Debug, PartialEq)]
pub enum SliceKind {
    /// `a[i]`, including `a[i, j]` where the index is a tuple expression.
    Index(Expr),
    /// `a[lower:upper:step]`
    Slice {
        lower: Option<Expr>,
        upper: Option<Expr>,
        step: Option<Expr>,
    },
    /// `a[1:2, ::3]`: a tuple of dimensions containing at least one slice.
    ExtSlice(Vec<SliceKind>),
}

/// Expression variants.
#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    Constant(Constant),
    Name {
        id: Ident,
        ctx: ExprContext,
    },
    List {
        elts: Vec<Expr>,
        ctx: ExprContext,
    },
    Tuple {
        elts: Vec<Expr>,
        ctx: ExprContext,
    },
    Dict {
        keys: Vec<Expr>,
        values: Vec<Expr>,
    },
    UnaryOp {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    BinOp {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
    },
    BoolOp {
        op: BoolOp,
        values: Vec<Expr>,
    },
    Compare {
        left: Box<Expr>,
        ops: Vec<CmpOp>,
        comparators: Vec<Expr>,
    },
    IfExp {
        test: Box<Expr>,
        body: Box<Expr>,
        orelse: Box<Expr>,
    },
    Attribute {
        value: Box<Expr>,
        attr: Ident,
        ctx: ExprContext,
    },
    Subscript {
        value: Box<Expr>,
        slice: Box<SliceKind>,
        ctx: ExprContext,
    },
    Call {
        func: Box<Expr>,
        args: Vec<Expr>,
        keywords: Vec<Keyword>,
        starargs: Option<Box<Expr>>,
        kwargs: Option<Box<Expr>>,
    },
    ListComp {
        elt: Box<Expr>,
        generators: Vec<Comprehension>,
    },
    /// Legacy backtick repr: `` `x` ``
    Repr(Box<Expr>),

    // Parsed but never evaluated.
    Lambda {
        args: Box<Arguments>,
        body: Box<Expr>,
    },
    Yield(Option<Box<Expr>>),
    GeneratorExp {
        elt: Box<Expr>,
        generators: Vec<Comprehension>,
    },
    Set(Vec<Expr>),
    SetComp {
        elt: Box<Expr>,
        generators: Vec<Comprehension>,
    },
    DictComp {
        key: Box<Expr>,
        value: Box<Expr>,
        generators: Vec<Comprehension>,
    },
    Starred(Box<Expr>),
}

impl ExprKind {
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Constant(Constant::Ellipsis) => "Ellipsis",
            Self::Constant(Constant::Str(_)) => "Str",
            Self::Constant(Constant::None | Constant::Bool(_)) => "NameConstant",
            Self::Constant(Constant::Int(_) | Constant::Float(_)) => "Num",
            Self::Name { .. } => "Name",
            Self::List { .. } => "List",
            Self::Tuple { .. } => "Tuple",
            Self::Dict { .. } => "Dict",
            Self::UnaryOp { .. } => "UnaryOp",
            Self::BinOp { .. } => "BinOp",
            Self::BoolOp { .. } => "BoolOp",
            Self::Compare { .. } => "Compare",
            Self::IfExp { .. } => "IfExp",
            Self::Attribute { .. } => "Attribute",
            Self::Subscript { .. } => "Subscript",
            Self::Call { .. } => "Call",
            Self::ListComp { .. } => "ListComp",
            Self::Repr(_) => "Repr",
            Self::Lambda { .. } => "Lambda",
            Self::Yield(_) => "Yield",
            Self::GeneratorExp { .. } => "GeneratorExp",
            Self::Set(_) => "Set",
            Self::SetComp { .. } => "SetComp",
            Self::DictComp { .. } => "DictComp",
            Self::Starred(_) => "Starred",
        }
    }
}

#[cfg(test)]
mod tests;
