//! Tarn IR - syntax tree types
//!
//! This crate contains the data structures shared by the Tarn front end
//! and the evaluator:
//! - [`Location`] for source positions
//! - [`Module`], [`Stmt`] and [`Expr`] trees
//! - operator enums ([`BinaryOp`], [`UnaryOp`], [`BoolOp`], [`CmpOp`])
//!
//! # Design Philosophy
//!
//! - **Closed node set**: every construct the grammar can produce has a
//!   variant here, including the ones the evaluator refuses to run. The
//!   evaluator matches exhaustively, so adding a construct is a compile-time
//!   checked change.
//! - **Owned trees**: children are boxed; function bodies sit behind an `Rc`
//!   so a defined procedure can outlive the evaluation that created it.
//! - **Positions on every node**: each `Stmt` and `Expr` carries the
//!   `Location` it was parsed from for diagnostics.

pub mod ast;
mod location;

pub use ast::{
    Arguments, BinaryOp, BoolOp, CmpOp, Comprehension, Constant, ExceptHandler, Expr,
    ExprContext, ExprKind, FunctionDef, Ident, Keyword, Module, SliceKind, Stmt, StmtKind,
    UnaryOp,
};
pub use location::Location;
