//! Expression parsing.
//!
//! Precedence, loosest first:
//! 1. `lambda`, conditional `x if c else y`
//! 2. `or`, then `and`, then `not`
//! 3. comparisons (chained)
//! 4. `|`, `^`, `&`, shifts, `+ -`, `* / // %` (precedence climbing)
//! 5. unary `+ - ~`
//! 6. `**` (right-associative, binds tighter than a unary on its left)
//! 7. trailers: calls, subscripts, attributes

use std::rc::Rc;

use tarn_ir::{
    BinaryOp, BoolOp, CmpOp, Comprehension, Constant, Expr, ExprContext, ExprKind, Keyword,
    Location, SliceKind, UnaryOp,
};
use tarn_lexer::{Keyword as Kw, TokenKind};

use super::Parser;
use crate::ParseError;

impl Parser {
    /// `test (',' test)* [',']`, producing a tuple when a comma is present.
    pub(super) fn testlist(&mut self) -> Result<Expr, ParseError> {
        self.expr_list(Self::test)
    }

    /// Like [`Self::testlist`], but elements may be `*starred`.
    pub(super) fn testlist_star(&mut self) -> Result<Expr, ParseError> {
        self.expr_list(Self::test_or_star)
    }

    /// Loop targets: `exprlist` in the grammar.
    pub(super) fn target_list(&mut self) -> Result<Expr, ParseError> {
        self.expr_list(Self::bitor_or_star)
    }

    fn expr_list(
        &mut self,
        element: fn(&mut Self) -> Result<Expr, ParseError>,
    ) -> Result<Expr, ParseError> {
        let loc = self.cursor.current_loc();
        let first = element(self)?;
        if !self.cursor.check(&TokenKind::Comma) {
            return Ok(first);
        }
        let mut elts = vec![first];
        while self.cursor.eat(&TokenKind::Comma) {
            if !self.starts_expression() {
                break;
            }
            elts.push(element(self)?);
        }
        Ok(Expr::new(
            ExprKind::Tuple {
                elts,
                ctx: ExprContext::Load,
            },
            loc,
        ))
    }

    fn starts_expression(&self) -> bool {
        match self.cursor.current_kind() {
            TokenKind::Name(_)
            | TokenKind::Int(_)
            | TokenKind::Float(_)
            | TokenKind::Str(_)
            | TokenKind::LParen
            | TokenKind::LBracket
            | TokenKind::LBrace
            | TokenKind::Backtick
            | TokenKind::Ellipsis
            | TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::Tilde
            | TokenKind::Star => true,
            TokenKind::Keyword(kw) => matches!(
                kw,
                Kw::Not | Kw::None | Kw::True | Kw::False | Kw::Lambda | Kw::Yield
            ),
            _ => false,
        }
    }

    fn test_or_star(&mut self) -> Result<Expr, ParseError> {
        if self.cursor.check(&TokenKind::Star) {
            return self.star_expr(Self::bitor_expr);
        }
        self.test()
    }

    fn bitor_or_star(&mut self) -> Result<Expr, ParseError> {
        if self.cursor.check(&TokenKind::Star) {
            return self.star_expr(Self::bitor_expr);
        }
        self.bitor_expr()
    }

    fn star_expr(
        &mut self,
        inner: fn(&mut Self) -> Result<Expr, ParseError>,
    ) -> Result<Expr, ParseError> {
        let loc = self.cursor.advance().loc;
        let value = inner(self)?;
        Ok(Expr::new(ExprKind::Starred(Box::new(value)), loc))
    }

    /// `test: or_test ['if' or_test 'else' test] | lambdef`
    pub(super) fn test(&mut self) -> Result<Expr, ParseError> {
        tarn_stack::ensure_sufficient_stack(|| {
            if self.cursor.check_keyword(Kw::Lambda) {
                return self.lambda();
            }
            let body = self.or_test()?;
            if !self.cursor.eat_keyword(Kw::If) {
                return Ok(body);
            }
            let test = self.or_test()?;
            self.cursor.expect_keyword(Kw::Else)?;
            let orelse = self.test()?;
            let loc = body.loc;
            Ok(Expr::new(
                ExprKind::IfExp {
                    test: Box::new(test),
                    body: Box::new(body),
                    orelse: Box::new(orelse),
                },
                loc,
            ))
        })
    }

    fn lambda(&mut self) -> Result<Expr, ParseError> {
        let loc = self.cursor.advance().loc;
        let args = self.parameters(&TokenKind::Colon, false)?;
        self.cursor.expect(&TokenKind::Colon)?;
        let body = self.test()?;
        Ok(Expr::new(
            ExprKind::Lambda {
                args: Box::new(args),
                body: Box::new(body),
            },
            loc,
        ))
    }

    pub(super) fn yield_expr(&mut self) -> Result<Expr, ParseError> {
        let loc = self.cursor.advance().loc;
        let value = if self.starts_expression() {
            Some(Box::new(self.testlist()?))
        } else {
            None
        };
        Ok(Expr::new(ExprKind::Yield(value), loc))
    }

    fn or_test(&mut self) -> Result<Expr, ParseError> {
        self.bool_chain(BoolOp::Or, Kw::Or, Self::and_test)
    }

    fn and_test(&mut self) -> Result<Expr, ParseError> {
        self.bool_chain(BoolOp::And, Kw::And, Self::not_test)
    }

    fn bool_chain(
        &mut self,
        op: BoolOp,
        kw: Kw,
        operand: fn(&mut Self) -> Result<Expr, ParseError>,
    ) -> Result<Expr, ParseError> {
        let first = operand(self)?;
        if !self.cursor.check_keyword(kw) {
            return Ok(first);
        }
        let loc = first.loc;
        let mut values = vec![first];
        while self.cursor.eat_keyword(kw) {
            values.push(operand(self)?);
        }
        Ok(Expr::new(ExprKind::BoolOp { op, values }, loc))
    }

    fn not_test(&mut self) -> Result<Expr, ParseError> {
        if self.cursor.check_keyword(Kw::Not) {
            let loc = self.cursor.advance().loc;
            let operand = tarn_stack::ensure_sufficient_stack(|| self.not_test())?;
            return Ok(Expr::new(
                ExprKind::UnaryOp {
                    op: UnaryOp::Not,
                    operand: Box::new(operand),
                },
                loc,
            ));
        }
        self.comparison()
    }

    fn comparison(&mut self) -> Result<Expr, ParseError> {
        let left = self.bitor_expr()?;
        let mut ops = Vec::new();
        let mut comparators = Vec::new();
        while let Some(op) = self.match_cmp_op() {
            ops.push(op);
            comparators.push(self.bitor_expr()?);
        }
        if ops.is_empty() {
            return Ok(left);
        }
        let loc = left.loc;
        Ok(Expr::new(
            ExprKind::Compare {
                left: Box::new(left),
                ops,
                comparators,
            },
            loc,
        ))
    }

    /// Consume a comparison operator, including the two-word forms.
    fn match_cmp_op(&mut self) -> Option<CmpOp> {
        let op = match self.cursor.current_kind() {
            TokenKind::EqEq => CmpOp::Eq,
            TokenKind::NotEq => CmpOp::NotEq,
            TokenKind::Lt => CmpOp::Lt,
            TokenKind::LtEq => CmpOp::LtE,
            TokenKind::Gt => CmpOp::Gt,
            TokenKind::GtEq => CmpOp::GtE,
            TokenKind::Keyword(Kw::In) => CmpOp::In,
            TokenKind::Keyword(Kw::Is) => {
                self.cursor.advance();
                return Some(if self.cursor.eat_keyword(Kw::Not) {
                    CmpOp::IsNot
                } else {
                    CmpOp::Is
                });
            }
            TokenKind::Keyword(Kw::Not)
                if matches!(self.cursor.peek_kind(1), TokenKind::Keyword(Kw::In)) =>
            {
                self.cursor.advance();
                self.cursor.advance();
                return Some(CmpOp::NotIn);
            }
            _ => return None,
        };
        self.cursor.advance();
        Some(op)
    }

    /// Binary operator at the cursor, excluding `**`.
    fn match_binary_op(&self) -> Option<BinaryOp> {
        Some(match self.cursor.current_kind() {
            TokenKind::Pipe => BinaryOp::BitOr,
            TokenKind::Caret => BinaryOp::BitXor,
            TokenKind::Amp => BinaryOp::BitAnd,
            TokenKind::LShift => BinaryOp::LShift,
            TokenKind::RShift => BinaryOp::RShift,
            TokenKind::Plus => BinaryOp::Add,
            TokenKind::Minus => BinaryOp::Sub,
            TokenKind::Star => BinaryOp::Mul,
            TokenKind::Slash => BinaryOp::Div,
            TokenKind::DoubleSlash => BinaryOp::FloorDiv,
            TokenKind::Percent => BinaryOp::Mod,
            _ => return None,
        })
    }

    /// Full bitwise-or level expression (`expr` in the grammar).
    pub(super) fn bitor_expr(&mut self) -> Result<Expr, ParseError> {
        self.binary(1)
    }

    /// Precedence climbing over the left-associative binary operators.
    fn binary(&mut self, min_prec: u8) -> Result<Expr, ParseError> {
        let mut left = self.factor()?;
        while let Some(op) = self.match_binary_op() {
            let prec = op.precedence();
            if prec < min_prec {
                break;
            }
            self.cursor.advance();
            let right = tarn_stack::ensure_sufficient_stack(|| self.binary(prec + 1))?;
            let loc = left.loc;
            left = Expr::new(
                ExprKind::BinOp {
                    left: Box::new(left),
                    op,
                    right: Box::new(right),
                },
                loc,
            );
        }
        Ok(left)
    }

    /// `factor: ('+'|'-'|'~') factor | power`
    fn factor(&mut self) -> Result<Expr, ParseError> {
        let op = match self.cursor.current_kind() {
            TokenKind::Plus => UnaryOp::UAdd,
            TokenKind::Minus => UnaryOp::USub,
            TokenKind::Tilde => UnaryOp::Invert,
            _ => return self.power(),
        };
        let loc = self.cursor.advance().loc;
        let operand = tarn_stack::ensure_sufficient_stack(|| self.factor())?;
        Ok(Expr::new(
            ExprKind::UnaryOp {
                op,
                operand: Box::new(operand),
            },
            loc,
        ))
    }

    /// `power: atom trailer* ['**' factor]`
    fn power(&mut self) -> Result<Expr, ParseError> {
        let base = self.atom_expr()?;
        if !self.cursor.eat(&TokenKind::DoubleStar) {
            return Ok(base);
        }
        let exponent = tarn_stack::ensure_sufficient_stack(|| self.factor())?;
        let loc = base.loc;
        Ok(Expr::new(
            ExprKind::BinOp {
                left: Box::new(base),
                op: BinaryOp::Pow,
                right: Box::new(exponent),
            },
            loc,
        ))
    }

    fn atom_expr(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.atom()?;
        loop {
            match self.cursor.current_kind() {
                TokenKind::LParen => expr = self.call(expr)?,
                TokenKind::LBracket => {
                    self.cursor.advance();
                    let slice = self.subscript_list()?;
                    self.cursor.expect(&TokenKind::RBracket)?;
                    let loc = expr.loc;
                    expr = Expr::new(
                        ExprKind::Subscript {
                            value: Box::new(expr),
                            slice: Box::new(slice),
                            ctx: ExprContext::Load,
                        },
                        loc,
                    );
                }
                TokenKind::Dot => {
                    self.cursor.advance();
                    let attr = self.cursor.expect_name()?;
                    let loc = expr.loc;
                    expr = Expr::new(
                        ExprKind::Attribute {
                            value: Box::new(expr),
                            attr,
                            ctx: ExprContext::Load,
                        },
                        loc,
                    );
                }
                _ => return Ok(expr),
            }
        }
    }

    /// `'(' arglist ')'` applied to `func`.
    fn call(&mut self, func: Expr) -> Result<Expr, ParseError> {
        self.cursor.advance();
        let mut args = Vec::new();
        let mut keywords = Vec::new();
        let mut starargs = None;
        let mut kwargs = None;

        while !self.cursor.check(&TokenKind::RParen) {
            let loc = self.cursor.current_loc();
            if self.cursor.eat(&TokenKind::DoubleStar) {
                if kwargs.is_some() {
                    return Err(ParseError::new("only one `**` argument is supported", loc));
                }
                kwargs = Some(Box::new(self.test()?));
            } else if self.cursor.eat(&TokenKind::Star) {
                if starargs.is_some() {
                    return Err(ParseError::new("only one `*` argument is supported", loc));
                }
                if kwargs.is_some() {
                    return Err(ParseError::new(
                        "iterable argument unpacking follows keyword argument unpacking",
                        loc,
                    ));
                }
                starargs = Some(Box::new(self.test()?));
            } else if matches!(self.cursor.current_kind(), TokenKind::Name(_))
                && self.cursor.peek_kind(1) == &TokenKind::Assign
            {
                let arg = self.cursor.expect_name()?;
                self.cursor.advance();
                let value = self.test()?;
                if keywords.iter().any(|k: &Keyword| k.arg == arg) {
                    return Err(ParseError::new(
                        format!("keyword argument repeated: {arg}"),
                        loc,
                    ));
                }
                keywords.push(Keyword { arg, value });
            } else {
                if !keywords.is_empty() || kwargs.is_some() {
                    return Err(ParseError::new(
                        "positional argument follows keyword argument",
                        loc,
                    ));
                }
                if starargs.is_some() {
                    return Err(ParseError::new(
                        "positional argument follows `*` argument unpacking",
                        loc,
                    ));
                }
                let value = self.test()?;
                if self.cursor.check_keyword(Kw::For) {
                    let generators = self.comprehension_clauses()?;
                    args.push(Expr::new(
                        ExprKind::GeneratorExp {
                            elt: Box::new(value),
                            generators,
                        },
                        loc,
                    ));
                } else {
                    args.push(value);
                }
            }
            if !self.cursor.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.cursor.expect(&TokenKind::RParen)?;
        let loc = func.loc;
        Ok(Expr::new(
            ExprKind::Call {
                func: Box::new(func),
                args,
                keywords,
                starargs,
                kwargs,
            },
            loc,
        ))
    }

    /// Index expression between `[` and `]`.
    fn subscript_list(&mut self) -> Result<SliceKind, ParseError> {
        let loc = self.cursor.current_loc();
        let first = self.subscript()?;
        if !self.cursor.check(&TokenKind::Comma) {
            return Ok(first);
        }
        let mut dims = vec![first];
        while self.cursor.eat(&TokenKind::Comma) {
            if self.cursor.check(&TokenKind::RBracket) {
                break;
            }
            dims.push(self.subscript()?);
        }
        if dims.iter().any(|d| matches!(d, SliceKind::Slice { .. })) {
            return Ok(SliceKind::ExtSlice(dims));
        }
        let elts = dims
            .into_iter()
            .filter_map(|d| match d {
                SliceKind::Index(e) => Some(e),
                _ => None,
            })
            .collect();
        Ok(SliceKind::Index(Expr::new(
            ExprKind::Tuple {
                elts,
                ctx: ExprContext::Load,
            },
            loc,
        )))
    }

    /// `subscript: test | [test] ':' [test] [':' [test]]`
    fn subscript(&mut self) -> Result<SliceKind, ParseError> {
        let lower = if self.cursor.check(&TokenKind::Colon) {
            None
        } else {
            let expr = self.test()?;
            if !self.cursor.check(&TokenKind::Colon) {
                return Ok(SliceKind::Index(expr));
            }
            Some(expr)
        };
        self.cursor.expect(&TokenKind::Colon)?;
        let upper = self.optional_slice_part()?;
        let step = if self.cursor.eat(&TokenKind::Colon) {
            self.optional_slice_part()?
        } else {
            None
        };
        Ok(SliceKind::Slice { lower, upper, step })
    }

    fn optional_slice_part(&mut self) -> Result<Option<Expr>, ParseError> {
        if matches!(
            self.cursor.current_kind(),
            TokenKind::Colon | TokenKind::Comma | TokenKind::RBracket
        ) {
            Ok(None)
        } else {
            Ok(Some(self.test()?))
        }
    }

    /// `('for' exprlist 'in' or_test ('if' or_test)*)+`
    fn comprehension_clauses(&mut self) -> Result<Vec<Comprehension>, ParseError> {
        let mut generators = Vec::new();
        while self.cursor.eat_keyword(Kw::For) {
            let mut target = self.target_list()?;
            if !target.set_context(ExprContext::Store) {
                return Err(ParseError::new(
                    "cannot assign to expression in comprehension",
                    target.loc,
                ));
            }
            self.cursor.expect_keyword(Kw::In)?;
            let iter = self.or_test()?;
            let mut ifs = Vec::new();
            while self.cursor.eat_keyword(Kw::If) {
                ifs.push(self.or_test()?);
            }
            generators.push(Comprehension { target, iter, ifs });
        }
        Ok(generators)
    }

    fn atom(&mut self) -> Result<Expr, ParseError> {
        let loc = self.cursor.current_loc();
        let kind = match self.cursor.current_kind().clone() {
            TokenKind::Name(id) => {
                self.cursor.advance();
                ExprKind::Name {
                    id,
                    ctx: ExprContext::Load,
                }
            }
            TokenKind::Int(n) => {
                self.cursor.advance();
                ExprKind::Constant(Constant::Int(n))
            }
            TokenKind::Float(x) => {
                self.cursor.advance();
                ExprKind::Constant(Constant::Float(x))
            }
            TokenKind::Str(first) => {
                self.cursor.advance();
                let mut text = first.to_string();
                while let TokenKind::Str(next) = self.cursor.current_kind() {
                    text.push_str(next);
                    self.cursor.advance();
                }
                ExprKind::Constant(Constant::Str(Rc::from(text)))
            }
            TokenKind::Ellipsis => {
                self.cursor.advance();
                ExprKind::Constant(Constant::Ellipsis)
            }
            TokenKind::Keyword(Kw::None) => {
                self.cursor.advance();
                ExprKind::Constant(Constant::None)
            }
            TokenKind::Keyword(Kw::True) => {
                self.cursor.advance();
                ExprKind::Constant(Constant::Bool(true))
            }
            TokenKind::Keyword(Kw::False) => {
                self.cursor.advance();
                ExprKind::Constant(Constant::Bool(false))
            }
            TokenKind::Backtick => {
                self.cursor.advance();
                let value = self.testlist()?;
                self.cursor.expect(&TokenKind::Backtick)?;
                ExprKind::Repr(Box::new(value))
            }
            TokenKind::LParen => return self.paren_atom(loc),
            TokenKind::LBracket => return self.list_atom(loc),
            TokenKind::LBrace => return self.brace_atom(loc),
            _ => return Err(self.cursor.unexpected("an expression")),
        };
        Ok(Expr::new(kind, loc))
    }

    /// `'(' [yield_expr | testlist_comp] ')'`
    fn paren_atom(&mut self, loc: Location) -> Result<Expr, ParseError> {
        self.cursor.advance();
        if self.cursor.eat(&TokenKind::RParen) {
            return Ok(Expr::new(
                ExprKind::Tuple {
                    elts: Vec::new(),
                    ctx: ExprContext::Load,
                },
                loc,
            ));
        }
        if self.cursor.check_keyword(Kw::Yield) {
            let value = self.yield_expr()?;
            self.cursor.expect(&TokenKind::RParen)?;
            return Ok(value);
        }
        let first = self.test_or_star()?;
        if self.cursor.check_keyword(Kw::For) {
            let generators = self.comprehension_clauses()?;
            self.cursor.expect(&TokenKind::RParen)?;
            return Ok(Expr::new(
                ExprKind::GeneratorExp {
                    elt: Box::new(first),
                    generators,
                },
                loc,
            ));
        }
        if self.cursor.eat(&TokenKind::RParen) {
            return Ok(first);
        }
        let mut elts = vec![first];
        while self.cursor.eat(&TokenKind::Comma) {
            if self.cursor.check(&TokenKind::RParen) {
                break;
            }
            elts.push(self.test_or_star()?);
        }
        self.cursor.expect(&TokenKind::RParen)?;
        Ok(Expr::new(
            ExprKind::Tuple {
                elts,
                ctx: ExprContext::Load,
            },
            loc,
        ))
    }

    fn list_atom(&mut self, loc: Location) -> Result<Expr, ParseError> {
        self.cursor.advance();
        let mut elts = Vec::new();
        if !self.cursor.check(&TokenKind::RBracket) {
            let first = self.test_or_star()?;
            if self.cursor.check_keyword(Kw::For) {
                let generators = self.comprehension_clauses()?;
                self.cursor.expect(&TokenKind::RBracket)?;
                return Ok(Expr::new(
                    ExprKind::ListComp {
                        elt: Box::new(first),
                        generators,
                    },
                    loc,
                ));
            }
            elts.push(first);
            while self.cursor.eat(&TokenKind::Comma) {
                if self.cursor.check(&TokenKind::RBracket) {
                    break;
                }
                elts.push(self.test_or_star()?);
            }
        }
        self.cursor.expect(&TokenKind::RBracket)?;
        Ok(Expr::new(
            ExprKind::List {
                elts,
                ctx: ExprContext::Load,
            },
            loc,
        ))
    }

    /// Dict or set display, or their comprehensions.
    fn brace_atom(&mut self, loc: Location) -> Result<Expr, ParseError> {
        self.cursor.advance();
        if self.cursor.eat(&TokenKind::RBrace) {
            return Ok(Expr::new(
                ExprKind::Dict {
                    keys: Vec::new(),
                    values: Vec::new(),
                },
                loc,
            ));
        }
        if self.cursor.check(&TokenKind::DoubleStar) {
            return Err(ParseError::new(
                "dict unpacking in displays is not supported",
                self.cursor.current_loc(),
            ));
        }
        let first = self.test_or_star()?;

        if self.cursor.eat(&TokenKind::Colon) {
            let value = self.test()?;
            if self.cursor.check_keyword(Kw::For) {
                let generators = self.comprehension_clauses()?;
                self.cursor.expect(&TokenKind::RBrace)?;
                return Ok(Expr::new(
                    ExprKind::DictComp {
                        key: Box::new(first),
                        value: Box::new(value),
                        generators,
                    },
                    loc,
                ));
            }
            let mut keys = vec![first];
            let mut values = vec![value];
            while self.cursor.eat(&TokenKind::Comma) {
                if self.cursor.check(&TokenKind::RBrace) {
                    break;
                }
                keys.push(self.test()?);
                self.cursor.expect(&TokenKind::Colon)?;
                values.push(self.test()?);
            }
            self.cursor.expect(&TokenKind::RBrace)?;
            return Ok(Expr::new(ExprKind::Dict { keys, values }, loc));
        }

        if self.cursor.check_keyword(Kw::For) {
            let generators = self.comprehension_clauses()?;
            self.cursor.expect(&TokenKind::RBrace)?;
            return Ok(Expr::new(
                ExprKind::SetComp {
                    elt: Box::new(first),
                    generators,
                },
                loc,
            ));
        }
        let mut elts = vec![first];
        while self.cursor.eat(&TokenKind::Comma) {
            if self.cursor.check(&TokenKind::RBrace) {
                break;
            }
            elts.push(self.test_or_star()?);
        }
        self.cursor.expect(&TokenKind::RBrace)?;
        Ok(Expr::new(ExprKind::Set(elts), loc))
    }
}
