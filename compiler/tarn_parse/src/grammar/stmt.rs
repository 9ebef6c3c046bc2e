//! Statement parsing.

use std::rc::Rc;

use tarn_ir::{
    Arguments, ExceptHandler, Expr, ExprContext, ExprKind, FunctionDef, Ident, Location, Stmt,
    StmtKind,
};
use tarn_lexer::{Keyword, TokenKind};

use super::Parser;
use crate::ParseError;

impl Parser {
    /// Parse one statement line (or compound statement) into `out`.
    pub(super) fn statement(&mut self, out: &mut Vec<Stmt>) -> Result<(), ParseError> {
        tarn_stack::ensure_sufficient_stack(|| {
            let loc = self.cursor.current_loc();
            let compound = match self.cursor.current_kind() {
                TokenKind::Keyword(Keyword::If) => Some(self.if_stmt()?),
                TokenKind::Keyword(Keyword::While) => Some(self.while_stmt()?),
                TokenKind::Keyword(Keyword::For) => Some(self.for_stmt()?),
                TokenKind::Keyword(Keyword::Try) => Some(self.try_stmt()?),
                TokenKind::Keyword(Keyword::Def) => Some(self.function_def(Vec::new(), loc)?),
                TokenKind::Keyword(Keyword::Class) => Some(self.class_def()?),
                TokenKind::Keyword(Keyword::With) => Some(self.with_stmt()?),
                TokenKind::At => Some(self.decorated()?),
                _ => None,
            };
            match compound {
                Some(stmt) => out.push(stmt),
                None => self.simple_statements(out)?,
            }
            Ok(())
        })
    }

    /// `small_stmt (';' small_stmt)* [';'] NEWLINE`
    fn simple_statements(&mut self, out: &mut Vec<Stmt>) -> Result<(), ParseError> {
        loop {
            out.push(self.small_statement()?);
            if !self.cursor.eat(&TokenKind::Semicolon) {
                break;
            }
            if self.cursor.check(&TokenKind::Newline) || self.cursor.is_at_end() {
                break;
            }
        }
        if !self.cursor.eat(&TokenKind::Newline) && !self.cursor.is_at_end() {
            return Err(self.cursor.unexpected("end of line"));
        }
        Ok(())
    }

    fn small_statement(&mut self) -> Result<Stmt, ParseError> {
        let loc = self.cursor.current_loc();
        let kind = match self.cursor.current_kind() {
            TokenKind::Keyword(Keyword::Pass) => {
                self.cursor.advance();
                StmtKind::Pass
            }
            TokenKind::Keyword(Keyword::Break) => {
                self.cursor.advance();
                if self.loop_depth == 0 {
                    return Err(ParseError::new("'break' outside loop", loc));
                }
                StmtKind::Break
            }
            TokenKind::Keyword(Keyword::Continue) => {
                self.cursor.advance();
                if self.loop_depth == 0 {
                    return Err(ParseError::new("'continue' not properly in loop", loc));
                }
                StmtKind::Continue
            }
            TokenKind::Keyword(Keyword::Return) => {
                self.cursor.advance();
                if self.func_depth == 0 {
                    return Err(ParseError::new("'return' outside function", loc));
                }
                let value = if self.at_statement_end() {
                    None
                } else {
                    Some(self.testlist_star()?)
                };
                StmtKind::Return(value)
            }
            TokenKind::Keyword(Keyword::Raise) => {
                self.cursor.advance();
                let exc = if self.at_statement_end() {
                    None
                } else {
                    Some(self.test()?)
                };
                let cause = if exc.is_some() && self.cursor.eat_keyword(Keyword::From) {
                    Some(self.test()?)
                } else {
                    None
                };
                StmtKind::Raise { exc, cause }
            }
            TokenKind::Keyword(Keyword::Assert) => {
                self.cursor.advance();
                let test = self.test()?;
                let msg = if self.cursor.eat(&TokenKind::Comma) {
                    Some(self.test()?)
                } else {
                    None
                };
                StmtKind::Assert { test, msg }
            }
            TokenKind::Keyword(Keyword::Del) => {
                self.cursor.advance();
                self.del_targets()?
            }
            TokenKind::Keyword(Keyword::Global) => {
                self.cursor.advance();
                StmtKind::Global(self.name_list()?)
            }
            TokenKind::Keyword(Keyword::Nonlocal) => {
                self.cursor.advance();
                StmtKind::Nonlocal(self.name_list()?)
            }
            TokenKind::Keyword(Keyword::Import) => {
                self.cursor.advance();
                let mut names = vec![self.dotted_as_name()?];
                while self.cursor.eat(&TokenKind::Comma) {
                    names.push(self.dotted_as_name()?);
                }
                StmtKind::Import { names }
            }
            TokenKind::Keyword(Keyword::From) => {
                self.cursor.advance();
                self.import_from()?
            }
            TokenKind::Name(n) if &**n == "print" && self.starts_print_statement() => {
                self.cursor.advance();
                self.print_statement()?
            }
            _ => self.expr_statement()?,
        };
        Ok(Stmt::new(kind, loc))
    }

    fn at_statement_end(&self) -> bool {
        matches!(
            self.cursor.current_kind(),
            TokenKind::Newline | TokenKind::Semicolon | TokenKind::Eof
        )
    }

    /// `print` begins a legacy print statement unless it is used as a value.
    fn starts_print_statement(&self) -> bool {
        match self.cursor.peek_kind(1) {
            TokenKind::LParen
            | TokenKind::Assign
            | TokenKind::AugAssign(_)
            | TokenKind::Dot
            | TokenKind::LBracket
            | TokenKind::Comma => false,
            TokenKind::Keyword(kw) => matches!(
                kw,
                Keyword::Not | Keyword::None | Keyword::True | Keyword::False | Keyword::Lambda
            ),
            _ => true,
        }
    }

    /// `print [test (',' test)* [',']]`
    fn print_statement(&mut self) -> Result<StmtKind, ParseError> {
        if self.cursor.check(&TokenKind::RShift) {
            return Err(ParseError::new(
                "print with a `>>` destination is not supported",
                self.cursor.current_loc(),
            ));
        }
        let mut values = Vec::new();
        let mut newline = true;
        while !self.at_statement_end() {
            values.push(self.test()?);
            if self.cursor.eat(&TokenKind::Comma) {
                newline = false;
            } else {
                newline = true;
                break;
            }
        }
        Ok(StmtKind::Print { values, newline })
    }

    /// Expression, assignment or augmented assignment.
    fn expr_statement(&mut self) -> Result<StmtKind, ParseError> {
        if self.cursor.check_keyword(Keyword::Yield) {
            return Ok(StmtKind::Expr(self.yield_expr()?));
        }
        let first = self.testlist_star()?;

        if let TokenKind::AugAssign(op) = *self.cursor.current_kind() {
            let loc = self.cursor.current_loc();
            self.cursor.advance();
            let mut target = first;
            if !matches!(
                target.kind,
                ExprKind::Name { .. } | ExprKind::Attribute { .. } | ExprKind::Subscript { .. }
            ) || !target.set_context(ExprContext::Store)
            {
                return Err(ParseError::new(
                    format!("'{}' is an illegal expression for augmented assignment", target.tag()),
                    loc,
                ));
            }
            let value = self.testlist()?;
            return Ok(StmtKind::AugAssign { target, op, value });
        }

        if !self.cursor.check(&TokenKind::Assign) {
            return Ok(StmtKind::Expr(first));
        }

        let mut pending = vec![first];
        self.cursor.advance();
        let mut value = self.assign_value()?;
        while self.cursor.eat(&TokenKind::Assign) {
            pending.push(value);
            value = self.assign_value()?;
        }
        let mut targets = Vec::with_capacity(pending.len());
        for mut target in pending {
            if !target.set_context(ExprContext::Store) {
                return Err(ParseError::new(
                    format!("cannot assign to {}", describe_target(&target)),
                    target.loc,
                ));
            }
            targets.push(target);
        }
        Ok(StmtKind::Assign { targets, value })
    }

    fn assign_value(&mut self) -> Result<Expr, ParseError> {
        if self.cursor.check_keyword(Keyword::Yield) {
            self.yield_expr()
        } else {
            self.testlist_star()
        }
    }

    fn del_targets(&mut self) -> Result<StmtKind, ParseError> {
        let mut targets = Vec::new();
        loop {
            let mut target = self.bitor_expr()?;
            if !target.set_context(ExprContext::Del) {
                return Err(ParseError::new(
                    format!("cannot delete {}", describe_target(&target)),
                    target.loc,
                ));
            }
            targets.push(target);
            if !self.cursor.eat(&TokenKind::Comma) || self.at_statement_end() {
                break;
            }
        }
        Ok(StmtKind::Delete(targets))
    }

    fn name_list(&mut self) -> Result<Vec<Ident>, ParseError> {
        let mut names = vec![self.cursor.expect_name()?];
        while self.cursor.eat(&TokenKind::Comma) {
            names.push(self.cursor.expect_name()?);
        }
        Ok(names)
    }

    fn dotted_name(&mut self) -> Result<Ident, ParseError> {
        let mut name = self.cursor.expect_name()?.to_string();
        while self.cursor.eat(&TokenKind::Dot) {
            name.push('.');
            name.push_str(&self.cursor.expect_name()?);
        }
        Ok(Rc::from(name))
    }

    fn dotted_as_name(&mut self) -> Result<Ident, ParseError> {
        let name = self.dotted_name()?;
        if self.cursor.eat_keyword(Keyword::As) {
            self.cursor.expect_name()?;
        }
        Ok(name)
    }

    fn import_from(&mut self) -> Result<StmtKind, ParseError> {
        while self.cursor.eat(&TokenKind::Dot) {}
        let module = self.dotted_name()?;
        self.cursor.expect_keyword(Keyword::Import)?;
        let mut names = Vec::new();
        if self.cursor.eat(&TokenKind::Star) {
            names.push(Rc::from("*"));
        } else {
            let parens = self.cursor.eat(&TokenKind::LParen);
            loop {
                names.push(self.cursor.expect_name()?);
                if self.cursor.eat_keyword(Keyword::As) {
                    self.cursor.expect_name()?;
                }
                if !self.cursor.eat(&TokenKind::Comma) || self.cursor.check(&TokenKind::RParen) {
                    break;
                }
            }
            if parens {
                self.cursor.expect(&TokenKind::RParen)?;
            }
        }
        Ok(StmtKind::ImportFrom { module, names })
    }

    // === Compound statements ===

    /// `':' (simple_stmts | NEWLINE INDENT stmt+ DEDENT)`
    fn suite(&mut self) -> Result<Vec<Stmt>, ParseError> {
        self.cursor.expect(&TokenKind::Colon)?;
        if self.cursor.eat(&TokenKind::Newline) {
            if !self.cursor.eat(&TokenKind::Indent) {
                return Err(ParseError::new(
                    "expected an indented block",
                    self.cursor.current_loc(),
                ));
            }
            self.block_statements()
        } else {
            let mut body = Vec::new();
            self.simple_statements(&mut body)?;
            Ok(body)
        }
    }

    fn loop_suite(&mut self) -> Result<Vec<Stmt>, ParseError> {
        self.loop_depth += 1;
        let body = self.suite();
        self.loop_depth -= 1;
        body
    }

    fn if_stmt(&mut self) -> Result<Stmt, ParseError> {
        let loc = self.cursor.advance().loc;
        let test = self.test()?;
        let body = self.suite()?;
        let orelse = if self.cursor.check_keyword(Keyword::Elif) {
            vec![self.if_stmt()?]
        } else if self.cursor.eat_keyword(Keyword::Else) {
            self.suite()?
        } else {
            Vec::new()
        };
        Ok(Stmt::new(StmtKind::If { test, body, orelse }, loc))
    }

    fn while_stmt(&mut self) -> Result<Stmt, ParseError> {
        let loc = self.cursor.advance().loc;
        let test = self.test()?;
        let body = self.loop_suite()?;
        let orelse = self.else_suite()?;
        Ok(Stmt::new(StmtKind::While { test, body, orelse }, loc))
    }

    fn for_stmt(&mut self) -> Result<Stmt, ParseError> {
        let loc = self.cursor.advance().loc;
        let mut target = self.target_list()?;
        if !target.set_context(ExprContext::Store) {
            return Err(ParseError::new(
                format!("cannot assign to {}", describe_target(&target)),
                target.loc,
            ));
        }
        self.cursor.expect_keyword(Keyword::In)?;
        let iter = self.testlist()?;
        let body = self.loop_suite()?;
        let orelse = self.else_suite()?;
        Ok(Stmt::new(
            StmtKind::For {
                target,
                iter,
                body,
                orelse,
            },
            loc,
        ))
    }

    fn else_suite(&mut self) -> Result<Vec<Stmt>, ParseError> {
        if self.cursor.eat_keyword(Keyword::Else) {
            self.suite()
        } else {
            Ok(Vec::new())
        }
    }

    fn try_stmt(&mut self) -> Result<Stmt, ParseError> {
        let loc = self.cursor.advance().loc;
        let body = self.suite()?;
        let mut handlers = Vec::new();
        while self.cursor.check_keyword(Keyword::Except) {
            let hloc = self.cursor.advance().loc;
            let (typ, name) = if self.cursor.check(&TokenKind::Colon) {
                (None, None)
            } else {
                let typ = self.test()?;
                let name = if self.cursor.eat_keyword(Keyword::As) || self.cursor.eat(&TokenKind::Comma)
                {
                    Some(self.cursor.expect_name()?)
                } else {
                    None
                };
                (Some(typ), name)
            };
            let hbody = self.suite()?;
            handlers.push(ExceptHandler {
                typ,
                name,
                body: hbody,
                loc: hloc,
            });
        }
        let orelse = if !handlers.is_empty() && self.cursor.eat_keyword(Keyword::Else) {
            self.suite()?
        } else {
            Vec::new()
        };
        let finalbody = if self.cursor.eat_keyword(Keyword::Finally) {
            self.suite()?
        } else {
            Vec::new()
        };
        if handlers.is_empty() && finalbody.is_empty() {
            return Err(ParseError::new(
                "expected 'except' or 'finally' block",
                self.cursor.current_loc(),
            ));
        }
        Ok(Stmt::new(
            StmtKind::Try {
                body,
                handlers,
                orelse,
                finalbody,
            },
            loc,
        ))
    }

    fn decorated(&mut self) -> Result<Stmt, ParseError> {
        let loc = self.cursor.current_loc();
        let mut decorators = Vec::new();
        while self.cursor.eat(&TokenKind::At) {
            decorators.push(self.test()?);
            self.cursor.expect(&TokenKind::Newline)?;
        }
        if self.cursor.check_keyword(Keyword::Class) {
            return self.class_def();
        }
        if !self.cursor.check_keyword(Keyword::Def) {
            return Err(self.cursor.unexpected("`def` or `class` after decorator"));
        }
        self.function_def(decorators, loc)
    }

    /// `'def' NAME '(' [params] ')' ['->' test] suite`
    fn function_def(&mut self, decorators: Vec<Expr>, loc: Location) -> Result<Stmt, ParseError> {
        self.cursor.expect_keyword(Keyword::Def)?;
        let name = self.cursor.expect_name()?;
        self.cursor.expect(&TokenKind::LParen)?;
        let args = self.parameters(&TokenKind::RParen, true)?;
        self.cursor.expect(&TokenKind::RParen)?;
        if self.cursor.eat(&TokenKind::Arrow) {
            self.test()?;
        }

        let outer_loops = std::mem::replace(&mut self.loop_depth, 0);
        self.func_depth += 1;
        let body = self.suite();
        self.func_depth -= 1;
        self.loop_depth = outer_loops;

        let def = FunctionDef {
            name,
            args,
            body: body?,
            decorators,
            loc,
        };
        Ok(Stmt::new(StmtKind::FunctionDef(Rc::new(def)), loc))
    }

    /// Parameter list up to (not including) `close`.
    pub(super) fn parameters(
        &mut self,
        close: &TokenKind,
        annotations: bool,
    ) -> Result<Arguments, ParseError> {
        let mut args = Arguments::default();
        let mut seen: Vec<Ident> = Vec::new();
        let mut check_dup = |name: &Ident, loc: Location| {
            if seen.contains(name) {
                return Err(ParseError::new(
                    format!("duplicate argument `{name}` in function definition"),
                    loc,
                ));
            }
            seen.push(Rc::clone(name));
            Ok(())
        };

        while !self.cursor.check(close) {
            let loc = self.cursor.current_loc();
            if self.cursor.eat(&TokenKind::DoubleStar) {
                let name = self.cursor.expect_name()?;
                check_dup(&name, loc)?;
                if annotations && self.cursor.eat(&TokenKind::Colon) {
                    self.test()?;
                }
                args.kwarg = Some(name);
                self.cursor.eat(&TokenKind::Comma);
                break;
            }
            if self.cursor.eat(&TokenKind::Star) {
                let TokenKind::Name(_) = self.cursor.current_kind() else {
                    return Err(ParseError::new(
                        "keyword-only arguments are not supported",
                        loc,
                    ));
                };
                let name = self.cursor.expect_name()?;
                check_dup(&name, loc)?;
                if annotations && self.cursor.eat(&TokenKind::Colon) {
                    self.test()?;
                }
                args.vararg = Some(name);
                if self.cursor.eat(&TokenKind::Comma)
                    && !matches!(self.cursor.current_kind(), TokenKind::DoubleStar)
                    && !self.cursor.check(close)
                {
                    return Err(ParseError::new(
                        "keyword-only arguments are not supported",
                        self.cursor.current_loc(),
                    ));
                }
                continue;
            }
            if args.vararg.is_some() {
                return Err(self.cursor.unexpected("`**` parameter"));
            }
            let name = self.cursor.expect_name()?;
            check_dup(&name, loc)?;
            if annotations && self.cursor.eat(&TokenKind::Colon) {
                self.test()?;
            }
            if self.cursor.eat(&TokenKind::Assign) {
                args.defaults.push(self.test()?);
            } else if !args.defaults.is_empty() {
                return Err(ParseError::new(
                    "non-default argument follows default argument",
                    loc,
                ));
            }
            args.args.push(name);
            if !self.cursor.eat(&TokenKind::Comma) {
                break;
            }
        }
        Ok(args)
    }

    fn class_def(&mut self) -> Result<Stmt, ParseError> {
        let loc = self.cursor.advance().loc;
        let name = self.cursor.expect_name()?;
        if self.cursor.eat(&TokenKind::LParen) {
            while !self.cursor.check(&TokenKind::RParen) {
                self.test()?;
                if !self.cursor.eat(&TokenKind::Comma) {
                    break;
                }
            }
            self.cursor.expect(&TokenKind::RParen)?;
        }
        let outer_loops = std::mem::replace(&mut self.loop_depth, 0);
        let body = self.suite();
        self.loop_depth = outer_loops;
        Ok(Stmt::new(StmtKind::ClassDef { name, body: body? }, loc))
    }

    fn with_stmt(&mut self) -> Result<Stmt, ParseError> {
        let loc = self.cursor.advance().loc;
        let mut items = Vec::new();
        loop {
            items.push(self.test()?);
            if self.cursor.eat_keyword(Keyword::As) {
                self.bitor_expr()?;
            }
            if !self.cursor.eat(&TokenKind::Comma) {
                break;
            }
        }
        let body = self.suite()?;
        Ok(Stmt::new(StmtKind::With { items, body }, loc))
    }
}

/// Short description of an expression for "cannot assign to X" messages.
fn describe_target(expr: &Expr) -> &'static str {
    match &expr.kind {
        ExprKind::Constant(_) => "literal",
        ExprKind::Call { .. } => "function call",
        ExprKind::BinOp { .. } | ExprKind::UnaryOp { .. } | ExprKind::BoolOp { .. } => "operator",
        ExprKind::Compare { .. } => "comparison",
        ExprKind::ListComp { .. } => "list comprehension",
        ExprKind::IfExp { .. } => "conditional expression",
        ExprKind::Lambda { .. } => "lambda",
        ExprKind::Dict { .. } => "dict literal",
        _ => "expression",
    }
}
