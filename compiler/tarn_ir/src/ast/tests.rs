use super::*;
use pretty_assertions::assert_eq;

fn name(id: &str) -> Expr {
    Expr::new(
        ExprKind::Name {
            id: id.into(),
            ctx: ExprContext::Load,
        },
        Location::new(1, 0),
    )
}

fn int(n: i64) -> Expr {
    Expr::new(
        ExprKind::Constant(Constant::Int(BigInt::from(n))),
        Location::new(1, 0),
    )
}

// === Context rewriting ===

#[test]
fn set_context_on_tuple_reaches_elements() {
    let mut target = Expr::new(
        ExprKind::Tuple {
            elts: vec![name("a"), name("b")],
            ctx: ExprContext::Load,
        },
        Location::new(1, 0),
    );
    assert!(target.set_context(ExprContext::Store));
    let ExprKind::Tuple { elts, ctx } = &target.kind else {
        panic!("expected tuple");
    };
    assert_eq!(*ctx, ExprContext::Store);
    for elt in elts {
        assert!(matches!(
            elt.kind,
            ExprKind::Name {
                ctx: ExprContext::Store,
                ..
            }
        ));
    }
}

#[test]
fn set_context_rejects_literals() {
    let mut target = int(3);
    assert!(!target.set_context(ExprContext::Store));

    let mut nested = Expr::new(
        ExprKind::List {
            elts: vec![name("a"), int(1)],
            ctx: ExprContext::Load,
        },
        Location::new(1, 0),
    );
    assert!(!nested.set_context(ExprContext::Store));
}

// === Tags ===

#[test]
fn tags_name_node_kinds() {
    assert_eq!(name("x").tag(), "Name");
    assert_eq!(int(1).tag(), "Num");
    let lambda = Expr::new(
        ExprKind::Lambda {
            args: Box::default(),
            body: Box::new(int(1)),
        },
        Location::UNKNOWN,
    );
    assert_eq!(lambda.tag(), "Lambda");
    assert_eq!(Stmt::new(StmtKind::Pass, Location::UNKNOWN).tag(), "Pass");
    assert_eq!(
        StmtKind::ClassDef {
            name: "C".into(),
            body: vec![]
        }
        .tag(),
        "ClassDef"
    );
}

// === Function definitions ===

#[test]
fn docstring_is_leading_string_statement() {
    let doc = Stmt::new(
        StmtKind::Expr(Expr::new(
            ExprKind::Constant(Constant::Str("adds things".into())),
            Location::new(2, 4),
        )),
        Location::new(2, 4),
    );
    let def = FunctionDef {
        name: "f".into(),
        args: Arguments::default(),
        body: vec![doc, Stmt::new(StmtKind::Pass, Location::new(3, 4))],
        decorators: vec![],
        loc: Location::new(1, 0),
    };
    assert_eq!(def.docstring(), Some("adds things"));
}

#[test]
fn required_count_excludes_defaults() {
    let args = Arguments {
        args: vec!["a".into(), "b".into(), "c".into()],
        defaults: vec![int(1)],
        vararg: None,
        kwarg: None,
    };
    assert_eq!(args.required_count(), 2);
}

#[test]
fn operator_symbols() {
    assert_eq!(BinaryOp::FloorDiv.as_symbol(), "//");
    assert_eq!(CmpOp::NotIn.as_symbol(), "not in");
    assert!(BinaryOp::Pow.is_right_assoc());
    assert!(BinaryOp::Mul.precedence() > BinaryOp::Add.precedence());
}
