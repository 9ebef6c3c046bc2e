//! Loops, conditionals, and control signals.

use pretty_assertions::assert_eq;

use super::{eval, fails, output};
use crate::errors::ErrorKind;
use crate::value::ExcType;
use crate::Value;

#[test]
fn while_with_break_and_continue() {
    let src = "\
n = 0
total = 0
while True:
    n += 1
    if n % 2 == 0:
        continue
    if n > 9:
        break
    total += n
total";
    assert_eq!(eval(src), Value::int(25));
}

#[test]
fn loop_else_runs_only_without_break() {
    let src = "\
hits = []
for i in range(3):
    pass
else:
    hits.append('for')
for i in range(3):
    if i == 1:
        break
else:
    hits.append('broken')
n = 0
while n < 2:
    n += 1
else:
    hits.append('while')
hits";
    assert_eq!(eval(src), eval("['for', 'while']"));
}

#[test]
fn break_inside_try_reaches_the_loop() {
    let src = "\
seen = []
for i in range(5):
    try:
        if i == 2:
            break
        seen.append(i)
    finally:
        seen.append('f')
seen";
    assert_eq!(eval(src), eval("[0, 'f', 1, 'f', 'f']"));
}

#[test]
fn for_iterates_a_snapshot() {
    let src = "\
a = [1, 2, 3]
for x in a:
    a.append(x)
len(a)";
    assert_eq!(eval(src), Value::int(6));
}

#[test]
fn nested_loops_and_tuple_targets() {
    let src = "\
pairs = [(1, 'a'), (2, 'b')]
out = ''
for n, ch in pairs:
    for _ in range(n):
        out += ch
out";
    assert_eq!(eval(src), Value::from("abb"));
}

#[test]
fn if_elif_else_and_conditional_expressions() {
    let src = "\
def grade(n):
    if n >= 90:
        return 'A'
    elif n >= 80:
        return 'B'
    else:
        return 'C'
[grade(95), grade(85), grade(10), 'yes' if 0 else 'no']";
    assert_eq!(eval(src), eval("['A', 'B', 'C', 'no']"));
}

#[test]
fn boolean_operators_short_circuit() {
    assert_eq!(eval("0 or [] or 'last'"), Value::from("last"));
    assert_eq!(eval("1 and 0 and undefined_name"), Value::int(0));
    assert_eq!(eval("not 1 < 2 < 3"), Value::Bool(false));
}

#[test]
fn stray_signals_are_syntax_failures() {
    assert_eq!(fails("break").kind, ErrorKind::Syntax);
    assert_eq!(fails("return 1").exc, ExcType::SyntaxError);
}

#[test]
fn assert_statement() {
    let err = fails("assert 1 == 2, 'numbers differ'");
    assert_eq!(err.kind, ErrorKind::Assertion);
    assert_eq!(err.message, "numbers differ");
    assert_eq!(eval("assert True\n5"), Value::int(5));
}

#[test]
fn delete_unbinds_names() {
    assert_eq!(fails("x = 1\ndel x\nx").exc, ExcType::NameError);
    assert_eq!(fails("del never_bound").exc, ExcType::NameError);
}

#[test]
fn print_inside_loops() {
    assert_eq!(output("for i in range(3):\n    print(i)"), "0\n1\n2\n");
}
