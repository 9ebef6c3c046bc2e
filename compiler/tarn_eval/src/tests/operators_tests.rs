//! Operators as scripts see them.

use pretty_assertions::assert_eq;

use super::{eval, fails};
use crate::errors::ErrorKind;
use crate::value::ExcType;
use crate::Value;

#[test]
fn numeric_tower() {
    assert_eq!(eval("7 / 2"), Value::Float(3.5));
    assert_eq!(eval("7 // 2 + True"), Value::int(4));
    assert_eq!(eval("-7.5 // 2"), Value::Float(-4.0));
    assert_eq!(eval("2 ** -1"), Value::Float(0.5));
    assert_eq!(eval("1 == 1.0 == True"), Value::Bool(true));
    assert_eq!(eval("0.1 + 0.2"), Value::Float(0.1 + 0.2));
}

#[test]
fn division_by_zero() {
    assert_eq!(fails("1 / 0").exc, ExcType::ZeroDivisionError);
    assert_eq!(fails("1 // 0").message, "integer division or modulo by zero");
    assert_eq!(fails("1.0 % 0").exc, ExcType::ZeroDivisionError);
}

#[test]
fn bitwise() {
    assert_eq!(eval("(6 & 3, 6 | 3, 6 ^ 3, ~6, 1 << 4, -16 >> 2)"), eval("(2, 7, 5, -7, 16, -4)"));
    assert_eq!(eval("True & False"), Value::Bool(false));
}

#[test]
fn sequence_operators() {
    assert_eq!(eval("[1] + [2] * 2"), eval("[1, 2, 2]"));
    assert_eq!(eval("'ab' * 3"), Value::from("ababab"));
    assert_eq!(eval("(1, 2) + (3,)"), eval("(1, 2, 3)"));
    assert_eq!(eval("3 in [1, 2, 3] and 'b' in 'abc' and 4 not in range(3)"), Value::Bool(true));
    assert_eq!(fails("[1] + (2,)").exc, ExcType::TypeError);
}

#[test]
fn comparisons() {
    assert_eq!(eval("[1, 2] < [1, 3]"), Value::Bool(true));
    assert_eq!(eval("'abc' < 'abd'"), Value::Bool(true));
    assert_eq!(eval("nan == nan"), Value::Bool(false));
    assert_eq!(eval("1 < 2 > 0"), Value::Bool(true));
    assert_eq!(eval("None is None and [] is not []"), Value::Bool(true));
    let err = fails("1 < 'a'");
    assert_eq!(err.exc, ExcType::TypeError);
}

#[test]
fn augmented_assignment_on_subscripts() {
    assert_eq!(eval("d = {'n': 1}\nd['n'] += 5\nd['n']"), Value::int(6));
    assert_eq!(eval("a = [1, 2]\na[-1] *= 10\na"), eval("[1, 20]"));
}

#[test]
fn unary_operators() {
    assert_eq!(eval("-(-3)"), Value::int(3));
    assert_eq!(eval("not []"), Value::Bool(true));
    assert_eq!(eval("+True"), Value::int(1));
    assert_eq!(fails("-'a'").exc, ExcType::TypeError);
}

#[test]
fn operand_type_errors_name_the_types() {
    assert_eq!(
        fails("1 + 'a'").message,
        "unsupported operand type(s) for +: 'int' and 'str'"
    );
}

#[test]
fn array_comparison_chains_stop_on_any_true_element() {
    assert_eq!(
        eval("(array([1, 2]) < array([2, 0]) < array([0, 0])).tolist()"),
        eval("[True, False]")
    );
    assert_eq!(
        eval("(array([1, 2]) < array([2, 0]) < never_evaluated).tolist()"),
        eval("[True, False]")
    );
    assert_eq!(
        eval("(array([3, 2]) < array([2, 0]) < array([5, 5])).tolist()"),
        eval("[True, True]")
    );
}

#[test]
fn sequence_concatenation_is_length_limited() {
    let err = fails("x = [0] * 262144\nx = x + x");
    assert_eq!(err.kind, ErrorKind::Resource);
    assert_eq!(fails("t = (0,) * 262144\nt + (1,)").kind, ErrorKind::Resource);
    assert_eq!(eval("x = [0] * 131072\nlen(x + x)"), Value::int(262_144));
}
