//! Literals, containers, strings, and builtin functions.

use pretty_assertions::assert_eq;

use super::{eval, fails, output};
use crate::value::ExcType;
use crate::Value;

fn ints(items: &[i64]) -> Value {
    Value::list(items.iter().map(|&i| Value::int(i)).collect())
}

#[test]
fn last_expression_is_the_result() {
    assert_eq!(eval("x = 1\ny = 2\ny == x + x"), Value::Bool(true));
    assert_eq!(eval("x = 42\nx"), Value::int(42));
    assert_eq!(eval("x = 3"), Value::None);
}

#[test]
fn list_literals_and_methods() {
    let src = "a = [3, 1, 2]\na.append(5)\na.sort()\na.insert(0, 9)\na";
    assert_eq!(eval(src), ints(&[9, 1, 2, 3, 5]));
    assert_eq!(eval("a = [1, 2, 3]\na.pop()\na"), ints(&[1, 2]));
    assert_eq!(eval("[1, 2, 2, 3].count(2)"), Value::int(2));
    assert_eq!(eval("sorted([3, 1, 2], reverse=True)"), ints(&[3, 2, 1]));
    assert_eq!(eval("sorted(['bb', 'a', 'ccc'], key=len)"), eval("['a', 'bb', 'ccc']"));
}

#[test]
fn lists_alias_through_assignment() {
    assert_eq!(eval("a = [1]\nb = a\nb.append(2)\na"), ints(&[1, 2]));
    assert_eq!(eval("a = [1]\nb = a\nb += [2]\na"), ints(&[1]));
}

#[test]
fn slicing_follows_python() {
    assert_eq!(eval("[0, 1, 2, 3, 4, 5][1:5:2]"), ints(&[1, 3]));
    assert_eq!(eval("[0, 1, 2, 3, 4, 5][::-2]"), ints(&[5, 3, 1]));
    assert_eq!(eval("[0, 1, 2][-10:10]"), ints(&[0, 1, 2]));
    assert_eq!(eval("'hello'[::-1]"), Value::from("olleh"));
    assert_eq!(eval("a = [0, 1, 2, 3]\na[1:3] = [9]\na"), ints(&[0, 9, 3]));
    assert_eq!(eval("a = [0, 1, 2, 3]\ndel a[::2]\na"), ints(&[1, 3]));
    assert_eq!(eval("list(range(10)[2:8:3])"), ints(&[2, 5]));
    let err = fails("[1, 2][::0]");
    assert_eq!(err.exc, ExcType::ValueError);
    let err = fails("a = [1, 2, 3]\na[::2] = [1, 2, 3]");
    assert_eq!(
        err.message,
        "attempt to assign sequence of size 3 to extended slice of size 2"
    );
}

#[test]
fn index_errors() {
    assert_eq!(fails("[1, 2][5]").message, "list index out of range");
    assert_eq!(fails("(1,)[-3]").exc, ExcType::IndexError);
    assert_eq!(fails("{'a': 1}['b']").exc, ExcType::KeyError);
    assert_eq!(fails("t = (1, 2)\nt[0] = 5").exc, ExcType::TypeError);
}

#[test]
fn dicts() {
    let src = "d = {'a': 1}\nd['b'] = 2\nd.update(c=3)\nsorted(d.keys())";
    assert_eq!(eval(src), eval("['a', 'b', 'c']"));
    assert_eq!(eval("d = {'a': 1}\nd.get('z', 7)"), Value::int(7));
    assert_eq!(eval("d = {1: 'x'}\ndel d[1]\nlen(d)"), Value::int(0));
    assert_eq!(eval("dict([('a', 1), ('b', 2)])['b']"), Value::int(2));
    assert_eq!(eval("'a' in {'a': 1}"), Value::Bool(true));
    assert_eq!(fails("{[1]: 2}").exc, ExcType::TypeError);
}

#[test]
fn unpacking() {
    assert_eq!(eval("a, b = 1, 2\nb, a = a, b\n[a, b]"), ints(&[2, 1]));
    assert_eq!(eval("(a, (b, c)) = [1, (2, 3)]\nc"), Value::int(3));
    assert_eq!(
        fails("a, b = 1, 2, 3").message,
        "too many values to unpack (expected 2, got 3)"
    );
    assert_eq!(
        fails("a, b, c = 1, 2").message,
        "not enough values to unpack (expected 3, got 2)"
    );
}

#[test]
fn string_methods() {
    assert_eq!(eval("'a,b,,c'.split(',')"), eval("['a', 'b', '', 'c']"));
    assert_eq!(eval("'  pad '.strip()"), Value::from("pad"));
    assert_eq!(eval("'-'.join(['x', 'y', 'z'])"), Value::from("x-y-z"));
    assert_eq!(eval("'Hello'.upper() + 'World'.lower()"), Value::from("HELLOworld"));
    assert_eq!(eval("'abc'.center(7, '*')"), Value::from("**abc**"));
    assert_eq!(eval("'banana'.replace('a', 'o', 2)"), Value::from("bonona"));
    assert_eq!(eval("'banana'.find('n')"), Value::int(2));
    assert_eq!(eval("'42'.zfill(5)"), Value::from("00042"));
    assert_eq!(eval("'abc'.startswith(('x', 'a'))"), Value::Bool(true));
}

#[test]
fn formatting() {
    assert_eq!(eval("'%d items at %.2f' % (3, 1.5)"), Value::from("3 items at 1.50"));
    assert_eq!(eval("'{} and {}'.format('a', 'b')"), Value::from("a and b"));
    assert_eq!(eval("'{x:>5}|'.format(x='ab')"), Value::from("   ab|"));
    assert_eq!(eval("'%s' % [1, 2]"), Value::from("[1, 2]"));
    assert_eq!(eval("repr('hi')"), Value::from("'hi'"));
}

#[test]
fn comprehensions() {
    assert_eq!(eval("[x * x for x in range(5) if x % 2 == 0]"), ints(&[0, 4, 16]));
    assert_eq!(
        eval("[(i, j) for i in range(2) for j in range(2) if i != j]"),
        eval("[(0, 1), (1, 0)]")
    );
}

#[test]
fn builtin_functions() {
    assert_eq!(eval("sum([1, 2, 3], 10)"), Value::int(16));
    assert_eq!(eval("max(3, 9, 2)"), Value::int(9));
    assert_eq!(eval("min([], default=-1)"), Value::int(-1));
    assert_eq!(eval("list(zip([1, 2], 'ab'))"), eval("[(1, 'a'), (2, 'b')]"));
    assert_eq!(eval("list(enumerate('ab', 1))"), eval("[(1, 'a'), (2, 'b')]"));
    assert_eq!(eval("list(map(abs, [-1, 2, -3]))"), ints(&[1, 2, 3]));
    assert_eq!(eval("list(reversed(range(3)))"), ints(&[2, 1, 0]));
    assert_eq!(eval("divmod(-7, 2)"), eval("(-4, 1)"));
    assert_eq!(eval("hex(255) + oct(8) + bin(5)"), Value::from("0xff0o100b101"));
    assert_eq!(eval("int('ff', 16)"), Value::int(255));
    assert_eq!(eval("round(2.5)"), Value::int(2));
    assert_eq!(eval("round(3.14159, 2)"), Value::Float(3.14));
    assert_eq!(eval("chr(ord('a') + 1)"), Value::from("b"));
    assert_eq!(eval("isinstance(3, (str, int))"), Value::Bool(true));
    assert_eq!(eval("type(1.0) == float"), Value::Bool(true));
    assert_eq!(eval("callable(len) and not callable(3)"), Value::Bool(true));
    assert_eq!(eval("pow(3, 4, 5)"), Value::int(1));
}

#[test]
fn math_bindings() {
    assert_eq!(eval("sqrt(16)"), Value::Float(4.0));
    assert_eq!(eval("floor(-2.5)"), Value::int(-3));
    assert_eq!(eval("factorial(20)"), Value::int(2_432_902_008_176_640_000));
    assert_eq!(eval("fsum([0.1] * 10)"), Value::Float(1.0));
    assert_eq!(eval("isnan(nan) and isinf(inf)"), Value::Bool(true));
    let err = fails("sqrt(-1)");
    assert_eq!(err.exc, ExcType::ValueError);
    assert_eq!(err.message, "Error calling `sqrt()`: `math domain error`");
}

#[test]
fn arrays() {
    assert_eq!(eval("a = array([1, 2, 3])\n(a * 2).tolist()"), eval("[2.0, 4.0, 6.0]"));
    assert_eq!(eval("a = arange(6).reshape(2, 3)\na.shape"), eval("(2, 3)"));
    assert_eq!(eval("(array([1, 5, 3]) > 2).tolist()"), eval("[False, True, True]"));
    assert_eq!(eval("zeros((2, 2)).sum()"), Value::Float(0.0));
    assert_eq!(eval("dot([1, 2], [3, 4])"), Value::Float(11.0));
    assert_eq!(eval("a = zeros(3)\na[1] = 5\na.tolist()"), eval("[0.0, 5.0, 0.0]"));
    assert_eq!(fails("bool(array([1, 2]))").exc, ExcType::ValueError);
}

#[test]
fn print_statement_and_function() {
    assert_eq!(output("print 1, 'two'\nprint(3, 4, sep='-')"), "1 two\n3-4\n");
    assert_eq!(output("print(end='')\nprint()"), "\n");
}

#[test]
fn big_integers() {
    assert_eq!(eval("2 ** 100 // 2 ** 98"), Value::int(4));
    assert_eq!(eval("str(2 ** 70)"), Value::from("1180591620717411303424"));
    assert_eq!(eval("(2 ** 64) % 1000"), Value::int(616));
    assert_eq!(eval("-(2 ** 63) - 1 < -(2 ** 63)"), Value::Bool(true));
}

#[test]
fn ranges_near_the_integer_limits() {
    assert_eq!(
        eval("range(-2**63, 2**63 - 1, 2**62)[3]"),
        Value::int(4_611_686_018_427_387_904)
    );
    assert_eq!(eval("len(range(0, -5, -2**63))"), Value::int(1));
    assert_eq!(eval("len(range(-9*10**18, 9*10**18, 10**18)[::-1])"), Value::int(18));
    assert_eq!(
        eval("list(range(-9*10**18, 9*10**18, 10**18)[::-1])[:2]"),
        eval("[8*10**18, 7*10**18]")
    );
    assert_eq!(eval("list(range(2**62, 2**63 - 1, 2**62)[::4])"), eval("[2**62]"));
}

#[test]
fn range_slices_normalise_their_stop() {
    assert_eq!(output("print(repr(range(10)[2::3]))"), "range(2, 11, 3)\n");
    assert_eq!(eval("list(range(10)[2::3])"), ints(&[2, 5, 8]));
    assert_eq!(eval("len(range(10)[5:2])"), Value::int(0));
}
