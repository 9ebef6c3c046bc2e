//! Property tests against reference models.

use num_bigint::BigInt;
use proptest::prelude::*;

use super::quiet;
use crate::value::Int;
use crate::Value;

fn big(x: i128) -> Value {
    Value::Int(Int::from_bigint(BigInt::from(x)))
}

fn run(source: &str) -> Option<Value> {
    let (mut interp, _) = quiet();
    interp.eval(source).ok()
}

fn floor_div(a: i128, b: i128) -> i128 {
    let q = a / b;
    if a % b != 0 && ((a < 0) != (b < 0)) {
        q - 1
    } else {
        q
    }
}

/// Positions `list(range(len))[start:stop:step]` selects.
fn slice_model(len: i64, start: Option<i64>, stop: Option<i64>, step: i64) -> Vec<i64> {
    let (lower, upper) = if step < 0 { (-1, len - 1) } else { (0, len) };
    let clamp = |bound: i64| {
        if bound < 0 {
            (bound + len).max(lower)
        } else {
            bound.min(upper)
        }
    };
    let start = start.map_or(if step < 0 { upper } else { lower }, clamp);
    let stop = stop.map_or(if step < 0 { lower } else { upper }, clamp);
    let mut out = Vec::new();
    let mut i = start;
    while (step > 0 && i < stop) || (step < 0 && i > stop) {
        out.push(i);
        i += step;
    }
    out
}

fn show(bound: Option<i64>) -> String {
    bound.map(|b| format!("({b})")).unwrap_or_default()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn int_arithmetic_matches_i128(a in any::<i64>(), b in any::<i64>()) {
        let (x, y) = (i128::from(a), i128::from(b));
        let src = format!("a = {a}\nb = {b}\n[a + b, a - b, a * b]");
        let expected = Value::list(vec![
            big(x + y),
            big(x - y),
            big(x * y),
        ]);
        prop_assert_eq!(run(&src), Some(expected));
    }

    #[test]
    fn floor_division_and_modulo(a in any::<i64>(), b in any::<i64>().prop_filter("non-zero", |b| *b != 0)) {
        let (x, y) = (i128::from(a), i128::from(b));
        let q = floor_div(x, y);
        let src = format!("a = {a}\nb = {b}\n[a // b, a % b, divmod(a, b)]");
        let expected = Value::list(vec![
            big(q),
            big(x - q * y),
            Value::tuple(vec![big(q), big(x - q * y)]),
        ]);
        prop_assert_eq!(run(&src), Some(expected));
    }

    #[test]
    fn slices_match_the_reference_model(
        len in 0i64..12,
        start in proptest::option::of(-15i64..15),
        stop in proptest::option::of(-15i64..15),
        step in prop_oneof![-4i64..0, 1i64..5],
    ) {
        let src = format!(
            "list(range({len}))[{}:{}:{step}]",
            show(start),
            show(stop)
        );
        let expected = Value::list(
            slice_model(len, start, stop, step).into_iter().map(Value::int).collect(),
        );
        prop_assert_eq!(run(&src), Some(expected));
    }

    #[test]
    fn evaluation_never_panics(src in "[a-z0-9+*/%()\\[\\]:, =-]{0,24}") {
        let _ = run(&src);
    }
}
