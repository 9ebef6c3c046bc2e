#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use pretty_assertions::assert_eq;

use super::*;

#[test]
fn truthiness() {
    assert!(!Value::None.is_truthy().unwrap());
    assert!(!Value::int(0).is_truthy().unwrap());
    assert!(Value::Float(0.5).is_truthy().unwrap());
    assert!(!Value::from("").is_truthy().unwrap());
    assert!(Value::list(vec![Value::None]).is_truthy().unwrap());
    assert!(!Value::Range(RangeValue { start: 3, stop: 3, step: 1 }).is_truthy().unwrap());
    assert!(Value::Builtin(Builtin {
        name: "len",
        func: |_, _| Ok(Value::None),
        is_type: false,
    })
    .is_truthy()
    .unwrap());
}

#[test]
fn ambiguous_array_truth_is_an_error() {
    let a = Value::array(NdArray::from_vec(vec![1.0, 2.0]));
    let err = a.is_truthy().unwrap_err();
    assert_eq!(err.exc, ExcType::ValueError);
    let single = Value::array(NdArray::from_vec(vec![3.0]));
    assert!(single.is_truthy().unwrap());
}

#[test]
fn range_len_and_contains() {
    let r = RangeValue { start: 10, stop: 0, step: -3 };
    assert_eq!(r.len(), 4);
    assert!(r.contains(4));
    assert!(!r.contains(5));
    assert!(!r.contains(0));
    assert_eq!(r.get(3), 1);
    let huge = RangeValue { start: i64::MIN, stop: i64::MAX, step: i64::MAX };
    assert_eq!(huge.len(), 3);
}

#[test]
fn lists_share_on_clone() {
    let a = Value::list(vec![Value::int(1)]);
    let b = a.clone();
    if let Value::List(items) = &b {
        items.borrow_mut().push(Value::int(2));
    }
    assert_eq!(a.len().unwrap(), 2);
}

#[test]
fn string_len_counts_chars() {
    assert_eq!(Value::from("héllo").len().unwrap(), 5);
    let chars: Vec<Value> = Value::from("ab").iter().unwrap().collect();
    assert_eq!(chars, vec![Value::from("a"), Value::from("b")]);
}

#[test]
fn numeric_views() {
    assert_eq!(Value::Bool(true).as_int(), Some(Int::ONE));
    assert_eq!(Value::int(7).as_f64(), Some(7.0));
    assert_eq!(Value::from("7").as_f64(), None);
    assert!(Value::Bool(false).is_number());
    assert!(!Value::None.is_number());
}

#[test]
fn type_names() {
    assert_eq!(Value::None.type_name(), "NoneType");
    assert_eq!(Value::exception(ExcType::KeyError, vec![]).type_name(), "KeyError");
    assert_eq!(Value::ExcType(ExcType::KeyError).type_name(), "type");
    assert_eq!(Value::dict(Dict::new()).type_name(), "dict");
}

#[test]
fn dict_iterates_keys_in_insertion_order() {
    let mut d = Dict::new();
    d.insert(Value::from("z"), Value::int(1)).unwrap();
    d.insert(Value::int(3), Value::int(2)).unwrap();
    let keys: Vec<Value> = Value::dict(d).iter().unwrap().collect();
    assert_eq!(keys, vec![Value::from("z"), Value::int(3)]);
}

#[test]
fn non_iterables_are_rejected() {
    let err = Value::int(3).iter().err().unwrap();
    assert_eq!(err.exc, ExcType::TypeError);
    assert!(Value::None.len().is_err());
}
