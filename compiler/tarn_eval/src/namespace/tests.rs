use std::rc::Rc;

use super::*;

#[test]
fn define_then_lookup() {
    let mut ns = Namespace::new();
    assert!(ns.define(Rc::from("x"), Value::int(42)).is_ok());
    assert_eq!(ns.lookup("x").ok(), Some(Value::int(42)));
}

#[test]
fn unbound_name_is_a_name_error() {
    let ns = Namespace::new();
    let err = ns.lookup("missing");
    assert!(matches!(err, Err(e) if e.message == "name `missing` is not defined"));
}

#[test]
fn reserved_words_cannot_be_bound() {
    let mut ns = Namespace::new();
    for word in ["eval", "print", "True", "class", "__import__"] {
        let err = ns.define(Rc::from(word), Value::None);
        assert!(err.is_err(), "{word} should be rejected");
    }
    assert!(ns.is_empty());
}

#[test]
fn valid_names_follow_identifier_rules() {
    assert!(valid_symbol_name("x"));
    assert!(valid_symbol_name("_private"));
    assert!(valid_symbol_name("a1"));
    assert!(!valid_symbol_name("1a"));
    assert!(!valid_symbol_name(""));
    assert!(!valid_symbol_name("a-b"));
}

#[test]
fn unchecked_insert_allows_seeding_reserved_names() {
    let mut ns = Namespace::new();
    ns.insert(Rc::from("print"), Value::None);
    assert!(ns.contains("print"));
}

#[test]
fn snapshot_restores_prior_bindings() {
    let mut ns = Namespace::new();
    ns.insert(Rc::from("a"), Value::int(1));
    let saved = ns.snapshot();
    ns.insert(Rc::from("a"), Value::int(2));
    ns.insert(Rc::from("b"), Value::int(3));
    ns.restore(saved);
    assert_eq!(ns.lookup("a").ok(), Some(Value::int(1)));
    assert!(!ns.contains("b"));
}

#[test]
fn names_are_sorted() {
    let mut ns = Namespace::new();
    for name in ["c", "a", "b"] {
        ns.insert(Rc::from(name), Value::None);
    }
    let names: Vec<String> = ns.names().iter().map(ToString::to_string).collect();
    assert_eq!(names, vec!["a", "b", "c"]);
}

#[test]
fn remove_unbound_fails() {
    let mut ns = Namespace::new();
    assert!(ns.remove("nope").is_err());
    ns.insert(Rc::from("x"), Value::int(1));
    assert!(ns.remove("x").is_ok());
    assert_eq!(ns.len(), 0);
}
