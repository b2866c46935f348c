use super::*;
use crate::diagnostics::ErrorKind;

fn list(items: &[f64]) -> Value {
    Value::List(items.iter().copied().map(Value::Number).collect())
}

#[test]
fn test_display() {
    assert_eq!(Value::Number(42.0).to_string(), "42");
    assert_eq!(Value::Number(-0.0).to_string(), "0");
    assert_eq!(Value::Number(2.5).to_string(), "2.5");
    assert_eq!(Value::Number(-7.0).to_string(), "-7");
    assert_eq!(
        Value::List(vec![
            Value::Number(1.0),
            list(&[2.0, 3.0]),
            Value::empty_list()
        ])
        .to_string(),
        "[1 [2 3] []]"
    );
}

#[test]
fn test_equality_uses_epsilon() {
    assert!(values_equal(&Value::Number(0.1 + 0.2), &Value::Number(0.3)));
    assert!(values_equal(&Value::Number(1.0), &Value::Number(1.00005)));
    assert!(!values_equal(&Value::Number(1.0), &Value::Number(1.001)));
}

#[test]
fn test_equality_is_structural() {
    assert!(values_equal(&list(&[1.0, 2.0]), &list(&[1.0, 2.0])));
    assert!(!values_equal(&list(&[1.0, 2.0]), &list(&[1.0])));
    assert!(!values_equal(&list(&[1.0]), &Value::Number(1.0)));
    assert!(values_equal(&Value::empty_list(), &Value::empty_list()));
}

#[test]
fn test_conversions_fail_with_type_mismatch() {
    let err = list(&[1.0]).as_number("FORWARD").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::TypeMismatch { expected: "a number", .. }));
    insta::assert_snapshot!(err.to_string(), @"FORWARD expected a number, got [1]");

    let err = Value::Number(3.0).as_list("FIRST").unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"FIRST expected a list, got 3");
}

#[test]
fn test_truthiness() {
    assert!(Value::Number(-1.0).is_truthy("IF").unwrap());
    assert!(!Value::Number(0.0).is_truthy("IF").unwrap());
    assert!(Value::empty_list().is_truthy("IF").is_err());
    assert_eq!(Value::bool(true), Value::Number(1.0));
    assert_eq!(Value::bool(false), Value::Number(0.0));
}

#[test]
fn test_serializes_as_plain_json() {
    let value = Value::List(vec![Value::Number(1.5), list(&[2.0])]);
    assert_eq!(serde_json::to_string(&value).unwrap(), "[1.5,[2.0]]");
}
