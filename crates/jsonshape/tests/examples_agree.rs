#![allow(missing_docs)]
#![allow(clippy::float_cmp, clippy::approx_constant)]

mod common;

use common::{
    BASIC_JSON, BasicStruct, COMPLEX_JSON, ComplexStruct, EXAMPLE1_JSON, EXAMPLE2_JSON, Example1,
    Example2, NESTED_JSON, NestedStruct, basic,
};
use jsonshape::{Record, Value, decode_value, from_str};
use serde::de::DeserializeOwned;

#[track_caller]
fn assert_agrees<R>(input: &str) -> R
where
    R: Record + DeserializeOwned + PartialEq + std::fmt::Debug,
{
    let ours: R = from_str(input).unwrap();
    let reference: R = serde_json::from_str(input).unwrap();
    assert_eq!(ours, reference);
    ours
}

#[test]
fn example1() {
    let v: Example1 = assert_agrees(EXAMPLE1_JSON);
    assert_eq!(v.foo, "hello");
    assert_eq!(v.bar, 42);
}

#[test]
fn example2() {
    let v: Example2 = assert_agrees(EXAMPLE2_JSON);
    assert_eq!(v.bar.baz, [1, 2, 3]);
    assert_eq!(v.bar.qux.and_then(|q| q.quux), Some(3.14));
}

#[test]
fn example2_absent_and_null_optionals() {
    let v: Example2 = assert_agrees(r#"{"foo":"x","bar":{"baz":[],"qux":null}}"#);
    assert_eq!(v.bar.qux, None);

    let v: Example2 = assert_agrees(r#"{"foo":"x","bar":{"baz":[7],"qux":{}}}"#);
    assert_eq!(v.bar.qux.map(|q| q.quux), Some(None));
}

#[test]
fn basic_struct() {
    let v: BasicStruct = assert_agrees(BASIC_JSON);
    assert_eq!(v, basic());
}

#[test]
fn nested_struct() {
    let v: NestedStruct = assert_agrees(NESTED_JSON);
    assert_eq!(v.id, 1234);
    assert_eq!(v.profile, [basic()]);
    assert_eq!(v.tags, ["foo", "bar", "baz"]);
}

#[test]
fn complex_struct() {
    let v: ComplexStruct = from_str(COMPLEX_JSON).unwrap();
    assert_eq!(v.id, 1234);
    assert_eq!(
        v.numbers,
        [
            3.141_592_653_5,
            2.718_281_828_4,
            1.414_213_562_3,
            1.618_033_988_7,
            6.022_140_76e23,
            2.220_446_049_250_313e-16,
            0.1,
            0.0,
        ]
    );
    assert_eq!(v.metadata, Some(basic()));
    assert_eq!(v.created_at, "2025-09-21T17:00:00+02:00");

    // Both sides parse the same float spellings, so the trees compare exactly.
    let reference: serde_json::Value = serde_json::from_str(COMPLEX_JSON).unwrap();
    let data: serde_json::Value = serde_json::from_str(&v.data.to_string()).unwrap();
    assert_eq!(data, reference["data"]);
}

#[test]
fn interpreter_matches_typed_fields() {
    let tree = decode_value(ComplexStruct::schema(), COMPLEX_JSON.as_bytes()).unwrap();
    assert_eq!(tree.get("id"), Some(&Value::Integer(1234)));
    assert_eq!(
        tree.get("metadata").and_then(|m| m.get("email")),
        Some(&Value::from("foo@bar.baz"))
    );
    let numbers = tree.get("numbers").and_then(Value::as_array).unwrap();
    assert_eq!(numbers.len(), 8);
    assert_eq!(numbers[4], Value::Float(6.022_140_76e23));
    assert_eq!(numbers[7], Value::Float(0.0));

    let typed: ComplexStruct = from_str(COMPLEX_JSON).unwrap();
    assert_eq!(tree.get("data"), Some(&typed.data));
}

#[test]
fn interpreter_omits_absent_fields() {
    let tree = decode_value(Example2::schema(), br#"{"bar":{"baz":[1]}}"#).unwrap();
    insta::assert_snapshot!(tree, @r#"{"bar":{"baz":[1]}}"#);
}
