#![allow(missing_docs)]

mod common;

use common::{Example1, Example2, NestedStruct};
use jsonshape::{
    DecoderOptions, MissingFieldPolicy, UnknownFieldPolicy, from_slice_with_options, from_str,
};

fn render<R: jsonshape::Record + std::fmt::Debug>(input: &str) -> String {
    from_str::<R>(input).unwrap_err().to_string()
}

#[test]
fn snapshot_token_kind_errors() {
    insta::assert_snapshot!(render::<Example1>("[]"), @"unexpected '[', expected '{' at offset 0");
    insta::assert_snapshot!(render::<Example1>(r#"{"foo":true}"#), @"unexpected boolean, expected string at offset 7");
    insta::assert_snapshot!(render::<Example1>(r#"{"bar":"42"}"#), @"unexpected string, expected number at offset 7");
    insta::assert_snapshot!(render::<Example1>("{7:1}"), @"unexpected number, expected string or '}' at offset 1");
    insta::assert_snapshot!(render::<Example1>(r#"{"foo":]"#), @"unexpected ']', expected string at offset 7");
    insta::assert_snapshot!(render::<Example2>(r#"{"bar":{"baz":null}}"#), @"unexpected null, expected '[' at offset 14");
}

#[test]
fn snapshot_field_errors() {
    insta::assert_snapshot!(
        render::<Example1>(r#"{"foo":"hello","bar":42,"bar":7}"#),
        @"duplicate field `bar` at offset 24"
    );
    insta::assert_snapshot!(
        render::<NestedStruct>(r#"{"profile":[{"name":"a","name":"b"}]}"#),
        @"duplicate field `name` at offset 24"
    );

    let strict = DecoderOptions {
        unknown_fields: Some(UnknownFieldPolicy::Reject),
        missing_fields: MissingFieldPolicy::Reject,
        ..Default::default()
    };
    let err = from_slice_with_options::<Example1>(br#"{"foo":"a","extra":1}"#, strict).unwrap_err();
    insta::assert_snapshot!(err, @"unknown field `extra` at offset 11");
    let err = from_slice_with_options::<Example1>(br#"{"foo":"a"}"#, strict).unwrap_err();
    insta::assert_snapshot!(err, @"missing field `bar` at offset 10");
}

#[test]
fn snapshot_input_errors() {
    insta::assert_snapshot!(render::<Example1>(r#"{"bar":300000000000000000000}"#), @"number 300000000000000000000 out of range for i64 at offset 7");
    insta::assert_snapshot!(render::<Example1>(r#"{"bar":4.5}"#), @"number 4.5 out of range for i64 at offset 7");
    insta::assert_snapshot!(render::<Example1>(r#"{"foo":"a""#), @"unexpected end of input at offset 10");
    insta::assert_snapshot!(render::<Example1>(r#"{"a":1}garbage"#), @"trailing data after value at offset 7");
    insta::assert_snapshot!(render::<Example1>(r#"{"foo":"\x"}"#), @"syntax error: invalid escape character 'x' at offset 9");
    insta::assert_snapshot!(render::<Example1>(r#"{"zz":[1}}"#), @"syntax error: mismatched closing '}' at offset 8");
}
