#![allow(missing_docs, dead_code)]
#![allow(clippy::needless_raw_string_hashes)]

use jsonshape::{Value, record};

record! {
    #[derive(Debug, Default, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
    pub struct Example1 {
        pub foo: String,
        pub bar: i64,
    }
}

record! {
    #[derive(Debug, Default, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
    pub struct Qux {
        pub quux: Option<f64>,
    }
}

record! {
    #[derive(Debug, Default, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
    pub struct Bar {
        pub baz: Vec<i64>,
        pub qux: Option<Qux>,
    }
}

record! {
    #[derive(Debug, Default, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
    pub struct Example2 {
        pub foo: String,
        pub bar: Bar,
    }
}

record! {
    #[derive(Debug, Default, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
    pub struct BasicStruct {
        pub name: String,
        pub age: i64,
        pub email: String,
        pub active: bool,
    }
}

record! {
    #[derive(Debug, Default, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
    pub struct NestedStruct {
        pub id: i64,
        pub profile: Vec<BasicStruct>,
        pub tags: Vec<String>,
    }
}

record! {
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct ComplexStruct {
        pub id: i64,
        pub data: Value,
        pub numbers: Vec<f64>,
        pub metadata: Option<BasicStruct>,
        pub created_at: String,
    }
}

pub const EXAMPLE1_JSON: &str = r#"{"foo":"hello","bar":42}"#;

pub const EXAMPLE2_JSON: &str = r#"{"foo":"hello","bar":{"baz":[1,2,3],"qux":{"quux":3.14}}}"#;

pub const BASIC_JSON: &str = r#"{"active":false,"age":42,"email":"foo@bar.baz","name":"foo"}"#;

pub const NESTED_JSON: &str = r#"{
    "id": 1234,
    "profile": [
        {"active":false,"age":42,"email":"foo@bar.baz","name":"foo"}
    ],
    "tags": ["foo", "bar", "baz"]
}"#;

pub const COMPLEX_JSON: &str = r#"{
    "id": 1234,
    "data": {
        "humidity": 31.4,
        "notes": "this data is completely made up",
        "temperature": {
            "Celsius": 37,
            "Fahrenheit": 98.6,
            "Kelvin": 310.15
        }
    },
    "numbers": [
        3.1415926535,
        2.7182818284,
        1.4142135623,
        1.6180339887,
        602214076000000000000000,
        2.220446049250313e-16,
        0.1,
        0
    ],
    "metadata": {"active":false,"age":42,"email":"foo@bar.baz","name":"foo"},
    "created_at": "2025-09-21T17:00:00+02:00"
}"#;

pub fn basic() -> BasicStruct {
    BasicStruct {
        name: "foo".into(),
        age: 42,
        email: "foo@bar.baz".into(),
        active: false,
    }
}
