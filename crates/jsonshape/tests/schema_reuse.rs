#![allow(missing_docs)]

mod common;

use std::thread;

use common::{BASIC_JSON, BasicStruct, Example1, NestedStruct, basic};
use jsonshape::{ErrorKind, Record, from_slice, from_str};

#[test]
fn schema_is_built_once() {
    assert!(std::ptr::eq(Example1::schema(), Example1::schema()));
    assert_eq!(Example1::schema().name(), "Example1");
    assert_eq!(BasicStruct::schema().len(), 4);
}

#[test]
fn concurrent_decodes_do_not_share_state() {
    thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                scope.spawn(move || {
                    for n in 0..200 {
                        let input = format!(r#"{{"foo":"t{i}","bar":{n}}}"#);
                        let v: Example1 = from_str(&input).unwrap();
                        assert_eq!(v.foo, format!("t{i}"));
                        assert_eq!(v.bar, n);

                        // Interleave failing decodes on the same schema.
                        let err = from_slice::<Example1>(br#"{"bar":1,"bar":2}"#).unwrap_err();
                        assert_eq!(err.kind(), ErrorKind::DuplicateField);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
    });
}

#[test]
fn sequential_decodes_start_fresh() {
    let nested: NestedStruct = from_str(r#"{"profile":[{"name":"a"},{"name":"b"}]}"#).unwrap();
    assert_eq!(nested.profile.len(), 2);
    assert_eq!(nested.profile[1].name, "b");

    let v: BasicStruct = from_str(BASIC_JSON).unwrap();
    assert_eq!(v, basic());
    let v: BasicStruct = from_str(r#"{"name":"other"}"#).unwrap();
    assert_eq!(v.age, 0);
}
