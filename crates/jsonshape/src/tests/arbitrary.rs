use quickcheck::{Arbitrary, Gen};

use crate::{Map, Value, record};

/// A float that survives a text round trip through any correct parser.
fn exact_float(g: &mut Gen) -> f64 {
    f64::from(i32::arbitrary(g)) / 4.0
}

impl Arbitrary for Value {
    fn arbitrary(g: &mut Gen) -> Self {
        fn gen_val(g: &mut Gen, depth: usize) -> Value {
            let choices = if depth == 0 { 6 } else { 8 };
            match usize::arbitrary(g) % choices {
                0 => Value::Null,
                1 => Value::Boolean(bool::arbitrary(g)),
                2 => Value::Integer(i64::arbitrary(g)),
                3 => Value::from(u64::arbitrary(g)),
                4 => Value::Float(exact_float(g)),
                5 => Value::String(String::arbitrary(g)),
                6 => {
                    let len = usize::arbitrary(g) % 3;
                    Value::Array((0..len).map(|_| gen_val(g, depth - 1)).collect())
                }
                _ => {
                    let len = usize::arbitrary(g) % 3;
                    let mut map = Map::new();
                    for _ in 0..len {
                        map.insert(String::arbitrary(g), gen_val(g, depth - 1));
                    }
                    Value::Object(map)
                }
            }
        }

        let depth = usize::arbitrary(g) % 3;
        gen_val(g, depth)
    }
}

record! {
    #[derive(Debug, Default, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
    pub(crate) struct Inner {
        pub(crate) id: i64,
        pub(crate) label: Option<String>,
    }
}

record! {
    #[derive(Debug, Default, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
    pub(crate) struct Sample {
        pub(crate) name: String,
        #[serde(rename = "count")]
        pub(crate) n: i32 => "count",
        pub(crate) flags: Vec<bool>,
        pub(crate) ratio: f64,
        pub(crate) small: u8,
        pub(crate) tag: Option<String>,
        pub(crate) inner: Option<Inner>,
        pub(crate) items: Vec<Inner>,
    }
}

impl Arbitrary for Inner {
    fn arbitrary(g: &mut Gen) -> Self {
        Self {
            id: i64::arbitrary(g),
            label: Option::arbitrary(g),
        }
    }
}

impl Arbitrary for Sample {
    fn arbitrary(g: &mut Gen) -> Self {
        Self {
            name: String::arbitrary(g),
            n: i32::arbitrary(g),
            flags: Vec::arbitrary(g),
            ratio: exact_float(g),
            small: u8::arbitrary(g),
            tag: Option::arbitrary(g),
            inner: Option::arbitrary(g),
            items: {
                let len = usize::arbitrary(g) % 4;
                (0..len).map(|_| Inner::arbitrary(g)).collect()
            },
        }
    }
}
