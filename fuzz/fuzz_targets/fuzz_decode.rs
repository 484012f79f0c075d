#![no_main]

use arbitrary::Arbitrary;
use jsonshape::{
    DecoderOptions, MissingFieldPolicy, Record, UnknownFieldPolicy, Value,
    decode_value_with_options, from_slice_with_options, record,
};
use libfuzzer_sys::fuzz_target;

record! {
    #[derive(Debug, Default, PartialEq, serde::Deserialize)]
    #[serde(default)]
    struct Inner {
        id: i64,
        tags: Vec<String>,
    }
}

record! {
    #[derive(Debug, Default, PartialEq, serde::Deserialize)]
    #[serde(default)]
    struct Target {
        name: String,
        count: u32,
        ratio: f64,
        flag: Option<bool>,
        inner: Option<Inner>,
        list: Vec<Inner>,
    }
}

#[derive(Debug, Arbitrary)]
struct Input<'a> {
    strict: bool,
    require: bool,
    max_depth: u8,
    json: &'a [u8],
}

fuzz_target!(|input: Input<'_>| {
    let options = DecoderOptions {
        unknown_fields: input.strict.then_some(UnknownFieldPolicy::Reject),
        missing_fields: if input.require {
            MissingFieldPolicy::Reject
        } else {
            MissingFieldPolicy::Ignore
        },
        max_depth: usize::from(input.max_depth),
    };

    // Never panics, whatever the bytes.
    let typed = from_slice_with_options::<Target>(input.json, options);
    let _: Result<Value, _> = decode_value_with_options(Target::schema(), input.json, options);

    // Both decoders accepting lenient input must agree on the result.
    if !input.strict && !input.require && input.max_depth >= 16 {
        if let (Ok(ours), Ok(reference)) = (typed, serde_json::from_slice::<Target>(input.json)) {
            if ours.ratio.is_nan() || reference.ratio.is_nan() {
                return;
            }
            assert_eq!(ours, reference);
        }
    }
});
