//! Cross-checks parsed trees against `serde_json` (with `preserve_order`).
#![allow(missing_docs)]

use jsonstack::{OrderedMap, Parser, Sequence, Value, parse};
use rstest::rstest;

fn from_serde(value: &serde_json::Value) -> Value {
    match value {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Boolean(*b),
        serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap()),
        serde_json::Value::String(s) => Value::from(s.as_str()),
        serde_json::Value::Array(items) => {
            let mut seq = Sequence::new();
            for item in items {
                seq.push(from_serde(item)).unwrap();
            }
            Value::Array(seq)
        }
        serde_json::Value::Object(members) => {
            let mut map = OrderedMap::new();
            for (key, item) in members {
                map.set(key, from_serde(item)).unwrap();
            }
            Value::Object(map)
        }
    }
}

#[rstest]
#[case("null")]
#[case("[]")]
#[case("{}")]
#[case("-12.5e-3")]
#[case(r#""plain""#)]
#[case(r#"["\"", "\\", "\/", "\b\f\n\r\t"]"#)]
#[case(r#"{"b": 1, "a": 2, "c": {"z": [true, false], "y": null}}"#)]
#[case(r#"{"dup": 1, "other": 2, "dup": 3}"#)]
#[case(r#"[[[[[[[[1]]]]]]], {"": {"": {"": 0}}}]"#)]
#[case("  [ 1 ,\n\t2 ,\r\n 3 ]  ")]
#[case(r#"{"unicode": "é中"}"#)]
fn agrees_with_serde_json(#[case] input: &str) {
    let oracle: serde_json::Value = serde_json::from_str(input).unwrap();
    let expected = from_serde(&oracle);

    assert_eq!(parse(input).unwrap(), expected);

    let mut parser = Parser::default();
    for byte in input.as_bytes() {
        parser.feed([*byte]).unwrap();
    }
    parser.finish().unwrap();
    assert_eq!(parser.take_result().unwrap(), expected);
}

#[rstest]
#[case("[1,]")]
#[case(r#"{"a":1,}"#)]
#[case("[1 2]")]
#[case("01")]
#[case("1.")]
#[case(".5")]
#[case(r#"{"a"}"#)]
#[case("{1:2}")]
#[case("[")]
#[case(r#""open"#)]
#[case("tru")]
#[case("[] []")]
fn rejects_what_serde_json_rejects(#[case] input: &str) {
    assert!(serde_json::from_str::<serde_json::Value>(input).is_err());
    assert!(parse(input).is_err());
}

#[test]
fn serialized_output_is_read_by_serde_json() {
    let value = parse(r#"{"k": ["a/b", 1.5, 1e21, {"n": null}], "t": "\t"}"#).unwrap();
    let text = value.to_string();
    let oracle: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(from_serde(&oracle), value);
}
