use alloc::{string::String, vec::Vec};

use quickcheck::{Arbitrary, Gen};

use crate::{DuplicateKeys, NumberPrecision, OrderedMap, Sequence, Value};

#[derive(Debug, Copy, Clone, PartialEq)]
pub(crate) struct JsonNumber(pub(crate) f64);

impl Arbitrary for JsonNumber {
    fn arbitrary(g: &mut Gen) -> Self {
        let mut value = f64::arbitrary(g);
        while !value.is_finite() {
            value = f64::arbitrary(g);
        }
        Self(value)
    }
}

/// String content biased towards bytes the serializer must escape.
fn arbitrary_bytes(g: &mut Gen) -> Vec<u8> {
    match usize::arbitrary(g) % 3 {
        0 => String::arbitrary(g).into_bytes(),
        1 => {
            let len = usize::arbitrary(g) % 8;
            (0..len)
                .map(|_| *g.choose(b"\"\\/\x08\x0C\n\r\tax\xC3\xA9").unwrap_or(&b'a'))
                .collect()
        }
        _ => Vec::<u8>::arbitrary(g),
    }
}

impl Arbitrary for Value {
    fn arbitrary(g: &mut Gen) -> Self {
        fn gen_val(g: &mut Gen, depth: usize) -> Value {
            let choices = if depth == 0 { 4 } else { 6 };
            match usize::arbitrary(g) % choices {
                0 => Value::Null,
                1 => Value::Boolean(bool::arbitrary(g)),
                2 => Value::Number(JsonNumber::arbitrary(g).0),
                3 => Value::from(arbitrary_bytes(g)),
                4 => {
                    let len = usize::arbitrary(g) % 4;
                    let mut seq = Sequence::new();
                    for _ in 0..len {
                        seq.push(gen_val(g, depth - 1)).unwrap();
                    }
                    Value::Array(seq)
                }
                _ => {
                    let len = usize::arbitrary(g) % 4;
                    let mut map = OrderedMap::new();
                    for _ in 0..len {
                        let key = arbitrary_bytes(g);
                        map.set(&key, gen_val(g, depth - 1)).unwrap();
                    }
                    Value::Object(map)
                }
            }
        }

        let depth = usize::arbitrary(g) % 4;
        gen_val(g, depth)
    }
}

impl Arbitrary for NumberPrecision {
    fn arbitrary(g: &mut Gen) -> Self {
        if bool::arbitrary(g) {
            NumberPrecision::Exact
        } else {
            NumberPrecision::Accumulate
        }
    }
}

impl Arbitrary for DuplicateKeys {
    fn arbitrary(g: &mut Gen) -> Self {
        if bool::arbitrary(g) {
            DuplicateKeys::KeepPosition
        } else {
            DuplicateKeys::MoveToEnd
        }
    }
}
