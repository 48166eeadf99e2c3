#![no_main]

use arbitrary::Arbitrary;
use jsonstack::{
    DuplicateKeys, MapOptions, NumberPrecision, Parser, ParserError, ParserOptions, SequenceOptions,
    chunk_utils::split_at_points, parse,
};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input<'a> {
    flags: u8,
    cuts: Vec<u16>,
    data: &'a [u8],
}

fn options(flags: u8) -> ParserOptions {
    ParserOptions {
        number_precision: if flags & 1 == 0 {
            NumberPrecision::Exact
        } else {
            NumberPrecision::Accumulate
        },
        sequence: SequenceOptions {
            initial_capacity: usize::from(flags >> 6) + 1,
        },
        map: MapOptions {
            duplicate_keys: if flags & 2 == 0 {
                DuplicateKeys::KeepPosition
            } else {
                DuplicateKeys::MoveToEnd
            },
            // 1, 2, 4 or 8 seed slots.
            initial_capacity: 1 << ((flags >> 2) & 3),
            load_factor: [0.5, 0.75, 0.9, 0.99][usize::from((flags >> 4) & 3)],
        },
    }
}

/// Parses `chunks` in order and renders the outcome: the serialized tree on
/// success, the error otherwise. Rendering sidesteps `NaN != NaN`.
fn outcome<'a>(
    options: ParserOptions,
    chunks: impl IntoIterator<Item = &'a [u8]>,
) -> Result<Vec<u8>, ParserError> {
    let mut parser = Parser::new(options);
    for chunk in chunks {
        parser.feed(chunk)?;
    }
    parser.finish()?;
    let value = parser.take_result().unwrap();
    Ok(value.to_json_vec().unwrap())
}

fn run(input: Input<'_>) {
    let options = options(input.flags);
    let whole = outcome(options, [input.data]);

    // Chunk boundaries never change the outcome, errors included.
    let cuts: Vec<usize> = input.cuts.iter().map(|&c| usize::from(c)).collect();
    let chunked = outcome(options, split_at_points(input.data, &cuts));
    assert_eq!(whole, chunked);

    // Whatever serde_json accepts, we accept. `\u` escapes are outside our grammar.
    if !input.data.windows(2).any(|w| w == b"\\u")
        && serde_json::from_slice::<serde_json::Value>(input.data).is_ok()
    {
        assert!(whole.is_ok(), "rejected {:?}", String::from_utf8_lossy(input.data));
    }

    // Serialized output is a fixed point.
    if let Ok(text) = whole {
        if options.number_precision == NumberPrecision::Exact {
            let again = parse(&text).unwrap();
            assert_eq!(again.to_json_vec().unwrap(), text);
        }
    }
}

fuzz_target!(|input: Input<'_>| run(input));
