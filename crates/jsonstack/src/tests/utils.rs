use crate::{Parser, ParserError, ParserOptions, Value};

/// Number of quickcheck iterations for property tests.
pub(crate) fn quickcheck_tests() -> u64 {
    if cfg!(feature = "test-fast") || cfg!(miri) {
        10
    } else if is_ci::cached() {
        10_000
    } else {
        1_000
    }
}

/// Feeds `chunks` in order, then signals end of input.
pub(crate) fn parse_chunks<'a>(
    options: ParserOptions,
    chunks: impl IntoIterator<Item = &'a [u8]>,
) -> Result<Value, ParserError> {
    let mut parser = Parser::new(options);
    for chunk in chunks {
        parser.feed(chunk)?;
    }
    parser.finish()?;
    Ok(parser
        .take_result()
        .expect("finish succeeded, so a result is available"))
}

/// Feeds `input` one byte per call.
pub(crate) fn parse_bytewise(input: &[u8]) -> Result<Value, ParserError> {
    parse_chunks(ParserOptions::default(), input.chunks(1))
}
