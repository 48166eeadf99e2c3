//! Feeds a document to the parser in small chunks, as if it were arriving
//! over a socket, then prints a few fields and the compact re-serialization.
//!
//! Run with `cargo run --example chunked_feed -- [chunk size]`.
#![allow(missing_docs)]

use jsonstack::{Parser, ParserError, ParserOptions, chunk_utils::produce_chunks};

const DOCUMENT: &str = r#"{
    "event": "deploy",
    "targets": ["eu-west", "us-east"],
    "attempt": 2,
    "duration_s": 41.75,
    "log": "step 1\nstep 2\n\"done\"",
    "rollback": null
}"#;

fn main() -> Result<(), ParserError> {
    let chunk_size: usize = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(5)
        .max(1);

    let mut parser = Parser::new(ParserOptions::default());
    let parts = DOCUMENT.len().div_ceil(chunk_size);
    for (i, chunk) in produce_chunks(DOCUMENT.as_bytes(), parts).into_iter().enumerate() {
        parser.feed(chunk)?;
        println!("chunk {i:>3}: {:?} (offset {})", String::from_utf8_lossy(chunk), parser.offset());
    }
    parser.finish()?;

    let Some(doc) = parser.take_result() else {
        unreachable!("finish succeeded");
    };
    println!();
    println!("event     = {}", doc["event"]);
    println!("targets   = {}", doc["targets"]);
    println!("attempt   = {}", doc["attempt"]);
    println!("log lines = {}", doc["log"].as_bytes().map_or(0, |b| b.split(|&c| c == b'\n').count()));
    println!("missing   = {:?}", doc["nope"]);
    println!();
    println!("{doc}");
    Ok(())
}
