#![allow(missing_docs)]
#![expect(clippy::needless_raw_string_hashes)]

use jsonstack::{Parser, Value, chunk_utils::produce_chunks, parse};

pub const ORIGINAL: &str = r#"
{
    "service": {
        "name": "edge-cache",
        "region": "eu-west",
        "replicas": 3,
        "weights": [0.25, 0.5, 0.25]
    },
    "listeners": [
        {
            "port": 8080,
            "tls": false,
            "paths": ["/", "/health"]
        },
        {
            "port": 8443,
            "tls": true,
            "paths": []
        }
    ],
    "limits": {
        "max_body": 1e6,
        "timeout_ms": -1,
        "note": "tab\there \"quoted\" and a \\ slash \/"
    },
    "owners": null,
    "nested": [[["deep"]], {"empty": {}}]
}"#;

// Chunks cut on transition seams: inside keys and strings, between a string
// and a separator, inside escapes and inside numbers.
#[rustfmt::skip]
pub const STREAM: [&str; 20] = [
    r#"{"service":{"na"#,                                  // inside a key
    r#"me":"edge-ca"#,                                     // inside a value string
    r#"che","region":"eu-west""#,                          // ends right after a string
    r#","replicas":3"#,                                    // number with no terminator yet
    r#","weights":[0.2"#,                                  // inside a fraction
    r#"5,0.5,0.25]},"#,                                    // array end -> object end -> separator
    r#""listeners":[{"port":80"#,                          // inside an integer
    r#"80,"tls":fal"#,                                     // inside a literal
    r#"se,"paths":["/","/health"]},{"#,                    // object end -> new object
    r#""port":8443,"tls":true,"paths":[]}]"#,              // empty array, then two closers
    r#","limits":{"max_body":1e"#,                         // inside an exponent
    r#"6,"timeout_ms":-"#,                                 // after a lone sign
    r#"1,"note":"tab\"#,                                   // inside an escape
    r#"there \"quoted\" and a \\"#,                        // escaped backslash at the seam
    r#" slash \/"},"owners":nu"#,                          // inside null
    r#"ll,"nested":[[["#,                                  // opening run
    r#""deep"]]"#,                                         // closing run
    r#",{"empty":{"#,                                      // open empty object
    r#"}}]"#,                                              // close three levels
    r#"}"#,                                                // top-level close
];

#[test]
fn stream_reassembles_the_original() {
    let streamed = STREAM.concat();
    let original: serde_json::Value = serde_json::from_str(ORIGINAL).unwrap();
    let reparsed: serde_json::Value = serde_json::from_str(&streamed).unwrap();
    assert_eq!(original, reparsed);
}

#[test]
fn chunked_stream_matches_one_shot_parse() {
    let mut parser = Parser::default();
    for chunk in STREAM {
        parser.feed(chunk).unwrap();
    }
    parser.finish().unwrap();
    let streamed = parser.take_result().unwrap();

    let whole = parse(ORIGINAL).unwrap();
    assert_eq!(streamed, whole);

    assert_eq!(whole["service"]["name"].as_str(), Some("edge-cache"));
    assert_eq!(whole["service"]["weights"][1].as_f64(), Some(0.5));
    assert_eq!(whole["listeners"][0]["port"].as_f64(), Some(8080.0));
    assert_eq!(whole["listeners"][1]["tls"].as_bool(), Some(true));
    assert_eq!(whole["limits"]["max_body"].as_f64(), Some(1e6));
    assert_eq!(whole["limits"]["timeout_ms"].as_f64(), Some(-1.0));
    assert_eq!(
        whole["limits"]["note"].as_str(),
        Some("tab\there \"quoted\" and a \\ slash /")
    );
    assert!(whole["owners"].is_null());
    assert_eq!(whole["nested"][0][0][0].as_str(), Some("deep"));
    assert!(whole["nested"][1]["empty"].as_object().unwrap().is_empty());
    assert!(whole["nested"][2].is_none());
}

#[test]
fn any_even_split_gives_the_same_tree() {
    let expected = parse(ORIGINAL).unwrap();
    for parts in 1..=ORIGINAL.len() {
        let mut parser = Parser::default();
        for chunk in produce_chunks(ORIGINAL.as_bytes(), parts) {
            parser.feed(chunk).unwrap();
        }
        parser.finish().unwrap();
        let value: Value = parser.take_result().unwrap();
        assert_eq!(value, expected, "parts = {parts}");
    }
}

#[test]
fn one_parser_handles_consecutive_documents() {
    let mut parser = Parser::default();
    for doc in [ORIGINAL, "[]", STREAM[0]] {
        parser.feed(doc).unwrap();
        if doc == STREAM[0] {
            let err = parser.finish().unwrap_err();
            assert!(err.is_unexpected_end_of_input());
            assert_eq!(err.offset(), STREAM[0].len());
        } else {
            parser.finish().unwrap();
            assert!(parser.take_result().is_some());
        }
    }
}
