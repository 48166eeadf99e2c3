//! An incremental JSON parser that assembles an insertion-ordered value tree
//! from input delivered in arbitrary byte chunks.
//!
//! ```
//! use jsonstack::Parser;
//!
//! let mut parser = Parser::default();
//! parser.feed(r#"{"name": "jso"#)?;
//! parser.feed(r#"nstack", "tags": [1, 2"#)?;
//! parser.feed("]}")?;
//! parser.finish()?;
//!
//! let doc = parser.take_result().unwrap();
//! assert_eq!(doc["name"].as_str(), Some("jsonstack"));
//! assert_eq!(doc["tags"][1].as_f64(), Some(2.0));
//! assert!(doc["missing"].is_none());
//! # Ok::<(), jsonstack::ParserError>(())
//! ```

#![no_std]
#![allow(missing_docs)]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod chain;
mod error;
mod map;
mod options;
mod parser;
mod sequence;
mod value;

pub mod ser;

#[cfg(any(test, feature = "serde"))]
mod serde_impls;

#[doc(hidden)]
pub mod chunk_utils;

#[cfg(test)]
mod tests;

pub use chain::Chain;
pub use error::{AllocError, ChainError, ErrorKind, ParserError};
pub use map::{Iter as MapIter, OrderedMap, hash_key};
pub use options::{DuplicateKeys, MapOptions, NumberPrecision, ParserOptions, SequenceOptions};
pub use parser::{Parser, parse};
pub use sequence::Sequence;
pub use value::{Value, ValueIndex};
