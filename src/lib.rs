//! A self-describing JSON-based wire encoding for property-graph values.
//!
//! Plain JSON cannot represent everything a property graph's value system
//! needs: 64-bit integers beyond JSON's safe double-precision range, NaN
//! and infinities, byte strings, temporal and spatial types, and graph
//! elements (nodes, relationships, paths). This crate's [`encode`]/[`decode`]
//! pair tags exactly the values that would otherwise be ambiguous with a
//! single-entry JSON object keyed by a reserved "sigil" (`Z`, `R`, `T`, `#`,
//! `{}`, `G`, `@<srid>`), leaving everything else as plain JSON.

pub mod decode;
pub mod encode;
pub mod error;
pub mod graph;
pub mod point;
pub mod sigil;
pub mod temporal;
pub mod value;

#[cfg(any(test, feature = "proptest_strategies"))]
pub mod proptest_strategies;

pub use decode::{decode, decode_with_graph};
pub use encode::encode;
pub use error::{DecodeError, EncodeError};
pub use graph::{Graph, Node, Path, Relationship};
pub use point::Point;
pub use temporal::{Date, DateTime, Duration, Temporal, Time};
pub use value::{EncodeOptions, Map, Value};
