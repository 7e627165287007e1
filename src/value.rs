//! The `Value` sum: the in-memory shape every Jolt payload round-trips
//! through.

use indexmap::IndexMap;
use ordered_float::OrderedFloat;

use crate::graph::{Node, Path, Relationship};
use crate::point::Point;
use crate::temporal::Temporal;

/// An ordered string-keyed map. Insertion order is preserved by both the
/// encoder and the decoder; [`EncodeOptions::sort_keys`] is a presentation
/// concern applied only at encode time, never a mutation of the map itself.
pub type Map = IndexMap<String, Value>;

/// Every value representable on the Jolt wire.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    Null,
    Bool(bool),
    /// A mathematical integer in `[-2^63, 2^63 - 1]`.
    Int(i64),
    /// An IEEE-754 double, including non-finite values. Wrapped in
    /// [`OrderedFloat`] so that `Value` gets a total, NaN-safe equality
    /// (§3.3: a decoded NaN must compare equal to itself) without the
    /// round-trip invariant breaking on the usual IEEE `NaN != NaN` rule.
    Float(OrderedFloat<f64>),
    Bytes(Vec<u8>),
    String(String),
    List(Vec<Value>),
    Map(Map),
    Point(Point),
    Temporal(Temporal),
    Node(Node),
    Relationship(Relationship),
    Path(Path),
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f.into())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(l: Vec<Value>) -> Self {
        Value::List(l)
    }
}

impl From<Map> for Value {
    fn from(m: Map) -> Self {
        Value::Map(m)
    }
}

impl From<Point> for Value {
    fn from(p: Point) -> Self {
        Value::Point(p)
    }
}

impl From<Temporal> for Value {
    fn from(t: Temporal) -> Self {
        Value::Temporal(t)
    }
}

impl From<Node> for Value {
    fn from(n: Node) -> Self {
        Value::Node(n)
    }
}

impl From<Relationship> for Value {
    fn from(r: Relationship) -> Self {
        Value::Relationship(r)
    }
}

impl From<Path> for Value {
    fn from(p: Path) -> Self {
        Value::Path(p)
    }
}

/// Encoder configuration (§4.3, §6).
#[derive(Copy, Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EncodeOptions {
    /// Force every Int, Float, and Map to its sigil form regardless of
    /// whether a bare form would round-trip safely.
    pub always_safe: bool,
    /// Emit Map entries in ascending key order instead of insertion order.
    pub sort_keys: bool,
}

impl EncodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn always_safe(mut self, value: bool) -> Self {
        self.always_safe = value;
        self
    }

    pub fn sort_keys(mut self, value: bool) -> Self {
        self.sort_keys = value;
        self
    }
}
