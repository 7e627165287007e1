//! The recursive `Value -> plain JSON AST -> text` transformer (§4.3).

use std::io;

use serde::Serialize;
use serde_json::ser::Formatter;
use serde_json::{Map as JsonMap, Number, Value as Json};

use crate::error::EncodeError;
use crate::graph::{Node, Path, Relationship};
use crate::point::Point;
use crate::sigil::{self, SAFE_INT_HI, SAFE_INT_LO};
use crate::value::{EncodeOptions, Map, Value};

/// A `serde_json` formatter that writes `, ` and `: ` separators, matching
/// the canonical Jolt text the rest of this crate's doc comments and the
/// literal test scenarios are written against (the compact `serde_json`
/// default omits the spaces).
#[derive(Clone, Copy, Debug, Default)]
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b": ")
    }
}

/// Render `value` as Jolt-encoded JSON text.
#[tracing::instrument(level = "debug", skip(value))]
pub fn encode(value: &Value, options: &EncodeOptions) -> Result<String, EncodeError> {
    let json = encode_value(value, options)?;
    let mut buf = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, SpacedFormatter);
    json.serialize(&mut serializer)?;
    Ok(String::from_utf8(buf).expect("serde_json only emits valid UTF-8"))
}

fn sigil_object(sigil: &str, payload: Json) -> Json {
    let mut obj = JsonMap::new();
    obj.insert(sigil.to_string(), payload);
    Json::Object(obj)
}

fn encode_value(value: &Value, options: &EncodeOptions) -> Result<Json, EncodeError> {
    match value {
        Value::Null => Ok(Json::Null),
        Value::Bool(b) => Ok(Json::Bool(*b)),
        Value::Int(n) => Ok(encode_int(*n, options)),
        Value::Float(f) => Ok(encode_float(f.into_inner(), options)),
        Value::Bytes(bytes) => Ok(sigil_object(sigil::SIGIL_BYTES, Json::String(hex_encode(bytes)))),
        Value::String(s) => Ok(Json::String(s.clone())),
        Value::List(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(encode_value(item, options)?);
            }
            Ok(Json::Array(out))
        }
        Value::Map(map) => encode_map_value(map, options),
        Value::Point(p) => Ok(encode_point(p)),
        Value::Temporal(t) => Ok(sigil_object(sigil::SIGIL_TEMPORAL, Json::String(t.to_string()))),
        Value::Node(n) => Ok(sigil_object(sigil::SIGIL_GRAPH, encode_node_entry(n, options)?)),
        Value::Relationship(r) => {
            Ok(sigil_object(sigil::SIGIL_GRAPH, encode_relationship_entry(r, options)?))
        }
        Value::Path(p) => Ok(sigil_object(sigil::SIGIL_GRAPH, encode_path(p, options)?)),
    }
}

fn encode_int(n: i64, options: &EncodeOptions) -> Json {
    if !options.always_safe && sigil::is_safe_int(n) {
        Json::Number(Number::from(n))
    } else {
        sigil_object(sigil::SIGIL_BIG_INT, Json::String(n.to_string()))
    }
}

/// Render a finite float exactly as a bare JSON number would print, for
/// reuse inside the `R` sigil's string payload. Delegates to serde_json (and
/// transitively `ryu`) so the `R`-wrapped and bare textual forms never
/// diverge.
fn canonical_float_text(x: f64) -> String {
    serde_json::to_string(&Number::from_f64(x).expect("x is finite"))
        .expect("serializing a JSON number cannot fail")
}

fn encode_float(x: f64, options: &EncodeOptions) -> Json {
    if x.is_nan() {
        return sigil_object(sigil::SIGIL_FLOAT, Json::String("NaN".to_string()));
    }
    if x.is_infinite() {
        let text = if x > 0.0 { "Infinity" } else { "-Infinity" };
        return sigil_object(sigil::SIGIL_FLOAT, Json::String(text.to_string()));
    }

    let whole_and_safe =
        x.fract() == 0.0 && x >= SAFE_INT_LO as f64 && x <= SAFE_INT_HI as f64;

    if options.always_safe || whole_and_safe {
        sigil_object(sigil::SIGIL_FLOAT, Json::String(canonical_float_text(x)))
    } else {
        Json::Number(Number::from_f64(x).expect("x is finite"))
    }
}

fn hex_encode(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        out.push_str(&format!("{b:02X}"));
    }
    out
}

/// Encode a Map in a "value position" — subject to the singleton-wrapping
/// and `always_safe` rules of §4.2.
fn encode_map_value(map: &Map, options: &EncodeOptions) -> Result<Json, EncodeError> {
    let raw = encode_raw_map(map, options)?;
    if options.always_safe || map.len() == 1 {
        Ok(sigil_object(sigil::SIGIL_MAP, raw))
    } else {
        Ok(raw)
    }
}

/// Encode a Map as a plain JSON object, with no singleton-wrapping — used
/// for node/relationship property maps, which are always in a typed
/// position (§4.3.2, §9: "no `{}` wrapping inside `G` payload property
/// maps").
fn encode_raw_map(map: &Map, options: &EncodeOptions) -> Result<Json, EncodeError> {
    let mut entries: Vec<(&String, &Value)> = map.iter().collect();
    if options.sort_keys {
        entries.sort_by(|a, b| a.0.cmp(b.0));
    }
    let mut obj = JsonMap::new();
    for (k, v) in entries {
        obj.insert(k.clone(), encode_value(v, options)?);
    }
    Ok(Json::Object(obj))
}

fn encode_point(p: &Point) -> Json {
    let coords = p.coordinates.iter().map(|c| Json::from(*c)).collect();
    let mut point_obj = JsonMap::new();
    point_obj.insert("POINT".to_string(), Json::Array(coords));
    sigil_object(&format!("{}{}", sigil::SIGIL_POINT_PREFIX, p.srid), Json::Object(point_obj))
}

fn encode_node_entry(n: &Node, options: &EncodeOptions) -> Result<Json, EncodeError> {
    let labels = Json::Array(n.labels.iter().map(|l| Json::String(l.clone())).collect());
    let props = encode_raw_map(&n.properties, options)?;
    let mut table = JsonMap::new();
    table.insert(n.id.to_string(), Json::Array(vec![labels, props]));
    Ok(Json::Object(table))
}

fn encode_relationship_entry(r: &Relationship, options: &EncodeOptions) -> Result<Json, EncodeError> {
    let props = encode_raw_map(&r.properties, options)?;
    let mut table = JsonMap::new();
    table.insert(
        r.id.to_string(),
        Json::Array(vec![
            Json::String(r.rel_type.clone()),
            props,
            Json::String(r.start_id.to_string()),
            Json::String(r.end_id.to_string()),
        ]),
    );
    Ok(Json::Object(table))
}

fn encode_path(path: &Path, options: &EncodeOptions) -> Result<Json, EncodeError> {
    let mut nodes_table = JsonMap::new();
    let mut ids: Vec<_> = path.graph().nodes().collect();
    ids.sort_by(|a, b| a.1.id.cmp(&b.1.id));
    for (key, node) in ids {
        let labels = Json::Array(node.labels.iter().map(|l| Json::String(l.clone())).collect());
        let props = encode_raw_map(&node.properties, options)?;
        nodes_table.insert(key.to_string(), Json::Array(vec![labels, props]));
    }

    let mut rels_table = JsonMap::new();
    let mut rel_entries: Vec<_> = path.graph().relationships().collect();
    rel_entries.sort_by(|a, b| a.1.id.cmp(&b.1.id));
    for (key, rel) in rel_entries {
        let props = encode_raw_map(&rel.properties, options)?;
        rels_table.insert(
            key.to_string(),
            Json::Array(vec![
                Json::String(rel.rel_type.clone()),
                props,
                Json::String(rel.start_id.to_string()),
                Json::String(rel.end_id.to_string()),
            ]),
        );
    }

    let sequence = Json::Array(
        path.wire_sequence()
            .into_iter()
            .map(|id| Json::String(id.to_string()))
            .collect(),
    );

    Ok(Json::Array(vec![
        Json::Object(nodes_table),
        Json::Object(rels_table),
        sequence,
    ]))
}
