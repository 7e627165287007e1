//! The recursive `plain JSON AST -> Value` transformer (§4.4): parse once
//! with `serde_json`, then rewrite the resulting AST bottom-up, recognizing
//! one-entry objects whose key is a known sigil.

use serde_json::{Number, Value as Json};

use crate::error::DecodeError;
use crate::graph::{Graph, Node, Path, Relationship};
use crate::point::Point;
use crate::sigil;
use crate::temporal;
use crate::value::{Map, Value};

/// Parse `text` and decode it into a [`Value`], discarding any per-parse
/// [`Graph`] accumulated along the way.
#[tracing::instrument(level = "debug", skip(text))]
pub fn decode(text: &str) -> Result<Value, DecodeError> {
    decode_with_graph(text).map(|(value, _graph)| value)
}

/// Parse `text` and decode it into a [`Value`], additionally returning the
/// per-parse [`Graph`] if any `G` sigil was observed (§4.4.3). `None` when
/// the document contained no graph elements.
#[tracing::instrument(level = "debug", skip(text))]
pub fn decode_with_graph(text: &str) -> Result<(Value, Option<Graph>), DecodeError> {
    let json: Json = serde_json::from_str(text)?;
    let mut graph = Graph::new();
    let value = decode_node(json, &mut graph)?;
    let graph = if graph.is_empty() { None } else { Some(graph) };
    Ok((value, graph))
}

fn decode_node(json: Json, graph: &mut Graph) -> Result<Value, DecodeError> {
    match json {
        Json::Null => Ok(Value::Null),
        Json::Bool(b) => Ok(Value::Bool(b)),
        Json::Number(n) => decode_number(&n),
        Json::String(s) => Ok(Value::String(s)),
        Json::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(decode_node(item, graph)?);
            }
            Ok(Value::List(out))
        }
        Json::Object(obj) => {
            if obj.len() == 1 {
                let (key, raw) = obj.into_iter().next().expect("len == 1");
                decode_sigil(&key, raw, graph)
            } else {
                let mut map = Map::new();
                for (k, v) in obj {
                    map.insert(k, decode_node(v, graph)?);
                }
                Ok(Value::Map(map))
            }
        }
    }
}

/// Classify by the literal's own text, not by what fits in a host type:
/// a JSON number decodes as Int exactly when it was written with no `.`,
/// `e`, or `E` (§4.4). `arbitrary_precision` keeps that exact text around
/// instead of collapsing an out-of-range integer literal into a lossy
/// `f64` the way the default `serde_json::Number` representation would.
fn decode_number(n: &Number) -> Result<Value, DecodeError> {
    let text = n.as_str();
    if text.contains(['.', 'e', 'E']) {
        let f = n
            .as_f64()
            .ok_or_else(|| DecodeError::malformed_payload("<number>", "not representable as f64", &Json::Number(n.clone())))?;
        Ok(Value::Float(f.into()))
    } else {
        let parsed: i64 = text
            .parse()
            .map_err(|_| DecodeError::IntegerOverflow { literal: text.to_string() })?;
        Ok(Value::Int(parsed))
    }
}

fn decode_sigil(key: &str, raw: Json, graph: &mut Graph) -> Result<Value, DecodeError> {
    match key {
        sigil::SIGIL_BIG_INT => decode_big_int(raw),
        sigil::SIGIL_FLOAT => decode_wrapped_float(raw),
        sigil::SIGIL_TEMPORAL => decode_temporal(raw),
        sigil::SIGIL_BYTES => decode_bytes(raw),
        sigil::SIGIL_MAP => decode_wrapped_map(raw, graph),
        sigil::SIGIL_GRAPH => decode_graph(raw, graph),
        _ if key.starts_with(sigil::SIGIL_POINT_PREFIX) => match sigil::parse_point_sigil(key) {
            Some(srid) => decode_point(srid, raw),
            None => {
                tracing::trace!(sigil = key, "rejecting malformed point sigil");
                Err(DecodeError::unrecognized_sigil(key))
            }
        },
        _ if sigil::RESERVED_SIGILS.contains(&key) => {
            tracing::trace!(sigil = key, "rejecting reserved sigil");
            Err(DecodeError::unrecognized_sigil(key))
        }
        _ => {
            // Not a recognized sigil shape: a genuine one-entry Map.
            let mut map = Map::new();
            map.insert(key.to_string(), decode_node(raw, graph)?);
            Ok(Value::Map(map))
        }
    }
}

fn decode_big_int(raw: Json) -> Result<Value, DecodeError> {
    let Json::String(text) = &raw else {
        return Err(DecodeError::malformed_payload(
            sigil::SIGIL_BIG_INT,
            "expected a decimal integer string",
            &raw,
        ));
    };
    let n: i64 = text.parse().map_err(|_| {
        DecodeError::malformed_payload(sigil::SIGIL_BIG_INT, "not a valid i64 decimal literal", &raw)
    })?;
    tracing::trace!(value = n, "decoded Z-wrapped integer");
    Ok(Value::Int(n))
}

fn decode_wrapped_float(raw: Json) -> Result<Value, DecodeError> {
    let Json::String(text) = &raw else {
        return Err(DecodeError::malformed_payload(
            sigil::SIGIL_FLOAT,
            "expected a string payload",
            &raw,
        ));
    };
    let f = match text.as_str() {
        "NaN" => f64::NAN,
        "Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        other => other.parse::<f64>().map_err(|_| {
            DecodeError::malformed_payload(sigil::SIGIL_FLOAT, "not a valid decimal float literal", &raw)
        })?,
    };
    Ok(Value::Float(f.into()))
}

fn decode_temporal(raw: Json) -> Result<Value, DecodeError> {
    let Json::String(text) = &raw else {
        return Err(DecodeError::malformed_payload(
            sigil::SIGIL_TEMPORAL,
            "expected a string payload",
            &raw,
        ));
    };
    let temporal = temporal::parse_temporal(text)?;
    Ok(Value::Temporal(temporal))
}

fn decode_bytes(raw: Json) -> Result<Value, DecodeError> {
    let Json::String(text) = &raw else {
        return Err(DecodeError::malformed_payload(sigil::SIGIL_BYTES, "expected a string payload", &raw));
    };
    if text.len() % 2 != 0 {
        return Err(DecodeError::malformed_payload(
            sigil::SIGIL_BYTES,
            "hex payload must have an even number of digits",
            &raw,
        ));
    }
    let mut bytes = Vec::with_capacity(text.len() / 2);
    let chars: Vec<char> = text.chars().collect();
    for pair in chars.chunks(2) {
        let byte_str: String = pair.iter().collect();
        let byte = u8::from_str_radix(&byte_str, 16).map_err(|_| {
            DecodeError::malformed_payload(sigil::SIGIL_BYTES, "non-hex digit in payload", &raw)
        })?;
        bytes.push(byte);
    }
    Ok(Value::Bytes(bytes))
}

fn decode_wrapped_map(raw: Json, graph: &mut Graph) -> Result<Value, DecodeError> {
    let Json::Object(obj) = raw else {
        return Err(DecodeError::malformed_payload(sigil::SIGIL_MAP, "expected an object payload", &Json::Null));
    };
    let mut map = Map::new();
    for (k, v) in obj {
        map.insert(k, decode_node(v, graph)?);
    }
    Ok(Value::Map(map))
}

fn decode_point(srid: i64, raw: Json) -> Result<Value, DecodeError> {
    let Json::Object(obj) = &raw else {
        return Err(DecodeError::malformed_payload("@<srid>", "expected a {\"POINT\": [...]} object", &raw));
    };
    if obj.len() != 1 {
        return Err(DecodeError::malformed_payload("@<srid>", "expected exactly one POINT entry", &raw));
    }
    let coords_json = obj
        .get("POINT")
        .ok_or_else(|| DecodeError::malformed_payload("@<srid>", "missing POINT key", &raw))?;
    let Json::Array(items) = coords_json else {
        return Err(DecodeError::malformed_payload("@<srid>", "POINT value must be an array", &raw));
    };
    let mut coordinates = Vec::with_capacity(items.len());
    for item in items {
        let n = item
            .as_f64()
            .ok_or_else(|| DecodeError::malformed_payload("@<srid>", "POINT coordinates must be numeric", &raw))?;
        coordinates.push(n);
    }
    let point = Point::new(srid, coordinates)
        .ok_or_else(|| DecodeError::malformed_payload("@<srid>", "POINT must have 2 or 3 coordinates", &raw))?;
    Ok(Value::Point(point))
}

fn decode_graph(raw: Json, graph: &mut Graph) -> Result<Value, DecodeError> {
    match raw {
        Json::Object(obj) => decode_graph_element(obj, graph),
        Json::Array(items) => decode_graph_path(items, graph),
        other => Err(DecodeError::malformed_payload(
            sigil::SIGIL_GRAPH,
            "expected an element table object or a [NODES, RELS, SEQ] array",
            &other,
        )),
    }
}

fn decode_graph_element(
    obj: serde_json::Map<String, Json>,
    graph: &mut Graph,
) -> Result<Value, DecodeError> {
    if obj.len() != 1 {
        return Err(DecodeError::malformed_payload(
            sigil::SIGIL_GRAPH,
            "a standalone element table must carry exactly one entry",
            &Json::Object(obj),
        ));
    }
    let (id_str, entry) = obj.into_iter().next().expect("len == 1");
    let id: i64 = id_str.parse().map_err(|_| {
        DecodeError::malformed_payload(sigil::SIGIL_GRAPH, "element id must be a decimal integer", &Json::String(id_str.clone()))
    })?;
    match entry {
        Json::Array(fields) if fields.len() == 2 => {
            let node = decode_node_fields(id, fields)?;
            graph.put_node(node.id, node.labels.clone(), node.properties.clone());
            Ok(Value::Node(node))
        }
        Json::Array(fields) if fields.len() == 4 => {
            let rel = decode_relationship_fields(id, fields)?;
            graph.put_relationship(rel.id, rel.start_id, rel.end_id, rel.rel_type.clone(), rel.properties.clone());
            Ok(Value::Relationship(rel))
        }
        other => Err(DecodeError::malformed_payload(
            sigil::SIGIL_GRAPH,
            "element entry must be [labels, properties] or [type, properties, start_id, end_id]",
            &other,
        )),
    }
}

/// Decode a `[labels, properties]` element entry. Validates arity itself so
/// every caller — the standalone-element route and the path `NODES` table —
/// gets a `MalformedSigilPayload` instead of a panic on a short array.
fn decode_node_fields(id: i64, mut fields: Vec<Json>) -> Result<Node, DecodeError> {
    if fields.len() != 2 {
        return Err(DecodeError::malformed_payload(
            sigil::SIGIL_GRAPH,
            "node entry must be [labels, properties]",
            &Json::Array(fields),
        ));
    }
    let properties_json = fields.pop().expect("checked len == 2");
    let labels_json = fields.pop().expect("checked len == 2");
    let labels = decode_labels(&labels_json)?;
    let properties = decode_property_map(properties_json)?;
    Ok(Node { id, labels, properties })
}

/// Decode a `[type, properties, start_id, end_id]` element entry. Validates
/// arity itself for the same reason as [`decode_node_fields`].
fn decode_relationship_fields(id: i64, mut fields: Vec<Json>) -> Result<Relationship, DecodeError> {
    if fields.len() != 4 {
        return Err(DecodeError::malformed_payload(
            sigil::SIGIL_GRAPH,
            "relationship entry must be [type, properties, start_id, end_id]",
            &Json::Array(fields),
        ));
    }
    let end_id_json = fields.pop().expect("checked len == 4");
    let start_id_json = fields.pop().expect("checked len == 4");
    let properties_json = fields.pop().expect("checked len == 4");
    let rel_type_json = fields.pop().expect("checked len == 4");

    let rel_type = match rel_type_json {
        Json::String(s) => s,
        other => {
            return Err(DecodeError::malformed_payload(
                sigil::SIGIL_GRAPH,
                "relationship type must be a string",
                &other,
            ))
        }
    };
    let properties = decode_property_map(properties_json)?;
    let start_id = decode_element_id(&start_id_json)?;
    let end_id = decode_element_id(&end_id_json)?;
    Ok(Relationship {
        id,
        rel_type,
        start_id,
        end_id,
        properties,
    })
}

fn decode_labels(json: &Json) -> Result<Vec<String>, DecodeError> {
    let Json::Array(items) = json else {
        return Err(DecodeError::malformed_payload(sigil::SIGIL_GRAPH, "labels must be an array of strings", json));
    };
    items
        .iter()
        .map(|item| match item {
            Json::String(s) => Ok(s.clone()),
            other => Err(DecodeError::malformed_payload(sigil::SIGIL_GRAPH, "label must be a string", other)),
        })
        .collect()
}

fn decode_property_map(json: Json) -> Result<Map, DecodeError> {
    let Json::Object(obj) = json else {
        return Err(DecodeError::malformed_payload(sigil::SIGIL_GRAPH, "properties must be an object", &Json::Null));
    };
    let mut map = Map::new();
    let mut scratch_graph = Graph::new();
    for (k, v) in obj {
        map.insert(k, decode_node(v, &mut scratch_graph)?);
    }
    Ok(map)
}

fn decode_element_id(json: &Json) -> Result<i64, DecodeError> {
    match json {
        Json::String(s) => s
            .parse()
            .map_err(|_| DecodeError::malformed_payload(sigil::SIGIL_GRAPH, "element id must be a decimal integer", json)),
        Json::Number(n) => n
            .as_i64()
            .ok_or_else(|| DecodeError::malformed_payload(sigil::SIGIL_GRAPH, "element id out of range", json)),
        other => Err(DecodeError::malformed_payload(sigil::SIGIL_GRAPH, "element id must be a string or integer", other)),
    }
}

fn decode_graph_path(items: Vec<Json>, graph: &mut Graph) -> Result<Value, DecodeError> {
    let [nodes_json, rels_json, seq_json]: [Json; 3] = items.try_into().map_err(|items: Vec<Json>| {
        DecodeError::malformed_payload(
            sigil::SIGIL_GRAPH,
            "path array must have exactly three entries [NODES, RELS, SEQ]",
            &Json::Array(items),
        )
    })?;

    let Json::Object(nodes_obj) = nodes_json else {
        return Err(DecodeError::malformed_payload(sigil::SIGIL_GRAPH, "NODES must be an object", &Json::Null));
    };
    let Json::Object(rels_obj) = rels_json else {
        return Err(DecodeError::malformed_payload(sigil::SIGIL_GRAPH, "RELS must be an object", &Json::Null));
    };
    let Json::Array(seq_items) = seq_json else {
        return Err(DecodeError::malformed_payload(sigil::SIGIL_GRAPH, "SEQ must be an array", &Json::Null));
    };

    let mut path_graph = Graph::new();
    for (id_str, entry) in nodes_obj {
        let id: i64 = id_str.parse().map_err(|_| {
            DecodeError::malformed_payload(sigil::SIGIL_GRAPH, "node id must be a decimal integer", &Json::String(id_str.clone()))
        })?;
        let Json::Array(fields) = entry else {
            return Err(DecodeError::malformed_payload(sigil::SIGIL_GRAPH, "NODES entry must be [labels, properties]", &Json::Null));
        };
        let node = decode_node_fields(id, fields)?;
        path_graph.put_node(node.id, node.labels, node.properties);
    }
    for (id_str, entry) in rels_obj {
        let id: i64 = id_str.parse().map_err(|_| {
            DecodeError::malformed_payload(sigil::SIGIL_GRAPH, "relationship id must be a decimal integer", &Json::String(id_str.clone()))
        })?;
        let Json::Array(fields) = entry else {
            return Err(DecodeError::malformed_payload(
                sigil::SIGIL_GRAPH,
                "RELS entry must be [type, properties, start_id, end_id]",
                &Json::Null,
            ));
        };
        let rel = decode_relationship_fields(id, fields)?;
        path_graph.put_relationship(rel.id, rel.start_id, rel.end_id, rel.rel_type, rel.properties);
    }

    let wire_sequence: Vec<String> = seq_items
        .into_iter()
        .map(|item| match item {
            Json::String(s) => Ok(s),
            other => decode_element_id(&other).map(|n| n.to_string()),
        })
        .collect::<Result<_, DecodeError>>()?;

    let path = Path::from_wire(path_graph.clone(), &wire_sequence)?;
    for (_, node) in path_graph.nodes() {
        graph.put_node(node.id, node.labels.clone(), node.properties.clone());
    }
    for (_, rel) in path_graph.relationships() {
        graph.put_relationship(rel.id, rel.start_id, rel.end_id, rel.rel_type.clone(), rel.properties.clone());
    }
    Ok(Value::Path(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_int_round_trips() {
        assert_eq!(decode("2147483647").unwrap(), Value::Int(2147483647));
        assert_eq!(decode("-2147483648").unwrap(), Value::Int(-2147483648));
    }

    #[test]
    fn big_int_sigil() {
        assert_eq!(decode(r#"{"Z": "2147483648"}"#).unwrap(), Value::Int(2147483648));
        assert_eq!(decode(r#"{"Z": "-2147483649"}"#).unwrap(), Value::Int(-2147483649));
    }

    #[test]
    fn malformed_big_int_is_rejected() {
        assert!(decode(r#"{"Z": "not-a-number"}"#).is_err());
    }

    #[test]
    fn float_forms() {
        assert_eq!(decode("1.5").unwrap(), Value::Float(1.5.into()));
        assert_eq!(decode(r#"{"R": "1.0"}"#).unwrap(), Value::Float(1.0.into()));
        assert!(matches!(decode(r#"{"R": "NaN"}"#).unwrap(), Value::Float(f) if f.into_inner().is_nan()));
        assert_eq!(decode(r#"{"R": "Infinity"}"#).unwrap(), Value::Float(f64::INFINITY.into()));
    }

    #[test]
    fn bytes_round_trip() {
        assert_eq!(
            decode(r#"{"#": "0F1011"}"#).unwrap(),
            Value::Bytes(vec![0x0F, 0x10, 0x11])
        );
        assert!(decode(r#"{"#": "0F1"}"#).is_err());
        assert!(decode(r#"{"#": "ZZ"}"#).is_err());
    }

    #[test]
    fn singleton_map_unwraps() {
        let mut expected = Map::new();
        expected.insert("one".to_string(), Value::Int(1));
        assert_eq!(decode(r#"{"{}": {"one": 1}}"#).unwrap(), Value::Map(expected));
    }

    #[test]
    fn reserved_sigils_are_rejected() {
        assert!(matches!(
            decode(r#"{"()": null}"#),
            Err(DecodeError::UnrecognizedSigil { .. })
        ));
        assert!(matches!(
            decode(r#"{"->": null}"#),
            Err(DecodeError::UnrecognizedSigil { .. })
        ));
    }

    #[test]
    fn malformed_point_sigil_is_rejected_not_left_as_map() {
        assert!(matches!(
            decode(r#"{"@abc": 1}"#),
            Err(DecodeError::UnrecognizedSigil { .. })
        ));
        assert!(matches!(
            decode(r#"{"@": 1}"#),
            Err(DecodeError::UnrecognizedSigil { .. })
        ));
    }

    #[test]
    fn point_round_trip() {
        let v = decode(r#"{"@4326": {"POINT": [1.0, 2.0]}}"#).unwrap();
        assert_eq!(v, Value::Point(Point::wgs84(1.0, 2.0)));
    }

    #[test]
    fn standalone_node() {
        let v = decode(r#"{"G": {"1": [["Person"], {"name": "Alice"}]}}"#).unwrap();
        let mut props = Map::new();
        props.insert("name".to_string(), "Alice".into());
        assert_eq!(
            v,
            Value::Node(Node {
                id: 1,
                labels: vec!["Person".to_string()],
                properties: props,
            })
        );
    }

    #[test]
    fn standalone_relationship() {
        let v = decode(r#"{"G": {"7": ["KNOWS", {"since": 1999}, "1", "2"]}}"#).unwrap();
        let mut props = Map::new();
        props.insert("since".to_string(), Value::Int(1999));
        assert_eq!(
            v,
            Value::Relationship(Relationship {
                id: 7,
                rel_type: "KNOWS".to_string(),
                start_id: 1,
                end_id: 2,
                properties: props,
            })
        );
    }

    #[test]
    fn path_with_graph_is_exposed() {
        let text = r#"{"G": [{"1": [["Person"], {}], "2": [["Person"], {}], "3": [["Person"], {}], "4": [["Person"], {}]}, {"7": ["KNOWS", {}, "1", "2"], "8": ["KNOWS", {}, "3", "2"], "9": ["KNOWS", {}, "3", "4"]}, ["1", "7", "8", "9"]]}"#;
        let (value, graph) = decode_with_graph(text).unwrap();
        let path = match value {
            Value::Path(p) => p,
            other => panic!("expected a Path, got {other:?}"),
        };
        let ids: Vec<i64> = path.nodes().into_iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        let rel_ids: Vec<i64> = path.relationships().into_iter().map(|r| r.id).collect();
        assert_eq!(rel_ids, vec![7, 8, 9]);
        assert!(graph.is_some());
        assert!(!graph.unwrap().is_empty());
    }

    #[test]
    fn malformed_path_element_arity_is_rejected_not_panicked() {
        assert!(decode(r#"{"G": [{"1": []}, {}, ["1"]]}"#).is_err());
        assert!(decode(r#"{"G": [{"1":[["P"],{}]}, {"7": ["KNOWS"]}, ["1","7"]]}"#).is_err());
    }

    #[test]
    fn plain_decode_discards_graph() {
        let text = r#"{"G": {"1": [["Person"], {}]}}"#;
        // decode() only returns the Value; exercised here to confirm it
        // doesn't surface the Graph at all.
        let value = decode(text).unwrap();
        assert!(matches!(value, Value::Node(_)));
    }

    #[test]
    fn integer_overflow_without_z_wrapping_is_rejected() {
        assert!(decode("99999999999999999999999999").is_err());
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(decode("{not json").is_err());
    }
}
