//! Integration-level scenario tests: the literal encode/decode examples
//! and quantified round-trip properties.

use jolt_codec::graph::{Graph, Node, Path, Relationship};
use jolt_codec::point::Point;
use jolt_codec::temporal::{Date, DateTime, Duration, Temporal, Time};
use jolt_codec::value::Map;
use jolt_codec::{decode, decode_with_graph, encode, EncodeOptions, Value};

fn opts() -> EncodeOptions {
    EncodeOptions::default()
}

#[test]
fn int_boundary_scenarios() {
    assert_eq!(encode(&Value::Int(0x7FFFFFFF), &opts()).unwrap(), "2147483647");
    assert_eq!(encode(&Value::Int(0x80000000), &opts()).unwrap(), r#"{"Z": "2147483648"}"#);
    assert_eq!(encode(&Value::Int(-0x80000000), &opts()).unwrap(), "-2147483648");
    assert_eq!(encode(&Value::Int(-0x80000001), &opts()).unwrap(), r#"{"Z": "-2147483649"}"#);
}

#[test]
fn float_boundary_scenarios() {
    assert_eq!(encode(&1.0f64.into(), &opts()).unwrap(), r#"{"R": "1.0"}"#);
    assert_eq!(encode(&1.5f64.into(), &opts()).unwrap(), "1.5");
    assert_eq!(encode(&2147483648.0f64.into(), &opts()).unwrap(), "2147483648.0");
}

#[test]
fn every_int_round_trips_through_decode_encode() {
    for n in [0i64, 1, -1, 0x7FFFFFFF, 0x80000000, -0x80000000, -0x80000001, i64::MAX, i64::MIN] {
        let text = encode(&Value::Int(n), &opts()).unwrap();
        assert_eq!(decode(&text).unwrap(), Value::Int(n));
    }
}

#[test]
fn nan_round_trips_as_equal_to_itself() {
    let text = encode(&f64::NAN.into(), &opts()).unwrap();
    let decoded = decode(&text).unwrap();
    assert_eq!(decoded, Value::from(f64::NAN));
}

#[test]
fn singleton_map_begins_with_wrapper() {
    let mut m = Map::new();
    m.insert("solo".to_string(), Value::Int(1));
    let text = encode(&Value::Map(m), &opts()).unwrap();
    assert!(text.starts_with(r#"{"{}":"#));
}

#[test]
fn map_round_trips_preserving_insertion_order() {
    let mut m = Map::new();
    m.insert("z".to_string(), Value::Int(1));
    m.insert("a".to_string(), Value::Int(2));
    let text = encode(&Value::Map(m.clone()), &opts()).unwrap();
    let decoded = decode(&text).unwrap();
    assert_eq!(decoded, Value::Map(m));
}

#[test]
fn bytes_round_trip() {
    let v = Value::Bytes(vec![0x00, 0xFF, 0x0F, 0x10]);
    let text = encode(&v, &opts()).unwrap();
    assert_eq!(text, r#"{"#": "00FF0F10"}"#);
    assert_eq!(decode(&text).unwrap(), v);
}

#[test]
fn point_round_trip() {
    let p = Point::wgs84(12.5, -45.25);
    let text = encode(&Value::Point(p.clone()), &opts()).unwrap();
    assert_eq!(decode(&text).unwrap(), Value::Point(p));
}

#[test]
fn temporal_round_trip() {
    let date = Temporal::Date(Date::new(2016, 6, 23));
    let dt = Temporal::DateTime(DateTime::new(Date::new(2016, 6, 23), Time::new(12, 34, 56, 0).with_offset(-4 * 3600)));
    let dur = Temporal::Duration(Duration::new(14, 3, 4, 500_000_000));
    for t in [date, dt, dur] {
        let text = encode(&Value::Temporal(t.clone()), &opts()).unwrap();
        assert_eq!(decode(&text).unwrap(), Value::Temporal(t));
    }
}

#[test]
fn standalone_node_round_trip() {
    let mut g = Graph::new();
    let mut props = Map::new();
    props.insert("name".to_string(), "Alice".into());
    props.insert("age".to_string(), Value::Int(30));
    let node = g.put_node(1, vec!["Person".to_string()], props);

    let text = encode(&Value::Node(node.clone()), &opts()).unwrap();
    assert_eq!(decode(&text).unwrap(), Value::Node(node));
}

#[test]
fn relationship_round_trip() {
    let mut g = Graph::new();
    let mut props = Map::new();
    props.insert("since".to_string(), Value::Int(1999));
    let rel = g.put_relationship(7, 1, 2, "KNOWS", props);

    let text = encode(&Value::Relationship(rel.clone()), &opts()).unwrap();
    assert_eq!(decode(&text).unwrap(), Value::Relationship(rel));
}

/// The four-node, three-relationship path where traversal direction
/// opposes one relationship's own direction (§4.3.2/§8): nodes 1-2-3-4,
/// relationships 7 (1->2), 8 (3->2), 9 (3->4), walked 1 -[7]-> 2 <-[8]- 3
/// -[9]-> 4.
#[test]
fn path_with_opposing_direction_round_trips() {
    let mut g = Graph::new();
    let a = g.put_node(1, vec!["Person".into()], Map::new());
    let b = g.put_node(2, vec!["Person".into()], Map::new());
    let c = g.put_node(3, vec!["Person".into()], Map::new());
    let d = g.put_node(4, vec!["Person".into()], Map::new());
    let ab = g.put_relationship(7, 1, 2, "KNOWS", Map::new());
    let cb = g.put_relationship(8, 3, 2, "KNOWS", Map::new());
    let cd = g.put_relationship(9, 3, 4, "KNOWS", Map::new());
    let path = Path::new(a, vec![(ab, b), (cb, c), (cd, d)]);

    let text = encode(&Value::Path(path.clone()), &opts()).unwrap();
    assert!(text.contains(r#"["1", "7", "8", "9"]"#));

    let (decoded, graph) = decode_with_graph(&text).unwrap();
    let Value::Path(decoded_path) = decoded else {
        panic!("expected a decoded Path");
    };
    assert_eq!(decoded_path, path);

    let graph = graph.expect("a G payload must populate the per-parse graph");
    assert_eq!(graph.node("1").unwrap().id, 1);
    assert_eq!(graph.relationship("9").unwrap().end_id, 4);
}

#[test]
fn always_safe_forces_wrapping_everywhere() {
    let always_safe = EncodeOptions::default().always_safe(true);
    let mut m = Map::new();
    m.insert("one".to_string(), Value::Int(1));
    m.insert("two".to_string(), Value::Int(2));

    let text = encode(&Value::Map(m.clone()), &always_safe).unwrap();
    assert_eq!(text, r#"{"{}": {"one": 1, "two": 2}}"#);
    assert_eq!(decode(&text).unwrap(), Value::Map(m));
}

#[test]
fn reserved_sigils_are_never_guessed() {
    for sigil in ["()", "->", "--"] {
        let text = format!(r#"{{"{sigil}": null}}"#);
        assert!(decode(&text).is_err(), "{sigil} must be rejected, not decoded");
    }
}

#[test]
fn malformed_sigil_payloads_are_rejected() {
    assert!(decode(r#"{"#": "ZZ"}"#).is_err());
    assert!(decode(r#"{"T": "not-a-date"}"#).is_err());
    assert!(decode(r#"{"@4326": [1, 2]}"#).is_err());
    assert!(decode(r#"{"@abc": 1}"#).is_err());
    assert!(decode(r#"{"Z": "not-an-int"}"#).is_err());
}

#[cfg(feature = "proptest_strategies")]
mod property_tests {
    use super::*;
    use jolt_codec::proptest_strategies;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn value_round_trips_through_encode_decode(v in proptest_strategies::value()) {
            let text = encode(&v, &opts()).unwrap();
            let decoded = decode(&text).unwrap();
            prop_assert_eq!(decoded, v);
        }

        #[test]
        fn safe_ints_are_always_bare(n in -(1i64 << 31)..=((1i64 << 31) - 1)) {
            let text = encode(&Value::Int(n), &opts()).unwrap();
            prop_assert!(!text.starts_with('{'));
        }

        #[test]
        fn overflowing_ints_are_always_z_wrapped(n in any::<i64>().prop_filter("outside safe band", |n| {
            !(-(1i64 << 31)..=((1i64 << 31) - 1)).contains(n)
        })) {
            let text = encode(&Value::Int(n), &opts()).unwrap();
            prop_assert!(text.starts_with(r#"{"Z":"#));
        }
    }
}
