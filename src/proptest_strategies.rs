//! `proptest::Strategy` implementations for generating arbitrary [`Value`]
//! trees (and the graph/temporal/spatial types it's built from), gated
//! behind the `proptest_strategies` feature — mirroring the ancestor
//! crate's own optional `proptest_strategies` feature and its free-function,
//! `prop_oneof!`-composed style.

use std::collections::HashSet;

use proptest::collection::vec;
use proptest::prelude::*;

use crate::graph::{Node, Path, Relationship};
use crate::point::Point;
use crate::temporal::{Date, DateTime, Duration, Temporal, Time};
use crate::value::{Map, Value};

pub fn date() -> impl Strategy<Value = Date> {
    (1i32..=9999, 1u8..=12, 1u8..=28).prop_map(|(year, month, day)| Date::new(year, month, day))
}

pub fn time() -> impl Strategy<Value = Time> {
    (
        0u8..24,
        0u8..60,
        0u8..60,
        0u32..1_000_000_000,
        proptest::option::of(-12 * 3600..=12 * 3600i32),
    )
        .prop_map(|(hour, minute, second, nanosecond, offset)| {
            let time = Time::new(hour, minute, second, nanosecond);
            match offset {
                Some(offset) => time.with_offset(offset),
                None => time,
            }
        })
}

pub fn date_time() -> impl Strategy<Value = DateTime> {
    (date(), time()).prop_map(|(date, time)| DateTime::new(date, time))
}

pub fn duration() -> impl Strategy<Value = Duration> {
    (
        any::<i32>().prop_map(i64::from),
        any::<i32>().prop_map(i64::from),
        any::<i32>().prop_map(i64::from),
        -999_999_999i32..=999_999_999,
    )
        .prop_map(|(months, days, seconds, nanoseconds)| Duration::new(months, days, seconds, nanoseconds))
}

pub fn temporal() -> impl Strategy<Value = Temporal> {
    prop_oneof![
        date().prop_map(Temporal::Date),
        time().prop_map(Temporal::Time),
        date_time().prop_map(Temporal::DateTime),
        duration().prop_map(Temporal::Duration),
    ]
}

pub fn point() -> impl Strategy<Value = Point> {
    (
        any::<i64>(),
        prop_oneof![vec(finite_f64(), 2), vec(finite_f64(), 3)],
    )
        .prop_map(|(srid, coordinates)| {
            Point::new(srid, coordinates).expect("generated with 2 or 3 coordinates")
        })
}

fn finite_f64() -> impl Strategy<Value = f64> {
    any::<f64>().prop_filter("coordinates must be finite", |f| f.is_finite())
}

fn label() -> impl Strategy<Value = String> {
    "[A-Z][a-zA-Z0-9_]{0,15}"
}

fn relationship_type() -> impl Strategy<Value = String> {
    "[A-Z][A-Z0-9_]{0,15}"
}

fn property_key() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,15}"
}

/// A leaf `Value`: every variant with no recursive structure. Used both
/// standalone and as the base case for [`value`]'s recursion.
pub fn leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map_into(),
        any::<i64>().prop_map_into(),
        any::<f64>().prop_map_into(),
        vec(any::<u8>(), 0..16).prop_map_into(),
        any::<String>().prop_map_into(),
        point().prop_map_into(),
        temporal().prop_map_into(),
    ]
}

/// A property map of leaf values — node/relationship properties never
/// recurse into further graph elements.
pub fn property_map() -> impl Strategy<Value = Map> {
    vec((property_key(), leaf()), 0..4).prop_map(|entries| {
        let mut map = Map::new();
        for (k, v) in entries {
            map.insert(k, v);
        }
        map
    })
}

pub fn node() -> impl Strategy<Value = Node> {
    (any::<i64>(), vec(label(), 0..3), property_map())
        .prop_map(|(id, labels, properties)| Node { id, labels, properties })
}

pub fn relationship() -> impl Strategy<Value = Relationship> {
    (any::<i64>(), relationship_type(), any::<i64>(), any::<i64>(), property_map()).prop_map(
        |(id, rel_type, start_id, end_id, properties)| Relationship {
            id,
            rel_type,
            start_id,
            end_id,
            properties,
        },
    )
}

/// A Path whose relationships actually connect their step's node ids (in
/// either direction), so that `decode(encode(path))` round-trips instead of
/// producing a differently-shaped walk through the same element table.
pub fn path() -> impl Strategy<Value = Path> {
    (1usize..5)
        .prop_flat_map(|steps| {
            let node_ids = vec(any::<i64>(), steps + 1)
                .prop_filter("node ids must be distinct", |ids| all_distinct(ids));
            let rel_ids =
                vec(any::<i64>(), steps).prop_filter("relationship ids must be distinct", |ids| all_distinct(ids));
            let directions = vec(any::<bool>(), steps);
            let node_labels = vec(vec(label(), 0..3), steps + 1);
            let node_props = vec(property_map(), steps + 1);
            let rel_types = vec(relationship_type(), steps);
            let rel_props = vec(property_map(), steps);
            (node_ids, rel_ids, directions, node_labels, node_props, rel_types, rel_props)
        })
        .prop_map(
            |(node_ids, rel_ids, directions, node_labels, node_props, rel_types, rel_props)| {
                let start = Node {
                    id: node_ids[0],
                    labels: node_labels[0].clone(),
                    properties: node_props[0].clone(),
                };
                let mut steps = Vec::with_capacity(rel_ids.len());
                for i in 0..rel_ids.len() {
                    let (prev_id, next_id) = (node_ids[i], node_ids[i + 1]);
                    let (start_id, end_id) = if directions[i] {
                        (prev_id, next_id)
                    } else {
                        (next_id, prev_id)
                    };
                    let rel = Relationship {
                        id: rel_ids[i],
                        rel_type: rel_types[i].clone(),
                        start_id,
                        end_id,
                        properties: rel_props[i].clone(),
                    };
                    let node = Node {
                        id: next_id,
                        labels: node_labels[i + 1].clone(),
                        properties: node_props[i + 1].clone(),
                    };
                    steps.push((rel, node));
                }
                Path::new(start, steps)
            },
        )
}

fn all_distinct(ids: &[i64]) -> bool {
    let unique: HashSet<&i64> = ids.iter().collect();
    unique.len() == ids.len()
}

/// Every `Value` variant, recursing into `List`/`Map` up to a bounded depth
/// and breadth so generated trees stay small and shrinkable.
pub fn value() -> impl Strategy<Value = Value> {
    leaf().prop_recursive(4, 64, 8, |inner| {
        prop_oneof![
            vec(inner.clone(), 0..8).prop_map_into(),
            vec((property_key(), inner), 0..8).prop_map(|entries| {
                let mut map = Map::new();
                for (k, v) in entries {
                    map.insert(k, v);
                }
                Value::Map(map)
            }),
            node().prop_map_into(),
            relationship().prop_map_into(),
            path().prop_map_into(),
        ]
    })
}
