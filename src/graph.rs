//! The property-graph element store (`Graph`) and the `Node`/`Relationship`/
//! `Path` records built on top of it.
//!
//! A `Graph` owns its elements by stringified id. A `Path` never duplicates
//! a Node's or Relationship's data: it keeps its own scoped `Graph` (exactly
//! the element table a `G`-encoded path carries on the wire) plus the
//! traversal sequence, and resolves nodes/relationships from that table by
//! id on demand.

use indexmap::IndexMap;

use crate::error::DecodeError;
use crate::value::Map;

/// A property-graph node: an id, a set of labels, and a property map.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    pub id: i64,
    pub labels: Vec<String>,
    pub properties: Map,
}

/// A property-graph relationship connecting two nodes by id.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Relationship {
    pub id: i64,
    pub rel_type: String,
    pub start_id: i64,
    pub end_id: i64,
    pub properties: Map,
}

/// The element store for one encode/decode pass (or one standalone Path).
///
/// Entries received twice under the same id are required by the spec to
/// agree on all fields; the second `put_*` call is always a no-op (whether
/// or not the fields actually agree) since the store makes no attempt to
/// detect disagreement — that would be schema validation, which is out of
/// scope for this codec.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Graph {
    nodes: IndexMap<String, Node>,
    relationships: IndexMap<String, Relationship>,
}

impl Graph {
    pub fn new() -> Self {
        Graph::default()
    }

    pub fn put_node(&mut self, id: i64, labels: Vec<String>, properties: Map) -> Node {
        let key = id.to_string();
        if let Some(existing) = self.nodes.get(&key) {
            return existing.clone();
        }
        let node = Node {
            id,
            labels,
            properties,
        };
        self.nodes.insert(key, node.clone());
        node
    }

    pub fn put_relationship(
        &mut self,
        id: i64,
        start_id: i64,
        end_id: i64,
        rel_type: impl Into<String>,
        properties: Map,
    ) -> Relationship {
        let key = id.to_string();
        if let Some(existing) = self.relationships.get(&key) {
            return existing.clone();
        }
        let rel = Relationship {
            id,
            rel_type: rel_type.into(),
            start_id,
            end_id,
            properties,
        };
        self.relationships.insert(key, rel.clone());
        rel
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn relationship(&self, id: &str) -> Option<&Relationship> {
        self.relationships.get(id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.nodes.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn relationships(&self) -> impl Iterator<Item = (&str, &Relationship)> {
        self.relationships.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.relationships.is_empty()
    }

    fn merge_node(&mut self, id: String, node: Node) {
        self.nodes.entry(id).or_insert(node);
    }

    fn merge_relationship(&mut self, id: String, rel: Relationship) {
        self.relationships.entry(id).or_insert(rel);
    }
}

/// A non-empty alternating walk: a starting node, then one or more
/// relationships, each connecting the previous node position to the next
/// (which may be either endpoint of the relationship — traversal direction
/// may oppose the relationship's own direction).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path {
    graph: Graph,
    /// Alternating element ids: node, relationship, node, ..., node.
    /// Always has odd length >= 1.
    sequence: Vec<String>,
}

impl Path {
    /// Build a Path from a starting node and a sequence of
    /// (relationship, next node) steps, deriving its own scoped element
    /// table (no data is duplicated beyond this table).
    pub fn new(start: Node, steps: Vec<(Relationship, Node)>) -> Self {
        let mut graph = Graph::new();
        let mut sequence = Vec::with_capacity(steps.len() * 2 + 1);

        let start_id = start.id.to_string();
        graph.merge_node(start_id.clone(), start);
        sequence.push(start_id);

        for (rel, node) in steps {
            let rel_id = rel.id.to_string();
            let node_id = node.id.to_string();
            graph.merge_relationship(rel_id.clone(), rel);
            graph.merge_node(node_id.clone(), node);
            sequence.push(rel_id);
            sequence.push(node_id);
        }

        Path { graph, sequence }
    }

    /// Construct a Path directly from a scoped element table and the
    /// fully-expanded (node, rel, node, rel, ..., node) internal sequence.
    fn from_parts(graph: Graph, sequence: Vec<String>) -> Self {
        Path { graph, sequence }
    }

    /// Reconstruct a Path from the wire form: a scoped element table plus
    /// the traversal sequence `[start_node_id, rel_1_id, ..., rel_k_id]`
    /// (§4.3.2/§4.4.2 — intermediate node ids are not carried on the wire;
    /// they are derived by direction comparison against each relationship).
    pub(crate) fn from_wire(graph: Graph, wire_sequence: &[String]) -> Result<Self, DecodeError> {
        let mut iter = wire_sequence.iter();
        let start_id = iter
            .next()
            .ok_or_else(|| DecodeError::malformed_payload(
                "G",
                "path sequence must not be empty",
                &serde_json::Value::Array(vec![]),
            ))?
            .clone();
        if graph.node(&start_id).is_none() {
            return Err(DecodeError::GraphReferenceMissing { id: start_id });
        }

        let mut sequence = vec![start_id.clone()];
        let mut previous_node_id = start_id;

        for rel_id in iter {
            let rel = graph
                .relationship(rel_id)
                .ok_or_else(|| DecodeError::GraphReferenceMissing {
                    id: rel_id.clone(),
                })?;
            let next_node_id = if rel.start_id.to_string() == previous_node_id {
                rel.end_id.to_string()
            } else {
                rel.start_id.to_string()
            };
            if graph.node(&next_node_id).is_none() {
                return Err(DecodeError::GraphReferenceMissing { id: next_node_id });
            }
            sequence.push(rel_id.clone());
            sequence.push(next_node_id.clone());
            previous_node_id = next_node_id;
        }

        Ok(Path::from_parts(graph, sequence))
    }

    /// The wire form of the traversal sequence: `[start_node_id, rel ids...]`,
    /// omitting the intermediate node ids the decoder re-derives.
    pub fn wire_sequence(&self) -> Vec<&str> {
        let mut out = vec![self.sequence[0].as_str()];
        out.extend(self.sequence.iter().skip(1).step_by(2).map(String::as_str));
        out
    }

    #[cfg(test)]
    fn wire_sequence_owned(&self) -> Vec<String> {
        self.wire_sequence().into_iter().map(String::from).collect()
    }

    pub fn start(&self) -> &Node {
        self.graph
            .node(&self.sequence[0])
            .expect("path sequence always begins with a node present in its own graph")
    }

    pub fn end(&self) -> &Node {
        let last = self.sequence.last().expect("path sequence is non-empty");
        self.graph
            .node(last)
            .expect("path sequence always ends with a node present in its own graph")
    }

    pub fn relationship_count(&self) -> usize {
        self.sequence.len() / 2
    }

    /// The nodes visited, in traversal order (length = relationship_count + 1).
    pub fn nodes(&self) -> Vec<&Node> {
        self.sequence
            .iter()
            .step_by(2)
            .map(|id| {
                self.graph
                    .node(id)
                    .expect("path sequence ids are always present in its own graph")
            })
            .collect()
    }

    /// The relationships traversed, in traversal order.
    pub fn relationships(&self) -> Vec<&Relationship> {
        self.sequence
            .iter()
            .skip(1)
            .step_by(2)
            .map(|id| {
                self.graph
                    .relationship(id)
                    .expect("path sequence ids are always present in its own graph")
            })
            .collect()
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_props() -> Map {
        Map::new()
    }

    #[test]
    fn put_twice_is_a_no_op() {
        let mut g = Graph::new();
        let a = g.put_node(1, vec!["Person".into()], empty_props());
        let a2 = g.put_node(1, vec!["Other".into()], empty_props());
        assert_eq!(a, a2);
        assert_eq!(g.node("1").unwrap().labels, vec!["Person".to_string()]);
    }

    #[test]
    fn path_traversal_against_relationship_direction() {
        let mut g = Graph::new();
        let a = g.put_node(1, vec!["Person".into()], empty_props());
        let b = g.put_node(2, vec!["Person".into()], empty_props());
        let c = g.put_node(3, vec!["Person".into()], empty_props());
        let d = g.put_node(4, vec!["Person".into()], empty_props());
        let ab = g.put_relationship(7, 1, 2, "KNOWS", empty_props());
        let cb = g.put_relationship(8, 3, 2, "KNOWS", empty_props());
        let cd = g.put_relationship(9, 3, 4, "KNOWS", empty_props());

        // 1 -[7]-> 2 <-[8]- 3 -[9]-> 4
        let path = Path::new(a, vec![(ab, b), (cb, c), (cd, d)]);

        assert_eq!(path.relationship_count(), 3);
        let ids: Vec<i64> = path.nodes().into_iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        let rel_ids: Vec<i64> = path.relationships().into_iter().map(|r| r.id).collect();
        assert_eq!(rel_ids, vec![7, 8, 9]);

        assert_eq!(path.wire_sequence(), vec!["1", "7", "8", "9"]);

        let rebuilt = Path::from_wire(path.graph().clone(), &path.wire_sequence_owned()).unwrap();
        assert_eq!(rebuilt, path);
    }
}
