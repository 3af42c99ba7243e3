use super::error::GraphError;
use super::model::{Edge, Graph, Node};
use super::parse::{RawRecord, parse_records};

pub fn parse_graph(raw: &str) -> Result<Graph, GraphError> {
    build_graph(&parse_records(raw)?)
}

/// Converts adjacency records into a graph, one edge per (record, child) pair.
///
/// Children that name no record are kept; binding to bodies filters them later.
pub(super) fn build_graph(records: &[RawRecord]) -> Result<Graph, GraphError> {
    let mut nodes = Vec::with_capacity(records.len());
    let mut edges = Vec::new();

    for (index, record) in records.iter().enumerate() {
        let id = match record.id.as_deref() {
            Some(id) if !id.is_empty() => id,
            Some(_) => {
                return Err(GraphError::MalformedInput {
                    index,
                    reason: "id is empty",
                });
            }
            None => {
                return Err(GraphError::MalformedInput {
                    index,
                    reason: "missing id",
                });
            }
        };

        nodes.push(Node {
            id: id.to_owned(),
            label: id.to_owned(),
            metadata: record.metadata_label().map(str::to_owned),
        });

        edges.extend(record.children.iter().map(|child| Edge {
            source_id: id.to_owned(),
            target_id: child.clone(),
        }));
    }

    Ok(Graph { nodes, edges })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_node_chain() {
        let graph = parse_graph(r#"[{"id":"A","children":["B"]},{"id":"B","children":[]}]"#)
            .unwrap();

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.nodes[0].label, "A");
        assert_eq!(
            graph.edges[0],
            Edge {
                source_id: "A".to_owned(),
                target_id: "B".to_owned(),
            }
        );
    }

    #[test]
    fn keeps_order_duplicates_and_dangling_children() {
        let graph = parse_graph(
            r#"[
                {"id": "z", "children": ["y", "y", "ghost"]},
                {"id": "y", "children": ["x"]},
                {"id": "x"}
            ]"#,
        )
        .unwrap();

        let ids = graph
            .nodes
            .iter()
            .map(|node| node.id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(ids, ["z", "y", "x"]);

        let targets = graph
            .edges
            .iter()
            .map(|edge| edge.target_id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(targets, ["y", "y", "ghost", "x"]);
    }

    #[test]
    fn edge_count_matches_children_total() {
        let raw = r#"[
            {"id": "a", "children": ["b", "c"]},
            {"id": "b", "children": ["c"]},
            {"id": "c", "children": []},
            {"id": "d", "children": ["a", "b", "c", "missing"]}
        ]"#;
        let records = parse_records(raw).unwrap();
        let expected = records
            .iter()
            .map(|record| record.children.len())
            .sum::<usize>();

        let graph = build_graph(&records).unwrap();
        assert_eq!(graph.edge_count(), expected);
        assert_eq!(graph.node_count(), records.len());
    }

    #[test]
    fn missing_id_is_malformed() {
        let error = parse_graph(r#"[{"id":"a"},{"children":["a"]}]"#).unwrap_err();
        assert!(matches!(
            error,
            GraphError::MalformedInput { index: 1, .. }
        ));
    }

    #[test]
    fn empty_id_is_malformed() {
        let error = parse_graph(r#"[{"id":""}]"#).unwrap_err();
        assert!(matches!(
            error,
            GraphError::MalformedInput { index: 0, .. }
        ));
    }
}
