/// Metadata value that marks a node as the semantic root of the graph.
pub const ROOT_MARKER: &str = "root";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    pub id: String,
    pub label: String,
    pub metadata: Option<String>,
}

impl Node {
    pub fn is_semantic_root(&self) -> bool {
        self.metadata.as_deref() == Some(ROOT_MARKER)
    }

    /// Text shown when the node is hovered.
    pub fn hover_text(&self) -> &str {
        self.metadata.as_deref().unwrap_or(&self.label)
    }
}

/// Directed edge from a dependent (`source_id`) to its dependency (`target_id`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Edge {
    pub source_id: String,
    pub target_id: String,
}

#[derive(Clone, Debug, Default)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum RootPolicy {
    /// The first node in input order is the root.
    FirstNode,
    /// The node whose metadata equals `root` is the root.
    #[default]
    Metadata,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeRole {
    /// Pinned below the view center to keep the layout steady.
    Anchor,
    Root,
    Ordinary,
}

impl Graph {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn root_index(&self, policy: RootPolicy) -> Option<usize> {
        match policy {
            RootPolicy::FirstNode => (!self.nodes.is_empty()).then_some(0),
            RootPolicy::Metadata => self.nodes.iter().position(Node::is_semantic_root),
        }
    }

    /// Role of every node, in node order. The root wins over the anchor when both
    /// land on the same node.
    pub fn roles(&self, policy: RootPolicy, anchor_first_node: bool) -> Vec<NodeRole> {
        let root_index = self.root_index(policy);
        (0..self.nodes.len())
            .map(|index| {
                if Some(index) == root_index {
                    NodeRole::Root
                } else if anchor_first_node && index == 0 {
                    NodeRole::Anchor
                } else {
                    NodeRole::Ordinary
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, metadata: Option<&str>) -> Node {
        Node {
            id: id.to_owned(),
            label: id.to_owned(),
            metadata: metadata.map(str::to_owned),
        }
    }

    fn sample() -> Graph {
        Graph {
            nodes: vec![
                node("out", Some("Linear.forward")),
                node("mid", Some("reshape")),
                node("in", Some(ROOT_MARKER)),
            ],
            edges: Vec::new(),
        }
    }

    #[test]
    fn metadata_policy_finds_marked_node() {
        let graph = sample();
        assert_eq!(graph.root_index(RootPolicy::Metadata), Some(2));
        assert_eq!(
            graph.roles(RootPolicy::Metadata, true),
            vec![NodeRole::Anchor, NodeRole::Ordinary, NodeRole::Root]
        );
    }

    #[test]
    fn first_node_policy_prefers_root_over_anchor() {
        let graph = sample();
        assert_eq!(
            graph.roles(RootPolicy::FirstNode, true),
            vec![NodeRole::Root, NodeRole::Ordinary, NodeRole::Ordinary]
        );
    }

    #[test]
    fn empty_graph_has_no_root() {
        let graph = Graph::default();
        assert_eq!(graph.root_index(RootPolicy::FirstNode), None);
        assert!(graph.roles(RootPolicy::Metadata, true).is_empty());
    }

    #[test]
    fn hover_text_falls_back_to_label() {
        assert_eq!(node("x", None).hover_text(), "x");
        assert_eq!(node("x", Some("bmm")).hover_text(), "bmm");
    }
}
