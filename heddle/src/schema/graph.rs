//! Graph schema builder and the compiled, immutable flow.
//!
//! Add nodes with `add_node`, transitions with `add_edge`, set the entry
//! node with `set_start`, then `compile()` to get a [`CompiledFlow`].
//!
//! # Edge precedence
//!
//! A node may have several outgoing edges. After each turn their predicates
//! are evaluated in the order the edges were added, and the first satisfied
//! edge wins; at most one transition happens per turn.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use super::compile_error::SchemaError;
use super::edge::EdgeSchema;
use super::node::NodeSchema;

/// Workflow schema under construction: nodes plus predicate-gated edges.
///
/// Build with `add_node` / `add_edge` / `set_start`, then `compile()` to
/// obtain an executable flow. Compilation validates edge endpoints,
/// reachability, and that every edge's captured types match the node
/// declarations.
pub struct GraphSchema {
    name: String,
    nodes: Vec<NodeSchema>,
    edges: Vec<EdgeSchema>,
    start: Option<String>,
}

impl GraphSchema {
    /// Creates an empty graph with a display name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nodes: Vec::new(),
            edges: Vec::new(),
            start: None,
        }
    }

    /// Adds a node. Ids must be unique; duplicates are rejected at `compile()`.
    pub fn add_node(&mut self, node: NodeSchema) -> &mut Self {
        self.nodes.push(node);
        self
    }

    /// Adds an edge. For a shared source node, declaration order is
    /// precedence: the first satisfied edge wins.
    pub fn add_edge(&mut self, edge: EdgeSchema) -> &mut Self {
        self.edges.push(edge);
        self
    }

    /// Sets the entry node.
    pub fn set_start(&mut self, id: impl Into<String>) -> &mut Self {
        self.start = Some(id.into());
        self
    }

    /// Builds the executable flow.
    ///
    /// Validates that node ids are unique, the start node exists, every edge
    /// endpoint is declared, every node is reachable from the start, and
    /// every edge's captured state/input types match the node declarations.
    pub fn compile(self) -> Result<CompiledFlow, SchemaError> {
        let mut nodes: HashMap<String, Arc<NodeSchema>> = HashMap::new();
        for node in self.nodes {
            let id = node.id().to_string();
            if nodes.insert(id.clone(), Arc::new(node)).is_some() {
                return Err(SchemaError::DuplicateNode(id));
            }
        }

        let start_id = match self.start {
            Some(id) => {
                if !nodes.contains_key(&id) {
                    return Err(SchemaError::StartNotFound(id));
                }
                id
            }
            None => return Err(SchemaError::MissingStart),
        };

        let mut outgoing: HashMap<String, Vec<Arc<EdgeSchema>>> = HashMap::new();
        for edge in self.edges {
            let from = nodes
                .get(edge.from())
                .ok_or_else(|| SchemaError::NodeNotFound(edge.from().to_string()))?;
            let to = nodes
                .get(edge.to())
                .ok_or_else(|| SchemaError::NodeNotFound(edge.to().to_string()))?;

            let declared_state = from.state().mark();
            if declared_state != edge.state_mark() {
                return Err(SchemaError::StateTypeMismatch {
                    edge: edge.label(),
                    expected: declared_state.name(),
                    found: edge.state_mark().name(),
                });
            }
            let declared_input = from.input_mark();
            if declared_input != edge.input_mark() {
                return Err(SchemaError::InputTypeMismatch {
                    edge: format!("{} (source input)", edge.label()),
                    expected: declared_input.name(),
                    found: edge.input_mark().name(),
                });
            }
            let declared_next = to.input_mark();
            if declared_next != edge.next_input_mark() {
                return Err(SchemaError::InputTypeMismatch {
                    edge: format!("{} (destination input)", edge.label()),
                    expected: declared_next.name(),
                    found: edge.next_input_mark().name(),
                });
            }

            outgoing
                .entry(edge.from().to_string())
                .or_default()
                .push(Arc::new(edge));
        }

        // Every node must be reachable from the start.
        let mut visited: HashSet<String> = HashSet::new();
        let mut queue = vec![start_id.clone()];
        while let Some(id) = queue.pop() {
            if !visited.insert(id.clone()) {
                continue;
            }
            if let Some(edges) = outgoing.get(&id) {
                for edge in edges {
                    queue.push(edge.to().to_string());
                }
            }
        }
        let mut unreachable: Vec<&String> = nodes.keys().filter(|id| !visited.contains(*id)).collect();
        unreachable.sort();
        if let Some(id) = unreachable.first() {
            return Err(SchemaError::UnreachableNode((*id).clone()));
        }

        Ok(CompiledFlow {
            name: self.name,
            nodes,
            outgoing,
            start_id,
        })
    }
}

/// Compiled workflow: immutable, shared by all conversations that run it.
///
/// Created by [`GraphSchema::compile`]. Holds the node map, per-node
/// outgoing edges in declaration order, and the start node.
#[derive(Clone)]
pub struct CompiledFlow {
    name: String,
    nodes: HashMap<String, Arc<NodeSchema>>,
    outgoing: HashMap<String, Vec<Arc<EdgeSchema>>>,
    start_id: String,
}

impl CompiledFlow {
    /// Graph display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The entry node id.
    pub fn start_id(&self) -> &str {
        &self.start_id
    }

    /// Looks up a node by id.
    pub fn node(&self, id: &str) -> Option<&Arc<NodeSchema>> {
        self.nodes.get(id)
    }

    /// Number of declared nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Outgoing edges of `id`, in declaration order.
    pub fn outgoing(&self, id: &str) -> &[Arc<EdgeSchema>] {
        self.outgoing.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether `id` has no outgoing edges (conversation end state).
    pub fn is_terminal(&self, id: &str) -> bool {
        self.outgoing(id).is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompts::SystemTemplate;
    use crate::schema::{EdgeSchema, ModelBinding};
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    struct AState {
        done: bool,
    }

    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    struct BState {
        note: Option<String>,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    struct BInput {
        done: bool,
    }

    fn node(id: &str) -> NodeSchema {
        NodeSchema::new(
            id,
            format!("Work on {}.", id),
            SystemTemplate::new("bg"),
            ModelBinding::state::<AState>(json!({ "type": "object" })),
        )
    }

    fn b_node() -> NodeSchema {
        NodeSchema::new(
            "b",
            "Work on b.",
            SystemTemplate::new("bg"),
            ModelBinding::state::<BState>(json!({ "type": "object" })),
        )
        .with_input::<BInput>()
    }

    fn a_to_b() -> EdgeSchema {
        EdgeSchema::new(
            "a",
            "b",
            |s: &AState| s.done,
            |s: &AState, _: &()| Some(BInput { done: s.done }),
        )
    }

    /// **Scenario**: a two-node chain compiles; adjacency and terminal checks hold.
    #[test]
    fn compile_two_node_chain() {
        let mut graph = GraphSchema::new("test");
        graph.add_node(node("a")).add_node(b_node()).add_edge(a_to_b()).set_start("a");
        let flow = graph.compile().expect("valid graph");
        assert_eq!(flow.start_id(), "a");
        assert_eq!(flow.node_count(), 2);
        assert_eq!(flow.outgoing("a").len(), 1);
        assert!(!flow.is_terminal("a"));
        assert!(flow.is_terminal("b"));
    }

    /// **Scenario**: compile fails when an edge references an undeclared node.
    #[test]
    fn compile_fails_on_unknown_edge_endpoint() {
        let mut graph = GraphSchema::new("test");
        graph.add_node(node("a")).add_edge(a_to_b()).set_start("a");
        match graph.compile() {
            Err(SchemaError::NodeNotFound(id)) => assert_eq!(id, "b"),
            other => panic!("expected NodeNotFound(b), got {:?}", other.err()),
        }
    }

    /// **Scenario**: compile fails when no start node is set.
    #[test]
    fn compile_fails_without_start() {
        let mut graph = GraphSchema::new("test");
        graph.add_node(node("a"));
        assert!(matches!(graph.compile(), Err(SchemaError::MissingStart)));
    }

    /// **Scenario**: compile fails when the edge's state type differs from the node's.
    #[test]
    fn compile_fails_on_state_type_mismatch() {
        let mismatched = EdgeSchema::new(
            "a",
            "b",
            |s: &BState| s.note.is_some(),
            |_: &BState, _: &()| Some(BInput { done: true }),
        );
        let mut graph = GraphSchema::new("test");
        graph.add_node(node("a")).add_node(b_node()).add_edge(mismatched).set_start("a");
        match graph.compile() {
            Err(SchemaError::StateTypeMismatch { edge, .. }) => {
                assert!(edge.contains("a -> b"), "{}", edge)
            }
            other => panic!("expected StateTypeMismatch, got {:?}", other.err()),
        }
    }

    /// **Scenario**: compile fails when a node is unreachable from the start.
    #[test]
    fn compile_fails_on_unreachable_node() {
        let mut graph = GraphSchema::new("test");
        graph.add_node(node("a")).add_node(node("island")).set_start("a");
        match graph.compile() {
            Err(SchemaError::UnreachableNode(id)) => assert_eq!(id, "island"),
            other => panic!("expected UnreachableNode, got {:?}", other.err()),
        }
    }
}
