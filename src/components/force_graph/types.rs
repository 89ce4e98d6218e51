//! Graph data structures for input to the expense graph component.

use serde::Deserialize;

/// Categorical node kind. Drives default coloring and nothing else.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
	/// A group member.
	User,
	/// A spending category.
	Category,
	/// An individual transaction.
	Transaction,
}

/// Categorical edge kind. Used only for visual styling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
	/// Money spent.
	Expense,
	/// Money received.
	Income,
	/// Money moved between members.
	Transfer,
}

/// A node in the expense network.
#[derive(Clone, Debug, Deserialize)]
pub struct GraphNode {
	/// Unique identifier for this node. Used to reference nodes in edges.
	pub id: String,
	/// Display name drawn next to the node.
	pub name: String,
	/// Group name for cluster-based coloring (e.g., "household", "trip").
	#[serde(default)]
	pub group: String,
	/// Weight. Drives both visual radius and collision radius.
	pub value: f64,
	/// Node kind.
	#[serde(rename = "type")]
	pub kind: NodeKind,
	/// Optional CSS color override (e.g., "#ff0000" or "rgb(255, 0, 0)").
	/// If not set, color is derived from the group map or the theme palette.
	pub color: Option<String>,
}

/// A weighted edge between two nodes, referenced by id.
#[derive(Clone, Debug, Deserialize)]
pub struct GraphEdge {
	/// Source node ID.
	pub source: String,
	/// Target node ID.
	pub target: String,
	/// Weight. Drives rest distance in layout and drawn thickness.
	pub value: f64,
	/// Edge kind.
	#[serde(rename = "type")]
	pub kind: EdgeKind,
}

/// Complete graph data: nodes and edges.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct GraphData {
	#[serde(default)]
	pub nodes: Vec<GraphNode>,
	#[serde(default)]
	pub edges: Vec<GraphEdge>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn deserializes_host_payload() {
		let json = r#"{
			"nodes": [
				{"id": "u1", "name": "Alice", "group": "household", "value": 100.0, "type": "user"},
				{"id": "c1", "name": "Groceries", "value": 50.0, "type": "category", "color": "#2e7d32"}
			],
			"edges": [
				{"source": "u1", "target": "c1", "value": 30.0, "type": "expense"}
			]
		}"#;

		let data: GraphData = serde_json::from_str(json).unwrap();
		assert_eq!(data.nodes.len(), 2);
		assert_eq!(data.edges.len(), 1);
		assert_eq!(data.nodes[0].kind, NodeKind::User);
		assert_eq!(data.nodes[1].color.as_deref(), Some("#2e7d32"));
		assert_eq!(data.nodes[1].group, "");
		assert_eq!(data.edges[0].kind, EdgeKind::Expense);
	}

	#[test]
	fn empty_payload_defaults_to_empty_graph() {
		let data: GraphData = serde_json::from_str("{}").unwrap();
		assert!(data.nodes.is_empty());
		assert!(data.edges.is_empty());
	}

	#[test]
	fn unknown_kind_is_rejected() {
		let json = r#"{"nodes": [{"id": "x", "name": "X", "value": 1.0, "type": "cat"}]}"#;
		assert!(serde_json::from_str::<GraphData>(json).is_err());
	}
}
