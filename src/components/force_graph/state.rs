//! Graph state and interaction tracking.
//!
//! Binds the force simulation to per-node display metadata and carries the
//! view transform for pan/zoom, drag and pan bookkeeping, hover highlighting,
//! and the exclusive click selection. One `GraphState` is built per dataset
//! and discarded wholesale when the dataset or canvas dimensions change.

use std::collections::{HashMap, HashSet};

use super::scale::{ScaleConfig, ScaledValues};
use super::simulation::{Simulation, SimulationConfig};
use super::theme::Theme;
use super::types::{EdgeKind, GraphData, GraphNode};

/// Default group colors for the common expense groups.
pub fn default_group_colors() -> HashMap<String, String> {
	[
		("members", "#1976d2"),
		("household", "#2e7d32"),
		("food", "#e65100"),
		("travel", "#7b1fa2"),
		("utilities", "#00838f"),
		("leisure", "#c62828"),
		("savings", "#455a64"),
	]
	.into_iter()
	.map(|(k, v)| (k.to_string(), v.to_string()))
	.collect()
}

/// Display metadata for one node, parallel to the simulation's node array.
#[derive(Clone, Debug)]
pub struct NodeMeta {
	/// The caller's node data, handed back through callbacks.
	pub data: GraphNode,
	/// Resolved CSS color: explicit > group map > palette > kind color.
	pub color: String,
}

/// A resolved edge: indices into the node arrays plus styling inputs.
#[derive(Clone, Debug)]
pub struct EdgeRef {
	pub source: usize,
	pub target: usize,
	pub value: f64,
	pub kind: EdgeKind,
}

/// Zoom bounds for the view transform.
pub const MIN_ZOOM: f64 = 0.5;
pub const MAX_ZOOM: f64 = 3.0;

/// Pan and zoom transform applied to the entire graph view.
///
/// Purely visual: simulation coordinates are never scaled.
#[derive(Clone, Debug)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	/// Zoom factor, clamped to [`MIN_ZOOM`]..[`MAX_ZOOM`].
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

impl ViewTransform {
	/// Scale by `factor` anchored at screen point `(cx, cy)`, so the graph
	/// point under the cursor stays put. The resulting zoom is clamped.
	pub fn zoom_about(&mut self, factor: f64, cx: f64, cy: f64) {
		let new_k = (self.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
		let ratio = new_k / self.k;
		self.x = cx - (cx - self.x) * ratio;
		self.y = cy - (cy - self.y) * ratio;
		self.k = new_k;
	}
}

/// Tracks an in-progress node drag operation.
#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node: Option<usize>,
	/// Screen position of the press, for click-vs-drag discrimination.
	pub start_x: f64,
	pub start_y: f64,
	/// Graph-space offset from the pointer to the grabbed node's center.
	pub grab_dx: f64,
	pub grab_dy: f64,
	/// Whether the pointer traveled beyond the click threshold.
	pub moved: bool,
}

/// Tracks an in-progress canvas pan operation.
#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// Baseline node opacity when nothing is hovered.
pub const NODE_BASE_ALPHA: f64 = 1.0;
/// Baseline edge opacity when nothing is hovered.
pub const EDGE_BASE_ALPHA: f64 = 0.6;
/// Opacity of nodes outside the hovered neighborhood.
pub const NODE_DIM_ALPHA: f64 = 0.15;
/// Opacity of edges not touching the hovered node.
pub const EDGE_DIM_ALPHA: f64 = 0.1;

/// Hover highlight: the hovered node and its one-edge neighborhood.
///
/// Everything outside the neighborhood is dimmed; clearing the hover
/// restores every node to [`NODE_BASE_ALPHA`] and every edge to
/// [`EDGE_BASE_ALPHA`].
#[derive(Clone, Debug, Default)]
pub struct HighlightState {
	pub hovered: Option<usize>,
	/// Hovered node plus its direct neighbors.
	neighborhood: HashSet<usize>,
}

impl HighlightState {
	/// Update the hovered node and recompute its neighborhood.
	pub fn set_hover(&mut self, node: Option<usize>, edges: &[EdgeRef]) {
		if self.hovered == node {
			return;
		}
		self.hovered = node;
		self.neighborhood.clear();

		if let Some(idx) = node {
			self.neighborhood.insert(idx);
			for edge in edges {
				if edge.source == idx {
					self.neighborhood.insert(edge.target);
				} else if edge.target == idx {
					self.neighborhood.insert(edge.source);
				}
			}
		}
	}

	pub fn is_active(&self) -> bool {
		self.hovered.is_some()
	}

	pub fn contains(&self, index: usize) -> bool {
		self.neighborhood.contains(&index)
	}

	/// Opacity for a node under the current hover state.
	pub fn node_alpha(&self, index: usize) -> f64 {
		if !self.is_active() || self.contains(index) {
			NODE_BASE_ALPHA
		} else {
			NODE_DIM_ALPHA
		}
	}

	/// Opacity for an edge under the current hover state. Edges touching
	/// the hovered node are emphasized, the rest are dimmed.
	pub fn edge_alpha(&self, source: usize, target: usize) -> f64 {
		match self.hovered {
			None => EDGE_BASE_ALPHA,
			Some(idx) if source == idx || target == idx => 1.0,
			Some(_) => EDGE_DIM_ALPHA,
		}
	}
}

/// Core graph state: simulation, display metadata, and interaction.
///
/// Created once per dataset, then mutated each frame by the animation loop.
pub struct GraphState {
	pub sim: Simulation,
	pub nodes: Vec<NodeMeta>,
	pub edges: Vec<EdgeRef>,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub highlight: HighlightState,
	/// Index of the selected node, at most one at a time.
	pub selected: Option<usize>,
	pub width: f64,
	pub height: f64,
}

impl GraphState {
	pub fn new(data: &GraphData, width: f64, height: f64, theme: &Theme) -> Self {
		Self::new_with_colors(data, width, height, theme, &default_group_colors())
	}

	/// Build graph state with an explicit group-color map.
	///
	/// Edges whose endpoints do not resolve to known node ids are dropped
	/// here; nothing downstream ever sees a dangling reference.
	pub fn new_with_colors(
		data: &GraphData,
		width: f64,
		height: f64,
		theme: &Theme,
		group_colors: &HashMap<String, String>,
	) -> Self {
		let mut id_to_idx: HashMap<&str, usize> = HashMap::new();
		for (i, node) in data.nodes.iter().enumerate() {
			id_to_idx.entry(&node.id).or_insert(i);
		}

		let nodes = data
			.nodes
			.iter()
			.map(|node| {
				let color = node.color.clone().unwrap_or_else(|| {
					if node.group.is_empty() {
						theme.node_color(node.kind).to_css_rgb()
					} else if let Some(c) = group_colors.get(&node.group) {
						c.clone()
					} else {
						theme.palette.get(group_hash(&node.group)).to_css_rgb()
					}
				});
				NodeMeta {
					data: node.clone(),
					color,
				}
			})
			.collect::<Vec<_>>();

		let edges = data
			.edges
			.iter()
			.filter_map(|edge| {
				let source = *id_to_idx.get(edge.source.as_str())?;
				let target = *id_to_idx.get(edge.target.as_str())?;
				Some(EdgeRef {
					source,
					target,
					value: edge.value,
					kind: edge.kind,
				})
			})
			.collect::<Vec<_>>();

		let values = data.nodes.iter().map(|n| n.value).collect::<Vec<_>>();
		let links = edges
			.iter()
			.map(|e| (e.source, e.target, e.value))
			.collect::<Vec<_>>();
		let sim = Simulation::new(&values, &links, width, height, SimulationConfig::default());

		Self {
			sim,
			nodes,
			edges,
			transform: ViewTransform::default(),
			drag: DragState::default(),
			pan: PanState::default(),
			highlight: HighlightState::default(),
			selected: None,
			width,
			height,
		}
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// Topmost node under a screen position, if any.
	pub fn node_at_position(&self, sx: f64, sy: f64, config: &ScaleConfig) -> Option<usize> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let scale = ScaledValues::new(config, self.transform.k);
		let mut found = None;
		for (i, node) in self.sim.nodes().iter().enumerate() {
			let (dx, dy) = (node.x - gx, node.y - gy);
			let hit = node.radius + scale.hit_slop;
			if dx * dx + dy * dy < hit * hit {
				// Later nodes draw on top, so the last match wins.
				found = Some(i);
			}
		}
		found
	}

	pub fn set_hover(&mut self, node: Option<usize>) {
		self.highlight.set_hover(node, &self.edges);
	}

	/// Exclusive selection toggle. Returns true if the node is now
	/// selected, false if the click cleared the selection.
	pub fn toggle_select(&mut self, index: usize) -> bool {
		if self.selected == Some(index) {
			self.selected = None;
			false
		} else {
			self.selected = Some(index);
			true
		}
	}

	pub fn tick(&mut self) {
		self.sim.tick();
	}

	/// Stop the layout for good; used on teardown and dataset swap.
	pub fn stop(&mut self) {
		self.sim.stop();
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.sim.set_center(width, height);
	}
}

/// Deterministic palette index for a group name.
fn group_hash(group: &str) -> usize {
	group
		.bytes()
		.fold(0usize, |h, b| h.wrapping_mul(31).wrapping_add(b as usize))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::types::{GraphEdge, NodeKind};

	fn node(id: &str, kind: NodeKind, value: f64) -> GraphNode {
		GraphNode {
			id: id.to_string(),
			name: id.to_uppercase(),
			group: String::new(),
			value,
			kind,
			color: None,
		}
	}

	fn edge(source: &str, target: &str, value: f64) -> GraphEdge {
		GraphEdge {
			source: source.to_string(),
			target: target.to_string(),
			value,
			kind: EdgeKind::Expense,
		}
	}

	/// The scenario from the component contract: one member, one category,
	/// one expense edge, plus an unrelated third node.
	fn sample() -> GraphData {
		GraphData {
			nodes: vec![
				node("u1", NodeKind::User, 100.0),
				node("c1", NodeKind::Category, 50.0),
				node("t9", NodeKind::Transaction, 10.0),
			],
			edges: vec![edge("u1", "c1", 30.0)],
		}
	}

	#[test]
	fn resolves_edges_and_drops_dangling_ones() {
		let mut data = sample();
		data.edges.push(edge("u1", "missing", 5.0));
		data.edges.push(edge("ghost", "c1", 5.0));

		let state = GraphState::new(&data, 800.0, 600.0, &Theme::default());
		assert_eq!(state.nodes.len(), 3);
		assert_eq!(state.edges.len(), 1);
		assert_eq!((state.edges[0].source, state.edges[0].target), (0, 1));
		assert_eq!(state.sim.links().len(), 1);
	}

	#[test]
	fn empty_input_builds_an_inert_state() {
		let mut state = GraphState::new(&GraphData::default(), 800.0, 600.0, &Theme::default());
		assert!(state.nodes.is_empty());
		assert!(state.edges.is_empty());
		state.tick();
		assert_eq!(state.node_at_position(400.0, 300.0, &ScaleConfig::default()), None);
	}

	#[test]
	fn hover_highlights_exactly_the_direct_neighbors() {
		let mut state = GraphState::new(&sample(), 800.0, 600.0, &Theme::default());

		state.set_hover(Some(0)); // u1
		assert_eq!(state.highlight.node_alpha(0), NODE_BASE_ALPHA);
		assert_eq!(state.highlight.node_alpha(1), NODE_BASE_ALPHA); // c1, neighbor
		assert_eq!(state.highlight.node_alpha(2), NODE_DIM_ALPHA); // t9, unrelated
		assert_eq!(state.highlight.edge_alpha(0, 1), 1.0);

		// Undirected: hovering the target lights up the source.
		state.set_hover(Some(1));
		assert_eq!(state.highlight.node_alpha(0), NODE_BASE_ALPHA);
		assert_eq!(state.highlight.node_alpha(2), NODE_DIM_ALPHA);
	}

	#[test]
	fn pointer_out_restores_base_opacities() {
		let mut state = GraphState::new(&sample(), 800.0, 600.0, &Theme::default());
		state.set_hover(Some(0));
		state.set_hover(None);

		for i in 0..3 {
			assert_eq!(state.highlight.node_alpha(i), 1.0);
		}
		assert_eq!(state.highlight.edge_alpha(0, 1), 0.6);
	}

	#[test]
	fn edges_not_touching_the_hovered_node_are_dimmed() {
		let mut data = sample();
		data.edges.push(edge("c1", "t9", 8.0));
		let mut state = GraphState::new(&data, 800.0, 600.0, &Theme::default());

		state.set_hover(Some(0)); // u1 touches only u1-c1
		assert_eq!(state.highlight.edge_alpha(0, 1), 1.0);
		assert_eq!(state.highlight.edge_alpha(1, 2), EDGE_DIM_ALPHA);
	}

	#[test]
	fn selection_is_an_exclusive_toggle() {
		let mut state = GraphState::new(&sample(), 800.0, 600.0, &Theme::default());

		assert!(state.toggle_select(0));
		assert_eq!(state.selected, Some(0));

		// Selecting another node replaces, never accumulates.
		assert!(state.toggle_select(1));
		assert_eq!(state.selected, Some(1));

		assert!(!state.toggle_select(1));
		assert_eq!(state.selected, None);
	}

	#[test]
	fn zoom_is_clamped_to_bounds() {
		let mut t = ViewTransform::default();
		t.zoom_about(100.0, 400.0, 300.0);
		assert_eq!(t.k, MAX_ZOOM);
		t.zoom_about(1e-6, 400.0, 300.0);
		assert_eq!(t.k, MIN_ZOOM);
	}

	#[test]
	fn zoom_keeps_the_cursor_point_fixed() {
		let mut state = GraphState::new(&sample(), 800.0, 600.0, &Theme::default());
		let before = state.screen_to_graph(250.0, 150.0);
		state.transform.zoom_about(1.5, 250.0, 150.0);
		let after = state.screen_to_graph(250.0, 150.0);
		assert!((before.0 - after.0).abs() < 1e-9);
		assert!((before.1 - after.1).abs() < 1e-9);
	}

	#[test]
	fn hit_testing_honors_transform_and_radius() {
		let mut state = GraphState::new(&sample(), 800.0, 600.0, &Theme::default());
		let target = &state.sim.nodes()[0];
		let (sx, sy) = (target.x, target.y); // identity transform

		let config = ScaleConfig::default();
		assert_eq!(state.node_at_position(sx, sy, &config), Some(0));

		// Far away from everything.
		assert_eq!(state.node_at_position(-500.0, -500.0, &config), None);

		// Panning shifts the hit position along.
		state.transform.x += 50.0;
		assert_eq!(state.node_at_position(sx + 50.0, sy, &config), Some(0));
	}

	#[test]
	fn color_precedence_explicit_then_group_then_theme() {
		let theme = Theme::default();
		let mut data = sample();
		data.nodes[0].color = Some("#123456".to_string());
		data.nodes[1].group = "food".to_string();

		let state = GraphState::new(&data, 800.0, 600.0, &theme);
		assert_eq!(state.nodes[0].color, "#123456");
		assert_eq!(state.nodes[1].color, "#e65100");
		assert_eq!(
			state.nodes[2].color,
			theme.node_color(NodeKind::Transaction).to_css_rgb()
		);

		// Unknown groups fall back to a deterministic palette color.
		let mut data2 = sample();
		data2.nodes[2].group = "surfing".to_string();
		let state2 = GraphState::new(&data2, 800.0, 600.0, &theme);
		assert_eq!(
			state2.nodes[2].color,
			theme.palette.get(group_hash("surfing")).to_css_rgb()
		);
	}

	#[test]
	fn stopping_freezes_positions_through_the_state_layer() {
		let mut state = GraphState::new(&sample(), 800.0, 600.0, &Theme::default());
		for _ in 0..3 {
			state.tick();
		}
		state.stop();

		let frozen: Vec<(f64, f64)> = state.sim.nodes().iter().map(|n| (n.x, n.y)).collect();
		for _ in 0..10 {
			state.tick();
		}
		let after: Vec<(f64, f64)> = state.sim.nodes().iter().map(|n| (n.x, n.y)).collect();
		assert_eq!(frozen, after);
	}
}
