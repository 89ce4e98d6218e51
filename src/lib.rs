//! ledger-graph: Interactive force-directed visualization of group expenses.
//!
//! This crate provides a WASM-based graph visualization component that
//! renders the expense network of a group (members, categories, and
//! transactions) with physics-based layout, pan/zoom, hover highlighting,
//! and click selection.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;

pub use components::force_graph::{
	EdgeKind, ExpenseGraph, GraphData, GraphEdge, GraphNode, NodeKind, Theme,
};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("ledger-graph: logging initialized");
}

/// Load graph data from a script element with id="graph-data".
/// Expected format: JSON with { nodes: [...], edges: [...] }
fn load_graph_data() -> Option<GraphData> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("graph-data")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match serde_json::from_str::<GraphData>(&json_text) {
		Ok(data) => {
			info!(
				"ledger-graph: loaded {} nodes, {} edges",
				data.nodes.len(),
				data.edges.len()
			);
			Some(data)
		}
		Err(e) => {
			warn!("ledger-graph: failed to parse graph data: {}", e);
			None
		}
	}
}

/// Main application component.
/// Loads the expense network from the DOM and renders the visualization.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	// Load graph data from the DOM
	let graph_data = load_graph_data().unwrap_or_default();
	let graph_signal = Signal::derive(move || graph_data.clone());

	let on_node_click = Callback::new(|node: GraphNode| {
		info!("ledger-graph: clicked {} ({})", node.name, node.id);
	});

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Group Expense Network" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fullscreen-graph">
			<ExpenseGraph data=graph_signal fullscreen=true on_node_click=on_node_click />
			<div class="graph-overlay">
				<h1>"Expense Network"</h1>
				<p class="subtitle">"Drag nodes to reposition. Scroll to zoom. Drag background to pan."</p>
			</div>
		</div>
	}
}
