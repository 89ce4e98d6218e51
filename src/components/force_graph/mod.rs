//! Force-directed expense-network visualization component.
//!
//! Renders an interactive graph of members, categories, and transactions on
//! an HTML canvas with:
//! - Physics-based node positioning via an in-crate force simulation
//! - Pan, zoom, and node dragging interactions
//! - Neighbor highlighting on hover and exclusive click selection
//! - Configurable theming and zoom-aware visual scaling
//!
//! # Example
//!
//! ```ignore
//! use ledger_graph::{ExpenseGraph, GraphData, GraphNode, GraphEdge};
//!
//! let data = GraphData {
//!     nodes: vec![
//!         GraphNode { id: "u1".into(), name: "Alice".into(), .. },
//!         GraphNode { id: "c1".into(), name: "Groceries".into(), .. },
//!     ],
//!     edges: vec![
//!         GraphEdge { source: "u1".into(), target: "c1".into(), .. },
//!     ],
//! };
//!
//! view! { <ExpenseGraph data=data.into() fullscreen=true /> }
//! ```

mod component;
mod render;
pub mod scale;
pub mod simulation;
mod state;
pub mod theme;
mod types;

pub use component::ExpenseGraph;
pub use theme::Theme;
pub use types::{EdgeKind, GraphData, GraphEdge, GraphNode, NodeKind};
