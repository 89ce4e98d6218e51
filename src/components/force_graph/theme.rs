//! Visual theming for the expense graph.
//!
//! All styling is plain data handed into rendering, never ambient state.

use super::types::{EdgeKind, NodeKind};

/// RGBA color representation.
#[derive(Clone, Copy, Debug)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Lighten the color by a factor (0.0 = unchanged, 1.0 = white)
	pub fn lighten(self, factor: f64) -> Self {
		let f = factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 + (255.0 - self.r as f64) * f) as u8,
			g: (self.g as f64 + (255.0 - self.g as f64) * f) as u8,
			b: (self.b as f64 + (255.0 - self.b as f64) * f) as u8,
			a: self.a,
		}
	}

	/// Darken the color by a factor (0.0 = unchanged, 1.0 = black)
	pub fn darken(self, factor: f64) -> Self {
		let f = 1.0 - factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 * f) as u8,
			g: (self.g as f64 * f) as u8,
			b: (self.b as f64 * f) as u8,
			a: self.a,
		}
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}

	pub fn to_css_rgb(self) -> String {
		format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
	}
}

/// Fallback palette for group-based coloring when a group has no explicit
/// entry in the caller's group-color map.
#[derive(Clone, Debug)]
pub struct GroupPalette {
	pub colors: Vec<Color>,
}

impl GroupPalette {
	/// Muted, harmonious palette - slate blues and teals (default)
	pub fn slate() -> Self {
		Self {
			colors: vec![
				Color::rgb(94, 129, 172),  // Steel blue
				Color::rgb(129, 161, 193), // Light steel
				Color::rgb(100, 148, 160), // Teal gray
				Color::rgb(136, 160, 175), // Cadet blue
				Color::rgb(108, 142, 173), // Air force blue
				Color::rgb(119, 158, 165), // Desaturated cyan
				Color::rgb(143, 163, 180), // Cool gray
				Color::rgb(122, 153, 168), // Dusty blue
			],
		}
	}

	pub fn get(&self, index: usize) -> Color {
		self.colors[index % self.colors.len()]
	}
}

/// Background style configuration.
#[derive(Clone, Debug)]
pub struct BackgroundStyle {
	/// Primary background color
	pub color: Color,
	/// Secondary color for gradients
	pub color_secondary: Color,
	/// Whether to use radial gradient
	pub use_gradient: bool,
}

/// Node visual style.
#[derive(Clone, Debug)]
pub struct NodeStyle {
	/// Base color for member nodes
	pub user: Color,
	/// Base color for category nodes
	pub category: Color,
	/// Base color for transaction nodes
	pub transaction: Color,
	/// Whether nodes have inner gradients
	pub use_gradient: bool,
	/// Ring drawn around the selected node
	pub selection_ring: Color,
	/// Label text color
	pub label: Color,
}

/// Edge visual style, one color per flow kind.
#[derive(Clone, Debug)]
pub struct EdgeStyle {
	pub expense: Color,
	pub income: Color,
	pub transfer: Color,
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	pub name: &'static str,
	pub background: BackgroundStyle,
	pub node: NodeStyle,
	pub edge: EdgeStyle,
	pub palette: GroupPalette,
}

impl Theme {
	/// Dark ledger theme (default)
	pub fn ledger() -> Self {
		Self {
			name: "ledger",
			background: BackgroundStyle {
				color: Color::rgb(22, 27, 34),
				color_secondary: Color::rgb(30, 35, 42),
				use_gradient: true,
			},
			node: NodeStyle {
				user: Color::rgb(94, 129, 172),
				category: Color::rgb(100, 148, 160),
				transaction: Color::rgb(143, 163, 180),
				use_gradient: true,
				selection_ring: Color::rgb(255, 255, 255),
				label: Color::rgba(255, 255, 255, 0.85),
			},
			edge: EdgeStyle {
				expense: Color::rgb(191, 97, 106),
				income: Color::rgb(115, 165, 120),
				transfer: Color::rgb(140, 160, 180),
			},
			palette: GroupPalette::slate(),
		}
	}

	/// Light theme for embedding in bright pages
	pub fn paper() -> Self {
		Self {
			name: "paper",
			background: BackgroundStyle {
				color: Color::rgb(246, 246, 244),
				color_secondary: Color::rgb(236, 237, 238),
				use_gradient: false,
			},
			node: NodeStyle {
				user: Color::rgb(62, 95, 138),
				category: Color::rgb(70, 115, 128),
				transaction: Color::rgb(110, 128, 145),
				use_gradient: false,
				selection_ring: Color::rgb(40, 44, 52),
				label: Color::rgba(40, 44, 52, 0.9),
			},
			edge: EdgeStyle {
				expense: Color::rgb(166, 70, 80),
				income: Color::rgb(85, 135, 92),
				transfer: Color::rgb(105, 125, 148),
			},
			palette: GroupPalette::slate(),
		}
	}

	pub fn node_color(&self, kind: NodeKind) -> Color {
		match kind {
			NodeKind::User => self.node.user,
			NodeKind::Category => self.node.category,
			NodeKind::Transaction => self.node.transaction,
		}
	}

	pub fn edge_color(&self, kind: EdgeKind) -> Color {
		match kind {
			EdgeKind::Expense => self.edge.expense,
			EdgeKind::Income => self.edge.income,
			EdgeKind::Transfer => self.edge.transfer,
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::ledger()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn css_formats_opaque_as_hex_and_translucent_as_rgba() {
		assert_eq!(Color::rgb(255, 0, 16).to_css(), "#ff0010");
		assert_eq!(Color::rgba(10, 20, 30, 0.5).to_css(), "rgba(10, 20, 30, 0.5)");
		assert_eq!(Color::rgba(10, 20, 30, 0.5).to_css_rgb(), "#0a141e");
	}

	#[test]
	fn lighten_and_darken_saturate_at_the_extremes() {
		let c = Color::rgb(100, 150, 200);
		let white = c.lighten(1.0);
		assert_eq!((white.r, white.g, white.b), (255, 255, 255));
		let black = c.darken(1.0);
		assert_eq!((black.r, black.g, black.b), (0, 0, 0));
		// Out-of-range factors clamp instead of wrapping.
		let same = c.lighten(-2.0);
		assert_eq!((same.r, same.g, same.b), (c.r, c.g, c.b));
	}

	#[test]
	fn palette_wraps_around() {
		let p = GroupPalette::slate();
		let n = p.colors.len();
		assert_eq!(p.get(0).to_css(), p.get(n).to_css());
	}

	#[test]
	fn kind_colors_come_from_the_theme() {
		let theme = Theme::default();
		assert_eq!(
			theme.node_color(NodeKind::User).to_css(),
			theme.node.user.to_css()
		);
		assert_eq!(
			theme.edge_color(EdgeKind::Income).to_css(),
			theme.edge.income.to_css()
		);
	}
}
