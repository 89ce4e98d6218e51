//! Canvas rendering for the expense graph.
//!
//! Drawing passes in z-order: background (screen space), then edges and
//! nodes (world space, under the pan/zoom transform), with dimmed nodes
//! drawn before highlighted ones so the hovered neighborhood sits on top.
//! All geometry comes straight from the simulation; the node circle radius
//! is the simulation's collision radius, so layout and visuals agree.

use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::scale::{ScaleConfig, ScaledValues};
use super::state::GraphState;
use super::theme::{Color, Theme};

/// Renders the complete graph to the canvas.
pub fn render(
	state: &GraphState,
	ctx: &CanvasRenderingContext2d,
	config: &ScaleConfig,
	theme: &Theme,
) {
	let scale = ScaledValues::new(config, state.transform.k);

	draw_background(state, ctx, theme);

	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);

	draw_edges(state, ctx, &scale, theme);
	draw_nodes(state, ctx, &scale, theme);

	ctx.restore();
}

fn draw_background(state: &GraphState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	if theme.background.use_gradient {
		let gradient = ctx
			.create_radial_gradient(
				state.width / 2.0,
				state.height / 2.0,
				0.0,
				state.width / 2.0,
				state.height / 2.0,
				(state.width.max(state.height)) * 0.8,
			)
			.unwrap();

		gradient
			.add_color_stop(0.0, &theme.background.color_secondary.to_css())
			.unwrap();
		gradient
			.add_color_stop(1.0, &theme.background.color.to_css())
			.unwrap();

		#[allow(deprecated)]
		ctx.set_fill_style(&gradient);
	} else {
		ctx.set_fill_style_str(&theme.background.color.to_css());
	}

	ctx.fill_rect(0.0, 0.0, state.width, state.height);
}

fn draw_edges(
	state: &GraphState,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
) {
	for edge in &state.edges {
		let a = &state.sim.nodes()[edge.source];
		let b = &state.sim.nodes()[edge.target];

		let (dx, dy) = (b.x - a.x, b.y - a.y);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			continue;
		}
		let (ux, uy) = (dx / dist, dy / dist);

		let alpha = state.highlight.edge_alpha(edge.source, edge.target);
		let color = theme.edge_color(edge.kind).with_alpha(alpha);

		ctx.set_stroke_style_str(&color.to_css());
		ctx.set_line_width(scale.edge_width(edge.value));

		// Stop at the circle edges, not the centers.
		ctx.begin_path();
		ctx.move_to(a.x + ux * a.radius, a.y + uy * a.radius);
		ctx.line_to(b.x - ux * b.radius, b.y - uy * b.radius);
		ctx.stroke();
	}
}

fn draw_nodes(
	state: &GraphState,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
) {
	// Pass 1: nodes outside the hovered neighborhood.
	for i in 0..state.nodes.len() {
		if !state.highlight.is_active() || state.highlight.contains(i) {
			continue;
		}
		draw_node(state, ctx, scale, theme, i);
	}

	// Pass 2: the rest on top.
	for i in 0..state.nodes.len() {
		if state.highlight.is_active() && !state.highlight.contains(i) {
			continue;
		}
		draw_node(state, ctx, scale, theme, i);
	}
}

fn draw_node(
	state: &GraphState,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
	index: usize,
) {
	let node = &state.sim.nodes()[index];
	let meta = &state.nodes[index];
	let (x, y, radius) = (node.x, node.y, node.radius);
	let alpha = state.highlight.node_alpha(index);

	ctx.set_global_alpha(alpha);

	if theme.node.use_gradient {
		let base_color = parse_color(&meta.color);
		let highlight = base_color.lighten(0.4);
		let shadow = base_color.darken(0.2);

		let gradient = ctx
			.create_radial_gradient(x - radius * 0.3, y - radius * 0.3, 0.0, x, y, radius)
			.unwrap();
		gradient.add_color_stop(0.0, &highlight.to_css()).unwrap();
		gradient.add_color_stop(0.7, &base_color.to_css()).unwrap();
		gradient.add_color_stop(1.0, &shadow.to_css()).unwrap();

		ctx.begin_path();
		let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		#[allow(deprecated)]
		ctx.set_fill_style(&gradient);
		ctx.fill();
	} else {
		ctx.begin_path();
		let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(&meta.color);
		ctx.fill();
	}

	if state.selected == Some(index) {
		let ring = theme.node.selection_ring;
		ctx.begin_path();
		let _ = ctx.arc(x, y, radius + scale.ring_offset, 0.0, 2.0 * PI);
		ctx.set_stroke_style_str(&ring.with_alpha(0.9 * alpha).to_css());
		ctx.set_line_width(scale.ring_width);
		ctx.stroke();

		ctx.begin_path();
		let _ = ctx.arc(x, y, radius + scale.ring_offset * 2.5, 0.0, 2.0 * PI);
		ctx.set_stroke_style_str(&ring.with_alpha(0.3 * alpha).to_css());
		ctx.set_line_width(scale.ring_width * 0.5);
		ctx.stroke();
	}

	ctx.set_global_alpha(1.0);

	if !meta.data.name.is_empty() && alpha > 0.5 {
		ctx.set_global_alpha(alpha);
		ctx.set_fill_style_str(&theme.node.label.to_css());
		ctx.set_font(&scale.label_font);
		let _ = ctx.fill_text(&meta.data.name, x + radius + 4.0, y + 3.0);
		ctx.set_global_alpha(1.0);
	}
}

/// Parses a CSS color string into a [`Color`].
/// Supports hex (`#RRGGBB`) and `rgb()`/`rgba()` functional notation.
fn parse_color(color_str: &str) -> Color {
	if color_str.starts_with('#') && color_str.len() == 7 {
		let r = u8::from_str_radix(&color_str[1..3], 16).unwrap_or(128);
		let g = u8::from_str_radix(&color_str[3..5], 16).unwrap_or(128);
		let b = u8::from_str_radix(&color_str[5..7], 16).unwrap_or(128);
		Color::rgb(r, g, b)
	} else if color_str.starts_with("rgb") {
		let nums: Vec<&str> = color_str
			.trim_start_matches("rgba(")
			.trim_start_matches("rgb(")
			.trim_end_matches(')')
			.split(',')
			.collect();
		let r = nums
			.first()
			.and_then(|s| s.trim().parse().ok())
			.unwrap_or(128);
		let g = nums
			.get(1)
			.and_then(|s| s.trim().parse().ok())
			.unwrap_or(128);
		let b = nums
			.get(2)
			.and_then(|s| s.trim().parse().ok())
			.unwrap_or(128);
		let a = nums
			.get(3)
			.and_then(|s| s.trim().parse().ok())
			.unwrap_or(1.0);
		Color::rgba(r, g, b, a)
	} else {
		Color::rgb(128, 128, 128)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_hex_and_functional_notation() {
		let c = parse_color("#1976d2");
		assert_eq!((c.r, c.g, c.b), (0x19, 0x76, 0xd2));

		let c = parse_color("rgb(10, 20, 30)");
		assert_eq!((c.r, c.g, c.b), (10, 20, 30));

		let c = parse_color("rgba(10, 20, 30, 0.25)");
		assert_eq!((c.r, c.g, c.b), (10, 20, 30));
		assert!((c.a - 0.25).abs() < 1e-9);
	}

	#[test]
	fn unparseable_colors_fall_back_to_gray() {
		let c = parse_color("tomato");
		assert_eq!((c.r, c.g, c.b), (128, 128, 128));
	}
}
