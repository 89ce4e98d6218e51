//! Zoom-dependent scaling for graph visuals.
//!
//! The canvas transform scales everything drawn in world space, so values
//! that should stay readable on screen (label text, hit slop, ring strokes,
//! minimum line widths) are divided by the zoom factor `k` before drawing.
//! [`ScaledValues`] precomputes those once per frame.

/// Tunable screen-space sizes, independent of zoom.
#[derive(Clone, Debug)]
pub struct ScaleConfig {
	/// Extra pixels around a node's circle that still count as a hit.
	pub hit_slop: f64,
	/// Label font size in screen pixels.
	pub label_size: f64,
	/// Below this zoom, labels stop growing to compensate.
	pub label_min_k: f64,
	/// Multiplier from sqrt(edge weight) to world-space line width.
	pub edge_width_scale: f64,
	/// Minimum edge line width in screen pixels.
	pub edge_min_width: f64,
	/// Selection ring stroke width in screen pixels.
	pub ring_width: f64,
	/// Selection ring offset from the node edge in screen pixels.
	pub ring_offset: f64,
}

impl Default for ScaleConfig {
	fn default() -> Self {
		Self {
			hit_slop: 6.0,
			label_size: 11.0,
			label_min_k: 0.5,
			edge_width_scale: 0.5,
			edge_min_width: 0.75,
			ring_width: 1.5,
			ring_offset: 2.0,
		}
	}
}

/// Per-frame scale values, ready to use after the canvas transform.
#[derive(Clone, Debug)]
pub struct ScaledValues {
	/// Current zoom level.
	pub k: f64,
	/// Hit slop in world units.
	pub hit_slop: f64,
	/// Label font string (e.g., "11px sans-serif").
	pub label_font: String,
	/// Minimum edge width in world units.
	pub edge_min_width: f64,
	edge_width_scale: f64,
	/// Selection ring stroke width in world units.
	pub ring_width: f64,
	/// Selection ring offset in world units.
	pub ring_offset: f64,
}

impl ScaledValues {
	pub fn new(config: &ScaleConfig, k: f64) -> Self {
		let label_font_size = config.label_size / k.max(config.label_min_k);
		Self {
			k,
			hit_slop: config.hit_slop / k,
			label_font: format!("{}px sans-serif", label_font_size),
			edge_min_width: config.edge_min_width / k,
			edge_width_scale: config.edge_width_scale,
			ring_width: config.ring_width / k,
			ring_offset: config.ring_offset / k,
		}
	}

	/// World-space line width for an edge weight, floored so thin edges
	/// never vanish when zoomed out.
	pub fn edge_width(&self, value: f64) -> f64 {
		(value.max(0.0).sqrt() * self.edge_width_scale).max(self.edge_min_width)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn screen_sizes_counteract_zoom() {
		let config = ScaleConfig::default();
		let near = ScaledValues::new(&config, 2.0);
		let far = ScaledValues::new(&config, 0.5);
		assert!(near.hit_slop < far.hit_slop);
		assert_eq!(near.hit_slop, config.hit_slop / 2.0);
		assert_eq!(near.ring_width, config.ring_width / 2.0);
	}

	#[test]
	fn label_growth_is_capped_below_min_zoom() {
		let config = ScaleConfig::default();
		let at_min = ScaledValues::new(&config, config.label_min_k);
		let below_min = ScaledValues::new(&config, config.label_min_k / 4.0);
		assert_eq!(at_min.label_font, below_min.label_font);
	}

	#[test]
	fn edge_width_grows_with_weight_but_never_vanishes() {
		let scale = ScaledValues::new(&ScaleConfig::default(), 1.0);
		assert!(scale.edge_width(9.0) < scale.edge_width(100.0));
		assert_eq!(scale.edge_width(0.0), scale.edge_min_width);
	}
}
