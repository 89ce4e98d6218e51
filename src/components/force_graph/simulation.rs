//! Force-directed layout engine.
//!
//! Iterative physical simulation in the d3 family: link attraction, pairwise
//! repulsion, weak centering, and circle collision, summed into per-node
//! velocities once per tick. A temperature-like `alpha` parameter decays each
//! tick and the simulation stops once it crosses `alpha_min`, or when the
//! free-running tick cap is reached. Interaction can pin individual nodes and
//! reheat the simulation so the layout visibly resettles.
//!
//! The simulation owns positions and velocities exclusively. Callers hand in
//! node weights and index-resolved links, then read positions back through
//! [`Simulation::nodes`] after each tick.

/// Visual and collision radius for a node weight.
///
/// Shared between layout and rendering so the two can never disagree.
/// Strictly monotone in `value`, with a floor of 5 at zero weight.
pub fn node_radius(value: f64) -> f64 {
	value.max(0.0).sqrt() * 0.5 + 5.0
}

/// A node as the simulation sees it: position, velocity, optional pin.
#[derive(Clone, Debug)]
pub struct SimNode {
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	/// Pinned position. Set while the node is dragged, cleared on release.
	/// While set it overrides the simulated position at integration time.
	pub pin: Option<(f64, f64)>,
	/// Collision radius, precomputed from the node weight.
	pub radius: f64,
}

/// A resolved link between two node indices.
#[derive(Clone, Copy, Debug)]
pub struct SimLink {
	pub source: usize,
	pub target: usize,
	/// Rest length, derived from the edge weight at build time.
	pub distance: f64,
}

/// Tuning parameters for the force passes and the cooling schedule.
#[derive(Clone, Debug)]
pub struct SimulationConfig {
	/// Fraction of the full link-length correction applied per tick.
	pub link_strength: f64,
	/// Rest length of a zero-weight link; weight is added on top.
	pub link_distance_base: f64,
	/// Many-body strength. Negative repels.
	pub charge_strength: f64,
	/// Pairs farther apart than this skip the many-body pass entirely.
	pub charge_distance_max: f64,
	/// Fraction of the centroid-to-center offset corrected per tick.
	pub center_strength: f64,
	/// Fraction of circle overlap corrected per tick.
	pub collide_strength: f64,
	/// Fraction of velocity lost per tick.
	pub velocity_decay: f64,
	/// Alpha below this stops the simulation.
	pub alpha_min: f64,
	/// Per-tick relaxation of alpha toward its target.
	pub alpha_decay: f64,
	/// Hard cap on free-running ticks. Convergence normally wins long
	/// before this; the cap guarantees termination even if it does not.
	pub max_free_ticks: u32,
}

impl Default for SimulationConfig {
	fn default() -> Self {
		Self {
			link_strength: 0.5,
			link_distance_base: 30.0,
			charge_strength: -300.0,
			charge_distance_max: 400.0,
			center_strength: 0.05,
			collide_strength: 1.0,
			velocity_decay: 0.4,
			alpha_min: 0.001,
			alpha_decay: 1.0 - 0.001_f64.powf(1.0 / 300.0),
			max_free_ticks: 1000,
		}
	}
}

/// The running simulation: node state, resolved links, cooling state.
pub struct Simulation {
	nodes: Vec<SimNode>,
	links: Vec<SimLink>,
	config: SimulationConfig,
	center: (f64, f64),
	alpha: f64,
	alpha_target: f64,
	free_ticks: u32,
	stopped: bool,
}

impl Simulation {
	/// Build a fresh simulation from node weights and index-resolved links.
	///
	/// `links` entries are `(source, target, weight)` with indices into
	/// `values`; entries referencing out-of-range indices are skipped.
	/// Nodes are seeded on a circle around the canvas center so the first
	/// ticks pull a recognizable shape out of a non-degenerate start.
	pub fn new(
		values: &[f64],
		links: &[(usize, usize, f64)],
		width: f64,
		height: f64,
		config: SimulationConfig,
	) -> Self {
		let center = (width / 2.0, height / 2.0);
		let n = values.len();

		let nodes = values
			.iter()
			.enumerate()
			.map(|(i, &value)| {
				let angle = i as f64 * std::f64::consts::TAU / n.max(1) as f64;
				SimNode {
					x: center.0 + 100.0 * angle.cos(),
					y: center.1 + 100.0 * angle.sin(),
					vx: 0.0,
					vy: 0.0,
					pin: None,
					radius: node_radius(value),
				}
			})
			.collect::<Vec<_>>();

		let links = links
			.iter()
			.filter(|&&(s, t, _)| s < n && t < n)
			.map(|&(source, target, weight)| SimLink {
				source,
				target,
				distance: config.link_distance_base + weight.max(0.0),
			})
			.collect();

		Self {
			stopped: nodes.is_empty(),
			nodes,
			links,
			config,
			center,
			alpha: 1.0,
			alpha_target: 0.0,
			free_ticks: 0,
		}
	}

	pub fn nodes(&self) -> &[SimNode] {
		&self.nodes
	}

	pub fn links(&self) -> &[SimLink] {
		&self.links
	}

	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	/// Whether the next `tick` will still move anything.
	pub fn is_running(&self) -> bool {
		!self.stopped
	}

	/// Freeze the simulation. No later tick mutates any position.
	pub fn stop(&mut self) {
		self.stopped = true;
	}

	/// Raise the cooling target and resume, e.g. while a node is dragged.
	/// Resets the free-tick budget so the resettling run is bounded again.
	pub fn reheat(&mut self, alpha_target: f64) {
		if self.nodes.is_empty() {
			return;
		}
		self.alpha_target = alpha_target;
		self.alpha = self.alpha.max(alpha_target);
		self.free_ticks = 0;
		self.stopped = false;
	}

	/// Lower the cooling target back toward free decay (drag released).
	pub fn set_alpha_target(&mut self, alpha_target: f64) {
		self.alpha_target = alpha_target;
	}

	/// Pin a node to a fixed position until [`Simulation::unpin`].
	pub fn pin(&mut self, index: usize, x: f64, y: f64) {
		if let Some(node) = self.nodes.get_mut(index) {
			node.pin = Some((x, y));
		}
	}

	/// Release a pinned node back to free simulation.
	pub fn unpin(&mut self, index: usize) {
		if let Some(node) = self.nodes.get_mut(index) {
			node.pin = None;
		}
	}

	/// Move the centering attractor, e.g. after a canvas resize.
	pub fn set_center(&mut self, width: f64, height: f64) {
		self.center = (width / 2.0, height / 2.0);
	}

	/// Advance the simulation one step: cool, apply forces, integrate.
	pub fn tick(&mut self) {
		if self.stopped {
			return;
		}

		self.alpha += (self.alpha_target - self.alpha) * self.config.alpha_decay;
		if self.alpha < self.config.alpha_min {
			self.stopped = true;
			return;
		}
		if self.alpha_target < self.config.alpha_min {
			self.free_ticks += 1;
			if self.free_ticks > self.config.max_free_ticks {
				self.stopped = true;
				return;
			}
		}

		self.apply_link_force();
		self.apply_charge_force();
		self.apply_collide_force();
		self.apply_center_force();
		self.integrate();
	}

	/// Pull linked pairs toward their rest distance, correction split
	/// evenly between the endpoints.
	fn apply_link_force(&mut self) {
		for i in 0..self.links.len() {
			let SimLink {
				source: s,
				target: t,
				distance,
			} = self.links[i];

			let dx = (self.nodes[t].x + self.nodes[t].vx) - (self.nodes[s].x + self.nodes[s].vx);
			let dy = (self.nodes[t].y + self.nodes[t].vy) - (self.nodes[s].y + self.nodes[s].vy);
			let dist = (dx * dx + dy * dy).sqrt().max(1e-6);

			let l = (dist - distance) / dist * self.alpha * self.config.link_strength;
			let (fx, fy) = (dx * l, dy * l);

			self.nodes[t].vx -= fx * 0.5;
			self.nodes[t].vy -= fy * 0.5;
			self.nodes[s].vx += fx * 0.5;
			self.nodes[s].vy += fy * 0.5;
		}
	}

	/// Pairwise repulsion, inverse-square in distance, skipped beyond the
	/// interaction cutoff.
	fn apply_charge_force(&mut self) {
		let max_d2 = self.config.charge_distance_max * self.config.charge_distance_max;
		let n = self.nodes.len();

		for i in 0..n {
			for j in (i + 1)..n {
				let dx = self.nodes[j].x - self.nodes[i].x;
				let dy = self.nodes[j].y - self.nodes[i].y;
				let d2 = (dx * dx + dy * dy).max(1.0);
				if d2 >= max_d2 {
					continue;
				}

				let dist = d2.sqrt();
				let w = self.config.charge_strength * self.alpha / d2;
				let (fx, fy) = (dx / dist * w, dy / dist * w);

				self.nodes[i].vx += fx;
				self.nodes[i].vy += fy;
				self.nodes[j].vx -= fx;
				self.nodes[j].vy -= fy;
			}
		}
	}

	/// Push apart pairs whose visual circles overlap, weighted so the
	/// smaller circle yields more.
	fn apply_collide_force(&mut self) {
		let n = self.nodes.len();

		for i in 0..n {
			for j in (i + 1)..n {
				let r = self.nodes[i].radius + self.nodes[j].radius;
				let mut dx =
					(self.nodes[j].x + self.nodes[j].vx) - (self.nodes[i].x + self.nodes[i].vx);
				let mut dy =
					(self.nodes[j].y + self.nodes[j].vy) - (self.nodes[i].y + self.nodes[i].vy);
				let mut d2 = dx * dx + dy * dy;
				if d2 >= r * r {
					continue;
				}
				if d2 < 1e-12 {
					// Coincident pair: deterministic nudge along x.
					dx = 1e-6 * (j - i) as f64;
					dy = 0.0;
					d2 = dx * dx;
				}

				let dist = d2.sqrt();
				let l = (r - dist) / dist * self.config.collide_strength;
				let (fx, fy) = (dx * l, dy * l);

				let ri2 = self.nodes[i].radius * self.nodes[i].radius;
				let rj2 = self.nodes[j].radius * self.nodes[j].radius;
				let wj = rj2 / (ri2 + rj2);

				self.nodes[i].vx -= fx * wj;
				self.nodes[i].vy -= fy * wj;
				self.nodes[j].vx += fx * (1.0 - wj);
				self.nodes[j].vy += fy * (1.0 - wj);
			}
		}
	}

	/// Nudge the whole system so its centroid drifts toward the canvas
	/// center. Applied to positions of free nodes only, so a dragged node
	/// is never fought over.
	fn apply_center_force(&mut self) {
		let n = self.nodes.len();
		if n == 0 {
			return;
		}

		let (mut sx, mut sy) = (0.0, 0.0);
		for node in &self.nodes {
			sx += node.x;
			sy += node.y;
		}
		let (cx, cy) = (sx / n as f64, sy / n as f64);
		let dx = (self.center.0 - cx) * self.config.center_strength;
		let dy = (self.center.1 - cy) * self.config.center_strength;

		for node in &mut self.nodes {
			if node.pin.is_none() {
				node.x += dx;
				node.y += dy;
			}
		}
	}

	fn integrate(&mut self) {
		let keep = 1.0 - self.config.velocity_decay;
		for node in &mut self.nodes {
			node.vx *= keep;
			node.vy *= keep;
			match node.pin {
				Some((px, py)) => {
					node.x = px;
					node.y = py;
					node.vx = 0.0;
					node.vy = 0.0;
				}
				None => {
					node.x += node.vx;
					node.y += node.vy;
				}
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn run_to_rest(sim: &mut Simulation, max: usize) -> usize {
		let mut ticks = 0;
		while sim.is_running() && ticks < max {
			sim.tick();
			ticks += 1;
		}
		ticks
	}

	fn positions(sim: &Simulation) -> Vec<(f64, f64)> {
		sim.nodes().iter().map(|n| (n.x, n.y)).collect()
	}

	#[test]
	fn radius_has_floor_and_grows_with_weight() {
		assert_eq!(node_radius(0.0), 5.0);
		assert_eq!(node_radius(-3.0), 5.0);
		assert!(node_radius(1.0) < node_radius(4.0));
		assert!(node_radius(4.0) < node_radius(100.0));
		assert_eq!(node_radius(100.0), 10.0);
	}

	#[test]
	fn alpha_decays_and_simulation_converges() {
		let mut sim = Simulation::new(
			&[100.0, 50.0],
			&[(0, 1, 30.0)],
			800.0,
			600.0,
			SimulationConfig::default(),
		);

		let before = sim.alpha();
		sim.tick();
		assert!(sim.alpha() < before);

		let ticks = run_to_rest(&mut sim, 2000);
		assert!(!sim.is_running());
		assert!(ticks < 1500, "decay should terminate well under the cap");
	}

	#[test]
	fn free_tick_cap_terminates_a_non_cooling_run() {
		let config = SimulationConfig {
			alpha_decay: 0.0,
			..SimulationConfig::default()
		};
		let mut sim = Simulation::new(&[1.0, 1.0], &[], 800.0, 600.0, config);

		let ticks = run_to_rest(&mut sim, 5000);
		assert!(!sim.is_running());
		assert!(ticks <= 1001);
	}

	#[test]
	fn stop_freezes_all_positions() {
		let mut sim = Simulation::new(
			&[10.0, 10.0, 10.0],
			&[(0, 1, 5.0), (1, 2, 5.0)],
			800.0,
			600.0,
			SimulationConfig::default(),
		);
		for _ in 0..5 {
			sim.tick();
		}

		sim.stop();
		let frozen = positions(&sim);
		for _ in 0..20 {
			sim.tick();
		}
		assert_eq!(positions(&sim), frozen);
	}

	#[test]
	fn pinned_node_ignores_forces_until_released() {
		let mut sim = Simulation::new(
			&[10.0, 10.0],
			&[(0, 1, 5.0)],
			800.0,
			600.0,
			SimulationConfig::default(),
		);

		sim.pin(0, 50.0, 60.0);
		for _ in 0..10 {
			sim.tick();
		}
		assert_eq!((sim.nodes()[0].x, sim.nodes()[0].y), (50.0, 60.0));

		sim.unpin(0);
		sim.reheat(0.3);
		for _ in 0..10 {
			sim.tick();
		}
		assert_ne!((sim.nodes()[0].x, sim.nodes()[0].y), (50.0, 60.0));
	}

	#[test]
	fn reheat_resumes_a_converged_simulation() {
		let mut sim = Simulation::new(&[1.0, 1.0], &[(0, 1, 1.0)], 800.0, 600.0, Default::default());
		run_to_rest(&mut sim, 2000);
		assert!(!sim.is_running());

		sim.reheat(0.3);
		assert!(sim.is_running());
		sim.tick();
		assert!(sim.alpha() >= 0.3);

		// Back to free decay: it converges again on its own.
		sim.set_alpha_target(0.0);
		run_to_rest(&mut sim, 2000);
		assert!(!sim.is_running());
	}

	#[test]
	fn out_of_range_links_are_skipped() {
		let sim = Simulation::new(&[1.0], &[(0, 5, 1.0), (3, 0, 1.0)], 800.0, 600.0, Default::default());
		assert!(sim.links().is_empty());
	}

	#[test]
	fn empty_input_is_inert() {
		let mut sim = Simulation::new(&[], &[], 800.0, 600.0, Default::default());
		assert!(!sim.is_running());
		sim.tick();
		sim.reheat(0.3);
		assert!(!sim.is_running());
	}

	#[test]
	fn unlinked_nodes_repel() {
		let mut sim = Simulation::new(&[1.0, 1.0], &[], 800.0, 600.0, Default::default());
		let d0 = distance(&sim, 0, 1);
		for _ in 0..30 {
			sim.tick();
		}
		assert!(distance(&sim, 0, 1) > d0);
	}

	#[test]
	fn linked_nodes_attract_from_afar() {
		// Seeded on opposite sides of the circle, 200 apart, rest length 31.
		let mut sim = Simulation::new(&[1.0, 1.0], &[(0, 1, 1.0)], 800.0, 600.0, Default::default());
		let d0 = distance(&sim, 0, 1);
		run_to_rest(&mut sim, 2000);
		assert!(distance(&sim, 0, 1) < d0);
	}

	#[test]
	fn overlapping_circles_separate() {
		let config = SimulationConfig {
			charge_strength: 0.0,
			center_strength: 0.0,
			..SimulationConfig::default()
		};
		let mut sim = Simulation::new(&[100.0, 100.0], &[], 800.0, 600.0, config);

		// Force overlap through pins, then release.
		sim.pin(0, 400.0, 300.0);
		sim.pin(1, 404.0, 300.0);
		sim.tick();
		sim.unpin(0);
		sim.unpin(1);
		sim.reheat(0.3);
		for _ in 0..200 {
			sim.tick();
		}

		let min_gap = sim.nodes()[0].radius + sim.nodes()[1].radius;
		assert!(distance(&sim, 0, 1) >= min_gap - 0.5);
	}

	#[test]
	fn lone_node_drifts_toward_center() {
		let mut sim = Simulation::new(&[1.0], &[], 800.0, 600.0, Default::default());
		let from_center = |s: &Simulation| {
			let n = &s.nodes()[0];
			((n.x - 400.0).powi(2) + (n.y - 300.0).powi(2)).sqrt()
		};
		let d0 = from_center(&sim);
		run_to_rest(&mut sim, 2000);
		assert!(from_center(&sim) < d0);
	}

	#[test]
	fn identical_inputs_reach_identical_rest_states() {
		let build = || {
			Simulation::new(
				&[100.0, 50.0, 25.0],
				&[(0, 1, 30.0), (0, 2, 10.0)],
				800.0,
				600.0,
				SimulationConfig::default(),
			)
		};
		let (mut a, mut b) = (build(), build());
		run_to_rest(&mut a, 2000);
		run_to_rest(&mut b, 2000);

		for (na, nb) in a.nodes().iter().zip(b.nodes()) {
			assert!((na.x - nb.x).abs() < 1e-9);
			assert!((na.y - nb.y).abs() < 1e-9);
		}
	}

	fn distance(sim: &Simulation, i: usize, j: usize) -> f64 {
		let (a, b) = (&sim.nodes()[i], &sim.nodes()[j]);
		((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
	}
}
