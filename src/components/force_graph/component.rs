//! Leptos component wrapping the expense-graph canvas.
//!
//! The component creates an HTML canvas element and wires up mouse/wheel
//! event handlers for node dragging, selection, panning, and zooming. An
//! animation loop runs via `requestAnimationFrame`, advancing the simulation
//! and rendering each frame. A stop flag set on cleanup guarantees that a
//! late frame callback against a torn-down view is a no-op, and a dataset
//! change stops the old simulation before the replacement starts.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::render;
use super::scale::ScaleConfig;
use super::state::{DragState, GraphState};
use super::theme::Theme;
use super::types::{GraphData, GraphNode};

/// A press that travels less than this many screen pixels is a click.
const CLICK_SLOP: f64 = 4.0;

/// Cooling target held while a node is dragged, so the layout keeps
/// resettling around the pinned node and after its release.
const DRAG_ALPHA_TARGET: f64 = 0.3;

/// Bundles graph state with visual configuration for the frame loop.
struct GraphContext {
	state: GraphState,
	scale: ScaleConfig,
	theme: Theme,
}

/// Renders an interactive expense-flow graph on a canvas element.
///
/// Pass graph data via the reactive `data` signal; a change to it discards
/// the running layout and starts a fresh one. The component sizes itself to
/// its parent container by default; set `fullscreen = true` to fill the
/// viewport and resize automatically with the window. Explicit
/// `width`/`height` override automatic sizing. Both callbacks are optional;
/// without them the interactions are purely visual.
#[component]
pub fn ExpenseGraph(
	#[prop(into)] data: Signal<GraphData>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
	#[prop(optional)] theme: Option<Theme>,
	#[prop(optional, into)] on_node_click: Option<Callback<GraphNode>>,
	#[prop(optional, into)] on_node_hover: Option<Callback<Option<GraphNode>>>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: Rc<RefCell<Option<GraphContext>>> = Rc::new(RefCell::new(None));
	let stopped: Rc<Cell<bool>> = Rc::new(Cell::new(false));
	let loop_started: Rc<Cell<bool>> = Rc::new(Cell::new(false));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));

	let theme = theme.unwrap_or_default();

	let (context_init, stopped_init, loop_init, animate_init, resize_cb_init) = (
		context.clone(),
		stopped.clone(),
		loop_started.clone(),
		animate.clone(),
		resize_cb.clone(),
	);

	Effect::new(move |_| {
		let graph = data.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let window: Window = web_sys::window().unwrap();

		let (w, h) = if fullscreen {
			(
				window.inner_width().unwrap().as_f64().unwrap(),
				window.inner_height().unwrap().as_f64().unwrap(),
			)
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		// Supersede any previous dataset's layout: it must be fully
		// stopped before the replacement starts driving the canvas.
		if let Some(mut old) = context_init.borrow_mut().take() {
			old.state.stop();
		}
		*context_init.borrow_mut() = Some(GraphContext {
			state: GraphState::new(&graph, w, h, &theme),
			scale: ScaleConfig::default(),
			theme: theme.clone(),
		});

		if loop_init.get() {
			return;
		}
		loop_init.set(true);

		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")
			.unwrap()
			.unwrap()
			.dyn_into()
			.unwrap();

		if fullscreen {
			let (context_resize, canvas_resize) = (context_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let win: Window = web_sys::window().unwrap();
				let (nw, nh) = (
					win.inner_width().unwrap().as_f64().unwrap(),
					win.inner_height().unwrap().as_f64().unwrap(),
				);
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut c) = *context_resize.borrow_mut() {
					c.state.resize(nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (context_anim, stopped_anim, animate_inner) = (
			context_init.clone(),
			stopped_init.clone(),
			animate_init.clone(),
		);
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			// Torn-down view: neither mutate nor reschedule.
			if stopped_anim.get() {
				return;
			}
			if let Some(ref mut c) = *context_anim.borrow_mut() {
				c.state.tick();
				render::render(&c.state, &ctx, &c.scale, &c.theme);
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				let _ = web_sys::window()
					.unwrap()
					.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let (context_cleanup, stopped_cleanup) = (context.clone(), stopped.clone());
	on_cleanup(move || {
		stopped_cleanup.set(true);
		if let Some(ref mut c) = *context_cleanup.borrow_mut() {
			c.state.stop();
		}
	});

	let context_md = context.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let rect = canvas.get_bounding_client_rect();
		let (x, y) = (
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);

		if let Some(ref mut c) = *context_md.borrow_mut() {
			if let Some(idx) = c.state.node_at_position(x, y, &c.scale) {
				let (gx, gy) = c.state.screen_to_graph(x, y);
				let node = &c.state.sim.nodes()[idx];
				let (nx, ny) = (node.x, node.y);
				c.state.drag = DragState {
					active: true,
					node: Some(idx),
					start_x: x,
					start_y: y,
					grab_dx: nx - gx,
					grab_dy: ny - gy,
					moved: false,
				};
				// Held position overrides the simulation until release.
				c.state.sim.pin(idx, nx, ny);
			} else {
				c.state.pan.active = true;
				c.state.pan.start_x = x;
				c.state.pan.start_y = y;
				c.state.pan.transform_start_x = c.state.transform.x;
				c.state.pan.transform_start_y = c.state.transform.y;
			}
		}
	};

	let context_mm = context.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let rect = canvas.get_bounding_client_rect();
		let (x, y) = (
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);

		if let Some(ref mut c) = *context_mm.borrow_mut() {
			if c.state.drag.active {
				if let Some(idx) = c.state.drag.node {
					if !c.state.drag.moved {
						let (dx, dy) = (x - c.state.drag.start_x, y - c.state.drag.start_y);
						if dx * dx + dy * dy > CLICK_SLOP * CLICK_SLOP {
							c.state.drag.moved = true;
							c.state.sim.reheat(DRAG_ALPHA_TARGET);
						}
					}
					let (gx, gy) = c.state.screen_to_graph(x, y);
					let (px, py) = (gx + c.state.drag.grab_dx, gy + c.state.drag.grab_dy);
					c.state.sim.pin(idx, px, py);
				}
			} else {
				let hovered = c.state.node_at_position(x, y, &c.scale);
				if hovered != c.state.highlight.hovered {
					c.state.set_hover(hovered);
					if let Some(cb) = on_node_hover {
						cb.run(hovered.map(|i| c.state.nodes[i].data.clone()));
					}
				}

				if c.state.pan.active {
					c.state.transform.x =
						c.state.pan.transform_start_x + (x - c.state.pan.start_x);
					c.state.transform.y =
						c.state.pan.transform_start_y + (y - c.state.pan.start_y);
				}
			}
		}
	};

	let context_mu = context.clone();
	let on_mouseup = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_mu.borrow_mut() {
			if c.state.drag.active {
				if let Some(idx) = c.state.drag.node {
					c.state.sim.unpin(idx);
					if c.state.drag.moved {
						// Back to free decay; the elevated alpha drains
						// off as the layout resettles.
						c.state.sim.set_alpha_target(0.0);
					} else {
						c.state.toggle_select(idx);
						if let Some(cb) = on_node_click {
							cb.run(c.state.nodes[idx].data.clone());
						}
					}
				}
			}
			c.state.drag = DragState::default();
			c.state.pan.active = false;
		}
	};

	let context_ml = context.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_ml.borrow_mut() {
			if let Some(idx) = c.state.drag.node {
				c.state.sim.unpin(idx);
				if c.state.drag.moved {
					c.state.sim.set_alpha_target(0.0);
				}
			}
			c.state.drag = DragState::default();
			c.state.pan.active = false;
			if c.state.highlight.hovered.is_some() {
				c.state.set_hover(None);
				if let Some(cb) = on_node_hover {
					cb.run(None);
				}
			}
		}
	};

	let context_wh = context.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let rect = canvas.get_bounding_client_rect();
		let (x, y) = (
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);

		if let Some(ref mut c) = *context_wh.borrow_mut() {
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			c.state.transform.zoom_about(factor, x, y);
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="expense-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}
