//! Leptos component hosting a block diagram on a canvas.
//!
//! The component keeps one [`CanvasSurface`] for its lifetime and rebuilds
//! the [`DiagramState`] whenever a new payload arrives. Mouse handlers feed
//! the gesture controller. There is no animation loop: the canvas repaints
//! only on load, pointer and resize events.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::ev;
use leptos::prelude::*;
use log::{error, info, warn};
use web_sys::{HtmlCanvasElement, MouseEvent};

use super::interaction::{Gesture, InteractionConfig};
use super::render::CanvasSurface;
use super::state::{DiagramConfig, DiagramState};
use super::theme::Theme;
use super::types::DiagramPayload;

/// The surface plus the diagram currently drawn on it, if any.
struct DiagramContext {
	surface: CanvasSurface,
	state: Option<DiagramState>,
}

/// Renders an interactive block diagram on a canvas element.
///
/// Pass payloads via the reactive `payload` signal; each new value triggers a
/// full parse, layout and render. A payload that fails to build is logged
/// and the previous diagram stays on screen. `base` prefixes drill-down URLs.
/// The canvas sizes itself to its parent container by default; set
/// `fullscreen = true` to size it to the window. Explicit `width`/`height`
/// override automatic sizing.
#[component]
pub fn BlockDiagramCanvas(
	#[prop(into)] payload: Signal<Option<DiagramPayload>>,
	#[prop(into, default = String::new())] base: String,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: Rc<RefCell<Option<DiagramContext>>> = Rc::new(RefCell::new(None));
	let config = DiagramConfig {
		interaction: InteractionConfig {
			base,
			..InteractionConfig::default()
		},
		..DiagramConfig::default()
	};

	let context_init = context.clone();
	Effect::new(move |_| {
		let payload = payload.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let Some(payload) = payload else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let (w, h) = viewport_size(&canvas, fullscreen, width, height);

		let mut slot = context_init.borrow_mut();
		if slot.is_none() {
			match CanvasSurface::new(canvas, Theme::default()) {
				Ok(surface) => {
					*slot = Some(DiagramContext {
						surface,
						state: None,
					})
				}
				Err(e) => {
					error!("block-diagram: {}", e);
					return;
				}
			}
		}
		let Some(c) = slot.as_mut() else {
			return;
		};

		match DiagramState::build(&payload.data, payload.kind, w, h, &config) {
			Ok(mut state) => {
				state.render(&mut c.surface);
				info!(
					"block-diagram: rendered {} ({} nodes, {} edges)",
					payload.kind,
					state.nodes.len(),
					state.edges.len()
				);
				c.state = Some(state);
			}
			Err(e) => warn!("block-diagram: not rendering {}: {}", payload.kind, e),
		}
	});

	let context_resize = context.clone();
	let resize_handle = window_event_listener(ev::resize, move |_| {
		let Some(canvas) = canvas_ref.get_untracked() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let (w, h) = viewport_size(&canvas, fullscreen, width, height);
		if let Some(ref mut c) = *context_resize.borrow_mut() {
			if let Some(ref mut state) = c.state {
				state.resize(w, h, &mut c.surface);
			}
		}
	});
	on_cleanup(move || resize_handle.remove());

	let context_md = context.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = surface_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *context_md.borrow_mut() {
			if let Some(ref mut state) = c.state {
				state.pointer_down(x, y);
			}
		}
	};

	let context_mm = context.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = surface_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *context_mm.borrow_mut() {
			if let Some(ref mut state) = c.state {
				state.pointer_move(x, y, &mut c.surface);
			}
		}
	};

	let context_mu = context.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let Some((x, y)) = surface_point(canvas_ref, &ev) else {
			return;
		};
		let gesture = match *context_mu.borrow_mut() {
			Some(ref mut c) => match c.state {
				Some(ref mut state) => state.pointer_up(x, y, &mut c.surface),
				None => Gesture::Ignored,
			},
			None => Gesture::Ignored,
		};
		if let Gesture::DrillDown { identity, url } = gesture {
			info!("block-diagram: drilling down into {}", identity);
			navigate(&url);
		}
	};

	let context_ml = context.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_ml.borrow_mut() {
			if let Some(ref mut state) = c.state {
				state.pointer_cancel(&mut c.surface);
			}
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="block-diagram"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			style="display: block; cursor: pointer;"
		/>
	}
}

/// Size the diagram should lay out for: the window when fullscreen, else the
/// explicit size or the parent container (at least 400px tall).
fn viewport_size(
	canvas: &HtmlCanvasElement,
	fullscreen: bool,
	width: Option<f64>,
	height: Option<f64>,
) -> (f64, f64) {
	if fullscreen {
		if let Some(window) = web_sys::window() {
			let w = window.inner_width().ok().and_then(|v| v.as_f64());
			let h = window.inner_height().ok().and_then(|v| v.as_f64());
			if let (Some(w), Some(h)) = (w, h) {
				return (w, h);
			}
		}
	}
	let parent = canvas.parent_element();
	let w = width.unwrap_or_else(|| {
		parent
			.as_ref()
			.map(|p| p.client_width() as f64)
			.filter(|w| *w > 0.0)
			.unwrap_or(800.0)
	});
	let h = height.unwrap_or_else(|| {
		parent
			.as_ref()
			.map(|p| p.client_height() as f64)
			.filter(|h| *h > 0.0)
			.unwrap_or(600.0)
			.max(400.0)
	});
	(w, h)
}

/// Pointer position in canvas coordinates.
fn surface_point(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get_untracked()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

fn navigate(url: &str) {
	let Some(window) = web_sys::window() else {
		return;
	};
	if let Err(e) = window.location().set_href(url) {
		warn!("block-diagram: navigation to {} failed: {:?}", url, e);
	}
}
