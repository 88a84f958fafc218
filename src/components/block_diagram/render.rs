//! Canvas 2D backend for the scene graph.
//!
//! Painting order is owned by [`super::scene::SceneGraph::present`]; this
//! module only knows how to draw one background, one block and one edge.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::error::{DiagramError, DiagramResult};
use super::scene::{Arrowhead, BlockVisual, EdgeVisual, Surface};
use super::theme::Theme;
use super::types::RelationKind;

/// A [`Surface`] backed by a `<canvas>` element.
///
/// A canvas has no retained marker definitions, so the arrowhead is kept
/// here after it is first defined and stamped at the end of every edge.
pub struct CanvasSurface {
	canvas: HtmlCanvasElement,
	ctx: CanvasRenderingContext2d,
	theme: Theme,
	arrowhead: Option<Arrowhead>,
}

impl CanvasSurface {
	pub fn new(canvas: HtmlCanvasElement, theme: Theme) -> DiagramResult<Self> {
		let ctx = canvas
			.get_context("2d")
			.map_err(|e| DiagramError::Canvas(format!("{:?}", e)))?
			.ok_or_else(|| DiagramError::Canvas("2d context not supported".to_string()))?
			.dyn_into::<CanvasRenderingContext2d>()
			.map_err(|_| DiagramError::Canvas("context is not a 2d context".to_string()))?;
		Ok(Self {
			canvas,
			ctx,
			theme,
			arrowhead: None,
		})
	}

	fn draw_background(&self, width: f64, height: f64) {
		let ctx = &self.ctx;
		let background = &self.theme.background;
		let gradient = if background.use_gradient {
			ctx.create_radial_gradient(
				width / 2.0,
				height / 2.0,
				0.0,
				width / 2.0,
				height / 2.0,
				width.max(height) * 0.8,
			)
			.ok()
		} else {
			None
		};

		match gradient {
			Some(gradient) => {
				let _ = gradient.add_color_stop(0.0, &background.color_secondary.to_css());
				let _ = gradient.add_color_stop(1.0, &background.color.to_css());
				#[allow(deprecated)]
				ctx.set_fill_style(&gradient);
			}
			None => ctx.set_fill_style_str(&background.color.to_css()),
		}
		ctx.fill_rect(0.0, 0.0, width, height);
	}

	fn rounded_rect_path(&self, x: f64, y: f64, w: f64, h: f64, r: f64) {
		let ctx = &self.ctx;
		let r = r.min(w / 2.0).min(h / 2.0);
		ctx.begin_path();
		ctx.move_to(x + r, y);
		ctx.line_to(x + w - r, y);
		ctx.quadratic_curve_to(x + w, y, x + w, y + r);
		ctx.line_to(x + w, y + h - r);
		ctx.quadratic_curve_to(x + w, y + h, x + w - r, y + h);
		ctx.line_to(x + r, y + h);
		ctx.quadratic_curve_to(x, y + h, x, y + h - r);
		ctx.line_to(x, y + r);
		ctx.quadratic_curve_to(x, y, x + r, y);
		ctx.close_path();
	}
}

impl Surface for CanvasSurface {
	fn clear(&mut self, width: f64, height: f64) {
		// Resizing the backing store also resets the context state.
		if self.canvas.width() != width as u32 || self.canvas.height() != height as u32 {
			self.canvas.set_width(width as u32);
			self.canvas.set_height(height as u32);
		}
		self.ctx.clear_rect(0.0, 0.0, width, height);
		self.draw_background(width, height);
	}

	fn has_arrowhead(&self) -> bool {
		self.arrowhead.is_some()
	}

	fn define_arrowhead(&mut self, marker: &Arrowhead) {
		self.arrowhead = Some(marker.clone());
	}

	fn draw_block(&mut self, block: &BlockVisual) {
		let ctx = &self.ctx;
		let style = &self.theme.block;
		let label = &self.theme.label;
		let rect = block.rect;

		ctx.set_global_alpha(if block.lifted { style.drag_alpha } else { 1.0 });

		self.rounded_rect_path(rect.x, rect.y, rect.width, rect.height, style.corner_radius);
		ctx.set_fill_style_str(&style.fill.to_css());
		ctx.fill();

		ctx.save();
		ctx.clip();
		ctx.set_fill_style_str(&self.theme.accent(block.kind).to_css());
		ctx.fill_rect(rect.x, rect.y, style.accent_width, rect.height);
		ctx.restore();

		self.rounded_rect_path(rect.x, rect.y, rect.width, rect.height, style.corner_radius);
		ctx.set_stroke_style_str(&style.border_color.to_css());
		ctx.set_line_width(style.border_width);
		ctx.stroke();

		ctx.set_font(&label.title_font);
		ctx.set_fill_style_str(&label.title_color.to_css());
		let _ = ctx.fill_text(&block.title, rect.x + label.inset_x, rect.y + label.title_y);

		if let Some(subtitle) = &block.subtitle {
			ctx.set_font(&label.subtitle_font);
			ctx.set_fill_style_str(&label.subtitle_color.to_css());
			let _ = ctx.fill_text(subtitle, rect.x + label.inset_x, rect.y + label.subtitle_y);
		}

		ctx.set_global_alpha(1.0);
	}

	fn draw_edge(&mut self, edge: &EdgeVisual) {
		let ctx = &self.ctx;
		let style = &self.theme.edge;
		let ((x1, y1), (x2, y2)) = (edge.from, edge.to);
		let (dx, dy) = (x2 - x1, y2 - y1);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			return;
		}
		let (ux, uy) = (dx / dist, dy / dist);

		match edge.kind {
			RelationKind::Process => {
				let _ = ctx.set_line_dash(&js_sys::Array::of2(
					&JsValue::from_f64(style.process_dash.0),
					&JsValue::from_f64(style.process_dash.1),
				));
			}
			RelationKind::Product => {
				let _ = ctx.set_line_dash(&js_sys::Array::new());
			}
		}

		ctx.set_stroke_style_str(&style.color.to_css());
		ctx.set_line_width(style.width);
		ctx.begin_path();
		ctx.move_to(x1, y1);
		ctx.line_to(x2, y2);
		ctx.stroke();
		let _ = ctx.set_line_dash(&js_sys::Array::new());

		let Some(marker) = &self.arrowhead else {
			return;
		};
		// Marker units are scaled by the stroke width, as with SVG markers.
		let scaled = Arrowhead {
			ref_x: marker.ref_x * style.width,
			ref_y: marker.ref_y * style.width,
			points: marker.points.map(|(mx, my)| (mx * style.width, my * style.width)),
		};
		let [a, b, c] = scaled.placed((x2, y2), ux, uy);
		ctx.set_fill_style_str(&style.color.to_css());
		ctx.begin_path();
		ctx.move_to(a.0, a.1);
		ctx.line_to(b.0, b.1);
		ctx.line_to(c.0, c.1);
		ctx.close_path();
		ctx.fill();
	}
}
