//! Deterministic block placement.
//!
//! Tree kinds are laid out as a vertical stack indented by depth, so the
//! pre-order record sequence reads like an outline. Flat kinds are placed on
//! a fixed card grid. Both passes are pure functions of the record order, the
//! viewport width and the config, so running layout twice is a no-op.

use super::types::{Bounds, NodeRecord};

/// Which placement a record gets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutStrategy {
	IndentedStack,
	Grid,
}

impl LayoutStrategy {
	pub fn for_node(node: &NodeRecord) -> Self {
		if node.kind.is_hierarchical() {
			LayoutStrategy::IndentedStack
		} else {
			LayoutStrategy::Grid
		}
	}
}

/// Depth-indented stack parameters.
#[derive(Clone, Debug)]
pub struct StackConfig {
	/// Preferred block width at depth 0.
	pub default_width: f64,
	/// Narrowest a block may get after indentation.
	pub min_width: f64,
	pub height: f64,
	/// Vertical space between consecutive blocks.
	pub gap: f64,
	/// Outer margin on every side.
	pub margin: f64,
	/// Horizontal offset per depth level.
	pub indent: f64,
}

/// Card grid parameters.
#[derive(Clone, Debug)]
pub struct GridConfig {
	pub origin_x: f64,
	pub origin_y: f64,
	pub columns: usize,
	pub column_stride: f64,
	pub row_stride: f64,
	pub card_width: f64,
	pub card_height: f64,
}

/// Complete layout configuration.
#[derive(Clone, Debug)]
pub struct LayoutConfig {
	pub stack: StackConfig,
	pub grid: GridConfig,
}

impl Default for LayoutConfig {
	fn default() -> Self {
		Self {
			stack: StackConfig {
				default_width: 220.0,
				min_width: 120.0,
				height: 72.0,
				gap: 16.0,
				margin: 24.0,
				indent: 32.0,
			},
			grid: GridConfig {
				origin_x: 100.0,
				origin_y: 100.0,
				columns: 4,
				column_stride: 250.0,
				row_stride: 200.0,
				card_width: 200.0,
				card_height: 150.0,
			},
		}
	}
}

impl StackConfig {
	fn place(&self, index: usize, depth: usize, viewport_width: f64) -> Bounds {
		let indent = depth as f64 * self.indent;
		let available = self.default_width.min(viewport_width - 2.0 * self.margin);
		Bounds {
			x: self.margin + indent,
			y: self.margin + index as f64 * (self.height + self.gap),
			width: (available - indent).max(self.min_width),
			height: self.height,
		}
	}
}

impl GridConfig {
	fn place(&self, index: usize) -> Bounds {
		let columns = self.columns.max(1);
		Bounds {
			x: self.origin_x + (index % columns) as f64 * self.column_stride,
			y: self.origin_y + (index / columns) as f64 * self.row_stride,
			width: self.card_width,
			height: self.card_height,
		}
	}
}

/// Assign bounds to every record in place.
pub fn layout(nodes: &mut [NodeRecord], viewport_width: f64, config: &LayoutConfig) {
	for (index, node) in nodes.iter_mut().enumerate() {
		node.bounds = match LayoutStrategy::for_node(node) {
			LayoutStrategy::IndentedStack => config.stack.place(index, node.depth, viewport_width),
			LayoutStrategy::Grid => config.grid.place(index),
		};
	}
}

/// Bottom-right corner of the area covered by all blocks, used to size the surface.
pub fn content_extent(nodes: &[NodeRecord]) -> (f64, f64) {
	nodes.iter().fold((0.0, 0.0), |(w, h), node| {
		(f64::max(w, node.bounds.right()), f64::max(h, node.bounds.bottom()))
	})
}
