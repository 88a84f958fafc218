//! Pointer gestures: dragging blocks and drill-down clicks.
//!
//! The controller is a small state machine fed with surface coordinates by
//! the canvas component. A press that never travels past the drag threshold
//! is a click and drills down; once it travels, the gesture is a drag and can
//! no longer drill down. Only a finished drag writes node bounds.

use std::mem;

use log::debug;

use super::scene::SceneGraph;
use super::types::{Bounds, NodeRecord};

/// Interaction tuning and drill-down target.
#[derive(Clone, Debug)]
pub struct InteractionConfig {
	/// Distance in pixels a press must travel before it becomes a drag.
	pub drag_threshold: f64,
	/// Prefix for drill-down URLs, supplied by the hosting page.
	pub base: String,
}

impl Default for InteractionConfig {
	fn default() -> Self {
		Self {
			drag_threshold: 3.0,
			base: String::new(),
		}
	}
}

#[derive(Clone, Debug, Default, PartialEq)]
enum PointerState {
	#[default]
	Idle,
	Pressed {
		index: usize,
		start_x: f64,
		start_y: f64,
		offset_x: f64,
		offset_y: f64,
	},
	Dragging {
		index: usize,
		offset_x: f64,
		offset_y: f64,
	},
}

/// What a pointer event amounted to; the caller performs the side effect.
#[derive(Clone, Debug, PartialEq)]
pub enum Gesture {
	/// Nothing to do.
	Ignored,
	/// A block's visual moved; repaint the surface.
	Moved { index: usize, rect: Bounds },
	/// A drag finished and its position was written to the node record;
	/// edges must be re-rendered.
	Committed { index: usize, bounds: Bounds },
	/// A click on a block; navigate to `url`.
	DrillDown { identity: String, url: String },
}

#[derive(Clone, Debug, Default)]
pub struct InteractionController {
	config: InteractionConfig,
	pointer: PointerState,
}

impl InteractionController {
	pub fn new(config: InteractionConfig) -> Self {
		Self {
			config,
			pointer: PointerState::Idle,
		}
	}

	pub fn config(&self) -> &InteractionConfig {
		&self.config
	}

	pub fn is_dragging(&self) -> bool {
		matches!(self.pointer, PointerState::Dragging { .. })
	}

	/// Start a gesture. Returns the pressed block, if any.
	pub fn pointer_down(&mut self, x: f64, y: f64, scene: &SceneGraph) -> Option<usize> {
		let index = scene.hit_test(x, y)?;
		let rect = scene.block(index)?.rect;
		self.pointer = PointerState::Pressed {
			index,
			start_x: x,
			start_y: y,
			offset_x: x - rect.x,
			offset_y: y - rect.y,
		};
		Some(index)
	}

	pub fn pointer_move(&mut self, x: f64, y: f64, scene: &mut SceneGraph) -> Gesture {
		if let PointerState::Pressed {
			index,
			start_x,
			start_y,
			offset_x,
			offset_y,
		} = self.pointer
		{
			if (x - start_x).hypot(y - start_y) <= self.config.drag_threshold {
				return Gesture::Ignored;
			}
			debug!("block-diagram: drag started on block {}", index);
			self.pointer = PointerState::Dragging {
				index,
				offset_x,
				offset_y,
			};
		}

		match self.pointer {
			PointerState::Dragging {
				index,
				offset_x,
				offset_y,
			} => match scene.move_block(index, x - offset_x, y - offset_y) {
				Some(rect) => Gesture::Moved { index, rect },
				None => Gesture::Ignored,
			},
			_ => Gesture::Ignored,
		}
	}

	/// Finish a gesture: commit a drag or resolve a click into a drill-down.
	pub fn pointer_up(
		&mut self,
		x: f64,
		y: f64,
		nodes: &mut [NodeRecord],
		scene: &mut SceneGraph,
	) -> Gesture {
		match mem::take(&mut self.pointer) {
			PointerState::Idle => Gesture::Ignored,
			PointerState::Pressed { index, .. } => match nodes.get(index) {
				Some(node) => {
					let identity = drill_down_identity(node, index);
					let url = drill_down_url(&self.config.base, &identity);
					Gesture::DrillDown { identity, url }
				}
				None => Gesture::Ignored,
			},
			PointerState::Dragging {
				index,
				offset_x,
				offset_y,
			} => {
				scene.move_block(index, x - offset_x, y - offset_y);
				commit(index, nodes, scene)
			}
		}
	}

	/// The pointer left the surface. A drag is committed where its block
	/// currently is; a press is dropped without drilling down.
	pub fn cancel(&mut self, nodes: &mut [NodeRecord], scene: &SceneGraph) -> Gesture {
		match mem::take(&mut self.pointer) {
			PointerState::Dragging { index, .. } => commit(index, nodes, scene),
			_ => Gesture::Ignored,
		}
	}
}

fn commit(index: usize, nodes: &mut [NodeRecord], scene: &SceneGraph) -> Gesture {
	let (Some(node), Some(block)) = (nodes.get_mut(index), scene.block(index)) else {
		return Gesture::Ignored;
	};
	node.bounds = Bounds {
		x: block.rect.x.max(0.0),
		y: block.rect.y.max(0.0),
		..node.bounds
	};
	debug!(
		"block-diagram: committed {} at ({}, {})",
		node.identity, node.bounds.x, node.bounds.y
	);
	Gesture::Committed {
		index,
		bounds: node.bounds,
	}
}

/// The identity a block drills down into: its id, else its name, else the
/// block's position in the diagram.
pub fn drill_down_identity(node: &NodeRecord, index: usize) -> String {
	node.id
		.as_deref()
		.filter(|id| !id.is_empty())
		.or_else(|| Some(node.name.as_str()).filter(|name| !name.is_empty()))
		.map(str::to_string)
		.unwrap_or_else(|| format!("block-{index}"))
}

pub fn drill_down_url(base: &str, identity: &str) -> String {
	format!("{}/{}", base, urlencoding::encode(identity))
}
