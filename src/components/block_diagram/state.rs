//! Diagram state for one render cycle.
//!
//! [`DiagramState::build`] runs the whole fallible pipeline (parse, strict
//! container checks, identity uniqueness, layout, relation resolution) before
//! anything touches a surface, so a rejected payload never leaves a
//! half-drawn diagram behind. The resulting state owns the node records, the
//! scene graph and the gesture controller until the next reload replaces it.

use std::collections::BTreeMap;

use log::debug;
use serde_json::Value;

use super::containers;
use super::error::DiagramResult;
use super::interaction::{Gesture, InteractionConfig, InteractionController};
use super::layout::{self, LayoutConfig};
use super::parser;
use super::relations;
use super::scene::{LabelConfig, SceneGraph, Surface};
use super::types::{Bounds, DiagramKind, Edge, NodeRecord};

/// Engine configuration, grouped per component.
#[derive(Clone, Debug, Default)]
pub struct DiagramConfig {
	pub layout: LayoutConfig,
	pub labels: LabelConfig,
	pub interaction: InteractionConfig,
}

/// Node records, edges and scene of the diagram currently on screen.
pub struct DiagramState {
	pub kind: DiagramKind,
	pub nodes: Vec<NodeRecord>,
	pub edges: Vec<Edge>,
	pub scene: SceneGraph,
	pub controller: InteractionController,
	layout: LayoutConfig,
	/// Bounds of dragged blocks by record index. These survive re-layout.
	pinned: BTreeMap<usize, Bounds>,
	width: f64,
	height: f64,
}

impl DiagramState {
	pub fn build(
		raw: &Value,
		kind: DiagramKind,
		width: f64,
		height: f64,
		config: &DiagramConfig,
	) -> DiagramResult<Self> {
		let mut nodes = parser::parse(raw, kind)?;
		containers::validate_all(&nodes)?;
		parser::ensure_unique_identities(&nodes)?;
		layout::layout(&mut nodes, width, &config.layout);
		let edges = relations::resolve(&nodes);
		debug!(
			"block-diagram: built {} diagram with {} nodes, {} edges",
			kind,
			nodes.len(),
			edges.len()
		);

		let mut state = Self {
			kind,
			nodes,
			edges,
			scene: SceneGraph::new(config.labels.clone(), width, height),
			controller: InteractionController::new(config.interaction.clone()),
			layout: config.layout.clone(),
			pinned: BTreeMap::new(),
			width,
			height,
		};
		let (w, h) = state.surface_extent();
		state.scene.resize(w, h);
		Ok(state)
	}

	/// Surface size: the viewport, grown to fit every block.
	pub fn surface_size(&self) -> (f64, f64) {
		self.scene.size()
	}

	/// Full declarative render of the current records.
	pub fn render<S: Surface>(&mut self, surface: &mut S) {
		self.scene.render(&self.nodes, &self.edges, surface);
	}

	/// Viewport changed: re-run layout for the new width and redraw. Blocks
	/// the user dragged keep their position until the next reload.
	pub fn resize<S: Surface>(&mut self, width: f64, height: f64, surface: &mut S) {
		self.width = width;
		self.height = height;
		layout::layout(&mut self.nodes, width, &self.layout);
		for (&index, &bounds) in &self.pinned {
			if let Some(node) = self.nodes.get_mut(index) {
				node.bounds = bounds;
			}
		}
		self.edges = relations::resolve(&self.nodes);
		let (w, h) = self.surface_extent();
		self.scene.resize(w, h);
		self.render(surface);
	}

	pub fn pointer_down(&mut self, x: f64, y: f64) -> Option<usize> {
		self.controller.pointer_down(x, y, &self.scene)
	}

	/// Pointer moved. Only a dragged block changes, so the display list is
	/// repainted as-is without re-routing edges.
	pub fn pointer_move<S: Surface>(&mut self, x: f64, y: f64, surface: &mut S) -> Gesture {
		let gesture = self.controller.pointer_move(x, y, &mut self.scene);
		if matches!(gesture, Gesture::Moved { .. }) {
			self.scene.present(surface);
		}
		gesture
	}

	/// Pointer released. A finished drag re-renders edges from the new
	/// position; a click is returned for the caller to navigate.
	pub fn pointer_up<S: Surface>(&mut self, x: f64, y: f64, surface: &mut S) -> Gesture {
		let gesture = self
			.controller
			.pointer_up(x, y, &mut self.nodes, &mut self.scene);
		self.after_gesture(&gesture, surface);
		gesture
	}

	pub fn pointer_cancel<S: Surface>(&mut self, surface: &mut S) -> Gesture {
		let gesture = self.controller.cancel(&mut self.nodes, &self.scene);
		self.after_gesture(&gesture, surface);
		gesture
	}

	fn after_gesture<S: Surface>(&mut self, gesture: &Gesture, surface: &mut S) {
		if let Gesture::Committed { index, bounds } = *gesture {
			self.pinned.insert(index, bounds);
			self.grow_to_fit();
			self.scene.rerender_edges(surface);
		}
	}

	fn grow_to_fit(&mut self) {
		let (width, height) = self.scene.size();
		let (right, bottom) = layout::content_extent(&self.nodes);
		let margin = self.layout.stack.margin;
		self.scene
			.resize(width.max(right + margin), height.max(bottom + margin));
	}

	fn surface_extent(&self) -> (f64, f64) {
		let (right, bottom) = layout::content_extent(&self.nodes);
		let margin = self.layout.stack.margin;
		(self.width.max(right + margin), self.height.max(bottom + margin))
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;
	use crate::components::block_diagram::error::DiagramError;
	use crate::components::block_diagram::scene::RecordingSurface;

	#[test]
	fn schema_error_aborts_build() {
		let raw = json!({ "capabilities": [{ "name": "Sell" }] });
		let result = DiagramState::build(
			&raw,
			DiagramKind::Capabilities,
			800.0,
			600.0,
			&DiagramConfig::default(),
		);
		assert!(matches!(result, Err(DiagramError::MissingField { .. })));
	}

	#[test]
	fn surface_grows_to_fit_content() {
		let teams: Vec<_> = (0..12).map(|i| json!({ "name": format!("t{i}") })).collect();
		let state = DiagramState::build(
			&json!({ "teams": teams }),
			DiagramKind::Teams,
			800.0,
			300.0,
			&DiagramConfig::default(),
		)
		.unwrap();
		// Four columns end at 850 + 200; three rows at 100 + 2 * 200 + 150.
		assert_eq!(state.surface_size(), (1074.0, 674.0));
	}

	#[test]
	fn resize_relayouts_for_new_width() {
		let raw = json!({ "capabilities": [{ "name": "A", "description": "a" }] });
		let mut state = DiagramState::build(
			&raw,
			DiagramKind::Capabilities,
			1000.0,
			600.0,
			&DiagramConfig::default(),
		)
		.unwrap();
		let mut surface = RecordingSurface::new();
		state.render(&mut surface);
		assert_eq!(state.nodes[0].bounds.width, 220.0);

		state.resize(200.0, 600.0, &mut surface);
		assert_eq!(state.nodes[0].bounds.width, 152.0);
		assert_eq!(surface.blocks().next().unwrap().rect.width, 152.0);
	}

	#[test]
	fn dragged_block_survives_resize() {
		let raw = json!({
			"capabilities": [
				{ "name": "A", "description": "a" },
				{ "name": "B", "description": "b" }
			]
		});
		let mut state = DiagramState::build(
			&raw,
			DiagramKind::Capabilities,
			1000.0,
			600.0,
			&DiagramConfig::default(),
		)
		.unwrap();
		let mut surface = RecordingSurface::new();
		state.render(&mut surface);

		state.pointer_down(30.0, 30.0);
		state.pointer_move(406.0, 306.0, &mut surface);
		state.pointer_up(406.0, 306.0, &mut surface);
		state.resize(200.0, 600.0, &mut surface);

		assert_eq!(state.nodes[0].bounds, Bounds::new(400.0, 300.0, 220.0, 72.0));
		assert_eq!(state.nodes[1].bounds.width, 152.0);
	}

	#[test]
	fn committed_drag_grows_surface() {
		let raw = json!({ "teams": [{ "name": "Ops" }] });
		let mut state =
			DiagramState::build(&raw, DiagramKind::Teams, 800.0, 600.0, &DiagramConfig::default())
				.unwrap();
		let mut surface = RecordingSurface::new();
		state.render(&mut surface);

		state.pointer_down(150.0, 150.0);
		state.pointer_move(1150.0, 150.0, &mut surface);
		let gesture = state.pointer_up(1150.0, 150.0, &mut surface);

		assert!(matches!(gesture, Gesture::Committed { .. }));
		assert_eq!(state.nodes[0].bounds.x, 1100.0);
		assert_eq!(state.surface_size().0, 1324.0);
	}
}
