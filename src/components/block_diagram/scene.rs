//! Scene graph: the display list of blocks and edges currently on a surface.
//!
//! [`SceneGraph::render`] is declarative: it rebuilds the whole display list
//! from node records and edges, clears the surface and paints everything.
//! Between full renders the only change is a single block following the
//! pointer during a drag ([`SceneGraph::move_block`]); edge geometry is then
//! re-derived from the on-screen block positions by
//! [`SceneGraph::rerender_edges`].

use std::borrow::Cow;
use std::collections::HashMap;

use super::types::{Bounds, Edge, NodeKind, NodeRecord, RelationKind};

/// Label truncation budgets, in characters.
#[derive(Clone, Debug)]
pub struct LabelConfig {
	pub name_budget: usize,
	pub description_budget: usize,
	pub ellipsis: char,
}

impl Default for LabelConfig {
	fn default() -> Self {
		Self {
			name_budget: 28,
			description_budget: 32,
			ellipsis: '…',
		}
	}
}

/// Shorten `text` to fit `budget` characters.
///
/// Text within budget is returned untouched. Longer text keeps its first
/// `budget - 3` characters followed by the ellipsis.
pub fn truncate_label(text: &str, budget: usize, ellipsis: char) -> Cow<'_, str> {
	if text.chars().count() <= budget {
		return Cow::Borrowed(text);
	}
	let mut out: String = text.chars().take(budget.saturating_sub(3)).collect();
	out.push(ellipsis);
	Cow::Owned(out)
}

/// Arrowhead marker geometry, in marker units.
///
/// `ref_x`/`ref_y` is the marker point placed on the line's end point; the
/// marker is rotated to follow the line direction.
#[derive(Clone, Debug, PartialEq)]
pub struct Arrowhead {
	pub ref_x: f64,
	pub ref_y: f64,
	pub points: [(f64, f64); 3],
}

impl Default for Arrowhead {
	fn default() -> Self {
		Self {
			ref_x: 9.0,
			ref_y: 3.0,
			points: [(0.0, 0.0), (10.0, 3.0), (0.0, 6.0)],
		}
	}
}

impl Arrowhead {
	/// Marker polygon placed at `tip`, oriented along the unit vector `(ux, uy)`.
	pub fn placed(&self, tip: (f64, f64), ux: f64, uy: f64) -> [(f64, f64); 3] {
		let (px, py) = (-uy, ux);
		self.points.map(|(mx, my)| {
			let (along, across) = (mx - self.ref_x, my - self.ref_y);
			(
				tip.0 + ux * along + px * across,
				tip.1 + uy * along + py * across,
			)
		})
	}
}

/// One block as drawn: rectangle plus (already truncated) labels.
#[derive(Clone, Debug, PartialEq)]
pub struct BlockVisual {
	pub identity: String,
	pub kind: NodeKind,
	pub rect: Bounds,
	pub title: String,
	pub subtitle: Option<String>,
	/// Set while the block follows the pointer and its record is not yet updated.
	pub lifted: bool,
}

/// One edge as drawn, between visual block centers.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeVisual {
	pub source: String,
	pub target: String,
	pub kind: RelationKind,
	pub from: (f64, f64),
	pub to: (f64, f64),
}

/// A drawing backend. The scene graph is the only component that paints.
pub trait Surface {
	/// Drop all drawn elements and size the surface.
	fn clear(&mut self, width: f64, height: f64);
	/// Whether the shared arrowhead marker exists on this surface.
	fn has_arrowhead(&self) -> bool;
	/// Create the shared arrowhead marker. Called at most once per surface.
	fn define_arrowhead(&mut self, marker: &Arrowhead);
	fn draw_block(&mut self, block: &BlockVisual);
	fn draw_edge(&mut self, edge: &EdgeVisual);
}

/// Rendered blocks and edges for one diagram.
#[derive(Clone, Debug, Default)]
pub struct SceneGraph {
	labels: LabelConfig,
	arrowhead: Arrowhead,
	blocks: Vec<BlockVisual>,
	block_index: HashMap<String, usize>,
	relations: Vec<Edge>,
	edges: Vec<EdgeVisual>,
	width: f64,
	height: f64,
}

impl SceneGraph {
	pub fn new(labels: LabelConfig, width: f64, height: f64) -> Self {
		Self {
			labels,
			width,
			height,
			..Self::default()
		}
	}

	pub fn blocks(&self) -> &[BlockVisual] {
		&self.blocks
	}

	pub fn edges(&self) -> &[EdgeVisual] {
		&self.edges
	}

	pub fn block(&self, index: usize) -> Option<&BlockVisual> {
		self.blocks.get(index)
	}

	pub fn size(&self) -> (f64, f64) {
		(self.width, self.height)
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	/// Rebuild the display list from scratch and paint it.
	pub fn render<S: Surface>(&mut self, nodes: &[NodeRecord], edges: &[Edge], surface: &mut S) {
		self.blocks = nodes.iter().map(|node| self.block_visual(node)).collect();
		self.block_index = self
			.blocks
			.iter()
			.enumerate()
			.map(|(i, b)| (b.identity.clone(), i))
			.collect();
		self.relations = edges.to_vec();
		self.route_edges();
		self.present(surface);
	}

	/// Recompute edge geometry from the current visual block positions and
	/// repaint. Ends any lift started by [`SceneGraph::move_block`].
	pub fn rerender_edges<S: Surface>(&mut self, surface: &mut S) {
		for block in &mut self.blocks {
			block.lifted = false;
		}
		self.route_edges();
		self.present(surface);
	}

	/// Move one block's visual without touching its node record. Coordinates
	/// are clamped to the non-negative quadrant.
	pub fn move_block(&mut self, index: usize, x: f64, y: f64) -> Option<Bounds> {
		let block = self.blocks.get_mut(index)?;
		block.rect.x = x.max(0.0);
		block.rect.y = y.max(0.0);
		block.lifted = true;
		Some(block.rect)
	}

	/// Topmost block under a point. Later blocks are painted over earlier ones.
	pub fn hit_test(&self, x: f64, y: f64) -> Option<usize> {
		self.blocks.iter().rposition(|b| b.rect.contains(x, y))
	}

	/// Paint the current display list: blocks first, then edges over them so
	/// arrowheads stay visible.
	pub fn present<S: Surface>(&self, surface: &mut S) {
		surface.clear(self.width, self.height);
		for block in &self.blocks {
			surface.draw_block(block);
		}
		if self.edges.is_empty() {
			return;
		}
		if !surface.has_arrowhead() {
			surface.define_arrowhead(&self.arrowhead);
		}
		for edge in &self.edges {
			surface.draw_edge(edge);
		}
	}

	fn block_visual(&self, node: &NodeRecord) -> BlockVisual {
		let labels = &self.labels;
		BlockVisual {
			identity: node.identity.clone(),
			kind: node.kind,
			rect: node.bounds,
			title: truncate_label(&node.name, labels.name_budget, labels.ellipsis).into_owned(),
			subtitle: (!node.description.is_empty()).then(|| {
				truncate_label(&node.description, labels.description_budget, labels.ellipsis)
					.into_owned()
			}),
			lifted: false,
		}
	}

	fn route_edges(&mut self) {
		let (blocks, index) = (&self.blocks, &self.block_index);
		let center_of = |identity: &str| index.get(identity).map(|&i| blocks[i].rect.center());
		self.edges = self
			.relations
			.iter()
			.filter_map(|edge| {
				Some(EdgeVisual {
					source: edge.source.clone(),
					target: edge.target.clone(),
					kind: edge.kind,
					from: center_of(&edge.source)?,
					to: center_of(&edge.target)?,
				})
			})
			.collect();
	}
}

/// A command issued to a [`RecordingSurface`].
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
	Clear { width: f64, height: f64 },
	Block(BlockVisual),
	Edge(EdgeVisual),
}

/// In-memory surface that records what would have been painted.
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
	pub commands: Vec<DrawCommand>,
	pub arrowhead: Option<Arrowhead>,
	/// How many times the arrowhead marker was defined.
	pub arrowhead_definitions: usize,
}

impl RecordingSurface {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn blocks(&self) -> impl Iterator<Item = &BlockVisual> {
		self.commands.iter().filter_map(|c| match c {
			DrawCommand::Block(b) => Some(b),
			_ => None,
		})
	}

	pub fn edges(&self) -> impl Iterator<Item = &EdgeVisual> {
		self.commands.iter().filter_map(|c| match c {
			DrawCommand::Edge(e) => Some(e),
			_ => None,
		})
	}
}

impl Surface for RecordingSurface {
	fn clear(&mut self, width: f64, height: f64) {
		self.commands.clear();
		self.commands.push(DrawCommand::Clear { width, height });
	}

	fn has_arrowhead(&self) -> bool {
		self.arrowhead.is_some()
	}

	fn define_arrowhead(&mut self, marker: &Arrowhead) {
		self.arrowhead = Some(marker.clone());
		self.arrowhead_definitions += 1;
	}

	fn draw_block(&mut self, block: &BlockVisual) {
		self.commands.push(DrawCommand::Block(block.clone()));
	}

	fn draw_edge(&mut self, edge: &EdgeVisual) {
		self.commands.push(DrawCommand::Edge(edge.clone()));
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn placed(kind: NodeKind, id: &str, name: &str, bounds: Bounds) -> NodeRecord {
		let mut node = NodeRecord::new(kind, Some(id.to_string()), name.to_string(), 0);
		node.bounds = bounds;
		node
	}

	fn product_edge(source: &str, target: &str) -> Edge {
		Edge {
			source: source.into(),
			target: target.into(),
			kind: RelationKind::Product,
		}
	}

	#[test]
	fn truncation_is_exact() {
		let name_29 = "abcdefghijklmnopqrstuvwxyz123";
		assert_eq!(name_29.chars().count(), 29);
		assert_eq!(
			truncate_label(name_29, 28, '…'),
			"abcdefghijklmnopqrstuvwxy…"
		);

		let name_28 = "abcdefghijklmnopqrstuvwxyz12";
		assert_eq!(truncate_label(name_28, 28, '…'), name_28);
		assert!(matches!(truncate_label(name_28, 28, '…'), Cow::Borrowed(_)));
	}

	#[test]
	fn truncation_counts_characters_not_bytes() {
		let name = "é".repeat(28);
		assert_eq!(truncate_label(&name, 28, '…'), name);
		let desc = "ü".repeat(33);
		assert_eq!(
			truncate_label(&desc, 32, '…'),
			format!("{}…", "ü".repeat(29))
		);
	}

	#[test]
	fn blocks_carry_truncated_labels() {
		let mut node = placed(
			NodeKind::Product,
			"p",
			"A product name that is far too long",
			Bounds::new(0.0, 0.0, 200.0, 150.0),
		);
		node.description = "short".into();
		let mut scene = SceneGraph::new(LabelConfig::default(), 800.0, 600.0);
		scene.render(&[node], &[], &mut RecordingSurface::new());

		let block = &scene.blocks()[0];
		assert_eq!(block.title, "A product name that is fa…");
		assert_eq!(block.subtitle.as_deref(), Some("short"));
	}

	#[test]
	fn empty_description_has_no_subtitle() {
		let node = placed(NodeKind::Team, "t", "Team", Bounds::default());
		let mut scene = SceneGraph::new(LabelConfig::default(), 100.0, 100.0);
		scene.render(&[node], &[], &mut RecordingSurface::new());
		assert_eq!(scene.blocks()[0].subtitle, None);
	}

	#[test]
	fn render_clears_then_redraws_everything() {
		let nodes = vec![
			placed(NodeKind::Product, "a", "A", Bounds::new(0.0, 0.0, 100.0, 50.0)),
			placed(NodeKind::Product, "b", "B", Bounds::new(200.0, 0.0, 100.0, 50.0)),
		];
		let edges = vec![product_edge("b", "a")];
		let mut surface = RecordingSurface::new();
		let mut scene = SceneGraph::new(LabelConfig::default(), 400.0, 300.0);

		scene.render(&nodes, &edges, &mut surface);
		scene.render(&nodes, &edges, &mut surface);

		assert_eq!(
			surface.commands[0],
			DrawCommand::Clear {
				width: 400.0,
				height: 300.0
			}
		);
		assert_eq!(surface.blocks().count(), 2);
		assert_eq!(surface.edges().count(), 1);
	}

	#[test]
	fn edges_join_block_centers() {
		let nodes = vec![
			placed(NodeKind::Product, "a", "A", Bounds::new(0.0, 0.0, 100.0, 50.0)),
			placed(NodeKind::Product, "b", "B", Bounds::new(200.0, 100.0, 100.0, 50.0)),
		];
		let mut scene = SceneGraph::new(LabelConfig::default(), 400.0, 300.0);
		scene.render(&nodes, &[product_edge("b", "a")], &mut RecordingSurface::new());

		let edge = &scene.edges()[0];
		assert_eq!(edge.from, (250.0, 125.0));
		assert_eq!(edge.to, (50.0, 25.0));
	}

	#[test]
	fn arrowhead_is_defined_once_per_surface() {
		let nodes = vec![
			placed(NodeKind::Product, "a", "A", Bounds::new(0.0, 0.0, 10.0, 10.0)),
			placed(NodeKind::Product, "b", "B", Bounds::new(50.0, 0.0, 10.0, 10.0)),
		];
		let edges = vec![product_edge("a", "b"), product_edge("b", "a")];
		let mut surface = RecordingSurface::new();
		let mut scene = SceneGraph::new(LabelConfig::default(), 100.0, 100.0);

		scene.render(&nodes, &edges, &mut surface);
		scene.rerender_edges(&mut surface);
		scene.render(&nodes, &edges, &mut surface);

		assert_eq!(surface.arrowhead_definitions, 1);
	}

	#[test]
	fn arrowhead_is_not_defined_without_edges() {
		let nodes = vec![placed(NodeKind::Team, "a", "A", Bounds::default())];
		let mut surface = RecordingSurface::new();
		SceneGraph::new(LabelConfig::default(), 10.0, 10.0).render(&nodes, &[], &mut surface);
		assert!(!surface.has_arrowhead());
	}

	#[test]
	fn moved_block_reroutes_edges_only_when_asked() {
		let nodes = vec![
			placed(NodeKind::Product, "a", "A", Bounds::new(0.0, 0.0, 100.0, 50.0)),
			placed(NodeKind::Product, "b", "B", Bounds::new(200.0, 0.0, 100.0, 50.0)),
		];
		let mut surface = RecordingSurface::new();
		let mut scene = SceneGraph::new(LabelConfig::default(), 400.0, 300.0);
		scene.render(&nodes, &[product_edge("a", "b")], &mut surface);

		scene.move_block(0, 300.0, 200.0);
		assert!(scene.blocks()[0].lifted);
		assert_eq!(scene.edges()[0].from, (50.0, 25.0));

		scene.rerender_edges(&mut surface);
		assert_eq!(scene.edges()[0].from, (350.0, 225.0));
		assert!(!scene.blocks()[0].lifted);
		assert_eq!(surface.edges().next().unwrap().from, (350.0, 225.0));
	}

	#[test]
	fn move_block_clamps_to_origin() {
		let nodes = vec![placed(NodeKind::Team, "a", "A", Bounds::new(5.0, 5.0, 10.0, 10.0))];
		let mut scene = SceneGraph::new(LabelConfig::default(), 100.0, 100.0);
		scene.render(&nodes, &[], &mut RecordingSurface::new());
		assert_eq!(
			scene.move_block(0, -20.0, -1.0),
			Some(Bounds::new(0.0, 0.0, 10.0, 10.0))
		);
		assert_eq!(scene.move_block(7, 0.0, 0.0), None);
	}

	#[test]
	fn hit_test_prefers_topmost_block() {
		let nodes = vec![
			placed(NodeKind::Team, "under", "U", Bounds::new(0.0, 0.0, 100.0, 100.0)),
			placed(NodeKind::Team, "over", "O", Bounds::new(50.0, 50.0, 100.0, 100.0)),
		];
		let mut scene = SceneGraph::new(LabelConfig::default(), 200.0, 200.0);
		scene.render(&nodes, &[], &mut RecordingSurface::new());

		assert_eq!(scene.hit_test(75.0, 75.0), Some(1));
		assert_eq!(scene.hit_test(10.0, 10.0), Some(0));
		assert_eq!(scene.hit_test(190.0, 10.0), None);
	}

	#[test]
	fn arrowhead_tip_lands_on_line_end() {
		let marker = Arrowhead::default();
		let [back_top, tip, back_bottom] = marker.placed((100.0, 0.0), 1.0, 0.0);
		assert_eq!(tip, (101.0, 0.0));
		assert_eq!(back_top, (91.0, -3.0));
		assert_eq!(back_bottom, (91.0, 3.0));
	}
}
