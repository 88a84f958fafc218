#![allow(unused_crate_dependencies)]

use block_diagram::components::block_diagram::{
	DiagramConfig, DiagramKind, DiagramState, Gesture, InteractionConfig, InteractionController,
	LabelConfig, LayoutConfig, NodeKind, NodeRecord, RecordingSurface, RelationKind, SceneGraph,
	layout, parse, resolve,
};
use serde_json::{Value, json};

fn config_with_base(base: &str) -> DiagramConfig {
	DiagramConfig {
		interaction: InteractionConfig {
			base: base.to_string(),
			..InteractionConfig::default()
		},
		..DiagramConfig::default()
	}
}

fn build(raw: Value, kind: DiagramKind, base: &str) -> DiagramState {
	DiagramState::build(&raw, kind, 1200.0, 800.0, &config_with_base(base)).unwrap()
}

/// Capabilities and products parsed separately, then laid out together.
fn mixed_nodes() -> Vec<NodeRecord> {
	let mut nodes = parse(
		&json!({
			"capabilities": [{
				"name": "Sell",
				"description": "Selling things",
				"products": ["p1"],
				"capabilities": [{ "name": "Sell-Online", "description": "Web shop" }]
			}]
		}),
		DiagramKind::Capabilities,
	)
	.unwrap();
	nodes.extend(
		parse(
			&json!({ "products": [{ "id": "p1", "name": "Shop", "description": "Storefront" }] }),
			DiagramKind::Products,
		)
		.unwrap(),
	);
	layout(&mut nodes, 1200.0, &LayoutConfig::default());
	nodes
}

#[test]
fn products_render_as_separate_blocks_without_edges() {
	let mut state = build(
		json!({
			"products": [
				{ "id": "p1", "name": "Shop", "description": "Storefront" },
				{ "id": "p2", "name": "Ledger" }
			]
		}),
		DiagramKind::Products,
		"",
	);
	let mut surface = RecordingSurface::new();
	state.render(&mut surface);

	assert_eq!(state.nodes.len(), 2);
	assert!(state.nodes.iter().all(|n| n.depth == 0));
	assert!(!state.nodes[0].bounds.overlaps(&state.nodes[1].bounds));
	assert_eq!(surface.blocks().count(), 2);
	assert_eq!(surface.edges().count(), 0);
	assert_eq!(surface.arrowhead_definitions, 0);
}

#[test]
fn nested_capabilities_render_as_an_outline() {
	let mut state = build(
		json!({
			"capabilities": [{
				"name": "Sell",
				"description": "Selling things",
				"products": ["p1"],
				"capabilities": [{ "name": "Sell-Online", "description": "Web shop" }]
			}]
		}),
		DiagramKind::Capabilities,
		"",
	);
	let mut surface = RecordingSurface::new();
	state.render(&mut surface);

	let names: Vec<_> = state.nodes.iter().map(|n| (n.name.as_str(), n.depth)).collect();
	assert_eq!(names, vec![("Sell", 0), ("Sell-Online", 1)]);
	assert!(state.nodes[1].bounds.x > state.nodes[0].bounds.x);
	assert!(state.nodes[1].bounds.y > state.nodes[0].bounds.y);
	// p1 is not part of this payload, so the reference is dropped.
	assert!(state.edges.is_empty());
	assert_eq!(surface.edges().count(), 0);
}

#[test]
fn product_reference_becomes_an_edge_when_product_is_present() {
	let nodes = mixed_nodes();
	let edges = resolve(&nodes);

	assert_eq!(edges.len(), 1);
	assert_eq!(edges[0].source, "Sell");
	assert_eq!(edges[0].target, "p1");
	assert_eq!(edges[0].kind, RelationKind::Product);
}

#[test]
fn process_reference_points_at_owning_team() {
	let mut nodes = parse(
		&json!({
			"capabilities": [{
				"name": "Ship",
				"description": "Get it out the door",
				"processes": ["deploy", "unknown"]
			}]
		}),
		DiagramKind::Capabilities,
	)
	.unwrap();
	nodes.extend(
		parse(
			&json!({ "teams": [{ "name": "Ops", "processes": ["monitor", "deploy"] }] }),
			DiagramKind::Teams,
		)
		.unwrap(),
	);

	let edges = resolve(&nodes);
	assert_eq!(edges.len(), 1);
	assert_eq!(edges[0].source, "Ship");
	assert_eq!(edges[0].target, "Ops");
	assert_eq!(edges[0].kind, RelationKind::Process);
	assert_eq!(nodes[1].kind, NodeKind::Team);
}

#[test]
fn dragged_block_reroutes_its_edges_on_release() {
	let mut nodes = mixed_nodes();
	let edges = resolve(&nodes);
	let mut scene = SceneGraph::new(LabelConfig::default(), 1200.0, 800.0);
	let mut surface = RecordingSurface::new();
	scene.render(&nodes, &edges, &mut surface);

	let before = surface.edges().next().unwrap().clone();
	assert_eq!(before.from, nodes[0].bounds.center());

	let mut controller = InteractionController::new(InteractionConfig::default());
	assert_eq!(controller.pointer_down(30.0, 30.0, &scene), Some(0));
	let moved = controller.pointer_move(306.0, 406.0, &mut scene);
	assert!(matches!(moved, Gesture::Moved { index: 0, .. }));
	// The record only changes once the drag is released.
	assert_eq!(nodes[0].bounds.x, 24.0);

	let gesture = controller.pointer_up(306.0, 406.0, &mut nodes, &mut scene);
	assert!(matches!(gesture, Gesture::Committed { index: 0, .. }));
	scene.rerender_edges(&mut surface);

	assert_eq!((nodes[0].bounds.x, nodes[0].bounds.y), (300.0, 400.0));
	let after = surface.edges().next().unwrap();
	assert_eq!(after.from, nodes[0].bounds.center());
	assert_eq!(after.to, before.to);
	assert_eq!(surface.arrowhead_definitions, 1);
}

#[test]
fn click_drills_down_by_id_then_name() {
	let mut state = build(
		json!({ "products": [{ "id": "p 1", "name": "Shop" }] }),
		DiagramKind::Products,
		"/products",
	);
	let mut surface = RecordingSurface::new();
	state.render(&mut surface);

	state.pointer_down(150.0, 150.0);
	let gesture = state.pointer_up(150.0, 150.0, &mut surface);
	assert_eq!(
		gesture,
		Gesture::DrillDown {
			identity: "p 1".to_string(),
			url: "/products/p%201".to_string(),
		}
	);

	let mut state = build(
		json!({ "teams": [{ "name": "Ops" }] }),
		DiagramKind::Teams,
		"/teams",
	);
	state.render(&mut surface);
	state.pointer_down(150.0, 150.0);
	let gesture = state.pointer_up(151.0, 151.0, &mut surface);
	assert!(matches!(gesture, Gesture::DrillDown { ref url, .. } if url == "/teams/Ops"));
}

#[test]
fn long_labels_are_truncated_on_screen_only() {
	let name = "A product name that is far too long for a card";
	let mut state = build(
		json!({ "products": [{ "id": "p1", "name": name }] }),
		DiagramKind::Products,
		"",
	);
	let mut surface = RecordingSurface::new();
	state.render(&mut surface);

	let block = surface.blocks().next().unwrap();
	assert_eq!(block.title, "A product name that is fa…");
	assert_eq!(state.nodes[0].name, name);
}

#[test]
fn architecture_flattens_system_then_components() {
	let state = build(
		json!({
			"softwareSystem": {
				"name": "Platform",
				"components": [
					{ "name": "API", "components": [{ "name": "Auth" }] },
					{ "name": "Web" }
				]
			}
		}),
		DiagramKind::Architecture,
		"",
	);

	let outline: Vec<_> = state
		.nodes
		.iter()
		.map(|n| (n.name.as_str(), n.depth, n.kind))
		.collect();
	assert_eq!(
		outline,
		vec![
			("Platform", 0, NodeKind::ArchitectureSystem),
			("API", 1, NodeKind::ArchitectureComponent),
			("Auth", 2, NodeKind::ArchitectureComponent),
			("Web", 1, NodeKind::ArchitectureComponent),
		]
	);
}
