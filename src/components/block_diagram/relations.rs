//! Resolves node references into directed edges.
//!
//! Product references name a product by identity, or failing that by name, so
//! an exact identity match never loses to an earlier product with that name.
//! Process references name a process, and resolve to the team that owns it:
//! the match is list containment against the team's processes, not identity
//! equality.
//! References that match nothing are dropped.

use std::collections::HashMap;

use super::types::{Edge, NodeKind, NodeRecord, Reference, RelationKind};

/// Compute the edges of a diagram. Output follows node order, then reference
/// order, so equal inputs always produce equal edge lists.
pub fn resolve(nodes: &[NodeRecord]) -> Vec<Edge> {
	let mut by_identity: HashMap<&str, &NodeRecord> = HashMap::new();
	let mut by_name: HashMap<&str, &NodeRecord> = HashMap::new();
	for node in nodes.iter().filter(|n| n.kind == NodeKind::Product) {
		by_identity.entry(node.identity.as_str()).or_insert(node);
		// Names may repeat; the first product in diagram order keeps the name.
		by_name.entry(node.name.as_str()).or_insert(node);
	}
	let teams: Vec<&NodeRecord> = nodes.iter().filter(|n| n.kind == NodeKind::Team).collect();

	let mut edges = Vec::new();
	for node in nodes {
		for reference in &node.references {
			let target = match reference.kind {
				RelationKind::Product => product_target(&by_identity, &by_name, reference),
				RelationKind::Process => owning_team(&teams, reference),
			};
			if let Some(target) = target {
				edges.push(Edge {
					source: node.identity.clone(),
					target: target.identity.clone(),
					kind: reference.kind,
				});
			}
		}
	}
	edges
}

/// Exact identity match first, display name only when no identity matches.
fn product_target<'a>(
	by_identity: &HashMap<&str, &'a NodeRecord>,
	by_name: &HashMap<&str, &'a NodeRecord>,
	reference: &Reference,
) -> Option<&'a NodeRecord> {
	let target = reference.target.as_str();
	by_identity
		.get(target)
		.or_else(|| by_name.get(target))
		.copied()
}

fn owning_team<'a>(teams: &[&'a NodeRecord], reference: &Reference) -> Option<&'a NodeRecord> {
	teams
		.iter()
		.copied()
		.find(|team| team.processes.iter().any(|p| *p == reference.target))
}
