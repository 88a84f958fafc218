//! Flattens per-kind JSON payloads into an ordered list of node records.
//!
//! Tree-shaped kinds are walked depth-first, emitting each parent before its
//! children, so the output is a pre-order traversal with `depth` set from the
//! nesting level. Flat kinds map one entry to one record at depth 0.

use std::collections::HashSet;

use serde::Deserialize;
use serde_json::Value;

use super::error::{DiagramError, DiagramResult};
use super::types::{
	ArchitecturePayload, CapabilitiesPayload, CapabilityEntry, ComponentEntry, DiagramKind,
	NodeKind, NodeRecord, PipelinesPayload, ProductsPayload, Reference, RelationKind,
	TeamsPayload,
};

/// Parse a raw payload as the given kind.
///
/// A `null` payload yields no records. Required business fields are not
/// checked here; see [`super::containers`].
pub fn parse(raw: &Value, kind: DiagramKind) -> DiagramResult<Vec<NodeRecord>> {
	if raw.is_null() {
		return Ok(Vec::new());
	}

	let mut nodes = Vec::new();
	match kind {
		DiagramKind::Capabilities => {
			let payload = CapabilitiesPayload::deserialize(raw)?;
			flatten_capabilities(payload.capabilities, 0, &mut nodes);
		}
		DiagramKind::Products => {
			let payload = ProductsPayload::deserialize(raw)?;
			nodes.extend(payload.products.into_iter().map(|p| {
				NodeRecord::new(NodeKind::Product, p.id, p.name, 0).with_description(p.description)
			}));
		}
		DiagramKind::Teams => {
			let payload = TeamsPayload::deserialize(raw)?;
			nodes.extend(payload.teams.into_iter().map(|t| {
				NodeRecord::new(NodeKind::Team, None, t.name, 0)
					.with_description(t.description)
					.with_processes(t.processes)
			}));
		}
		DiagramKind::Architecture => {
			let payload = ArchitecturePayload::deserialize(raw)?;
			if let Some(system) = payload.software_system.or(payload.software_system_alias) {
				flatten_components(system, NodeKind::ArchitectureSystem, 0, &mut nodes);
			}
		}
		DiagramKind::Pipelines => {
			let payload = PipelinesPayload::deserialize(raw)?;
			nodes.extend(payload.pipelines.into_iter().map(|p| {
				let mut node = NodeRecord::new(NodeKind::Pipeline, None, p.name, 0)
					.with_description(p.description);
				node.extra = p.extra;
				node
			}));
		}
	}
	Ok(nodes)
}

/// Parse a JSON document given the kind as a string, as it arrives from a
/// `data-type` attribute. Unknown kinds fail before the body is looked at.
pub fn parse_str(json: &str, kind: &str) -> DiagramResult<Vec<NodeRecord>> {
	let kind: DiagramKind = kind.parse()?;
	let raw: Value = serde_json::from_str(json)?;
	parse(&raw, kind)
}

/// Reject diagrams in which two records share an identity.
pub fn ensure_unique_identities(nodes: &[NodeRecord]) -> DiagramResult<()> {
	let mut seen = HashSet::with_capacity(nodes.len());
	for node in nodes {
		if !seen.insert(node.identity.as_str()) {
			return Err(DiagramError::DuplicateIdentity(node.identity.clone()));
		}
	}
	Ok(())
}

fn flatten_capabilities(entries: Vec<CapabilityEntry>, depth: usize, out: &mut Vec<NodeRecord>) {
	for entry in entries {
		let references = entry
			.products
			.iter()
			.map(|p| Reference::new(RelationKind::Product, p.as_str()))
			.chain(
				entry
					.processes
					.iter()
					.map(|p| Reference::new(RelationKind::Process, p.as_str())),
			)
			.collect();

		let mut node = NodeRecord::new(NodeKind::Capability, None, entry.name, depth)
			.with_description(entry.description)
			.with_references(references)
			.with_processes(entry.processes);
		node.category = Some(
			entry
				.category
				.filter(|c| !c.is_empty())
				.unwrap_or_else(|| "capability".to_string()),
		);
		out.push(node);

		flatten_capabilities(entry.capabilities, depth + 1, out);
	}
}

fn flatten_components(
	entry: ComponentEntry,
	kind: NodeKind,
	depth: usize,
	out: &mut Vec<NodeRecord>,
) {
	out.push(
		NodeRecord::new(kind, None, entry.name, depth).with_description(entry.description),
	);
	for child in entry.components {
		flatten_components(child, NodeKind::ArchitectureComponent, depth + 1, out);
	}
}
