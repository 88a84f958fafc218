//! Strict per-kind containers: the required-field table checked before a
//! diagram is allowed onto the surface.

use super::error::{DiagramError, DiagramResult};
use super::types::{NodeKind, NodeRecord};

/// A business field a kind may require.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequiredField {
	Name,
	Description,
	Id,
}

impl RequiredField {
	pub fn as_str(self) -> &'static str {
		match self {
			RequiredField::Name => "name",
			RequiredField::Description => "description",
			RequiredField::Id => "id",
		}
	}

	fn is_present(self, node: &NodeRecord) -> bool {
		match self {
			RequiredField::Name => !node.name.is_empty(),
			RequiredField::Description => !node.description.is_empty(),
			RequiredField::Id => node.id.as_deref().is_some_and(|id| !id.is_empty()),
		}
	}
}

const CAPABILITY: &[RequiredField] = &[RequiredField::Name, RequiredField::Description];
const PRODUCT: &[RequiredField] = &[RequiredField::Name, RequiredField::Id];
const NAMED: &[RequiredField] = &[RequiredField::Name];

/// Required fields for each node kind, checked in order.
pub fn required_fields(kind: NodeKind) -> &'static [RequiredField] {
	match kind {
		NodeKind::Capability => CAPABILITY,
		NodeKind::Product => PRODUCT,
		NodeKind::Team
		| NodeKind::Pipeline
		| NodeKind::ArchitectureSystem
		| NodeKind::ArchitectureComponent => NAMED,
	}
}

/// Check one record against its kind's required fields.
pub fn validate(node: &NodeRecord) -> DiagramResult<()> {
	match required_fields(node.kind)
		.iter()
		.find(|field| !field.is_present(node))
	{
		Some(field) => Err(DiagramError::MissingField {
			kind: node.kind,
			identity: node.identity.clone(),
			field: field.as_str(),
		}),
		None => Ok(()),
	}
}

/// Check every record, stopping at the first violation.
pub fn validate_all(nodes: &[NodeRecord]) -> DiagramResult<()> {
	nodes.iter().try_for_each(validate)
}
