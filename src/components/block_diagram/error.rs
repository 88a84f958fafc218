//! Errors raised while building or loading a diagram.

use thiserror::Error;

use super::types::NodeKind;

/// Everything that can abort a render. Unresolvable relations are not here:
/// they are dropped silently by the resolver.
#[derive(Debug, Error)]
pub enum DiagramError {
	#[error("unknown diagram kind {0:?}")]
	UnknownKind(String),

	#[error("malformed diagram payload: {0}")]
	Payload(#[from] serde_json::Error),

	#[error("identity {0:?} appears more than once in the diagram")]
	DuplicateIdentity(String),

	#[error("{kind} {identity:?} is missing required field `{field}`")]
	MissingField {
		kind: NodeKind,
		identity: String,
		field: &'static str,
	},

	#[error("failed to fetch diagram data: {0}")]
	Fetch(String),

	#[error("canvas unavailable: {0}")]
	Canvas(String),
}

pub type DiagramResult<T> = Result<T, DiagramError>;
