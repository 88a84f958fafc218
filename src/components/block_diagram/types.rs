//! Diagram data structures: payload shapes, node records, and edges.
//!
//! Payload types mirror the JSON served for each diagram kind. Every optional
//! field is defaulted here, at the deserialization boundary, so nothing past
//! the parser ever deals with a missing description or collection.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use super::error::DiagramError;

/// The collection a payload describes. Selects the parser and is the path
/// segment the data is fetched from (`/capabilities`, `/products`, ...).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DiagramKind {
	Capabilities,
	Products,
	Teams,
	Architecture,
	Pipelines,
}

impl DiagramKind {
	pub const ALL: [DiagramKind; 5] = [
		DiagramKind::Capabilities,
		DiagramKind::Products,
		DiagramKind::Teams,
		DiagramKind::Architecture,
		DiagramKind::Pipelines,
	];

	pub fn as_str(self) -> &'static str {
		match self {
			DiagramKind::Capabilities => "capabilities",
			DiagramKind::Products => "products",
			DiagramKind::Teams => "teams",
			DiagramKind::Architecture => "architecture",
			DiagramKind::Pipelines => "pipelines",
		}
	}

	/// Human readable title for navigation links.
	pub fn title(self) -> &'static str {
		match self {
			DiagramKind::Capabilities => "Capabilities",
			DiagramKind::Products => "Products",
			DiagramKind::Teams => "Teams",
			DiagramKind::Architecture => "Architecture",
			DiagramKind::Pipelines => "Pipelines",
		}
	}
}

impl fmt::Display for DiagramKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for DiagramKind {
	type Err = DiagramError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		DiagramKind::ALL
			.into_iter()
			.find(|kind| kind.as_str() == s)
			.ok_or_else(|| DiagramError::UnknownKind(s.to_string()))
	}
}

/// The entity type of a single node record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
	Capability,
	Product,
	Team,
	Pipeline,
	ArchitectureSystem,
	ArchitectureComponent,
}

impl NodeKind {
	pub fn as_str(self) -> &'static str {
		match self {
			NodeKind::Capability => "capability",
			NodeKind::Product => "product",
			NodeKind::Team => "team",
			NodeKind::Pipeline => "pipeline",
			NodeKind::ArchitectureSystem => "software-system",
			NodeKind::ArchitectureComponent => "component",
		}
	}

	/// Tree kinds are drawn as an indented list; the rest as a card grid.
	pub fn is_hierarchical(self) -> bool {
		matches!(
			self,
			NodeKind::Capability | NodeKind::ArchitectureSystem | NodeKind::ArchitectureComponent
		)
	}
}

impl fmt::Display for NodeKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// How a reference is matched against the other nodes of a diagram.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RelationKind {
	/// Matches a product node by id or name.
	Product,
	/// Matches a team node whose process list contains the target.
	Process,
}

impl fmt::Display for RelationKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			RelationKind::Product => "product",
			RelationKind::Process => "process",
		})
	}
}

/// An outbound reference from one node to another entity, by name or id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reference {
	pub kind: RelationKind,
	pub target: String,
}

impl Reference {
	pub fn new(kind: RelationKind, target: impl Into<String>) -> Self {
		Self {
			kind,
			target: target.into(),
		}
	}
}

/// Axis-aligned rectangle in surface coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Bounds {
	pub x: f64,
	pub y: f64,
	pub width: f64,
	pub height: f64,
}

impl Bounds {
	pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
		Self {
			x,
			y,
			width,
			height,
		}
	}

	pub fn center(&self) -> (f64, f64) {
		(self.x + self.width / 2.0, self.y + self.height / 2.0)
	}

	pub fn right(&self) -> f64 {
		self.x + self.width
	}

	pub fn bottom(&self) -> f64 {
		self.y + self.height
	}

	pub fn contains(&self, px: f64, py: f64) -> bool {
		px >= self.x && px <= self.right() && py >= self.y && py <= self.bottom()
	}

	/// True when the interiors intersect; touching edges do not count.
	pub fn overlaps(&self, other: &Bounds) -> bool {
		self.x < other.right()
			&& other.x < self.right()
			&& self.y < other.bottom()
			&& other.y < self.bottom()
	}
}

/// One diagram entity after parsing.
///
/// Everything except `bounds` is fixed at parse time. Bounds are assigned by
/// the layout pass and afterwards only changed by committing a drag.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeRecord {
	pub kind: NodeKind,
	/// Explicit id if present, else the name.
	pub identity: String,
	pub id: Option<String>,
	pub name: String,
	pub description: String,
	/// Capability `type` field.
	pub category: Option<String>,
	pub depth: usize,
	pub references: Vec<Reference>,
	/// Processes this entity owns. Matched by containment for process references.
	pub processes: Vec<String>,
	/// Unrecognized payload fields, kept for pipelines.
	pub extra: Map<String, Value>,
	pub bounds: Bounds,
}

impl NodeRecord {
	pub fn new(kind: NodeKind, id: Option<String>, name: String, depth: usize) -> Self {
		let id = id.filter(|id| !id.is_empty());
		let identity = id.clone().unwrap_or_else(|| name.clone());
		Self {
			kind,
			identity,
			id,
			name,
			description: String::new(),
			category: None,
			depth,
			references: Vec::new(),
			processes: Vec::new(),
			extra: Map::new(),
			bounds: Bounds::default(),
		}
	}

	pub fn with_description(mut self, description: String) -> Self {
		self.description = description;
		self
	}

	pub fn with_references(mut self, references: Vec<Reference>) -> Self {
		self.references = references;
		self
	}

	pub fn with_processes(mut self, processes: Vec<String>) -> Self {
		self.processes = processes;
		self
	}
}

/// A directed relation between two node records, by identity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Edge {
	pub source: String,
	pub target: String,
	pub kind: RelationKind,
}

/// A fetched or embedded payload together with the kind it should be parsed as.
#[derive(Clone, Debug, PartialEq)]
pub struct DiagramPayload {
	pub kind: DiagramKind,
	pub data: Value,
}

/// Treats an explicit JSON `null` like an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
	D: Deserializer<'de>,
	T: Default + Deserialize<'de>,
{
	Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Clone, Debug, Default, Deserialize)]
pub(crate) struct CapabilitiesPayload {
	#[serde(default, deserialize_with = "null_as_default")]
	pub capabilities: Vec<CapabilityEntry>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub(crate) struct CapabilityEntry {
	#[serde(default, deserialize_with = "null_as_default")]
	pub name: String,
	#[serde(default, deserialize_with = "null_as_default")]
	pub description: String,
	#[serde(default, rename = "type")]
	pub category: Option<String>,
	#[serde(default, deserialize_with = "null_as_default")]
	pub products: Vec<String>,
	#[serde(default, deserialize_with = "null_as_default")]
	pub processes: Vec<String>,
	#[serde(default, deserialize_with = "null_as_default")]
	pub capabilities: Vec<CapabilityEntry>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub(crate) struct ProductsPayload {
	#[serde(default, deserialize_with = "null_as_default")]
	pub products: Vec<ProductEntry>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub(crate) struct ProductEntry {
	#[serde(default)]
	pub id: Option<String>,
	#[serde(default, deserialize_with = "null_as_default")]
	pub name: String,
	#[serde(default, deserialize_with = "null_as_default")]
	pub description: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub(crate) struct TeamsPayload {
	#[serde(default, deserialize_with = "null_as_default")]
	pub teams: Vec<TeamEntry>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub(crate) struct TeamEntry {
	#[serde(default, deserialize_with = "null_as_default")]
	pub name: String,
	#[serde(default, deserialize_with = "null_as_default")]
	pub description: String,
	#[serde(default, deserialize_with = "null_as_default")]
	pub processes: Vec<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub(crate) struct ArchitecturePayload {
	#[serde(default, rename = "softwareSystem")]
	pub software_system: Option<ComponentEntry>,
	/// Hyphenated spelling of the root key; `softwareSystem` wins when both are present.
	#[serde(default, rename = "software-system")]
	pub software_system_alias: Option<ComponentEntry>,
}

/// Shared shape of the software system root and its (nested) components.
#[derive(Clone, Debug, Default, Deserialize)]
pub(crate) struct ComponentEntry {
	#[serde(default, deserialize_with = "null_as_default")]
	pub name: String,
	#[serde(default, deserialize_with = "null_as_default")]
	pub description: String,
	#[serde(default, deserialize_with = "null_as_default")]
	pub components: Vec<ComponentEntry>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub(crate) struct PipelinesPayload {
	#[serde(default, deserialize_with = "null_as_default")]
	pub pipelines: Vec<PipelineEntry>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub(crate) struct PipelineEntry {
	#[serde(default, deserialize_with = "null_as_default")]
	pub name: String,
	#[serde(default, deserialize_with = "null_as_default")]
	pub description: String,
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}
