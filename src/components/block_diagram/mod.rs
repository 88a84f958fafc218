//! Block diagram engine and canvas component.
//!
//! Turns a capabilities, products, teams, architecture or pipelines payload
//! into an interactive diagram:
//! - Flattening of the payload into typed node records with nesting depth
//! - Deterministic layout (indented outline for trees, card grid otherwise)
//! - Product and process relations resolved into arrowed edges
//! - Dragging blocks to reposition them, clicking to drill down
//!
//! # Example
//!
//! ```ignore
//! use block_diagram::{BlockDiagramCanvas, DiagramKind, DiagramPayload};
//!
//! let payload = DiagramPayload {
//!     kind: DiagramKind::Products,
//!     data: serde_json::json!({ "products": [{ "id": "p1", "name": "Checkout" }] }),
//! };
//!
//! view! { <BlockDiagramCanvas payload=Some(payload) base="/products" /> }
//! ```

mod component;
pub mod containers;
mod error;
pub mod interaction;
pub mod layout;
pub mod parser;
pub mod relations;
mod render;
pub mod scene;
mod state;
pub mod theme;
mod types;

pub use component::BlockDiagramCanvas;
pub use error::{DiagramError, DiagramResult};
pub use interaction::{Gesture, InteractionConfig, InteractionController};
pub use layout::{LayoutConfig, layout};
pub use parser::parse;
pub use relations::resolve;
pub use render::CanvasSurface;
pub use scene::{LabelConfig, RecordingSurface, SceneGraph, Surface};
pub use state::{DiagramConfig, DiagramState};
pub use theme::Theme;
pub use types::{
	Bounds, DiagramKind, DiagramPayload, Edge, NodeKind, NodeRecord, Reference, RelationKind,
};
