//! block-diagram: interactive block diagrams of organizational metadata.
//!
//! This crate provides a WASM-based canvas component that renders
//! capabilities, products, teams, pipelines and software architecture as
//! draggable blocks connected by their relations, with click-to-drill-down.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, error, info};
use web_sys::MouseEvent;

pub mod components;
pub mod loader;

pub use components::block_diagram::{
	BlockDiagramCanvas, DiagramError, DiagramKind, DiagramPayload, DiagramState, NodeRecord,
};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("block-diagram: logging initialized");
}

/// Main application component.
///
/// Starts from the payload embedded in the page, if any, and swaps in a
/// freshly fetched payload whenever one of the diagram links is clicked. A
/// failed fetch leaves the current diagram in place.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let bootstrap = loader::load_embedded().unwrap_or_default();
	let payload = RwSignal::new(bootstrap.payload);

	let load = move |kind: DiagramKind| {
		leptos::task::spawn_local(async move {
			match loader::fetch_payload(kind).await {
				Ok(fetched) => payload.set(Some(fetched)),
				Err(e) => error!("block-diagram: error loading {} data: {}", kind, e),
			}
		});
	};

	view! {
		<Html attr:lang="en" attr:dir="ltr" />
		<Title text="Block Diagrams" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<nav class="diagram-links">
			{DiagramKind::ALL
				.into_iter()
				.map(|kind| {
					view! {
						<a
							href="#"
							data-type=kind.as_str()
							on:click=move |ev: MouseEvent| {
								ev.prevent_default();
								load(kind);
							}
						>
							{kind.title()}
						</a>
					}
				})
				.collect_view()}
		</nav>
		<div id="canvas" class="diagram-container">
			<BlockDiagramCanvas payload=payload base=bootstrap.base />
		</div>
	}
}
