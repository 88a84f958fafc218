//! Payload sources: the bootstrap element embedded in the page and
//! `GET /{kind}` requests made when a diagram link is activated.

use log::{info, warn};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{HtmlScriptElement, Request, RequestInit, Response, Window};

use crate::components::block_diagram::{DiagramError, DiagramKind, DiagramPayload, DiagramResult};

/// Id of the `<script type="application/json">` element carrying the initial payload.
pub const BOOTSTRAP_ELEMENT_ID: &str = "diagram-data";

/// What the hosting page hands over on startup.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Bootstrap {
	pub payload: Option<DiagramPayload>,
	/// Drill-down URL prefix from the element's `data-base` attribute.
	pub base: String,
}

/// Decode a JSON body for the given kind. The kind is checked before the
/// body, so an unknown kind fails even when the body is malformed.
pub fn decode_payload(json: &str, kind: &str) -> DiagramResult<DiagramPayload> {
	let kind: DiagramKind = kind.parse()?;
	let data = serde_json::from_str(json)?;
	Ok(DiagramPayload { kind, data })
}

/// Read the bootstrap element: `data-kind` names the payload kind and
/// `data-base` the drill-down prefix. A missing or unusable element yields
/// `None`; an undecodable payload is logged and skipped.
pub fn load_embedded() -> Option<Bootstrap> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id(BOOTSTRAP_ELEMENT_ID)?;
	let base = element.get_attribute("data-base").unwrap_or_default();
	let kind = element.get_attribute("data-kind");
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	let payload = kind.and_then(|kind| match decode_payload(&json_text, &kind) {
		Ok(payload) => {
			info!("block-diagram: loaded embedded {} payload", payload.kind);
			Some(payload)
		}
		Err(e) => {
			warn!("block-diagram: failed to parse embedded payload: {}", e);
			None
		}
	});

	Some(Bootstrap { payload, base })
}

/// Fetch `/{kind}` as JSON. Transport failures, non-success statuses and
/// malformed bodies are all errors; the caller keeps whatever is on screen.
pub async fn fetch_payload(kind: DiagramKind) -> DiagramResult<DiagramPayload> {
	let url = format!("/{}", kind);

	let opts = RequestInit::new();
	opts.set_method("GET");
	let request = Request::new_with_str_and_init(&url, &opts).map_err(fetch_error)?;
	request
		.headers()
		.set("Accept", "application/json")
		.map_err(fetch_error)?;

	let window = web_sys::window().ok_or_else(|| DiagramError::Fetch("no window".to_string()))?;
	let response: Response = JsFuture::from(window.fetch_with_request(&request))
		.await
		.map_err(fetch_error)?
		.dyn_into()
		.map_err(|_| DiagramError::Fetch("response is not a Response".to_string()))?;

	if !response.ok() {
		return Err(DiagramError::Fetch(format!("HTTP {}", response.status())));
	}

	let text = JsFuture::from(response.text().map_err(fetch_error)?)
		.await
		.map_err(fetch_error)?
		.as_string()
		.ok_or_else(|| DiagramError::Fetch("response body is not text".to_string()))?;

	Ok(DiagramPayload {
		kind,
		data: serde_json::from_str(&text)?,
	})
}

fn fetch_error(e: JsValue) -> DiagramError {
	DiagramError::Fetch(format!("{:?}", e))
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn decodes_known_kind() {
		let payload = decode_payload(r#"{"teams":[{"name":"Ops"}]}"#, "teams").unwrap();
		assert_eq!(payload.kind, DiagramKind::Teams);
		assert_eq!(payload.data, json!({ "teams": [{ "name": "Ops" }] }));
	}

	#[test]
	fn unknown_kind_is_checked_first() {
		let err = decode_payload("not json", "widgets").unwrap_err();
		assert!(matches!(err, DiagramError::UnknownKind(_)));
	}

	#[test]
	fn malformed_body_is_a_payload_error() {
		let err = decode_payload("{\"teams\": [", "teams").unwrap_err();
		assert!(matches!(err, DiagramError::Payload(_)));
	}
}
