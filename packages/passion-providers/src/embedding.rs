use std::{collections::VecDeque, time::Duration};

use reqwest::{Client, header::HeaderMap};
use serde_json::Value;

use crate::{Error, Result};
use passion_config::{EmbeddingExtraction, EmbeddingIntent, EmbeddingProviderConfig};

/// Long-lived HTTP client for the embedding provider. Build once at startup and share.
#[derive(Clone, Debug)]
pub struct EmbeddingClient {
	client: Client,
	cfg: EmbeddingProviderConfig,
	url: String,
	headers: HeaderMap,
}
impl EmbeddingClient {
	pub fn new(cfg: &EmbeddingProviderConfig) -> Result<Self> {
		if cfg.dimensions == 0 {
			return Err(Error::InvalidConfig {
				message: "Embedding dimensions must be greater than zero.".to_string(),
			});
		}

		let headers = crate::auth_headers(&cfg.api_key, &cfg.default_headers)?;
		let client = Client::builder()
			.timeout(Duration::from_millis(cfg.timeout_ms))
			.build()
			.map_err(|err| Error::InvalidConfig { message: err.to_string() })?;
		let url = format!("{}{}", cfg.api_base.trim_end_matches('/'), cfg.path);

		Ok(Self { client, cfg: cfg.clone(), url, headers })
	}

	pub async fn embed(&self, text: &str, intent: EmbeddingIntent) -> Result<Vec<f32>> {
		let body = build_request_body(&self.cfg, text, intent);
		let res =
			self.client.post(&self.url).headers(self.headers.clone()).json(&body).send().await?;
		let bytes = res.error_for_status()?.bytes().await?;
		let json: Value = serde_json::from_slice(&bytes).map_err(|err| Error::Malformed {
			message: format!("Response body is not JSON: {err}."),
		})?;

		extract_embedding(&json, &self.cfg.extraction, self.cfg.dimensions as usize)
	}
}

fn build_request_body(cfg: &EmbeddingProviderConfig, text: &str, intent: EmbeddingIntent) -> Value {
	let mut body = serde_json::json!({
		"model": cfg.model,
		"input": [text],
		"dimensions": cfg.dimensions,
	});

	if let Some(map) = body.as_object_mut() {
		map.insert(
			cfg.intent_field.clone(),
			Value::String(cfg.intent_labels.label(intent).to_string()),
		);
	}

	body
}

/// Pulls the query vector out of a provider response.
///
/// The documented `primary_path` is tried first. If it does not lead to a numeric array of
/// exactly `dimensions` values, the response tree is walked breadth-first (bounded by
/// `max_depth` and `max_nodes`) for the first such array. Anything else is [`Error::Malformed`].
pub fn extract_embedding(
	json: &Value,
	extraction: &EmbeddingExtraction,
	dimensions: usize,
) -> Result<Vec<f32>> {
	if let Some(vector) = follow_path(json, &extraction.primary_path)
		.and_then(|value| numeric_vector(value, dimensions))
	{
		return Ok(vector);
	}

	if let Some(vector) = search_tree(json, extraction, dimensions) {
		tracing::warn!(
			primary_path = %extraction.primary_path.join("."),
			dimensions,
			"Embedding found outside the primary path."
		);

		return Ok(vector);
	}

	Err(Error::Malformed {
		message: format!("No numeric array of length {dimensions} found in the response."),
	})
}

fn follow_path<'a>(json: &'a Value, path: &[String]) -> Option<&'a Value> {
	let mut current = json;

	for segment in path {
		current = match current {
			Value::Object(map) => map.get(segment.as_str())?,
			Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
			_ => return None,
		};
	}

	Some(current)
}

fn search_tree(
	json: &Value,
	extraction: &EmbeddingExtraction,
	dimensions: usize,
) -> Option<Vec<f32>> {
	let max_depth = extraction.max_depth as usize;
	let max_nodes = extraction.max_nodes as usize;
	let mut queue = VecDeque::from([(json, 0_usize)]);
	let mut visited = 0_usize;

	while let Some((value, depth)) = queue.pop_front() {
		visited += 1;

		if visited > max_nodes {
			return None;
		}
		if let Some(vector) = numeric_vector(value, dimensions) {
			return Some(vector);
		}
		if depth >= max_depth {
			continue;
		}

		match value {
			Value::Object(map) => queue.extend(map.values().map(|child| (child, depth + 1))),
			Value::Array(items) =>
				queue.extend(items.iter().filter(|child| child.is_object() || child.is_array()).map(
					|child| (child, depth + 1),
				)),
			_ => {},
		}
	}

	None
}

fn numeric_vector(value: &Value, dimensions: usize) -> Option<Vec<f32>> {
	let items = value.as_array()?;

	if items.len() != dimensions || dimensions == 0 {
		return None;
	}

	let mut out = Vec::with_capacity(items.len());

	for item in items {
		let number = item.as_f64()?;

		if !number.is_finite() {
			return None;
		}

		out.push(number as f32);
	}

	Some(out)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn extraction() -> EmbeddingExtraction {
		EmbeddingExtraction::default()
	}

	#[test]
	fn reads_the_primary_path() {
		let json = serde_json::json!({
			"data": [{ "index": 0, "embedding": [0.5, 1.5, 2.5] }],
			"usage": { "tokens": [1, 2, 3] }
		});
		let vector = extract_embedding(&json, &extraction(), 3).expect("parse failed");

		assert_eq!(vector, vec![0.5, 1.5, 2.5]);
	}

	#[test]
	fn falls_back_to_the_first_array_of_the_right_length() {
		let json = serde_json::json!({
			"predictions": [{
				"embeddings": {
					"statistics": { "token_count": 4, "truncated": false },
					"values": [0.1, 0.2, 0.3, 0.4]
				}
			}]
		});
		let vector = extract_embedding(&json, &extraction(), 4).expect("parse failed");

		assert_eq!(vector, vec![0.1, 0.2, 0.3, 0.4]);
	}

	#[test]
	fn skips_short_numeric_arrays() {
		let json = serde_json::json!({
			"ids": [1, 2],
			"result": { "vector": [1.0, 2.0, 3.0] }
		});
		let vector = extract_embedding(&json, &extraction(), 3).expect("parse failed");

		assert_eq!(vector, vec![1.0, 2.0, 3.0]);
	}

	#[test]
	fn rejects_wrong_dimensionality() {
		let json = serde_json::json!({ "data": [{ "embedding": [0.5, 1.5] }] });
		let err = extract_embedding(&json, &extraction(), 3).expect_err("Expected malformed.");

		assert!(matches!(err, Error::Malformed { .. }));
	}

	#[test]
	fn rejects_mixed_arrays() {
		let json = serde_json::json!({ "data": [{ "embedding": [0.5, "x", 1.0] }] });
		let err = extract_embedding(&json, &extraction(), 3).expect_err("Expected malformed.");

		assert!(matches!(err, Error::Malformed { .. }));
	}

	#[test]
	fn fallback_respects_depth_bound() {
		let json = serde_json::json!({ "a": { "b": { "c": { "d": [1.0, 2.0] } } } });
		let shallow = EmbeddingExtraction { max_depth: 2, ..extraction() };

		assert!(extract_embedding(&json, &shallow, 2).is_err());
		assert!(extract_embedding(&json, &extraction(), 2).is_ok());
	}

	#[test]
	fn request_body_carries_the_intent_label() {
		let cfg = EmbeddingProviderConfig {
			provider_id: "p".to_string(),
			api_base: "http://localhost".to_string(),
			api_key: "k".to_string(),
			path: "/v1/embeddings".to_string(),
			model: "m".to_string(),
			dimensions: 3,
			timeout_ms: 1_000,
			default_headers: Default::default(),
			intent_field: "task_type".to_string(),
			intent_labels: Default::default(),
			extraction: Default::default(),
		};
		let body = build_request_body(&cfg, "data", EmbeddingIntent::Document);

		assert_eq!(body["task_type"], "RETRIEVAL_DOCUMENT");
		assert_eq!(body["input"][0], "data");
		assert_eq!(body["dimensions"], 3);
	}
}
