use std::collections::HashMap;

use qdrant_client::qdrant::{PointId, ScoredPoint, Value, point_id::PointIdOptions, value::Kind};

use crate::filter;
use passion_config::{PayloadFields, RemoteEncoding, SourceConfig};
use passion_domain::{Candidate, Salary};

/// Maps a scored point to a [`Candidate`] using the source's payload field mapping.
///
/// Returns `None` when the point has neither a posting id nor a title.
pub fn to_candidate(source: &SourceConfig, point: &ScoredPoint) -> Option<Candidate> {
	let fields = &source.fields;
	let payload = &point.payload;
	let posting_id = field(payload, fields.posting_id.as_deref())
		.and_then(payload_text)
		.or_else(|| point.id.as_ref().and_then(point_id_text));
	let Some(posting_id) = posting_id else {
		tracing::warn!(source_tag = %source.tag, "Dropping point without an id.");

		return None;
	};
	let Some(title) = payload.get(fields.title.as_str()).and_then(payload_text) else {
		tracing::warn!(source_tag = %source.tag, %posting_id, "Dropping point without a title.");

		return None;
	};

	Some(Candidate {
		posting_id,
		source_tag: source.tag.clone(),
		title,
		organization: text_field(payload, fields.organization.as_deref()),
		location: text_field(payload, fields.location.as_deref()),
		salary: salary(payload, fields),
		remote: field(payload, fields.remote.as_deref())
			.and_then(|value| payload_remote(value, fields.remote_encoding)),
		experience_level: text_field(payload, fields.experience_level.as_deref()),
		work_type: text_field(payload, fields.work_type.as_deref()),
		raw_similarity: point.score,
		description: text_field(payload, fields.description.as_deref()),
	})
}

fn salary(payload: &HashMap<String, Value>, fields: &PayloadFields) -> Salary {
	Salary {
		min: number_field(payload, fields.salary_min.as_deref()),
		median: number_field(payload, fields.salary_median.as_deref()),
		max: number_field(payload, fields.salary_max.as_deref()),
		single: number_field(payload, fields.salary.as_deref()),
		currency: text_field(payload, fields.salary_currency.as_deref()),
		period: text_field(payload, fields.salary_period.as_deref()),
	}
}

fn field<'a>(payload: &'a HashMap<String, Value>, key: Option<&str>) -> Option<&'a Value> {
	payload.get(key?)
}

fn text_field(payload: &HashMap<String, Value>, key: Option<&str>) -> Option<String> {
	field(payload, key).and_then(payload_text)
}

fn number_field(payload: &HashMap<String, Value>, key: Option<&str>) -> Option<f64> {
	field(payload, key).and_then(payload_number)
}

fn point_id_text(point_id: &PointId) -> Option<String> {
	match &point_id.point_id_options {
		Some(PointIdOptions::Num(id)) => Some(id.to_string()),
		Some(PointIdOptions::Uuid(id)) => Some(id.clone()),
		None => None,
	}
}

fn payload_text(value: &Value) -> Option<String> {
	let text = match &value.kind {
		Some(Kind::StringValue(text)) => text.trim().to_string(),
		Some(Kind::IntegerValue(value)) => value.to_string(),
		Some(Kind::DoubleValue(value)) if value.is_finite() && value.fract() == 0.0 =>
			format!("{}", *value as i64),
		_ => return None,
	};

	if text.is_empty() { None } else { Some(text) }
}

fn payload_number(value: &Value) -> Option<f64> {
	let number = match &value.kind {
		Some(Kind::IntegerValue(value)) => *value as f64,
		Some(Kind::DoubleValue(value)) => *value,
		Some(Kind::StringValue(text)) => text.trim().replace(',', "").parse().ok()?,
		_ => return None,
	};

	number.is_finite().then_some(number)
}

/// Reads the remote flag exactly as the `remote_only` filter matches it. Values the filter cannot
/// compare, such as strings, read as unknown.
fn payload_remote(value: &Value, encoding: RemoteEncoding) -> Option<bool> {
	match (filter::remote_floor(encoding), &value.kind) {
		(None, Some(Kind::BoolValue(flag))) => Some(*flag),
		(Some(floor), Some(Kind::IntegerValue(number))) => Some(*number as f64 >= floor),
		(Some(floor), Some(Kind::DoubleValue(number))) if number.is_finite() =>
			Some(*number >= floor),
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use passion_config::EmbeddingIntent;

	fn source() -> SourceConfig {
		SourceConfig {
			tag: "postings".to_string(),
			collection: "job_postings".to_string(),
			vector_name: None,
			query_intent: EmbeddingIntent::Query,
			min_similarity: 0.7,
			candidate_pool: 100,
			limit: 20,
			match_tag: None,
			fields: PayloadFields {
				posting_id: Some("job_id".to_string()),
				organization: Some("company_name".to_string()),
				salary_max: Some("max_salary".to_string()),
				remote: Some("remote_allowed".to_string()),
				remote_encoding: RemoteEncoding::Flag,
				..Default::default()
			},
		}
	}

	fn point(id: u64, payload: Vec<(&str, Value)>) -> ScoredPoint {
		ScoredPoint {
			id: Some(PointId::from(id)),
			payload: payload.into_iter().map(|(key, value)| (key.to_string(), value)).collect(),
			score: 0.82,
			..Default::default()
		}
	}

	#[test]
	fn maps_mapped_payload_keys() {
		let point = point(
			7,
			vec![
				("job_id", Value::from(3_904_958_i64)),
				("title", Value::from("Data Analyst")),
				("company_name", Value::from("Acme")),
				("max_salary", Value::from(120_000.0)),
				("remote_allowed", Value::from(1.0)),
			],
		);
		let candidate = to_candidate(&source(), &point).expect("Missing candidate.");

		assert_eq!(candidate.posting_id, "3904958");
		assert_eq!(candidate.title, "Data Analyst");
		assert_eq!(candidate.organization.as_deref(), Some("Acme"));
		assert_eq!(candidate.salary.max, Some(120_000.0));
		assert_eq!(candidate.remote, Some(true));
		assert_eq!(candidate.raw_similarity, 0.82);
		assert_eq!(candidate.source_tag, "postings");
	}

	#[test]
	fn falls_back_to_the_point_id() {
		let point = point(42, vec![("title", Value::from("Nurse"))]);
		let candidate = to_candidate(&source(), &point).expect("Missing candidate.");

		assert_eq!(candidate.posting_id, "42");
		assert_eq!(candidate.salary, Salary::default());
		assert_eq!(candidate.remote, None);
	}

	#[test]
	fn drops_points_without_a_title() {
		let point = point(1, vec![("title", Value::from("  "))]);

		assert!(to_candidate(&source(), &point).is_none());
	}

	#[test]
	fn boolean_remote_reads_only_booleans() {
		assert_eq!(payload_remote(&Value::from(true), RemoteEncoding::Bool), Some(true));
		assert_eq!(payload_remote(&Value::from(false), RemoteEncoding::Bool), Some(false));
		assert_eq!(payload_remote(&Value::from(1_i64), RemoteEncoding::Bool), None);
		assert_eq!(payload_remote(&Value::from("yes"), RemoteEncoding::Bool), None);
	}

	#[test]
	fn flag_remote_reads_numbers() {
		assert_eq!(payload_remote(&Value::from(1.0), RemoteEncoding::Flag), Some(true));
		assert_eq!(payload_remote(&Value::from(0_i64), RemoteEncoding::Flag), Some(false));
		assert_eq!(payload_remote(&Value::from(true), RemoteEncoding::Flag), None);
	}

	#[test]
	fn ratio_remote_only_counts_fully_remote() {
		assert_eq!(payload_remote(&Value::from(100_i64), RemoteEncoding::Ratio), Some(true));
		assert_eq!(payload_remote(&Value::from(50_i64), RemoteEncoding::Ratio), Some(false));
		assert_eq!(payload_remote(&Value::from(0_i64), RemoteEncoding::Ratio), Some(false));
		assert_eq!(payload_remote(&Value::from(1_i64), RemoteEncoding::Ratio), Some(false));
	}

	#[test]
	fn numbers_parse_from_strings() {
		assert_eq!(payload_number(&Value::from("85,000")), Some(85_000.0));
		assert_eq!(payload_number(&Value::from("n/a")), None);
	}
}
