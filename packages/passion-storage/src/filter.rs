use qdrant_client::qdrant::{Condition, Filter, Range};

use crate::{Error, Result};
use passion_config::{RemoteEncoding, SourceConfig};
use passion_domain::SearchFilters;

pub const REMOTE_FILTER: &str = "remote_only";
pub const SALARY_FILTER: &str = "min_salary";
pub const MATCH_TAG_FILTER: &str = "match_tag";

/// Translates request filters into a Qdrant payload filter for one source.
///
/// Returns `Ok(None)` when nothing constrains the search. A requested constraint the source has no
/// payload key for is [`Error::FilterUnsupported`]; it is never dropped.
pub fn translate(source: &SourceConfig, filters: &SearchFilters) -> Result<Option<Filter>> {
	let mut must = Vec::new();

	if let Some(tag) = source.match_tag.as_deref() {
		let key = required_key(source, source.fields.source_tag.as_deref(), MATCH_TAG_FILTER)?;

		must.push(Condition::matches(key, tag.to_string()));
	}
	if filters.requires_remote() {
		let key = required_key(source, source.fields.remote.as_deref(), REMOTE_FILTER)?;

		must.push(remote_condition(key, source.fields.remote_encoding));
	}
	if let Some(floor) = filters.salary_floor() {
		let key = required_key(source, source.fields.salary_filter.as_deref(), SALARY_FILTER)?;

		must.push(Condition::range(key, Range { gte: Some(floor as f64), ..Default::default() }));
	}

	if must.is_empty() { Ok(None) } else { Ok(Some(Filter::must(must))) }
}

/// Checks every requested constraint without building a filter.
pub fn check_supported(source: &SourceConfig, filters: &SearchFilters) -> Result<()> {
	translate(source, filters).map(|_| ())
}

/// Lowest numeric payload value that counts as remote. `None` for boolean payloads.
pub(crate) fn remote_floor(encoding: RemoteEncoding) -> Option<f64> {
	match encoding {
		RemoteEncoding::Bool => None,
		RemoteEncoding::Flag => Some(1.0),
		RemoteEncoding::Ratio => Some(100.0),
	}
}

fn remote_condition(key: String, encoding: RemoteEncoding) -> Condition {
	match remote_floor(encoding) {
		Some(floor) => Condition::range(key, Range { gte: Some(floor), ..Default::default() }),
		None => Condition::matches(key, true),
	}
}

fn required_key(source: &SourceConfig, key: Option<&str>, filter: &str) -> Result<String> {
	key.map(str::to_string).ok_or_else(|| Error::FilterUnsupported {
		source_tag: source.tag.clone(),
		filter: filter.to_string(),
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use qdrant_client::qdrant::{FieldCondition, condition::ConditionOneOf, r#match::MatchValue};

	use passion_config::{EmbeddingIntent, PayloadFields};

	fn source(fields: PayloadFields, match_tag: Option<&str>) -> SourceConfig {
		SourceConfig {
			tag: "postings".to_string(),
			collection: "job_postings".to_string(),
			vector_name: None,
			query_intent: EmbeddingIntent::Query,
			min_similarity: 0.7,
			candidate_pool: 100,
			limit: 20,
			match_tag: match_tag.map(str::to_string),
			fields,
		}
	}

	#[test]
	fn unconstrained_request_has_no_filter() {
		let filter = translate(&source(PayloadFields::default(), None), &SearchFilters::default())
			.expect("Translation failed.");

		assert!(filter.is_none());
	}

	#[test]
	fn remote_false_and_zero_salary_add_nothing() {
		let filters = SearchFilters {
			remote_only: Some(false),
			min_salary: Some(0),
			..Default::default()
		};
		let filter =
			translate(&source(PayloadFields::default(), None), &filters).expect("Translation failed.");

		assert!(filter.is_none());
	}

	#[test]
	fn builds_one_condition_per_constraint() {
		let fields = PayloadFields {
			remote: Some("remote_allowed".to_string()),
			salary_filter: Some("max_salary".to_string()),
			source_tag: Some("dataset".to_string()),
			..Default::default()
		};
		let filters =
			SearchFilters { remote_only: Some(true), min_salary: Some(100_000), ..Default::default() };
		let filter = translate(&source(fields, Some("linkedin")), &filters)
			.expect("Translation failed.")
			.expect("Missing filter.");

		assert_eq!(filter.must.len(), 3);
	}

	fn remote_field(encoding: RemoteEncoding) -> FieldCondition {
		let fields = PayloadFields {
			remote: Some("remote_flag".to_string()),
			remote_encoding: encoding,
			..Default::default()
		};
		let filters = SearchFilters { remote_only: Some(true), ..Default::default() };
		let filter = translate(&source(fields, None), &filters)
			.expect("Translation failed.")
			.expect("Missing filter.");

		assert_eq!(filter.must.len(), 1);

		match filter.must[0].condition_one_of.clone() {
			Some(ConditionOneOf::Field(field)) => {
				assert_eq!(field.key, "remote_flag");

				field
			},
			other => panic!("Unexpected condition: {other:?}"),
		}
	}

	#[test]
	fn boolean_remote_matches_true() {
		let field = remote_field(RemoteEncoding::Bool);
		let value = field.r#match.and_then(|condition| condition.match_value);

		assert_eq!(value, Some(MatchValue::Boolean(true)));
		assert!(field.range.is_none());
	}

	#[test]
	fn flag_remote_is_a_range_from_one() {
		let field = remote_field(RemoteEncoding::Flag);
		let range = field.range.expect("Missing range.");

		assert_eq!(range.gte, Some(1.0));
		assert!(field.r#match.is_none());
	}

	#[test]
	fn ratio_remote_is_a_range_from_one_hundred() {
		let field = remote_field(RemoteEncoding::Ratio);
		let range = field.range.expect("Missing range.");

		assert_eq!(range.gte, Some(100.0));
		assert!(field.r#match.is_none());
	}

	#[test]
	fn missing_salary_key_is_unsupported() {
		let filters = SearchFilters { min_salary: Some(100_000), ..Default::default() };
		let err = translate(&source(PayloadFields::default(), None), &filters)
			.expect_err("Expected unsupported filter.");

		match err {
			Error::FilterUnsupported { source_tag, filter } => {
				assert_eq!(source_tag, "postings");
				assert_eq!(filter, SALARY_FILTER);
			},
			other => panic!("Unexpected error: {other:?}"),
		}
	}

	#[test]
	fn missing_remote_key_is_unsupported() {
		let filters = SearchFilters { remote_only: Some(true), ..Default::default() };

		assert!(matches!(
			check_supported(&source(PayloadFields::default(), None), &filters),
			Err(Error::FilterUnsupported { .. })
		));
	}
}
