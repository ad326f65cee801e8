use std::{
	collections::HashSet,
	fmt::{Display, Formatter},
};

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

use crate::{terms::Terms, titles};
use passion_config::{ANY_SOURCE, QueryNormalization};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EmptyQuery;
impl Display for EmptyQuery {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "Query text must contain at least one non-whitespace character.")
	}
}
impl std::error::Error for EmptyQuery {}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SourceSelector {
	#[default]
	Any,
	Only(String),
}
impl From<String> for SourceSelector {
	fn from(value: String) -> Self {
		let trimmed = value.trim();

		if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(ANY_SOURCE) {
			Self::Any
		} else {
			Self::Only(trimmed.to_string())
		}
	}
}
impl From<SourceSelector> for String {
	fn from(value: SourceSelector) -> Self {
		match value {
			SourceSelector::Any => ANY_SOURCE.to_string(),
			SourceSelector::Only(tag) => tag,
		}
	}
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilters {
	#[serde(default)]
	pub source: SourceSelector,
	pub remote_only: Option<bool>,
	pub min_salary: Option<u64>,
}
impl SearchFilters {
	/// `remote_only = false` places no constraint on the remote flag.
	pub fn requires_remote(&self) -> bool {
		self.remote_only == Some(true)
	}

	/// A zero floor places no constraint, so postings without salary data are kept.
	pub fn salary_floor(&self) -> Option<u64> {
		self.min_salary.filter(|floor| *floor > 0)
	}
}

/// A normalized passion query. Built once per request by [`normalize`] and never mutated.
#[derive(Clone, Debug)]
pub struct Query {
	raw: String,
	processed: String,
	keywords: Vec<String>,
	terms: Terms,
	suggested_titles: Vec<String>,
	filters: SearchFilters,
}
impl Query {
	pub fn raw(&self) -> &str {
		&self.raw
	}

	/// Text sent to the embedding provider. Never empty.
	pub fn processed(&self) -> &str {
		&self.processed
	}

	pub fn keywords(&self) -> &[String] {
		&self.keywords
	}

	/// Word terms of the full raw text, used for category matching.
	pub fn terms(&self) -> &Terms {
		&self.terms
	}

	pub fn suggested_titles(&self) -> &[String] {
		&self.suggested_titles
	}

	pub fn filters(&self) -> &SearchFilters {
		&self.filters
	}
}

pub fn normalize(
	raw: &str,
	filters: SearchFilters,
	cfg: &QueryNormalization,
) -> Result<Query, EmptyQuery> {
	if raw.trim().is_empty() {
		return Err(EmptyQuery);
	}

	let folded = raw.nfkc().collect::<String>().to_lowercase();
	let cleaned = strip_filler_phrases(folded.as_str(), &cfg.filler_phrases);
	let min_chars = cfg.min_token_chars as usize;
	let mut kept = Vec::new();
	let mut keywords = Vec::new();
	let mut seen = HashSet::new();

	for token in cleaned.split_whitespace() {
		let token = token.trim_matches(|ch: char| !ch.is_alphanumeric());

		if token.chars().count() < min_chars {
			continue;
		}

		kept.push(token);

		if seen.insert(token) {
			keywords.push(token.to_string());
		}
	}

	let processed = if kept.is_empty() { raw.trim().to_string() } else { kept.join(" ") };
	let suggested_titles =
		titles::suggest_titles(&keywords, cfg.max_suggested_titles as usize);

	Ok(Query {
		raw: raw.to_string(),
		processed,
		keywords,
		terms: Terms::new(raw),
		suggested_titles,
		filters,
	})
}

fn strip_filler_phrases(text: &str, phrases: &[String]) -> String {
	let mut ordered: Vec<String> = phrases
		.iter()
		.map(|phrase| phrase.trim().to_lowercase())
		.filter(|phrase| !phrase.is_empty())
		.collect();

	ordered.sort_by(|a, b| b.len().cmp(&a.len()));

	let mut out = text.to_string();

	for phrase in &ordered {
		if out.contains(phrase.as_str()) {
			out = out.replace(phrase.as_str(), " ");
		}
	}

	out
}
