mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Config, DEFAULT_FILLER_PHRASES, EmbeddingExtraction, EmbeddingIntent, EmbeddingProviderConfig,
	IntentLabels, PayloadFields, Providers, Qdrant, QueryNormalization, Ranking, RemoteEncoding,
	Search, Service, SourceConfig, Storage,
};

use std::{collections::HashSet, fs, path::Path};

/// Source selector value that means "every configured source".
pub const ANY_SOURCE: &str = "any";

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}

	validate_embedding(cfg)?;
	validate_search(cfg)?;
	validate_ranking(cfg)?;

	if cfg.query.min_token_chars == 0 {
		return Err(Error::Validation {
			message: "query.min_token_chars must be greater than zero.".to_string(),
		});
	}
	if cfg.sources.is_empty() {
		return Err(Error::Validation {
			message: "At least one [[sources]] entry is required.".to_string(),
		});
	}

	let mut seen = HashSet::new();

	for source in &cfg.sources {
		validate_source(source)?;

		if !seen.insert(source.tag.as_str()) {
			return Err(Error::Validation {
				message: format!("sources.tag {:?} is declared more than once.", source.tag),
			});
		}
	}

	Ok(())
}

fn validate_embedding(cfg: &Config) -> Result<()> {
	let embedding = &cfg.providers.embedding;

	if embedding.dimensions == 0 {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must be greater than zero.".to_string(),
		});
	}
	if embedding.dimensions != cfg.storage.qdrant.vector_dim {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must match storage.qdrant.vector_dim."
				.to_string(),
		});
	}
	if embedding.api_key.trim().is_empty() {
		return Err(Error::Validation {
			message: "Provider embedding api_key must be non-empty.".to_string(),
		});
	}
	if embedding.api_base.trim().is_empty() {
		return Err(Error::Validation {
			message: "providers.embedding.api_base must be non-empty.".to_string(),
		});
	}
	if embedding.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "providers.embedding.timeout_ms must be greater than zero.".to_string(),
		});
	}
	if embedding.intent_field.trim().is_empty() {
		return Err(Error::Validation {
			message: "providers.embedding.intent_field must be non-empty.".to_string(),
		});
	}
	if embedding.extraction.primary_path.is_empty() {
		return Err(Error::Validation {
			message: "providers.embedding.extraction.primary_path must be non-empty.".to_string(),
		});
	}
	if embedding.extraction.max_depth == 0 || embedding.extraction.max_nodes == 0 {
		return Err(Error::Validation {
			message: "providers.embedding.extraction bounds must be greater than zero."
				.to_string(),
		});
	}

	Ok(())
}

fn validate_search(cfg: &Config) -> Result<()> {
	let search = &cfg.search;

	if search.default_limit == 0 {
		return Err(Error::Validation {
			message: "search.default_limit must be greater than zero.".to_string(),
		});
	}
	if search.default_limit > search.max_limit {
		return Err(Error::Validation {
			message: "search.default_limit must not exceed search.max_limit.".to_string(),
		});
	}
	if search.source_timeout_ms == 0 || search.request_timeout_ms == 0 {
		return Err(Error::Validation {
			message: "search timeouts must be greater than zero.".to_string(),
		});
	}
	if cfg.storage.qdrant.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "storage.qdrant.timeout_ms must be greater than zero.".to_string(),
		});
	}

	Ok(())
}

fn validate_ranking(cfg: &Config) -> Result<()> {
	for (label, value) in [
		("ranking.relevance_weight", cfg.ranking.relevance_weight),
		("ranking.salary_weight", cfg.ranking.salary_weight),
		("ranking.category_boost", cfg.ranking.category_boost),
	] {
		if !value.is_finite() {
			return Err(Error::Validation { message: format!("{label} must be a finite number.") });
		}
		if value < 0.0 {
			return Err(Error::Validation { message: format!("{label} must be zero or greater.") });
		}
	}

	if cfg.ranking.relevance_weight == 0.0 && cfg.ranking.salary_weight == 0.0 {
		return Err(Error::Validation {
			message: "ranking.relevance_weight and ranking.salary_weight must not both be zero."
				.to_string(),
		});
	}

	Ok(())
}

fn validate_source(source: &SourceConfig) -> Result<()> {
	let tag = source.tag.as_str();

	if tag.trim().is_empty() {
		return Err(Error::Validation { message: "sources.tag must be non-empty.".to_string() });
	}
	if tag == ANY_SOURCE {
		return Err(Error::Validation {
			message: format!("sources.tag must not be the reserved word {ANY_SOURCE:?}."),
		});
	}
	if source.collection.trim().is_empty() {
		return Err(Error::Validation {
			message: format!("sources[{tag}].collection must be non-empty."),
		});
	}
	if !source.min_similarity.is_finite() || !(0.0..=1.0).contains(&source.min_similarity) {
		return Err(Error::Validation {
			message: format!("sources[{tag}].min_similarity must be in the range 0.0-1.0."),
		});
	}
	if source.limit == 0 {
		return Err(Error::Validation {
			message: format!("sources[{tag}].limit must be greater than zero."),
		});
	}
	if source.candidate_pool < source.limit {
		return Err(Error::Validation {
			message: format!("sources[{tag}].candidate_pool must be at least sources[{tag}].limit."),
		});
	}
	if source.fields.title.trim().is_empty() {
		return Err(Error::Validation {
			message: format!("sources[{tag}].fields.title must be non-empty."),
		});
	}
	if source.match_tag.is_some() && source.fields.source_tag.is_none() {
		return Err(Error::Validation {
			message: format!(
				"sources[{tag}].match_tag requires sources[{tag}].fields.source_tag to be set."
			),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	let mut phrases: Vec<String> = cfg
		.query
		.filler_phrases
		.iter()
		.map(|phrase| phrase.trim().to_lowercase())
		.filter(|phrase| !phrase.is_empty())
		.collect();

	// Longest first so "i really love" is stripped before "i love" can split it.
	phrases.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
	phrases.dedup();

	cfg.query.filler_phrases = phrases;

	for source in &mut cfg.sources {
		if source.vector_name.as_deref().map(|name| name.trim().is_empty()).unwrap_or(false) {
			source.vector_name = None;
		}
		if source.match_tag.as_deref().map(|tag| tag.trim().is_empty()).unwrap_or(false) {
			source.match_tag = None;
		}

		let fields = &mut source.fields;

		for field in [
			&mut fields.posting_id,
			&mut fields.organization,
			&mut fields.location,
			&mut fields.salary_min,
			&mut fields.salary_median,
			&mut fields.salary_max,
			&mut fields.salary,
			&mut fields.salary_currency,
			&mut fields.salary_period,
			&mut fields.remote,
			&mut fields.experience_level,
			&mut fields.work_type,
			&mut fields.description,
			&mut fields.source_tag,
			&mut fields.salary_filter,
		] {
			if field.as_deref().map(|key| key.trim().is_empty()).unwrap_or(false) {
				*field = None;
			}
		}
	}
}

