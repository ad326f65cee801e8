use std::{
	collections::{BTreeMap, HashMap},
	time::{Duration, Instant},
};

use serde::{Deserialize, Serialize};
use tokio::time;

use crate::{Error, MatchService, Result, orchestrator, ranking, scoring};
use passion_config::{EmbeddingIntent, SourceConfig};
use passion_domain::{
	CATEGORY_TABLE_VERSION, Candidate, Query, ScoredCandidate, SearchFilters, SourceSelector,
};
use passion_storage::{SourceSearch, filter};

pub use crate::orchestrator::{SourceOutcome, SourceReport};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MatchRequest {
	pub text: String,
	#[serde(default)]
	pub remote_only: Option<bool>,
	#[serde(default)]
	pub min_salary: Option<u64>,
	#[serde(default)]
	pub source: SourceSelector,
	#[serde(default)]
	pub limit: Option<u32>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
	Matched,
	NoResults,
}

#[derive(Clone, Debug, Serialize)]
pub struct MatchResponse {
	pub status: MatchStatus,
	/// Text that was embedded.
	pub query: String,
	pub keywords: Vec<String>,
	pub suggested_titles: Vec<String>,
	pub category_table_version: String,
	pub sources: Vec<SourceReport>,
	pub items: Vec<MatchItem>,
}

#[derive(Clone, Debug, Serialize)]
pub struct MatchItem {
	pub rank: u32,
	#[serde(flatten)]
	pub candidate: Candidate,
	pub blended_score: f32,
	pub explain: MatchExplain,
}

#[derive(Clone, Debug, Serialize)]
pub struct MatchExplain {
	pub raw_similarity: f32,
	pub boost: f32,
	/// One `category:<name>` entry per shared category.
	pub boosts: Vec<String>,
	pub normalized_salary: f32,
	pub salary_used: Option<f64>,
}

impl MatchService {
	/// Runs the whole pipeline under the global request deadline.
	///
	/// On expiry every in-flight call is dropped and no partial result is returned.
	pub async fn match_jobs(&self, req: MatchRequest) -> Result<MatchResponse> {
		let timeout_ms = self.cfg.search.request_timeout_ms;

		match time::timeout(Duration::from_millis(timeout_ms), self.run(req)).await {
			Ok(result) => result,
			Err(_) => {
				tracing::warn!(timeout_ms, "Match request timed out.");

				Err(Error::Timeout { timeout_ms })
			},
		}
	}

	async fn run(&self, req: MatchRequest) -> Result<MatchResponse> {
		let started = Instant::now();
		let limit = self.resolve_limit(req.limit)?;
		let filters = SearchFilters {
			source: req.source,
			remote_only: req.remote_only,
			min_salary: req.min_salary,
		};
		let query = passion_domain::normalize(&req.text, filters, &self.cfg.query)?;
		let sources = self.select_sources(&query.filters().source)?;

		for source in &sources {
			filter::check_supported(source, query.filters()).map_err(|err| match err {
				passion_storage::Error::FilterUnsupported { source_tag, filter } =>
					Error::FilterUnsupported { source_tag, filter },
				other => Error::InvalidRequest { message: other.to_string() },
			})?;
		}

		let vectors = self.embed_per_intent(&query, &sources).await?;
		let searches = sources
			.iter()
			.filter_map(|source| {
				let vector = vectors.get(&source.query_intent)?.clone();

				Some(SourceSearch {
					source: (*source).clone(),
					vector,
					filters: query.filters().clone(),
					candidate_pool: source.candidate_pool.max(source.limit),
					limit: source.limit,
				})
			})
			.collect::<Vec<_>>();
		let fanout = orchestrator::search_all(
			self.backends.store.as_ref(),
			&searches,
			Duration::from_millis(self.cfg.search.source_timeout_ms),
		)
		.await
		.map_err(|err| match err {
			Error::AllSourcesFailed { failures, .. } => {
				tracing::warn!(sources = failures.len(), "Every selected source failed.");

				Error::AllSourcesFailed {
					failures,
					suggested_titles: query.suggested_titles().to_vec(),
				}
			},
			other => other,
		})?;
		let scored = scoring::score_and_filter(
			&query,
			&fanout.candidates,
			&self.cfg.sources,
			&self.cfg.ranking,
		);
		let ranked = ranking::rank(&scored, limit);
		let reports = with_kept_counts(fanout.reports, &scored);

		tracing::info!(
			fetched = fanout.candidates.len(),
			scored = scored.len(),
			returned = ranked.len(),
			elapsed_ms = started.elapsed().as_millis() as u64,
			"Match request completed."
		);

		Ok(build_response(&query, reports, ranked))
	}

	fn resolve_limit(&self, requested: Option<u32>) -> Result<usize> {
		let search = &self.cfg.search;
		let limit = requested.unwrap_or(search.default_limit);

		if limit == 0 || limit > search.max_limit {
			return Err(Error::InvalidRequest {
				message: format!("limit must be between 1 and {}.", search.max_limit),
			});
		}

		Ok(limit as usize)
	}

	fn select_sources(&self, selector: &SourceSelector) -> Result<Vec<&SourceConfig>> {
		match selector {
			SourceSelector::Any => Ok(self.cfg.sources.iter().collect()),
			SourceSelector::Only(tag) => match self.cfg.source(tag) {
				Some(source) => Ok(vec![source]),
				None => Err(Error::InvalidRequest { message: format!("Unknown source {tag:?}.") }),
			},
		}
	}

	/// One embedding per distinct intent among the selected sources, in source order.
	async fn embed_per_intent(
		&self,
		query: &Query,
		sources: &[&SourceConfig],
	) -> Result<BTreeMap<EmbeddingIntent, Vec<f32>>> {
		let dimensions = self.cfg.providers.embedding.dimensions as usize;
		let mut vectors = BTreeMap::new();

		for source in sources {
			let intent = source.query_intent;

			if vectors.contains_key(&intent) {
				continue;
			}

			let vector = self.backends.embedding.embed(query.processed(), intent).await?;

			if vector.len() != dimensions {
				return Err(Error::EmbeddingMalformed {
					message: format!(
						"Expected {dimensions} dimensions for the {} intent, got {}.",
						intent.as_str(),
						vector.len()
					),
				});
			}

			vectors.insert(intent, vector);
		}

		Ok(vectors)
	}
}

fn with_kept_counts(
	mut reports: Vec<SourceReport>,
	scored: &[ScoredCandidate],
) -> Vec<SourceReport> {
	let mut kept: HashMap<&str, usize> = HashMap::new();

	for item in scored {
		*kept.entry(item.candidate.source_tag.as_str()).or_default() += 1;
	}
	for report in &mut reports {
		report.kept = kept.get(report.source_tag.as_str()).copied().unwrap_or(0);
	}

	reports
}

fn build_response(
	query: &Query,
	sources: Vec<SourceReport>,
	ranked: Vec<ScoredCandidate>,
) -> MatchResponse {
	let items: Vec<MatchItem> = ranked
		.into_iter()
		.enumerate()
		.map(|(idx, scored)| MatchItem {
			rank: idx as u32 + 1,
			blended_score: scored.blended_score,
			explain: MatchExplain {
				raw_similarity: scored.candidate.raw_similarity,
				boost: scored.boost,
				boosts: scored
					.matched_categories
					.iter()
					.map(|name| format!("category:{name}"))
					.collect(),
				normalized_salary: scored.normalized_salary,
				salary_used: scored.candidate.salary.best_available(),
			},
			candidate: scored.candidate,
		})
		.collect();
	let status = if items.is_empty() { MatchStatus::NoResults } else { MatchStatus::Matched };

	MatchResponse {
		status,
		query: query.processed().to_string(),
		keywords: query.keywords().to_vec(),
		suggested_titles: query.suggested_titles().to_vec(),
		category_table_version: CATEGORY_TABLE_VERSION.to_string(),
		sources,
		items,
	}
}
