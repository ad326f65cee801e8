use std::time::Duration;

use qdrant_client::{
	Qdrant,
	qdrant::{
		Query, QueryPointsBuilder, SearchParamsBuilder, VectorParams, vectors_config::Config,
	},
};

use crate::{Error, Result, filter, payload};
use passion_config::SourceConfig;
use passion_domain::{Candidate, SearchFilters};

/// One source's share of a fan-out: where to look, with which vector, and how wide.
#[derive(Clone, Debug)]
pub struct SourceSearch {
	pub source: SourceConfig,
	pub vector: Vec<f32>,
	pub filters: SearchFilters,
	/// Approximate-NN candidates the store considers internally. Must be at least `limit`.
	pub candidate_pool: u32,
	pub limit: u32,
}

pub struct QdrantStore {
	pub client: Qdrant,
	pub vector_dim: u32,
}
impl QdrantStore {
	pub fn new(cfg: &passion_config::Qdrant) -> Result<Self> {
		let client =
			Qdrant::from_url(&cfg.url).timeout(Duration::from_millis(cfg.timeout_ms)).build()?;

		Ok(Self { client, vector_dim: cfg.vector_dim })
	}

	/// Nearest-neighbor query against one source. Results keep the store's order.
	pub async fn search(&self, request: &SourceSearch) -> Result<Vec<Candidate>> {
		if request.limit == 0 {
			return Err(Error::InvalidArgument("limit must be greater than zero.".to_string()));
		}
		if request.candidate_pool < request.limit {
			return Err(Error::InvalidArgument(format!(
				"candidate_pool ({}) must be at least limit ({}).",
				request.candidate_pool, request.limit
			)));
		}
		if request.vector.len() != self.vector_dim as usize {
			return Err(Error::InvalidArgument(format!(
				"Query vector has {} dimensions; expected {}.",
				request.vector.len(),
				self.vector_dim
			)));
		}

		let source = &request.source;
		let mut query = QueryPointsBuilder::new(source.collection.clone())
			.query(Query::new_nearest(request.vector.clone()))
			.params(SearchParamsBuilder::default().hnsw_ef(request.candidate_pool as u64))
			.limit(request.limit as u64)
			.with_payload(true);

		if let Some(vector_name) = source.vector_name.as_deref() {
			query = query.using(vector_name);
		}
		if let Some(filter) = filter::translate(source, &request.filters)? {
			query = query.filter(filter);
		}

		let response = self.client.query(query).await?;

		Ok(response
			.result
			.iter()
			.filter_map(|point| payload::to_candidate(source, point))
			.collect())
	}

	/// Confirms every source collection stores vectors of `expected` dimensions.
	pub async fn verify_dimensions(&self, sources: &[SourceConfig], expected: u32) -> Result<()> {
		for source in sources {
			let info = self.client.collection_info(source.collection.clone()).await?;
			let params = info
				.result
				.and_then(|info| info.config)
				.and_then(|config| config.params)
				.and_then(|params| params.vectors_config)
				.and_then(|vectors| vectors.config);
			let size = match params {
				Some(Config::Params(params)) if source.vector_name.is_none() => Some(params.size),
				Some(Config::ParamsMap(map)) => source
					.vector_name
					.as_deref()
					.and_then(|name| map.map.get(name))
					.map(|params: &VectorParams| params.size),
				_ => None,
			};
			let Some(actual) = size else {
				return Err(Error::InvalidArgument(format!(
					"Collection {:?} has no vector {:?}.",
					source.collection,
					source.vector_name.as_deref().unwrap_or("<unnamed>")
				)));
			};

			if actual != expected as u64 {
				return Err(Error::DimensionMismatch {
					collection: source.collection.clone(),
					expected: expected as u64,
					actual,
				});
			}

			tracing::debug!(
				source_tag = %source.tag,
				collection = %source.collection,
				"Vector size verified."
			);
		}

		Ok(())
	}
}
