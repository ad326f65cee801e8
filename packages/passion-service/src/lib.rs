pub mod orchestrator;
pub mod ranking;
pub mod scoring;
pub mod search;

mod error;

pub use error::{Error, Result};
pub use search::{
	MatchExplain, MatchItem, MatchRequest, MatchResponse, MatchStatus, SourceOutcome, SourceReport,
};

use std::{future::Future, pin::Pin, sync::Arc};

use passion_config::{Config, EmbeddingIntent};
use passion_domain::Candidate;
use passion_providers::EmbeddingClient;
use passion_storage::{QdrantStore, SourceSearch};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed<'a>(
		&'a self,
		text: &'a str,
		intent: EmbeddingIntent,
	) -> BoxFuture<'a, passion_providers::Result<Vec<f32>>>;
}

pub trait VectorSearch
where
	Self: Send + Sync,
{
	fn search<'a>(
		&'a self,
		request: &'a SourceSearch,
	) -> BoxFuture<'a, passion_storage::Result<Vec<Candidate>>>;
}

#[derive(Clone)]
pub struct Backends {
	pub embedding: Arc<dyn EmbeddingProvider>,
	pub store: Arc<dyn VectorSearch>,
}

/// The matching pipeline with its long-lived clients. Shared read-only across requests.
pub struct MatchService {
	pub cfg: Config,
	pub backends: Backends,
}
impl MatchService {
	pub fn new(cfg: Config, backends: Backends) -> Self {
		Self { cfg, backends }
	}

	/// Builds the HTTP and Qdrant clients and checks every source collection's vector size.
	pub async fn connect(cfg: Config) -> Result<Self> {
		let embedding = EmbeddingClient::new(&cfg.providers.embedding)?;
		let store = QdrantStore::new(&cfg.storage.qdrant)
			.map_err(|err| Error::Startup { message: err.to_string() })?;

		store
			.verify_dimensions(&cfg.sources, cfg.providers.embedding.dimensions)
			.await
			.map_err(|err| Error::Startup { message: err.to_string() })?;

		tracing::info!(
			provider_id = %cfg.providers.embedding.provider_id,
			model = %cfg.providers.embedding.model,
			sources = cfg.sources.len(),
			"Match service connected."
		);

		Ok(Self::new(cfg, Backends { embedding: Arc::new(embedding), store: Arc::new(store) }))
	}
}

impl EmbeddingProvider for EmbeddingClient {
	fn embed<'a>(
		&'a self,
		text: &'a str,
		intent: EmbeddingIntent,
	) -> BoxFuture<'a, passion_providers::Result<Vec<f32>>> {
		Box::pin(EmbeddingClient::embed(self, text, intent))
	}
}

impl VectorSearch for QdrantStore {
	fn search<'a>(
		&'a self,
		request: &'a SourceSearch,
	) -> BoxFuture<'a, passion_storage::Result<Vec<Candidate>>> {
		Box::pin(QdrantStore::search(self, request))
	}
}
