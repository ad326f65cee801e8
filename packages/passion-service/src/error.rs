use crate::orchestrator::SourceReport;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Query text must contain at least one non-whitespace character.")]
	EmptyQuery,
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Embedding provider is unavailable: {message}")]
	EmbeddingUnavailable { message: String },
	#[error("Embedding response is malformed: {message}")]
	EmbeddingMalformed { message: String },
	#[error("Source {source_tag:?} cannot express the {filter} filter.")]
	FilterUnsupported { source_tag: String, filter: String },
	#[error("All {} selected sources failed.", .failures.len())]
	AllSourcesFailed { failures: Vec<SourceReport>, suggested_titles: Vec<String> },
	#[error("Request exceeded {timeout_ms} ms.")]
	Timeout { timeout_ms: u64 },
	#[error("Startup failed: {message}")]
	Startup { message: String },
}
impl From<passion_domain::EmptyQuery> for Error {
	fn from(_: passion_domain::EmptyQuery) -> Self {
		Self::EmptyQuery
	}
}
impl From<passion_providers::Error> for Error {
	fn from(err: passion_providers::Error) -> Self {
		match err {
			passion_providers::Error::Unavailable { message } =>
				Self::EmbeddingUnavailable { message },
			passion_providers::Error::Malformed { message } => Self::EmbeddingMalformed { message },
			passion_providers::Error::InvalidConfig { message } => Self::Startup { message },
		}
	}
}
