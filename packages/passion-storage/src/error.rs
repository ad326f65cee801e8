pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Vector store is unavailable: {message}")]
	Unavailable { message: String },
	#[error("Source {source_tag:?} cannot express the {filter} filter.")]
	FilterUnsupported { source_tag: String, filter: String },
	#[error("Invalid argument: {0}")]
	InvalidArgument(String),
	#[error("Collection {collection:?} stores {actual}-dimensional vectors; expected {expected}.")]
	DimensionMismatch { collection: String, expected: u64, actual: u64 },
}
impl From<qdrant_client::QdrantError> for Error {
	fn from(err: qdrant_client::QdrantError) -> Self {
		Self::Unavailable { message: err.to_string() }
	}
}
