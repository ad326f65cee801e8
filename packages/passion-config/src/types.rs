use serde::Deserialize;
use serde_json::{Map, Value};

pub const DEFAULT_FILLER_PHRASES: &[&str] = &[
	"i am passionate about",
	"i'm passionate about",
	"passionate about",
	"i am interested in",
	"i'm interested in",
	"interested in",
	"i really love",
	"i really enjoy",
	"i love",
	"i enjoy",
	"i like",
	"i want to",
	"working with",
	"working on",
	"helping with",
];

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	pub providers: Providers,
	pub storage: Storage,
	pub search: Search,
	#[serde(default)]
	pub ranking: Ranking,
	#[serde(default)]
	pub query: QueryNormalization,
	pub sources: Vec<SourceConfig>,
}
impl Config {
	/// Looks a source up by tag.
	pub fn source(&self, tag: &str) -> Option<&SourceConfig> {
		self.sources.iter().find(|source| source.tag == tag)
	}
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Providers {
	pub embedding: EmbeddingProviderConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub dimensions: u32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
	/// Request body key carrying the intent label, e.g. "input_type" or "task_type".
	#[serde(default = "default_intent_field")]
	pub intent_field: String,
	#[serde(default)]
	pub intent_labels: IntentLabels,
	#[serde(default)]
	pub extraction: EmbeddingExtraction,
}

/// Framing sent to the embedding provider. Corpora are embedded with one framing at index-build
/// time; querying them with another silently degrades relevance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbeddingIntent {
	Query,
	Document,
}
impl EmbeddingIntent {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Query => "query",
			Self::Document => "document",
		}
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IntentLabels {
	pub query: String,
	pub document: String,
}
impl IntentLabels {
	pub fn label(&self, intent: EmbeddingIntent) -> &str {
		match intent {
			EmbeddingIntent::Query => self.query.as_str(),
			EmbeddingIntent::Document => self.document.as_str(),
		}
	}
}
impl Default for IntentLabels {
	fn default() -> Self {
		Self { query: "RETRIEVAL_QUERY".to_string(), document: "RETRIEVAL_DOCUMENT".to_string() }
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmbeddingExtraction {
	/// Documented location of the vector. Numeric segments index into arrays.
	pub primary_path: Vec<String>,
	pub max_depth: u32,
	pub max_nodes: u32,
}
impl Default for EmbeddingExtraction {
	fn default() -> Self {
		Self {
			primary_path: vec!["data".to_string(), "0".to_string(), "embedding".to_string()],
			max_depth: 8,
			max_nodes: 4_096,
		}
	}
}

#[derive(Debug, Clone, Deserialize)]
pub struct Storage {
	pub qdrant: Qdrant,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Qdrant {
	pub url: String,
	pub vector_dim: u32,
	#[serde(default = "default_qdrant_timeout_ms")]
	pub timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Search {
	pub default_limit: u32,
	pub max_limit: u32,
	pub source_timeout_ms: u64,
	pub request_timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Ranking {
	pub relevance_weight: f32,
	pub salary_weight: f32,
	/// Added once per domain category shared by the query and the posting.
	pub category_boost: f32,
}
impl Default for Ranking {
	fn default() -> Self {
		Self { relevance_weight: 0.6, salary_weight: 0.4, category_boost: 0.15 }
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QueryNormalization {
	pub filler_phrases: Vec<String>,
	pub min_token_chars: u32,
	pub max_suggested_titles: u32,
}
impl Default for QueryNormalization {
	fn default() -> Self {
		Self {
			filler_phrases: DEFAULT_FILLER_PHRASES
				.iter()
				.map(|phrase| phrase.to_string())
				.collect(),
			min_token_chars: 3,
			max_suggested_titles: 5,
		}
	}
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
	pub tag: String,
	pub collection: String,
	/// Named vector holding the embedding. `None` targets the collection's unnamed vector.
	pub vector_name: Option<String>,
	#[serde(default = "default_query_intent")]
	pub query_intent: EmbeddingIntent,
	pub min_similarity: f32,
	pub candidate_pool: u32,
	pub limit: u32,
	/// Restricts the source to points whose `fields.source_tag` payload equals this value.
	pub match_tag: Option<String>,
	#[serde(default)]
	pub fields: PayloadFields,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PayloadFields {
	/// Falls back to the point id when unset or missing from a payload.
	pub posting_id: Option<String>,
	pub title: String,
	pub organization: Option<String>,
	pub location: Option<String>,
	pub salary_min: Option<String>,
	pub salary_median: Option<String>,
	pub salary_max: Option<String>,
	pub salary: Option<String>,
	pub salary_currency: Option<String>,
	pub salary_period: Option<String>,
	pub remote: Option<String>,
	pub remote_encoding: RemoteEncoding,
	pub experience_level: Option<String>,
	pub work_type: Option<String>,
	pub description: Option<String>,
	pub source_tag: Option<String>,
	/// Numeric payload key used for `min_salary` range filtering. Unset means the source cannot
	/// honor a salary filter.
	pub salary_filter: Option<String>,
}
impl Default for PayloadFields {
	fn default() -> Self {
		Self {
			posting_id: Some("posting_id".to_string()),
			title: "title".to_string(),
			organization: Some("organization".to_string()),
			location: Some("location".to_string()),
			salary_min: Some("salary_min".to_string()),
			salary_median: Some("salary_median".to_string()),
			salary_max: Some("salary_max".to_string()),
			salary: Some("salary".to_string()),
			salary_currency: Some("salary_currency".to_string()),
			salary_period: Some("salary_period".to_string()),
			remote: None,
			remote_encoding: RemoteEncoding::default(),
			experience_level: Some("experience_level".to_string()),
			work_type: Some("work_type".to_string()),
			description: Some("description".to_string()),
			source_tag: None,
			salary_filter: None,
		}
	}
}

/// How the `fields.remote` payload marks a fully remote posting. Filtering and reading share it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoteEncoding {
	/// Boolean `true`.
	#[default]
	Bool,
	/// Numeric flag, remote at 1 or above.
	Flag,
	/// Percentage of remote work, remote only at 100.
	Ratio,
}

fn default_intent_field() -> String {
	"input_type".to_string()
}

fn default_qdrant_timeout_ms() -> u64 {
	5_000
}

fn default_query_intent() -> EmbeddingIntent {
	EmbeddingIntent::Query
}
