mod error;

pub use error::{Error, Result};

use std::{env, thread, time::Duration};

use qdrant_client::{
	Qdrant,
	qdrant::{
		CreateCollectionBuilder, Distance, PointStruct, UpsertPointsBuilder, VectorParamsBuilder,
		VectorsConfigBuilder,
	},
};
use tokio::{runtime::Builder, time};
use uuid::Uuid;

/// A uniquely named Qdrant collection that is deleted on cleanup or drop.
pub struct TestCollection {
	client: Qdrant,
	url: String,
	name: String,
	cleaned: bool,
}
impl TestCollection {
	/// Creates a cosine collection with a single vector, named when `vector_name` is set.
	pub async fn new(url: &str, prefix: &str, vector_name: Option<&str>, dim: u64) -> Result<Self> {
		let client = Qdrant::from_url(url)
			.build()
			.map_err(|err| Error::Message(format!("Failed to build Qdrant client: {err}.")))?;
		let name = format!("{prefix}_{}", Uuid::new_v4().simple());
		let params = VectorParamsBuilder::new(dim, Distance::Cosine).build();
		let builder = match vector_name {
			Some(vector_name) => {
				let mut vectors = VectorsConfigBuilder::default();

				vectors.add_named_vector_params(vector_name, params);

				CreateCollectionBuilder::new(name.clone()).vectors_config(vectors)
			},
			None => CreateCollectionBuilder::new(name.clone()).vectors_config(params),
		};

		time::timeout(Duration::from_secs(10), client.create_collection(builder))
			.await
			.map_err(|_| Error::Message("Qdrant create_collection timed out.".to_string()))??;

		Ok(Self { client, url: url.to_string(), name, cleaned: false })
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn client(&self) -> &Qdrant {
		&self.client
	}

	pub async fn upsert(&self, points: Vec<PointStruct>) -> Result<()> {
		self.client
			.upsert_points(UpsertPointsBuilder::new(self.name.clone(), points).wait(true))
			.await?;

		Ok(())
	}

	pub async fn cleanup(mut self) -> Result<()> {
		self.cleaned = true;

		delete_collection(&self.client, &self.name).await
	}
}
impl Drop for TestCollection {
	fn drop(&mut self) {
		if self.cleaned {
			return;
		}

		let url = self.url.clone();
		let name = self.name.clone();
		let cleanup_thread = thread::spawn(move || {
			let runtime = match Builder::new_current_thread().enable_all().build() {
				Ok(runtime) => runtime,
				Err(err) => {
					eprintln!("Test collection cleanup failed: {err}.");

					return;
				},
			};
			let result = runtime.block_on(async {
				let client = Qdrant::from_url(&url).build().map_err(Error::from)?;

				delete_collection(&client, &name).await
			});

			if let Err(err) = result {
				eprintln!("Test collection cleanup failed: {err}.");
			}
		});
		let _ = cleanup_thread.join();
	}
}

pub fn env_qdrant_url() -> Option<String> {
	env::var("PASSION_QDRANT_URL").ok()
}

async fn delete_collection(client: &Qdrant, name: &str) -> Result<()> {
	let max_attempts = 6;
	let mut backoff = Duration::from_millis(100);

	for attempt in 1..=max_attempts {
		let request = client.delete_collection(name.to_string());
		let result = time::timeout(Duration::from_secs(10), request).await;

		match result {
			Ok(Ok(_)) => return Ok(()),
			Ok(Err(err)) =>
				if attempt == max_attempts {
					return Err(Error::Message(format!(
						"Failed to delete Qdrant collection {name:?} after {attempt} attempts: {err}."
					)));
				},
			Err(_) =>
				if attempt == max_attempts {
					return Err(Error::Message(format!(
						"Timed out deleting Qdrant collection {name:?} after {attempt} attempts."
					)));
				},
		}

		time::sleep(backoff).await;

		backoff = backoff.saturating_mul(2).min(Duration::from_secs(2));
	}

	Ok(())
}
