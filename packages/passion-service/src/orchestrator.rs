use std::{
	collections::HashMap,
	time::{Duration, Instant},
};

use futures::future;
use serde::Serialize;
use tokio::time;

use crate::{Error, Result, VectorSearch};
use passion_domain::Candidate;
use passion_storage::SourceSearch;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceOutcome {
	Ok,
	Failed,
	TimedOut,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SourceReport {
	pub source_tag: String,
	pub outcome: SourceOutcome,
	/// Candidates returned by the store before dedup and thresholds.
	pub fetched: usize,
	/// Candidates that survived dedup and the source's similarity threshold.
	pub kept: usize,
	pub elapsed_ms: u64,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
}

#[derive(Debug)]
pub struct Fanout {
	/// Deduplicated candidates in discovery order: source order, then store order.
	pub candidates: Vec<Candidate>,
	pub reports: Vec<SourceReport>,
}

/// Searches every source concurrently and waits for all of them.
///
/// A failed or timed-out source is logged and excluded. Only when every source fails is
/// [`Error::AllSourcesFailed`] returned. A source that cannot express a requested filter fails
/// the whole call with [`Error::FilterUnsupported`].
pub async fn search_all(
	store: &dyn VectorSearch,
	searches: &[SourceSearch],
	source_timeout: Duration,
) -> Result<Fanout> {
	let calls = searches.iter().map(|search| async move {
		let started = Instant::now();
		let result = time::timeout(source_timeout, store.search(search)).await;

		(search, result, started.elapsed())
	});
	let results = future::join_all(calls).await;
	let mut candidates = Vec::new();
	let mut reports = Vec::with_capacity(results.len());

	for (search, result, elapsed) in results {
		let source_tag = search.source.tag.clone();
		let elapsed_ms = elapsed.as_millis() as u64;
		let report = match result {
			Ok(Ok(found)) => {
				let fetched = found.len();

				candidates.extend(found);

				SourceReport {
					source_tag,
					outcome: SourceOutcome::Ok,
					fetched,
					kept: 0,
					elapsed_ms,
					error: None,
				}
			},
			Ok(Err(passion_storage::Error::FilterUnsupported { source_tag, filter })) =>
				return Err(Error::FilterUnsupported { source_tag, filter }),
			Ok(Err(err)) => {
				tracing::warn!(%source_tag, error = %err, elapsed_ms, "Source search failed.");

				SourceReport {
					source_tag,
					outcome: SourceOutcome::Failed,
					fetched: 0,
					kept: 0,
					elapsed_ms,
					error: Some(err.to_string()),
				}
			},
			Err(_) => {
				tracing::warn!(
					%source_tag,
					timeout_ms = source_timeout.as_millis() as u64,
					"Source search timed out."
				);

				SourceReport {
					source_tag,
					outcome: SourceOutcome::TimedOut,
					fetched: 0,
					kept: 0,
					elapsed_ms,
					error: Some(format!("Timed out after {} ms.", source_timeout.as_millis())),
				}
			},
		};

		reports.push(report);
	}

	if reports.iter().all(|report| report.outcome != SourceOutcome::Ok) {
		return Err(Error::AllSourcesFailed { failures: reports, suggested_titles: Vec::new() });
	}

	Ok(Fanout { candidates: dedup(candidates), reports })
}

/// Collapses duplicates, keeping the higher raw similarity. Ties keep the earlier candidate.
///
/// Two candidates are duplicates when they share `(source_tag, posting_id)`, or when they come
/// from different sources and share [`Candidate::merge_identity`]. A merged slot absorbs at most
/// one posting per source through identity, so distinct postings of one source never collapse.
/// A merged posting occupies the discovery position of its first occurrence.
pub fn dedup(candidates: Vec<Candidate>) -> Vec<Candidate> {
	let mut slots: Vec<Slot> = Vec::with_capacity(candidates.len());
	let mut by_id: HashMap<(String, String), usize> = HashMap::new();
	let mut by_identity: HashMap<String, Vec<usize>> = HashMap::new();

	for candidate in candidates {
		let id_key = (candidate.source_tag.clone(), candidate.posting_id.clone());
		let identity = candidate.merge_identity();
		let existing = by_id.get(&id_key).copied().or_else(|| {
			by_identity.get(identity.as_ref()?)?.iter().copied().find(|slot| {
				!slots[*slot].sources.contains(&candidate.source_tag)
			})
		});

		match existing {
			Some(slot) => {
				by_id.insert(id_key, slot);

				let slot = &mut slots[slot];

				if !slot.sources.contains(&candidate.source_tag) {
					slot.sources.push(candidate.source_tag.clone());
				}
				if candidate.raw_similarity > slot.candidate.raw_similarity {
					tracing::debug!(
						kept = %candidate.posting_id,
						dropped = %slot.candidate.posting_id,
						"Merged duplicate posting."
					);

					slot.candidate = candidate;
				}
			},
			None => {
				let slot = slots.len();

				by_id.insert(id_key, slot);

				if let Some(identity) = identity {
					by_identity.entry(identity).or_default().push(slot);
				}

				slots.push(Slot { sources: vec![candidate.source_tag.clone()], candidate });
			},
		}
	}

	slots.into_iter().map(|slot| slot.candidate).collect()
}

struct Slot {
	candidate: Candidate,
	/// Sources whose postings were merged into this slot.
	sources: Vec<String>,
}
