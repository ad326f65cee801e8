use std::collections::HashMap;

use passion_config::{Ranking, SourceConfig};
use passion_domain::{Candidate, Query, ScoredCandidate, matching_categories};

/// Drops candidates below their source's similarity threshold, then scores the rest.
///
/// Salary is normalized by the highest best-available salary among the surviving candidates, so
/// a set without salary data normalizes every candidate to zero. Candidates from a source that is
/// not configured are held to a zero threshold.
pub fn score_and_filter(
	query: &Query,
	candidates: &[Candidate],
	sources: &[SourceConfig],
	ranking: &Ranking,
) -> Vec<ScoredCandidate> {
	let thresholds: HashMap<&str, f32> =
		sources.iter().map(|source| (source.tag.as_str(), source.min_similarity)).collect();
	let kept: Vec<&Candidate> = candidates
		.iter()
		.filter(|candidate| {
			let threshold = thresholds.get(candidate.source_tag.as_str()).copied().unwrap_or(0.0);

			candidate.raw_similarity.is_finite() && candidate.raw_similarity >= threshold
		})
		.collect();
	let max_salary = kept
		.iter()
		.filter_map(|candidate| candidate.salary.best_available())
		.fold(0.0_f64, f64::max);

	kept.into_iter().map(|candidate| score(query, candidate, max_salary, ranking)).collect()
}

fn score(
	query: &Query,
	candidate: &Candidate,
	max_salary: f64,
	ranking: &Ranking,
) -> ScoredCandidate {
	let matched = matching_categories(query.terms(), &candidate.text_terms());
	let boost = matched.len() as f32 * ranking.category_boost;
	let normalized_salary = match candidate.salary.best_available() {
		Some(salary) if max_salary > 0.0 => (salary / max_salary) as f32,
		_ => 0.0,
	};
	let blended_score = (candidate.raw_similarity + boost) * ranking.relevance_weight
		+ normalized_salary * ranking.salary_weight;

	ScoredCandidate {
		candidate: candidate.clone(),
		boost,
		matched_categories: matched.iter().map(|category| category.name.to_string()).collect(),
		normalized_salary,
		blended_score,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use passion_config::{EmbeddingIntent, PayloadFields, QueryNormalization};
	use passion_domain::Salary;

	fn source(tag: &str, min_similarity: f32) -> SourceConfig {
		SourceConfig {
			tag: tag.to_string(),
			collection: tag.to_string(),
			vector_name: None,
			query_intent: EmbeddingIntent::Query,
			min_similarity,
			candidate_pool: 50,
			limit: 10,
			match_tag: None,
			fields: PayloadFields::default(),
		}
	}

	fn candidate(source: &str, title: &str, raw: f32, max_salary: Option<f64>) -> Candidate {
		Candidate {
			posting_id: title.to_string(),
			source_tag: source.to_string(),
			title: title.to_string(),
			organization: None,
			location: None,
			salary: Salary { max: max_salary, ..Default::default() },
			remote: None,
			experience_level: None,
			work_type: None,
			raw_similarity: raw,
			description: None,
		}
	}

	fn query(text: &str) -> Query {
		passion_domain::normalize(text, Default::default(), &QueryNormalization::default())
			.expect("Query must normalize.")
	}

	#[test]
	fn thresholds_are_per_source() {
		let sources = [source("postings", 0.70), source("titles", 0.55)];
		let candidates = [
			candidate("postings", "Nurse", 0.69, None),
			candidate("titles", "Chef", 0.60, None),
			candidate("postings", "Teacher", 0.70, None),
		];
		let scored = score_and_filter(&query("helping"), &candidates, &sources, &Ranking::default());
		let titles: Vec<_> = scored.iter().map(|item| item.candidate.title.as_str()).collect();

		assert_eq!(titles, vec!["Chef", "Teacher"]);
	}

	#[test]
	fn blends_relevance_boost_and_salary() {
		let sources = [source("postings", 0.70)];
		let candidates = [
			candidate("postings", "Data Scientist", 0.82, Some(150_000.0)),
			candidate("postings", "Line Cook", 0.75, Some(75_000.0)),
		];
		let scored = score_and_filter(
			&query("I love working with data and solving problems"),
			&candidates,
			&sources,
			&Ranking::default(),
		);

		assert_eq!(scored[0].matched_categories, vec!["technology".to_string()]);
		assert!((scored[0].boost - 0.15).abs() < 1e-6);
		assert!((scored[0].normalized_salary - 1.0).abs() < 1e-6);
		assert!((scored[0].blended_score - ((0.82 + 0.15) * 0.6 + 0.4)).abs() < 1e-6);
		assert_eq!(scored[1].boost, 0.0);
		assert!((scored[1].normalized_salary - 0.5).abs() < 1e-6);
	}

	#[test]
	fn salary_free_sets_normalize_to_zero() {
		let sources = [source("postings", 0.0)];
		let candidates =
			[candidate("postings", "Nurse", 0.8, None), candidate("postings", "Chef", 0.7, None)];
		let scored = score_and_filter(&query("cooking"), &candidates, &sources, &Ranking::default());

		assert!(scored.iter().all(|item| item.normalized_salary == 0.0));
		assert!(scored.iter().all(|item| item.blended_score.is_finite()));
	}

	#[test]
	fn scoring_is_deterministic() {
		let sources = [source("postings", 0.5)];
		let candidates = [
			candidate("postings", "Data Analyst", 0.8, Some(90_000.0)),
			candidate("postings", "Biology Teacher", 0.6, None),
		];
		let query = query("teaching biology with data");
		let first = score_and_filter(&query, &candidates, &sources, &Ranking::default());
		let second = score_and_filter(&query, &candidates, &sources, &Ranking::default());

		assert_eq!(first, second);
	}
}
