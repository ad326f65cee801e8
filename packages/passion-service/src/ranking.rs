use std::cmp::Ordering;

use passion_domain::ScoredCandidate;

/// Orders by blended score, then raw similarity, both descending, and truncates to `limit`.
///
/// The sort is stable, so full ties keep discovery order. The input is left untouched.
pub fn rank(scored: &[ScoredCandidate], limit: usize) -> Vec<ScoredCandidate> {
	let mut ordered: Vec<&ScoredCandidate> = scored.iter().collect();

	ordered.sort_by(|a, b| compare(a, b));
	ordered.into_iter().take(limit).cloned().collect()
}

fn compare(a: &ScoredCandidate, b: &ScoredCandidate) -> Ordering {
	b.blended_score
		.total_cmp(&a.blended_score)
		.then_with(|| b.candidate.raw_similarity.total_cmp(&a.candidate.raw_similarity))
}

#[cfg(test)]
mod tests {
	use super::*;
	use passion_domain::{Candidate, Salary};

	fn scored(id: &str, blended: f32, raw: f32) -> ScoredCandidate {
		ScoredCandidate {
			candidate: Candidate {
				posting_id: id.to_string(),
				source_tag: "postings".to_string(),
				title: id.to_string(),
				organization: None,
				location: None,
				salary: Salary::default(),
				remote: None,
				experience_level: None,
				work_type: None,
				raw_similarity: raw,
				description: None,
			},
			boost: 0.0,
			matched_categories: Vec::new(),
			normalized_salary: 0.0,
			blended_score: blended,
		}
	}

	fn ids(items: &[ScoredCandidate]) -> Vec<&str> {
		items.iter().map(|item| item.candidate.posting_id.as_str()).collect()
	}

	#[test]
	fn sorts_by_blended_score_then_raw_similarity() {
		let input = vec![scored("a", 0.5, 0.80), scored("b", 0.7, 0.75), scored("c", 0.5, 0.85)];

		assert_eq!(ids(&rank(&input, 10)), vec!["b", "c", "a"]);
	}

	#[test]
	fn full_ties_keep_discovery_order() {
		let input = vec![scored("first", 0.42, 0.7), scored("second", 0.42, 0.7)];

		assert_eq!(ids(&rank(&input, 10)), vec!["first", "second"]);
	}

	#[test]
	fn truncates_without_touching_the_input() {
		let input = vec![scored("a", 0.1, 0.7), scored("b", 0.9, 0.7), scored("c", 0.5, 0.7)];
		let ranked = rank(&input, 2);

		assert_eq!(ids(&ranked), vec!["b", "c"]);
		assert_eq!(ids(&input), vec!["a", "b", "c"]);
	}

	#[test]
	fn output_is_sorted_and_bounded() {
		let input: Vec<_> = (0..25)
			.map(|i| scored(&i.to_string(), ((i * 7) % 11) as f32 / 10.0, (i % 3) as f32 / 10.0))
			.collect();

		for limit in [0, 1, 5, 25, 40] {
			let ranked = rank(&input, limit);

			assert!(ranked.len() <= limit);
			assert!(ranked.windows(2).all(|pair| pair[0].blended_score >= pair[1].blended_score));
		}
	}
}
