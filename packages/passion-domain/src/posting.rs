use serde::{Deserialize, Serialize};

use crate::terms::Terms;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Salary {
	pub min: Option<f64>,
	pub median: Option<f64>,
	pub max: Option<f64>,
	/// Single salary figure, e.g. a salary already converted to one currency.
	pub single: Option<f64>,
	pub currency: Option<String>,
	pub period: Option<String>,
}
impl Salary {
	/// Max, then median, then min, then the single figure. Non-positive values count as missing.
	pub fn best_available(&self) -> Option<f64> {
		[self.max, self.median, self.min, self.single]
			.into_iter()
			.flatten()
			.find(|value| value.is_finite() && *value > 0.0)
	}
}

/// One job posting surfaced by a vector search against a single source.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
	/// Unique within `source_tag` only.
	pub posting_id: String,
	pub source_tag: String,
	pub title: String,
	pub organization: Option<String>,
	pub location: Option<String>,
	pub salary: Salary,
	pub remote: Option<bool>,
	pub experience_level: Option<String>,
	pub work_type: Option<String>,
	pub raw_similarity: f32,
	pub description: Option<String>,
}
impl Candidate {
	/// Best-effort cross-source identity: normalized title plus organization. Postings without an
	/// organization have no identity and are never merged across sources.
	pub fn merge_identity(&self) -> Option<String> {
		let organization = self.organization.as_deref().map(Terms::new)?;
		let title = Terms::new(self.title.as_str());

		if title.is_empty() || organization.is_empty() {
			return None;
		}

		Some(format!("{}\u{1f}{}", title.joined(), organization.joined()))
	}

	/// Title and description words, used for category matching.
	pub fn text_terms(&self) -> Terms {
		Terms::from_parts(
			std::iter::once(self.title.as_str()).chain(self.description.as_deref()),
		)
	}
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
	#[serde(flatten)]
	pub candidate: Candidate,
	pub boost: f32,
	pub matched_categories: Vec<String>,
	pub normalized_salary: f32,
	pub blended_score: f32,
}

#[cfg(test)]
mod tests {
	use super::*;

	fn candidate(title: &str, organization: Option<&str>) -> Candidate {
		Candidate {
			posting_id: "1".to_string(),
			source_tag: "postings".to_string(),
			title: title.to_string(),
			organization: organization.map(str::to_string),
			location: None,
			salary: Salary::default(),
			remote: None,
			experience_level: None,
			work_type: None,
			raw_similarity: 0.8,
			description: None,
		}
	}

	#[test]
	fn best_salary_prefers_max_then_median_then_min_then_single() {
		let mut salary = Salary {
			min: Some(50_000.0),
			median: Some(70_000.0),
			max: Some(90_000.0),
			single: Some(10.0),
			..Default::default()
		};

		assert_eq!(salary.best_available(), Some(90_000.0));

		salary.max = None;

		assert_eq!(salary.best_available(), Some(70_000.0));

		salary.median = Some(0.0);

		assert_eq!(salary.best_available(), Some(50_000.0));

		salary.min = None;

		assert_eq!(salary.best_available(), Some(10.0));

		salary.single = Some(f64::NAN);

		assert_eq!(salary.best_available(), None);
	}

	#[test]
	fn merge_identity_ignores_case_and_punctuation() {
		let a = candidate("Data Scientist", Some("Acme, Inc."));
		let b = candidate("data  scientist", Some("ACME inc"));

		assert_eq!(a.merge_identity(), b.merge_identity());
		assert!(a.merge_identity().is_some());
	}

	#[test]
	fn merge_identity_requires_organization() {
		assert_eq!(candidate("Data Scientist", None).merge_identity(), None);
		assert_eq!(candidate("Data Scientist", Some("  ")).merge_identity(), None);
	}
}
