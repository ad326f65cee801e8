//! Domain categories shared by scoring and presentation.
//!
//! The table is the single source of truth for category keywords. Bump
//! [`CATEGORY_TABLE_VERSION`] whenever a keyword set changes.

use serde::Serialize;

use crate::terms::Terms;

pub const CATEGORY_TABLE_VERSION: &str = "categories/v1";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Category {
	pub name: &'static str,
	/// Lowercase words or phrases, matched on word boundaries.
	pub keywords: &'static [&'static str],
}
impl Category {
	pub fn matches(&self, terms: &Terms) -> bool {
		terms.contains_any(self.keywords.iter().copied())
	}
}

const CATEGORIES: &[Category] = &[
	Category {
		name: "healthcare",
		keywords: &[
			"health",
			"healthcare",
			"medical",
			"medicine",
			"nurse",
			"nursing",
			"patient",
			"patients",
			"clinical",
			"hospital",
			"doctor",
			"physician",
			"therapy",
			"therapist",
			"pharmacy",
			"dental",
		],
	},
	Category {
		name: "technology",
		keywords: &[
			"technology",
			"tech",
			"software",
			"data",
			"developer",
			"programming",
			"coding",
			"code",
			"computer",
			"computers",
			"ai",
			"machine learning",
			"analytics",
			"cloud",
			"cybersecurity",
			"web",
			"python",
		],
	},
	Category {
		name: "finance",
		keywords: &[
			"finance",
			"financial",
			"accounting",
			"accountant",
			"banking",
			"bank",
			"investment",
			"investing",
			"money",
			"economics",
			"tax",
			"audit",
			"budget",
		],
	},
	Category {
		name: "education",
		keywords: &[
			"education",
			"teaching",
			"teacher",
			"teach",
			"tutoring",
			"tutor",
			"school",
			"students",
			"curriculum",
			"instructor",
			"professor",
			"training",
		],
	},
	Category {
		name: "creative",
		keywords: &[
			"design",
			"designer",
			"art",
			"arts",
			"creative",
			"writing",
			"writer",
			"music",
			"film",
			"video",
			"photography",
			"fashion",
			"content",
		],
	},
	Category {
		name: "engineering",
		keywords: &[
			"engineering",
			"mechanical",
			"electrical",
			"civil",
			"manufacturing",
			"construction",
			"architecture",
			"robotics",
		],
	},
	Category {
		name: "marketing",
		keywords: &[
			"marketing",
			"sales",
			"advertising",
			"brand",
			"branding",
			"social media",
			"communications",
			"public relations",
		],
	},
	Category {
		name: "hospitality",
		keywords: &[
			"cooking", "chef", "food", "restaurant", "hotel", "travel", "hospitality", "baking",
		],
	},
	Category {
		name: "science",
		keywords: &[
			"science",
			"research",
			"biology",
			"chemistry",
			"physics",
			"environment",
			"environmental",
			"climate",
			"sustainability",
			"animals",
			"nature",
			"laboratory",
		],
	},
	Category {
		name: "public_service",
		keywords: &[
			"law",
			"legal",
			"lawyer",
			"policy",
			"government",
			"justice",
			"nonprofit",
			"community",
			"social work",
		],
	},
];

pub fn categories() -> &'static [Category] {
	CATEGORIES
}

/// Categories whose keywords appear in both texts, in table order.
pub fn matching_categories(query: &Terms, posting: &Terms) -> Vec<&'static Category> {
	if query.is_empty() || posting.is_empty() {
		return Vec::new();
	}

	CATEGORIES
		.iter()
		.filter(|category| category.matches(query) && category.matches(posting))
		.collect()
}

#[cfg(test)]
mod tests {
	use std::collections::HashSet;

	use super::*;

	#[test]
	fn category_names_are_unique() {
		let mut seen = HashSet::new();

		for category in categories() {
			assert!(seen.insert(category.name), "Duplicate category {}.", category.name);
		}
	}

	#[test]
	fn keywords_are_lowercase_and_trimmed() {
		for category in categories() {
			for keyword in category.keywords {
				assert_eq!(*keyword, keyword.trim().to_lowercase(), "Bad keyword {keyword:?}.");
			}
		}
	}

	#[test]
	fn requires_keyword_on_both_sides() {
		let query = Terms::new("I love working with data and solving problems");
		let data_role = Terms::new("Data Scientist");
		let chef_role = Terms::new("Line Chef");
		let matched = matching_categories(&query, &data_role);

		assert_eq!(matched.len(), 1);
		assert_eq!(matched[0].name, "technology");
		assert!(matching_categories(&query, &chef_role).is_empty());
	}

	#[test]
	fn counts_every_shared_category() {
		let query = Terms::new("teaching kids about data and biology");
		let posting = Terms::new("Biology teacher with data analytics duties");
		let names: Vec<_> =
			matching_categories(&query, &posting).iter().map(|category| category.name).collect();

		assert_eq!(names, vec!["technology", "education", "science"]);
	}
}
