//! Advisory keyword to job-title suggestions, used only for empty-result messaging.

use std::collections::HashSet;

const TITLE_SUGGESTIONS: &[(&str, &[&str])] = &[
	("data", &["Data Scientist", "Data Analyst", "Data Engineer"]),
	("analytics", &["Data Analyst", "Business Intelligence Analyst"]),
	("software", &["Software Engineer", "Software Developer"]),
	("coding", &["Software Developer", "Web Developer"]),
	("programming", &["Software Developer", "Web Developer"]),
	("design", &["Graphic Designer", "UX Designer"]),
	("teaching", &["Teacher", "Instructional Designer"]),
	("students", &["Teacher", "Academic Advisor"]),
	("health", &["Registered Nurse", "Healthcare Administrator"]),
	("patients", &["Registered Nurse", "Medical Assistant"]),
	("nursing", &["Registered Nurse"]),
	("finance", &["Financial Analyst", "Accountant"]),
	("money", &["Financial Analyst", "Financial Advisor"]),
	("accounting", &["Accountant", "Auditor"]),
	("writing", &["Content Writer", "Technical Writer", "Copywriter"]),
	("marketing", &["Marketing Manager", "Digital Marketing Specialist"]),
	("sales", &["Sales Representative", "Account Executive"]),
	("cooking", &["Chef", "Food Service Manager"]),
	("food", &["Chef", "Food Scientist"]),
	("research", &["Research Scientist", "Research Assistant"]),
	("science", &["Research Scientist", "Lab Technician"]),
	("animals", &["Veterinary Technician", "Animal Care Specialist"]),
	("music", &["Music Teacher", "Audio Engineer"]),
	("people", &["Human Resources Specialist", "Recruiter"]),
	("helping", &["Social Worker", "Counselor"]),
	("building", &["Construction Manager", "Civil Engineer"]),
	("machine", &["Machine Learning Engineer"]),
];

/// Titles for every keyword with an entry, deduplicated, in keyword order.
pub fn suggest_titles(keywords: &[String], max: usize) -> Vec<String> {
	let mut seen = HashSet::new();
	let mut out = Vec::new();

	for keyword in keywords {
		let Some((_, titles)) =
			TITLE_SUGGESTIONS.iter().find(|(key, _)| *key == keyword.as_str())
		else {
			continue;
		};

		for title in *titles {
			if out.len() >= max {
				return out;
			}
			if seen.insert(*title) {
				out.push(title.to_string());
			}
		}
	}

	out
}
