use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

/// Lowercased word sequence of a text, padded so phrase lookups only match on word boundaries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Terms {
	padded: String,
}
impl Terms {
	pub fn new(text: &str) -> Self {
		let folded: String = text.nfkc().collect::<String>().to_lowercase();
		let mut padded = String::with_capacity(folded.len() + 2);

		padded.push(' ');

		for word in folded.unicode_words() {
			padded.push_str(word);
			padded.push(' ');
		}

		Self { padded }
	}

	pub fn from_parts<'a>(parts: impl IntoIterator<Item = &'a str>) -> Self {
		let joined = parts.into_iter().collect::<Vec<_>>().join(" ");

		Self::new(joined.as_str())
	}

	pub fn is_empty(&self) -> bool {
		self.padded.trim().is_empty()
	}

	/// Whole-word (or whole-phrase) containment. `phrase` must already be lowercase.
	pub fn contains(&self, phrase: &str) -> bool {
		let phrase = phrase.trim();

		if phrase.is_empty() {
			return false;
		}

		let mut needle = String::with_capacity(phrase.len() + 2);

		needle.push(' ');
		needle.push_str(phrase);
		needle.push(' ');

		self.padded.contains(needle.as_str())
	}

	pub fn contains_any<'a>(&self, phrases: impl IntoIterator<Item = &'a str>) -> bool {
		phrases.into_iter().any(|phrase| self.contains(phrase))
	}

	/// Space-joined words, used as a comparison key.
	pub fn joined(&self) -> &str {
		self.padded.trim()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn matches_whole_words_only() {
		let terms = Terms::new("Senior Data-Scientist, Analytics");

		assert!(terms.contains("data"));
		assert!(terms.contains("scientist"));
		assert!(!terms.contains("dat"));
		assert!(!terms.contains("science"));
	}

	#[test]
	fn matches_phrases_across_punctuation() {
		let terms = Terms::new("Machine-learning & AI research");

		assert!(terms.contains("machine learning"));
		assert!(terms.contains("ai"));
		assert!(!terms.contains("ai learning"));
	}

	#[test]
	fn folds_compatibility_forms_and_case() {
		let terms = Terms::new("ＤＡＴＡ Engineer");

		assert_eq!(terms.joined(), "data engineer");
	}
}
