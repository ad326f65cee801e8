pub mod category;
pub mod posting;
pub mod query;
pub mod terms;
pub mod titles;

pub use category::{CATEGORY_TABLE_VERSION, Category, categories, matching_categories};
pub use posting::{Candidate, Salary, ScoredCandidate};
pub use query::{EmptyQuery, Query, SearchFilters, SourceSelector, normalize};
pub use terms::Terms;
