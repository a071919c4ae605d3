mod matching;
mod terms;

pub use matching::{filter_records, haystack, matches};
pub use terms::SearchTerms;
