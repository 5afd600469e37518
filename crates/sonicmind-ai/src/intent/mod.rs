pub mod classifier;
pub mod parser;

pub use classifier::{KeywordClassifier, ZeroShotClassifier};
pub use parser::parse_classification_response;
