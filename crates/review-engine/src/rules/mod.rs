pub mod duplicate;
pub mod lexical;

pub use duplicate::{check_duplicates, SequenceRatio, Similarity};
pub use lexical::check_lexical;
