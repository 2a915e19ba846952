//! Text preparation: character filtering, case folding and tokenization.

pub mod normalize;
pub mod tokenize;

pub use normalize::{normalize, FilterPolicy, FilterSource};
pub use tokenize::{tokenize, HyphenMode};
