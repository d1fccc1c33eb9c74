#[allow(clippy::module_inception)]
mod tokenizer;

pub use tokenizer::{language_support, Tokenizer, POSITION_INCREMENT_GAP};
