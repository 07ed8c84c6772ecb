pub mod normalize;

pub use normalize::{display_word, normalize_word, tokenize};
