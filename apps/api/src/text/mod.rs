// Text normalization: lowercase, strip, tokenize, drop stopwords, lemmatize.
// Pure functions only; every matching signal downstream is derived from here.

pub mod lemmatizer;
pub mod normalizer;
pub mod stopwords;

pub use normalizer::{normalize, NormalizedText};
