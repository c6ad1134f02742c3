// Resume-to-job matching: corpus loading, TF-IDF index, pluggable scorers,
// skill highlighting, and the screening pipeline shared by the API and the CLI.

pub mod corpus;
pub mod handlers;
pub mod highlight;
pub mod scoring;
pub mod screening;
pub mod tfidf;
