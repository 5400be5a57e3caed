//! Document ingestion
//!
//! Loads Autoware documentation pages and splits them into chunks for the
//! vector store.

pub mod loader;
pub mod splitter;

pub use loader::DocumentLoader;
pub use splitter::TextSplitter;
