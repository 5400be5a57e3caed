//! Tool implementations module

pub mod documents;

pub use documents::{list_available_components, read_full_document, search_documents};
