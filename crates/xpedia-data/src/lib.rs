pub mod config;
pub mod corpus;
pub mod library;
pub mod loader;

pub use config::LoadConfig;
pub use corpus::parse_corpus;
pub use library::Library;
pub use loader::{DataLoadError, read_document, read_documents, read_path};
