//! The current catalog, replaced wholesale on every successful load.
//!
//! A failed load leaves the previously loaded ruleset in place.

use std::path::PathBuf;

use tracing::{info, warn};
use xpedia_core::{Document, ParseOptions, Ruleset};

use crate::config::LoadConfig;
use crate::corpus::parse_corpus;
use crate::loader::DataLoadError;

#[derive(Debug, Default)]
pub struct Library {
    current: Option<Ruleset>,
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    /// The ruleset of the last successful load.
    pub fn current(&self) -> Option<&Ruleset> {
        self.current.as_ref()
    }

    /// Build a ruleset from decoded documents and make it current.
    pub fn load_documents(
        &mut self,
        documents: &[Document],
        options: &ParseOptions,
    ) -> Result<&Ruleset, DataLoadError> {
        match Ruleset::parse_with(documents, options) {
            Ok(ruleset) => {
                info!(mod_name = ruleset.mod_name().unwrap_or_default(), "catalog replaced");
                Ok(self.current.insert(ruleset))
            }
            Err(error) => {
                warn!(%error, kept_previous = self.current.is_some(), "load failed");
                Err(error.into())
            }
        }
    }

    /// Split, decode and load a text corpus.
    pub fn load_corpus(&mut self, text: &str, options: &ParseOptions) -> Result<&Ruleset, DataLoadError> {
        let documents = parse_corpus(text);
        self.load_documents(&documents, options)
    }

    /// Load directories, documents and corpus files, in order.
    pub fn load_paths(&mut self, paths: &[PathBuf], options: &ParseOptions) -> Result<&Ruleset, DataLoadError> {
        let config = LoadConfig {
            paths: paths.to_vec(),
            options: options.clone(),
        };
        self.load_config(&config)
    }

    pub fn load_config(&mut self, config: &LoadConfig) -> Result<&Ruleset, DataLoadError> {
        let documents = config.documents()?;
        self.load_documents(&documents, &config.options)
    }
}
