//! Load configuration.
//!
//! A [`LoadConfig`] names what to load, in order, and how to build asset
//! paths. It can be written in any format the loader understands:
//!
//! ```ron
//! (
//!     paths: ["mods/base", "mods/extra", "xpedia.txt"],
//!     options: (mod_root: "user/mods/{modName}/"),
//! )
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;
use xpedia_core::{Document, ParseOptions};

use crate::loader::{DataLoadError, deserialize_file, read_path};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadConfig {
    /// Document directories, single documents or corpus files. Later paths
    /// patch earlier ones.
    pub paths: Vec<PathBuf>,
    pub options: ParseOptions,
}

impl LoadConfig {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self {
            paths,
            options: ParseOptions::default(),
        }
    }

    /// Read a configuration file. Relative paths in it are taken relative to
    /// the file's directory.
    pub fn from_file(path: &Path) -> Result<Self, DataLoadError> {
        let mut config: LoadConfig = deserialize_file(path)?;
        if let Some(base) = path.parent() {
            for entry in &mut config.paths {
                if entry.is_relative() {
                    *entry = base.join(&*entry);
                }
            }
        }
        Ok(config)
    }

    /// Read every configured path into documents, in order.
    pub fn documents(&self) -> Result<Vec<Document>, DataLoadError> {
        let mut documents = Vec::new();
        for path in &self.paths {
            let read = read_path(path)?;
            debug!(path = %path.display(), documents = read.len(), "path read");
            documents.extend(read);
        }
        Ok(documents)
    }
}
