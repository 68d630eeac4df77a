//! File loading: format detection, document discovery and deserialization.
//!
//! Ruleset files are YAML (`.rul`, `.yml`, `.yaml`); JSON, RON and TOML are
//! accepted as well, so hand-written fixtures and load configuration can use
//! whichever format is convenient. The format is chosen by file extension.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};
use walkdir::WalkDir;
use xpedia_core::{Document, RulesetError};

use crate::corpus::{into_document, parse_corpus, yaml_to_json};

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur during data loading.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// A path named in the load configuration does not exist.
    #[error("required path not found: {path}")]
    MissingRequired { path: PathBuf },

    /// The file has an extension we don't support.
    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// A deserialization error occurred.
    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// The file decoded, but its top level is not a mapping of sections.
    #[error("{file} is not a ruleset document: top level is {found}")]
    NotADocument { file: PathBuf, found: &'static str },

    /// The merged documents could not be built into a ruleset.
    #[error(transparent)]
    Ruleset(#[from] RulesetError),

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn parse_error(path: &Path, detail: impl ToString) -> DataLoadError {
    DataLoadError::Parse {
        file: path.to_path_buf(),
        detail: detail.to_string(),
    }
}

// ===========================================================================
// Format detection
// ===========================================================================

/// Supported data file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Yaml,
    Json,
    Ron,
    Toml,
}

/// Detect the format of a file based on its extension.
pub fn detect_format(path: &Path) -> Result<Format, DataLoadError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("rul" | "yml" | "yaml") => Ok(Format::Yaml),
        Some("json") => Ok(Format::Json),
        Some("ron") => Ok(Format::Ron),
        Some("toml") => Ok(Format::Toml),
        _ => Err(DataLoadError::UnsupportedFormat {
            file: path.to_path_buf(),
        }),
    }
}

// ===========================================================================
// Discovery
// ===========================================================================

/// Every file of a supported format under `dir`, recursively, in file-name
/// order so the document order is reproducible. Symbolic links are not
/// followed, so a link back into the tree cannot replay its documents.
pub fn discover_documents(dir: &Path) -> Result<Vec<PathBuf>, DataLoadError> {
    if !dir.is_dir() {
        return Err(DataLoadError::MissingRequired {
            path: dir.to_path_buf(),
        });
    }
    let mut found = Vec::new();
    for entry in WalkDir::new(dir).follow_links(false).sort_by_file_name() {
        let entry = entry.map_err(std::io::Error::from)?;
        if entry.file_type().is_file() && detect_format(entry.path()).is_ok() {
            found.push(entry.into_path());
        }
    }
    debug!(dir = %dir.display(), files = found.len(), "documents discovered");
    Ok(found)
}

// ===========================================================================
// Deserialization
// ===========================================================================

/// Read a file and deserialize it according to its format (detected from
/// extension).
pub fn deserialize_file<T: DeserializeOwned>(path: &Path) -> Result<T, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;

    match format {
        Format::Yaml => serde_yaml::from_str(&content).map_err(|e| parse_error(path, e)),
        Format::Json => serde_json::from_str(&content).map_err(|e| parse_error(path, e)),
        Format::Ron => ron::from_str(&content).map_err(|e| parse_error(path, e)),
        Format::Toml => toml::from_str(&content).map_err(|e| parse_error(path, e)),
    }
}

/// Read one ruleset document.
pub fn read_document(path: &Path) -> Result<Document, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;

    let value: Value = match format {
        // YAML goes through its own value type: ruleset mappings use
        // numeric keys, which the JSON model cannot take directly.
        Format::Yaml => serde_yaml::from_str::<serde_yaml::Value>(&content)
            .map(yaml_to_json)
            .map_err(|e| parse_error(path, e))?,
        Format::Json => serde_json::from_str(&content).map_err(|e| parse_error(path, e))?,
        Format::Ron => ron::from_str(&content).map_err(|e| parse_error(path, e))?,
        Format::Toml => toml::from_str(&content).map_err(|e| parse_error(path, e))?,
    };
    into_document(&path.display().to_string(), value)
}

/// Read every document under `dir`. Documents that fail to decode are
/// discarded with a warning; I/O failures abort.
pub fn read_documents(dir: &Path) -> Result<Vec<Document>, DataLoadError> {
    let mut documents = Vec::new();
    for path in discover_documents(dir)? {
        match read_document(&path) {
            Ok(document) => documents.push(document),
            Err(DataLoadError::Io(error)) => return Err(DataLoadError::Io(error)),
            Err(error) => warn!(file = %path.display(), %error, "document discarded"),
        }
    }
    Ok(documents)
}

/// Read whatever `path` names: a directory of documents, a single document,
/// or a corpus file of `FILE:`-separated documents (any other extension).
pub fn read_path(path: &Path) -> Result<Vec<Document>, DataLoadError> {
    if path.is_dir() {
        return read_documents(path);
    }
    if !path.is_file() {
        return Err(DataLoadError::MissingRequired {
            path: path.to_path_buf(),
        });
    }
    if detect_format(path).is_err() {
        let text = std::fs::read_to_string(path)?;
        return Ok(parse_corpus(&text));
    }
    match read_document(path) {
        Ok(document) => Ok(vec![document]),
        Err(DataLoadError::Io(error)) => Err(DataLoadError::Io(error)),
        Err(error) => {
            warn!(file = %path.display(), %error, "document discarded");
            Ok(Vec::new())
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
