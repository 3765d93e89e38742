//! Error types for the converters and the sync checker

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while converting a DataCite XML document
///
/// Only a document that cannot be parsed aborts a conversion. Missing
/// elements and unknown vocabulary values are never errors.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Malformed XML document: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("Malformed XML document: input is not valid UTF-8 ({0})")]
    Encoding(#[from] std::str::Utf8Error),

    #[error("Failed to load document from {path}: {reason}")]
    LoadError { path: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid path: {0}")]
    InvalidPath(PathBuf),
}

/// Errors raised by the JSON-LD to JSKOS converter
#[derive(Error, Debug)]
pub enum JskosError {
    #[error("Invalid JSON-LD graph: {0}")]
    InvalidGraph(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that stop the enum sync check before any entry is compared
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("profile not found at {}", .0.display())]
    ProfileNotFound(PathBuf),

    #[error("enum_lists dir not found at {}", .0.display())]
    EnumDirNotFound(PathBuf),

    #[error("Failed to read {path}: {reason}")]
    LoadError { path: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
