//! Error types for the persistence layer.
//!
//! The catalog and the playlist store fail in different ways: without a
//! catalog nothing else can run, while a broken playlist file only costs that
//! one file. Each side gets its own enum so callers cannot confuse the two.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Startup failure while reading the song catalog. Always fatal.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("failed to read catalog {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse catalog {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: quick_xml::DeError,
    },
}

/// Failure while reading, creating or writing playlist documents.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to list playlist directory {path}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to create playlist directory {path}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read playlist {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse playlist {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize playlist {path}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write playlist {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("playlist {0} already exists")]
    AlreadyExists(PathBuf),

    #[error("catalog is empty, no song available to seed a new folder")]
    EmptyCatalog,
}
