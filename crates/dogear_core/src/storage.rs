use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, warn};
use thiserror::Error;

use crate::bookmark::BookmarkList;
use crate::codec::{decode, encode};

pub const DEFAULT_STORE_FILENAME: &str = ".dogear_store";

#[derive(Debug, Error)]
#[error("couldn't write bookmark list {}", .path.display())]
pub struct StoreWriteError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// The flat file holding the bookmark list.
#[derive(Debug, Clone)]
pub struct BookmarkFile {
    path: PathBuf,
}

impl BookmarkFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole list. A store that is missing or cannot be opened is an
    /// empty list; one that opens but cannot be read or decoded is an error, so
    /// nothing gets written over it.
    pub fn load(&self) -> Result<BookmarkList> {
        let mut handle = match File::open(&self.path) {
            Ok(handle) => handle,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                debug!("no bookmark store at {}", self.path.display());
                return Ok(BookmarkList::new());
            }
            Err(error) => {
                warn!(
                    "couldn't open bookmark store {}: {error}",
                    self.path.display()
                );
                return Ok(BookmarkList::new());
            }
        };
        if handle.metadata().is_ok_and(|metadata| metadata.is_dir()) {
            warn!(
                "bookmark store {} is a directory, not a file",
                self.path.display()
            );
            return Ok(BookmarkList::new());
        }

        let mut raw = Vec::new();
        handle
            .read_to_end(&mut raw)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        let content = String::from_utf8(raw).with_context(|| {
            format!(
                "bookmark store {} is not valid UTF-8; fix or remove the damaged record",
                self.path.display()
            )
        })?;

        let bookmarks = decode(&content);
        debug!(
            "loaded {} bookmarks from {}",
            bookmarks.len(),
            self.path.display()
        );
        Ok(bookmarks)
    }

    /// Rewrite the file in full.
    pub fn save(&self, bookmarks: &BookmarkList) -> Result<(), StoreWriteError> {
        let wrap = |source: io::Error| StoreWriteError {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(wrap)?;
        }
        fs::write(&self.path, encode(bookmarks)).map_err(wrap)?;
        debug!(
            "saved {} bookmarks to {}",
            bookmarks.len(),
            self.path.display()
        );
        Ok(())
    }
}
