//! Input resolution: read the raw Markdown bytes from a file or stdin.
//!
//! A missing path or `-` selects standard input. The bytes are returned as
//! read; decoding happens in the renderer, which treats invalid UTF-8
//! lossily.

use crate::error::ScidownError;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Where the source comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Stdin,
    File(PathBuf),
}

impl InputSource {
    /// Interpret the optional FILE operand.
    pub fn from_arg(path: Option<&Path>) -> Self {
        match path {
            None => InputSource::Stdin,
            Some(p) if p.as_os_str() == "-" => InputSource::Stdin,
            Some(p) => InputSource::File(p.to_path_buf()),
        }
    }

    /// Path used in error messages.
    pub fn display_path(&self) -> PathBuf {
        match self {
            InputSource::Stdin => PathBuf::from("<stdin>"),
            InputSource::File(p) => p.clone(),
        }
    }

    /// Read everything from the source.
    pub fn read(&self) -> Result<Vec<u8>, ScidownError> {
        let bytes = match self {
            InputSource::Stdin => read_all(std::io::stdin().lock()),
            InputSource::File(path) => std::fs::read(path),
        }
        .map_err(|source| ScidownError::InputRead {
            path: self.display_path(),
            source,
        })?;
        debug!("Read {} bytes from {}", bytes.len(), self.display_path().display());
        Ok(bytes)
    }
}

/// Read `reader` to the end.
pub fn read_all(mut reader: impl Read) -> std::io::Result<Vec<u8>> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    Ok(bytes)
}
