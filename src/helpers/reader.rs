use crate::error::DashboardError;
use sha2::Digest;
use sha2::Sha256;
use std::fs;
use std::io::Cursor;
use std::path::Path;

/// An uploaded file: the name it was submitted under and its full content.
#[derive(Clone, Debug, PartialEq)]
pub struct UploadedFile {
    /// Original file name, used to pick the parser by extension
    pub name: String,
    /// Raw file content
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        UploadedFile {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Reads a local file into memory.
    pub fn open(path: impl AsRef<Path>) -> Result<UploadedFile, DashboardError> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(UploadedFile { name, bytes })
    }

    /// Lower-cased extension without the dot, empty if there is none.
    pub fn extension(&self) -> String {
        Path::new(&self.name)
            .extension()
            .map(|extension| extension.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default()
    }

    /// Whether the file should be parsed as delimited text.
    pub fn is_delimited(&self) -> bool {
        self.extension() == "csv"
    }

    /// Hex SHA-256 of the content.
    pub fn digest(&self) -> String {
        hex::encode(Sha256::digest(&self.bytes))
    }

    /// Seekable reader over the content.
    pub(crate) fn cursor(&self) -> Cursor<&[u8]> {
        Cursor::new(self.bytes.as_slice())
    }
}
