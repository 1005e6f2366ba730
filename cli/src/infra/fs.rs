//! Filesystem-backed `ManifestReader`.

use std::io::ErrorKind;
use std::path::Path;

use crate::application::ports::ManifestReader;
use crate::domain::{Manifest, ManifestError};

pub struct FsManifestReader;

impl ManifestReader for FsManifestReader {
    fn read_manifest(&self, path: &Path) -> Result<Manifest, ManifestError> {
        let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ManifestError::Missing {
                path: path.to_path_buf(),
            },
            _ => ManifestError::Unreadable {
                path: path.to_path_buf(),
                reason: e.to_string(),
            },
        })?;
        Manifest::parse(&text)
    }
}
