use std::fs;
use std::io;
use std::path::Path;

use tracing::debug;

use crate::Result;
use crate::error::OperationError;
use crate::traits::HostFiles;

pub struct FileSystemHost;

impl FileSystemHost {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for FileSystemHost {
    fn default() -> Self {
        Self::new()
    }
}

impl HostFiles for FileSystemHost {
    fn create_dir_all(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path).map_err(|source| OperationError::DirCreate {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "directory ready");
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read_optional(&self, path: &Path) -> Result<Option<String>> {
        match fs::read_to_string(path) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(OperationError::FileRead {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    fn write(&self, path: &Path, contents: &str) -> Result<()> {
        fs::write(path, contents).map_err(|source| OperationError::FileWrite {
            path: path.to_path_buf(),
            source,
        })
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        match fs::remove_file(path) {
            Ok(()) => {
                debug!(path = %path.display(), "removed file");
                Ok(())
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(OperationError::FileRemove {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}
