use std::path::Path;

use crate::Result;

pub trait HostFiles: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    fn create_dir_all(&self, path: &Path) -> Result<()>;

    fn exists(&self, path: &Path) -> bool;

    /// Contents of the file, or `None` when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be read.
    fn read_optional(&self, path: &Path) -> Result<Option<String>>;

    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    fn write(&self, path: &Path, contents: &str) -> Result<()>;

    /// Remove a file. Removing a missing file succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be removed.
    fn remove_file(&self, path: &Path) -> Result<()>;
}
