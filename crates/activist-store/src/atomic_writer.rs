//! Atomic file writer for the tenant blob

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Writes to a sibling temporary file and renames it over the target on commit.
///
/// Readers see either the previous file or the complete new one, never a
/// partial write. Dropping the writer without committing removes the
/// temporary file and leaves the target untouched.
pub struct AtomicWriter {
    temp_path: PathBuf,
    final_path: PathBuf,
    file: File,
}

impl AtomicWriter {
    pub fn new<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let final_path = path.as_ref().to_path_buf();

        if let Some(parent) = final_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let temp_path = Self::temp_path(&final_path);
        let file = File::create(&temp_path)?;

        Ok(Self {
            temp_path,
            final_path,
            file,
        })
    }

    pub fn write(&mut self, data: &[u8]) -> io::Result<()> {
        self.file.write_all(data)
    }

    /// Flush to disk and move the temporary file into place.
    pub fn commit(mut self) -> io::Result<()> {
        self.file.flush()?;
        self.file.sync_all()?;

        fs::rename(&self.temp_path, &self.final_path)?;
        // Nothing left for Drop to clean up
        self.temp_path = PathBuf::new();
        Ok(())
    }

    /// Write `data` to `path` in one step.
    pub fn write_all<P: AsRef<Path>>(path: P, data: &[u8]) -> io::Result<()> {
        let mut writer = Self::new(path)?;
        writer.write(data)?;
        writer.commit()
    }

    fn temp_path(final_path: &Path) -> PathBuf {
        let mut temp = final_path.as_os_str().to_owned();
        temp.push(".tmp");
        PathBuf::from(temp)
    }
}

impl Drop for AtomicWriter {
    fn drop(&mut self) {
        if !self.temp_path.as_os_str().is_empty() {
            let _ = fs::remove_file(&self.temp_path);
        }
    }
}
