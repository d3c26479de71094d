//! Atomic TOML file operations.
//!
//! Session and bookmark files are small documents rewritten as a whole.
//! Every write goes to a sibling temp file, is synced, and then renamed
//! over the target, so readers never observe a half-written file.

use serde::{Serialize, de::DeserializeOwned};
use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use story_core::error::{Result, StoryError};

/// A handle to a TOML document stored with atomic replace semantics.
pub struct AtomicTomlFile<T> {
    path: PathBuf,
    _phantom: PhantomData<T>,
}

impl<T> AtomicTomlFile<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _phantom: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads and deserializes the file.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(T))`: Successfully loaded and deserialized
    /// - `Ok(None)`: File doesn't exist or is empty
    /// - `Err`: Failed to read or parse the file
    pub fn load(&self) -> Result<Option<T>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;

        if content.trim().is_empty() {
            return Ok(None);
        }

        let data: T = toml::from_str(&content)?;
        Ok(Some(data))
    }

    /// Serializes `data` and atomically replaces the file.
    pub fn save(&self, data: &T) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let toml_string = toml::to_string_pretty(data)?;

        let tmp_path = self.temp_path()?;
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(toml_string.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path)?;

        Ok(())
    }

    /// Removes the file. A missing file is not an error.
    pub fn delete(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Read-modify-write under an exclusive file lock.
    ///
    /// `f` receives the current document (or `default_value` when the
    /// file does not exist). When it returns `Ok`, the document is
    /// written back atomically and the closure's value is returned.
    pub fn update<R, F>(&self, default_value: T, f: F) -> Result<R>
    where
        F: FnOnce(&mut T) -> Result<R>,
    {
        let _lock = FileLock::acquire(&self.path)?;

        let mut data = self.load()?.unwrap_or(default_value);
        let outcome = f(&mut data)?;
        self.save(&data)?;

        Ok(outcome)
    }

    fn temp_path(&self) -> Result<PathBuf> {
        let parent = self
            .path
            .parent()
            .ok_or_else(|| StoryError::io("Path has no parent directory"))?;

        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| StoryError::io("Path has no file name"))?;

        let tmp_name = format!(".{}.tmp", file_name.to_string_lossy());
        Ok(parent.join(tmp_name))
    }
}

/// Exclusive lock guard, released when dropped.
struct FileLock {
    #[allow(dead_code)]
    file: File,
    lock_path: PathBuf,
}

impl FileLock {
    fn acquire(path: &Path) -> Result<Self> {
        let lock_path = path.with_extension("lock");

        if let Some(parent) = lock_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        #[cfg(unix)]
        {
            use fs2::FileExt;
            file.lock_exclusive()
                .map_err(|e| StoryError::io(format!("Failed to acquire lock: {}", e)))?;
        }

        Ok(FileLock { file, lock_path })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.lock_path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Counter {
        value: u32,
    }

    #[test]
    fn test_load_missing_file_is_none() {
        let dir = TempDir::new().unwrap();
        let file: AtomicTomlFile<Counter> = AtomicTomlFile::new(dir.path().join("missing.toml"));
        assert!(file.load().unwrap().is_none());
    }

    #[test]
    fn test_save_creates_parent_and_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("counter.toml");
        let file = AtomicTomlFile::new(path.clone());

        file.save(&Counter { value: 3 }).unwrap();

        assert_eq!(file.load().unwrap(), Some(Counter { value: 3 }));
        assert!(!path.with_file_name(".counter.toml.tmp").exists());
    }

    #[test]
    fn test_update_applies_closure() {
        let dir = TempDir::new().unwrap();
        let file = AtomicTomlFile::new(dir.path().join("counter.toml"));

        let after = file
            .update(Counter::default(), |c| {
                c.value += 2;
                Ok(c.value)
            })
            .unwrap();

        assert_eq!(after, 2);
        assert_eq!(file.load().unwrap(), Some(Counter { value: 2 }));
    }

    #[test]
    fn test_failed_update_keeps_previous_contents() {
        let dir = TempDir::new().unwrap();
        let file = AtomicTomlFile::new(dir.path().join("counter.toml"));
        file.save(&Counter { value: 7 }).unwrap();

        let result: Result<()> = file.update(Counter::default(), |c| {
            c.value = 100;
            Err(StoryError::internal("abort"))
        });

        assert!(result.is_err());
        assert_eq!(file.load().unwrap(), Some(Counter { value: 7 }));
    }
}
