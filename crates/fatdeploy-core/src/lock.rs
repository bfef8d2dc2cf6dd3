use crate::CoreError;
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

/// Advisory lock guarding a work directory: only one pipeline run may target
/// a given work directory at a time. Released on drop.
pub struct WorkDirLock {
    lock_file: File,
}

/// Lock file path for a work directory: a hidden sibling, so cleanup of the
/// work directory itself never removes a held lock.
pub fn lock_file_for(work_dir: &Path) -> PathBuf {
    let name = work_dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "fatdeploy".to_owned());
    work_dir
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default()
        .join(format!(".{name}.lock"))
}

impl WorkDirLock {
    pub fn acquire(lock_path: &Path) -> Result<Self, CoreError> {
        let file = Self::open(lock_path)?;
        file.lock_exclusive()
            .map_err(|e| CoreError::Io(std::io::Error::new(std::io::ErrorKind::WouldBlock, e)))?;
        Ok(Self { lock_file: file })
    }

    pub fn try_acquire(lock_path: &Path) -> Result<Option<Self>, CoreError> {
        let file = Self::open(lock_path)?;
        match file.try_lock_exclusive() {
            Ok(()) => Ok(Some(Self { lock_file: file })),
            Err(_) => Ok(None),
        }
    }

    fn open(lock_path: &Path) -> Result<File, CoreError> {
        if let Some(parent) = lock_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(lock_path)?)
    }
}

impl Drop for WorkDirLock {
    fn drop(&mut self) {
        let _ = self.lock_file.unlock();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquire_and_release() {
        let dir = tempfile::tempdir().unwrap();
        let lock_path = dir.path().join(".work.lock");

        {
            let _lock = WorkDirLock::acquire(&lock_path).unwrap();
            assert!(lock_path.exists());
        }
    }

    #[test]
    fn try_acquire_returns_none_when_held() {
        let dir = tempfile::tempdir().unwrap();
        let lock_path = dir.path().join(".work.lock");

        let _lock = WorkDirLock::acquire(&lock_path).unwrap();
        let second = WorkDirLock::try_acquire(&lock_path).unwrap();
        assert!(second.is_none());
    }

    #[test]
    fn released_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let lock_path = dir.path().join(".work.lock");

        {
            let _lock = WorkDirLock::acquire(&lock_path).unwrap();
        }
        let second = WorkDirLock::try_acquire(&lock_path).unwrap();
        assert!(second.is_some());
    }

    #[test]
    fn lock_path_is_hidden_sibling() {
        let path = lock_file_for(Path::new("/tmp/run/fatdeploy_build"));
        assert_eq!(path, PathBuf::from("/tmp/run/.fatdeploy_build.lock"));
    }
}
