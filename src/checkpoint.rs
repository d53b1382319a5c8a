use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::errors::CheckpointError;

/// Index of the last successfully downloaded video, kept as one ASCII
/// integer on disk. Writes are not atomic: a crash mid-write can leave a
/// corrupt file behind.
pub struct CheckpointStore {
    path: PathBuf,
}

impl CheckpointStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read(&self) -> anyhow::Result<usize> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(CheckpointError::Missing(self.path.clone()).into());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("reading {}", self.path.display()));
            }
        };
        let idx = text
            .trim()
            .parse::<usize>()
            .map_err(|_| CheckpointError::Corrupt(text.clone()))?;
        Ok(idx)
    }

    pub fn write(&self, idx: usize) -> anyhow::Result<()> {
        std::fs::write(&self.path, idx.to_string())
            .with_context(|| format!("writing {}", self.path.display()))
    }
}

/// Failed urls of the current run, one per line. The whole file is
/// rewritten on every update.
pub struct ErrorLog {
    path: PathBuf,
}

impl ErrorLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn rewrite(&self, urls: &[String]) -> anyhow::Result<()> {
        let mut file = std::fs::File::create(&self.path)
            .with_context(|| format!("truncating {}", self.path.display()))?;
        for url in urls {
            writeln!(file, "{url}")?;
        }
        file.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn write_then_read() {
        let dir = tempdir().unwrap();
        let store = CheckpointStore::new(dir.path().join("idx.out"));
        store.write(42).unwrap();
        assert_eq!(store.read().unwrap(), 42);
        assert_eq!(std::fs::read_to_string(store.path()).unwrap(), "42");

        store.write(7).unwrap();
        assert_eq!(std::fs::read_to_string(store.path()).unwrap(), "7");
    }

    #[test]
    fn read_tolerates_trailing_newline() {
        let dir = tempdir().unwrap();
        let store = CheckpointStore::new(dir.path().join("idx.out"));
        std::fs::write(store.path(), "3\n").unwrap();
        assert_eq!(store.read().unwrap(), 3);
    }

    #[test]
    fn missing_checkpoint_fails() {
        let dir = tempdir().unwrap();
        let store = CheckpointStore::new(dir.path().join("idx.out"));
        let err = store.read().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CheckpointError>(),
            Some(CheckpointError::Missing(_))
        ));
    }

    #[test]
    fn corrupt_checkpoint_fails() {
        let dir = tempdir().unwrap();
        let store = CheckpointStore::new(dir.path().join("idx.out"));
        for bad in ["", "-1", "twelve"] {
            std::fs::write(store.path(), bad).unwrap();
            let err = store.read().unwrap_err();
            assert!(matches!(
                err.downcast_ref::<CheckpointError>(),
                Some(CheckpointError::Corrupt(_))
            ));
        }
    }

    #[test]
    fn error_log_is_rewritten_not_appended() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("errors.txt");
        std::fs::write(&path, "https://youtube.com/watch?v=old\n").unwrap();
        let log = ErrorLog::new(&path);

        log.rewrite(&["a".to_string()]).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a\n");

        log.rewrite(&["a".to_string(), "b".to_string()]).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a\nb\n");
    }
}
