use std::fs;
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("report directory {path:?} is unusable: {reason}")]
    ReportDir { path: PathBuf, reason: String },
    #[error("agent sent an empty report")]
    EmptyReport,
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Saves exported reports under a fixed name in one directory.
///
/// Bytes are staged in a temp file next to the target and renamed into
/// place, so the target is either the previous report or the new one.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    dir: PathBuf,
    filename: String,
}

impl ReportWriter {
    pub fn new(dir: impl Into<PathBuf>, filename: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            filename: filename.into(),
        }
    }

    pub fn target(&self) -> PathBuf {
        self.dir.join(&self.filename)
    }

    pub fn save(&self, report: &[u8]) -> Result<PathBuf, PersistError> {
        if report.is_empty() {
            return Err(PersistError::EmptyReport);
        }
        prepare_dir(&self.dir)?;

        let mut staged = NamedTempFile::new_in(&self.dir)?;
        staged.write_all(report)?;
        staged.as_file_mut().sync_all()?;

        let target = self.target();
        staged.persist(&target).map_err(|err| PersistError::Io(err.error))?;
        Ok(target)
    }
}

fn prepare_dir(dir: &Path) -> Result<(), PersistError> {
    let unusable = |reason: String| PersistError::ReportDir {
        path: dir.to_path_buf(),
        reason,
    };
    match fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(unusable("not a directory".to_string())),
        Err(err) if err.kind() == ErrorKind::NotFound => {
            fs::create_dir_all(dir).map_err(|err| unusable(err.to_string()))
        }
        Err(err) => Err(unusable(err.to_string())),
    }
}
