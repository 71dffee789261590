//! Editor bootstrap options.
//!
//! Options are built in code by the embedding shell; core reads no
//! environment variables or config files.

use crate::logging::{default_log_level, init_logging, LogSettings, LoggingError};
use crate::store::{DocumentStore, LoadReport};
use std::path::PathBuf;

/// Startup options for one editor session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorOptions {
    /// Document file loaded at startup and used by `save_to_source`.
    pub document_path: PathBuf,
    /// Log level; defaults by build mode.
    pub log_level: String,
    /// Absolute log directory. `None` leaves logging uninitialized.
    pub log_dir: Option<PathBuf>,
}

impl EditorOptions {
    pub fn new(document_path: impl Into<PathBuf>) -> Self {
        Self {
            document_path: document_path.into(),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }

    pub fn with_log_dir(mut self, log_dir: impl Into<PathBuf>) -> Self {
        self.log_dir = Some(log_dir.into());
        self
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Starts logging when configured, then loads the document.
    ///
    /// Document problems never fail here; they degrade to an empty document
    /// reported in `LoadReport`.
    pub fn open(&self) -> Result<(DocumentStore, LoadReport), LoggingError> {
        if let Some(log_dir) = &self.log_dir {
            init_logging(&LogSettings::new(&self.log_level, log_dir)?)?;
        }
        let mut store = DocumentStore::with_source(self.document_path.clone());
        let report = store.load();
        Ok((store, report))
    }
}

#[cfg(test)]
mod tests {
    use super::EditorOptions;
    use std::io::Write;

    #[test]
    fn open_without_log_dir_loads_document() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"groups": [{{"id": "g1", "name": "Lane"}}]}}"#).unwrap();

        let (store, report) = EditorOptions::new(file.path()).open().unwrap();

        assert!(store.is_valid());
        assert_eq!(store.document().unwrap().groups[0].id, "g1");
        assert!(report.fallback.is_none());
        assert_eq!(store.source_path(), Some(file.path()));
    }
}
