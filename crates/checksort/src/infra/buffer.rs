//! Buffer abstraction over whatever holds the document text.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::app::reorder::reorder;
use crate::domain::errors::BufferError;
use crate::domain::model::Caret;
use crate::infra::config::SortRules;

/// What the engine needs from a host document: read-and-replace text, plus
/// a caret it can read and remap.
pub trait BufferProvider {
    fn text(&self) -> Result<String, BufferError>;
    fn set_text(&mut self, text: &str) -> Result<(), BufferError>;
    fn caret(&self) -> Caret;
    fn set_caret(&mut self, caret: Caret);
    /// Identifier used in diagnostics and policy lookups.
    fn name(&self) -> &str;
}

/// Result of applying the engine to a host buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderStatus {
    Changed,
    Unchanged,
    /// The host had no buffer to act on. A no-op the host may surface as a
    /// notice, never a fatal condition.
    NoActiveBuffer,
}

/// Apply one reorder pass to the host's active buffer, if any. The buffer
/// and caret are only written when the pass actually changed something.
pub fn reorder_active(
    buffer: Option<&mut dyn BufferProvider>,
    rules: &SortRules,
) -> Result<ReorderStatus, BufferError> {
    let Some(buffer) = buffer else {
        warn!("reorder requested without an active buffer");
        return Ok(ReorderStatus::NoActiveBuffer);
    };

    let text = buffer.text()?;
    let outcome = reorder(&text, buffer.caret(), rules);
    if !outcome.changed {
        return Ok(ReorderStatus::Unchanged);
    }

    buffer.set_text(&outcome.text)?;
    buffer.set_caret(outcome.caret);
    info!(buffer = buffer.name(), "reordered checklist items");
    Ok(ReorderStatus::Changed)
}

/// In-memory buffer for tests and the stdin/stdout path.
#[derive(Debug, Clone, Default)]
pub struct MemoryBuffer {
    name: String,
    text: String,
    caret: Caret,
}

impl MemoryBuffer {
    pub fn new(name: impl Into<String>, text: impl Into<String>, caret: Caret) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
            caret,
        }
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

impl BufferProvider for MemoryBuffer {
    fn text(&self) -> Result<String, BufferError> {
        Ok(self.text.clone())
    }

    fn set_text(&mut self, text: &str) -> Result<(), BufferError> {
        self.text = text.to_owned();
        Ok(())
    }

    fn caret(&self) -> Caret {
        self.caret
    }

    fn set_caret(&mut self, caret: Caret) {
        self.caret = caret;
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// File-backed buffer: reads on demand, writes back in place. The caret is
/// tracked host-side since a plain file has none.
#[derive(Debug, Clone)]
pub struct FileBuffer {
    path: PathBuf,
    name: String,
    caret: Caret,
}

impl FileBuffer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path.display().to_string();
        Self {
            path,
            name,
            caret: Caret::default(),
        }
    }

    pub fn with_caret(mut self, caret: Caret) -> Self {
        self.caret = caret;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl BufferProvider for FileBuffer {
    fn text(&self) -> Result<String, BufferError> {
        fs::read_to_string(&self.path).map_err(|source| BufferError::Read {
            path: self.path.clone(),
            source,
        })
    }

    fn set_text(&mut self, text: &str) -> Result<(), BufferError> {
        fs::write(&self.path, text).map_err(|source| BufferError::Write {
            path: self.path.clone(),
            source,
        })
    }

    fn caret(&self) -> Caret {
        self.caret
    }

    fn set_caret(&mut self, caret: Caret) {
        self.caret = caret;
    }

    fn name(&self) -> &str {
        &self.name
    }
}
