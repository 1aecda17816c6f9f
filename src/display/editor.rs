//! External-editor viewport.
//!
//! Writes rendered text to a scratch file and opens it in the configured
//! editor. Window geometry is never probed; the width comes from
//! configuration or a fixed fallback.

use std::fs;
use std::path::PathBuf;
use std::process::{Child, Command};
use std::sync::OnceLock;
use std::thread;
use std::time::Duration;

use regex::Regex;
use tempfile::TempDir;
use tracing::debug;

use super::{Viewport, ViewportError};
use crate::config::DEFAULT_DISPLAY_WIDTH;

/// How long a freshly spawned editor may take before we conclude it
/// failed to come up.
const READINESS_WAIT: Duration = Duration::from_millis(300);

/// Handle to one open editor window.
pub struct EditorHandle {
    child: Child,
    /// Keeps the scratch directory alive while the editor has the file open.
    _scratch: TempDir,
}

/// Viewport backed by an external editor process.
#[derive(Debug)]
pub struct EditorViewport {
    editor: PathBuf,
    width: usize,
}

impl EditorViewport {
    /// Resolve `editor` on PATH and fix the display width.
    pub fn new(editor: &str, width: Option<usize>) -> Result<Self, ViewportError> {
        let editor = which::which(editor)
            .map_err(|_| ViewportError::EditorNotFound(editor.to_string()))?;
        Ok(Self {
            editor,
            width: width.unwrap_or(DEFAULT_DISPLAY_WIDTH),
        })
    }
}

impl Viewport for EditorViewport {
    type Handle = EditorHandle;

    fn display_width(&self) -> usize {
        self.width
    }

    fn show(&mut self, content: &str, label: &str) -> Result<EditorHandle, ViewportError> {
        let scratch = TempDir::new()?;
        let path = scratch.path().join(scratch_filename(label));
        fs::write(&path, content)?;
        debug!(editor = %self.editor.display(), file = %path.display(), "opening viewport");

        let mut child = Command::new(&self.editor)
            .arg(&path)
            .spawn()
            .map_err(ViewportError::Spawn)?;

        // Bounded readiness check: an editor that exits immediately with a
        // failure status never produced a window.
        thread::sleep(READINESS_WAIT);
        if let Some(status) = child.try_wait()? {
            if !status.success() {
                return Err(ViewportError::NotReady(format!(
                    "editor exited with {status}"
                )));
            }
        }

        Ok(EditorHandle {
            child,
            _scratch: scratch,
        })
    }

    fn close(&mut self, mut handle: EditorHandle) -> Result<(), ViewportError> {
        // The operator may have closed the window already.
        if handle.child.try_wait()?.is_none() {
            handle.child.kill()?;
            let _ = handle.child.wait();
        }
        Ok(())
    }
}

fn label_sanitizer() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+|/").expect("valid pattern"))
}

/// Scratch filename derived from a pair label; whitespace and path
/// separators collapse to underscores.
fn scratch_filename(label: &str) -> String {
    format!("{}.txt", label_sanitizer().replace_all(label, "_"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scratch_filename_sanitizes_label() {
        assert_eq!(scratch_filename("doc 17"), "doc_17.txt");
        assert_eq!(scratch_filename("a/b  c"), "a_b_c.txt");
        assert_eq!(scratch_filename("plain"), "plain.txt");
    }

    #[test]
    fn test_missing_editor_is_reported_by_name() {
        let err = EditorViewport::new("definitely-not-an-editor-9z", None).unwrap_err();
        assert!(matches!(err, ViewportError::EditorNotFound(name) if name.contains("9z")));
    }
}
