//! Operator-facing display collaborators.
//!
//! The session core never talks to a window manager or an editor binary
//! directly; it sees a [`Viewport`] that reports a usable display width
//! and shows rendered text until told to close it.

mod editor;
mod prompt;

pub use editor::{EditorHandle, EditorViewport};
pub use prompt::{parse_decision, Decision, DecisionPrompt, TerminalPrompt};

use thiserror::Error;

/// Errors raised by display collaborators.
#[derive(Debug, Error)]
pub enum ViewportError {
    #[error("editor '{0}' not found in PATH")]
    EditorNotFound(String),

    #[error("failed to launch editor: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("editor did not become ready: {0}")]
    NotReady(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A display surface for rendered pair text.
pub trait Viewport {
    /// Handle to one shown view, passed back to [`Viewport::close`].
    type Handle;

    /// Usable display width in characters.
    fn display_width(&self) -> usize;

    /// Show `content` to the operator, labeled with the pair identity.
    fn show(&mut self, content: &str, label: &str) -> Result<Self::Handle, ViewportError>;

    /// Tear down a previously shown view.
    fn close(&mut self, handle: Self::Handle) -> Result<(), ViewportError>;
}
