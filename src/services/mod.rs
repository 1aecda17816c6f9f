//! Service layer for the annotation workflow.
//!
//! Session logic lives here, separated from terminal and editor concerns;
//! the CLI wires it to concrete collaborators.

pub mod session;

pub use session::{AnnotationSession, QueueFilter, SessionError, SessionOutcome};
