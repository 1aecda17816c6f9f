//! Data model for document pairs and their judgments.

mod pair;

pub use pair::{Annotation, Document, DocumentPair};
