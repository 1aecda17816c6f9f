//! Document pair and annotation models.
//!
//! A pair is born when loaded from the input table and consumed once its
//! judgment lands in the output ledger; only annotations are persisted.

use serde::{Deserialize, Serialize};

/// One document in a pair.
///
/// Target and reference are distinct roles; the same id may appear in both
/// roles without the documents being related.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Identifier, unique within its role.
    pub id: String,
    /// Full text body.
    pub text: String,
}

/// A candidate pair awaiting the operator's judgment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentPair {
    pub target: Document,
    pub reference: Document,
    /// Extra input columns retained for display, in configured order.
    pub metadata: Vec<(String, String)>,
}

impl DocumentPair {
    /// Build the banner shown above both rendered columns, listing the
    /// pair's retained metadata fields.
    pub fn metadata_header(&self) -> String {
        let fields = self
            .metadata
            .iter()
            .map(|(name, value)| format!("\t\t\t\t{}:{}", name, value))
            .collect::<Vec<_>>()
            .join("\n");
        format!(
            "\n\t\t\tRELEVANT METADATA:\n{}\n{}\n\n",
            fields,
            "-".repeat(77),
        )
    }
}

/// A recorded judgment; serialized as one output CSV row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub target_doc_id: String,
    pub reference_doc_id: String,
    /// `None` for rows whose judgment was never made. Tolerated on reload,
    /// never produced by the session loop.
    pub is_match: Option<bool>,
}
