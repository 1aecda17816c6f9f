//! Annotation session manager.
//!
//! Owns the CSV-backed work queue and the append-only judgment ledger,
//! drives the per-pair loop, and flushes the ledger after every recorded
//! judgment so an interrupted session loses at most the pair in flight.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use console::style;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::{ConfigError, Settings};
use crate::display::{Decision, DecisionPrompt, Viewport, ViewportError};
use crate::models::{Annotation, Document, DocumentPair};
use crate::render::{side_by_side, LayoutError, LayoutOptions};

/// Fixed output CSV header.
const OUTPUT_HEADER: [&str; 3] = ["target_doc_id", "reference_doc_id", "is_match"];

/// Errors raised by the session manager.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("CSV error in {}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error(transparent)]
    Viewport(#[from] ViewportError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// How the work queue excludes already-annotated input rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum QueueFilter {
    /// Drop a row when either id already appears in any prior annotation
    /// in the same role, even one made for a different pair.
    #[default]
    EitherRole,
    /// Drop a row only when this exact (target, reference) pair was
    /// already annotated.
    ExactPair,
}

/// What a finished session run did.
#[derive(Debug)]
pub struct SessionOutcome {
    /// Judgments recorded and flushed during this run.
    pub annotated: usize,
    /// Queue length when the run started.
    pub total: usize,
    /// The operator cancelled before the queue drained.
    pub interrupted: bool,
}

/// Drives one annotation session over the pending pairs.
#[derive(Debug)]
pub struct AnnotationSession {
    queue: Vec<DocumentPair>,
    ledger: Vec<Annotation>,
    output_path: PathBuf,
    layout: LayoutOptions,
}

impl AnnotationSession {
    /// Load both tables and compute the pending work queue.
    ///
    /// The output table is created with just its header when missing; an
    /// existing but unreadable output table is fatal, never repaired.
    pub fn load(settings: &Settings) -> Result<Self, SessionError> {
        let ledger = load_or_create_ledger(&settings.output_path)?;
        let pairs = load_pairs(settings)?;
        let total = pairs.len();
        let queue = filter_pending(pairs, &ledger, settings.queue_filter);
        info!(
            input_rows = total,
            pending = queue.len(),
            excluded = total - queue.len(),
            filter = ?settings.queue_filter,
            "computed work queue"
        );
        Ok(Self {
            queue,
            ledger,
            output_path: settings.output_path.clone(),
            layout: settings.layout.clone(),
        })
    }

    /// Pairs still awaiting a judgment.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Judgments already in the ledger (including prior runs).
    pub fn annotated(&self) -> usize {
        self.ledger.len()
    }

    /// Append one judgment in memory. Nothing touches disk until
    /// [`AnnotationSession::flush`].
    pub fn record(&mut self, pair: &DocumentPair, is_match: bool) {
        self.ledger.push(Annotation {
            target_doc_id: pair.target.id.clone(),
            reference_doc_id: pair.reference.id.clone(),
            is_match: Some(is_match),
        });
    }

    /// Serialize the full ledger over the output file. Idempotent:
    /// re-flushing an unchanged ledger rewrites identical bytes.
    pub fn flush(&self) -> Result<(), SessionError> {
        let bytes = serialize_ledger(&self.ledger, &self.output_path)?;
        fs::write(&self.output_path, bytes)?;
        debug!(path = %self.output_path.display(), rows = self.ledger.len(), "flushed ledger");
        Ok(())
    }

    /// Drive the annotation loop until the queue drains or the operator
    /// cancels. Flushes after every recorded judgment and once more on
    /// the way out, so a cancelled run is durable too.
    pub fn run<V: Viewport, P: DecisionPrompt>(
        &mut self,
        viewport: &mut V,
        prompt: &mut P,
    ) -> Result<SessionOutcome, SessionError> {
        let total = self.queue.len();
        if total == 0 {
            return Ok(SessionOutcome {
                annotated: 0,
                total: 0,
                interrupted: false,
            });
        }

        let mut annotated = 0;
        let mut interrupted = false;
        let mut queue = std::mem::take(&mut self.queue).into_iter();

        while let Some(pair) = queue.next() {
            println!(
                "{} Opening document pair: {} --> {}",
                style("→").cyan(),
                pair.target.id,
                pair.reference.id
            );

            let width = viewport.display_width();
            let header = pair.metadata_header();
            let rendered = side_by_side(
                &pair.target.text,
                &pair.reference.text,
                width,
                &header,
                &self.layout,
            )?;
            let label = format!("{}--{}", pair.target.id, pair.reference.id);

            let handle = viewport.show(&rendered, &label)?;
            let decision = prompt.ask(&pair)?;
            viewport.close(handle)?;

            let is_match = match decision {
                Decision::Match => true,
                Decision::NoMatch => false,
                Decision::Cancelled => {
                    // The unjudged pair goes back with the rest for the
                    // next run.
                    self.queue = std::iter::once(pair).chain(queue).collect();
                    interrupted = true;
                    break;
                }
            };

            self.record(&pair, is_match);
            self.flush()?;
            annotated += 1;
        }

        self.flush()?;

        Ok(SessionOutcome {
            annotated,
            total,
            interrupted,
        })
    }
}

/// Read the existing ledger, or create an output file holding only the
/// header so a later resume sees a valid table.
fn load_or_create_ledger(path: &Path) -> Result<Vec<Annotation>, SessionError> {
    if path.exists() {
        let mut reader = csv::Reader::from_path(path).map_err(|e| SessionError::Csv {
            path: path.to_path_buf(),
            source: e,
        })?;
        reader
            .deserialize()
            .collect::<Result<Vec<Annotation>, _>>()
            .map_err(|e| SessionError::Csv {
                path: path.to_path_buf(),
                source: e,
            })
    } else {
        fs::write(path, serialize_ledger(&[], path)?)?;
        Ok(Vec::new())
    }
}

/// Serialize the ledger, header included, into CSV bytes.
fn serialize_ledger(rows: &[Annotation], path: &Path) -> Result<Vec<u8>, SessionError> {
    let csv_err = |e: csv::Error| SessionError::Csv {
        path: path.to_path_buf(),
        source: e,
    };
    let mut buf = Vec::new();
    {
        let mut writer = csv::Writer::from_writer(&mut buf);
        if rows.is_empty() {
            // serialize() would emit the header itself; with no rows it
            // must be written explicitly.
            writer.write_record(OUTPUT_HEADER).map_err(csv_err)?;
        } else {
            for row in rows {
                writer.serialize(row).map_err(csv_err)?;
            }
        }
        writer.flush()?;
    }
    Ok(buf)
}

/// Load the input table, remapping configured column names onto canonical
/// roles and retaining the configured metadata columns.
fn load_pairs(settings: &Settings) -> Result<Vec<DocumentPair>, SessionError> {
    let path = &settings.input_path;
    let csv_err = |e: csv::Error| SessionError::Csv {
        path: path.clone(),
        source: e,
    };

    let mut reader = csv::Reader::from_path(path).map_err(csv_err)?;
    let headers = reader.headers().map_err(csv_err)?.clone();
    let column = |name: &str| -> Result<usize, ConfigError> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| ConfigError::MissingColumn(name.to_string()))
    };

    let target_text = column(&settings.columns.target_text)?;
    let target_id = column(&settings.columns.target_id)?;
    let reference_text = column(&settings.columns.reference_text)?;
    let reference_id = column(&settings.columns.reference_id)?;
    let metadata: Vec<(String, usize)> = settings
        .metadata_columns
        .iter()
        .map(|name| Ok((name.clone(), column(name)?)))
        .collect::<Result<_, ConfigError>>()?;

    let mut pairs = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_err)?;
        let field = |idx: usize| record.get(idx).unwrap_or("").to_string();
        pairs.push(DocumentPair {
            target: Document {
                id: field(target_id),
                text: field(target_text),
            },
            reference: Document {
                id: field(reference_id),
                text: field(reference_text),
            },
            metadata: metadata
                .iter()
                .map(|(name, idx)| (name.clone(), field(*idx)))
                .collect(),
        });
    }
    Ok(pairs)
}

/// Drop input rows already covered by the ledger, in input-file order.
fn filter_pending(
    pairs: Vec<DocumentPair>,
    ledger: &[Annotation],
    filter: QueueFilter,
) -> Vec<DocumentPair> {
    match filter {
        QueueFilter::EitherRole => {
            let targets: HashSet<&str> = ledger.iter().map(|a| a.target_doc_id.as_str()).collect();
            let references: HashSet<&str> = ledger
                .iter()
                .map(|a| a.reference_doc_id.as_str())
                .collect();
            pairs
                .into_iter()
                .filter(|p| {
                    !targets.contains(p.target.id.as_str())
                        && !references.contains(p.reference.id.as_str())
                })
                .collect()
        }
        QueueFilter::ExactPair => {
            let seen: HashSet<(&str, &str)> = ledger
                .iter()
                .map(|a| (a.target_doc_id.as_str(), a.reference_doc_id.as_str()))
                .collect();
            pairs
                .into_iter()
                .filter(|p| !seen.contains(&(p.target.id.as_str(), p.reference.id.as_str())))
                .collect()
        }
    }
}
