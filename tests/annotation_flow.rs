//! End-to-end annotation flow over real CSV files.
//!
//! Drives a full session through the public API with in-process
//! collaborators standing in for the editor and the operator.

use std::collections::VecDeque;
use std::fs;
use std::io;
use std::path::Path;

use tempfile::TempDir;

use docmatch::config::{ColumnMapping, Settings};
use docmatch::display::{Decision, DecisionPrompt, Viewport, ViewportError};
use docmatch::models::DocumentPair;
use docmatch::render::LayoutOptions;
use docmatch::services::{AnnotationSession, QueueFilter};

const OUTPUT_HEADER_LINE: &str = "target_doc_id,reference_doc_id,is_match\n";

/// Viewport that renders nowhere; the session only needs show/close to
/// balance.
struct InlineViewport {
    width: usize,
    open: usize,
}

impl Viewport for InlineViewport {
    type Handle = ();

    fn display_width(&self) -> usize {
        self.width
    }

    fn show(&mut self, _content: &str, _label: &str) -> Result<(), ViewportError> {
        self.open += 1;
        Ok(())
    }

    fn close(&mut self, _handle: ()) -> Result<(), ViewportError> {
        self.open -= 1;
        Ok(())
    }
}

struct ScriptedPrompt {
    answers: VecDeque<Decision>,
}

impl ScriptedPrompt {
    fn new(answers: &[Decision]) -> Self {
        Self {
            answers: answers.iter().copied().collect(),
        }
    }
}

impl DecisionPrompt for ScriptedPrompt {
    fn ask(&mut self, _pair: &DocumentPair) -> io::Result<Decision> {
        Ok(self.answers.pop_front().unwrap_or(Decision::Cancelled))
    }
}

fn settings_for(dir: &Path) -> Settings {
    Settings {
        input_path: dir.join("docs.csv"),
        output_path: dir.join("annotations.csv"),
        columns: ColumnMapping {
            target_text: "doc_text".to_string(),
            target_id: "doc_id".to_string(),
            reference_text: "ref_text".to_string(),
            reference_id: "ref_id".to_string(),
        },
        metadata_columns: Vec::new(),
        editor: "true".to_string(),
        display_width: Some(60),
        queue_filter: QueueFilter::EitherRole,
        layout: LayoutOptions::default(),
    }
}

fn run_session(settings: &Settings, answers: &[Decision]) -> docmatch::services::SessionOutcome {
    let mut session = AnnotationSession::load(settings).unwrap();
    let mut viewport = InlineViewport {
        width: 60,
        open: 0,
    };
    let mut prompt = ScriptedPrompt::new(answers);
    let outcome = session.run(&mut viewport, &mut prompt).unwrap();
    assert_eq!(viewport.open, 0);
    outcome
}

#[test]
fn full_session_then_resume_with_empty_queue() {
    let dir = TempDir::new().unwrap();
    let settings = settings_for(dir.path());
    fs::write(
        &settings.input_path,
        "doc_text,doc_id,ref_text,ref_id\n\
         the first target,t1,the first reference,r1\n\
         the second target,t2,the second reference,r2\n",
    )
    .unwrap();

    // First run: one match, one non-match, in input order.
    let outcome = run_session(&settings, &[Decision::Match, Decision::NoMatch]);
    assert_eq!(outcome.annotated, 2);
    assert!(!outcome.interrupted);

    let written = fs::read_to_string(&settings.output_path).unwrap();
    assert_eq!(
        written,
        format!("{OUTPUT_HEADER_LINE}t1,r1,true\nt2,r2,false\n")
    );

    // Second run against the same files: nothing pending, and the ledger
    // bytes are untouched.
    let before = fs::read(&settings.output_path).unwrap();
    let resumed = AnnotationSession::load(&settings).unwrap();
    assert_eq!(resumed.pending(), 0);
    assert_eq!(resumed.annotated(), 2);
    let outcome = run_session(&settings, &[]);
    assert_eq!(outcome.annotated, 0);
    assert_eq!(fs::read(&settings.output_path).unwrap(), before);
}

#[test]
fn interrupted_session_resumes_where_it_left_off() {
    let dir = TempDir::new().unwrap();
    let settings = settings_for(dir.path());
    fs::write(
        &settings.input_path,
        "doc_text,doc_id,ref_text,ref_id\n\
         one,t1,un,r1\n\
         two,t2,deux,r2\n\
         three,t3,trois,r3\n",
    )
    .unwrap();

    let outcome = run_session(&settings, &[Decision::NoMatch, Decision::Cancelled]);
    assert_eq!(outcome.annotated, 1);
    assert!(outcome.interrupted);
    assert_eq!(
        fs::read_to_string(&settings.output_path).unwrap(),
        format!("{OUTPUT_HEADER_LINE}t1,r1,false\n")
    );

    // The judged pair stays gone; the other two come back.
    let resumed = AnnotationSession::load(&settings).unwrap();
    assert_eq!(resumed.pending(), 2);

    let outcome = run_session(&settings, &[Decision::Match, Decision::Match]);
    assert_eq!(outcome.annotated, 2);
    assert_eq!(
        fs::read_to_string(&settings.output_path).unwrap(),
        format!("{OUTPUT_HEADER_LINE}t1,r1,false\nt2,r2,true\nt3,r3,true\n")
    );
}

#[test]
fn queue_filter_variants_disagree_on_partial_overlap() {
    let dir = TempDir::new().unwrap();
    let mut settings = settings_for(dir.path());
    fs::write(
        &settings.input_path,
        "doc_text,doc_id,ref_text,ref_id\n\
         one,t1,un,r1\n\
         one again,t1,deux,r2\n",
    )
    .unwrap();
    fs::write(
        &settings.output_path,
        format!("{OUTPUT_HEADER_LINE}t1,r1,true\n"),
    )
    .unwrap();

    // Either-role: t1 already appeared as a target, so both rows drop.
    let session = AnnotationSession::load(&settings).unwrap();
    assert_eq!(session.pending(), 0);

    // Exact-pair: only the annotated (t1, r1) row drops.
    settings.queue_filter = QueueFilter::ExactPair;
    let session = AnnotationSession::load(&settings).unwrap();
    assert_eq!(session.pending(), 1);
}

#[test]
fn judgments_round_trip_through_the_output_table() {
    let dir = TempDir::new().unwrap();
    let settings = settings_for(dir.path());
    fs::write(
        &settings.input_path,
        "doc_text,doc_id,ref_text,ref_id\none,t1,un,r1\n",
    )
    .unwrap();

    run_session(&settings, &[Decision::Match]);

    let mut reader = csv::Reader::from_path(&settings.output_path).unwrap();
    let rows: Vec<docmatch::models::Annotation> =
        reader.deserialize().collect::<Result<_, _>>().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].target_doc_id, "t1");
    assert_eq!(rows[0].reference_doc_id, "r1");
    assert_eq!(rows[0].is_match, Some(true));
}
