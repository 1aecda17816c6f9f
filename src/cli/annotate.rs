//! The annotation command: wires the session to the terminal and editor.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use console::style;

use crate::config::Settings;
use crate::display::{EditorViewport, TerminalPrompt};
use crate::services::AnnotationSession;

/// Run one annotation session over the pending queue.
pub fn cmd_annotate(settings: &Settings) -> anyhow::Result<()> {
    println!(
        "{} Starting annotation session\n  input file  -> {}\n  output file -> {}",
        style("→").cyan(),
        settings.input_path.display(),
        settings.output_path.display(),
    );

    let mut session = AnnotationSession::load(settings)?;

    if session.pending() == 0 {
        println!(
            "{} All document pairs have been annotated",
            style("!").yellow()
        );
        return Ok(());
    }

    println!(
        "{} {} pairs pending ({} already annotated)",
        style("→").cyan(),
        session.pending(),
        session.annotated(),
    );

    let cancelled = Arc::new(AtomicBool::new(false));
    {
        let cancelled = cancelled.clone();
        ctrlc::set_handler(move || {
            cancelled.store(true, Ordering::SeqCst);
        })?;
    }

    let mut viewport = EditorViewport::new(&settings.editor, settings.display_width)?;
    let mut prompt = TerminalPrompt::new(cancelled);

    let outcome = session.run(&mut viewport, &mut prompt)?;

    if outcome.interrupted {
        println!(
            "{} Session interrupted; {} of {} judgments saved to {}",
            style("!").yellow(),
            outcome.annotated,
            outcome.total,
            settings.output_path.display(),
        );
    } else {
        println!(
            "{} Annotation complete: {} judgments saved to {}",
            style("✓").green(),
            outcome.annotated,
            settings.output_path.display(),
        );
    }

    Ok(())
}
