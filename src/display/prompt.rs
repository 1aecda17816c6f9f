//! Terminal judgment prompt.

use std::io::{self, BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use console::style;

use crate::models::DocumentPair;

/// Operator verdict for one pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Match,
    NoMatch,
    /// The operator ended the session; nothing gets recorded.
    Cancelled,
}

/// Source of judgments for the session loop.
pub trait DecisionPrompt {
    fn ask(&mut self, pair: &DocumentPair) -> io::Result<Decision>;
}

/// Normalize one raw input line into a judgment.
///
/// Accepts exactly "y" or "n" after trimming and case-folding; anything
/// else is rejected so the caller re-prompts.
pub fn parse_decision(input: &str) -> Option<bool> {
    match input.trim().to_lowercase().as_str() {
        "y" => Some(true),
        "n" => Some(false),
        _ => None,
    }
}

/// Interactive stdin prompt that re-asks on invalid input.
pub struct TerminalPrompt {
    cancelled: Arc<AtomicBool>,
}

impl TerminalPrompt {
    /// `cancelled` is the process-wide interrupt flag; once set, `ask`
    /// reports [`Decision::Cancelled`] instead of reading further input.
    pub fn new(cancelled: Arc<AtomicBool>) -> Self {
        Self { cancelled }
    }
}

impl DecisionPrompt for TerminalPrompt {
    fn ask(&mut self, _pair: &DocumentPair) -> io::Result<Decision> {
        let stdin = io::stdin();
        loop {
            if self.cancelled.load(Ordering::SeqCst) {
                return Ok(Decision::Cancelled);
            }

            print!(
                "  {} Are these two documents related? [y/n]: ",
                style("?").yellow()
            );
            io::stdout().flush()?;

            let mut line = String::new();
            match stdin.lock().read_line(&mut line) {
                // EOF ends the session like an interrupt would.
                Ok(0) => return Ok(Decision::Cancelled),
                Ok(_) => {}
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {
                    return Ok(Decision::Cancelled);
                }
                Err(e) => return Err(e),
            }
            if self.cancelled.load(Ordering::SeqCst) {
                return Ok(Decision::Cancelled);
            }

            match parse_decision(&line) {
                Some(true) => {
                    println!("    {} You chose: match", style("✓").green());
                    return Ok(Decision::Match);
                }
                Some(false) => {
                    println!("    {} You chose: not a match", style("✓").magenta());
                    return Ok(Decision::NoMatch);
                }
                None => {
                    println!("  {} Please reply with 'y' or 'n'.", style("!").red());
                }
            }
        }
    }
}
