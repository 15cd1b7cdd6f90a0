//! Progress reporting
//!
//! The Runner notifies a `ProgressReporter` before and after every step.
//! The indicator is driven only by step position (`n/N`); it carries no
//! timing information and never advances on its own.

use crate::error::ProvisionError;
use crate::plan::COMPLETION_MESSAGE;
use crate::step::{Phase, Step};
use crossterm::style::Stylize;
use std::io::{IsTerminal, Write};
use std::time::Duration;

/// Width of the rendered bar, in cells.
const BAR_WIDTH: usize = 30;

/// Position of a step within a Run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepPosition {
    /// Zero-based index of the step.
    pub index: usize,
    /// Number of steps in the Run.
    pub total: usize,
}

impl StepPosition {
    /// Steps finished once this one completes.
    pub fn completed(&self) -> usize {
        self.index + 1
    }
}

/// Totals for a completed Run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub steps_completed: usize,
    pub elapsed: Duration,
}

/// Receives Run lifecycle notifications. Every method defaults to a no-op.
pub trait ProgressReporter {
    /// A step is about to execute.
    fn step_started(&mut self, _position: StepPosition, _step: &Step) {}

    /// A step finished successfully.
    fn step_finished(&mut self, _position: StepPosition, _step: &Step) {}

    /// A step failed; the Run is about to abort.
    fn step_failed(&mut self, _position: StepPosition, _step: &Step, _error: &ProvisionError) {}

    /// Every step finished successfully.
    fn run_completed(&mut self, _summary: &RunSummary) {}
}

/// Reporter that discards every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {}

/// Renders progress to a terminal (or any writer).
///
/// ```text
/// ==> Install MariaDB
///
/// Installing MariaDB server...
/// [##############----------------] 7/32 ✓
/// ```
pub struct ConsoleProgress<W: Write> {
    out: W,
    color: bool,
    current_phase: Option<Phase>,
}

impl ConsoleProgress<std::io::Stdout> {
    /// Write to stdout, styled only when stdout is a terminal.
    pub fn stdout() -> Self {
        let out = std::io::stdout();
        let color = out.is_terminal();
        Self::new(out, color)
    }
}

impl<W: Write> ConsoleProgress<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self {
            out,
            color,
            current_phase: None,
        }
    }

    /// Consume the reporter and return the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn bar(done: usize, total: usize) -> String {
        let filled = if total == 0 {
            BAR_WIDTH
        } else {
            done.min(total) * BAR_WIDTH / total
        };
        format!(
            "[{}{}] {}/{}",
            "#".repeat(filled),
            "-".repeat(BAR_WIDTH - filled),
            done,
            total
        )
    }

    // Write errors are logged and dropped
    fn emit(&mut self, line: &str) {
        if let Err(e) = writeln!(self.out, "{}", line) {
            tracing::debug!("Progress output failed: {}", e);
        }
    }
}

impl<W: Write> ProgressReporter for ConsoleProgress<W> {
    fn step_started(&mut self, _position: StepPosition, step: &Step) {
        if self.current_phase != Some(step.phase()) {
            self.current_phase = Some(step.phase());
            let header = format!("==> {}", step.phase().title());
            let header = if self.color {
                header.bold().cyan().to_string()
            } else {
                header
            };
            self.emit(&format!("\n{}", header));
        }
        self.emit(&format!("\n{}", step.description()));
    }

    fn step_finished(&mut self, position: StepPosition, _step: &Step) {
        let bar = Self::bar(position.completed(), position.total);
        let line = if self.color {
            format!("{} {}", bar.dim(), "✓".green())
        } else {
            format!("{} ✓", bar)
        };
        self.emit(&line);
    }

    fn step_failed(&mut self, position: StepPosition, _step: &Step, error: &ProvisionError) {
        // The bar stays at the last completed step
        let bar = Self::bar(position.index, position.total);
        let line = if self.color {
            format!("{} {} {}", bar.dim(), "✗".red(), error.to_string().red())
        } else {
            format!("{} ✗ {}", bar, error)
        };
        self.emit(&line);
    }

    fn run_completed(&mut self, summary: &RunSummary) {
        let message = if self.color {
            COMPLETION_MESSAGE.green().bold().to_string()
        } else {
            COMPLETION_MESSAGE.to_string()
        };
        self.emit(&format!("\n{}", message));
        self.emit(&format!(
            "{} steps in {:.1}s",
            summary.steps_completed,
            summary.elapsed.as_secs_f64()
        ));
    }
}
