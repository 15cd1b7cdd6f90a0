//! Provisioning Runner
//!
//! Executes an ordered list of steps, one at a time, on the injected host.
//!
//! # Contract
//!
//! - Steps run strictly in declaration order. Nothing is skipped,
//!   reordered or run in parallel.
//! - The first failure aborts the Run. Later steps are never attempted
//!   and earlier steps are not rolled back.
//! - No timeouts: a command that hangs hangs the Run.
//!
//! ```text
//! steps remaining → step executing → step complete ─┐
//!        ↑                               │          │
//!        └───────────────────────────────┘    (failure) → Run aborted
//! ```

use crate::error::{ProvisionError, Result};
use crate::host::{FileSystem, Interaction, Shell};
use crate::progress::{NoProgress, ProgressReporter, RunSummary, StepPosition};
use crate::step::{Step, StepAction};
use std::time::Instant;
use tracing::{debug, error, info, info_span};

/// Linear driver for a provisioning Run.
pub struct Runner<'a> {
    shell: &'a mut dyn Shell,
    fs: &'a mut dyn FileSystem,
    progress: Box<dyn ProgressReporter + 'a>,
}

impl<'a> Runner<'a> {
    /// Runner with no progress output.
    pub fn new(shell: &'a mut dyn Shell, fs: &'a mut dyn FileSystem) -> Self {
        Self {
            shell,
            fs,
            progress: Box::new(NoProgress),
        }
    }

    /// Report progress to `progress`.
    pub fn with_progress(mut self, progress: impl ProgressReporter + 'a) -> Self {
        self.progress = Box::new(progress);
        self
    }

    /// Execute every step in order, stopping at the first failure.
    pub fn run(&mut self, steps: &[Step]) -> Result<RunSummary> {
        let started = Instant::now();
        let total = steps.len();
        info!("Starting provisioning run: {} steps", total);

        for (index, step) in steps.iter().enumerate() {
            let position = StepPosition { index, total };
            let _span = info_span!("step", index, kind = %step.kind()).entered();

            self.progress.step_started(position, step);
            match self.execute(index, step) {
                Ok(()) => self.progress.step_finished(position, step),
                Err(e) => {
                    error!("Step {} failed, aborting run: {}", index, e);
                    self.progress.step_failed(position, step, &e);
                    return Err(e);
                }
            }
        }

        let summary = RunSummary {
            steps_completed: total,
            elapsed: started.elapsed(),
        };
        info!(
            "Provisioning run completed: {} steps in {:?}",
            summary.steps_completed, summary.elapsed
        );
        self.progress.run_completed(&summary);
        Ok(summary)
    }

    /// Execute a single step.
    ///
    /// `index` is the step's position in its plan; errors report it.
    pub fn execute(&mut self, index: usize, step: &Step) -> Result<()> {
        debug!("{}", step.description());

        match step.action() {
            StepAction::Command { command } => {
                self.run_command(index, step, command, Interaction::None)
            }
            StepAction::InteractiveCommand { command } => {
                info!("Waiting on operator input for '{}'", command);
                self.run_command(index, step, command, Interaction::Operator)
            }
            StepAction::FileWrite { path, content } => {
                self.fs
                    .write_file(path, content)
                    .map_err(|source| ProvisionError::FileWrite {
                        step: index,
                        description: step.description().to_string(),
                        path: path.clone(),
                        source,
                    })
            }
        }
    }

    fn run_command(
        &mut self,
        index: usize,
        step: &Step,
        command: &str,
        interaction: Interaction,
    ) -> Result<()> {
        let status = self
            .shell
            .run(command, interaction)
            .map_err(|source| ProvisionError::Spawn {
                step: index,
                description: step.description().to_string(),
                command: command.to_string(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(ProvisionError::CommandFailed {
                step: index,
                description: step.description().to_string(),
                command: command.to_string(),
                status,
            })
        }
    }
}
