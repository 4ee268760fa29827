// src/core/control.rs

//! Signals returned by handlers and the outcome of a whole run.

/// Returned by every handler to tell the runner what to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineControl {
  /// Keep going: remaining handlers of this step, then the next step.
  Continue,
  /// Halt the pipeline now. Nothing after this handler runs.
  Stop,
}

/// Outcome of [`Pipeline::run`](crate::Pipeline::run) when no handler failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineResult {
  /// Every step ran (or was legitimately skipped).
  Completed,
  /// A handler returned [`PipelineControl::Stop`].
  Stopped,
}
