// src/pipeline/execution.rs

//! `Pipeline::run()`: walks the steps and drives their handlers.

use crate::core::context_data::ContextData;
use crate::core::control::{PipelineControl, PipelineResult};
use crate::core::handler::Handler;
use crate::error::FlowError;
use crate::pipeline::definition::Pipeline;
use tracing::{event, info_span, instrument, Instrument, Level};

impl<TData, Err> Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  /// Executes every step in order against `ctx_data`.
  ///
  /// Per step: a `skip_if` that returns `true` skips it; a step with no
  /// handlers is skipped when optional and fails with
  /// [`FlowError::HandlerMissing`] otherwise. Handlers run `before`, then
  /// `on`, then `after`, each list in registration order. `Stop` ends the run
  /// with [`PipelineResult::Stopped`]. An error ends the run with that error,
  /// unless the step is optional, in which case it is logged and the next step
  /// starts.
  #[instrument(
    name = "Pipeline::run",
    skip_all,
    fields(
      context_type = %std::any::type_name::<TData>(),
      num_steps = self.steps.len(),
    ),
    err(Display)
  )]
  pub async fn run(&self, ctx_data: ContextData<TData>) -> Result<PipelineResult, Err> {
    event!(Level::DEBUG, "Pipeline execution starting.");

    for (step_idx, step_def) in self.steps.iter().enumerate() {
      let step_name = step_def.name.as_str();

      if let Some(skip_if) = &step_def.skip_if {
        if skip_if(ctx_data.clone()) {
          event!(Level::DEBUG, step = step_name, "Step skipped by its condition.");
          continue;
        }
      }

      let has_handlers = [&self.before, &self.on, &self.after]
        .iter()
        .any(|phase| phase.get(step_name).is_some_and(|v| !v.is_empty()));

      if !has_handlers {
        if step_def.optional {
          event!(Level::DEBUG, step = step_name, "Optional step has no handlers, skipping.");
          continue;
        }
        event!(Level::ERROR, step = step_name, "Required step has no handlers.");
        return Err(Err::from(FlowError::HandlerMissing {
          step_name: step_def.name.clone(),
        }));
      }

      let step_span = info_span!(
        "pipeline_step",
        step_name = step_name,
        step_index = step_idx,
        optional = step_def.optional
      );

      match self.run_step(step_name, &ctx_data).instrument(step_span).await {
        Ok(PipelineControl::Continue) => {}
        Ok(PipelineControl::Stop) => {
          event!(Level::INFO, step = step_name, "Pipeline stopped by a handler.");
          return Ok(PipelineResult::Stopped);
        }
        Err(e) if step_def.optional => {
          event!(Level::WARN, step = step_name, error = %e, "Optional step failed, continuing.");
        }
        Err(e) => {
          event!(Level::ERROR, step = step_name, error = %e, "Step failed.");
          return Err(e);
        }
      }
    }

    event!(Level::DEBUG, "Pipeline execution completed.");
    Ok(PipelineResult::Completed)
  }

  async fn run_step(&self, step_name: &str, ctx_data: &ContextData<TData>) -> Result<PipelineControl, Err> {
    for (phase, handlers) in [("before", &self.before), ("on", &self.on), ("after", &self.after)] {
      if let Some(handlers) = handlers.get(step_name) {
        if let PipelineControl::Stop = run_handlers(phase, handlers, ctx_data).await? {
          return Ok(PipelineControl::Stop);
        }
      }
    }
    Ok(PipelineControl::Continue)
  }
}

async fn run_handlers<TData, Err>(
  phase: &'static str,
  handlers: &[Handler<TData, Err>],
  ctx_data: &ContextData<TData>,
) -> Result<PipelineControl, Err>
where
  TData: 'static + Send + Sync,
{
  for (handler_idx, handler_fn) in handlers.iter().enumerate() {
    let span = tracing::debug_span!("step_handler", phase, handler_index = handler_idx);
    if let PipelineControl::Stop = handler_fn(ctx_data.clone()).instrument(span).await? {
      return Ok(PipelineControl::Stop);
    }
  }
  Ok(PipelineControl::Continue)
}
