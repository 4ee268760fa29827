// src/pipeline/definition.rs

//! The `Pipeline<TData, Err>` struct and its structural operations.

use crate::core::handler::Handler;
use crate::core::step::{SkipCondition, StepDef};
use crate::error::FlowError;
use std::collections::HashMap;

/// An ordered set of named steps over the context type `TData`.
///
/// Handlers return `Result<_, Err>`. `Err` must be buildable from
/// [`FlowError`] so that setup problems found at run time (a required step
/// without handlers, for instance) surface through the same error type.
pub struct Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  pub(crate) steps: Vec<StepDef<TData>>,

  pub(crate) before: HashMap<String, Vec<Handler<TData, Err>>>,
  pub(crate) on: HashMap<String, Vec<Handler<TData, Err>>>,
  pub(crate) after: HashMap<String, Vec<Handler<TData, Err>>>,
}

impl<TData, Err> Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  /// Creates a pipeline from `(name, optional, skip_if)` triples, in order.
  pub fn new(step_defs: &[(&str, bool, Option<SkipCondition<TData>>)]) -> Self {
    let steps = step_defs
      .iter()
      .map(|(name, optional, skip_if)| StepDef {
        name: (*name).to_string(),
        optional: *optional,
        skip_if: skip_if.clone(),
      })
      .collect();

    Self {
      steps,
      before: HashMap::new(),
      on: HashMap::new(),
      after: HashMap::new(),
    }
  }

  /// Step names in execution order.
  pub fn step_names(&self) -> Vec<&str> {
    self.steps.iter().map(|s| s.name.as_str()).collect()
  }

  fn position(&self, step_name: &str) -> Option<usize> {
    self.steps.iter().position(|s| s.name == step_name)
  }

  /// Panics on an unknown step: a typo in a step name is a wiring bug, not a
  /// runtime condition.
  pub(crate) fn ensure_step_exists(&self, step_name: &str) {
    if self.position(step_name).is_none() {
      panic!("flow setup error: step '{}' is not defined in this pipeline", step_name);
    }
  }

  /// Inserts a new step right after `existing_step_name`.
  pub fn insert_after_step<S: Into<String>>(
    &mut self,
    existing_step_name: &str,
    new_step_name: S,
    optional: bool,
    skip_if: Option<SkipCondition<TData>>,
  ) -> Result<(), FlowError> {
    let idx = self.position(existing_step_name).ok_or_else(|| FlowError::StepNotFound {
      step_name: existing_step_name.to_string(),
    })?;
    let name: String = new_step_name.into();
    if self.position(&name).is_some() {
      return Err(FlowError::Internal(format!("step '{}' already exists", name)));
    }
    self.steps.insert(
      idx + 1,
      StepDef {
        name,
        optional,
        skip_if,
      },
    );
    Ok(())
  }

  /// Removes a step and every hook attached to it. Unknown names are a no-op.
  pub fn remove_step(&mut self, step_name: &str) {
    if let Some(idx) = self.position(step_name) {
      self.steps.remove(idx);
      self.before.remove(step_name);
      self.on.remove(step_name);
      self.after.remove(step_name);
    }
  }

  pub fn set_optional(&mut self, step_name: &str, optional: bool) -> Result<(), FlowError> {
    let step = self
      .steps
      .iter_mut()
      .find(|s| s.name == step_name)
      .ok_or_else(|| FlowError::StepNotFound {
        step_name: step_name.to_string(),
      })?;
    step.optional = optional;
    Ok(())
  }
}
