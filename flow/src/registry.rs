// src/registry.rs

//! `Flows<E>`: pipelines keyed by the type of context they run on.

use crate::core::context_data::ContextData;
use crate::core::control::PipelineResult;
use crate::error::FlowError;
use crate::pipeline::definition::Pipeline;

use async_trait::async_trait;
use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{event, instrument, Level};

#[async_trait]
trait ErasedRunner<AppErr>: Send + Sync
where
  AppErr: std::error::Error + Send + Sync + 'static,
{
  /// `ctx_obj` must hold a `ContextData<TData>` for the wrapped pipeline.
  async fn run_erased(&self, ctx_obj: Box<dyn Any + Send>) -> Result<PipelineResult, AppErr>;
}

struct Registered<TData, StepErr, AppErr>
where
  TData: 'static + Send + Sync,
  StepErr: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  pipeline: Arc<Pipeline<TData, StepErr>>,
  _app_err: PhantomData<fn() -> AppErr>,
}

#[async_trait]
impl<TData, StepErr, AppErr> ErasedRunner<AppErr> for Registered<TData, StepErr, AppErr>
where
  TData: 'static + Send + Sync,
  StepErr: std::error::Error + From<FlowError> + Send + Sync + 'static,
  AppErr: std::error::Error + From<StepErr> + From<FlowError> + Send + Sync + 'static,
{
  async fn run_erased(&self, ctx_obj: Box<dyn Any + Send>) -> Result<PipelineResult, AppErr> {
    let ctx_data = match ctx_obj.downcast::<ContextData<TData>>() {
      Ok(boxed) => *boxed,
      Err(_) => {
        let expected_type = std::any::type_name::<ContextData<TData>>();
        event!(Level::ERROR, expected_type, "Context object type mismatch.");
        return Err(AppErr::from(FlowError::TypeMismatch {
          step_name: "registry_dispatch".to_string(),
          expected_type: expected_type.to_string(),
        }));
      }
    };
    self.pipeline.run(ctx_data).await.map_err(AppErr::from)
  }
}

/// Registry of pipelines. `run` returns `AppErr`, which must absorb both
/// framework errors and each registered pipeline's own error type.
pub struct Flows<AppErr = FlowError>
where
  AppErr: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  registry: RwLock<HashMap<TypeId, Arc<dyn ErasedRunner<AppErr>>>>,
}

impl<AppErr> Default for Flows<AppErr>
where
  AppErr: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  fn default() -> Self {
    Self::new()
  }
}

impl<AppErr> Flows<AppErr>
where
  AppErr: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  pub fn new() -> Self {
    Self {
      registry: RwLock::new(HashMap::new()),
    }
  }

  /// Registers `pipeline` for its context type, replacing any previous one.
  pub fn register<TData, StepErr>(&self, pipeline: Pipeline<TData, StepErr>)
  where
    TData: 'static + Send + Sync,
    StepErr: std::error::Error + From<FlowError> + Send + Sync + 'static,
    AppErr: From<StepErr>,
  {
    event!(
      Level::DEBUG,
      context_type = %std::any::type_name::<TData>(),
      steps = ?pipeline.step_names(),
      "Registering pipeline."
    );
    let runner = Registered::<TData, StepErr, AppErr> {
      pipeline: Arc::new(pipeline),
      _app_err: PhantomData,
    };
    self.registry.write().insert(TypeId::of::<TData>(), Arc::new(runner));
  }

  pub fn is_registered<TData: 'static + Send + Sync>(&self) -> bool {
    self.registry.read().contains_key(&TypeId::of::<TData>())
  }

  /// Runs the pipeline registered for `TData`.
  #[instrument(name = "Flows::run", skip_all, fields(context_type = %std::any::type_name::<TData>()))]
  pub async fn run<TData>(&self, ctx_data: ContextData<TData>) -> Result<PipelineResult, AppErr>
  where
    TData: 'static + Send + Sync,
  {
    let runner = {
      let guard = self.registry.read();
      guard.get(&TypeId::of::<TData>()).cloned()
    };
    let runner = runner.ok_or_else(|| {
      let type_name = std::any::type_name::<TData>();
      event!(Level::ERROR, type_name, "No pipeline registered for context type.");
      AppErr::from(FlowError::NotRegistered {
        type_name: type_name.to_string(),
      })
    })?;

    runner.run_erased(Box::new(ctx_data)).await
  }
}
