// tests/registry_tests.rs
mod common;

use byteshop_flow::{ContextData, FlowError, Flows, Pipeline, PipelineControl, PipelineResult};
use common::*;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct RegistryContextAlpha {
  val: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct RegistryContextBeta {
  num: i32,
}

#[tokio::test]
async fn test_registry_runs_pipeline_for_context_type() {
  setup_tracing();
  let flows = Flows::<TestError>::new();

  let mut p_alpha = Pipeline::<RegistryContextAlpha, TestError>::new(&[("alpha_task", false, None)]);
  p_alpha.on("alpha_task", |ctx: ContextData<RegistryContextAlpha>| async move {
    ctx.write().val = "alpha_processed".to_string();
    Ok::<_, FlowError>(PipelineControl::Continue)
  });
  flows.register(p_alpha);

  let mut p_beta = Pipeline::<RegistryContextBeta, TestError>::new(&[("beta_task", false, None)]);
  p_beta.on("beta_task", |ctx: ContextData<RegistryContextBeta>| async move {
    ctx.write().num = 100;
    Ok::<_, FlowError>(PipelineControl::Continue)
  });
  flows.register(p_beta);

  assert!(flows.is_registered::<RegistryContextAlpha>());
  assert!(flows.is_registered::<RegistryContextBeta>());

  let ctx_alpha = ContextData::new(RegistryContextAlpha::default());
  assert_eq!(flows.run(ctx_alpha.clone()).await.unwrap(), PipelineResult::Completed);
  assert_eq!(ctx_alpha.read().val, "alpha_processed");

  let ctx_beta = ContextData::new(RegistryContextBeta::default());
  assert_eq!(flows.run(ctx_beta.clone()).await.unwrap(), PipelineResult::Completed);
  assert_eq!(ctx_beta.read().num, 100);
}

#[tokio::test]
async fn test_registry_pipeline_not_found() {
  setup_tracing();
  let flows = Flows::<TestError>::new();

  #[derive(Clone, Debug, Default)]
  struct UnregisteredContext;

  let result = flows.run(ContextData::new(UnregisteredContext)).await;
  match result {
    Err(TestError::Flow(s)) => {
      assert!(s.contains("NotRegistered"));
      assert!(s.contains("UnregisteredContext"));
    }
    other => panic!("Expected FlowError::NotRegistered, got {:?}", other),
  }
}

#[tokio::test]
async fn test_registry_pipeline_itself_errors() {
  setup_tracing();
  let flows = Flows::<TestError>::new();

  let mut p_alpha = Pipeline::<RegistryContextAlpha, TestError>::new(&[("alpha_fail", false, None)]);
  p_alpha.on("alpha_fail", |_ctx: ContextData<RegistryContextAlpha>| async move {
    Err::<PipelineControl, _>(TestError::Handler("Alpha pipeline failed".to_string()))
  });
  flows.register(p_alpha);

  let result = flows.run(ContextData::new(RegistryContextAlpha::default())).await;
  assert_eq!(result.unwrap_err(), TestError::Handler("Alpha pipeline failed".to_string()));
}

#[tokio::test]
async fn test_registry_with_flow_error_default() {
  setup_tracing();
  let flows: Flows = Flows::new();

  #[derive(Clone, Debug, Default)]
  struct SimpleCtx {
    count: i32,
  }

  let mut pipeline = Pipeline::<SimpleCtx, FlowError>::new(&[("task", false, None)]);
  pipeline.on("task", |ctx: ContextData<SimpleCtx>| async move {
    ctx.write().count = 1;
    Ok::<_, FlowError>(PipelineControl::Continue)
  });
  flows.register(pipeline);

  let ctx = ContextData::new(SimpleCtx::default());
  assert_eq!(flows.run(ctx.clone()).await.unwrap(), PipelineResult::Completed);
  assert_eq!(ctx.read().count, 1);
}

#[tokio::test]
async fn test_registering_again_replaces_pipeline() {
  setup_tracing();
  let flows = Flows::<TestError>::new();

  let mut first = Pipeline::<RegistryContextBeta, TestError>::new(&[("set", false, None)]);
  first.on("set", |ctx: ContextData<RegistryContextBeta>| async move {
    ctx.write().num = 1;
    Ok::<_, TestError>(PipelineControl::Continue)
  });
  flows.register(first);

  let mut second = Pipeline::<RegistryContextBeta, TestError>::new(&[("set", false, None)]);
  second.on("set", |ctx: ContextData<RegistryContextBeta>| async move {
    ctx.write().num = 2;
    Ok::<_, TestError>(PipelineControl::Continue)
  });
  flows.register(second);

  let ctx = ContextData::new(RegistryContextBeta::default());
  flows.run(ctx.clone()).await.unwrap();
  assert_eq!(ctx.read().num, 2);
}
