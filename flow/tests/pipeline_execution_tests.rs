// tests/pipeline_execution_tests.rs
mod common;

use byteshop_flow::{ContextData, FlowError, Pipeline, PipelineControl, PipelineResult};
use common::*;
use std::sync::Arc;

#[tokio::test]
async fn test_pipeline_runs_steps_in_order() {
  setup_tracing();
  let mut pipeline =
    Pipeline::<TestContext, TestError>::new(&[("step1", false, None), ("step2", false, None), ("step3", false, None)]);

  pipeline.on("step1", create_simple_handler("step1", " S1"));
  pipeline.on("step2", create_simple_handler("step2", " S2"));
  pipeline.on("step3", create_simple_handler("step3", " S3"));

  let ctx = ContextData::new(TestContext::default());
  let result = pipeline.run(ctx.clone()).await;

  assert_eq!(result.unwrap(), PipelineResult::Completed);
  let guard = ctx.read();
  assert_eq!(guard.counter, 3);
  assert_eq!(guard.message, " S1 S2 S3");
  assert_eq!(guard.steps_executed, vec!["step1", "step2", "step3"]);
}

#[tokio::test]
async fn test_pipeline_stops_on_pipeline_control_stop() {
  setup_tracing();
  let mut pipeline =
    Pipeline::<TestContext, TestError>::new(&[("stepA", false, None), ("stopStep", false, None), ("stepC", false, None)]);

  pipeline.on("stepA", create_simple_handler("stepA", "A"));
  pipeline.on("stopStep", |ctx: ContextData<TestContext>| async move {
    ctx.write().steps_executed.push("stopStep".to_string());
    Ok::<_, TestError>(PipelineControl::Stop)
  });
  pipeline.on("stepC", create_simple_handler("stepC", "C"));

  let ctx = ContextData::new(TestContext::default());
  let result = pipeline.run(ctx.clone()).await;

  assert_eq!(result.unwrap(), PipelineResult::Stopped);
  let guard = ctx.read();
  assert_eq!(guard.counter, 1);
  assert_eq!(guard.steps_executed, vec!["stepA", "stopStep"]);
}

#[tokio::test]
async fn test_pipeline_propagates_handler_error() {
  setup_tracing();
  let mut pipeline = Pipeline::<TestContext, TestError>::new(&[
    ("good_step", false, None),
    ("bad_step", false, None),
    ("another_step", false, None),
  ]);

  pipeline.on("good_step", create_simple_handler("good_step", "Good"));
  pipeline.on("bad_step", create_failing_handler("bad_step", "I am a bad step!"));
  pipeline.on("another_step", create_simple_handler("another_step", "NeverRun"));

  let ctx = ContextData::new(TestContext::default());
  let result = pipeline.run(ctx.clone()).await;

  assert_eq!(result.unwrap_err(), TestError::Handler("I am a bad step!".to_string()));
  let guard = ctx.read();
  assert_eq!(guard.message, "Good");
  assert_eq!(guard.steps_executed, vec!["good_step", "bad_step"]);
}

#[tokio::test]
async fn test_optional_step_failure_does_not_abort_run() {
  setup_tracing();
  let mut pipeline = Pipeline::<TestContext, TestError>::new(&[
    ("first", false, None),
    ("best_effort", true, None),
    ("last", false, None),
  ]);

  pipeline.on("first", create_simple_handler("first", "1"));
  pipeline.on("best_effort", create_failing_handler("best_effort", "not important"));
  pipeline.on("last", create_simple_handler("last", "3"));

  let ctx = ContextData::new(TestContext::default());
  let result = pipeline.run(ctx.clone()).await;

  assert_eq!(result.unwrap(), PipelineResult::Completed);
  assert_eq!(ctx.read().steps_executed, vec!["first", "best_effort", "last"]);
}

#[tokio::test]
async fn test_pipeline_skips_step_if_condition_met() {
  setup_tracing();
  let mut pipeline = Pipeline::<TestContext, TestError>::new(&[
    ("step1", false, None),
    (
      "step_to_skip",
      false,
      Some(Arc::new(|ctx: ContextData<TestContext>| ctx.read().counter > 0)),
    ),
    ("step3", false, None),
  ]);

  pipeline.on("step1", create_simple_handler("step1", " S1"));
  pipeline.on("step_to_skip", create_simple_handler("step_to_skip", " SKIPPED"));
  pipeline.on("step3", create_simple_handler("step3", " S3"));

  let ctx = ContextData::new(TestContext::default());
  assert_eq!(pipeline.run(ctx.clone()).await.unwrap(), PipelineResult::Completed);
  let guard = ctx.read();
  assert_eq!(guard.message, " S1 S3");
  assert_eq!(guard.steps_executed, vec!["step1", "step3"]);
}

#[tokio::test]
async fn test_non_optional_step_missing_handler_fails() {
  setup_tracing();
  let pipeline = Pipeline::<TestContext, TestError>::new(&[("step_with_no_handler", false, None)]);

  let result = pipeline.run(ContextData::new(TestContext::default())).await;

  match result {
    Err(TestError::Flow(s)) => {
      assert!(s.contains("HandlerMissing"));
      assert!(s.contains("step_with_no_handler"));
    }
    other => panic!("Expected FlowError::HandlerMissing, got {:?}", other),
  }
}

#[tokio::test]
async fn test_optional_step_missing_handler_succeeds() {
  setup_tracing();
  let pipeline = Pipeline::<TestContext, TestError>::new(&[("optional_step_no_handler", true, None)]);

  let result = pipeline.run(ContextData::new(TestContext::default())).await;
  assert_eq!(result.unwrap(), PipelineResult::Completed);
}

#[tokio::test]
async fn test_before_on_after_execution_order() {
  setup_tracing();
  let mut pipeline = Pipeline::<TestContext, TestError>::new(&[("main_step", false, None)]);

  pipeline.after("main_step", create_simple_handler("after_main", "After;"));
  pipeline.on("main_step", create_simple_handler("on_main", "On;"));
  pipeline.before("main_step", create_simple_handler("before_main", "Before;"));

  let ctx = ContextData::new(TestContext::default());
  pipeline.run(ctx.clone()).await.unwrap();

  let guard = ctx.read();
  assert_eq!(guard.message, "Before;On;After;");
  assert_eq!(guard.steps_executed, vec!["before_main", "on_main", "after_main"]);
}

#[tokio::test]
async fn test_stop_in_before_hook_skips_on_handlers() {
  setup_tracing();
  let mut pipeline = Pipeline::<TestContext, TestError>::new(&[("guarded", false, None)]);

  pipeline.before("guarded", create_simple_handler("guard", "G"));
  pipeline.on("guarded", create_simple_handler("work", "W"));

  let ctx = ContextData::new(TestContext {
    should_stop_at: Some("guard".to_string()),
    ..Default::default()
  });
  assert_eq!(pipeline.run(ctx.clone()).await.unwrap(), PipelineResult::Stopped);
  assert_eq!(ctx.read().message, "G");
}

#[tokio::test]
async fn test_handler_error_type_converts_into_pipeline_error() {
  setup_tracing();
  let mut pipeline = Pipeline::<TestContext, TestError>::new(&[("framework_error", false, None)]);

  pipeline.on("framework_error", |_ctx: ContextData<TestContext>| async move {
    Err::<PipelineControl, FlowError>(FlowError::Internal("raised by handler".to_string()))
  });

  let result = pipeline.run(ContextData::new(TestContext::default())).await;
  match result {
    Err(TestError::Flow(s)) => assert!(s.contains("raised by handler")),
    other => panic!("Expected converted FlowError, got {:?}", other),
  }
}

#[tokio::test]
async fn test_structural_changes() {
  setup_tracing();
  let mut pipeline = Pipeline::<TestContext, TestError>::new(&[("a", false, None), ("c", false, None)]);

  pipeline.insert_after_step("a", "b", false, None).unwrap();
  assert_eq!(pipeline.step_names(), vec!["a", "b", "c"]);

  assert!(matches!(
    pipeline.insert_after_step("missing", "x", false, None),
    Err(FlowError::StepNotFound { .. })
  ));
  assert!(pipeline.insert_after_step("a", "c", false, None).is_err());

  pipeline.on("a", create_simple_handler("a", "a"));
  pipeline.on("b", create_simple_handler("b", "b"));
  pipeline.on("c", create_simple_handler("c", "c"));
  pipeline.remove_step("b");
  pipeline.remove_step("does_not_exist");
  assert_eq!(pipeline.step_names(), vec!["a", "c"]);

  let ctx = ContextData::new(TestContext::default());
  pipeline.run(ctx.clone()).await.unwrap();
  assert_eq!(ctx.read().message, "ac");
}

#[tokio::test]
async fn test_set_optional_turns_missing_handler_into_skip() {
  setup_tracing();
  let mut pipeline = Pipeline::<TestContext, TestError>::new(&[("later", false, None)]);
  assert!(pipeline.run(ContextData::new(TestContext::default())).await.is_err());

  pipeline.set_optional("later", true).unwrap();
  assert_eq!(
    pipeline.run(ContextData::new(TestContext::default())).await.unwrap(),
    PipelineResult::Completed
  );
  assert!(pipeline.set_optional("nope", true).is_err());
}

#[test]
#[should_panic(expected = "not defined")]
fn test_registering_on_unknown_step_panics() {
  let mut pipeline = Pipeline::<TestContext, TestError>::new(&[("known", false, None)]);
  pipeline.on("unknown", create_simple_handler("unknown", ""));
}

#[tokio::test]
async fn test_handlers_in_one_phase_run_in_registration_order() {
  setup_tracing();
  let mut pipeline = Pipeline::<TestContext, TestError>::new(&[("main_step", false, None)]);

  pipeline.before("main_step", create_simple_handler("before_1", "b1;"));
  pipeline.before("main_step", create_simple_handler("before_2", "b2;"));
  pipeline.on("main_step", create_simple_handler("on_1", "o1;"));
  pipeline.on("main_step", create_simple_handler("on_2", "o2;"));
  pipeline.after("main_step", create_simple_handler("after_1", "a1;"));

  let ctx = ContextData::new(TestContext::default());
  pipeline.run(ctx.clone()).await.unwrap();

  let guard = ctx.read();
  assert_eq!(guard.message, "b1;b2;o1;o2;a1;");
  assert_eq!(guard.counter, 5);
}
