// tests/pipeline_tests.rs
mod common;

use boxoffice::{BoxOfficeError, ContextData, Pipeline, PipelineControl, PipelineError, PipelineResult};
use common::*;
use serial_test::serial;

#[tokio::test]
#[serial]
async fn test_pipeline_runs_steps_in_order() {
  setup_tracing();
  let mut pipeline =
    Pipeline::<StepLog, BoxOfficeError>::new("ordered", &[("step1", false), ("step2", false), ("step3", false)]);

  pipeline.on_root("step1", create_simple_handler("step1", " S1")).unwrap();
  pipeline.on_root("step2", create_simple_handler("step2", " S2")).unwrap();
  pipeline.on_root("step3", create_simple_handler("step3", " S3")).unwrap();

  let ctx = ContextData::new(StepLog::default());
  let result = pipeline.run(ctx.clone()).await;

  assert_eq!(result.unwrap(), PipelineResult::Completed);
  let guard = ctx.read();
  assert_eq!(guard.counter, 3);
  assert_eq!(guard.message, " S1 S2 S3");
  assert_eq!(guard.steps_executed, vec!["step1", "step2", "step3"]);
}

#[tokio::test]
#[serial]
async fn test_pipeline_stops_on_pipeline_control_stop() {
  setup_tracing();
  let mut pipeline =
    Pipeline::<StepLog, BoxOfficeError>::new("stopping", &[("stepA", false), ("stopStep", false), ("stepC", false)]);

  pipeline.on_root("stepA", create_simple_handler("stepA", "A")).unwrap();
  pipeline
    .on_root("stopStep", |ctx: ContextData<StepLog>| {
      Box::pin(async move {
        ctx.write().steps_executed.push("stopStep".to_string());
        Ok::<PipelineControl, BoxOfficeError>(PipelineControl::Stop)
      })
    })
    .unwrap();
  pipeline.on_root("stepC", create_simple_handler("stepC", "C")).unwrap();

  let ctx = ContextData::new(StepLog::default());
  let result = pipeline.run(ctx.clone()).await;

  assert_eq!(result.unwrap(), PipelineResult::Stopped);
  let guard = ctx.read();
  assert_eq!(guard.counter, 1);
  assert_eq!(guard.steps_executed, vec!["stepA", "stopStep"]);
}

#[tokio::test]
#[serial]
async fn test_pipeline_propagates_handler_error() {
  setup_tracing();
  let mut pipeline = Pipeline::<StepLog, BoxOfficeError>::new(
    "failing",
    &[("good_step", false), ("bad_step", false), ("another_step", false)],
  );

  pipeline.on_root("good_step", create_simple_handler("good_step", "Good")).unwrap();
  pipeline
    .on_root("bad_step", create_failing_handler("bad_step", "I am a bad step!"))
    .unwrap();
  pipeline
    .on_root("another_step", create_simple_handler("another_step", "NeverRun"))
    .unwrap();

  let ctx = ContextData::new(StepLog::default());
  let result = pipeline.run(ctx.clone()).await;

  match result {
    Err(BoxOfficeError::Validation(msg)) => assert_eq!(msg, "I am a bad step!"),
    other => panic!("Expected Validation error, got {:?}", other),
  }
  let guard = ctx.read();
  assert_eq!(guard.message, "Good");
  assert_eq!(guard.steps_executed, vec!["good_step", "bad_step"]);
}

#[tokio::test]
#[serial]
async fn test_handlers_on_one_step_run_in_registration_order() {
  setup_tracing();
  let mut pipeline = Pipeline::<StepLog, BoxOfficeError>::new("multi", &[("main_step", false)]);

  pipeline.on_root("main_step", create_simple_handler("first", "1;")).unwrap();
  pipeline.on_root("main_step", create_simple_handler("second", "2;")).unwrap();

  let ctx = ContextData::new(StepLog::default());
  pipeline.run(ctx.clone()).await.unwrap();

  assert_eq!(ctx.read().message, "1;2;");
}

#[tokio::test]
#[serial]
async fn test_non_optional_step_missing_handler_fails() {
  setup_tracing();
  let pipeline = Pipeline::<StepLog, BoxOfficeError>::new("bare", &[("step_with_no_handler", false)]);

  let result = pipeline.run(ContextData::new(StepLog::default())).await;

  match result {
    Err(BoxOfficeError::Pipeline(PipelineError::HandlerMissing { step_name })) => {
      assert_eq!(step_name, "step_with_no_handler")
    }
    other => panic!("Expected HandlerMissing, got {:?}", other),
  }
}

#[tokio::test]
#[serial]
async fn test_optional_step_missing_handler_is_skipped() {
  setup_tracing();
  let mut pipeline =
    Pipeline::<StepLog, BoxOfficeError>::new("optional", &[("optional_step", true), ("required", false)]);
  pipeline.on_root("required", create_simple_handler("required", "R")).unwrap();

  let ctx = ContextData::new(StepLog::default());
  let result = pipeline.run(ctx.clone()).await;

  assert_eq!(result.unwrap(), PipelineResult::Completed);
  assert_eq!(ctx.read().steps_executed, vec!["required"]);
}

#[test]
fn test_registering_on_unknown_step_is_rejected() {
  let mut pipeline = Pipeline::<StepLog, BoxOfficeError>::new("strict", &[("known", false)]);

  let err = pipeline
    .on_root("unknown", create_simple_handler("unknown", "x"))
    .unwrap_err();

  assert!(matches!(err, PipelineError::StepNotFound { ref step_name } if step_name == "unknown"));
  assert!(pipeline.set_optional("unknown", true).is_err());
  assert_eq!(pipeline.step_names(), vec!["known"]);
}

#[test]
fn test_context_data_update_and_snapshot() {
  let ctx = ContextData::new(StepLog::default());
  let shared = ctx.clone();

  let counter = shared.update(|log| {
    log.counter = 7;
    log.counter
  });

  assert_eq!(counter, 7);
  assert_eq!(ctx.snapshot().counter, 7);
}
