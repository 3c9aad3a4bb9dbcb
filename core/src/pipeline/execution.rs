// core/src/pipeline/execution.rs

//! `Pipeline::run()`: executes the steps in order against a shared context.

use crate::core::context_data::ContextData;
use crate::core::control::{PipelineControl, PipelineResult};
use crate::error::PipelineError;
use crate::pipeline::definition::Pipeline;
use tracing::{event, Instrument, Level};

impl<TData, Err> Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<PipelineError> + Send + Sync + 'static,
{
  /// Runs every step in order.
  ///
  /// Returns `Stopped` as soon as a handler asks to stop, the first handler
  /// error as-is, and `HandlerMissing` (converted into `Err`) for a
  /// non-optional step nobody registered a handler for.
  pub async fn run(&self, ctx_data: ContextData<TData>) -> Result<PipelineResult, Err> {
    let pipeline_span = tracing::info_span!("pipeline_run", pipeline = %self.name, num_steps = self.steps.len());

    async move {
      event!(Level::DEBUG, "Pipeline execution starting.");

      for (step_idx, step_def) in self.steps.iter().enumerate() {
        let step_name = step_def.name.as_str();

        let handlers = match self.on.get(step_name) {
          Some(handlers) if !handlers.is_empty() => handlers,
          _ if step_def.optional => {
            event!(Level::DEBUG, step = step_name, "Optional step has no handlers, skipping.");
            continue;
          }
          _ => {
            event!(Level::ERROR, step = step_name, "Non-optional step has no handlers.");
            return Err(Err::from(PipelineError::HandlerMissing {
              step_name: step_def.name.clone(),
            }));
          }
        };

        let step_span = tracing::info_span!("pipeline_step", step_name, step_index = step_idx);
        let control = async {
          for handler_fn in handlers {
            match handler_fn(ctx_data.clone()).await {
              Ok(PipelineControl::Continue) => {}
              Ok(PipelineControl::Stop) => return Ok(PipelineControl::Stop),
              Err(e) => {
                event!(Level::ERROR, error = %e, "Step handler failed.");
                return Err(e);
              }
            }
          }
          Ok(PipelineControl::Continue)
        }
        .instrument(step_span)
        .await?;

        if control == PipelineControl::Stop {
          event!(Level::INFO, step = step_name, "Pipeline stopped by a handler.");
          return Ok(PipelineResult::Stopped);
        }
      }

      event!(Level::DEBUG, "Pipeline execution completed successfully.");
      Ok(PipelineResult::Completed)
    }
    .instrument(pipeline_span)
    .await
  }
}
