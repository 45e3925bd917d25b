//! Invocation entry points

use anyhow::Context;
use serde_json::Value as JsonValue;

use reverb_core::WorkDescriptor;
use reverb_error_middleware::{invoke, BoundaryError, InvocationContext};
use reverb_orchestrator::OrchestratorEvent;

use crate::runtime::Runtime;

/// Orchestrator tick.
///
/// Returns the serialized current parameters and the serialized list of
/// work descriptors, one per application.
pub async fn orchestrator_handler(
    runtime: &Runtime,
    event: JsonValue,
    context: &InvocationContext,
) -> Result<(String, String), BoundaryError> {
    invoke("orchestrator", context, || async move {
        let event = OrchestratorEvent::from_value(event)?;
        let plan = runtime.orchestrator().plan_next_replay(&event)?;

        let cur_params = serde_json::to_string(&plan.cur_params)?;
        let descriptors = serde_json::to_string(&plan.descriptors)?;
        Ok::<_, anyhow::Error>((cur_params, descriptors))
    })
    .await
}

/// Consumer worker execution.
///
/// Returns the length of the requested slice.
pub async fn consumer_handler(
    runtime: &Runtime,
    event: JsonValue,
    context: &InvocationContext,
) -> Result<usize, BoundaryError> {
    invoke("consumer", context, || async move {
        let descriptor: WorkDescriptor =
            serde_json::from_value(event).context("Invalid work descriptor")?;
        let outcome = runtime
            .consumer()
            .run(&descriptor, context.deadline)
            .await?;
        Ok::<_, anyhow::Error>(outcome.num_requests)
    })
    .await
}
