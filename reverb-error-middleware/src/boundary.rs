//! Error and panic capture around handler calls

use futures::future::BoxFuture;
use futures::FutureExt;
use std::any::Any;
use std::backtrace::{Backtrace, BacktraceStatus};
use std::future::Future;
use std::panic::AssertUnwindSafe;

use reverb_logging::{ErrorInfo, ErrorSeverity};

use crate::context::InvocationContext;
use crate::error::BoundaryError;

/// Run `handler` inside the boundary.
///
/// The handler's `Ok` value is returned unchanged. An `Err` or a panic is
/// logged once at `error` level and returned as a [`BoundaryError`]
/// carrying the complete failure context.
pub async fn invoke<F, Fut, T, E>(
    handler_name: &str,
    context: &InvocationContext,
    handler: F,
) -> Result<T, BoundaryError>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Into<anyhow::Error>,
{
    let outcome = AssertUnwindSafe(async move { handler().await })
        .catch_unwind()
        .await;

    let (trace, panicked) = match outcome {
        Ok(Ok(value)) => return Ok(value),
        Ok(Err(error)) => (error_trace(&error.into()), false),
        Err(payload) => (panic_trace(payload.as_ref()), true),
    };

    let trace = format!(
        "{} [{}] in {} failed:\n{}",
        handler_name, context.request_id, context.function_name, trace
    );

    ErrorInfo::new(
        if panicked { "HandlerPanic" } else { "HandlerError" },
        format!("Unhandled failure in {}", handler_name),
    )
    .with_severity(ErrorSeverity::for_invocation(panicked))
    .with_stack_trace(trace.clone())
    .with_context_value("handler", handler_name)
    .with_context_value("function_name", &context.function_name)
    .with_context_value("request_id", context.request_id.to_string())
    .log();

    Err(BoundaryError {
        handler: handler_name.to_string(),
        request_id: context.request_id,
        trace,
        panicked,
    })
}

/// Wrap `handler` once so every call runs inside [`invoke`]
pub fn wrap<Ev, T, E, H, Fut>(
    handler_name: &'static str,
    handler: H,
) -> impl Fn(Ev, InvocationContext) -> BoxFuture<'static, Result<T, BoundaryError>>
where
    H: Fn(Ev, InvocationContext) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    E: Into<anyhow::Error> + 'static,
    T: Send + 'static,
    Ev: Send + 'static,
{
    move |event: Ev, context: InvocationContext| {
        let handler = handler.clone();
        async move {
            let inner = context.clone();
            invoke(handler_name, &context, move || handler(event, inner)).await
        }
        .boxed()
    }
}

/// Error chain plus the backtrace captured where the error was created, or
/// here when none was
fn error_trace(error: &anyhow::Error) -> String {
    let mut trace = format!("Error: {}", error);
    for (depth, cause) in error.chain().skip(1).enumerate() {
        trace.push_str(&format!("\n  {}: {}", depth, cause));
    }

    let backtrace = error.backtrace();
    if backtrace.status() == BacktraceStatus::Captured {
        trace.push_str(&format!("\n\nStack backtrace:\n{}", backtrace));
    } else {
        trace.push_str(&format!("\n\nStack backtrace:\n{}", Backtrace::force_capture()));
    }
    trace
}

fn panic_trace(payload: &(dyn Any + Send)) -> String {
    let message = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string());

    format!(
        "Panic: {}\n\nStack backtrace:\n{}",
        message,
        Backtrace::force_capture()
    )
}
