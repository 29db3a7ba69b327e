//! # Server-Side Call Handlers
//!
//! One helper per interaction shape. Each runs the service's business logic
//! under the call context and settles the call exactly once:
//!
//! - **unary / client streaming**: the outcome goes back over the reply channel.
//! - **server / bidi streaming**: the response stream is closed with an end
//!   marker on success or aborted with the terminal status on failure.
//!
//! The business future is dropped as soon as the call's deadline passes or the
//! call is cancelled, so no late success is ever reported. Items a stream
//! already delivered are never retracted.

use crate::framework::channel::Reply;
use crate::framework::context::CallContext;
use crate::framework::status::Status;
use crate::framework::stream::{StreamSender, Streaming};
use std::future::Future;
use tracing::{debug, info, warn};

/// Runs a single request → single response handler.
pub async fn unary<Resp, Fut>(ctx: &CallContext, respond_to: Reply<Resp>, handler: Fut)
where
    Fut: Future<Output = Result<Resp, Status>>,
{
    let outcome = ctx.run(handler).await.and_then(|result| result);
    log_outcome(&outcome);
    if respond_to.send(outcome).is_err() {
        debug!("Caller went away before the reply");
    }
}

/// Runs a single request → response stream handler.
pub async fn server_streaming<Resp, F, Fut>(
    ctx: &CallContext,
    responses: StreamSender<Resp>,
    handler: F,
) where
    F: FnOnce(StreamSender<Resp>) -> Fut,
    Fut: Future<Output = Result<(), Status>>,
{
    let outcome = ctx
        .run(handler(responses.clone()))
        .await
        .and_then(|result| result);
    finish(responses, outcome).await;
}

/// Runs a request stream → single response handler.
pub async fn client_streaming<Req, Resp, F, Fut>(
    ctx: &CallContext,
    requests: Streaming<Req>,
    respond_to: Reply<Resp>,
    handler: F,
) where
    F: FnOnce(Streaming<Req>) -> Fut,
    Fut: Future<Output = Result<Resp, Status>>,
{
    unary(ctx, respond_to, handler(requests)).await;
}

/// Runs a handler owning both directions of a bidirectional call.
///
/// The response stream is only finalized after the handler has returned, so
/// handlers that split the work across tasks must join them first.
pub async fn bidi_streaming<Req, Resp, F, Fut>(
    ctx: &CallContext,
    requests: Streaming<Req>,
    responses: StreamSender<Resp>,
    handler: F,
) where
    F: FnOnce(Streaming<Req>, StreamSender<Resp>) -> Fut,
    Fut: Future<Output = Result<(), Status>>,
{
    let outcome = ctx
        .run(handler(requests, responses.clone()))
        .await
        .and_then(|result| result);
    finish(responses, outcome).await;
}

async fn finish<Resp>(responses: StreamSender<Resp>, outcome: Result<(), Status>) {
    log_outcome(&outcome);
    let finalized = match outcome {
        Ok(()) => responses.close().await,
        Err(status) => responses.abort(status).await,
    };
    if let Err(status) = finalized {
        debug!(code = %status.code(), "Response stream not finalized");
    }
}

fn log_outcome<T>(outcome: &Result<T, Status>) {
    match outcome {
        Ok(_) => info!("Call ok"),
        Err(status) => warn!(code = %status.code(), message = status.message(), "Call failed"),
    }
}
