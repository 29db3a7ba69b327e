//! # Client Channel
//!
//! [`Channel`] is the calling half of the transport: it builds the call
//! envelope, hands one typed call message to the server over a bounded `mpsc`
//! channel and then waits on the per-call reply channel or streams.
//!
//! Each interaction shape has one entry point:
//!
//! | Shape | Method | Caller gets |
//! |-------|--------|-------------|
//! | unary | [`Channel::unary`] | the response |
//! | server streaming | [`Channel::server_streaming`] | a [`Streaming`] of responses |
//! | client streaming | [`Channel::client_streaming`] | a [`ClientStreamingCall`] |
//! | bidi streaming | [`Channel::bidi_streaming`] | a [`StreamSender`] and a [`Streaming`] |
//!
//! The caller side never outlives its deadline: every wait is raced against
//! the call context, and abandoning a call (dropping its future or its
//! response stream) cancels it for the server as well.

use crate::framework::context::{CallContext, CallOptions, CallShape};
use crate::framework::status::Status;
use crate::framework::stream::{self, Direction, StreamSender, Streaming};
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::DropGuard;

/// One-shot reply channel for unary and client-streaming calls.
pub type Reply<T> = oneshot::Sender<Result<T, Status>>;

/// Calling half of the transport for call messages of type `R`.
pub struct Channel<R> {
    sender: mpsc::Sender<R>,
    stream_buffer: usize,
}

impl<R> Clone for Channel<R> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            stream_buffer: self.stream_buffer,
        }
    }
}

impl<R: Send + 'static> Channel<R> {
    pub fn new(sender: mpsc::Sender<R>, stream_buffer: usize) -> Self {
        Self {
            sender,
            stream_buffer,
        }
    }

    /// Single request, single response.
    pub async fn unary<Resp>(
        &self,
        method: &'static str,
        options: &CallOptions,
        call: impl FnOnce(CallContext, Reply<Resp>) -> R,
    ) -> Result<Resp, Status> {
        let ctx = CallContext::new(method, CallShape::Unary, options);
        let _guard = ctx.drop_guard();
        let (reply, response) = oneshot::channel();
        self.dispatch(&ctx, call(ctx.clone(), reply)).await?;
        ctx.run(response)
            .await?
            .map_err(|_| Status::unavailable(format!("{method}: server dropped the call")))?
    }

    /// Single request, stream of responses.
    pub async fn server_streaming<Resp>(
        &self,
        method: &'static str,
        options: &CallOptions,
        call: impl FnOnce(CallContext, StreamSender<Resp>) -> R,
    ) -> Result<Streaming<Resp>, Status> {
        let ctx = CallContext::new(method, CallShape::ServerStreaming, options);
        let (responses, stream) =
            stream::channel(&ctx, Direction::Response, self.stream_buffer);
        self.dispatch(&ctx, call(ctx.clone(), responses)).await?;
        Ok(stream.cancel_on_drop())
    }

    /// Stream of requests, single response once the caller closes its side.
    pub async fn client_streaming<Req, Resp>(
        &self,
        method: &'static str,
        options: &CallOptions,
        call: impl FnOnce(CallContext, Streaming<Req>, Reply<Resp>) -> R,
    ) -> Result<ClientStreamingCall<Req, Resp>, Status> {
        let ctx = CallContext::new(method, CallShape::ClientStreaming, options);
        let guard = ctx.drop_guard();
        let (requests, incoming) =
            stream::channel(&ctx, Direction::Request, self.stream_buffer);
        let (reply, response) = oneshot::channel();
        self.dispatch(&ctx, call(ctx.clone(), incoming, reply)).await?;
        Ok(ClientStreamingCall {
            ctx,
            requests,
            response,
            _guard: guard,
        })
    }

    /// Independent request and response streams over one call.
    pub async fn bidi_streaming<Req, Resp>(
        &self,
        method: &'static str,
        options: &CallOptions,
        call: impl FnOnce(CallContext, Streaming<Req>, StreamSender<Resp>) -> R,
    ) -> Result<(StreamSender<Req>, Streaming<Resp>), Status> {
        let ctx = CallContext::new(method, CallShape::BidiStreaming, options);
        let (requests, incoming) =
            stream::channel(&ctx, Direction::Request, self.stream_buffer);
        let (outgoing, responses) =
            stream::channel(&ctx, Direction::Response, self.stream_buffer);
        self.dispatch(&ctx, call(ctx.clone(), incoming, outgoing))
            .await?;
        Ok((requests, responses.cancel_on_drop()))
    }

    async fn dispatch(&self, ctx: &CallContext, request: R) -> Result<(), Status> {
        ctx.run(self.sender.send(request))
            .await?
            .map_err(|_| Status::unavailable(format!("{}: server is not running", ctx.method())))
    }
}

/// Calling side of an open client-streaming call.
pub struct ClientStreamingCall<Req, Resp> {
    ctx: CallContext,
    requests: StreamSender<Req>,
    response: oneshot::Receiver<Result<Resp, Status>>,
    _guard: DropGuard,
}

impl<Req, Resp> ClientStreamingCall<Req, Resp> {
    /// Sends one request. Each request is acknowledged only by the final response.
    ///
    /// A failure here usually means the server already finished the call;
    /// [`close_and_recv`](Self::close_and_recv) reports the actual outcome.
    pub async fn send(&self, request: Req) -> Result<(), Status> {
        self.requests.send(request).await
    }

    /// Signals "no more requests" and waits for the aggregate response.
    pub async fn close_and_recv(self) -> Result<Resp, Status> {
        let closed = self.requests.close().await;
        match self.ctx.run(self.response).await? {
            Ok(outcome) => outcome,
            Err(_) => {
                closed?;
                Err(Status::unavailable(format!(
                    "{}: server dropped the call",
                    self.ctx.method()
                )))
            }
        }
    }

    pub fn context(&self) -> &CallContext {
        &self.ctx
    }

    pub fn cancel(&self) {
        self.ctx.cancel();
    }
}
