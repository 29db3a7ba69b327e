//! # Generic Call Server
//!
//! [`Server`] is the receiving half of the transport. It owns the receiver of a
//! service's call messages and runs each call as its own task, so a slow or
//! long-lived call never holds up the others.
//!
//! ## Usage Pattern
//!
//! 1. **Create**: `Server::new(service, &config)` returns the server and the
//!    [`Channel`] clients use to reach it.
//! 2. **Run**: spawn `server.run()`.
//! 3. **Stop**: drop every channel clone; the loop drains the calls still in
//!    flight and returns.
//!
//! ```rust
//! use async_trait::async_trait;
//! use blog_rpc::config::RpcConfig;
//! use blog_rpc::framework::{CallContext, CallOptions, CallRequest, Reply, Server, Service, handler};
//!
//! enum EchoCall {
//!     Echo { ctx: CallContext, text: String, respond_to: Reply<String> },
//! }
//!
//! impl CallRequest for EchoCall {
//!     fn context(&self) -> &CallContext {
//!         match self {
//!             EchoCall::Echo { ctx, .. } => ctx,
//!         }
//!     }
//! }
//!
//! struct Echo;
//!
//! #[async_trait]
//! impl Service for Echo {
//!     type Request = EchoCall;
//!     const NAME: &'static str = "Echo";
//!
//!     async fn call(&self, request: EchoCall) {
//!         match request {
//!             EchoCall::Echo { ctx, text, respond_to } => {
//!                 handler::unary(&ctx, respond_to, async move { Ok(text) }).await
//!             }
//!         }
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let (server, channel) = Server::new(Echo, &RpcConfig::default());
//!     tokio::spawn(server.run());
//!
//!     let reply = channel
//!         .unary("Echo", &CallOptions::new(), |ctx, respond_to| EchoCall::Echo {
//!             ctx,
//!             text: "hi".into(),
//!             respond_to,
//!         })
//!         .await
//!         .unwrap();
//!     assert_eq!(reply, "hi");
//! }
//! ```

use crate::config::RpcConfig;
use crate::framework::channel::Channel;
use crate::framework::context::CallContext;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{error, info, Instrument};

/// A call message: every variant carries the envelope of its call.
pub trait CallRequest: Send + 'static {
    fn context(&self) -> &CallContext;
}

/// Business logic behind a [`Server`].
///
/// `call` receives one decoded call message and must settle it: reply,
/// close or abort its streams. The per-shape helpers in
/// [`handler`](crate::framework::handler) do the settling.
#[async_trait]
pub trait Service: Send + Sync + 'static {
    /// The call messages this service understands.
    type Request: CallRequest;

    /// Service name used in logs.
    const NAME: &'static str;

    async fn call(&self, request: Self::Request);
}

/// Receives call messages for one service and runs each call concurrently.
pub struct Server<S: Service> {
    receiver: mpsc::Receiver<S::Request>,
    service: Arc<S>,
    calls: JoinSet<()>,
}

impl<S: Service> Server<S> {
    /// Creates a server for `service` and the channel that reaches it.
    pub fn new(service: S, config: &RpcConfig) -> (Self, Channel<S::Request>) {
        let (sender, receiver) = mpsc::channel(config.channel_buffer.max(1));
        let server = Self {
            receiver,
            service: Arc::new(service),
            calls: JoinSet::new(),
        };
        (server, Channel::new(sender, config.stream_buffer))
    }

    /// Runs the accept loop until every channel is dropped, then waits for the
    /// calls still in flight.
    pub async fn run(mut self) {
        let service = S::NAME;
        info!(service, "Server started");

        loop {
            tokio::select! {
                request = self.receiver.recv() => {
                    let Some(request) = request else { break };
                    self.spawn_call(request);
                }
                Some(joined) = self.calls.join_next(), if !self.calls.is_empty() => {
                    if let Err(e) = joined {
                        error!(service, error = %e, "Call task failed");
                    }
                }
            }
        }

        while let Some(joined) = self.calls.join_next().await {
            if let Err(e) = joined {
                error!(service, error = %e, "Call task failed");
            }
        }
        info!(service, "Shutdown");
    }

    fn spawn_call(&mut self, request: S::Request) {
        let ctx = request.context();
        let span = tracing::info_span!(
            "call",
            service = S::NAME,
            method = ctx.method(),
            shape = %ctx.shape()
        );
        let service = Arc::clone(&self.service);
        self.calls
            .spawn(async move { service.call(request).await }.instrument(span));
    }
}
