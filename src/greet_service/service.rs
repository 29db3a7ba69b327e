//! Request handling for the greet service.

use crate::config::RpcConfig;
use crate::framework::{handler, CallContext, Service, Status, StreamSender, Streaming};
use crate::greet_service::message::GreetCall;
use crate::model::{GreetRequest, GreetResponse};
use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, info, warn, Instrument, Span};

/// Greets people in each of the four call shapes.
pub struct GreetService {
    many_times: usize,
    deadline_steps: u32,
    deadline_step: Duration,
    buffer: usize,
}

impl GreetService {
    pub fn new(config: &RpcConfig) -> Self {
        Self {
            many_times: config.greet_many_times_count,
            deadline_steps: config.greet_with_deadline_steps,
            deadline_step: config.greet_with_deadline_step,
            buffer: config.stream_buffer.max(1),
        }
    }

    pub async fn greet(&self, request: GreetRequest) -> Result<GreetResponse, Status> {
        debug!(?request, "Greet");
        Ok(GreetResponse {
            result: format!("Hello {}", request.first_name),
        })
    }

    pub async fn greet_many_times(
        &self,
        request: GreetRequest,
        responses: &StreamSender<GreetResponse>,
    ) -> Result<(), Status> {
        debug!(?request, "GreetManyTimes");
        for i in 1..=self.many_times {
            let result = format!("Hello {}! [{i}]", request.first_name);
            responses.send(GreetResponse { result }).await?;
        }
        Ok(())
    }

    /// Aggregates every received name; zero names yield an empty greeting.
    pub async fn long_greet(
        &self,
        mut requests: Streaming<GreetRequest>,
    ) -> Result<GreetResponse, Status> {
        let mut result = String::new();
        while let Some(request) = requests.message().await? {
            debug!(?request, "LongGreet");
            result.push_str(&format!("Hello {}!\n", request.first_name));
        }
        Ok(GreetResponse { result })
    }

    /// Answers each name as it arrives.
    ///
    /// One task drains the incoming names into an internal queue while a second
    /// flushes the queue into the response stream, so answers go out while
    /// names are still arriving. Both live in a `JoinSet`: the call returns once
    /// both are done, and dropping the call aborts whichever is still running.
    pub async fn greet_everyone(
        &self,
        mut requests: Streaming<GreetRequest>,
        responses: StreamSender<GreetResponse>,
    ) -> Result<(), Status> {
        let (queue, mut pending) = mpsc::channel::<GreetResponse>(self.buffer);
        let mut tasks = JoinSet::new();

        tasks.spawn(
            async move {
                let mut received = 0usize;
                while let Some(request) = requests.message().await? {
                    received += 1;
                    let result = format!("Hello {}!", request.first_name);
                    if queue.send(GreetResponse { result }).await.is_err() {
                        break;
                    }
                }
                debug!(received, "Incoming stream drained");
                Ok::<_, Status>(())
            }
            .instrument(Span::current()),
        );

        tasks.spawn(
            async move {
                let mut sent = 0usize;
                while let Some(response) = pending.recv().await {
                    responses.send(response).await?;
                    sent += 1;
                }
                debug!(sent, "Outgoing queue flushed");
                Ok::<_, Status>(())
            }
            .instrument(Span::current()),
        );

        while let Some(joined) = tasks.join_next().await {
            joined.map_err(task_failed)??;
        }
        Ok(())
    }

    /// Works through a fixed number of steps, checking the caller's deadline
    /// before each one.
    pub async fn greet_with_deadline(
        &self,
        ctx: &CallContext,
        request: GreetRequest,
    ) -> Result<GreetResponse, Status> {
        for step in 0..self.deadline_steps {
            if let Err(status) = ctx.check() {
                warn!(step, code = %status.code(), "The client gave up on the request");
                return Err(status);
            }
            tokio::time::sleep(self.deadline_step).await;
        }
        info!(first_name = %request.first_name, "GreetWithDeadline done");
        Ok(GreetResponse {
            result: format!("Hello {}", request.first_name),
        })
    }
}

fn task_failed(e: JoinError) -> Status {
    Status::internal(format!("greet task failed: {e}"))
}

#[async_trait]
impl Service for GreetService {
    type Request = GreetCall;
    const NAME: &'static str = "GreetService";

    async fn call(&self, request: GreetCall) {
        match request {
            GreetCall::Greet {
                ctx,
                request,
                respond_to,
            } => handler::unary(&ctx, respond_to, self.greet(request)).await,
            GreetCall::GreetManyTimes {
                ctx,
                request,
                responses,
            } => {
                handler::server_streaming(&ctx, responses, |sink| async move {
                    self.greet_many_times(request, &sink).await
                })
                .await
            }
            GreetCall::LongGreet {
                ctx,
                requests,
                respond_to,
            } => {
                handler::client_streaming(&ctx, requests, respond_to, |requests| {
                    self.long_greet(requests)
                })
                .await
            }
            GreetCall::GreetEveryone {
                ctx,
                requests,
                responses,
            } => {
                handler::bidi_streaming(&ctx, requests, responses, |requests, sink| {
                    self.greet_everyone(requests, sink)
                })
                .await
            }
            GreetCall::GreetWithDeadline {
                ctx,
                request,
                respond_to,
            } => {
                handler::unary(&ctx, respond_to, self.greet_with_deadline(&ctx, request)).await
            }
        }
    }
}
