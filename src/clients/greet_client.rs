use crate::framework::{CallOptions, Channel, ClientStreamingCall, Status, StreamSender, Streaming};
use crate::greet_service::message::{
    GreetCall, GREET, GREET_EVERYONE, GREET_MANY_TIMES, GREET_WITH_DEADLINE, LONG_GREET,
};
use crate::model::{GreetRequest, GreetResponse};
use tracing::{debug, instrument};

/// Client for interacting with the greet server.
#[derive(Clone)]
pub struct GreetClient {
    channel: Channel<GreetCall>,
}

impl GreetClient {
    pub fn new(channel: Channel<GreetCall>) -> Self {
        Self { channel }
    }

    #[instrument(skip(self, options))]
    pub async fn greet(
        &self,
        options: &CallOptions,
        request: GreetRequest,
    ) -> Result<GreetResponse, Status> {
        debug!("Sending request");
        self.channel
            .unary(GREET, options, |ctx, respond_to| GreetCall::Greet {
                ctx,
                request,
                respond_to,
            })
            .await
    }

    #[instrument(skip(self, options))]
    pub async fn greet_many_times(
        &self,
        options: &CallOptions,
        request: GreetRequest,
    ) -> Result<Streaming<GreetResponse>, Status> {
        debug!("Sending request");
        self.channel
            .server_streaming(GREET_MANY_TIMES, options, |ctx, responses| {
                GreetCall::GreetManyTimes {
                    ctx,
                    request,
                    responses,
                }
            })
            .await
    }

    /// Opens a client-streaming call; finish it with `close_and_recv`.
    #[instrument(skip(self, options))]
    pub async fn long_greet(
        &self,
        options: &CallOptions,
    ) -> Result<ClientStreamingCall<GreetRequest, GreetResponse>, Status> {
        debug!("Sending request");
        self.channel
            .client_streaming(LONG_GREET, options, |ctx, requests, respond_to| {
                GreetCall::LongGreet {
                    ctx,
                    requests,
                    respond_to,
                }
            })
            .await
    }

    /// Opens a bidirectional call. The two halves may be driven from different tasks.
    #[instrument(skip(self, options))]
    pub async fn greet_everyone(
        &self,
        options: &CallOptions,
    ) -> Result<(StreamSender<GreetRequest>, Streaming<GreetResponse>), Status> {
        debug!("Sending request");
        self.channel
            .bidi_streaming(GREET_EVERYONE, options, |ctx, requests, responses| {
                GreetCall::GreetEveryone {
                    ctx,
                    requests,
                    responses,
                }
            })
            .await
    }

    #[instrument(skip(self, options))]
    pub async fn greet_with_deadline(
        &self,
        options: &CallOptions,
        request: GreetRequest,
    ) -> Result<GreetResponse, Status> {
        debug!("Sending request");
        self.channel
            .unary(GREET_WITH_DEADLINE, options, |ctx, respond_to| {
                GreetCall::GreetWithDeadline {
                    ctx,
                    request,
                    respond_to,
                }
            })
            .await
    }
}
