//! The greet service exercised in every interaction shape, with deadlines and
//! cancellation. Tests that depend on time run on a paused clock.

use async_trait::async_trait;
use blog_rpc::config::RpcConfig;
use blog_rpc::framework::{
    CallContext, CallOptions, CallRequest, Code, Reply, Server, Service, Status,
};
use blog_rpc::lifecycle::RpcSystem;
use blog_rpc::model::GreetRequest;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

#[tokio::test]
async fn test_unary_greet() {
    let system = RpcSystem::new();

    let reply = system
        .greet_client
        .greet(&CallOptions::new(), GreetRequest::new("Clement"))
        .await
        .expect("Greet failed");
    assert_eq!(reply.result, "Hello Clement");

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_greet_many_times_streams_numbered_greetings() {
    let system = RpcSystem::new();

    let replies = system
        .greet_client
        .greet_many_times(&CallOptions::new(), GreetRequest::new("Clement"))
        .await
        .expect("Failed to open stream")
        .try_collect()
        .await
        .expect("Stream ended with an error");

    let results: Vec<_> = replies.into_iter().map(|r| r.result).collect();
    let expected: Vec<_> = (1..=10).map(|i| format!("Hello Clement! [{i}]")).collect();
    assert_eq!(results, expected);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_greet_many_times_count_is_configurable() {
    let system = RpcSystem::with_config(RpcConfig::default().with_greet_many_times_count(3));

    let replies = system
        .greet_client
        .greet_many_times(&CallOptions::new(), GreetRequest::new("Marie"))
        .await
        .unwrap()
        .try_collect()
        .await
        .unwrap();
    assert_eq!(replies.len(), 3);
    assert_eq!(replies[2].result, "Hello Marie! [3]");

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_long_greet_concatenates_every_name() {
    let system = RpcSystem::new();

    let call = system
        .greet_client
        .long_greet(&CallOptions::new())
        .await
        .unwrap();
    for name in ["Clement", "Marie", "Paul"] {
        call.send(GreetRequest::new(name)).await.unwrap();
    }
    let reply = call.close_and_recv().await.expect("LongGreet failed");
    assert_eq!(reply.result, "Hello Clement!\nHello Marie!\nHello Paul!\n");

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_long_greet_with_no_names_is_empty() {
    let system = RpcSystem::new();

    let call = system
        .greet_client
        .long_greet(&CallOptions::new())
        .await
        .unwrap();
    let reply = call.close_and_recv().await.expect("LongGreet failed");
    assert_eq!(reply.result, "");

    system.shutdown().await.unwrap();
}

/// Each answer arrives before the next name is sent.
#[tokio::test]
async fn test_greet_everyone_answers_while_names_arrive() {
    let system = RpcSystem::new();

    let (requests, mut responses) = system
        .greet_client
        .greet_everyone(&CallOptions::new())
        .await
        .unwrap();

    let names = ["Clement", "Marie", "Paul", "Anna", "Lou"];
    for name in names {
        requests.send(GreetRequest::new(name)).await.unwrap();
        let reply = responses
            .message()
            .await
            .unwrap()
            .expect("stream ended early");
        assert_eq!(reply.result, format!("Hello {name}!"));
    }

    requests.close().await.unwrap();
    assert_eq!(responses.message().await.unwrap(), None);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_greet_everyone_halves_run_from_separate_tasks() {
    let system = RpcSystem::new();

    let (requests, responses) = system
        .greet_client
        .greet_everyone(&CallOptions::new())
        .await
        .unwrap();

    let sender = tokio::spawn(async move {
        for i in 0..50 {
            requests.send(GreetRequest::new(format!("n{i}"))).await?;
        }
        requests.close().await
    });
    let replies = responses.try_collect().await.unwrap();
    sender.await.unwrap().unwrap();

    assert_eq!(replies.len(), 50);
    assert_eq!(replies[49].result, "Hello n49!");

    system.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_greet_with_deadline_succeeds_with_time_to_spare() {
    let system = RpcSystem::new();

    let options = CallOptions::new().with_timeout(Duration::from_secs(5));
    let reply = system
        .greet_client
        .greet_with_deadline(&options, GreetRequest::new("Clement"))
        .await
        .expect("GreetWithDeadline failed");
    assert_eq!(reply.result, "Hello Clement");

    system.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_greet_with_deadline_expires() {
    let system = RpcSystem::new();

    let options = CallOptions::new().with_timeout(Duration::from_secs(1));
    let err = system
        .greet_client
        .greet_with_deadline(&options, GreetRequest::new("Clement"))
        .await
        .unwrap_err();
    assert_eq!(err.code(), Code::DeadlineExceeded);

    system.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_cancelling_the_caller_token_cancels_the_call() {
    let system = RpcSystem::new();
    let token = CancellationToken::new();

    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(500)).await;
        canceller.cancel();
    });

    let options = CallOptions::new().with_cancellation(token);
    let err = system
        .greet_client
        .greet_with_deadline(&options, GreetRequest::new("Clement"))
        .await
        .unwrap_err();
    assert_eq!(err.code(), Code::Cancelled);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_deadline_already_passed_fails_before_dispatch() {
    let system = RpcSystem::new();

    let options = CallOptions::new().with_deadline(tokio::time::Instant::now());
    let err = system
        .greet_client
        .greet(&options, GreetRequest::new("Clement"))
        .await
        .unwrap_err();
    assert_eq!(err.code(), Code::DeadlineExceeded);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_cancelled_stream_reports_cancelled() {
    let system = RpcSystem::new();

    let mut stream = system
        .greet_client
        .greet_many_times(&CallOptions::new(), GreetRequest::new("Clement"))
        .await
        .unwrap();
    stream.cancel();

    let err = stream.message().await.unwrap_err();
    assert_eq!(err.code(), Code::Cancelled);
    // The terminal outcome sticks.
    assert_eq!(stream.message().await.unwrap_err(), err);

    system.shutdown().await.unwrap();
}

struct WaitCall {
    ctx: CallContext,
    respond_to: Reply<u32>,
}

impl CallRequest for WaitCall {
    fn context(&self) -> &CallContext {
        &self.ctx
    }
}

/// Waits a minute per call and reports how each call ended on the server side.
struct Recorder {
    observed: mpsc::UnboundedSender<Result<(), Status>>,
}

#[async_trait]
impl Service for Recorder {
    type Request = WaitCall;
    const NAME: &'static str = "Recorder";

    async fn call(&self, request: WaitCall) {
        let WaitCall { ctx, respond_to } = request;
        let outcome = ctx.run(tokio::time::sleep(Duration::from_secs(60))).await;
        let _ = self.observed.send(outcome.clone());
        let _ = respond_to.send(outcome.map(|()| 0));
    }
}

#[tokio::test(start_paused = true)]
async fn test_dropping_a_unary_call_cancels_it_on_the_server() {
    let (observed, mut outcomes) = mpsc::unbounded_channel();
    let (server, channel) = Server::new(Recorder { observed }, &RpcConfig::default());
    tokio::spawn(server.run());

    let options = CallOptions::new();
    let call = channel.unary("Wait", &options, |ctx, respond_to| WaitCall {
        ctx,
        respond_to,
    });
    // The caller gives up after a second; the future is dropped.
    assert!(tokio::time::timeout(Duration::from_secs(1), call).await.is_err());

    let outcome = outcomes.recv().await.expect("server never finished the call");
    assert_eq!(outcome.unwrap_err().code(), Code::Cancelled);
}

#[tokio::test(start_paused = true)]
async fn test_abandoned_greet_with_deadline_does_not_block_shutdown() {
    let system = RpcSystem::new();

    let options = CallOptions::new();
    let call = system
        .greet_client
        .greet_with_deadline(&options, GreetRequest::new("Clement"));
    assert!(tokio::time::timeout(Duration::from_millis(500), call).await.is_err());

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_dropping_bidi_responses_cancels_the_request_side() {
    let system = RpcSystem::new();

    let (requests, mut responses) = system
        .greet_client
        .greet_everyone(&CallOptions::new())
        .await
        .unwrap();
    requests.send(GreetRequest::new("Clement")).await.unwrap();
    assert_eq!(
        responses.message().await.unwrap().unwrap().result,
        "Hello Clement!"
    );

    drop(responses);
    let err = requests
        .send(GreetRequest::new("Marie"))
        .await
        .unwrap_err();
    assert_eq!(err.code(), Code::Cancelled);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_cancelled_client_stream_reports_cancelled() {
    let system = RpcSystem::new();

    let call = system
        .greet_client
        .long_greet(&CallOptions::new())
        .await
        .unwrap();
    call.send(GreetRequest::new("Clement")).await.unwrap();
    call.cancel();

    let err = call.close_and_recv().await.unwrap_err();
    assert_eq!(err.code(), Code::Cancelled);

    system.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_bidi_deadline_tears_down_both_directions() {
    let system = RpcSystem::new();

    let options = CallOptions::new().with_timeout(Duration::from_secs(1));
    let (requests, mut responses) = system.greet_client.greet_everyone(&options).await.unwrap();
    requests.send(GreetRequest::new("Clement")).await.unwrap();
    assert!(responses.message().await.unwrap().is_some());

    let err = responses.message().await.unwrap_err();
    assert_eq!(err.code(), Code::DeadlineExceeded);

    // The server's request reader is gone once the call is torn down.
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(requests.is_closed());

    drop(responses);
    system.shutdown().await.unwrap();
}
