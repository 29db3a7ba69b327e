//! Greet service: one call per interaction shape, plus a deadline demo.

pub mod message;
pub mod service;

pub use message::GreetCall;
pub use service::GreetService;

use crate::clients::GreetClient;
use crate::config::RpcConfig;
use crate::framework::Server;

/// Creates a greet server and its client.
pub fn new(config: &RpcConfig) -> (Server<GreetService>, GreetClient) {
    let (server, channel) = Server::new(GreetService::new(config), config);
    (server, GreetClient::new(channel))
}
