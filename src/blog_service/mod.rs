//! Blog CRUD service: create, read, update, delete and list posts.

pub mod error;
pub mod message;
pub mod service;

pub use error::*;
pub use message::BlogCall;
pub use service::BlogService;

use crate::clients::BlogClient;
use crate::config::RpcConfig;
use crate::framework::Server;
use crate::store::DocumentStore;
use std::sync::Arc;

/// Creates a blog server backed by `store` and its client.
pub fn new(store: Arc<dyn DocumentStore>, config: &RpcConfig) -> (Server<BlogService>, BlogClient) {
    let service = BlogService::new(store, config.list_timeout);
    let (server, channel) = Server::new(service, config);
    (server, BlogClient::new(channel))
}
