use crate::clients::{BlogClient, GreetClient};
use crate::config::RpcConfig;
use crate::store::{DocumentStore, StoreActor};
use std::sync::Arc;
use tokio::task::{JoinError, JoinHandle};
use tracing::{error, info};

/// Errors raised while stopping the system.
#[derive(Debug, thiserror::Error)]
pub enum SystemError {
    #[error("{task} task failed: {source}")]
    TaskFailed {
        task: &'static str,
        #[source]
        source: JoinError,
    },
}

/// Owns the running servers and the clients that reach them.
///
/// # Example
///
/// ```rust,ignore
/// let system = RpcSystem::new();
///
/// let id = system.blog_client.create_blog(&CallOptions::new(), blog).await?;
/// let reply = system.greet_client.greet(&CallOptions::new(), request).await?;
///
/// system.shutdown().await?;
/// ```
pub struct RpcSystem {
    /// Client for the blog server
    pub blog_client: BlogClient,

    /// Client for the greet server
    pub greet_client: GreetClient,

    handles: Vec<(&'static str, JoinHandle<()>)>,
}

impl RpcSystem {
    /// Starts the system with the default configuration and an in-memory store.
    pub fn new() -> Self {
        Self::with_config(RpcConfig::default())
    }

    /// Starts the system with `config` and an in-memory store.
    pub fn with_config(config: RpcConfig) -> Self {
        let (store_actor, store) = StoreActor::new(config.store_buffer);
        let store_handle = tokio::spawn(store_actor.run());

        let mut system = Self::with_store(Arc::new(store), config);
        system.handles.push(("store", store_handle));
        system
    }

    /// Starts both servers, backing the blog server with `store`.
    ///
    /// The caller owns the store's lifecycle.
    pub fn with_store(store: Arc<dyn DocumentStore>, config: RpcConfig) -> Self {
        let (blog_server, blog_client) = crate::blog_service::new(store, &config);
        let (greet_server, greet_client) = crate::greet_service::new(&config);

        let blog_handle = tokio::spawn(blog_server.run());
        let greet_handle = tokio::spawn(greet_server.run());

        Self {
            blog_client,
            greet_client,
            handles: vec![("blog", blog_handle), ("greet", greet_handle)],
        }
    }

    /// Gracefully shuts down both servers and the store.
    ///
    /// Calls already accepted run to completion first. Clones of the clients
    /// held elsewhere keep their server alive, so drop them before calling this.
    pub async fn shutdown(self) -> Result<(), SystemError> {
        info!("Shutting down system...");

        drop(self.blog_client);
        drop(self.greet_client);

        join_all(self.handles).await?;

        info!("System shutdown complete.");
        Ok(())
    }
}

/// Awaits every task, then reports the first failure.
async fn join_all(handles: Vec<(&'static str, JoinHandle<()>)>) -> Result<(), SystemError> {
    let mut first_failure = None;
    for (task, handle) in handles {
        if let Err(source) = handle.await {
            error!(task, error = %source, "Task failed");
            first_failure.get_or_insert(SystemError::TaskFailed { task, source });
        }
    }
    match first_failure {
        Some(failure) => Err(failure),
        None => Ok(()),
    }
}

impl Default for RpcSystem {
    fn default() -> Self {
        Self::new()
    }
}
