//! # System Lifecycle
//!
//! Starting, wiring and stopping the store and the two servers.
//!
//! [`RpcSystem`] spawns the store actor first, hands its handle to the blog
//! service, then spawns both servers and keeps their clients. Shutdown works
//! by channel closure:
//!
//! 1. Dropping the clients closes each server's call queue.
//! 2. Each server stops accepting, finishes the calls in flight and exits.
//! 3. The blog server's exit drops the last store handle, so the store actor's
//!    queue closes and it exits too.
//!
//! [`setup_tracing`] initializes the `tracing` subscriber once per process.
//!
//! ```bash
//! RUST_LOG=info cargo run      # Compact logs
//! RUST_LOG=debug cargo run     # Full payloads
//! ```

pub mod system;
pub mod tracing;

pub use self::tracing::setup_tracing;
pub use system::{RpcSystem, SystemError};
