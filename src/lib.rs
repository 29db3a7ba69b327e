//! # Blog RPC
//!
//! > **Two small RPC services over an in-process call framework.**
//!
//! A blog CRUD service backed by a document store and a greet service that
//! shows off every interaction shape: unary, server streaming, client
//! streaming and bidirectional streaming. Calls carry an optional deadline and
//! can be cancelled from either side; failures travel as a [`Status`](framework::Status)
//! with a small fixed set of [`Code`](framework::Code)s.
//!
//! ## Module Tour
//!
//! ### 1. The Engine ([`framework`])
//! Call contexts, typed streams, the [`Server`](framework::Server) accept loop
//! and the [`Channel`](framework::Channel) clients dispatch through.
//! - **Role**: Separates the *business logic* (a [`Service`](framework::Service))
//!   from the *plumbing* (channels, deadlines, cancellation, stream termination).
//!
//! ### 2. Persistence ([`store`])
//! The [`DocumentStore`](store::DocumentStore) trait, the actor-backed
//! [`MemoryStore`](store::MemoryStore), a scripted
//! [`MockStore`](store::mock::MockStore) and the 12-byte [`ObjectId`](store::ObjectId).
//!
//! ### 3. The Services ([`blog_service`], [`greet_service`])
//! Request handling and the mapping from domain errors to status codes.
//!
//! ### 4. The Interface ([`clients`])
//! [`BlogClient`](clients::BlogClient) and [`GreetClient`](clients::GreetClient)
//! hide the call messages behind one method per operation.
//!
//! ### 5. The Orchestrator ([`lifecycle`])
//! [`RpcSystem`](lifecycle::RpcSystem) starts everything and shuts it down;
//! [`setup_tracing`](lifecycle::setup_tracing) configures logging.
//!
//! ## Running
//!
//! ```bash
//! RUST_LOG=info cargo run
//! cargo test
//! ```

pub mod blog_service;
pub mod clients;
pub mod config;
pub mod framework;
pub mod greet_service;
pub mod lifecycle;
pub mod model;
pub mod store;
