//! Call-pattern framework: envelopes, frame streams and the four call shapes.
//!
//! This module provides the plumbing every service is built on, independent of
//! what the service does.
//!
//! # Main Components
//!
//! - [`CallContext`] - The call envelope: method, shape, deadline, cancellation
//! - [`Status`] / [`Code`] - Terminal error outcome of a call
//! - [`Channel`] - Calling half of the transport (client side)
//! - [`Server`] / [`Service`] - Receiving half of the transport (server side)
//! - [`handler`] - Per-shape helpers that settle a call on the server
//! - [`Streaming`] / [`StreamSender`] - One direction of a streaming call

pub mod channel;
pub mod context;
pub mod handler;
pub mod server;
pub mod status;
pub mod stream;

// Re-export core types for convenience
pub use channel::{Channel, ClientStreamingCall, Reply};
pub use context::{CallContext, CallOptions, CallShape};
pub use server::{CallRequest, Server, Service};
pub use status::{Code, Status};
pub use stream::{Direction, StreamSender, Streaming};
