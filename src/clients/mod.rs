//! Type-safe clients for the blog and greet servers.
//!
//! Callers never build call messages themselves: each client method picks the
//! interaction shape and hands the right message to the [`Channel`](crate::framework::Channel).

pub mod blog_client;
pub mod greet_client;

pub use blog_client::BlogClient;
pub use greet_client::GreetClient;
