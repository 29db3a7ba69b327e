//! Runtime configuration.
//!
//! Everything here has a sensible default; [`RpcSystem`](crate::lifecycle::RpcSystem)
//! uses [`RpcConfig::default`] unless handed something else.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tunables for servers, streams and the demo services.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RpcConfig {
    /// Capacity of each server's call queue. Callers wait when it is full.
    pub channel_buffer: usize,
    /// Capacity of each stream direction.
    pub stream_buffer: usize,
    /// Upper bound on how long `ListBlogs` waits for the store.
    pub list_timeout: Duration,
    /// Number of greetings `GreetManyTimes` streams back.
    pub greet_many_times_count: usize,
    /// Work steps `GreetWithDeadline` performs before answering.
    pub greet_with_deadline_steps: u32,
    /// Duration of one `GreetWithDeadline` work step.
    pub greet_with_deadline_step: Duration,
    /// Capacity of the document store actor's queue.
    pub store_buffer: usize,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            channel_buffer: 32,
            stream_buffer: 16,
            list_timeout: Duration::from_secs(3),
            greet_many_times_count: 10,
            greet_with_deadline_steps: 2,
            greet_with_deadline_step: Duration::from_secs(1),
            store_buffer: 32,
        }
    }
}

impl RpcConfig {
    pub fn with_list_timeout(mut self, timeout: Duration) -> Self {
        self.list_timeout = timeout;
        self
    }

    pub fn with_stream_buffer(mut self, buffer: usize) -> Self {
        self.stream_buffer = buffer;
        self
    }

    pub fn with_greet_many_times_count(mut self, count: usize) -> Self {
        self.greet_many_times_count = count;
        self
    }

    pub fn with_greet_with_deadline(mut self, steps: u32, step: Duration) -> Self {
        self.greet_with_deadline_steps = steps;
        self.greet_with_deadline_step = step;
        self
    }
}
