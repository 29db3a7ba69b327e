//! Wire messages and store records.

pub mod blog;
pub mod greet;

pub use blog::*;
pub use greet::*;
