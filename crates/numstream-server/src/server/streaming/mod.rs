//! Session orchestration.
//!
//! - [`coordinator`] - builds a record pipeline per request and runs it on
//!   its own task, feeding the response body through a bounded channel.

pub mod coordinator;
