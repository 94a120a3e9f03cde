//! HTTP service layer.
//!
//! ## Structure
//!
//! - [`handler`] - routes and response construction.
//! - [`state`] - shared shutdown flag and in-flight session tracking.

pub mod handler;
pub mod state;
