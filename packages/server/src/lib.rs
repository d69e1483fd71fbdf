// Social Lunch - API Core
//
// This crate provides the backend of a Slack bot that gathers people for a
// weekly lunch and shuffles them into small random groups at a cutoff time.
//
// The lunch lifecycle lives in domains/lunch; kernel/ holds the
// infrastructure traits and adapters it is wired to.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
