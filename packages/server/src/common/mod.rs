// Common types and utilities shared across the application

pub mod types;

pub use types::*;
