//! service-core: Shared infrastructure for the chat relay functions.
pub mod config;
pub mod error;
pub mod observability;
