// ABOUTME: Library root for stager - exposes public types for testing.
// ABOUTME: The main binary is in main.rs.

pub mod apply;
pub mod config;
pub mod context;
pub mod error;
pub mod executor;
pub mod lifecycle;
pub mod output;
pub mod template;
pub mod types;
pub mod workspace;
