// ABOUTME: Lifecycle orchestration using the type state pattern.
// ABOUTME: Exports state markers, the Launch struct, and the launch error type.

mod error;
mod launch;
mod state;
mod transitions;

pub use error::LaunchError;
pub use launch::Launch;
pub use state::{Applied, Executed, Initialized, Prepared};
