// ABOUTME: Launch state marker types for the type state pattern.
// ABOUTME: Zero-sized types enforce stage ordering at compile time.

/// Initial state: context resolved, nothing touched yet.
/// Available actions: `prepare()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Initialized;

/// Workspace prepared: the working directory tree exists.
/// Available actions: `apply()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Prepared;

/// Manifests applied: every rendered artifact is in place.
/// Available actions: `execute()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Applied;

/// Operation executed: the runtime verb completed.
/// Available actions: `cleanup()`, `finish()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Executed;
