// ABOUTME: Generic launch struct parameterized by state marker.
// ABOUTME: Holds the immutable context and, once applied, the manifest report.

use crate::apply::ApplyReport;
use crate::context::Context;
use std::marker::PhantomData;

use super::state::{Applied, Executed, Initialized};

/// One lifecycle invocation in progress, parameterized by its current state.
///
/// Each transition consumes `self` and returns the next state on success, so
/// the compiler rejects out-of-order stage sequencing (e.g. executing before
/// the manifest report exists).
#[derive(Debug)]
pub struct Launch<S> {
    pub(crate) context: Context,
    pub(crate) report: Option<ApplyReport>,
    pub(crate) _state: PhantomData<S>,
}

impl Launch<Initialized> {
    /// Begin a launch for a resolved context.
    pub fn new(context: Context) -> Self {
        Launch {
            context,
            report: None,
            _state: PhantomData,
        }
    }
}

impl<S> Launch<S> {
    pub fn context(&self) -> &Context {
        &self.context
    }
}

impl Launch<Applied> {
    /// The per-manifest application report. Present by construction in this
    /// state; the applied transition stores it before returning.
    pub fn report(&self) -> &ApplyReport {
        self.report
            .as_ref()
            .expect("applied launch carries a report")
    }
}

impl Launch<Executed> {
    /// Consume the launch and return the context.
    pub fn finish(self) -> Context {
        self.context
    }
}
