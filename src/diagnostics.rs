//! Diagnostic Output
//!
//! Human-readable status and error lines produced by the transport. The
//! text carries no contract beyond being informational; where it ends up
//! (console, log file, test recorder) is decided by the sink.

use std::rc::Rc;
use std::sync::Arc;

/// Destination for diagnostic lines
pub trait DiagnosticSink {
    /// Informational line
    fn print(&self, message: &str);

    /// Error line
    fn error(&self, message: &str);
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &S {
    fn print(&self, message: &str) {
        (**self).print(message)
    }

    fn error(&self, message: &str) {
        (**self).error(message)
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for Rc<S> {
    fn print(&self, message: &str) {
        (**self).print(message)
    }

    fn error(&self, message: &str) {
        (**self).error(message)
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for Arc<S> {
    fn print(&self, message: &str) {
        (**self).print(message)
    }

    fn error(&self, message: &str) {
        (**self).error(message)
    }
}

/// Forwards diagnostics to `tracing` under the `supl` target
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn print(&self, message: &str) {
        tracing::info!(target: "supl", "{}", message);
    }

    fn error(&self, message: &str) {
        tracing::error!(target: "supl", "{}", message);
    }
}
