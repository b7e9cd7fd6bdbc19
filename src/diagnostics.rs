//! Injected diagnostics sink for reconstruction runs.
//!
//! The driver recovers from per-element failures instead of propagating
//! them, so skips and lossy fallbacks are only observable through this
//! trait. Implementations are passed into the reconstruction entry point
//! explicitly; the crate keeps no ambient debug state.

use crate::error::XlsceneError;

/// Receives progress and recovery events from a reconstruction run.
///
/// All methods take `&self`; implementations that accumulate state use
/// interior mutability.
pub trait Diagnostics {
    /// Informational progress line (tier transitions, run summary).
    fn info(&self, message: &str);

    /// An element was dropped from the output. `element` is the element's
    /// identifying name.
    fn element_skipped(&self, element: &str, error: &XlsceneError);

    /// A lossy fallback was applied but the element was still emitted
    /// (placeholder rectangle, overflow-accepted text, defaulted color).
    fn fallback(&self, element: &str, detail: &str);
}

/// Diagnostics sink that forwards to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn info(&self, message: &str) {
        log::info!(target: "xlscene", "{message}");
    }

    fn element_skipped(&self, element: &str, error: &XlsceneError) {
        log::warn!(target: "xlscene", "skipped {element}: {error}");
    }

    fn fallback(&self, element: &str, detail: &str) {
        log::debug!(target: "xlscene", "fallback for {element}: {detail}");
    }
}

/// Diagnostics sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullDiagnostics;

impl Diagnostics for NullDiagnostics {
    fn info(&self, _message: &str) {}
    fn element_skipped(&self, _element: &str, _error: &XlsceneError) {}
    fn fallback(&self, _element: &str, _detail: &str) {}
}
