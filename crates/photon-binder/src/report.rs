//! Outcome of a preparation or refresh pass.

use photon_core::{BindingKind, PhotonError};
use tracing::warn;

/// A binding that could not be applied. The element keeps its previous state.
#[derive(Debug)]
pub struct BindingFailure {
    pub kind: BindingKind,
    /// Bound identifier, when it could be read.
    pub identifier: Option<String>,
    pub error: PhotonError,
}

impl BindingFailure {
    /// Build a failure and emit it as a warning.
    pub(crate) fn logged(
        kind: BindingKind,
        identifier: Option<&str>,
        error: impl Into<PhotonError>,
    ) -> Self {
        let error = error.into();
        warn!(%kind, identifier = identifier.unwrap_or(""), %error, "binding not applied");
        Self {
            kind,
            identifier: identifier.map(str::to_string),
            error,
        }
    }
}

/// Counts and isolated failures from one pass.
#[derive(Debug, Default)]
pub struct RefreshReport {
    /// Bindings applied successfully.
    pub applied: usize,
    pub failures: Vec<BindingFailure>,
}

impl RefreshReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when every binding was applied.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub(crate) fn record_applied(&mut self) {
        self.applied += 1;
    }

    /// Record and log a failure.
    pub(crate) fn record_failure(
        &mut self,
        kind: BindingKind,
        identifier: Option<&str>,
        error: impl Into<PhotonError>,
    ) {
        self.failures.push(BindingFailure::logged(kind, identifier, error));
    }

    /// Failures of one binding kind.
    pub fn failures_of(&self, kind: BindingKind) -> impl Iterator<Item = &BindingFailure> {
        self.failures.iter().filter(move |f| f.kind == kind)
    }

    pub(crate) fn absorb(&mut self, other: RefreshReport) {
        self.applied += other.applied;
        self.failures.extend(other.failures);
    }
}
