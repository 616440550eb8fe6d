//! JavaScript-facing data types.

use photon_binder::{BindOptions, BindingFailure, RefreshReport};
use serde::{Deserialize, Serialize};

/// Binding options as passed from JavaScript. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BindOptionsJs {
    pub missing_text: Option<String>,
    pub marker_tag: Option<String>,
    pub item_tag: Option<String>,
}

impl BindOptionsJs {
    pub fn into_core(self) -> BindOptions {
        let defaults = BindOptions::default();
        BindOptions {
            missing_text: self.missing_text.unwrap_or(defaults.missing_text),
            marker_tag: self.marker_tag.unwrap_or(defaults.marker_tag),
            item_tag: self.item_tag.unwrap_or(defaults.item_tag),
        }
    }
}

/// One binding that could not be applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BindingFailureJs {
    pub kind: String,
    pub identifier: Option<String>,
    pub message: String,
}

impl From<&BindingFailure> for BindingFailureJs {
    fn from(failure: &BindingFailure) -> Self {
        Self {
            kind: failure.kind.to_string(),
            identifier: failure.identifier.clone(),
            message: failure.error.to_string(),
        }
    }
}

/// Outcome of a pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshReportJs {
    pub applied: usize,
    pub failures: Vec<BindingFailureJs>,
}

impl From<&RefreshReport> for RefreshReportJs {
    fn from(report: &RefreshReport) -> Self {
        Self {
            applied: report.applied,
            failures: report.failures.iter().map(BindingFailureJs::from).collect(),
        }
    }
}
