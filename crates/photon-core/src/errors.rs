//! Error types for the Photon engine.

use thiserror::Error;

use crate::state::ComponentId;
use crate::value::ValueKind;
use crate::vocab::BindingKind;

/// Top-level error type for the Photon engine.
#[derive(Debug, Error)]
pub enum PhotonError {
    #[error(transparent)]
    Markup(#[from] MarkupError),

    #[error(transparent)]
    Bind(#[from] BindError),

    #[error(transparent)]
    Host(#[from] HostError),
}

/// Errors while parsing document markup.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MarkupError {
    #[error("Unexpected input at offset {offset}: expected {expected}, found {found:?}")]
    UnexpectedToken {
        found: String,
        expected: String,
        offset: usize,
    },

    #[error("Closing tag </{found}> at offset {offset} does not match <{expected}>")]
    MismatchedClose {
        expected: String,
        found: String,
        offset: usize,
    },

    #[error("Element <{name}> opened at offset {offset} is never closed")]
    UnclosedElement { name: String, offset: usize },

    #[error("Unsupported selector: {selector}")]
    UnsupportedSelector { selector: String },
}

/// Errors while binding state to a document.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BindError {
    #[error("Malformed attribute map {source_text:?}: {reason}")]
    MalformedAttributeMap { source_text: String, reason: String },

    #[error("{kind} binding is missing its {attribute} attribute")]
    MissingBindingAttribute {
        kind: BindingKind,
        attribute: &'static str,
    },

    #[error("{binding} binding for '{identifier}' expects {expected}, got {found}")]
    TypeMismatch {
        identifier: String,
        binding: BindingKind,
        expected: ValueKind,
        found: ValueKind,
    },

    #[error("Override for '{identifier}' accepts {expected}, state holds {found}")]
    OverrideInput {
        identifier: String,
        expected: ValueKind,
        found: ValueKind,
    },

    #[error("Override for '{identifier}' declares {expected} output, produced {found}")]
    OverrideOutput {
        identifier: String,
        expected: ValueKind,
        found: ValueKind,
    },

    #[error("Unknown value kind: {name}")]
    UnknownKind { name: String },

    #[error("Component {component} is already live")]
    AlreadyLive { component: ComponentId },

    #[error("Unknown component: {component}")]
    UnknownComponent { component: ComponentId },

    #[error("Root of component {component} overlaps component {existing}")]
    OverlappingRoot {
        component: ComponentId,
        existing: ComponentId,
    },
}

/// Errors reported by a document host.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("No element matches {selector}")]
    ElementNotFound { selector: String },

    #[error("Invalid markup: {0}")]
    Markup(#[from] MarkupError),

    #[error("Host call failed: {message}")]
    Call { message: String },
}
