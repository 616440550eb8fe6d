//! Placeholder scanner for Photon templates.
//!
//! Templates are ordinary markup with `${{identifier}}` placeholders in text
//! content. Scanning is a two-token split, not a balanced parse: each `${{`
//! opens a placeholder and the first `}}` before the next `${{` closes it.
//! An opener with no closer is reported as [`Segment::Unterminated`] and kept
//! as literal text.

mod scanner;

pub use scanner::{scan, Segment, Span, Template, CLOSE, OPEN};
