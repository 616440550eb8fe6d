//! Per-kind refreshers.
//!
//! Each refresher walks its elements in document order and applies the
//! current value. A failing element is recorded in the report and skipped;
//! the rest of the pass continues.

use indexmap::IndexMap;
use photon_core::{
    css_property_name, BindError, BindingKind, Host, StateMap, Value, ValueKind, CLASS_CLASS,
};

use crate::options::BindOptions;
use crate::overrides::{resolve, OverrideMap};
use crate::render::content_markup;
use crate::report::RefreshReport;

/// State and overrides a pass reads from.
#[derive(Debug, Clone, Copy)]
pub struct BindContext<'a> {
    pub state: &'a StateMap,
    pub overrides: &'a OverrideMap,
    pub options: &'a BindOptions,
}

impl<'a> BindContext<'a> {
    pub fn new(state: &'a StateMap, overrides: &'a OverrideMap, options: &'a BindOptions) -> Self {
        Self {
            state,
            overrides,
            options,
        }
    }

    fn resolve(&self, identifier: &str) -> Result<Option<Value>, BindError> {
        resolve(identifier, self.state, self.overrides)
    }
}

/// Read the identifier named by a binding element's data attribute.
fn bound_identifier<H: Host>(
    host: &H,
    node: &H::Node,
    kind: BindingKind,
) -> Result<String, BindError> {
    host.attribute(node, kind.data_attribute())
        .ok_or(BindError::MissingBindingAttribute {
            kind,
            attribute: kind.data_attribute(),
        })
}

/// Text written into value-like slots. Missing and `Null` become empty.
fn slot_text(value: Option<Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(value) => value.to_text(),
    }
}

/// Replace each content marker's children with its displayed value.
/// The marker element itself is kept.
pub fn refresh_content<H: Host>(
    host: &mut H,
    nodes: &[H::Node],
    ctx: &BindContext<'_>,
    report: &mut RefreshReport,
) {
    let kind = BindingKind::Content;
    for node in nodes {
        let identifier = match bound_identifier(&*host, node, kind) {
            Ok(identifier) => identifier,
            Err(error) => {
                report.record_failure(kind, None, error);
                continue;
            }
        };
        let content = match content_markup(&identifier, ctx.state, ctx.overrides, ctx.options) {
            Ok(content) => content,
            Err(error) => {
                report.record_failure(kind, Some(&identifier), error);
                continue;
            }
        };
        match host.set_inner_html(node, &content) {
            Ok(()) => report.record_applied(),
            Err(error) => report.record_failure(kind, Some(&identifier), error),
        }
    }
}

/// Set each form element's editable value.
pub fn refresh_values<H: Host>(
    host: &mut H,
    nodes: &[H::Node],
    ctx: &BindContext<'_>,
    report: &mut RefreshReport,
) {
    apply_each(host, nodes, BindingKind::Value, report, |host, node, identifier| {
        let value = ctx.resolve(identifier)?;
        host.set_value(node, &slot_text(value));
        Ok(())
    });
}

/// Replace each element's class list with the bound names plus the base class.
pub fn refresh_classes<H: Host>(
    host: &mut H,
    nodes: &[H::Node],
    ctx: &BindContext<'_>,
    report: &mut RefreshReport,
) {
    apply_each(host, nodes, BindingKind::Class, report, |host, node, identifier| {
        let mut classes = match ctx.resolve(identifier)? {
            None => Vec::new(),
            Some(Value::List(items)) => class_names(identifier, items)?,
            Some(other) => {
                return Err(BindError::TypeMismatch {
                    identifier: identifier.to_string(),
                    binding: BindingKind::Class,
                    expected: ValueKind::List,
                    found: other.kind(),
                })
            }
        };
        if !classes.iter().any(|c| c == CLASS_CLASS) {
            classes.push(CLASS_CLASS.to_string());
        }
        host.set_class_list(node, &classes);
        Ok(())
    });
}

fn class_names(identifier: &str, items: Vec<Value>) -> Result<Vec<String>, BindError> {
    items
        .into_iter()
        .map(|item| match item {
            Value::String(name) => Ok(name),
            other => Err(BindError::TypeMismatch {
                identifier: identifier.to_string(),
                binding: BindingKind::Class,
                expected: ValueKind::String,
                found: other.kind(),
            }),
        })
        .collect()
}

/// Merge the bound property map onto each element's inline style.
/// Properties not in the map are left alone.
pub fn refresh_styles<H: Host>(
    host: &mut H,
    nodes: &[H::Node],
    ctx: &BindContext<'_>,
    report: &mut RefreshReport,
) {
    apply_each(host, nodes, BindingKind::Style, report, |host, node, identifier| {
        let properties = match ctx.resolve(identifier)? {
            None => return Ok(()),
            Some(Value::Map(properties)) => properties,
            Some(other) => {
                return Err(BindError::TypeMismatch {
                    identifier: identifier.to_string(),
                    binding: BindingKind::Style,
                    expected: ValueKind::Map,
                    found: other.kind(),
                })
            }
        };
        for (name, value) in properties {
            host.set_style_property(node, &css_property_name(&name), &slot_text(Some(value)));
        }
        Ok(())
    });
}

/// Set every attribute named in each element's JSON attribute map.
///
/// `Null`, `false` and missing values remove the attribute; `true` sets it empty.
pub fn refresh_attributes<H: Host>(
    host: &mut H,
    nodes: &[H::Node],
    ctx: &BindContext<'_>,
    report: &mut RefreshReport,
) {
    let kind = BindingKind::Attribute;
    for node in nodes {
        let targets = match bound_identifier(&*host, node, kind)
            .and_then(|raw| parse_attribute_map(&raw))
        {
            Ok(targets) => targets,
            Err(error) => {
                report.record_failure(kind, None, error);
                continue;
            }
        };

        for (attribute, identifier) in targets {
            match ctx.resolve(&identifier) {
                Ok(None | Some(Value::Null) | Some(Value::Bool(false))) => {
                    host.remove_attribute(node, &attribute);
                    report.record_applied();
                }
                Ok(Some(Value::Bool(true))) => {
                    host.set_attribute(node, &attribute, "");
                    report.record_applied();
                }
                Ok(Some(value)) => {
                    host.set_attribute(node, &attribute, &value.to_text());
                    report.record_applied();
                }
                Err(error) => report.record_failure(kind, Some(&identifier), error),
            }
        }
    }
}

/// Parse `{"attrName": "identifier", ...}`.
fn parse_attribute_map(raw: &str) -> Result<IndexMap<String, String>, BindError> {
    serde_json::from_str(raw).map_err(|e| BindError::MalformedAttributeMap {
        source_text: raw.to_string(),
        reason: e.to_string(),
    })
}

/// Set each element's resource reference.
pub fn refresh_sources<H: Host>(
    host: &mut H,
    nodes: &[H::Node],
    ctx: &BindContext<'_>,
    report: &mut RefreshReport,
) {
    apply_each(host, nodes, BindingKind::Source, report, |host, node, identifier| {
        let value = ctx.resolve(identifier)?;
        host.set_source(node, &slot_text(value));
        Ok(())
    });
}

/// Apply a single-identifier binding to every node, isolating failures.
fn apply_each<H, F>(
    host: &mut H,
    nodes: &[H::Node],
    kind: BindingKind,
    report: &mut RefreshReport,
    mut apply: F,
) where
    H: Host,
    F: FnMut(&mut H, &H::Node, &str) -> Result<(), BindError>,
{
    for node in nodes {
        let identifier = match bound_identifier(&*host, node, kind) {
            Ok(identifier) => identifier,
            Err(error) => {
                report.record_failure(kind, None, error);
                continue;
            }
        };
        match apply(host, node, &identifier) {
            Ok(()) => report.record_applied(),
            Err(error) => report.record_failure(kind, Some(&identifier), error),
        }
    }
}
