//! Content marker rendering.

use photon_core::{
    item_class, BindError, StateMap, Value, IDENTIFIER_ATTR, ITEM_INDEX_ATTR, STATE_CLASS,
};

use crate::options::BindOptions;
use crate::overrides::OverrideMap;

/// Displayed markup for `identifier`.
///
/// An override's output is used verbatim. Without one, a list renders one
/// item element per entry and any other value renders its text form. Missing
/// and `Null` values display `options.missing_text`.
pub fn content_markup(
    identifier: &str,
    state: &StateMap,
    overrides: &OverrideMap,
    options: &BindOptions,
) -> Result<String, BindError> {
    let raw = state.get(identifier);

    if let Some(transform) = overrides.get(identifier) {
        let out = transform.apply(identifier, raw)?;
        return Ok(match out {
            Value::Null => options.missing_text.clone(),
            out => out.to_text(),
        });
    }

    Ok(match raw {
        Some(Value::List(items)) => sequence_markup(identifier, items, options),
        Some(Value::Null) | None => options.missing_text.clone(),
        Some(value) => value.to_text(),
    })
}

/// One element per item, each carrying its zero-based index.
pub fn sequence_markup(identifier: &str, items: &[Value], options: &BindOptions) -> String {
    let class = escape_attribute(&item_class(identifier));
    let tag = &options.item_tag;
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            format!(r#"<{tag} class="{class}" {ITEM_INDEX_ATTR}="{i}">{item}</{tag}>"#)
        })
        .collect()
}

/// Wrap displayed content in a content marker bound to `identifier`.
pub fn marker_markup(identifier: &str, content: &str, options: &BindOptions) -> String {
    let tag = &options.marker_tag;
    let identifier = escape_attribute(identifier);
    format!(r#"<{tag} class="{STATE_CLASS}" {IDENTIFIER_ATTR}="{identifier}">{content}</{tag}>"#)
}

fn escape_attribute(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
}
