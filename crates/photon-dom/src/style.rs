//! Inline `style` attribute handling.

use indexmap::IndexMap;

/// Parse `color: red; font-size: 2em` into ordered property/value pairs.
pub fn parse_style(text: &str) -> IndexMap<String, String> {
    text.split(';')
        .filter_map(|decl| {
            let (name, value) = decl.split_once(':')?;
            let name = name.trim();
            let value = value.trim();
            if name.is_empty() || value.is_empty() {
                None
            } else {
                Some((name.to_ascii_lowercase(), value.to_string()))
            }
        })
        .collect()
}

/// Serialize properties as `name: value;` pairs separated by spaces.
pub fn serialize_style(properties: &IndexMap<String, String>) -> String {
    properties
        .iter()
        .map(|(name, value)| format!("{name}: {value};"))
        .collect::<Vec<_>>()
        .join(" ")
}
