//! Binding configuration.

/// Options applied when rendering markers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindOptions {
    /// Text displayed for a missing identifier.
    pub missing_text: String,
    /// Tag of the element wrapping each content marker.
    pub marker_tag: String,
    /// Tag of each element rendered for a sequence item.
    pub item_tag: String,
}

impl Default for BindOptions {
    fn default() -> Self {
        Self {
            missing_text: String::new(),
            marker_tag: "span".to_string(),
            item_tag: "div".to_string(),
        }
    }
}
