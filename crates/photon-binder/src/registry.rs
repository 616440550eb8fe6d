//! One-time placeholder rewrite.

use photon_core::{BindingKind, StateMap};
use photon_parser::{scan, Span};
use tracing::debug;

use crate::options::BindOptions;
use crate::overrides::OverrideMap;
use crate::render::{content_markup, marker_markup};
use crate::report::BindingFailure;

/// Markup with every placeholder replaced by a content marker.
#[derive(Debug, Default)]
pub struct Prepared {
    pub markup: String,
    /// Identifiers of the markers written, left to right.
    pub markers: Vec<String>,
    /// Unterminated openers, kept as literal text.
    pub unterminated: Vec<Span>,
    /// Markers whose value could not be computed; they display the missing text.
    pub failures: Vec<BindingFailure>,
}

/// Rewrite `${{identifier}}` placeholders into content markers using default options.
pub fn prepare_states(markup: &str, state: &StateMap, overrides: &OverrideMap) -> Prepared {
    prepare_states_with(markup, state, overrides, &BindOptions::default())
}

/// Rewrite `${{identifier}}` placeholders into content markers.
///
/// Never fails: missing identifiers still produce a marker, and
/// unterminated placeholders are left untouched.
pub fn prepare_states_with(
    markup: &str,
    state: &StateMap,
    overrides: &OverrideMap,
    options: &BindOptions,
) -> Prepared {
    let template = scan(markup);
    let mut markers = Vec::new();
    let mut failures = Vec::new();

    let rendered = template.render(|identifier| {
        markers.push(identifier.to_string());
        let content = match content_markup(identifier, state, overrides, options) {
            Ok(content) => content,
            Err(error) => {
                failures.push(BindingFailure::logged(
                    BindingKind::Content,
                    Some(identifier),
                    error,
                ));
                options.missing_text.clone()
            }
        };
        marker_markup(identifier, &content, options)
    });

    let unterminated: Vec<Span> = template.unterminated().collect();
    debug!(
        markers = markers.len(),
        unterminated = unterminated.len(),
        "placeholders prepared"
    );

    Prepared {
        markup: rendered,
        markers,
        unterminated,
        failures,
    }
}

/// Rewrite placeholders into content markers that display the missing text.
///
/// Used when the fully rendered markup cannot be installed; the markers are
/// then filled one at a time so a bad value only affects its own marker.
pub(crate) fn empty_markers(markup: &str, options: &BindOptions) -> String {
    scan(markup).render(|identifier| marker_markup(identifier, &options.missing_text, options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overrides::Transform;
    use photon_core::{Value, ValueKind};

    #[test]
    fn test_prepare_counter() {
        let state = StateMap::new().with("count", 0);
        let prepared = prepare_states(
            r#"<div class="pr-state-holder">${{count}}</div>"#,
            &state,
            &OverrideMap::new(),
        );
        assert_eq!(
            prepared.markup,
            r#"<div class="pr-state-holder"><span class="pr-state" data-pr-identifier="count">0</span></div>"#
        );
        assert_eq!(prepared.markers, ["count"]);
        assert!(prepared.unterminated.is_empty());
    }

    #[test]
    fn test_missing_identifier_still_gets_marker() {
        let prepared = prepare_states("<p>${{missing}}</p>", &StateMap::new(), &OverrideMap::new());
        assert_eq!(
            prepared.markup,
            r#"<p><span class="pr-state" data-pr-identifier="missing"></span></p>"#
        );
        assert!(prepared.failures.is_empty());
    }

    #[test]
    fn test_other_text_is_untouched() {
        let state = StateMap::new().with("a", 1).with("b", 2);
        let prepared = prepare_states("x ${{a}} y }} ${{b}} z", &state, &OverrideMap::new());
        assert_eq!(
            prepared.markup,
            concat!(
                r#"x <span class="pr-state" data-pr-identifier="a">1</span>"#,
                r#" y }} <span class="pr-state" data-pr-identifier="b">2</span> z"#
            )
        );
        assert_eq!(prepared.markers, ["a", "b"]);
    }

    #[test]
    fn test_unterminated_is_reported_and_kept() {
        let state = StateMap::new().with("a", 1);
        let prepared = prepare_states("<p>${{a}} and ${{b</p>", &state, &OverrideMap::new());
        assert_eq!(
            prepared.markup,
            r#"<p><span class="pr-state" data-pr-identifier="a">1</span> and ${{b</p>"#
        );
        assert_eq!(prepared.unterminated, [Span::new(14, 22)]);
    }

    #[test]
    fn test_sequence_renders_items() {
        let state = StateMap::new().with("items", vec!["x", "y"]);
        let prepared = prepare_states("${{items}}", &state, &OverrideMap::new());
        assert_eq!(
            prepared.markup,
            concat!(
                r#"<span class="pr-state" data-pr-identifier="items">"#,
                r#"<div class="items-item" data-pr-id="0">x</div>"#,
                r#"<div class="items-item" data-pr-id="1">y</div>"#,
                "</span>"
            )
        );
    }

    #[test]
    fn test_override_takes_precedence() {
        let state = StateMap::new().with("items", vec!["x", "y"]).with("n", 4);
        let mut overrides = OverrideMap::new();
        overrides.insert("items", Transform::new(|_| Value::from("many")));
        overrides.insert("n", Transform::new(|_| Value::from("four")));
        let prepared = prepare_states("${{items}}|${{n}}", &state, &overrides);
        assert_eq!(
            prepared.markup,
            concat!(
                r#"<span class="pr-state" data-pr-identifier="items">many</span>|"#,
                r#"<span class="pr-state" data-pr-identifier="n">four</span>"#
            )
        );
    }

    #[test]
    fn test_override_failure_is_recorded() {
        let state = StateMap::new().with("n", "text");
        let mut overrides = OverrideMap::new();
        overrides.insert(
            "n",
            Transform::typed(ValueKind::Number, ValueKind::String, |_| Value::from("x")),
        );
        let prepared = prepare_states("${{n}}", &state, &overrides);
        assert_eq!(
            prepared.markup,
            r#"<span class="pr-state" data-pr-identifier="n"></span>"#
        );
        assert_eq!(prepared.failures.len(), 1);
        assert_eq!(prepared.failures[0].identifier.as_deref(), Some("n"));
    }

    #[test]
    fn test_custom_tags() {
        let options = BindOptions {
            missing_text: "-".to_string(),
            marker_tag: "output".to_string(),
            item_tag: "li".to_string(),
        };
        let state = StateMap::new().with("list", vec![1, 2]);
        let prepared = prepare_states_with("${{list}}${{gone}}", &state, &OverrideMap::new(), &options);
        assert_eq!(
            prepared.markup,
            concat!(
                r#"<output class="pr-state" data-pr-identifier="list">"#,
                r#"<li class="list-item" data-pr-id="0">1</li>"#,
                r#"<li class="list-item" data-pr-id="1">2</li>"#,
                "</output>",
                r#"<output class="pr-state" data-pr-identifier="gone">-</output>"#
            )
        );
    }

    #[test]
    fn test_empty_markers_keep_text() {
        let options = BindOptions {
            missing_text: "?".to_string(),
            ..BindOptions::default()
        };
        assert_eq!(
            empty_markers("<p>${{a}}</p> ${{b", &options),
            r#"<p><span class="pr-state" data-pr-identifier="a">?</span></p> ${{b"#
        );
    }
}
