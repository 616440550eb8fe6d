//! End-to-end binding scenarios over the in-memory document.

use photon_binder::{
    App, BindError, BindingKind, ComponentId, Host, PhotonError, StateMap, Transform, Value,
    ValueKind,
};
use photon_dom::{MemoryDocument, NodeId};
use proptest::prelude::*;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A document with one component registered on `#app`.
fn mount(markup: &str) -> (MemoryDocument, App<MemoryDocument>, ComponentId) {
    init_tracing();
    let mut doc = MemoryDocument::parse(markup).unwrap();
    let root = doc.select("#app").unwrap();
    let mut app = App::new(StateMap::new());
    let id = app.add_component(&mut doc, root).unwrap();
    (doc, app, id)
}

fn markers(doc: &MemoryDocument, root: NodeId, identifier: &str) -> Vec<String> {
    doc.query_class(&root, "pr-state")
        .into_iter()
        .filter(|n| doc.attribute(n, "data-pr-identifier").as_deref() == Some(identifier))
        .map(|n| doc.inner_html(n))
        .collect()
}

#[test]
fn test_counter_end_to_end() {
    let (mut doc, mut app, id) =
        mount(r#"<div id="app"><h1>${{title}}</h1><p>Count: ${{count}}</p></div>"#);
    let component = app.try_component_mut(id).unwrap();
    let root = *component.root();

    component.set_state(&mut doc, StateMap::new().with("title", "Counter").with("count", 0));
    component.prepare(&mut doc).unwrap();
    assert_eq!(
        doc.inner_html(root),
        concat!(
            r#"<h1><span class="pr-state" data-pr-identifier="title">Counter</span></h1>"#,
            r#"<p>Count: <span class="pr-state" data-pr-identifier="count">0</span></p>"#,
        )
    );

    let report = component.set_state(&mut doc, StateMap::new().with("count", 5));
    assert!(report.is_clean());
    assert_eq!(markers(&doc, root, "count"), ["5"]);
    assert_eq!(markers(&doc, root, "title"), ["Counter"]);
}

#[test]
fn test_refresh_is_idempotent() {
    let (mut doc, mut app, id) = mount(concat!(
        r#"<div id="app">${{items}}"#,
        r#"<input class="pr-value" data-pr-value-state="name">"#,
        r#"<p class="pr-class" data-pr-class-state="classes"></p>"#,
        r#"<p class="pr-style" data-pr-style-state="look"></p>"#,
        r#"</div>"#
    ));
    let component = app.try_component_mut(id).unwrap();
    let root = *component.root();
    component.set_state(
        &mut doc,
        StateMap::new()
            .with("items", vec!["a", "b"])
            .with("name", "ada")
            .with("classes", vec!["on"])
            .with("look", photon_core::map([("fontSize", Value::from("2em"))])),
    );
    component.prepare(&mut doc).unwrap();

    let first = doc.inner_html(root);
    component.refresh(&mut doc);
    assert_eq!(doc.inner_html(root), first);
    component.refresh(&mut doc);
    assert_eq!(doc.inner_html(root), first);
}

#[test]
fn test_merge_keeps_other_keys() {
    let (mut doc, mut app, id) = mount(r#"<div id="app">${{a}} ${{b}}</div>"#);
    let component = app.try_component_mut(id).unwrap();
    let root = *component.root();
    component.set_state(&mut doc, StateMap::new().with("a", 1).with("b", 2));
    component.prepare(&mut doc).unwrap();

    component.set_state(&mut doc, StateMap::new().with("b", 3));
    assert_eq!(component.state().get("a"), Some(&Value::from(1)));
    assert_eq!(markers(&doc, root, "a"), ["1"]);
    assert_eq!(markers(&doc, root, "b"), ["3"]);
}

#[test]
fn test_sequence_items_carry_indices() {
    let (mut doc, mut app, id) = mount(r#"<ul id="app">${{todos}}</ul>"#);
    let component = app.try_component_mut(id).unwrap();
    let root = *component.root();
    component.set_state(&mut doc, StateMap::new().with("todos", vec!["milk", "eggs"]));
    component.prepare(&mut doc).unwrap();

    let items = doc.query_class(&root, "todos-item");
    assert_eq!(items.len(), 2);
    assert_eq!(doc.attribute(&items[0], "data-pr-id").as_deref(), Some("0"));
    assert_eq!(doc.attribute(&items[1], "data-pr-id").as_deref(), Some("1"));
    assert_eq!(doc.text_content(items[1]), "eggs");

    component.set_state(&mut doc, StateMap::new().with("todos", vec!["milk"]));
    assert_eq!(doc.query_class(&root, "todos-item").len(), 1);
}

#[test]
fn test_override_takes_precedence_over_state() {
    let (mut doc, mut app, id) = mount(r#"<div id="app">${{user}}</div>"#);
    let component = app.try_component_mut(id).unwrap();
    let root = *component.root();
    component.set_state(&mut doc, StateMap::new().with("user", "ada"));
    component
        .register_override(
            "user",
            Transform::typed(ValueKind::String, ValueKind::String, |v| {
                let name = v.and_then(Value::as_str).unwrap_or("");
                Value::from(format!("<b>{}</b>", name.to_uppercase()))
            }),
        )
        .unwrap();
    component.prepare(&mut doc).unwrap();

    assert_eq!(markers(&doc, root, "user"), ["<b>ADA</b>"]);
}

#[test]
fn test_override_output_kind_is_enforced() {
    let (mut doc, mut app, id) = mount(r#"<div id="app">${{n}}</div>"#);
    let component = app.try_component_mut(id).unwrap();
    let root = *component.root();
    component.set_state(&mut doc, StateMap::new().with("n", 1));
    component
        .register_override(
            "n",
            Transform::typed(ValueKind::Number, ValueKind::String, |_| Value::from(2)),
        )
        .unwrap();

    let report = component.prepare(&mut doc).unwrap();
    assert_eq!(report.failures_of(BindingKind::Content).count(), 1);
    assert!(matches!(
        report.failures[0].error,
        PhotonError::Bind(BindError::OverrideOutput { .. })
    ));
    assert_eq!(markers(&doc, root, "n"), [""]);
}

#[test]
fn test_style_binding_is_additive() {
    let (mut doc, mut app, id) = mount(
        r#"<div id="app"><p id="p" class="pr-style" data-pr-style-state="look" style="margin: 0;"></p></div>"#,
    );
    let component = app.try_component_mut(id).unwrap();
    component.set_state(
        &mut doc,
        StateMap::new().with("look", photon_core::map([("backgroundColor", "red")])),
    );
    component.prepare(&mut doc).unwrap();

    let p = doc.select("#p").unwrap();
    assert_eq!(doc.style_property(&p, "margin").as_deref(), Some("0"));
    assert_eq!(doc.style_property(&p, "background-color").as_deref(), Some("red"));

    component.set_state(
        &mut doc,
        StateMap::new().with("look", photon_core::map([("color", "blue")])),
    );
    assert_eq!(doc.style_property(&p, "background-color").as_deref(), Some("red"));
    assert_eq!(doc.style_property(&p, "color").as_deref(), Some("blue"));
}

#[test]
fn test_missing_identifier_renders_placeholder_text() {
    init_tracing();
    let mut doc = MemoryDocument::parse(r#"<div id="app">[${{ghost}}]</div>"#).unwrap();
    let root = doc.select("#app").unwrap();
    let mut app = App::new(StateMap::new());
    app.set_options(photon_binder::BindOptions {
        missing_text: "-".into(),
        ..Default::default()
    });
    let id = app.add_component(&mut doc, root).unwrap();
    let component = app.try_component_mut(id).unwrap();

    let report = component.prepare(&mut doc).unwrap();
    assert!(report.is_clean());
    assert_eq!(markers(&doc, root, "ghost"), ["-"]);
    assert_eq!(doc.text_content(root), "[-]");
}

#[test]
fn test_malformed_attribute_map_is_isolated() {
    let (mut doc, mut app, id) = mount(concat!(
        r#"<div id="app">"#,
        r#"<a id="bad" class="pr-attr" data-pr-attr-states="{href: link}"></a>"#,
        r#"<a id="good" class="pr-attr" data-pr-attr-states='{"href": "link", "hidden": "off"}'></a>"#,
        r#"</div>"#
    ));
    let component = app.try_component_mut(id).unwrap();
    component.set_state(
        &mut doc,
        StateMap::new().with("link", "/home").with("off", false),
    );
    let report = component.prepare(&mut doc).unwrap();

    assert_eq!(report.failures_of(BindingKind::Attribute).count(), 1);
    assert!(matches!(
        report.failures[0].error,
        PhotonError::Bind(BindError::MalformedAttributeMap { .. })
    ));
    let good = doc.select("#good").unwrap();
    assert_eq!(doc.attribute(&good, "href").as_deref(), Some("/home"));
    assert_eq!(doc.attribute(&good, "hidden"), None);
    let bad = doc.select("#bad").unwrap();
    assert_eq!(doc.attribute(&bad, "href"), None);
}

#[test]
fn test_class_binding_requires_list() {
    let (mut doc, mut app, id) = mount(
        r#"<div id="app"><p id="p" class="pr-class old" data-pr-class-state="mode"></p></div>"#,
    );
    let component = app.try_component_mut(id).unwrap();
    component.set_state(&mut doc, StateMap::new().with("mode", "dark"));
    let report = component.prepare(&mut doc).unwrap();

    let failure = report.failures_of(BindingKind::Class).next().unwrap();
    assert_eq!(
        failure.error.to_string(),
        "class binding for 'mode' expects list, got string"
    );
    let p = doc.select("#p").unwrap();
    assert_eq!(doc.class_list(&p), ["pr-class", "old"]);

    component.set_state(&mut doc, StateMap::new().with("mode", vec!["dark", "wide"]));
    assert_eq!(doc.class_list(&p), ["dark", "wide", "pr-class"]);
}

#[test]
fn test_sibling_components_are_scoped() {
    init_tracing();
    let mut doc = MemoryDocument::parse(
        r#"<section id="left">${{n}}</section><section id="right">${{n}}</section>"#,
    )
    .unwrap();
    let left = doc.select("#left").unwrap();
    let right = doc.select("#right").unwrap();
    let mut app = App::new(StateMap::new());
    let a = app.add_component(&mut doc, left).unwrap();
    let b = app.add_component(&mut doc, right).unwrap();

    for (id, n) in [(a, 1), (b, 2)] {
        let component = app.try_component_mut(id).unwrap();
        component.set_state(&mut doc, StateMap::new().with("n", n));
        component.prepare(&mut doc).unwrap();
    }

    app.try_component_mut(a)
        .unwrap()
        .set_state(&mut doc, StateMap::new().with("n", 10));
    assert_eq!(markers(&doc, left, "n"), ["10"]);
    assert_eq!(markers(&doc, right, "n"), ["2"]);
    assert!(doc.class_list(&right).contains(&"pr-comp-1".to_string()));
}

#[test]
fn test_nested_root_is_rejected() {
    let (mut doc, mut app, id) = mount(r#"<div id="app"><div id="child"></div></div>"#);
    let child = doc.select("#child").unwrap();
    let err = app.add_component(&mut doc, child).unwrap_err();
    assert_eq!(
        err,
        BindError::OverlappingRoot {
            component: ComponentId(1),
            existing: id
        }
    );
}

#[test]
fn test_unterminated_placeholder_is_kept_literal() {
    let (mut doc, mut app, id) = mount(r#"<div id="app">${{ok}} and ${{broken</div>"#);
    let component = app.try_component_mut(id).unwrap();
    let root = *component.root();
    component.set_state(&mut doc, StateMap::new().with("ok", "yes"));
    component.prepare(&mut doc).unwrap();

    assert_eq!(doc.text_content(root), "yes and ${{broken");
    assert_eq!(doc.query_class(&root, "pr-state").len(), 1);
}

#[test]
fn test_typed_bindings_use_override_or_fall_back_to_state() {
    let (mut doc, mut app, id) = mount(concat!(
        r#"<div id="app">"#,
        r#"<input id="name" class="pr-value" data-pr-value-state="name">"#,
        r#"<img id="pic" class="pr-src" data-pr-src-state="pic">"#,
        r#"<a id="link" class="pr-attr" data-pr-attr-states='{"href": "pic", "title": "name"}'></a>"#,
        r#"</div>"#
    ));
    let component = app.try_component_mut(id).unwrap();
    component.set_state(&mut doc, StateMap::new().with("name", "ada").with("pic", "/a.png"));
    component
        .register_override(
            "name",
            Transform::typed(ValueKind::String, ValueKind::String, |v| {
                Value::from(v.and_then(Value::as_str).unwrap_or("").to_uppercase())
            }),
        )
        .unwrap();
    component
        .register_override(
            "pic",
            Transform::typed(ValueKind::String, ValueKind::String, |_| Value::Null),
        )
        .unwrap();
    let report = component.prepare(&mut doc).unwrap();
    assert!(report.is_clean());

    let name = doc.select("#name").unwrap();
    let pic = doc.select("#pic").unwrap();
    let link = doc.select("#link").unwrap();
    assert_eq!(doc.value(&name).as_deref(), Some("ADA"));
    assert_eq!(doc.attribute(&pic, "src").as_deref(), Some("/a.png"));
    assert_eq!(doc.attribute(&link, "href").as_deref(), Some("/a.png"));
    assert_eq!(doc.attribute(&link, "title").as_deref(), Some("ADA"));

    component
        .register_override(
            "pic",
            Transform::typed(ValueKind::String, ValueKind::String, |_| Value::from("/b.png")),
        )
        .unwrap();
    component.refresh(&mut doc);
    assert_eq!(doc.attribute(&pic, "src").as_deref(), Some("/b.png"));
    assert_eq!(doc.attribute(&link, "href").as_deref(), Some("/b.png"));

    component.remove_override("name");
    component.refresh(&mut doc);
    assert_eq!(doc.value(&name).as_deref(), Some("ada"));
}

#[test]
fn test_repeated_updates_keep_document_bounded() {
    let (mut doc, mut app, id) = mount(r#"<div id="app">${{count}} ${{items}}</div>"#);
    let component = app.try_component_mut(id).unwrap();
    component.set_state(&mut doc, StateMap::new().with("count", 0).with("items", vec![1, 2]));
    component.prepare(&mut doc).unwrap();
    component.set_state(&mut doc, StateMap::new().with("count", 1));
    let allocated = doc.arena_len();

    for i in 2..2000 {
        component.set_state(&mut doc, StateMap::new().with("count", i));
    }
    assert_eq!(doc.arena_len(), allocated);
    assert_eq!(markers(&doc, *component.root(), "count"), ["1999"]);
}

#[test]
fn test_unbalanced_markup_value_keeps_other_markers_live() {
    let (mut doc, mut app, id) =
        mount(r#"<div id="app"><h1>${{title}}</h1><p>${{count}}</p></div>"#);
    let component = app.try_component_mut(id).unwrap();
    component.set_state(&mut doc, StateMap::new().with("title", "<b>bold").with("count", 1));

    let report = component.prepare(&mut doc).unwrap();
    assert!(component.is_live());
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].identifier.as_deref(), Some("title"));
    let root = *component.root();
    assert_eq!(markers(&doc, root, "count"), ["1"]);

    component.set_state(&mut doc, StateMap::new().with("count", 2));
    assert_eq!(markers(&doc, root, "count"), ["2"]);

    let report = component.set_state(&mut doc, StateMap::new().with("title", "<b>bold</b>"));
    assert!(report.is_clean());
    assert_eq!(markers(&doc, root, "title"), ["<b>bold</b>"]);
}

fn small_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::from),
        (-1000i32..1000).prop_map(Value::from),
        "[a-z ]{0,8}".prop_map(Value::from),
        proptest::collection::vec("[a-z]{1,6}", 0..4).prop_map(Value::from),
    ]
}

fn partial_state() -> impl Strategy<Value = Vec<(String, Value)>> {
    proptest::collection::vec(("[a-c]", small_value()), 0..4)
}

proptest! {
    #[test]
    fn refresh_is_idempotent_for_any_state(entries in partial_state()) {
        let (mut doc, mut app, id) = mount(concat!(
            r#"<div id="app">${{a}} ${{b}} ${{c}}"#,
            r#"<input class="pr-value" data-pr-value-state="a">"#,
            r#"<img class="pr-src" data-pr-src-state="b">"#,
            r#"<p class="pr-attr" data-pr-attr-states='{"title": "c"}'></p>"#,
            r#"</div>"#
        ));
        let component = app.try_component_mut(id).unwrap();
        component.set_state(&mut doc, entries.into_iter().collect());
        component.prepare(&mut doc).unwrap();
        let root = *component.root();

        let first = doc.inner_html(root);
        component.refresh(&mut doc);
        prop_assert_eq!(doc.inner_html(root), first);
    }

    #[test]
    fn merge_keeps_last_write_per_key(updates in proptest::collection::vec(partial_state(), 1..5)) {
        let (mut doc, mut app, id) = mount(r#"<div id="app"></div>"#);
        let component = app.try_component_mut(id).unwrap();

        let mut expected = std::collections::HashMap::new();
        for update in updates {
            for (key, value) in &update {
                expected.insert(key.clone(), value.clone());
            }
            component.set_state(&mut doc, update.into_iter().collect());
        }

        prop_assert_eq!(component.state().len(), expected.len());
        for (key, value) in &expected {
            prop_assert_eq!(component.state().get(key), Some(value));
        }
    }
}
