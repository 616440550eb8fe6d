//! Binding benchmarks.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use photon_binder::{prepare_states, App, OverrideMap, StateMap, Value};
use photon_dom::MemoryDocument;

fn page(rows: usize) -> String {
    let mut markup = String::from(r#"<main id="app"><h1>${{title}}</h1>"#);
    for i in 0..rows {
        markup.push_str(&format!(
            r#"<p class="pr-class" data-pr-class-state="row_class">Row {i}: ${{{{count}}}}</p>"#
        ));
    }
    markup.push_str("${{items}}</main>");
    markup
}

fn state(count: usize) -> StateMap {
    StateMap::new()
        .with("title", "Benchmark")
        .with("count", count)
        .with("row_class", vec!["row", "even"])
        .with("items", (0..20).map(|i| Value::from(i * 2)).collect::<Vec<_>>())
}

fn prepare_page(c: &mut Criterion) {
    let markup = page(50);
    let state = state(0);
    let overrides = OverrideMap::new();
    c.bench_function("prepare_states_50_rows", |b| {
        b.iter(|| prepare_states(black_box(&markup), &state, &overrides))
    });
}

fn refresh_page(c: &mut Criterion) {
    let markup = page(50);
    let mut doc = MemoryDocument::parse(&markup).unwrap();
    let root = doc.select("#app").unwrap();
    let mut app = App::new(StateMap::new());
    let id = app.add_component(&mut doc, root).unwrap();
    let component = app.try_component_mut(id).unwrap();
    component.set_state(&mut doc, state(0));
    component.prepare(&mut doc).unwrap();

    let mut count = 0;
    c.bench_function("set_state_50_rows", |b| {
        b.iter(|| {
            count += 1;
            component.set_state(&mut doc, StateMap::new().with("count", black_box(count)))
        })
    });
}

criterion_group!(benches, prepare_page, refresh_page);
criterion_main!(benches);
