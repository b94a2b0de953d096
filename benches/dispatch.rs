use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use hotbind::binding::{AxisBinding, BindingKey, BindingStore, ClickBinding};
use hotbind::{ActionDefinition, Hotkeys, HotkeysConfig, RawInputEvent};

fn build_hotkeys(action_count: usize) -> Hotkeys {
    let mut actions = Vec::with_capacity(action_count);
    let mut store = BindingStore::new();
    for i in 0..action_count {
        let id = format!("action {i}");
        match i % 3 {
            0 => {
                store.set_click(BindingKey::new(id.as_str()), ClickBinding::button(0, i));
                actions.push(ActionDefinition::click(id, || {}));
            }
            1 => {
                store.set_click(
                    BindingKey::new(id.as_str()),
                    ClickBinding::key(&format!("ctrl+f{i}")).expect("valid combo"),
                );
                actions.push(ActionDefinition::momentary(id, |v| {
                    black_box(v);
                }));
            }
            _ => {
                store.set_axis(id.as_str(), AxisBinding::new(0, i).with_deadzone(-0.05, 0.05));
                store.set_click(BindingKey::center(id.as_str()), ClickBinding::button(1, i));
                actions.push(ActionDefinition::range(id, (-100.0, 100.0), 5.0, |v| {
                    black_box(v);
                }));
            }
        }
    }
    Hotkeys::with_store(actions, store, &HotkeysConfig::default()).expect("valid action set")
}

fn bench_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch");

    for &count in &[10usize, 100, 1000] {
        let mut hotkeys = build_hotkeys(count);
        let events = [
            RawInputEvent::button(0, count / 2, true),
            RawInputEvent::button(0, count / 2, false),
            RawInputEvent::axis(0, 2, 0.75),
            RawInputEvent::key_down(["ctrl", "f1"]),
            RawInputEvent::key_up(["ctrl", "f1"]),
            RawInputEvent::button(3, 0, true),
        ];

        group.bench_with_input(BenchmarkId::new("mixed_events", count), &count, |b, _| {
            b.iter(|| {
                for event in &events {
                    black_box(hotkeys.process_event(black_box(event)));
                }
            })
        });
    }

    group.finish();
}

fn bench_reset(c: &mut Criterion) {
    let mut group = c.benchmark_group("reset");
    for &count in &[10usize, 100, 1000] {
        let mut hotkeys = build_hotkeys(count);
        group.bench_with_input(BenchmarkId::new("rebuild", count), &count, |b, _| {
            b.iter(|| hotkeys.reset())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_dispatch, bench_reset);
criterion_main!(benches);
