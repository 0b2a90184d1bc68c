use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use family_tree_renderer::config::LayoutConfig;
use family_tree_renderer::hierarchy::build_hierarchy;
use family_tree_renderer::layout::{AnchorMap, compute_layout, spouse_edges};
use family_tree_renderer::model::{Dataset, Person, RelationshipRecord};
use family_tree_renderer::render::render_svg;
use family_tree_renderer::theme::Theme;
use std::hint::black_box;

/// A founding couple whose descendants marry in from outside, `children`
/// per couple, over `generations` generations.
fn lineage(generations: usize, children: usize) -> Dataset {
    let mut dataset = Dataset::new();
    let mut next_id = 0usize;
    let mut fresh = |dataset: &mut Dataset| {
        let id = format!("p{next_id}");
        next_id += 1;
        dataset.people.push(Person::new(&id, &format!("Person {id}")));
        id
    };

    let mut couples = vec![(fresh(&mut dataset), fresh(&mut dataset))];
    for _ in 0..generations {
        let mut next = Vec::new();
        for (a, b) in &couples {
            for _ in 0..children {
                let child = fresh(&mut dataset);
                dataset.relationships.push(RelationshipRecord::parent_child(a, &child));
                dataset.relationships.push(RelationshipRecord::parent_child(b, &child));
                let spouse = fresh(&mut dataset);
                dataset
                    .relationships
                    .push(RelationshipRecord::spousal("spouse", &child, &spouse));
                next.push((child, spouse));
            }
        }
        couples = next;
    }
    dataset
}

/// Many unrelated single-parent chains under one super-root.
fn scattered(families: usize, depth: usize) -> Dataset {
    let mut dataset = Dataset::new();
    for family in 0..families {
        for level in 0..depth {
            let id = format!("f{family}_{level}");
            dataset.people.push(Person::new(&id, &id));
            if level > 0 {
                let parent = format!("f{family}_{}", level - 1);
                dataset
                    .relationships
                    .push(RelationshipRecord::parent_child(&parent, &id));
            }
        }
    }
    dataset
}

fn bench_hierarchy(c: &mut Criterion) {
    let mut group = c.benchmark_group("hierarchy");
    for (name, dataset) in [
        ("lineage_4x3", lineage(4, 3)),
        ("lineage_6x2", lineage(6, 2)),
        ("scattered_50x5", scattered(50, 5)),
    ] {
        group.bench_with_input(BenchmarkId::from_parameter(name), &dataset, |b, data| {
            b.iter(|| build_hierarchy(black_box(data)))
        });
    }
    group.finish();
}

fn bench_layout(c: &mut Criterion) {
    let config = LayoutConfig::default();
    let mut group = c.benchmark_group("layout");
    for (name, dataset) in [
        ("lineage_4x3", lineage(4, 3)),
        ("lineage_6x2", lineage(6, 2)),
        ("scattered_50x5", scattered(50, 5)),
    ] {
        let hierarchy = build_hierarchy(&dataset);
        group.bench_with_input(BenchmarkId::from_parameter(name), &hierarchy, |b, data| {
            b.iter(|| {
                let layout = compute_layout(black_box(data), &config);
                let anchors = AnchorMap::from_layout(&layout, &config);
                spouse_edges(data, &anchors)
            })
        });
    }
    group.finish();
}

fn bench_end_to_end(c: &mut Criterion) {
    let config = LayoutConfig::default();
    let theme = Theme::dark();
    let mut group = c.benchmark_group("end_to_end");
    for (name, dataset) in [("lineage_4x3", lineage(4, 3)), ("lineage_6x2", lineage(6, 2))] {
        group.bench_with_input(BenchmarkId::from_parameter(name), &dataset, |b, data| {
            b.iter(|| {
                let hierarchy = build_hierarchy(black_box(data));
                let layout = compute_layout(&hierarchy, &config);
                let anchors = AnchorMap::from_layout(&layout, &config);
                let edges = spouse_edges(&hierarchy, &anchors);
                render_svg(&layout, &edges, data, &theme, &config)
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_hierarchy, bench_layout, bench_end_to_end);
criterion_main!(benches);
