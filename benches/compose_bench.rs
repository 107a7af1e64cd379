use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::time::Duration;

use cartographer::board::{OrderAnnotation, OrderResult, Phase, ProvinceNode, Unit, Variant};
use cartographer::color::ColorResolver;
use cartographer::{compose, MapRenderer};

const COLUMNS: usize = 12;
const ROWS: usize = 8;

const ARMY_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="20" height="20" viewBox="0 0 40 40">
<defs><linearGradient id="shine"><stop offset="0" stop-color="#ffffff"/></linearGradient></defs>
<path id="body" d="M4 36L20 4L36 36z" fill="#000000"/>
<path d="M10 30h20" stroke="url(#shine)"/>
</svg>"##;

const FLEET_SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 30 16"><path d="M0 8h30l-6 8h-18z"/></svg>"#;

fn province(column: usize, row: usize) -> String {
    format!("p{column}x{row}")
}

/// A grid board roughly the size of the classic map, with seven nations.
fn grid() -> (Variant, String) {
    let mut graph = std::collections::BTreeMap::new();
    let mut shapes = String::new();
    let mut centers = String::new();
    for column in 0..COLUMNS {
        for row in 0..ROWS {
            let id = province(column, row);
            let mut node = ProvinceNode::new(id.clone()).sub_flags("", &["Land"]);
            if column + 1 < COLUMNS {
                node = node.edge("", &province(column + 1, row), &["Land"]);
            }
            if row + 1 < ROWS {
                node = node.edge("", &province(column, row + 1), &["Land"]);
            }
            if (column + row) % 3 == 0 {
                node = node.supply_center("");
            }
            let (x, y) = (column * 50, row * 50);
            shapes.push_str(&format!(r##"<path id="{id}" d="M{x} {y}h50v50h-50z" fill="#ffffff"/>"##));
            centers.push_str(&format!(r#"<circle id="{id}Center" cx="{}" cy="{}" r="1"/>"#, x + 25, y + 25));
            graph.insert(id, node);
        }
    }
    let variant = Variant {
        name: "Grid".to_string(),
        nations: ["Austria", "England", "France", "Germany", "Italy", "Russia", "Turkey"]
            .map(String::from)
            .to_vec(),
        graph,
        ..Variant::default()
    };
    let map = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}"><g id="provinces">{shapes}</g><g>{centers}</g></svg>"#,
        COLUMNS * 50,
        ROWS * 50
    );
    (variant, map)
}

fn busy_phase(variant: &Variant) -> Phase {
    let mut phase = Phase::empty(10, "Fall", 1905, "Movement");
    for (i, id) in variant.graph.keys().enumerate() {
        let nation = &variant.nations[i % variant.nations.len()];
        if i % 2 == 0 {
            phase.place_unit(id.clone(), if i % 4 == 0 { Unit::army(nation) } else { Unit::fleet(nation) });
        }
        if variant.graph[id].is_supply_center() {
            phase.set_sc_owner(id.clone(), nation.clone());
        }
    }
    phase
}

fn moves(variant: &Variant) -> Vec<OrderAnnotation> {
    (0..COLUMNS - 1)
        .flat_map(|column| (0..ROWS).map(move |row| (column, row)))
        .enumerate()
        .map(|(i, (column, row))| {
            let nation = &variant.nations[i % variant.nations.len()];
            OrderAnnotation::move_to(nation.clone(), province(column, row), province(column + 1, row))
                .resolved(if i % 3 == 0 { OrderResult::Bounce } else { OrderResult::Success })
        })
        .collect()
}

fn bench_resolve_colors(c: &mut Criterion) {
    let (variant, _) = grid();
    let resolver = ColorResolver::new(&variant);
    c.bench_function("resolve_all_nations", |b| {
        b.iter(|| {
            for nation in &variant.nations {
                black_box(resolver.resolve(black_box(nation)).ok());
            }
        })
    });
}

fn bench_prepare_renderer(c: &mut Criterion) {
    let (variant, map) = grid();
    c.bench_function("prepare_renderer_96_provinces", |b| {
        b.iter(|| MapRenderer::new(black_box(&map), ARMY_SVG, FLEET_SVG, &variant))
    });
}

fn bench_render_phase(c: &mut Criterion) {
    let (variant, map) = grid();
    let renderer = match MapRenderer::new(&map, ARMY_SVG, FLEET_SVG, &variant) {
        Ok(renderer) => renderer,
        Err(e) => panic!("grid fixture failed to load: {e}"),
    };
    let phase = busy_phase(&variant);
    let orders = moves(&variant);

    c.bench_function("render_phase_units_only", |b| {
        b.iter(|| renderer.render(black_box(&phase), None))
    });
    c.bench_function("render_phase_with_orders", |b| {
        b.iter(|| renderer.render(black_box(&phase), Some(&orders)))
    });
    c.bench_function("compose_one_shot", |b| {
        b.iter(|| compose(&map, ARMY_SVG, FLEET_SVG, &variant, black_box(&phase), Some(&orders)))
    });
}

fn bench_render_many(c: &mut Criterion) {
    let (variant, map) = grid();
    let renderer = match MapRenderer::new(&map, ARMY_SVG, FLEET_SVG, &variant) {
        Ok(renderer) => renderer,
        Err(e) => panic!("grid fixture failed to load: {e}"),
    };
    let phases: Vec<Phase> = (0..16).map(|_| busy_phase(&variant)).collect();

    let mut group = c.benchmark_group("history");
    group.measurement_time(Duration::from_secs(10));
    group.bench_function("render_many_16_phases", |b| {
        b.iter(|| renderer.render_many(black_box(&phases)))
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_resolve_colors,
    bench_prepare_renderer,
    bench_render_phase,
    bench_render_many
);
criterion_main!(benches);
