use airmap_lib::{find_route_dijkstra, AirMap, Graph, GraphWriter, RouteMode};
use criterion::{criterion_group, criterion_main, Criterion};
use once_cell::sync::Lazy;
use std::hint::black_box;
use std::path::PathBuf;

const GRID_SIDE: usize = 30;

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures/test_data.json")
}

fn grid_code(row: usize, col: usize) -> String {
    format!("C{row:02}{col:02}")
}

/// Square grid with flights to the right and downward neighbours; weights
/// vary so the shortest route is not simply the first one explored.
static GRID: Lazy<Graph<()>> = Lazy::new(|| {
    let mut graph = Graph::new();
    for row in 0..GRID_SIDE {
        for col in 0..GRID_SIDE {
            graph.add_node(grid_code(row, col), ()).expect("unique code");
        }
    }
    for row in 0..GRID_SIDE {
        for col in 0..GRID_SIDE {
            let here = grid_code(row, col);
            let weight = 100.0 + ((row * 7 + col * 13) % 50) as f64;
            if col + 1 < GRID_SIDE {
                graph
                    .add_symmetric_edge(&here, &grid_code(row, col + 1), weight)
                    .expect("valid edge");
            }
            if row + 1 < GRID_SIDE {
                graph
                    .add_symmetric_edge(&here, &grid_code(row + 1, col), weight + 25.0)
                    .expect("valid edge");
            }
        }
    }
    graph
});

static SAMPLE_MAP: Lazy<AirMap> =
    Lazy::new(|| AirMap::load(&fixture_path(), RouteMode::Symmetric).expect("fixture loads"));

fn benchmark_pathfinding(c: &mut Criterion) {
    let grid = &*GRID;
    let start = grid_code(0, 0);
    let goal = grid_code(GRID_SIDE - 1, GRID_SIDE - 1);

    c.bench_function("dijkstra_grid_corner_to_corner", |b| {
        b.iter(|| {
            let path = find_route_dijkstra(grid, &start, &goal).expect("route exists");
            black_box(path.len())
        });
    });

    let map = &*SAMPLE_MAP;
    c.bench_function("shortest_path_mex_scl", |b| {
        b.iter(|| {
            let route = map.shortest_path("MEX", "SCL").expect("route exists");
            black_box(route.info.cost)
        });
    });
}

criterion_group!(benches, benchmark_pathfinding);
criterion_main!(benches);
