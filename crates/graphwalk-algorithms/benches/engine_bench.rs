//! Benchmarks for the step-recording algorithms
//!
//! Recording cost is dominated by the per-step snapshots, so these measure
//! whole runs on grid graphs of growing size.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use graphwalk_algorithms::{bfs, dfs, dijkstra, topological_sort};
use graphwalk_graph::{Edge, Graph, NodeId, Orientation};

/// `side x side` grid with edges pointing right and down.
fn grid(side: i64) -> Graph {
    let mut edges = Vec::new();
    for row in 0..side {
        for col in 0..side {
            let id = row * side + col;
            if col + 1 < side {
                edges.push(Edge::weighted(NodeId(id), NodeId(id + 1), ((id % 7) + 1) as f64));
            }
            if row + 1 < side {
                edges.push(Edge::new(NodeId(id), NodeId(id + side)));
            }
        }
    }
    Graph::from_edges(edges)
}

fn bench_dijkstra(c: &mut Criterion) {
    let mut group = c.benchmark_group("dijkstra");

    for &side in &[5i64, 10, 20] {
        let graph = grid(side);
        let end = NodeId(side * side - 1);
        group.throughput(Throughput::Elements(graph.node_count() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(side * side), &graph, |b, g| {
            b.iter(|| dijkstra(black_box(g), Orientation::Undirected, NodeId(0), end))
        });
    }
    group.finish();
}

fn bench_traversal(c: &mut Criterion) {
    let mut group = c.benchmark_group("traversal");

    for &side in &[10i64, 20] {
        let graph = grid(side);
        group.throughput(Throughput::Elements(graph.node_count() as u64));
        group.bench_with_input(BenchmarkId::new("dfs", side * side), &graph, |b, g| {
            b.iter(|| dfs(black_box(g), Orientation::Undirected, NodeId(0), None))
        });
        group.bench_with_input(BenchmarkId::new("bfs", side * side), &graph, |b, g| {
            b.iter(|| bfs(black_box(g), Orientation::Undirected, NodeId(0), None))
        });
    }
    group.finish();
}

fn bench_topological(c: &mut Criterion) {
    let graph = grid(20);
    c.bench_function("topological_sort_400", |b| {
        b.iter(|| topological_sort(black_box(&graph)))
    });
}

criterion_group!(benches, bench_dijkstra, bench_traversal, bench_topological);
criterion_main!(benches);
