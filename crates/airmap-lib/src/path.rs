use std::cmp::Ordering;
use std::collections::BinaryHeap;

use tracing::debug;

use crate::graph::{Graph, NO_CONNECTION};

/// Run Dijkstra's algorithm to find the lowest-distance path from `start` to
/// `goal`.
///
/// Each node moves from unvisited to the frontier (finite tentative distance
/// with a recorded parent) to finalized. The frontier node with the smallest
/// tentative distance is finalized next; equal distances resolve to the node
/// inserted first so results are reproducible. The search stops as soon as
/// `goal` is finalized, or fails once the frontier is empty.
///
/// Returns `None` when either endpoint is unknown or `goal` is unreachable.
/// Edge weights are assumed to be non-negative, which [`Graph`] enforces on
/// insertion.
pub fn find_route_dijkstra<T>(graph: &Graph<T>, start: &str, goal: &str) -> Option<Vec<String>> {
    let start_index = graph.index_of(start)?;
    let goal_index = graph.index_of(goal)?;

    if start_index == goal_index {
        return Some(vec![start.to_string()]);
    }

    let node_count = graph.len();
    let mut distances = vec![NO_CONNECTION; node_count];
    let mut parents: Vec<Option<usize>> = vec![None; node_count];
    let mut finalized = vec![false; node_count];
    let mut queue = BinaryHeap::new();

    distances[start_index] = 0.0;
    queue.push(QueueEntry::new(start_index, 0.0));

    while let Some(entry) = queue.pop() {
        // Stale entries linger after a later relaxation improved the node.
        if finalized[entry.node] || entry.cost.0 > distances[entry.node] {
            continue;
        }
        finalized[entry.node] = true;

        if entry.node == goal_index {
            let path = reconstruct_path(graph, &parents, start_index, goal_index);
            debug!(
                start,
                goal,
                hops = path.len() - 1,
                distance = distances[goal_index],
                "dijkstra found route"
            );
            return Some(path);
        }

        let current_distance = distances[entry.node];
        for (next, weight) in graph.row(entry.node).iter().enumerate() {
            let Some(weight) = weight else {
                continue;
            };
            if finalized[next] {
                continue;
            }

            let next_cost = current_distance + weight;
            if next_cost < distances[next] {
                distances[next] = next_cost;
                parents[next] = Some(entry.node);
                queue.push(QueueEntry::new(next, next_cost));
            }
        }
    }

    debug!(start, goal, "dijkstra exhausted frontier without reaching goal");
    None
}

fn reconstruct_path<T>(
    graph: &Graph<T>,
    parents: &[Option<usize>],
    start: usize,
    goal: usize,
) -> Vec<String> {
    let mut path = Vec::new();
    let mut current = Some(goal);
    while let Some(node) = current {
        path.push(graph.code_at(node).to_string());
        if node == start {
            break;
        }
        current = parents[node];
    }
    path.reverse();
    path
}

#[derive(Copy, Clone, Debug, Default)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq(&other.0)
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct QueueEntry {
    node: usize,
    cost: FloatOrd,
}

impl QueueEntry {
    fn new(node: usize, cost: f64) -> Self {
        Self {
            node,
            cost: FloatOrd(cost),
        }
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering so BinaryHeap becomes a min-heap by cost, then by
        // insertion index.
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
