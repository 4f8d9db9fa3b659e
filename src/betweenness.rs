//! A module for computing betweenness from enumerated shortest paths.
//!
//! Every ordered pair `(s, t)` is visited, so each undirected pair is seen twice. The credit per
//! direction is `0.5 / |paths(s, t)|`, which adds up to one full credit per undirected pair.

use std::collections::VecDeque;

/// Share of the credit handed out for one direction of a pair.
const DIRECTIONAL_CREDIT: f64 = 0.5;

/// The shortest-path predecessors of every node, relative to a single source.
fn predecessors_from(source: usize, indices: &[Vec<usize>]) -> Vec<Vec<usize>> {
    let num_nodes = indices.len();

    let mut levels: Vec<Option<u32>> = vec![None; num_nodes];
    let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); num_nodes];
    let mut queue: VecDeque<usize> = VecDeque::with_capacity(num_nodes);

    let mut level: u32 = 0;
    let mut count_until_next_level: usize = 1;
    let mut count_of_next_level: usize = 0;

    levels[source] = Some(0);
    queue.push_back(source);

    while let Some(current) = queue.pop_front() {
        for &neighbour in &indices[current] {
            match levels[neighbour] {
                None => {
                    levels[neighbour] = Some(level + 1);
                    predecessors[neighbour].push(current);
                    queue.push_back(neighbour);
                    count_of_next_level += 1;
                }
                // Another shortest path into a node of the next level.
                Some(l) if l == level + 1 => predecessors[neighbour].push(current),
                Some(_) => {}
            }
        }

        count_until_next_level -= 1;
        if count_until_next_level == 0 {
            count_until_next_level = count_of_next_level;
            count_of_next_level = 0;
            level += 1;
        }
    }

    predecessors
}

/// Walks the predecessor sets back from `target` to `source` and returns the interior nodes of
/// each shortest path, ordered from source to target.
///
/// Enumeration stops once `max_paths` paths are collected, the second value reports whether that
/// happened before every path was seen.
fn shortest_paths(
    source: usize,
    target: usize,
    predecessors: &[Vec<usize>],
    max_paths: usize,
) -> (Vec<Vec<usize>>, bool) {
    let mut paths = Vec::new();

    // An explicit stack of (node, interior nodes collected so far, target side first).
    let mut stack: Vec<(usize, Vec<usize>)> = vec![(target, Vec::new())];

    while let Some((node, trail)) = stack.pop() {
        if node == source {
            if paths.len() == max_paths {
                return (paths, true);
            }

            let mut path = trail;
            path.reverse();
            paths.push(path);
            continue;
        }

        // Pushed in reverse so paths come out in predecessor discovery order.
        for &predecessor in predecessors[node].iter().rev() {
            let mut next = trail.clone();
            if node != target {
                next.push(node);
            }
            stack.push((predecessor, next));
        }
    }

    (paths, false)
}

/// Computes betweenness for every node of the adjacency lists.
///
/// Returns the scores in index order and whether any pair had more than `max_paths` shortest
/// paths, in which case only the first `max_paths` of them were credited.
pub fn compute_betweenness(indices: &[Vec<usize>], max_paths: usize) -> (Vec<f64>, bool) {
    let num_nodes = indices.len();
    let mut scores: Vec<f64> = vec![0.0; num_nodes];
    let mut truncated = false;

    for source in 0..num_nodes {
        let predecessors = predecessors_from(source, indices);

        for target in (0..num_nodes).filter(|target| *target != source) {
            let (paths, cut) = shortest_paths(source, target, &predecessors, max_paths);
            truncated |= cut;

            if paths.is_empty() {
                continue;
            }

            let credit = DIRECTIONAL_CREDIT / paths.len() as f64;
            for node in paths.iter().flatten() {
                scores[*node] += credit;
            }
        }
    }

    (scores, truncated)
}
