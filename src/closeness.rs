//! A module for computing the harmonic level-sum closeness of every node.

use std::collections::VecDeque;

/// Runs a breadth-first traversal from `index`, tracking level boundaries with two counters
/// instead of per-node distances, and returns `Σ 1/level` over every node reached at
/// `level > 0`.
fn closeness_for_node(index: usize, indices: &[Vec<usize>]) -> f64 {
    let num_nodes = indices.len();

    let mut visited: Vec<bool> = vec![false; num_nodes];
    let mut queue: VecDeque<usize> = VecDeque::with_capacity(num_nodes);

    let mut level: u32 = 0;
    let mut count_until_next_level: usize = 1;
    let mut count_of_next_level: usize = 0;
    let mut sum = 0.0;

    visited[index] = true;
    queue.push_back(index);

    while let Some(current) = queue.pop_front() {
        // The source sits at level 0 and contributes nothing.
        if level > 0 {
            sum += 1.0 / f64::from(level);
        }

        for &neighbour in &indices[current] {
            if !visited[neighbour] {
                visited[neighbour] = true;
                queue.push_back(neighbour);
                count_of_next_level += 1;
            }
        }

        count_until_next_level -= 1;
        if count_until_next_level == 0 {
            count_until_next_level = count_of_next_level;
            count_of_next_level = 0;
            level += 1;
        }
    }

    sum
}

/// Computes the level-sum closeness for every node of the adjacency lists, in index order.
pub fn compute_closeness(indices: &[Vec<usize>]) -> Vec<f64> {
    (0..indices.len())
        .map(|index| closeness_for_node(index, indices))
        .collect()
}
