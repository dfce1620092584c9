use std::collections::VecDeque;

use log::warn;

/// Deterministic topological order of `0..adjacency.len()` (Kahn's
/// algorithm). Ready nodes are taken in ascending index order, so ties always
/// break by declaration order and repeated builds of the same graph yield the
/// same sequence.
///
/// Cycles do not abort the sort: any node still blocked when the queue runs
/// dry is appended in declaration order with a logged warning, so callers
/// always get a complete, reproducible order.
pub fn topo_order(adjacency: &[Vec<usize>]) -> Vec<usize> {
    let n = adjacency.len();
    let mut in_degree = vec![0usize; n];
    for edges in adjacency {
        for &dest in edges {
            in_degree[dest] += 1;
        }
    }

    let mut queue: VecDeque<usize> = (0..n).filter(|&i| in_degree[i] == 0).collect();
    let mut order = Vec::with_capacity(n);
    let mut placed = vec![false; n];

    while let Some(node) = queue.pop_front() {
        order.push(node);
        placed[node] = true;
        for &dest in &adjacency[node] {
            in_degree[dest] -= 1;
            if in_degree[dest] == 0 {
                queue.push_back(dest);
            }
        }
    }

    if order.len() < n {
        warn!(
            "dependency cycle detected; appending {} node(s) in declaration order",
            n - order.len()
        );
        for i in 0..n {
            if !placed[i] {
                order.push(i);
            }
        }
    }

    order
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_chain() {
        let adj = vec![vec![1], vec![2], vec![]];
        assert_eq!(topo_order(&adj), vec![0, 1, 2]);
    }

    #[test]
    fn test_ties_break_by_index() {
        // 2 -> 0, 2 -> 1: both 0 and 1 become ready together
        let adj = vec![vec![], vec![], vec![0, 1]];
        assert_eq!(topo_order(&adj), vec![2, 0, 1]);
    }

    #[test]
    fn test_cycle_still_terminates_and_is_complete() {
        // 0 <-> 1 cycle plus an independent node 2
        let adj = vec![vec![1], vec![0], vec![]];
        let order = topo_order(&adj);
        assert_eq!(order.len(), 3);
        assert_eq!(order[0], 2);
        // cycle members appended in declaration order
        assert_eq!(&order[1..], &[0, 1]);
    }

    #[test]
    fn test_deterministic_across_runs() {
        let adj = vec![vec![2, 3], vec![3], vec![], vec![2]];
        assert_eq!(topo_order(&adj), topo_order(&adj));
    }
}
