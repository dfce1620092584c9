use log::warn;

use crate::core::geom::Vec2;
use crate::core::model::comp::PortRef;

/// One node of a wire graph. `id` always equals the node's index within its
/// owning wire, so edits are array rewrites rather than pointer surgery.
#[derive(Debug, Clone, PartialEq)]
pub struct WireNode {
    pub id: usize,
    pub pos: Vec2,
    /// Indexes of adjacent nodes within the same wire. Always symmetric:
    /// if a lists b, b lists a.
    pub edges: Vec<usize>,
    pub port_ref: Option<PortRef>,
}

impl WireNode {
    pub fn new(id: usize, pos: Vec2) -> Self {
        Self {
            id,
            pos,
            edges: Vec::new(),
            port_ref: None,
        }
    }
}

/// A wire as an undirected graph of positioned nodes. All non-isolated nodes
/// of one wire carry the same electrical value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WireGraph {
    pub id: String,
    pub nodes: Vec<WireNode>,
}

impl WireGraph {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            nodes: Vec::new(),
        }
    }

    pub fn add_node(&mut self, pos: Vec2) -> usize {
        let id = self.nodes.len();
        self.nodes.push(WireNode::new(id, pos));
        id
    }

    pub fn add_edge(&mut self, a: usize, b: usize) {
        if a == b || a >= self.nodes.len() || b >= self.nodes.len() {
            return;
        }
        if !self.nodes[a].edges.contains(&b) {
            self.nodes[a].edges.push(b);
        }
        if !self.nodes[b].edges.contains(&a) {
            self.nodes[b].edges.push(a);
        }
    }
}

/// One structural problem found in a wire.
#[derive(Debug, Clone, PartialEq)]
pub struct WireIssue {
    pub wire_id: String,
    pub issue: String,
}

/// Visit every undirected segment of the wire once, as (node_lo, node_hi).
pub fn iter_wire_segments<'a>(
    wire: &'a WireGraph,
) -> impl Iterator<Item = (&'a WireNode, &'a WireNode)> + 'a {
    wire.nodes.iter().flat_map(move |n0| {
        n0.edges
            .iter()
            .filter(move |&&e| e > n0.id && e < wire.nodes.len())
            .map(move |&e| (n0, &wire.nodes[e]))
    })
}

/// Repair a wire's node graph in place: fix mismatched ids, drop self-edges,
/// duplicate edges and edges pointing past the node array, and mirror any
/// one-directional edges so the symmetry invariant holds.
pub fn fix_wire(wire: &WireGraph) -> WireGraph {
    let n = wire.nodes.len();
    let mut fixed = wire.clone();

    for (idx, node) in fixed.nodes.iter_mut().enumerate() {
        node.id = idx;
        node.edges.retain(|&e| e < n && e != idx);
        let mut seen = Vec::with_capacity(node.edges.len());
        node.edges.retain(|&e| {
            if seen.contains(&e) {
                false
            } else {
                seen.push(e);
                true
            }
        });
    }

    // materialize missing back-edges
    for a in 0..n {
        let edges = fixed.nodes[a].edges.clone();
        for b in edges {
            if !fixed.nodes[b].edges.contains(&a) {
                fixed.nodes[b].edges.push(a);
            }
        }
    }

    fixed
}

/// Verify structural invariants for a set of wires: unique node ids, no
/// self-edges, no dangling edge indexes, symmetric edges, and (for wires with
/// more than one node) a single connected component.
///
/// Problems are logged and returned; a flagged wire remains usable.
pub fn check_wires(wires: &[WireGraph], context: &str) -> Vec<WireIssue> {
    let mut issues = Vec::new();

    for wire in wires {
        let n = wire.nodes.len();

        for (idx, node) in wire.nodes.iter().enumerate() {
            if node.id != idx {
                issues.push(WireIssue {
                    wire_id: wire.id.clone(),
                    issue: format!("node at index {} has id {}", idx, node.id),
                });
            }
            for &e in &node.edges {
                if e == idx {
                    issues.push(WireIssue {
                        wire_id: wire.id.clone(),
                        issue: format!("node {} has a self-edge", idx),
                    });
                } else if e >= n {
                    issues.push(WireIssue {
                        wire_id: wire.id.clone(),
                        issue: format!("node {} has dangling edge to {}", idx, e),
                    });
                } else if !wire.nodes[e].edges.contains(&idx) {
                    issues.push(WireIssue {
                        wire_id: wire.id.clone(),
                        issue: format!("edge {} -> {} has no mirror edge", idx, e),
                    });
                }
            }
        }

        if n > 1 && !is_connected(wire) {
            issues.push(WireIssue {
                wire_id: wire.id.clone(),
                issue: "wire is not a single connected component".to_string(),
            });
        }
    }

    for issue in &issues {
        warn!("checkWires ({}): wire {}: {}", context, issue.wire_id, issue.issue);
    }

    issues
}

fn is_connected(wire: &WireGraph) -> bool {
    let n = wire.nodes.len();
    if n <= 1 {
        return true;
    }
    let mut visited = vec![false; n];
    let mut stack = vec![0usize];
    visited[0] = true;
    let mut count = 1;
    while let Some(id) = stack.pop() {
        for &e in &wire.nodes[id].edges {
            if e < n && !visited[e] {
                visited[e] = true;
                count += 1;
                stack.push(e);
            }
        }
    }
    count == n
}
