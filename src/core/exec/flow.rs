use std::collections::{HashMap, HashSet, VecDeque};

use crate::core::exec::exe_comp::{ExeComp, IoDir};
use crate::core::exec::net::{ExeNet, ExePortRef};
use crate::core::model::{PortType, WireGraph};

const BOUNDARY_PORT_DEF_ID: &str = "core/comp/port";
const BOUNDARY_EXTERNAL_PORT_ID: &str = "_b";

/// Which parts of a wire currently carry a value from an active source to an
/// active destination. Diagnostic only; a pure function of one evaluated
/// tick. Callers caching results must key them on snapshot identity.
#[derive(Debug, Clone, Default)]
pub struct WireFlow {
    pub flow_nodes: HashSet<usize>,
    /// Directed (from, to) node pairs along the flow direction.
    pub flow_segs: HashSet<(usize, usize)>,
    pub active_src_count: usize,
    pub active_dest_count: usize,
    pub src_count: usize,
    pub dest_count: usize,
}

/// Compute the flowing nodes/segments of one wire bound to `net`.
///
/// Active destinations are consuming ports (`In`, not resolved outward,
/// value used this tick); active sources dually. From each destination a BFS
/// over the node graph finds shortest paths back to every active source, and
/// all nodes/segments on those paths are marked. A wire with no destination
/// ports at all is marked flowing everywhere.
pub fn compute_wire_flow(wire: &WireGraph, net: &ExeNet, comps: &[ExeComp]) -> WireFlow {
    let mut flow = WireFlow::default();

    // (schematic-local comp id, port id) -> exe port, with boundary comps'
    // external ports reported under the wrapper comp's id
    let mut port_bindings: HashMap<(String, String), ExePortRef> = HashMap::new();
    for exe_ref in net.dests.iter().chain(net.srcs.iter()) {
        let comp = &comps[exe_ref.comp_idx];
        let mut comp_id = comp.comp.id.clone();
        let mut port_id = comp
            .comp
            .ports
            .get(exe_ref.port_idx)
            .map(|p| p.id.clone())
            .unwrap_or_else(|| BOUNDARY_EXTERNAL_PORT_ID.to_string());

        if comp.comp.def_id == BOUNDARY_PORT_DEF_ID && port_id == BOUNDARY_EXTERNAL_PORT_ID {
            port_id = comp
                .comp
                .args
                .as_ref()
                .and_then(|a| a.get("portId"))
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string();
            // full id is parent|wrapper|inner; the wire binds the wrapper
            let segments: Vec<&str> = comp.full_id.split('|').collect();
            if segments.len() >= 2 {
                comp_id = segments[segments.len() - 2].to_string();
            }
        }

        port_bindings.insert((comp_id, port_id), *exe_ref);
    }

    let mut src_node_ids: Vec<usize> = Vec::new();
    let mut dest_node_ids: Vec<usize> = Vec::new();

    for node in &wire.nodes {
        let Some(port_ref) = &node.port_ref else { continue };
        let key = (port_ref.comp_id.clone(), port_ref.port_id.clone());
        let Some(exe_ref) = port_bindings.get(&key) else { continue };
        let port = &comps[exe_ref.comp_idx].ports[exe_ref.port_idx];

        if port.ty.has(PortType::IN) {
            flow.dest_count += 1;
            if port.io_dir != IoDir::Out && port.data_used {
                dest_node_ids.push(node.id);
            }
        }
        if port.ty.has(PortType::OUT) {
            flow.src_count += 1;
            if port.io_dir != IoDir::In && port.data_used {
                src_node_ids.push(node.id);
            }
        }
    }

    flow.active_src_count = src_node_ids.len();
    flow.active_dest_count = dest_node_ids.len();

    if flow.dest_count == 0 {
        // nothing consumes from this wire, so nothing is excluded
        for node in &wire.nodes {
            flow.flow_nodes.insert(node.id);
            for &e in &node.edges {
                if e > node.id {
                    flow.flow_segs.insert((node.id, e));
                }
            }
        }
        return flow;
    }

    for &dest_node_id in &dest_node_ids {
        let mut visited = vec![false; wire.nodes.len()];
        let mut prev: HashMap<usize, usize> = HashMap::new();
        let mut queue = VecDeque::from([dest_node_id]);

        while let Some(node_id) = queue.pop_front() {
            if visited[node_id] {
                continue;
            }
            visited[node_id] = true;
            for &next in &wire.nodes[node_id].edges {
                if next < wire.nodes.len() && !visited[next] {
                    prev.entry(next).or_insert(node_id);
                    queue.push_back(next);
                }
            }
        }

        for &src_node_id in &src_node_ids {
            let mut node_id = src_node_id;
            flow.flow_nodes.insert(node_id);
            while node_id != dest_node_id {
                let Some(&prev_id) = prev.get(&node_id) else { break };
                flow.flow_segs.insert((prev_id, node_id));
                flow.flow_nodes.insert(prev_id);
                node_id = prev_id;
            }
        }
    }

    flow
}
