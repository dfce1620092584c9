use std::collections::HashMap;

use log::warn;

use crate::core::exec::exe_comp::{CompData, ExeComp, IoDir};
use crate::core::exec::net::{resolve_net, ExeNet, ExePortRef};
use crate::core::exec::order::topo_order;
use crate::core::library::SharedContext;
use crate::core::model::Schematic;

/// One unit of the evaluation order: run a component phase or propagate a net.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExeStep {
    Phase { comp_idx: usize, phase_idx: usize },
    Net { net_idx: usize },
}

/// The compiled machine: every comp and net of a (possibly nested) schematic,
/// plus the deterministic step order the scheduler chose.
///
/// Rebuilt wholesale on structural change; ticks just replay the step lists.
pub struct ExeSystem {
    pub comps: Vec<ExeComp>,
    pub nets: Vec<ExeNet>,
    /// Non-latch phases and net propagations, topologically ordered.
    pub execution_steps: Vec<ExeStep>,
    /// Latch phases, declaration order; run after the combinatorial pass.
    pub latch_steps: Vec<ExeStep>,
    pub comp_id_to_idx: HashMap<String, usize>,
    pub net_id_to_idx: HashMap<String, usize>,
}

impl ExeSystem {
    pub fn build(ctx: &SharedContext, schematic: &Schematic) -> Result<ExeSystem, String> {
        let mut builder = SystemBuilder {
            ctx,
            comps: Vec::new(),
            nets: Vec::new(),
            comp_id_to_idx: HashMap::new(),
            net_id_to_idx: HashMap::new(),
            boundary_ports: HashMap::new(),
        };
        builder.add_schematic(schematic, "")?;

        let (execution_steps, latch_steps) = build_steps(&builder.comps, &builder.nets);

        Ok(ExeSystem {
            comps: builder.comps,
            nets: builder.nets,
            execution_steps,
            latch_steps,
            comp_id_to_idx: builder.comp_id_to_idx,
            net_id_to_idx: builder.net_id_to_idx,
        })
    }

    /// One combinatorial pass: clear per-tick port state, then run the step
    /// list exactly once. Combinational cycles see one-tick-stale values.
    pub fn step_combinatorial(&mut self) {
        for comp in &mut self.comps {
            for port in &mut comp.ports {
                port.data_used = false;
                port.io_dir = IoDir::None;
            }
        }

        for i in 0..self.execution_steps.len() {
            match self.execution_steps[i] {
                ExeStep::Phase { comp_idx, phase_idx } => {
                    self.comps[comp_idx].run_phase(phase_idx);
                }
                ExeStep::Net { net_idx } => {
                    resolve_net(&mut self.comps, &mut self.nets[net_idx]);
                }
            }
        }
    }

    /// Commit stored state: run every latch phase.
    pub fn step_latch(&mut self) {
        for i in 0..self.latch_steps.len() {
            if let ExeStep::Phase { comp_idx, phase_idx } = self.latch_steps[i] {
                self.comps[comp_idx].run_phase(phase_idx);
            }
        }
    }

    /// One full simulation tick.
    pub fn tick(&mut self) {
        self.step_combinatorial();
        self.step_latch();
    }

    pub fn comp_by_full_id(&self, full_id: &str) -> Option<&ExeComp> {
        self.comp_id_to_idx.get(full_id).map(|&i| &self.comps[i])
    }

    pub fn net_by_full_id(&self, full_id: &str) -> Option<&ExeNet> {
        self.net_id_to_idx.get(full_id).map(|&i| &self.nets[i])
    }
}

struct SystemBuilder<'a> {
    ctx: &'a SharedContext,
    comps: Vec<ExeComp>,
    nets: Vec<ExeNet>,
    comp_id_to_idx: HashMap<String, usize>,
    net_id_to_idx: HashMap<String, usize>,
    /// (wrapper full id, declared port id) -> external `_b` port of the inner
    /// boundary comp. Parent nets bind through this map.
    boundary_ports: HashMap<(String, String), ExePortRef>,
}

impl SystemBuilder<'_> {
    fn add_schematic(&mut self, schematic: &Schematic, prefix: &str) -> Result<(), String> {
        for comp in &schematic.comps {
            let full_id = format!("{}{}", prefix, comp.id);

            let sub = comp
                .sub_schematic_id
                .as_deref()
                .and_then(|id| self.ctx.schematic_library.get_schematic(id));
            if let Some(sub) = sub {
                // the wrapper comp is not built itself; its ports surface
                // through the sub-schematic's boundary port comps
                let sub_prefix = format!("{}|", full_id);
                self.add_schematic(sub, &sub_prefix)?;
                continue;
            }

            let exe = self.ctx.comp_library.build(comp, &full_id)?;

            let comp_idx = self.comps.len();
            if !prefix.is_empty() {
                if let CompData::BoundaryPort { external_port, .. } = &exe.data {
                    let wrapper_full_id = prefix.trim_end_matches('|').to_string();
                    let port_id = exe
                        .comp
                        .args
                        .as_ref()
                        .and_then(|a| a.get("portId"))
                        .and_then(|v| v.as_str())
                        .unwrap_or("")
                        .to_string();
                    self.boundary_ports.insert(
                        (wrapper_full_id, port_id),
                        ExePortRef { comp_idx, port_idx: *external_port },
                    );
                }
            }

            self.comp_id_to_idx.insert(full_id, comp_idx);
            self.comps.push(exe);
        }

        for wire in &schematic.wires {
            let full_wire_id = format!("{}{}", prefix, wire.id);
            let net_idx = self.nets.len();
            let mut net = ExeNet::new(&full_wire_id);

            let mut bound: Vec<ExePortRef> = Vec::new();
            for node in &wire.nodes {
                let Some(port_ref) = &node.port_ref else { continue };
                let comp_full_id = format!("{}{}", prefix, port_ref.comp_id);

                let resolved = self.resolve_port(&comp_full_id, &port_ref.port_id);
                let Some(exe_ref) = resolved else {
                    warn!(
                        "wire {} references unknown port {}/{}",
                        full_wire_id, comp_full_id, port_ref.port_id
                    );
                    continue;
                };
                if bound.contains(&exe_ref) {
                    continue;
                }
                bound.push(exe_ref);
            }

            for exe_ref in bound {
                let comp = &mut self.comps[exe_ref.comp_idx];
                let port = &mut comp.ports[exe_ref.port_idx];
                port.net_idx = Some(net_idx);
                net.width = net.width.max(port.width);
                if port.ty.has(crate::core::model::PortType::TRISTATE) {
                    net.tristate = true;
                }
                if port.ty.has(crate::core::model::PortType::OUT) {
                    net.srcs.push(exe_ref);
                }
                if port.ty.has(crate::core::model::PortType::IN) {
                    net.dests.push(exe_ref);
                }
                if let CompData::BoundaryPort {
                    external_port,
                    external_bound,
                    ..
                } = &mut comp.data
                {
                    if *external_port == exe_ref.port_idx {
                        *external_bound = true;
                    }
                }
            }

            self.net_id_to_idx.insert(full_wire_id, net_idx);
            self.nets.push(net);
        }

        Ok(())
    }

    fn resolve_port(&self, comp_full_id: &str, port_id: &str) -> Option<ExePortRef> {
        if let Some(&comp_idx) = self.comp_id_to_idx.get(comp_full_id) {
            let comp = &self.comps[comp_idx];
            let port_idx = comp.comp.ports.iter().position(|p| p.id == port_id)?;
            return Some(ExePortRef { comp_idx, port_idx });
        }
        // sub-schematic wrapper: bind to the inner boundary comp's external port
        self.boundary_ports
            .get(&(comp_full_id.to_string(), port_id.to_string()))
            .copied()
    }
}

/// Assemble the global dependency graph and produce the ordered step lists.
///
/// Nodes are non-latch component phases plus nets. A phase feeds the nets its
/// write ports bind to; a net feeds every phase that reads one of its dest
/// ports; consecutive phases of one comp are chained.
fn build_steps(comps: &[ExeComp], nets: &[ExeNet]) -> (Vec<ExeStep>, Vec<ExeStep>) {
    let mut phase_nodes: Vec<(usize, usize)> = Vec::new();
    let mut phase_node_idx: HashMap<(usize, usize), usize> = HashMap::new();
    for (comp_idx, comp) in comps.iter().enumerate() {
        for (phase_idx, phase) in comp.phases.iter().enumerate() {
            if !phase.is_latch {
                phase_node_idx.insert((comp_idx, phase_idx), phase_nodes.len());
                phase_nodes.push((comp_idx, phase_idx));
            }
        }
    }

    let net_node_offset = phase_nodes.len();
    let node_count = net_node_offset + nets.len();
    let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); node_count];

    for (node_idx, &(comp_idx, phase_idx)) in phase_nodes.iter().enumerate() {
        let comp = &comps[comp_idx];
        if let Some(&next) = phase_node_idx.get(&(comp_idx, phase_idx + 1)) {
            adjacency[node_idx].push(next);
        }
        for &port_idx in &comp.phases[phase_idx].write_port_idxs {
            if let Some(net_idx) = comp.ports[port_idx].net_idx {
                adjacency[node_idx].push(net_node_offset + net_idx);
            }
        }
    }

    for (net_idx, net) in nets.iter().enumerate() {
        for dest in &net.dests {
            let comp = &comps[dest.comp_idx];
            let reader = comp.phases.iter().position(|p| {
                !p.is_latch && p.read_port_idxs.contains(&dest.port_idx)
            });
            if let Some(phase_idx) = reader {
                if let Some(&node) = phase_node_idx.get(&(dest.comp_idx, phase_idx)) {
                    adjacency[net_node_offset + net_idx].push(node);
                }
            }
        }
    }

    let execution_steps = topo_order(&adjacency)
        .into_iter()
        .map(|node| {
            if node < net_node_offset {
                let (comp_idx, phase_idx) = phase_nodes[node];
                ExeStep::Phase { comp_idx, phase_idx }
            } else {
                ExeStep::Net { net_idx: node - net_node_offset }
            }
        })
        .collect();

    let mut latch_steps = Vec::new();
    for (comp_idx, comp) in comps.iter().enumerate() {
        for (phase_idx, phase) in comp.phases.iter().enumerate() {
            if phase.is_latch {
                latch_steps.push(ExeStep::Phase { comp_idx, phase_idx });
            }
        }
    }

    (execution_steps, latch_steps)
}
