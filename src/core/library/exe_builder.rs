use std::collections::HashMap;

use crate::core::exec::exe_comp::{CompData, ExeComp, ExePhase, ExePort, PhaseFn};
use crate::core::model::{Comp, PortType};

/// Accumulates ports and phases while a definition's build function runs,
/// then produces the finished ExeComp.
///
/// Building is pure: it touches nothing outside the builder. A missing port
/// id is a programming error in the definition, so `get_port` fails fast
/// rather than producing a placeholder.
pub struct ExeCompBuilder {
    comp: Comp,
    full_id: String,
    ports: Vec<ExePort>,
    port_name_to_idx: HashMap<String, usize>,
    phases: Vec<ExePhase>,
    seen_latch: bool,
    valid: bool,
}

impl ExeCompBuilder {
    pub fn new(comp: &Comp, full_id: &str) -> Self {
        let ports: Vec<ExePort> = comp
            .ports
            .iter()
            .enumerate()
            .map(|(i, p)| ExePort::new(i, p.ty, p.width))
            .collect();

        let mut port_name_to_idx = HashMap::new();
        for (i, p) in comp.ports.iter().enumerate() {
            port_name_to_idx.insert(p.id.clone(), i);
        }

        Self {
            comp: comp.clone(),
            full_id: full_id.to_string(),
            ports,
            port_name_to_idx,
            phases: Vec::new(),
            seen_latch: false,
            valid: true,
        }
    }

    pub fn comp(&self) -> &Comp {
        &self.comp
    }

    /// Look up a port index by id, failing with the list of valid ports.
    pub fn get_port(&self, id: &str) -> Result<usize, String> {
        self.port_name_to_idx.get(id).copied().ok_or_else(|| {
            let valid: Vec<&str> = self.comp.ports.iter().map(|p| p.id.as_str()).collect();
            format!(
                "Port '{}' not found on component {} ({}). Valid ports are [{}]",
                id,
                self.comp.name,
                self.comp.id,
                valid.join(", ")
            )
        })
    }

    /// Append a port that is not part of the comp's geometry. Used by
    /// sub-schematic boundary ports for the side bound by the parent net.
    pub fn add_external_port(&mut self, id: &str, ty: PortType, width: u8) -> usize {
        let idx = self.ports.len();
        self.ports.push(ExePort::new(idx, ty, width));
        self.port_name_to_idx.insert(id.to_string(), idx);
        idx
    }

    /// Register a phase with its declared read/write port sets. Latch phases
    /// must come last; they run in the separate latch pass.
    pub fn add_phase(
        &mut self,
        func: PhaseFn,
        read_port_idxs: Vec<usize>,
        write_port_idxs: Vec<usize>,
    ) -> Result<&mut Self, String> {
        self.push_phase(func, read_port_idxs, write_port_idxs, false)
    }

    pub fn add_latch_phase(
        &mut self,
        func: PhaseFn,
        read_port_idxs: Vec<usize>,
        write_port_idxs: Vec<usize>,
    ) -> Result<&mut Self, String> {
        self.push_phase(func, read_port_idxs, write_port_idxs, true)
    }

    fn push_phase(
        &mut self,
        func: PhaseFn,
        read_port_idxs: Vec<usize>,
        write_port_idxs: Vec<usize>,
        is_latch: bool,
    ) -> Result<&mut Self, String> {
        if self.seen_latch && !is_latch {
            return Err(format!(
                "Cannot add phase after latch phase on component {} ({})",
                self.comp.name, self.comp.id
            ));
        }
        if is_latch {
            self.seen_latch = true;
        }
        self.phases.push(ExePhase {
            read_port_idxs,
            write_port_idxs,
            func,
            is_latch,
        });
        Ok(self)
    }

    pub(crate) fn mark_invalid(&mut self) {
        self.valid = false;
    }

    pub fn build(self, data: CompData) -> ExeComp {
        ExeComp {
            full_id: self.full_id,
            comp: self.comp,
            ports: self.ports,
            data,
            phases: self.phases,
            valid: self.valid,
        }
    }
}

fn default_phase(_data: &mut CompData, _ports: &mut [ExePort]) {}

/// Pass-through build for definitions without a build function and for
/// unresolved placeholder comps; never crashes evaluation.
pub fn build_default(comp: &Comp, full_id: &str) -> ExeComp {
    let mut builder = ExeCompBuilder::new(comp, full_id);
    builder.mark_invalid();

    let in_ports: Vec<usize> = builder
        .ports
        .iter()
        .filter(|p| p.ty.has(PortType::IN))
        .map(|p| p.port_idx)
        .collect();
    let out_ports: Vec<usize> = builder
        .ports
        .iter()
        .filter(|p| p.ty.has(PortType::OUT))
        .map(|p| p.port_idx)
        .collect();

    // cannot fail: no latch phases registered yet
    let _ = builder.add_phase(default_phase, in_ports, out_ports);
    builder.build(CompData::Empty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geom::Vec2;
    use crate::core::model::CompPort;

    fn test_comp() -> Comp {
        let mut comp = Comp::placeholder("c0", "test/def");
        comp.ports = vec![
            CompPort::new("in", "In", Vec2::new(0.0, 1.0), PortType::IN, 32),
            CompPort::new("out", "Out", Vec2::new(4.0, 1.0), PortType::OUT, 32),
        ];
        comp
    }

    #[test]
    fn test_get_port_found_and_missing() {
        let comp = test_comp();
        let builder = ExeCompBuilder::new(&comp, "c0");
        assert_eq!(builder.get_port("in"), Ok(0));
        assert_eq!(builder.get_port("out"), Ok(1));

        let err = builder.get_port("nope").unwrap_err();
        assert!(err.contains("nope"));
        assert!(err.contains("in, out"));
    }

    #[test]
    fn test_phase_after_latch_rejected() {
        let comp = test_comp();
        let mut builder = ExeCompBuilder::new(&comp, "c0");
        builder.add_latch_phase(default_phase, vec![0], vec![]).unwrap();
        assert!(builder.add_phase(default_phase, vec![], vec![1]).is_err());
    }

    #[test]
    fn test_build_default_has_one_phase() {
        let comp = test_comp();
        let exe = build_default(&comp, "c0");
        assert!(!exe.valid);
        assert_eq!(exe.phases.len(), 1);
        assert_eq!(exe.phases[0].read_port_idxs, vec![0]);
        assert_eq!(exe.phases[0].write_port_idxs, vec![1]);
    }

    #[test]
    fn test_external_port_appended() {
        let comp = test_comp();
        let mut builder = ExeCompBuilder::new(&comp, "c0");
        let ext = builder.add_external_port("_b", PortType::OUT, 32);
        assert_eq!(ext, 2);
        assert_eq!(builder.get_port("_b"), Ok(2));
    }
}
