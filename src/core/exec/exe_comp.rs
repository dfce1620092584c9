use crate::core::model::{Comp, PortType};

/// Resolved direction for a bidirectional port, decided at evaluation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IoDir {
    #[default]
    None,
    In,
    Out,
}

/// Runtime counterpart of a comp port. Values are unsigned bit patterns of
/// the declared width; no intrinsic sign.
#[derive(Debug, Clone)]
pub struct ExePort {
    /// Index into the owning ExeComp's ports array.
    pub port_idx: usize,
    /// Index of the net bound to this port, if any.
    pub net_idx: Option<usize>,
    pub ty: PortType,
    pub width: u8,
    pub value: u32,
    /// Is this port currently driving/consuming. For inputs, false means the
    /// input is ignored this tick (e.g. an inactive mux leg).
    pub io_enabled: bool,
    pub io_dir: IoDir,
    /// Was this port's value actually consumed this tick.
    pub data_used: bool,
}

impl ExePort {
    pub fn new(port_idx: usize, ty: PortType, width: u8) -> Self {
        Self {
            port_idx,
            net_idx: None,
            ty,
            width,
            value: 0,
            io_enabled: true,
            io_dir: IoDir::None,
            data_used: false,
        }
    }
}

/// Mask covering the low `width` bits.
pub fn bit_width_mask(width: u8) -> u32 {
    if width >= 32 {
        0xffff_ffff
    } else {
        (1u32 << width) - 1
    }
}

/// Private per-component runtime state. One variant per builtin definition;
/// unresolved/pass-through comps carry `Empty`.
#[derive(Debug, Clone)]
pub enum CompData {
    Empty,
    Const {
        value: u32,
        out: usize,
    },
    Output {
        inp: usize,
    },
    Adder {
        a: usize,
        b: usize,
        out: usize,
        carry_in: Option<usize>,
        carry_out: Option<usize>,
    },
    SetLessThan {
        a: usize,
        b: usize,
        signed: usize,
        out: usize,
    },
    ShiftLeft {
        a: usize,
        b: usize,
        out: usize,
    },
    ShiftRight {
        a: usize,
        b: usize,
        arith: usize,
        out: usize,
    },
    Comparator {
        a: usize,
        b: usize,
        signed: usize,
        out_eq: usize,
        out_lt: usize,
    },
    Gate {
        op: GateOp,
        a: usize,
        b: usize,
        out: usize,
    },
    Mux2 {
        sel: usize,
        a: usize,
        b: usize,
        out: usize,
    },
    Reg1 {
        inp: usize,
        out: usize,
        value: u32,
        width: u8,
    },
    RegFile {
        ctrl: usize,
        inp: usize,
        out_a: usize,
        out_b: usize,
        file: Box<[u32; 32]>,
        write_enabled: bool,
        write_reg: usize,
        write_data: u32,
    },
    BoundaryPort {
        /// The internal-facing port on the comp geometry.
        port: usize,
        /// The external port bound by the parent schematic's net.
        external_port: usize,
        external_bound: bool,
        is_input: bool,
        value: u32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOp {
    And,
    Or,
    Xor,
}

/// One pure evaluation step of a component. The declared read/write sets are
/// the only ordering information the scheduler has; a phase must not touch
/// ports outside its write list.
pub type PhaseFn = fn(&mut CompData, &mut [ExePort]);

#[derive(Clone)]
pub struct ExePhase {
    pub read_port_idxs: Vec<usize>,
    pub write_port_idxs: Vec<usize>,
    pub func: PhaseFn,
    pub is_latch: bool,
}

impl std::fmt::Debug for ExePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExePhase")
            .field("read_port_idxs", &self.read_port_idxs)
            .field("write_port_idxs", &self.write_port_idxs)
            .field("is_latch", &self.is_latch)
            .finish()
    }
}

/// Runtime counterpart of a comp: its ports, private state and phases.
#[derive(Debug, Clone)]
pub struct ExeComp {
    /// Flattened id: nested sub-schematic comps get `parentId|` prefixes.
    pub full_id: String,
    pub comp: Comp,
    pub ports: Vec<ExePort>,
    pub data: CompData,
    pub phases: Vec<ExePhase>,
    /// False for unresolved/pass-through builds.
    pub valid: bool,
}

impl ExeComp {
    pub fn run_phase(&mut self, phase_idx: usize) {
        let func = self.phases[phase_idx].func;
        func(&mut self.data, &mut self.ports);
    }

    pub fn port_value(&self, port_idx: usize) -> u32 {
        self.ports[port_idx].value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_width_mask() {
        assert_eq!(bit_width_mask(1), 0b1);
        assert_eq!(bit_width_mask(5), 0b11111);
        assert_eq!(bit_width_mask(32), 0xffff_ffff);
    }
}
