pub mod exe_comp;
pub mod flow;
pub mod net;
pub mod order;
pub mod system;

pub use exe_comp::{bit_width_mask, CompData, ExeComp, ExePhase, ExePort, GateOp, IoDir, PhaseFn};
pub use flow::{compute_wire_flow, WireFlow};
pub use net::{resolve_net, ExeNet, ExePortRef};
pub use order::topo_order;
pub use system::{ExeStep, ExeSystem};
