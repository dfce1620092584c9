pub mod comp;
pub mod schematic;
pub mod wire;

pub use comp::{Comp, CompArgs, CompDefFlags, CompPort, PortRef, PortType};
pub use schematic::{EditSnapshot, ElRef, Schematic};
pub use wire::{check_wires, fix_wire, iter_wire_segments, WireGraph, WireIssue, WireNode};
