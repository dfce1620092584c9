pub mod core;

// Re-export commonly used types
pub use crate::core::exec::{ExeComp, ExeNet, ExeStep, ExeSystem};
pub use crate::core::library::SharedContext;
pub use crate::core::model::{Comp, PortType, Schematic, WireGraph};
