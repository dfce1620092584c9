pub mod comp_def;
pub mod context;
pub mod exe_builder;
pub mod schematic_library;

pub use comp_def::{BuildFn, CompDef, CompLibrary, PortsDef};
pub use context::SharedContext;
pub use exe_builder::{build_default, ExeCompBuilder};
pub use schematic_library::{gen_schematic_id, SchematicLibrary};
