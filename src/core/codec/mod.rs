pub mod json;
pub mod text;

pub use json::{
    export_schematic_json, import_schematic_json, schematic_from_ls, schematic_to_ls, LsSchematic,
};
pub use text::{export_schematic, import_schematic, ImportResult, LineIssue};
