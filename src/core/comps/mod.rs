pub mod gates;
pub mod io;
pub mod math;
pub mod mux;
pub mod port;
pub mod registers;

use serde_json::Value;

use crate::core::library::{CompDef, CompLibrary};
use crate::core::model::CompArgs;

/// Assemble the builtin component library. Every definition is registered
/// under a `core/`-prefixed canonical id, with the bare id kept as an alias
/// so older saves still resolve.
pub fn build_comp_library() -> CompLibrary {
    let mut library = CompLibrary::new();

    let mut defs: Vec<CompDef> = Vec::new();
    defs.extend(registers::create_register_comps());
    defs.extend(math::create_math_comps());
    defs.extend(mux::create_mux_comps());
    defs.extend(gates::create_gate_comps());
    defs.extend(io::create_io_comps());
    defs.extend(port::create_comp_io_comps());

    for mut def in defs {
        let canonical = format!("core/{}", def.def_id);
        def.alt_def_ids.push(def.def_id.clone());
        def.def_id = canonical;
        library.add_comp(def);
    }

    library
}

pub(crate) fn arg_u32(args: &CompArgs, key: &str, default: u32) -> u32 {
    args.get(key)
        .and_then(Value::as_u64)
        .map_or(default, |v| v as u32)
}

pub(crate) fn arg_u8(args: &CompArgs, key: &str, default: u8) -> u8 {
    args.get(key)
        .and_then(Value::as_u64)
        .map_or(default, |v| v as u8)
}

pub(crate) fn arg_f64(args: &CompArgs, key: &str, default: f64) -> f64 {
    args.get(key).and_then(Value::as_f64).unwrap_or(default)
}

pub(crate) fn arg_bool(args: &CompArgs, key: &str, default: bool) -> bool {
    args.get(key).and_then(Value::as_bool).unwrap_or(default)
}

pub(crate) fn arg_str<'a>(args: &'a CompArgs, key: &str, default: &'a str) -> &'a str {
    args.get(key).and_then(Value::as_str).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_has_core_prefixed_ids_and_aliases() {
        let lib = build_comp_library();
        assert!(lib.get_comp_def("core/math/adder").is_some());
        assert!(lib.get_comp_def("math/adder").is_some());
        assert!(lib.get_comp_def("adder").is_some());
        assert!(lib.get_comp_def("core/flipflop/reg1").is_some());
        assert!(lib.get_comp_def("core/comp/port").is_some());
        assert!(lib.get_comp_def("core/io/const32").is_some());
    }

    #[test]
    fn test_alias_creates_canonical_def_id() {
        let lib = build_comp_library();
        let comp = lib.create("adder", None);
        assert_eq!(comp.def_id, "core/math/adder");
    }
}
