use crate::core::comps::arg_u8;
use crate::core::exec::exe_comp::{CompData, ExeComp, ExePort, GateOp};
use crate::core::geom::Vec2;
use crate::core::library::{CompDef, ExeCompBuilder, PortsDef};
use crate::core::model::{CompArgs, CompDefFlags, CompPort, PortType};

const GATE_W: f64 = 3.0;
const GATE_H: f64 = 4.0;

fn gate_ports(args: &CompArgs) -> Vec<CompPort> {
    let width = arg_u8(args, "bitWidth", 1);
    vec![
        CompPort::new("a", "", Vec2::new(0.0, 1.0), PortType::IN, width),
        CompPort::new("b", "", Vec2::new(0.0, 3.0), PortType::IN, width),
        CompPort::new("o", "", Vec2::new(GATE_W, 2.0), PortType::OUT, width),
    ]
}

fn gate_init_config() -> CompArgs {
    let mut args = CompArgs::new();
    args.insert("rotate".into(), 0.into());
    args.insert("bitWidth".into(), 1.into());
    args
}

fn gate_phase(data: &mut CompData, ports: &mut [ExePort]) {
    if let CompData::Gate { op, a, b, out } = data {
        let a = ports[*a].value;
        let b = ports[*b].value;
        ports[*out].value = match op {
            GateOp::And => a & b,
            GateOp::Or => a | b,
            GateOp::Xor => a ^ b,
        };
    }
}

fn build_gate(mut builder: ExeCompBuilder, op: GateOp) -> Result<ExeComp, String> {
    let a = builder.get_port("a")?;
    let b = builder.get_port("b")?;
    let out = builder.get_port("o")?;
    builder.add_phase(gate_phase, vec![a, b], vec![out])?;
    Ok(builder.build(CompData::Gate { op, a, b, out }))
}

fn build_and(builder: ExeCompBuilder) -> Result<ExeComp, String> {
    build_gate(builder, GateOp::And)
}

fn build_or(builder: ExeCompBuilder) -> Result<ExeComp, String> {
    build_gate(builder, GateOp::Or)
}

fn build_xor(builder: ExeCompBuilder) -> Result<ExeComp, String> {
    build_gate(builder, GateOp::Xor)
}

fn gate_def(def_id: &str, alt: &str, name: &str, build: fn(ExeCompBuilder) -> Result<ExeComp, String>) -> CompDef {
    let mut def = CompDef::simple(def_id, name, Vec2::new(GATE_W, GATE_H), Vec::new());
    def.alt_def_ids.push(alt.to_string());
    def.flags = CompDefFlags::CAN_ROTATE.union(CompDefFlags::HAS_BIT_WIDTH);
    def.ports = PortsDef::FromConfig(gate_ports);
    def.init_config = Some(gate_init_config);
    def.build = Some(build);
    def
}

pub fn create_gate_comps() -> Vec<CompDef> {
    vec![
        gate_def("gate/and", "and", "And", build_and),
        gate_def("gate/or", "or", "Or", build_or),
        gate_def("gate/xor", "xor", "Xor", build_xor),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::library::CompLibrary;

    fn library() -> CompLibrary {
        let mut lib = CompLibrary::new();
        for def in create_gate_comps() {
            lib.add_comp(def);
        }
        lib
    }

    #[test]
    fn test_gate_ops() {
        let lib = library();
        for (def_id, expected) in [("gate/and", 0b0100), ("gate/or", 0b1110), ("gate/xor", 0b1010)] {
            let mut args = CompArgs::new();
            args.insert("bitWidth".into(), 4.into());
            let comp = lib.create(def_id, Some(&args));
            let mut exe = lib.build(&comp, "0").unwrap();

            exe.ports[0].value = 0b1100;
            exe.ports[1].value = 0b0110;
            exe.run_phase(0);
            assert_eq!(exe.ports[2].value, expected, "{}", def_id);
        }
    }

    #[test]
    fn test_port_width_from_config() {
        let lib = library();
        let mut args = CompArgs::new();
        args.insert("bitWidth".into(), 32.into());
        let comp = lib.create("gate/and", Some(&args));
        assert!(comp.ports.iter().all(|p| p.width == 32));
        assert!(comp.flags.has(CompDefFlags::HAS_BIT_WIDTH));
    }
}
