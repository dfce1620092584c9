use crate::core::comps::arg_bool;
use crate::core::exec::exe_comp::{CompData, ExeComp, ExePort};
use crate::core::geom::Vec2;
use crate::core::library::{CompDef, ExeCompBuilder, PortsDef};
use crate::core::model::{CompArgs, CompPort, PortType};

const MATH_W: f64 = 4.0;
const MATH_H: f64 = 6.0;

fn adder_ports(args: &CompArgs) -> Vec<CompPort> {
    let mut ports = vec![
        CompPort::new("a", "A", Vec2::new(0.0, 2.0), PortType::IN, 32),
        CompPort::new("b", "B", Vec2::new(0.0, 4.0), PortType::IN, 32),
        CompPort::new("out", "O", Vec2::new(MATH_W, 4.0), PortType::OUT, 32),
    ];
    if arg_bool(args, "carryInPort", false) {
        ports.push(CompPort::new("carryIn", "Cin", Vec2::new(0.0, 5.0), PortType::IN, 1));
    }
    if arg_bool(args, "carryOutPort", false) {
        ports.push(CompPort::new("carryOut", "Cout", Vec2::new(MATH_W, 2.0), PortType::OUT, 1));
    }
    ports
}

fn adder_init_config() -> CompArgs {
    let mut args = CompArgs::new();
    args.insert("carryInPort".into(), false.into());
    args.insert("carryOutPort".into(), false.into());
    args
}

fn adder_phase(data: &mut CompData, ports: &mut [ExePort]) {
    if let CompData::Adder {
        a,
        b,
        out,
        carry_in,
        carry_out,
    } = data
    {
        let cin = carry_in.map_or(0, |p| ports[p].value & 0b1);
        let sum = ports[*a].value as u64 + ports[*b].value as u64 + cin as u64;
        ports[*out].value = sum as u32;
        if let Some(cout) = carry_out {
            ports[*cout].value = (sum > 0xffff_ffff) as u32;
        }
    }
}

fn build_adder(mut builder: ExeCompBuilder) -> Result<ExeComp, String> {
    let args = builder.comp().args.clone().unwrap_or_default();

    let a = builder.get_port("a")?;
    let b = builder.get_port("b")?;
    let out = builder.get_port("out")?;
    let carry_in = if arg_bool(&args, "carryInPort", false) {
        Some(builder.get_port("carryIn")?)
    } else {
        None
    };
    let carry_out = if arg_bool(&args, "carryOutPort", false) {
        Some(builder.get_port("carryOut")?)
    } else {
        None
    };

    let mut reads = vec![a, b];
    reads.extend(carry_in);
    let mut writes = vec![out];
    writes.extend(carry_out);
    builder.add_phase(adder_phase, reads, writes)?;

    Ok(builder.build(CompData::Adder {
        a,
        b,
        out,
        carry_in,
        carry_out,
    }))
}

fn set_less_than_phase(data: &mut CompData, ports: &mut [ExePort]) {
    if let CompData::SetLessThan { a, b, signed, out } = data {
        let a = ports[*a].value;
        let b = ports[*b].value;
        let lt = if ports[*signed].value != 0 {
            (a as i32) < (b as i32)
        } else {
            a < b
        };
        ports[*out].value = lt as u32;
    }
}

fn build_set_less_than(mut builder: ExeCompBuilder) -> Result<ExeComp, String> {
    let a = builder.get_port("a")?;
    let b = builder.get_port("b")?;
    let signed = builder.get_port("signed")?;
    let out = builder.get_port("out")?;
    builder.add_phase(set_less_than_phase, vec![a, b, signed], vec![out])?;
    Ok(builder.build(CompData::SetLessThan { a, b, signed, out }))
}

fn shift_left_phase(data: &mut CompData, ports: &mut [ExePort]) {
    if let CompData::ShiftLeft { a, b, out } = data {
        ports[*out].value = ports[*a].value.wrapping_shl(ports[*b].value);
    }
}

fn build_shift_left(mut builder: ExeCompBuilder) -> Result<ExeComp, String> {
    let a = builder.get_port("a")?;
    let b = builder.get_port("b")?;
    let out = builder.get_port("out")?;
    builder.add_phase(shift_left_phase, vec![a, b], vec![out])?;
    Ok(builder.build(CompData::ShiftLeft { a, b, out }))
}

fn shift_right_phase(data: &mut CompData, ports: &mut [ExePort]) {
    if let CompData::ShiftRight { a, b, arith, out } = data {
        let a = ports[*a].value;
        let shift = ports[*b].value;
        ports[*out].value = if ports[*arith].value != 0 {
            (a as i32).wrapping_shr(shift) as u32
        } else {
            a.wrapping_shr(shift)
        };
    }
}

fn build_shift_right(mut builder: ExeCompBuilder) -> Result<ExeComp, String> {
    let a = builder.get_port("a")?;
    let b = builder.get_port("b")?;
    let arith = builder.get_port("arith")?;
    let out = builder.get_port("out")?;
    builder.add_phase(shift_right_phase, vec![a, b, arith], vec![out])?;
    Ok(builder.build(CompData::ShiftRight { a, b, arith, out }))
}

fn comparator_phase(data: &mut CompData, ports: &mut [ExePort]) {
    if let CompData::Comparator {
        a,
        b,
        signed,
        out_eq,
        out_lt,
    } = data
    {
        let a = ports[*a].value;
        let b = ports[*b].value;
        let lt = if ports[*signed].value != 0 {
            (a as i32) < (b as i32)
        } else {
            a < b
        };
        ports[*out_eq].value = (a == b) as u32;
        ports[*out_lt].value = lt as u32;
    }
}

fn build_comparator(mut builder: ExeCompBuilder) -> Result<ExeComp, String> {
    let a = builder.get_port("a")?;
    let b = builder.get_port("b")?;
    let signed = builder.get_port("signed")?;
    let out_eq = builder.get_port("outEq")?;
    let out_lt = builder.get_port("outLt")?;
    builder.add_phase(comparator_phase, vec![a, b, signed], vec![out_eq, out_lt])?;
    Ok(builder.build(CompData::Comparator {
        a,
        b,
        signed,
        out_eq,
        out_lt,
    }))
}

pub fn create_math_comps() -> Vec<CompDef> {
    let size = Vec2::new(MATH_W, MATH_H);

    let mut adder = CompDef::simple("math/adder", "+", size, Vec::new());
    adder.alt_def_ids.push("adder".to_string());
    adder.ports = PortsDef::FromConfig(adder_ports);
    adder.init_config = Some(adder_init_config);
    adder.build = Some(build_adder);

    let mut set_less_than = CompDef::simple(
        "math/setLessThan",
        "<?1:0",
        size,
        vec![
            CompPort::new("a", "A", Vec2::new(0.0, 2.0), PortType::IN, 32),
            CompPort::new("b", "B", Vec2::new(0.0, 4.0), PortType::IN, 32),
            CompPort::new("signed", "Signed", Vec2::new(1.0, 0.0), PortType::IN, 1),
            CompPort::new("out", "O", Vec2::new(MATH_W, 4.0), PortType::OUT, 32),
        ],
    );
    set_less_than.build = Some(build_set_less_than);

    let mut shift_left = CompDef::simple(
        "math/shiftLeft",
        "<<",
        size,
        vec![
            CompPort::new("a", "A", Vec2::new(0.0, 2.0), PortType::IN, 32),
            CompPort::new("b", "B", Vec2::new(0.0, 4.0), PortType::IN, 5),
            CompPort::new("out", "O", Vec2::new(MATH_W, 4.0), PortType::OUT, 32),
        ],
    );
    shift_left.build = Some(build_shift_left);

    let mut shift_right = CompDef::simple(
        "math/shiftRight",
        ">>",
        size,
        vec![
            CompPort::new("a", "A", Vec2::new(0.0, 2.0), PortType::IN, 32),
            CompPort::new("b", "B", Vec2::new(0.0, 4.0), PortType::IN, 5),
            CompPort::new("arith", "Arithmetic", Vec2::new(1.0, 0.0), PortType::IN, 1),
            CompPort::new("out", "O", Vec2::new(MATH_W, 4.0), PortType::OUT, 32),
        ],
    );
    shift_right.build = Some(build_shift_right);

    let mut comparator = CompDef::simple(
        "math/comparitor",
        "</=",
        size,
        vec![
            CompPort::new("a", "A", Vec2::new(0.0, 2.0), PortType::IN, 32),
            CompPort::new("b", "B", Vec2::new(0.0, 4.0), PortType::IN, 32),
            CompPort::new("signed", "Signed", Vec2::new(1.0, 0.0), PortType::IN, 1),
            CompPort::new("outEq", "O EQ", Vec2::new(MATH_W, 2.0), PortType::OUT, 1),
            CompPort::new("outLt", "O LT", Vec2::new(MATH_W, 4.0), PortType::OUT, 1),
        ],
    );
    comparator.build = Some(build_comparator);

    vec![adder, set_less_than, shift_left, shift_right, comparator]
}
