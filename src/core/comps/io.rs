use crate::core::comps::port::{port_placement_to_pos, PortPlacement};
use crate::core::comps::{arg_f64, arg_u32, arg_u8};
use crate::core::exec::exe_comp::{bit_width_mask, CompData, ExeComp, ExePort};
use crate::core::geom::Vec2;
use crate::core::library::{CompDef, ExeCompBuilder, PortsDef};
use crate::core::model::{Comp, CompArgs, CompPort, PortType};

fn const_ports(args: &CompArgs) -> Vec<CompPort> {
    let w = arg_f64(args, "w", 4.0);
    let h = arg_f64(args, "h", 4.0);
    let width = arg_u8(args, "bitWidth", 32);
    let placement = PortPlacement::from_u32(arg_u32(args, "portPos", 0));
    vec![CompPort::new(
        "out",
        "",
        port_placement_to_pos(placement, w, h),
        PortType::OUT,
        width,
    )]
}

fn const_init_config() -> CompArgs {
    let mut args = CompArgs::new();
    args.insert("value".into(), 4.into());
    args.insert("valueMode".into(), 0.into());
    args.insert("bitWidth".into(), 32.into());
    args.insert("h".into(), 4.into());
    args.insert("w".into(), 4.into());
    args.insert("portPos".into(), 0.into());
    args.insert("rotate".into(), 0.into());
    args.insert("signed".into(), false.into());
    args
}

fn const_apply_config(comp: &mut Comp, args: &CompArgs) {
    comp.size = Vec2::new(arg_f64(args, "w", 4.0), arg_f64(args, "h", 4.0));
}

fn const_phase(data: &mut CompData, ports: &mut [ExePort]) {
    if let CompData::Const { value, out } = data {
        ports[*out].value = *value;
    }
}

fn build_const(mut builder: ExeCompBuilder) -> Result<ExeComp, String> {
    let args = builder.comp().args.clone().unwrap_or_default();
    let width = arg_u8(&args, "bitWidth", 32);
    let value = arg_u32(&args, "value", 0) & bit_width_mask(width);

    let out = builder.get_port("out")?;
    builder.add_phase(const_phase, vec![], vec![out])?;
    Ok(builder.build(CompData::Const { value, out }))
}

fn output_phase(data: &mut CompData, ports: &mut [ExePort]) {
    if let CompData::Output { inp } = data {
        ports[*inp].data_used = true;
    }
}

fn build_output(mut builder: ExeCompBuilder) -> Result<ExeComp, String> {
    let inp = builder.get_port("x")?;
    builder.add_phase(output_phase, vec![inp], vec![])?;
    Ok(builder.build(CompData::Output { inp }))
}

pub fn create_io_comps() -> Vec<CompDef> {
    let mut const32 = CompDef::simple("io/const32", "Const32", Vec2::new(4.0, 4.0), Vec::new());
    const32.alt_def_ids.push("const32".to_string());
    const32.ports = PortsDef::FromConfig(const_ports);
    const32.init_config = Some(const_init_config);
    const32.apply_config = Some(const_apply_config);
    const32.build = Some(build_const);

    let mut output0 = CompDef::simple(
        "io/output0",
        "Output",
        Vec2::new(6.0, 4.0),
        vec![CompPort::new("x", "x", Vec2::new(0.0, 2.0), PortType::IN, 32)],
    );
    output0.alt_def_ids.push("output0".to_string());
    output0.build = Some(build_output);

    vec![const32, output0]
}
