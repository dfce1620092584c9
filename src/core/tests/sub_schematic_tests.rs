// Tests for sub-schematic flattening: a wrapper comp whose internals live in
// another schematic, with values crossing the boundary port comps.
#[cfg(test)]
mod tests {
    use crate::core::comps::build_comp_library;
    use crate::core::exec::system::ExeSystem;
    use crate::core::geom::Vec2;
    use crate::core::library::{SchematicLibrary, SharedContext};
    use crate::core::model::{Comp, CompArgs, PortRef, PortType, Schematic, WireGraph, WireNode};

    fn wire(bindings: &[(&str, &str)]) -> WireGraph {
        let mut w = WireGraph::new("");
        for (i, (comp_id, port_id)) in bindings.iter().enumerate() {
            let mut node = WireNode::new(i, Vec2::new(i as f64 * 4.0, 0.0));
            node.port_ref = Some(PortRef::new(comp_id, port_id));
            w.nodes.push(node);
        }
        for i in 1..w.nodes.len() {
            w.add_edge(i - 1, i);
        }
        w
    }

    fn boundary_args(port_id: &str, ty: PortType) -> CompArgs {
        let mut args = CompArgs::new();
        args.insert("portId".into(), port_id.into());
        args.insert("type".into(), ty.0.into());
        args.insert("bitWidth".into(), 32.into());
        args
    }

    /// pin -> pout passthrough, exposed as ports of the wrapping comp.
    fn passthrough_inner(ctx: &SharedContext) -> Schematic {
        let mut s = Schematic::new("c-inner001", "passthrough");
        s.add_comp(
            ctx.comp_library
                .create("core/comp/port", Some(&boundary_args("pin", PortType::IN))),
        );
        s.add_comp(
            ctx.comp_library
                .create("core/comp/port", Some(&boundary_args("pout", PortType::OUT))),
        );
        s.add_wire(wire(&[("0", "a"), ("1", "a")]));
        s
    }

    fn context_with_inner() -> SharedContext {
        crate::core::tests::init_test_logging();
        let mut ctx = SharedContext::new(build_comp_library(), SchematicLibrary::new());
        let inner = passthrough_inner(&ctx);
        ctx.schematic_library.add_schematic(inner);
        ctx
    }

    fn parent_schematic(ctx: &SharedContext) -> Schematic {
        let mut s = Schematic::new("c-outer001", "outer");
        let mut args = CompArgs::new();
        args.insert("value".into(), 7.into());
        s.add_comp(ctx.comp_library.create("core/io/const32", Some(&args))); // 0

        let mut wrapper = Comp::placeholder("", "user/passthrough");
        wrapper.sub_schematic_id = Some("c-inner001".to_string());
        s.add_comp(wrapper); // 1

        s.add_comp(ctx.comp_library.create("core/io/output0", None)); // 2

        s.add_wire(wire(&[("0", "out"), ("1", "pin")]));
        s.add_wire(wire(&[("1", "pout"), ("2", "x")]));
        s
    }

    #[test]
    fn test_value_crosses_boundary_ports() {
        let ctx = context_with_inner();
        let schematic = parent_schematic(&ctx);
        let mut system = ExeSystem::build(&ctx, &schematic).unwrap();

        system.tick();
        let output = system.comp_by_full_id("2").unwrap();
        assert_eq!(output.ports[0].value, 7);
        assert!(output.ports[0].data_used);
    }

    #[test]
    fn test_wrapper_is_flattened_not_built() {
        let ctx = context_with_inner();
        let schematic = parent_schematic(&ctx);
        let system = ExeSystem::build(&ctx, &schematic).unwrap();

        assert!(system.comp_by_full_id("1").is_none());
        assert!(system.comp_by_full_id("1|0").is_some());
        assert!(system.comp_by_full_id("1|1").is_some());
        // two parent nets plus the inner passthrough net
        assert_eq!(system.nets.len(), 3);
    }

    #[test]
    fn test_inner_net_ids_are_prefixed() {
        let ctx = context_with_inner();
        let schematic = parent_schematic(&ctx);
        let system = ExeSystem::build(&ctx, &schematic).unwrap();

        assert!(system.net_by_full_id("1|0").is_some());
        assert!(system.net_by_full_id("0").is_some());
    }
}
