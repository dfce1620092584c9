use std::collections::HashMap;

use log::warn;

use crate::core::exec::exe_comp::ExeComp;
use crate::core::geom::{rotate_bbox_int, BoundingBox, Vec2};
use crate::core::library::exe_builder::{build_default, ExeCompBuilder};
use crate::core::model::{Comp, CompArgs, CompDefFlags, CompPort};

/// Port layout of a definition: either fixed, or computed from the config.
pub enum PortsDef {
    Fixed(Vec<CompPort>),
    FromConfig(fn(&CompArgs) -> Vec<CompPort>),
}

impl PortsDef {
    pub fn resolve(&self, args: &CompArgs) -> Vec<CompPort> {
        match self {
            PortsDef::Fixed(ports) => ports.clone(),
            PortsDef::FromConfig(f) => f(args),
        }
    }
}

pub type BuildFn = fn(ExeCompBuilder) -> Result<ExeComp, String>;

/// A component definition: plain data plus function pointers, looked up by
/// definition id. One record per component kind; no inheritance.
pub struct CompDef {
    pub def_id: String,
    pub alt_def_ids: Vec<String>,
    pub name: String,
    pub size: Vec2,
    pub flags: CompDefFlags,
    pub ports: PortsDef,
    /// Default config; merged with any overrides at create time.
    pub init_config: Option<fn() -> CompArgs>,
    /// Config-driven adjustments (e.g. size from w/h config keys).
    pub apply_config: Option<fn(&mut Comp, &CompArgs)>,
    pub build: Option<BuildFn>,
    /// Default sub-schematic for instances of this definition.
    pub sub_schematic_id: Option<String>,
}

impl CompDef {
    /// Minimal definition with fixed ports and no config.
    pub fn simple(def_id: &str, name: &str, size: Vec2, ports: Vec<CompPort>) -> Self {
        Self {
            def_id: def_id.to_string(),
            alt_def_ids: Vec::new(),
            name: name.to_string(),
            size,
            flags: CompDefFlags::NONE,
            ports: PortsDef::Fixed(ports),
            init_config: None,
            apply_config: None,
            build: None,
            sub_schematic_id: None,
        }
    }
}

/// Registry of component definitions, keyed by definition id with alias
/// support (multiple ids may map to the same definition).
#[derive(Default)]
pub struct CompLibrary {
    defs: Vec<CompDef>,
    lookup: HashMap<String, usize>,
}

impl CompLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_comp(&mut self, def: CompDef) {
        let idx = self.defs.len();
        self.lookup.insert(def.def_id.clone(), idx);
        for alt in &def.alt_def_ids {
            self.lookup.insert(alt.clone(), idx);
        }
        self.defs.push(def);
    }

    pub fn get_comp_def(&self, def_id: &str) -> Option<&CompDef> {
        self.lookup.get(def_id).map(|&i| &self.defs[i])
    }

    /// Instantiate a definition, merging `overrides` over the default config.
    ///
    /// When the definition id is unknown the comp is kept as an unresolved
    /// placeholder (soft-fail) so a schematic referencing a missing library
    /// entry still loads.
    pub fn create(&self, def_id: &str, overrides: Option<&CompArgs>) -> Comp {
        let def = self.get_comp_def(def_id);

        let mut args: Option<CompArgs> = def.and_then(|d| d.init_config).map(|f| f());
        if let Some(over) = overrides {
            let merged = args.get_or_insert_with(CompArgs::new);
            for (k, v) in over {
                merged.insert(k.clone(), v.clone());
            }
        }

        let mut comp = Comp {
            id: String::new(),
            def_id: def.map_or(def_id.to_string(), |d| d.def_id.clone()),
            name: def.map_or("<unknown>".to_string(), |d| d.name.clone()),
            pos: Vec2::ZERO,
            size: def.map_or(Vec2::new(4.0, 4.0), |d| d.size),
            rotation: 0,
            args,
            ports: Vec::new(),
            flags: CompDefFlags::NONE,
            resolved: def.is_some(),
            has_sub_schematic: def.map_or(false, |d| d.sub_schematic_id.is_some()),
            sub_schematic_id: def.and_then(|d| d.sub_schematic_id.clone()),
            bb: BoundingBox::new(),
        };

        if def.is_some() {
            self.update_comp_from_def(&mut comp);
        } else {
            warn!("component definition '{}' not found; keeping placeholder", def_id);
            comp.update_bb();
        }

        comp
    }

    /// Recompute ports, flags, size and the rotated bounding box from the
    /// definition. Idempotent; safe to call repeatedly after config edits.
    pub fn update_comp_from_def(&self, comp: &mut Comp) {
        if let Some(def) = self.get_comp_def(&comp.def_id) {
            let empty = CompArgs::new();
            let args = comp.args.as_ref().unwrap_or(&empty);
            comp.name = def.name.clone();
            comp.ports = def.ports.resolve(args);
            comp.flags = def.flags;
            comp.size = def.size;
            if comp.sub_schematic_id.is_none() {
                comp.sub_schematic_id = def.sub_schematic_id.clone();
            }
            comp.has_sub_schematic = comp.sub_schematic_id.is_some();
            if let Some(apply) = def.apply_config {
                let args = args.clone();
                apply(comp, &args);
            }
            comp.resolved = true;
        }
        comp.bb = rotate_bbox_int(comp.rotation, comp.pos, comp.size).shrink_in_place_xy(0.5);
    }

    pub fn update_all_comps_from_defs(&self, comps: &mut [Comp]) {
        for comp in comps {
            self.update_comp_from_def(comp);
        }
    }

    /// Build the runtime ExeComp for a comp. Falls back to the pass-through
    /// build for unresolved comps or definitions without a build function.
    pub fn build(&self, comp: &Comp, full_id: &str) -> Result<ExeComp, String> {
        if let Some(def) = self.get_comp_def(&comp.def_id) {
            if let Some(build_fn) = def.build {
                let builder = ExeCompBuilder::new(comp, full_id);
                return build_fn(builder);
            }
        }
        Ok(build_default(comp, full_id))
    }
}
